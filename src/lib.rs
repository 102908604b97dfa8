pub mod serializers;

/// Handler registration for calls the sidecar makes into the app.
pub use dapr_ext_grpc as ext_grpc;

pub use serializers::duration::{DurationError, ElapsedTime};
