//! Value converters shared between the SDK and the sidecar.

pub mod duration;

pub use duration::{
    DurationError, ElapsedTime, convert_from_dapr_duration, convert_to_dapr_duration,
};
