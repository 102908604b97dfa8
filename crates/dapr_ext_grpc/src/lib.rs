//! # dapr_ext_grpc
//!
//! Registration of the callbacks a Dapr sidecar makes into an application:
//! service invocations, input binding triggers and pubsub topic events.
//!
//! Handlers are registered on an [`App`] and dispatched by its
//! [`CallbackServicer`], which a transport feeds with incoming calls.
//! Dispatch failures are reported as [`tonic::Status`] values.

pub mod app;
pub mod config;
pub mod error;
pub mod request;
pub mod servicer;
pub mod topic;

pub use app::App;
pub use config::AppConfig;
pub use error::{ConfigError, RegistrationError};
pub use request::{BindingRequest, InvokeMethodRequest, InvokeMethodResponse};
pub use servicer::CallbackServicer;
pub use topic::{
    Rule, SubscribeOptions, TopicEvent, TopicEventResponse, TopicRoutes, TopicRule,
    TopicSubscription,
};
