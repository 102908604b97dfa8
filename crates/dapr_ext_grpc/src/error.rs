use thiserror::Error;

/// Errors that can occur while registering app callbacks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistrationError {
    /// A method or input binding with this name already has a handler.
    #[error("{0} is already registered")]
    AlreadyRegistered(String),

    /// A handler already exists for this pubsub, topic and route.
    #[error("{topic} is already registered with {pubsub_name}")]
    TopicAlreadyRegistered { pubsub_name: String, topic: String },

    /// A required name was empty.
    #[error("{0} must not be empty")]
    EmptyName(&'static str),
}

/// Errors that can occur while loading [`AppConfig`](crate::AppConfig).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed.
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}
