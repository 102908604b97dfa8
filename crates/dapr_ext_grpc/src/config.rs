use crate::error::ConfigError;

/// Environment variable holding the application id.
pub const APP_ID_ENV: &str = "APP_ID";

/// Environment variable overriding the maximum accepted payload size.
pub const MAX_MESSAGE_LENGTH_ENV: &str = "DAPR_GRPC_MAX_MESSAGE_LENGTH";

/// gRPC's default maximum message size (4 MiB).
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 4 * 1024 * 1024;

/// Configuration for the callback [`App`](crate::App).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application id, attached to dispatch logs when set.
    pub app_id: Option<String>,

    /// Largest payload, in bytes, the servicer hands to a handler.
    pub max_message_length: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
        }
    }
}

impl AppConfig {
    /// Load the configuration from the process environment.
    ///
    /// Unset variables keep their default values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(app_id) = lookup(APP_ID_ENV).filter(|id| !id.is_empty()) {
            config.app_id = Some(app_id);
        }

        if let Some(raw) = lookup(MAX_MESSAGE_LENGTH_ENV) {
            config.max_message_length = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: MAX_MESSAGE_LENGTH_ENV,
                value: raw.clone(),
            })?;
        }

        Ok(config)
    }

    /// Set the application id.
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// Set the maximum accepted payload size.
    pub fn with_max_message_length(mut self, length: usize) -> Self {
        self.max_message_length = length;
        self
    }
}
