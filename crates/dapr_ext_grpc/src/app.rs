use std::future::Future;
use std::sync::Arc;
use tonic::Status;

use crate::config::AppConfig;
use crate::error::RegistrationError;
use crate::request::{BindingRequest, InvokeMethodRequest, InvokeMethodResponse};
use crate::servicer::CallbackServicer;
use crate::topic::{SubscribeOptions, TopicEvent, TopicEventResponse};

/// Entry point for registering the callbacks the sidecar invokes.
///
/// # Example
/// ```
/// use dapr_ext_grpc::{App, InvokeMethodRequest, Rule, SubscribeOptions, TopicEventResponse};
///
/// let app = App::new();
/// app.method("say_hello", |req: InvokeMethodRequest| async move {
///     Ok::<_, tonic::Status>(format!("hello {}", req.text().unwrap_or("stranger")))
/// })
/// .unwrap();
///
/// app.subscribe(
///     SubscribeOptions::builder()
///         .pubsub_name("pubsub")
///         .topic("orders")
///         .rule(Rule::new("event.type == \"created\"", 1))
///         .route("created")
///         .build(),
///     |_event| async { Ok::<_, tonic::Status>(TopicEventResponse::Success) },
/// )
/// .unwrap();
///
/// assert!(app.servicer().has_topic_handler("pubsub:orders:created"));
/// ```
#[derive(Clone)]
pub struct App {
    servicer: Arc<CallbackServicer>,
}

impl App {
    /// Create an app with the default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create an app with the given configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            servicer: Arc::new(CallbackServicer::new(config)),
        }
    }

    /// Register a handler for service invocations of `name`.
    pub fn method<F, Fut, R>(
        &self,
        name: impl Into<String>,
        handler: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(InvokeMethodRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, Status>> + Send + 'static,
        R: Into<InvokeMethodResponse> + Send + 'static,
    {
        self.servicer.register_method(name, handler)
    }

    /// Register a handler for the input binding `name`.
    pub fn binding<F, Fut, R>(
        &self,
        name: impl Into<String>,
        handler: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(BindingRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, Status>> + Send + 'static,
        R: Into<()> + Send + 'static,
    {
        self.servicer.register_binding(name, handler)
    }

    /// Subscribe a handler to a pubsub topic.
    pub fn subscribe<F, Fut, R>(
        &self,
        options: SubscribeOptions,
        handler: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(TopicEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, Status>> + Send + 'static,
        R: Into<TopicEventResponse> + Send + 'static,
    {
        self.servicer.register_topic(options, handler)
    }

    /// Install the health check callback, replacing any previous one.
    pub fn register_health_check<F, Fut>(&self, handler: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), Status>> + Send + 'static,
    {
        self.servicer.register_health_check(handler)
    }

    /// The servicer a transport hands incoming calls to.
    pub fn servicer(&self) -> Arc<CallbackServicer> {
        Arc::clone(&self.servicer)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
