use std::future::Future;
use std::sync::{PoisonError, RwLock};
use tonic::Status;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::RegistrationError;
use crate::request::{BindingRequest, InvokeMethodRequest, InvokeMethodResponse};
use crate::servicer::handler::{HandlerFn, call_guarded, make_handler};
use crate::servicer::handler_map::HandlerMap;
use crate::servicer::subscriptions::{SubscriptionTable, TopicKey};
use crate::topic::{SubscribeOptions, TopicEvent, TopicEventResponse, TopicSubscription};

/// Holds the app's callbacks and dispatches sidecar calls to them.
///
/// Registration and dispatch both take `&self`, so a servicer behind an
/// `Arc` can keep accepting registrations while calls are in flight.
pub struct CallbackServicer {
    config: AppConfig,
    methods: HandlerMap<InvokeMethodRequest, InvokeMethodResponse>,
    bindings: HandlerMap<BindingRequest, ()>,
    topics: HandlerMap<TopicEvent, TopicEventResponse>,
    subscriptions: SubscriptionTable,
    health_check: RwLock<Option<HandlerFn<(), ()>>>,
}

impl CallbackServicer {
    /// Create a servicer with no handlers registered.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            methods: HandlerMap::new(),
            bindings: HandlerMap::new(),
            topics: HandlerMap::new(),
            subscriptions: SubscriptionTable::new(),
            health_check: RwLock::new(None),
        }
    }

    /// Get the configuration the servicer was built with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Register a handler for service invocations of `method`.
    pub fn register_method<F, Fut, R>(
        &self,
        method: impl Into<String>,
        handler: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(InvokeMethodRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, Status>> + Send + 'static,
        R: Into<InvokeMethodResponse> + Send + 'static,
    {
        let method = non_empty(method.into(), "method name")?;
        self.methods
            .try_insert(method.clone(), make_handler(handler))
            .map_err(RegistrationError::AlreadyRegistered)?;

        info!(method = %method, "Registered method handler");
        Ok(())
    }

    /// Register a handler for the input binding `name`.
    pub fn register_binding<F, Fut, R>(
        &self,
        name: impl Into<String>,
        handler: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(BindingRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, Status>> + Send + 'static,
        R: Into<()> + Send + 'static,
    {
        let name = non_empty(name.into(), "binding name")?;
        self.bindings
            .try_insert(name.clone(), make_handler(handler))
            .map_err(RegistrationError::AlreadyRegistered)?;

        info!(binding = %name, "Registered input binding handler");
        Ok(())
    }

    /// Register a handler for a pubsub topic.
    ///
    /// A topic may carry one rule-less handler plus any number of rule-based
    /// handlers, each under a distinct route.
    pub fn register_topic<F, Fut, R>(
        &self,
        options: SubscribeOptions,
        handler: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(TopicEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, Status>> + Send + 'static,
        R: Into<TopicEventResponse> + Send + 'static,
    {
        non_empty(options.pubsub_name.as_str(), "pubsub name")?;
        non_empty(options.topic.as_str(), "topic")?;

        let key = TopicKey::new(
            options.pubsub_name.as_str(),
            options.topic.as_str(),
            options.route_path(),
        );
        self.topics
            .try_insert(key.to_string(), make_handler(handler))
            .map_err(|_| RegistrationError::TopicAlreadyRegistered {
                pubsub_name: options.pubsub_name.clone(),
                topic: options.topic.clone(),
            })?;
        self.subscriptions.add(&options);

        info!(
            pubsub_name = %options.pubsub_name,
            topic = %options.topic,
            route = %key.path,
            rule = ?options.rule.as_ref().map(|rule| &rule.match_expr),
            "Registered topic handler"
        );
        Ok(())
    }

    /// Install the health check callback, replacing any previous one.
    pub fn register_health_check<F, Fut>(&self, handler: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), Status>> + Send + 'static,
    {
        let handler: HandlerFn<(), ()> = make_handler(move |_: ()| handler());
        let mut slot = self
            .health_check
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if slot.replace(handler).is_some() {
            warn!("Replacing previously registered health check");
        } else {
            info!("Registered health check");
        }
    }

    /// Dispatch a service invocation.
    pub async fn on_invoke(
        &self,
        method: &str,
        request: InvokeMethodRequest,
    ) -> Result<InvokeMethodResponse, Status> {
        self.check_message_length(request.data.len())?;

        let handler = self.methods.get(method).ok_or_else(|| {
            warn!(app_id = ?self.config.app_id, method = %method, "No handler for method");
            Status::unimplemented(format!("{method} method not implemented!"))
        })?;

        debug!(app_id = ?self.config.app_id, method = %method, "Invoking method handler");
        call_guarded(&handler, request).await
    }

    /// Dispatch an input binding trigger.
    pub async fn on_binding_event(&self, request: BindingRequest) -> Result<(), Status> {
        self.check_message_length(request.data.len())?;

        let handler = self.bindings.get(&request.name).ok_or_else(|| {
            warn!(app_id = ?self.config.app_id, binding = %request.name, "No handler for binding");
            Status::unimplemented(format!("{} binding not implemented!", request.name))
        })?;

        debug!(
            app_id = ?self.config.app_id,
            binding = %request.name,
            "Invoking binding handler"
        );
        call_guarded(&handler, request).await
    }

    /// Dispatch a pubsub event to the handler for its pubsub, topic and path.
    pub async fn on_topic_event(&self, event: TopicEvent) -> Result<TopicEventResponse, Status> {
        self.check_message_length(event.data.len())?;

        let key = TopicKey::new(
            event.pubsub_name.as_str(),
            event.topic.as_str(),
            event.path.as_str(),
        );
        let handler = self.topics.get(&key.to_string()).ok_or_else(|| {
            warn!(app_id = ?self.config.app_id, topic_key = %key, "No handler for topic");
            Status::unimplemented(format!("topic {} is not implemented!", event.topic))
        })?;

        debug!(
            app_id = ?self.config.app_id,
            topic_key = %key,
            event_id = %event.id,
            "Invoking topic handler"
        );
        call_guarded(&handler, event).await
    }

    /// Run the health check, if one is registered.
    pub async fn on_health_check(&self) -> Result<(), Status> {
        let handler = self
            .health_check
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        match handler {
            Some(handler) => call_guarded(&handler, ()).await,
            None => Ok(()),
        }
    }

    /// Names of all registered input bindings.
    pub fn list_input_bindings(&self) -> Vec<String> {
        self.bindings.keys()
    }

    /// All topic subscriptions, in the order their topics were first registered.
    pub fn list_topic_subscriptions(&self) -> Vec<TopicSubscription> {
        self.subscriptions.list()
    }

    /// Check if a handler is registered for the given method.
    pub fn has_method(&self, method: &str) -> bool {
        self.methods.contains(method)
    }

    /// Check if a handler is registered for the given input binding.
    pub fn has_binding(&self, name: &str) -> bool {
        self.bindings.contains(name)
    }

    /// Check for a topic handler by its `{pubsub}:{topic}:{path}` key.
    pub fn has_topic_handler(&self, topic_key: &str) -> bool {
        self.topics.contains(topic_key)
    }

    /// Get the number of registered method handlers.
    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    /// Get the number of registered topic handlers, across all routes.
    pub fn topic_handler_count(&self) -> usize {
        self.topics.len()
    }

    /// Get the number of distinct (pubsub, topic) subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    fn check_message_length(&self, length: usize) -> Result<(), Status> {
        let max = self.config.max_message_length;
        if length > max {
            warn!(length, max, "Rejecting oversized payload");
            return Err(Status::resource_exhausted(format!(
                "payload of {length} bytes exceeds the {max} byte limit"
            )));
        }
        Ok(())
    }
}

impl Default for CallbackServicer {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

fn non_empty<S: AsRef<str>>(value: S, what: &'static str) -> Result<S, RegistrationError> {
    if value.as_ref().is_empty() {
        return Err(RegistrationError::EmptyName(what));
    }
    Ok(value)
}
