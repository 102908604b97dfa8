//! Pub/sub subscription types.
//!
//! A subscription is identified by its pubsub component and topic. Each one
//! may carry several routing rules; the sidecar evaluates the rules in
//! priority order and delivers the event to the path of the first match,
//! falling back to the default route.

use std::collections::HashMap;

use bon::Builder;
use bytes::Bytes;

/// CloudEvents specification version assumed when none is given.
pub const CLOUDEVENTS_SPEC_VERSION: &str = "1.0";

/// A routing rule attached to a topic handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// CEL expression evaluated against the incoming CloudEvent.
    pub match_expr: String,
    /// Lower values are evaluated first.
    pub priority: i32,
}

impl Rule {
    pub fn new(match_expr: impl Into<String>, priority: i32) -> Self {
        Self {
            match_expr: match_expr.into(),
            priority,
        }
    }
}

/// Options passed when subscribing a handler to a topic.
///
/// ```
/// use dapr_ext_grpc::{Rule, SubscribeOptions};
///
/// let options = SubscribeOptions::builder()
///     .pubsub_name("pubsub")
///     .topic("orders")
///     .rule(Rule::new("event.type == \"created\"", 1))
///     .route("created")
///     .build();
/// assert_eq!(options.route_path(), "created");
/// ```
#[derive(Debug, Clone, Builder)]
pub struct SubscribeOptions {
    #[builder(into)]
    pub pubsub_name: String,

    #[builder(into)]
    pub topic: String,

    /// Subscription metadata. Only the first registration on a topic sets it.
    #[builder(default)]
    pub metadata: HashMap<String, String>,

    /// Topic receiving events the app failed to process.
    #[builder(into)]
    pub dead_letter_topic: Option<String>,

    pub rule: Option<Rule>,

    /// Path the sidecar routes matching events to.
    #[builder(into)]
    pub route: Option<String>,
}

impl SubscribeOptions {
    /// Options for a rule-less handler on `pubsub_name`/`topic`.
    pub fn new(pubsub_name: impl Into<String>, topic: impl Into<String>) -> Self {
        Self::builder().pubsub_name(pubsub_name).topic(topic).build()
    }

    /// The path handlers are keyed under.
    ///
    /// Rule-less handlers own the default (empty) path. A rule without an
    /// explicit, non-empty route is addressed by its match expression.
    pub fn route_path(&self) -> &str {
        let route = self.route.as_deref().filter(|route| !route.is_empty());
        match (&self.rule, route) {
            (None, _) => "",
            (Some(_), Some(route)) => route,
            (Some(rule), None) => &rule.match_expr,
        }
    }
}

/// A rule as reported to the sidecar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRule {
    pub match_expr: String,
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicRoutes {
    pub rules: Vec<TopicRule>,
    pub default: String,
}

/// A subscription as reported to the sidecar by `list_topic_subscriptions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSubscription {
    pub pubsub_name: String,
    pub topic: String,
    pub metadata: HashMap<String, String>,
    pub routes: TopicRoutes,
    pub dead_letter_topic: Option<String>,
}

/// A CloudEvent delivered on a subscribed topic.
#[derive(Debug, Clone, Builder)]
pub struct TopicEvent {
    #[builder(into, default)]
    pub id: String,

    #[builder(into, default)]
    pub source: String,

    #[builder(into, default)]
    pub event_type: String,

    #[builder(into, default = CLOUDEVENTS_SPEC_VERSION.to_string())]
    pub spec_version: String,

    #[builder(into, default)]
    pub data_content_type: String,

    #[builder(into, default)]
    pub data: Bytes,

    #[builder(into)]
    pub topic: String,

    #[builder(into)]
    pub pubsub_name: String,

    /// Route selected by the sidecar; empty for the default route.
    #[builder(into, default)]
    pub path: String,

    /// CloudEvent extension attributes.
    #[builder(default)]
    pub extensions: HashMap<String, String>,
}

impl Default for TopicEvent {
    fn default() -> Self {
        Self {
            id: String::new(),
            source: String::new(),
            event_type: String::new(),
            spec_version: CLOUDEVENTS_SPEC_VERSION.to_string(),
            data_content_type: String::new(),
            data: Bytes::new(),
            topic: String::new(),
            pubsub_name: String::new(),
            path: String::new(),
            extensions: HashMap::new(),
        }
    }
}

impl TopicEvent {
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}

/// Outcome a topic handler reports back to the sidecar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TopicEventResponse {
    /// The event was processed.
    #[default]
    Success,
    /// Redeliver the event later.
    Retry,
    /// Discard the event (or move it to the dead-letter topic).
    Drop,
}

impl From<()> for TopicEventResponse {
    fn from(_: ()) -> Self {
        TopicEventResponse::Success
    }
}
