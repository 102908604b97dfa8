use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::topic::{SubscribeOptions, TopicRoutes, TopicRule, TopicSubscription};

/// Separator between the parts of a [`TopicKey`].
pub const TOPIC_KEY_DELIMITER: char = ':';

/// Key a topic handler is stored under: `{pubsub}:{topic}:{path}`.
///
/// The default (rule-less) handler of a topic has an empty path, so its key
/// ends with the delimiter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicKey {
    pub pubsub_name: String,
    pub topic: String,
    pub path: String,
}

impl TopicKey {
    pub fn new(
        pubsub_name: impl Into<String>,
        topic: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            pubsub_name: pubsub_name.into(),
            topic: topic.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for TopicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{TOPIC_KEY_DELIMITER}{}{TOPIC_KEY_DELIMITER}{}",
            self.pubsub_name, self.topic, self.path
        )
    }
}

struct RegisteredSubscription {
    /// Registration sequence, used to list subscriptions in order.
    order: u64,
    subscription: TopicSubscription,
    rules: Vec<(i32, TopicRule)>,
}

/// One subscription per (pubsub, topic), with its rules kept in priority order.
pub(crate) struct SubscriptionTable {
    topics: DashMap<(String, String), RegisteredSubscription, ahash::RandomState>,
    next_order: AtomicU64,
}

impl SubscriptionTable {
    pub fn new() -> Self {
        Self {
            topics: DashMap::default(),
            next_order: AtomicU64::new(0),
        }
    }

    /// Record a handler registration.
    ///
    /// The first registration on a topic creates its subscription and fixes
    /// its metadata and dead-letter topic. Rules are re-sorted by ascending
    /// priority after every addition; equal priorities keep insertion order.
    pub fn add(&self, options: &SubscribeOptions) {
        let key = (options.pubsub_name.clone(), options.topic.clone());
        let mut entry = self.topics.entry(key).or_insert_with(|| RegisteredSubscription {
            order: self.next_order.fetch_add(1, Ordering::Relaxed),
            subscription: TopicSubscription {
                pubsub_name: options.pubsub_name.clone(),
                topic: options.topic.clone(),
                metadata: options.metadata.clone(),
                routes: TopicRoutes::default(),
                dead_letter_topic: options.dead_letter_topic.clone(),
            },
            rules: Vec::new(),
        });

        let registered = entry.value_mut();
        if let Some(rule) = &options.rule {
            registered.rules.push((
                rule.priority,
                TopicRule {
                    match_expr: rule.match_expr.clone(),
                    path: options.route_path().to_owned(),
                },
            ));
            registered.rules.sort_by_key(|(priority, _)| *priority);
            registered.subscription.routes.rules =
                registered.rules.iter().map(|(_, rule)| rule.clone()).collect();
        }
    }

    /// All subscriptions in first-registration order.
    pub fn list(&self) -> Vec<TopicSubscription> {
        let mut ordered: Vec<(u64, TopicSubscription)> = self
            .topics
            .iter()
            .map(|entry| (entry.order, entry.subscription.clone()))
            .collect();
        ordered.sort_by_key(|(order, _)| *order);
        ordered.into_iter().map(|(_, sub)| sub).collect()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }
}

impl Default for SubscriptionTable {
    fn default() -> Self {
        Self::new()
    }
}
