use dashmap::DashMap;
use std::sync::Arc;

use crate::servicer::handler::HandlerFn;

/// Maps callback names to handlers.
///
/// Only one handler is allowed per name. Lookups clone the handler out of
/// the map so no shard lock is held while the handler runs.
pub(crate) struct HandlerMap<Req, Resp> {
    handlers: DashMap<String, HandlerFn<Req, Resp>, ahash::RandomState>,
}

impl<Req, Resp> HandlerMap<Req, Resp> {
    pub fn new() -> Self {
        Self {
            handlers: DashMap::default(),
        }
    }

    /// Insert a handler. Returns the rejected key if the name is taken.
    pub fn try_insert(&self, key: String, handler: HandlerFn<Req, Resp>) -> Result<(), String> {
        use dashmap::mapref::entry::Entry;

        match self.handlers.entry(key) {
            Entry::Occupied(slot) => Err(slot.key().clone()),
            Entry::Vacant(slot) => {
                slot.insert(handler);
                Ok(())
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<HandlerFn<Req, Resp>> {
        self.handlers.get(key).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.handlers.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Registered names in lexical order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .handlers
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        keys
    }
}

impl<Req, Resp> Default for HandlerMap<Req, Resp> {
    fn default() -> Self {
        Self::new()
    }
}
