//! Typed query keys and the invalidation-driven query cache.
//!
//! Route pages cache list/detail responses keyed by [`QueryKey`]. The cache
//! has no TTL — staleness is driven entirely by the notification feed
//! invalidating whole [`QueryScope`]s when a domain event arrives.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// The resource families the application queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryScope {
    Customers,
    Products,
    Carts,
    Orders,
    Proposals,
    Tasks,
    Projects,
    Users,
    Notifications,
}

/// Cache key for one query: a whole listing or a single record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    List(QueryScope),
    Detail(QueryScope, DbId),
}

impl QueryKey {
    pub fn scope(&self) -> QueryScope {
        match self {
            QueryKey::List(scope) => *scope,
            QueryKey::Detail(scope, _) => *scope,
        }
    }
}

/// In-memory response cache.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<QueryKey, serde_json::Value>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: QueryKey, value: serde_json::Value) {
        self.entries.insert(key, value);
    }

    pub fn get(&self, key: &QueryKey) -> Option<&serde_json::Value> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every cached query in the given scope, list and detail alike.
    /// Returns the number of entries removed.
    pub fn invalidate_scope(&mut self, scope: QueryScope) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.scope() != scope);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
