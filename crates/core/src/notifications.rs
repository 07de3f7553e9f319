//! Notification event envelope and cache invalidation mapping.
//!
//! The backend pushes a [`NotificationEvent`] over the WebSocket feed for
//! every domain change. The event's dot-separated type (e.g.
//! `"order.created"`) determines which [`QueryScope`]s go stale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::query_cache::QueryScope;
use crate::types::DbId;

/// A domain event pushed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    /// Dot-separated event name, e.g. `"order.created"`.
    pub event_type: String,

    /// Id of the entity the event is about, when it has one.
    #[serde(default)]
    pub entity_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    #[serde(default)]
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl NotificationEvent {
    /// The entity prefix of the event type (`"order.created"` -> `"order"`).
    pub fn entity_kind(&self) -> &str {
        self.event_type
            .split('.')
            .next()
            .unwrap_or(self.event_type.as_str())
    }

    /// The cache scopes this event invalidates.
    ///
    /// Every event also invalidates the notification list itself, since it
    /// appears there. Order and proposal events additionally touch carts:
    /// creating either consumes the cart it was built from.
    pub fn invalidation_scopes(&self) -> Vec<QueryScope> {
        let mut scopes = match self.entity_kind() {
            "customer" => vec![QueryScope::Customers],
            "product" => vec![QueryScope::Products],
            "cart" => vec![QueryScope::Carts],
            "order" => vec![QueryScope::Orders, QueryScope::Carts],
            "proposal" => vec![QueryScope::Proposals, QueryScope::Carts],
            "task" => vec![QueryScope::Tasks],
            "project" => vec![QueryScope::Projects],
            "user" => vec![QueryScope::Users],
            _ => vec![],
        };
        scopes.push(QueryScope::Notifications);
        scopes
    }
}
