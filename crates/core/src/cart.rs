//! Persisted cart line shapes.
//!
//! The only configuration state that survives outside an editor session is
//! the `(group, item)` pair list on a cart line. It references groups and
//! items by name/id without owning them; reopening a line resolves it
//! against freshly fetched group definitions.

use serde::{Deserialize, Serialize};

use crate::configuration::ConfigurationGroup;
use crate::types::{DbId, ItemId};

/// One saved selection: the active item of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineSelection {
    pub group_name: String,
    pub item_id: ItemId,
}

/// A cart line as the cart service returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: DbId,
    pub product_id: DbId,
    pub quantity: u32,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub selections: Vec<CartLineSelection>,
}

/// The add/update payload handed to the cart service at save time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePayload {
    pub product_id: DbId,
    pub quantity: u32,
    #[serde(default)]
    pub unit: Option<String>,
    pub selections: Vec<CartLineSelection>,
}

/// Derive the persisted selection list from the working groups: one entry
/// per group with an active selection, in group order.
pub fn cart_line_selections(groups: &[ConfigurationGroup]) -> Vec<CartLineSelection> {
    groups
        .iter()
        .filter_map(|g| {
            g.selected.clone().map(|item_id| CartLineSelection {
                group_name: g.name.clone(),
                item_id,
            })
        })
        .collect()
}
