//! Product configuration groups: reconciliation, selection toggling, and
//! the validity gate.
//!
//! A configurable product carries a list of [`ConfigurationGroup`]s, each a
//! set of mutually exclusive options with incremental prices. The editor
//! works on an owned copy of the server's group definitions; the selection
//! is modelled as `Option<ItemId>` per group, so "at most one active item
//! per group" holds by construction rather than by loop discipline.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::serde_util::lenient_price;
use crate::types::{DbId, ItemId};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// One selectable option within a configuration group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationItem {
    /// Unique within the owning group only.
    pub id: ItemId,
    #[serde(default)]
    pub description: String,
    /// Price added on top of the base price when this item is selected.
    #[serde(default, deserialize_with = "lenient_price")]
    pub incremental_price: f64,
    /// Pre-discount counterpart of [`incremental_price`](Self::incremental_price).
    #[serde(default, deserialize_with = "lenient_price")]
    pub incremental_old_price: f64,
    /// Item photo URLs, lazily populated per group (see the session's photo
    /// orchestration). Empty until the group's tab has been viewed.
    #[serde(default)]
    pub photos: Vec<String>,
}

/// A named set of mutually exclusive options (e.g. "Color").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationGroup {
    /// Server-side id, used only to address the photo endpoint.
    #[serde(default)]
    pub id: DbId,
    /// Unique key within a product.
    pub name: String,
    /// When `false`, exactly one item must be selected before save.
    #[serde(default)]
    pub allow_none: bool,
    /// Server-declared default, applied when nothing is saved for the group.
    #[serde(default)]
    pub default_item_id: Option<ItemId>,
    #[serde(default)]
    pub items: Vec<ConfigurationItem>,
    /// The single active selection. `None` is a legal state even for a
    /// mandatory group — the validity gate blocks save, not the toggle.
    /// Editor state, never part of the wire format.
    #[serde(skip_deserializing)]
    pub selected: Option<ItemId>,
}

impl ConfigurationGroup {
    /// Resolve the selected id against the group's items.
    pub fn selected_item(&self) -> Option<&ConfigurationItem> {
        let id = self.selected.as_ref()?;
        self.items.iter().find(|item| item.id == *id)
    }

    fn has_item(&self, item_id: &str) -> bool {
        self.items.iter().any(|item| item.id == item_id)
    }
}

/// Response of the configuration endpoint for one product in one pricing
/// context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductConfiguration {
    #[serde(default, deserialize_with = "lenient_price")]
    pub base_price: f64,
    #[serde(default, deserialize_with = "lenient_price")]
    pub base_old_price: f64,
    #[serde(default)]
    pub groups: Vec<ConfigurationGroup>,
}

/// Photos for one item, as returned by the per-group photo endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPhotos {
    pub item_id: ItemId,
    #[serde(default)]
    pub photos: Vec<String>,
}

// ---------------------------------------------------------------------------
// Selection snapshots
// ---------------------------------------------------------------------------

/// One entry of a selection snapshot. Item ids are only unique per group,
/// so snapshots key on the pair.
pub type SelectionKey = (String, ItemId);

/// Set of active `(group_name, item_id)` pairs. `BTreeSet` keeps comparison
/// deterministic and iteration ordered.
pub type SelectionSet = BTreeSet<SelectionKey>;

/// Collect the currently active `(group_name, item_id)` pairs.
pub fn selection_set(groups: &[ConfigurationGroup]) -> SelectionSet {
    groups
        .iter()
        .filter_map(|g| g.selected.clone().map(|id| (g.name.clone(), id)))
        .collect()
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Merge the server's current group definitions with a previously saved
/// selection into the editor's working state.
///
/// The raw groups are authoritative for items, prices, and `allow_none`;
/// `saved` only contributes which item starts out selected. Per group, in
/// priority order:
///
/// 1. The saved entry's item, if it still exists in the current raw group.
///    A discontinued item leaves the group unselected (the validity gate
///    reports it if the group is mandatory — intentionally, see the product
///    note in DESIGN.md). The default does **not** kick in for a group the
///    saved selection claimed.
/// 2. The group's `default_item_id`, if declared and present in `items`.
/// 3. Nothing.
///
/// Saved entries referencing a group name that no longer exists are
/// silently dropped — expected drift between cart creation and edit time.
///
/// Returns the owned working groups plus the selection snapshot taken at
/// this moment, which is the change detector's baseline and must be
/// captured before any user interaction.
pub fn reconcile(
    raw_groups: &[ConfigurationGroup],
    saved: Option<&[crate::cart::CartLineSelection]>,
) -> (Vec<ConfigurationGroup>, SelectionSet) {
    let mut groups = raw_groups.to_vec();

    for group in &mut groups {
        group.selected = None;

        let saved_entry = saved.and_then(|entries| {
            entries
                .iter()
                .find(|entry| entry.group_name == group.name)
        });

        match saved_entry {
            Some(entry) => {
                if group.has_item(&entry.item_id) {
                    group.selected = Some(entry.item_id.clone());
                }
            }
            None => {
                if let Some(default_id) = group.default_item_id.clone() {
                    if group.has_item(&default_id) {
                        group.selected = Some(default_id);
                    }
                }
            }
        }
    }

    let initial = selection_set(&groups);
    (groups, initial)
}

// ---------------------------------------------------------------------------
// Toggle
// ---------------------------------------------------------------------------

/// Toggle an item within its group.
///
/// - Unknown group name or unknown item id: no-op, not an error. The UI can
///   race a group reload and address state that is gone.
/// - Toggling the selected item deselects it, even in a mandatory group —
///   a transiently invalid configuration is legal, save is what's gated.
/// - Toggling any other item selects it; the previous selection in the same
///   group is implicitly dropped. Groups are single-select, never multi.
///
/// All other groups are untouched. Applying the same toggle twice returns
/// the selection to its starting state.
pub fn toggle_item(groups: &mut [ConfigurationGroup], group_name: &str, item_id: &str) {
    let Some(group) = groups.iter_mut().find(|g| g.name == group_name) else {
        return;
    };
    if !group.has_item(item_id) {
        return;
    }

    group.selected = match group.selected.as_deref() {
        Some(current) if current == item_id => None,
        _ => Some(item_id.to_string()),
    };
}

// ---------------------------------------------------------------------------
// Validity gate
// ---------------------------------------------------------------------------

/// A configuration is valid unless some mandatory group has no selection.
///
/// Re-evaluated on every toggle and group reload; save is disabled (not
/// merely warned) while this returns `false`.
pub fn is_valid(groups: &[ConfigurationGroup]) -> bool {
    groups.iter().all(|g| g.allow_none || g.selected.is_some())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
