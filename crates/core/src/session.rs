//! The transient editor session for one add/edit interaction.
//!
//! An [`EditorSession`] owns everything the configuration sheet shows: the
//! working groups, the quantity, the selected unit, the change-detection
//! baseline, and the per-group photo fetch states. It is created when the
//! editor opens for a product (fresh) or a cart line (pre-populated) and
//! discarded when the editor closes — nothing in it survives the close.
//!
//! All methods are synchronous; the async boundary lives in the editor
//! controller, which checks the session [`generation`](EditorSession::generation)
//! before committing any fetched data.

use std::collections::HashMap;

use serde::Serialize;

use crate::cart::{cart_line_selections, CartLine, SavePayload};
use crate::configuration::{
    is_valid, reconcile, selection_set, toggle_item, ConfigurationGroup, ItemPhotos,
    ProductConfiguration, SelectionSet,
};
use crate::error::CoreError;
use crate::pricing::{compute_totals, Totals};
use crate::types::{DbId, ProductSummary};

/// Whether the editor creates a new cart line or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Add,
    Edit,
}

/// Lazy photo loading state of one configuration group.
///
/// `NotRequested -> Loading` fires exactly once, when the group's tab first
/// becomes active. A failed fetch also ends in `Loaded` — the group keeps
/// whatever photos it already had and the UI degrades to placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoFetchState {
    NotRequested,
    Loading,
    Loaded,
}

/// Instruction to fetch photos for one group, emitted by
/// [`EditorSession::activate_tab`]. Carries the session generation so the
/// result can be rejected if the session was replaced in the meantime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFetchRequest {
    pub generation: u64,
    pub group_id: DbId,
    pub group_name: String,
}

/// Read-only snapshot of the session's derived values for the presentation
/// layer (sheet header, price line, save button state).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorView {
    pub product_name: String,
    pub groups: Vec<ConfigurationGroup>,
    pub quantity: u32,
    pub totals: Totals,
    pub has_discount: bool,
    pub discount_percent: Option<i64>,
    pub is_valid: bool,
    pub has_changes: bool,
    pub active_group_tab: Option<String>,
}

pub struct EditorSession {
    mode: EditorMode,
    product: ProductSummary,
    line_id: Option<DbId>,
    base_price: f64,
    base_old_price: f64,
    quantity: u32,
    initial_quantity: u32,
    selected_unit: Option<String>,
    groups: Vec<ConfigurationGroup>,
    initial_selection: SelectionSet,
    active_group_tab: Option<String>,
    photo_states: HashMap<String, PhotoFetchState>,
    generation: u64,
}

impl EditorSession {
    /// Open a fresh session for adding the product to the cart.
    pub fn open_add(product: ProductSummary, config: &ProductConfiguration, generation: u64) -> Self {
        Self::open(EditorMode::Add, product, config, None, generation)
    }

    /// Open a session for an existing cart line, resolving its saved
    /// selections against the freshly fetched group definitions.
    pub fn open_edit(
        product: ProductSummary,
        config: &ProductConfiguration,
        line: &CartLine,
        generation: u64,
    ) -> Self {
        Self::open(EditorMode::Edit, product, config, Some(line), generation)
    }

    fn open(
        mode: EditorMode,
        product: ProductSummary,
        config: &ProductConfiguration,
        line: Option<&CartLine>,
        generation: u64,
    ) -> Self {
        let (groups, initial_selection) =
            reconcile(&config.groups, line.map(|l| l.selections.as_slice()));

        // Quantity floor is 1 in both modes; removing a line is the cart
        // page's operation, not the editor's.
        let quantity = line.map(|l| l.quantity.max(1)).unwrap_or(1);
        let selected_unit = line
            .and_then(|l| l.unit.clone())
            .or_else(|| product.unit.clone());

        let photo_states = groups
            .iter()
            .map(|g| (g.name.clone(), PhotoFetchState::NotRequested))
            .collect();

        Self {
            mode,
            line_id: line.map(|l| l.id),
            base_price: config.base_price,
            base_old_price: config.base_old_price,
            quantity,
            initial_quantity: quantity,
            selected_unit,
            groups,
            initial_selection,
            active_group_tab: None,
            photo_states,
            generation,
            product,
        }
    }

    // -- accessors -----------------------------------------------------------

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn product(&self) -> &ProductSummary {
        &self.product
    }

    /// Id of the cart line under edit; `None` in add mode.
    pub fn line_id(&self) -> Option<DbId> {
        self.line_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn selected_unit(&self) -> Option<&str> {
        self.selected_unit.as_deref()
    }

    pub fn groups(&self) -> &[ConfigurationGroup] {
        &self.groups
    }

    pub fn active_group_tab(&self) -> Option<&str> {
        self.active_group_tab.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn photo_state(&self, group_name: &str) -> PhotoFetchState {
        self.photo_states
            .get(group_name)
            .copied()
            .unwrap_or(PhotoFetchState::NotRequested)
    }

    // -- edits ---------------------------------------------------------------

    /// Set the quantity, clamped to the floor of 1.
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(1);
    }

    /// Change the sales unit. Unit changes do not count as unsaved changes;
    /// the server recomputes per-unit pricing on save.
    pub fn set_unit(&mut self, unit: impl Into<String>) {
        self.selected_unit = Some(unit.into());
    }

    /// Toggle an item in a group. Unknown names are ignored.
    pub fn toggle(&mut self, group_name: &str, item_id: &str) {
        toggle_item(&mut self.groups, group_name, item_id);
    }

    // -- derived state -------------------------------------------------------

    /// Unit totals for the current selection. A product without
    /// configuration groups prices by its own flat fields rather than the
    /// configuration base.
    pub fn totals(&self) -> Totals {
        if self.groups.is_empty() {
            Totals::flat(self.product.price, self.product.old_price)
        } else {
            compute_totals(self.base_price, self.base_old_price, &self.groups)
        }
    }

    /// The validity gate: false while any mandatory group is unsatisfied.
    pub fn is_valid(&self) -> bool {
        is_valid(&self.groups)
    }

    /// Whether closing should require a discard confirmation: the quantity
    /// or the active selection set differs from the open-time snapshot.
    pub fn has_changes(&self) -> bool {
        self.quantity != self.initial_quantity
            || selection_set(&self.groups) != self.initial_selection
    }

    /// Snapshot for the presentation layer.
    pub fn view(&self) -> EditorView {
        let totals = self.totals();
        EditorView {
            product_name: self.product.name.clone(),
            groups: self.groups.clone(),
            quantity: self.quantity,
            totals,
            has_discount: totals.has_discount(),
            discount_percent: totals.discount_percent(),
            is_valid: self.is_valid(),
            has_changes: self.has_changes(),
            active_group_tab: self.active_group_tab.clone(),
        }
    }

    // -- photo orchestration -------------------------------------------------

    /// Make a group's tab the active one.
    ///
    /// Returns a [`PhotoFetchRequest`] the first time the group is viewed;
    /// every later activation returns `None`. Unknown group names are
    /// ignored and leave the active tab unchanged.
    pub fn activate_tab(&mut self, group_name: &str) -> Option<PhotoFetchRequest> {
        let group = self.groups.iter().find(|g| g.name == group_name)?;
        let group_id = group.id;
        self.active_group_tab = Some(group_name.to_string());

        let state = self
            .photo_states
            .entry(group_name.to_string())
            .or_insert(PhotoFetchState::NotRequested);
        if *state != PhotoFetchState::NotRequested {
            return None;
        }
        *state = PhotoFetchState::Loading;

        Some(PhotoFetchRequest {
            generation: self.generation,
            group_id,
            group_name: group_name.to_string(),
        })
    }

    /// Commit fetched photos, matching by item id within the group.
    ///
    /// Results from a stale generation (the session was replaced while the
    /// fetch was in flight) are discarded.
    pub fn apply_group_photos(&mut self, generation: u64, group_name: &str, photos: &[ItemPhotos]) {
        if generation != self.generation {
            tracing::debug!(group = group_name, "Discarding stale photo result");
            return;
        }

        if let Some(group) = self.groups.iter_mut().find(|g| g.name == group_name) {
            for entry in photos {
                if let Some(item) = group.items.iter_mut().find(|i| i.id == entry.item_id) {
                    item.photos = entry.photos.clone();
                }
            }
        }
        self.photo_states
            .insert(group_name.to_string(), PhotoFetchState::Loaded);
    }

    /// Record a failed photo fetch. The group keeps its existing photos and
    /// will not be retried within this session.
    pub fn photo_fetch_failed(&mut self, generation: u64, group_name: &str) {
        if generation != self.generation {
            return;
        }
        self.photo_states
            .insert(group_name.to_string(), PhotoFetchState::Loaded);
    }

    // -- save ----------------------------------------------------------------

    /// Build the save payload, or fail while a mandatory group is
    /// unsatisfied. The gate lives here so no caller can hand an invalid
    /// configuration to the cart service.
    pub fn save_payload(&self) -> Result<SavePayload, CoreError> {
        if !self.is_valid() {
            return Err(CoreError::Validation(
                "Select all required configurations".to_string(),
            ));
        }
        Ok(SavePayload {
            product_id: self.product.id,
            quantity: self.quantity,
            unit: self.selected_unit.clone(),
            selections: cart_line_selections(&self.groups),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartLineSelection;
    use assert_matches::assert_matches;

    fn product() -> ProductSummary {
        ProductSummary {
            id: 7,
            name: "Desk".into(),
            price: 99.0,
            old_price: 120.0,
            unit: Some("pcs".into()),
        }
    }

    fn config() -> ProductConfiguration {
        serde_json::from_value(serde_json::json!({
            "basePrice": 10.0,
            "baseOldPrice": 10.0,
            "groups": [
                {
                    "id": 1,
                    "name": "Size",
                    "allowNone": false,
                    "defaultItemId": "M",
                    "items": [
                        {"id": "S", "incrementalPrice": 0.0, "incrementalOldPrice": 0.0},
                        {"id": "M", "incrementalPrice": 2.0, "incrementalOldPrice": 2.0},
                        {"id": "L", "incrementalPrice": 5.0, "incrementalOldPrice": 5.0}
                    ]
                },
                {
                    "id": 2,
                    "name": "Gift wrap",
                    "allowNone": true,
                    "items": [{"id": "Wrap", "incrementalPrice": 1.5, "incrementalOldPrice": 1.5}]
                }
            ]
        }))
        .expect("valid configuration")
    }

    fn line() -> CartLine {
        CartLine {
            id: 42,
            product_id: 7,
            quantity: 3,
            unit: Some("pcs".into()),
            selections: vec![CartLineSelection {
                group_name: "Size".into(),
                item_id: "L".into(),
            }],
        }
    }

    // --- open / baseline ---

    #[test]
    fn add_session_starts_clean_with_defaults() {
        let session = EditorSession::open_add(product(), &config(), 1);

        assert_eq!(session.quantity(), 1);
        assert!(!session.has_changes());
        assert!(session.is_valid());
        assert_eq!(session.totals().total, 12.0);
        assert_eq!(session.photo_state("Size"), PhotoFetchState::NotRequested);
    }

    #[test]
    fn edit_session_resolves_saved_selection() {
        let session = EditorSession::open_edit(product(), &config(), &line(), 1);

        assert_eq!(session.quantity(), 3);
        assert_eq!(session.line_id(), Some(42));
        assert!(!session.has_changes());
        assert_eq!(session.totals().total, 15.0);
    }

    // --- change detection ---

    #[test]
    fn quantity_change_is_detected_and_undoable() {
        let mut session = EditorSession::open_edit(product(), &config(), &line(), 1);

        session.set_quantity(5);
        assert!(session.has_changes());

        session.set_quantity(3);
        assert!(!session.has_changes());
    }

    #[test]
    fn selection_change_is_detected_and_undoable() {
        let mut session = EditorSession::open_add(product(), &config(), 1);

        session.toggle("Gift wrap", "Wrap");
        assert!(session.has_changes());

        session.toggle("Gift wrap", "Wrap");
        assert!(!session.has_changes());
    }

    #[test]
    fn swapping_within_group_is_a_change() {
        let mut session = EditorSession::open_add(product(), &config(), 1);
        session.toggle("Size", "S");
        assert!(session.has_changes());
    }

    #[test]
    fn quantity_clamps_to_one() {
        let mut session = EditorSession::open_add(product(), &config(), 1);
        session.set_quantity(0);
        assert_eq!(session.quantity(), 1);
    }

    // --- totals / validity through the session ---

    #[test]
    fn example_scenario_from_the_sheet() {
        // Base 10.00, Size mandatory with M(+2.00) default, optional wrap.
        let mut session = EditorSession::open_add(product(), &config(), 1);
        assert_eq!(session.totals().total, 12.0);
        assert!(session.is_valid());

        session.toggle("Gift wrap", "Wrap");
        assert_eq!(session.totals().total, 13.5);
        assert!(session.is_valid());

        session.toggle("Size", "M");
        assert!(!session.is_valid());
        assert_matches!(session.save_payload(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn unconfigured_product_prices_flat() {
        let config = ProductConfiguration {
            base_price: 0.0,
            base_old_price: 0.0,
            groups: vec![],
        };
        let session = EditorSession::open_add(product(), &config, 1);

        assert_eq!(session.totals().total, 99.0);
        assert_eq!(session.totals().old_total, 120.0);
        assert!(session.totals().has_discount());
    }

    #[test]
    fn save_payload_carries_active_selections() {
        let mut session = EditorSession::open_add(product(), &config(), 1);
        session.toggle("Gift wrap", "Wrap");
        session.set_quantity(2);

        let payload = session.save_payload().expect("valid session");
        assert_eq!(payload.product_id, 7);
        assert_eq!(payload.quantity, 2);
        assert_eq!(payload.selections.len(), 2);
    }

    // --- photo orchestration ---

    #[test]
    fn first_tab_activation_requests_photos_once() {
        let mut session = EditorSession::open_add(product(), &config(), 9);

        let request = session.activate_tab("Size").expect("first view fetches");
        assert_eq!(request.generation, 9);
        assert_eq!(request.group_id, 1);
        assert_eq!(session.photo_state("Size"), PhotoFetchState::Loading);

        assert_eq!(session.activate_tab("Size"), None);
        assert_eq!(session.active_group_tab(), Some("Size"));
    }

    #[test]
    fn switching_back_to_loaded_tab_does_not_refetch() {
        let mut session = EditorSession::open_add(product(), &config(), 1);
        let req = session.activate_tab("Size").expect("fetch");
        session.apply_group_photos(req.generation, "Size", &[]);

        assert!(session.activate_tab("Gift wrap").is_some());
        assert_eq!(session.activate_tab("Size"), None);
    }

    #[test]
    fn unknown_tab_is_ignored() {
        let mut session = EditorSession::open_add(product(), &config(), 1);
        assert_eq!(session.activate_tab("Material"), None);
        assert_eq!(session.active_group_tab(), None);
    }

    #[test]
    fn photos_are_matched_by_item_id() {
        let mut session = EditorSession::open_add(product(), &config(), 1);
        let req = session.activate_tab("Size").expect("fetch");

        let photos = vec![
            ItemPhotos {
                item_id: "M".into(),
                photos: vec!["m-front.jpg".into(), "m-side.jpg".into()],
            },
            ItemPhotos {
                item_id: "Q".into(), // no such item; ignored
                photos: vec!["q.jpg".into()],
            },
        ];
        session.apply_group_photos(req.generation, "Size", &photos);

        assert_eq!(session.photo_state("Size"), PhotoFetchState::Loaded);
        let size = &session.groups()[0];
        let m = size.items.iter().find(|i| i.id == "M").expect("M exists");
        assert_eq!(m.photos.len(), 2);
        let s = size.items.iter().find(|i| i.id == "S").expect("S exists");
        assert!(s.photos.is_empty());
    }

    #[test]
    fn stale_generation_result_is_discarded() {
        let mut session = EditorSession::open_add(product(), &config(), 2);
        session.activate_tab("Size");

        // Result from the previous session (generation 1) arrives late.
        session.apply_group_photos(
            1,
            "Size",
            &[ItemPhotos {
                item_id: "M".into(),
                photos: vec!["old.jpg".into()],
            }],
        );

        assert_eq!(session.photo_state("Size"), PhotoFetchState::Loading);
        assert!(session.groups()[0].items.iter().all(|i| i.photos.is_empty()));
    }

    #[test]
    fn failed_fetch_degrades_to_loaded() {
        let mut session = EditorSession::open_add(product(), &config(), 1);
        let req = session.activate_tab("Size").expect("fetch");

        session.photo_fetch_failed(req.generation, "Size");
        assert_eq!(session.photo_state("Size"), PhotoFetchState::Loaded);

        // No retry within the session.
        assert_eq!(session.activate_tab("Size"), None);
    }

    // --- view ---

    #[test]
    fn view_exposes_derived_values() {
        let mut session = EditorSession::open_add(product(), &config(), 1);
        session.toggle("Size", "M"); // deselect mandatory group
        let view = session.view();

        assert_eq!(view.quantity, 1);
        assert!(!view.is_valid);
        assert!(view.has_changes);
        assert_eq!(view.totals.total, 10.0);
    }
}
