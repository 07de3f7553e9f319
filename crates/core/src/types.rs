//! Shared identifier and context types.

use serde::{Deserialize, Serialize};

/// Database row identifier used by the remote API.
pub type DbId = i64;

/// Identifier of a configuration item. Unique only **within its group** —
/// anything that keys on items across groups must pair it with the group
/// name.
pub type ItemId = String;

/// Pricing context for a configuration request.
///
/// Configuration prices depend on who is buying and for which project, so
/// configurations must be re-fetched whenever either changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingContext {
    pub customer_id: Option<DbId>,
    pub project_id: Option<DbId>,
}

/// Summary of the product under edit, as the catalog page hands it to the
/// editor. Carries the flat price fields used when a product has no
/// configuration groups at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: DbId,
    pub name: String,
    #[serde(default, deserialize_with = "crate::serde_util::lenient_price")]
    pub price: f64,
    #[serde(default, deserialize_with = "crate::serde_util::lenient_price")]
    pub old_price: f64,
    /// Default sales unit (e.g. `"pcs"`, `"m2"`).
    #[serde(default)]
    pub unit: Option<String>,
}
