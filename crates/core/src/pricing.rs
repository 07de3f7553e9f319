//! Line-item price aggregation.

use serde::Serialize;

use crate::configuration::ConfigurationGroup;

/// Aggregated price of one line item: the discounted total and the
/// pre-discount total it is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total: f64,
    pub old_total: f64,
}

impl Totals {
    /// Flat totals for a product without configuration groups.
    pub fn flat(price: f64, old_price: f64) -> Self {
        Self {
            total: price,
            old_total: old_price,
        }
    }

    /// A discount exists only when the old total is strictly greater.
    pub fn has_discount(&self) -> bool {
        self.old_total > self.total
    }

    /// Discount as a rounded percentage, or `None` when the old total is
    /// not positive (avoids dividing by zero for never-discounted lines).
    pub fn discount_percent(&self) -> Option<i64> {
        if self.old_total > 0.0 {
            Some(((1.0 - self.total / self.old_total) * 100.0).round() as i64)
        } else {
            None
        }
    }
}

/// Sum the base price and the incremental price of every selected item
/// across all groups. This is the configuration-aware path; callers with an
/// unconfigured product use [`Totals::flat`] on the product's own price
/// fields instead.
pub fn compute_totals(
    base_price: f64,
    base_old_price: f64,
    groups: &[ConfigurationGroup],
) -> Totals {
    let mut total = base_price;
    let mut old_total = base_old_price;

    for group in groups {
        if let Some(item) = group.selected_item() {
            total += item.incremental_price;
            old_total += item.incremental_old_price;
        }
    }

    Totals { total, old_total }
}
