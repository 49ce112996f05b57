//! Estimate details: totals plus the projected line items in one snapshot.
use serde::{Deserialize, Serialize};

use crate::cart::CartState;
use crate::catalog::Category;
use crate::pricing::{CostBreakdown, total_cost};
use crate::projection::{LineItem, project};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateSummary {
    pub number_of_people: u32,
    pub breakdown: CostBreakdown,
    pub items: Vec<LineItem>,
}

impl EstimateSummary {
    /// Recompute the summary from a cart snapshot.
    #[must_use]
    pub fn capture(state: &CartState) -> Self {
        Self {
            number_of_people: state.number_of_people,
            breakdown: total_cost(state),
            items: project(state).to_vec(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items_in(&self, category: Category) -> impl Iterator<Item = &LineItem> {
        self.items
            .iter()
            .filter(move |item| item.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CartStore;

    #[test]
    fn capture_matches_pricing_and_projection() {
        let mut store = CartStore::with_default_catalog();
        store.increment_venue("small-meeting-room").unwrap();
        store.increment_addon("whiteboard").unwrap();
        store.increment_addon("whiteboard").unwrap();
        store.toggle_meal("high-tea").unwrap();
        store.set_number_of_people(10).unwrap();

        let summary = EstimateSummary::capture(store.state());
        assert_eq!(summary.number_of_people, 10);
        assert_eq!(summary.breakdown.venue, 110_000);
        assert_eq!(summary.breakdown.addons, 16_000);
        assert_eq!(summary.breakdown.meals, 25_000);
        assert_eq!(summary.breakdown.total, 151_000);
        assert_eq!(summary.items.len(), 3);
        assert_eq!(summary.items_in(Category::Addon).count(), 1);
    }

    #[test]
    fn empty_cart_summary_is_empty() {
        let store = CartStore::with_default_catalog();
        let summary = EstimateSummary::capture(store.state());
        assert!(summary.is_empty());
        assert_eq!(summary.breakdown.total, 0);
    }

    #[test]
    fn summary_serializes_for_display() {
        let mut store = CartStore::with_default_catalog();
        store.toggle_meal("dinner").unwrap();
        let summary = EstimateSummary::capture(store.state());
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["breakdown"]["meals"], 7_000);
        assert_eq!(value["items"][0]["effective_quantity"]["kind"], "for_people");
    }
}
