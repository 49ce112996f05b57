//! Conference Planner Engine
//!
//! Cart state and pricing core for the conference expense planner. Venue
//! rooms, add-ons and meals are mutated through [`CartStore`]; costs and the
//! itemized details view are derived from read-only [`CartState`] snapshots.
//! This crate carries no UI or platform-specific dependencies.

pub mod action;
pub mod cart;
pub mod catalog;
pub mod constants;
pub mod policy;
pub mod pricing;
pub mod projection;
pub mod store;
pub mod summary;

// Re-export commonly used types
pub use action::{ActionOutcome, CartAction};
pub use cart::{AddonLine, CartState, MealLine, QuantityLine, VenueLine};
pub use catalog::{Catalog, CatalogError, CatalogItem, Category};
pub use policy::{QuantityChange, QuantityPolicy, Step};
pub use pricing::{
    CostBreakdown, addon_cost, format_cents, meal_line_cost, meals_cost, quantity_line_cost,
    total_cost, venue_cost,
};
pub use projection::{EffectiveQuantity, LineItem, LineItems, Projection, project};
pub use store::{CartError, CartStore};
pub use summary::EstimateSummary;

/// Remaining auditorium bookings for a snapshot; never negative.
#[must_use]
pub fn remaining_auditorium_capacity(state: &CartState) -> u32 {
    state.remaining_auditorium_capacity()
}
