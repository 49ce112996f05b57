//! Cart store: the single writer of [`CartState`].
use std::sync::Arc;
use thiserror::Error;

use crate::cart::CartState;
use crate::catalog::{Catalog, CatalogError, Category};
use crate::constants::{LOG_TARGET_STORE, MIN_PEOPLE};
use crate::policy::{QuantityChange, Step};

/// Rejected mutations. The cart is left untouched whenever one is returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("item '{id}' not found")]
    NotFound { id: String },
    #[error("item '{id}' is a {actual} item, not a {expected} item")]
    WrongCategory {
        id: String,
        expected: Category,
        actual: Category,
    },
    #[error("{field} must be at least {min} (got {value})")]
    Validation {
        field: &'static str,
        min: u32,
        value: u32,
    },
}

/// Owns the cart and enforces the per-category rules on every mutation.
#[derive(Debug, Clone)]
pub struct CartStore {
    catalog: Arc<Catalog>,
    state: CartState,
}

impl CartStore {
    /// Start an empty cart for `catalog`.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let state = CartState::from_catalog(&catalog);
        Self { catalog, state }
    }

    /// Store over the bundled catalog.
    #[must_use]
    pub fn with_default_catalog() -> Self {
        Self::new(Arc::new(Catalog::default_catalog().clone()))
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Read-only snapshot for pricing and projection.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> CartState {
        self.state
    }

    /// Drop every selection and return to catalog defaults.
    pub fn reset(&mut self) {
        self.state = CartState::from_catalog(&self.catalog);
        log::debug!(target: LOG_TARGET_STORE, "cart reset");
    }

    /// Add one booking of a venue room unless it is at its cap.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown ids or ids outside the venue category.
    pub fn increment_venue(&mut self, item_id: &str) -> Result<QuantityChange, CartError> {
        self.step_quantity(Category::Venue, item_id, Step::Increment)
    }

    /// Remove one booking of a venue room; a no-op at zero.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown ids or ids outside the venue category.
    pub fn decrement_venue(&mut self, item_id: &str) -> Result<QuantityChange, CartError> {
        self.step_quantity(Category::Venue, item_id, Step::Decrement)
    }

    /// # Errors
    ///
    /// Returns an error for unknown ids or ids outside the add-on category.
    pub fn increment_addon(&mut self, item_id: &str) -> Result<QuantityChange, CartError> {
        self.step_quantity(Category::Addon, item_id, Step::Increment)
    }

    /// # Errors
    ///
    /// Returns an error for unknown ids or ids outside the add-on category.
    pub fn decrement_addon(&mut self, item_id: &str) -> Result<QuantityChange, CartError> {
        self.step_quantity(Category::Addon, item_id, Step::Decrement)
    }

    /// Flip a meal's selection and return the new flag.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown ids or ids outside the meal category.
    pub fn toggle_meal(&mut self, item_id: &str) -> Result<bool, CartError> {
        let Some(line) = self.state.find_meal_mut(item_id) else {
            return Err(self.reject_lookup(Category::Meal, item_id));
        };
        line.selected = !line.selected;
        log::debug!(
            target: LOG_TARGET_STORE,
            "meal {item_id} selected={}",
            line.selected
        );
        Ok(line.selected)
    }

    /// Replace the shared attendee count and return the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Validation`] when `people` is below one.
    pub fn set_number_of_people(&mut self, people: u32) -> Result<u32, CartError> {
        if people < MIN_PEOPLE {
            let err = CartError::Validation {
                field: "number_of_people",
                min: MIN_PEOPLE,
                value: people,
            };
            log::warn!(target: LOG_TARGET_STORE, "rejected attendee count: {err}");
            return Err(err);
        }
        let previous = std::mem::replace(&mut self.state.number_of_people, people);
        log::debug!(target: LOG_TARGET_STORE, "attendees {previous} -> {people}");
        Ok(previous)
    }

    #[must_use]
    pub fn remaining_auditorium_capacity(&self) -> u32 {
        self.state.remaining_auditorium_capacity()
    }

    /// Current quantity of a venue or add-on item; 0 for anything else.
    #[must_use]
    pub fn quantity_of(&self, item_id: &str) -> u32 {
        [Category::Venue, Category::Addon]
            .into_iter()
            .find_map(|category| self.state.find_quantity_line(category, item_id))
            .map_or(0, |line| line.quantity)
    }

    #[must_use]
    pub fn is_selected(&self, item_id: &str) -> bool {
        self.state
            .find_meal(item_id)
            .is_some_and(|line| line.selected)
    }

    fn step_quantity(
        &mut self,
        category: Category,
        item_id: &str,
        step: Step,
    ) -> Result<QuantityChange, CartError> {
        let Some(line) = self
            .state
            .quantity_lines_mut(category)
            .iter_mut()
            .find(|line| line.item_id == item_id)
        else {
            return Err(self.reject_lookup(category, item_id));
        };

        let change = line.policy.step(line.quantity, step);
        line.quantity = change.resulting(line.quantity);
        match change {
            QuantityChange::Applied { from, to } => {
                log::debug!(target: LOG_TARGET_STORE, "{category} {item_id}: {from} -> {to}");
            }
            QuantityChange::AtCap { cap } => {
                log::debug!(target: LOG_TARGET_STORE, "{category} {item_id} already at cap {cap}");
            }
            QuantityChange::AtFloor { floor } => {
                log::debug!(target: LOG_TARGET_STORE, "{category} {item_id} already at {floor}");
            }
        }
        Ok(change)
    }

    fn reject_lookup(&self, expected: Category, item_id: &str) -> CartError {
        let err = match self.catalog.item_by_id(item_id) {
            Ok(item) => CartError::WrongCategory {
                id: item_id.to_string(),
                expected,
                actual: item.category,
            },
            Err(CatalogError::NotFound { id }) => CartError::NotFound { id },
            Err(_) => CartError::NotFound {
                id: item_id.to_string(),
            },
        };
        log::warn!(target: LOG_TARGET_STORE, "rejected {expected} mutation: {err}");
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{AUDITORIUM_ID, VENUE_ROOM_CAP};

    #[test]
    fn auditorium_stops_at_three() {
        let mut store = CartStore::with_default_catalog();
        for expected in 1..=3 {
            let change = store.increment_venue(AUDITORIUM_ID).unwrap();
            assert_eq!(change.resulting(expected - 1), expected);
        }
        assert_eq!(
            store.increment_venue(AUDITORIUM_ID).unwrap(),
            QuantityChange::AtCap { cap: 3 }
        );
        assert_eq!(store.quantity_of(AUDITORIUM_ID), 3);
        assert_eq!(store.remaining_auditorium_capacity(), 0);
    }

    #[test]
    fn standard_rooms_stop_at_ten() {
        let mut store = CartStore::with_default_catalog();
        for _ in 0..15 {
            store.increment_venue("presentation-room").unwrap();
        }
        assert_eq!(store.quantity_of("presentation-room"), VENUE_ROOM_CAP);
    }

    #[test]
    fn decrement_at_zero_is_a_no_op() {
        let mut store = CartStore::with_default_catalog();
        let before = store.state().clone();
        assert_eq!(
            store.decrement_venue("conference-room").unwrap(),
            QuantityChange::AtFloor { floor: 0 }
        );
        assert!(!store.decrement_addon("speaker").unwrap().is_applied());
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn addons_are_uncapped() {
        let mut store = CartStore::with_default_catalog();
        for _ in 0..50 {
            assert!(store.increment_addon("microphone").unwrap().is_applied());
        }
        store.decrement_addon("microphone").unwrap();
        assert_eq!(store.quantity_of("microphone"), 49);
    }

    #[test]
    fn toggle_meal_flips_selection() {
        let mut store = CartStore::with_default_catalog();
        assert!(store.toggle_meal("lunch").unwrap());
        assert!(store.is_selected("lunch"));
        assert!(!store.toggle_meal("lunch").unwrap());
        assert!(!store.is_selected("lunch"));
    }

    #[test]
    fn zero_people_is_rejected() {
        let mut store = CartStore::with_default_catalog();
        store.set_number_of_people(12).unwrap();
        let err = store.set_number_of_people(0).unwrap_err();
        assert!(matches!(err, CartError::Validation { value: 0, .. }));
        assert_eq!(store.state().number_of_people, 12);
        assert_eq!(store.set_number_of_people(20).unwrap(), 12);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let mut store = CartStore::with_default_catalog();
        let before = store.state().clone();
        assert_eq!(
            store.increment_venue("ballroom").unwrap_err(),
            CartError::NotFound {
                id: "ballroom".to_string()
            }
        );
        assert!(store.toggle_meal("brunch").is_err());
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn category_mismatch_is_rejected() {
        let mut store = CartStore::with_default_catalog();
        let err = store.increment_addon(AUDITORIUM_ID).unwrap_err();
        assert_eq!(
            err,
            CartError::WrongCategory {
                id: AUDITORIUM_ID.to_string(),
                expected: Category::Addon,
                actual: Category::Venue,
            }
        );
        assert!(store.toggle_meal("projector").is_err());
        assert_eq!(store.quantity_of(AUDITORIUM_ID), 0);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut store = CartStore::with_default_catalog();
        store.increment_venue(AUDITORIUM_ID).unwrap();
        store.toggle_meal("dinner").unwrap();
        store.set_number_of_people(8).unwrap();
        store.reset();
        assert!(store.state().is_empty());
        assert_eq!(store.state().number_of_people, 1);
    }
}
