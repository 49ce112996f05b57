//! Purchasable items for each planner category.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

use crate::constants::{AUDITORIUM_CAP, AUDITORIUM_ID, LOG_TARGET_CATALOG, VENUE_ROOM_CAP};

const DEFAULT_CATALOG_DATA: &str = include_str!("../assets/data/catalog.json");

/// The three kinds of things a planner can put in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Venue,
    Addon,
    Meal,
}

impl Category {
    pub const ALL: [Self; 3] = [Self::Venue, Self::Addon, Self::Meal];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Venue => "venue",
            Self::Addon => "addon",
            Self::Meal => "meal",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Venue => "Venue",
            Self::Addon => "Add-ons",
            Self::Meal => "Meals",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    /// Image reference shown next to the item.
    #[serde(default)]
    pub img: String,
    /// Unit cost in cents to avoid floating-point issues
    pub cost_cents: u64,
    pub category: Category,
    /// Declared booking ceiling for a venue room. Must match the fixed cap
    /// for the room's id when present.
    #[serde(default)]
    pub max_qty: Option<u32>,
    /// Cost scales with the attendee count; only meaningful for meals.
    #[serde(default)]
    pub per_person: bool,
}

impl CatalogItem {
    /// Quantity ceiling for this item, `None` when the category is uncapped.
    /// Venue caps depend on the id alone.
    #[must_use]
    pub fn cap(&self) -> Option<u32> {
        match self.category {
            Category::Venue => Some(venue_cap(&self.id)),
            Category::Addon | Category::Meal => None,
        }
    }

    #[must_use]
    pub fn is_auditorium(&self) -> bool {
        self.category == Category::Venue && self.id == AUDITORIUM_ID
    }
}

fn venue_cap(id: &str) -> u32 {
    if id == AUDITORIUM_ID {
        AUDITORIUM_CAP
    } else {
        VENUE_ROOM_CAP
    }
}

/// Errors raised while loading or querying a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog item '{id}' not found")]
    NotFound { id: String },
    #[error("catalog id '{id}' is defined more than once")]
    DuplicateId { id: String },
    #[error("venue item '{id}' declares max_qty {max_qty}, expected {cap}")]
    CapOverride { id: String, max_qty: u32, cap: u32 },
    #[error("JSON parsing error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Complete, immutable item catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub items: Vec<CatalogItem>,
}

impl Catalog {
    /// Build a catalog from already-parsed items.
    ///
    /// # Errors
    ///
    /// Returns an error if the items violate catalog invariants.
    pub fn new(items: Vec<CatalogItem>) -> Result<Self, CatalogError> {
        let catalog = Self { items };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or the items are invalid.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        log::debug!(
            target: LOG_TARGET_CATALOG,
            "loaded catalog with {} items",
            catalog.items.len()
        );
        Ok(catalog)
    }

    /// Catalog bundled with the crate.
    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_CATALOG_DATA).unwrap_or_else(|err| {
            log::error!(target: LOG_TARGET_CATALOG, "bundled catalog rejected: {err}");
            Self::default()
        })
    }

    #[must_use]
    pub fn default_catalog() -> &'static Self {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        CATALOG.get_or_init(Self::load_from_static)
    }

    /// Check id uniqueness and venue caps. Duplicate names are allowed.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    id: item.id.clone(),
                });
            }
            if let (Some(max_qty), Some(cap)) = (item.max_qty, item.cap())
                && max_qty != cap
            {
                return Err(CatalogError::CapOverride {
                    id: item.id.clone(),
                    max_qty,
                    cap,
                });
            }
        }
        Ok(())
    }

    /// Look up an item by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown id.
    pub fn item_by_id(&self, id: &str) -> Result<&CatalogItem, CatalogError> {
        self.items
            .iter()
            .find(|item| item.id == id)
            .ok_or_else(|| CatalogError::NotFound { id: id.to_string() })
    }

    /// Items of one category in catalog order.
    pub fn items_by_category(&self, category: Category) -> impl Iterator<Item = &CatalogItem> {
        self.items
            .iter()
            .filter(move |item| item.category == category)
    }

    #[must_use]
    pub fn auditorium(&self) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.is_auditorium())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, category: Category) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            name: id.to_string(),
            img: String::new(),
            cost_cents: 100,
            category,
            max_qty: None,
            per_person: false,
        }
    }

    #[test]
    fn default_catalog_has_every_category() {
        let catalog = Catalog::default_catalog();
        for category in Category::ALL {
            assert!(
                catalog.items_by_category(category).next().is_some(),
                "missing {category} items"
            );
        }
        assert_eq!(catalog.items_by_category(Category::Venue).count(), 5);
    }

    #[test]
    fn auditorium_cap_defaults_to_three() {
        let catalog = Catalog::new(vec![item(AUDITORIUM_ID, Category::Venue)]).unwrap();
        let auditorium = catalog.auditorium().expect("auditorium present");
        assert_eq!(auditorium.cap(), Some(AUDITORIUM_CAP));
    }

    #[test]
    fn caps_follow_category() {
        assert_eq!(item("room", Category::Venue).cap(), Some(VENUE_ROOM_CAP));
        assert_eq!(item("mic", Category::Addon).cap(), None);
        assert_eq!(item("lunch", Category::Meal).cap(), None);
    }

    #[test]
    fn item_by_id_reports_unknown_ids() {
        let catalog = Catalog::default_catalog();
        assert_eq!(catalog.item_by_id("lunch").unwrap().name, "Lunch");
        let err = catalog.item_by_id("ballroom").unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { ref id } if id == "ballroom"));
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let err =
            Catalog::new(vec![item("mic", Category::Addon), item("mic", Category::Addon)])
                .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { .. }));
    }

    #[test]
    fn validate_rejects_zero_venue_cap() {
        let mut room = item("closet", Category::Venue);
        room.max_qty = Some(0);
        let err = Catalog::new(vec![room]).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::CapOverride { max_qty: 0, cap: VENUE_ROOM_CAP, .. }
        ));
    }

    #[test]
    fn validate_rejects_oversized_max_qty() {
        let json = r#"{
            "items": [
                { "id": "auditorium", "name": "Hall", "cost_cents": 100, "category": "venue", "max_qty": 5 },
                { "id": "room", "name": "Room", "cost_cents": 100, "category": "venue", "max_qty": 50 }
            ]
        }"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::CapOverride { ref id, max_qty: 5, cap: AUDITORIUM_CAP } if id == "auditorium"
        ));

        let mut room = item("room", Category::Venue);
        room.max_qty = Some(50);
        let err = Catalog::new(vec![room]).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::CapOverride { max_qty: 50, cap: VENUE_ROOM_CAP, .. }
        ));
    }

    #[test]
    fn matching_max_qty_is_accepted() {
        let mut auditorium = item(AUDITORIUM_ID, Category::Venue);
        auditorium.max_qty = Some(AUDITORIUM_CAP);
        let mut room = item("room", Category::Venue);
        room.max_qty = Some(VENUE_ROOM_CAP);
        let catalog = Catalog::new(vec![auditorium, room]).unwrap();
        assert_eq!(catalog.item_by_id("room").unwrap().cap(), Some(VENUE_ROOM_CAP));
    }

    #[test]
    fn from_json_applies_field_defaults() {
        let json = r#"{
            "items": [
                { "id": "buffet", "name": "Buffet", "cost_cents": 1500, "category": "meal", "per_person": true },
                { "id": "mic", "name": "Mic", "cost_cents": 45, "category": "addon" }
            ]
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        let buffet = catalog.item_by_id("buffet").unwrap();
        assert!(buffet.per_person);
        assert!(buffet.img.is_empty());
        assert!(!catalog.item_by_id("mic").unwrap().per_person);
    }

    #[test]
    fn from_json_surfaces_parse_errors() {
        let err = Catalog::from_json("{ not json").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }
}
