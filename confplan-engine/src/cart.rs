//! Cart state: quantities, meal selections and the shared attendee count.
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogItem, Category};
use crate::constants::{AUDITORIUM_CAP, AUDITORIUM_ID, DEFAULT_PEOPLE};
use crate::policy::QuantityPolicy;

/// A venue room or add-on line with a bounded quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityLine {
    pub item_id: String,
    pub name: String,
    /// Unit cost in cents, copied from the catalog
    pub unit_cost_cents: u64,
    pub quantity: u32,
    pub policy: QuantityPolicy,
}

pub type VenueLine = QuantityLine;
pub type AddonLine = QuantityLine;

impl QuantityLine {
    #[must_use]
    pub fn from_item(item: &CatalogItem) -> Self {
        Self {
            item_id: item.id.clone(),
            name: item.name.clone(),
            unit_cost_cents: item.cost_cents,
            quantity: 0,
            policy: QuantityPolicy::for_item(item),
        }
    }
}

/// A meal option toggled on or off.
///
/// The attendee count lives on [`CartState`] only; per-person meals read it
/// at pricing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealLine {
    pub item_id: String,
    pub name: String,
    pub unit_cost_cents: u64,
    pub selected: bool,
    pub per_person: bool,
}

impl MealLine {
    #[must_use]
    pub fn from_item(item: &CatalogItem) -> Self {
        Self {
            item_id: item.id.clone(),
            name: item.name.clone(),
            unit_cost_cents: item.cost_cents,
            selected: false,
            per_person: item.per_person,
        }
    }
}

/// Complete cart snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    pub venue: Vec<VenueLine>,
    pub addons: Vec<AddonLine>,
    pub meals: Vec<MealLine>,
    pub number_of_people: u32,
}

impl Default for CartState {
    fn default() -> Self {
        Self {
            venue: Vec::new(),
            addons: Vec::new(),
            meals: Vec::new(),
            number_of_people: DEFAULT_PEOPLE,
        }
    }
}

impl CartState {
    /// Fresh cart with one empty line per catalog item.
    #[must_use]
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            venue: catalog
                .items_by_category(Category::Venue)
                .map(QuantityLine::from_item)
                .collect(),
            addons: catalog
                .items_by_category(Category::Addon)
                .map(QuantityLine::from_item)
                .collect(),
            meals: catalog
                .items_by_category(Category::Meal)
                .map(MealLine::from_item)
                .collect(),
            number_of_people: DEFAULT_PEOPLE,
        }
    }

    /// Quantity lines for a category; meals have none.
    #[must_use]
    pub fn quantity_lines(&self, category: Category) -> &[QuantityLine] {
        match category {
            Category::Venue => &self.venue,
            Category::Addon => &self.addons,
            Category::Meal => &[],
        }
    }

    pub(crate) fn quantity_lines_mut(&mut self, category: Category) -> &mut [QuantityLine] {
        match category {
            Category::Venue => &mut self.venue,
            Category::Addon => &mut self.addons,
            Category::Meal => Default::default(),
        }
    }

    #[must_use]
    pub fn find_quantity_line(&self, category: Category, item_id: &str) -> Option<&QuantityLine> {
        self.quantity_lines(category)
            .iter()
            .find(|line| line.item_id == item_id)
    }

    #[must_use]
    pub fn find_meal(&self, item_id: &str) -> Option<&MealLine> {
        self.meals.iter().find(|line| line.item_id == item_id)
    }

    pub(crate) fn find_meal_mut(&mut self, item_id: &str) -> Option<&mut MealLine> {
        self.meals.iter_mut().find(|line| line.item_id == item_id)
    }

    #[must_use]
    pub fn auditorium(&self) -> Option<&VenueLine> {
        self.find_quantity_line(Category::Venue, AUDITORIUM_ID)
    }

    /// Auditorium bookings left before its cap; 0 when no auditorium exists.
    #[must_use]
    pub fn remaining_auditorium_capacity(&self) -> u32 {
        self.auditorium()
            .map_or(0, |line| AUDITORIUM_CAP.saturating_sub(line.quantity))
    }

    /// True when nothing is booked or selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.venue.iter().all(|line| line.quantity == 0)
            && self.addons.iter().all(|line| line.quantity == 0)
            && self.meals.iter().all(|line| !line.selected)
    }
}
