//! Cost reductions over a cart snapshot.
//!
//! Every figure is integer cents. The per-line functions are the only place a
//! line's cost is computed; the projector reuses them for its subtotals.
use serde::{Deserialize, Serialize};

use crate::cart::{CartState, MealLine, QuantityLine};
use crate::catalog::Category;

/// Per-category costs plus their sum, in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub venue: u64,
    pub addons: u64,
    pub meals: u64,
    pub total: u64,
}

impl CostBreakdown {
    #[must_use]
    pub const fn for_category(&self, category: Category) -> u64 {
        match category {
            Category::Venue => self.venue,
            Category::Addon => self.addons,
            Category::Meal => self.meals,
        }
    }
}

#[must_use]
pub fn quantity_line_cost(line: &QuantityLine) -> u64 {
    line.unit_cost_cents.saturating_mul(u64::from(line.quantity))
}

/// Cost of one meal line. Unselected lines cost nothing.
#[must_use]
pub fn meal_line_cost(line: &MealLine, number_of_people: u32) -> u64 {
    if !line.selected {
        return 0;
    }
    if line.per_person {
        line.unit_cost_cents.saturating_mul(u64::from(number_of_people))
    } else {
        line.unit_cost_cents
    }
}

fn sum_quantity_lines(lines: &[QuantityLine]) -> u64 {
    lines
        .iter()
        .map(quantity_line_cost)
        .fold(0_u64, u64::saturating_add)
}

#[must_use]
pub fn venue_cost(state: &CartState) -> u64 {
    sum_quantity_lines(&state.venue)
}

#[must_use]
pub fn addon_cost(state: &CartState) -> u64 {
    sum_quantity_lines(&state.addons)
}

#[must_use]
pub fn meals_cost(state: &CartState) -> u64 {
    state
        .meals
        .iter()
        .map(|line| meal_line_cost(line, state.number_of_people))
        .fold(0_u64, u64::saturating_add)
}

#[must_use]
pub fn total_cost(state: &CartState) -> CostBreakdown {
    let venue = venue_cost(state);
    let addons = addon_cost(state);
    let meals = meals_cost(state);
    CostBreakdown {
        venue,
        addons,
        meals,
        total: venue.saturating_add(addons).saturating_add(meals),
    }
}

/// Render cents as dollars with thousands separators, e.g. `$1,234` or `$12.50`.
#[must_use]
pub fn format_cents(cents: u64) -> String {
    let dollars = cents / 100;
    let remainder = cents % 100;
    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if remainder == 0 {
        format!("${grouped}")
    } else {
        format!("${grouped}.{remainder:02}")
    }
}
