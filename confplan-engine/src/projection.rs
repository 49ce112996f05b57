//! Display-ordered line items for the estimate details view.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cart::{CartState, MealLine, QuantityLine};
use crate::catalog::Category;
use crate::pricing::{meal_line_cost, quantity_line_cost};

/// Quantity column of a projected line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EffectiveQuantity {
    Units(u32),
    /// Per-person meal priced for the current attendee count.
    ForPeople(u32),
}

impl fmt::Display for EffectiveQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Units(units) => write!(f, "{units}"),
            Self::ForPeople(people) => write!(f, "for {people} people"),
        }
    }
}

/// One selected item with its resolved quantity and subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub unit_cost_cents: u64,
    pub category: Category,
    pub effective_quantity: EffectiveQuantity,
    pub subtotal_cents: u64,
}

/// Lazy view over the selected items of a cart.
///
/// Nothing is cached: every call to [`Projection::iter`] walks the borrowed
/// state again, so the projection can be iterated any number of times.
#[derive(Debug, Clone, Copy)]
pub struct Projection<'a> {
    state: &'a CartState,
}

/// Project the selected items of `state`.
#[must_use]
pub const fn project(state: &CartState) -> Projection<'_> {
    Projection { state }
}

impl<'a> Projection<'a> {
    #[must_use]
    pub const fn iter(&self) -> LineItems<'a> {
        LineItems {
            state: self.state,
            section: Some(Category::Venue),
            idx: 0,
        }
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<LineItem> {
        self.iter().collect()
    }

    #[must_use]
    pub fn subtotal_sum(&self) -> u64 {
        self.iter()
            .map(|item| item.subtotal_cents)
            .fold(0_u64, u64::saturating_add)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl<'a> IntoIterator for &Projection<'a> {
    type Item = LineItem;
    type IntoIter = LineItems<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for Projection<'a> {
    type Item = LineItem;
    type IntoIter = LineItems<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over projected lines: venue, then add-ons, then meals.
#[derive(Debug, Clone)]
pub struct LineItems<'a> {
    state: &'a CartState,
    section: Option<Category>,
    idx: usize,
}

impl LineItems<'_> {
    fn advance_section(&mut self) {
        self.section = match self.section {
            Some(Category::Venue) => Some(Category::Addon),
            Some(Category::Addon) => Some(Category::Meal),
            Some(Category::Meal) | None => None,
        };
        self.idx = 0;
    }
}

impl Iterator for LineItems<'_> {
    type Item = LineItem;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let section = self.section?;
            let idx = self.idx;
            let produced = match section {
                Category::Venue => match self.state.venue.get(idx) {
                    Some(line) => venue_item(line),
                    None => {
                        self.advance_section();
                        continue;
                    }
                },
                Category::Addon => {
                    if idx >= self.state.addons.len() {
                        self.advance_section();
                        continue;
                    }
                    addon_item(&self.state.addons, idx)
                }
                Category::Meal => match self.state.meals.get(idx) {
                    Some(line) => meal_item(line, self.state.number_of_people),
                    None => {
                        self.advance_section();
                        continue;
                    }
                },
            };
            self.idx += 1;
            if produced.is_some() {
                return produced;
            }
        }
    }
}

fn venue_item(line: &QuantityLine) -> Option<LineItem> {
    (line.quantity > 0).then(|| LineItem {
        name: line.name.clone(),
        unit_cost_cents: line.unit_cost_cents,
        category: Category::Venue,
        effective_quantity: EffectiveQuantity::Units(line.quantity),
        subtotal_cents: quantity_line_cost(line),
    })
}

/// Add-on lines sharing a name collapse into the first one, which carries the
/// summed quantity and subtotal. The row keeps the first line's unit cost, so
/// when same-name lines differ in price the subtotal is the sum of each line's
/// cost rather than `unit_cost_cents × quantity`.
fn addon_item(addons: &[QuantityLine], idx: usize) -> Option<LineItem> {
    let line = &addons[idx];
    if line.quantity == 0 {
        return None;
    }
    let same_name = |other: &&QuantityLine| other.quantity > 0 && other.name == line.name;
    if addons[..idx].iter().any(|other| same_name(&other)) {
        return None;
    }
    let (quantity, subtotal_cents) = addons[idx..]
        .iter()
        .filter(same_name)
        .fold((0_u32, 0_u64), |(qty, subtotal), other| {
            (
                qty.saturating_add(other.quantity),
                subtotal.saturating_add(quantity_line_cost(other)),
            )
        });
    Some(LineItem {
        name: line.name.clone(),
        unit_cost_cents: line.unit_cost_cents,
        category: Category::Addon,
        effective_quantity: EffectiveQuantity::Units(quantity),
        subtotal_cents,
    })
}

fn meal_item(line: &MealLine, number_of_people: u32) -> Option<LineItem> {
    line.selected.then(|| LineItem {
        name: line.name.clone(),
        unit_cost_cents: line.unit_cost_cents,
        category: Category::Meal,
        effective_quantity: if line.per_person {
            EffectiveQuantity::ForPeople(number_of_people)
        } else {
            EffectiveQuantity::Units(1)
        },
        subtotal_cents: meal_line_cost(line, number_of_people),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::QuantityPolicy;
    use crate::pricing::total_cost;

    fn qty_line(id: &str, name: &str, cost: u64, quantity: u32) -> QuantityLine {
        QuantityLine {
            item_id: id.to_string(),
            name: name.to_string(),
            unit_cost_cents: cost,
            quantity,
            policy: QuantityPolicy::UNCAPPED,
        }
    }

    fn meal(id: &str, cost: u64, selected: bool, per_person: bool) -> MealLine {
        MealLine {
            item_id: id.to_string(),
            name: id.to_string(),
            unit_cost_cents: cost,
            selected,
            per_person,
        }
    }

    fn sample_state() -> CartState {
        CartState {
            venue: vec![
                qty_line("hall", "Hall", 500, 0),
                qty_line("room", "Room", 100, 2),
            ],
            addons: vec![
                qty_line("mic-a", "Mic", 45, 1),
                qty_line("screen", "Screen", 80, 0),
                qty_line("mic-b", "Mic", 45, 2),
            ],
            meals: vec![
                meal("lunch", 65, true, true),
                meal("cake", 30, true, false),
                meal("dinner", 70, false, true),
            ],
            number_of_people: 3,
        }
    }

    #[test]
    fn order_is_venue_addons_meals() {
        let state = sample_state();
        let categories: Vec<Category> = project(&state).iter().map(|i| i.category).collect();
        assert_eq!(
            categories,
            vec![Category::Venue, Category::Addon, Category::Meal, Category::Meal]
        );
    }

    #[test]
    fn duplicate_addon_names_merge() {
        let state = sample_state();
        let mics: Vec<LineItem> = project(&state)
            .iter()
            .filter(|item| item.name == "Mic")
            .collect();
        assert_eq!(mics.len(), 1);
        assert_eq!(mics[0].effective_quantity, EffectiveQuantity::Units(3));
        assert_eq!(mics[0].subtotal_cents, 135);
    }

    #[test]
    fn mixed_price_addons_merge_with_summed_subtotal() {
        let mut state = sample_state();
        state.addons.push(qty_line("mic-c", "Mic", 60, 2));
        let mics: Vec<LineItem> = project(&state)
            .iter()
            .filter(|item| item.name == "Mic")
            .collect();
        assert_eq!(mics.len(), 1);
        assert_eq!(mics[0].effective_quantity, EffectiveQuantity::Units(5));
        assert_eq!(mics[0].unit_cost_cents, 45);
        assert_eq!(mics[0].subtotal_cents, 45 + 90 + 120);
        assert_eq!(project(&state).subtotal_sum(), total_cost(&state).total);
    }

    #[test]
    fn meal_quantities_render_per_person() {
        let state = sample_state();
        let items = project(&state).to_vec();
        let lunch = items.iter().find(|i| i.name == "lunch").unwrap();
        assert_eq!(lunch.effective_quantity.to_string(), "for 3 people");
        assert_eq!(lunch.subtotal_cents, 195);
        let cake = items.iter().find(|i| i.name == "cake").unwrap();
        assert_eq!(cake.effective_quantity, EffectiveQuantity::Units(1));
        assert_eq!(cake.subtotal_cents, 30);
    }

    #[test]
    fn subtotals_match_pricing_total() {
        let state = sample_state();
        assert_eq!(project(&state).subtotal_sum(), total_cost(&state).total);
    }

    #[test]
    fn projection_is_restartable() {
        let state = sample_state();
        let projection = project(&state);
        let first: Vec<LineItem> = projection.iter().collect();
        let second: Vec<LineItem> = (&projection).into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_cart_projects_nothing() {
        let state = CartState::default();
        assert!(project(&state).is_empty());
    }

    #[test]
    fn quantity_labels() {
        assert_eq!(EffectiveQuantity::Units(7).to_string(), "7");
        assert_eq!(EffectiveQuantity::ForPeople(4).to_string(), "for 4 people");
    }
}
