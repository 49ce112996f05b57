//! Named cart mutations, dispatched through a single entry point.
use serde::{Deserialize, Serialize};

use crate::policy::QuantityChange;
use crate::store::{CartError, CartStore};

/// Every mutation the store accepts.
///
/// Serialized as `{"action": "increment_venue", "item_id": "auditorium"}` so
/// action scripts can be written by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CartAction {
    IncrementVenue { item_id: String },
    DecrementVenue { item_id: String },
    IncrementAddon { item_id: String },
    DecrementAddon { item_id: String },
    ToggleMeal { item_id: String },
    SetNumberOfPeople { people: u32 },
    Reset,
}

impl CartAction {
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::IncrementVenue { .. } => "increment_venue",
            Self::DecrementVenue { .. } => "decrement_venue",
            Self::IncrementAddon { .. } => "increment_addon",
            Self::DecrementAddon { .. } => "decrement_addon",
            Self::ToggleMeal { .. } => "toggle_meal",
            Self::SetNumberOfPeople { .. } => "set_number_of_people",
            Self::Reset => "reset",
        }
    }

    /// Parse a JSON array of actions.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not a list of known actions.
    pub fn script_from_json(json: &str) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// What an accepted action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    Quantity { change: QuantityChange },
    Meal { selected: bool },
    People { previous: u32, current: u32 },
    Reset,
}

impl ActionOutcome {
    /// False when the action was absorbed by a quantity bound.
    #[must_use]
    pub const fn changed_state(self) -> bool {
        match self {
            Self::Quantity { change } => change.is_applied(),
            Self::People { previous, current } => previous != current,
            Self::Meal { .. } | Self::Reset => true,
        }
    }
}

impl CartStore {
    /// Dispatch one action.
    ///
    /// # Errors
    ///
    /// Propagates the rejection from the underlying mutation; the cart is
    /// unchanged in that case.
    pub fn apply(&mut self, action: &CartAction) -> Result<ActionOutcome, CartError> {
        let quantity = |change: QuantityChange| ActionOutcome::Quantity { change };
        match action {
            CartAction::IncrementVenue { item_id } => self.increment_venue(item_id).map(quantity),
            CartAction::DecrementVenue { item_id } => self.decrement_venue(item_id).map(quantity),
            CartAction::IncrementAddon { item_id } => self.increment_addon(item_id).map(quantity),
            CartAction::DecrementAddon { item_id } => self.decrement_addon(item_id).map(quantity),
            CartAction::ToggleMeal { item_id } => self
                .toggle_meal(item_id)
                .map(|selected| ActionOutcome::Meal { selected }),
            CartAction::SetNumberOfPeople { people } => self
                .set_number_of_people(*people)
                .map(|previous| ActionOutcome::People {
                    previous,
                    current: *people,
                }),
            CartAction::Reset => {
                self.reset();
                Ok(ActionOutcome::Reset)
            }
        }
    }

    /// Apply actions in order, stopping at the first rejection.
    ///
    /// # Errors
    ///
    /// Returns the index of the rejected action with its error. Actions before
    /// it stay applied.
    pub fn apply_all<'a, I>(&mut self, actions: I) -> Result<Vec<ActionOutcome>, (usize, CartError)>
    where
        I: IntoIterator<Item = &'a CartAction>,
    {
        actions
            .into_iter()
            .enumerate()
            .map(|(idx, action)| self.apply(action).map_err(|err| (idx, err)))
            .collect()
    }
}
