//! Per-line quantity bounds shared by venue rooms and add-ons.
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;

/// Direction of a single quantity step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Increment,
    Decrement,
}

/// Result of stepping a quantity line.
///
/// Hitting either bound is not an error: the line is left unchanged and the
/// caller learns which bound absorbed the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuantityChange {
    Applied { from: u32, to: u32 },
    AtCap { cap: u32 },
    AtFloor { floor: u32 },
}

impl QuantityChange {
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// Quantity after the step, given the quantity before it.
    #[must_use]
    pub const fn resulting(self, before: u32) -> u32 {
        match self {
            Self::Applied { to, .. } => to,
            Self::AtCap { .. } | Self::AtFloor { .. } => before,
        }
    }
}

/// Bounds for one quantity line: a floor and an optional ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityPolicy {
    #[serde(default)]
    pub floor: u32,
    #[serde(default)]
    pub cap: Option<u32>,
}

impl Default for QuantityPolicy {
    fn default() -> Self {
        Self::UNCAPPED
    }
}

impl QuantityPolicy {
    pub const UNCAPPED: Self = Self {
        floor: 0,
        cap: None,
    };

    #[must_use]
    pub const fn capped(cap: u32) -> Self {
        Self {
            floor: 0,
            cap: Some(cap),
        }
    }

    /// Policy implied by a catalog entry's category limits.
    #[must_use]
    pub fn for_item(item: &CatalogItem) -> Self {
        item.cap().map_or(Self::UNCAPPED, Self::capped)
    }

    #[must_use]
    pub fn contains(&self, quantity: u32) -> bool {
        quantity >= self.floor && self.cap.is_none_or(|cap| quantity <= cap)
    }

    /// Units left before the ceiling, `None` when uncapped.
    #[must_use]
    pub fn remaining(&self, quantity: u32) -> Option<u32> {
        self.cap.map(|cap| cap.saturating_sub(quantity))
    }

    #[must_use]
    pub fn step(&self, quantity: u32, step: Step) -> QuantityChange {
        match step {
            Step::Increment => self.step_up(quantity),
            Step::Decrement => self.step_down(quantity),
        }
    }

    #[must_use]
    pub fn step_up(&self, quantity: u32) -> QuantityChange {
        match self.cap {
            Some(cap) if quantity >= cap => QuantityChange::AtCap { cap },
            _ => QuantityChange::Applied {
                from: quantity,
                to: quantity.saturating_add(1),
            },
        }
    }

    #[must_use]
    pub fn step_down(&self, quantity: u32) -> QuantityChange {
        if quantity <= self.floor {
            QuantityChange::AtFloor { floor: self.floor }
        } else {
            QuantityChange::Applied {
                from: quantity,
                to: quantity - 1,
            }
        }
    }
}
