use anyhow::{Result, ensure};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::sync::Arc;

use confplan_engine::constants::{AUDITORIUM_CAP, AUDITORIUM_ID, VENUE_ROOM_CAP};
use confplan_engine::{
    CartAction, CartState, CartStore, Catalog, Category, project, total_cost,
};

use super::{Scenario, ScenarioPlan, ScenarioRun};

pub const DEFAULT_WALK_STEPS: usize = 500;
pub const LONG_WALK_STEPS: usize = 5_000;
const UNKNOWN_ITEM_ID: &str = "ghost-ballroom";
const MAX_PEOPLE_ROLL: u32 = 500;

pub fn random_walk_scenario() -> Scenario {
    Scenario {
        key: "random-walk",
        name: "Random Walk",
        description: "Seeded random mutations with invariants checked after each step",
        plan: ScenarioPlan::RandomWalk {
            steps: DEFAULT_WALK_STEPS,
        },
    }
}

pub fn long_walk_scenario() -> Scenario {
    Scenario {
        key: "long-walk",
        name: "Long Random Walk",
        description: "Extended random walk that saturates every cap",
        plan: ScenarioPlan::RandomWalk {
            steps: LONG_WALK_STEPS,
        },
    }
}

fn pick_id(rng: &mut ChaCha20Rng, catalog: &Catalog, category: Category) -> String {
    // A small share of picks target an id that no catalog defines.
    if rng.gen_ratio(1, 25) {
        return UNKNOWN_ITEM_ID.to_string();
    }
    let ids: Vec<&str> = catalog
        .items_by_category(category)
        .map(|item| item.id.as_str())
        .collect();
    if ids.is_empty() {
        return UNKNOWN_ITEM_ID.to_string();
    }
    ids[rng.gen_range(0..ids.len())].to_string()
}

#[must_use]
pub fn random_action(rng: &mut ChaCha20Rng, catalog: &Catalog) -> CartAction {
    match rng.gen_range(0..12) {
        0..=2 => CartAction::IncrementVenue {
            item_id: pick_id(rng, catalog, Category::Venue),
        },
        3 | 4 => CartAction::DecrementVenue {
            item_id: pick_id(rng, catalog, Category::Venue),
        },
        5 | 6 => CartAction::IncrementAddon {
            item_id: pick_id(rng, catalog, Category::Addon),
        },
        7 => CartAction::DecrementAddon {
            item_id: pick_id(rng, catalog, Category::Addon),
        },
        8 | 9 => CartAction::ToggleMeal {
            item_id: pick_id(rng, catalog, Category::Meal),
        },
        10 => CartAction::SetNumberOfPeople {
            people: rng.gen_range(0..=MAX_PEOPLE_ROLL),
        },
        _ => CartAction::Reset,
    }
}

/// Check every cart invariant on a snapshot.
///
/// # Errors
///
/// Returns the first violated invariant.
pub fn check_invariants(state: &CartState) -> Result<()> {
    for line in &state.venue {
        let cap = if line.item_id == AUDITORIUM_ID {
            AUDITORIUM_CAP
        } else {
            VENUE_ROOM_CAP
        };
        ensure!(
            line.quantity <= cap,
            "{} quantity {} exceeds {cap}",
            line.item_id,
            line.quantity
        );
    }
    if let Some(auditorium) = state.auditorium() {
        ensure!(
            auditorium.quantity <= AUDITORIUM_CAP
                && state.remaining_auditorium_capacity() == AUDITORIUM_CAP - auditorium.quantity,
            "remaining auditorium capacity {} out of sync with {} booked",
            state.remaining_auditorium_capacity(),
            auditorium.quantity
        );
    }
    ensure!(state.number_of_people >= 1, "attendee count dropped below 1");

    let breakdown = total_cost(state);
    ensure!(
        breakdown.total == breakdown.venue + breakdown.addons + breakdown.meals,
        "total {} does not add up: {breakdown:?}",
        breakdown.total
    );
    let projected = project(state).subtotal_sum();
    ensure!(
        projected == breakdown.total,
        "projected subtotals {projected} differ from total {}",
        breakdown.total
    );
    Ok(())
}

/// Run `steps` seeded random actions against a fresh cart.
///
/// # Errors
///
/// Returns the step index and invariant that failed, including rejected
/// actions that modified the cart.
pub fn walk(catalog: &Arc<Catalog>, seed: u64, steps: usize) -> Result<ScenarioRun> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut run = ScenarioRun::new(CartStore::new(Arc::clone(catalog)));
    for step in 0..steps {
        let action = random_action(&mut rng, catalog);
        let before = run.store.state().clone();
        run.dispatch(action);
        if let Some(record) = run.last_step()
            && record.result.is_err()
        {
            ensure!(
                run.store.state() == &before,
                "step {step}: rejected {:?} modified the cart",
                record.action
            );
        }
        check_invariants(run.store.state()).map_err(|err| err.context(format!("step {step}")))?;
    }
    log::debug!(
        "seed {seed}: {} steps, {} rejected",
        run.steps.len(),
        run.rejected()
    );
    Ok(run)
}
