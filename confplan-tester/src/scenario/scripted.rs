use anyhow::{Result, bail, ensure};

use confplan_engine::constants::{AUDITORIUM_CAP, AUDITORIUM_ID, VENUE_ROOM_CAP};
use confplan_engine::{
    ActionOutcome, CartAction, CartError, EffectiveQuantity, QuantityChange, project, total_cost,
};

use super::{Scenario, ScenarioRun};

fn venue_up(id: &str) -> CartAction {
    CartAction::IncrementVenue {
        item_id: id.to_string(),
    }
}

fn venue_down(id: &str) -> CartAction {
    CartAction::DecrementVenue {
        item_id: id.to_string(),
    }
}

fn addon_up(id: &str) -> CartAction {
    CartAction::IncrementAddon {
        item_id: id.to_string(),
    }
}

fn addon_down(id: &str) -> CartAction {
    CartAction::DecrementAddon {
        item_id: id.to_string(),
    }
}

fn meal(id: &str) -> CartAction {
    CartAction::ToggleMeal {
        item_id: id.to_string(),
    }
}

const fn people(count: u32) -> CartAction {
    CartAction::SetNumberOfPeople { people: count }
}

fn repeat(action: &CartAction, times: usize) -> Vec<CartAction> {
    std::iter::repeat_n(action.clone(), times).collect()
}

fn no_rejections(run: &ScenarioRun) -> Result<()> {
    if let Some(step) = run.steps.iter().find(|step| step.result.is_err()) {
        bail!("{} was rejected: {:?}", step.action.key(), step.result);
    }
    Ok(())
}

fn totals_consistent(run: &ScenarioRun) -> Result<()> {
    let state = run.store.state();
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

fn smoke_expectation(run: &ScenarioRun) -> Result<()> {
    no_rejections(run)?;
    totals_consistent(run)?;
    let breakdown = total_cost(run.store.state());
    ensure!(breakdown.venue > 0, "venue cost should be positive");
    ensure!(breakdown.addons > 0, "add-on cost should be positive");
    ensure!(breakdown.meals > 0, "meal cost should be positive");
    Ok(())
}

fn auditorium_cap_expectation(run: &ScenarioRun) -> Result<()> {
    no_rejections(run)?;
    let last = run.last_step().map(|step| step.result.clone());
    ensure!(
        matches!(
            last,
            Some(Ok(ActionOutcome::Quantity {
                change: QuantityChange::AtCap { .. }
            }))
        ),
        "fourth auditorium booking should hit the cap, got {last:?}"
    );
    ensure!(run.store.quantity_of(AUDITORIUM_ID) == AUDITORIUM_CAP);
    ensure!(
        run.store.remaining_auditorium_capacity() == 0,
        "remaining capacity should be 0"
    );
    Ok(())
}

fn room_cap_expectation(run: &ScenarioRun) -> Result<()> {
    no_rejections(run)?;
    let quantity = run.store.quantity_of("conference-room");
    ensure!(
        quantity == VENUE_ROOM_CAP,
        "conference room should stop at {VENUE_ROOM_CAP}, got {quantity}"
    );
    Ok(())
}

fn floor_expectation(run: &ScenarioRun) -> Result<()> {
    no_rejections(run)?;
    for step in &run.steps {
        if let Ok(outcome) = &step.result {
            ensure!(
                !outcome.changed_state(),
                "{} on an empty cart changed state",
                step.action.key()
            );
        }
    }
    ensure!(run.store.state().is_empty(), "cart should still be empty");
    Ok(())
}

fn per_person_expectation(run: &ScenarioRun) -> Result<()> {
    no_rejections(run)?;
    let state = run.store.state();
    let meals = total_cost(state).meals;
    ensure!(meals == 20_000, "breakfast for 4 should cost 20000, got {meals}");
    let Some(item) = project(state).iter().find(|item| item.name == "Breakfast") else {
        bail!("breakfast missing from projection");
    };
    ensure!(
        item.effective_quantity == EffectiveQuantity::ForPeople(4),
        "expected 'for 4 people', got '{}'",
        item.effective_quantity
    );
    Ok(())
}

fn rescale_expectation(run: &ScenarioRun) -> Result<()> {
    no_rejections(run)?;
    let breakdown = total_cost(run.store.state());
    ensure!(
        breakdown.meals == 32_500,
        "lunch for 5 should cost 32500, got {}",
        breakdown.meals
    );
    ensure!(breakdown.venue == 70_000, "venue cost should be untouched");
    ensure!(breakdown.addons == 3_500, "add-on cost should be untouched");
    Ok(())
}

fn toggle_inverse_expectation(run: &ScenarioRun) -> Result<()> {
    no_rejections(run)?;
    ensure!(
        !run.store.is_selected("dinner"),
        "dinner should be deselected after two toggles"
    );
    ensure!(total_cost(run.store.state()).meals == 0);
    Ok(())
}

fn rejected_input_expectation(run: &ScenarioRun) -> Result<()> {
    let errors: Vec<&CartError> = run
        .steps
        .iter()
        .filter_map(|step| step.result.as_ref().err())
        .collect();
    ensure!(errors.len() == 3, "expected 3 rejections, got {}", errors.len());
    ensure!(matches!(errors[0], CartError::Validation { .. }));
    ensure!(matches!(errors[1], CartError::NotFound { .. }));
    ensure!(matches!(errors[2], CartError::WrongCategory { .. }));
    ensure!(run.store.state().number_of_people == 3);
    ensure!(run.store.state().is_empty(), "rejections must not touch the cart");
    Ok(())
}

pub fn scripted_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::scripted(
            "smoke",
            "Smoke Test",
            "One mutation of every kind, then check totals",
            vec![
                venue_up(AUDITORIUM_ID),
                venue_up("small-meeting-room"),
                addon_up("projector"),
                addon_up("speaker"),
                addon_down("speaker"),
                meal("lunch"),
                people(25),
            ],
        )
        .with_expectation(smoke_expectation),
        Scenario::scripted(
            "auditorium-cap",
            "Auditorium Cap",
            "Book the auditorium four times; the fourth is absorbed",
            repeat(&venue_up(AUDITORIUM_ID), 4),
        )
        .with_expectation(auditorium_cap_expectation),
        Scenario::scripted(
            "room-cap",
            "Standard Room Cap",
            "Book a standard room past its limit of ten",
            repeat(&venue_up("conference-room"), 12),
        )
        .with_expectation(room_cap_expectation),
        Scenario::scripted(
            "floor",
            "Zero Floor",
            "Decrement venue and add-on lines that are already empty",
            vec![venue_down(AUDITORIUM_ID), addon_down("microphone")],
        )
        .with_expectation(floor_expectation),
        Scenario::scripted(
            "per-person-meals",
            "Per-Person Meals",
            "Select breakfast for four attendees",
            vec![meal("breakfast"), people(4)],
        )
        .with_expectation(per_person_expectation)
        .with_expectation(totals_consistent),
        Scenario::scripted(
            "attendee-rescale",
            "Attendee Rescale",
            "Raise attendees from 2 to 5 with lunch selected",
            vec![
                venue_up("presentation-room"),
                addon_up("speaker"),
                meal("lunch"),
                people(2),
                people(5),
            ],
        )
        .with_expectation(rescale_expectation),
        Scenario::scripted(
            "meal-toggle",
            "Meal Toggle Inverse",
            "Toggle dinner twice and expect it deselected",
            vec![meal("dinner"), meal("dinner")],
        )
        .with_expectation(toggle_inverse_expectation),
        Scenario::scripted(
            "rejected-input",
            "Rejected Input",
            "Invalid attendee count, unknown id and wrong category leave the cart untouched",
            vec![
                people(3),
                people(0),
                venue_up("ballroom"),
                addon_up(AUDITORIUM_ID),
            ],
        )
        .with_expectation(rejected_input_expectation),
    ]
}
