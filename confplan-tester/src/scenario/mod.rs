use anyhow::Result;
use std::sync::Arc;

use confplan_engine::{ActionOutcome, CartAction, CartError, CartStore};

pub mod random_walk;
pub mod scripted;

/// One dispatched action and what the store made of it.
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub action: CartAction,
    pub result: Result<ActionOutcome, CartError>,
}

/// Everything an expectation can inspect after a scenario ran.
#[derive(Debug, Clone)]
pub struct ScenarioRun {
    pub store: CartStore,
    pub steps: Vec<StepRecord>,
}

impl ScenarioRun {
    #[must_use]
    pub fn new(store: CartStore) -> Self {
        Self {
            store,
            steps: Vec::new(),
        }
    }

    /// Dispatch an action and record the result, rejected or not.
    pub fn dispatch(&mut self, action: CartAction) {
        let result = self.store.apply(&action);
        self.steps.push(StepRecord { action, result });
    }

    #[must_use]
    pub fn last_step(&self) -> Option<&StepRecord> {
        self.steps.last()
    }

    #[must_use]
    pub fn rejected(&self) -> usize {
        self.steps.iter().filter(|step| step.result.is_err()).count()
    }
}

/// Assertion hook run after a scripted scenario completes.
type ExpectationFn = Arc<dyn Fn(&ScenarioRun) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct Expectation(ExpectationFn);

impl std::fmt::Debug for Expectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Expectation").finish()
    }
}

impl Expectation {
    #[must_use]
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&ScenarioRun) -> Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// # Errors
    ///
    /// Returns the expectation's failure message.
    pub fn check(&self, run: &ScenarioRun) -> Result<()> {
        (self.0)(run)
    }
}

impl<F> From<F> for Expectation
where
    F: Fn(&ScenarioRun) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

#[derive(Debug, Clone)]
pub enum ScenarioPlan {
    /// Fixed action list replayed once, then checked.
    Scripted {
        actions: Vec<CartAction>,
        expectations: Vec<Expectation>,
    },
    /// Seeded random actions with invariants checked after every step.
    RandomWalk { steps: usize },
}

#[derive(Debug, Clone)]
pub struct Scenario {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub plan: ScenarioPlan,
}

impl Scenario {
    #[must_use]
    pub fn scripted(
        key: &'static str,
        name: &'static str,
        description: &'static str,
        actions: Vec<CartAction>,
    ) -> Self {
        Self {
            key,
            name,
            description,
            plan: ScenarioPlan::Scripted {
                actions,
                expectations: Vec::new(),
            },
        }
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<Expectation>) -> Self {
        if let ScenarioPlan::Scripted { expectations, .. } = &mut self.plan {
            expectations.push(expectation.into());
        }
        self
    }
}

fn all_scenarios() -> Vec<Scenario> {
    let mut scenarios = scripted::scripted_scenarios();
    scenarios.push(random_walk::random_walk_scenario());
    scenarios.push(random_walk::long_walk_scenario());
    scenarios
}

#[must_use]
pub fn get_scenario(key: &str) -> Option<Scenario> {
    let key = key.to_lowercase();
    all_scenarios()
        .into_iter()
        .find(|scenario| scenario.key == key)
}

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    all_scenarios()
        .into_iter()
        .map(|scenario| (scenario.key, scenario.description))
        .collect()
}

/// Replace `all` with every registered scenario key.
#[must_use]
pub fn expand_scenarios(requested: &[String]) -> Vec<String> {
    let mut expanded: Vec<String> = Vec::new();
    for key in requested {
        if key.eq_ignore_ascii_case("all") {
            for (known, _) in list_scenarios() {
                if !expanded.iter().any(|k| k == known) {
                    expanded.push(known.to_string());
                }
            }
        } else if !expanded.contains(key) {
            expanded.push(key.clone());
        }
    }
    expanded
}
