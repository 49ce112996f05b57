use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

use confplan_engine::{CartAction, CartStore, Catalog};

use crate::scenario::random_walk::walk;
use crate::scenario::{Expectation, Scenario, ScenarioPlan, ScenarioRun};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: Option<u64>,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

pub struct ScenarioRunner {
    catalog: Arc<Catalog>,
    verbose: bool,
}

impl ScenarioRunner {
    pub const fn new(catalog: Arc<Catalog>, verbose: bool) -> Self {
        Self { catalog, verbose }
    }

    /// Run a scenario. Scripted scenarios run once; random walks run
    /// `iterations` times per seed.
    pub fn run(&self, scenario: &Scenario, seeds: &[u64], iterations: usize) -> Vec<ScenarioResult> {
        match &scenario.plan {
            ScenarioPlan::Scripted {
                actions,
                expectations,
            } => vec![self.run_scripted(scenario, actions, expectations)],
            ScenarioPlan::RandomWalk { steps } => seeds
                .iter()
                .map(|&seed| self.run_walk(scenario, seed, iterations, *steps))
                .collect(),
        }
    }

    /// Replay an action script against a fresh cart, recording rejections.
    pub fn replay(&self, actions: &[CartAction]) -> ScenarioRun {
        let mut run = ScenarioRun::new(CartStore::new(Arc::clone(&self.catalog)));
        for action in actions {
            run.dispatch(action.clone());
        }
        run
    }

    fn run_scripted(
        &self,
        scenario: &Scenario,
        actions: &[CartAction],
        expectations: &[Expectation],
    ) -> ScenarioResult {
        if self.verbose {
            println!("🧪 Running scenario: {}", scenario.name.bright_white());
        }
        let start = Instant::now();
        let run = self.replay(actions);
        let failures: Vec<String> = expectations
            .iter()
            .filter_map(|expectation| expectation.check(&run).err())
            .map(|err| format!("{err:#}"))
            .collect();
        let duration = start.elapsed();

        if self.verbose {
            report_iteration(1, 1, failures.first().map(String::as_str), duration);
        }

        let passed = failures.is_empty();
        ScenarioResult {
            scenario_name: scenario.name.to_string(),
            seed: None,
            passed,
            iterations_run: 1,
            successful_iterations: usize::from(passed),
            failures,
            average_duration: duration,
            performance_data: vec![duration],
        }
    }

    fn run_walk(
        &self,
        scenario: &Scenario,
        seed: u64,
        iterations: usize,
        steps: usize,
    ) -> ScenarioResult {
        if self.verbose {
            println!(
                "🧪 Running scenario: {} (seed: {seed}, steps: {steps})",
                scenario.name.bright_white()
            );
        }

        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();

        for i in 0..iterations {
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));
            let start_time = Instant::now();
            let outcome = walk(&self.catalog, iteration_seed, steps);
            let duration = start_time.elapsed();

            match outcome {
                Ok(_) => {
                    successes += 1;
                    performance_data.push(duration);
                    if self.verbose {
                        report_iteration(i + 1, iterations, None, duration);
                    }
                }
                Err(err) => {
                    let message = format!("Iteration {} (seed {iteration_seed}): {err:#}", i + 1);
                    if self.verbose {
                        report_iteration(i + 1, iterations, Some(&message), duration);
                    }
                    failures.push(message);
                }
            }
        }

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.to_string(),
            seed: Some(seed),
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
            performance_data,
        }
    }
}

fn report_iteration(current: usize, total: usize, failure: Option<&str>, duration: Duration) {
    match failure {
        None => println!("  ✅ Iteration {current}/{total} passed ({duration:?})"),
        Some(message) => println!(
            "  ❌ Iteration {current}/{total} failed: {}",
            message.red()
        ),
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_micros().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = u128::deserialize(deserializer)?;
        Ok(Duration::from_micros(u64::try_from(micros).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let micros: Vec<u128> = durations.iter().map(Duration::as_micros).collect();
        micros.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = Vec::<u128>::deserialize(deserializer)?;
        Ok(micros
            .into_iter()
            .map(|m| Duration::from_micros(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}
