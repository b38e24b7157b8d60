use anyhow::{Context, Result, ensure};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use westeros_battle::{BattleEngine, UnitType};

use crate::logic::catalog::{BattleOutcome, BattlePlan};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    pub winners: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

pub struct BattleTester {
    engine: BattleEngine,
    verbose: bool,
}

impl BattleTester {
    pub const fn new(engine: BattleEngine, verbose: bool) -> Self {
        Self { engine, verbose }
    }

    pub fn run_scenario(
        &self,
        plan: &BattlePlan,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::new();

        for &seed in seeds {
            if self.verbose {
                println!(
                    "🧪 Testing scenario: {} (terrain: {} seed: {})",
                    plan.name.bright_white(),
                    plan.terrain,
                    seed
                );
            }

            results.push(self.run_single_scenario(plan, seed, iterations));
        }

        results
    }

    fn run_single_scenario(&self, plan: &BattlePlan, seed: u64, iterations: usize) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut winners: Vec<String> = Vec::new();
        let mut performance_data = Vec::new();

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));

            match self.run_iteration(plan, iteration_seed) {
                Ok(outcome) => {
                    successes += 1;
                    let duration = start_time.elapsed();
                    performance_data.push(duration);
                    let winner = outcome.result.winner.to_string();
                    if !winners.contains(&winner) {
                        winners.push(winner);
                    }

                    if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{} passed ({duration:?}) winner:{} duration:{}",
                            i + 1,
                            iterations,
                            outcome.result.winner,
                            outcome.result.duration
                        );
                    }
                }
                Err(err) => {
                    failures.push(format!(
                        "Iteration {} (seed {}, terrain {}): {err:#}",
                        i + 1,
                        iteration_seed,
                        plan.terrain
                    ));

                    if self.verbose {
                        println!(
                            "  ❌ Iteration {}/{} failed: {}",
                            i + 1,
                            iterations,
                            format!("{err:#}").red()
                        );
                    }
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
            scenario_name: plan.name.to_string(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            winners,
            average_duration,
            performance_data,
        }
    }

    fn run_iteration(&self, plan: &BattlePlan, seed: u64) -> Result<BattleOutcome> {
        let result = self
            .engine
            .resolve_seeded(&plan.armies, plan.terrain, seed)
            .with_context(|| format!("resolving {}", plan.key))?;
        let outcome = BattleOutcome {
            seed,
            armies: plan.armies.clone(),
            terrain: plan.terrain,
            result,
        };

        check_invariants(&outcome, &self.engine)?;

        let replay = self
            .engine
            .resolve_seeded(&plan.armies, plan.terrain, seed)
            .context("replaying battle")?;
        ensure!(
            replay.fingerprint() == outcome.result.fingerprint(),
            "replay of seed {seed} diverged ({:016x} vs {:016x})",
            replay.fingerprint(),
            outcome.result.fingerprint()
        );

        for expectation in &plan.expectations {
            expectation.check(&outcome)?;
        }

        Ok(outcome)
    }
}

/// Structural checks every resolved battle must satisfy.
pub fn check_invariants(outcome: &BattleOutcome, engine: &BattleEngine) -> Result<()> {
    let result = &outcome.result;
    ensure!(
        outcome.armies.iter().any(|a| a.faction == result.winner),
        "winner {} did not take part",
        result.winner
    );

    for army in &outcome.armies {
        let losses = result
            .casualties_for(&army.faction)
            .with_context(|| format!("missing casualties for {}", army.faction))?;
        ensure!(
            losses.total == losses.infantry + losses.cavalry + losses.archers,
            "{} casualty total {} does not match its units",
            army.faction,
            losses.total
        );
        for unit in UnitType::ALL {
            let lost = losses.get(unit);
            ensure!(lost >= 0, "{} lost a negative number of {unit}", army.faction);
            let fielded: i64 = outcome
                .armies
                .iter()
                .filter(|a| a.faction == army.faction)
                .map(|a| a.count(unit))
                .sum();
            ensure!(
                lost <= fielded,
                "{} lost {lost} {unit} but fielded {fielded}",
                army.faction
            );
        }
    }

    ensure!(
        result.key_moments.len() == 3,
        "expected three key moments, got {}",
        result.key_moments.len()
    );

    let limits = engine.config().limits;
    let hours: u32 = result
        .duration
        .strip_suffix(" hours")
        .and_then(|n| n.parse().ok())
        .with_context(|| format!("malformed duration '{}'", result.duration))?;
    ensure!(
        (limits.duration_min_hours..=limits.duration_max_hours).contains(&hours),
        "duration {hours} outside {}..={}",
        limits.duration_min_hours,
        limits.duration_max_hours
    );

    Ok(())
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis_vec = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis_vec
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}
