use anyhow::{Result, ensure};
use std::sync::Arc;

use westeros_battle::{Army, BattleResult, FactionId, Terrain, TraitRegistry};

/// A resolved battle handed to scenario expectations.
#[derive(Debug, Clone)]
pub struct BattleOutcome {
    pub seed: u64,
    pub armies: Vec<Army>,
    pub terrain: Terrain,
    pub result: BattleResult,
}

type BattleExpectationFn = Arc<dyn Fn(&BattleOutcome) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct BattleExpectation(BattleExpectationFn);

impl BattleExpectation {
    pub fn check(&self, outcome: &BattleOutcome) -> Result<()> {
        (self.0)(outcome)
    }
}

impl<F> From<F> for BattleExpectation
where
    F: Fn(&BattleOutcome) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// Armies, terrain and expectations for one named battle.
#[derive(Clone)]
pub struct BattlePlan {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub terrain: Terrain,
    pub armies: Vec<Army>,
    pub expectations: Vec<BattleExpectation>,
}

impl BattlePlan {
    fn new(
        key: &'static str,
        name: &'static str,
        description: &'static str,
        terrain: Terrain,
        armies: Vec<Army>,
    ) -> Self {
        Self {
            key,
            name,
            description,
            terrain,
            armies,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_expectation<E>(mut self, expectation: E) -> Self
    where
        E: Into<BattleExpectation>,
    {
        self.expectations.push(expectation.into());
        self
    }
}

pub fn catalog_scenarios() -> Vec<BattlePlan> {
    vec![
        BattlePlan::new(
            "tyrell-vs-stark",
            "Tyrell Host vs Stark Host",
            "Heavy cavalry on open ground against a smaller northern army",
            Terrain::Plains,
            vec![
                Army::new(FactionId::TYRELL, 50_000, 20_000, 10_000)
                    .with_commander("Mace Tyrell")
                    .with_ratios(0.9, 0.85, 0.9),
                Army::new(FactionId::STARK, 30_000, 8_000, 7_000)
                    .with_commander("Robb Stark")
                    .with_ratios(0.85, 0.9, 0.8),
            ],
        )
        .with_expectation(winner_is(FactionId::TYRELL))
        .with_expectation(terrain_clause("favored"))
        .with_expectation(|outcome: &BattleOutcome| -> Result<()> {
            ensure!(
                outcome.result.battle_narrative.contains("devastating force"),
                "open-field charge should be devastating"
            );
            Ok(())
        }),
        BattlePlan::new(
            "mirror-match",
            "Mirror Match of Strangers",
            "Identical unregistered armies; the first listed must win",
            Terrain::Forest,
            vec![
                Army::new("Brotherhood Without Banners", 4_000, 500, 1_500),
                Army::new("Faceless Men", 4_000, 500, 1_500),
            ],
        )
        .with_expectation(winner_is("Brotherhood Without Banners"))
        .with_expectation(|outcome: &BattleOutcome| -> Result<()> {
            ensure!(
                outcome.result.tactical_analysis
                    == "Victory achieved through superior tactics and battlefield coordination.",
                "unregistered winner should get the generic analysis"
            );
            Ok(())
        }),
        BattlePlan::new(
            "mountain-pass",
            "Stark Holds the Mountain Pass",
            "Northern infantry defends high ground against Lannister regulars",
            Terrain::Mountains,
            vec![
                Army::new(FactionId::STARK, 20_000, 2_000, 4_000).with_terrain(Terrain::Mountains),
                Army::new(FactionId::LANNISTER, 18_000, 3_000, 3_000),
            ],
        )
        .with_expectation(winner_is(FactionId::STARK))
        .with_expectation(|outcome: &BattleOutcome| -> Result<()> {
            ensure!(
                outcome.result.key_moments.get(1).map(String::as_str)
                    == Some("Cavalry charges are hampered by the mountains terrain"),
                "cavalry should be hampered in the mountains"
            );
            Ok(())
        }),
        BattlePlan::new(
            "desert-raid",
            "Martell Desert Raid",
            "Dornish skirmishers and archers against Baratheon knights in the sands",
            Terrain::Desert,
            vec![
                Army::new(FactionId::MARTELL, 12_000, 6_000, 4_000)
                    .with_commander("Oberyn Martell")
                    .with_ratios(0.95, 0.75, 0.7),
                baseline_army(FactionId::BARATHEON, 15_000, 5_000, 2_000),
            ],
        )
        .with_expectation(winner_is(FactionId::MARTELL))
        .with_expectation(terrain_clause("favored")),
        BattlePlan::new(
            "six-house-melee",
            "Great Houses Melee",
            "All six Great Houses take the field on the riverlands at once",
            Terrain::Riverlands,
            FactionId::GREAT_HOUSES
                .iter()
                .zip([
                    (14_000, 3_000, 4_000),
                    (16_000, 4_000, 5_000),
                    (10_000, 9_000, 2_000),
                    (12_000, 5_000, 3_000),
                    (9_000, 4_000, 6_000),
                    (11_000, 2_000, 7_000),
                ])
                .map(|(house, (inf, cav, arch))| baseline_army(house, inf, cav, arch))
                .collect(),
        )
        .with_expectation(|outcome: &BattleOutcome| -> Result<()> {
            ensure!(
                outcome.result.casualties.len() == FactionId::GREAT_HOUSES.len(),
                "every house should report casualties"
            );
            Ok(())
        }),
    ]
}

pub fn find_scenario(key: &str) -> Option<BattlePlan> {
    catalog_scenarios()
        .into_iter()
        .find(|plan| plan.key == key || plan.name.eq_ignore_ascii_case(key))
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    catalog_scenarios()
        .iter()
        .map(|plan| (plan.key, plan.description))
        .collect()
}

fn baseline_army(house: &str, infantry: i64, cavalry: i64, archers: i64) -> Army {
    let faction = FactionId::from(house);
    match TraitRegistry::default_registry().lookup(&faction) {
        Some(traits) => Army::from_baseline(faction, traits, infantry, cavalry, archers),
        None => Army::new(faction, infantry, cavalry, archers),
    }
}

fn winner_is(house: &'static str) -> impl Fn(&BattleOutcome) -> Result<()> + Send + Sync {
    move |outcome: &BattleOutcome| {
        ensure!(
            outcome.result.winner.as_str() == house,
            "expected {house} to win, got {}",
            outcome.result.winner
        );
        Ok(())
    }
}

fn terrain_clause(effect: &'static str) -> impl Fn(&BattleOutcome) -> Result<()> + Send + Sync {
    move |outcome: &BattleOutcome| {
        let clause = format!("The {} terrain {effect} their tactics", outcome.terrain);
        ensure!(
            outcome.result.tactical_analysis.contains(&clause),
            "tactical analysis should say '{clause}'"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_keys_are_unique() {
        let plans = catalog_scenarios();
        let mut keys: Vec<&str> = plans.iter().map(|p| p.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), plans.len());
    }

    #[test]
    fn every_plan_has_a_valid_field() {
        for plan in catalog_scenarios() {
            assert!((2..=6).contains(&plan.armies.len()), "{}", plan.key);
            for army in &plan.armies {
                assert!(army.validate().is_ok(), "{} {}", plan.key, army.faction);
            }
            assert!(!plan.expectations.is_empty());
        }
    }

    #[test]
    fn finds_by_key_or_name() {
        assert!(find_scenario("desert-raid").is_some());
        assert!(find_scenario("martell desert raid").is_some());
        assert!(find_scenario("winter-is-coming").is_none());
        assert_eq!(list_scenarios().len(), catalog_scenarios().len());
    }
}
