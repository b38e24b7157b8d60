//! Battle resolution pipeline and its result type.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use twox_hash::XxHash64;

use crate::army::Army;
use crate::casualties::{CasualtyBreakdown, calculate_battle_casualties};
use crate::config::{BattleConfig, BattleConfigError, BattleLimits};
use crate::error::BattleError;
use crate::faction::FactionId;
use crate::narrative::{KeyMoments, generate_narrative, tactical_analysis};
use crate::numbers::floor_f64_to_u32;
use crate::registry::{RegistryLoader, TraitRegistry};
use crate::rng::BattleRng;
use crate::strength::{ArmyStrengthData, compute_strength};
use crate::terrain::Terrain;

/// Everything the presentation layer needs to show a finished battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleResult {
    pub winner: FactionId,
    pub casualties: BTreeMap<FactionId, CasualtyBreakdown>,
    pub battle_narrative: String,
    pub key_moments: KeyMoments,
    pub tactical_analysis: String,
    pub duration: String,
}

impl BattleResult {
    /// Stable hash of the serialized result, for replay comparison.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        XxHash64::oneshot(0, &bytes)
    }

    /// Casualties for one faction, if it took part.
    #[must_use]
    pub fn casualties_for(&self, faction: &FactionId) -> Option<&CasualtyBreakdown> {
        self.casualties.get(faction)
    }

    /// Sum of casualties across every faction.
    #[must_use]
    pub fn total_casualties(&self) -> i64 {
        self.casualties
            .values()
            .fold(0_i64, |acc, c| acc.saturating_add(c.total))
    }
}

/// Registry and balance configuration bound together for resolving battles.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleEngine {
    registry: TraitRegistry,
    cfg: BattleConfig,
}

impl Default for BattleEngine {
    fn default() -> Self {
        Self::new(TraitRegistry::default_registry().clone())
    }
}

impl BattleEngine {
    /// Engine over `registry` with the default balance configuration.
    #[must_use]
    pub fn new(registry: TraitRegistry) -> Self {
        Self {
            registry,
            cfg: BattleConfig::default(),
        }
    }

    /// Replace the balance configuration.
    ///
    /// # Errors
    ///
    /// Returns the first configuration invariant `cfg` violates.
    pub fn with_config(mut self, cfg: BattleConfig) -> Result<Self, BattleConfigError> {
        cfg.validate()?;
        self.cfg = cfg;
        Ok(self)
    }

    /// Build an engine from a registry source.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error.
    pub fn from_loader<L: RegistryLoader>(loader: &L) -> Result<Self, L::Error> {
        Ok(Self::new(loader.load_registry()?))
    }

    #[must_use]
    pub const fn registry(&self) -> &TraitRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn config(&self) -> &BattleConfig {
        &self.cfg
    }

    /// Validate every army and compute its strength against its paired opponent.
    ///
    /// Army 0 faces army 1; every other army faces army 0.
    ///
    /// # Errors
    ///
    /// Fails on a participant count outside the configured limits or on the
    /// first invalid army.
    pub fn assess(
        &self,
        armies: &[Army],
        terrain: Terrain,
    ) -> Result<Vec<ArmyStrengthData>, BattleError> {
        let limits = &self.cfg.limits;
        if armies.len() < limits.min_armies || armies.len() > limits.max_armies {
            return Err(BattleError::InvalidBattleSize {
                count: armies.len(),
                min: limits.min_armies,
                max: limits.max_armies,
            });
        }
        for army in armies {
            army.validate()?;
        }

        Ok(armies
            .iter()
            .enumerate()
            .map(|(index, army)| {
                let opponent = &armies[opponent_index(index)];
                compute_strength(army, terrain, opponent, &self.registry, &self.cfg)
            })
            .collect())
    }

    /// Resolve a battle drawing every random value from `rng`.
    ///
    /// Casualty rates are drawn first, one per army in input order, then the
    /// duration.
    ///
    /// # Errors
    ///
    /// See [`BattleEngine::assess`]. Nothing is drawn from `rng` on error.
    pub fn resolve<R>(
        &self,
        armies: &[Army],
        terrain: Terrain,
        rng: &mut R,
    ) -> Result<BattleResult, BattleError>
    where
        R: Rng + ?Sized,
    {
        let mut strengths = self.assess(armies, terrain)?;
        let winner = select_winner(&strengths);
        let casualties =
            calculate_battle_casualties(&mut strengths, winner, &self.cfg.casualties, rng);
        let hours = roll_duration_hours(rng, &self.cfg.limits);
        Ok(self.conclude(&strengths, winner, casualties, terrain, hours))
    }

    /// Resolve a battle reproducibly from a user-visible seed.
    ///
    /// # Errors
    ///
    /// See [`BattleEngine::assess`].
    pub fn resolve_seeded(
        &self,
        armies: &[Army],
        terrain: Terrain,
        seed: u64,
    ) -> Result<BattleResult, BattleError> {
        let mut strengths = self.assess(armies, terrain)?;
        let winner = select_winner(&strengths);
        let streams = BattleRng::from_user_seed(seed);
        let casualties = calculate_battle_casualties(
            &mut strengths,
            winner,
            &self.cfg.casualties,
            &mut *streams.casualty(),
        );
        let hours = roll_duration_hours(&mut *streams.duration(), &self.cfg.limits);
        Ok(self.conclude(&strengths, winner, casualties, terrain, hours))
    }

    fn conclude(
        &self,
        strengths: &[ArmyStrengthData],
        winner: usize,
        casualties: BTreeMap<FactionId, CasualtyBreakdown>,
        terrain: Terrain,
        hours: u32,
    ) -> BattleResult {
        let victor = &strengths[winner];
        let narrative = generate_narrative(strengths, terrain, self.cfg.tactical.open_field);
        BattleResult {
            winner: victor.army.faction.clone(),
            casualties,
            battle_narrative: narrative.text,
            key_moments: narrative.key_moments,
            tactical_analysis: tactical_analysis(victor, terrain, &self.registry),
            duration: format_duration(hours),
        }
    }
}

const fn opponent_index(index: usize) -> usize {
    if index == 0 { 1 } else { 0 }
}

/// Index of the strongest army; the earliest wins ties. Empty input yields 0.
#[must_use]
pub fn select_winner(strengths: &[ArmyStrengthData]) -> usize {
    let mut best = 0;
    for (index, data) in strengths.iter().enumerate().skip(1) {
        if data.strength > strengths[best].strength {
            best = index;
        }
    }
    if let Some(data) = strengths.get(best) {
        log::debug!("winner {} with strength {:.1}", data.army.faction, data.strength);
    }
    best
}

/// Whole hours drawn uniformly from the inclusive duration window.
pub fn roll_duration_hours<R>(rng: &mut R, limits: &BattleLimits) -> u32
where
    R: Rng + ?Sized,
{
    let min = limits.duration_min_hours;
    let max = limits.duration_max_hours.max(min);
    let span = f64::from(max - min) + 1.0;
    let unit: f64 = rng.r#gen();
    floor_f64_to_u32(unit * span).saturating_add(min).min(max)
}

#[must_use]
pub fn format_duration(hours: u32) -> String {
    format!("{hours} hours")
}

fn default_engine() -> &'static BattleEngine {
    static ENGINE: OnceLock<BattleEngine> = OnceLock::new();
    ENGINE.get_or_init(BattleEngine::default)
}

/// Resolve a battle with the embedded house registry and default balance.
///
/// # Errors
///
/// Returns [`BattleError::InvalidBattleSize`] for fewer than 2 or more than 6
/// armies and [`BattleError::InvalidArmy`] for the first army that fails
/// validation.
pub fn resolve_battle<R>(
    armies: &[Army],
    terrain: Terrain,
    rng: &mut R,
) -> Result<BattleResult, BattleError>
where
    R: Rng + ?Sized,
{
    default_engine().resolve(armies, terrain, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifiers::BattleModifiers;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rand::rngs::mock::StepRng;

    fn contest() -> Vec<Army> {
        vec![
            Army::new(FactionId::TYRELL, 20_000, 15_000, 5_000)
                .with_commander("Mace Tyrell")
                .with_ratios(0.9, 0.85, 0.9),
            Army::new(FactionId::STARK, 25_000, 5_000, 8_000)
                .with_commander("Robb Stark")
                .with_ratios(0.85, 0.9, 0.8),
        ]
    }

    fn scored(strength: f64) -> ArmyStrengthData {
        ArmyStrengthData {
            army: Army::new("Anyone", 1, 0, 0),
            strength,
            modifiers: BattleModifiers::neutral(),
            casualties: CasualtyBreakdown::default(),
        }
    }

    #[test]
    fn pairing_faces_first_army_with_second() {
        assert_eq!(opponent_index(0), 1);
        assert_eq!(opponent_index(1), 0);
        assert_eq!(opponent_index(5), 0);
    }

    #[test]
    fn third_army_is_assessed_against_the_first() {
        let armies = [
            Army::new(FactionId::STARK, 1_000, 0, 0),
            Army::new(FactionId::LANNISTER, 500, 500, 0),
            Army::new(FactionId::ARRYN, 700, 300, 0),
        ];
        let engine = BattleEngine::default();
        let strengths = engine.assess(&armies, Terrain::Plains).unwrap();
        assert_eq!(strengths.len(), 3);
        assert_eq!(strengths[0].modifiers.tactical_advantage, 0.0);
        assert!((strengths[1].modifiers.tactical_advantage - 0.15).abs() < 1e-12);
        assert!((strengths[2].modifiers.tactical_advantage - 0.15).abs() < 1e-12);

        // against the Lannister host the Arryn cavalry edge disappears
        let tactical = &engine.config().tactical;
        assert_eq!(
            crate::modifiers::tactical_advantage(&armies[2], &armies[1], Terrain::Plains, tactical),
            0.0
        );
    }

    #[test]
    fn strongest_army_wins_and_ties_go_first() {
        assert_eq!(select_winner(&[scored(1.0), scored(3.0), scored(2.0)]), 1);
        assert_eq!(select_winner(&[scored(2.0), scored(2.0)]), 0);
        assert_eq!(select_winner(&[]), 0);
    }

    #[test]
    fn duration_spans_the_inclusive_window() {
        let limits = BattleLimits::default();
        assert_eq!(roll_duration_hours(&mut StepRng::new(0, 0), &limits), 2);
        assert_eq!(roll_duration_hours(&mut StepRng::new(u64::MAX, 0), &limits), 8);

        let mut rng = SmallRng::seed_from_u64(3);
        let mut seen = [false; 7];
        for _ in 0..500 {
            let hours = roll_duration_hours(&mut rng, &limits);
            assert!((2..=8).contains(&hours));
            seen[(hours - 2) as usize] = true;
        }
        assert!(seen.iter().all(|hit| *hit));
        assert_eq!(format_duration(5), "5 hours");
    }

    #[test]
    fn tyrell_cavalry_carries_the_plains() {
        let mut rng = SmallRng::seed_from_u64(11);
        let result = resolve_battle(&contest(), Terrain::Plains, &mut rng).unwrap();
        assert_eq!(result.winner, FactionId::from(FactionId::TYRELL));
        assert_eq!(result.casualties.len(), 2);
        assert_eq!(result.key_moments.len(), 3);
        assert!(result.tactical_analysis.contains("favored"));
    }

    #[test]
    fn invalid_input_consumes_no_randomness() {
        let engine = BattleEngine::default();
        let mut rng = crate::rng::CountingRng::wrap(SmallRng::seed_from_u64(1));
        let lonely = [Army::new(FactionId::STARK, 10, 0, 0)];
        let err = engine.resolve(&lonely, Terrain::Plains, &mut rng).unwrap_err();
        assert!(err.is_invalid_battle_size());

        let empty = [
            Army::new(FactionId::STARK, 10, 0, 0),
            Army::new(FactionId::LANNISTER, 0, 0, 0),
        ];
        let err = engine.resolve(&empty, Terrain::Plains, &mut rng).unwrap_err();
        assert!(err.is_invalid_army());
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn seeded_resolution_replays() {
        let engine = BattleEngine::default();
        let first = engine.resolve_seeded(&contest(), Terrain::Forest, 2024).unwrap();
        let second = engine.resolve_seeded(&contest(), Terrain::Forest, 2024).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn custom_limits_change_accepted_sizes() {
        let cfg = BattleConfig::from_json(r#"{"limits": {"max_armies": 2}}"#).unwrap();
        let engine = BattleEngine::default().with_config(cfg).unwrap();
        let mut armies = contest();
        armies.push(Army::new(FactionId::ARRYN, 100, 0, 0));
        let err = engine.assess(&armies, Terrain::Plains).unwrap_err();
        assert_eq!(
            err,
            BattleError::InvalidBattleSize {
                count: 3,
                min: 2,
                max: 2
            }
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = BattleConfig::from_json(r#"{"casualties": {"winner": {"min": 0.5, "max": 0.1}}}"#)
            .unwrap();
        assert!(BattleEngine::default().with_config(cfg).is_err());
    }
}
