//! Phase-by-phase battle narrative and post-battle analysis.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::army::{Army, UnitType};
use crate::constants::FALLBACK_TACTICAL_ANALYSIS;
use crate::registry::TraitRegistry;
use crate::strength::ArmyStrengthData;
use crate::terrain::Terrain;

/// Key moments, one per phase.
pub type KeyMoments = SmallVec<[String; 3]>;

/// Fixed order in which every battle unfolds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattlePhase {
    Archery,
    CavalryCharge,
    InfantryMelee,
}

impl BattlePhase {
    pub const ORDER: [Self; 3] = [Self::Archery, Self::CavalryCharge, Self::InfantryMelee];

    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Archery => 1,
            Self::CavalryCharge => 2,
            Self::InfantryMelee => 3,
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Archery => "The Archery Duel",
            Self::CavalryCharge => "The Cavalry Charge",
            Self::InfantryMelee => "The Infantry Melee",
        }
    }

    /// Unit type whose largest contingent leads this phase.
    #[must_use]
    pub const fn lead_unit(self) -> UnitType {
        match self {
            Self::Archery => UnitType::Archers,
            Self::CavalryCharge => UnitType::Cavalry,
            Self::InfantryMelee => UnitType::Infantry,
        }
    }
}

impl fmt::Display for BattlePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "**Phase {}: {}**", self.number(), self.title())
    }
}

/// Rendered narrative plus its key moments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narrative {
    pub text: String,
    pub key_moments: KeyMoments,
}

/// Army with the most troops of `unit`; the latest listed wins ties.
#[must_use]
pub fn phase_leader(strengths: &[ArmyStrengthData], unit: UnitType) -> Option<&Army> {
    let mut leader: Option<&Army> = None;
    for data in strengths {
        match leader {
            Some(current) if current.count(unit) > data.army.count(unit) => {}
            _ => leader = Some(&data.army),
        }
    }
    leader
}

/// Narrate the three phases in order.
///
/// Phase leaders are chosen by raw troop counts, independent of the winner.
#[must_use]
pub fn generate_narrative(
    strengths: &[ArmyStrengthData],
    terrain: Terrain,
    open_field: Terrain,
) -> Narrative {
    let mut paragraphs: Vec<String> = Vec::with_capacity(BattlePhase::ORDER.len() * 2);
    let mut key_moments = KeyMoments::new();

    for phase in BattlePhase::ORDER {
        let Some(leader) = phase_leader(strengths, phase.lead_unit()) else {
            continue;
        };
        let house = &leader.faction;
        paragraphs.push(phase.to_string());
        let (sentence, moment) = match phase {
            BattlePhase::Archery => (
                format!(
                    "The battle begins with volleys of arrows darkening the sky. \
                     {house} archers loose coordinated salvos, \
                     forcing enemy formations to raise shields and advance under cover."
                ),
                format!("{house} gains early advantage with superior archery"),
            ),
            BattlePhase::CavalryCharge if terrain == open_field => (
                format!(
                    "Thunder of hooves shakes the earth as {house} cavalry \
                     charges across the open field. Their heavy horse smashes into enemy lines \
                     with devastating force, splintering formations and spreading chaos."
                ),
                format!("{house} cavalry charges devastate enemy lines on the open field"),
            ),
            BattlePhase::CavalryCharge => (
                format!(
                    "The {terrain} terrain hampers cavalry movements. Horses struggle with \
                     footing and obstacles, limiting the effectiveness of mounted charges."
                ),
                format!("Cavalry charges are hampered by the {terrain} terrain"),
            ),
            BattlePhase::InfantryMelee => (
                format!(
                    "Steel rings against steel as infantry formations clash in brutal melee. \
                     {house} soldiers maintain disciplined ranks, \
                     their training evident as they push forward through the carnage."
                ),
                format!("{house} infantry holds the center in brutal melee combat"),
            ),
        };
        paragraphs.push(sentence);
        key_moments.push(moment);
    }

    Narrative {
        text: paragraphs.join("\n\n"),
        key_moments,
    }
}

/// One-paragraph analysis of why the winner prevailed.
#[must_use]
pub fn tactical_analysis(
    winner: &ArmyStrengthData,
    terrain: Terrain,
    registry: &TraitRegistry,
) -> String {
    let Some(traits) = registry.lookup(&winner.army.faction) else {
        return FALLBACK_TACTICAL_ANALYSIS.to_string();
    };

    let (effect, consequence) = if winner.modifiers.terrain_advantage > 0.0 {
        ("favored", "amplifying")
    } else {
        ("hindered", "limiting")
    };
    format!(
        "Victory achieved through {}. {} The {terrain} terrain {effect} their tactics, \
         {consequence} their natural advantages.",
        traits.specialty.to_lowercase(),
        traits.description
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::casualties::CasualtyBreakdown;
    use crate::faction::FactionId;
    use crate::modifiers::BattleModifiers;

    fn data(army: Army, terrain_advantage: f64) -> ArmyStrengthData {
        ArmyStrengthData {
            army,
            strength: 1.0,
            modifiers: BattleModifiers {
                terrain_advantage,
                ..BattleModifiers::neutral()
            },
            casualties: CasualtyBreakdown::default(),
        }
    }

    fn field() -> Vec<ArmyStrengthData> {
        vec![
            data(Army::new(FactionId::STARK, 30_000, 8_000, 7_000), 0.0),
            data(Army::new(FactionId::TYRELL, 20_000, 20_000, 2_000), 0.25),
            data(Army::new(FactionId::ARRYN, 10_000, 1_000, 9_000), 0.0),
        ]
    }

    #[test]
    fn phases_are_led_by_largest_contingents() {
        let narrative = generate_narrative(&field(), Terrain::Plains, Terrain::Plains);
        assert_eq!(
            narrative.key_moments.as_slice(),
            [
                "House Arryn gains early advantage with superior archery".to_string(),
                "House Tyrell cavalry charges devastate enemy lines on the open field".to_string(),
                "House Stark infantry holds the center in brutal melee combat".to_string(),
            ]
        );
    }

    #[test]
    fn phase_headers_appear_in_order() {
        let narrative = generate_narrative(&field(), Terrain::Plains, Terrain::Plains);
        let archery = narrative.text.find("**Phase 1: The Archery Duel**").unwrap();
        let cavalry = narrative.text.find("**Phase 2: The Cavalry Charge**").unwrap();
        let melee = narrative.text.find("**Phase 3: The Infantry Melee**").unwrap();
        assert!(archery < cavalry && cavalry < melee);
        assert_eq!(narrative.text.split("\n\n").count(), 6);
    }

    #[test]
    fn rough_terrain_hampers_the_charge() {
        let narrative = generate_narrative(&field(), Terrain::Forest, Terrain::Plains);
        assert_eq!(
            narrative.key_moments[1],
            "Cavalry charges are hampered by the forest terrain"
        );
        assert!(narrative.text.contains("The forest terrain hampers cavalry movements."));
        assert!(!narrative.text.contains("devastating"));
    }

    #[test]
    fn phase_ties_go_to_the_latest_army() {
        let strengths = vec![
            data(Army::new("First", 100, 50, 10), 0.0),
            data(Army::new("Second", 100, 50, 10), 0.0),
        ];
        for unit in UnitType::ALL {
            let leader = phase_leader(&strengths, unit).unwrap();
            assert_eq!(leader.faction.as_str(), "Second");
        }
        assert!(phase_leader(&[], UnitType::Cavalry).is_none());

        let narrative = generate_narrative(&strengths, Terrain::Plains, Terrain::Plains);
        assert_eq!(
            narrative.key_moments.as_slice(),
            [
                "Second gains early advantage with superior archery".to_string(),
                "Second cavalry charges devastate enemy lines on the open field".to_string(),
                "Second infantry holds the center in brutal melee combat".to_string(),
            ]
        );
    }

    #[test]
    fn strictly_larger_earlier_contingent_keeps_the_lead() {
        let strengths = vec![
            data(Army::new("First", 200, 50, 10), 0.0),
            data(Army::new("Second", 100, 50, 10), 0.0),
        ];
        let leader = phase_leader(&strengths, UnitType::Infantry).unwrap();
        assert_eq!(leader.faction.as_str(), "First");
    }

    #[test]
    fn analysis_reflects_terrain_advantage() {
        let registry = TraitRegistry::default_registry();
        let strengths = field();
        let favored = tactical_analysis(&strengths[1], Terrain::Plains, registry);
        assert_eq!(
            favored,
            "Victory achieved through heavy cavalry. The finest heavy cavalry in Westeros, \
             devastating on open ground The plains terrain favored their tactics, \
             amplifying their natural advantages."
        );

        let hindered = tactical_analysis(&strengths[0], Terrain::Desert, registry);
        assert!(hindered.starts_with("Victory achieved through heavy infantry."));
        assert!(hindered.contains("The desert terrain hindered their tactics, limiting"));
    }

    #[test]
    fn unregistered_winner_gets_generic_analysis() {
        let winner = data(Army::new("Golden Company", 10, 0, 0), 0.0);
        let text = tactical_analysis(&winner, Terrain::Plains, TraitRegistry::default_registry());
        assert_eq!(text, FALLBACK_TACTICAL_ANALYSIS);
    }
}
