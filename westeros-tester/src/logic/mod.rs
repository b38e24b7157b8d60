pub mod catalog;
pub mod reports;
pub mod seeds;
pub mod tester;

pub use catalog::{BattlePlan, catalog_scenarios, find_scenario, list_scenarios};
pub use seeds::resolve_seed_inputs;
pub use tester::*;
