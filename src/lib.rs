pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use frameworks::config::ClientConfig;
pub use frameworks::runner::{BattleReport, play_battle, run, run_with_config};
