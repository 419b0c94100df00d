pub mod battle_api;

pub use battle_api::BattleApiClient;
