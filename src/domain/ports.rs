use async_trait::async_trait;
use std::time::Duration;

use crate::domain::action::{ActionOutcome, ApiResponse, BattleAction};
use crate::domain::battle::{BattleState, CardInDeck, Team};
use crate::domain::errors::{ApiError, BattleError};
use crate::domain::log::BattleLogEntry;

pub type LogResponse = ApiResponse<Vec<BattleLogEntry>>;

// Port for the remote, server-authoritative battle engine.
// Use cases depend on this trait, not on the reqwest client.
#[async_trait]
pub trait BattleApi: Send + Sync {
    async fn get_battle_state(
        &self,
        battle_id: &str,
    ) -> Result<ApiResponse<BattleState>, ApiError>;

    async fn draw_cards(
        &self,
        battle_id: &str,
        action: BattleAction,
    ) -> Result<LogResponse, ApiError>;

    // Used for both play_card and discard_card, told apart by `action.action_type`.
    async fn play_action(
        &self,
        battle_id: &str,
        action: BattleAction,
    ) -> Result<LogResponse, ApiError>;

    // Advances the battle to the next turn. The server resolves the opponent's turn on the
    // same call, so this both ends the local player's turn and drives the AI.
    async fn start_turn(&self, battle_id: &str) -> Result<LogResponse, ApiError>;
}

// Port for the presentation layer that plays battle animations.
#[async_trait]
pub trait Animator: Send + Sync {
    async fn show_turn_message(&self, text: &str);
    async fn animate_card_battle_log_entry(&self, entry: &BattleLogEntry);
    // User-visible error notice for failed actions.
    async fn show_error(&self, message: &str);
}

// Port for fixed pacing delays between animations.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, duration: Duration);
}

// Port the drag and drop layer dispatches resolved drops into.
#[async_trait]
pub trait CardActions: Send {
    async fn play_card_on_character(
        &mut self,
        card: &CardInDeck,
        target_team: Team,
        character_index: usize,
    ) -> Result<ActionOutcome, BattleError>;

    async fn discard_card(&mut self, card: &CardInDeck) -> Result<ActionOutcome, BattleError>;
}
