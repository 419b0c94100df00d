// Action payloads sent to the battle API and the response envelope it returns.

use crate::domain::battle::Team;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    DrawCard,
    PlayCard,
    DiscardCard,
}

/// Player intent as sent to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleAction {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub player_team: Team,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_ids: Option<Vec<String>>,
}

impl BattleAction {
    pub fn draw(team: Team) -> Self {
        Self {
            action_type: ActionType::DrawCard,
            player_team: team,
            card_id: None,
            target_ids: None,
        }
    }

    pub fn play(team: Team, card_id: impl Into<String>, target_ids: Vec<String>) -> Self {
        Self {
            action_type: ActionType::PlayCard,
            player_team: team,
            card_id: Some(card_id.into()),
            target_ids: Some(target_ids),
        }
    }

    pub fn discard(team: Team, card_id: impl Into<String>) -> Self {
        Self {
            action_type: ActionType::DiscardCard,
            player_team: team,
            card_id: Some(card_id.into()),
            target_ids: None,
        }
    }
}

/// Envelope wrapping every battle API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    // Missing `data` decodes as None without requiring `T: Default`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            code: None,
            errors: Vec::new(),
        }
    }

    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            code: Some(code.into()),
            errors: Vec::new(),
        }
    }
}

// Why a guarded action was skipped without calling the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NotPlayerTurn,
    InsufficientEnergy,
    UnknownTarget,
}

/// Result of a guarded battle action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    // Server accepted the action and the log was replayed.
    Applied,
    // Guard failed; no request was sent and no state changed.
    Ignored(IgnoreReason),
    // Server answered with `success: false`.
    Rejected {
        code: Option<String>,
        message: Option<String>,
    },
}

impl ActionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ActionOutcome::Applied)
    }
}
