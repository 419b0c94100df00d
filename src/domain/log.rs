// Server-reported battle log entries. Consumed read-only for animation replay.

use crate::domain::battle::{Card, Team};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactKind {
    Damage,
    Heal,
    Effect,
    Status,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactMeta {
    #[serde(rename = "isCritical", default)]
    pub is_critical: bool,
    // Anything else the server attaches (status names, durations, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Impact {
    #[serde(rename = "type")]
    pub kind: ImpactKind,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub meta: Option<ImpactMeta>,
}

impl Impact {
    pub fn is_critical(&self) -> bool {
        self.meta.as_ref().is_some_and(|meta| meta.is_critical)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardBattleLogTarget {
    pub target_id: String,
    #[serde(default)]
    pub target_team: Option<Team>,
    #[serde(default)]
    pub impacts: Vec<Impact>,
}

/// One resolved action as reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleLogEntry {
    #[serde(default)]
    pub action_type: String,
    #[serde(default)]
    pub actor_team: Option<Team>,
    #[serde(default)]
    pub card: Option<Card>,
    #[serde(default)]
    pub targets: Vec<CardBattleLogTarget>,
}
