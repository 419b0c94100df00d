// Headless presentation adapters: battle animations rendered as structured log lines, and
// pacing delays backed by the tokio timer.

use crate::domain::{Animator, BattleLogEntry, Pacer};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct TracingAnimator;

#[async_trait]
impl Animator for TracingAnimator {
    async fn show_turn_message(&self, text: &str) {
        info!(text, "turn message");
    }

    async fn animate_card_battle_log_entry(&self, entry: &BattleLogEntry) {
        let card = entry.card.as_ref().map(|card| card.name.as_str());
        for target in &entry.targets {
            for impact in &target.impacts {
                info!(
                    action = %entry.action_type,
                    card,
                    target = %target.target_id,
                    kind = ?impact.kind,
                    value = impact.value,
                    critical = impact.is_critical(),
                    "battle log impact"
                );
            }
        }
        if entry.targets.is_empty() {
            info!(action = %entry.action_type, card, "battle log entry");
        }
    }

    async fn show_error(&self, message: &str) {
        warn!(notice = message, "action failed");
    }
}

#[derive(Debug, Clone, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}
