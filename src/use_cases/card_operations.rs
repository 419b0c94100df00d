// Sequences one battle action end to end: guard, call the battle API, replay the returned log,
// then mirror the confirmed result locally until the next resync.

use crate::domain::{
    ActionOutcome, Animator, ApiError, ApiResponse, BattleAction, BattleApi, BattleError,
    BattleLogEntry, CardActions, CardInDeck, IgnoreReason, LogResponse, Pacer, Team,
};
use crate::use_cases::player_state::PlayerStateManager;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

const BATTLE_START_MESSAGE: &str = "Battle Start!";
const PLAYER_TURN_MESSAGE: &str = "Your Turn";
const AI_THINKING_MESSAGE: &str = "Opponent is thinking...";
const VICTORY_MESSAGE: &str = "Victory!";
const DEFEAT_MESSAGE: &str = "Defeat";

// The local player always controls team one.
const LOCAL_TEAM: Team = Team::One;

/// Per-battle configuration for the operations manager.
#[derive(Debug, Clone)]
pub struct OperationSettings {
    /// Battle the manager issues actions against.
    pub battle_id: String,
    /// Pause after each replayed log entry so effects do not overlap.
    pub log_entry_delay: Duration,
    /// Pause after the opponent's turn resolves.
    pub ai_thinking_delay: Duration,
}

/// Where the battle stands after `start_player_turn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    // Local player has drawn and may now play cards.
    PlayerTurn,
    // Opponent's turn was resolved but the server still reports it as theirs.
    OpponentTurn,
    BattleOver { player_won: bool },
}

pub struct CardOperationsManager<A, N, P> {
    api: A,
    animator: N,
    pacer: P,
    settings: OperationSettings,
    state: PlayerStateManager,
}

impl<A, N, P> CardOperationsManager<A, N, P>
where
    A: BattleApi,
    N: Animator,
    P: Pacer,
{
    pub fn new(api: A, animator: N, pacer: P, settings: OperationSettings) -> Self {
        Self {
            api,
            animator,
            pacer,
            settings,
            state: PlayerStateManager::new(),
        }
    }

    pub fn state(&self) -> &PlayerStateManager {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut PlayerStateManager {
        &mut self.state
    }

    pub fn settings(&self) -> &OperationSettings {
        &self.settings
    }

    /// Fetches the authoritative snapshot and replaces the local mirror with it.
    #[instrument(
        name = "sync_battle_state",
        skip_all,
        fields(battle_id = %self.settings.battle_id)
    )]
    pub async fn sync_battle_state(&mut self) -> Result<(), BattleError> {
        let response = self
            .api
            .get_battle_state(&self.settings.battle_id)
            .await
            .inspect_err(|err| error!(error = %err, "failed to fetch battle state"))?;

        match response {
            ApiResponse {
                success: true,
                data: Some(state),
                ..
            } => {
                self.state.set_battle_state(Some(state));
                Ok(())
            }
            rejected => {
                warn!(
                    code = ?rejected.code,
                    reason = ?rejected.message,
                    "battle state sync rejected"
                );
                Err(BattleError::SyncRejected {
                    code: rejected.code,
                    message: rejected.message,
                })
            }
        }
    }

    #[instrument(name = "draw_cards", skip_all, fields(battle_id = %self.settings.battle_id))]
    pub async fn draw_cards(&mut self) -> Result<ActionOutcome, BattleError> {
        let team = self.state.current_player();
        let action = BattleAction::draw(team);

        let response = match self.api.draw_cards(&self.settings.battle_id, action).await {
            Ok(response) => response,
            Err(err) => return Err(self.surface_transport_error("draw cards", err).await),
        };

        Ok(self.process_card_battle_api_response(response).await)
    }

    #[instrument(
        name = "play_card",
        skip_all,
        fields(
            card_id = %card.card_id,
            target_team = %target_team,
            character_index = character_index
        )
    )]
    pub async fn play_card_on_character(
        &mut self,
        card: &CardInDeck,
        target_team: Team,
        character_index: usize,
    ) -> Result<ActionOutcome, BattleError> {
        if let Some(reason) = self.turn_guard() {
            return Ok(ActionOutcome::Ignored(reason));
        }
        if !self.state.can_play_card(LOCAL_TEAM, &card.card) {
            info!(
                cost = card.card.energy_cost,
                energy = self.state.player_energy(LOCAL_TEAM),
                "not enough energy; ignoring play"
            );
            return Ok(ActionOutcome::Ignored(IgnoreReason::InsufficientEnergy));
        }
        let Some(target) = self
            .state
            .player_characters(target_team)
            .get(character_index)
        else {
            info!("no character at target slot; ignoring play");
            return Ok(ActionOutcome::Ignored(IgnoreReason::UnknownTarget));
        };

        let action = BattleAction::play(
            LOCAL_TEAM,
            card.card_id.clone(),
            vec![target.character_id.clone()],
        );
        let response = match self.api.play_action(&self.settings.battle_id, action).await {
            Ok(response) => response,
            Err(err) => return Err(self.surface_transport_error("play card", err).await),
        };

        let outcome = self.process_card_battle_api_response(response).await;
        if outcome.is_applied() {
            // Provisional until the next resync.
            self.state.remove_card_from_hand(LOCAL_TEAM, &card.card_id);
            // Server-decoded costs may be negative; the clamp below bounds the result.
            let remaining = self
                .state
                .player_energy(LOCAL_TEAM)
                .saturating_sub(card.card.energy_cost);
            self.state.update_player_energy(LOCAL_TEAM, remaining);
        }
        Ok(outcome)
    }

    #[instrument(name = "discard_card", skip_all, fields(card_id = %card.card_id))]
    pub async fn discard_card(&mut self, card: &CardInDeck) -> Result<ActionOutcome, BattleError> {
        if let Some(reason) = self.turn_guard() {
            return Ok(ActionOutcome::Ignored(reason));
        }

        let action = BattleAction::discard(LOCAL_TEAM, card.card_id.clone());
        let response = match self.api.play_action(&self.settings.battle_id, action).await {
            Ok(response) => response,
            Err(err) => return Err(self.surface_transport_error("discard card", err).await),
        };

        let outcome = self.process_card_battle_api_response(response).await;
        if outcome.is_applied() {
            // Remove and insert in one step so the card is never in two piles.
            if let Some(removed) = self.state.remove_card_from_hand(LOCAL_TEAM, &card.card_id) {
                self.state.add_card_to_discard(LOCAL_TEAM, removed);
            }
        }
        Ok(outcome)
    }

    #[instrument(name = "end_turn", skip_all, fields(battle_id = %self.settings.battle_id))]
    pub async fn end_turn(&mut self) -> Result<ActionOutcome, BattleError> {
        if let Some(reason) = self.turn_guard() {
            return Ok(ActionOutcome::Ignored(reason));
        }

        let response = match self.api.start_turn(&self.settings.battle_id).await {
            Ok(response) => response,
            Err(err) => return Err(self.surface_transport_error("end turn", err).await),
        };

        let outcome = self.process_card_battle_api_response(response).await;
        if outcome.is_applied() {
            // Blocks further local plays if the resync below fails.
            self.state.set_current_player(LOCAL_TEAM.opponent());
            // The server resolves the opponent on the same call, so only a fresh snapshot
            // says whose turn it is now.
            self.resync("refresh the battle").await?;
        }
        Ok(outcome)
    }

    #[instrument(name = "ai_turn", skip_all, fields(battle_id = %self.settings.battle_id))]
    pub async fn handle_ai_turn(&mut self) -> Result<ActionOutcome, BattleError> {
        self.animator.show_turn_message(AI_THINKING_MESSAGE).await;

        let response = match self.api.start_turn(&self.settings.battle_id).await {
            Ok(response) => response,
            Err(err) => return Err(self.surface_transport_error("opponent turn", err).await),
        };

        let outcome = self.process_card_battle_api_response(response).await;
        self.pacer.pause(self.settings.ai_thinking_delay).await;
        Ok(outcome)
    }

    /// False until a snapshot has been loaded.
    pub fn check_battle_end(&self) -> bool {
        self.state.battle_state().is_some()
            && (self.state.has_player_lost(Team::One) || self.state.has_player_lost(Team::Two))
    }

    pub async fn show_battle_end(&self, player_won: bool) {
        info!(player_won, "battle finished");
        let message = if player_won {
            VICTORY_MESSAGE
        } else {
            DEFEAT_MESSAGE
        };
        self.animator.show_turn_message(message).await;
    }

    /// Replays a successful response's log, or reports a rejected one and resyncs.
    pub async fn process_card_battle_api_response(
        &mut self,
        response: LogResponse,
    ) -> ActionOutcome {
        if response.success {
            let logs = response.data.unwrap_or_default();
            self.process_card_battle_logs(&logs).await;
            return ActionOutcome::Applied;
        }

        warn!(
            code = ?response.code,
            reason = ?response.message,
            errors = ?response.errors,
            "battle action rejected"
        );
        let notice = response
            .message
            .clone()
            .unwrap_or_else(|| "Action was rejected by the server".to_string());
        self.animator.show_error(&notice).await;

        // Nothing optimistic was applied yet; pull the server's view so the UI matches it.
        if let Err(err) = self.sync_battle_state().await {
            warn!(error = %err, "resync after rejected action failed");
        }

        ActionOutcome::Rejected {
            code: response.code,
            message: response.message,
        }
    }

    /// Animates entries strictly in server order, pausing after each one.
    pub async fn process_card_battle_logs(&self, logs: &[BattleLogEntry]) {
        for (index, entry) in logs.iter().enumerate() {
            tracing::debug!(index, action_type = %entry.action_type, "replaying log entry");
            self.animator.animate_card_battle_log_entry(entry).await;
            self.pacer.pause(self.settings.log_entry_delay).await;
        }
    }

    #[instrument(name = "battle_sequence", skip_all, fields(battle_id = %self.settings.battle_id))]
    pub async fn start_battle_sequence(&mut self) -> Result<TurnOutcome, BattleError> {
        self.animator.show_turn_message(BATTLE_START_MESSAGE).await;
        self.start_player_turn().await
    }

    /// Dispatches to the local player's draw-and-play path or resolves the opponent's turn.
    /// The opponent path runs at most once per call.
    pub async fn start_player_turn(&mut self) -> Result<TurnOutcome, BattleError> {
        let mut opponent_resolved = false;
        loop {
            if self.check_battle_end() {
                let player_won =
                    self.state.has_player_lost(Team::Two) && !self.state.has_player_lost(Team::One);
                self.show_battle_end(player_won).await;
                return Ok(TurnOutcome::BattleOver { player_won });
            }

            match self.state.current_player() {
                Team::One => {
                    self.animator.show_turn_message(PLAYER_TURN_MESSAGE).await;
                    if self.draw_cards().await?.is_applied() {
                        self.resync("refresh the battle").await?;
                    }
                    return Ok(TurnOutcome::PlayerTurn);
                }
                Team::Two if !opponent_resolved => {
                    self.handle_ai_turn().await?;
                    self.resync("refresh the battle").await?;
                    opponent_resolved = true;
                }
                Team::Two => return Ok(TurnOutcome::OpponentTurn),
            }
        }
    }

    fn turn_guard(&self) -> Option<IgnoreReason> {
        let current = self.state.current_player();
        if current != LOCAL_TEAM {
            info!(%current, "not the player's turn; ignoring action");
            return Some(IgnoreReason::NotPlayerTurn);
        }
        None
    }

    // Sync whose transport failures reach the player like any other action failure.
    async fn resync(&mut self, operation: &str) -> Result<(), BattleError> {
        match self.sync_battle_state().await {
            Err(BattleError::Api(err)) => Err(self.surface_transport_error(operation, err).await),
            other => other,
        }
    }

    async fn surface_transport_error(&self, operation: &str, err: ApiError) -> BattleError {
        error!(operation, error = %err, "battle api request failed");
        self.animator
            .show_error(&format!("Could not {operation}. Please try again."))
            .await;
        BattleError::Api(err)
    }
}

#[async_trait]
impl<A, N, P> CardActions for CardOperationsManager<A, N, P>
where
    A: BattleApi,
    N: Animator,
    P: Pacer,
{
    async fn play_card_on_character(
        &mut self,
        card: &CardInDeck,
        target_team: Team,
        character_index: usize,
    ) -> Result<ActionOutcome, BattleError> {
        CardOperationsManager::play_card_on_character(self, card, target_team, character_index)
            .await
    }

    async fn discard_card(&mut self, card: &CardInDeck) -> Result<ActionOutcome, BattleError> {
        CardOperationsManager::discard_card(self, card).await
    }
}
