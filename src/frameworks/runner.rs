// Framework bootstrap for the headless battle client.

use crate::domain::{Animator, BattleApi, BattleError, Character, Pacer, Team};
use crate::frameworks::config::ClientConfig;
use crate::interface_adapters::animation::{TokioPacer, TracingAnimator};
use crate::interface_adapters::clients::BattleApiClient;
use crate::use_cases::{CardOperationsManager, TurnOutcome};

use std::io::Result;

/// How a headless run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleReport {
    Finished { player_won: bool, turns: u32 },
    TurnLimitReached { turns: u32 },
}

const DEFAULT_LOG_FILTER: &str = "warn,battle_client=info";

fn init_runtime() {
    let _ = dotenvy::dotenv();

    // RUST_LOG wins; otherwise only this crate logs below warn.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "battle client panicked");
    }));
}

pub async fn run(config: ClientConfig) -> Result<BattleReport> {
    let mut client = BattleApiClient::new(config.api_base_url.clone(), config.request_timeout)
        .map_err(|e| std::io::Error::other(format!("failed to initialize battle client: {e}")))?;
    if let Some(token) = &config.api_token {
        client = client.with_token(token.clone());
    }
    tracing::debug!(
        api_base_url = %config.api_base_url,
        battle_id = %config.battle_id,
        request_timeout_ms = config.request_timeout.as_millis(),
        "battle client configured"
    );

    let mut manager = CardOperationsManager::new(
        client,
        TracingAnimator,
        TokioPacer,
        config.operation_settings(),
    );

    let report = play_battle(&mut manager, config.max_turns)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "battle aborted"))
        .map_err(std::io::Error::other)?;

    let summary = manager.state().game_state_summary();
    match serde_json::to_string(&summary) {
        Ok(summary) => tracing::info!(?report, %summary, "battle finished"),
        Err(e) => tracing::info!(?report, error = %e, "battle finished"),
    }
    Ok(report)
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let config = ClientConfig::load().inspect_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
    });
    let config = config.map_err(std::io::Error::other)?;

    run(config).await.map(|_| ())
}

/// Drives a full battle: the local side plays every affordable card on the first
/// living opponent, then ends its turn, until the battle ends or `max_turns` elapse.
pub async fn play_battle<A, N, P>(
    manager: &mut CardOperationsManager<A, N, P>,
    max_turns: u32,
) -> std::result::Result<BattleReport, BattleError>
where
    A: BattleApi,
    N: Animator,
    P: Pacer,
{
    manager.sync_battle_state().await?;
    let mut outcome = manager.start_battle_sequence().await?;
    let mut turns = 0;

    loop {
        match outcome {
            TurnOutcome::BattleOver { player_won } => {
                return Ok(BattleReport::Finished { player_won, turns });
            }
            TurnOutcome::PlayerTurn => {
                let played = autoplay_hand(manager).await?;
                tracing::debug!(turn = turns + 1, played, "local turn played");
                // Resyncs on success, so the next turn starts from the server's view.
                manager.end_turn().await?;
            }
            // Poll again; the server still had the opponent to move.
            TurnOutcome::OpponentTurn => manager.sync_battle_state().await?,
        }

        turns += 1;
        if turns >= max_turns {
            tracing::warn!(turns, "turn limit reached");
            return Ok(BattleReport::TurnLimitReached { turns });
        }

        outcome = manager.start_player_turn().await?;
    }
}

async fn autoplay_hand<A, N, P>(
    manager: &mut CardOperationsManager<A, N, P>,
) -> std::result::Result<usize, BattleError>
where
    A: BattleApi,
    N: Animator,
    P: Pacer,
{
    let mut played = 0;
    while !manager.check_battle_end() {
        let state = manager.state();
        let Some(card) = state
            .hand_cards(Team::One)
            .iter()
            .find(|card| state.can_play_card(Team::One, &card.card))
            .cloned()
        else {
            break;
        };
        let Some(target_index) = state
            .player_characters(Team::Two)
            .iter()
            .position(Character::is_alive)
        else {
            break;
        };

        // Stop on the first rejected play; the resync may have changed the hand.
        if !manager
            .play_card_on_character(&card, Team::Two, target_index)
            .await?
            .is_applied()
        {
            break;
        }
        played += 1;
    }
    Ok(played)
}
