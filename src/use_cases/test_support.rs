use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{
    Animator, ApiError, ApiResponse, BattleAction, BattleApi, BattleLogEntry, BattleState, Card,
    CardBattleLogTarget, CardInDeck, Character, Impact, ImpactKind, LogResponse, Pacer, Player,
    PlayerDeck, Team,
};

// Every observable side effect, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Event {
    Request(ApiCall),
    TurnMessage(String),
    AnimateStart(String),
    AnimateEnd(String),
    Error(String),
    Pause(Duration),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ApiCall {
    GetState,
    Draw(BattleAction),
    Play(BattleAction),
    StartTurn,
}

pub(crate) type Timeline = Arc<Mutex<Vec<Event>>>;

pub(crate) fn timeline() -> Timeline {
    Arc::new(Mutex::new(Vec::new()))
}

pub(crate) fn events(timeline: &Timeline) -> Vec<Event> {
    timeline.lock().expect("timeline mutex poisoned").clone()
}

fn push(timeline: &Timeline, event: Event) {
    timeline.lock().expect("timeline mutex poisoned").push(event);
}

pub(crate) fn requests(timeline: &Timeline) -> Vec<ApiCall> {
    events(timeline)
        .into_iter()
        .filter_map(|event| match event {
            Event::Request(call) => Some(call),
            _ => None,
        })
        .collect()
}

// Scripted battle API. Log endpoints pop from one shared queue and fall back to an empty
// successful log; get_battle_state returns whatever snapshot is currently configured.
#[derive(Clone)]
pub(crate) struct RecordingApi {
    timeline: Timeline,
    log_responses: Arc<Mutex<VecDeque<Result<LogResponse, ApiError>>>>,
    server_state: Arc<Mutex<Option<BattleState>>>,
    state_failures: Arc<Mutex<VecDeque<ApiError>>>,
}

impl RecordingApi {
    pub(crate) fn new(timeline: Timeline) -> Self {
        Self {
            timeline,
            log_responses: Arc::new(Mutex::new(VecDeque::new())),
            server_state: Arc::new(Mutex::new(None)),
            state_failures: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    pub(crate) fn with_log_response(self, response: Result<LogResponse, ApiError>) -> Self {
        self.push_log_response(response);
        self
    }

    pub(crate) fn push_log_response(&self, response: Result<LogResponse, ApiError>) {
        self.log_responses
            .lock()
            .expect("responses mutex poisoned")
            .push_back(response);
    }

    pub(crate) fn set_server_state(&self, state: BattleState) {
        *self.server_state.lock().expect("state mutex poisoned") = Some(state);
    }

    // The next get_battle_state call fails with `err` instead of returning the snapshot.
    pub(crate) fn fail_next_state_fetch(&self, err: ApiError) {
        self.state_failures
            .lock()
            .expect("failures mutex poisoned")
            .push_back(err);
    }

    fn next_log_response(&self) -> Result<LogResponse, ApiError> {
        self.log_responses
            .lock()
            .expect("responses mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(ApiResponse::ok(Vec::new())))
    }
}

#[async_trait]
impl BattleApi for RecordingApi {
    async fn get_battle_state(
        &self,
        _battle_id: &str,
    ) -> Result<ApiResponse<BattleState>, ApiError> {
        push(&self.timeline, Event::Request(ApiCall::GetState));
        let failure = self
            .state_failures
            .lock()
            .expect("failures mutex poisoned")
            .pop_front();
        if let Some(err) = failure {
            return Err(err);
        }
        let state = self.server_state.lock().expect("state mutex poisoned").clone();
        Ok(match state {
            Some(state) => ApiResponse::ok(state),
            None => ApiResponse::failure("BATTLE_NOT_FOUND", "battle not found"),
        })
    }

    async fn draw_cards(
        &self,
        _battle_id: &str,
        action: BattleAction,
    ) -> Result<LogResponse, ApiError> {
        push(&self.timeline, Event::Request(ApiCall::Draw(action)));
        self.next_log_response()
    }

    async fn play_action(
        &self,
        _battle_id: &str,
        action: BattleAction,
    ) -> Result<LogResponse, ApiError> {
        push(&self.timeline, Event::Request(ApiCall::Play(action)));
        self.next_log_response()
    }

    async fn start_turn(&self, _battle_id: &str) -> Result<LogResponse, ApiError> {
        push(&self.timeline, Event::Request(ApiCall::StartTurn));
        self.next_log_response()
    }
}

// Animator that records start and end of every animation and yields in between, so any
// overlap between entries would show up as interleaved events.
#[derive(Clone)]
pub(crate) struct RecordingAnimator {
    timeline: Timeline,
}

impl RecordingAnimator {
    pub(crate) fn new(timeline: Timeline) -> Self {
        Self { timeline }
    }
}

#[async_trait]
impl Animator for RecordingAnimator {
    async fn show_turn_message(&self, text: &str) {
        push(&self.timeline, Event::TurnMessage(text.to_string()));
    }

    async fn animate_card_battle_log_entry(&self, entry: &BattleLogEntry) {
        push(&self.timeline, Event::AnimateStart(entry.action_type.clone()));
        tokio::task::yield_now().await;
        push(&self.timeline, Event::AnimateEnd(entry.action_type.clone()));
    }

    async fn show_error(&self, message: &str) {
        push(&self.timeline, Event::Error(message.to_string()));
    }
}

// Pacer that records the requested delay instead of sleeping.
#[derive(Clone)]
pub(crate) struct RecordingPacer {
    timeline: Timeline,
}

impl RecordingPacer {
    pub(crate) fn new(timeline: Timeline) -> Self {
        Self { timeline }
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, duration: Duration) {
        push(&self.timeline, Event::Pause(duration));
    }
}

pub(crate) fn card(card_id: &str, energy_cost: i32) -> CardInDeck {
    CardInDeck {
        card_id: card_id.to_string(),
        card: Card {
            id: format!("def-{card_id}"),
            name: card_id.to_string(),
            energy_cost,
            group: None,
            description: None,
        },
    }
}

pub(crate) fn character(character_id: &str, current_hp: i32, max_hp: i32) -> Character {
    Character {
        character_id: character_id.to_string(),
        name: None,
        current_hp,
        max_hp,
    }
}

pub(crate) fn player(team: Team, current_energy: i32, max_energy: i32) -> Player {
    Player {
        team,
        characters: Vec::new(),
        deck: PlayerDeck::default(),
        current_energy,
        max_energy,
    }
}

fn seeded_player(team: Team, prefix: &str, second_hp: i32) -> Player {
    let mut player = player(team, 3, 5);
    player.characters = vec![
        character(&format!("{prefix}-char-0"), 20, 20),
        character(&format!("{prefix}-char-1"), second_hp, 20),
    ];
    player.deck.hand = vec![
        card(&format!("{prefix}-hand-0"), 1),
        card(&format!("{prefix}-hand-1"), 2),
    ];
    player.deck.deck = (0..3)
        .map(|index| card(&format!("{prefix}-deck-{index}"), 1))
        .collect();
    player
}

// Two-player snapshot on team one's turn: energy 3/5 each, two characters per side,
// two cards in hand (costs 1 and 2) and three in deck.
pub(crate) fn battle_state(id: &str) -> BattleState {
    BattleState {
        id: id.to_string(),
        players: vec![
            seeded_player(Team::One, "p1", 20),
            seeded_player(Team::Two, "p2", 15),
        ],
        current_player: Some(Team::One),
        turn: Some(1),
    }
}

pub(crate) fn log_entry(
    action_type: &str,
    target_id: &str,
    kind: ImpactKind,
    value: f64,
) -> BattleLogEntry {
    BattleLogEntry {
        action_type: action_type.to_string(),
        actor_team: None,
        card: None,
        targets: vec![CardBattleLogTarget {
            target_id: target_id.to_string(),
            target_team: None,
            impacts: vec![Impact {
                kind,
                value,
                meta: None,
            }],
        }],
    }
}
