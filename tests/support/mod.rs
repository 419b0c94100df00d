// In-process stand-in for the remote battle engine, shared across integration tests.
#![allow(dead_code)]

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, Uri, header::AUTHORIZATION},
    routing::{get, post},
};
use battle_client::domain::{BattleState, Card, CardInDeck, Character, Player, PlayerDeck, Team};
use serde_json::{Value, json};
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};
use url::Url;

// One request as seen by the fake server.
#[derive(Debug, Clone, PartialEq)]
pub struct Received {
    pub path: String,
    pub body: Option<Value>,
}

// Scripted answer for the next POST, optionally swapping the served battle state.
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
    pub next_state: Option<BattleState>,
}

impl Reply {
    pub fn ok(logs: Value) -> Self {
        Self::raw(StatusCode::OK, json!({ "success": true, "data": logs }))
    }

    pub fn rejected(status: StatusCode, code: &str, message: &str) -> Self {
        Self::raw(status, json!({ "success": false, "code": code, "message": message }))
    }

    pub fn raw(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body,
            next_state: None,
        }
    }

    pub fn then_state(mut self, state: BattleState) -> Self {
        self.next_state = Some(state);
        self
    }
}

struct Shared {
    battle: Mutex<BattleState>,
    replies: Mutex<VecDeque<Reply>>,
    received: Mutex<Vec<Received>>,
    required_token: Option<String>,
}

pub struct FakeBattleServer {
    pub base_url: Url,
    shared: Arc<Shared>,
}

impl FakeBattleServer {
    pub async fn start(state: BattleState) -> Self {
        Self::start_with_token(state, None).await
    }

    // Bind to an ephemeral port inside the current test runtime.
    pub async fn start_with_token(state: BattleState, token: Option<&str>) -> Self {
        let shared = Arc::new(Shared {
            battle: Mutex::new(state),
            replies: Mutex::new(VecDeque::new()),
            received: Mutex::new(Vec::new()),
            required_token: token.map(str::to_string),
        });

        let app = Router::new()
            .route("/battles/{battle_id}", get(get_battle))
            .route("/battles/{battle_id}/draw", post(battle_action))
            .route("/battles/{battle_id}/actions", post(battle_action))
            .route("/battles/{battle_id}/turn/start", post(battle_action))
            .with_state(Arc::clone(&shared));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral test port");
        let addr = listener.local_addr().expect("get local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake battle api failed");
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}")).expect("valid fake server url"),
            shared,
        }
    }

    pub fn push_reply(&self, reply: Reply) {
        self.shared
            .replies
            .lock()
            .expect("replies lock")
            .push_back(reply);
    }

    pub fn set_state(&self, state: BattleState) {
        *self.shared.battle.lock().expect("battle lock") = state;
    }

    pub fn received(&self) -> Vec<Received> {
        self.shared.received.lock().expect("received lock").clone()
    }

    pub fn received_paths(&self) -> Vec<String> {
        self.received().into_iter().map(|r| r.path).collect()
    }
}

fn authorized(shared: &Shared, headers: &HeaderMap) -> bool {
    let Some(token) = &shared.required_token else {
        return true;
    };
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {token}"))
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "missing bearer token" })),
    )
}

fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "code": "BATTLE_NOT_FOUND",
            "message": "battle not found"
        })),
    )
}

async fn get_battle(
    State(shared): State<Arc<Shared>>,
    Path(battle_id): Path<String>,
    headers: HeaderMap,
    uri: Uri,
) -> (StatusCode, Json<Value>) {
    shared.received.lock().expect("received lock").push(Received {
        path: uri.path().to_string(),
        body: None,
    });
    if !authorized(&shared, &headers) {
        return unauthorized();
    }

    let battle = shared.battle.lock().expect("battle lock").clone();
    if battle.id != battle_id {
        return not_found();
    }
    (StatusCode::OK, Json(json!({ "success": true, "data": battle })))
}

async fn battle_action(
    State(shared): State<Arc<Shared>>,
    Path(battle_id): Path<String>,
    headers: HeaderMap,
    uri: Uri,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    shared.received.lock().expect("received lock").push(Received {
        path: uri.path().to_string(),
        body: serde_json::from_slice(&body).ok(),
    });
    if !authorized(&shared, &headers) {
        return unauthorized();
    }
    if shared.battle.lock().expect("battle lock").id != battle_id {
        return not_found();
    }

    let reply = shared.replies.lock().expect("replies lock").pop_front();
    let Some(reply) = reply else {
        return (StatusCode::OK, Json(json!({ "success": true, "data": [] })));
    };
    if let Some(state) = reply.next_state {
        *shared.battle.lock().expect("battle lock") = state;
    }
    (reply.status, Json(reply.body))
}

pub fn card(card_id: &str, name: &str, energy_cost: i32) -> CardInDeck {
    CardInDeck {
        card_id: card_id.to_string(),
        card: Card {
            id: format!("def-{name}"),
            name: name.to_string(),
            energy_cost,
            group: None,
            description: None,
        },
    }
}

pub fn character(character_id: &str, current_hp: i32, max_hp: i32) -> Character {
    Character {
        character_id: character_id.to_string(),
        name: None,
        current_hp,
        max_hp,
    }
}

pub fn player(
    team: Team,
    characters: Vec<Character>,
    hand: Vec<CardInDeck>,
    energy: i32,
) -> Player {
    Player {
        team,
        characters,
        deck: PlayerDeck {
            hand,
            deck: Vec::new(),
            discard: Vec::new(),
        },
        current_energy: energy,
        max_energy: energy,
    }
}

pub fn battle(id: &str, current: Team, one: Player, two: Player) -> BattleState {
    BattleState {
        id: id.to_string(),
        players: vec![one, two],
        current_player: Some(current),
        turn: Some(1),
    }
}
