use crate::domain::{ApiError, ApiResponse, BattleAction, BattleApi, BattleState, LogResponse};
use crate::interface_adapters::protocol::ErrorResponse;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

// Thin wrapper around reqwest for the remote battle engine.
#[derive(Clone)]
pub struct BattleApiClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl BattleApiClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    /// Attaches a bearer token to every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // `{base}/battles/{battle_id}/{rest...}` with each segment percent-encoded.
    fn endpoint(&self, battle_id: &str, rest: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ApiError::Transport(format!("base url {} cannot hold a path", self.base_url))
            })?
            .pop_if_empty()
            .push("battles")
            .push(battle_id)
            .extend(rest);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T>(&self, request: RequestBuilder) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let res = self
            .authorize(request)
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        let status = res.status();
        let body = res
            .bytes()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;

        if status.is_success() {
            return serde_json::from_slice::<ApiResponse<T>>(&body)
                .map_err(|err| ApiError::Decode(err.to_string()));
        }

        // A 4xx carrying the envelope is an application-level rejection, not a transport error.
        if let Ok(envelope) = serde_json::from_slice::<ApiResponse<T>>(&body) {
            if !envelope.success {
                return Ok(envelope);
            }
        }

        let message = serde_json::from_slice::<ErrorResponse>(&body)
            .ok()
            .map(|payload| payload.message);
        Err(ApiError::Upstream {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl BattleApi for BattleApiClient {
    async fn get_battle_state(
        &self,
        battle_id: &str,
    ) -> Result<ApiResponse<BattleState>, ApiError> {
        let url = self.endpoint(battle_id, &[])?;
        self.send(self.http.get(url)).await
    }

    async fn draw_cards(
        &self,
        battle_id: &str,
        action: BattleAction,
    ) -> Result<LogResponse, ApiError> {
        let url = self.endpoint(battle_id, &["draw"])?;
        self.send(self.http.post(url).json(&action)).await
    }

    async fn play_action(
        &self,
        battle_id: &str,
        action: BattleAction,
    ) -> Result<LogResponse, ApiError> {
        let url = self.endpoint(battle_id, &["actions"])?;
        self.send(self.http.post(url).json(&action)).await
    }

    async fn start_turn(&self, battle_id: &str) -> Result<LogResponse, ApiError> {
        let url = self.endpoint(battle_id, &["turn", "start"])?;
        self.send(self.http.post(url)).await
    }
}
