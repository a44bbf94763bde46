use reqwest::blocking::{Client, Response};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::model::game_state::GameState;
use crate::model::response::{
    ActionResponse, LevelUpResponse, StartGameResponse, SuggestionResponse,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned HTTP {0}")]
    Status(u16),
}

#[derive(Serialize)]
struct StartGameRequest<'a> {
    name: &'a str,
    scenario_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_text: Option<&'a str>,
}

#[derive(Serialize)]
struct ActionRequest<'a> {
    action: &'a str,
    game_state: &'a GameState,
}

#[derive(Serialize)]
struct SaveGameRequest<'a> {
    save_id: &'a str,
    game_state: &'a GameState,
}

#[derive(Serialize)]
struct LevelUpRequest<'a> {
    game_state: &'a GameState,
    stat: &'a str,
}

#[derive(Serialize)]
struct SuggestionRequest<'a> {
    game_state: &'a GameState,
}

/// Blocking JSON-over-HTTP client for the adventure server. One instance
/// lives on the engine thread; nothing here retries or queues.
pub struct ServerClient {
    http: Client,
    base_url: String,
}

impl ServerClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: normalize(base_url),
        }
    }

    pub fn set_base_url(&mut self, base_url: &str) {
        self.base_url = normalize(base_url);
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn check(resp: Response) -> Result<Response, ClientError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(ClientError::Status(resp.status().as_u16()))
        }
    }

    /// `GET /saves`: id -> full saved state.
    pub fn list_saves(&self) -> Result<HashMap<String, GameState>, ClientError> {
        let resp = self.http.get(self.url("/saves")).send()?;
        Ok(Self::check(resp)?.json()?)
    }

    /// `POST /start_game`.
    pub fn start_game(
        &self,
        name: &str,
        scenario_id: &str,
        custom_text: Option<&str>,
    ) -> Result<StartGameResponse, ClientError> {
        let body = StartGameRequest {
            name,
            scenario_id,
            custom_text,
        };
        let resp = self.http.post(self.url("/start_game")).json(&body).send()?;
        Ok(Self::check(resp)?.json()?)
    }

    /// `POST /process_action` with the full current state.
    pub fn process_action(
        &self,
        action: &str,
        game_state: &GameState,
    ) -> Result<ActionResponse, ClientError> {
        let body = ActionRequest { action, game_state };
        let resp = self
            .http
            .post(self.url("/process_action"))
            .json(&body)
            .send()?;
        Ok(Self::check(resp)?.json()?)
    }

    /// `POST /save_game`; success is carried by the HTTP status alone.
    pub fn save_game(&self, save_id: &str, game_state: &GameState) -> Result<(), ClientError> {
        let body = SaveGameRequest {
            save_id,
            game_state,
        };
        let resp = self.http.post(self.url("/save_game")).json(&body).send()?;
        Self::check(resp)?;
        Ok(())
    }

    /// `DELETE /delete_save/{id}`.
    pub fn delete_save(&self, save_id: &str) -> Result<(), ClientError> {
        let resp = self
            .http
            .delete(self.url(&format!("/delete_save/{save_id}")))
            .send()?;
        Self::check(resp)?;
        Ok(())
    }

    /// `POST /level_up`; the response replaces the player wholesale.
    pub fn level_up(
        &self,
        game_state: &GameState,
        stat: &str,
    ) -> Result<LevelUpResponse, ClientError> {
        let body = LevelUpRequest { game_state, stat };
        let resp = self.http.post(self.url("/level_up")).json(&body).send()?;
        Ok(Self::check(resp)?.json()?)
    }

    /// `POST /get_suggestion`: a hint for a stuck player.
    pub fn suggestion(&self, game_state: &GameState) -> Result<SuggestionResponse, ClientError> {
        let body = SuggestionRequest { game_state };
        let resp = self
            .http
            .post(self.url("/get_suggestion"))
            .json(&body)
            .send()?;
        Ok(Self::check(resp)?.json()?)
    }
}

fn normalize(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}
