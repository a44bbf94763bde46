use std::sync::mpsc::{Receiver, Sender};

use log::{info, warn};

use crate::engine::apply::apply_action_result;
use crate::engine::client::ServerClient;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::game_state::{effective_name, GameState};
use crate::model::message::StoryEntry;
use crate::model::save::sorted_slots;

/// Action sent on the player's behalf when a saved game resumes.
const RESUME_ACTION: &str = "Continue the story.";

/// The one live game: the server's save id plus the authoritative state.
/// Discarded on return-to-menu; persisted only on an explicit save.
struct Session {
    save_id: String,
    state: GameState,
}

/// Owns the session and the transport client, and processes UI commands
/// one at a time. All blocking HTTP happens here, never on the UI thread;
/// the single command queue is also what keeps state-mutating requests
/// from interleaving.
pub struct Engine {
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineResponse>,
    client: ServerClient,
    session: Option<Session>,
}

impl Engine {
    pub fn new(
        rx: Receiver<EngineCommand>,
        tx: Sender<EngineResponse>,
        server_url: &str,
    ) -> Self {
        Self {
            rx,
            tx,
            client: ServerClient::new(server_url),
            session: None,
        }
    }

    pub fn run(&mut self) {
        while let Ok(cmd) = self.rx.recv() {
            match cmd {
                EngineCommand::RefreshSaves => self.refresh_saves(),
                EngineCommand::StartGame {
                    name,
                    scenario_id,
                    custom_text,
                } => self.start_game(&name, &scenario_id, custom_text.as_deref()),
                EngineCommand::LoadGame { save_id, state } => self.load_game(save_id, state),
                EngineCommand::SubmitAction(text) => self.submit_action(&text),
                EngineCommand::SaveGame => self.save_game(),
                EngineCommand::DeleteSave(save_id) => self.delete_save(&save_id),
                EngineCommand::ChooseLevelUpStat(stat) => self.level_up(&stat),
                EngineCommand::RequestHint => self.request_hint(),
                EngineCommand::LeaveGame => {
                    self.session = None;
                    self.refresh_saves();
                }
                EngineCommand::SetServerUrl(url) => self.client.set_base_url(&url),
            }
        }
    }

    /// A listing failure renders as an empty save list, nothing louder.
    fn refresh_saves(&mut self) {
        let saves = match self.client.list_saves() {
            Ok(saves) => saves,
            Err(err) => {
                warn!("listing saves failed: {err}");
                Default::default()
            }
        };
        let _ = self.tx.send(EngineResponse::SaveList(sorted_slots(saves)));
    }

    fn start_game(&mut self, name: &str, scenario_id: &str, custom_text: Option<&str>) {
        let name = effective_name(name);
        info!("starting new game: scenario={scenario_id} name={name}");
        match self.client.start_game(&name, scenario_id, custom_text) {
            Ok(resp) => {
                let choices = resp.choices;
                // `lastSaved` stays unset until the first explicit save.
                let (session, log) = open_session(resp.save_id, resp.game_state);
                let snapshot = session.state.clone();
                self.session = Some(session);
                let _ = self.tx.send(EngineResponse::SessionStarted {
                    snapshot,
                    log,
                    choices,
                    resuming: false,
                });
            }
            Err(err) => {
                warn!("start_game failed: {err}");
                let _ = self.tx.send(EngineResponse::RequestFailed);
            }
        }
    }

    fn load_game(&mut self, save_id: String, state: GameState) {
        info!("loading save {save_id}");
        let (session, mut log) = open_session(save_id, state);
        // The resume action is engine-initiated, so it echoes here rather
        // than through the input bar.
        log.push(StoryEntry::Action(RESUME_ACTION.to_string()));
        let snapshot = session.state.clone();
        self.session = Some(session);
        let _ = self.tx.send(EngineResponse::SessionStarted {
            snapshot,
            log,
            choices: Vec::new(),
            resuming: true,
        });
        // Resuming immediately asks the server to pick the story back up.
        self.submit_action(RESUME_ACTION);
    }

    fn submit_action(&mut self, action: &str) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match self.client.process_action(action, &session.state) {
            Ok(resp) => {
                let mut appended = Vec::new();
                if let Some(story) = &resp.story_text {
                    appended.push(StoryEntry::Narration(story.clone()));
                }
                apply_action_result(&mut session.state, &resp);
                let level_up_stats = resp
                    .level_up_pending
                    .then(|| session.state.player.level_up_choices());
                let _ = self.tx.send(EngineResponse::ActionResolved {
                    snapshot: session.state.clone(),
                    appended,
                    choices: resp.choices,
                    level_up_stats,
                });
            }
            Err(err) => {
                // The player's line is already in the log; the session
                // itself is unchanged, so play can continue.
                warn!("process_action failed: {err}");
                let _ = self.tx.send(EngineResponse::RequestFailed);
            }
        }
    }

    fn save_game(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.state.touch_saved();
        let ok = match self.client.save_game(&session.save_id, &session.state) {
            Ok(()) => true,
            Err(err) => {
                warn!("saving {} failed: {err}", session.save_id);
                false
            }
        };
        let _ = self.tx.send(EngineResponse::SaveFinished { ok });
    }

    fn delete_save(&mut self, save_id: &str) {
        match self.client.delete_save(save_id) {
            Ok(()) => self.refresh_saves(),
            Err(err) => {
                warn!("deleting save {save_id} failed: {err}");
                let _ = self.tx.send(EngineResponse::DeleteFailed {
                    save_id: save_id.to_string(),
                });
            }
        }
    }

    fn level_up(&mut self, stat: &str) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match self.client.level_up(&session.state, stat) {
            Ok(resp) => {
                // The server returns the whole player; replace it outright.
                session.state.player = resp.updated_player;
                let _ = self.tx.send(EngineResponse::LevelUpResolved {
                    snapshot: session.state.clone(),
                });
            }
            Err(err) => {
                warn!("level_up failed: {err}");
                let _ = self.tx.send(EngineResponse::RequestFailed);
            }
        }
    }

    fn request_hint(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        match self.client.suggestion(&session.state) {
            Ok(resp) => {
                let _ = self.tx.send(EngineResponse::Hint(resp.suggestion));
            }
            Err(err) => {
                warn!("get_suggestion failed: {err}");
                let _ = self.tx.send(EngineResponse::RequestFailed);
            }
        }
    }
}

/// Turn a server state into a live session plus the log rebuilt from its
/// story memory. The state is taken as the server sent it; in particular
/// the save timestamp is untouched until an explicit save stamps it.
fn open_session(save_id: String, state: GameState) -> (Session, Vec<StoryEntry>) {
    let log = full_log(&state);
    (Session { save_id, state }, log)
}

fn full_log(state: &GameState) -> Vec<StoryEntry> {
    state
        .story_memory
        .iter()
        .cloned()
        .map(StoryEntry::Narration)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn server_state() -> GameState {
        serde_json::from_value(json!({
            "player": { "name": "Rina" },
            "story_memory": ["You wake in the tavern.", "The innkeeper nods."]
        }))
        .unwrap()
    }

    #[test]
    fn a_new_session_is_unstamped_until_the_first_save() {
        let (session, log) = open_session("slot-1".to_string(), server_state());
        assert!(session.state.last_saved.is_none());
        assert_eq!(session.save_id, "slot-1");
        assert_eq!(log.len(), 2);
        assert!(matches!(&log[0], StoryEntry::Narration(text) if text.contains("tavern")));
    }
}
