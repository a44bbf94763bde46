use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use eframe::egui;

use crate::engine::engine::Engine;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::game_state::GameState;
use crate::model::message::StoryEntry;
use crate::model::response::Choice;
use crate::model::save::SaveSlot;
use crate::ui::settings::UiSettings;
use crate::ui::settings_io;
use crate::ui::{game, menu, modals};

/// Placeholder log line shown while the server builds a new game.
pub const WEAVING_TEXT: &str = "The threads of fate are weaving your story...";

/* =========================
   Scenarios
   ========================= */

/// A starting premise selectable at new-game time. The custom free-text
/// scenario is handled separately.
pub struct Scenario {
    pub id: &'static str,
    pub title: &'static str,
    pub blurb: &'static str,
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        id: "tavern",
        title: "The Tavern",
        blurb: "Awaken in a dimly lit tavern with a few coppers to your name.",
    },
    Scenario {
        id: "forest",
        title: "The Enchanted Forest",
        blurb: "Stand at the edge of a vast forest that whispers back.",
    },
    Scenario {
        id: "prison",
        title: "The Prison Cell",
        blurb: "Cold stone, a distant key, and a guard who will not answer.",
    },
];

/* =========================
   Navigation
   ========================= */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Start,
    Game,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum StartView {
    MainMenu,
    ScenarioChooser,
}

/// At most one overlay at a time; the level-up prompt cannot be dismissed
/// without picking a stat.
pub enum Modal {
    None,
    LevelUp(LevelUpModal),
    Details(DetailsPanel),
}

/// Idle -> AwaitingStatChoice (modal opens) -> Resolving (buttons locked,
/// one round-trip outstanding) -> Idle (player replaced, modal closed).
pub struct LevelUpModal {
    pub stats: Vec<String>,
    pub resolving: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum DetailsPanel {
    Character,
    Inventory,
    Skills,
}

impl DetailsPanel {
    pub fn title(self) -> &'static str {
        match self {
            DetailsPanel::Character => "Character Details",
            DetailsPanel::Inventory => "Inventory",
            DetailsPanel::Skills => "Skills",
        }
    }
}

/// Transient save-button label. A newer save replaces the deadline, so a
/// stale revert can never clobber a fresh flash.
pub struct SaveFlash {
    pub label: &'static str,
    pub until: Instant,
}

impl SaveFlash {
    fn saved() -> Self {
        Self {
            label: "Saved!",
            until: Instant::now() + Duration::from_millis(1500),
        }
    }

    fn failed() -> Self {
        Self {
            label: "Save Failed!",
            until: Instant::now() + Duration::from_millis(2000),
        }
    }
}

/* =========================
   App
   ========================= */

pub struct App {
    cmd_tx: Sender<EngineCommand>,
    resp_rx: Receiver<EngineResponse>,
    pub settings: UiSettings,

    pub screen: Screen,
    pub start_view: StartView,
    pub modal: Modal,

    // Start screen
    pub save_slots: Vec<SaveSlot>,
    pub name_input: String,
    pub custom_scenario: String,
    pub show_custom_area: bool,
    pub pending_delete: Option<String>,
    pub menu_error: Option<String>,

    // Game screen; `snapshot` is the engine's latest cloned state and the
    // only thing the renderer reads.
    pub snapshot: Option<GameState>,
    pub log: Vec<StoryEntry>,
    pub choices: Vec<Choice>,
    pub action_input: String,
    pub busy: bool,
    pub autoscroll: bool,
    pub save_flash: Option<SaveFlash>,
    pub confirm_leave: bool,
}

impl App {
    pub fn new() -> Self {
        let settings = settings_io::load_settings();

        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        let server_url = settings.server_url.clone();
        std::thread::spawn(move || {
            let mut engine = Engine::new(cmd_rx, resp_tx, &server_url);
            engine.run();
        });

        let app = Self::with_channels(cmd_tx, resp_rx, settings);
        app.send(EngineCommand::RefreshSaves);
        app
    }

    fn with_channels(
        cmd_tx: Sender<EngineCommand>,
        resp_rx: Receiver<EngineResponse>,
        settings: UiSettings,
    ) -> Self {
        Self {
            cmd_tx,
            resp_rx,
            settings,
            screen: Screen::Start,
            start_view: StartView::MainMenu,
            modal: Modal::None,
            save_slots: Vec::new(),
            name_input: String::new(),
            custom_scenario: String::new(),
            show_custom_area: false,
            pending_delete: None,
            menu_error: None,
            snapshot: None,
            log: Vec::new(),
            choices: Vec::new(),
            action_input: String::new(),
            busy: false,
            autoscroll: false,
            save_flash: None,
            confirm_leave: false,
        }
    }

    pub fn send(&self, cmd: EngineCommand) {
        let _ = self.cmd_tx.send(cmd);
    }

    /// Whether the level-up prompt is on screen. An egui window does not
    /// swallow input to the panels behind it, so everything that could
    /// mutate the session checks this explicitly.
    pub fn level_up_open(&self) -> bool {
        matches!(self.modal, Modal::LevelUp(_))
    }

    /// The input surfaces stay disabled while a round-trip is in flight or
    /// the level-up prompt demands a choice.
    pub fn input_locked(&self) -> bool {
        self.busy || self.level_up_open()
    }

    /// Echo the player's line into the log and hand the action to the
    /// engine. The echo happens before the round-trip, so a failed request
    /// leaves the line in place.
    pub fn submit_action(&mut self, action: String) {
        if self.input_locked() || action.trim().is_empty() {
            return;
        }
        self.log.push(StoryEntry::Action(action.clone()));
        self.autoscroll = true;
        self.busy = true;
        self.send(EngineCommand::SubmitAction(action));
    }

    pub fn start_new_game(&mut self, scenario_id: &str, custom_text: Option<String>) {
        self.log = vec![StoryEntry::System(WEAVING_TEXT.to_string())];
        self.choices.clear();
        self.snapshot = None;
        self.screen = Screen::Game;
        self.busy = true;
        self.autoscroll = true;
        self.send(EngineCommand::StartGame {
            name: self.name_input.clone(),
            scenario_id: scenario_id.to_string(),
            custom_text,
        });
    }

    pub fn load_game(&mut self, slot: SaveSlot) {
        self.log.clear();
        self.choices.clear();
        self.snapshot = None;
        self.screen = Screen::Game;
        self.busy = true;
        self.autoscroll = true;
        self.send(EngineCommand::LoadGame {
            save_id: slot.save_id,
            state: slot.state,
        });
    }

    /// Discard the session and fall back to the main menu. The engine
    /// re-lists saves on its own.
    pub fn return_to_menu(&mut self) {
        self.screen = Screen::Start;
        self.start_view = StartView::MainMenu;
        self.modal = Modal::None;
        self.snapshot = None;
        self.log.clear();
        self.choices.clear();
        self.action_input.clear();
        self.busy = false;
        self.save_flash = None;
        self.confirm_leave = false;
        self.send(EngineCommand::LeaveGame);
    }

    fn pump_responses(&mut self) {
        while let Ok(resp) = self.resp_rx.try_recv() {
            match resp {
                EngineResponse::SaveList(slots) => {
                    self.save_slots = slots;
                }

                EngineResponse::SessionStarted {
                    snapshot,
                    log,
                    choices,
                    resuming,
                } => {
                    self.snapshot = Some(snapshot);
                    self.log = log;
                    self.choices = choices;
                    self.screen = Screen::Game;
                    // A resumed load keeps the lock until its follow-up
                    // action round-trip comes back as ActionResolved.
                    self.busy = resuming;
                    self.autoscroll = true;
                }

                EngineResponse::ActionResolved {
                    snapshot,
                    appended,
                    choices,
                    level_up_stats,
                } => {
                    self.snapshot = Some(snapshot);
                    self.log.extend(appended);
                    // The server replaces the choice set every turn; an
                    // omitted set clears the buttons.
                    self.choices = choices.unwrap_or_default();
                    if let Some(stats) = level_up_stats {
                        self.modal = Modal::LevelUp(LevelUpModal {
                            stats,
                            resolving: false,
                        });
                    }
                    self.busy = false;
                    self.autoscroll = true;
                }

                EngineResponse::RequestFailed => {
                    self.busy = false;
                    if let Modal::LevelUp(modal) = &mut self.modal {
                        modal.resolving = false;
                    }
                }

                EngineResponse::LevelUpResolved { snapshot } => {
                    self.snapshot = Some(snapshot);
                    self.modal = Modal::None;
                    self.busy = false;
                }

                EngineResponse::SaveFinished { ok } => {
                    self.save_flash = Some(if ok {
                        SaveFlash::saved()
                    } else {
                        SaveFlash::failed()
                    });
                }

                EngineResponse::DeleteFailed { save_id } => {
                    self.menu_error =
                        Some(format!("Could not delete save {save_id} on the server."));
                }

                EngineResponse::Hint(text) => {
                    self.log.push(StoryEntry::System(format!("Hint: {text}")));
                    self.busy = false;
                    self.autoscroll = true;
                }
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_pixels_per_point(self.settings.ui_scale);

        self.pump_responses();

        if let Some(flash) = &self.save_flash {
            if Instant::now() >= flash.until {
                self.save_flash = None;
            }
        }

        match self.screen {
            Screen::Start => menu::draw_start_screen(ctx, self),
            Screen::Game => game::draw_game_screen(ctx, self),
        }

        modals::draw_modals(ctx, self);

        // Engine responses arrive on a channel, not as UI events, so the
        // frame loop keeps ticking while anything is outstanding.
        let poll = if self.busy || self.save_flash.is_some() {
            Duration::from_millis(100)
        } else {
            Duration::from_millis(500)
        };
        ctx.request_repaint_after(poll);

        self.autoscroll = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn harness() -> (App, Sender<EngineResponse>, Receiver<EngineCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let app = App::with_channels(cmd_tx, resp_rx, UiSettings::default());
        (app, resp_tx, cmd_rx)
    }

    fn snapshot() -> GameState {
        serde_json::from_value(json!({ "player": { "name": "Rina" } })).unwrap()
    }

    #[test]
    fn a_fresh_session_unlocks_the_input() {
        let (mut app, resp_tx, _cmd_rx) = harness();
        app.busy = true;
        resp_tx
            .send(EngineResponse::SessionStarted {
                snapshot: snapshot(),
                log: Vec::new(),
                choices: Vec::new(),
                resuming: false,
            })
            .unwrap();
        app.pump_responses();
        assert!(!app.busy);
        assert_eq!(app.screen, Screen::Game);
    }

    #[test]
    fn a_resumed_load_stays_locked_until_the_follow_up_resolves() {
        let (mut app, resp_tx, _cmd_rx) = harness();
        app.busy = true;
        resp_tx
            .send(EngineResponse::SessionStarted {
                snapshot: snapshot(),
                log: Vec::new(),
                choices: Vec::new(),
                resuming: true,
            })
            .unwrap();
        app.pump_responses();
        assert!(app.busy);

        resp_tx
            .send(EngineResponse::ActionResolved {
                snapshot: snapshot(),
                appended: Vec::new(),
                choices: None,
                level_up_stats: None,
            })
            .unwrap();
        app.pump_responses();
        assert!(!app.busy);
    }

    #[test]
    fn an_open_level_up_prompt_locks_the_input_surfaces() {
        let (mut app, _resp_tx, cmd_rx) = harness();
        app.modal = Modal::LevelUp(LevelUpModal {
            stats: vec!["strength".to_string()],
            resolving: false,
        });
        assert!(app.input_locked());

        app.submit_action("sneak past the guard".to_string());
        assert!(app.log.is_empty());
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn a_failed_delete_keeps_the_save_list_and_surfaces_an_error() {
        let (mut app, resp_tx, _cmd_rx) = harness();
        app.save_slots = vec![SaveSlot {
            save_id: "slot-1".to_string(),
            state: snapshot(),
        }];
        resp_tx
            .send(EngineResponse::DeleteFailed {
                save_id: "slot-1".to_string(),
            })
            .unwrap();
        app.pump_responses();

        assert_eq!(app.save_slots.len(), 1);
        assert_eq!(app.save_slots[0].save_id, "slot-1");
        let error = app.menu_error.as_deref().unwrap();
        assert!(error.contains("slot-1"));
    }
}
