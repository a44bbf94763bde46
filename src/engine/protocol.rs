use crate::model::game_state::GameState;
use crate::model::message::StoryEntry;
use crate::model::response::Choice;
use crate::model::save::SaveSlot;

/// What the UI asks the engine to do. Commands are processed strictly in
/// order on the engine thread, so two state-mutating requests can never
/// interleave.
pub enum EngineCommand {
    RefreshSaves,
    StartGame {
        name: String,
        scenario_id: String,
        custom_text: Option<String>,
    },
    LoadGame {
        save_id: String,
        state: GameState,
    },
    SubmitAction(String),
    SaveGame,
    DeleteSave(String),
    ChooseLevelUpStat(String),
    RequestHint,
    LeaveGame,
    SetServerUrl(String),
}

/// What the engine reports back. Every state mutation ships a full cloned
/// snapshot; the UI renders snapshots and nothing else.
pub enum EngineResponse {
    SaveList(Vec<SaveSlot>),
    /// A session began (new game or load). `log` is the full story log
    /// rebuilt from the state's story memory.
    SessionStarted {
        snapshot: GameState,
        log: Vec<StoryEntry>,
        choices: Vec<Choice>,
        /// A resumed load still has its follow-up action in flight when
        /// this arrives, so the UI must stay locked until that resolves.
        resuming: bool,
    },
    /// An action round-trip finished. `appended` holds only the new log
    /// entries; `choices` of `None` clears the choice buttons.
    ActionResolved {
        snapshot: GameState,
        appended: Vec<StoryEntry>,
        choices: Option<Vec<Choice>>,
        /// When present, the level-up prompt must open with exactly these
        /// stat buttons.
        level_up_stats: Option<Vec<String>>,
    },
    /// A request failed; the session is unchanged. Unblocks the UI.
    RequestFailed,
    LevelUpResolved {
        snapshot: GameState,
    },
    SaveFinished {
        ok: bool,
    },
    DeleteFailed {
        save_id: String,
    },
    Hint(String),
}
