use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::game_state::{GameState, Player};

/// Label shown for a choice whose shape the server got wrong.
pub const INVALID_CHOICE_LABEL: &str = "[Invalid Choice]";

/// A choice exactly as the server sent it. Kept as raw JSON: the server
/// usually sends plain strings, but objects of arbitrary shape show up too.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Choice(pub Value);

impl Choice {
    /// Display text for the choice button. A string renders as itself; an
    /// object renders its first string-valued field; anything else gets
    /// the placeholder. Clicking the button dispatches this text as the
    /// action string.
    pub fn label(&self) -> String {
        match &self.0 {
            Value::String(s) => s.clone(),
            Value::Object(map) => map
                .values()
                .find_map(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| INVALID_CHOICE_LABEL.to_string()),
            _ => INVALID_CHOICE_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartGameResponse {
    pub save_id: String,
    pub game_state: GameState,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// Sparse patch returned by `/process_action`. Every field is optional;
/// absent fields leave the session state untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub story_text: Option<String>,
    #[serde(default)]
    pub choices: Option<Vec<Choice>>,
    #[serde(default)]
    pub player_updates: PlayerUpdates,
    #[serde(default)]
    pub game_updates: GameUpdates,
    #[serde(default)]
    pub memory_additions: Option<MemoryAdditions>,
    #[serde(default)]
    pub level_up_pending: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerUpdates {
    /// Replaces the current value outright.
    #[serde(default)]
    pub hp: Option<i64>,
    /// Replaces the current value outright.
    #[serde(default)]
    pub mana: Option<i64>,
    /// Added to the current value.
    #[serde(default)]
    pub xp: Option<i64>,
    /// Per-key deltas added to the current amounts.
    #[serde(default)]
    pub currency_updates: Option<BTreeMap<String, i64>>,
    /// Increments the inventory count for this item by one.
    #[serde(default)]
    pub new_item: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameUpdates {
    #[serde(default)]
    pub new_location: Option<String>,
}

/// The server normally sends one memory string per turn but is free to
/// send a batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MemoryAdditions {
    One(String),
    Many(Vec<String>),
}

impl MemoryAdditions {
    pub fn entries(&self) -> &[String] {
        match self {
            MemoryAdditions::One(entry) => std::slice::from_ref(entry),
            MemoryAdditions::Many(entries) => entries,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LevelUpResponse {
    pub updated_player: Player,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionResponse {
    pub suggestion: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn choice(value: Value) -> Choice {
        Choice(value)
    }

    #[test]
    fn string_choice_is_its_own_label() {
        assert_eq!(choice(json!("Look around")).label(), "Look around");
    }

    #[test]
    fn object_choice_uses_first_string_field() {
        assert_eq!(choice(json!({ "text": "Flee" })).label(), "Flee");
        assert_eq!(
            choice(json!({ "weight": 3, "label": "Fight" })).label(),
            "Fight"
        );
    }

    #[test]
    fn invalid_choice_shapes_get_the_placeholder() {
        assert_eq!(choice(json!(42)).label(), INVALID_CHOICE_LABEL);
        assert_eq!(choice(json!(null)).label(), INVALID_CHOICE_LABEL);
        assert_eq!(choice(json!({ "weight": 3 })).label(), INVALID_CHOICE_LABEL);
        assert_eq!(choice(json!(["Run"])).label(), INVALID_CHOICE_LABEL);
    }

    #[test]
    fn action_response_tolerates_missing_fields() {
        let resp: ActionResponse = serde_json::from_value(json!({
            "story_text": "A door creaks open."
        }))
        .unwrap();
        assert!(resp.choices.is_none());
        assert!(resp.player_updates.hp.is_none());
        assert!(!resp.level_up_pending);
    }

    #[test]
    fn memory_additions_accept_string_or_array() {
        let one: MemoryAdditions = serde_json::from_value(json!("remembered")).unwrap();
        let many: MemoryAdditions =
            serde_json::from_value(json!(["first", "second"])).unwrap();
        assert_eq!(one.entries(), ["remembered"]);
        assert_eq!(many.entries(), ["first", "second"]);
    }
}
