use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The story memory never grows past this many entries; the oldest entry
/// is evicted first.
pub const STORY_MEMORY_LIMIT: usize = 20;

/// Name used when the player leaves the name field blank.
pub const DEFAULT_PLAYER_NAME: &str = "Adventurer";

/// A full game state as the server stores and returns it.
/// The client owns exactly one of these per session and sends the whole
/// document back on every action and save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub player: Player,

    #[serde(default)]
    pub story_memory: Vec<String>,

    #[serde(default)]
    pub current_location: String,

    /// ISO-8601 string, kept verbatim: the server emits naive local
    /// timestamps while the client writes UTC ones, so parsing is done
    /// lazily and leniently (see [`GameState::saved_at`]).
    #[serde(default, rename = "lastSaved", skip_serializing_if = "Option::is_none")]
    pub last_saved: Option<String>,

    /// Server-owned fields the client does not interpret (current enemies
    /// and whatever else later server versions add). Preserved so a loaded
    /// save round-trips unchanged.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl GameState {
    /// Append a memory entry, evicting from the front past the limit.
    pub fn push_memory(&mut self, entry: String) {
        self.story_memory.push(entry);
        while self.story_memory.len() > STORY_MEMORY_LIMIT {
            self.story_memory.remove(0);
        }
    }

    /// Stamp the state with the current UTC time ahead of a save.
    pub fn touch_saved(&mut self) {
        self.last_saved = Some(chrono::Utc::now().to_rfc3339());
    }

    /// Parsed save timestamp, if the string is one of the two formats the
    /// wire actually carries.
    pub fn saved_at(&self) -> Option<NaiveDateTime> {
        let raw = self.last_saved.as_deref()?;
        if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
            return Some(t.naive_utc());
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,

    #[serde(default)]
    pub hp: i64,
    #[serde(default = "default_max")]
    pub max_hp: i64,
    #[serde(default)]
    pub mana: i64,
    #[serde(default = "default_max")]
    pub max_mana: i64,

    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub xp: i64,
    #[serde(default = "default_max")]
    pub xp_to_next_level: i64,

    #[serde(default)]
    pub stats: BTreeMap<String, i64>,
    #[serde(default)]
    pub currency: BTreeMap<String, i64>,
    #[serde(default)]
    pub inventory: BTreeMap<String, i64>,
    #[serde(default)]
    pub skills: BTreeMap<String, Skill>,

    #[serde(default)]
    pub level_up_pending: bool,

    /// Uninterpreted server fields (equipped gear, ...), kept so they
    /// survive load -> play -> save.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Player {
    pub fn currency_amount(&self, key: &str) -> i64 {
        self.currency.get(key).copied().unwrap_or(0)
    }

    /// One entry per stat key; this is exactly the set of buttons the
    /// level-up prompt offers.
    pub fn level_up_choices(&self) -> Vec<String> {
        self.stats.keys().cloned().collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub cost: i64,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

fn default_level() -> u32 {
    1
}

fn default_max() -> i64 {
    100
}

/// The name actually sent to the server: trimmed input, or the stock
/// adventurer name when the field was left blank.
pub fn effective_name(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        DEFAULT_PLAYER_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state_from(value: serde_json::Value) -> GameState {
        serde_json::from_value(value).expect("fixture should deserialize")
    }

    #[test]
    fn blank_name_defaults_to_adventurer() {
        assert_eq!(effective_name(""), "Adventurer");
        assert_eq!(effective_name("   "), "Adventurer");
        assert_eq!(effective_name("  Mira "), "Mira");
    }

    #[test]
    fn memory_evicts_oldest_past_limit() {
        let mut state = state_from(json!({ "player": { "name": "A" } }));
        for i in 0..25 {
            state.push_memory(format!("entry {i}"));
        }
        assert_eq!(state.story_memory.len(), STORY_MEMORY_LIMIT);
        assert_eq!(state.story_memory.first().unwrap(), "entry 5");
        assert_eq!(state.story_memory.last().unwrap(), "entry 24");
    }

    #[test]
    fn level_up_choices_cover_every_stat() {
        let state = state_from(json!({
            "player": {
                "name": "A",
                "stats": { "strength": 10, "agility": 11, "intelligence": 9, "dexterity": 10 }
            }
        }));
        let choices = state.player.level_up_choices();
        assert_eq!(choices.len(), 4);
        for stat in ["strength", "agility", "intelligence", "dexterity"] {
            assert!(choices.iter().any(|c| c == stat), "missing {stat}");
        }
    }

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let raw = json!({
            "player": {
                "name": "A",
                "hp": 80,
                "equipped": { "weapon": "Rusty Sword" }
            },
            "story_memory": ["It begins."],
            "current_location": "start",
            "current_enemies": ["goblin"]
        });
        let state = state_from(raw);
        let back = serde_json::to_value(&state).unwrap();
        assert_eq!(back["player"]["equipped"]["weapon"], "Rusty Sword");
        assert_eq!(back["current_enemies"], json!(["goblin"]));
    }

    #[test]
    fn saved_at_parses_both_wire_formats() {
        // Client-written UTC timestamp.
        let with_zone = state_from(json!({
            "player": { "name": "A" },
            "lastSaved": "2025-03-01T12:00:00+00:00"
        }));
        // Server-written naive timestamp.
        let naive = state_from(json!({
            "player": { "name": "A" },
            "lastSaved": "2025-03-01T11:59:59.123456"
        }));
        let garbage = state_from(json!({
            "player": { "name": "A" },
            "lastSaved": "yesterday"
        }));
        assert!(with_zone.saved_at() > naive.saved_at());
        assert!(garbage.saved_at().is_none());
    }
}
