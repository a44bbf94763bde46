use std::collections::HashMap;

use crate::model::game_state::GameState;

/// One row of the load-game list: an opaque server id plus the full saved
/// state (loading replays it without another fetch).
#[derive(Debug, Clone)]
pub struct SaveSlot {
    pub save_id: String,
    pub state: GameState,
}

impl SaveSlot {
    pub fn player_name(&self) -> &str {
        &self.state.player.name
    }

    pub fn saved_label(&self) -> String {
        match self.state.saved_at() {
            Some(t) => format!("Saved: {}", t.format("%Y-%m-%d %H:%M")),
            None => "Saved: unknown".to_string(),
        }
    }
}

/// Newest first; slots without a parsable timestamp sort last. Ties break
/// on the id so the list is stable across refreshes.
pub fn sorted_slots(saves: HashMap<String, GameState>) -> Vec<SaveSlot> {
    let mut slots: Vec<SaveSlot> = saves
        .into_iter()
        .map(|(save_id, state)| SaveSlot { save_id, state })
        .collect();
    slots.sort_by(|a, b| {
        b.state
            .saved_at()
            .cmp(&a.state.saved_at())
            .then_with(|| a.save_id.cmp(&b.save_id))
    });
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn saved_state(name: &str, last_saved: Option<&str>) -> GameState {
        let mut value = json!({ "player": { "name": name } });
        if let Some(ts) = last_saved {
            value["lastSaved"] = json!(ts);
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn slots_sort_newest_first_with_unparsable_last() {
        let mut saves = HashMap::new();
        saves.insert("old".into(), saved_state("Old", Some("2025-01-01T08:00:00")));
        saves.insert(
            "new".into(),
            saved_state("New", Some("2025-06-01T08:00:00+00:00")),
        );
        saves.insert("broken".into(), saved_state("Broken", Some("not a date")));
        saves.insert("missing".into(), saved_state("Missing", None));

        let order: Vec<String> = sorted_slots(saves)
            .into_iter()
            .map(|s| s.save_id)
            .collect();
        assert_eq!(order, ["new", "old", "broken", "missing"]);
    }

    #[test]
    fn saved_label_falls_back_for_garbage() {
        let slot = SaveSlot {
            save_id: "x".into(),
            state: saved_state("A", Some("garbage")),
        };
        assert_eq!(slot.saved_label(), "Saved: unknown");
    }
}
