use crate::model::game_state::GameState;
use crate::model::response::ActionResponse;

/// Merge a sparse action response into the session state.
///
/// The rules are deliberately asymmetric, matching the server's contract:
/// hp and mana are replacements, xp and currency are deltas, a new item
/// bumps its inventory count by one. Fields the server omitted leave the
/// state untouched.
pub fn apply_action_result(state: &mut GameState, resp: &ActionResponse) {
    let updates = &resp.player_updates;

    if let Some(hp) = updates.hp {
        state.player.hp = hp;
    }
    if let Some(mana) = updates.mana {
        state.player.mana = mana;
    }
    if let Some(xp) = updates.xp {
        state.player.xp += xp;
    }
    if let Some(currency) = &updates.currency_updates {
        for (key, delta) in currency {
            *state.player.currency.entry(key.clone()).or_insert(0) += delta;
        }
    }
    if let Some(item) = &updates.new_item {
        *state.player.inventory.entry(item.clone()).or_insert(0) += 1;
    }

    if let Some(location) = &resp.game_updates.new_location {
        state.current_location = location.clone();
    }

    if let Some(additions) = &resp.memory_additions {
        for entry in additions.entries() {
            state.push_memory(entry.clone());
        }
    }

    if resp.level_up_pending {
        state.player.level_up_pending = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::game_state::STORY_MEMORY_LIMIT;
    use serde_json::json;

    fn base_state() -> GameState {
        serde_json::from_value(json!({
            "player": {
                "name": "Mira",
                "hp": 70,
                "max_hp": 100,
                "mana": 30,
                "max_mana": 50,
                "xp": 10,
                "currency": { "gold": 2, "copper": 15 },
                "inventory": { "Health Potion": 2 },
                "stats": { "strength": 10, "agility": 10 }
            },
            "current_location": "tavern",
            "story_memory": ["You awaken in a dimly lit tavern."]
        }))
        .unwrap()
    }

    fn response(value: serde_json::Value) -> ActionResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn hp_and_mana_are_replaced_not_added() {
        let mut state = base_state();
        apply_action_result(
            &mut state,
            &response(json!({ "player_updates": { "hp": 5, "mana": 12 } })),
        );
        assert_eq!(state.player.hp, 5);
        assert_eq!(state.player.mana, 12);
    }

    #[test]
    fn xp_is_additive() {
        let mut state = base_state();
        apply_action_result(
            &mut state,
            &response(json!({ "player_updates": { "xp": 5 } })),
        );
        assert_eq!(state.player.xp, 15);
    }

    #[test]
    fn currency_deltas_add_per_key() {
        let mut state = base_state();
        apply_action_result(
            &mut state,
            &response(json!({
                "player_updates": { "currency_updates": { "gold": 3, "silver": 7 } }
            })),
        );
        assert_eq!(state.player.currency_amount("gold"), 5);
        assert_eq!(state.player.currency_amount("silver"), 7);
        assert_eq!(state.player.currency_amount("copper"), 15);
    }

    #[test]
    fn new_item_increments_or_creates_at_one() {
        let mut state = base_state();
        apply_action_result(
            &mut state,
            &response(json!({ "player_updates": { "new_item": "Health Potion" } })),
        );
        apply_action_result(
            &mut state,
            &response(json!({ "player_updates": { "new_item": "Brass Key" } })),
        );
        assert_eq!(state.player.inventory["Health Potion"], 3);
        assert_eq!(state.player.inventory["Brass Key"], 1);
    }

    #[test]
    fn new_location_replaces_current() {
        let mut state = base_state();
        apply_action_result(
            &mut state,
            &response(json!({ "game_updates": { "new_location": "cellar" } })),
        );
        assert_eq!(state.current_location, "cellar");
    }

    #[test]
    fn memory_cap_holds_across_many_turns() {
        let mut state = base_state();
        for i in 0..30 {
            apply_action_result(
                &mut state,
                &response(json!({ "memory_additions": format!("turn {i}") })),
            );
        }
        assert_eq!(state.story_memory.len(), STORY_MEMORY_LIMIT);
        assert_eq!(state.story_memory.first().unwrap(), "turn 10");
        assert_eq!(state.story_memory.last().unwrap(), "turn 29");
    }

    #[test]
    fn batched_memory_additions_append_in_order() {
        let mut state = base_state();
        apply_action_result(
            &mut state,
            &response(json!({ "memory_additions": ["second", "third"] })),
        );
        assert_eq!(
            state.story_memory,
            ["You awaken in a dimly lit tavern.", "second", "third"]
        );
    }

    #[test]
    fn level_up_pending_sets_the_player_flag() {
        let mut state = base_state();
        apply_action_result(&mut state, &response(json!({ "level_up_pending": true })));
        assert!(state.player.level_up_pending);

        // A later response without the flag must not clear it.
        apply_action_result(&mut state, &response(json!({})));
        assert!(state.player.level_up_pending);
    }

    #[test]
    fn empty_response_touches_nothing() {
        let mut state = base_state();
        let before = serde_json::to_value(&state).unwrap();
        apply_action_result(&mut state, &ActionResponse::default());
        assert_eq!(serde_json::to_value(&state).unwrap(), before);
    }
}
