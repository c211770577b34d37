//! Session-scoped world state.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Lifecycle of a quest instance. `NotStarted` is never stored; it is what
/// an absent entry reads as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    /// No state recorded yet.
    #[default]
    NotStarted,
    /// In progress.
    Active,
    /// Finished successfully.
    Completed,
    /// Finished unsuccessfully.
    Failed,
}

impl QuestStatus {
    /// The wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Completed and failed quests never change status again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for QuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One started quest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestState {
    /// Where the quest stands.
    pub status: QuestStatus,
    /// Stages the quest is currently on.
    pub current_stage_ids: Vec<String>,
}

/// The player-visible world state of one session.
///
/// Engine operations never mutate a state in place; they return a new one
/// that the session swaps in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameState {
    /// Scene the player stands on.
    pub current_scene_id: String,
    /// Scenes left behind, oldest first.
    pub history: Vec<String>,
    /// Held item ids, without repeats.
    pub inventory: Vec<String>,
    /// Party member ids, without repeats.
    pub party: Vec<String>,
    /// Current variable values.
    pub variable_values: BTreeMap<String, Value>,
    /// Relationship scores that moved off their initial value.
    pub relationships: BTreeMap<String, f64>,
    /// Quests that have been started.
    pub quest_states: BTreeMap<String, QuestState>,
    /// One-time triggers that already fired.
    pub triggered_ids: BTreeSet<String>,
    /// The single global audio track.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_track_url: Option<String>,
    /// Whether player input is blocked.
    pub is_paused: bool,
}

impl GameState {
    /// A state positioned at `scene_id` with nothing else set.
    pub fn at_scene(scene_id: impl Into<String>) -> Self {
        Self {
            current_scene_id: scene_id.into(),
            ..Self::default()
        }
    }

    // -----------------------------------------------------------------------
    // Inventory & party
    // -----------------------------------------------------------------------

    /// Whether the item is held.
    pub fn has_item(&self, item_id: &str) -> bool {
        self.inventory.iter().any(|i| i == item_id)
    }

    /// Add an item unless already held. Returns whether it was added.
    pub fn add_item(&mut self, item_id: &str) -> bool {
        if self.has_item(item_id) {
            return false;
        }
        self.inventory.push(item_id.to_string());
        true
    }

    /// Remove the first occurrence of an item. Returns whether it was held.
    pub fn remove_item(&mut self, item_id: &str) -> bool {
        if let Some(pos) = self.inventory.iter().position(|i| i == item_id) {
            self.inventory.remove(pos);
            true
        } else {
            false
        }
    }

    /// Whether the character is in the party.
    pub fn in_party(&self, character_id: &str) -> bool {
        self.party.iter().any(|c| c == character_id)
    }

    /// Add a party member. Returns `false` if already present.
    pub fn join_party(&mut self, character_id: &str) -> bool {
        if self.in_party(character_id) {
            return false;
        }
        self.party.push(character_id.to_string());
        true
    }

    /// Remove a party member. Returns `false` if absent.
    pub fn leave_party(&mut self, character_id: &str) -> bool {
        if let Some(pos) = self.party.iter().position(|c| c == character_id) {
            self.party.remove(pos);
            true
        } else {
            false
        }
    }

    // -----------------------------------------------------------------------
    // Variables, relationships, quests
    // -----------------------------------------------------------------------

    /// Current value of a variable.
    pub fn variable(&self, id: &str) -> Option<&Value> {
        self.variable_values.get(id)
    }

    /// Overwrite a variable.
    pub fn set_variable(&mut self, id: impl Into<String>, value: Value) {
        self.variable_values.insert(id.into(), value);
    }

    /// Stored relationship score, without the character's initial fallback.
    pub fn relationship(&self, character_id: &str) -> Option<f64> {
        self.relationships.get(character_id).copied()
    }

    /// Recorded state of a quest.
    pub fn quest(&self, quest_id: &str) -> Option<&QuestState> {
        self.quest_states.get(quest_id)
    }

    /// Status of a quest, `NotStarted` when it has no instance.
    pub fn quest_status(&self, quest_id: &str) -> QuestStatus {
        self.quest(quest_id)
            .map_or(QuestStatus::NotStarted, |q| q.status)
    }

    /// Whether a one-time trigger has fired.
    pub fn has_triggered(&self, trigger_id: &str) -> bool {
        self.triggered_ids.contains(trigger_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_has_set_semantics() {
        let mut state = GameState::default();
        assert!(state.add_item("keycard"));
        assert!(!state.add_item("keycard"));
        assert_eq!(state.inventory, vec!["keycard"]);

        assert!(state.remove_item("keycard"));
        assert!(!state.remove_item("keycard"));
        assert!(!state.has_item("keycard"));
    }

    #[test]
    fn party_membership() {
        let mut state = GameState::default();
        state.join_party("mira");
        state.join_party("mira");
        assert_eq!(state.party.len(), 1);
        assert!(state.leave_party("mira"));
        assert!(!state.in_party("mira"));
    }

    #[test]
    fn absent_quest_reads_not_started() {
        let state = GameState::default();
        assert_eq!(state.quest_status("q"), QuestStatus::NotStarted);
        assert!(!QuestStatus::NotStarted.is_terminal());
        assert!(QuestStatus::Failed.is_terminal());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let mut state = GameState::at_scene("s0");
        state.set_variable("sanity", Value::from(100));
        state.quest_states.insert(
            "q".into(),
            QuestState {
                status: QuestStatus::Active,
                current_stage_ids: vec!["A".into()],
            },
        );

        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains(r#""currentSceneId":"s0""#));
        assert!(json.contains(r#""currentStageIds":["A"]"#));
        assert!(json.contains(r#""status":"active""#));
        assert!(!json.contains("currentTrackUrl"));

        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn missing_fields_default() {
        let state: GameState = serde_json::from_str(r#"{"currentSceneId":"s1"}"#).unwrap();
        assert_eq!(state.current_scene_id, "s1");
        assert!(state.inventory.is_empty());
        assert!(!state.is_paused);
    }
}
