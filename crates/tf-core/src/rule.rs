use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// What a condition inspects. Authored types the engine does not know are
/// kept verbatim in `Unrecognized`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionKind {
    /// A project variable's current value.
    Variable,
    /// Inventory membership.
    Item,
    /// A character's relationship score.
    Relationship,
    /// A quest's status.
    Quest,
    /// The current scene.
    Scene,
    /// Any other authored type (`flag`, `time`, ...).
    Unrecognized(String),
}

impl ConditionKind {
    /// The authored name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Variable => "variable",
            Self::Item => "item",
            Self::Relationship => "relationship",
            Self::Quest => "quest",
            Self::Scene => "scene",
            Self::Unrecognized(s) => s,
        }
    }
}

impl From<String> for ConditionKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "variable" => Self::Variable,
            "item" => Self::Item,
            "relationship" => Self::Relationship,
            "quest" => Self::Quest,
            "scene" => Self::Scene,
            _ => Self::Unrecognized(s),
        }
    }
}

impl From<ConditionKind> for String {
    fn from(kind: ConditionKind) -> Self {
        match kind {
            ConditionKind::Unrecognized(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a condition compares its operand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionOperator {
    /// Equal, with coercion.
    Eq,
    /// Greater than.
    Gt,
    /// Less than.
    Lt,
    /// Greater than or equal.
    Gte,
    /// Less than or equal.
    Lte,
    /// The item is held.
    Has,
    /// The item is not held.
    HasNot,
    /// The player stands on the scene.
    AtScene,
    /// The quest has the given status.
    QuestStatus,
    /// Any other authored operator.
    Unrecognized(String),
}

impl ConditionOperator {
    /// The authored name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Eq => "eq",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Gte => "gte",
            Self::Lte => "lte",
            Self::Has => "has",
            Self::HasNot => "has_not",
            Self::AtScene => "at_scene",
            Self::QuestStatus => "quest_status",
            Self::Unrecognized(s) => s,
        }
    }
}

impl From<String> for ConditionOperator {
    fn from(s: String) -> Self {
        match s.as_str() {
            "eq" => Self::Eq,
            "gt" => Self::Gt,
            "lt" => Self::Lt,
            "gte" => Self::Gte,
            "lte" => Self::Lte,
            "has" => Self::Has,
            "has_not" => Self::HasNot,
            "at_scene" => Self::AtScene,
            "quest_status" => Self::QuestStatus,
            _ => Self::Unrecognized(s),
        }
    }
}

impl From<ConditionOperator> for String {
    fn from(op: ConditionOperator) -> Self {
        match op {
            ConditionOperator::Unrecognized(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A predicate over world state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCondition {
    /// Condition id.
    #[serde(default)]
    pub id: String,
    /// What the condition inspects.
    #[serde(rename = "type")]
    pub kind: ConditionKind,
    /// Variable, item, character, quest or scene id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    /// How the target is compared.
    pub operator: ConditionOperator,
    /// Operand for the comparison.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl RuleCondition {
    /// Create a condition without an operand.
    pub fn new(
        kind: ConditionKind,
        target_id: impl Into<String>,
        operator: ConditionOperator,
    ) -> Self {
        Self {
            id: String::new(),
            kind,
            target_id: Some(target_id.into()),
            operator,
            value: None,
        }
    }

    /// Set the comparison operand.
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// The target id, treating an empty string as absent.
    pub fn target(&self) -> Option<&str> {
        self.target_id.as_deref().filter(|t| !t.is_empty())
    }
}

/// How a choice combines its conditions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicOperator {
    /// Every condition must hold.
    #[default]
    #[serde(rename = "AND")]
    And,
    /// At least one condition must hold.
    #[serde(rename = "OR")]
    Or,
}

/// What an action does. Authored types the engine does not execute
/// (`set_flag`, `show_msg`, `use_item`, `set_timer`, ...) are kept verbatim
/// in `Unsupported`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    /// Add an item to the inventory.
    GiveItem,
    /// Take an item from the inventory.
    RemoveItem,
    /// Add to a numeric variable.
    ModVariable,
    /// Add to a relationship score.
    ModRelationship,
    /// Add a character to the party.
    JoinParty,
    /// Remove a character from the party.
    LeaveParty,
    /// Move to another scene.
    ChangeScene,
    /// Start the global track.
    PlaySound,
    /// Stop the global track.
    StopSound,
    /// Start a quest.
    StartQuest,
    /// Complete an active quest.
    EndQuest,
    /// Fail an active quest.
    FailQuest,
    /// Move an active quest to its next stage.
    AdvanceQuest,
    /// Any other authored type.
    Unsupported(String),
}

impl ActionKind {
    /// The authored name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::GiveItem => "give_item",
            Self::RemoveItem => "remove_item",
            Self::ModVariable => "mod_variable",
            Self::ModRelationship => "mod_relationship",
            Self::JoinParty => "join_party",
            Self::LeaveParty => "leave_party",
            Self::ChangeScene => "change_scene",
            Self::PlaySound => "play_sound",
            Self::StopSound => "stop_sound",
            Self::StartQuest => "start_quest",
            Self::EndQuest => "end_quest",
            Self::FailQuest => "fail_quest",
            Self::AdvanceQuest => "advance_quest",
            Self::Unsupported(s) => s,
        }
    }
}

impl From<String> for ActionKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "give_item" => Self::GiveItem,
            "remove_item" => Self::RemoveItem,
            "mod_variable" => Self::ModVariable,
            "mod_relationship" => Self::ModRelationship,
            "join_party" => Self::JoinParty,
            "leave_party" => Self::LeaveParty,
            "change_scene" => Self::ChangeScene,
            "play_sound" => Self::PlaySound,
            "stop_sound" => Self::StopSound,
            "start_quest" => Self::StartQuest,
            "end_quest" => Self::EndQuest,
            "fail_quest" => Self::FailQuest,
            "advance_quest" => Self::AdvanceQuest,
            _ => Self::Unsupported(s),
        }
    }
}

impl From<ActionKind> for String {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Unsupported(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declarative world-state mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleAction {
    /// Action id.
    #[serde(default)]
    pub id: String,
    /// What the action does.
    #[serde(rename = "type")]
    pub kind: ActionKind,
    /// Item, variable, character, scene, quest or track.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    /// Amount or other operand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl RuleAction {
    /// Create an action on a target.
    pub fn new(kind: ActionKind, target_id: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            kind,
            target_id: Some(target_id.into()),
            value: None,
        }
    }

    /// An action with no target, such as `stop_sound`.
    pub fn untargeted(kind: ActionKind) -> Self {
        Self {
            id: String::new(),
            kind,
            target_id: None,
            value: None,
        }
    }

    /// Set the operand.
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// The target id, treating an empty string as absent.
    pub fn target(&self) -> Option<&str> {
        self.target_id.as_deref().filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_authored_condition() {
        let json = r#"{"id":"c1","type":"variable","targetId":"sanity","operator":"gt","value":"50"}"#;
        let cond: RuleCondition = serde_json::from_str(json).unwrap();
        assert_eq!(cond.kind, ConditionKind::Variable);
        assert_eq!(cond.operator, ConditionOperator::Gt);
        assert_eq!(cond.target(), Some("sanity"));
        assert_eq!(cond.value, Some(Value::Text("50".into())));
    }

    #[test]
    fn unknown_kinds_are_preserved() {
        let json = r#"{"type":"time","operator":"before"}"#;
        let cond: RuleCondition = serde_json::from_str(json).unwrap();
        assert_eq!(cond.kind, ConditionKind::Unrecognized("time".into()));
        assert_eq!(
            cond.operator,
            ConditionOperator::Unrecognized("before".into())
        );
        assert_eq!(cond.target(), None);

        let back = serde_json::to_string(&cond).unwrap();
        assert!(back.contains(r#""type":"time""#));
    }

    #[test]
    fn unsupported_action_round_trips() {
        let json = r#"{"id":"a1","type":"show_msg","value":"hi"}"#;
        let action: RuleAction = serde_json::from_str(json).unwrap();
        assert_eq!(action.kind, ActionKind::Unsupported("show_msg".into()));
        assert_eq!(String::from(action.kind), "show_msg");
    }

    #[test]
    fn empty_target_is_absent() {
        let action = RuleAction::new(ActionKind::GiveItem, "");
        assert_eq!(action.target(), None);
    }

    #[test]
    fn logic_operator_uses_upper_case() {
        let op: LogicOperator = serde_json::from_str(r#""OR""#).unwrap();
        assert_eq!(op, LogicOperator::Or);
        assert_eq!(serde_json::to_string(&LogicOperator::And).unwrap(), r#""AND""#);
    }
}
