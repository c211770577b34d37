//! Core types for Taleforge: story projects, rules, values, and game state.
//!
//! This crate defines the data model that the rule engine evaluates. It holds
//! no behavior beyond lookups and small state helpers. You can construct a
//! [`StaticProject`] programmatically or deserialize one from the JSON the
//! authoring tool exports.

/// Id-keyed arenas used for every authored collection.
pub mod catalog;
/// Error types used throughout the crate.
pub mod error;
/// The authored story content: scenes, quests, characters, items, variables.
pub mod project;
/// Conditions and actions attached to choices, triggers, stages, and items.
pub mod rule;
/// Session-scoped world state.
pub mod state;
/// Dynamic authored values and their coercions.
pub mod value;

/// Re-export the arena type.
pub use catalog::{Catalog, Identified};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export project model types.
pub use project::{
    Asset, Character, CharacterTrigger, Choice, Item, ProjectSettings, ProjectVariable, Quest,
    QuestStage, Scene, SceneType, StaticProject, VariableType,
};
/// Re-export rule types.
pub use rule::{
    ActionKind, ConditionKind, ConditionOperator, LogicOperator, RuleAction, RuleCondition,
};
/// Re-export state types.
pub use state::{GameState, QuestState, QuestStatus};
/// Re-export the value type.
pub use value::Value;
