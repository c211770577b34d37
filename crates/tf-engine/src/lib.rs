//! Narrative rule engine for Taleforge.
//!
//! Evaluates conditions, applies actions, resolves choices, drives quest
//! progression, and sweeps character triggers over a [`tf_core::GameState`].
//! Every operation takes the current state by reference and returns the
//! next one; nothing here mutates a caller's state or performs I/O.

pub mod action;
pub mod choice;
pub mod condition;
pub mod navigator;
pub mod quest;
pub mod trigger;
pub mod validate;

pub use action::apply;
pub use choice::{ChoiceView, available_choices, is_available, resolve};
pub use condition::{evaluate, evaluate_all};
pub use navigator::{current_scene, is_terminal, visited};
pub use quest::{QuestProgress, Transition, current_stages, quest_log};
pub use trigger::{DEFAULT_MAX_PASSES, FiredTrigger, TriggerSweep, ordered_triggers, sweep};
pub use validate::{Severity, ValidationIssue, has_errors, validate_project};
