//! Action processing.
//!
//! [`apply`] folds an action list over a copy of the state in author order
//! and returns the result as one batch. An action that cannot run is
//! skipped and the rest of the batch still applies. A batch that changes
//! the scene records the scene it started on in the history once.

use thiserror::Error;
use tracing::{debug, trace};

use tf_core::{ActionKind, GameState, RuleAction, StaticProject, Value};

use crate::navigator;
use crate::quest::{self, Transition};

/// Why an action was skipped.
#[derive(Debug, Error)]
enum Skip {
    #[error("no target")]
    NoTarget,
    #[error("unknown {0}")]
    UnknownTarget(&'static str),
    #[error("not numeric")]
    NotNumeric,
    #[error("unsupported action type")]
    Unsupported,
    #[error("{0}")]
    Quest(&'static str),
}

/// Apply `actions` to `state`, returning the new state.
pub fn apply(actions: &[RuleAction], state: &GameState, project: &StaticProject) -> GameState {
    let mut next = state.clone();
    for action in actions {
        match apply_one(action, &mut next, project) {
            Ok(()) => trace!(action = %action.kind, target = ?action.target_id, "action applied"),
            Err(reason) => debug!(
                action = %action.kind,
                target = ?action.target_id,
                %reason,
                "action skipped"
            ),
        }
    }
    navigator::record_transition(&mut next, &state.current_scene_id);
    next
}

fn apply_one(
    action: &RuleAction,
    state: &mut GameState,
    project: &StaticProject,
) -> Result<(), Skip> {
    match &action.kind {
        ActionKind::StopSound => {
            state.current_track_url = None;
            return Ok(());
        }
        ActionKind::Unsupported(_) => return Err(Skip::Unsupported),
        _ => {}
    }

    let target = action.target().ok_or(Skip::NoTarget)?;

    match &action.kind {
        ActionKind::GiveItem => {
            require(project.item(target).is_some(), "item")?;
            state.add_item(target);
        }
        ActionKind::RemoveItem => {
            require(project.item(target).is_some(), "item")?;
            state.remove_item(target);
        }
        ActionKind::ModVariable => {
            require(project.variable(target).is_some(), "variable")?;
            let current = state.variable(target).cloned().unwrap_or_default();
            let sum = add(&current, action.value.as_ref())?;
            state.set_variable(target, Value::Number(sum));
        }
        ActionKind::ModRelationship => {
            let character = project.character(target).ok_or(Skip::UnknownTarget("character"))?;
            let current = state
                .relationship(target)
                .unwrap_or(character.initial_relationship);
            let sum = add(&Value::Number(current), action.value.as_ref())?;
            state.relationships.insert(target.to_string(), sum);
        }
        ActionKind::JoinParty => {
            require(project.character(target).is_some(), "character")?;
            state.join_party(target);
        }
        ActionKind::LeaveParty => {
            require(project.character(target).is_some(), "character")?;
            state.leave_party(target);
        }
        ActionKind::ChangeScene => {
            require(project.scene(target).is_some(), "scene")?;
            state.current_scene_id = target.to_string();
        }
        ActionKind::PlaySound => {
            state.current_track_url = Some(target.to_string());
        }
        ActionKind::StartQuest => {
            let q = project.quest(target).ok_or(Skip::UnknownTarget("quest"))?;
            settle(quest::start(state, q))?;
        }
        ActionKind::AdvanceQuest => {
            let q = project.quest(target).ok_or(Skip::UnknownTarget("quest"))?;
            settle(quest::advance(state, q))?;
        }
        ActionKind::EndQuest => {
            require(project.quest(target).is_some(), "quest")?;
            settle(quest::complete(state, target))?;
        }
        ActionKind::FailQuest => {
            require(project.quest(target).is_some(), "quest")?;
            settle(quest::fail(state, target))?;
        }
        ActionKind::StopSound | ActionKind::Unsupported(_) => {}
    }
    Ok(())
}

fn require(found: bool, kind: &'static str) -> Result<(), Skip> {
    if found {
        Ok(())
    } else {
        Err(Skip::UnknownTarget(kind))
    }
}

fn settle(transition: Transition) -> Result<(), Skip> {
    match transition {
        Transition::Ignored(reason) => Err(Skip::Quest(reason)),
        _ => Ok(()),
    }
}

/// Numeric addition with coercion on both sides. A missing amount adds 0.
/// A sum that overflows to infinity leaves the value alone.
fn add(current: &Value, amount: Option<&Value>) -> Result<f64, Skip> {
    let base = current.as_number().ok_or(Skip::NotNumeric)?;
    let delta = match amount {
        Some(v) => v.as_number().ok_or(Skip::NotNumeric)?,
        None => 0.0,
    };
    let sum = base + delta;
    if sum.is_finite() {
        Ok(sum)
    } else {
        Err(Skip::NotNumeric)
    }
}
