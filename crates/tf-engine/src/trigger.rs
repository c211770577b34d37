//! Character trigger resolution.
//!
//! A sweep evaluates every character trigger against the state after a
//! batch of actions. Firing a trigger can enable others, so the sweep runs
//! repeated passes until one fires nothing or the pass limit is reached.
//! Each trigger fires at most once per sweep.

use std::collections::HashSet;

use tracing::debug;

use tf_core::{CharacterTrigger, GameState, LogicOperator, StaticProject};

use crate::{action, condition};

/// Passes per sweep when the caller has no preference.
pub const DEFAULT_MAX_PASSES: usize = 4;

/// A trigger that fired during a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredTrigger {
    /// Owner of the trigger.
    pub character_id: String,
    /// Trigger id.
    pub trigger_id: String,
}

/// The outcome of a sweep.
#[derive(Debug, Clone)]
pub struct TriggerSweep {
    /// State after every firing.
    pub state: GameState,
    /// Fired triggers in firing order.
    pub fired: Vec<FiredTrigger>,
}

/// Every trigger paired with its owning character id, highest priority
/// first. Equal priorities keep character order, then trigger order.
pub fn ordered_triggers(project: &StaticProject) -> Vec<(&str, &CharacterTrigger)> {
    let mut triggers: Vec<_> = project
        .characters
        .iter()
        .flat_map(|c| c.triggers.iter().map(move |t| (c.id.as_str(), t)))
        .collect();
    triggers.sort_by_key(|(_, t)| std::cmp::Reverse(t.priority));
    triggers
}

/// Run triggers against `state` for up to `max_passes` passes (at least one).
pub fn sweep(state: &GameState, project: &StaticProject, max_passes: usize) -> TriggerSweep {
    let candidates = ordered_triggers(project);
    let mut state = state.clone();
    let mut fired = Vec::new();
    let mut spent: HashSet<usize> = HashSet::new();

    for pass in 0..max_passes.max(1) {
        let mut fired_this_pass = false;
        for (index, (character_id, trigger)) in candidates.iter().enumerate() {
            if spent.contains(&index) {
                continue;
            }
            if trigger.is_one_time && state.has_triggered(&trigger.id) {
                continue;
            }
            if !condition::evaluate_all(&trigger.conditions, LogicOperator::And, &state, project) {
                continue;
            }

            debug!(character = %character_id, trigger = %trigger.id, pass, "trigger fired");
            state = action::apply(&trigger.actions, &state, project);
            if trigger.is_one_time {
                state.triggered_ids.insert(trigger.id.clone());
            }
            spent.insert(index);
            fired.push(FiredTrigger {
                character_id: (*character_id).to_string(),
                trigger_id: trigger.id.clone(),
            });
            fired_this_pass = true;
        }
        if !fired_this_pass {
            break;
        }
    }

    TriggerSweep { state, fired }
}
