//! Choice resolution.

use tracing::debug;

use tf_core::{Choice, GameState, Scene, StaticProject};

use crate::{action, condition};

/// Whether the choice's conditions hold under its logic operator.
pub fn is_available(choice: &Choice, state: &GameState, project: &StaticProject) -> bool {
    condition::evaluate_all(&choice.conditions, choice.logic_operator, state, project)
}

/// Resolve a choice into the next state. Availability is re-checked here;
/// `None` means the choice was unavailable and nothing changed.
///
/// `else_actions` are never run.
pub fn resolve(choice: &Choice, state: &GameState, project: &StaticProject) -> Option<GameState> {
    if !is_available(choice, state, project) {
        debug!(choice = %choice.id, "choice unavailable");
        return None;
    }
    Some(action::apply(&choice.actions, state, project))
}

/// A choice paired with its current availability.
#[derive(Debug, Clone, Copy)]
pub struct ChoiceView<'a> {
    /// The authored choice.
    pub choice: &'a Choice,
    /// Whether its conditions hold now.
    pub available: bool,
}

/// Every choice of `scene` in authored order, unavailable ones included.
pub fn available_choices<'a>(
    scene: &'a Scene,
    state: &GameState,
    project: &StaticProject,
) -> Vec<ChoiceView<'a>> {
    scene
        .choices
        .iter()
        .map(|choice| ChoiceView {
            choice,
            available: is_available(choice, state, project),
        })
        .collect()
}
