//! Scene navigation over the id-keyed scene graph.

use tf_core::{GameState, Scene, StaticProject};

/// The scene the state is positioned at, if it exists in the project.
pub fn current_scene<'a>(state: &GameState, project: &'a StaticProject) -> Option<&'a Scene> {
    project.scene(&state.current_scene_id)
}

/// Push `departed` onto the history if the state has since moved elsewhere.
///
/// The action processor calls this once per batch with the scene the batch
/// started on, so scenes passed through mid-batch never reach the history.
pub(crate) fn record_transition(state: &mut GameState, departed: &str) {
    if !departed.is_empty() && state.current_scene_id != departed {
        state.history.push(departed.to_string());
    }
}

/// Whether the scene is current or was ever left behind.
pub fn visited(state: &GameState, scene_id: &str) -> bool {
    state.current_scene_id == scene_id || state.history.iter().any(|s| s == scene_id)
}

/// Whether nothing can follow this scene. The `end` type is only a hint for
/// the UI; an end scene with authored choices still offers them.
pub fn is_terminal(scene: &Scene) -> bool {
    scene.choices.is_empty()
}
