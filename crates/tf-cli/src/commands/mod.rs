pub mod check;
pub mod play;
pub mod show;

use std::fs;
use std::path::Path;

use tf_core::StaticProject;
use tracing::debug;

/// Read and parse a project file.
fn load_project(file: &Path) -> Result<StaticProject, String> {
    let json = fs::read_to_string(file)
        .map_err(|e| format!("cannot read {}: {e}", file.display()))?;
    let project =
        StaticProject::from_json(&json).map_err(|e| format!("{}: {e}", file.display()))?;
    debug!(
        path = %file.display(),
        scenes = project.scenes.len(),
        quests = project.quests.len(),
        "project loaded"
    );
    Ok(project)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}
