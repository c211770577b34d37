use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

pub fn run(file: &Path) -> Result<(), String> {
    let project = super::load_project(file)?;

    println!("  {}", project.name.bold());
    if !project.description.is_empty() {
        println!("  {}", project.description.dimmed());
    }
    println!("  start: {}", project.start_scene_id);
    println!();

    let mut scenes = Table::new();
    scenes.set_content_arrangement(ContentArrangement::Dynamic);
    scenes.set_header(vec!["Scene", "Title", "Type", "Choices"]);
    for scene in &project.scenes {
        let kind = format!("{:?}", scene.scene_type).to_lowercase();
        scenes.add_row(vec![
            scene.id.clone(),
            scene.title.clone(),
            kind,
            scene.choices.len().to_string(),
        ]);
    }
    println!("{scenes}");

    if !project.quests.is_empty() {
        println!();
        let mut quests = Table::new();
        quests.set_content_arrangement(ContentArrangement::Dynamic);
        quests.set_header(vec!["Quest", "Name", "Stages"]);
        for quest in &project.quests {
            quests.add_row(vec![
                quest.id.clone(),
                quest.display_name().to_string(),
                quest.stages.len().to_string(),
            ]);
        }
        println!("{quests}");
    }

    if !project.characters.is_empty() {
        println!();
        let mut cast = Table::new();
        cast.set_content_arrangement(ContentArrangement::Dynamic);
        cast.set_header(vec!["Character", "Name", "Triggers"]);
        for character in &project.characters {
            cast.add_row(vec![
                character.id.clone(),
                character.display_name().to_string(),
                character.triggers.len().to_string(),
            ]);
        }
        println!("{cast}");
    }

    println!();
    println!(
        "  {}, {}, {}",
        super::plural(project.items.len(), "item"),
        super::plural(project.variables.len(), "variable"),
        super::plural(project.scenes.len(), "scene"),
    );

    Ok(())
}
