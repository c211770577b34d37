use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use tf_engine::{Severity, validate_project};

pub fn run(file: &Path) -> Result<(), String> {
    let project = super::load_project(file)?;
    let issues = validate_project(&project);

    if issues.is_empty() {
        println!("  All checks passed for '{}'.", project.name);
        println!(
            "  {}, {}, {}",
            super::plural(project.scenes.len(), "scene"),
            super::plural(project.quests.len(), "quest"),
            super::plural(project.characters.len(), "character"),
        );
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Level", "Target", "Issue"]);
    for issue in &issues {
        let level = match issue.severity {
            Severity::Error => "error".red().bold().to_string(),
            Severity::Warning => "warning".yellow().to_string(),
        };
        table.add_row(vec![level, issue.target_id.clone(), issue.message.clone()]);
    }
    println!("{table}");

    let errors = issues.iter().filter(|i| i.is_error()).count();
    let warnings = issues.len() - errors;
    println!();
    println!(
        "  {}, {}",
        super::plural(errors, "error"),
        super::plural(warnings, "warning")
    );

    if errors > 0 {
        Err("validation failed with errors".into())
    } else {
        Ok(())
    }
}
