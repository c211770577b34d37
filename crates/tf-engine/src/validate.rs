//! Structural validation of a story project.
//!
//! Validation is advisory: the engine runs any project and fails open on
//! what these checks report. Authoring tools show the issues; the CLI's
//! `check` command exits non-zero when any of them is an error.

use std::fmt;

use tf_core::{ActionKind, ConditionKind, RuleAction, RuleCondition, SceneType, StaticProject};

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Worth a look; play still works.
    Warning,
    /// Play will break.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A warning or error found during project validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Stable id, unique per finding.
    pub id: String,
    /// How bad it is.
    pub severity: Severity,
    /// The scene, quest, character, or item the issue belongs to.
    pub target_id: String,
    /// A human-readable description of the issue.
    pub message: String,
}

impl ValidationIssue {
    fn warning(id: String, target_id: &str, message: String) -> Self {
        Self {
            id,
            severity: Severity::Warning,
            target_id: target_id.to_string(),
            message,
        }
    }

    fn error(id: String, target_id: &str, message: String) -> Self {
        Self {
            id,
            severity: Severity::Error,
            target_id: target_id.to_string(),
            message,
        }
    }

    /// Whether this issue is an error.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.target_id, self.message)
    }
}

/// Whether any issue is an error.
pub fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(ValidationIssue::is_error)
}

/// Validate a project. Returns every issue found, errors and warnings
/// interleaved in discovery order.
pub fn validate_project(project: &StaticProject) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    validate_start_scene(project, &mut issues);
    validate_unique_ids(project, &mut issues);
    validate_scenes(project, &mut issues);
    validate_quests(project, &mut issues);
    validate_triggers(project, &mut issues);
    validate_items(project, &mut issues);
    validate_soundtrack(project, &mut issues);

    issues
}

fn validate_start_scene(project: &StaticProject, issues: &mut Vec<ValidationIssue>) {
    let start = project.start_scene_id.as_str();
    if start.is_empty() {
        issues.push(ValidationIssue::error(
            "err_start".to_string(),
            &project.id,
            "project has no start scene".to_string(),
        ));
    } else if project.scene(start).is_none() {
        issues.push(ValidationIssue::error(
            "err_start".to_string(),
            start,
            format!("start scene \"{start}\" does not exist"),
        ));
    }
}

fn validate_unique_ids(project: &StaticProject, issues: &mut Vec<ValidationIssue>) {
    let collections = [
        ("scene", project.scenes.duplicate_ids()),
        ("character", project.characters.duplicate_ids()),
        ("item", project.items.duplicate_ids()),
        ("quest", project.quests.duplicate_ids()),
        ("variable", project.variables.duplicate_ids()),
    ];
    for (kind, duplicates) in collections {
        for id in duplicates {
            issues.push(ValidationIssue::error(
                format!("err_dup_{kind}_{id}"),
                id,
                format!("duplicate {kind} id \"{id}\""),
            ));
        }
    }
    for quest in &project.quests {
        for id in quest.stages.duplicate_ids() {
            issues.push(ValidationIssue::error(
                format!("err_dup_stage_{}_{id}", quest.id),
                &quest.id,
                format!("quest \"{}\" has duplicate stage id \"{id}\"", quest.display_name()),
            ));
        }
    }
}

fn validate_scenes(project: &StaticProject, issues: &mut Vec<ValidationIssue>) {
    for scene in &project.scenes {
        if scene.scene_type == SceneType::Choice && scene.choices.len() < 2 {
            issues.push(ValidationIssue::warning(
                format!("err_ch_{}", scene.id),
                &scene.id,
                format!("Scene \"{}\" needs 2+ choices.", scene.display_name()),
            ));
        }
        for choice in &scene.choices {
            let rules = RuleSite {
                project,
                owner: &scene.id,
                site: "choice",
                site_id: Some(&choice.id),
            };
            rules.check_conditions(&choice.conditions, issues);
            rules.check_actions(&choice.actions, issues);
            rules.check_actions(&choice.else_actions, issues);
        }
    }
}

fn validate_quests(project: &StaticProject, issues: &mut Vec<ValidationIssue>) {
    for quest in &project.quests {
        if quest.stages.is_empty() {
            issues.push(ValidationIssue::error(
                format!("err_q_{}", quest.id),
                &quest.id,
                format!("Quest \"{}\" has no stages.", quest.display_name()),
            ));
            continue;
        }
        for id in &quest.initial_stage_ids {
            if quest.stage(id).is_none() {
                issues.push(ValidationIssue::warning(
                    format!("warn_q_{}_initial_{id}", quest.id),
                    &quest.id,
                    format!("initial stage \"{id}\" does not exist"),
                ));
            }
        }
        for stage in &quest.stages {
            for next in &stage.next_stage_ids {
                if quest.stage(next).is_none() {
                    issues.push(ValidationIssue::warning(
                        format!("warn_q_{}_{}_{next}", quest.id, stage.id),
                        &quest.id,
                        format!("stage \"{}\" leads to unknown stage \"{next}\"", stage.id),
                    ));
                }
            }
            let rules = RuleSite {
                project,
                owner: &quest.id,
                site: "stage",
                site_id: Some(&stage.id),
            };
            rules.check_conditions(&stage.conditions, issues);
            rules.check_actions(&stage.completion_actions, issues);
        }
    }
}

fn validate_triggers(project: &StaticProject, issues: &mut Vec<ValidationIssue>) {
    for character in &project.characters {
        for trigger in &character.triggers {
            let rules = RuleSite {
                project,
                owner: &character.id,
                site: "trigger",
                site_id: Some(&trigger.id),
            };
            rules.check_conditions(&trigger.conditions, issues);
            rules.check_actions(&trigger.actions, issues);
        }
    }
}

fn validate_items(project: &StaticProject, issues: &mut Vec<ValidationIssue>) {
    for item in &project.items {
        let rules = RuleSite {
            project,
            owner: &item.id,
            site: "use",
            site_id: None,
        };
        rules.check_conditions(&item.use_conditions, issues);
        rules.check_actions(&item.use_actions, issues);
    }
}

fn validate_soundtrack(project: &StaticProject, issues: &mut Vec<ValidationIssue>) {
    let Some(id) = project.settings.global_soundtrack_id.as_deref() else {
        return;
    };
    if project.settings.global_soundtrack_url.is_none() && project.asset(id).is_none() {
        issues.push(ValidationIssue::warning(
            "warn_soundtrack".to_string(),
            id,
            format!("soundtrack asset \"{id}\" does not exist"),
        ));
    }
}

/// Where a list of rules is authored, for reference checks.
struct RuleSite<'a> {
    project: &'a StaticProject,
    owner: &'a str,
    site: &'static str,
    site_id: Option<&'a str>,
}

impl RuleSite<'_> {
    fn check_conditions(&self, conditions: &[RuleCondition], issues: &mut Vec<ValidationIssue>) {
        for (n, condition) in conditions.iter().enumerate() {
            let Some(target) = condition.target() else {
                continue;
            };
            let (kind, known) = match &condition.kind {
                ConditionKind::Variable => ("variable", self.project.variable(target).is_some()),
                ConditionKind::Item => ("item", self.project.item(target).is_some()),
                ConditionKind::Relationship => {
                    ("character", self.project.character(target).is_some())
                }
                ConditionKind::Quest => ("quest", self.project.quest(target).is_some()),
                ConditionKind::Scene => ("scene", self.project.scene(target).is_some()),
                ConditionKind::Unrecognized(other) => {
                    issues.push(self.warn(
                        "cond",
                        n,
                        format!("condition type \"{other}\" is not evaluated and always holds"),
                    ));
                    continue;
                }
            };
            if !known {
                issues.push(self.warn(
                    "cond",
                    n,
                    format!("condition references unknown {kind} \"{target}\""),
                ));
            }
        }
    }

    fn check_actions(&self, actions: &[RuleAction], issues: &mut Vec<ValidationIssue>) {
        for (n, action) in actions.iter().enumerate() {
            let kind = match &action.kind {
                ActionKind::GiveItem | ActionKind::RemoveItem => "item",
                ActionKind::ModVariable => "variable",
                ActionKind::ModRelationship | ActionKind::JoinParty | ActionKind::LeaveParty => {
                    "character"
                }
                ActionKind::ChangeScene => "scene",
                ActionKind::StartQuest
                | ActionKind::EndQuest
                | ActionKind::FailQuest
                | ActionKind::AdvanceQuest => "quest",
                ActionKind::PlaySound | ActionKind::StopSound => continue,
                ActionKind::Unsupported(other) => {
                    issues.push(self.warn(
                        "act",
                        n,
                        format!("action type \"{other}\" is not supported and will be skipped"),
                    ));
                    continue;
                }
            };
            let Some(target) = action.target() else {
                issues.push(self.warn("act", n, format!("{} action has no target", action.kind)));
                continue;
            };
            let known = match kind {
                "item" => self.project.item(target).is_some(),
                "variable" => self.project.variable(target).is_some(),
                "character" => self.project.character(target).is_some(),
                "scene" => self.project.scene(target).is_some(),
                _ => self.project.quest(target).is_some(),
            };
            if !known {
                issues.push(self.warn(
                    "act",
                    n,
                    format!("{} references unknown {kind} \"{target}\"", action.kind),
                ));
            }
        }
    }

    fn warn(&self, rule: &str, n: usize, message: String) -> ValidationIssue {
        let (owner, site) = (self.owner, self.site);
        let (id, message) = match self.site_id {
            Some(site_id) => (
                format!("warn_{rule}_{owner}_{site}_{site_id}_{n}"),
                format!("{site} \"{site_id}\": {message}"),
            ),
            None => (
                format!("warn_{rule}_{owner}_{site}_{n}"),
                format!("{site}: {message}"),
            ),
        };
        ValidationIssue::warning(id, owner, message)
    }
}
