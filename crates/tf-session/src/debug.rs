//! Debug console commands.
//!
//! A line of debug input is parsed into a [`DebugCommand`] and run against a
//! [`Session`]. Commands that change the world go through the action
//! processor and a trigger sweep like any choice would. The console always
//! answers with a line of text, even for input it does not understand.

use tf_core::{ActionKind, RuleAction, Value};

use crate::session::Session;

/// Quest transitions reachable from the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestOp {
    /// `quest start`
    Start,
    /// `quest advance`
    Advance,
    /// `quest complete`
    Complete,
    /// `quest fail`
    Fail,
}

impl QuestOp {
    fn parse(word: &str) -> Option<Self> {
        match word.to_lowercase().as_str() {
            "start" => Some(Self::Start),
            "advance" => Some(Self::Advance),
            "complete" => Some(Self::Complete),
            "fail" => Some(Self::Fail),
            _ => None,
        }
    }

    fn action(self) -> ActionKind {
        match self {
            Self::Start => ActionKind::StartQuest,
            Self::Advance => ActionKind::AdvanceQuest,
            Self::Complete => ActionKind::EndQuest,
            Self::Fail => ActionKind::FailQuest,
        }
    }
}

/// A parsed debug command.
#[derive(Debug, Clone, PartialEq)]
pub enum DebugCommand {
    /// `set <variableId> <value>`
    Set {
        /// Variable to overwrite.
        variable: String,
        /// The coerced literal.
        value: Value,
    },
    /// `get <variableId>`
    Get {
        /// Variable to read.
        variable: String,
    },
    /// `give <itemId>`
    Give {
        /// Item to add.
        item: String,
    },
    /// `take <itemId>`
    Take {
        /// Item to remove.
        item: String,
    },
    /// `goto <sceneId>`
    Goto {
        /// Destination scene.
        scene: String,
    },
    /// `quest start|advance|complete|fail <questId>`
    Quest {
        /// The transition to request.
        op: QuestOp,
        /// Quest to act on.
        quest: String,
    },
}

impl DebugCommand {
    /// Parse a command line. Surplus words after the last argument are
    /// ignored; missing arguments make the line unparseable.
    pub fn parse(input: &str) -> Option<Self> {
        let words: Vec<&str> = input.split_whitespace().collect();
        let cmd = words.first()?.to_lowercase();
        let arg = |n: usize| words.get(n).map(|w| (*w).to_string());

        let command = match cmd.as_str() {
            "set" => Self::Set {
                variable: arg(1)?,
                value: Value::from_literal(words.get(2)?),
            },
            "get" => Self::Get { variable: arg(1)? },
            "give" => Self::Give { item: arg(1)? },
            "take" => Self::Take { item: arg(1)? },
            "goto" => Self::Goto { scene: arg(1)? },
            "quest" => Self::Quest {
                op: QuestOp::parse(words.get(1)?)?,
                quest: arg(2)?,
            },
            _ => return None,
        };
        Some(command)
    }
}

/// Run one line of debug input against `session`.
pub(crate) fn run(session: &mut Session, input: &str) -> String {
    let Some(command) = DebugCommand::parse(input) else {
        let base = input
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_lowercase();
        return format!("Unknown: {base}");
    };

    match command {
        DebugCommand::Set { variable, value } => {
            let reply = format!("Variable {variable} set to {value}");
            session.set_variable(&variable, value);
            reply
        }
        DebugCommand::Get { variable } => match session.state().variable(&variable) {
            Some(value) => format!("Variable {variable} = {value}"),
            None => format!("Variable {variable} is not set"),
        },
        DebugCommand::Give { item } => {
            if session.project().item(&item).is_none() {
                return format!("No such item: {item}");
            }
            act(session, RuleAction::new(ActionKind::GiveItem, &item));
            format!("Gave {item}")
        }
        DebugCommand::Take { item } => {
            if !session.state().has_item(&item) {
                return format!("Not carrying {item}");
            }
            act(session, RuleAction::new(ActionKind::RemoveItem, &item));
            format!("Took {item}")
        }
        DebugCommand::Goto { scene } => {
            if session.project().scene(&scene).is_none() {
                return format!("No such scene: {scene}");
            }
            act(session, RuleAction::new(ActionKind::ChangeScene, &scene));
            format!("Moved to {}", session.state().current_scene_id)
        }
        DebugCommand::Quest { op, quest } => {
            if session.project().quest(&quest).is_none() {
                return format!("No such quest: {quest}");
            }
            act(session, RuleAction::new(op.action(), &quest));
            format!("Quest {quest}: {}", session.state().quest_status(&quest))
        }
    }
}

fn act(session: &mut Session, action: RuleAction) {
    let next = tf_engine::apply(&[action], session.state(), session.project());
    session.settle(next);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use tf_core::{Item, Quest, QuestStage, QuestStatus, Scene, StaticProject};

    fn session() -> Session {
        let project = StaticProject::new("Debug")
            .with_scene(Scene::new("s0", "Start"))
            .with_scene(Scene::new("s1", "Elsewhere"))
            .with_item(Item::new("torch"))
            .with_quest(
                Quest::new("Q")
                    .with_stage(QuestStage::new("A").with_next("B"))
                    .with_stage(QuestStage::new("B")),
            );
        Session::start(project, SessionConfig::default()).unwrap()
    }

    #[test]
    fn parse_commands() {
        assert_eq!(
            DebugCommand::parse("set sanity 5"),
            Some(DebugCommand::Set {
                variable: "sanity".into(),
                value: Value::Number(5.0),
            })
        );
        assert_eq!(
            DebugCommand::parse("QUEST Fail Q"),
            Some(DebugCommand::Quest {
                op: QuestOp::Fail,
                quest: "Q".into(),
            })
        );
        assert_eq!(DebugCommand::parse("set sanity"), None);
        assert_eq!(DebugCommand::parse("quest dance Q"), None);
        assert_eq!(DebugCommand::parse("   "), None);
    }

    #[test]
    fn set_coerces_values() {
        let mut session = session();
        assert_eq!(session.debug("set sanity 5"), "Variable sanity set to 5");
        assert_eq!(
            session.state().variable("sanity"),
            Some(&Value::Number(5.0))
        );

        assert_eq!(session.debug("set lit true"), "Variable lit set to true");
        assert_eq!(session.state().variable("lit"), Some(&Value::Bool(true)));

        assert_eq!(session.debug("set mood grim"), "Variable mood set to grim");
        assert_eq!(session.debug("get mood"), "Variable mood = grim");
        assert_eq!(session.debug("get nothing"), "Variable nothing is not set");
    }

    #[test]
    fn unknown_commands() {
        let mut session = session();
        assert_eq!(session.debug("Teleport home"), "Unknown: teleport");
        assert_eq!(session.debug("SET x"), "Unknown: set");
        assert_eq!(session.debug(""), "Unknown: ");
    }

    #[test]
    fn world_commands() {
        let mut session = session();
        assert_eq!(session.debug("give torch"), "Gave torch");
        assert!(session.state().has_item("torch"));
        assert_eq!(session.debug("give ghost"), "No such item: ghost");
        assert_eq!(session.debug("take torch"), "Took torch");
        assert_eq!(session.debug("take torch"), "Not carrying torch");

        assert_eq!(session.debug("goto s1"), "Moved to s1");
        assert_eq!(session.state().history, vec!["s0"]);
        assert_eq!(session.debug("goto void"), "No such scene: void");
    }

    #[test]
    fn quest_commands() {
        let mut session = session();
        assert_eq!(session.debug("quest start Q"), "Quest Q: active");
        assert_eq!(session.debug("quest advance Q"), "Quest Q: active");
        assert_eq!(session.debug("quest advance Q"), "Quest Q: completed");
        assert_eq!(session.debug("quest fail Q"), "Quest Q: completed");
        assert_eq!(session.state().quest_status("Q"), QuestStatus::Completed);
        assert_eq!(session.debug("quest start nope"), "No such quest: nope");
    }
}
