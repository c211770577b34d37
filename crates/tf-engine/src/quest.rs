//! Quest progression.
//!
//! One instance per started quest. Status only moves forward:
//! `not_started → active → completed | failed`, and terminal instances
//! ignore every further transition.

use tf_core::{GameState, Quest, QuestStage, QuestState, QuestStatus, StaticProject};

/// What a quest transition did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The quest became active at its entry stages.
    Started,
    /// An already active quest was put back on its entry stages.
    Restarted,
    /// The stage pointer moved.
    Advanced {
        /// The stage now current.
        to: String,
    },
    /// The quest finished.
    Completed,
    /// The quest failed.
    Failed,
    /// Nothing changed.
    Ignored(&'static str),
}

pub(crate) fn start(state: &mut GameState, quest: &Quest) -> Transition {
    let status = state.quest_status(&quest.id);
    if status.is_terminal() {
        return Transition::Ignored("quest already finished");
    }
    let entry = quest.entry_stage_ids();
    if entry.is_empty() {
        return Transition::Ignored("quest has no stages");
    }
    state.quest_states.insert(
        quest.id.clone(),
        QuestState {
            status: QuestStatus::Active,
            current_stage_ids: entry,
        },
    );
    if status == QuestStatus::Active {
        Transition::Restarted
    } else {
        Transition::Started
    }
}

/// Move to the first successor of the first current stage, or complete the
/// quest when there is none. Branching takes one explicit `advance` per edge.
pub(crate) fn advance(state: &mut GameState, quest: &Quest) -> Transition {
    let Some(instance) = active_instance(state, &quest.id) else {
        return Transition::Ignored("quest is not active");
    };
    let next = instance
        .current_stage_ids
        .first()
        .and_then(|id| quest.stage(id))
        .and_then(|stage| stage.next_stage_ids.first())
        .cloned();

    match next {
        Some(to) => {
            instance.current_stage_ids = vec![to.clone()];
            Transition::Advanced { to }
        }
        None => {
            instance.status = QuestStatus::Completed;
            Transition::Completed
        }
    }
}

pub(crate) fn complete(state: &mut GameState, quest_id: &str) -> Transition {
    finish(state, quest_id, QuestStatus::Completed)
}

pub(crate) fn fail(state: &mut GameState, quest_id: &str) -> Transition {
    finish(state, quest_id, QuestStatus::Failed)
}

fn finish(state: &mut GameState, quest_id: &str, status: QuestStatus) -> Transition {
    let Some(instance) = active_instance(state, quest_id) else {
        return Transition::Ignored("quest is not active");
    };
    instance.status = status;
    if status == QuestStatus::Failed {
        Transition::Failed
    } else {
        Transition::Completed
    }
}

fn active_instance<'a>(state: &'a mut GameState, quest_id: &str) -> Option<&'a mut QuestState> {
    state
        .quest_states
        .get_mut(quest_id)
        .filter(|q| q.status == QuestStatus::Active)
}

/// The stages a quest instance currently points at. Dangling stage ids are
/// skipped.
pub fn current_stages<'a>(state: &GameState, quest: &'a Quest) -> Vec<&'a QuestStage> {
    state
        .quest(&quest.id)
        .map(|q| {
            q.current_stage_ids
                .iter()
                .filter_map(|id| quest.stage(id))
                .collect()
        })
        .unwrap_or_default()
}

/// A quest-log line for display.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestProgress {
    /// Quest id.
    pub quest_id: String,
    /// Display name.
    pub name: String,
    /// Current status.
    pub status: QuestStatus,
    /// Titles (or ids) of the current stages.
    pub stages: Vec<String>,
}

/// Every started quest in authoring order.
pub fn quest_log(state: &GameState, project: &StaticProject) -> Vec<QuestProgress> {
    project
        .quests
        .iter()
        .filter(|q| state.quest(&q.id).is_some())
        .map(|q| QuestProgress {
            quest_id: q.id.clone(),
            name: q.display_name().to_string(),
            status: state.quest_status(&q.id),
            stages: current_stages(state, q)
                .into_iter()
                .map(|s| {
                    if s.title.is_empty() {
                        s.id.clone()
                    } else {
                        s.title.clone()
                    }
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_stage_quest() -> Quest {
        Quest::new("Q")
            .with_stage(QuestStage::new("A").with_next("B"))
            .with_stage(QuestStage::new("B"))
            .with_initial_stage("A")
    }

    #[test]
    fn start_then_advance_to_completion() {
        let quest = two_stage_quest();
        let mut state = GameState::default();

        assert_eq!(start(&mut state, &quest), Transition::Started);
        assert_eq!(state.quest_status("Q"), QuestStatus::Active);
        assert_eq!(state.quest("Q").unwrap().current_stage_ids, vec!["A"]);

        assert_eq!(
            advance(&mut state, &quest),
            Transition::Advanced { to: "B".into() }
        );
        assert_eq!(state.quest("Q").unwrap().current_stage_ids, vec!["B"]);

        assert_eq!(advance(&mut state, &quest), Transition::Completed);
        assert_eq!(state.quest_status("Q"), QuestStatus::Completed);
    }

    #[test]
    fn terminal_quests_stay_terminal() {
        let quest = two_stage_quest();
        let mut state = GameState::default();
        start(&mut state, &quest);
        assert_eq!(fail(&mut state, "Q"), Transition::Failed);

        assert!(matches!(start(&mut state, &quest), Transition::Ignored(_)));
        assert!(matches!(advance(&mut state, &quest), Transition::Ignored(_)));
        assert!(matches!(complete(&mut state, "Q"), Transition::Ignored(_)));
        assert_eq!(state.quest_status("Q"), QuestStatus::Failed);
    }

    #[test]
    fn restart_resets_stage_pointer() {
        let quest = two_stage_quest();
        let mut state = GameState::default();
        start(&mut state, &quest);
        advance(&mut state, &quest);

        assert_eq!(start(&mut state, &quest), Transition::Restarted);
        assert_eq!(state.quest("Q").unwrap().current_stage_ids, vec!["A"]);
    }

    #[test]
    fn finishing_requires_an_instance() {
        let mut state = GameState::default();
        assert!(matches!(complete(&mut state, "Q"), Transition::Ignored(_)));
        assert!(state.quest("Q").is_none());
    }

    #[test]
    fn quest_without_stages_cannot_start() {
        let mut state = GameState::default();
        let quest = Quest::new("empty");
        assert!(matches!(start(&mut state, &quest), Transition::Ignored(_)));
        assert!(state.quest("empty").is_none());
    }

    #[test]
    fn branching_takes_first_edge() {
        let quest = Quest::new("fork")
            .with_stage(QuestStage::new("root").with_next("left").with_next("right"))
            .with_stage(QuestStage::new("left"))
            .with_stage(QuestStage::new("right"));
        let mut state = GameState::default();
        start(&mut state, &quest);
        advance(&mut state, &quest);
        assert_eq!(state.quest("fork").unwrap().current_stage_ids, vec!["left"]);
    }

    #[test]
    fn cyclic_stages_keep_advancing() {
        let quest = Quest::new("loop")
            .with_stage(QuestStage::new("day").with_next("night"))
            .with_stage(QuestStage::new("night").with_next("day"));
        let mut state = GameState::default();
        start(&mut state, &quest);
        for _ in 0..5 {
            advance(&mut state, &quest);
        }
        assert_eq!(state.quest_status("loop"), QuestStatus::Active);
        assert_eq!(state.quest("loop").unwrap().current_stage_ids, vec!["night"]);
    }

    #[test]
    fn log_lists_started_quests() {
        let project = StaticProject::new("Test")
            .with_quest(two_stage_quest().with_name("Escape"))
            .with_quest(Quest::new("other").with_stage(QuestStage::new("x")));
        let mut state = GameState::default();
        start(&mut state, project.quest("Q").unwrap());

        let log = quest_log(&state, &project);
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].name, "Escape");
        assert_eq!(log[0].stages, vec!["A"]);
    }
}
