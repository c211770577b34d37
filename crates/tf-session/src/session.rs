//! Play session management.
//!
//! `Session` owns the authored project snapshot and the current
//! [`GameState`]. Every player operation hands the state to the engine,
//! runs a trigger sweep over the result, and swaps the swept state in.

use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use tf_core::{GameState, LogicOperator, Scene, StaticProject, Value};
use tf_engine::{ChoiceView, FiredTrigger, condition};

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::persist;
use crate::store::KeyValueStore;

/// What a player operation changed beyond the state itself.
#[derive(Debug, Clone, Default)]
pub struct TurnOutcome {
    /// Triggers fired by the sweep after the operation.
    pub fired: Vec<FiredTrigger>,
    /// Whether the current scene is different afterwards.
    pub scene_changed: bool,
}

/// An interactive play session over one project snapshot.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    project: Arc<StaticProject>,
    config: SessionConfig,
    initial: GameState,
    state: GameState,
}

impl Session {
    /// Start a session at the project's start scene.
    ///
    /// Variables take their authored defaults, the starting party joins,
    /// the global soundtrack starts, and triggers get one sweep before the
    /// player sees anything.
    pub fn start(
        project: impl Into<Arc<StaticProject>>,
        config: SessionConfig,
    ) -> SessionResult<Self> {
        let project = project.into();
        let start = project.start_scene_id.clone();
        if project.scene(&start).is_none() {
            return Err(SessionError::SceneMissing(start));
        }

        let mut state = GameState::at_scene(start);
        for variable in &project.variables {
            state.set_variable(variable.id.clone(), variable.initial_value());
        }
        for id in &project.starting_party {
            if project.character(id).is_some() {
                state.join_party(id);
            }
        }
        state.current_track_url = project.opening_track().map(str::to_string);

        let id = Uuid::new_v4();
        let initial = tf_engine::sweep(&state, &project, config.max_trigger_passes).state;
        info!(
            session = %id,
            project = %project.name,
            scene = %initial.current_scene_id,
            "session started"
        );

        Ok(Self {
            id,
            project,
            config,
            state: initial.clone(),
            initial,
        })
    }

    /// Unique id of this session, used in log spans.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Get the current game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Get the project snapshot.
    pub fn project(&self) -> &StaticProject {
        &self.project
    }

    /// The configuration the session runs with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The scene the player stands on.
    pub fn current_scene(&self) -> Option<&Scene> {
        tf_engine::current_scene(&self.state, &self.project)
    }

    /// Choices of the current scene with their availability.
    pub fn choices(&self) -> Vec<ChoiceView<'_>> {
        match self.current_scene() {
            Some(scene) => tf_engine::available_choices(scene, &self.state, &self.project),
            None => Vec::new(),
        }
    }

    /// Whether the story has nowhere left to go.
    pub fn is_over(&self) -> bool {
        self.current_scene().is_none_or(tf_engine::is_terminal)
    }

    /// Whether player input is blocked.
    pub fn is_paused(&self) -> bool {
        self.state.is_paused
    }

    /// Pick a choice of the current scene.
    #[instrument(skip(self), fields(session = %self.id))]
    pub fn choose(&mut self, choice_id: &str) -> SessionResult<TurnOutcome> {
        self.ensure_running()?;
        let scene = self
            .current_scene()
            .ok_or_else(|| SessionError::SceneMissing(self.state.current_scene_id.clone()))?;
        let choice = scene
            .choice(choice_id)
            .ok_or_else(|| SessionError::UnknownChoice(choice_id.to_string()))?;
        let next = tf_engine::resolve(choice, &self.state, &self.project)
            .ok_or_else(|| SessionError::ChoiceUnavailable(choice_id.to_string()))?;
        Ok(self.settle(next))
    }

    /// Use an item from the inventory: its use conditions must hold, its
    /// use actions run, and a consumable item is used up.
    #[instrument(skip(self), fields(session = %self.id))]
    pub fn use_item(&mut self, item_id: &str) -> SessionResult<TurnOutcome> {
        self.ensure_running()?;
        let item = self
            .project
            .item(item_id)
            .ok_or_else(|| SessionError::UnknownItem(item_id.to_string()))?;
        if !self.state.has_item(item_id) {
            return Err(SessionError::ItemNotHeld(item_id.to_string()));
        }
        let usable = item.is_usable
            && condition::evaluate_all(
                &item.use_conditions,
                LogicOperator::And,
                &self.state,
                &self.project,
            );
        if !usable {
            return Err(SessionError::ItemNotUsable(item_id.to_string()));
        }

        let mut next = tf_engine::apply(&item.use_actions, &self.state, &self.project);
        if item.is_consumable {
            next.remove_item(item_id);
        }
        Ok(self.settle(next))
    }

    /// Drop an item from the inventory.
    #[instrument(skip(self), fields(session = %self.id))]
    pub fn discard_item(&mut self, item_id: &str) -> SessionResult<TurnOutcome> {
        self.ensure_running()?;
        let item = self
            .project
            .item(item_id)
            .ok_or_else(|| SessionError::UnknownItem(item_id.to_string()))?;
        if !self.state.has_item(item_id) {
            return Err(SessionError::ItemNotHeld(item_id.to_string()));
        }
        if !item.is_discardable {
            return Err(SessionError::ItemNotDiscardable(item_id.to_string()));
        }
        let mut next = self.state.clone();
        next.remove_item(item_id);
        Ok(self.settle(next))
    }

    /// Block choices and item use until [`Session::resume`].
    pub fn pause(&mut self) {
        self.state.is_paused = true;
    }

    /// Unblock player input.
    pub fn resume(&mut self) {
        self.state.is_paused = false;
    }

    /// Return to the state the session started with.
    pub fn reset(&mut self) {
        self.state = self.initial.clone();
        info!(session = %self.id, "session reset");
    }

    /// Write the current state to `store` under the configured save key.
    #[instrument(skip(self, store), fields(session = %self.id, key = %self.config.save_key))]
    pub async fn save(&self, store: &dyn KeyValueStore) -> SessionResult<()> {
        let blob = persist::serialize(&self.state)?;
        store.set(&self.config.save_key, blob).await?;
        info!("game saved");
        Ok(())
    }

    /// Replace the current state with the one saved under the configured
    /// key. Returns `false` when nothing is saved there.
    #[instrument(skip(self, store), fields(session = %self.id, key = %self.config.save_key))]
    pub async fn load(&mut self, store: &dyn KeyValueStore) -> SessionResult<bool> {
        let Some(blob) = store.get(&self.config.save_key).await? else {
            return Ok(false);
        };
        let state =
            persist::deserialize(&blob).inspect_err(|e| warn!(error = %e, "unloadable save"))?;
        if self.project.scene(&state.current_scene_id).is_none() {
            warn!(scene = %state.current_scene_id, "save points at a scene this project lacks");
            return Err(SessionError::SceneMissing(state.current_scene_id));
        }
        self.state = state;
        info!("game loaded");
        Ok(true)
    }

    /// Run one debug command and describe what it did. Never fails.
    pub fn debug(&mut self, input: &str) -> String {
        crate::debug::run(self, input)
    }

    pub(crate) fn set_variable(&mut self, id: &str, value: Value) {
        self.state.set_variable(id, value);
    }

    /// Swap in the outcome of an engine operation after sweeping triggers.
    pub(crate) fn settle(&mut self, next: GameState) -> TurnOutcome {
        let sweep = tf_engine::sweep(&next, &self.project, self.config.max_trigger_passes);
        let scene_changed = sweep.state.current_scene_id != self.state.current_scene_id;
        self.state = sweep.state;
        TurnOutcome {
            fired: sweep.fired,
            scene_changed,
        }
    }

    fn ensure_running(&self) -> SessionResult<()> {
        if self.state.is_paused {
            Err(SessionError::Paused)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tf_core::{
        ActionKind, Character, CharacterTrigger, Choice, ConditionKind, ConditionOperator, Item,
        ProjectVariable, QuestStatus, RuleAction, RuleCondition,
    };

    use crate::store::MemoryStore;

    fn project() -> StaticProject {
        let mut project = StaticProject::new("Vault")
            .with_scene(
                Scene::new("s1", "A sealed door.")
                    .with_choice(
                        Choice::new("open", "Swipe the keycard")
                            .with_condition(RuleCondition::new(
                                ConditionKind::Item,
                                "keycard",
                                ConditionOperator::Has,
                            ))
                            .with_action(RuleAction::new(ActionKind::ChangeScene, "s2")),
                    )
                    .with_choice(
                        Choice::new("search", "Search the floor")
                            .with_action(RuleAction::new(ActionKind::GiveItem, "keycard"))
                            .with_action(
                                RuleAction::new(ActionKind::ModVariable, "sanity").with_value(-20),
                            ),
                    ),
            )
            .with_scene(Scene::new("s2", "The vault."))
            .with_item(Item::new("keycard"))
            .with_item(
                Item::new("pill")
                    .with_use_action(
                        RuleAction::new(ActionKind::ModVariable, "sanity").with_value(30),
                    )
                    .consumable(),
            )
            .with_item(Item::new("rock"))
            .with_variable(ProjectVariable::new("sanity", 100))
            .with_character(
                Character::new("mira").with_trigger(
                    CharacterTrigger::new("welcome")
                        .one_time()
                        .with_condition(RuleCondition::new(
                            ConditionKind::Scene,
                            "s2",
                            ConditionOperator::AtScene,
                        ))
                        .with_action(RuleAction::new(ActionKind::StartQuest, "loot")),
                ),
            )
            .with_quest(
                tf_core::Quest::new("loot").with_stage(tf_core::QuestStage::new("grab")),
            );
        project.starting_party = vec!["mira".into(), "nobody".into()];
        project.settings.global_soundtrack_url = Some("theme.ogg".into());
        project
    }

    fn session() -> Session {
        Session::start(project(), SessionConfig::default()).unwrap()
    }

    #[test]
    fn start_state() {
        let session = session();
        let state = session.state();
        assert_eq!(state.current_scene_id, "s1");
        assert_eq!(state.variable("sanity"), Some(&Value::Number(100.0)));
        assert_eq!(state.party, vec!["mira"]);
        assert_eq!(state.current_track_url.as_deref(), Some("theme.ogg"));
        assert!(state.history.is_empty());
    }

    #[test]
    fn start_resolves_soundtrack_asset() {
        let mut project = project().with_asset(tf_core::Asset::new("m1", "drone.ogg"));
        project.settings.global_soundtrack_url = None;
        project.settings.global_soundtrack_id = Some("m1".into());
        let session = Session::start(project, SessionConfig::default()).unwrap();
        assert_eq!(session.state().current_track_url.as_deref(), Some("drone.ogg"));
    }

    #[test]
    fn start_needs_a_start_scene() {
        let project = project().with_start_scene("void");
        assert!(matches!(
            Session::start(project, SessionConfig::default()),
            Err(SessionError::SceneMissing(id)) if id == "void"
        ));
    }

    #[test]
    fn keycard_walkthrough() {
        let mut session = session();
        assert!(matches!(
            session.choose("open"),
            Err(SessionError::ChoiceUnavailable(_))
        ));
        assert_eq!(session.state().current_scene_id, "s1");

        let outcome = session.choose("search").unwrap();
        assert!(!outcome.scene_changed);
        assert_eq!(session.state().variable("sanity"), Some(&Value::Number(80.0)));

        let outcome = session.choose("open").unwrap();
        assert!(outcome.scene_changed);
        assert_eq!(outcome.fired.len(), 1);
        assert_eq!(outcome.fired[0].trigger_id, "welcome");
        assert_eq!(session.state().current_scene_id, "s2");
        assert_eq!(session.state().history, vec!["s1"]);
        assert_eq!(session.state().quest_status("loot"), QuestStatus::Active);
        assert!(session.is_over());
    }

    #[test]
    fn unknown_choice() {
        let mut session = session();
        assert!(matches!(
            session.choose("fly"),
            Err(SessionError::UnknownChoice(id)) if id == "fly"
        ));
    }

    #[test]
    fn choice_listing() {
        let session = session();
        let views: Vec<_> = session
            .choices()
            .iter()
            .map(|v| (v.choice.id.clone(), v.available))
            .collect();
        assert_eq!(
            views,
            vec![("open".to_string(), false), ("search".to_string(), true)]
        );
    }

    #[test]
    fn paused_session_rejects_play() {
        let mut session = session();
        session.pause();
        assert!(session.is_paused());
        assert!(matches!(session.choose("search"), Err(SessionError::Paused)));
        session.resume();
        assert!(session.choose("search").is_ok());
    }

    #[test]
    fn reset_returns_to_start() {
        let mut session = session();
        session.choose("search").unwrap();
        session.choose("open").unwrap();
        session.reset();
        assert_eq!(session.state().current_scene_id, "s1");
        assert!(session.state().inventory.is_empty());
    }

    #[test]
    fn consumable_item_is_used_up() {
        let mut session = session();
        session.debug("give pill");
        session.use_item("pill").unwrap();
        assert_eq!(session.state().variable("sanity"), Some(&Value::Number(130.0)));
        assert!(!session.state().has_item("pill"));
    }

    #[test]
    fn item_rules() {
        let mut session = session();
        assert!(matches!(
            session.use_item("pill"),
            Err(SessionError::ItemNotHeld(_))
        ));
        assert!(matches!(
            session.use_item("ghost"),
            Err(SessionError::UnknownItem(_))
        ));

        session.debug("give rock");
        assert!(matches!(
            session.use_item("rock"),
            Err(SessionError::ItemNotUsable(_))
        ));
        session.discard_item("rock").unwrap();
        assert!(!session.state().has_item("rock"));
    }

    #[test]
    fn undiscardable_item_stays() {
        let mut project = project();
        project.items = project
            .items
            .iter()
            .cloned()
            .map(|mut item| {
                item.is_discardable = false;
                item
            })
            .collect();
        let mut session = Session::start(project, SessionConfig::default()).unwrap();
        session.debug("give rock");
        assert!(matches!(
            session.discard_item("rock"),
            Err(SessionError::ItemNotDiscardable(_))
        ));
    }

    #[tokio::test]
    async fn save_and_load_restore_state() {
        let store = MemoryStore::new();
        let mut session = session();
        assert!(!session.load(&store).await.unwrap());

        session.choose("search").unwrap();
        session.save(&store).await.unwrap();
        let saved = session.state().clone();

        session.choose("open").unwrap();
        assert!(session.load(&store).await.unwrap());
        assert_eq!(session.state(), &saved);
    }

    #[tokio::test]
    async fn load_rejects_foreign_scene() {
        let store = MemoryStore::new();
        store
            .set("quicksave", r#"{"currentSceneId": "elsewhere"}"#.into())
            .await
            .unwrap();
        let mut session = session();
        assert!(matches!(
            session.load(&store).await,
            Err(SessionError::SceneMissing(_))
        ));
        assert_eq!(session.state().current_scene_id, "s1");
    }
}
