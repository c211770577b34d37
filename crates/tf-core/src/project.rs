use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Identified};
use crate::error::CoreResult;
use crate::rule::{LogicOperator, RuleAction, RuleCondition};
use crate::value::Value;

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// The authored story content, consumed read-only during a session.
///
/// Missing collections in the JSON default to empty, so partially authored
/// exports still load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaticProject {
    /// Project id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Scene a new session starts on.
    pub start_scene_id: String,
    /// Characters in the party when a session starts.
    pub starting_party: Vec<String>,
    /// Story nodes.
    pub scenes: Catalog<Scene>,
    /// Cast with relationship scores and triggers.
    pub characters: Catalog<Character>,
    /// Items the player can carry.
    pub items: Catalog<Item>,
    /// Quests and their stage graphs.
    pub quests: Catalog<Quest>,
    /// Declared variables with defaults.
    pub variables: Catalog<ProjectVariable>,
    /// Media referenced by id from the settings.
    pub assets: Catalog<Asset>,
    /// Playback settings.
    pub settings: ProjectSettings,
}

impl StaticProject {
    /// Create an empty project with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse a project from the authoring tool's JSON export.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Look up a scene by id.
    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.get(id)
    }

    /// Look up a quest by id.
    pub fn quest(&self, id: &str) -> Option<&Quest> {
        self.quests.get(id)
    }

    /// Look up a character by id.
    pub fn character(&self, id: &str) -> Option<&Character> {
        self.characters.get(id)
    }

    /// Look up an item by id.
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// Look up a variable declaration by id.
    pub fn variable(&self, id: &str) -> Option<&ProjectVariable> {
        self.variables.get(id)
    }

    /// Look up an asset by id.
    pub fn asset(&self, id: &str) -> Option<&Asset> {
        self.assets.get(id)
    }

    /// The track a new session starts with. A direct URL in the settings
    /// wins over a soundtrack asset id; an id with no matching asset starts
    /// nothing.
    pub fn opening_track(&self) -> Option<&str> {
        if let Some(url) = self.settings.global_soundtrack_url.as_deref() {
            return Some(url);
        }
        let id = self.settings.global_soundtrack_id.as_deref()?;
        self.asset(id).map(|asset| asset.data.as_str())
    }

    // -----------------------------------------------------------------------
    // Builders
    // -----------------------------------------------------------------------

    /// Add a scene. The first scene added becomes the start scene unless one
    /// is already set.
    pub fn with_scene(mut self, scene: Scene) -> Self {
        if self.start_scene_id.is_empty() {
            self.start_scene_id = scene.id.clone();
        }
        self.scenes.push(scene);
        self
    }

    /// Set the start scene explicitly.
    pub fn with_start_scene(mut self, id: impl Into<String>) -> Self {
        self.start_scene_id = id.into();
        self
    }

    /// Add a character.
    pub fn with_character(mut self, character: Character) -> Self {
        self.characters.push(character);
        self
    }

    /// Add an item.
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    /// Add a quest.
    pub fn with_quest(mut self, quest: Quest) -> Self {
        self.quests.push(quest);
        self
    }

    /// Declare a variable.
    pub fn with_variable(mut self, variable: ProjectVariable) -> Self {
        self.variables.push(variable);
        self
    }

    /// Add a media asset.
    pub fn with_asset(mut self, asset: Asset) -> Self {
        self.assets.push(asset);
        self
    }
}

/// Project-wide playback settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectSettings {
    /// Track URL that starts playing when a session starts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_soundtrack_url: Option<String>,
    /// Asset whose data is the opening track, as the authoring tool exports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_soundtrack_id: Option<String>,
    /// Whether the project has been published for players.
    pub is_published: bool,
}

/// A media asset. Only the id and the playable data are read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Asset {
    /// Asset id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL or data URI of the media.
    pub data: String,
}

impl Asset {
    /// Create an asset with the given playable data.
    pub fn new(id: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: data.into(),
            ..Self::default()
        }
    }
}

impl Identified for Asset {
    fn id(&self) -> &str {
        &self.id
    }
}

// ---------------------------------------------------------------------------
// Scenes
// ---------------------------------------------------------------------------

/// Descriptive scene type. It does not constrain navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneType {
    /// Plain narration.
    #[default]
    Normal,
    /// A scene that presents choices.
    Choice,
    /// An ending.
    End,
}

/// A narrative node with text content and outgoing choices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scene {
    /// Scene id.
    pub id: String,
    /// Heading shown above the content.
    pub title: String,
    /// Narrative text.
    pub content: String,
    /// Descriptive type.
    #[serde(rename = "type")]
    pub scene_type: SceneType,
    /// Background image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_url: Option<String>,
    /// Ambient sound for the scene.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ambient_url: Option<String>,
    /// Choices offered in authoring order.
    pub choices: Vec<Choice>,
    /// Free-form tags.
    pub tags: Vec<String>,
}

impl Scene {
    /// Create a scene with the given id and text.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the scene type.
    pub fn with_type(mut self, scene_type: SceneType) -> Self {
        self.scene_type = scene_type;
        self
    }

    /// Add a choice.
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Look up a choice of this scene by id.
    pub fn choice(&self, id: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == id)
    }

    /// The title if authored, otherwise the id.
    pub fn display_name(&self) -> &str {
        if self.title.is_empty() {
            &self.id
        } else {
            &self.title
        }
    }
}

impl Identified for Scene {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A player-selectable option gated by conditions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Choice {
    /// Choice id.
    pub id: String,
    /// Label shown to the player.
    pub text: String,
    /// Conditions gating the choice.
    pub conditions: Vec<RuleCondition>,
    /// How the conditions combine.
    pub logic_operator: LogicOperator,
    /// Actions applied when the choice is taken.
    pub actions: Vec<RuleAction>,
    /// Reserved by the authoring tool; never executed.
    pub else_actions: Vec<RuleAction>,
}

impl Choice {
    /// Create a choice with the given id and label.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Add a gating condition.
    pub fn with_condition(mut self, condition: RuleCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Set how the conditions combine.
    pub fn with_logic(mut self, logic: LogicOperator) -> Self {
        self.logic_operator = logic;
        self
    }

    /// Add an action.
    pub fn with_action(mut self, action: RuleAction) -> Self {
        self.actions.push(action);
        self
    }
}

// ---------------------------------------------------------------------------
// Quests
// ---------------------------------------------------------------------------

/// A quest and its stage graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Quest {
    /// Quest id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Journal description.
    pub description: String,
    /// Stage graph nodes.
    pub stages: Catalog<QuestStage>,
    /// Stages a started quest begins on.
    pub initial_stage_ids: Vec<String>,
}

impl Quest {
    /// Create a quest with no stages.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add a stage.
    pub fn with_stage(mut self, stage: QuestStage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Add an initial stage id.
    pub fn with_initial_stage(mut self, id: impl Into<String>) -> Self {
        self.initial_stage_ids.push(id.into());
        self
    }

    /// Look up a stage by id.
    pub fn stage(&self, id: &str) -> Option<&QuestStage> {
        self.stages.get(id)
    }

    /// Stages a fresh instance starts on: the authored initial stages, or
    /// the first stage when none are authored.
    pub fn entry_stage_ids(&self) -> Vec<String> {
        if self.initial_stage_ids.is_empty() {
            self.stages.first().map(|s| s.id.clone()).into_iter().collect()
        } else {
            self.initial_stage_ids.clone()
        }
    }

    /// The name, or the id when unnamed.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

impl Identified for Quest {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A node in a quest's progression graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestStage {
    /// Stage id, unique within its quest.
    pub id: String,
    /// Journal heading.
    pub title: String,
    /// Journal text.
    pub description: String,
    /// Authored completion conditions. Not evaluated.
    pub conditions: Vec<RuleCondition>,
    /// Authored completion actions. Not executed.
    pub completion_actions: Vec<RuleAction>,
    /// Successor stages; `advance` takes the first.
    pub next_stage_ids: Vec<String>,
}

impl QuestStage {
    /// Create a stage with no successors.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Add a successor stage id.
    pub fn with_next(mut self, id: impl Into<String>) -> Self {
        self.next_stage_ids.push(id.into());
        self
    }
}

impl Identified for QuestStage {
    fn id(&self) -> &str {
        &self.id
    }
}

// ---------------------------------------------------------------------------
// Characters
// ---------------------------------------------------------------------------

/// A member of the cast.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Character {
    /// Character id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Role in the story.
    pub role: String,
    /// Free-form description.
    pub description: String,
    /// Relationship score before any `mod_relationship` is applied.
    pub initial_relationship: f64,
    /// Automatic rules evaluated after every state change.
    pub triggers: Vec<CharacterTrigger>,
}

impl Character {
    /// Create a character with a neutral score.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the relationship score a session starts from.
    pub fn with_initial_relationship(mut self, value: f64) -> Self {
        self.initial_relationship = value;
        self
    }

    /// Add a trigger.
    pub fn with_trigger(mut self, trigger: CharacterTrigger) -> Self {
        self.triggers.push(trigger);
        self
    }

    /// The name, or the id when unnamed.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

impl Identified for Character {
    fn id(&self) -> &str {
        &self.id
    }
}

/// An automatic rule owned by a character.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CharacterTrigger {
    /// Trigger id, recorded once a one-time trigger fires.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Conditions, all of which must hold.
    pub conditions: Vec<RuleCondition>,
    /// Actions applied when the trigger fires.
    pub actions: Vec<RuleAction>,
    /// Whether the trigger fires at most once per playthrough.
    pub is_one_time: bool,
    /// Higher priorities are evaluated first.
    pub priority: i32,
}

impl CharacterTrigger {
    /// Create a repeatable trigger with no conditions.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Add a condition.
    pub fn with_condition(mut self, condition: RuleCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add an action.
    pub fn with_action(mut self, action: RuleAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Make the trigger fire only once.
    pub fn one_time(mut self) -> Self {
        self.is_one_time = true;
        self
    }

    /// Set the priority; higher fires first.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Something the player can carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    /// Item id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Whether the player can use it.
    pub is_usable: bool,
    /// Removed from the inventory after a successful use.
    pub is_consumable: bool,
    /// Whether the player can drop it.
    pub is_discardable: bool,
    /// Conditions that must hold for the item to be used.
    pub use_conditions: Vec<RuleCondition>,
    /// Actions executed when the item is used.
    pub use_actions: Vec<RuleAction>,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            description: String::new(),
            is_usable: false,
            is_consumable: false,
            is_discardable: true,
            use_conditions: Vec::new(),
            use_actions: Vec::new(),
        }
    }
}

impl Item {
    /// Create a plain, discardable item.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Make the item usable with the given effect.
    pub fn with_use_action(mut self, action: RuleAction) -> Self {
        self.is_usable = true;
        self.use_actions.push(action);
        self
    }

    /// Add a condition that must hold for the item to be used.
    pub fn with_use_condition(mut self, condition: RuleCondition) -> Self {
        self.use_conditions.push(condition);
        self
    }

    /// Make the item disappear after use.
    pub fn consumable(mut self) -> Self {
        self.is_consumable = true;
        self
    }

    /// The name, or the id when unnamed.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

impl Identified for Item {
    fn id(&self) -> &str {
        &self.id
    }
}

// ---------------------------------------------------------------------------
// Variables
// ---------------------------------------------------------------------------

/// Declared type of a project variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableType {
    /// `true` or `false`.
    Boolean,
    /// A number.
    #[default]
    Number,
    /// Text.
    String,
    /// A list of values.
    List,
    /// A countdown, stored as a number.
    Timer,
}

/// A declared story variable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectVariable {
    /// Variable id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub value_type: VariableType,
    /// Value a session starts with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    // Carried for the authoring tool; nothing consumes these yet.
    /// Whether the value expires. Not enforced.
    pub is_temporary: bool,
    /// Scene count before expiry. Not enforced.
    pub reset_after_scenes: u32,
}

impl ProjectVariable {
    /// Declare a variable, inferring its type from the default.
    pub fn new(id: impl Into<String>, default_value: impl Into<Value>) -> Self {
        let default_value = default_value.into();
        let value_type = match default_value {
            Value::Bool(_) => VariableType::Boolean,
            Value::Number(_) => VariableType::Number,
            Value::Text(_) => VariableType::String,
            Value::List(_) => VariableType::List,
        };
        Self {
            id: id.into(),
            value_type,
            default_value: Some(default_value),
            ..Self::default()
        }
    }

    /// The value a fresh session starts with.
    pub fn initial_value(&self) -> Value {
        if let Some(value) = &self.default_value {
            return value.clone();
        }
        match self.value_type {
            VariableType::Boolean => Value::Bool(false),
            VariableType::Number | VariableType::Timer => Value::Number(0.0),
            VariableType::String => Value::Text(String::new()),
            VariableType::List => Value::List(Vec::new()),
        }
    }
}

impl Identified for ProjectVariable {
    fn id(&self) -> &str {
        &self.id
    }
}
