//! Integration tests for file-based save storage.
use tf_core::{StaticProject, Value};
use tf_session::{FileStore, KeyValueStore, Session, SessionConfig};

const PROJECT: &str = r#"{
    "id": "p1",
    "name": "Cellar",
    "startSceneId": "top",
    "scenes": [
        {
            "id": "top",
            "title": "Stairs",
            "content": "Steps lead down into the dark.",
            "type": "normal",
            "choices": [
                {
                    "id": "down",
                    "text": "Descend",
                    "conditions": [],
                    "logicOperator": "AND",
                    "actions": [
                        {"id": "a1", "type": "change_scene", "targetId": "bottom"},
                        {"id": "a2", "type": "mod_variable", "targetId": "courage", "value": -1}
                    ]
                }
            ]
        },
        {"id": "bottom", "title": "Cellar", "content": "Cold stone.", "type": "end", "choices": []}
    ],
    "variables": [{"id": "courage", "name": "Courage", "type": "number", "defaultValue": 3}]
}"#;

fn session(dir: &std::path::Path) -> (Session, FileStore) {
    let project = StaticProject::from_json(PROJECT).unwrap();
    let config = SessionConfig::default().with_save_key("slot_1");
    (
        Session::start(project, config).unwrap(),
        FileStore::new(dir.join("saves")),
    )
}

#[tokio::test]
async fn save_survives_a_new_session() {
    let dir = tempfile::TempDir::new().unwrap();

    let (mut first, store) = session(dir.path());
    first.choose("down").unwrap();
    first.save(&store).await.unwrap();
    assert!(dir.path().join("saves/slot_1.json").exists());

    let (mut second, store) = session(dir.path());
    assert_eq!(second.state().current_scene_id, "top");
    assert!(second.load(&store).await.unwrap());
    assert_eq!(second.state(), first.state());
    assert_eq!(
        second.state().variable("courage"),
        Some(&Value::Number(2.0))
    );
    assert!(second.is_over());
}

#[tokio::test]
async fn empty_slot_loads_nothing() {
    let dir = tempfile::TempDir::new().unwrap();
    let (mut session, store) = session(dir.path());
    assert!(!session.load(&store).await.unwrap());
    assert_eq!(session.state().current_scene_id, "top");
}

#[tokio::test]
async fn corrupt_save_is_reported() {
    let dir = tempfile::TempDir::new().unwrap();
    let (mut session, store) = session(dir.path());
    store.set("slot_1", "{ nope".into()).await.unwrap();
    assert!(session.load(&store).await.is_err());
    assert_eq!(session.state().current_scene_id, "top");
}
