//! Unit tests for documents, field edits, the outline and sessions.
mod common;
use atlas::document::{ModelBinding, StoreType};
use atlas::edit::resolve;
use atlas::prelude::*;
use common::*;
use serde_json::json;

#[test]
fn test_document_parse_errors() {
    assert!(matches!(
        Document::from_json("{not json"),
        Err(DocumentError::JsonParse(_))
    ));
    assert!(matches!(
        Document::from_json("[1, 2]"),
        Err(DocumentError::JsonParse(_))
    ));
    assert_eq!(
        Document::from_json(r#"{"data": {}}"#).unwrap_err(),
        DocumentError::MissingField("type")
    );
    assert_eq!(
        Document::from_json(r#"{"type": "pool", "data": null}"#).unwrap_err(),
        DocumentError::MissingField("data")
    );
}

#[test]
fn test_document_kind_from_tag() {
    assert_eq!(simple_pool().kind(), DocumentKind::Pool);
    assert_eq!(
        Document::new("swarm", json!({})).kind(),
        DocumentKind::Unknown("swarm".to_string())
    );
    assert_eq!(DocumentKind::Collection.to_string(), "collection");
}

#[test]
fn test_typed_views_over_payload() {
    let document = complex_pool();
    let router = &document.data["router"];
    let binding = ModelBinding::of_payload(router).unwrap();
    assert_eq!(binding.model_name, "llama-3.2-70b-instruct");
    assert_eq!(binding.to_string(), "Groq/llama-3.2-70b-instruct");

    assert_eq!(
        StoreType::of_payload(&document.data["history"]),
        Some(StoreType::Sqlite)
    );
    assert_eq!(StoreType::from_tag("PostgreSQLHistoryStore"), Some(StoreType::Postgresql));
    assert_eq!(StoreType::from_tag("mongo"), None);
}

#[test]
fn test_resolve_maps_ids_to_subtrees() {
    let document = complex_pool();

    assert_eq!(resolve(&document, "pool-root"), Some(&document.data));
    assert_eq!(resolve(&document, "router-main"), Some(&document.data["router"]));
    assert_eq!(resolve(&document, "agent-3"), Some(&document.data["agents"][3]));
    assert_eq!(
        resolve(&document, "agent-1-tool-2"),
        Some(&document.data["agents"][1]["tools"][2])
    );
    assert_eq!(
        resolve(&document, "agent-1-history"),
        Some(&document.data["agents"][1]["history"])
    );
    assert_eq!(
        resolve(&document, "pool-root-history"),
        Some(&document.data["history"])
    );
    assert_eq!(resolve(&document, "agent-0-history"), None);
    assert_eq!(resolve(&document, "agent-9"), None);
    assert_eq!(resolve(&document, "agent-root"), None);
}

#[test]
fn test_apply_field_edit_sets_nested_fields() {
    let mut document = simple_pool();
    apply_field_edit(&mut document, "agent-0", "model.model_name", json!("gpt-4o")).unwrap();
    apply_field_edit(&mut document, "agent-0-tool-0", "name", json!("lookup")).unwrap();

    assert_eq!(
        document.data["agents"][0]["model"],
        json!({"model_name": "gpt-4o"})
    );
    assert_eq!(document.data["agents"][0]["tools"][0]["name"], json!("lookup"));

    let graph = synthesize(&document);
    assert_eq!(graph.node("agent-0-tool-0").unwrap().label, "lookup");
}

#[test]
fn test_apply_field_edit_replaces_null_intermediates() {
    let mut document = Document::new("agent", json!({"name": "Solo", "model": null}));
    apply_field_edit(&mut document, "agent-root", "model.type", json!("OpenAIModel")).unwrap();
    assert_eq!(document.data["model"], json!({"type": "OpenAIModel"}));
}

#[test]
fn test_apply_field_edit_errors() {
    let mut document = simple_pool();

    assert_eq!(
        apply_field_edit(&mut document, "agent-7", "name", json!("x")),
        Err(EditError::NodeNotFound("agent-7".to_string()))
    );
    assert_eq!(
        apply_field_edit(&mut document, "agent-0", "", json!("x")),
        Err(EditError::EmptyFieldPath)
    );
    assert_eq!(
        apply_field_edit(&mut document, "agent-0", "model..name", json!("x")),
        Err(EditError::EmptyFieldPath)
    );
    assert!(matches!(
        apply_field_edit(&mut document, "agent-0", "name.first", json!("x")),
        Err(EditError::NotAnObject { .. })
    ));
    // Failed edits leave the document untouched.
    assert_eq!(document, simple_pool());
}

#[test]
fn test_outline_of_complex_pool() {
    let tree = outline(&complex_pool());

    assert_eq!(tree.id, "pool-root");
    assert_eq!(tree.kind, NodeKind::Pool);
    // router, four agents, pool history
    assert_eq!(tree.children.len(), 6);
    assert_eq!(tree.count(), synthesize(&complex_pool()).nodes.len());

    let router = tree.find("router-main").unwrap();
    assert_eq!(router.label, "Orchestrator");
    assert_eq!(router.detail.as_deref(), Some("Groq/llama-3.2-70b-instruct"));

    let history = tree.find("agent-1-history").unwrap();
    assert_eq!(history.kind, NodeKind::History);
    assert_eq!(history.detail.as_deref(), Some("File"));

    let tool = tree.find("agent-3-tool-0").unwrap();
    assert_eq!(tool.label, "generate_image");
    assert!(tool.children.is_empty());
}

#[test]
fn test_outline_ids_match_synthesized_ids() {
    let document = complex_pool();
    let tree = outline(&document);
    for node in synthesize(&document).nodes {
        assert!(tree.find(&node.id).is_some(), "{} missing from outline", node.id);
    }
}

#[test]
fn test_outline_of_other_documents() {
    let agent = outline(&Document::new("agent", agent_json("Solo", &["a"])));
    assert_eq!(agent.id, "agent-root");
    assert_eq!(agent.label, "Solo");
    assert!(agent.find("agent-root-tool-0").is_some());

    let unknown = outline(&Document::new("swarm", json!({})));
    assert_eq!(unknown.id, "unknown");
    assert!(unknown.children.is_empty());
}

#[test]
fn test_session_tab_lifecycle() {
    let mut session = Session::new();
    let first = session.open("first", simple_pool());
    let second = session.open("second", routed_pool());
    let third = session.open("third", complex_pool());
    assert_eq!(session.active.as_deref(), Some(third.as_str()));
    assert_ne!(first, second);

    session.activate(&first).unwrap();
    session.close(&first).unwrap();
    // The last remaining tab takes over, not the one that slid into the slot.
    assert_eq!(session.active_tab().unwrap().id, third);

    // Closing an inactive tab keeps the active one.
    session.close(&second).unwrap();
    assert_eq!(session.active_tab().unwrap().id, third);

    session.close(&third).unwrap();
    assert!(session.active_tab().is_none());
    assert_eq!(
        session.close(&third).unwrap_err(),
        SessionError::TabNotFound(third.clone())
    );
}

#[test]
fn test_session_restores_saved_layout() {
    let atlas = Atlas::default();
    let mut session = Session::new();
    let id = session.open("pool", simple_pool());

    let mut graph = session.render(&id, &atlas).unwrap();
    graph.nodes[1].position = Position::new(600, 600);
    session.save_layout(&id, graph).unwrap();

    session
        .edit_field(&id, "agent-0", "name", json!("Renamed"))
        .unwrap();
    let restored = session.render(&id, &atlas).unwrap();

    let agent = restored.node("agent-0").unwrap();
    assert_eq!(agent.position, Position::new(600, 600));
    assert_eq!(agent.label, "Renamed");

    let active = session.render_active(&atlas).unwrap().unwrap();
    assert_eq!(active, restored);
    assert!(Session::new().render_active(&atlas).is_none());
}

#[test]
fn test_session_edit_errors_surface() {
    let mut session = Session::new();
    let id = session.open("pool", simple_pool());
    assert!(matches!(
        session.edit_field(&id, "router-main", "name", json!("x")),
        Err(SessionError::Edit(EditError::NodeNotFound(_)))
    ));
    assert!(matches!(
        session.edit_field("nope", "agent-0", "name", json!("x")),
        Err(SessionError::TabNotFound(_))
    ));
}

#[test]
fn test_session_persists_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let path = path.to_str().unwrap();

    let mut session = Session::new();
    let id = session.open("pool", complex_pool());
    let graph = session.render(&id, &Atlas::default()).unwrap();
    session.save_layout(&id, graph).unwrap();
    session.save(path).unwrap();

    let loaded = Session::load(path).unwrap();
    assert_eq!(loaded, session);
}

#[test]
fn test_session_accepts_data_alias() {
    let json = r#"{
        "tabs": [{"id": "t1", "name": "legacy", "data": {"type": "agent", "data": {"name": "Solo"}}}],
        "active": "t1"
    }"#;
    let session = Session::from_json(json).unwrap();
    let tab = session.active_tab().unwrap();
    assert_eq!(tab.document.kind(), DocumentKind::Agent);
    assert!(tab.layout.is_none());
}

#[test]
fn test_open_file() {
    let dir = tempfile::tempdir().unwrap();
    let pear = dir.path().join("research.pear");
    std::fs::write(&pear, simple_pool().to_value().to_string()).unwrap();
    let text = dir.path().join("notes.txt");
    std::fs::write(&text, "{}").unwrap();
    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, r#"{"type": "pool"}"#).unwrap();

    let mut session = Session::new();
    let id = session.open_file(pear.to_str().unwrap()).unwrap();
    assert_eq!(session.tab(&id).unwrap().name, "research");

    assert!(matches!(
        session.open_file(text.to_str().unwrap()),
        Err(SessionError::UnsupportedFile(_))
    ));
    assert_eq!(
        session.open_file(broken.to_str().unwrap()).unwrap_err(),
        SessionError::Document(DocumentError::MissingField("data"))
    );
    assert!(matches!(
        session.open_file(dir.path().join("missing.pear").to_str().unwrap()),
        Err(SessionError::Io(_))
    ));
    assert_eq!(session.tabs.len(), 1);
}

#[test]
fn test_canvas_saved_layout_loads() {
    let layout = r#"{
        "nodes": [
            {"id": "pool-root", "type": "pool", "data": {"label": null}, "position": {"x": 0, "y": 0}},
            {"id": "agent-0", "type": "agent", "data": {"label": "A", "originalData": {"name": "A"}},
             "position": {"x": 120, "y": 240.4}, "measured": {"width": 320, "height": 100}},
            {"id": "agent-0-tool-1", "type": "tool", "data": {"label": "T2"}, "position": {"x": 144, "y": 480}}
        ],
        "edges": [
            {"id": "e-pool-root-agent-0", "source": "pool-root", "target": "agent-0",
             "sourceHandle": null, "type": "smoothstep", "animated": true},
            {"id": "e-agent-0-agent-0-tool-1", "source": "agent-0", "target": "agent-0-tool-1",
             "sourceHandle": "left-tool-source", "type": "smoothstep"}
        ]
    }"#;

    let graph: Graph = serde_json::from_str(layout).unwrap();
    let agent = graph.node("agent-0").unwrap();
    assert_eq!(agent.kind, NodeKind::Agent);
    assert_eq!(agent.position, Position::new(120, 240));
    assert_eq!(graph.nodes[2].kind, NodeKind::Tool);
    assert!(graph.nodes[2].anchor.is_none());
    assert_eq!(graph.edges[1].source_handle, Some(SourceHandle::Tool));

    // Restored positions survive a re-render of the tab's document.
    let restored = Atlas::default().rerender(&simple_pool(), &graph.nodes);
    assert_eq!(position_of(&restored.nodes, "agent-0"), Position::new(120, 240));
    assert_eq!(position_of(&restored.nodes, "agent-0-tool-1"), Position::new(144, 480));
    assert_eq!(position_of(&restored.nodes, "agent-0-tool-0"), Position::new(24, 408));
}

#[test]
fn test_session_accepts_bare_tab_array() {
    let json = format!(
        r#"[
            {{"id": "1700000000000", "name": "research", "data": {document},
              "layout": {{"nodes": [{{"id": "agent-0", "type": "agent", "data": {{}},
                                      "position": {{"x": 480, "y": 48}}}}], "edges": []}}}},
            {{"id": "1700000000001", "name": "solo", "data": {{"type": "agent", "data": {{"name": "Solo"}}}}}}
        ]"#,
        document = simple_pool().to_value()
    );

    let session = Session::from_json(&json).unwrap();
    assert_eq!(session.tabs.len(), 2);
    assert_eq!(session.active.as_deref(), Some("1700000000000"));

    let graph = session.render_active(&Atlas::default()).unwrap().unwrap();
    assert_eq!(position_of(&graph.nodes, "agent-0"), Position::new(480, 48));
    assert_eq!(position_of(&graph.nodes, "pool-root"), Position::new(0, 0));

    assert!(Session::from_json("[]").unwrap().active.is_none());
    assert!(matches!(
        Session::from_json(r#"[{"id": "1"}]"#),
        Err(SessionError::Json(_))
    ));
}
