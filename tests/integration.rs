//! End-to-end tests for the render / re-render pipeline.
mod common;
use atlas::prelude::*;
use common::*;
use serde_json::json;

#[test]
fn test_render_matches_manual_pipeline() {
    let document = complex_pool();
    let atlas = Atlas::builder().build();

    let graph = atlas.render(&document);
    let synthesized = synthesize(&document);
    let nodes = layout(&synthesized.nodes, &synthesized.edges);

    assert_eq!(graph.nodes, nodes);
    assert_eq!(graph.edges, synthesized.edges);
}

#[test]
fn test_dragged_positions_survive_an_edit() {
    let atlas = Atlas::builder().build();
    let mut document = simple_pool();
    let mut on_screen = atlas.render(&document).nodes;

    // The user drags the agent somewhere else.
    let agent = on_screen.iter_mut().find(|n| n.id == "agent-0").unwrap();
    agent.position = Position::new(720, 480);

    // Then adds a third tool through the inspector.
    document.data["agents"][0]["tools"]
        .as_array_mut()
        .unwrap()
        .push(json!({"name": "T3"}));
    let graph = atlas.rerender(&document, &on_screen);

    assert_eq!(position_of(&graph.nodes, "agent-0"), Position::new(720, 480));
    assert_eq!(position_of(&graph.nodes, "agent-0-tool-0"), Position::new(24, 408));
    // The new tool is placed against the freshly laid-out parent.
    assert_eq!(position_of(&graph.nodes, "agent-0-tool-2"), Position::new(24, 600));
    assert!(graph.edge("agent-0", "agent-0-tool-2").is_some());
}

#[test]
fn test_rerender_drops_deleted_nodes() {
    let atlas = Atlas::builder().build();
    let mut document = routed_pool();
    let previous = atlas.render(&document).nodes;

    document.data["router"] = json!(null);
    let graph = atlas.rerender(&document, &previous);

    assert!(graph.node("router-main").is_none());
    assert!(graph.edge("pool-root", "agent-0").is_some());
    // agent-0 existed before, so it keeps the position it had under the router.
    assert_eq!(position_of(&graph.nodes, "agent-0"), Position::new(0, 528));
}

#[test]
fn test_field_edit_round_trip() {
    let atlas = Atlas::builder().build();
    let mut document = complex_pool();
    let before = atlas.render(&document);

    apply_field_edit(&mut document, "agent-2-tool-1", "description", json!("Runs SQL"))
        .unwrap();
    apply_field_edit(&mut document, "router-main", "model.model_name", json!("llama-3.3"))
        .unwrap();
    let after = atlas.rerender(&document, &before.nodes);

    let tool = after.node("agent-2-tool-1").unwrap();
    assert_eq!(tool.payload["description"], json!("Runs SQL"));
    let router = after.node("router-main").unwrap();
    assert_eq!(router.payload["model"]["model_name"], json!("llama-3.3"));

    for node in &before.nodes {
        assert_eq!(position_of(&after.nodes, &node.id), node.position);
    }
}

#[test]
fn test_direction_from_builder() {
    let atlas = Atlas::builder()
        .with_direction(Direction::LeftToRight)
        .build();
    assert_eq!(atlas.config().direction, Direction::LeftToRight);

    let graph = atlas.render(&simple_pool());
    assert_eq!(position_of(&graph.nodes, "agent-0"), Position::new(432, 24));
}

#[test]
fn test_graph_serializes_for_renderer() {
    let graph = Atlas::builder().build().render(&pool_with_histories());
    let value = serde_json::to_value(&graph).unwrap();

    let edge = value["edges"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["target"] == json!("agent-0-history"))
        .unwrap();
    assert_eq!(edge["id"], json!("e-agent-0-agent-0-history"));
    assert_eq!(edge["sourceHandle"], json!("right-history-source"));

    let pool = &value["nodes"][0];
    assert_eq!(pool["kind"], json!("pool"));
    assert_eq!(pool["position"], json!({"x": 0, "y": 0}));
    assert_eq!(pool["ports"], json!({"target": "top", "source": "bottom"}));

    let restored: Graph = serde_json::from_value(value).unwrap();
    assert_eq!(restored, graph);
}

#[test]
fn test_document_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pool.pear");
    std::fs::write(&path, complex_pool().to_value().to_string()).unwrap();

    let document = Document::from_file(path.to_str().unwrap()).unwrap();
    assert_eq!(document, complex_pool());
    assert_eq!(Atlas::default().render(&document).nodes.len(), 1 + 1 + 4 + 12 + 1 + 1);
}
