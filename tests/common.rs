//! Common test utilities for building `.pear` documents.
use atlas::prelude::*;
use serde_json::{Value, json};

/// Pool without router or history: one agent carrying two tools.
#[allow(dead_code)]
pub fn simple_pool() -> Document {
    Document::from_value(json!({
        "type": "pool",
        "data": {
            "agents": [
                {"name": "A", "tools": [{"name": "T1"}, {"name": "T2"}]}
            ]
        }
    }))
    .expect("valid fixture")
}

/// `simple_pool` with a router in front of its agent.
#[allow(dead_code)]
pub fn routed_pool() -> Document {
    let mut document = simple_pool();
    document.data["router"] = json!({
        "name": "Orchestrator",
        "persona": "Route every request.",
        "model": {"type": "GroqModel", "model_name": "llama-3.2-70b-instruct"}
    });
    document
}

/// Pool with history stores at both pool and agent level.
#[allow(dead_code)]
pub fn pool_with_histories() -> Document {
    Document::from_value(json!({
        "type": "pool",
        "data": {
            "agents": [
                {"name": "A", "tools": [], "history": {"store_type": "redis", "host": "localhost"}}
            ],
            "history": {"store_type": "sqlite", "database_path": "./pool.db"}
        }
    }))
    .expect("valid fixture")
}

#[allow(dead_code)]
pub fn agent_json(name: &str, tools: &[&str]) -> Value {
    let tools: Vec<Value> = tools
        .iter()
        .map(|t| {
            json!({
                "name": t,
                "description": format!("{} tool", t),
                "source_code": format!("def {}(query: str) -> str:\n    return query\n", t),
                "input_parameters": {"query": "str"},
                "max_retries": 1,
                "on_error": "raise"
            })
        })
        .collect();
    json!({
        "name": name,
        "description": format!("{} agent", name),
        "persona": format!("You are {}.", name),
        "model": {"type": "GroqModel", "model_name": "llama-3.2-70b-instruct"},
        "tools": tools
    })
}

/// A larger routed pool: four agents with three tools each, an agent-level history on
/// the second agent and a pool-level history.
#[allow(dead_code)]
pub fn complex_pool() -> Document {
    let mut agents = vec![
        agent_json("Research_Analyst", &["search_web", "read_file", "analyze_data"]),
        agent_json("Chief_Editor", &["summarize_text", "translate_text", "write_file"]),
        agent_json("Lead_Developer", &["execute_python", "query_database", "read_file"]),
        agent_json("Creative_Director", &["generate_image", "send_email", "schedule_meeting"]),
    ];
    agents[1]["history"] = json!({"store_type": "file", "storage_dir": "./editor"});

    Document::from_value(json!({
        "type": "pool",
        "data": {
            "router": {
                "name": "Orchestrator",
                "persona": "You are the Master Orchestrator.",
                "model": {"type": "GroqModel", "model_name": "llama-3.2-70b-instruct"}
            },
            "agents": agents,
            "max_iter": 10,
            "tracing": true,
            "history": {"type": "history", "store_type": "SQLiteHistoryStore", "database_path": "./complex.db"}
        }
    }))
    .expect("valid fixture")
}

/// Node ids in output order.
#[allow(dead_code)]
pub fn ids(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(|n| n.id.as_str()).collect()
}

/// Position of the node with `id`; panics if absent.
#[allow(dead_code)]
pub fn position_of(nodes: &[Node], id: &str) -> Position {
    nodes
        .iter()
        .find(|n| n.id == id)
        .unwrap_or_else(|| panic!("node '{}' missing", id))
        .position
}
