//! Tree outline of a document, as shown in the navigation sidebar.
//!
//! Outline ids are the same ids the synthesizer assigns, so selecting an entry in the
//! outline can focus the matching node on the canvas.

use crate::document::{
    Document, DocumentKind, ModelBinding, StoreType, payload_child, payload_list, payload_name,
};
use crate::graph::{NodeKind, ids};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlineNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    /// Secondary text: the bound model for agents/routers, the backend for history.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    fn leaf(id: String, label: String, kind: NodeKind) -> Self {
        Self {
            id,
            label,
            kind,
            detail: None,
            children: Vec::new(),
        }
    }

    /// Depth-first search by id.
    pub fn find(&self, id: &str) -> Option<&OutlineNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Number of entries in this subtree, including itself.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(OutlineNode::count).sum::<usize>()
    }
}

/// Builds the outline tree of `document`.
pub fn outline(document: &Document) -> OutlineNode {
    let data = &document.data;
    match document.kind() {
        DocumentKind::Pool => {
            let mut root = OutlineNode::leaf(
                ids::POOL_ROOT.to_string(),
                name_or(data, "Agent Pool"),
                NodeKind::Pool,
            );
            if let Some(router) = payload_child(data, "router") {
                let mut entry = OutlineNode::leaf(
                    ids::ROUTER_MAIN.to_string(),
                    name_or(router, "Router"),
                    NodeKind::Router,
                );
                entry.detail = model_detail(router);
                root.children.push(entry);
            }
            root.children.extend(agents(data));
            root.children.extend(history(data, ids::POOL_ROOT));
            root
        }
        DocumentKind::Collection => {
            let mut root = OutlineNode::leaf(
                ids::COLLECTION_ROOT.to_string(),
                "Agent Collection".to_string(),
                NodeKind::Collection,
            );
            root.children.extend(agents(data));
            root
        }
        DocumentKind::Agent => agent(data, ids::AGENT_ROOT.to_string()),
        DocumentKind::Unknown(_) => OutlineNode::leaf(
            ids::UNKNOWN.to_string(),
            "Unknown".to_string(),
            NodeKind::Collection,
        ),
    }
}

fn agents(data: &Value) -> impl Iterator<Item = OutlineNode> + '_ {
    payload_list(data, "agents")
        .iter()
        .enumerate()
        .map(|(index, a)| agent(a, ids::agent(index)))
}

fn agent(payload: &Value, agent_id: String) -> OutlineNode {
    let tools = payload_list(payload, "tools")
        .iter()
        .enumerate()
        .map(|(index, tool)| {
            OutlineNode::leaf(
                ids::tool(&agent_id, index),
                name_or(tool, "Tool"),
                NodeKind::Tool,
            )
        });
    let children: Vec<OutlineNode> = tools.chain(history(payload, &agent_id)).collect();

    OutlineNode {
        label: name_or(payload, "Agent"),
        kind: NodeKind::Agent,
        detail: model_detail(payload),
        children,
        id: agent_id,
    }
}

fn history(owner: &Value, owner_id: &str) -> Option<OutlineNode> {
    let payload = payload_child(owner, "history")?;
    let store = StoreType::of_payload(payload);
    Some(OutlineNode {
        id: ids::history(owner_id),
        label: "History".to_string(),
        kind: NodeKind::History,
        detail: store.map(|s| s.label().to_string()),
        children: Vec::new(),
    })
}

fn name_or(payload: &Value, fallback: &str) -> String {
    payload_name(payload).unwrap_or(fallback).to_string()
}

fn model_detail(payload: &Value) -> Option<String> {
    ModelBinding::of_payload(payload).map(|m| m.to_string())
}
