//! Graph synthesis: walks a `.pear` document root-first and emits typed nodes plus the
//! edges implied by the document's nesting.
//!
//! Synthesis is total. Missing optional subtrees (router, tools, history) are simply
//! omitted, and an unrecognised document tag degrades to a single `unknown` node.

mod labels;

use crate::document::{Document, DocumentKind, payload_child, payload_list};
use crate::graph::{Anchor, Edge, Graph, Node, NodeKind, Slot, SourceHandle, ids};
use serde_json::Value;
use tracing::{debug, warn};

use labels::label_for;

/// Builds a graph (positions unset) from a document.
pub fn synthesize(document: &Document) -> Graph {
    let mut builder = GraphBuilder::default();
    let data = &document.data;

    match document.kind() {
        DocumentKind::Pool => builder.pool(data),
        DocumentKind::Agent => builder.agent(data, ids::AGENT_ROOT, None),
        DocumentKind::Collection => builder.collection(data),
        DocumentKind::Unknown(tag) => {
            warn!(tag = %tag, "unrecognised document tag, emitting placeholder node");
            builder.add_node(NodeKind::Unknown, data, ids::UNKNOWN.to_string(), None);
        }
    }

    let graph = builder.finish();
    debug!(
        kind = %document.kind(),
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "synthesized graph"
    );
    graph
}

/// Accumulates nodes and edges during the walk.
#[derive(Default)]
struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphBuilder {
    fn finish(self) -> Graph {
        Graph {
            nodes: self.nodes,
            edges: self.edges,
        }
    }

    /// Emits a node and, if it has a parent, the edge from that parent. Satellites
    /// pass the slot they occupy, which selects the connector and the anchor.
    fn add_node(
        &mut self,
        kind: NodeKind,
        payload: &Value,
        id: String,
        parent: Option<(&str, Option<Slot>)>,
    ) {
        let mut node = Node::new(id, kind, label_for(kind, payload), payload.clone());

        if let Some((parent_id, slot)) = parent {
            let handle = slot.map(|slot| match slot {
                Slot::Tool(_) => SourceHandle::Tool,
                Slot::History => SourceHandle::History,
            });
            self.edges.push(Edge::new(parent_id, &node.id, handle));
            node.anchor = slot.map(|slot| Anchor::new(parent_id, slot));
        }
        self.nodes.push(node);
    }

    fn pool(&mut self, data: &Value) {
        let pool_id = ids::POOL_ROOT;
        self.add_node(NodeKind::Pool, data, pool_id.to_string(), None);

        // With a router present, agents hang off the router instead of the pool.
        let agent_parent = match payload_child(data, "router") {
            Some(router) => {
                self.add_node(
                    NodeKind::Router,
                    router,
                    ids::ROUTER_MAIN.to_string(),
                    Some((pool_id, None)),
                );
                ids::ROUTER_MAIN
            }
            None => pool_id,
        };

        self.agents(data, agent_parent);
        self.history(data, pool_id);
    }

    fn collection(&mut self, data: &Value) {
        let root = ids::COLLECTION_ROOT;
        self.add_node(NodeKind::Collection, data, root.to_string(), None);
        self.agents(data, root);
    }

    fn agents(&mut self, data: &Value, parent: &str) {
        for (index, agent) in payload_list(data, "agents").iter().enumerate() {
            let agent_id = ids::agent(index);
            self.agent(agent, &agent_id, Some(parent));
        }
    }

    fn agent(&mut self, agent: &Value, agent_id: &str, parent: Option<&str>) {
        self.add_node(
            NodeKind::Agent,
            agent,
            agent_id.to_string(),
            parent.map(|p| (p, None)),
        );

        for (index, tool) in payload_list(agent, "tools").iter().enumerate() {
            self.add_node(
                NodeKind::Tool,
                tool,
                ids::tool(agent_id, index),
                Some((agent_id, Some(Slot::Tool(index)))),
            );
        }
        self.history(agent, agent_id);
    }

    fn history(&mut self, owner: &Value, owner_id: &str) {
        if let Some(history) = payload_child(owner, "history") {
            self.add_node(
                NodeKind::History,
                history,
                ids::history(owner_id),
                Some((owner_id, Some(Slot::History))),
            );
        }
    }
}
