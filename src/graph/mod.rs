//! The positioned node/edge graph handed to a renderer.

pub mod ids;

use crate::layout::LayoutConfig;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// The kind of a node, which selects its rendering template and layout class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Pool,
    Router,
    Agent,
    Tool,
    History,
    Collection,
    Unknown,
}

impl NodeKind {
    /// Satellites are placed relative to a parent instead of by the layered engine.
    pub fn is_satellite(&self) -> bool {
        matches!(self, NodeKind::Tool | NodeKind::History)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Pool => "pool",
            NodeKind::Router => "router",
            NodeKind::Agent => "agent",
            NodeKind::Tool => "tool",
            NodeKind::History => "history",
            NodeKind::Collection => "collection",
            NodeKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-left corner of a node, in grid-aligned canvas units.
///
/// Fractional coordinates in persisted layouts are rounded on load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    #[serde(deserialize_with = "rounded")]
    pub x: i64,
    #[serde(deserialize_with = "rounded")]
    pub y: i64,
}

fn rounded<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    f64::deserialize(deserializer).map(|v| v.round() as i64)
}

impl Position {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// Preferred connector sides for incoming (`target`) and outgoing (`source`) edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ports {
    pub target: Side,
    pub source: Side,
}

/// Where a satellite hangs off its structural parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Tool(usize),
    History,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchor {
    pub parent: String,
    pub slot: Slot,
}

impl Anchor {
    pub fn new(parent: impl Into<String>, slot: Slot) -> Self {
        Self {
            parent: parent.into(),
            slot,
        }
    }
}

/// A synthesized node.
///
/// `payload` is an untouched copy of the document subtree the node stands for,
/// including nested children. Transient view state (selection, expansion) is not
/// part of this record.
///
/// Layouts saved by the web canvas name the kind `type`; both spellings load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(alias = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Anchor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<Ports>,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind, label: impl Into<String>, payload: Value) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            payload,
            position: Position::default(),
            anchor: None,
            ports: None,
        }
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// The explicit anchor, or one recovered from the id for satellites restored
    /// from layouts that predate anchors.
    pub fn resolve_anchor(&self) -> Option<Anchor> {
        if let Some(anchor) = &self.anchor {
            return Some(anchor.clone());
        }
        ids::anchor_from_id(&self.id).filter(|anchor| {
            matches!(
                (self.kind, anchor.slot),
                (NodeKind::Tool, Slot::Tool(_)) | (NodeKind::History, Slot::History)
            )
        })
    }
}

/// Named outgoing connector on a node that has more than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceHandle {
    #[serde(rename = "left-tool-source")]
    Tool,
    #[serde(rename = "right-history-source")]
    History,
}

impl SourceHandle {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceHandle::Tool => "left-tool-source",
            SourceHandle::History => "right-history-source",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<SourceHandle>,
}

impl Edge {
    pub fn new(source: &str, target: &str, source_handle: Option<SourceHandle>) -> Self {
        Self {
            id: ids::edge(source, target),
            source: source.to_string(),
            target: target.to_string(),
            source_handle,
        }
    }
}

/// A node set with the edges connecting it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|e| e.source == source && e.target == target)
    }
}

/// Axis-aligned bounding box of a set of positioned nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Bounds {
    /// Bounds of `nodes` using the configured box size of each kind. Empty input
    /// yields a zero box at the origin.
    pub fn of(nodes: &[Node], config: &LayoutConfig) -> Self {
        let mut iter = nodes.iter().map(|n| {
            let size = config.size_of(n.kind);
            (
                n.position.x,
                n.position.y,
                n.position.x + size.width.round() as i64,
                n.position.y + size.height.round() as i64,
            )
        });
        let Some(first) = iter.next() else {
            return Self::default();
        };
        let (min_x, min_y, max_x, max_y) = iter.fold(first, |acc, b| {
            (acc.0.min(b.0), acc.1.min(b.1), acc.2.max(b.2), acc.3.max(b.3))
        });
        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    /// Grows the box by `padding` on every side.
    pub fn padded(self, padding: i64) -> Self {
        Self {
            x: self.x - padding,
            y: self.y - padding,
            width: self.width + padding * 2,
            height: self.height + padding * 2,
        }
    }
}
