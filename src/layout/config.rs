use crate::graph::NodeKind;
use serde::{Deserialize, Serialize};
use std::fs;

/// Flow direction of the ranks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "TB")]
    TopToBottom,
    #[serde(rename = "BT")]
    BottomToTop,
    #[serde(rename = "LR")]
    LeftToRight,
    #[serde(rename = "RL")]
    RightToLeft,
}

impl Direction {
    /// Whether ranks advance along the x axis.
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::LeftToRight | Direction::RightToLeft)
    }

    /// Whether ranks advance toward negative coordinates.
    pub fn is_reversed(&self) -> bool {
        matches!(self, Direction::BottomToTop | Direction::RightToLeft)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Bounding box used for each node kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSizes {
    pub pool: Size,
    pub router: Size,
    pub agent: Size,
    pub tool: Size,
    pub history: Size,
    pub default: Size,
}

impl Default for NodeSizes {
    fn default() -> Self {
        Self {
            pool: Size::new(320.0, 140.0),
            router: Size::new(320.0, 140.0),
            agent: Size::new(320.0, 100.0),
            tool: Size::new(220.0, 80.0),
            history: Size::new(220.0, 80.0),
            default: Size::new(200.0, 80.0),
        }
    }
}

/// Every tunable of the layout engine. The defaults match the canvas the graph is
/// rendered on; a partial JSON file overrides only the keys it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub direction: Direction,
    pub sizes: NodeSizes,
    /// Gap between consecutive ranks.
    pub rank_sep: f64,
    /// Gap between neighbours within a rank.
    pub node_sep: f64,
    /// Cell size every coordinate is snapped to.
    pub grid: f64,
    pub tool_indent: f64,
    /// Gap between a parent's bottom edge and its first tool.
    pub tool_offset: f64,
    pub tool_gap: f64,
    pub history_gap: f64,
    /// Barycenter sweeps spent on crossing reduction.
    pub ordering_sweeps: usize,
    /// Alignment passes spent centring nodes against their neighbours.
    pub alignment_passes: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: Direction::TopToBottom,
            sizes: NodeSizes::default(),
            rank_sep: 120.0,
            node_sep: 80.0,
            grid: 24.0,
            tool_indent: 20.0,
            tool_offset: 40.0,
            tool_gap: 16.0,
            history_gap: 60.0,
            ordering_sweeps: 8,
            alignment_passes: 4,
        }
    }
}

impl LayoutConfig {
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Load a configuration from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn size_of(&self, kind: NodeKind) -> Size {
        match kind {
            NodeKind::Pool => self.sizes.pool,
            NodeKind::Router => self.sizes.router,
            NodeKind::Agent => self.sizes.agent,
            NodeKind::Tool => self.sizes.tool,
            NodeKind::History => self.sizes.history,
            NodeKind::Collection | NodeKind::Unknown => self.sizes.default,
        }
    }
}
