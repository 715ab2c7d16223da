//! The full document-to-graph pipeline: synthesize, lay out, then keep positions the
//! caller already has on screen.

use crate::document::Document;
use crate::graph::{Graph, Node};
use crate::layout::{Direction, LayoutConfig, layout_with_config};
use crate::merge::merge;
use crate::synth::synthesize;
use tracing::debug;

/// A configured pipeline. Holds no state between calls.
#[derive(Debug, Clone, Default)]
pub struct Atlas {
    config: LayoutConfig,
}

pub struct AtlasBuilder {
    config: LayoutConfig,
}

impl AtlasBuilder {
    pub fn new() -> Self {
        Self {
            config: LayoutConfig::default(),
        }
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.config.direction = direction;
        self
    }

    pub fn build(self) -> Atlas {
        Atlas {
            config: self.config,
        }
    }
}

impl Default for AtlasBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Atlas {
    pub fn builder() -> AtlasBuilder {
        AtlasBuilder::new()
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Synthesizes and lays out `document` from scratch.
    pub fn render(&self, document: &Document) -> Graph {
        let Graph { nodes, edges } = synthesize(document);
        let nodes = layout_with_config(&nodes, &edges, &self.config);
        Graph { nodes, edges }
    }

    /// Re-renders `document`, keeping the position of every node already in `previous`.
    /// Edges are always the freshly synthesized ones.
    pub fn rerender(&self, document: &Document, previous: &[Node]) -> Graph {
        let Graph { nodes, edges } = self.render(document);
        debug!(previous = previous.len(), "re-rendering with previous layout");
        Graph {
            nodes: merge(nodes, previous),
            edges,
        }
    }
}
