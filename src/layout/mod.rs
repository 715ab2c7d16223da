//! The layout engine.
//!
//! Nodes are split into two classes. Structural nodes (pool, router, agent and any
//! other non-satellite kind) go through the layered engine in [`layered`]; only edges
//! whose endpoints are both structural take part, so satellites can never move them.
//! Satellites (tools, history stores) are then placed at fixed offsets from their
//! parent by [`satellite`]. Every coordinate is snapped to the canvas grid.

mod config;
mod layered;
mod satellite;

pub use config::{Direction, LayoutConfig, NodeSizes, Size};

use crate::graph::{Edge, Node, Ports, Position, Side};
use ahash::AHashMap;
use tracing::debug;

use layered::LayeredGraph;

/// Positions `nodes` with the default configuration (top-to-bottom).
pub fn layout(nodes: &[Node], edges: &[Edge]) -> Vec<Node> {
    layout_with_config(nodes, edges, &LayoutConfig::default())
}

/// Positions `nodes` according to `config`. Edges are read-only input.
///
/// The result has the same nodes in the same order. Satellites whose parent cannot
/// be resolved are returned unchanged.
pub fn layout_with_config(nodes: &[Node], edges: &[Edge], config: &LayoutConfig) -> Vec<Node> {
    let structural: Vec<usize> = nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| !n.kind.is_satellite())
        .map(|(i, _)| i)
        .collect();

    // First occurrence wins if a caller hands us duplicate ids.
    let mut slot_of: AHashMap<&str, usize> = AHashMap::with_capacity(structural.len());
    for (slot, &index) in structural.iter().enumerate() {
        slot_of.entry(nodes[index].id.as_str()).or_insert(slot);
    }

    let sizes: Vec<Size> = structural
        .iter()
        .map(|&i| config.size_of(nodes[i].kind))
        .collect();
    let links: Vec<(usize, usize)> = edges
        .iter()
        .filter_map(|e| Some((*slot_of.get(e.source.as_str())?, *slot_of.get(e.target.as_str())?)))
        .collect();

    let mut graph = LayeredGraph::new(sizes, &links);
    let corners = graph.run(config);
    debug!(
        structural = structural.len(),
        links = links.len(),
        ranks = graph.rank_count(),
        "laid out structural nodes"
    );

    let mut positioned: Vec<Node> = nodes.to_vec();
    let structural_ports = structural_ports(config.direction);
    for (slot, &index) in structural.iter().enumerate() {
        let (x, y) = corners[slot];
        let node = &mut positioned[index];
        node.position = Position::new(snap(x, config.grid), snap(y, config.grid));
        node.ports = Some(structural_ports);
    }

    let parents: AHashMap<&str, &Node> = structural
        .iter()
        .map(|&i| &positioned[i])
        .fold(AHashMap::new(), |mut acc, node| {
            acc.entry(node.id.as_str()).or_insert(node);
            acc
        });
    let placements: Vec<(usize, Position)> = nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.kind.is_satellite())
        .filter_map(|(i, n)| satellite::place(n, &parents, config).map(|p| (i, p)))
        .collect();

    for (index, position) in placements {
        positioned[index].position = position;
        positioned[index].ports = Some(SATELLITE_PORTS);
    }

    positioned
}

const SATELLITE_PORTS: Ports = Ports {
    target: Side::Left,
    source: Side::Right,
};

/// Incoming and outgoing sides that follow the rank direction.
fn structural_ports(direction: Direction) -> Ports {
    match direction {
        Direction::TopToBottom => Ports {
            target: Side::Top,
            source: Side::Bottom,
        },
        Direction::BottomToTop => Ports {
            target: Side::Bottom,
            source: Side::Top,
        },
        Direction::LeftToRight => Ports {
            target: Side::Left,
            source: Side::Right,
        },
        Direction::RightToLeft => Ports {
            target: Side::Right,
            source: Side::Left,
        },
    }
}

/// Rounds `value` to the nearest multiple of `grid`, halves rounding up.
pub fn snap(value: f64, grid: f64) -> i64 {
    if grid <= 0.0 {
        return (value + 0.5).floor() as i64;
    }
    ((value / grid + 0.5).floor() * grid) as i64
}
