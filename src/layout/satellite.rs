use super::{LayoutConfig, snap};
use crate::graph::{Node, Position, Slot};
use ahash::AHashMap;
use tracing::warn;

/// Computes the position of a satellite from its positioned structural parent.
///
/// Returns `None` when the parent cannot be resolved; the caller then keeps the
/// satellite's existing position.
pub(super) fn place(
    satellite: &Node,
    parents: &AHashMap<&str, &Node>,
    config: &LayoutConfig,
) -> Option<Position> {
    let Some(anchor) = satellite.resolve_anchor() else {
        warn!(id = %satellite.id, "satellite id carries no parent reference");
        return None;
    };
    let Some(parent) = parents.get(anchor.parent.as_str()) else {
        warn!(id = %satellite.id, parent = %anchor.parent, "satellite parent not found");
        return None;
    };

    let origin = parent.position;
    let parent_size = config.size_of(parent.kind);
    let own_size = config.size_of(satellite.kind);
    let grid = config.grid;

    let (x, y) = match anchor.slot {
        // Stacked under the parent, slightly indented.
        Slot::Tool(index) => (
            origin.x as f64 + config.tool_indent,
            origin.y as f64
                + parent_size.height
                + config.tool_offset
                + index as f64 * (own_size.height + config.tool_gap),
        ),
        // Right of the parent, vertically centred on it.
        Slot::History => (
            origin.x as f64 + parent_size.width + config.history_gap,
            origin.y as f64 + (parent_size.height - own_size.height) / 2.0,
        ),
    };

    Some(Position::new(snap(x, grid), snap(y, grid)))
}
