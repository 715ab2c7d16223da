//! Position-preserving merge of a fresh layout with the one currently on screen.

use crate::graph::Node;
use ahash::AHashMap;
use tracing::debug;

/// Merges freshly laid-out nodes with `previous` ones.
///
/// For each fresh node whose id also appears in `previous`, the previous position is
/// kept; everything else (kind, label, payload, anchor, ports) comes from the fresh
/// node. Nodes only present in `previous` are dropped.
pub fn merge(fresh: Vec<Node>, previous: &[Node]) -> Vec<Node> {
    let mut known: AHashMap<&str, &Node> = AHashMap::with_capacity(previous.len());
    for node in previous {
        known.entry(node.id.as_str()).or_insert(node);
    }

    let mut kept = 0usize;
    let merged: Vec<Node> = fresh
        .into_iter()
        .map(|mut node| {
            if let Some(old) = known.get(node.id.as_str()) {
                node.position = old.position;
                kept += 1;
            }
            node
        })
        .collect();

    debug!(
        nodes = merged.len(),
        kept,
        dropped = previous.len().saturating_sub(kept),
        "merged layout"
    );
    merged
}
