//! Deterministic node ids.
//!
//! Ids are derived from the structural path of an entity in the document, so the same
//! document shape always yields the same ids. Satellite ids embed their parent id,
//! which lets layouts persisted before anchors existed still be resolved.

use super::{Anchor, Slot};

pub const POOL_ROOT: &str = "pool-root";
pub const ROUTER_MAIN: &str = "router-main";
pub const AGENT_ROOT: &str = "agent-root";
pub const COLLECTION_ROOT: &str = "collection-root";
pub const UNKNOWN: &str = "unknown";

pub const TOOL_MARKER: &str = "-tool-";
pub const HISTORY_SUFFIX: &str = "-history";

pub fn agent(index: usize) -> String {
    format!("agent-{}", index)
}

pub fn tool(parent: &str, index: usize) -> String {
    format!("{}{}{}", parent, TOOL_MARKER, index)
}

pub fn history(parent: &str) -> String {
    format!("{}{}", parent, HISTORY_SUFFIX)
}

pub fn edge(source: &str, target: &str) -> String {
    format!("e-{}-{}", source, target)
}

/// Index of a pool or collection agent id, `"agent-<n>"`.
pub fn parse_agent(id: &str) -> Option<usize> {
    id.strip_prefix("agent-")?.parse().ok()
}

/// Splits `"<parent>-tool-<n>"` into its parent id and ordinal.
pub fn parse_tool(id: &str) -> Option<(&str, usize)> {
    let (parent, index) = id.split_once(TOOL_MARKER)?;
    if parent.is_empty() {
        return None;
    }
    Some((parent, index.parse().ok()?))
}

/// Extracts the parent id from `"<parent>-history"`.
pub fn parse_history(id: &str) -> Option<&str> {
    id.strip_suffix(HISTORY_SUFFIX).filter(|p| !p.is_empty())
}

/// Recovers an anchor from a satellite id. Tool ids win over history ids.
pub fn anchor_from_id(id: &str) -> Option<Anchor> {
    if let Some((parent, index)) = parse_tool(id) {
        return Some(Anchor::new(parent, Slot::Tool(index)));
    }
    parse_history(id).map(|parent| Anchor::new(parent, Slot::History))
}
