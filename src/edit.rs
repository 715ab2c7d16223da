//! Writing field edits back into the document.
//!
//! A node id names a structural path, so it can be resolved back to the exact
//! subtree the node was synthesized from. Edits go there and the caller re-renders.

use crate::document::{Document, DocumentKind};
use crate::error::EditError;
use crate::graph::ids;
use serde_json::{Map, Value};
use tracing::debug;

/// Returns the document subtree a node id was synthesized from.
pub fn resolve<'a>(document: &'a Document, node_id: &str) -> Option<&'a Value> {
    let path = subtree_path(&document.kind(), node_id)?;
    path.iter()
        .try_fold(&document.data, |value, step| match step {
            Step::Key(key) => value.get(*key),
            Step::Index(index) => value.get(*index),
        })
        .filter(|v| !v.is_null())
}

/// Mutable counterpart of [`resolve`].
pub fn resolve_mut<'a>(document: &'a mut Document, node_id: &str) -> Option<&'a mut Value> {
    let path = subtree_path(&document.kind(), node_id)?;
    path.iter()
        .try_fold(&mut document.data, |value, step| match step {
            Step::Key(key) => value.get_mut(*key),
            Step::Index(index) => value.get_mut(*index),
        })
        .filter(|v| !v.is_null())
}

/// Sets the dotted `field_path` (e.g. `model.model_name`) on the subtree of `node_id`,
/// creating intermediate objects as needed.
pub fn apply_field_edit(
    document: &mut Document,
    node_id: &str,
    field_path: &str,
    value: Value,
) -> Result<(), EditError> {
    let segments: Vec<&str> = field_path.split('.').collect();
    if field_path.trim().is_empty() || segments.iter().any(|s| s.is_empty()) {
        return Err(EditError::EmptyFieldPath);
    }

    let target = resolve_mut(document, node_id)
        .ok_or_else(|| EditError::NodeNotFound(node_id.to_string()))?;

    let not_an_object = |segment: &str| EditError::NotAnObject {
        node_id: node_id.to_string(),
        segment: segment.to_string(),
    };

    let (&last, parents) = segments
        .split_last()
        .ok_or(EditError::EmptyFieldPath)?;
    let mut current = target;
    for &segment in parents {
        let object = current.as_object_mut().ok_or_else(|| not_an_object(segment))?;
        let child = object
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if child.is_null() {
            *child = Value::Object(Map::new());
        }
        current = child;
    }

    current
        .as_object_mut()
        .ok_or_else(|| not_an_object(last))?
        .insert(last.to_string(), value);

    debug!(node = node_id, field = field_path, "applied field edit");
    Ok(())
}

enum Step {
    Key(&'static str),
    Index(usize),
}

/// Path from the document payload to the subtree of `node_id`.
fn subtree_path(kind: &DocumentKind, node_id: &str) -> Option<Vec<Step>> {
    if let Some((parent, index)) = ids::parse_tool(node_id) {
        let mut path = subtree_path(kind, parent)?;
        path.extend([Step::Key("tools"), Step::Index(index)]);
        return Some(path);
    }
    if let Some(parent) = ids::parse_history(node_id) {
        let mut path = subtree_path(kind, parent)?;
        path.push(Step::Key("history"));
        return Some(path);
    }

    match (kind, node_id) {
        (DocumentKind::Pool, ids::POOL_ROOT)
        | (DocumentKind::Agent, ids::AGENT_ROOT)
        | (DocumentKind::Collection, ids::COLLECTION_ROOT) => Some(Vec::new()),
        (DocumentKind::Pool, ids::ROUTER_MAIN) => Some(vec![Step::Key("router")]),
        (DocumentKind::Pool | DocumentKind::Collection, id) => {
            let index = ids::parse_agent(id)?;
            Some(vec![Step::Key("agents"), Step::Index(index)])
        }
        _ => None,
    }
}
