use crate::document::{StoreType, payload_name};
use crate::graph::NodeKind;
use serde_json::Value;

/// Display label for a node: the payload's `name`, or a default for its kind.
pub(super) fn label_for(kind: NodeKind, payload: &Value) -> String {
    if let Some(name) = payload_name(payload).filter(|n| !n.trim().is_empty()) {
        return name.to_string();
    }
    match kind {
        NodeKind::Pool => "Agent Pool".to_string(),
        NodeKind::Router => "Router".to_string(),
        NodeKind::Agent => "Agent".to_string(),
        NodeKind::Tool => "Tool".to_string(),
        NodeKind::History => StoreType::of_payload(payload)
            .map(|s| s.label().to_string())
            .unwrap_or_else(|| "History".to_string()),
        NodeKind::Collection => "Agent Collection".to_string(),
        NodeKind::Unknown => "Unknown".to_string(),
    }
}
