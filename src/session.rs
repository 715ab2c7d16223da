//! Open documents ("tabs") and their saved layouts.
//!
//! A tab whose layout was saved is restored by feeding that layout to the merge step
//! as the previous node set, so the user's arrangement comes back exactly instead of a
//! fresh auto-layout.

use crate::document::Document;
use crate::edit::apply_field_edit;
use crate::error::SessionError;
use crate::graph::Graph;
use crate::pipeline::Atlas;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub id: String,
    pub name: String,
    #[serde(alias = "data")]
    pub document: Document,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Graph>,
}

impl Tab {
    pub fn new(name: impl Into<String>, document: Document) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            document,
            layout: None,
        }
    }
}

/// Ordered tabs plus the active one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub tabs: Vec<Tab>,
    #[serde(default)]
    pub active: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tab for `document` and makes it active. Returns the new tab id.
    pub fn open(&mut self, name: impl Into<String>, document: Document) -> String {
        let tab = Tab::new(name, document);
        let id = tab.id.clone();
        info!(tab = %id, name = %tab.name, kind = %tab.document.kind(), "opened tab");
        self.tabs.push(tab);
        self.active = Some(id.clone());
        id
    }

    /// Opens a `.pear` or `.json` file, naming the tab after the file stem.
    pub fn open_file(&mut self, path: &str) -> Result<String, SessionError> {
        let file = Path::new(path);
        let supported = matches!(
            file.extension().and_then(|e| e.to_str()),
            Some("pear") | Some("json")
        );
        if !supported {
            return Err(SessionError::UnsupportedFile(path.to_string()));
        }

        let content = fs::read_to_string(file)
            .map_err(|e| SessionError::Io(format!("Could not read '{}': {}", path, e)))?;
        let document = Document::from_json(&content)?;
        let name = file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string();
        Ok(self.open(name, document))
    }

    /// Removes a tab. If it was active, the last remaining tab becomes active.
    pub fn close(&mut self, id: &str) -> Result<Tab, SessionError> {
        let index = self.index_of(id)?;
        let tab = self.tabs.remove(index);
        if self.active.as_deref() == Some(id) {
            self.active = self.tabs.last().map(|t| t.id.clone());
        }
        debug!(tab = id, remaining = self.tabs.len(), "closed tab");
        Ok(tab)
    }

    pub fn activate(&mut self, id: &str) -> Result<(), SessionError> {
        self.index_of(id)?;
        self.active = Some(id.to_string());
        Ok(())
    }

    pub fn tab(&self, id: &str) -> Result<&Tab, SessionError> {
        self.tabs
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| SessionError::TabNotFound(id.to_string()))
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active.as_deref().and_then(|id| self.tab(id).ok())
    }

    /// Replaces the document of a tab. The saved layout is kept so positions survive.
    pub fn update_document(&mut self, id: &str, document: Document) -> Result<(), SessionError> {
        self.tab_mut(id)?.document = document;
        Ok(())
    }

    /// Writes a single field edit into the subtree of `node_id` in a tab's document.
    pub fn edit_field(
        &mut self,
        id: &str,
        node_id: &str,
        field_path: &str,
        value: Value,
    ) -> Result<(), SessionError> {
        let tab = self.tab_mut(id)?;
        apply_field_edit(&mut tab.document, node_id, field_path, value)?;
        Ok(())
    }

    pub fn save_layout(&mut self, id: &str, layout: Graph) -> Result<(), SessionError> {
        self.tab_mut(id)?.layout = Some(layout);
        Ok(())
    }

    /// Renders a tab, restoring the positions of its saved layout when it has one.
    pub fn render(&self, id: &str, atlas: &Atlas) -> Result<Graph, SessionError> {
        let tab = self.tab(id)?;
        Ok(match &tab.layout {
            Some(saved) => atlas.rerender(&tab.document, &saved.nodes),
            None => atlas.render(&tab.document),
        })
    }

    /// Renders the active tab, if any.
    pub fn render_active(&self, atlas: &Atlas) -> Option<Result<Graph, SessionError>> {
        self.active.as_deref().map(|id| self.render(id, atlas))
    }

    pub fn to_json(&self) -> Result<String, SessionError> {
        serde_json::to_string(self).map_err(|e| SessionError::Json(e.to_string()))
    }

    /// Parses a session. A bare array of tabs, as the web canvas stores them, is
    /// also accepted; its first tab becomes active.
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| SessionError::Json(e.to_string()))?;
        match value {
            Value::Array(_) => {
                let tabs: Vec<Tab> = serde_json::from_value(value)
                    .map_err(|e| SessionError::Json(e.to_string()))?;
                let active = tabs.first().map(|t| t.id.clone());
                Ok(Self { tabs, active })
            }
            other => serde_json::from_value(other).map_err(|e| SessionError::Json(e.to_string())),
        }
    }

    pub fn save(&self, path: &str) -> Result<(), SessionError> {
        fs::write(path, self.to_json()?)
            .map_err(|e| SessionError::Io(format!("Could not write '{}': {}", path, e)))
    }

    pub fn load(path: &str) -> Result<Self, SessionError> {
        let content = fs::read_to_string(path)
            .map_err(|e| SessionError::Io(format!("Could not read '{}': {}", path, e)))?;
        Self::from_json(&content)
    }

    fn index_of(&self, id: &str) -> Result<usize, SessionError> {
        self.tabs
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| SessionError::TabNotFound(id.to_string()))
    }

    fn tab_mut(&mut self, id: &str) -> Result<&mut Tab, SessionError> {
        self.tabs
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| SessionError::TabNotFound(id.to_string()))
    }
}
