use thiserror::Error;

/// Errors that can occur while loading a `.pear` document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("Failed to parse document JSON: {0}")]
    JsonParse(String),

    #[error("Invalid .pear document structure: missing '{0}'")]
    MissingField(&'static str),

    #[error("Invalid .pear document structure: 'type' must be a string, found {0}")]
    InvalidTag(String),
}

/// Errors that can occur when writing a field edit back into a document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("Node '{0}' does not resolve to any subtree of the document")]
    NodeNotFound(String),

    #[error("Field path is empty")]
    EmptyFieldPath,

    #[error("Cannot descend into '{segment}' on node '{node_id}': value is not an object")]
    NotAnObject { node_id: String, segment: String },
}

/// Errors that can occur while managing persisted tabs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("Failed to (de)serialize session: {0}")]
    Json(String),

    #[error("Session I/O failed: {0}")]
    Io(String),

    #[error("Tab '{0}' not found")]
    TabNotFound(String),

    #[error("'{0}' is not a .pear or .json file")]
    UnsupportedFile(String),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Edit(#[from] EditError),
}
