//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the atlas crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use atlas::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let document = Document::from_file("path/to/pool.pear")?;
//! let graph = Atlas::builder().build().render(&document);
//! println!("{}", serde_json::to_string_pretty(&graph)?);
//! # Ok(())
//! # }
//! ```

// Pipeline
pub use crate::layout::{Direction, LayoutConfig, layout, layout_with_config};
pub use crate::merge::merge;
pub use crate::pipeline::Atlas;
pub use crate::synth::synthesize;

// Document and graph types
pub use crate::document::{Document, DocumentKind};
pub use crate::graph::{Anchor, Bounds, Edge, Graph, Node, NodeKind, Ports, Position, Side, Slot, SourceHandle};

// Editing, outline and sessions
pub use crate::edit::apply_field_edit;
pub use crate::outline::{OutlineNode, outline};
pub use crate::session::{Session, Tab};

// Error types
pub use crate::error::{DocumentError, EditError, SessionError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
