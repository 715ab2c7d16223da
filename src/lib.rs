//! # Atlas - Graph Synthesis and Layout for `.pear` Agent Systems
//!
//! **Atlas** turns a declarative agent-system description (a `.pear` document of pools,
//! routers, agents, tools and history stores) into a positioned node/edge graph that a
//! canvas renderer can draw directly, and keeps that graph's positions stable while the
//! document is being edited.
//!
//! ## Core Workflow
//!
//! The pipeline is a chain of pure functions; nothing is cached between calls.
//!
//! 1.  **Load**: Parse and validate a document with [`Document::from_json`](document::Document::from_json).
//! 2.  **Synthesize**: [`synth::synthesize`] walks the document and emits typed nodes with
//!     deterministic, path-derived ids plus the edges implied by the nesting.
//! 3.  **Lay out**: [`layout::layout`] ranks the structural nodes (pool, router, agent) with a
//!     layered algorithm and hangs the satellites (tools, history) off their parents at fixed
//!     offsets. Every coordinate lands on the 24-unit canvas grid.
//! 4.  **Merge**: [`merge::merge`] keeps the on-screen position of every node that survived an
//!     edit, so manual arrangements are not reset.
//!
//! [`Atlas`](pipeline::Atlas) bundles these steps.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use atlas::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let json = r#"{"type": "pool", "data": {"agents": [
//!         {"name": "A", "tools": [{"name": "T1"}, {"name": "T2"}]}
//!     ]}}"#;
//!     let mut document = Document::from_json(json)?;
//!
//!     let atlas = Atlas::builder().with_direction(Direction::TopToBottom).build();
//!     let graph = atlas.render(&document);
//!     for node in &graph.nodes {
//!         println!("{} ({}) at {:?}", node.id, node.kind, node.position);
//!     }
//!
//!     // Edit a field, then re-render while keeping the previous positions.
//!     apply_field_edit(&mut document, "agent-0", "persona", "Terse".into())?;
//!     let updated = atlas.rerender(&document, &graph.nodes);
//!     assert_eq!(updated.nodes.len(), graph.nodes.len());
//!     Ok(())
//! }
//! ```

pub mod document;
pub mod edit;
pub mod error;
pub mod graph;
pub mod layout;
pub mod merge;
pub mod outline;
pub mod pipeline;
pub mod prelude;
pub mod session;
pub mod synth;
