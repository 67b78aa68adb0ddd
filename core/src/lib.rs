//! Core types for LangRef instruction documentation extraction.
//!
//! This crate defines the data model shared by the extraction pipeline:
//!
//! - [`Section`] — the lines of one candidate instruction block.
//! - [`InstructionId`] and [`Anchor`] — the canonical name of an instruction
//!   and its fragment identifier in the published documentation.
//! - [`Instruction`] — a resolved section.
//! - [`DocumentationBundle`] — the ordered id → HTML mapping written as the
//!   final JSON artifact.
//!
//! Validation errors ([`ValidationError`]) cover malformed sections and
//! duplicate ids; each is fatal to a run.
//!
//! # Example
//!
//! ```
//! use langref_docs_core::*;
//!
//! let add = Instruction {
//!     id: InstructionId::new("add"),
//!     anchor: Anchor::from_title_parts("add", ""),
//!     title: "'``add``' Instruction".into(),
//! };
//! let bundle = DocumentationBundle::assemble([(add.id.clone(), "<p>add</p>".into())]).unwrap();
//!
//! assert_eq!(add.anchor.as_str(), "add-instruction");
//! assert_eq!(bundle.get("add"), Some("<p>add</p>"));
//! ```

mod bundle;
mod types;
mod validate;

pub use bundle::DocumentationBundle;
pub use types::*;
pub use validate::{ValidationError, ensure_unique_ids};
