//! Per-instruction documentation extraction from the LLVM language reference.
//!
//! The language reference is one large reStructuredText document. This crate
//! splits it into instruction sections, renders each section to HTML with an
//! external converter, makes the HTML's links absolute and collects the
//! results into a single [`DocumentationBundle`].
//!
//! # Main entry points
//!
//! - [`parser::parse_instructions`] — segment and resolve a document without
//!   touching the filesystem.
//! - [`links::normalize`] — repair and absolutize the links of one rendered
//!   fragment.
//! - [`pipeline::run`] — the full run: read `LangRef.rst`, write
//!   `<id>.rst`/`<id>.html` per instruction and the `LLVM.json` bundle.
//!
//! # Example
//!
//! ```
//! use langref_docs_extract::parser::parse_instructions;
//!
//! let doc = "\
//! .. _i_fcmp:
//!
//! '``fcmp``, ordered' Instruction
//! ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^
//!
//! .. _i_next:
//! ";
//!
//! let parsed = parse_instructions(doc).unwrap();
//! assert_eq!(parsed[0].instruction.id.as_str(), "fcmp");
//! assert_eq!(parsed[0].instruction.anchor.as_str(), "fcmp-ordered-instruction");
//! ```
//!
//! Rendering is abstracted behind [`render::Renderer`]; the default
//! [`render::PandocRenderer`] shells out to `pandoc`.
//!
//! [`DocumentationBundle`]: langref_docs_core::DocumentationBundle

pub mod links;
pub mod parser;
pub mod pipeline;
pub mod render;

pub use pipeline::{PipelineConfig, PipelineError, RunOutcome, list_instructions, run};
pub use render::{PandocRenderer, RenderError, Renderer, RendererConfig};
