//! Pattern-based segmentation of the language reference.
//!
//! The document is not parsed as reStructuredText. Instead it is treated as a
//! flat sequence of lines:
//!
//! - [`classify`] decides what a single line is (boundary marker, title line,
//!   title underline),
//! - [`segment`] groups lines into instruction sections,
//! - [`resolve`] derives each section's id and anchor from its title.
//!
//! [`parse_instructions`] runs all three over a whole document.

pub mod classify;
mod resolve;
mod segment;

use langref_docs_core::{Instruction, Section, ValidationError, ensure_unique_ids};
use tracing::debug;

pub use resolve::resolve;
pub use segment::{Segmenter, segment};

/// A resolved section together with the lines it was resolved from.
#[derive(Debug, Clone)]
pub struct ParsedInstruction<'a> {
    pub instruction: Instruction,
    pub section: Section<'a>,
}

/// Segments `text` and resolves every section.
///
/// Fails on the first malformed section or on a repeated instruction id, so
/// callers never see a partial result.
///
/// # Examples
///
/// ```
/// use langref_docs_extract::parser::parse_instructions;
///
/// let doc = "\
/// .. _i_add:
///
/// '``add``' Instruction
/// ^^^^^^^^^^^^^^^^^^^^^
///
/// .. _i_sub:
///
/// '``sub``' Instruction
/// ^^^^^^^^^^^^^^^^^^^^^
///
/// .. _i_mul:
/// ";
/// let parsed = parse_instructions(doc).unwrap();
/// let ids: Vec<&str> = parsed.iter().map(|p| p.instruction.id.as_str()).collect();
/// assert_eq!(ids, ["add", "sub"]);
/// ```
pub fn parse_instructions(text: &str) -> Result<Vec<ParsedInstruction<'_>>, ValidationError> {
    let mut parsed = Vec::new();
    for section in segment(text.lines()) {
        let instruction = resolve(&section)?;
        debug!(
            instruction = %instruction.id,
            anchor = %instruction.anchor,
            lines = section.len(),
            "Resolved instruction section"
        );
        parsed.push(ParsedInstruction {
            instruction,
            section,
        });
    }

    ensure_unique_ids(parsed.iter().map(|p| &p.instruction.id))?;
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_titles_are_rejected() {
        let doc = "\
'``add``' Instruction
^^^^^^^^^^^^^^^^^^^^^
.. _x:
'``add``' Instruction
^^^^^^^^^^^^^^^^^^^^^
.. _y:
";
        let err = parse_instructions(doc).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateInstruction("add".to_string()));
    }

    #[test]
    fn test_first_malformed_section_aborts() {
        let doc = "\
'``add``' Instruction
^^^^^^^^^^^^^^^^^^^^^
^^^^^^^^^^^^^^^^^^^^^
.. _x:
'``sub``' Instruction
.. _y:
";
        let err = parse_instructions(doc).unwrap_err();
        assert!(matches!(err, ValidationError::RuleLineCount { found: 2, .. }));
    }

    #[test]
    fn test_crlf_line_endings() {
        let doc = "'``ret``' Instruction\r\n^^^^^^^^^^^^^^^^^^^^^\r\n.. _x:\r\n";
        let parsed = parse_instructions(doc).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].instruction.id.as_str(), "ret");
    }
}
