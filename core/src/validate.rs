//! Structural validation errors for sections and bundles.
//!
//! A section that fails validation aborts the whole run; nothing is guessed.
//!
//! # Examples
//!
//! ```
//! use langref_docs_core::*;
//!
//! let ids = [InstructionId::new("add"), InstructionId::new("sub")];
//! assert!(ensure_unique_ids(&ids).is_ok());
//!
//! let ids = [InstructionId::new("add"), InstructionId::new("add")];
//! assert_eq!(
//!     ensure_unique_ids(&ids),
//!     Err(ValidationError::DuplicateInstruction("add".into()))
//! );
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::InstructionId;

/// Section and bundle validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No line of the section ends with the instruction title suffix.
    #[error("section has no instruction title line (starts with {first_line:?})")]
    MissingTitle {
        /// First line of the offending section.
        first_line: String,
    },
    /// The section does not contain exactly one title underline.
    #[error("expected exactly one rule line, found {found} (section starts with {first_line:?})")]
    RuleLineCount {
        /// Number of rule lines found.
        found: usize,
        /// First line of the offending section.
        first_line: String,
    },
    /// The title line does not have the quoted-mnemonic shape.
    #[error("instruction title does not match the expected shape: {title:?}")]
    PatternMismatch {
        /// The title line that failed to match.
        title: String,
    },
    /// Two sections resolved to the same instruction id.
    #[error("duplicate instruction id: {0}")]
    DuplicateInstruction(String),
}

/// Fails on the first id that repeats an earlier one.
pub fn ensure_unique_ids<'a>(
    ids: impl IntoIterator<Item = &'a InstructionId>,
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id.as_str()) {
            return Err(ValidationError::DuplicateInstruction(id.to_string()));
        }
    }
    Ok(())
}
