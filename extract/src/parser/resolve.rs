//! Title and anchor resolution for a completed section.

use regex::Regex;
use std::sync::LazyLock;

use langref_docs_core::{
    Anchor, INSTRUCTION_TITLE_SUFFIX, Instruction, InstructionId, Section, ValidationError,
};

use super::classify::is_rule_line;

// Mnemonic (no spaces or backticks), qualifier inside the literal, qualifier
// after it, then the closing quote and suffix.
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^'``([^ `]+)([^`]*)``([^']*)' Instruction$").expect("static regex must compile")
});

/// Resolves a section's instruction id and anchor.
///
/// The title is the last line ending in `' Instruction` (case-sensitive).
/// The section must contain exactly one rule line and a title; anything else
/// is reported instead of guessed. A mnemonic that is not a single path
/// component (`..`, or containing `/` or `\\`) is a pattern mismatch.
///
/// # Examples
///
/// ```
/// use langref_docs_core::Section;
/// use langref_docs_extract::parser::resolve;
///
/// let section = Section::new(vec![
///     ".. _i_fcmp:",
///     "",
///     "'``fcmp``, ordered' Instruction",
///     "^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^",
/// ]);
/// let instruction = resolve(&section).unwrap();
/// assert_eq!(instruction.id.as_str(), "fcmp");
/// assert_eq!(instruction.anchor.as_str(), "fcmp-ordered-instruction");
/// ```
pub fn resolve(section: &Section<'_>) -> Result<Instruction, ValidationError> {
    let mut title = None;
    let mut rule_lines = 0usize;
    for line in section.lines() {
        if line.ends_with(INSTRUCTION_TITLE_SUFFIX) {
            title = Some(*line);
        }
        if is_rule_line(line) {
            rule_lines += 1;
        }
    }

    let first_line = || section.first_line().unwrap_or_default().to_string();
    if rule_lines != 1 {
        return Err(ValidationError::RuleLineCount {
            found: rule_lines,
            first_line: first_line(),
        });
    }
    let Some(title) = title else {
        return Err(ValidationError::MissingTitle {
            first_line: first_line(),
        });
    };

    let captures = TITLE_RE
        .captures(title)
        .ok_or_else(|| ValidationError::PatternMismatch {
            title: title.to_string(),
        })?;
    let mnemonic = &captures[1];
    if !is_file_stem(mnemonic) {
        return Err(ValidationError::PatternMismatch {
            title: title.to_string(),
        });
    }
    let qualifier = format!("{}{}", &captures[2], &captures[3]);

    Ok(Instruction {
        id: InstructionId::new(mnemonic),
        anchor: Anchor::from_title_parts(mnemonic, &qualifier),
        title: title.to_string(),
    })
}

/// Ids name the per-instruction output files, so they must be a single
/// path component.
fn is_file_stem(mnemonic: &str) -> bool {
    !matches!(mnemonic, "." | "..") && !mnemonic.contains(['/', '\\'])
}
