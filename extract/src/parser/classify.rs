//! Line classification predicates.
//!
//! Three total, stateless predicates decide what role a single source line
//! plays: boundary marker, instruction title, or title underline.

use regex::Regex;
use std::sync::LazyLock;

/// Character used to underline instruction titles.
pub const RULE_CHAR: char = '^';

/// Minimum run of [`RULE_CHAR`] that counts as a title underline.
pub const MIN_RULE_LEN: usize = 5;

/// Lowercased title suffix used for segmentation.
const TITLE_SUFFIX_LOWER: &str = "' instruction";

// SAFETY: compile-time constant, exercised by tests.
static BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.\. _([^:]+):$").expect("static regex must compile"));

/// Returns `true` for an internal hyperlink target such as `.. _i_add:`.
///
/// Matching is case-sensitive and anchored at both ends.
pub fn is_section_boundary_marker(line: &str) -> bool {
    BOUNDARY_RE.is_match(line)
}

/// Returns `true` when the line ends with `' instruction`, ignoring case.
///
/// Source documents capitalize "Instruction" inconsistently, so this check is
/// looser than the one applied when resolving a section's title.
pub fn is_instruction_title_line(line: &str) -> bool {
    line.len() >= TITLE_SUFFIX_LOWER.len()
        && line
            .get(line.len() - TITLE_SUFFIX_LOWER.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(TITLE_SUFFIX_LOWER))
}

/// Returns `true` when the line is a run of at least [`MIN_RULE_LEN`]
/// [`RULE_CHAR`]s (trailing whitespace ignored).
pub fn is_rule_line(line: &str) -> bool {
    let trimmed = line.trim_end();
    trimmed.len() >= MIN_RULE_LEN && trimmed.chars().all(|ch| ch == RULE_CHAR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_marker_matches_hyperlink_targets() {
        assert!(is_section_boundary_marker(".. _i_add:"));
        assert!(is_section_boundary_marker(".. _int_memcpy:"));
        assert!(is_section_boundary_marker(".. _fcmp ordered:"));
    }

    #[test]
    fn test_boundary_marker_rejects_near_misses() {
        assert!(!is_section_boundary_marker(".. _:"));
        assert!(!is_section_boundary_marker(".. _a:b:"));
        assert!(!is_section_boundary_marker(" .. _i_add:"));
        assert!(!is_section_boundary_marker(".. _i_add: "));
        assert!(!is_section_boundary_marker(".. note::"));
        assert!(!is_section_boundary_marker(".. _I_ADD"));
    }

    #[test]
    fn test_title_line_is_case_insensitive() {
        assert!(is_instruction_title_line("'``add``' Instruction"));
        assert!(is_instruction_title_line("'``add``' instruction"));
        assert!(is_instruction_title_line("'``add``' INSTRUCTION"));
        assert!(is_instruction_title_line("'``fcmp``, ordered' Instruction"));
    }

    #[test]
    fn test_title_line_requires_quote_before_suffix() {
        assert!(!is_instruction_title_line("Instruction"));
        assert!(!is_instruction_title_line("The add Instruction"));
        assert!(!is_instruction_title_line("'``add``' Instructions"));
        assert!(!is_instruction_title_line(""));
    }

    #[test]
    fn test_title_line_handles_multibyte_text() {
        assert!(!is_instruction_title_line("é"));
        assert!(!is_instruction_title_line("ééééééééééééé"));
        assert!(is_instruction_title_line("'``é``' Instruction"));
    }

    #[test]
    fn test_rule_line_requires_five_markers() {
        assert!(is_rule_line("^^^^^"));
        assert!(is_rule_line("^^^^^^^^^^^^^^^^^^^^^^^^"));
        assert!(is_rule_line("^^^^^^^   "));
        assert!(!is_rule_line("^^^^"));
        assert!(!is_rule_line("====="));
        assert!(!is_rule_line("^^^^^ title"));
        assert!(!is_rule_line(""));
    }
}
