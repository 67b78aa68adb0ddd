//! Domain types shared by the extraction pipeline.
//!
//! A [`Section`] borrows its lines from the source document; resolving it
//! yields an [`Instruction`] carrying the [`InstructionId`] used as file stem
//! and bundle key, and the [`Anchor`] that locates the instruction in the
//! published documentation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Case-sensitive suffix of an instruction title line.
pub const INSTRUCTION_TITLE_SUFFIX: &str = "' Instruction";

/// Suffix appended to every instruction anchor.
pub const ANCHOR_SUFFIX: &str = "-instruction";

/// Page of the published documentation that hosts the instruction reference.
pub const LANGREF_PAGE: &str = "LangRef.html";

/// Contiguous run of source lines believed to document one instruction.
///
/// Lines are newline-stripped and borrowed from the document, which stays the
/// owner for the whole run.
///
/// # Examples
///
/// ```
/// use langref_docs_core::Section;
///
/// let section = Section::new(vec![".. _i_add:", "", "'``add``' Instruction"]);
/// assert_eq!(section.len(), 3);
/// assert_eq!(section.first_line(), Some(".. _i_add:"));
/// assert_eq!(section.to_text(), ".. _i_add:\n\n'``add``' Instruction");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Section<'a> {
    lines: Vec<&'a str>,
}

impl<'a> Section<'a> {
    pub fn new(lines: Vec<&'a str>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// First line of the section, used to point at offending content in
    /// diagnostics.
    pub fn first_line(&self) -> Option<&'a str> {
        self.lines.first().copied()
    }

    /// Raw markup text handed to the renderer: lines joined by `\n`.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Canonical short name of an instruction (e.g. `add`, `getelementptr`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstructionId(String);

impl InstructionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstructionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for InstructionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Fragment identifier of an instruction in the published documentation.
///
/// Built from the mnemonic and any trailing title qualifier, normalized the
/// same way the documentation generator derives section ids: lowercase, with
/// each run of non-alphanumeric characters collapsed to a single `-`.
///
/// # Examples
///
/// ```
/// use langref_docs_core::Anchor;
///
/// assert_eq!(Anchor::from_title_parts("add", "").as_str(), "add-instruction");
/// assert_eq!(
///     Anchor::from_title_parts("fcmp", ", ordered").as_str(),
///     "fcmp-ordered-instruction"
/// );
/// assert_eq!(Anchor::from_title_parts("va_arg", "").as_str(), "va-arg-instruction");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Anchor(String);

impl Anchor {
    pub fn from_title_parts(mnemonic: &str, qualifier: &str) -> Self {
        let mut anchor = normalize_section_id(&format!("{mnemonic}{qualifier}"));
        anchor.push_str(ANCHOR_SUFFIX);
        Self(anchor)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn normalize_section_id(text: &str) -> String {
    let mut id = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !id.is_empty() {
                id.push('-');
            }
            pending_dash = false;
            id.push(ch);
        } else {
            pending_dash = true;
        }
    }
    id
}

/// A resolved instruction section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub id: InstructionId,
    pub anchor: Anchor,
    /// Title line the id and anchor were derived from.
    pub title: String,
}

impl Instruction {
    /// Absolute link to this instruction in the documentation rooted at
    /// `base_url`.
    ///
    /// # Examples
    ///
    /// ```
    /// use langref_docs_core::{Anchor, Instruction, InstructionId};
    ///
    /// let add = Instruction {
    ///     id: InstructionId::new("add"),
    ///     anchor: Anchor::from_title_parts("add", ""),
    ///     title: "'``add``' Instruction".into(),
    /// };
    /// assert_eq!(
    ///     add.documentation_url("https://releases.llvm.org/14.0.0/docs/"),
    ///     "https://releases.llvm.org/14.0.0/docs/LangRef.html#add-instruction"
    /// );
    /// ```
    pub fn documentation_url(&self, base_url: &str) -> String {
        format!("{base_url}{LANGREF_PAGE}#{}", self.anchor)
    }
}
