//! Hyperlink normalization for rendered instruction fragments.
//!
//! Rendered fragments are read outside the published documentation, so every
//! relative link has to be made absolute. A few anchors in the source point
//! at sections that were renamed upstream; those are corrected first.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use langref_docs_core::InstructionId;
use regex::{Captures, Regex};
use tracing::debug;

/// Published documentation root for the pinned release.
pub const DEFAULT_BASE_URL: &str = "https://releases.llvm.org/14.0.0/docs/";

/// Known-broken link targets and their current equivalents.
pub const LINK_CORRECTIONS: &[(&str, &str)] = &[(
    "CodeGenerator.html#sibcallopt",
    "CodeGenerator.html#tail-call-optimization",
)];

static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href="([^"]*)""#).expect("static regex must compile"));

/// Distinct link targets of one HTML fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkTable {
    pub absolute: BTreeSet<String>,
    pub relative: BTreeSet<String>,
}

impl LinkTable {
    /// Collects every `href` value in `html`.
    pub fn from_html(html: &str) -> Self {
        let mut table = Self::default();
        for captures in HREF_RE.captures_iter(html) {
            let href = &captures[1];
            if is_absolute(href) {
                table.absolute.insert(href.to_string());
            } else {
                table.relative.insert(href.to_string());
            }
        }
        table
    }
}

/// Returns `true` for scheme-prefixed links, which are never rewritten.
pub fn is_absolute(href: &str) -> bool {
    href.starts_with("http")
}

/// Corrects known-broken anchors, then rewrites every relative `href` to
/// `base_url + href`.
///
/// Rewriting replaces whole attribute values, so a link that is a prefix of
/// another (`a.html` and `a.html#x`) cannot corrupt it.
///
/// # Examples
///
/// ```
/// use langref_docs_core::InstructionId;
/// use langref_docs_extract::links::{DEFAULT_BASE_URL, normalize};
///
/// let html = r#"<a href="CodeGenerator.html#sibcallopt">tail calls</a>"#;
/// let normalized = normalize(html, &InstructionId::new("call"), DEFAULT_BASE_URL);
/// assert_eq!(
///     normalized,
///     r#"<a href="https://releases.llvm.org/14.0.0/docs/CodeGenerator.html#tail-call-optimization">tail calls</a>"#
/// );
/// ```
pub fn normalize(html: &str, instruction: &InstructionId, base_url: &str) -> String {
    let mut corrected = Cow::Borrowed(html);
    for (broken, fixed) in LINK_CORRECTIONS {
        if corrected.contains(broken) {
            corrected = Cow::Owned(corrected.replace(broken, fixed));
        }
    }

    let table = LinkTable::from_html(&corrected);
    debug!(
        instruction = %instruction,
        relative = table.relative.len(),
        absolute = table.absolute.len(),
        "Normalizing links"
    );
    if table.relative.is_empty() {
        return corrected.into_owned();
    }

    HREF_RE
        .replace_all(&corrected, |captures: &Captures<'_>| {
            let href = &captures[1];
            if table.relative.contains(href) {
                format!(r#"href="{base_url}{href}""#)
            } else {
                captures[0].to_string()
            }
        })
        .into_owned()
}
