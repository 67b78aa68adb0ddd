use std::collections::HashSet;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::{InstructionId, ValidationError};

/// Insertion-ordered mapping from instruction id to normalized HTML.
///
/// The bundle is the only artifact persisted as a whole. It is built once
/// per run and has no update or delete operations; a repeated id is an
/// error rather than an overwrite.
///
/// # Examples
///
/// ```
/// use langref_docs_core::*;
///
/// let bundle = DocumentationBundle::assemble([
///     (InstructionId::new("ret"), "<p>ret</p>".to_string()),
///     (InstructionId::new("br"), "<p>br</p>".to_string()),
/// ])
/// .unwrap();
///
/// assert_eq!(bundle.len(), 2);
/// assert_eq!(bundle.get("br"), Some("<p>br</p>"));
/// let ids: Vec<&str> = bundle.ids().map(InstructionId::as_str).collect();
/// assert_eq!(ids, ["ret", "br"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentationBundle {
    entries: Vec<(InstructionId, String)>,
    seen: HashSet<InstructionId>,
}

impl DocumentationBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects `(id, html)` pairs in the order given.
    pub fn assemble(
        pairs: impl IntoIterator<Item = (InstructionId, String)>,
    ) -> Result<Self, ValidationError> {
        let mut bundle = Self::new();
        for (id, html) in pairs {
            bundle.insert(id, html)?;
        }
        Ok(bundle)
    }

    /// Appends an entry, failing if `id` is already present.
    pub fn insert(&mut self, id: InstructionId, html: String) -> Result<(), ValidationError> {
        if !self.seen.insert(id.clone()) {
            return Err(ValidationError::DuplicateInstruction(id.to_string()));
        }
        self.entries.push((id, html));
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(entry_id, _)| entry_id.as_str() == id)
            .map(|(_, html)| html.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &InstructionId> {
        self.entries.iter().map(|(id, _)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&InstructionId, &str)> {
        self.entries.iter().map(|(id, html)| (id, html.as_str()))
    }

    /// Serializes as a JSON object with 2-space indentation, keys in
    /// insertion order.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for DocumentationBundle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, html) in self.iter() {
            map.serialize_entry(id, html)?;
        }
        map.end()
    }
}
