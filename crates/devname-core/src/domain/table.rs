//! The immutable family/model lookup table.

use std::collections::BTreeMap;

/// A single model row within a family, keyed by the identifier suffix that
/// remains after the family prefix is removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEntry {
    /// Identifier suffix, e.g. `"10,3"` for `"iPhone10,3"`.
    pub suffix: String,
    /// Marketing name, e.g. `"X"`.
    pub name: String,
    /// Optional variant label, e.g. `"Wi-Fi"` or `"GSM"`.
    pub type_label: Option<String>,
}

/// Immutable snapshot of family-prefix → family-name mappings plus the
/// per-family model rows.
///
/// A table is only ever replaced wholesale (partial family/model updates are
/// not representable); resolution against one snapshot is therefore always
/// internally consistent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupTable {
    /// Family prefix → family display name. Prefixes need not be mutually
    /// exclusive; resolution picks the longest match.
    families: BTreeMap<String, String>,
    /// Family display name → ordered model rows.
    models: BTreeMap<String, Vec<ModelEntry>>,
}

impl LookupTable {
    /// Build a table from its two mappings.
    #[must_use]
    pub fn new(
        families: BTreeMap<String, String>,
        models: BTreeMap<String, Vec<ModelEntry>>,
    ) -> Self {
        Self { families, models }
    }

    /// A table with no families; resolution passes identifiers through.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// `true` when no families are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Number of known family prefixes.
    #[must_use]
    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    /// Total number of model rows across all families.
    #[must_use]
    pub fn model_count(&self) -> usize {
        self.models.values().map(Vec::len).sum()
    }

    /// Find the family whose prefix is the longest literal prefix of
    /// `identifier`.
    ///
    /// Returns `(prefix, family_name)`. Overlapping prefixes (e.g. `"Mac"`
    /// and `"MacBookPro"`) are expected; the longest match wins.
    #[must_use]
    pub fn match_family(&self, identifier: &str) -> Option<(&str, &str)> {
        self.families
            .iter()
            .filter(|(prefix, _)| identifier.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(prefix, name)| (prefix.as_str(), name.as_str()))
    }

    /// Exact suffix lookup within a family's ordered rows.
    ///
    /// When a suffix appears more than once, the last row wins.
    #[must_use]
    pub fn find_model(&self, family_name: &str, suffix: &str) -> Option<&ModelEntry> {
        self.models
            .get(family_name)?
            .iter()
            .rev()
            .find(|entry| entry.suffix == suffix)
    }
}
