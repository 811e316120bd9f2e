//! Reference entities: regions, namespaces and the codes that bind them.
//!
//! A [`Region`] is a canonical geographic entity. A [`Namespace`] is a coding
//! authority (ISO 3166-1 alpha-3, USPS abbreviations, ...) under which every
//! [`Code`] value is unique. Entities reference each other through copyable
//! ids so that any storage backend can hand them out by value.

use serde::{Deserialize, Serialize};

/// Handle to a region inside a reference store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(usize);

impl RegionId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to a namespace inside a reference store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceId(usize);

impl NamespaceId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// A canonical geographic entity (country, territory, state, county, ...).
///
/// `parent` is a back-reference only; subregions are derived by reverse
/// lookup in the store and never stored on the parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    /// Unique canonical name.
    pub name: String,
    /// Region kind, e.g. "country", "territory", "state".
    #[serde(rename = "type")]
    pub region_type: String,
    /// Alternate names in registration order. The canonical name is always first.
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub parent: Option<RegionId>,
}

impl Region {
    /// Returns true if `name` matches the canonical name or any alias, ignoring case.
    pub fn is_known_as(&self, name: &str) -> bool {
        let needle = name.trim();
        self.name.eq_ignore_ascii_case(needle)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(needle))
    }
}

/// A coding authority under which code values are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub id: NamespaceId,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub wiki: Option<String>,
}

/// Attributes for creating a namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewNamespace {
    pub name: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub wiki: Option<String>,
}

impl NewNamespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_wiki(mut self, wiki: impl Into<String>) -> Self {
        self.wiki = Some(wiki.into());
        self
    }
}

/// A namespace-scoped identifier bound to exactly one region.
///
/// `value` is stored uppercase; `(namespace, value)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Code {
    pub namespace: NamespaceId,
    pub value: String,
    pub region: RegionId,
}

/// An alternate name registered for a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub value: String,
    pub region: RegionId,
}

/// Returns true if `value` can be stored as a code.
///
/// Upstream reference tables leave optional codes blank or write them as
/// `nan`; neither is a code.
pub fn is_valid_code(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("nan")
}

/// Normalizes a code value for storage and lookup (trimmed, uppercase).
///
/// Returns `None` for values rejected by [`is_valid_code`].
pub fn normalize_code(value: &str) -> Option<String> {
    is_valid_code(value).then(|| value.trim().to_uppercase())
}
