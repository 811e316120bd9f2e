//! Matching free-form strings onto canonical regions.

use regions_model::{Region, RegionId};
use regions_store::{ISO_ALPHA3, ReferenceStore, StoreError};
use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{ResolveError, Result};
use crate::score::similarity;

/// Similarity a fuzzy match must exceed to be accepted.
pub const DEFAULT_THRESHOLD: f64 = 95.0;

/// Tuning for [`CodeResolver`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverOptions {
    /// Fuzzy matches must score strictly above this value (0 to 100).
    pub threshold: f64,
    /// Namespace whose code is reported as `region_code`.
    pub output_namespace: Option<String>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            output_namespace: Some(ISO_ALPHA3.to_string()),
        }
    }
}

/// Which resolution step produced a match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchKind {
    /// Code in the hinted namespace.
    NamespaceCode,
    /// Code in any namespace.
    Code,
    /// Canonical name or registered alias.
    Name,
    /// Closest alias above the threshold.
    Fuzzy { score: f64 },
}

/// A resolved region.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// Canonical region name, lowercased.
    pub region_name: String,
    pub region_code: String,
    #[serde(skip)]
    pub region_id: RegionId,
    #[serde(skip)]
    pub kind: MatchKind,
}

/// An alias scored against an input, as reported by [`CodeResolver::candidates`].
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub alias: String,
    pub region: RegionId,
    pub score: f64,
}

/// Resolves names and codes against a [`ReferenceStore`].
///
/// Steps, first hit wins:
/// 1. code in the hinted namespace
/// 2. code in any namespace
/// 3. canonical name, then registered alias
/// 4. best fuzzy alias scoring above the threshold
pub struct CodeResolver<'a> {
    store: &'a dyn ReferenceStore,
    options: ResolverOptions,
}

impl<'a> CodeResolver<'a> {
    pub fn new(store: &'a dyn ReferenceStore) -> Self {
        Self::with_options(store, ResolverOptions::default())
    }

    pub fn with_options(store: &'a dyn ReferenceStore, options: ResolverOptions) -> Self {
        Self { store, options }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Resolves `input`, returning `None` when nothing matches.
    ///
    /// A hit in `namespace_hint` outranks every other step, so a state
    /// abbreviation is never shadowed by a country code of the same spelling.
    /// Only store failures are errors.
    pub fn resolve(
        &self,
        input: &str,
        namespace_hint: Option<&str>,
    ) -> std::result::Result<Option<Resolution>, StoreError> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(None);
        }

        if let Some(namespace) = namespace_hint
            && let Some(code) = self.store.get_code(namespace, &needle)?
        {
            return self.finish(code.region, Some(code.value), MatchKind::NamespaceCode);
        }

        if let Some(code) = self.store.find_code(&needle)? {
            return self.finish(code.region, Some(code.value), MatchKind::Code);
        }

        if let Some(region) = self.store.find_region_by_name(&needle)? {
            return self.finish(region.id, None, MatchKind::Name);
        }
        if let Some(alias) = self
            .store
            .list_aliases()?
            .into_iter()
            .find(|alias| alias.value.trim().eq_ignore_ascii_case(&needle))
        {
            return self.finish(alias.region, None, MatchKind::Name);
        }

        match self.best_candidate(&needle)? {
            Some(best) if best.score > self.options.threshold => {
                debug!(input, alias = %best.alias, score = best.score, "fuzzy region match");
                self.finish(best.region, None, MatchKind::Fuzzy { score: best.score })
            }
            best => {
                trace!(
                    input,
                    best_score = best.map(|b| b.score),
                    "region unresolved"
                );
                Ok(None)
            }
        }
    }

    /// Like [`CodeResolver::resolve`] but treats "no match" as an error.
    pub fn resolve_strict(&self, input: &str, namespace_hint: Option<&str>) -> Result<Resolution> {
        self.resolve(input, namespace_hint)?
            .ok_or_else(|| ResolveError::UnresolvedCode {
                value: input.to_string(),
                namespace: namespace_hint.map(str::to_string),
            })
    }

    /// Scores every alias against `input`, best first.
    ///
    /// Equal scores keep alias registration order.
    pub fn candidates(
        &self,
        input: &str,
        limit: usize,
    ) -> std::result::Result<Vec<Candidate>, StoreError> {
        let mut scored = self.score_aliases(input)?;
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(limit);
        Ok(scored)
    }

    fn score_aliases(&self, input: &str) -> std::result::Result<Vec<Candidate>, StoreError> {
        Ok(self
            .store
            .list_aliases()?
            .into_iter()
            .map(|alias| Candidate {
                score: similarity(input, &alias.value),
                alias: alias.value,
                region: alias.region,
            })
            .collect())
    }

    fn best_candidate(&self, input: &str) -> std::result::Result<Option<Candidate>, StoreError> {
        let mut best: Option<Candidate> = None;
        for candidate in self.score_aliases(input)? {
            // Strictly greater keeps the first-registered alias on ties.
            if best.as_ref().is_none_or(|b| candidate.score > b.score) {
                best = Some(candidate);
            }
        }
        Ok(best)
    }

    fn finish(
        &self,
        region: RegionId,
        matched_code: Option<String>,
        kind: MatchKind,
    ) -> std::result::Result<Option<Resolution>, StoreError> {
        let region = self.store.require_region(region)?;
        let region_code = self.region_code(&region, matched_code)?;
        Ok(Some(Resolution {
            region_name: region.name.to_lowercase(),
            region_code,
            region_id: region.id,
            kind,
        }))
    }

    /// Output-namespace code, then the matched code, then any code, then the name.
    fn region_code(
        &self,
        region: &Region,
        matched_code: Option<String>,
    ) -> std::result::Result<String, StoreError> {
        if let Some(namespace) = &self.options.output_namespace
            && let Some(code) = self.store.region_code(region.id, namespace)?
        {
            return Ok(code);
        }
        if let Some(code) = matched_code {
            return Ok(code);
        }
        if let Some(code) = self.store.codes_for_region(region.id)?.into_iter().next() {
            return Ok(code.value);
        }
        Ok(region.name.to_uppercase())
    }
}
