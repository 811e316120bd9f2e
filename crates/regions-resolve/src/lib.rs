//! Region identification: names, codes, aliases and misspellings mapped onto
//! canonical regions from a [`regions_store::ReferenceStore`].

#![deny(unsafe_code)]

pub mod error;
pub mod resolver;
pub mod score;

pub use error::{ResolveError, Result};
pub use resolver::{
    Candidate, CodeResolver, DEFAULT_THRESHOLD, MatchKind, Resolution, ResolverOptions,
};
pub use score::similarity;
