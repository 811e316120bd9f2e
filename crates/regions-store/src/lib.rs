//! Reference data for region identification.
//!
//! [`ReferenceStore`] is the storage-agnostic interface consumed by the
//! resolver and the ingestion pipeline; [`MemoryStore`] implements it in
//! memory with JSON snapshots. The [`bootstrap`] module loads the
//! authoritative ISO and USPS tables.

#![deny(unsafe_code)]

pub mod bootstrap;
mod csv_utils;
pub mod error;
pub mod memory;
pub mod store;

pub use bootstrap::{
    ISO_ALPHA2, ISO_ALPHA3, ISO_NUMERIC, ImportSummary, UNITED_STATES, USPS, import_aliases,
    import_iso, import_usps, install_default_scales,
};
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use store::ReferenceStore;
