//! Feeding regions discovered in an import back into the reference store.

use regions_model::{NewNamespace, NormalizedDataset};
use regions_store::ReferenceStore;
use serde::Serialize;
use tracing::{debug, info_span};

use crate::error::Result;

/// Counts from one [`register_regions`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegisterSummary {
    pub namespace: String,
    pub regions_added: usize,
    pub codes_added: usize,
    /// Records whose code was already registered in the namespace.
    pub known: usize,
}

/// Adds each dataset region and its code to `namespace` unless the store
/// already knows the code there.
///
/// Regions are matched by name before new ones are created, so running the
/// same dataset twice changes nothing. `region_type` overrides the type
/// recorded in the dataset.
pub fn register_regions(
    store: &mut dyn ReferenceStore,
    dataset: &NormalizedDataset,
    namespace: &str,
    region_type: Option<&str>,
) -> Result<RegisterSummary> {
    let span = info_span!("register_regions", namespace, regions = dataset.regions.len());
    let _guard = span.enter();

    store.add_namespace(NewNamespace::new(namespace))?;
    let mut summary = RegisterSummary {
        namespace: namespace.to_string(),
        ..RegisterSummary::default()
    };

    for record in &dataset.regions {
        if store.get_code(namespace, &record.region_code)?.is_some() {
            summary.known += 1;
            continue;
        }
        let region = match store.find_region_by_name(&record.region_name)? {
            Some(region) => region,
            None => {
                summary.regions_added += 1;
                store.add_region(
                    &record.region_name,
                    region_type.unwrap_or(&record.region_type),
                    None,
                )?
            }
        };
        if store
            .add_code(namespace, region.id, &record.region_code)?
            .is_some()
        {
            summary.codes_added += 1;
            debug!(region = %region.name, code = %record.region_code, "region code registered");
        }
    }
    Ok(summary)
}
