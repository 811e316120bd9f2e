//! Storage-agnostic interface to the reference data.

use regions_model::{Alias, Code, Namespace, NewNamespace, Region, RegionId, Scale};

use crate::error::{Result, StoreError};

/// Lookup and insert operations over regions, namespaces, codes, aliases and scales.
///
/// Every method returns `Result` so that backends which can lose connectivity
/// report it as [`StoreError::Unavailable`]. Lookups never fail for absent
/// entities; they return `None` instead.
///
/// All writes are additive and safe to retry:
/// - `add_namespace`, `add_alias` and `add_scale` are no-ops on existing keys.
/// - `add_code` returns the existing code when it already points at the same region.
pub trait ReferenceStore {
    /// Returns the region behind a handle.
    fn region(&self, id: RegionId) -> Result<Option<Region>>;

    /// Case-insensitive match on canonical region names.
    fn find_region_by_name(&self, name: &str) -> Result<Option<Region>>;

    fn get_namespace(&self, name: &str) -> Result<Option<Namespace>>;

    /// Looks up a code by namespace name and value. The value is matched uppercase.
    fn get_code(&self, namespace: &str, value: &str) -> Result<Option<Code>>;

    /// Adds a region and registers its name as the first alias.
    ///
    /// Fails with [`StoreError::DuplicateRegion`] when the name is taken.
    fn add_region(
        &mut self,
        name: &str,
        region_type: &str,
        parent: Option<RegionId>,
    ) -> Result<Region>;

    fn add_namespace(&mut self, namespace: NewNamespace) -> Result<Namespace>;

    /// Binds `value` to `region` in `namespace`.
    ///
    /// Returns `None` without error when the value is empty or `nan`.
    fn add_code(&mut self, namespace: &str, region: RegionId, value: &str)
    -> Result<Option<Code>>;

    fn add_alias(&mut self, region: RegionId, alias: &str) -> Result<Region>;

    /// Re-parents a region. Rejects parent chains that loop back to `region`.
    fn set_parent(&mut self, region: RegionId, parent: Option<RegionId>) -> Result<Region>;

    /// Adds a scale. The first multiplier registered for a code wins.
    fn add_scale(&mut self, code: &str, multiplier: f64) -> Result<Scale>;

    fn get_scale(&self, code: &str) -> Result<Option<Scale>>;

    fn list_regions(&self) -> Result<Vec<Region>>;

    fn list_namespaces(&self) -> Result<Vec<Namespace>>;

    fn list_codes(&self, namespace: &str) -> Result<Vec<Code>>;

    /// Codes bound to a region, in registration order.
    fn codes_for_region(&self, region: RegionId) -> Result<Vec<Code>>;

    fn list_scales(&self) -> Result<Vec<Scale>>;

    /// Every alias of every region, in global registration order.
    fn list_aliases(&self) -> Result<Vec<Alias>>;

    /// Finds a region by canonical name, then by code in any namespace.
    ///
    /// Namespaces are searched in registration order.
    fn get_region(&self, name_or_code: &str) -> Result<Option<Region>> {
        if let Some(region) = self.find_region_by_name(name_or_code)? {
            return Ok(Some(region));
        }
        match self.find_code(name_or_code)? {
            Some(code) => self.region(code.region),
            None => Ok(None),
        }
    }

    /// Searches every namespace for a code value, in namespace registration order.
    fn find_code(&self, value: &str) -> Result<Option<Code>> {
        for namespace in self.list_namespaces()? {
            if let Some(code) = self.get_code(&namespace.name, value)? {
                return Ok(Some(code));
            }
        }
        Ok(None)
    }

    /// Regions whose parent is `region`. Derived, never stored.
    fn subregions(&self, region: RegionId) -> Result<Vec<Region>> {
        Ok(self
            .list_regions()?
            .into_iter()
            .filter(|r| r.parent == Some(region))
            .collect())
    }

    /// The value a region carries in a namespace, if any.
    fn region_code(&self, region: RegionId, namespace: &str) -> Result<Option<String>> {
        let Some(namespace) = self.get_namespace(namespace)? else {
            return Ok(None);
        };
        Ok(self
            .codes_for_region(region)?
            .into_iter()
            .find(|code| code.namespace == namespace.id)
            .map(|code| code.value))
    }

    /// Returns the region named `name`, adding it when absent.
    fn ensure_region(&mut self, name: &str, region_type: &str) -> Result<Region> {
        match self.find_region_by_name(name)? {
            Some(region) => Ok(region),
            None => self.add_region(name, region_type, None),
        }
    }

    /// Like [`ReferenceStore::region`] but fails for unknown handles.
    fn require_region(&self, id: RegionId) -> Result<Region> {
        self.region(id)?.ok_or(StoreError::UnknownRegion(id))
    }
}
