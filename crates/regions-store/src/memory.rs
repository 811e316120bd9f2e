//! In-memory reference store with JSON snapshots.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use regions_model::{
    Alias, Code, Namespace, NamespaceId, NewNamespace, Region, RegionId, Scale, normalize_code,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::store::ReferenceStore;

/// Arena-backed [`ReferenceStore`].
///
/// Entities live in registration-ordered vectors; the lookup indexes are
/// derived and rebuilt after a snapshot is loaded.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MemoryStore {
    regions: Vec<Region>,
    namespaces: Vec<Namespace>,
    codes: Vec<Code>,
    aliases: Vec<Alias>,
    scales: Vec<Scale>,
    #[serde(skip)]
    index: StoreIndex,
}

#[derive(Debug, Default, Clone)]
struct StoreIndex {
    region_names: HashMap<String, RegionId>,
    namespace_names: HashMap<String, NamespaceId>,
    codes: HashMap<(NamespaceId, String), usize>,
    scales: HashMap<String, usize>,
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a snapshot written by [`MemoryStore::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        let mut store: Self =
            serde_json::from_str(&text).map_err(|source| StoreError::Snapshot {
                path: path.to_path_buf(),
                source,
            })?;
        store.rebuild_index();
        debug!(
            path = %path.display(),
            regions = store.regions.len(),
            codes = store.codes.len(),
            "loaded store snapshot"
        );
        Ok(store)
    }

    /// Loads the snapshot at `path`, or starts empty when the file does not exist.
    pub fn open(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| StoreError::Snapshot {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|e| StoreError::io(path, e))
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn code_count(&self) -> usize {
        self.codes.len()
    }

    fn rebuild_index(&mut self) {
        let mut index = StoreIndex::default();
        for region in &self.regions {
            index
                .region_names
                .entry(name_key(&region.name))
                .or_insert(region.id);
        }
        for namespace in &self.namespaces {
            index
                .namespace_names
                .entry(name_key(&namespace.name))
                .or_insert(namespace.id);
        }
        for (position, code) in self.codes.iter().enumerate() {
            index
                .codes
                .entry((code.namespace, code.value.clone()))
                .or_insert(position);
        }
        for (position, scale) in self.scales.iter().enumerate() {
            index.scales.entry(scale.code.clone()).or_insert(position);
        }
        self.index = index;
    }

    fn namespace_id(&self, name: &str) -> Option<NamespaceId> {
        self.index.namespace_names.get(&name_key(name)).copied()
    }

    fn region_ref(&self, id: RegionId) -> Result<&Region> {
        self.regions
            .get(id.index())
            .ok_or(StoreError::UnknownRegion(id))
    }

    fn region_mut(&mut self, id: RegionId) -> Result<&mut Region> {
        self.regions
            .get_mut(id.index())
            .ok_or(StoreError::UnknownRegion(id))
    }
}

impl ReferenceStore for MemoryStore {
    fn region(&self, id: RegionId) -> Result<Option<Region>> {
        Ok(self.regions.get(id.index()).cloned())
    }

    fn find_region_by_name(&self, name: &str) -> Result<Option<Region>> {
        Ok(self
            .index
            .region_names
            .get(&name_key(name))
            .and_then(|id| self.regions.get(id.index()))
            .cloned())
    }

    fn get_namespace(&self, name: &str) -> Result<Option<Namespace>> {
        Ok(self
            .namespace_id(name)
            .and_then(|id| self.namespaces.get(id.index()))
            .cloned())
    }

    fn get_code(&self, namespace: &str, value: &str) -> Result<Option<Code>> {
        let (Some(namespace), Some(value)) = (self.namespace_id(namespace), normalize_code(value))
        else {
            return Ok(None);
        };
        Ok(self
            .index
            .codes
            .get(&(namespace, value))
            .and_then(|position| self.codes.get(*position))
            .cloned())
    }

    fn add_region(
        &mut self,
        name: &str,
        region_type: &str,
        parent: Option<RegionId>,
    ) -> Result<Region> {
        let name = name.trim();
        let key = name_key(name);
        if self.index.region_names.contains_key(&key) {
            return Err(StoreError::DuplicateRegion {
                name: name.to_string(),
            });
        }
        if let Some(parent) = parent {
            self.region_ref(parent)?;
        }
        let id = RegionId::new(self.regions.len());
        let region = Region {
            id,
            name: name.to_string(),
            region_type: region_type.to_string(),
            aliases: vec![name.to_string()],
            parent,
        };
        self.regions.push(region.clone());
        self.aliases.push(Alias {
            value: name.to_string(),
            region: id,
        });
        self.index.region_names.insert(key, id);
        Ok(region)
    }

    fn add_namespace(&mut self, namespace: NewNamespace) -> Result<Namespace> {
        if let Some(existing) = self.get_namespace(&namespace.name)? {
            return Ok(existing);
        }
        let id = NamespaceId::new(self.namespaces.len());
        let created = Namespace {
            id,
            name: namespace.name.trim().to_string(),
            url: namespace.url,
            description: namespace.description,
            wiki: namespace.wiki,
        };
        self.index
            .namespace_names
            .insert(name_key(&created.name), id);
        self.namespaces.push(created.clone());
        Ok(created)
    }

    fn add_code(
        &mut self,
        namespace: &str,
        region: RegionId,
        value: &str,
    ) -> Result<Option<Code>> {
        let Some(value) = normalize_code(value) else {
            return Ok(None);
        };
        let namespace_id = self
            .namespace_id(namespace)
            .ok_or_else(|| StoreError::UnknownNamespace(namespace.to_string()))?;
        self.region_ref(region)?;

        let key = (namespace_id, value);
        if let Some(position) = self.index.codes.get(&key).copied() {
            let existing = &self.codes[position];
            if existing.region == region {
                return Ok(Some(existing.clone()));
            }
            return Err(StoreError::CodeConflict {
                namespace: namespace.to_string(),
                value: key.1,
                existing: self.region_ref(existing.region)?.name.clone(),
            });
        }

        let code = Code {
            namespace: namespace_id,
            value: key.1.clone(),
            region,
        };
        self.index.codes.insert(key, self.codes.len());
        self.codes.push(code.clone());
        Ok(Some(code))
    }

    fn add_alias(&mut self, region: RegionId, alias: &str) -> Result<Region> {
        let alias = alias.trim();
        let target = self.region_mut(region)?;
        if alias.is_empty() || target.is_known_as(alias) {
            return Ok(target.clone());
        }
        target.aliases.push(alias.to_string());
        let updated = target.clone();
        self.aliases.push(Alias {
            value: alias.to_string(),
            region,
        });
        Ok(updated)
    }

    fn set_parent(&mut self, region: RegionId, parent: Option<RegionId>) -> Result<Region> {
        let name = self.region_ref(region)?.name.clone();
        if let Some(parent) = parent {
            let mut cursor = Some(parent);
            while let Some(current) = cursor {
                let ancestor = self.region_ref(current)?;
                if current == region {
                    return Err(StoreError::CyclicParent {
                        region: name,
                        parent: self.region_ref(parent)?.name.clone(),
                    });
                }
                cursor = ancestor.parent;
            }
        }
        let target = self.region_mut(region)?;
        target.parent = parent;
        Ok(target.clone())
    }

    fn add_scale(&mut self, code: &str, multiplier: f64) -> Result<Scale> {
        let code = code.trim().to_lowercase();
        if let Some(position) = self.index.scales.get(&code) {
            return Ok(self.scales[*position].clone());
        }
        let scale = Scale {
            code: code.clone(),
            multiplier,
        };
        self.index.scales.insert(code, self.scales.len());
        self.scales.push(scale.clone());
        Ok(scale)
    }

    fn get_scale(&self, code: &str) -> Result<Option<Scale>> {
        Ok(self
            .index
            .scales
            .get(&code.trim().to_lowercase())
            .and_then(|position| self.scales.get(*position))
            .cloned())
    }

    fn list_regions(&self) -> Result<Vec<Region>> {
        Ok(self.regions.clone())
    }

    fn list_namespaces(&self) -> Result<Vec<Namespace>> {
        Ok(self.namespaces.clone())
    }

    fn list_codes(&self, namespace: &str) -> Result<Vec<Code>> {
        let Some(id) = self.namespace_id(namespace) else {
            return Ok(Vec::new());
        };
        Ok(self
            .codes
            .iter()
            .filter(|code| code.namespace == id)
            .cloned()
            .collect())
    }

    fn codes_for_region(&self, region: RegionId) -> Result<Vec<Code>> {
        Ok(self
            .codes
            .iter()
            .filter(|code| code.region == region)
            .cloned()
            .collect())
    }

    fn list_scales(&self) -> Result<Vec<Scale>> {
        Ok(self.scales.clone())
    }

    fn list_aliases(&self) -> Result<Vec<Alias>> {
        Ok(self.aliases.clone())
    }
}
