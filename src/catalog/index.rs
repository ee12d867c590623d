//! Registry of maps keyed by id.
//!
//! The id → entry table is an immutable snapshot behind an `ArcSwap`:
//! `register` clones the table, inserts, and swaps the new table in, so a
//! reader holding the previous snapshot (for example a `MapIds` iterator in
//! progress) never observes a half-applied write. Each entry caches its parsed
//! definition the first time `get` succeeds.

use crate::catalog::{DESCRIPTOR_FILE, MapDefinition, load_definition};
use crate::error::MapError;
use arc_swap::{ArcSwap, ArcSwapOption};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

type Snapshot = BTreeMap<String, Arc<CatalogEntry>>;

#[derive(Debug)]
struct CatalogEntry {
    path: String,
    definition: ArcSwapOption<MapDefinition>,
}

impl CatalogEntry {
    fn new(path: String) -> Self {
        Self {
            path,
            definition: ArcSwapOption::empty(),
        }
    }
}

/// All registered maps, addressable only by id.
#[derive(Debug)]
pub struct MapCatalog {
    static_root: PathBuf,
    entries: ArcSwap<Snapshot>,
    generation: AtomicU64,
}

impl MapCatalog {
    /// Create an empty catalog whose descriptors live under `static_root`.
    pub fn new(static_root: impl Into<PathBuf>) -> Self {
        Self {
            static_root: static_root.into(),
            entries: ArcSwap::from_pointee(Snapshot::new()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn static_root(&self) -> &Path {
        &self.static_root
    }

    /// Insert or overwrite the entry for `id`.
    ///
    /// The descriptor is not read here. Overwriting drops any cached
    /// definition, and every call bumps the catalog generation.
    pub fn register(&self, id: &str, path: &str) {
        let entry = Arc::new(CatalogEntry::new(path.to_string()));
        self.entries.rcu(|current| {
            let mut next = Snapshot::clone(current);
            next.insert(id.to_string(), Arc::clone(&entry));
            next
        });
        self.generation.fetch_add(1, Ordering::SeqCst);
        log::debug!("registered map {id} at {path}");
    }

    /// Load the definition for `id`, parsing its descriptor on first access.
    pub fn get(&self, id: &str) -> Result<Arc<MapDefinition>, MapError> {
        let entry = self.entry(id)?;
        if let Some(cached) = entry.definition.load_full() {
            return Ok(cached);
        }

        // Two callers racing here both parse; the later store wins and both
        // results are equivalent.
        let descriptor = self.descriptor_path(&entry.path);
        let definition = Arc::new(load_definition(id, &entry.path, &descriptor)?);
        entry.definition.store(Some(Arc::clone(&definition)));
        Ok(definition)
    }

    /// The registered asset path for `id`, without touching its descriptor.
    pub fn path(&self, id: &str) -> Result<String, MapError> {
        Ok(self.entry(id)?.path.clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.load().contains_key(id)
    }

    /// Ids of every registered map, in sorted order, from a snapshot taken now.
    pub fn list(&self) -> MapIds {
        MapIds {
            snapshot: self.entries.load_full(),
            cursor: None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }

    /// Monotonic counter bumped by every registration.
    ///
    /// Derived views record the generation they were built from and are stale
    /// once it moves.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Filesystem location of the descriptor for a map stored at `path`.
    pub fn descriptor_path(&self, path: &str) -> PathBuf {
        self.static_root.join(path).join(DESCRIPTOR_FILE)
    }

    fn entry(&self, id: &str) -> Result<Arc<CatalogEntry>, MapError> {
        self.entries
            .load()
            .get(id)
            .cloned()
            .ok_or_else(|| MapError::not_found(id))
    }
}

/// Lazy iterator over map ids, pinned to the snapshot it was created from.
#[derive(Debug)]
pub struct MapIds {
    snapshot: Arc<Snapshot>,
    cursor: Option<String>,
}

impl Iterator for MapIds {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let next = match &self.cursor {
            None => self.snapshot.keys().next(),
            Some(last) => self
                .snapshot
                .range::<str, _>((Bound::Excluded(last.as_str()), Bound::Unbounded))
                .map(|(id, _)| id)
                .next(),
        }?
        .clone();
        self.cursor = Some(next.clone());
        Some(next)
    }
}
