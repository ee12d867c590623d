//! Registration entry point and schema publication.
//!
//! The gateway is the composition point between map contributors, the
//! catalog and the host's visualization registry. Every registration path
//! ends in a full rebuild of the visualization record, which is swapped in
//! atomically and then handed to the host.

use crate::catalog::{DESCRIPTOR_FILE, MapCatalog};
use crate::schema::{SchemaBuilder, VisualizationMeta};
use anyhow::Result;
use arc_swap::ArcSwap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The host-side registry that receives the rebuilt visualization record.
pub trait VisualizationHost: Send + Sync {
    fn publish(&self, meta: Arc<VisualizationMeta>) -> Result<()>;
}

/// A contributor of maps, asked once at startup.
pub trait MapProvider {
    /// `(id, path)` pairs to register.
    fn provide_maps(&self) -> Vec<(String, String)>;
}

/// Maps bundled in a local directory, one sub-directory per map.
///
/// A sub-directory counts as a map when it holds a `map.json`; its name
/// becomes the map id and it is registered at `<asset_prefix>/<id>`.
#[derive(Debug, Clone)]
pub struct BundledMaps {
    dir: PathBuf,
    asset_prefix: String,
}

impl BundledMaps {
    pub fn new(dir: impl Into<PathBuf>, asset_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            asset_prefix: asset_prefix.into(),
        }
    }

    /// Ids of the bundled maps, sorted.
    pub fn scan(&self) -> Result<Vec<String>> {
        let pattern = format!(
            "{}/*/{DESCRIPTOR_FILE}",
            glob::Pattern::escape(&self.dir.to_string_lossy())
        );
        let mut ids = Vec::new();
        for entry in glob::glob(&pattern)? {
            let descriptor = match entry {
                Ok(path) => path,
                Err(err) => {
                    log::warn!("skipping unreadable bundled map entry: {err}");
                    continue;
                }
            };
            match map_id_from_descriptor(&descriptor) {
                Some(id) => ids.push(id),
                None => log::warn!(
                    "skipping bundled map with non UTF-8 directory: {}",
                    descriptor.display()
                ),
            }
        }
        ids.sort();
        Ok(ids)
    }
}

impl MapProvider for BundledMaps {
    fn provide_maps(&self) -> Vec<(String, String)> {
        let prefix = self.asset_prefix.trim_end_matches('/');
        match self.scan() {
            Ok(ids) => ids
                .into_iter()
                .map(|id| {
                    let path = format!("{prefix}/{id}");
                    (id, path)
                })
                .collect(),
            Err(err) => {
                log::warn!("scanning bundled maps in {}: {err:#}", self.dir.display());
                Vec::new()
            }
        }
    }
}

fn map_id_from_descriptor(descriptor: &Path) -> Option<String> {
    descriptor
        .parent()?
        .file_name()?
        .to_str()
        .map(str::to_string)
}

struct Published {
    generation: u64,
    meta: Arc<VisualizationMeta>,
}

pub struct RegistrationGateway {
    catalog: Arc<MapCatalog>,
    builder: SchemaBuilder,
    host: Arc<dyn VisualizationHost>,
    locale: String,
    published: ArcSwap<Published>,
}

impl RegistrationGateway {
    /// Build the initial record from `catalog` and publish it.
    pub fn new(
        catalog: Arc<MapCatalog>,
        builder: SchemaBuilder,
        host: Arc<dyn VisualizationHost>,
        locale: impl Into<String>,
    ) -> Self {
        let locale = locale.into();
        let generation = catalog.generation();
        let meta = Arc::new(builder.build_meta(&catalog, &locale));
        let gateway = Self {
            catalog,
            builder,
            host,
            locale,
            published: ArcSwap::from_pointee(Published {
                generation,
                meta: Arc::clone(&meta),
            }),
        };
        gateway.publish_to_host(meta);
        gateway
    }

    pub fn catalog(&self) -> &Arc<MapCatalog> {
        &self.catalog
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Register one map and publish the rebuilt record before returning.
    pub fn register_map(&self, id: &str, path: &str) {
        self.catalog.register(id, path);
        self.rebuild_and_publish();
    }

    /// Register a batch of maps, then rebuild and publish once.
    ///
    /// Returns the number of maps registered.
    pub fn register_many<I, S, P>(&self, maps: I) -> usize
    where
        I: IntoIterator<Item = (S, P)>,
        S: AsRef<str>,
        P: AsRef<str>,
    {
        let mut count = 0;
        for (id, path) in maps {
            self.catalog.register(id.as_ref(), path.as_ref());
            count += 1;
        }
        if count > 0 {
            self.rebuild_and_publish();
        }
        count
    }

    /// Register every map the providers offer as a single batch.
    pub fn install_providers(&self, providers: &[&dyn MapProvider]) -> usize {
        let maps = providers
            .iter()
            .flat_map(|provider| provider.provide_maps())
            .collect::<Vec<_>>();
        self.register_many(maps)
    }

    /// Register the maps bundled under `dir`; returns their ids.
    pub fn discover_bundled(&self, dir: &Path, asset_prefix: &str) -> Vec<String> {
        let bundled = BundledMaps::new(dir, asset_prefix);
        let maps = bundled.provide_maps();
        let ids = maps.iter().map(|(id, _)| id.clone()).collect::<Vec<_>>();
        self.register_many(maps);
        log::info!(
            "discovered {} bundled map(s) in {}",
            ids.len(),
            dir.display()
        );
        ids
    }

    /// The most recently published record.
    pub fn schema(&self) -> Arc<VisualizationMeta> {
        Arc::clone(&self.published.load().meta)
    }

    /// Whether the catalog changed since the current record was built.
    pub fn is_stale(&self) -> bool {
        self.published.load().generation != self.catalog.generation()
    }

    /// Rebuild and publish only if the catalog changed; returns whether it did.
    pub fn refresh(&self) -> bool {
        if !self.is_stale() {
            return false;
        }
        self.rebuild_and_publish();
        true
    }

    // `schema()` never goes back to an older generation. Host publication
    // happens after the swap, so overlapping registrations may reach the
    // host out of order.
    fn rebuild_and_publish(&self) {
        // Read the generation first: a registration landing mid-build leaves
        // the record marked stale.
        let generation = self.catalog.generation();
        let meta = Arc::new(self.builder.build_meta(&self.catalog, &self.locale));
        if let Err(err) = meta.validate() {
            log::error!("rebuilt map schema violates its axis contract: {err:#}");
        }

        let next = Arc::new(Published {
            generation,
            meta: Arc::clone(&meta),
        });
        let previous = self.published.rcu(|current| {
            if current.generation > generation {
                Arc::clone(current)
            } else {
                Arc::clone(&next)
            }
        });
        if previous.generation > generation {
            log::debug!("discarding schema built from stale generation {generation}");
            return;
        }

        log::debug!(
            "rebuilt map schema at generation {generation} with {} map(s)",
            meta.map_choices().len()
        );
        self.publish_to_host(meta);
    }

    fn publish_to_host(&self, meta: Arc<VisualizationMeta>) {
        if let Err(err) = self.host.publish(meta) {
            log::warn!("publishing map schema to host failed: {err:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingHost(AtomicUsize);

    impl VisualizationHost for CountingHost {
        fn publish(&self, _meta: Arc<VisualizationMeta>) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn rebuild_from_older_generation_keeps_newer_schema() {
        let catalog = Arc::new(MapCatalog::new("/static"));
        let host = Arc::new(CountingHost::default());
        let gateway = RegistrationGateway::new(
            Arc::clone(&catalog),
            SchemaBuilder::default(),
            host.clone(),
            "en",
        );
        assert_eq!(host.0.load(Ordering::SeqCst), 1);

        // Stand in for a concurrent rebuild that already published a later
        // generation than the catalog reports here.
        let newer = gateway.schema();
        gateway.published.store(Arc::new(Published {
            generation: catalog.generation() + 1,
            meta: Arc::clone(&newer),
        }));

        gateway.rebuild_and_publish();
        assert!(Arc::ptr_eq(&gateway.schema(), &newer));
        assert_eq!(host.0.load(Ordering::SeqCst), 1);
    }
}
