#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use mapviz::{MapCatalog, VisualizationHost, VisualizationMeta};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const PREFIX: &str = "plugins/visualization-maps/maps";

// Temporary static root; map directories are created on demand and removed
// with the TempDir.
pub struct StaticRoot {
    dir: TempDir,
}

impl StaticRoot {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new().context("creating temporary static root")?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn bundled_dir(&self) -> PathBuf {
        self.path().join(PREFIX)
    }

    /// Write `descriptor` to `<root>/<map_path>/map.json`.
    pub fn add_map(&self, map_path: &str, descriptor: &Value) -> Result<()> {
        self.add_raw(map_path, &serde_json::to_string(descriptor)?)
    }

    pub fn add_raw(&self, map_path: &str, contents: &str) -> Result<()> {
        let dir = self.path().join(map_path);
        fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
        fs::write(dir.join("map.json"), contents)
            .with_context(|| format!("writing descriptor under {}", dir.display()))?;
        Ok(())
    }

    /// Add a bundled map under the default prefix; returns its asset path.
    pub fn add_bundled(&self, id: &str, descriptor: &Value) -> Result<String> {
        let map_path = format!("{PREFIX}/{id}");
        self.add_map(&map_path, descriptor)?;
        Ok(map_path)
    }

    pub fn catalog(&self) -> Arc<MapCatalog> {
        Arc::new(MapCatalog::new(self.path()))
    }
}

// Host double that keeps every published record.
#[derive(Default)]
pub struct RecordingHost {
    published: Mutex<Vec<Arc<VisualizationMeta>>>,
}

impl RecordingHost {
    pub fn count(&self) -> usize {
        self.published.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<Arc<VisualizationMeta>> {
        self.published.lock().unwrap().last().cloned()
    }
}

impl VisualizationHost for RecordingHost {
    fn publish(&self, meta: Arc<VisualizationMeta>) -> Result<()> {
        self.published.lock().unwrap().push(meta);
        Ok(())
    }
}

// Host double that rejects every publication.
pub struct FailingHost;

impl VisualizationHost for FailingHost {
    fn publish(&self, _meta: Arc<VisualizationMeta>) -> Result<()> {
        bail!("host registry unavailable")
    }
}
