//! Render-time asset resolution.
//!
//! Only paths are computed; whether the locale file exists is for the
//! consumer to find out, falling back to an empty localization when it does
//! not.

use crate::catalog::{DESCRIPTOR_FILE, DISPLAY_FILE, LOCALE_DIR, MapCatalog};
use crate::error::MapError;
use crate::locale::normalize_locale;
use crate::schema::ChartMetadata;
use serde::Serialize;
use std::sync::Arc;

/// Assets needed to render one chart, in fetch order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetList {
    pub display: String,
    pub metadata: String,
    pub locale: String,
}

impl AssetList {
    pub fn paths(&self) -> [&str; 3] {
        [&self.display, &self.metadata, &self.locale]
    }

    pub fn into_vec(self) -> Vec<String> {
        vec![self.display, self.metadata, self.locale]
    }
}

#[derive(Debug, Clone)]
pub struct AssetResolver {
    catalog: Arc<MapCatalog>,
}

impl AssetResolver {
    pub fn new(catalog: Arc<MapCatalog>) -> Self {
        Self { catalog }
    }

    /// Asset paths for map `map_id` rendered in `locale`.
    pub fn resolve_assets(&self, map_id: &str, locale: &str) -> Result<AssetList, MapError> {
        let path = self.catalog.path(map_id)?;
        Ok(asset_list(&path, locale))
    }

    /// Asset paths for the map selected in `chart`.
    ///
    /// A chart with no selected map is reported as `NotFound` with an empty id.
    pub fn resolve_for_chart(
        &self,
        chart: &ChartMetadata,
        locale: &str,
    ) -> Result<AssetList, MapError> {
        let map_id = chart.map.as_deref().unwrap_or_default();
        self.resolve_assets(map_id, locale)
    }
}

fn asset_list(map_path: &str, locale: &str) -> AssetList {
    let base = map_path.trim_end_matches('/');
    AssetList {
        display: format!("{base}/{DISPLAY_FILE}"),
        metadata: format!("{base}/{DESCRIPTOR_FILE}"),
        locale: format!("{base}/{LOCALE_DIR}/{}.json", normalize_locale(locale)),
    }
}
