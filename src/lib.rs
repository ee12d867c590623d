//! Map registry and option resolution for the chart map visualization.
//!
//! `bootstrap` is the composition root: it builds the catalog, publishes the
//! initial schema, registers bundled maps and any external providers, and
//! hands back the pieces a host keeps around.

pub mod assets;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod locale;
pub mod schema;

pub use assets::{AssetList, AssetResolver};
pub use catalog::{MapCatalog, MapDefinition, MapIds};
pub use config::{Config, find_static_root};
pub use error::MapError;
pub use gateway::{BundledMaps, MapProvider, RegistrationGateway, VisualizationHost};
pub use locale::{normalize_locale, resolve_label};
pub use schema::{
    ChartMetadata, ColumnType, MapChoice, OptionKind, OptionNode, Predicate, SchemaBuilder,
    Translator, Untranslated, VisualizationMeta,
};

use std::sync::Arc;

/// The long-lived components of a running map visualization.
pub struct MapVisualization {
    pub catalog: Arc<MapCatalog>,
    pub gateway: RegistrationGateway,
    pub assets: AssetResolver,
}

/// Wire up the catalog, gateway and asset resolver for `config`.
///
/// Bundled maps and provider maps are registered as one batch, so the host
/// sees the initial empty schema and then a single rebuilt one.
pub fn bootstrap(
    config: &Config,
    host: Arc<dyn VisualizationHost>,
    translator: Arc<dyn Translator>,
    providers: &[&dyn MapProvider],
) -> MapVisualization {
    let catalog = Arc::new(MapCatalog::new(&config.static_root));
    let gateway = RegistrationGateway::new(
        Arc::clone(&catalog),
        SchemaBuilder::new(translator),
        host,
        config.locale.clone(),
    );

    let bundled = BundledMaps::new(&config.bundled_maps_dir, config.asset_prefix.clone());
    let mut all: Vec<&dyn MapProvider> = vec![&bundled];
    all.extend_from_slice(providers);
    let registered = gateway.install_providers(&all);
    log::info!(
        "registered {registered} map(s) from {} provider(s)",
        all.len()
    );

    MapVisualization {
        assets: AssetResolver::new(Arc::clone(&catalog)),
        catalog,
        gateway,
    }
}
