// Render-time asset resolution.

use anyhow::Result;
use mapviz::{AssetResolver, ChartMetadata, MapCatalog, MapError};
use std::sync::Arc;

fn resolver() -> AssetResolver {
    let catalog = Arc::new(MapCatalog::new("/static"));
    catalog.register("europe", "maps/europe");
    AssetResolver::new(catalog)
}

#[test]
fn resolves_display_metadata_and_locale_in_order() -> Result<()> {
    let assets = resolver().resolve_assets("europe", "fr-FR")?;
    assert_eq!(
        assets.into_vec(),
        vec![
            "maps/europe/map.svg",
            "maps/europe/map.json",
            "maps/europe/locale/fr.json"
        ]
    );
    Ok(())
}

// The descriptor is never read, so registration alone is enough.
#[test]
fn resolution_does_not_touch_the_filesystem() -> Result<()> {
    let assets = resolver().resolve_assets("europe", "zz")?;
    assert_eq!(assets.locale, "maps/europe/locale/zz.json");
    Ok(())
}

#[test]
fn unknown_map_is_not_found() {
    let err = resolver().resolve_assets("unknown-id", "en").unwrap_err();
    assert_eq!(err, MapError::not_found("unknown-id"));
}

#[test]
fn chart_selection_drives_resolution() -> Result<()> {
    let resolver = resolver();
    let chart = ChartMetadata::default().with_map("europe");
    let assets = resolver.resolve_for_chart(&chart, "en_GB")?;
    assert_eq!(assets.display, "maps/europe/map.svg");
    assert_eq!(assets.locale, "maps/europe/locale/en.json");

    let unselected = ChartMetadata::default();
    assert!(matches!(
        resolver.resolve_for_chart(&unselected, "en"),
        Err(MapError::NotFound { .. })
    ));
    Ok(())
}

#[test]
fn latest_registration_wins_for_assets() -> Result<()> {
    let catalog = Arc::new(MapCatalog::new("/static"));
    catalog.register("europe", "maps/europe-v1");
    catalog.register("europe", "maps/europe-v2");
    let assets = AssetResolver::new(catalog).resolve_assets("europe", "de")?;
    assert_eq!(assets.metadata, "maps/europe-v2/map.json");
    Ok(())
}
