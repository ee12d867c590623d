//! Assembles the option schema from the current catalog.
//!
//! Every build is a full rebuild: the map selector is repopulated from a
//! catalog snapshot and the fixed controls are laid out around it. The result
//! depends only on catalog content, the requested locale and the translator,
//! so two builds without an intervening registration compare equal.

use crate::catalog::MapCatalog;
use crate::locale::resolve_label;
use crate::schema::{
    AxisSpec, COLOR_AXIS, ColumnType, KEYS_AXIS, Library, MapChoice, OptionKind, OptionNode,
    Predicate, RadioChoice, VISUALIZATION_ID, VisualizationMeta,
};
use std::collections::BTreeMap;
use std::sync::Arc;

const EXTENDS: &str = "raphael-chart";
const ORDER: u32 = 62;
const KARTOGRAPH_LOCAL: &str = "vendor/kartograph.min.js";
const KARTOGRAPH_CDN: &str =
    "//assets-datawrapper.s3.amazonaws.com/vendor/kartograph.js/0.7.1/kartograph.min.js";
const IDS_MISMATCHING: &str = "A significant fraction of your data (%d) could not be assigned to regions of the chosen map. Please make sure that <ul><li>you have selected the correct map and</li><li>that your dataset uses the same identifiers as used in the map.</li></ul><p>You may find this <a download='template.csv' href='%t'>template dataset useful</a>.</p>";

/// Message translation, supplied by the host.
pub trait Translator: Send + Sync {
    fn translate(&self, message: &str, locale: &str) -> String;
}

/// Returns every message unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Untranslated;

impl Translator for Untranslated {
    fn translate(&self, message: &str, _locale: &str) -> String {
        message.to_string()
    }
}

#[derive(Clone)]
pub struct SchemaBuilder {
    translator: Arc<dyn Translator>,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new(Arc::new(Untranslated))
    }
}

impl SchemaBuilder {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }

    /// Build the full visualization record for `locale`.
    pub fn build_meta(&self, catalog: &MapCatalog, locale: &str) -> VisualizationMeta {
        let t = |message: &str| self.translator.translate(message, locale);
        let accepts = || AxisSpec {
            accepts: vec![ColumnType::Text, ColumnType::Number],
        };

        VisualizationMeta {
            id: VISUALIZATION_ID.to_string(),
            extends: EXTENDS.to_string(),
            title: t("Maps"),
            order: ORDER,
            axes: BTreeMap::from([
                (KEYS_AXIS.to_string(), accepts()),
                (COLOR_AXIS.to_string(), accepts()),
            ]),
            libraries: vec![Library {
                local: KARTOGRAPH_LOCAL.to_string(),
                cdn: KARTOGRAPH_CDN.to_string(),
            }],
            locale: BTreeMap::from([("ids-mismatching".to_string(), t(IDS_MISMATCHING))]),
            hide_base_color_selector: true,
            options: self.build(catalog, locale),
        }
    }

    /// Build the ordered option nodes for `locale`.
    pub fn build(&self, catalog: &MapCatalog, locale: &str) -> Vec<OptionNode> {
        let t = |message: &str| self.translator.translate(message, locale);

        // Separator labels are shown verbatim.
        vec![
            OptionNode::new(
                "---map-options---",
                "Select and customize display",
                OptionKind::Separator,
            ),
            OptionNode::new(
                "map",
                t("Select map"),
                OptionKind::MapSelector {
                    options: self.map_choices(catalog, locale),
                },
            ),
            OptionNode::new(
                "scale-mode",
                t("Scale mode"),
                OptionKind::Radio {
                    options: vec![
                        RadioChoice {
                            value: "width".to_string(),
                            label: t("Scale map to chart width"),
                        },
                        RadioChoice {
                            value: "viewport".to_string(),
                            label: t("Fit map into chart"),
                        },
                    ],
                },
            ),
            OptionNode::new(
                "---color-options---",
                "Customize map colors",
                OptionKind::Separator,
            ),
            OptionNode::new(
                "color-column",
                t("Select data column"),
                OptionKind::SelectAxisColumn {
                    axis: COLOR_AXIS.to_string(),
                },
            ),
            OptionNode::new(
                "gradient",
                t("Color gradient"),
                OptionKind::ColorGradientSelector {
                    color_axis: COLOR_AXIS.to_string(),
                    locale: BTreeMap::from([
                        ("number of classes".to_string(), t("Number of classes")),
                        ("breaks type".to_string(), t("Breaks type")),
                    ]),
                },
            )
            .depends_on(Predicate::column_type(COLOR_AXIS, ColumnType::Number)),
            OptionNode::new(
                "category-colors",
                t("Category colors"),
                OptionKind::CustomColorSelector {
                    keys: COLOR_AXIS.to_string(),
                },
            )
            .depends_on(Predicate::column_type(COLOR_AXIS, ColumnType::Text)),
        ]
    }

    /// One choice per loadable map, sorted by id.
    ///
    /// Maps whose descriptor cannot be loaded are left out; the others are
    /// unaffected.
    pub fn map_choices(&self, catalog: &MapCatalog, locale: &str) -> Vec<MapChoice> {
        catalog
            .list()
            .filter_map(|id| match catalog.get(&id) {
                Ok(definition) => Some(MapChoice {
                    value: definition.id.clone(),
                    label: resolve_label(&definition, locale).to_string(),
                    keys: definition.keys.clone(),
                    path: definition.path.clone(),
                }),
                Err(err) => {
                    log::warn!("skipping map {id} in map selector: {err}");
                    None
                }
            })
            .collect()
    }
}
