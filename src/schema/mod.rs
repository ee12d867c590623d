//! Option schema for the map visualization.
//!
//! `VisualizationMeta` is the record handed to the host's visualization
//! registry: fixed metadata (axes, libraries, messages) plus the ordered
//! option nodes a chart editor renders. The nodes are typed per control
//! (`OptionKind`) and may carry visibility predicates over `ChartMetadata`.

pub mod builder;
pub mod chart;
pub mod node;

pub use builder::{SchemaBuilder, Translator, Untranslated};
pub use chart::{ChartMetadata, ColumnType};
pub use node::{MapChoice, OptionKind, OptionNode, Predicate, RadioChoice};

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier the visualization is registered under.
pub const VISUALIZATION_ID: &str = "maps";
/// Axis holding region identifiers.
pub const KEYS_AXIS: &str = "keys";
/// Axis holding the values mapped to colors.
pub const COLOR_AXIS: &str = "color";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub accepts: Vec<ColumnType>,
}

/// A script the renderer needs, with its CDN mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub local: String,
    pub cdn: String,
}

/// Everything published to the host for the map visualization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualizationMeta {
    pub id: String,
    pub extends: String,
    pub title: String,
    pub order: u32,
    pub axes: BTreeMap<String, AxisSpec>,
    pub libraries: Vec<Library>,
    /// Translated messages the renderer shows, keyed by message id.
    pub locale: BTreeMap<String, String>,
    #[serde(rename = "hide-base-color-selector")]
    pub hide_base_color_selector: bool,
    pub options: Vec<OptionNode>,
}

impl VisualizationMeta {
    /// Look up an option node by key.
    pub fn option(&self, key: &str) -> Option<&OptionNode> {
        self.options.iter().find(|node| node.key == key)
    }

    /// The options a chart editor shows for `chart`, in display order.
    pub fn visible_for(&self, chart: &ChartMetadata) -> Vec<&OptionNode> {
        self.options
            .iter()
            .filter(|node| node.is_visible_for(chart))
            .collect()
    }

    /// The map choices offered by the map selector.
    pub fn map_choices(&self) -> &[MapChoice] {
        self.options
            .iter()
            .find_map(|node| match &node.kind {
                OptionKind::MapSelector { options } => Some(options.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// Check that option keys are unique and that every axis referenced by a
    /// binding or a predicate is declared in `axes`.
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::BTreeSet::new();
        for node in &self.options {
            if !seen.insert(node.key.as_str()) {
                bail!("duplicate option key {}", node.key);
            }
            if let Some(axis) = node.kind.axis_binding() {
                if !self.axes.contains_key(axis) {
                    bail!("option {} binds unknown axis {}", node.key, axis);
                }
            }
            for predicate in &node.depends_on {
                if !self.axes.contains_key(&predicate.axis) {
                    bail!(
                        "option {} depends on unknown axis {} ({})",
                        node.key,
                        predicate.axis,
                        predicate
                    );
                }
            }
        }
        Ok(())
    }
}
