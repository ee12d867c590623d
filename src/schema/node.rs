use crate::schema::{ChartMetadata, ColumnType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One configurable field of the visualization, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionNode {
    /// Key under which the chart stores the chosen value.
    pub key: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: OptionKind,
    #[serde(
        default,
        rename = "depends-on",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub depends_on: Vec<Predicate>,
}

impl OptionNode {
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: OptionKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            depends_on: Vec::new(),
        }
    }

    pub fn depends_on(mut self, predicate: Predicate) -> Self {
        self.depends_on.push(predicate);
        self
    }

    /// Whether every predicate of this node holds for `chart`.
    pub fn is_visible_for(&self, chart: &ChartMetadata) -> bool {
        self.depends_on.iter().all(|predicate| predicate.holds(chart))
    }
}

/// Variant-specific payload of an option node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum OptionKind {
    Separator,
    MapSelector {
        options: Vec<MapChoice>,
    },
    Radio {
        options: Vec<RadioChoice>,
    },
    SelectAxisColumn {
        axis: String,
    },
    ColorGradientSelector {
        #[serde(rename = "color-axis")]
        color_axis: String,
        #[serde(default)]
        locale: BTreeMap<String, String>,
    },
    CustomColorSelector {
        /// Axis whose distinct values become the category keys.
        keys: String,
    },
}

impl OptionKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            OptionKind::Separator => "separator",
            OptionKind::MapSelector { .. } => "map-selector",
            OptionKind::Radio { .. } => "radio",
            OptionKind::SelectAxisColumn { .. } => "select-axis-column",
            OptionKind::ColorGradientSelector { .. } => "color-gradient-selector",
            OptionKind::CustomColorSelector { .. } => "custom-color-selector",
        }
    }

    /// The data axis this node reads from, if any.
    pub fn axis_binding(&self) -> Option<&str> {
        match self {
            OptionKind::SelectAxisColumn { axis } => Some(axis.as_str()),
            OptionKind::ColorGradientSelector { color_axis, .. } => Some(color_axis.as_str()),
            OptionKind::CustomColorSelector { keys } => Some(keys.as_str()),
            OptionKind::Separator | OptionKind::MapSelector { .. } | OptionKind::Radio { .. } => {
                None
            }
        }
    }
}

/// A selectable map in the map selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapChoice {
    pub value: String,
    pub label: String,
    pub keys: Vec<String>,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadioChoice {
    pub value: String,
    pub label: String,
}

/// Visibility condition: the column bound to `axis` has type `column_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub axis: String,
    #[serde(rename = "column-type")]
    pub column_type: ColumnType,
}

impl Predicate {
    pub fn column_type(axis: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            axis: axis.into(),
            column_type,
        }
    }

    /// An unbound axis or an untyped column never satisfies a predicate.
    pub fn holds(&self, chart: &ChartMetadata) -> bool {
        chart.axis_column_type(&self.axis) == Some(self.column_type)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "chart.column_type[{}] == {}",
            self.axis,
            self.column_type.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_type_tag() {
        let node = OptionNode::new(
            "category-colors",
            "Category colors",
            OptionKind::CustomColorSelector {
                keys: "color".to_string(),
            },
        )
        .depends_on(Predicate::column_type("color", ColumnType::Text));
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(
            value,
            json!({
                "key": "category-colors",
                "label": "Category colors",
                "type": "custom-color-selector",
                "keys": "color",
                "depends-on": [{"axis": "color", "column-type": "text"}]
            })
        );
        let back: OptionNode = serde_json::from_value(value).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn separator_omits_empty_predicates() {
        let node = OptionNode::new("---map-options---", "Maps", OptionKind::Separator);
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], "separator");
        assert!(value.get("depends-on").is_none());
    }

    #[test]
    fn predicate_requires_bound_typed_column() {
        let predicate = Predicate::column_type("color", ColumnType::Number);
        assert_eq!(
            predicate.to_string(),
            "chart.column_type[color] == number"
        );

        let unbound = ChartMetadata::default();
        assert!(!predicate.holds(&unbound));

        let untyped = ChartMetadata::default().bind_axis("color", "rate");
        assert!(!predicate.holds(&untyped));

        let numeric = untyped.with_column_type("rate", ColumnType::Number);
        assert!(predicate.holds(&numeric));
    }
}
