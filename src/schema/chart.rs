use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Classification of a data column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Number,
    Text,
    Date,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Number => "number",
            ColumnType::Text => "text",
            ColumnType::Date => "date",
        }
    }
}

/// The slice of a chart's stored configuration this crate reads.
///
/// Owned by the host; only ever consulted here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartMetadata {
    /// Selected map id (`visualize.map`).
    #[serde(default)]
    pub map: Option<String>,
    /// Axis name to column name.
    #[serde(default)]
    pub axes: BTreeMap<String, String>,
    /// Column name to column type.
    #[serde(default)]
    pub column_types: BTreeMap<String, ColumnType>,
}

impl ChartMetadata {
    pub fn with_map(mut self, map: impl Into<String>) -> Self {
        self.map = Some(map.into());
        self
    }

    pub fn bind_axis(mut self, axis: impl Into<String>, column: impl Into<String>) -> Self {
        self.axes.insert(axis.into(), column.into());
        self
    }

    pub fn with_column_type(mut self, column: impl Into<String>, column_type: ColumnType) -> Self {
        self.column_types.insert(column.into(), column_type);
        self
    }

    /// Type of the column bound to `axis`, if the axis is bound and typed.
    pub fn axis_column_type(&self, axis: &str) -> Option<ColumnType> {
        let column = self.axes.get(axis)?;
        self.column_types.get(column).copied()
    }
}
