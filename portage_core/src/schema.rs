//! Dataset schema metadata: a named, ordered list of typed columns,
//! serialized to a single property value per direction. The JSON document
//! is stable for this codec version; nothing here promises cross-version
//! compatibility.

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Column type tag.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    FixedPoint,
    FloatingPoint,
    Bit,
    Binary,
    DateTime,
}

/// One column of a dataset.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Column {
            name: name.into(),
            kind,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Column::new(name, ColumnKind::Text)
    }

    pub fn fixed_point(name: impl Into<String>) -> Self {
        Column::new(name, ColumnKind::FixedPoint)
    }

    pub fn floating_point(name: impl Into<String>) -> Self {
        Column::new(name, ColumnKind::FloatingPoint)
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Column::new(name, ColumnKind::Binary)
    }
}

/// Ordered column metadata describing a dataset's structure. Independent
/// of the config object graph.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Schema {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn add_column(&mut self, column: Column) -> &mut Self {
        self.columns.push(column);
        self
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }
}

/// Encodes a schema (or its absence) as one property value. `None` becomes
/// the JSON `null` literal so a null schema reads back as `None` instead of
/// a zero-value schema.
pub fn encode(schema: Option<&Schema>) -> Result<String, DecodeError> {
    Ok(serde_json::to_string(&schema)?)
}

/// Decodes a previously encoded schema document.
pub fn decode(document: &str) -> Result<Option<Schema>, DecodeError> {
    Ok(serde_json::from_str(document)?)
}
