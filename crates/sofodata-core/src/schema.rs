//! Column header inference for dataset registration
//!
//! Each table column maps to one [`ColumnDescriptor`]. The mapping goes through
//! [`ColumnKind`], a closed set of primitive kinds, so that every Arrow type has
//! exactly one wire type.

use arrow::datatypes::{DataType, Schema};
use serde::{Deserialize, Serialize};

/// Primitive kind of a table column, as far as the service cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    Boolean,
    /// Any signed or unsigned integer width
    Integer,
    /// Any floating-point width
    Float,
    /// Everything else: text, dictionaries, dates, nested types
    Other(DataType),
}

impl ColumnKind {
    /// Classify an Arrow data type
    #[must_use]
    pub fn of(data_type: &DataType) -> Self {
        match data_type {
            DataType::Boolean => ColumnKind::Boolean,
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => ColumnKind::Integer,
            DataType::Float16 | DataType::Float32 | DataType::Float64 => ColumnKind::Float,
            other => ColumnKind::Other(other.clone()),
        }
    }

    /// Wire type the service expects for this kind
    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnKind::Boolean => ColumnType::Boolean,
            ColumnKind::Integer => ColumnType::Number,
            ColumnKind::Float => ColumnType::Decimal,
            ColumnKind::Other(_) => ColumnType::String,
        }
    }
}

/// Column type as understood by the dataset API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    Boolean,
    Number,
    Decimal,
    String,
}

impl ColumnType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Number => "NUMBER",
            ColumnType::Decimal => "DECIMAL",
            ColumnType::String => "STRING",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema entry for one dataset column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub indexed: bool,
}

impl ColumnDescriptor {
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "type": self.column_type.as_str(),
            "indexed": self.indexed,
        })
    }
}

/// Build the column headers for a table schema.
///
/// Columns keep their table order. Only the first column is marked as
/// indexed, whatever its type.
#[must_use]
pub fn infer_column_headers(schema: &Schema) -> Vec<ColumnDescriptor> {
    schema
        .fields()
        .iter()
        .enumerate()
        .map(|(i, field)| ColumnDescriptor {
            name: field.name().clone(),
            column_type: ColumnKind::of(field.data_type()).column_type(),
            indexed: i == 0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{Field, TimeUnit};
    use std::sync::Arc;

    fn schema_of(types: &[(&str, DataType)]) -> Schema {
        Schema::new(
            types
                .iter()
                .map(|(n, t)| Field::new(*n, t.clone(), true))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_type_mapping() {
        assert_eq!(ColumnKind::of(&DataType::Boolean).column_type(), ColumnType::Boolean);
        assert_eq!(ColumnKind::of(&DataType::Int64).column_type(), ColumnType::Number);
        assert_eq!(ColumnKind::of(&DataType::UInt8).column_type(), ColumnType::Number);
        assert_eq!(ColumnKind::of(&DataType::Float64).column_type(), ColumnType::Decimal);
        assert_eq!(ColumnKind::of(&DataType::Float32).column_type(), ColumnType::Decimal);
        assert_eq!(ColumnKind::of(&DataType::Utf8).column_type(), ColumnType::String);
    }

    #[test]
    fn test_unlisted_types_fall_back_to_string() {
        let others = [
            DataType::LargeUtf8,
            DataType::Date32,
            DataType::Timestamp(TimeUnit::Millisecond, None),
            DataType::Decimal128(10, 2),
            DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8)),
            DataType::List(Arc::new(Field::new("item", DataType::Int64, true))),
            DataType::Null,
        ];
        for ty in others {
            assert_eq!(ColumnKind::of(&ty), ColumnKind::Other(ty.clone()));
            assert_eq!(ColumnKind::of(&ty).column_type(), ColumnType::String);
        }
    }

    #[test]
    fn test_only_first_column_indexed() {
        let schema = schema_of(&[
            ("label", DataType::Utf8),
            ("count", DataType::Int64),
            ("ratio", DataType::Float64),
            ("flag", DataType::Boolean),
        ]);
        let headers = infer_column_headers(&schema);
        let indexed: Vec<bool> = headers.iter().map(|h| h.indexed).collect();
        assert_eq!(indexed, vec![true, false, false, false]);
        assert_eq!(headers[0].column_type, ColumnType::String);
    }

    #[test]
    fn test_empty_schema() {
        assert!(infer_column_headers(&Schema::empty()).is_empty());
    }

    #[test]
    fn test_descriptor_json_shape() {
        let schema = schema_of(&[("active", DataType::Boolean), ("score", DataType::Float64)]);
        let json = serde_json::to_value(infer_column_headers(&schema)).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"name": "active", "type": "BOOLEAN", "indexed": true},
                {"name": "score", "type": "DECIMAL", "indexed": false}
            ])
        );
        let built: Vec<serde_json::Value> = infer_column_headers(&schema)
            .iter()
            .map(ColumnDescriptor::to_json)
            .collect();
        assert_eq!(serde_json::Value::Array(built), json);
    }
}
