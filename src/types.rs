// ABOUTME: Column type descriptors for warehouse schemas
// ABOUTME: Classifies declared types as flat scalars vs nested/complex kinds

use std::fmt;

/// A column's declared type, as reported by the warehouse catalog.
///
/// `Map`, `Array`, and `Struct` are the nested kinds; everything else is a
/// flat scalar safe for schema comparison and flattening decisions. Types the
/// catalog reports under a name we do not recognize land in `Custom` and are
/// treated as scalars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    Boolean,
    Int,
    Float,
    Decimal,
    String,
    Binary,
    Date,
    Time,
    Timestamp,
    Variant,
    Map,
    Array,
    Struct,
    Custom(String),
}

impl DataType {
    /// Parse a catalog type name into a descriptor.
    ///
    /// Accepts any case, ignores length/precision suffixes (`VARCHAR(16)`,
    /// `NUMBER(38,0)`) and nested element descriptions (`ARRAY(VARCHAR)`,
    /// `OBJECT(city VARCHAR)`), and recognizes the `TYPE[]` array shorthand.
    pub fn parse(type_name: &str) -> Self {
        let trimmed = type_name.trim();
        if trimmed.ends_with("[]") {
            return DataType::Array;
        }

        // "VARCHAR(16)" and "ARRAY(VARCHAR)" classify by the base name alone
        let base = match trimmed.find('(') {
            Some(idx) => &trimmed[..idx],
            None => trimmed,
        };

        match base.trim().to_uppercase().as_str() {
            "BOOLEAN" | "BOOL" => DataType::Boolean,
            "INT" | "INTEGER" | "BIGINT" | "SMALLINT" | "TINYINT" | "BYTEINT" => DataType::Int,
            "FLOAT" | "FLOAT4" | "FLOAT8" | "DOUBLE" | "DOUBLE PRECISION" | "REAL" => {
                DataType::Float
            }
            "NUMBER" | "NUMERIC" | "DECIMAL" => DataType::Decimal,
            "VARCHAR" | "CHAR" | "CHARACTER" | "STRING" | "TEXT" => DataType::String,
            "BINARY" | "VARBINARY" => DataType::Binary,
            "DATE" => DataType::Date,
            "TIME" => DataType::Time,
            "DATETIME" | "TIMESTAMP" | "TIMESTAMP_NTZ" | "TIMESTAMP_LTZ" | "TIMESTAMP_TZ" => {
                DataType::Timestamp
            }
            "VARIANT" | "JSON" => DataType::Variant,
            "MAP" => DataType::Map,
            "ARRAY" | "LIST" => DataType::Array,
            "OBJECT" | "STRUCT" | "RECORD" => DataType::Struct,
            _ => DataType::Custom(trimmed.to_string()),
        }
    }

    /// True iff this is a flat scalar type rather than a nested/complex one.
    pub fn is_simple(&self) -> bool {
        !matches!(self, DataType::Map | DataType::Array | DataType::Struct)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Boolean => "BOOLEAN",
            DataType::Int => "INT",
            DataType::Float => "FLOAT",
            DataType::Decimal => "DECIMAL",
            DataType::String => "VARCHAR",
            DataType::Binary => "BINARY",
            DataType::Date => "DATE",
            DataType::Time => "TIME",
            DataType::Timestamp => "TIMESTAMP",
            DataType::Variant => "VARIANT",
            DataType::Map => "MAP",
            DataType::Array => "ARRAY",
            DataType::Struct => "OBJECT",
            DataType::Custom(name) => name.as_str(),
        };
        write!(f, "{}", name)
    }
}

/// Check if a data type is a simple type (not a complex type).
pub fn is_simple_type(data_type: &DataType) -> bool {
    data_type.is_simple()
}
