//! Primitive type tags for schema nodes
//!
//! Supported tags:
//! - string: UTF-8 string
//! - int: 64-bit integer
//! - float: 64-bit floating point
//! - bool: Boolean
//! - array: mapping or sequence (the two are one structural type here)
//!
//! Tags resolve to fixed predicates at schema-construction time. An unknown
//! tag name is rejected immediately, never silently matched against nothing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::errors::SchemaError;

/// Primitive type tag a node may allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// UTF-8 string
    String,
    /// 64-bit integer
    Int,
    /// 64-bit floating point (integers do not coerce)
    Float,
    /// Boolean
    Bool,
    /// Mapping or sequence
    Array,
}

impl ValueType {
    /// Resolves a tag name to its type. Aliases from the source notation
    /// (`integer`, `boolean`, `double`) are accepted.
    pub fn from_tag(tag: &str) -> Result<Self, SchemaError> {
        match tag {
            "string" => Ok(ValueType::String),
            "int" | "integer" => Ok(ValueType::Int),
            "float" | "double" => Ok(ValueType::Float),
            "bool" | "boolean" => Ok(ValueType::Bool),
            "array" => Ok(ValueType::Array),
            other => Err(SchemaError::UnknownTypeTag(other.to_string())),
        }
    }

    /// Returns the tag name for error messages.
    pub fn tag(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Bool => "bool",
            ValueType::Array => "array",
        }
    }

    /// Returns whether the value satisfies this tag's predicate.
    ///
    /// `Value::Null` satisfies no tag.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ValueType::String => value.is_string(),
            ValueType::Int => value.is_i64() || value.is_u64(),
            ValueType::Float => value.is_f64(),
            ValueType::Bool => value.is_boolean(),
            ValueType::Array => value.is_object() || value.is_array(),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Ordered set of allowed type tags, displayed as `a, b, c` in errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSet(pub Vec<ValueType>);

impl fmt::Display for TypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ty) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", ty)?;
        }
        Ok(())
    }
}

/// Returns the runtime type name of a value for error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tag_resolution() {
        assert_eq!(ValueType::from_tag("string").unwrap(), ValueType::String);
        assert_eq!(ValueType::from_tag("int").unwrap(), ValueType::Int);
        assert_eq!(ValueType::from_tag("integer").unwrap(), ValueType::Int);
        assert_eq!(ValueType::from_tag("double").unwrap(), ValueType::Float);
        assert_eq!(ValueType::from_tag("boolean").unwrap(), ValueType::Bool);
        assert_eq!(ValueType::from_tag("array").unwrap(), ValueType::Array);
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let err = ValueType::from_tag("tuple").unwrap_err();
        assert_eq!(err.code(), "CONF_UNKNOWN_TYPE_TAG");
    }

    #[test]
    fn test_array_covers_mapping_and_sequence() {
        assert!(ValueType::Array.matches(&json!({"a": 1})));
        assert!(ValueType::Array.matches(&json!([1, 2])));
        assert!(!ValueType::Array.matches(&json!("a")));
    }

    #[test]
    fn test_int_and_float_do_not_coerce() {
        assert!(ValueType::Int.matches(&json!(3)));
        assert!(!ValueType::Int.matches(&json!(3.5)));
        assert!(ValueType::Float.matches(&json!(3.5)));
        assert!(!ValueType::Float.matches(&json!(3)));
    }

    #[test]
    fn test_null_matches_nothing() {
        for ty in [
            ValueType::String,
            ValueType::Int,
            ValueType::Float,
            ValueType::Bool,
            ValueType::Array,
        ] {
            assert!(!ty.matches(&Value::Null));
        }
    }

    #[test]
    fn test_type_set_display() {
        let set = TypeSet(vec![ValueType::Bool, ValueType::Array]);
        assert_eq!(set.to_string(), "bool, array");
    }

    #[test]
    fn test_runtime_type_names() {
        assert_eq!(type_name(&json!(null)), "null");
        assert_eq!(type_name(&json!(true)), "bool");
        assert_eq!(type_name(&json!(1)), "int");
        assert_eq!(type_name(&json!(1.5)), "float");
        assert_eq!(type_name(&json!("x")), "string");
        assert_eq!(type_name(&json!([])), "array");
        assert_eq!(type_name(&json!({})), "object");
    }
}
