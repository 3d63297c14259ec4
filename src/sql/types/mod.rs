use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Supported column data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    Integer,
    Double,
    String,
    Boolean,
}

impl DataType {
    pub const ALL: [DataType; 4] = [
        DataType::Integer,
        DataType::Double,
        DataType::String,
        DataType::Boolean,
    ];

    /// Parses a type name (case-insensitive)
    pub fn from_str(name: &str) -> Option<DataType> {
        Some(match name.to_uppercase().as_ref() {
            "INTEGER" => DataType::Integer,
            "DOUBLE" => DataType::Double,
            "STRING" => DataType::String,
            "BOOLEAN" => DataType::Boolean,
            _ => return None,
        })
    }

    pub fn to_str(&self) -> &str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::Double => "DOUBLE",
            DataType::String => "STRING",
            DataType::Boolean => "BOOLEAN",
        }
    }

    /// Checks that a value already has this type.
    ///
    /// Null is always valid, there is no NOT NULL constraint. Integers are
    /// accepted by DOUBLE since they widen implicitly.
    pub fn is_valid(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (DataType::Integer, Value::Integer(_)) => true,
            (DataType::Double, Value::Float(_) | Value::Integer(_)) => true,
            (DataType::String, Value::String(_)) => true,
            (DataType::Boolean, Value::Boolean(_)) => true,
            _ => false,
        }
    }

    /// Coerces a raw value toward this type.
    ///
    /// Strings are parsed as literals, numbers are truncated or widened, and
    /// anything becomes a STRING through its textual form. Null passes through.
    pub fn convert(&self, value: Value) -> Result<Value> {
        if value == Value::Null {
            return Ok(Value::Null);
        }
        let converted = match (self, &value) {
            (DataType::Integer, Value::Integer(i)) => Some(Value::Integer(*i)),
            (DataType::Integer, Value::Float(f)) => Some(f.trunc())
                .filter(|t| (i64::MIN as f64..i64::MAX as f64).contains(t))
                .map(|t| Value::Integer(t as i64)),
            (DataType::Integer, Value::String(s)) => s.parse::<i64>().ok().map(Value::Integer),

            (DataType::Double, Value::Integer(i)) => Some(Value::Float(*i as f64)),
            (DataType::Double, Value::Float(f)) => Some(Value::Float(*f)),
            (DataType::Double, Value::String(s)) => s
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::Float),

            (DataType::String, Value::String(s)) => Some(Value::String(s.clone())),
            (DataType::String, v) => Some(Value::String(v.to_string())),

            (DataType::Boolean, Value::Boolean(b)) => Some(Value::Boolean(*b)),
            (DataType::Boolean, Value::String(s)) => match s.to_lowercase().as_ref() {
                "true" => Some(Value::Boolean(true)),
                "false" => Some(Value::Boolean(false)),
                _ => None,
            },
            _ => None,
        };
        converted.ok_or_else(|| {
            Error::Conversion(format!("cannot convert '{}' to {}", value, self))
        })
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Runtime value stored in a row.
///
/// Serialized with native JSON representations: null, bool, number, string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(v) => write!(f, "{}", v),
            // Debug keeps the fractional part on whole numbers (1.0, not 1)
            Value::Float(v) => write!(f, "{:?}", v),
            Value::String(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{DataType, Value};
    use crate::error::{Error, Result};

    #[test]
    fn test_convert_integer() -> Result<()> {
        assert_eq!(DataType::Integer.convert("42".into())?, Value::Integer(42));
        assert_eq!(DataType::Integer.convert("-7".into())?, Value::Integer(-7));
        assert_eq!(DataType::Integer.convert(Value::Float(3.9))?, Value::Integer(3));
        assert_eq!(DataType::Integer.convert(Value::Float(-3.9))?, Value::Integer(-3));
        assert!(matches!(
            DataType::Integer.convert("3.5".into()),
            Err(Error::Conversion(_))
        ));
        assert!(DataType::Integer.convert("abc".into()).is_err());
        assert!(DataType::Integer.convert(Value::Boolean(true)).is_err());

        // out of range or non-finite floats do not saturate
        assert!(DataType::Integer.convert(Value::Float(1e19)).is_err());
        assert!(DataType::Integer.convert(Value::Float(-1e19)).is_err());
        assert!(DataType::Integer.convert(Value::Float(9223372036854775808.0)).is_err());
        assert!(DataType::Integer.convert(Value::Float(f64::NAN)).is_err());
        assert!(DataType::Integer.convert(Value::Float(f64::INFINITY)).is_err());
        assert_eq!(
            DataType::Integer.convert(Value::Float(-9223372036854775808.0))?,
            Value::Integer(i64::MIN)
        );
        Ok(())
    }

    #[test]
    fn test_convert_double() -> Result<()> {
        assert_eq!(DataType::Double.convert("2.5".into())?, Value::Float(2.5));
        assert_eq!(DataType::Double.convert("3".into())?, Value::Float(3.0));
        assert_eq!(DataType::Double.convert(Value::Integer(4))?, Value::Float(4.0));
        assert!(DataType::Double.convert("NaN".into()).is_err());
        assert!(DataType::Double.convert("x1".into()).is_err());
        Ok(())
    }

    #[test]
    fn test_convert_string_and_boolean() -> Result<()> {
        assert_eq!(DataType::String.convert(Value::Integer(5))?, "5".into());
        assert_eq!(DataType::String.convert(Value::Float(1.0))?, "1.0".into());
        assert_eq!(DataType::String.convert(Value::Boolean(false))?, "false".into());
        assert_eq!(DataType::Boolean.convert("TRUE".into())?, Value::Boolean(true));
        assert_eq!(DataType::Boolean.convert("False".into())?, Value::Boolean(false));
        assert!(DataType::Boolean.convert("yes".into()).is_err());
        assert!(DataType::Boolean.convert(Value::Integer(1)).is_err());
        Ok(())
    }

    #[test]
    fn test_null_passes_through() -> Result<()> {
        for datatype in DataType::ALL {
            assert_eq!(datatype.convert(Value::Null)?, Value::Null);
            assert!(datatype.is_valid(&Value::Null));
        }
        Ok(())
    }

    #[test]
    fn test_converted_values_are_valid() {
        let inputs = vec![
            Value::Integer(9),
            Value::Float(2.75),
            Value::Boolean(true),
            Value::from("12"),
            Value::from("0.5"),
            Value::from("true"),
            Value::from("text"),
        ];
        for datatype in DataType::ALL {
            for input in inputs.iter().cloned() {
                if let Ok(converted) = datatype.convert(input) {
                    assert!(datatype.is_valid(&converted), "{} {:?}", datatype, converted);
                }
            }
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!(DataType::from_str("integer"), Some(DataType::Integer));
        assert_eq!(DataType::from_str("Double"), Some(DataType::Double));
        assert_eq!(DataType::from_str("text"), None);
    }

    #[test]
    fn test_value_json() -> Result<()> {
        let values = vec![
            Value::Null,
            Value::Boolean(true),
            Value::Integer(3),
            Value::Float(1.5),
            Value::from("a"),
        ];
        let json = serde_json::to_string(&values)?;
        assert_eq!(json, r#"[null,true,3,1.5,"a"]"#);
        let back: Vec<Value> = serde_json::from_str(&json)?;
        assert_eq!(back, values);
        Ok(())
    }
}
