//! Primitive conversions permitted at the invocation boundary: numeric
//! widening and narrowing, plus boxing and unboxing of wrapper values.
use crate::{error::ConversionError, PrimitiveValue, Value};
use reflect_types::PrimitiveKind;

impl PrimitiveValue {
    fn as_i64(self) -> Option<i64> {
        Some(match self {
            Self::Byte(v) => v as i64,
            Self::Short(v) => v as i64,
            Self::Int(v) => v as i64,
            Self::Long(v) => v,
            Self::Float(v) => v as i64,
            Self::Double(v) => v as i64,
            Self::Boolean(_) | Self::Char(_) => return None,
        })
    }

    fn as_i32(self) -> Option<i32> {
        Some(match self {
            Self::Float(v) => v as i32,
            Self::Double(v) => v as i32,
            other => other.as_i64()? as i32,
        })
    }

    fn as_f64(self) -> Option<f64> {
        Some(match self {
            Self::Float(v) => v as f64,
            Self::Double(v) => v,
            other => other.as_i64()? as f64,
        })
    }

    /// Converts to `to`. Same-kind casts are the identity; between numeric
    /// kinds the value is widened or narrowed. Boolean and char only convert
    /// to themselves.
    pub fn cast(self, to: PrimitiveKind) -> Result<PrimitiveValue, ConversionError> {
        if self.kind() == to {
            return Ok(self);
        }
        let unsupported = || ConversionError::Unsupported {
            expected: to.to_string(),
            passed: self.kind().to_string(),
        };
        if !self.kind().is_numeric() || !to.is_numeric() {
            return Err(unsupported());
        }
        let converted = match to {
            PrimitiveKind::Byte => self.as_i32().map(|v| Self::Byte(v as i8)),
            PrimitiveKind::Short => self.as_i32().map(|v| Self::Short(v as i16)),
            PrimitiveKind::Int => self.as_i32().map(Self::Int),
            PrimitiveKind::Long => self.as_i64().map(Self::Long),
            PrimitiveKind::Float => self.as_f64().map(|v| Self::Float(v as f32)),
            PrimitiveKind::Double => self.as_f64().map(Self::Double),
            _ => None,
        };
        converted.ok_or_else(unsupported)
    }
}

/// Reads a primitive of kind `to` out of a primitive or boxed value.
pub fn unbox(value: &Value, to: PrimitiveKind) -> Result<PrimitiveValue, ConversionError> {
    match value {
        Value::Primitive(p) => p.cast(to),
        Value::Null => Err(ConversionError::NullElement {
            index: 0,
            expected: to.to_string(),
        }),
        other => Err(ConversionError::Unsupported {
            expected: to.to_string(),
            passed: other.to_string(),
        }),
    }
}

/// Converts a value stored under one element type into another element type.
/// Only primitive and wrapper values change representation; everything else
/// passes through.
pub fn cast_value(value: &Value, to: PrimitiveKind) -> Result<Value, ConversionError> {
    match value {
        Value::Primitive(p) => Ok(Value::Primitive(p.cast(to)?)),
        other => Ok(other.clone()),
    }
}
