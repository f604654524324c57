//! # reflect-value
//!
//! Values that flow through reflective calls, and the invocation capability a
//! host exposes once a member has been resolved.
use reflect_types::{PrimitiveKind, TypeDescriptor};
use std::{fmt, sync::Arc};

pub mod convert;
pub mod error;
pub mod invoke;
pub mod object;

pub use error::{ConversionError, InvocationError};
pub use invoke::HostInvoker;
pub use object::{Object, ObjectRef};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PrimitiveValue {
    Boolean(bool),
    Char(char),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl PrimitiveValue {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Boolean(_) => PrimitiveKind::Boolean,
            Self::Char(_) => PrimitiveKind::Char,
            Self::Byte(_) => PrimitiveKind::Byte,
            Self::Short(_) => PrimitiveKind::Short,
            Self::Int(_) => PrimitiveKind::Int,
            Self::Long(_) => PrimitiveKind::Long,
            Self::Float(_) => PrimitiveKind::Float,
            Self::Double(_) => PrimitiveKind::Double,
        }
    }
}

impl fmt::Display for PrimitiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(v) => write!(f, "{}", v),
            Self::Char(v) => write!(f, "'{}'", v),
            Self::Byte(v) => write!(f, "{}b", v),
            Self::Short(v) => write!(f, "{}s", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Long(v) => write!(f, "{}L", v),
            Self::Float(v) => write!(f, "{}f", v),
            Self::Double(v) => write!(f, "{}d", v),
        }
    }
}

/// An array together with its element type. Primitive arrays hold only
/// [`Value::Primitive`] items of that kind.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayValue {
    pub element: TypeDescriptor,
    pub items: Vec<Value>,
}

impl ArrayValue {
    pub fn new(element: TypeDescriptor, items: Vec<Value>) -> Self {
        Self { element, items }
    }

    pub fn empty(element: TypeDescriptor) -> Self {
        Self::new(element, Vec::new())
    }

    pub fn of_primitives(kind: PrimitiveKind, items: impl IntoIterator<Item = PrimitiveValue>) -> Self {
        Self::new(
            TypeDescriptor::Primitive(kind),
            items.into_iter().map(Value::Primitive).collect(),
        )
    }

    pub fn array_type(&self) -> TypeDescriptor {
        self.element.clone().array_of()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    /// A primitive or its boxed wrapper; the declared type decides which.
    Primitive(PrimitiveValue),
    String(Arc<str>),
    Array(Arc<ArrayValue>),
    Object(ObjectRef),
}

impl Value {
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Self::String(s.into())
    }

    pub fn array(array: ArrayValue) -> Self {
        Self::Array(Arc::new(array))
    }

    /// The value an unassigned slot of type `ty` holds.
    pub fn default_for(ty: &TypeDescriptor) -> Self {
        match ty.as_primitive() {
            Some(PrimitiveKind::Boolean) => Self::Primitive(PrimitiveValue::Boolean(false)),
            Some(PrimitiveKind::Char) => Self::Primitive(PrimitiveValue::Char('\0')),
            Some(PrimitiveKind::Byte) => Self::Primitive(PrimitiveValue::Byte(0)),
            Some(PrimitiveKind::Short) => Self::Primitive(PrimitiveValue::Short(0)),
            Some(PrimitiveKind::Int) => Self::Primitive(PrimitiveValue::Int(0)),
            Some(PrimitiveKind::Long) => Self::Primitive(PrimitiveValue::Long(0)),
            Some(PrimitiveKind::Float) => Self::Primitive(PrimitiveValue::Float(0.0)),
            Some(PrimitiveKind::Double) => Self::Primitive(PrimitiveValue::Double(0.0)),
            Some(PrimitiveKind::Void) | None => Self::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_primitive(&self) -> Option<PrimitiveValue> {
        match self {
            Self::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Arc<ArrayValue>> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// The type of the value as the host sees it. Primitives report their
    /// own kind rather than a wrapper and `Null` has no type.
    pub fn runtime_type(&self) -> Option<TypeDescriptor> {
        match self {
            Self::Null => None,
            Self::Primitive(p) => Some(TypeDescriptor::Primitive(p.kind())),
            Self::String(_) => Some(TypeDescriptor::string()),
            Self::Array(a) => Some(a.array_type()),
            Self::Object(o) => Some(TypeDescriptor::Reference(o.type_name().clone())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Primitive(p) => write!(f, "{}", p),
            Self::String(s) => write!(f, "{:?}", s),
            Self::Array(a) => {
                write!(f, "{}[", a.element)?;
                for (i, item) in a.items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Self::Object(o) => write!(f, "{}", o),
        }
    }
}

impl From<PrimitiveValue> for Value {
    fn from(value: PrimitiveValue) -> Self {
        Self::Primitive(value)
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Primitive(PrimitiveValue::$variant(value))
                }
            }
        )*
    };
}

value_from! {
    bool => Boolean,
    char => Char,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<ObjectRef> for Value {
    fn from(value: ObjectRef) -> Self {
        Self::Object(value)
    }
}

/// A value paired with the type the caller wants it matched as.
/// Without an explicit type the value's runtime type is used.
#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    pub value: Value,
    pub ty: Option<TypeDescriptor>,
}

impl Argument {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            ty: None,
        }
    }

    pub fn typed(value: impl Into<Value>, ty: TypeDescriptor) -> Self {
        Self {
            value: value.into(),
            ty: Some(ty),
        }
    }

    pub fn null() -> Self {
        Self::new(Value::Null)
    }

    pub fn resolved_type(&self) -> Option<TypeDescriptor> {
        self.ty.clone().or_else(|| self.value.runtime_type())
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ty {
            Some(ty) => write!(f, "{} as {}", self.value, ty),
            None => write!(f, "{}", self.value),
        }
    }
}
