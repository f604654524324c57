//! # reflect-types
//!
//! Host-independent descriptions of types and members.
//! This crate provides the descriptors that the resolver matches against and the
//! capability trait a host runtime implements to expose its type hierarchy.
//!
//! ## Core Types
//!
//! - **[`TypeDescriptor`]**: A primitive, a reference type, or an array of either.
//! - **[`BoxingTable`](boxing::BoxingTable)**: Pairs every primitive kind with its wrapper type.
//! - **[`ResolvedMember`](members::ResolvedMember)**: A constructor, field, or method of a type.
//! - **[`HostReflection`]**: Enumerates declared members and walks supertypes.
use crate::{
    boxing::BoxingTable,
    error::HostError,
    members::{ConstructorDescription, FieldDescription, MethodDescription},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    fmt::{self, Debug, Display, Formatter},
    str::FromStr,
    sync::Arc,
};

#[macro_use]
mod macros;

pub mod boxing;
pub mod error;
pub mod members;
mod primitive;

pub use primitive::PrimitiveKind;

/// Names of the types every host is expected to provide.
pub mod well_known {
    pub const OBJECT: &str = "java.lang.Object";
    pub const NUMBER: &str = "java.lang.Number";
    pub const STRING: &str = "java.lang.String";
    pub const CHAR_SEQUENCE: &str = "java.lang.CharSequence";
}

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeName(Arc<str>);

impl TypeName {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last segment of a dotted name.
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl Debug for TypeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TypeName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Primitive(PrimitiveKind),
    Reference(TypeName),
    Array(Box<TypeDescriptor>),
}

impl TypeDescriptor {
    pub fn reference(name: impl Into<TypeName>) -> Self {
        Self::Reference(name.into())
    }

    pub fn object() -> Self {
        Self::reference(well_known::OBJECT)
    }

    pub fn string() -> Self {
        Self::reference(well_known::STRING)
    }

    pub fn array_of(self) -> Self {
        Self::Array(Box::new(self))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Anything that can hold an absent value: reference types and arrays.
    pub fn is_reference(&self) -> bool {
        !self.is_primitive()
    }

    pub fn is_primitive_number(&self) -> bool {
        matches!(self, Self::Primitive(kind) if kind.is_numeric())
    }

    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            Self::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&TypeName> {
        match self {
            Self::Reference(name) => Some(name),
            _ => None,
        }
    }

    pub fn component(&self) -> Option<&TypeDescriptor> {
        match self {
            Self::Array(component) => Some(component),
            _ => None,
        }
    }
}

impl From<PrimitiveKind> for TypeDescriptor {
    fn from(value: PrimitiveKind) -> Self {
        Self::Primitive(value)
    }
}

impl Debug for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => write!(f, "{}", kind),
            Self::Reference(name) => write!(f, "{}", name),
            Self::Array(component) => write!(f, "{}[]", component),
        }
    }
}

impl FromStr for TypeDescriptor {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut base = trimmed;
        let mut dimensions = 0;
        while let Some(inner) = base.strip_suffix("[]") {
            base = inner.trim_end();
            dimensions += 1;
        }

        let valid = !base.is_empty()
            && base
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '.' | '_' | '$'));
        if !valid {
            return Err(HostError::InvalidType(s.to_string()));
        }

        let mut descriptor = match PrimitiveKind::from_name(base) {
            Some(kind) => TypeDescriptor::Primitive(kind),
            None => TypeDescriptor::reference(base),
        };
        if dimensions > 0 && descriptor == TypeDescriptor::Primitive(PrimitiveKind::Void) {
            return Err(HostError::InvalidType(s.to_string()));
        }
        for _ in 0..dimensions {
            descriptor = descriptor.array_of();
        }
        Ok(descriptor)
    }
}

impl Serialize for TypeDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Reflection capabilities of a host runtime.
///
/// Implementors enumerate declared members in declaration order; the resolver
/// relies on that order to break ties between equally distant candidates.
pub trait HostReflection: Send + Sync {
    fn boxing(&self) -> &BoxingTable {
        &BoxingTable::JVM
    }

    /// The top of every class hierarchy; arrays report it as their superclass.
    fn root_type(&self) -> TypeName {
        TypeName::new(well_known::OBJECT)
    }

    fn contains_type(&self, name: &TypeName) -> bool;

    /// `None` for the root type and for interfaces.
    fn superclass(&self, name: &TypeName) -> Result<Option<TypeName>, HostError>;

    /// Interfaces the type declares directly.
    fn interfaces(&self, name: &TypeName) -> Result<Vec<TypeName>, HostError>;

    fn is_interface(&self, name: &TypeName) -> Result<bool, HostError>;

    fn declared_constructors(
        &self,
        owner: &TypeName,
    ) -> Result<Vec<ConstructorDescription>, HostError>;

    fn declared_fields(&self, owner: &TypeName) -> Result<Vec<FieldDescription>, HostError>;

    fn declared_methods(&self, owner: &TypeName) -> Result<Vec<MethodDescription>, HostError>;

    fn superclass_of(&self, ty: &TypeDescriptor) -> Result<Option<TypeDescriptor>, HostError> {
        match ty {
            TypeDescriptor::Primitive(_) => Ok(None),
            TypeDescriptor::Array(_) => Ok(Some(TypeDescriptor::Reference(self.root_type()))),
            TypeDescriptor::Reference(name) => {
                Ok(self.superclass(name)?.map(TypeDescriptor::Reference))
            }
        }
    }

    fn declared_constructor(
        &self,
        owner: &TypeName,
        parameters: &[TypeDescriptor],
    ) -> Result<Option<ConstructorDescription>, HostError> {
        Ok(self
            .declared_constructors(owner)?
            .into_iter()
            .find(|c| c.constructor.parameters == parameters))
    }

    fn declared_field(
        &self,
        owner: &TypeName,
        name: &str,
    ) -> Result<Option<FieldDescription>, HostError> {
        Ok(self
            .declared_fields(owner)?
            .into_iter()
            .find(|f| f.field.name == name))
    }

    /// A public field declared by the type, one of its interfaces, or a superclass.
    fn public_field(
        &self,
        owner: &TypeName,
        name: &str,
    ) -> Result<Option<FieldDescription>, HostError> {
        if let Some(field) = self
            .declared_fields(owner)?
            .into_iter()
            .find(|f| f.field.public && f.field.name == name)
        {
            return Ok(Some(field));
        }
        for interface in self.interfaces(owner)? {
            if let Some(field) = self.public_field(&interface, name)? {
                return Ok(Some(field));
            }
        }
        match self.superclass(owner)? {
            Some(parent) => self.public_field(&parent, name),
            None => Ok(None),
        }
    }

    fn declared_method(
        &self,
        owner: &TypeName,
        name: &str,
        parameters: &[TypeDescriptor],
    ) -> Result<Option<MethodDescription>, HostError> {
        Ok(self
            .declared_methods(owner)?
            .into_iter()
            .find(|m| m.method.name == name && m.method.parameters == parameters))
    }

    /// A public method declared by the type, a superclass, or an interface.
    fn public_method(
        &self,
        owner: &TypeName,
        name: &str,
        parameters: &[TypeDescriptor],
    ) -> Result<Option<MethodDescription>, HostError> {
        if let Some(method) = self.declared_methods(owner)?.into_iter().find(|m| {
            m.method.public && m.method.name == name && m.method.parameters == parameters
        }) {
            return Ok(Some(method));
        }
        if let Some(parent) = self.superclass(owner)? {
            if let Some(method) = self.public_method(&parent, name, parameters)? {
                return Ok(Some(method));
            }
        }
        for interface in self.interfaces(owner)? {
            if let Some(method) = self.public_method(&interface, name, parameters)? {
                return Ok(Some(method));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_descriptors() {
        assert_eq!(
            "int".parse::<TypeDescriptor>().unwrap(),
            TypeDescriptor::Primitive(PrimitiveKind::Int)
        );
        assert_eq!(
            "int[][]".parse::<TypeDescriptor>().unwrap(),
            TypeDescriptor::Primitive(PrimitiveKind::Int).array_of().array_of()
        );
        assert_eq!(
            "java.lang.String[]".parse::<TypeDescriptor>().unwrap(),
            TypeDescriptor::string().array_of()
        );
        assert!("".parse::<TypeDescriptor>().is_err());
        assert!("[]".parse::<TypeDescriptor>().is_err());
        assert!("void[]".parse::<TypeDescriptor>().is_err());
        assert!("a b".parse::<TypeDescriptor>().is_err());
    }

    #[test]
    fn test_display_matches_parse() {
        let ty = TypeDescriptor::reference("com.example.Zoo").array_of();
        assert_eq!(ty.to_string(), "com.example.Zoo[]");
        assert_eq!(ty.to_string().parse::<TypeDescriptor>().unwrap(), ty);
    }

    #[test]
    fn test_reference_classification() {
        let int = TypeDescriptor::Primitive(PrimitiveKind::Int);
        assert!(int.is_primitive_number());
        assert!(!int.is_reference());
        assert!(int.clone().array_of().is_reference());
        assert!(!TypeDescriptor::Primitive(PrimitiveKind::Char).is_primitive_number());
    }

    #[test]
    fn test_simple_name() {
        assert_eq!(TypeName::new("java.lang.Integer").simple_name(), "Integer");
        assert_eq!(TypeName::new("Zoo").simple_name(), "Zoo");
    }
}
