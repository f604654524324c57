//! The pairing between primitive kinds and their reference wrappers.
//!
//! The table is data rather than logic so that a host with different wrapper
//! names can supply its own through [`HostReflection::boxing`](crate::HostReflection::boxing).
use crate::{PrimitiveKind, TypeDescriptor, TypeName};

#[derive(Debug, Clone, Copy)]
pub struct BoxingTable {
    pairs: &'static [(PrimitiveKind, &'static str)],
}

impl BoxingTable {
    pub const JVM: BoxingTable = BoxingTable {
        pairs: &[
            (PrimitiveKind::Boolean, "java.lang.Boolean"),
            (PrimitiveKind::Char, "java.lang.Character"),
            (PrimitiveKind::Byte, "java.lang.Byte"),
            (PrimitiveKind::Short, "java.lang.Short"),
            (PrimitiveKind::Int, "java.lang.Integer"),
            (PrimitiveKind::Long, "java.lang.Long"),
            (PrimitiveKind::Float, "java.lang.Float"),
            (PrimitiveKind::Double, "java.lang.Double"),
            (PrimitiveKind::Void, "java.lang.Void"),
        ],
    };

    pub const fn new(pairs: &'static [(PrimitiveKind, &'static str)]) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &'static [(PrimitiveKind, &'static str)] {
        self.pairs
    }

    pub fn boxed_name(&self, kind: PrimitiveKind) -> Option<&'static str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, name)| *name)
    }

    pub fn unboxed_kind(&self, name: &TypeName) -> Option<PrimitiveKind> {
        self.pairs
            .iter()
            .find(|(_, n)| *n == name.as_str())
            .map(|(k, _)| *k)
    }

    /// The wrapper type of a primitive, or the descriptor itself otherwise.
    pub fn boxed(&self, ty: &TypeDescriptor) -> TypeDescriptor {
        match ty {
            TypeDescriptor::Primitive(kind) => match self.boxed_name(*kind) {
                Some(name) => TypeDescriptor::reference(name),
                None => ty.clone(),
            },
            _ => ty.clone(),
        }
    }

    /// The primitive behind a wrapper type, or the descriptor itself otherwise.
    pub fn unboxed(&self, ty: &TypeDescriptor) -> TypeDescriptor {
        match self.unboxed_primitive(ty) {
            Some(kind) => TypeDescriptor::Primitive(kind),
            None => ty.clone(),
        }
    }

    /// The primitive kind a descriptor denotes, looking through wrappers.
    pub fn unboxed_primitive(&self, ty: &TypeDescriptor) -> Option<PrimitiveKind> {
        match ty {
            TypeDescriptor::Primitive(kind) => Some(*kind),
            TypeDescriptor::Reference(name) => self.unboxed_kind(name),
            TypeDescriptor::Array(_) => None,
        }
    }

    /// Whether one side is a primitive and the other is its wrapper.
    pub fn are_duals(&self, a: &TypeDescriptor, b: &TypeDescriptor) -> bool {
        match (a, b) {
            (TypeDescriptor::Primitive(kind), TypeDescriptor::Reference(name))
            | (TypeDescriptor::Reference(name), TypeDescriptor::Primitive(kind)) => {
                self.unboxed_kind(name) == Some(*kind)
            }
            _ => false,
        }
    }
}

impl Default for BoxingTable {
    fn default() -> Self {
        Self::JVM
    }
}
