use crate::{TypeDescriptor, TypeName};
use enum_dispatch::enum_dispatch;
use serde::Serialize;
use std::{
    fmt::{self, Debug, Display, Formatter},
    hash::{Hash, Hasher},
    sync::{Arc, Weak},
};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Constructor,
    Field,
    Method,
}

impl Display for MemberKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MemberKind::Constructor => "constructor",
            MemberKind::Field => "field",
            MemberKind::Method => "method",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDefinition {
    pub parameters: Vec<TypeDescriptor>,
    pub variadic: bool,
    pub public: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub name: String,
    pub field_type: TypeDescriptor,
    pub is_static: bool,
    pub public: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDefinition {
    pub name: String,
    pub parameters: Vec<TypeDescriptor>,
    pub return_type: TypeDescriptor,
    pub variadic: bool,
    pub is_static: bool,
    pub public: bool,
}

/// Common view over the three member kinds.
#[enum_dispatch]
pub trait MemberInfo {
    fn parent(&self) -> &TypeName;
    fn kind(&self) -> MemberKind;
    fn name(&self) -> &str;
    /// Position among the owner's declared members of the same kind.
    fn declaration_index(&self) -> usize;
    /// Empty for fields.
    fn parameter_types(&self) -> &[TypeDescriptor];
    /// The field type or method return type; `None` for constructors.
    fn value_type(&self) -> Option<&TypeDescriptor>;
    fn is_variadic(&self) -> bool;
    fn is_static(&self) -> bool;
    fn is_public(&self) -> bool;
    fn downgrade(&self) -> WeakMember;
}

macro_rules! member_description {
    ($name:ident, $field:ident: $definition:ty) => {
        #[derive(Clone)]
        pub struct $name {
            pub parent: TypeName,
            pub index: usize,
            pub $field: Arc<$definition>,
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.parent == other.parent && Arc::ptr_eq(&self.$field, &other.$field)
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.parent.hash(state);
                Arc::as_ptr(&self.$field).hash(state);
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                write!(f, "{}", ResolvedMember::from(self.clone()))
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                Display::fmt(self, f)
            }
        }
    };
}

member_description!(ConstructorDescription, constructor: ConstructorDefinition);
member_description!(FieldDescription, field: FieldDefinition);
member_description!(MethodDescription, method: MethodDefinition);

pub const CONSTRUCTOR_NAME: &str = "<init>";

impl MemberInfo for ConstructorDescription {
    fn parent(&self) -> &TypeName {
        &self.parent
    }
    fn kind(&self) -> MemberKind {
        MemberKind::Constructor
    }
    fn name(&self) -> &str {
        CONSTRUCTOR_NAME
    }
    fn declaration_index(&self) -> usize {
        self.index
    }
    fn parameter_types(&self) -> &[TypeDescriptor] {
        &self.constructor.parameters
    }
    fn value_type(&self) -> Option<&TypeDescriptor> {
        None
    }
    fn is_variadic(&self) -> bool {
        self.constructor.variadic
    }
    fn is_static(&self) -> bool {
        false
    }
    fn is_public(&self) -> bool {
        self.constructor.public
    }
    fn downgrade(&self) -> WeakMember {
        WeakMember::Constructor {
            parent: self.parent.clone(),
            index: self.index,
            constructor: Arc::downgrade(&self.constructor),
        }
    }
}

impl MemberInfo for FieldDescription {
    fn parent(&self) -> &TypeName {
        &self.parent
    }
    fn kind(&self) -> MemberKind {
        MemberKind::Field
    }
    fn name(&self) -> &str {
        &self.field.name
    }
    fn declaration_index(&self) -> usize {
        self.index
    }
    fn parameter_types(&self) -> &[TypeDescriptor] {
        &[]
    }
    fn value_type(&self) -> Option<&TypeDescriptor> {
        Some(&self.field.field_type)
    }
    fn is_variadic(&self) -> bool {
        false
    }
    fn is_static(&self) -> bool {
        self.field.is_static
    }
    fn is_public(&self) -> bool {
        self.field.public
    }
    fn downgrade(&self) -> WeakMember {
        WeakMember::Field {
            parent: self.parent.clone(),
            index: self.index,
            field: Arc::downgrade(&self.field),
        }
    }
}

impl MemberInfo for MethodDescription {
    fn parent(&self) -> &TypeName {
        &self.parent
    }
    fn kind(&self) -> MemberKind {
        MemberKind::Method
    }
    fn name(&self) -> &str {
        &self.method.name
    }
    fn declaration_index(&self) -> usize {
        self.index
    }
    fn parameter_types(&self) -> &[TypeDescriptor] {
        &self.method.parameters
    }
    fn value_type(&self) -> Option<&TypeDescriptor> {
        Some(&self.method.return_type)
    }
    fn is_variadic(&self) -> bool {
        self.method.variadic
    }
    fn is_static(&self) -> bool {
        self.method.is_static
    }
    fn is_public(&self) -> bool {
        self.method.public
    }
    fn downgrade(&self) -> WeakMember {
        WeakMember::Method {
            parent: self.parent.clone(),
            index: self.index,
            method: Arc::downgrade(&self.method),
        }
    }
}

#[enum_dispatch(MemberInfo)]
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum ResolvedMember {
    ConstructorDescription,
    FieldDescription,
    MethodDescription,
}

impl ResolvedMember {
    pub fn as_constructor(&self) -> Option<&ConstructorDescription> {
        match self {
            ResolvedMember::ConstructorDescription(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_field(&self) -> Option<&FieldDescription> {
        match self {
            ResolvedMember::FieldDescription(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&MethodDescription> {
        match self {
            ResolvedMember::MethodDescription(m) => Some(m),
            _ => None,
        }
    }

    pub fn signature(&self) -> Signature {
        Signature {
            name: match self.kind() {
                MemberKind::Constructor => None,
                _ => Some(self.name().to_string()),
            },
            parameters: self.parameter_types().iter().cloned().map(Some).collect(),
            return_type: self.value_type().cloned(),
            variadic: self.is_variadic(),
        }
    }
}

impl Display for ResolvedMember {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature().render(self.parent(), self.kind()))
    }
}

/// A cached member that does not keep the owner's definitions alive.
#[derive(Clone, Debug)]
pub enum WeakMember {
    Constructor {
        parent: TypeName,
        index: usize,
        constructor: Weak<ConstructorDefinition>,
    },
    Field {
        parent: TypeName,
        index: usize,
        field: Weak<FieldDefinition>,
    },
    Method {
        parent: TypeName,
        index: usize,
        method: Weak<MethodDefinition>,
    },
}

impl WeakMember {
    pub fn upgrade(&self) -> Option<ResolvedMember> {
        Some(match self {
            WeakMember::Constructor {
                parent,
                index,
                constructor,
            } => ConstructorDescription {
                parent: parent.clone(),
                index: *index,
                constructor: constructor.upgrade()?,
            }
            .into(),
            WeakMember::Field {
                parent,
                index,
                field,
            } => FieldDescription {
                parent: parent.clone(),
                index: *index,
                field: field.upgrade()?,
            }
            .into(),
            WeakMember::Method {
                parent,
                index,
                method,
            } => MethodDescription {
                parent: parent.clone(),
                index: *index,
                method: method.upgrade()?,
            }
            .into(),
        })
    }

    pub fn is_alive(&self) -> bool {
        match self {
            WeakMember::Constructor { constructor, .. } => constructor.strong_count() > 0,
            WeakMember::Field { field, .. } => field.strong_count() > 0,
            WeakMember::Method { method, .. } => method.strong_count() > 0,
        }
    }
}

/// A possibly partial member signature. `None` entries are unconstrained.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Signature {
    pub name: Option<String>,
    pub parameters: Vec<Option<TypeDescriptor>>,
    pub return_type: Option<TypeDescriptor>,
    pub variadic: bool,
}

impl Signature {
    pub fn render(&self, owner: &TypeName, kind: MemberKind) -> String {
        let name = self.name.as_deref().unwrap_or("*");
        match kind {
            MemberKind::Constructor => format!("{}({})", owner, self.render_parameters()),
            MemberKind::Field => match &self.return_type {
                Some(ty) => format!("{}.{}: {}", owner, name, ty),
                None => format!("{}.{}", owner, name),
            },
            MemberKind::Method => format!("{}.{}", owner, self),
        }
    }

    fn render_parameters(&self) -> String {
        let last = self.parameters.len().saturating_sub(1);
        self.parameters
            .iter()
            .enumerate()
            .map(|(i, p)| match p {
                Some(TypeDescriptor::Array(component)) if self.variadic && i == last => {
                    format!("{}...", component)
                }
                Some(ty) => ty.to_string(),
                None => "null".to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({})",
            self.name.as_deref().unwrap_or("*"),
            self.render_parameters()
        )?;
        if let Some(ret) = &self.return_type {
            write!(f, ": {}", ret)?;
        }
        Ok(())
    }
}
