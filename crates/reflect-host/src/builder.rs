use crate::{ConstructorBody, MethodBody, TypeEntry};
use reflect_types::{
    error::HostError,
    members::{ConstructorDefinition, FieldDefinition, MethodDefinition},
    well_known, PrimitiveKind, TypeDescriptor, TypeName,
};
use reflect_value::{error::InvocationError, ObjectRef, Value};
use std::sync::Arc;

/// Declares a type for a [`TypeRegistry`](crate::TypeRegistry).
///
/// Members keep the order they are declared in. Classes without an explicit
/// superclass extend the root type.
pub struct TypeBuilder {
    name: TypeName,
    superclass: Option<TypeName>,
    interfaces: Vec<TypeName>,
    is_interface: bool,
    constructors: Vec<(ConstructorDefinition, Option<ConstructorBody>)>,
    fields: Vec<(FieldDefinition, Option<Value>)>,
    methods: Vec<(MethodDefinition, Option<MethodBody>)>,
}

impl TypeBuilder {
    pub fn class(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            superclass: None,
            interfaces: Vec::new(),
            is_interface: false,
            constructors: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn interface(name: impl Into<TypeName>) -> Self {
        Self {
            is_interface: true,
            ..Self::class(name)
        }
    }

    pub fn extends(mut self, superclass: impl Into<TypeName>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<TypeName>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn declare_constructor(
        mut self,
        definition: ConstructorDefinition,
        body: Option<ConstructorBody>,
    ) -> Self {
        self.constructors.push((definition, body));
        self
    }

    pub fn declare_field(mut self, definition: FieldDefinition, initial: Option<Value>) -> Self {
        self.fields.push((definition, initial));
        self
    }

    pub fn declare_method(mut self, definition: MethodDefinition, body: Option<MethodBody>) -> Self {
        self.methods.push((definition, body));
        self
    }

    pub fn constructor<F>(self, parameters: impl IntoIterator<Item = TypeDescriptor>, body: F) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> Result<(), InvocationError> + Send + Sync + 'static,
    {
        self.declare_constructor(
            ConstructorDefinition {
                parameters: parameters.into_iter().collect(),
                variadic: false,
                public: true,
            },
            Some(Arc::new(body)),
        )
    }

    /// The last parameter must be an array type.
    pub fn varargs_constructor<F>(
        self,
        parameters: impl IntoIterator<Item = TypeDescriptor>,
        body: F,
    ) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> Result<(), InvocationError> + Send + Sync + 'static,
    {
        self.declare_constructor(
            ConstructorDefinition {
                parameters: parameters.into_iter().collect(),
                variadic: true,
                public: true,
            },
            Some(Arc::new(body)),
        )
    }

    pub fn field(self, name: &str, field_type: TypeDescriptor) -> Self {
        self.declare_field(
            FieldDefinition {
                name: name.to_string(),
                field_type,
                is_static: false,
                public: true,
            },
            None,
        )
    }

    pub fn private_field(self, name: &str, field_type: TypeDescriptor) -> Self {
        self.declare_field(
            FieldDefinition {
                name: name.to_string(),
                field_type,
                is_static: false,
                public: false,
            },
            None,
        )
    }

    pub fn static_field(self, name: &str, field_type: TypeDescriptor, initial: Value) -> Self {
        self.declare_field(
            FieldDefinition {
                name: name.to_string(),
                field_type,
                is_static: true,
                public: true,
            },
            Some(initial),
        )
    }

    pub fn method<F>(
        self,
        name: &str,
        parameters: impl IntoIterator<Item = TypeDescriptor>,
        return_type: TypeDescriptor,
        body: F,
    ) -> Self
    where
        F: Fn(Option<&Value>, &[Value]) -> Result<Value, InvocationError> + Send + Sync + 'static,
    {
        self.declare_method(
            method_definition(name, parameters, return_type, false, false),
            Some(Arc::new(body)),
        )
    }

    pub fn varargs_method<F>(
        self,
        name: &str,
        parameters: impl IntoIterator<Item = TypeDescriptor>,
        return_type: TypeDescriptor,
        body: F,
    ) -> Self
    where
        F: Fn(Option<&Value>, &[Value]) -> Result<Value, InvocationError> + Send + Sync + 'static,
    {
        self.declare_method(
            method_definition(name, parameters, return_type, true, false),
            Some(Arc::new(body)),
        )
    }

    pub fn static_method<F>(
        self,
        name: &str,
        parameters: impl IntoIterator<Item = TypeDescriptor>,
        return_type: TypeDescriptor,
        body: F,
    ) -> Self
    where
        F: Fn(Option<&Value>, &[Value]) -> Result<Value, InvocationError> + Send + Sync + 'static,
    {
        self.declare_method(
            method_definition(name, parameters, return_type, false, true),
            Some(Arc::new(body)),
        )
    }

    pub(crate) fn build(self) -> Result<TypeEntry, HostError> {
        let name = self.name;
        let check_variadic = |variadic: bool, parameters: &[TypeDescriptor], member: &str| {
            let ok = !variadic || parameters.last().is_some_and(TypeDescriptor::is_array);
            if ok {
                Ok(())
            } else {
                Err(HostError::InvalidMember(format!(
                    "{}.{} is variadic but does not end with an array parameter",
                    name, member
                )))
            }
        };

        for (c, _) in &self.constructors {
            check_variadic(c.variadic, &c.parameters, "<init>")?;
        }
        for (m, _) in &self.methods {
            check_variadic(m.variadic, &m.parameters, &m.name)?;
        }
        for (f, _) in &self.fields {
            if f.field_type == TypeDescriptor::Primitive(PrimitiveKind::Void) {
                return Err(HostError::InvalidMember(format!(
                    "{}.{} cannot have type void",
                    name, f.name
                )));
            }
        }

        let superclass = match (self.is_interface, self.superclass) {
            (true, _) => None,
            (false, Some(parent)) => Some(parent),
            (false, None) if name.as_str() == well_known::OBJECT => None,
            (false, None) => Some(TypeName::new(well_known::OBJECT)),
        };

        Ok(TypeEntry {
            superclass,
            interfaces: self.interfaces,
            is_interface: self.is_interface,
            constructors: self
                .constructors
                .into_iter()
                .map(|(d, body)| (Arc::new(d), body))
                .collect(),
            fields: self
                .fields
                .into_iter()
                .map(|(d, initial)| (Arc::new(d), initial))
                .collect(),
            methods: self
                .methods
                .into_iter()
                .map(|(d, body)| (Arc::new(d), body))
                .collect(),
            name,
        })
    }
}

fn method_definition(
    name: &str,
    parameters: impl IntoIterator<Item = TypeDescriptor>,
    return_type: TypeDescriptor,
    variadic: bool,
    is_static: bool,
) -> MethodDefinition {
    MethodDefinition {
        name: name.to_string(),
        parameters: parameters.into_iter().collect(),
        return_type,
        variadic,
        is_static,
        public: true,
    }
}
