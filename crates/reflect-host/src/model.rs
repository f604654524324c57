//! JSON type models.
//!
//! A model declares types and member signatures without bodies. Loading one
//! yields a [`TypeRegistry`] that resolves members normally; invoking them
//! fails with [`InvocationError::MissingBody`](reflect_value::InvocationError::MissingBody).
//!
//! ```json
//! { "types": [
//!   { "name": "Zoo", "constructors": [ { "parameters": ["int"] } ],
//!     "methods": [ { "name": "feed", "parameters": ["java.lang.String[]"],
//!                    "variadic": true, "returns": "void" } ] }
//! ] }
//! ```
use crate::{TypeBuilder, TypeRegistry};
use reflect_types::{
    error::HostError,
    members::{ConstructorDefinition, FieldDefinition, MethodDefinition},
    PrimitiveKind, TypeDescriptor,
};
use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid model: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Host(#[from] HostError),
}

#[derive(Debug, Deserialize)]
pub struct TypeModel {
    pub types: Vec<TypeSpec>,
}

#[derive(Debug, Deserialize)]
pub struct TypeSpec {
    pub name: String,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub interface: bool,
    #[serde(default)]
    pub constructors: Vec<ConstructorSpec>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub methods: Vec<MethodSpec>,
}

#[derive(Debug, Deserialize)]
pub struct ConstructorSpec {
    #[serde(default)]
    pub parameters: Vec<TypeDescriptor>,
    #[serde(default)]
    pub variadic: bool,
    #[serde(default = "visible")]
    pub public: bool,
}

#[derive(Debug, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: TypeDescriptor,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default = "visible")]
    pub public: bool,
}

#[derive(Debug, Deserialize)]
pub struct MethodSpec {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<TypeDescriptor>,
    #[serde(default = "void")]
    pub returns: TypeDescriptor,
    #[serde(default)]
    pub variadic: bool,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default = "visible")]
    pub public: bool,
}

fn visible() -> bool {
    true
}

fn void() -> TypeDescriptor {
    TypeDescriptor::Primitive(PrimitiveKind::Void)
}

impl TypeModel {
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Registers every type on top of the standard ones.
    pub fn into_registry(self) -> Result<TypeRegistry, ModelError> {
        let registry = TypeRegistry::new();
        for spec in self.types {
            registry.register(spec.into_builder())?;
        }
        Ok(registry)
    }
}

impl TypeSpec {
    fn into_builder(self) -> TypeBuilder {
        let mut builder = if self.interface {
            TypeBuilder::interface(self.name)
        } else {
            TypeBuilder::class(self.name)
        };
        if let Some(superclass) = self.superclass {
            builder = builder.extends(superclass);
        }
        for interface in self.interfaces {
            builder = builder.implements(interface);
        }
        for c in self.constructors {
            builder = builder.declare_constructor(
                ConstructorDefinition {
                    parameters: c.parameters,
                    variadic: c.variadic,
                    public: c.public,
                },
                None,
            );
        }
        for f in self.fields {
            builder = builder.declare_field(
                FieldDefinition {
                    name: f.name,
                    field_type: f.field_type,
                    is_static: f.is_static,
                    public: f.public,
                },
                None,
            );
        }
        for m in self.methods {
            builder = builder.declare_method(
                MethodDefinition {
                    name: m.name,
                    parameters: m.parameters,
                    return_type: m.returns,
                    variadic: m.variadic,
                    is_static: m.is_static,
                    public: m.public,
                },
                None,
            );
        }
        builder
    }
}

pub fn load_registry(path: impl AsRef<Path>) -> Result<TypeRegistry, ModelError> {
    TypeModel::from_file(path)?.into_registry()
}
