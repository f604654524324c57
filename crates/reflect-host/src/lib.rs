//! # reflect-host
//!
//! An in-memory host runtime. [`TypeRegistry`] holds type declarations with
//! native member bodies and implements both [`HostReflection`] and
//! [`HostInvoker`], so the resolver can be driven without an external runtime.
//!
//! Types can be declared in code through [`TypeBuilder`] or loaded from a JSON
//! [`model`](model::TypeModel).
use dashmap::DashMap;
use parking_lot::RwLock;
use reflect_types::{
    boxing::BoxingTable,
    error::HostError,
    members::{
        ConstructorDefinition, ConstructorDescription, FieldDefinition, FieldDescription,
        MethodDefinition, MethodDescription,
    },
    well_known, HostReflection, TypeDescriptor, TypeName,
};
use reflect_value::{error::InvocationError, ObjectRef, Value};
use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::Arc,
};
use tracing::debug;

mod builder;
mod invoke;
pub mod model;

pub use builder::TypeBuilder;

pub type ConstructorBody =
    Arc<dyn Fn(&ObjectRef, &[Value]) -> Result<(), InvocationError> + Send + Sync>;
pub type MethodBody =
    Arc<dyn Fn(Option<&Value>, &[Value]) -> Result<Value, InvocationError> + Send + Sync>;

pub(crate) struct TypeEntry {
    pub name: TypeName,
    pub superclass: Option<TypeName>,
    pub interfaces: Vec<TypeName>,
    pub is_interface: bool,
    pub constructors: Vec<(Arc<ConstructorDefinition>, Option<ConstructorBody>)>,
    pub fields: Vec<(Arc<FieldDefinition>, Option<Value>)>,
    pub methods: Vec<(Arc<MethodDefinition>, Option<MethodBody>)>,
}

pub struct TypeRegistry {
    types: RwLock<HashMap<TypeName, Arc<TypeEntry>>>,
    statics: DashMap<(TypeName, String), Value>,
    boxing: BoxingTable,
}

impl TypeRegistry {
    /// A registry holding the root type, `Number`, the wrapper types,
    /// `CharSequence` and `String`.
    pub fn new() -> Self {
        let registry = Self::empty(BoxingTable::JVM);
        let mut standard = vec![
            TypeBuilder::class(well_known::OBJECT),
            TypeBuilder::class(well_known::NUMBER),
            TypeBuilder::interface(well_known::CHAR_SEQUENCE),
            TypeBuilder::class(well_known::STRING).implements(well_known::CHAR_SEQUENCE),
        ];
        for (kind, wrapper) in registry.boxing.pairs() {
            let builder = TypeBuilder::class(*wrapper);
            standard.push(if kind.is_numeric() {
                builder.extends(well_known::NUMBER)
            } else {
                builder
            });
        }
        for builder in standard {
            if let Err(e) = registry.register(builder) {
                debug!("skipping standard type: {}", e);
            }
        }
        registry
    }

    pub fn empty(boxing: BoxingTable) -> Self {
        Self {
            types: RwLock::new(HashMap::new()),
            statics: DashMap::new(),
            boxing,
        }
    }

    pub fn register(&self, builder: TypeBuilder) -> Result<TypeName, HostError> {
        let entry = builder.build()?;
        let name = entry.name.clone();
        let mut types = self.types.write();
        if types.contains_key(&name) {
            return Err(HostError::DuplicateType(name.to_string()));
        }
        for (field, initial) in &entry.fields {
            if field.is_static {
                let value = initial
                    .clone()
                    .unwrap_or_else(|| Value::default_for(&field.field_type));
                self.statics
                    .insert((name.clone(), field.name.clone()), value);
            }
        }
        debug!(
            "registered {} ({} constructors, {} fields, {} methods)",
            name,
            entry.constructors.len(),
            entry.fields.len(),
            entry.methods.len()
        );
        types.insert(name.clone(), Arc::new(entry));
        Ok(name)
    }

    /// Drops a type and its member definitions. Handles obtained earlier keep
    /// their own definitions alive; weak handles to them go dead.
    pub fn unregister(&self, name: &TypeName) -> bool {
        let removed = self.types.write().remove(name).is_some();
        if removed {
            self.statics.retain(|(owner, _), _| owner != name);
            debug!("unregistered {}", name);
        }
        removed
    }

    pub fn type_names(&self) -> Vec<TypeName> {
        let mut names: Vec<_> = self.types.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub(crate) fn entry(&self, name: &TypeName) -> Result<Arc<TypeEntry>, HostError> {
        self.types
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| HostError::TypeNotFound(name.to_string()))
    }

    pub(crate) fn static_value(&self, owner: &TypeName, name: &str) -> Option<Value> {
        self.statics
            .get(&(owner.clone(), name.to_string()))
            .map(|v| v.clone())
    }

    pub(crate) fn set_static_value(&self, owner: &TypeName, name: &str, value: Value) {
        self.statics.insert((owner.clone(), name.to_string()), value);
    }

    /// Whether a value of type `from` may be stored where `to` is declared,
    /// as the native invocation boundary checks it.
    pub fn is_assignable(&self, from: &TypeDescriptor, to: &TypeDescriptor) -> bool {
        if from == to {
            return true;
        }
        match (from, to) {
            (TypeDescriptor::Primitive(_), _) | (_, TypeDescriptor::Primitive(_)) => false,
            (TypeDescriptor::Array(a), TypeDescriptor::Array(b)) => {
                if a.is_primitive() || b.is_primitive() {
                    a == b
                } else {
                    self.is_assignable(a, b)
                }
            }
            (TypeDescriptor::Array(_), TypeDescriptor::Reference(name)) => {
                *name == self.root_type()
            }
            (TypeDescriptor::Reference(_), TypeDescriptor::Array(_)) => false,
            (TypeDescriptor::Reference(a), TypeDescriptor::Reference(b)) => {
                *b == self.root_type() || self.is_subtype(a, b)
            }
        }
    }

    fn is_subtype(&self, sub: &TypeName, sup: &TypeName) -> bool {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([sub.clone()]);
        while let Some(current) = queue.pop_front() {
            if current == *sup {
                return true;
            }
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Ok(entry) = self.entry(&current) {
                queue.extend(entry.superclass.iter().cloned());
                queue.extend(entry.interfaces.iter().cloned());
            }
        }
        false
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HostReflection for TypeRegistry {
    fn boxing(&self) -> &BoxingTable {
        &self.boxing
    }

    fn contains_type(&self, name: &TypeName) -> bool {
        self.types.read().contains_key(name)
    }

    fn superclass(&self, name: &TypeName) -> Result<Option<TypeName>, HostError> {
        Ok(self.entry(name)?.superclass.clone())
    }

    fn interfaces(&self, name: &TypeName) -> Result<Vec<TypeName>, HostError> {
        Ok(self.entry(name)?.interfaces.clone())
    }

    fn is_interface(&self, name: &TypeName) -> Result<bool, HostError> {
        Ok(self.entry(name)?.is_interface)
    }

    fn declared_constructors(
        &self,
        owner: &TypeName,
    ) -> Result<Vec<ConstructorDescription>, HostError> {
        let entry = self.entry(owner)?;
        Ok(entry
            .constructors
            .iter()
            .enumerate()
            .map(|(index, (constructor, _))| ConstructorDescription {
                parent: owner.clone(),
                index,
                constructor: constructor.clone(),
            })
            .collect())
    }

    fn declared_fields(&self, owner: &TypeName) -> Result<Vec<FieldDescription>, HostError> {
        let entry = self.entry(owner)?;
        Ok(entry
            .fields
            .iter()
            .enumerate()
            .map(|(index, (field, _))| FieldDescription {
                parent: owner.clone(),
                index,
                field: field.clone(),
            })
            .collect())
    }

    fn declared_methods(&self, owner: &TypeName) -> Result<Vec<MethodDescription>, HostError> {
        let entry = self.entry(owner)?;
        Ok(entry
            .methods
            .iter()
            .enumerate()
            .map(|(index, (method, _))| MethodDescription {
                parent: owner.clone(),
                index,
                method: method.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reflect_types::PrimitiveKind;

    fn int() -> TypeDescriptor {
        TypeDescriptor::Primitive(PrimitiveKind::Int)
    }

    fn registry() -> TypeRegistry {
        let registry = TypeRegistry::new();
        registry
            .register(TypeBuilder::interface("Organism"))
            .unwrap();
        registry
            .register(TypeBuilder::class("Animal").field("name", TypeDescriptor::string()))
            .unwrap();
        registry
            .register(
                TypeBuilder::class("Rabbit")
                    .extends("Animal")
                    .implements("Organism")
                    .field("name", TypeDescriptor::string())
                    .private_field("age", int()),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_standard_types() {
        let registry = TypeRegistry::new();
        let integer = TypeName::new("java.lang.Integer");
        assert_eq!(
            registry.superclass(&integer).unwrap(),
            Some(TypeName::new(well_known::NUMBER))
        );
        assert_eq!(
            registry
                .superclass(&TypeName::new("java.lang.Boolean"))
                .unwrap(),
            Some(TypeName::new(well_known::OBJECT))
        );
        assert_eq!(
            registry
                .superclass(&TypeName::new(well_known::OBJECT))
                .unwrap(),
            None
        );
        assert!(registry
            .is_interface(&TypeName::new(well_known::CHAR_SEQUENCE))
            .unwrap());
    }

    #[test]
    fn test_duplicate_registration() {
        let registry = registry();
        assert_eq!(
            registry.register(TypeBuilder::class("Animal")),
            Err(HostError::DuplicateType("Animal".into()))
        );
    }

    #[test]
    fn test_variadic_requires_trailing_array() {
        let registry = TypeRegistry::new();
        let result = registry.register(
            TypeBuilder::class("Bad").varargs_constructor([int()], |_, _| Ok(())),
        );
        assert!(matches!(result, Err(HostError::InvalidMember(_))));
    }

    #[test]
    fn test_assignability() {
        let registry = registry();
        let rabbit = TypeDescriptor::reference("Rabbit");
        let animal = TypeDescriptor::reference("Animal");
        let organism = TypeDescriptor::reference("Organism");

        assert!(registry.is_assignable(&rabbit, &animal));
        assert!(registry.is_assignable(&rabbit, &organism));
        assert!(!registry.is_assignable(&animal, &organism));
        assert!(registry.is_assignable(&rabbit.clone().array_of(), &animal.clone().array_of()));
        assert!(registry.is_assignable(&int().array_of(), &TypeDescriptor::object()));
        assert!(!registry.is_assignable(
            &int().array_of(),
            &TypeDescriptor::reference("java.lang.Integer").array_of()
        ));
    }

    #[test]
    fn test_field_lookups() {
        let registry = registry();
        let rabbit = TypeName::new("Rabbit");

        let declared = registry.declared_field(&rabbit, "age").unwrap().unwrap();
        assert!(!declared.field.public);
        assert!(registry.public_field(&rabbit, "age").unwrap().is_none());

        let name = registry.public_field(&rabbit, "name").unwrap().unwrap();
        assert_eq!(name.parent, rabbit);
    }

    #[test]
    fn test_unregister_releases_definitions() {
        let registry = registry();
        let rabbit = TypeName::new("Rabbit");
        let field = registry.declared_field(&rabbit, "name").unwrap().unwrap();
        let weak = Arc::downgrade(&field.field);
        drop(field);

        assert!(registry.unregister(&rabbit));
        assert!(weak.upgrade().is_none());
        assert!(matches!(
            registry.declared_fields(&rabbit),
            Err(HostError::TypeNotFound(_))
        ));
    }
}
