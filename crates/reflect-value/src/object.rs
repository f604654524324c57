use crate::Value;
use parking_lot::RwLock;
use reflect_types::TypeName;
use std::{collections::HashMap, fmt, sync::Arc};

/// Heap instance with one slot per (declaring type, field name), so a field
/// hidden by a subclass keeps its own storage.
pub struct Object {
    type_name: TypeName,
    fields: RwLock<HashMap<(TypeName, String), Value>>,
}

#[derive(Clone)]
pub struct ObjectRef(Arc<Object>);

impl ObjectRef {
    pub fn new(type_name: TypeName) -> Self {
        Self(Arc::new(Object {
            type_name,
            fields: RwLock::new(HashMap::new()),
        }))
    }

    pub fn type_name(&self) -> &TypeName {
        &self.0.type_name
    }

    /// Unset slots read as `None`; the host decides their default.
    pub fn get(&self, owner: &TypeName, name: &str) -> Option<Value> {
        self.0
            .fields
            .read()
            .get(&(owner.clone(), name.to_string()))
            .cloned()
    }

    pub fn set(&self, owner: &TypeName, name: &str, value: Value) {
        self.0
            .fields
            .write()
            .insert((owner.clone(), name.to_string()), value);
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:p}", self.0.type_name.simple_name(), Arc::as_ptr(&self.0))
    }
}
