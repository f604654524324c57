#![allow(dead_code)]
use reflect_host::{TypeBuilder, TypeRegistry};
use reflect_types::{
    members::{ConstructorDescription, FieldDescription, MethodDescription},
    HostReflection, PrimitiveKind, TypeDescriptor, TypeName,
};
use reflect_value::{ArrayValue, InvocationError, ObjectRef, PrimitiveValue, Value};

pub const BOOLEAN: usize = 0;
pub const INT: usize = 1;
pub const INT_INT: usize = 2;
pub const INT_OBJ_INT: usize = 3;
pub const INT_OBJ_VARARG_INT: usize = 4;
pub const INT_OBJ_VARARG_ANIMAL: usize = 5;
pub const STRING: usize = 6;
pub const STRING_VARARG_ANIMAL: usize = 7;
pub const STRING_VARARG_CAT: usize = 8;
pub const ANIMAL: usize = 9;
pub const ORGANISM: usize = 10;
pub const CAT: usize = 11;
pub const DOG: usize = 12;

pub fn prim(kind: PrimitiveKind) -> TypeDescriptor {
    kind.into()
}

pub fn int() -> TypeDescriptor {
    prim(PrimitiveKind::Int)
}

pub fn long() -> TypeDescriptor {
    prim(PrimitiveKind::Long)
}

pub fn reference(name: &str) -> TypeDescriptor {
    TypeDescriptor::reference(name)
}

pub fn array(component: TypeDescriptor) -> TypeDescriptor {
    TypeDescriptor::array_of(component)
}

pub fn boxed_int() -> TypeDescriptor {
    reference("java.lang.Integer")
}

/// Stores which constructor ran and the arguments it received.
fn record(label: &'static str) -> impl Fn(&ObjectRef, &[Value]) -> Result<(), InvocationError> + Send + Sync + 'static {
    move |this: &ObjectRef, values: &[Value]| {
        let zoo = TypeName::new("Zoo");
        this.set(&zoo, "data", Value::string(label));
        this.set(
            &zoo,
            "args",
            Value::array(ArrayValue::new(TypeDescriptor::object(), values.to_vec())),
        );
        Ok(())
    }
}

fn int_at(values: &[Value], index: usize) -> Result<i64, InvocationError> {
    match values.get(index).and_then(Value::as_primitive) {
        Some(PrimitiveValue::Int(v)) => Ok(v as i64),
        Some(PrimitiveValue::Long(v)) => Ok(v),
        other => Err(InvocationError::Target(format!("not an integer: {:?}", other))),
    }
}

fn zoo() -> TypeBuilder {
    let animal = reference("Animal");
    TypeBuilder::class("Zoo")
        .field("data", TypeDescriptor::object())
        .field("args", array(TypeDescriptor::object()))
        .constructor([prim(PrimitiveKind::Boolean)], record("open"))
        .constructor([int()], record("id"))
        .constructor([int(), int()], record("id, id2"))
        .constructor([boxed_int(), int()], record("idObj, id2"))
        .varargs_constructor([boxed_int(), array(int())], record("idObj, extra"))
        .varargs_constructor([boxed_int(), array(animal.clone())], record("idObj, animals"))
        .constructor([TypeDescriptor::string()], record("name"))
        .varargs_constructor([TypeDescriptor::string(), array(animal.clone())], record("name, animals"))
        .varargs_constructor(
            [TypeDescriptor::string(), array(reference("Cat"))],
            record("name, cats"),
        )
        .constructor([animal], record("Animal"))
        .constructor([reference("Organism")], record("Organism"))
        .constructor([reference("Cat")], record("Cat"))
        .constructor([reference("Dog")], record("Dog"))
}

fn fields_parent() -> TypeBuilder {
    TypeBuilder::class("FieldsParent")
        .field("baseBooleanField", prim(PrimitiveKind::Boolean))
        .field("baseBooleanObjectField", reference("java.lang.Boolean"))
        .field("baseStringField", TypeDescriptor::string())
        .field("shadowedField", boxed_int())
}

fn fields_container() -> TypeBuilder {
    TypeBuilder::class("FieldsContainer")
        .extends("FieldsParent")
        .constructor([], |_, _| Ok(()))
        .field("intField", int())
        .field("booleanField", prim(PrimitiveKind::Boolean))
        .field("interfaceLowField", reference("Organism"))
        .field("interfaceField", reference("Animal"))
        .field("shadowedField", reference("java.lang.Number"))
        .static_field("created", int(), Value::from(0))
}

fn base_calculator() -> TypeBuilder {
    TypeBuilder::class("BaseCalculator")
        .method("scale", [boxed_int()], int(), |_, _| Ok(Value::from(1)))
        .method(
            "add",
            [TypeDescriptor::string(), TypeDescriptor::string()],
            TypeDescriptor::string(),
            |_, _| Ok(Value::string("joined")),
        )
        .method("reset", [], prim(PrimitiveKind::Void), |_, _| Ok(Value::Null))
}

fn calculator() -> TypeBuilder {
    TypeBuilder::class("Calculator")
        .extends("BaseCalculator")
        .constructor([], |_, _| Ok(()))
        .field("total", long())
        .method("add", [int(), int()], int(), |_, values| {
            Ok(Value::from((int_at(values, 0)? + int_at(values, 1)?) as i32))
        })
        .method("add", [long(), long()], long(), |_, values| {
            Ok(Value::from(int_at(values, 0)? + int_at(values, 1)?))
        })
        .method(
            "add",
            [prim(PrimitiveKind::Double), prim(PrimitiveKind::Double)],
            prim(PrimitiveKind::Double),
            |_, _| Ok(Value::from(0.0f64)),
        )
        .varargs_method("sum", [array(int())], long(), |_, values| {
            let items = values
                .first()
                .and_then(Value::as_array)
                .map(|a| a.items.clone())
                .unwrap_or_default();
            let mut total = 0;
            for i in 0..items.len() {
                total += int_at(&items, i)?;
            }
            Ok(Value::from(total))
        })
        .method("scale", [long()], long(), |_, _| Ok(Value::from(2i64)))
        .method("name", [], TypeDescriptor::string(), |_, _| Ok(Value::string("calc")))
        .method("size", [], int(), |_, _| Ok(Value::from(3)))
        .method("label", [], reference("java.lang.CharSequence"), |_, _| {
            Ok(Value::string("label"))
        })
        .static_method("instances", [], int(), |_, _| Ok(Value::from(42)))
}

/// A registry with the organism hierarchy, the zoo, field containers and
/// calculators.
pub fn registry() -> TypeRegistry {
    let registry = TypeRegistry::new();
    let builders = [
        TypeBuilder::interface("Organism"),
        TypeBuilder::class("Animal"),
        TypeBuilder::class("Cat")
            .extends("Animal")
            .implements("Organism")
            .constructor([], |_, _| Ok(())),
        TypeBuilder::class("Dog")
            .extends("Animal")
            .implements("Organism")
            .constructor([], |_, _| Ok(())),
        TypeBuilder::class("Rabbit")
            .extends("Animal")
            .implements("Organism")
            .constructor([], |_, _| Ok(())),
        TypeBuilder::class("Grass")
            .implements("Organism")
            .constructor([], |_, _| Ok(())),
        zoo(),
        fields_parent(),
        fields_container(),
        base_calculator(),
        calculator(),
    ];
    for builder in builders {
        registry.register(builder).unwrap();
    }
    registry
}

pub fn zoo_constructor(registry: &TypeRegistry, index: usize) -> ConstructorDescription {
    registry.declared_constructors(&"Zoo".into()).unwrap().remove(index)
}

pub fn declared_field(registry: &TypeRegistry, owner: &str, name: &str) -> FieldDescription {
    registry.declared_field(&owner.into(), name).unwrap().unwrap()
}

pub fn declared_method(
    registry: &TypeRegistry,
    owner: &str,
    name: &str,
    parameters: &[TypeDescriptor],
) -> MethodDescription {
    registry
        .declared_method(&owner.into(), name, parameters)
        .unwrap()
        .unwrap()
}
