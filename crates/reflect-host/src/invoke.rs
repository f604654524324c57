use crate::TypeRegistry;
use reflect_types::{
    members::{ConstructorDescription, FieldDescription, MemberInfo, MethodDescription},
    PrimitiveKind, TypeDescriptor,
};
use reflect_value::{convert, error::InvocationError, Argument, HostInvoker, ObjectRef, Value};
use std::sync::Arc;
use tracing::trace;

impl TypeRegistry {
    /// Checks one argument against a declared parameter type, applying the
    /// numeric and boxing coercions the host performs natively.
    pub fn check_argument(
        &self,
        parameter: &TypeDescriptor,
        value: &Value,
    ) -> Result<Value, InvocationError> {
        let illegal = || {
            InvocationError::IllegalArgument(format!(
                "{} cannot be passed as {}",
                value, parameter
            ))
        };

        if let Some(kind) = parameter.as_primitive() {
            return match value {
                Value::Primitive(p) => p.cast(kind).map(Value::Primitive).map_err(|_| illegal()),
                _ => Err(illegal()),
            };
        }

        if let Value::Null = value {
            return Ok(Value::Null);
        }

        if let Some(kind) = self.boxing.unboxed_primitive(parameter) {
            if let Value::Primitive(p) = value {
                return p.cast(kind).map(Value::Primitive).map_err(|_| illegal());
            }
        }

        match value.runtime_type().map(|ty| self.boxing.boxed(&ty)) {
            Some(ty) if self.is_assignable(&ty, parameter) => Ok(value.clone()),
            _ => Err(illegal()),
        }
    }

    fn check_arguments(
        &self,
        parameters: &[TypeDescriptor],
        args: &[Argument],
    ) -> Result<Vec<Value>, InvocationError> {
        if parameters.len() != args.len() {
            return Err(InvocationError::IllegalArgument(format!(
                "wrong number of arguments: expected {}, got {}",
                parameters.len(),
                args.len()
            )));
        }
        parameters
            .iter()
            .zip(args)
            .map(|(p, a)| self.check_argument(p, &a.value))
            .collect()
    }

    fn receiver_object(
        &self,
        member: &impl MemberInfo,
        receiver: Option<&Value>,
    ) -> Result<ObjectRef, InvocationError> {
        let object = match receiver {
            Some(Value::Object(o)) => o.clone(),
            _ => return Err(InvocationError::NullReceiver(member_name(member))),
        };
        let owner = TypeDescriptor::Reference(member.parent().clone());
        let actual = TypeDescriptor::Reference(object.type_name().clone());
        if self.is_assignable(&actual, &owner) {
            Ok(object)
        } else {
            Err(InvocationError::IllegalArgument(format!(
                "{} is not an instance of {}",
                object,
                member.parent()
            )))
        }
    }
}

fn member_name(member: &impl MemberInfo) -> String {
    format!("{}.{}", member.parent(), member.name())
}

impl HostInvoker for TypeRegistry {
    fn construct(
        &self,
        constructor: &ConstructorDescription,
        args: &[Argument],
    ) -> Result<Value, InvocationError> {
        let entry = self.entry(&constructor.parent)?;
        if entry.is_interface {
            return Err(InvocationError::IllegalArgument(format!(
                "cannot instantiate interface {}",
                entry.name
            )));
        }
        let body = entry
            .constructors
            .iter()
            .find(|(d, _)| Arc::ptr_eq(d, &constructor.constructor))
            .and_then(|(_, body)| body.clone())
            .ok_or_else(|| InvocationError::MissingBody(member_name(constructor)))?;

        let values = self.check_arguments(&constructor.constructor.parameters, args)?;
        trace!("constructing {} with {} arguments", constructor.parent, values.len());
        let object = ObjectRef::new(constructor.parent.clone());
        body(&object, &values)?;
        Ok(Value::Object(object))
    }

    fn get_field(
        &self,
        field: &FieldDescription,
        receiver: Option<&Value>,
    ) -> Result<Value, InvocationError> {
        let default = || Value::default_for(&field.field.field_type);
        if field.field.is_static {
            self.entry(&field.parent)?;
            return Ok(self
                .static_value(&field.parent, &field.field.name)
                .unwrap_or_else(default));
        }
        let object = self.receiver_object(field, receiver)?;
        Ok(object
            .get(&field.parent, &field.field.name)
            .unwrap_or_else(default))
    }

    fn set_field(
        &self,
        field: &FieldDescription,
        receiver: Option<&Value>,
        value: Value,
    ) -> Result<(), InvocationError> {
        let value = self.check_argument(&field.field.field_type, &value)?;
        if field.field.is_static {
            self.entry(&field.parent)?;
            self.set_static_value(&field.parent, &field.field.name, value);
            return Ok(());
        }
        let object = self.receiver_object(field, receiver)?;
        object.set(&field.parent, &field.field.name, value);
        Ok(())
    }

    fn invoke(
        &self,
        method: &MethodDescription,
        receiver: Option<&Value>,
        args: &[Argument],
    ) -> Result<Value, InvocationError> {
        let entry = self.entry(&method.parent)?;
        let body = entry
            .methods
            .iter()
            .find(|(d, _)| Arc::ptr_eq(d, &method.method))
            .and_then(|(_, body)| body.clone())
            .ok_or_else(|| InvocationError::MissingBody(member_name(method)))?;

        let this = if method.method.is_static {
            None
        } else {
            Some(Value::Object(self.receiver_object(method, receiver)?))
        };
        let values = self.check_arguments(&method.method.parameters, args)?;
        trace!("invoking {} with {} arguments", member_name(method), values.len());
        let result = body(this.as_ref(), &values)?;
        if method.method.return_type.as_primitive() == Some(PrimitiveKind::Void) {
            return Ok(Value::Null);
        }
        Ok(match method.method.return_type.as_primitive() {
            Some(kind) => convert::cast_value(&result, kind)
                .map_err(|e| InvocationError::Target(e.to_string()))?,
            None => result,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{TypeBuilder, TypeRegistry};
    use reflect_types::{HostReflection, PrimitiveKind, TypeDescriptor, TypeName};
    use reflect_value::{
        error::InvocationError, ArrayValue, Argument, HostInvoker, PrimitiveValue, Value,
    };

    fn int() -> TypeDescriptor {
        TypeDescriptor::Primitive(PrimitiveKind::Int)
    }

    fn counter() -> TypeRegistry {
        let registry = TypeRegistry::new();
        registry
            .register(
                TypeBuilder::class("Counter")
                    .field("count", int())
                    .static_field("instances", int(), Value::from(0))
                    .constructor([int()], |this, args| {
                        this.set(&TypeName::new("Counter"), "count", args[0].clone());
                        Ok(())
                    })
                    .method("add", [TypeDescriptor::reference("java.lang.Long")], int(), |this, args| {
                        let this = this.and_then(Value::as_object).ok_or_else(|| {
                            InvocationError::Target("missing receiver".into())
                        })?;
                        let current = this
                            .get(&TypeName::new("Counter"), "count")
                            .and_then(|v| v.as_primitive())
                            .unwrap_or(PrimitiveValue::Int(0));
                        match (current, args[0].as_primitive()) {
                            (PrimitiveValue::Int(c), Some(PrimitiveValue::Long(n))) => {
                                Ok(Value::from(c as i64 + n))
                            }
                            _ => Err(InvocationError::Target("bad state".into())),
                        }
                    })
                    .method("sum", [int().array_of()], int(), |_, args| {
                        let total = args[0]
                            .as_array()
                            .map(|a| {
                                a.items
                                    .iter()
                                    .filter_map(|v| match v.as_primitive() {
                                        Some(PrimitiveValue::Int(i)) => Some(i),
                                        _ => None,
                                    })
                                    .sum::<i32>()
                            })
                            .unwrap_or(0);
                        Ok(Value::from(total))
                    }),
            )
            .unwrap();
        registry
    }

    fn constructor(registry: &TypeRegistry) -> reflect_types::members::ConstructorDescription {
        registry
            .declared_constructors(&TypeName::new("Counter"))
            .unwrap()
            .remove(0)
    }

    #[test]
    fn test_construct_coerces_numeric_arguments() {
        let registry = counter();
        let object = registry
            .construct(&constructor(&registry), &[Argument::new(5i64)])
            .unwrap();
        let field = registry
            .declared_field(&TypeName::new("Counter"), "count")
            .unwrap()
            .unwrap();
        assert_eq!(
            registry.get_field(&field, Some(&object)).unwrap(),
            Value::from(5)
        );
    }

    #[test]
    fn test_construct_rejects_bad_arguments() {
        let registry = counter();
        let ctor = constructor(&registry);
        assert!(matches!(
            registry.construct(&ctor, &[Argument::null()]),
            Err(InvocationError::IllegalArgument(_))
        ));
        assert!(matches!(
            registry.construct(&ctor, &[Argument::new("5")]),
            Err(InvocationError::IllegalArgument(_))
        ));
        assert!(matches!(
            registry.construct(&ctor, &[]),
            Err(InvocationError::IllegalArgument(_))
        ));
    }

    #[test]
    fn test_invoke_boxes_into_wrapper_parameter() {
        let registry = counter();
        let object = registry
            .construct(&constructor(&registry), &[Argument::new(2)])
            .unwrap();
        let add = registry
            .declared_method(
                &TypeName::new("Counter"),
                "add",
                &[TypeDescriptor::reference("java.lang.Long")],
            )
            .unwrap()
            .unwrap();
        let result = registry
            .invoke(&add, Some(&object), &[Argument::new(3)])
            .unwrap();
        assert_eq!(result, Value::from(5));
    }

    #[test]
    fn test_invoke_requires_receiver() {
        let registry = counter();
        let add = registry
            .declared_methods(&TypeName::new("Counter"))
            .unwrap()
            .remove(0);
        assert!(matches!(
            registry.invoke(&add, None, &[Argument::new(1i64)]),
            Err(InvocationError::NullReceiver(_))
        ));
    }

    #[test]
    fn test_primitive_arrays_must_match_exactly() {
        let registry = counter();
        let object = registry
            .construct(&constructor(&registry), &[Argument::new(0)])
            .unwrap();
        let sum = registry
            .declared_method(&TypeName::new("Counter"), "sum", &[int().array_of()])
            .unwrap()
            .unwrap();

        let ints = Value::array(ArrayValue::of_primitives(
            PrimitiveKind::Int,
            [PrimitiveValue::Int(1), PrimitiveValue::Int(2)],
        ));
        assert_eq!(
            registry
                .invoke(&sum, Some(&object), &[Argument::new(ints)])
                .unwrap(),
            Value::from(3)
        );

        let longs = Value::array(ArrayValue::of_primitives(
            PrimitiveKind::Long,
            [PrimitiveValue::Long(1)],
        ));
        assert!(matches!(
            registry.invoke(&sum, Some(&object), &[Argument::new(longs)]),
            Err(InvocationError::IllegalArgument(_))
        ));
    }

    #[test]
    fn test_static_fields() {
        let registry = counter();
        let field = registry
            .declared_field(&TypeName::new("Counter"), "instances")
            .unwrap()
            .unwrap();
        assert_eq!(registry.get_field(&field, None).unwrap(), Value::from(0));
        registry.set_field(&field, None, Value::from(4i8)).unwrap();
        assert_eq!(registry.get_field(&field, None).unwrap(), Value::from(4));
    }
}
