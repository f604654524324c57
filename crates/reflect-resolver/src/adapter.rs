//! Reshapes caller arguments into the layout a resolved member is invoked
//! with. Only variadic members are affected: their trailing arguments are
//! packed into a single array of the declared element type.
use crate::{compat::TypeCompatibility, error::ReflectError};
use reflect_types::{boxing::BoxingTable, members::MemberInfo, HostReflection, TypeDescriptor};
use reflect_value::{convert, Argument, ArrayValue, ConversionError, Value};
use std::sync::Arc;
use tracing::trace;

pub struct InvocationAdapter<'a, H: HostReflection + ?Sized> {
    compat: TypeCompatibility<'a, H>,
}

impl<'a, H: HostReflection + ?Sized> InvocationAdapter<'a, H> {
    pub fn new(compat: TypeCompatibility<'a, H>) -> Self {
        Self { compat }
    }

    pub fn adapt(
        &self,
        member: &impl MemberInfo,
        args: Vec<Argument>,
    ) -> Result<Vec<Argument>, ReflectError> {
        self.adapt_parameters(member.parameter_types(), member.is_variadic(), args)
    }

    pub fn adapt_parameters(
        &self,
        parameters: &[TypeDescriptor],
        variadic: bool,
        args: Vec<Argument>,
    ) -> Result<Vec<Argument>, ReflectError> {
        let Some((array_type, fixed)) = parameters.split_last() else {
            return Ok(args);
        };
        let Some(element) = array_type.component().filter(|_| variadic) else {
            return Ok(args);
        };
        if args.len() < fixed.len() {
            return Ok(args);
        }

        // A lone null in the variadic position is the array itself.
        if args.len() == parameters.len()
            && args.last().is_some_and(|a| {
                a.value.is_null() || a.value.runtime_type().as_ref() == Some(array_type)
            })
        {
            return Ok(args);
        }

        let boxing = self.compat.host().boxing();
        let mut args = args;
        let tail = args.split_off(fixed.len());

        let packed = match tail.as_slice() {
            [] => ArrayValue::empty(element.clone()),
            [single] => match self.reusable_array(&single.value, element)? {
                Some(array) => {
                    trace!("converting {} for {}...", single, element);
                    convert_array(boxing, array, element)?
                }
                None => collect(boxing, &tail, element)?,
            },
            _ => collect(boxing, &tail, element)?,
        };

        args.push(Argument::typed(Value::array(packed), array_type.clone()));
        Ok(args)
    }

    /// A lone trailing array is passed through as the variadic array when its
    /// elements can be cast to the declared element type. Primitive elements
    /// only fit a primitive or wrapper element type.
    fn reusable_array<'v>(
        &self,
        value: &'v Value,
        element: &TypeDescriptor,
    ) -> Result<Option<&'v ArrayValue>, ReflectError> {
        let Some(array) = value.as_array() else {
            return Ok(None);
        };
        let boxing = self.compat.host().boxing();
        if array.element.is_primitive() && boxing.unboxed_primitive(element).is_none() {
            return Ok(None);
        }
        if self.compat.can_cast_to(Some(&array.element), element)? {
            Ok(Some(array.as_ref()))
        } else {
            Ok(None)
        }
    }
}

fn collect(
    boxing: &BoxingTable,
    tail: &[Argument],
    element: &TypeDescriptor,
) -> Result<ArrayValue, ReflectError> {
    let items = tail
        .iter()
        .enumerate()
        .map(|(index, arg)| convert_element(boxing, &arg.value, element, index))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ArrayValue::new(element.clone(), items))
}

fn convert_array(
    boxing: &BoxingTable,
    array: &ArrayValue,
    element: &TypeDescriptor,
) -> Result<ArrayValue, ReflectError> {
    let items = array
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| convert_element(boxing, item, element, index))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ArrayValue::new(element.clone(), items))
}

/// Converts one variadic element. Primitive targets unbox and cast, wrapper
/// targets cast to their primitive kind, nested arrays convert recursively
/// and other references are kept as they are.
fn convert_element(
    boxing: &BoxingTable,
    value: &Value,
    element: &TypeDescriptor,
    index: usize,
) -> Result<Value, ReflectError> {
    let unsupported = || ReflectError::UnsupportedConversion {
        expected: element.to_string(),
        passed: value.to_string(),
    };

    match element {
        TypeDescriptor::Primitive(kind) => match convert::unbox(value, *kind) {
            Ok(p) => Ok(Value::Primitive(p)),
            Err(ConversionError::NullElement { expected, .. }) => {
                Err(ReflectError::NullElementForPrimitive { index, expected })
            }
            Err(e) => Err(e.into()),
        },
        TypeDescriptor::Array(component) => match value {
            Value::Null => Ok(Value::Null),
            Value::Array(inner) => Ok(Value::Array(Arc::new(convert_array(boxing, inner, component)?))),
            _ => Err(unsupported()),
        },
        TypeDescriptor::Reference(_) => match value {
            Value::Primitive(p) => match boxing.unboxed_primitive(element) {
                Some(kind) => Ok(Value::Primitive(p.cast(kind)?)),
                None => Ok(value.clone()),
            },
            _ => Ok(value.clone()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reflect_host::TypeRegistry;
    use reflect_types::PrimitiveKind;
    use reflect_value::PrimitiveValue;

    fn int() -> TypeDescriptor {
        PrimitiveKind::Int.into()
    }

    fn boxed_int() -> TypeDescriptor {
        TypeDescriptor::reference("java.lang.Integer")
    }

    fn ints(values: &[i32]) -> Value {
        Value::array(ArrayValue::of_primitives(
            PrimitiveKind::Int,
            values.iter().map(|v| PrimitiveValue::Int(*v)),
        ))
    }

    fn adapt(
        params: &[TypeDescriptor],
        variadic: bool,
        args: Vec<Argument>,
    ) -> Result<Vec<Argument>, ReflectError> {
        let registry = TypeRegistry::new();
        InvocationAdapter::new(TypeCompatibility::new(&registry)).adapt_parameters(params, variadic, args)
    }

    fn packed(args: &[Argument]) -> &ArrayValue {
        args.last().unwrap().value.as_array().unwrap()
    }

    #[test]
    fn test_non_variadic_untouched() {
        let args = vec![Argument::new(1), Argument::new(2)];
        let adapted = adapt(&[int(), int()], false, args.clone()).unwrap();
        assert_eq!(adapted, args);
    }

    #[test]
    fn test_canonical_shape_untouched() {
        let params = [PrimitiveKind::Boolean.into(), TypeDescriptor::array_of(int())];
        let args = vec![Argument::new(true), Argument::new(ints(&[10]))];
        let adapted = adapt(&params, true, args.clone()).unwrap();
        assert_eq!(adapted, args);
    }

    #[test]
    fn test_empty_tail() {
        let params = [TypeDescriptor::array_of(TypeDescriptor::object())];
        let adapted = adapt(&params, true, vec![]).unwrap();
        assert_eq!(adapted.len(), 1);
        let array = packed(&adapted);
        assert!(array.is_empty());
        assert_eq!(array.element, TypeDescriptor::object());
    }

    #[test]
    fn test_collects_tail_with_numeric_casts() {
        let params = [TypeDescriptor::string(), TypeDescriptor::array_of(PrimitiveKind::Long.into())];
        let args = vec![
            Argument::new("prefix"),
            Argument::new(1i32),
            Argument::new(2i8),
            Argument::new(3i64),
        ];
        let adapted = adapt(&params, true, args).unwrap();

        assert_eq!(adapted.len(), 2);
        assert_eq!(adapted[0].value, Value::string("prefix"));
        assert_eq!(adapted[1].ty, Some(params[1].clone()));
        assert_eq!(
            packed(&adapted).items,
            vec![Value::from(1i64), Value::from(2i64), Value::from(3i64)]
        );
    }

    #[test]
    fn test_null_in_primitive_tail() {
        let params = [TypeDescriptor::array_of(int())];
        let err = adapt(&params, true, vec![Argument::new(1), Argument::null()]).unwrap_err();
        assert_eq!(
            err,
            ReflectError::NullElementForPrimitive {
                index: 1,
                expected: "int".to_string()
            }
        );
    }

    #[test]
    fn test_primitive_array_to_boxed() {
        let params = [TypeDescriptor::array_of(boxed_int())];
        let adapted = adapt(&params, true, vec![Argument::new(ints(&[0, 1]))]).unwrap();
        let array = packed(&adapted);
        assert_eq!(array.element, boxed_int());
        assert_eq!(array.items, vec![Value::from(0), Value::from(1)]);
    }

    #[test]
    fn test_boxed_array_to_primitive() {
        let params = [TypeDescriptor::array_of(int())];
        let boxed = Value::array(ArrayValue::new(boxed_int(), vec![Value::from(4), Value::from(5)]));
        let adapted = adapt(&params, true, vec![Argument::new(boxed)]).unwrap();
        assert_eq!(packed(&adapted).array_type(), params[0]);

        let with_null = Value::array(ArrayValue::new(boxed_int(), vec![Value::from(4), Value::Null]));
        let err = adapt(&params, true, vec![Argument::new(with_null)]).unwrap_err();
        assert!(matches!(err, ReflectError::NullElementForPrimitive { index: 1, .. }));
    }

    #[test]
    fn test_reference_array_reused_under_declared_element() {
        let params = [TypeDescriptor::array_of(TypeDescriptor::object())];
        let strings = Value::array(ArrayValue::new(
            TypeDescriptor::string(),
            vec![Value::string("a"), Value::string("b")],
        ));
        let adapted = adapt(&params, true, vec![Argument::new(strings)]).unwrap();
        let array = packed(&adapted);
        assert_eq!(array.element, TypeDescriptor::object());
        assert_eq!(array.items, vec![Value::string("a"), Value::string("b")]);
    }

    #[test]
    fn test_nested_arrays_convert_recursively() {
        let params = [TypeDescriptor::array_of(TypeDescriptor::array_of(int()))];
        let outer = Value::array(ArrayValue::new(
            TypeDescriptor::array_of(boxed_int()),
            vec![
                Value::array(ArrayValue::new(boxed_int(), vec![Value::from(7)])),
                Value::Null,
            ],
        ));
        let adapted = adapt(&params, true, vec![Argument::new(outer)]).unwrap();
        let array = packed(&adapted);
        assert_eq!(array.items[0], ints(&[7]));
        assert_eq!(array.items[1], Value::Null);
    }

    #[test]
    fn test_incompatible_array_is_wrapped_as_single_element() {
        let params = [TypeDescriptor::array_of(TypeDescriptor::object())];
        let adapted = adapt(&params, true, vec![Argument::new(ints(&[1, 2]))]).unwrap();
        assert_eq!(packed(&adapted).element, TypeDescriptor::object());
        assert_eq!(packed(&adapted).items, vec![ints(&[1, 2])]);

        let params = [TypeDescriptor::array_of(TypeDescriptor::string())];
        let adapted = adapt(&params, true, vec![Argument::new(ints(&[1, 2]))]).unwrap();
        assert_eq!(packed(&adapted).items, vec![ints(&[1, 2])]);
    }

    #[test]
    fn test_lone_null_is_the_variadic_array() {
        let params = [boxed_int(), TypeDescriptor::array_of(int())];
        let args = vec![Argument::null(), Argument::null()];
        let adapted = adapt(&params, true, args.clone()).unwrap();
        assert_eq!(adapted, args);

        let params = [TypeDescriptor::array_of(int())];
        let adapted = adapt(&params, true, vec![Argument::null()]).unwrap();
        assert_eq!(adapted[0].value, Value::Null);
    }

    #[test]
    fn test_unsupported_element() {
        let params = [TypeDescriptor::array_of(int())];
        let err = adapt(&params, true, vec![Argument::new(1), Argument::new("two")]).unwrap_err();
        assert!(matches!(err, ReflectError::UnsupportedConversion { .. }));
    }

    #[test]
    fn test_spread_and_packed_calls_agree() {
        let params = [PrimitiveKind::Boolean.into(), TypeDescriptor::array_of(int())];
        let spread = adapt(
            &params,
            true,
            vec![Argument::new(true), Argument::new(1), Argument::new(2)],
        )
        .unwrap();
        let boxed = Value::array(ArrayValue::new(boxed_int(), vec![Value::from(1), Value::from(2)]));
        let packed_call = adapt(&params, true, vec![Argument::new(true), Argument::new(boxed)]).unwrap();
        let canonical = adapt(&params, true, vec![Argument::new(true), Argument::new(ints(&[1, 2]))]).unwrap();

        assert_eq!(spread[1].value, canonical[1].value);
        assert_eq!(packed_call[1].value, canonical[1].value);
    }
}
