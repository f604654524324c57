//! Distances between a passed parameter list and a declared one.
//!
//! A variadic member declares its last parameter as an array. Callers may
//! pass that array explicitly, pass its elements flattened, or pass nothing
//! for it:
//!
//! ```text
//! declared:        String, boolean, int...
//! explicit array:  ""    , true   , int[]
//! flattened:       ""    , true   , 1, 2
//! no vararg:       ""    , true
//! ```
use crate::compat::{weights, Distance, TypeCompatibility};
use reflect_types::{error::HostError, HostReflection, TypeDescriptor};

impl<H: HostReflection + ?Sized> TypeCompatibility<'_, H> {
    pub fn parameters_distance(
        &self,
        passed: &[Option<TypeDescriptor>],
        declared: &[TypeDescriptor],
        variadic: bool,
    ) -> Result<Distance, HostError> {
        let variadic = variadic && declared.last().is_some_and(TypeDescriptor::is_array);
        let arity_ok = if variadic {
            passed.len() + 1 >= declared.len()
        } else {
            passed.len() == declared.len()
        };
        if !arity_ok {
            return Ok(Distance::Mismatch);
        }

        if passed.len() == declared.len() {
            let total = self.pairwise(passed, declared)?;
            if total.is_matched() || !variadic {
                return Ok(total);
            }
        }

        let vararg_index = declared.len() - 1;
        let mut total = self.pairwise(&passed[..vararg_index], &declared[..vararg_index])?;
        if total.is_mismatch() {
            return Ok(Distance::Mismatch);
        }

        if passed.len() == vararg_index {
            return Ok(total + weights::NO_VARARG_PASSED);
        }

        let element = match declared[vararg_index].component() {
            Some(element) => element,
            None => return Ok(Distance::Mismatch),
        };
        for p in &passed[vararg_index..] {
            let d = self.distance(p.as_ref(), element, true)?;
            if d.is_mismatch() {
                return Ok(Distance::Mismatch);
            }
            total = total + d + weights::VARARG_ELEMENT;
        }
        Ok(total)
    }

    fn pairwise(
        &self,
        passed: &[Option<TypeDescriptor>],
        declared: &[TypeDescriptor],
    ) -> Result<Distance, HostError> {
        let mut total = Distance::ZERO;
        for (p, d) in passed.iter().zip(declared) {
            total = total + self.distance(p.as_ref(), d, true)?;
            if total.is_mismatch() {
                break;
            }
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use crate::compat::{weights, Distance, TypeCompatibility};
    use reflect_host::TypeRegistry;
    use reflect_types::{PrimitiveKind, TypeDescriptor};

    fn int() -> TypeDescriptor {
        TypeDescriptor::Primitive(PrimitiveKind::Int)
    }

    fn boolean() -> TypeDescriptor {
        TypeDescriptor::Primitive(PrimitiveKind::Boolean)
    }

    fn declared() -> Vec<TypeDescriptor> {
        vec![TypeDescriptor::string(), boolean(), int().array_of()]
    }

    #[test]
    fn test_non_variadic_requires_exact_arity() {
        let registry = TypeRegistry::new();
        let compat = TypeCompatibility::new(&registry);
        let declared = [int(), int()];
        assert_eq!(
            compat
                .parameters_distance(&[Some(int())], &declared, false)
                .unwrap(),
            Distance::Mismatch
        );
        assert_eq!(
            compat
                .parameters_distance(&[Some(int()), Some(int())], &declared, false)
                .unwrap(),
            Distance::ZERO
        );
        assert_eq!(
            compat.parameters_distance(&[], &[], false).unwrap(),
            Distance::ZERO
        );
    }

    #[test]
    fn test_mismatch_cannot_be_outweighed() {
        let registry = TypeRegistry::new();
        let compat = TypeCompatibility::new(&registry);
        let passed = [Some(int()), Some(TypeDescriptor::string())];
        assert_eq!(
            compat
                .parameters_distance(&passed, &[int(), int()], false)
                .unwrap(),
            Distance::Mismatch
        );
    }

    #[test]
    fn test_variadic_shapes() {
        let registry = TypeRegistry::new();
        let compat = TypeCompatibility::new(&registry);
        let string = Some(TypeDescriptor::string());
        let t = Some(boolean());

        let explicit = compat
            .parameters_distance(&[string.clone(), t.clone(), Some(int().array_of())], &declared(), true)
            .unwrap();
        assert_eq!(explicit, Distance::ZERO);

        let none = compat
            .parameters_distance(&[string.clone(), t.clone()], &declared(), true)
            .unwrap();
        assert_eq!(none, Distance::Matched(weights::NO_VARARG_PASSED));

        let one = compat
            .parameters_distance(&[string.clone(), t.clone(), Some(int())], &declared(), true)
            .unwrap();
        assert_eq!(one, Distance::Matched(weights::VARARG_ELEMENT));

        let flattened = compat
            .parameters_distance(
                &[string.clone(), t.clone(), Some(int()), Some(TypeDescriptor::reference("java.lang.Integer"))],
                &declared(),
                true,
            )
            .unwrap();
        assert_eq!(
            flattened,
            Distance::Matched(2 * weights::VARARG_ELEMENT + weights::PRIMITIVE_KIND_MATCHED)
        );

        let too_few = compat
            .parameters_distance(&[string], &declared(), true)
            .unwrap();
        assert_eq!(too_few, Distance::Mismatch);
    }

    #[test]
    fn test_variadic_element_mismatch() {
        let registry = TypeRegistry::new();
        let compat = TypeCompatibility::new(&registry);
        let passed = [
            Some(TypeDescriptor::string()),
            Some(boolean()),
            Some(int()),
            Some(TypeDescriptor::string()),
        ];
        assert_eq!(
            compat.parameters_distance(&passed, &declared(), true).unwrap(),
            Distance::Mismatch
        );
    }

    #[test]
    fn test_null_for_vararg_array() {
        let registry = TypeRegistry::new();
        let compat = TypeCompatibility::new(&registry);
        // A lone null fills the array parameter itself.
        let d = compat
            .parameters_distance(&[None], &[TypeDescriptor::string().array_of()], true)
            .unwrap();
        assert_eq!(d, Distance::Matched(weights::ANY_MATCHED));
    }
}
