//! Type compatibility distances.
//!
//! A [`Distance`] scores how well a passed type fits a declared one; lower is
//! better and [`Distance::Mismatch`] means the type cannot be passed at all.
//! Rules are applied in order:
//!
//! 1. An absent type fits any reference type and no primitive.
//! 2. Identical types are at distance zero.
//! 3. Two array types compare their components.
//! 4. A primitive and its wrapper are [`weights::PRIMITIVE_KIND_MATCHED`] apart.
//! 5. Two numeric kinds, after unwrapping, are [`weights::NUMBER_MATCHED`] apart.
//! 6. A subtype is [`weights::KIND_MATCHED`] from its supertype, or when depth
//!    counts, the cost of walking its superclass chain up to the supertype.
//! 7. Anything else is a mismatch.
use crate::metrics::ResolverMetrics;
use dashmap::DashMap;
use reflect_types::{error::HostError, HostReflection, TypeDescriptor, TypeName};
use std::{
    collections::{HashSet, VecDeque},
    fmt,
    iter::Sum,
    ops::Add,
};
use tracing::trace;

pub mod weights {
    pub const MIN: u32 = 0;
    pub const ANY_MATCHED: u32 = 30;
    pub const KIND_MATCHED: u32 = 10;
    pub const NUMBER_MATCHED: u32 = 18;
    pub const PRIMITIVE_KIND_MATCHED: u32 = 7;
    pub const SUPERCLASS_STEP: u32 = 10;
    pub const INTERFACE_MATCHED: u32 = 12;
    pub const REACHED_TOP: u32 = 15;
    pub const NO_VARARG_PASSED: u32 = 3;
    pub const VARARG_ELEMENT: u32 = 1;
}

/// Orders every matched distance before [`Distance::Mismatch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Distance {
    Matched(u32),
    Mismatch,
}

impl Distance {
    pub const ZERO: Distance = Distance::Matched(weights::MIN);

    pub fn is_matched(self) -> bool {
        matches!(self, Distance::Matched(_))
    }

    pub fn is_mismatch(self) -> bool {
        matches!(self, Distance::Mismatch)
    }

    pub fn value(self) -> Option<u32> {
        match self {
            Distance::Matched(d) => Some(d),
            Distance::Mismatch => None,
        }
    }
}

impl Add for Distance {
    type Output = Distance;

    fn add(self, rhs: Distance) -> Distance {
        match (self, rhs) {
            (Distance::Matched(a), Distance::Matched(b)) => Distance::Matched(a.saturating_add(b)),
            _ => Distance::Mismatch,
        }
    }
}

impl Add<u32> for Distance {
    type Output = Distance;

    fn add(self, rhs: u32) -> Distance {
        self + Distance::Matched(rhs)
    }
}

impl Sum for Distance {
    fn sum<I: Iterator<Item = Distance>>(iter: I) -> Distance {
        iter.fold(Distance::ZERO, Add::add)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Matched(d) => write!(f, "{}", d),
            Distance::Mismatch => f.write_str("mismatch"),
        }
    }
}

pub type HierarchyCache = DashMap<(TypeName, TypeName), bool>;

/// Compatibility queries against a host's type hierarchy.
pub struct TypeCompatibility<'a, H: HostReflection + ?Sized> {
    host: &'a H,
    hierarchy: Option<&'a HierarchyCache>,
    metrics: Option<&'a ResolverMetrics>,
}

impl<'a, H: HostReflection + ?Sized> TypeCompatibility<'a, H> {
    pub fn new(host: &'a H) -> Self {
        Self {
            host,
            hierarchy: None,
            metrics: None,
        }
    }

    pub fn with_cache(
        host: &'a H,
        hierarchy: &'a HierarchyCache,
        metrics: Option<&'a ResolverMetrics>,
    ) -> Self {
        Self {
            host,
            hierarchy: Some(hierarchy),
            metrics,
        }
    }

    pub fn host(&self) -> &'a H {
        self.host
    }

    pub fn distance(
        &self,
        passed: Option<&TypeDescriptor>,
        declared: &TypeDescriptor,
        consider_depth: bool,
    ) -> Result<Distance, HostError> {
        let passed = match passed {
            Some(p) => p,
            None if declared.is_reference() => return Ok(Distance::Matched(weights::ANY_MATCHED)),
            None => return Ok(Distance::Mismatch),
        };

        if passed == declared {
            return Ok(Distance::ZERO);
        }

        if let (TypeDescriptor::Array(p), TypeDescriptor::Array(d)) = (passed, declared) {
            return self.distance(Some(p), d, consider_depth);
        }

        let boxing = self.host.boxing();
        if boxing.are_duals(passed, declared) {
            return Ok(Distance::Matched(weights::PRIMITIVE_KIND_MATCHED));
        }

        if boxing.unboxed(passed).is_primitive_number() && boxing.unboxed(declared).is_primitive_number()
        {
            return Ok(Distance::Matched(weights::NUMBER_MATCHED));
        }

        if !self.is_assignable(passed, declared)? {
            return Ok(Distance::Mismatch);
        }
        if !consider_depth {
            return Ok(Distance::Matched(weights::KIND_MATCHED));
        }
        self.depth_distance(passed, declared).map(Distance::Matched)
    }

    /// Whether `passed` fits `declared` at all, ignoring how far apart they are.
    pub fn can_cast_to(
        &self,
        passed: Option<&TypeDescriptor>,
        declared: &TypeDescriptor,
    ) -> Result<bool, HostError> {
        Ok(self.distance(passed, declared, false)?.is_matched())
    }

    /// Walks the superclass chain of `passed` until `declared` is reached.
    /// A class that implements an interface `declared` directly ends the walk
    /// with an interface penalty; running off the top adds a final penalty.
    fn depth_distance(
        &self,
        passed: &TypeDescriptor,
        declared: &TypeDescriptor,
    ) -> Result<u32, HostError> {
        let interface = match declared {
            TypeDescriptor::Reference(name) if self.host.is_interface(name)? => Some(name),
            _ => None,
        };

        let mut distance = weights::MIN;
        let mut current = Some(self.host.boxing().boxed(passed));
        while let Some(ty) = current.as_ref() {
            if ty == declared {
                break;
            }
            if let Some(interface) = interface {
                if self.implements_directly(ty, interface)? {
                    distance += weights::INTERFACE_MATCHED;
                    trace!("{} reaches {} by interface at {}", passed, declared, distance);
                    return Ok(distance);
                }
            }
            current = self.host.superclass_of(ty)?;
            distance += weights::SUPERCLASS_STEP;
        }

        if current.is_none() {
            distance += weights::REACHED_TOP;
        }
        Ok(distance)
    }

    /// Whether `ty` lists `interface`, or a subinterface of it, among its own
    /// declared interfaces.
    fn implements_directly(&self, ty: &TypeDescriptor, interface: &TypeName) -> Result<bool, HostError> {
        let name = match ty {
            TypeDescriptor::Reference(name) => name,
            _ => return Ok(false),
        };
        for declared in self.host.interfaces(name)? {
            if declared == *interface || self.is_subtype(&declared, interface)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Reference assignability. A primitive is treated as its wrapper when the
    /// target is a reference type; arrays of primitives only fit themselves.
    pub fn is_assignable(&self, from: &TypeDescriptor, to: &TypeDescriptor) -> Result<bool, HostError> {
        if from == to {
            return Ok(true);
        }
        match (from, to) {
            (_, TypeDescriptor::Primitive(_)) => Ok(false),
            (TypeDescriptor::Primitive(_), _) => {
                let boxed = self.host.boxing().boxed(from);
                if boxed.is_primitive() {
                    Ok(false)
                } else {
                    self.is_assignable(&boxed, to)
                }
            }
            (TypeDescriptor::Array(a), TypeDescriptor::Array(b)) => {
                if a.is_primitive() || b.is_primitive() {
                    Ok(a == b)
                } else {
                    self.is_assignable(a, b)
                }
            }
            (TypeDescriptor::Array(_), TypeDescriptor::Reference(name)) => {
                Ok(*name == self.host.root_type())
            }
            (TypeDescriptor::Reference(_), TypeDescriptor::Array(_)) => Ok(false),
            (TypeDescriptor::Reference(a), TypeDescriptor::Reference(b)) => {
                if *b == self.host.root_type() {
                    return Ok(true);
                }
                self.is_subtype(a, b)
            }
        }
    }

    fn is_subtype(&self, sub: &TypeName, sup: &TypeName) -> Result<bool, HostError> {
        if sub == sup {
            return Ok(true);
        }

        let cache_key = (sub.clone(), sup.clone());
        if let Some(cache) = self.hierarchy {
            if let Some(cached) = cache.get(&cache_key) {
                if let Some(metrics) = self.metrics {
                    metrics.record_hierarchy_cache_hit();
                }
                return Ok(*cached);
            }
            if let Some(metrics) = self.metrics {
                metrics.record_hierarchy_cache_miss();
            }
        }

        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([sub.clone()]);
        let mut result = false;
        while let Some(current) = queue.pop_front() {
            if current == *sup {
                result = true;
                break;
            }
            if !seen.insert(current.clone()) {
                continue;
            }
            queue.extend(self.host.superclass(&current)?);
            queue.extend(self.host.interfaces(&current)?);
        }

        if let Some(cache) = self.hierarchy {
            cache.insert(cache_key, result);
        }
        Ok(result)
    }
}
