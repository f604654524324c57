//! Best-match member search.
//!
//! Each entry point first tries an exact lookup with the fully concrete
//! signature, then scores declared candidates level by level up the
//! superclass chain. The search stops at the first level where any candidate
//! matches, even if a closer one exists higher up. Within a level the lowest
//! distance wins and ties go to the member declared first.
use crate::{
    compat::{Distance, TypeCompatibility},
    error::ReflectError,
    metrics::ResolverMetrics,
};
use reflect_types::{
    error::HostError,
    members::{ConstructorDescription, FieldDescription, MemberInfo, MethodDescription},
    HostReflection, TypeDescriptor, TypeName,
};
use tracing::{debug, trace};

pub struct SignatureMatcher<'a, H: HostReflection + ?Sized> {
    compat: TypeCompatibility<'a, H>,
    exact_lookup: bool,
    metrics: Option<&'a ResolverMetrics>,
}

impl<'a, H: HostReflection + ?Sized> SignatureMatcher<'a, H> {
    pub fn new(compat: TypeCompatibility<'a, H>) -> Self {
        Self {
            compat,
            exact_lookup: true,
            metrics: None,
        }
    }

    pub fn with_exact_lookup(mut self, enabled: bool) -> Self {
        self.exact_lookup = enabled;
        self
    }

    pub fn with_metrics(mut self, metrics: Option<&'a ResolverMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    fn host(&self) -> &'a H {
        self.compat.host()
    }

    fn record_exact_hit(&self) {
        if let Some(metrics) = self.metrics {
            metrics.record_exact_lookup_hit();
        }
    }

    fn record_search(&self) {
        if let Some(metrics) = self.metrics {
            metrics.record_distance_search();
        }
    }

    /// Constructors are not inherited, so only the owner's own are searched.
    pub fn resolve_constructor(
        &self,
        owner: &TypeName,
        parameters: &[Option<TypeDescriptor>],
    ) -> Result<Option<ConstructorDescription>, ReflectError> {
        if self.exact_lookup {
            if let Some(concrete) = concrete(parameters) {
                if let Some(found) = self.host().declared_constructor(owner, &concrete)? {
                    self.record_exact_hit();
                    return Ok(Some(found));
                }
            }
        }

        self.record_search();
        let candidates = self.host().declared_constructors(owner)?;
        let best = closest(candidates, |c| {
            self.compat.parameters_distance(
                parameters,
                &c.constructor.parameters,
                c.constructor.variadic,
            )
        })?;
        if best.is_none() {
            debug!("no constructor of {} accepts {:?}", owner, parameters);
        }
        Ok(best)
    }

    pub fn resolve_field(
        &self,
        owner: &TypeName,
        name: Option<&str>,
        field_type: Option<&TypeDescriptor>,
    ) -> Result<Option<FieldDescription>, ReflectError> {
        if name.is_none() && field_type.is_none() {
            return Err(ReflectError::InvalidRequest(format!(
                "a field of {} needs a name or a type",
                owner
            )));
        }

        if self.exact_lookup {
            if let Some(name) = name {
                if let Some(found) = self.lookup_field(owner, name)? {
                    let accepted = match field_type {
                        None => true,
                        Some(ty) => self.compat.can_cast_to(Some(ty), &found.field.field_type)?,
                    };
                    if accepted {
                        self.record_exact_hit();
                        return Ok(Some(found));
                    }
                }
            }
        }

        self.record_search();
        let mut level = Some(owner.clone());
        while let Some(current) = level {
            let found = match (name, field_type) {
                (Some(name), None) => self.lookup_field(&current, name)?,
                (_, Some(ty)) => {
                    let candidates = self
                        .host()
                        .declared_fields(&current)?
                        .into_iter()
                        .filter(|f| name.map_or(true, |n| f.field.name == n))
                        .collect::<Vec<_>>();
                    closest(candidates, |f| {
                        self.compat.distance(Some(ty), &f.field.field_type, true)
                    })?
                }
                (None, None) => None,
            };
            if found.is_some() {
                return Ok(found);
            }
            level = self.host().superclass(&current)?;
        }

        debug!("no field {:?} of type {:?} in {}", name, field_type, owner);
        Ok(None)
    }

    fn lookup_field(&self, owner: &TypeName, name: &str) -> Result<Option<FieldDescription>, HostError> {
        match self.host().declared_field(owner, name)? {
            Some(found) => Ok(Some(found)),
            None => self.host().public_field(owner, name),
        }
    }

    pub fn resolve_method(
        &self,
        owner: &TypeName,
        name: Option<&str>,
        parameters: &[Option<TypeDescriptor>],
        return_type: Option<&TypeDescriptor>,
    ) -> Result<Option<MethodDescription>, ReflectError> {
        if self.exact_lookup {
            if let (Some(name), Some(concrete)) = (name, concrete(parameters)) {
                if let Some(found) = self.lookup_method(owner, name, &concrete)? {
                    let accepted = match return_type {
                        None => true,
                        Some(ty) => self.compat.can_cast_to(Some(ty), &found.method.return_type)?,
                    };
                    if accepted {
                        self.record_exact_hit();
                        return Ok(Some(found));
                    }
                }
            }
        }

        self.record_search();
        let mut level = Some(owner.clone());
        while let Some(current) = level {
            let candidates = self
                .host()
                .declared_methods(&current)?
                .into_iter()
                .filter(|m| name.map_or(true, |n| m.method.name == n))
                .collect::<Vec<_>>();
            let found = closest(candidates, |m| {
                let params = self.compat.parameters_distance(
                    parameters,
                    &m.method.parameters,
                    m.method.variadic,
                )?;
                match return_type {
                    Some(ty) if params.is_matched() => {
                        Ok(params + self.compat.distance(Some(ty), &m.method.return_type, true)?)
                    }
                    _ => Ok(params),
                }
            })?;
            if found.is_some() {
                return Ok(found);
            }
            level = self.host().superclass(&current)?;
        }

        debug!(
            "no method {:?}({:?}) returning {:?} in {}",
            name, parameters, return_type, owner
        );
        Ok(None)
    }

    fn lookup_method(
        &self,
        owner: &TypeName,
        name: &str,
        parameters: &[TypeDescriptor],
    ) -> Result<Option<MethodDescription>, HostError> {
        match self.host().declared_method(owner, name, parameters)? {
            Some(found) => Ok(Some(found)),
            None => self.host().public_method(owner, name, parameters),
        }
    }
}

/// The parameter list with every entry constrained, if it is.
fn concrete(parameters: &[Option<TypeDescriptor>]) -> Option<Vec<TypeDescriptor>> {
    parameters.iter().cloned().collect()
}

/// The candidate with the lowest matched distance. Candidates are ordered by
/// declaration index first so that the earliest declared one wins a tie.
fn closest<T: MemberInfo>(
    mut candidates: Vec<T>,
    mut score: impl FnMut(&T) -> Result<Distance, HostError>,
) -> Result<Option<T>, HostError> {
    candidates.sort_by_key(|c| c.declaration_index());

    let mut best: Option<(T, Distance)> = None;
    for candidate in candidates {
        let distance = score(&candidate)?;
        if distance.is_mismatch() {
            continue;
        }
        let closer = match &best {
            None => true,
            Some((_, best_distance)) => distance < *best_distance,
        };
        if closer {
            best = Some((candidate, distance));
        }
    }

    if let Some((member, distance)) = &best {
        trace!(
            "selected {}.{} #{} at distance {}",
            member.parent(),
            member.name(),
            member.declaration_index(),
            distance
        );
    }
    Ok(best.map(|(member, _)| member))
}
