use crate::{
    adapter::InvocationAdapter,
    cache::{CacheKey, MemberCache},
    compat::TypeCompatibility,
    config::ResolverConfig,
    error::ReflectError,
    matcher::SignatureMatcher,
    metrics::CacheStats,
};
use reflect_types::{
    members::{
        ConstructorDescription, FieldDescription, MemberInfo, MemberKind, MethodDescription,
        ResolvedMember,
    },
    HostReflection, TypeDescriptor, TypeName,
};
use reflect_value::{Argument, HostInvoker, InvocationError, Value};
use std::sync::Arc;
use tracing::debug;

enum CacheHandle {
    Global,
    Owned(Arc<MemberCache>),
}

/// Resolves members through a cache and invokes them on the host.
pub struct ReflectionService<H: HostReflection + HostInvoker> {
    host: Arc<H>,
    cache: CacheHandle,
    config: ResolverConfig,
}

impl<H: HostReflection + HostInvoker> ReflectionService<H> {
    /// A service backed by [`MemberCache::global`].
    pub fn new(host: Arc<H>) -> Self {
        Self {
            host,
            cache: CacheHandle::Global,
            config: ResolverConfig::from_env(),
        }
    }

    pub fn with_cache(host: Arc<H>, cache: Arc<MemberCache>) -> Self {
        Self {
            host,
            cache: CacheHandle::Owned(cache),
            config: ResolverConfig::from_env(),
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn cache(&self) -> &MemberCache {
        match &self.cache {
            CacheHandle::Global => MemberCache::global(),
            CacheHandle::Owned(cache) => cache,
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.cache().stats()
    }

    fn compat(&self) -> TypeCompatibility<'_, H> {
        let cache = self.cache();
        let metrics = self.config.metrics.then(|| cache.metrics());
        TypeCompatibility::with_cache(self.host.as_ref(), cache.hierarchy(), metrics)
    }

    fn matcher(&self) -> SignatureMatcher<'_, H> {
        let metrics = self.config.metrics.then(|| self.cache().metrics());
        SignatureMatcher::new(self.compat())
            .with_exact_lookup(self.config.exact_lookup)
            .with_metrics(metrics)
    }

    fn resolve_cached(
        &self,
        key: CacheKey,
        resolve: impl FnOnce(&SignatureMatcher<'_, H>) -> Result<Option<ResolvedMember>, ReflectError>,
    ) -> Result<ResolvedMember, ReflectError> {
        let found = self
            .cache()
            .get_or_resolve(key.clone(), || resolve(&self.matcher()))?;
        found.ok_or_else(|| no_such_member(&key))
    }

    pub fn resolve_constructor(
        &self,
        owner: &TypeName,
        parameters: &[Option<TypeDescriptor>],
    ) -> Result<ConstructorDescription, ReflectError> {
        let key = CacheKey::Constructor {
            owner: owner.clone(),
            parameters: parameters.to_vec(),
        };
        let member = self.resolve_cached(key.clone(), |m| {
            Ok(m.resolve_constructor(owner, parameters)?.map(ResolvedMember::from))
        })?;
        member
            .as_constructor()
            .cloned()
            .ok_or_else(|| no_such_member(&key))
    }

    pub fn resolve_field(
        &self,
        owner: &TypeName,
        name: Option<&str>,
        field_type: Option<&TypeDescriptor>,
    ) -> Result<FieldDescription, ReflectError> {
        let key = CacheKey::Field {
            owner: owner.clone(),
            name: name.map(str::to_string),
            field_type: field_type.cloned(),
        };
        let member = self.resolve_cached(key.clone(), |m| {
            Ok(m.resolve_field(owner, name, field_type)?.map(ResolvedMember::from))
        })?;
        member.as_field().cloned().ok_or_else(|| no_such_member(&key))
    }

    pub fn resolve_method(
        &self,
        owner: &TypeName,
        name: Option<&str>,
        parameters: &[Option<TypeDescriptor>],
        return_type: Option<&TypeDescriptor>,
    ) -> Result<MethodDescription, ReflectError> {
        let key = CacheKey::Method {
            owner: owner.clone(),
            name: name.map(str::to_string),
            parameters: parameters.to_vec(),
            return_type: return_type.cloned(),
        };
        let member = self.resolve_cached(key.clone(), |m| {
            Ok(m
                .resolve_method(owner, name, parameters, return_type)?
                .map(ResolvedMember::from))
        })?;
        member.as_method().cloned().ok_or_else(|| no_such_member(&key))
    }

    pub fn adapt_arguments(
        &self,
        member: &impl MemberInfo,
        args: Vec<Argument>,
    ) -> Result<Vec<Argument>, ReflectError> {
        InvocationAdapter::new(self.compat()).adapt(member, args)
    }

    /// Constructs `owner` from `args`. Each argument's explicit type, else
    /// the runtime type of its value, selects the constructor; `null`
    /// arguments leave their position unconstrained.
    pub fn new_instance(&self, owner: &TypeName, args: Vec<Argument>) -> Result<Value, ReflectError> {
        let parameters = argument_types(&args);
        let constructor = self.resolve_constructor(owner, &parameters)?;
        let args = self.adapt_arguments(&constructor, args)?;
        self.host
            .construct(&constructor, &args)
            .map_err(|e| rewrap(e, args, &constructor))
    }

    /// Reads a field. A `null` value is returned as is; any other value must
    /// be an instance of `field_type` when one is given.
    pub fn get_field(
        &self,
        owner: &TypeName,
        receiver: Option<&Value>,
        name: Option<&str>,
        field_type: Option<&TypeDescriptor>,
    ) -> Result<Value, ReflectError> {
        let field = self.resolve_field(owner, name, field_type)?;
        let value = self.host.get_field(&field, receiver)?;
        match field_type {
            Some(expected) => self.expect_instance(value, expected, &field),
            None => Ok(value),
        }
    }

    pub fn set_field(
        &self,
        owner: &TypeName,
        receiver: Option<&Value>,
        name: Option<&str>,
        field_type: Option<&TypeDescriptor>,
        value: Value,
    ) -> Result<(), ReflectError> {
        let field = self.resolve_field(owner, name, field_type)?;
        self.host
            .set_field(&field, receiver, value.clone())
            .map_err(|e| rewrap(e, vec![Argument::new(value)], &field))
    }

    /// Invokes the closest method. A non-null result must be an instance of
    /// `returns` when one is given.
    pub fn call(
        &self,
        owner: &TypeName,
        receiver: Option<&Value>,
        name: Option<&str>,
        args: Vec<Argument>,
        returns: Option<&TypeDescriptor>,
    ) -> Result<Value, ReflectError> {
        let parameters = argument_types(&args);
        let method = self.resolve_method(owner, name, &parameters, returns)?;
        let args = self.adapt_arguments(&method, args)?;
        let value = self
            .host
            .invoke(&method, receiver, &args)
            .map_err(|e| rewrap(e, args, &method))?;
        match returns {
            Some(expected) => self.expect_instance(value, expected, &method),
            None => Ok(value),
        }
    }

    fn expect_instance(
        &self,
        value: Value,
        expected: &TypeDescriptor,
        member: &impl std::fmt::Display,
    ) -> Result<Value, ReflectError> {
        let Some(actual) = value.runtime_type() else {
            return Ok(value);
        };
        let boxing = self.host.boxing();
        if self
            .compat()
            .is_assignable(&boxing.boxed(&actual), &boxing.boxed(expected))?
        {
            Ok(value)
        } else {
            Err(ReflectError::IncompatibleValue {
                member: member.to_string(),
                expected: expected.clone(),
                value,
            })
        }
    }
}

fn argument_types(args: &[Argument]) -> Vec<Option<TypeDescriptor>> {
    args.iter().map(Argument::resolved_type).collect()
}

fn no_such_member(key: &CacheKey) -> ReflectError {
    let err = ReflectError::NoSuchMember {
        kind: key.kind(),
        owner: key.owner().clone(),
        signature: key.signature(),
    };
    debug!("{}", err);
    err
}

fn rewrap(error: InvocationError, arguments: Vec<Argument>, member: &impl MemberInfo) -> ReflectError {
    match error {
        InvocationError::IllegalArgument(cause) => ReflectError::AmbiguousArguments {
            arguments,
            parameters: match member.kind() {
                MemberKind::Field => member.value_type().cloned().into_iter().collect(),
                _ => member.parameter_types().to_vec(),
            },
            cause,
        },
        other => ReflectError::Invocation(other),
    }
}
