use crate::{compat::HierarchyCache, config::ResolverConfig, metrics::{CacheStats, ResolverMetrics}};
use dashmap::{mapref::entry::Entry, DashMap};
use reflect_types::{
    members::{MemberInfo, MemberKind, ResolvedMember, Signature, WeakMember, CONSTRUCTOR_NAME},
    TypeDescriptor, TypeName,
};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    OnceLock,
};
use tracing::trace;

static GLOBAL: OnceLock<MemberCache> = OnceLock::new();

/// A resolution request, exactly as it was asked.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Constructor {
        owner: TypeName,
        parameters: Vec<Option<TypeDescriptor>>,
    },
    Field {
        owner: TypeName,
        name: Option<String>,
        field_type: Option<TypeDescriptor>,
    },
    Method {
        owner: TypeName,
        name: Option<String>,
        parameters: Vec<Option<TypeDescriptor>>,
        return_type: Option<TypeDescriptor>,
    },
}

impl CacheKey {
    pub fn kind(&self) -> MemberKind {
        match self {
            CacheKey::Constructor { .. } => MemberKind::Constructor,
            CacheKey::Field { .. } => MemberKind::Field,
            CacheKey::Method { .. } => MemberKind::Method,
        }
    }

    pub fn owner(&self) -> &TypeName {
        match self {
            CacheKey::Constructor { owner, .. }
            | CacheKey::Field { owner, .. }
            | CacheKey::Method { owner, .. } => owner,
        }
    }

    pub fn signature(&self) -> Signature {
        match self {
            CacheKey::Constructor { parameters, .. } => Signature {
                name: Some(CONSTRUCTOR_NAME.to_string()),
                parameters: parameters.clone(),
                ..Signature::default()
            },
            CacheKey::Field {
                name, field_type, ..
            } => Signature {
                name: name.clone(),
                return_type: field_type.clone(),
                ..Signature::default()
            },
            CacheKey::Method {
                name,
                parameters,
                return_type,
                ..
            } => Signature {
                name: name.clone(),
                parameters: parameters.clone(),
                return_type: return_type.clone(),
                variadic: false,
            },
        }
    }
}

/// Memoizes resolved members per request.
///
/// Entries hold weak references, so a cached member never keeps its owner's
/// definitions alive. An entry whose member has been dropped is treated as a
/// miss and replaced. Absent results are not cached.
#[derive(Debug)]
pub struct MemberCache {
    members: DashMap<CacheKey, WeakMember>,
    hierarchy: HierarchyCache,
    metrics: ResolverMetrics,
    pub member_cache_hits: AtomicU64,
    pub member_cache_misses: AtomicU64,
}

impl Default for MemberCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MemberCache {
    pub fn new() -> Self {
        Self::with_capacity(ResolverConfig::default().cache_capacity)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            members: DashMap::with_capacity(capacity),
            hierarchy: HierarchyCache::new(),
            metrics: ResolverMetrics::new(),
            member_cache_hits: AtomicU64::new(0),
            member_cache_misses: AtomicU64::new(0),
        }
    }

    /// The process-wide cache, sized from the environment on first use.
    pub fn global() -> &'static MemberCache {
        GLOBAL.get_or_init(|| MemberCache::with_capacity(ResolverConfig::from_env().cache_capacity))
    }

    pub fn hierarchy(&self) -> &HierarchyCache {
        &self.hierarchy
    }

    pub fn metrics(&self) -> &ResolverMetrics {
        &self.metrics
    }

    /// Returns the live cached member for `key`, or runs `resolve` and caches
    /// its result. When two callers race on the same key the first stored
    /// member is returned to both.
    pub fn get_or_resolve<E>(
        &self,
        key: CacheKey,
        resolve: impl FnOnce() -> Result<Option<ResolvedMember>, E>,
    ) -> Result<Option<ResolvedMember>, E> {
        if let Some(cached) = self.members.get(&key).and_then(|entry| entry.upgrade()) {
            self.member_cache_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Some(cached));
        }

        self.member_cache_misses.fetch_add(1, Ordering::Relaxed);
        let Some(member) = resolve()? else {
            return Ok(None);
        };

        match self.members.entry(key) {
            Entry::Occupied(mut occupied) => match occupied.get().upgrade() {
                Some(existing) => Ok(Some(existing)),
                None => {
                    trace!("replacing expired cache entry for {}", member);
                    occupied.insert(member.downgrade());
                    Ok(Some(member))
                }
            },
            Entry::Vacant(vacant) => {
                vacant.insert(member.downgrade());
                Ok(Some(member))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Drops entries whose members are gone and returns how many were removed.
    pub fn prune(&self) -> usize {
        let before = self.members.len();
        self.members.retain(|_, member| member.is_alive());
        before - self.members.len()
    }

    pub fn clear(&self) {
        self.members.clear();
        self.hierarchy.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.metrics.cache_statistics(
            (
                self.member_cache_hits.load(Ordering::Relaxed),
                self.member_cache_misses.load(Ordering::Relaxed),
                self.members.len(),
            ),
            self.hierarchy.len(),
        )
    }
}
