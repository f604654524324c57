use std::env;
use tracing::warn;

pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// Resolver settings.
///
/// [`ResolverConfig::from_env`] reads:
/// - `REFLECT_RS_CACHE_CAPACITY`: initial member cache capacity.
/// - `REFLECT_RS_EXACT_LOOKUP`: `0` or `false` skips the exact signature lookup.
/// - `REFLECT_RS_METRICS`: `0` or `false` disables hit/miss counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    pub cache_capacity: usize,
    pub exact_lookup: bool,
    pub metrics: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            exact_lookup: true,
            metrics: true,
        }
    }
}

impl ResolverConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let cache_capacity = match lookup("REFLECT_RS_CACHE_CAPACITY") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("ignoring REFLECT_RS_CACHE_CAPACITY={:?}", raw);
                defaults.cache_capacity
            }),
            None => defaults.cache_capacity,
        };

        Self {
            cache_capacity,
            exact_lookup: flag(&lookup, "REFLECT_RS_EXACT_LOOKUP", defaults.exact_lookup),
            metrics: flag(&lookup, "REFLECT_RS_METRICS", defaults.metrics),
        }
    }
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    match lookup(key).map(|v| v.trim().to_lowercase()) {
        None => default,
        Some(v) if v == "1" || v == "true" => true,
        Some(v) if v == "0" || v == "false" => false,
        Some(v) => {
            warn!("ignoring {}={:?}", key, v);
            default
        }
    }
}
