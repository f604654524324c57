use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct CacheStat {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub size: usize,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub member: CacheStat,
    pub hierarchy: CacheStat,
    pub exact_lookup_hits: u64,
    pub distance_searches: u64,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Cache Statistics:")?;
        writeln!(f, "  Member Cache:       {}", self.member)?;
        writeln!(f, "  Hierarchy Cache:    {}", self.hierarchy)?;
        writeln!(f, "  Exact Lookup Hits:  {:>8}", self.exact_lookup_hits)?;
        writeln!(f, "  Distance Searches:  {:>8}", self.distance_searches)?;
        Ok(())
    }
}

impl std::fmt::Display for CacheStat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "hits: {:>8}, misses: {:>8}, hit_rate: {:>6.2}%, size: {:>8}",
            self.hits,
            self.misses,
            self.hit_rate * 100.0,
            self.size
        )
    }
}

/// Resolver counters.
///
/// All counters use `Ordering::Relaxed`; they are independent and never used
/// to synchronize other memory.
#[derive(Debug, Default)]
pub struct ResolverMetrics {
    pub hierarchy_cache_hits: AtomicU64,
    pub hierarchy_cache_misses: AtomicU64,
    pub exact_lookup_hits: AtomicU64,
    pub distance_searches: AtomicU64,
}

impl ResolverMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_hierarchy_cache_hit(&self) {
        self.hierarchy_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_hierarchy_cache_miss(&self) {
        self.hierarchy_cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_exact_lookup_hit(&self) {
        self.exact_lookup_hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_distance_search(&self) {
        self.distance_searches.fetch_add(1, Ordering::Relaxed);
    }

    /// `member_info` is the member cache's own (hits, misses, size).
    pub fn cache_statistics(
        &self,
        member_info: (u64, u64, usize),
        hierarchy_size: usize,
    ) -> CacheStats {
        CacheStats {
            member: self.stat(member_info.0, member_info.1, member_info.2),
            hierarchy: self.stat(
                self.hierarchy_cache_hits.load(Ordering::Relaxed),
                self.hierarchy_cache_misses.load(Ordering::Relaxed),
                hierarchy_size,
            ),
            exact_lookup_hits: self.exact_lookup_hits.load(Ordering::Relaxed),
            distance_searches: self.distance_searches.load(Ordering::Relaxed),
        }
    }

    fn stat(&self, hits: u64, misses: u64, size: usize) -> CacheStat {
        let total = hits + misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        };
        CacheStat {
            hits,
            misses,
            hit_rate,
            size,
        }
    }
}
