//! # reflect-resolver
//!
//! Best-match member resolution over a host's type hierarchy.
//! Callers describe a constructor, field, or method by a partial signature and
//! receive the declared member that fits it most closely.
//!
//! ## Subsystems
//!
//! - **Compatibility** (`compat`): Distance between a passed type and a declared type.
//! - **Distance** (`distance`): Parameter list scoring, including variadic tails.
//! - **Matching** (`matcher`): Exact lookup and the shallow-first candidate search.
//! - **Caching** (`cache`): Weak, concurrent memoization of resolved members.
//! - **Adaptation** (`adapter`): Packs variadic arguments for invocation.
//! - **Service** (`service`): Resolve, adapt, and invoke through a host in one call.
pub mod adapter;
pub mod cache;
pub mod compat;
pub mod config;
mod distance;
pub mod error;
pub mod matcher;
pub mod metrics;
pub mod service;

pub use adapter::InvocationAdapter;
pub use cache::{CacheKey, MemberCache};
pub use compat::{Distance, TypeCompatibility};
pub use config::ResolverConfig;
pub use error::ReflectError;
pub use matcher::SignatureMatcher;
pub use metrics::{CacheStat, CacheStats};
pub use service::ReflectionService;
