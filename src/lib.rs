//! # Memofn
//!
//! A small function-memoization library: wrap any function and repeated
//! calls with the same arguments return the cached result instead of
//! recomputing.
//!
//! ## Features
//!
//! - **Transparent wrapping**: `memoize(f)` returns a wrapper with the same
//!   positional calling style and return type as `f`
//! - **Arity-based dispatch**: single-argument targets take a primitive
//!   fast path that derives the key without serialization
//! - **Pluggable everything**: cache store, key serializer and call
//!   strategy are trait interfaces, each independently replaceable
//! - **Result-aware**: `call_fallible` caches only `Ok` values, so
//!   failures are always retried
//! - **Statistics**: optional hit/miss counters with a process-wide
//!   registry (`stats` feature, enabled by default)
//!
//! ## Quick Start
//!
//! ```
//! use memofn::memoize;
//!
//! let double = memoize(|x: i32| x * 2);
//!
//! // First call computes, second returns the cached result.
//! assert_eq!(double.call((3,)), 6);
//! assert_eq!(double.call((3,)), 6);
//! assert_eq!(double.call((4,)), 8);
//! ```
//!
//! ## Custom Argument Types
//!
//! Single-argument wrappers classify the argument: primitives key the
//! cache directly, composite types go through the serializer. A custom
//! argument type opts into the serialized path with the [`DefaultArgKey`]
//! marker, or implements [`ArgKey`] for a handmade key:
//!
//! ```
//! use memofn::{memoize, DefaultArgKey};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Query {
//!     term: String,
//!     limit: usize,
//! }
//!
//! impl DefaultArgKey for Query {}
//!
//! let search = memoize(|q: Query| format!("{}:{}", q.term, q.limit));
//! let hit = search.call((Query { term: "rust".into(), limit: 10 },));
//! assert_eq!(hit, "rust:10");
//! ```
//!
//! ## Configuration
//!
//! Any subset of the collaborators can be overridden through
//! [`MemoizeBuilder`]; the rest keep their defaults:
//!
//! ```
//! use memofn::{MemoizeBuilder, SharedStore};
//!
//! // Two wrappers deliberately sharing one cache.
//! let shared = SharedStore::new();
//! let a = MemoizeBuilder::new().cache(shared.clone()).build(|x: u32| x + 1);
//! let b = MemoizeBuilder::new().cache(shared.clone()).build(|x: u32| x + 1);
//!
//! a.call((1,));
//! b.call((1,)); // served from the shared cache
//! assert_eq!(shared.len(), 1);
//! ```
//!
//! ## Error Handling
//!
//! Key derivation can fail for arguments the serializer cannot represent;
//! [`Memoized::try_call`] surfaces that as a [`SerializationError`] and
//! leaves the cache unmodified. Failures of the target itself are never
//! cached: a panic unwinds before the store is written, and for
//! `Result`-returning targets [`Memoized::call_fallible`] stores only `Ok`
//! values:
//!
//! ```
//! use memofn::memoize;
//!
//! let divide = memoize(|a: i32, b: i32| {
//!     if b == 0 {
//!         Err("division by zero".to_string())
//!     } else {
//!         Ok(a / b)
//!     }
//! });
//!
//! // Ok results are cached, Err results are not.
//! assert_eq!(divide.call_fallible((10, 2)), Ok(5));
//! assert!(divide.call_fallible((10, 0)).is_err());
//! ```
//!
//! ## Module Organization
//!
//! - `keys` - the opaque cache-key type and single-argument classification
//! - `serializer` - key serialization contract and the JSON default
//! - `store` - cache storage contract, the unbounded default and the
//!   shared store
//! - `strategy` - call dispatch, the wrapper type and the strategy seam
//! - `memoize` - the public entry points and the configuration builder

mod keys;
mod memoize;
mod serializer;
mod store;
mod strategy;

#[cfg(feature = "stats")]
mod stats;

#[cfg(feature = "stats")]
pub mod stats_registry;

pub use keys::{ArgKey, CacheKey, DefaultArgKey};
pub use memoize::{memoize, MemoizeBuilder};
pub use serializer::{JsonKeySerializer, KeySerializer, SerializationError};
pub use store::{CacheFactory, CacheStore, SharedStore, UnboundedCache, UnboundedStore};
pub use strategy::{
    ArityStrategy, CallArgs, CallMode, CallStrategy, MemoFn, Memoized, StrategyDeps,
};

#[cfg(feature = "stats")]
pub use memoize::memoize_named;

#[cfg(feature = "stats")]
pub use stats::CacheStats;
