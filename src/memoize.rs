use crate::serializer::{JsonKeySerializer, KeySerializer};
use crate::store::{CacheFactory, UnboundedCache, UnboundedStore};
use crate::strategy::{ArityStrategy, CallArgs, CallStrategy, MemoFn, Memoized, StrategyDeps};

/// Memoizes a function with the default configuration: an unbounded
/// per-wrapper cache, JSON key serialization and arity-based dispatch.
///
/// The target is any `Fn` of up to six arguments. Building the wrapper
/// inspects the arity and creates the cache instance once; the target is
/// not invoked. Calls take the arguments as a tuple:
///
/// ```
/// use memofn::memoize;
///
/// let double = memoize(|x: i32| x * 2);
/// assert_eq!(double.call((3,)), 6);
///
/// let add = memoize(|a: i32, b: i32| a + b);
/// assert_eq!(add.call((1, 2)), 3);
/// assert_eq!(add.call((2, 1)), 3); // distinct key, computed separately
/// ```
pub fn memoize<F, A>(func: F) -> Memoized<F, A, JsonKeySerializer, UnboundedStore<F::Output>>
where
    F: MemoFn<A>,
    A: CallArgs,
    F::Output: Clone,
{
    MemoizeBuilder::new().build(func)
}

/// Memoizes with the default configuration and publishes the wrapper's
/// hit/miss counters in the [`stats_registry`](crate::stats_registry)
/// under `name`.
///
/// ```
/// use memofn::{memoize_named, stats_registry};
///
/// let square = memoize_named("square", |x: i64| x * x);
/// square.call((4,));
/// square.call((4,));
///
/// let stats = stats_registry::get("square").unwrap();
/// assert_eq!(stats.misses(), 1);
/// assert_eq!(stats.hits(), 1);
/// ```
#[cfg(feature = "stats")]
pub fn memoize_named<F, A>(
    name: &str,
    func: F,
) -> Memoized<F, A, JsonKeySerializer, UnboundedStore<F::Output>>
where
    F: MemoFn<A>,
    A: CallArgs,
    F::Output: Clone,
{
    let wrapped = memoize(func);
    wrapped.register_stats(name);
    wrapped
}

/// Configuration for a memoized wrapper.
///
/// Any subset of the three collaborators can be overridden; the rest keep
/// the system defaults ([`UnboundedCache`], [`JsonKeySerializer`],
/// [`ArityStrategy`]). Each setter fully replaces its slot - there is no
/// deep merging of collaborator internals. The configuration is consumed
/// by [`build`](MemoizeBuilder::build) and never mutated afterward.
///
/// # Examples
///
/// Overriding the serializer with one that maps every argument list to the
/// same key collapses all calls onto a single cache entry:
///
/// ```
/// use memofn::{CacheKey, KeySerializer, MemoizeBuilder, SerializationError};
/// use serde::Serialize;
///
/// struct ConstantKey;
///
/// impl KeySerializer for ConstantKey {
///     fn serialize<A>(&self, _args: &A) -> Result<CacheKey, SerializationError>
///     where
///         A: Serialize + ?Sized,
///     {
///         Ok(CacheKey::Serialized("always".to_string()))
///     }
/// }
///
/// let add = MemoizeBuilder::new()
///     .serializer(ConstantKey)
///     .build(|a: i32, b: i32| a + b);
///
/// assert_eq!(add.call((1, 2)), 3);
/// assert_eq!(add.call((40, 2)), 3); // same key, cached result
/// ```
pub struct MemoizeBuilder<C = UnboundedCache, S = JsonKeySerializer, St = ArityStrategy> {
    cache: C,
    serializer: S,
    strategy: St,
}

impl MemoizeBuilder {
    pub fn new() -> Self {
        Self {
            cache: UnboundedCache,
            serializer: JsonKeySerializer,
            strategy: ArityStrategy,
        }
    }
}

impl Default for MemoizeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, S, St> MemoizeBuilder<C, S, St> {
    /// Replaces the cache factory.
    pub fn cache<C2>(self, cache: C2) -> MemoizeBuilder<C2, S, St> {
        MemoizeBuilder {
            cache,
            serializer: self.serializer,
            strategy: self.strategy,
        }
    }

    /// Replaces the key serializer.
    pub fn serializer<S2>(self, serializer: S2) -> MemoizeBuilder<C, S2, St> {
        MemoizeBuilder {
            cache: self.cache,
            serializer,
            strategy: self.strategy,
        }
    }

    /// Replaces the call strategy.
    pub fn strategy<St2>(self, strategy: St2) -> MemoizeBuilder<C, S, St2> {
        MemoizeBuilder {
            cache: self.cache,
            serializer: self.serializer,
            strategy,
        }
    }

    /// Wraps `func` with the configured collaborators. Performs the
    /// one-time arity inspection and cache instantiation; does not invoke
    /// `func`.
    pub fn build<F, A>(self, func: F) -> St::Wrapped
    where
        F: MemoFn<A>,
        A: CallArgs,
        C: CacheFactory<F::Output>,
        S: KeySerializer,
        St: CallStrategy<F, A, C, S>,
    {
        let MemoizeBuilder {
            cache,
            serializer,
            strategy,
        } = self;
        strategy.wrap(func, StrategyDeps { cache, serializer })
    }
}
