use std::cell::{Ref, RefCell, RefMut};
use std::marker::PhantomData;

use serde::Serialize;

#[cfg(feature = "stats")]
use std::sync::Arc;

use crate::keys::{ArgKey, CacheKey};
use crate::serializer::{KeySerializer, SerializationError};
use crate::store::{CacheFactory, CacheStore};

#[cfg(feature = "stats")]
use crate::stats::CacheStats;

/// Call dispatch mode, fixed once at wrap time.
///
/// The strategy inspects the target's arity when the wrapper is built and
/// tags the wrapper with one of two modes:
///
/// * `SingleArgument` - arity is exactly 1; primitive-like arguments key
///   the cache directly, skipping serialization
/// * `Variadic` - any other arity; the key is always derived from the full
///   argument tuple, regardless of primitivity
///
/// The tag never changes for the lifetime of the wrapper.
///
/// # Examples
///
/// ```
/// use memofn::{memoize, CallMode};
///
/// let one = memoize(|x: i32| x + 1);
/// assert_eq!(one.mode(), CallMode::SingleArgument);
///
/// let two = memoize(|a: i32, b: i32| a + b);
/// assert_eq!(two.mode(), CallMode::Variadic);
///
/// let zero = memoize(|| 42);
/// assert_eq!(zero.mode(), CallMode::Variadic);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallMode {
    SingleArgument,
    Variadic,
}

/// A memoizable call target.
///
/// Implemented for every `Fn` taking up to six arguments, with the argument
/// list modeled as a tuple. The wrapper invokes the target through `&self`,
/// so captured closure state is forwarded untouched on every call.
pub trait MemoFn<A> {
    type Output;

    fn invoke(&self, args: A) -> Self::Output;
}

/// An argument tuple that can derive a cache key.
///
/// `ARITY` is the declared parameter count of the target, known at compile
/// time. Key derivation depends on the wrapper's [`CallMode`]: one-element
/// tuples consult the argument's [`ArgKey`] classification first and fall
/// back to the serializer (which receives the one-element sequence); all
/// other arities serialize the full tuple regardless of mode, because key
/// uniqueness must reflect the whole tuple.
pub trait CallArgs: Serialize {
    const ARITY: usize;

    fn derive_key<S: KeySerializer>(
        &self,
        mode: CallMode,
        serializer: &S,
    ) -> Result<CacheKey, SerializationError>;
}

impl CallArgs for () {
    const ARITY: usize = 0;

    fn derive_key<S: KeySerializer>(
        &self,
        _mode: CallMode,
        serializer: &S,
    ) -> Result<CacheKey, SerializationError> {
        // Zero-arity targets key on the empty argument sequence.
        serializer.serialize(&[(); 0])
    }
}

impl<A1: ArgKey + Serialize> CallArgs for (A1,) {
    const ARITY: usize = 1;

    fn derive_key<S: KeySerializer>(
        &self,
        mode: CallMode,
        serializer: &S,
    ) -> Result<CacheKey, SerializationError> {
        if mode == CallMode::SingleArgument {
            if let Some(key) = self.0.direct_key() {
                return Ok(key);
            }
        }
        serializer.serialize(self)
    }
}

macro_rules! impl_call_args {
    ($arity:expr => $($ty:ident),+) => {
        impl<$($ty: Serialize),+> CallArgs for ($($ty,)+) {
            const ARITY: usize = $arity;

            fn derive_key<S: KeySerializer>(
                &self,
                _mode: CallMode,
                serializer: &S,
            ) -> Result<CacheKey, SerializationError> {
                serializer.serialize(self)
            }
        }
    };
}

impl_call_args!(2 => A1, A2);
impl_call_args!(3 => A1, A2, A3);
impl_call_args!(4 => A1, A2, A3, A4);
impl_call_args!(5 => A1, A2, A3, A4, A5);
impl_call_args!(6 => A1, A2, A3, A4, A5, A6);

macro_rules! impl_memo_fn {
    ($($ty:ident => $var:ident),*) => {
        impl<Func, Out, $($ty),*> MemoFn<($($ty,)*)> for Func
        where
            Func: Fn($($ty),*) -> Out,
        {
            type Output = Out;

            fn invoke(&self, ($($var,)*): ($($ty,)*)) -> Out {
                self($($var),*)
            }
        }
    };
}

impl_memo_fn!();
impl_memo_fn!(A1 => a1);
impl_memo_fn!(A1 => a1, A2 => a2);
impl_memo_fn!(A1 => a1, A2 => a2, A3 => a3);
impl_memo_fn!(A1 => a1, A2 => a2, A3 => a3, A4 => a4);
impl_memo_fn!(A1 => a1, A2 => a2, A3 => a3, A4 => a4, A5 => a5);
impl_memo_fn!(A1 => a1, A2 => a2, A3 => a3, A4 => a4, A5 => a5, A6 => a6);

/// Collaborators handed to a [`CallStrategy`] at wrap time.
pub struct StrategyDeps<C, S> {
    /// Cache factory; `create` is called once to make the wrapper's store.
    pub cache: C,
    /// Key serializer bound into the wrapper.
    pub serializer: S,
}

/// Builds a wrapper from a target function and its collaborators.
///
/// Invoked exactly once per `memoize` call. The default [`ArityStrategy`]
/// inspects [`CallArgs::ARITY`], fixes the [`CallMode`], creates a fresh
/// cache instance and returns a [`Memoized`]. A custom strategy can change
/// the dispatch decision or return a wrapper type of its own.
pub trait CallStrategy<F, A, C, S>
where
    F: MemoFn<A>,
    A: CallArgs,
    C: CacheFactory<F::Output>,
    S: KeySerializer,
{
    type Wrapped;

    fn wrap(&self, func: F, deps: StrategyDeps<C, S>) -> Self::Wrapped;
}

/// Default strategy: single-argument targets get the primitive fast path,
/// every other arity is variadic.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArityStrategy;

impl<F, A, C, S> CallStrategy<F, A, C, S> for ArityStrategy
where
    F: MemoFn<A>,
    A: CallArgs,
    C: CacheFactory<F::Output>,
    S: KeySerializer,
{
    type Wrapped = Memoized<F, A, S, C::Store>;

    fn wrap(&self, func: F, deps: StrategyDeps<C, S>) -> Self::Wrapped {
        let mode = if A::ARITY == 1 {
            CallMode::SingleArgument
        } else {
            CallMode::Variadic
        };
        Memoized::new(func, mode, deps.serializer, deps.cache.create())
    }
}

/// A memoized function wrapper.
///
/// Holds the target function, the dispatch mode chosen at build time, the
/// key serializer and the cache store. Calls go through [`call`] (or
/// [`try_call`] when the serializer can fail): on a cache miss the target
/// runs once and its result is stored; on a hit the stored value is
/// returned without invoking the target.
///
/// The store lives behind a `RefCell`, so the wrapper is called through a
/// shared reference like the plain function would be. Nothing here is
/// thread-safe: the wrapper is not `Sync`, and a port to a parallel
/// environment needs a store with atomic check-or-insert semantics
/// instead.
///
/// [`call`]: Memoized::call
/// [`try_call`]: Memoized::try_call
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use memofn::memoize;
///
/// let calls = Cell::new(0);
/// let double = memoize(|x: i32| {
///     calls.set(calls.get() + 1);
///     x * 2
/// });
///
/// assert_eq!(double.call((3,)), 6);
/// assert_eq!(double.call((3,)), 6); // cached
/// assert_eq!(double.call((4,)), 8);
/// assert_eq!(calls.get(), 2);
/// ```
pub struct Memoized<F, A, S, C> {
    func: F,
    mode: CallMode,
    serializer: S,
    store: RefCell<C>,
    #[cfg(feature = "stats")]
    stats: Arc<CacheStats>,
    _args: PhantomData<fn(A) -> A>,
}

impl<F, A, S, C> Memoized<F, A, S, C> {
    /// Assembles a wrapper from its parts. Normally called by a
    /// [`CallStrategy`], not directly.
    pub fn new(func: F, mode: CallMode, serializer: S, store: C) -> Self {
        Self {
            func,
            mode,
            serializer,
            store: RefCell::new(store),
            #[cfg(feature = "stats")]
            stats: Arc::new(CacheStats::new()),
            _args: PhantomData,
        }
    }

    /// The dispatch mode fixed at wrap time.
    pub fn mode(&self) -> CallMode {
        self.mode
    }

    /// Shared access to the cache store, for inspection.
    pub fn cache(&self) -> Ref<'_, C> {
        self.store.borrow()
    }

    /// Exclusive access to the cache store. The core never evicts; callers
    /// in long-running processes use this to clear entries by hand.
    pub fn cache_mut(&self) -> RefMut<'_, C> {
        self.store.borrow_mut()
    }
}

#[cfg(feature = "stats")]
impl<F, A, S, C> Memoized<F, A, S, C> {
    /// Hit/miss counters for this wrapper.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Publishes this wrapper's counters in the process-wide
    /// [`stats_registry`](crate::stats_registry) under `name`.
    pub fn register_stats(&self, name: &str) {
        crate::stats_registry::register(name, Arc::clone(&self.stats));
    }
}

impl<F, A, S, C> Memoized<F, A, S, C>
where
    F: MemoFn<A>,
    A: CallArgs,
    S: KeySerializer,
    C: CacheStore<F::Output>,
    F::Output: Clone,
{
    /// Cache-or-compute. Returns the cached value for the derived key, or
    /// invokes the target once, stores the result and returns it.
    ///
    /// Fails only when the serializer cannot derive a key; the cache is
    /// left unmodified in that case. Errors from the target itself are not
    /// intercepted - a panicking target unwinds before anything is stored.
    pub fn try_call(&self, args: A) -> Result<F::Output, SerializationError> {
        let key = args.derive_key(self.mode, &self.serializer)?;

        {
            let store = self.store.borrow();
            if store.has(&key) {
                if let Some(hit) = store.get(&key) {
                    #[cfg(feature = "stats")]
                    self.stats.record_hit();
                    return Ok(hit);
                }
            }
        }

        #[cfg(feature = "stats")]
        self.stats.record_miss();

        let value = self.func.invoke(args);
        self.store.borrow_mut().set(key, value.clone());
        Ok(value)
    }

    /// Like [`try_call`](Memoized::try_call), panicking on key-derivation
    /// failure. Fine whenever the argument types serialize infallibly,
    /// which covers primitives and ordinary data structures.
    pub fn call(&self, args: A) -> F::Output {
        match self.try_call(args) {
            Ok(value) => value,
            Err(err) => panic!("memoized call failed: {err}"),
        }
    }
}

impl<F, A, S, C> Memoized<F, A, S, C> {
    /// Cache-or-compute for fallible targets: only `Ok` results enter the
    /// cache. An `Err` propagates to the caller and leaves the cache
    /// unmodified for that key, so the next identical call retries the
    /// computation instead of replaying the failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use memofn::memoize;
    ///
    /// let divide = memoize(|a: i32, b: i32| {
    ///     if b == 0 {
    ///         Err("division by zero".to_string())
    ///     } else {
    ///         Ok(a / b)
    ///     }
    /// });
    ///
    /// assert_eq!(divide.call_fallible((10, 2)), Ok(5));
    /// assert!(divide.call_fallible((1, 0)).is_err());
    /// ```
    pub fn try_call_fallible<T, E>(
        &self,
        args: A,
    ) -> Result<Result<T, E>, SerializationError>
    where
        F: MemoFn<A, Output = Result<T, E>>,
        A: CallArgs,
        S: KeySerializer,
        C: CacheStore<Result<T, E>>,
        T: Clone,
        E: Clone,
    {
        let key = args.derive_key(self.mode, &self.serializer)?;

        {
            let store = self.store.borrow();
            if store.has(&key) {
                if let Some(hit) = store.get(&key) {
                    #[cfg(feature = "stats")]
                    self.stats.record_hit();
                    return Ok(hit);
                }
            }
        }

        #[cfg(feature = "stats")]
        self.stats.record_miss();

        let value = self.func.invoke(args);
        if value.is_ok() {
            self.store.borrow_mut().set(key, value.clone());
        }
        Ok(value)
    }

    /// Like [`try_call_fallible`](Memoized::try_call_fallible), panicking
    /// on key-derivation failure.
    pub fn call_fallible<T, E>(&self, args: A) -> Result<T, E>
    where
        F: MemoFn<A, Output = Result<T, E>>,
        A: CallArgs,
        S: KeySerializer,
        C: CacheStore<Result<T, E>>,
        T: Clone,
        E: Clone,
    {
        match self.try_call_fallible(args) {
            Ok(value) => value,
            Err(err) => panic!("memoized call failed: {err}"),
        }
    }
}
