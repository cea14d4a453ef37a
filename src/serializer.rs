use serde::Serialize;
use thiserror::Error;

use crate::keys::CacheKey;

/// Raised when a cache key cannot be derived from the call arguments.
///
/// The wrapped call that triggered serialization fails synchronously with
/// this error and the cache is left unmodified. The error carries the
/// underlying serializer failure as its source.
#[derive(Debug, Error)]
#[error("cache key serialization failed: {source}")]
pub struct SerializationError {
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl SerializationError {
    /// Wraps an arbitrary serializer failure. Custom [`KeySerializer`]
    /// implementations use this to surface their own error types.
    pub fn new<E>(source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self {
            source: source.into(),
        }
    }
}

impl From<serde_json::Error> for SerializationError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err)
    }
}

/// Renders an ordered argument sequence into a stable cache key.
///
/// The serializer receives the full argument tuple (a one-element tuple on
/// the single-argument path) and must be deterministic: structurally equal,
/// order-equal argument lists produce identical keys, distinct ones produce
/// distinct keys with overwhelming probability. A deliberate many-to-one
/// mapping (for example a constant key) is valid and collapses all inputs
/// onto one cache entry.
///
/// Any type with this trait can replace the default through
/// [`MemoizeBuilder::serializer`](crate::MemoizeBuilder::serializer).
pub trait KeySerializer {
    fn serialize<A>(&self, args: &A) -> Result<CacheKey, SerializationError>
    where
        A: Serialize + ?Sized;
}

/// Default serializer: canonical JSON rendering of the argument sequence.
///
/// Argument tuples serialize as JSON arrays, so `(1, "a")` keys as
/// `[1,"a"]`. Arguments that JSON cannot represent (for example maps with
/// non-string keys) fail with [`SerializationError`]; supply a custom
/// serializer for such argument types. Note that iteration order of
/// unordered maps is not canonical, so `HashMap` arguments should use an
/// ordered map type or a custom serializer instead.
///
/// # Examples
///
/// ```
/// use memofn::{CacheKey, JsonKeySerializer, KeySerializer};
///
/// let key = JsonKeySerializer.serialize(&(1, "a")).unwrap();
/// assert_eq!(key, CacheKey::Serialized("[1,\"a\"]".to_string()));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonKeySerializer;

impl KeySerializer for JsonKeySerializer {
    fn serialize<A>(&self, args: &A) -> Result<CacheKey, SerializationError>
    where
        A: Serialize + ?Sized,
    {
        let rendered = serde_json::to_string(args)?;
        Ok(CacheKey::Serialized(rendered))
    }
}
