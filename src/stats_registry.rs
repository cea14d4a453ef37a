//! Process-wide registry of named cache statistics.
//!
//! Wrappers register their counters under a caller-chosen name (via
//! [`memoize_named`](crate::memoize_named) or
//! [`Memoized::register_stats`](crate::Memoized::register_stats)); the
//! registry then answers queries without needing access to the wrapper
//! itself. Registering a name again replaces the previous entry.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::stats::CacheStats;

static STATS_REGISTRY: Lazy<RwLock<HashMap<String, Arc<CacheStats>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Registers a wrapper's statistics under `name`, replacing any previous
/// registration with the same name.
pub fn register(name: &str, stats: Arc<CacheStats>) {
    let mut registry = STATS_REGISTRY.write();
    registry.insert(name.to_string(), stats);
}

/// Returns a snapshot of the statistics registered under `name`.
///
/// The snapshot is a clone; later cache activity does not change it.
///
/// # Examples
///
/// ```
/// use memofn::{memoize_named, stats_registry};
///
/// let triple = memoize_named("triple", |x: i32| x * 3);
/// triple.call((2,));
///
/// let stats = stats_registry::get("triple").unwrap();
/// assert_eq!(stats.misses(), 1);
/// assert!(stats_registry::get("no_such_wrapper").is_none());
/// ```
pub fn get(name: &str) -> Option<CacheStats> {
    let registry = STATS_REGISTRY.read();
    registry.get(name).map(|stats| (**stats).clone())
}

/// Returns a live handle to the statistics registered under `name`.
pub fn get_handle(name: &str) -> Option<Arc<CacheStats>> {
    let registry = STATS_REGISTRY.read();
    registry.get(name).map(Arc::clone)
}

/// Lists all registered names.
pub fn list() -> Vec<String> {
    let registry = STATS_REGISTRY.read();
    registry.keys().cloned().collect()
}

/// Removes every registration. Does not reset the statistics themselves;
/// wrappers keep counting on their own handles.
pub fn clear() {
    let mut registry = STATS_REGISTRY.write();
    registry.clear();
}

/// Resets the counters registered under `name`. Returns `false` when no
/// such registration exists.
pub fn reset(name: &str) -> bool {
    let registry = STATS_REGISTRY.read();
    if let Some(stats) = registry.get(name) {
        stats.reset();
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_register_and_get() {
        let stats = Arc::new(CacheStats::new());
        register("registry_test_fn", Arc::clone(&stats));

        stats.record_hit();

        let snapshot = get("registry_test_fn").unwrap();
        assert_eq!(snapshot.hits(), 1);
        assert_eq!(snapshot.misses(), 0);
    }

    #[test]
    #[serial]
    fn test_snapshot_is_detached() {
        let stats = Arc::new(CacheStats::new());
        register("registry_test_snapshot", Arc::clone(&stats));

        let snapshot = get("registry_test_snapshot").unwrap();
        stats.record_hit();

        assert_eq!(snapshot.hits(), 0);
        assert_eq!(get_handle("registry_test_snapshot").unwrap().hits(), 1);
    }

    #[test]
    #[serial]
    fn test_reregistering_replaces() {
        let first = Arc::new(CacheStats::new());
        first.record_hit();
        register("registry_test_replace", Arc::clone(&first));

        let second = Arc::new(CacheStats::new());
        register("registry_test_replace", Arc::clone(&second));

        assert_eq!(get("registry_test_replace").unwrap().hits(), 0);
    }

    #[test]
    #[serial]
    fn test_list_and_clear() {
        clear();

        register("registry_test_a", Arc::new(CacheStats::new()));
        register("registry_test_b", Arc::new(CacheStats::new()));

        let names = list();
        assert!(names.contains(&"registry_test_a".to_string()));
        assert!(names.contains(&"registry_test_b".to_string()));

        clear();
        assert!(list().is_empty());
    }

    #[test]
    #[serial]
    fn test_reset() {
        let stats = Arc::new(CacheStats::new());
        register("registry_test_reset", Arc::clone(&stats));
        stats.record_hit();
        stats.record_hit();

        assert!(reset("registry_test_reset"));
        assert_eq!(stats.hits(), 0);

        assert!(!reset("registry_test_nonexistent"));
    }
}
