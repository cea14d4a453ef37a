#![cfg(feature = "stats")]

use memofn::{memoize, memoize_named, stats_registry};
use serial_test::serial;

#[test]
fn test_wrapper_counts_hits_and_misses() {
    let double = memoize(|x: i32| x * 2);

    double.call((1,));
    double.call((1,));
    double.call((2,));

    assert_eq!(double.stats().misses(), 2);
    assert_eq!(double.stats().hits(), 1);
    assert!((double.stats().hit_rate() - 1.0 / 3.0).abs() < 0.001);
}

#[test]
fn test_fallible_error_counts_as_miss() {
    let flaky = memoize(|x: i32| {
        if x < 0 {
            Err("negative")
        } else {
            Ok(x)
        }
    });

    assert!(flaky.call_fallible((-1,)).is_err());
    assert!(flaky.call_fallible((-1,)).is_err());

    // Errors are never cached, so both calls are misses.
    assert_eq!(flaky.stats().misses(), 2);
    assert_eq!(flaky.stats().hits(), 0);
}

#[test]
fn test_failed_key_derivation_records_nothing() {
    use memofn::DefaultArgKey;
    use serde::{Serialize, Serializer};

    struct Opaque;

    impl Serialize for Opaque {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("opaque value"))
        }
    }

    impl DefaultArgKey for Opaque {}

    let wrapped = memoize(|_o: Opaque| 1);
    assert!(wrapped.try_call((Opaque,)).is_err());

    assert_eq!(wrapped.stats().total_accesses(), 0);
}

#[test]
#[serial]
fn test_named_wrapper_appears_in_registry() {
    let add = memoize_named("stats_tests_add", |a: u64, b: u64| a + b);

    add.call((1, 2));
    add.call((1, 2));

    let stats = stats_registry::get("stats_tests_add").unwrap();
    assert_eq!(stats.misses(), 1);
    assert_eq!(stats.hits(), 1);
    assert!(stats_registry::list().contains(&"stats_tests_add".to_string()));
}

#[test]
#[serial]
fn test_registry_handle_tracks_live_counters() {
    let square = memoize_named("stats_tests_square", |x: i64| x * x);
    square.call((3,));

    let handle = stats_registry::get_handle("stats_tests_square").unwrap();
    assert_eq!(handle.misses(), 1);

    square.call((3,));
    assert_eq!(handle.hits(), 1);
}

#[test]
#[serial]
fn test_registry_reset_zeroes_wrapper_counters() {
    let ident = memoize_named("stats_tests_ident", |x: i32| x);
    ident.call((1,));

    assert!(stats_registry::reset("stats_tests_ident"));
    assert_eq!(ident.stats().total_accesses(), 0);

    assert!(!stats_registry::reset("stats_tests_missing"));
}

#[test]
#[serial]
fn test_manual_registration() {
    let triple = memoize(|x: i32| x * 3);
    triple.register_stats("stats_tests_triple");
    triple.call((2,));

    assert_eq!(stats_registry::get("stats_tests_triple").unwrap().misses(), 1);
}
