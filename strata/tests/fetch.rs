//! Full-miss computation tests.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use common::{MockRemote, User, ada, encoded, make_cache};
use strata::{ArgKind, Error, FlushScope, Payload, Producer, RemoteBackend, SignatureError, args};

fn counting_producer(calls: Arc<AtomicUsize>) -> Producer<User> {
    Producer::new("load_user", [ArgKind::Int], move |args| {
        let calls = Arc::clone(&calls);
        Box::pin(async move {
            calls.fetch_add(1, Ordering::SeqCst);
            let id = args[0].as_i64().ok_or("id must be an integer")?;
            Ok(Some(User {
                id,
                name: "Ada".into(),
            }))
        })
    })
}

#[tokio::test]
async fn computes_once_and_writes_through() {
    let remote = MockRemote::new();
    let cache = make_cache(remote.clone());
    let calls = Arc::new(AtomicUsize::new(0));
    let producer = counting_producer(Arc::clone(&calls));

    let user = cache
        .fetch_or_compute("user:42", &producer, args![42])
        .await
        .unwrap();
    assert_eq!(user, Some(ada()));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Written through the remote tier.
    assert_eq!(remote.entry("user:42"), Some(encoded(&ada())));

    // Subsequent resolves serve the value without another producer call.
    let user: Option<User> = cache.resolve("user:42").await.unwrap();
    assert_eq!(user, Some(ada()));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.stats().producer_invocations, 1);
}

#[tokio::test]
async fn empty_outcome_is_negative_cached() {
    let remote = MockRemote::new();
    let cache = make_cache(remote.clone());
    let calls = Arc::new(AtomicUsize::new(0));
    let missing = {
        let calls = Arc::clone(&calls);
        Producer::<User>::new("load_missing", [ArgKind::Int], move |_args| {
            let calls = Arc::clone(&calls);
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            })
        })
    };

    let user = cache
        .fetch_or_compute("user:410", &missing, args![410])
        .await
        .unwrap();
    assert_eq!(user, None);
    assert_eq!(remote.entry("user:410"), Some(Payload::Negative));

    // The marker short-circuits both read and compute paths.
    let user: Option<User> = cache.resolve("user:410").await.unwrap();
    assert_eq!(user, None);
    let user = cache
        .fetch_or_compute("user:410", &missing, args![410])
        .await
        .unwrap();
    assert_eq!(user, None);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn argument_kind_mismatch_skips_producer_and_tiers() {
    let remote = MockRemote::new();
    let cache = make_cache(remote.clone());
    let calls = Arc::new(AtomicUsize::new(0));
    let producer = counting_producer(Arc::clone(&calls));

    let err = cache
        .fetch_or_compute("user:42", &producer, args!["42"])
        .await
        .unwrap_err();
    match err {
        Error::Signature(SignatureError::ArgumentType {
            producer,
            position,
            expected,
            got,
        }) => {
            assert_eq!(producer, "load_user");
            assert_eq!(position, 0);
            assert_eq!(expected, ArgKind::Int);
            assert_eq!(got, ArgKind::Str);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(remote.get_count(), 0);
    assert_eq!(remote.set_count(), 0);
}

#[tokio::test]
async fn arity_mismatch_skips_producer_and_tiers() {
    let remote = MockRemote::new();
    let cache = make_cache(remote.clone());
    let calls = Arc::new(AtomicUsize::new(0));
    let producer = counting_producer(Arc::clone(&calls));

    let err = cache
        .fetch_or_compute("user:42", &producer, args![42, true])
        .await
        .unwrap_err();
    assert!(
        err.to_string()
            .contains("expected 1 argument(s), got 2 while calling producer `load_user`")
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(remote.set_count(), 0);
}

#[tokio::test]
async fn producer_error_propagates_and_caches_nothing() {
    let remote = MockRemote::new();
    let cache = make_cache(remote.clone());
    let calls = Arc::new(AtomicUsize::new(0));
    let failing = {
        let calls = Arc::clone(&calls);
        Producer::<User>::new("load_user", [ArgKind::Int], move |_args| {
            let calls = Arc::clone(&calls);
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("db down".into())
            })
        })
    };

    let err = cache
        .fetch_or_compute("user:42", &failing, args![42])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Producer(_)));
    assert_eq!(err.to_string(), "db down");
    assert_eq!(remote.set_count(), 0);

    // Failures are never cached: the next attempt runs the producer again.
    let _ = cache
        .fetch_or_compute("user:42", &failing, args![42])
        .await
        .unwrap_err();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn offline_remote_still_computes_and_serves() {
    let remote = MockRemote::offline();
    let cache = make_cache(remote.clone());
    let calls = Arc::new(AtomicUsize::new(0));
    let producer = counting_producer(Arc::clone(&calls));

    let user = cache
        .fetch_or_compute("user:42", &producer, args![42])
        .await
        .unwrap();
    assert_eq!(user, Some(ada()));

    // The remote write was attempted and failed silently.
    assert_eq!(remote.set_count(), 1);
    assert_eq!(remote.entry_count(), 0);

    // The in-process tier alone serves the value from here on.
    let user: Option<User> = cache.resolve("user:42").await.unwrap();
    assert_eq!(user, Some(ada()));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_full_misses_share_one_producer_run() {
    let cache = make_cache(MockRemote::new());
    let calls = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let cache = cache.clone();
        let calls = Arc::clone(&calls);
        handles.push(tokio::spawn(async move {
            cache
                .fetch_or_else("user:42", || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Ok(Some(ada()))
                })
                .await
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), Some(ada()));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn fetch_or_else_value_and_error_paths() {
    let remote = MockRemote::new();
    let cache = make_cache(remote.clone());

    let user = cache
        .fetch_or_else("user:42", || async { Ok(Some(ada())) })
        .await
        .unwrap();
    assert_eq!(user, Some(ada()));
    assert_eq!(remote.entry("user:42"), Some(encoded(&ada())));

    let err = cache
        .fetch_or_else::<User, _, _>("user:503", || async { Err("backend exploded".into()) })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "backend exploded");
    assert_eq!(remote.entry("user:503"), None);
}

#[tokio::test]
async fn insert_writes_through_both_tiers() {
    let remote = MockRemote::new();
    let cache = make_cache(remote.clone());

    cache.insert("user:42", &ada()).await.unwrap();
    assert_eq!(remote.entry("user:42"), Some(encoded(&ada())));

    // Served straight from the in-process tier: no remote lookup happens.
    let user: Option<User> = cache.resolve("user:42").await.unwrap();
    assert_eq!(user, Some(ada()));
    assert_eq!(remote.get_count(), 0);
}

#[tokio::test]
async fn remove_deletes_from_both_tiers() {
    let remote = MockRemote::new();
    let cache = make_cache(remote.clone());

    cache.insert("user:42", &ada()).await.unwrap();
    cache.remove("user:42").await;

    assert_eq!(remote.entry("user:42"), None);
    let user: Option<User> = cache.resolve("user:42").await.unwrap();
    assert_eq!(user, None);
}

#[tokio::test]
async fn flush_clears_the_remote_tier() {
    let remote = MockRemote::new();
    remote.seed("user:42", encoded(&ada()));
    remote.seed("user:43", Payload::Negative);
    let cache = make_cache(remote.clone());

    cache
        .remote()
        .flush(FlushScope::Current)
        .await
        .unwrap();
    assert_eq!(remote.entry_count(), 0);
}
