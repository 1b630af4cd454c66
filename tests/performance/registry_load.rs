#[path = "../common/mod.rs"]
mod common;

use common::{registry, SlowResolver};
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

// ============================================================================
// Load Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_cold_burst_resolves_each_record_once() {
    let resolver = SlowResolver::new(Duration::from_millis(20));
    let registry = registry(&resolver, Duration::from_secs(60));
    let cancel = CancellationToken::new();

    let handles = (0..1000).map(|i| {
        let registry = Arc::clone(&registry);
        let cancel = cancel.clone();
        tokio::spawn(async move {
            match i % 3 {
                0 => registry.lookup_subnets(&cancel).await.map(|s| s.to_string()),
                1 => registry.lookup_zone(&cancel).await.map(|z| z.to_string()),
                _ => registry.lookup_platform(&cancel).await.map(|p| p.to_string()),
            }
        })
    });

    for joined in join_all(handles).await {
        assert!(joined.unwrap().is_ok());
    }

    assert_eq!(resolver.calls(), 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore] // Slow test
async fn test_sustained_lookups_resolve_once_per_window() {
    let resolver = SlowResolver::new(Duration::from_millis(5));
    let ttl = Duration::from_millis(100);
    let registry = registry(&resolver, ttl);
    let duration = Duration::from_secs(2);

    let started = Instant::now();
    let workers = (0..16).map(|_| {
        let registry = Arc::clone(&registry);
        tokio::spawn(async move {
            let cancel = CancellationToken::new();
            let mut lookups = 0u64;
            while started.elapsed() < duration {
                registry.lookup_zone(&cancel).await.unwrap();
                lookups += 1;
                tokio::task::yield_now().await;
            }
            lookups
        })
    });

    let lookups: u64 = join_all(workers).await.into_iter().map(|r| r.unwrap()).sum();
    let windows = (duration.as_millis() / ttl.as_millis()) as usize;

    println!(
        "{} lookups, {} resolutions over {} windows",
        lookups,
        resolver.calls(),
        windows
    );

    assert!(resolver.calls() <= windows + 1);
}

#[tokio::test]
#[ignore] // Heavy test - run explicitly
async fn test_cached_lookup_latency() {
    let resolver = SlowResolver::new(Duration::from_millis(1));
    let registry = registry(&resolver, Duration::from_secs(60));
    let cancel = CancellationToken::new();

    registry.lookup_subnets(&cancel).await.unwrap();

    let iterations = 100_000;
    let start = Instant::now();
    for _ in 0..iterations {
        registry.lookup_subnets(&cancel).await.unwrap();
    }
    let elapsed = start.elapsed();

    println!(
        "{} cached lookups in {:?} ({:?}/lookup)",
        iterations,
        elapsed,
        elapsed / iterations
    );
    assert_eq!(resolver.calls(), 2);
}
