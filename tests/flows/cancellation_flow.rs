#[path = "../common/mod.rs"]
mod common;

use common::{registry, SlowResolver};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use vpcinfo_domain::DomainError;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_random_cancellations_never_poison_the_entry() {
    let resolver = SlowResolver::new(Duration::from_millis(30));
    let registry = registry(&resolver, Duration::from_secs(60));

    let handles = (0..200).map(|_| {
        let registry = Arc::clone(&registry);
        tokio::spawn(async move {
            let cancel = CancellationToken::new();
            let timer = cancel.clone();
            let after = Duration::from_millis(fastrand::u64(0..60));
            tokio::spawn(async move {
                tokio::time::sleep(after).await;
                timer.cancel();
            });
            registry.lookup_subnets(&cancel).await
        })
    });

    for joined in join_all(handles).await {
        match joined.unwrap() {
            Ok(subnets) => assert_eq!(subnets.len(), 3),
            Err(e) => assert_eq!(e, DomainError::Cancelled),
        }
    }

    let subnets = registry
        .lookup_subnets(&CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(
        subnets.to_string(),
        "10.0.0.0/16, 10.128.0.0/16, 2600:1f18:100::/56"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_everyone_leaving_cancels_then_recovers() {
    let resolver = SlowResolver::new(Duration::from_millis(100));
    let registry = registry(&resolver, Duration::from_secs(60));

    let cancel = CancellationToken::new();
    let handles = (0..20).map(|_| {
        let registry = Arc::clone(&registry);
        let cancel = cancel.clone();
        tokio::spawn(async move { registry.lookup_zone(&cancel).await })
    });

    let waiters = tokio::spawn(join_all(handles));
    tokio::time::sleep(Duration::from_millis(10)).await;
    cancel.cancel();

    for joined in waiters.await.unwrap() {
        assert_eq!(joined.unwrap().unwrap_err(), DomainError::Cancelled);
    }

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(resolver.calls(), 1);
    assert_eq!(resolver.cancelled(), 1);

    let zone = registry.lookup_zone(&CancellationToken::new()).await.unwrap();
    assert_eq!(zone.as_str(), "eu-west-1b");
    assert_eq!(resolver.calls(), 2);
}
