//! Single-flight TTL cache for one TXT record.
//!
//! Every [`CoalescingEntry`] owns the last successful answer for its record and
//! at most one in-flight resolution. Callers that find the value missing or
//! stale while a resolution is running wait on that resolution instead of
//! starting their own; the first caller to find it missing starts one.
//!
//! The resolution runs in its own task so that it is bounded by the entry
//! timeout rather than by whichever caller happened to start it. Each waiter
//! can give up through its own [`CancellationToken`]; when the last waiter
//! leaves, the resolution is cancelled as well.

use crate::ports::TxtResolver;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};
use vpcinfo_domain::DomainError;

/// TXT values of one record, in record order.
pub type TxtValues = Arc<[String]>;

type Outcome = Result<TxtValues, DomainError>;
type OutcomeReceiver = watch::Receiver<Option<Outcome>>;

/// Counters of one cache entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Calls answered from a fresh cached value
    pub hits: u64,
    /// Underlying resolver invocations
    pub resolutions: u64,
    /// Calls that waited on a resolution started by another caller
    pub coalesced: u64,
    /// Resolutions that ended in an error (including cancellation)
    pub failures: u64,
}

#[derive(Default)]
struct CacheMetrics {
    hits: AtomicU64,
    resolutions: AtomicU64,
    coalesced: AtomicU64,
    failures: AtomicU64,
}

impl CacheMetrics {
    fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            resolutions: self.resolutions.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

struct Pending {
    cycle: u64,
    result: OutcomeReceiver,
    cancel: CancellationToken,
    waiters: usize,
}

struct EntryState {
    value: Option<TxtValues>,
    expires_at: Instant,
    pending: Option<Pending>,
    next_cycle: u64,
}

impl EntryState {
    fn fresh_value(&self, now: Instant) -> Option<TxtValues> {
        match &self.value {
            Some(value) if now < self.expires_at => Some(Arc::clone(value)),
            _ => None,
        }
    }
}

struct Shared {
    record: Arc<str>,
    resolver: Arc<dyn TxtResolver>,
    timeout: Duration,
    ttl: Duration,
    state: Mutex<EntryState>,
    metrics: CacheMetrics,
}

enum Join {
    /// Registered as a waiter of the current cycle.
    Wait { cycle: u64, result: OutcomeReceiver },
    /// The current cycle lost all its waiters and is being torn down.
    Drain { cycle: u64, result: OutcomeReceiver },
}

/// Coalescing TTL cache slot for one TXT record
///
/// Clones share the same slot.
#[derive(Clone)]
pub struct CoalescingEntry {
    shared: Arc<Shared>,
}

impl CoalescingEntry {
    pub fn new(
        record: impl Into<Arc<str>>,
        resolver: Arc<dyn TxtResolver>,
        timeout: Duration,
        ttl: Duration,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                record: record.into(),
                resolver,
                timeout,
                ttl,
                state: Mutex::new(EntryState {
                    value: None,
                    expires_at: Instant::now(),
                    pending: None,
                    next_cycle: 0,
                }),
                metrics: CacheMetrics::default(),
            }),
        }
    }

    pub fn record(&self) -> &str {
        &self.shared.record
    }

    pub fn stats(&self) -> CacheStats {
        self.shared.metrics.snapshot()
    }

    /// Returns the cached TXT values, resolving them first if they are
    /// missing or expired.
    ///
    /// Concurrent callers share one resolution. A caller whose `cancel`
    /// fires gets [`DomainError::Cancelled`] right away; the resolution keeps
    /// running for the remaining waiters. Failures are handed to everyone
    /// waiting on that cycle and are never cached.
    pub async fn get(&self, cancel: &CancellationToken) -> Result<TxtValues, DomainError> {
        loop {
            let join = {
                let mut state = self.shared.state.lock();

                if let Some(value) = state.fresh_value(Instant::now()) {
                    self.shared.metrics.hits.fetch_add(1, Ordering::Relaxed);
                    trace!(record = %self.shared.record, "Cache HIT");
                    return Ok(value);
                }

                if cancel.is_cancelled() {
                    return Err(DomainError::Cancelled);
                }

                match state.pending.as_mut() {
                    Some(pending) if pending.cancel.is_cancelled() => Join::Drain {
                        cycle: pending.cycle,
                        result: pending.result.clone(),
                    },
                    Some(pending) => {
                        pending.waiters += 1;
                        self.shared.metrics.coalesced.fetch_add(1, Ordering::Relaxed);
                        trace!(
                            record = %self.shared.record,
                            cycle = pending.cycle,
                            waiters = pending.waiters,
                            "Joining in-flight resolution"
                        );
                        Join::Wait {
                            cycle: pending.cycle,
                            result: pending.result.clone(),
                        }
                    }
                    None => {
                        let (cycle, result) = self.shared.start(&mut state);
                        Join::Wait { cycle, result }
                    }
                }
            };

            match join {
                Join::Wait { cycle, result } => {
                    let _guard = WaiterGuard {
                        shared: Arc::clone(&self.shared),
                        cycle,
                    };
                    return self.shared.wait(cycle, result, cancel).await;
                }
                Join::Drain { cycle, mut result } => {
                    trace!(
                        record = %self.shared.record,
                        cycle,
                        "Waiting for abandoned resolution to finish"
                    );
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(DomainError::Cancelled),
                        outcome = Shared::outcome(&mut result) => {
                            if outcome.is_none() {
                                self.shared.reset(cycle);
                            }
                        }
                    }
                }
            }
        }
    }
}

impl Shared {
    /// Opens a new refresh cycle with the caller as its first waiter.
    /// Must be called with the state lock held.
    fn start(self: &Arc<Self>, state: &mut EntryState) -> (u64, OutcomeReceiver) {
        let cycle = state.next_cycle;
        state.next_cycle += 1;

        let (tx, rx) = watch::channel(None);
        let cancel = CancellationToken::new();

        state.pending = Some(Pending {
            cycle,
            result: rx.clone(),
            cancel: cancel.clone(),
            waiters: 1,
        });
        self.metrics.resolutions.fetch_add(1, Ordering::Relaxed);

        debug!(record = %self.record, cycle, "Cache MISS, starting resolution");

        let shared = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = shared.resolve(&cancel).await;
            shared.complete(cycle, tx, outcome);
        });

        (cycle, rx)
    }

    async fn resolve(&self, cancel: &CancellationToken) -> Outcome {
        let resolution = tokio::time::timeout(self.timeout, self.resolver.resolve(&self.record, cancel));

        // Resolver first so it gets to observe the cancellation itself.
        tokio::select! {
            biased;
            resolved = resolution => match resolved {
                Ok(Ok(values)) => Ok(TxtValues::from(values)),
                Ok(Err(e)) => Err(e),
                Err(_) => Err(DomainError::ResolutionTimeout {
                    record: self.record.to_string(),
                    timeout_ms: self.timeout.as_millis() as u64,
                }),
            },
            _ = cancel.cancelled() => Err(DomainError::Cancelled),
        }
    }

    fn complete(&self, cycle: u64, tx: watch::Sender<Option<Outcome>>, outcome: Outcome) {
        let mut state = self.state.lock();

        match &outcome {
            Ok(values) => {
                state.value = Some(Arc::clone(values));
                state.expires_at = Instant::now() + self.ttl;
                debug!(
                    record = %self.record,
                    cycle,
                    values = values.len(),
                    ttl_ms = self.ttl.as_millis() as u64,
                    "Resolution cached"
                );
            }
            Err(DomainError::Cancelled) => {
                self.metrics.failures.fetch_add(1, Ordering::Relaxed);
                debug!(record = %self.record, cycle, "Resolution abandoned by all waiters");
            }
            Err(e) => {
                self.metrics.failures.fetch_add(1, Ordering::Relaxed);
                warn!(record = %self.record, cycle, error = %e, "Resolution failed");
            }
        }

        if state.pending.as_ref().is_some_and(|p| p.cycle == cycle) {
            state.pending = None;
        }

        tx.send_replace(Some(outcome));
    }

    async fn wait(
        &self,
        cycle: u64,
        mut result: OutcomeReceiver,
        cancel: &CancellationToken,
    ) -> Outcome {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                trace!(record = %self.record, cycle, "Waiter cancelled");
                Err(DomainError::Cancelled)
            }
            outcome = Self::outcome(&mut result) => match outcome {
                Some(outcome) => outcome,
                None => {
                    self.reset(cycle);
                    Err(DomainError::resolution(
                        self.record.to_string(),
                        "resolution task aborted",
                    ))
                }
            },
        }
    }

    /// `None` when the resolution task went away without reporting.
    async fn outcome(result: &mut OutcomeReceiver) -> Option<Outcome> {
        match result.wait_for(Option::is_some).await {
            Ok(outcome) => outcome.clone(),
            Err(_) => None,
        }
    }

    fn reset(&self, cycle: u64) {
        let mut state = self.state.lock();
        if state.pending.as_ref().is_some_and(|p| p.cycle == cycle) {
            warn!(record = %self.record, cycle, "Resolution task aborted, resetting entry");
            state.pending = None;
        }
    }
}

/// Keeps the waiter count of one cycle. Dropping the last guard of a cycle
/// that has not completed yet cancels its resolution.
struct WaiterGuard {
    shared: Arc<Shared>,
    cycle: u64,
}

impl Drop for WaiterGuard {
    fn drop(&mut self) {
        let mut state = self.shared.state.lock();
        let Some(pending) = state.pending.as_mut().filter(|p| p.cycle == self.cycle) else {
            return;
        };

        pending.waiters -= 1;
        if pending.waiters == 0 {
            debug!(
                record = %self.shared.record,
                cycle = self.cycle,
                "All waiters left, cancelling resolution"
            );
            pending.cancel.cancel();
        }
    }
}
