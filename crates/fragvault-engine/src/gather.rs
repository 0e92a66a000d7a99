//! Bounded-concurrency fail-fast gather for per-fragment operations
//!
//! Fragment operations are mutually independent, so they run as a task
//! set with at most `max_inflight` tasks live at once. The first error
//! stops scheduling; tasks already in flight drain before the error is
//! returned (no aborts mid-operation, no retries). Completion order is
//! arbitrary — results are restored to index order here.

use tokio::task::JoinSet;

use fragvault_core::{VaultError, VaultResult};

/// Run indexed jobs with bounded concurrency and return their results in
/// index order. Each job yields `(index, value)`; every index in
/// `0..total` must be produced exactly once.
pub(crate) async fn gather_indexed<T, F>(
    max_inflight: usize,
    total: usize,
    jobs: impl IntoIterator<Item = F>,
) -> VaultResult<Vec<T>>
where
    F: std::future::Future<Output = VaultResult<(u64, T)>> + Send + 'static,
    T: Send + 'static,
{
    let limit = max_inflight.max(1);
    let mut pending = jobs.into_iter();
    let mut tasks: JoinSet<VaultResult<(u64, T)>> = JoinSet::new();

    let mut slots: Vec<Option<T>> = Vec::with_capacity(total);
    slots.resize_with(total, || None);
    let mut first_error: Option<VaultError> = None;

    loop {
        while first_error.is_none() && tasks.len() < limit {
            match pending.next() {
                Some(job) => {
                    tasks.spawn(job);
                }
                None => break,
            }
        }

        match tasks.join_next().await {
            None => break,
            Some(Ok(Ok((index, value)))) => {
                match slots.get_mut(index as usize) {
                    Some(slot) if slot.is_none() => *slot = Some(value),
                    Some(_) => {
                        first_error.get_or_insert(VaultError::Format(format!(
                            "duplicate fragment index {index}"
                        )));
                    }
                    None => {
                        first_error.get_or_insert(VaultError::Format(format!(
                            "fragment index {index} out of range"
                        )));
                    }
                }
            }
            Some(Ok(Err(err))) => {
                // Later errors are dropped; only the first is reported.
                first_error.get_or_insert(err);
            }
            Some(Err(join_err)) => {
                first_error
                    .get_or_insert(anyhow::anyhow!("fragment task failed: {join_err}").into());
            }
        }
    }

    if let Some(err) = first_error {
        return Err(err);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| slot.ok_or(VaultError::MissingFragment(index as u64)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_results_in_index_order_despite_completion_order() {
        // Later indices finish first; output must still be ordered.
        let jobs = (0u64..8).map(|index| async move {
            tokio::time::sleep(Duration::from_millis(8 - index)).await;
            Ok((index, index * 10))
        });

        let results = gather_indexed(4, 8, jobs).await.unwrap();
        assert_eq!(results, vec![0, 10, 20, 30, 40, 50, 60, 70]);
    }

    #[tokio::test]
    async fn test_first_error_stops_scheduling() {
        let started = Arc::new(AtomicUsize::new(0));
        let jobs = (0u64..32)
            .map(|index| {
                let started = started.clone();
                async move {
                    started.fetch_add(1, Ordering::SeqCst);
                    if index == 0 {
                        Err(VaultError::Storage("boom".into()))
                    } else {
                        tokio::time::sleep(Duration::from_millis(5)).await;
                        Ok((index, ()))
                    }
                }
            })
            .collect::<Vec<_>>();

        let result = gather_indexed(2, 32, jobs).await;
        assert!(matches!(result, Err(VaultError::Storage(_))));
        // With concurrency 2, an early failure leaves most jobs unscheduled.
        assert!(started.load(Ordering::SeqCst) < 32);
    }

    #[tokio::test]
    async fn test_in_flight_jobs_drain_after_error() {
        let finished = Arc::new(AtomicUsize::new(0));
        let jobs = (0u64..4)
            .map(|index| {
                let finished = finished.clone();
                async move {
                    if index == 0 {
                        return Err(VaultError::Storage("boom".into()));
                    }
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    finished.fetch_add(1, Ordering::SeqCst);
                    Ok((index, ()))
                }
            })
            .collect::<Vec<_>>();

        let result = gather_indexed(4, 4, jobs).await;
        assert!(result.is_err());
        // Everything already spawned ran to completion.
        assert_eq!(finished.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let live = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let jobs = (0u64..16)
            .map(|index| {
                let live = live.clone();
                let peak = peak.clone();
                async move {
                    let now = live.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(2)).await;
                    live.fetch_sub(1, Ordering::SeqCst);
                    Ok((index, ()))
                }
            })
            .collect::<Vec<_>>();

        gather_indexed(3, 16, jobs).await.unwrap();
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_duplicate_index_rejected() {
        let jobs = (0..2).map(|_| async { Ok((0u64, ())) });
        let result = gather_indexed(2, 2, jobs).await;
        assert!(matches!(result, Err(VaultError::Format(_))));
    }

    #[tokio::test]
    async fn test_zero_jobs_zero_results() {
        let jobs: Vec<std::future::Ready<VaultResult<(u64, ())>>> = Vec::new();
        assert!(gather_indexed(4, 0, jobs).await.unwrap().is_empty());
    }
}
