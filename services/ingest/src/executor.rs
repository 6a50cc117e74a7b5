use std::future::Future;
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

/// Run `f` over every item with at most `concurrency` futures in flight.
///
/// Every item runs to completion: a failure is recorded in its slot and never
/// cancels siblings. Results come back in input order once all items have joined.
pub async fn run_bounded<T, R, E, F, Fut>(
    items: Vec<T>,
    concurrency: usize,
    f: F,
) -> Vec<Result<R, E>>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    let total = items.len();
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = FuturesUnordered::new();

    for (idx, item) in items.into_iter().enumerate() {
        let semaphore = semaphore.clone();
        let work = f(item);
        tasks.push(async move {
            // the semaphore is local and never closed
            let _permit = semaphore.acquire().await.ok();
            (idx, work.await)
        });
    }

    let mut slots: Vec<Option<Result<R, E>>> = (0..total).map(|_| None).collect();
    while let Some((idx, result)) = tasks.next().await {
        slots[idx] = Some(result);
    }

    slots.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn preserves_input_order() {
        let results = run_bounded(vec![30u64, 10, 20], 3, |ms| async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok::<_, String>(ms)
        })
        .await;

        let values: Vec<u64> = results.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(values, vec![30, 10, 20]);
    }

    #[tokio::test]
    async fn never_exceeds_concurrency() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let results = run_bounded((0..25).collect::<Vec<u32>>(), 4, |_| {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, String>(())
            }
        })
        .await;

        assert_eq!(results.len(), 25);
        assert!(peak.load(Ordering::SeqCst) <= 4);
        assert!(peak.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn failure_does_not_cancel_slower_siblings() {
        let finished = Arc::new(AtomicUsize::new(0));

        let results = run_bounded(vec![0u64, 50, 50], 3, |ms| {
            let finished = finished.clone();
            async move {
                if ms == 0 {
                    return Err("boom".to_string());
                }
                tokio::time::sleep(Duration::from_millis(ms)).await;
                finished.fetch_add(1, Ordering::SeqCst);
                Ok(ms)
            }
        })
        .await;

        assert!(results[0].is_err());
        assert!(results[1].is_ok() && results[2].is_ok());
        assert_eq!(finished.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_input_yields_nothing() {
        let results = run_bounded(Vec::<u8>::new(), 10, |_| async { Ok::<_, ()>(()) }).await;
        assert!(results.is_empty());
    }
}
