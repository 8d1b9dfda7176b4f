// src/services/pool.rs

//! Bounded-concurrency worker pool.
//!
//! Each traversal level composes one pool: a limit plus a unit-of-work
//! function. At most `limit` units are in flight at once and `run` returns
//! only after every unit has finished, which is the join barrier a parent
//! needs before finalizing its own work.

use std::future::Future;

use futures::stream::{self, StreamExt};

/// Runs units of work with at most `limit` in flight.
#[derive(Debug, Clone, Copy)]
pub struct BoundedPool {
    limit: usize,
}

impl BoundedPool {
    /// A zero limit is raised to one.
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Run `work` over every item and collect the outputs in completion order.
    pub async fn run<I, F, Fut>(&self, items: I, work: F) -> Vec<Fut::Output>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> Fut,
        Fut: Future,
    {
        stream::iter(items)
            .map(work)
            .buffer_unordered(self.limit)
            .collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_in_flight_never_exceeds_limit() {
        let pool = BoundedPool::new(3);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let outputs = pool
            .run(0..12, |i| {
                let in_flight = Arc::clone(&in_flight);
                let peak = Arc::clone(&peak);
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    i * 2
                }
            })
            .await;

        assert_eq!(outputs.len(), 12);
        assert_eq!(peak.load(Ordering::SeqCst), 3);
        let mut sorted = outputs;
        sorted.sort();
        assert_eq!(sorted, (0..12).map(|i| i * 2).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_zero_limit_still_runs() {
        let pool = BoundedPool::new(0);
        assert_eq!(pool.limit(), 1);
        let outputs = pool.run(vec!["a", "b"], |s| async move { s.len() }).await;
        assert_eq!(outputs, vec![1, 1]);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let outputs: Vec<()> = BoundedPool::new(4)
            .run(Vec::<u8>::new(), |_| async {})
            .await;
        assert!(outputs.is_empty());
    }
}
