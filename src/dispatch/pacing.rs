//! Fixed-interval pacing gate.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Releases one permit per interval, bounding the rate at which new work
/// may start.
///
/// The first permit is granted immediately; each subsequent permit becomes
/// available one interval after the previous grant. Missed slots do not
/// accumulate: an acquire arriving late re-anchors the schedule at the
/// current time instead of releasing a burst of catch-up permits.
pub struct PacingGate {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl PacingGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Acquire the next start permit (may sleep).
    pub async fn acquire(&self) {
        let deadline = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let deadline = match *next {
                Some(slot) if slot > now => slot,
                _ => now,
            };
            *next = Some(deadline + self.interval);
            deadline
        };
        sleep_until(deadline).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_permit_is_immediate() {
        let gate = PacingGate::new(Duration::from_millis(500));
        let start = Instant::now();
        gate.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_permits_are_spaced_by_interval() {
        let interval = Duration::from_millis(500);
        let gate = PacingGate::new(interval);

        let start = Instant::now();
        for i in 0..4u32 {
            gate.acquire().await;
            assert_eq!(start.elapsed(), interval * i);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_acquire_does_not_burst() {
        let interval = Duration::from_millis(100);
        let gate = PacingGate::new(interval);

        gate.acquire().await;
        tokio::time::advance(Duration::from_secs(1)).await;

        // Ten slots were skipped while idle; the next two permits must still
        // be one interval apart rather than draining the backlog at once.
        let start = Instant::now();
        gate.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
        gate.acquire().await;
        assert_eq!(start.elapsed(), interval);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gate_is_shared_across_tasks() {
        use std::sync::Arc;

        let gate = Arc::new(PacingGate::new(Duration::from_millis(250)));
        let start = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..3 {
            let gate = Arc::clone(&gate);
            handles.push(tokio::spawn(async move {
                gate.acquire().await;
                start.elapsed()
            }));
        }

        let mut grants = Vec::new();
        for handle in handles {
            grants.push(handle.await.unwrap());
        }
        grants.sort();
        assert_eq!(
            grants,
            vec![
                Duration::ZERO,
                Duration::from_millis(250),
                Duration::from_millis(500)
            ]
        );
    }
}
