//! Latest-wins throttling for high-frequency input.
//!
//! A [`Throttle`] accepts samples at any rate but releases at most one per
//! interval. Samples arriving inside the quiet period replace the pending
//! one rather than queueing behind it — only the most recent value
//! matters, which is exactly the behavior wanted for drag-move visual
//! feedback: intermediate pointer positions between ticks carry no
//! information once a newer one exists.

use std::time::{Duration, Instant};

/// A fixed-interval, latest-wins sampler.
///
/// ```
/// use std::time::{Duration, Instant};
/// use treeline_core::Throttle;
///
/// let mut throttle = Throttle::new(Duration::from_millis(40));
/// let start = Instant::now();
///
/// // The first sample fires immediately.
/// assert_eq!(throttle.submit_at(1, start), Some(1));
/// // Samples inside the interval are held; newer replaces older.
/// assert_eq!(throttle.submit_at(2, start + Duration::from_millis(10)), None);
/// assert_eq!(throttle.submit_at(3, start + Duration::from_millis(20)), None);
/// // Once the interval elapses, only the latest value is released.
/// assert_eq!(throttle.poll(start + Duration::from_millis(40)), Some(3));
/// ```
#[derive(Debug)]
pub struct Throttle<T> {
    interval: Duration,
    last_fire: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    /// Creates a throttle that releases at most one sample per `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fire: None,
            pending: None,
        }
    }

    /// Returns the configured interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Submits a sample, using the current time as the timestamp.
    ///
    /// Returns `Some(sample)` if the sample is released now, `None` if it
    /// is held as the pending value for a later [`poll`](Self::poll).
    pub fn submit(&mut self, sample: T) -> Option<T> {
        self.submit_at(sample, Instant::now())
    }

    /// Submits a sample with an explicit timestamp.
    ///
    /// A sample submitted while a previous one is still pending replaces
    /// it; the superseded value is dropped, never queued.
    pub fn submit_at(&mut self, sample: T, now: Instant) -> Option<T> {
        self.pending = Some(sample);
        self.poll(now)
    }

    /// Releases the pending sample if the interval has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        self.pending.as_ref()?;

        let due = match self.last_fire {
            None => true,
            Some(last) => now.duration_since(last) >= self.interval,
        };
        if !due {
            return None;
        }

        self.last_fire = Some(now);
        self.pending.take()
    }

    /// Returns `true` if a sample is waiting for the next interval.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Discards any pending sample and forgets the firing history.
    pub fn reset(&mut self) {
        self.last_fire = None;
        self.pending = None;
    }
}
