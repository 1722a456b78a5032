//! Monotonic event timestamps.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Hands out strictly increasing timestamps at microsecond resolution.
///
/// Wall-clock time is used when it moves forward; otherwise the previous
/// value plus one microsecond. Lock-free, so concurrent writers never block.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last_micros: AtomicI64,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next timestamp, never equal to or earlier than a previous one.
    pub fn now(&self) -> DateTime<Utc> {
        let wall = Utc::now().timestamp_micros();
        let mut prev = self.last_micros.load(Ordering::Relaxed);
        loop {
            let next = wall.max(prev + 1);
            match self.last_micros.compare_exchange_weak(
                prev,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return micros_to_datetime(next),
                Err(actual) => prev = actual,
            }
        }
    }
}

/// Converts microseconds since the epoch to a UTC datetime.
pub fn micros_to_datetime(micros: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(micros).unwrap_or(DateTime::<Utc>::MIN_UTC)
}
