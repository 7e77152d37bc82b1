use std::time::Duration;

use chrono::{DateTime, Timelike, Utc};
use rand::Rng;

use super::RetryPolicy;

const MINUTE_MS: u64 = 60_000;

/// Time left until the next wall-clock minute boundary.
///
/// Exactly on a boundary this is a full minute: the current window has only
/// just opened and may already be exhausted by sibling callers.
pub fn until_next_minute(now: DateTime<Utc>) -> Duration {
    // subsec millis exceed 999 only inside a leap second
    let into_minute = u64::from(now.second()) * 1000 + u64::from(now.timestamp_subsec_millis().min(999));
    Duration::from_millis(MINUTE_MS - into_minute)
}

/// Uniform jitter in `[jitter_min, jitter_max)`, at millisecond resolution.
pub fn jitter<R: Rng + ?Sized>(policy: &RetryPolicy, rng: &mut R) -> Duration {
    let min = policy.jitter_min.as_millis() as u64;
    let max = policy.jitter_max.as_millis() as u64;
    if max <= min {
        return policy.jitter_min;
    }
    Duration::from_millis(rng.random_range(min..max))
}

pub fn retry_delay<R: Rng + ?Sized>(now: DateTime<Utc>, policy: &RetryPolicy, rng: &mut R) -> Duration {
    until_next_minute(now) + jitter(policy, rng)
}
