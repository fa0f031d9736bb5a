//! Wall-clock helpers.
//!
//! Expiration timestamps are persisted as absolute seconds since the Unix
//! epoch (u32, 0 = no expiry), so unlike an in-memory cache we cannot use a
//! process-local monotonic clock here.

use std::time::{SystemTime, UNIX_EPOCH};

/// Sentinel value meaning "no expiry".
pub const NO_EXPIRY: u32 = 0;

/// Current time in whole seconds since the Unix epoch.
#[inline]
pub fn now_seconds() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0)
}

/// Returns true if the given expiry timestamp has passed.
#[inline]
pub fn is_expired(timestamp: u32, now: u32) -> bool {
    timestamp != NO_EXPIRY && timestamp <= now
}

/// Converts a relative TTL in seconds to an absolute deadline, saturating
/// at the end of the u32 epoch.
#[inline]
pub fn deadline(ttl: i64) -> u32 {
    now_seconds().saturating_add(u32::try_from(ttl).unwrap_or(u32::MAX))
}

/// Remaining TTL in seconds for the Redis TTL command: -1 when the key has
/// no expiry, otherwise the (non-negative) number of seconds left.
#[inline]
pub fn remaining_seconds(timestamp: u32) -> i64 {
    if timestamp == NO_EXPIRY {
        return -1;
    }
    let now = now_seconds();
    if timestamp > now {
        i64::from(timestamp - now)
    } else {
        -1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_never_expires() {
        assert!(!is_expired(NO_EXPIRY, u32::MAX));
    }

    #[test]
    fn past_deadline_is_expired() {
        let now = now_seconds();
        assert!(is_expired(now - 1, now));
        assert!(is_expired(now, now));
        assert!(!is_expired(now + 10, now));
    }

    #[test]
    fn remaining_is_signed() {
        assert_eq!(remaining_seconds(NO_EXPIRY), -1);
        let future = now_seconds() + 100;
        let left = remaining_seconds(future);
        assert!((98..=100).contains(&left));
    }
}
