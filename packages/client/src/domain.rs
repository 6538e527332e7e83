//! Reconnection policy.
//!
//! Pure functions so the policy can be tested without a network.

use crate::error::ClientError;

/// Maximum number of consecutive connection attempts.
pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Seconds to wait between connection attempts.
pub const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Whether another attempt should be made after `failed_attempts` consecutive failures.
pub fn should_attempt_reconnect(failed_attempts: u32, max_attempts: u32) -> bool {
    failed_attempts < max_attempts
}

/// Failure count after `error`, given the count before it.
///
/// A lost connection means the previous attempt succeeded, so counting restarts.
pub fn next_failure_count(error: &ClientError, failed_attempts: u32) -> u32 {
    match error {
        ClientError::ConnectionLost => 1,
        _ => failed_attempts + 1,
    }
}
