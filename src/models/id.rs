//! Record id generation

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use uuid::Uuid;

/// Per-process generator of practically-unique record ids.
///
/// Ids have the form `<salt>-<millis>-<counter>` where the salt is a short
/// random prefix fixed at construction, the middle part is the capture time
/// in milliseconds and the counter increments per call. Uniqueness is a
/// convenience for correlating records across files, not a global guarantee.
#[derive(Debug)]
pub struct HrrsIdGenerator {
    salt: String,
    counter: AtomicU64,
}

impl HrrsIdGenerator {
    pub const DEFAULT_SALT_LENGTH: usize = 4;

    pub fn new() -> Self {
        Self::with_salt_length(Self::DEFAULT_SALT_LENGTH)
    }

    /// Create a generator whose random salt prefix has the given length
    pub fn with_salt_length(salt_length: usize) -> Self {
        let salt: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(salt_length)
            .collect();
        Self {
            salt,
            counter: AtomicU64::new(0),
        }
    }

    /// Produce the next id
    pub fn next(&self) -> String {
        let millis = Utc::now().timestamp_millis();
        let count = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{:x}-{:x}", self.salt, millis, count)
    }
}

impl Default for HrrsIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
