use std::time::{SystemTime, UNIX_EPOCH};

/// One decoded snapshot from the embedded sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryRecord {
    /// Free heap in bytes.
    pub heap: i64,
    pub q1: i64,
    pub q2: i64,
    /// Semaphore count.
    pub sem: i64,
    /// Event bitmask, verbatim (the sender uses `0x%08lx`).
    pub ev: String,
}

impl Default for TelemetryRecord {
    fn default() -> Self {
        Self {
            heap: 0,
            q1: 0,
            q2: 0,
            sem: 0,
            ev: "0".to_string(),
        }
    }
}

/// A record paired with the time it was received (unix seconds).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampedRecord {
    pub timestamp: u64,
    pub record: TelemetryRecord,
}

impl StampedRecord {
    pub fn new(timestamp: u64, record: TelemetryRecord) -> Self {
        Self { timestamp, record }
    }
}

/// Seconds since the unix epoch. A clock set before 1970 reads as 0.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
