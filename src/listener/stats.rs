use std::fmt;

/// Per-process counters. Reported at shutdown, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenerStats {
    pub received: u64,
    pub logged: u64,
    pub rejected: u64,
    pub recv_errors: u64,
    pub write_errors: u64,
    pub low_heap_warnings: u64,
}

impl fmt::Display for ListenerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "received={} logged={} rejected={} recv_errors={} write_errors={} low_heap={}",
            self.received,
            self.logged,
            self.rejected,
            self.recv_errors,
            self.write_errors,
            self.low_heap_warnings
        )
    }
}
