pub mod listener;
pub mod telemetry;

pub use listener::{ListenerConfig, ListenerStats, TelemetryListener};
pub use telemetry::{parse_datagram, parse_line, ParseError, StampedRecord, TelemetryRecord};
