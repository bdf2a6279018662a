//! Telemetry decoding and storage.
//!
//! # WIRE FORMAT
//! One datagram carries one line of whitespace-separated `KEY:VALUE` tokens,
//! e.g. `HEAP:45213 Q1:3 Q2:0 SEM:1 EV:0x00000002`. Order is irrelevant and
//! every field is optional.
//!
//! # STORAGE INVARIANT
//! The CSV log is **append-only**. Rows are flushed one at a time, so a crash
//! loses at most the record being written.

pub mod log;
pub mod parser;
pub mod record;

pub use log::{CsvLog, CSV_HEADER};
pub use parser::{
    decode_datagram, decode_line, parse_datagram, parse_line, ParseError, ParsedLine,
};
pub use record::{StampedRecord, TelemetryRecord};
