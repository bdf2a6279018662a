use std::num::ParseIntError;
use std::str::Utf8Error;

use thiserror::Error;

use super::record::TelemetryRecord;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),

    #[error("no KEY:VALUE fields in line {0:?}")]
    NoFields(String),

    #[error("invalid integer {value:?} for {key}: {source}")]
    InvalidInteger {
        key: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Raw (still textual) values collected from a line. Last occurrence wins.
#[derive(Default)]
struct RawFields<'a> {
    heap: Option<&'a str>,
    q1: Option<&'a str>,
    q2: Option<&'a str>,
    sem: Option<&'a str>,
    ev: Option<&'a str>,
}

/// A parsed line plus whether the sender actually reported `HEAP`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub record: TelemetryRecord,
    pub heap_reported: bool,
}

/// Decode a datagram payload and parse it as a telemetry line.
pub fn parse_datagram(payload: &[u8]) -> Result<TelemetryRecord, ParseError> {
    decode_datagram(payload).map(|parsed| parsed.record)
}

/// Like [`parse_datagram`], keeping track of which fields were present.
pub fn decode_datagram(payload: &[u8]) -> Result<ParsedLine, ParseError> {
    let text = std::str::from_utf8(payload)?;
    decode_line(text)
}

/// Parse one `HEAP:<int> Q1:<int> Q2:<int> SEM:<int> EV:<token>` line.
///
/// Tokens without a colon are skipped, unknown keys are ignored and a repeated
/// key keeps its last value. Numeric fields default to 0 and `EV` to `"0"`.
/// A line with no colon-delimited token at all is rejected.
pub fn parse_line(line: &str) -> Result<TelemetryRecord, ParseError> {
    decode_line(line).map(|parsed| parsed.record)
}

/// Like [`parse_line`], keeping track of which fields were present.
pub fn decode_line(line: &str) -> Result<ParsedLine, ParseError> {
    let line = line.trim();

    let mut raw = RawFields::default();
    let mut seen_field = false;

    for (key, value) in line.split_whitespace().filter_map(|t| t.split_once(':')) {
        seen_field = true;
        match key {
            "HEAP" => raw.heap = Some(value),
            "Q1" => raw.q1 = Some(value),
            "Q2" => raw.q2 = Some(value),
            "SEM" => raw.sem = Some(value),
            "EV" => raw.ev = Some(value),
            _ => {}
        }
    }

    if !seen_field {
        return Err(ParseError::NoFields(line.to_string()));
    }

    let record = TelemetryRecord {
        heap: parse_int("HEAP", raw.heap)?,
        q1: parse_int("Q1", raw.q1)?,
        q2: parse_int("Q2", raw.q2)?,
        sem: parse_int("SEM", raw.sem)?,
        ev: raw.ev.unwrap_or("0").to_string(),
    };

    Ok(ParsedLine {
        record,
        heap_reported: raw.heap.is_some(),
    })
}

fn parse_int(key: &'static str, value: Option<&str>) -> Result<i64, ParseError> {
    match value {
        None => Ok(0),
        Some(v) => v.parse().map_err(|source| ParseError::InvalidInteger {
            key,
            value: v.to_string(),
            source,
        }),
    }
}
