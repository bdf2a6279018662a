use std::fs;
use std::io::Write;

use rtos_telemetry::telemetry::{CsvLog, StampedRecord, TelemetryRecord};

fn sample(heap: i64, ev: &str) -> TelemetryRecord {
    TelemetryRecord {
        heap,
        q1: 3,
        q2: 0,
        sem: 1,
        ev: ev.to_string(),
    }
}

#[test]
fn test_header_and_row_layout() {
    let mut log = CsvLog::new(Vec::new(), true).expect("in-memory log");
    log.append(&StampedRecord::new(1700000000, sample(45213, "0x00000002")))
        .expect("append");

    let text = String::from_utf8(log.into_inner()).unwrap();
    assert_eq!(
        text,
        "timestamp,heap,q1,q2,sem,ev\r\n1700000000,45213,3,0,1,0x00000002\r\n"
    );
}

#[test]
fn test_special_characters_quoted() {
    let mut log = CsvLog::new(Vec::new(), false).unwrap();
    log.append(&StampedRecord::new(1, sample(1, "a,\"b\""))).unwrap();

    let text = String::from_utf8(log.into_inner()).unwrap();
    assert_eq!(text, "1,1,3,0,1,\"a,\"\"b\"\"\"\r\n");
}

#[test]
fn test_same_record_appended_n_times() {
    let mut log = CsvLog::new(Vec::new(), false).unwrap();
    for ts in 0..3 {
        log.append(&StampedRecord::new(100 + ts, sample(1000, "0"))).unwrap();
    }
    assert_eq!(log.rows_written(), 3);

    let text = String::from_utf8(log.into_inner()).unwrap();
    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(rows, vec!["100,1000,3,0,1,0", "101,1000,3,0,1,0", "102,1000,3,0,1,0"]);
}

#[test]
fn test_open_new_file_writes_header_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.csv");

    // 1. First run creates the file with a header
    {
        let mut log = CsvLog::open(&path).unwrap();
        log.append(&StampedRecord::new(10, sample(1, "0"))).unwrap();
    }

    // 2. Restart appends without a second header
    {
        let mut log = CsvLog::open(&path).unwrap();
        log.append(&StampedRecord::new(11, sample(2, "0"))).unwrap();
    }

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.matches("timestamp,heap").count(), 1, "Header must not repeat: {}", text);
    assert_eq!(text.lines().count(), 3);
    assert!(text.ends_with("11,2,3,0,1,0\r\n"));
}

#[test]
fn test_open_preserves_existing_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.csv");
    {
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(b"timestamp,heap,q1,q2,sem,ev\r\n5,5,5,5,5,5\r\n").unwrap();
    }

    let mut log = CsvLog::open(&path).unwrap();
    log.append(&StampedRecord::new(6, sample(6, "0x6"))).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text, "timestamp,heap,q1,q2,sem,ev\r\n5,5,5,5,5,5\r\n6,6,3,0,1,0x6\r\n");
}

#[test]
fn test_row_flushed_without_drop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flush.csv");

    let mut log = CsvLog::open(&path).unwrap();
    log.append(&StampedRecord::new(42, sample(7, "0"))).unwrap();

    // Log still open: row must already be on disk.
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("42,7,3,0,1,0"), "Row not flushed: {:?}", text);
    drop(log);
}

// Accepts `budget` bytes, fails the next write call, then works normally.
struct ShortWriter {
    out: Vec<u8>,
    budget: Option<usize>,
}

impl Write for ShortWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.budget {
            Some(0) => {
                self.budget = None;
                Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
            }
            Some(n) => {
                let take = n.min(buf.len());
                self.out.extend_from_slice(&buf[..take]);
                self.budget = Some(n - take);
                Ok(take)
            }
            None => {
                self.out.extend_from_slice(buf);
                Ok(buf.len())
            }
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_partial_row_not_joined_to_next() {
    let writer = ShortWriter { out: Vec::new(), budget: Some(4) };
    let mut log = CsvLog::new(writer, false).unwrap();

    // 1. Row is cut after "1,1," and the append fails
    assert!(log.append(&StampedRecord::new(1, sample(1, "0"))).is_err());
    assert_eq!(log.rows_written(), 0);

    // 2. Next row starts on its own line
    log.append(&StampedRecord::new(2, sample(2, "0"))).unwrap();
    assert_eq!(log.rows_written(), 1);

    let text = String::from_utf8(log.into_inner().out).unwrap();
    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(rows, vec!["1,1,", "2,2,3,0,1,0"]);
}
