use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::Path;

use tracing::debug;

use super::record::StampedRecord;

pub const CSV_HEADER: [&str; 6] = ["timestamp", "heap", "q1", "q2", "sem", "ev"];

const LINE_TERMINATOR: &str = "\r\n";

/// Append-only CSV sink. Every row is flushed before `append` returns.
///
/// Rows are rendered in memory and handed to the writer whole, so nothing is
/// left buffered after a failed append. If a failure leaves a partial row on
/// the writer, the next append terminates that fragment first.
#[derive(Debug)]
pub struct CsvLog<W: Write> {
    writer: W,
    rows: u64,
    torn: bool,
}

impl CsvLog<File> {
    /// Open (or create) `path` in append mode.
    ///
    /// The header is written only when the file is empty, so restarts do not
    /// stack duplicate headers in the middle of the log.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let is_empty = file.metadata()?.len() == 0;
        debug!("Opened {} (empty: {})", path.display(), is_empty);
        Self::new(file, is_empty)
    }
}

impl<W: Write> CsvLog<W> {
    /// Wrap `writer`, emitting the header row first when asked.
    pub fn new(writer: W, write_header: bool) -> io::Result<Self> {
        let mut log = Self {
            writer,
            rows: 0,
            torn: false,
        };
        if write_header {
            log.write_line(&render_row(&CSV_HEADER))?;
        }
        Ok(log)
    }

    /// Write one data row and flush it.
    pub fn append(&mut self, stamped: &StampedRecord) -> io::Result<()> {
        let r = &stamped.record;
        let fields = [
            stamped.timestamp.to_string(),
            r.heap.to_string(),
            r.q1.to_string(),
            r.q2.to_string(),
            r.sem.to_string(),
            r.ev.clone(),
        ];
        self.write_line(&render_row(&fields))?;
        self.rows += 1;
        Ok(())
    }

    /// Data rows appended through this handle (header excluded).
    pub fn rows_written(&self) -> u64 {
        self.rows
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        if self.torn {
            self.writer.write_all(LINE_TERMINATOR.as_bytes())?;
            self.torn = false;
        }

        let bytes = line.as_bytes();
        let mut written = 0;
        while written < bytes.len() {
            match self.writer.write(&bytes[written..]) {
                Ok(0) => {
                    self.torn = written > 0;
                    let msg = "log writer accepted no bytes";
                    return Err(io::Error::new(ErrorKind::WriteZero, msg));
                }
                Ok(n) => written += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    self.torn = written > 0;
                    return Err(e);
                }
            }
        }
        self.writer.flush()
    }
}

fn render_row<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        push_field(&mut line, field.as_ref());
    }
    line.push_str(LINE_TERMINATOR);
    line
}

// Minimal quoting: only fields holding a delimiter, quote or line break.
fn push_field(line: &mut String, field: &str) {
    if field.contains([',', '"', '\r', '\n']) {
        line.push('"');
        line.push_str(&field.replace('"', "\"\""));
        line.push('"');
    } else {
        line.push_str(field);
    }
}
