//! UDP receive loop.
//!
//! The listener exclusively owns the socket and the CSV log for its whole
//! lifetime. One task, one suspension point (the receive), raced only against
//! the shutdown token. Nothing a datagram or the log does ends the loop.

pub mod config;
pub mod stats;

use std::fs::File;
use std::io::Write;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::telemetry::record::unix_now;
use crate::telemetry::{decode_datagram, CsvLog, StampedRecord};

pub use config::ListenerConfig;
pub use stats::ListenerStats;

pub struct TelemetryListener<W: Write = File> {
    socket: UdpSocket,
    log: CsvLog<W>,
    config: ListenerConfig,
    stats: ListenerStats,
}

impl TelemetryListener<File> {
    /// Open the log file and bind the socket. Either failure is fatal.
    pub async fn bind(config: ListenerConfig) -> Result<Self> {
        let log = CsvLog::open(&config.log_path)
            .with_context(|| format!("failed to open log file {}", config.log_path.display()))?;
        Self::with_log(config, log).await
    }
}

impl<W: Write> TelemetryListener<W> {
    /// Bind the socket and write rows to an already prepared log.
    pub async fn with_log(config: ListenerConfig, log: CsvLog<W>) -> Result<Self> {
        let socket = UdpSocket::bind(config.bind_addr)
            .await
            .with_context(|| format!("failed to bind UDP socket on {}", config.bind_addr))?;

        Ok(Self {
            socket,
            log,
            config,
            stats: ListenerStats::default(),
        })
    }

    /// Address the socket is actually bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Settings this listener was built with.
    pub fn config(&self) -> &ListenerConfig {
        &self.config
    }

    /// Counters so far.
    pub fn stats(&self) -> &ListenerStats {
        &self.stats
    }

    /// Process one datagram, returning the row that was written.
    ///
    /// A malformed payload or a failed append is reported, counted and
    /// yields `None`; the caller keeps serving either way.
    pub fn handle_datagram(
        &mut self,
        payload: &[u8],
        from: SocketAddr,
        received_at: u64,
    ) -> Option<StampedRecord> {
        self.stats.received += 1;
        info!("Received from {}: {}", from, String::from_utf8_lossy(payload).trim());

        let parsed = match decode_datagram(payload) {
            Ok(parsed) => parsed,
            Err(e) => {
                self.stats.rejected += 1;
                warn!("Parse error from {}: {}", from, e);
                return None;
            }
        };

        let record = parsed.record;
        if parsed.heap_reported && record.heap < self.config.heap_warn_threshold {
            self.stats.low_heap_warnings += 1;
            warn!("Remote heap low: {} bytes left (sender {})", record.heap, from);
        }

        let stamped = StampedRecord::new(received_at, record);
        if let Err(e) = self.log.append(&stamped) {
            self.stats.write_errors += 1;
            warn!("Failed to append to {}: {}", self.config.log_path.display(), e);
            return None;
        }
        self.stats.logged += 1;

        Some(stamped)
    }

    /// Receive and log until `shutdown` is cancelled, then flush and return the counters.
    pub async fn run(&mut self, shutdown: CancellationToken) -> Result<ListenerStats> {
        info!(
            "Listening for UDP stats on {} -> {}",
            self.local_addr()?,
            self.config.log_path.display()
        );

        let mut buf = vec![0u8; self.config.recv_buffer_size];

        loop {
            let received = tokio::select! {
                biased;
                _ = shutdown.cancelled() => None,
                res = self.socket.recv_from(&mut buf) => Some(res),
            };

            let Some(res) = received else {
                break;
            };

            match res {
                Ok((len, from)) => {
                    self.handle_datagram(&buf[..len], from, unix_now());
                }
                Err(e) => {
                    self.stats.recv_errors += 1;
                    warn!("UDP receive error: {}", e);
                }
            }
        }

        if let Err(e) = self.log.flush() {
            warn!("Final flush of {} failed: {}", self.config.log_path.display(), e);
        }
        info!("Listener stopped: {}", self.stats);
        Ok(self.stats.clone())
    }
}
