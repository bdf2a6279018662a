use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Port the embedded sender targets (`REMOTE_STATS_PORT`).
pub const DEFAULT_PORT: u16 = 5005;
pub const DEFAULT_LOG_PATH: &str = "udp_stats_log.csv";
pub const RECV_BUFFER_SIZE: usize = 1024;
/// Mirrors `HEAP_WARN_THRESHOLD` on the sender.
pub const HEAP_WARN_THRESHOLD: i64 = 2048;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    pub bind_addr: SocketAddr,
    pub log_path: PathBuf,
    /// Bytes read per datagram; anything beyond is dropped by the socket.
    pub recv_buffer_size: usize,
    pub heap_warn_threshold: i64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            recv_buffer_size: RECV_BUFFER_SIZE,
            heap_warn_threshold: HEAP_WARN_THRESHOLD,
        }
    }
}
