use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_SNAPSHOT_LEN: usize = 1024;
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_LISTEN_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080);

#[derive(Debug, Clone)]
pub struct Config {
    pub capture: CaptureConfig,
    /// Where the query API accepts connections.
    pub listen_addr: SocketAddr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Interface to capture on.
    ///
    /// `None` picks the best LAN interface available.
    pub device: Option<String>,
    /// Frames are truncated to this many bytes before decoding.
    pub snapshot_len: usize,
    pub promiscuous: bool,
    /// How long a single read may block. Expiry is not an error.
    pub read_timeout: Duration,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device: None,
            snapshot_len: DEFAULT_SNAPSHOT_LEN,
            promiscuous: false,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capture: CaptureConfig::default(),
            listen_addr: DEFAULT_LISTEN_ADDR,
        }
    }
}
