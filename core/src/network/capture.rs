use std::io;

use anyhow::{Context, bail};
use pnet::datalink::{self, Channel, Config, DataLinkReceiver, NetworkInterface};
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};

use addrbook_common::config::CaptureConfig;
use addrbook_protocols::{DecodedFrame, filter, frame};

/// Consecutive read failures after which the capture gives up.
const MAX_CONSECUTIVE_ERRORS: u32 = 16;

pub struct CaptureHandle {
    pub interface: String,
    pub rx: mpsc::UnboundedReceiver<DecodedFrame>,
    pub listener: std::thread::JoinHandle<()>,
}

/// Opens a datalink channel on `interface` and starts feeding decoded frames.
pub fn start_capture(
    interface: &NetworkInterface,
    capture: &CaptureConfig,
) -> anyhow::Result<CaptureHandle> {
    start_capture_with(interface, capture, datalink::channel)
}

pub fn start_capture_with<F>(
    interface: &NetworkInterface,
    capture: &CaptureConfig,
    channel_opener: F,
) -> anyhow::Result<CaptureHandle>
where
    F: FnOnce(&NetworkInterface, Config) -> io::Result<Channel>,
{
    let rx_socket = open_eth_channel(interface, &datalink_config(capture), channel_opener)?;
    let (queue_tx, queue_rx) = mpsc::unbounded_channel();
    let snapshot_len: usize = capture.snapshot_len;

    let listener = std::thread::Builder::new()
        .name(format!("capture-{}", interface.name))
        .spawn(move || listen(rx_socket, queue_tx, snapshot_len))
        .context("spawning capture thread")?;

    Ok(CaptureHandle {
        interface: interface.name.clone(),
        rx: queue_rx,
        listener,
    })
}

fn open_eth_channel<F>(
    intf: &NetworkInterface,
    cfg: &Config,
    channel_opener: F,
) -> anyhow::Result<Box<dyn DataLinkReceiver>>
where
    F: FnOnce(&NetworkInterface, Config) -> io::Result<Channel>,
{
    let ch: Channel =
        channel_opener(intf, *cfg).with_context(|| format!("opening on {}", intf.name))?;
    match ch {
        Channel::Ethernet(_, rx) => {
            info!("Capturing on {}", intf.name);
            Ok(rx)
        }
        _ => bail!("non-ethernet channel for {}", intf.name),
    }
}

fn datalink_config(capture: &CaptureConfig) -> Config {
    Config {
        read_timeout: Some(capture.read_timeout),
        read_buffer_size: capture.snapshot_len.max(Config::default().read_buffer_size),
        promiscuous: capture.promiscuous,
        ..Default::default()
    }
}

/// Blocking receive loop. Returns when the queue's receiver is gone or the
/// socket keeps failing.
fn listen(
    mut rx: Box<dyn DataLinkReceiver>,
    tx: mpsc::UnboundedSender<DecodedFrame>,
    snapshot_len: usize,
) {
    let mut consecutive_errors: u32 = 0;

    loop {
        match rx.next() {
            Ok(bytes) => {
                consecutive_errors = 0;
                let bytes: &[u8] = &bytes[..bytes.len().min(snapshot_len)];
                if !filter::admits(bytes) {
                    continue;
                }
                match frame::decode(bytes) {
                    Ok(decoded) => {
                        if tx.send(decoded).is_err() {
                            break;
                        }
                    }
                    Err(e) => debug!("Dropping frame: {}", e),
                }
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                trace!("Read timed out");
                if tx.is_closed() {
                    break;
                }
            }
            Err(e) => {
                consecutive_errors += 1;
                warn!("Capture read failed: {}", e);
                if consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                    error!("Giving up after {} consecutive read errors", consecutive_errors);
                    break;
                }
            }
        }
    }

    info!("Capture stopped");
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
