pub mod interfaces;
pub mod listen;

use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};
use addrbook_common::config::{
    CaptureConfig, Config, DEFAULT_LISTEN_ADDR, DEFAULT_SNAPSHOT_LEN,
};

#[derive(Parser)]
#[command(name = "addrbook")]
#[command(about = "A passive IP-to-MAC address book.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Watch ARP and DHCP traffic and serve the resulting address book
    #[command(alias = "l")]
    Listen(ListenArgs),
    /// Show which interfaces can be captured on
    #[command(alias = "i")]
    Interfaces,
}

#[derive(Args, Debug, Clone)]
pub struct ListenArgs {
    /// Interface to capture on (defaults to the best LAN interface)
    #[arg(short, long)]
    pub device: Option<String>,
    /// Address the query API binds to
    #[arg(short, long, default_value_t = DEFAULT_LISTEN_ADDR)]
    pub listen: SocketAddr,
    /// Bytes kept from each captured frame
    #[arg(long, default_value_t = DEFAULT_SNAPSHOT_LEN)]
    pub snaplen: usize,
    /// Put the interface into promiscuous mode
    #[arg(long)]
    pub promisc: bool,
    /// Capture read timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}

impl From<ListenArgs> for Config {
    fn from(args: ListenArgs) -> Self {
        Self {
            capture: CaptureConfig {
                device: args.device,
                snapshot_len: args.snaplen,
                promiscuous: args.promisc,
                read_timeout: std::time::Duration::from_secs(args.timeout),
            },
            listen_addr: args.listen,
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
