//! Wire-level handling for the traffic the observer listens to: Ethernet,
//! IPv4, UDP, ARP, DHCPv4 and ICMP echo.

pub mod arp;
pub mod dhcp;
pub mod error;
pub mod ethernet;
pub mod filter;
pub mod frame;
pub mod icmp;
pub mod ipv4;
pub mod udp;

pub use error::DecodeError;
pub use frame::{DecodedFrame, FrameKind};
