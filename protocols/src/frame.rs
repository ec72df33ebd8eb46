//! Decoding of captured Ethernet frames and dispatch to the extractors.
//!
//! [`decode`] turns raw bytes into a [`DecodedFrame`] holding whichever layers
//! we understand. [`classify`] then picks exactly one route for the frame,
//! ARP taking precedence over DHCP, and [`extract_candidates`] runs the
//! matching extractor.

use pnet::packet::Packet;
use pnet::packet::ethernet::EtherTypes;
use pnet::packet::ip::IpNextHeaderProtocols;
use tracing::trace;

use addrbook_common::Candidate;

use crate::arp::{self, ArpLayer};
use crate::dhcp::{self, DhcpMessage};
use crate::error::DecodeError;
use crate::icmp::{self, IcmpEcho};
use crate::{ethernet, ipv4, udp};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedFrame {
    pub arp: Option<ArpLayer>,
    pub dhcp: Option<DhcpMessage>,
    /// Echo traffic passes the capture filter but carries no addresses.
    pub icmp: Option<IcmpEcho>,
}

impl From<ArpLayer> for DecodedFrame {
    fn from(arp: ArpLayer) -> Self {
        Self {
            arp: Some(arp),
            ..Default::default()
        }
    }
}

impl From<DhcpMessage> for DecodedFrame {
    fn from(dhcp: DhcpMessage) -> Self {
        Self {
            dhcp: Some(dhcp),
            ..Default::default()
        }
    }
}

/// The single route a frame takes through extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind<'a> {
    Arp(&'a ArpLayer),
    Dhcp(&'a DhcpMessage),
    Unrecognized,
}

pub fn classify(frame: &DecodedFrame) -> FrameKind<'_> {
    if let Some(arp) = &frame.arp {
        return FrameKind::Arp(arp);
    }
    if let Some(dhcp) = &frame.dhcp {
        return FrameKind::Dhcp(dhcp);
    }
    FrameKind::Unrecognized
}

pub fn extract_candidates(frame: &DecodedFrame) -> Vec<Candidate> {
    match classify(frame) {
        FrameKind::Arp(arp) => arp::extract(arp),
        FrameKind::Dhcp(dhcp) => dhcp::extract(dhcp),
        FrameKind::Unrecognized => {
            trace!("Frame carries no ARP or DHCP layer: {:?}", frame.icmp);
            Vec::new()
        }
    }
}

/// Decodes an Ethernet II frame.
///
/// Traffic we do not look into (other ethertypes, other transports, UDP on
/// other ports) decodes to an empty frame rather than an error. Errors are
/// reserved for layers we do look into but cannot parse.
pub fn decode(bytes: &[u8]) -> Result<DecodedFrame, DecodeError> {
    let eth = ethernet::get_packet_from_u8(bytes)?;
    let mut frame = DecodedFrame::default();

    match eth.get_ethertype() {
        EtherTypes::Arp => frame.arp = Some(arp::decode(eth.payload())?),
        EtherTypes::Ipv4 => decode_ipv4(eth.payload(), &mut frame)?,
        _ => {}
    }

    Ok(frame)
}

fn decode_ipv4(payload: &[u8], frame: &mut DecodedFrame) -> Result<(), DecodeError> {
    let ip = ipv4::get_packet_from_u8(payload)?;

    match ip.get_next_level_protocol() {
        IpNextHeaderProtocols::Udp => {
            let datagram = udp::get_packet_from_u8(ip.payload())?;
            if is_dhcp_port(datagram.get_source()) || is_dhcp_port(datagram.get_destination()) {
                frame.dhcp = Some(dhcp::decode(datagram.payload())?);
            }
        }
        IpNextHeaderProtocols::Icmp => frame.icmp = icmp::decode(ip.payload())?,
        _ => {}
    }

    Ok(())
}

pub fn is_dhcp_port(port: u16) -> bool {
    port == dhcp::SERVER_PORT || port == dhcp::CLIENT_PORT
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
