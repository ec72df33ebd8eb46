use std::net::Ipv4Addr;

use anyhow::Context;
use pnet::packet::arp::{ArpHardwareTypes, ArpOperation, ArpOperations, ArpPacket, MutableArpPacket};
use pnet::packet::ethernet::EtherTypes;
use pnet::util::MacAddr;
use tracing::debug;

use addrbook_common::Candidate;
use addrbook_common::network::mac;

use crate::error::DecodeError;
use crate::ethernet;

pub const ARP_LEN: usize = 28;

/// The ARP fields needed for address extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArpLayer {
    pub operation: ArpOperation,
    pub sender_hw_addr: MacAddr,
    pub sender_proto_addr: Ipv4Addr,
    pub target_hw_addr: MacAddr,
    pub target_proto_addr: Ipv4Addr,
}

impl From<&ArpPacket<'_>> for ArpLayer {
    fn from(arp: &ArpPacket<'_>) -> Self {
        Self {
            operation: arp.get_operation(),
            sender_hw_addr: arp.get_sender_hw_addr(),
            sender_proto_addr: arp.get_sender_proto_addr(),
            target_hw_addr: arp.get_target_hw_addr(),
            target_proto_addr: arp.get_target_proto_addr(),
        }
    }
}

pub fn decode(payload: &[u8]) -> Result<ArpLayer, DecodeError> {
    let arp = ArpPacket::new(payload).ok_or(DecodeError::Truncated { layer: "ARP" })?;
    Ok(ArpLayer::from(&arp))
}

/// Every ARP packet vouches for its sender. A reply also carries the
/// requester's pair in the target fields, which is taken as-is, zeroes included.
pub fn extract(arp: &ArpLayer) -> Vec<Candidate> {
    let sender = Candidate::new(
        arp.sender_proto_addr.to_string(),
        mac::mac_to_string(arp.sender_hw_addr),
    );
    debug!("Detected address {} from ARP packet", sender);
    let mut candidates: Vec<Candidate> = vec![sender];

    if arp.operation == ArpOperations::Reply {
        let target = Candidate::new(
            arp.target_proto_addr.to_string(),
            mac::mac_to_string(arp.target_hw_addr),
        );
        debug!("Detected address {} from ARP reply packet", target);
        candidates.push(target);
    }

    candidates
}

/// Builds a complete Ethernet frame carrying an Ethernet/IPv4 ARP packet.
pub fn create_packet(layer: &ArpLayer, eth_dst: MacAddr) -> anyhow::Result<Vec<u8>> {
    let mut buffer: Vec<u8> = vec![0u8; ARP_LEN];
    {
        let mut arp: MutableArpPacket =
            MutableArpPacket::new(&mut buffer).context("creating arp packet")?;
        arp.set_hardware_type(ArpHardwareTypes::Ethernet);
        arp.set_protocol_type(EtherTypes::Ipv4);
        arp.set_hw_addr_len(6);
        arp.set_proto_addr_len(4);
        arp.set_operation(layer.operation);
        arp.set_sender_hw_addr(layer.sender_hw_addr);
        arp.set_sender_proto_addr(layer.sender_proto_addr);
        arp.set_target_hw_addr(layer.target_hw_addr);
        arp.set_target_proto_addr(layer.target_proto_addr);
    }
    ethernet::create_frame(layer.sender_hw_addr, eth_dst, EtherTypes::Arp, &buffer)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
