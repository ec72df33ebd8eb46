//! Userspace capture filter.
//!
//! Admits ARP, IPv4 UDP with either port in {67, 68}, and IPv4 ICMP echo
//! requests and replies. Everything else, including IPv6, is dropped before
//! decoding.

use pnet::packet::Packet;
use pnet::packet::ethernet::EtherTypes;
use pnet::packet::icmp::IcmpTypes;
use pnet::packet::ip::IpNextHeaderProtocols;

use crate::frame::is_dhcp_port;
use crate::{ethernet, ipv4, udp};

pub fn admits(bytes: &[u8]) -> bool {
    let Ok(eth) = ethernet::get_packet_from_u8(bytes) else {
        return false;
    };

    match eth.get_ethertype() {
        EtherTypes::Arp => true,
        EtherTypes::Ipv4 => admits_ipv4(eth.payload()),
        _ => false,
    }
}

fn admits_ipv4(payload: &[u8]) -> bool {
    let Ok(ip) = ipv4::get_packet_from_u8(payload) else {
        return false;
    };

    match ip.get_next_level_protocol() {
        IpNextHeaderProtocols::Udp => udp::get_packet_from_u8(ip.payload())
            .map(|datagram| {
                is_dhcp_port(datagram.get_source()) || is_dhcp_port(datagram.get_destination())
            })
            .unwrap_or(false),
        // Type is the first byte of the ICMP header.
        IpNextHeaderProtocols::Icmp => ip.payload().first().is_some_and(|&icmp_type| {
            icmp_type == IcmpTypes::EchoRequest.0 || icmp_type == IcmpTypes::EchoReply.0
        }),
        _ => false,
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
