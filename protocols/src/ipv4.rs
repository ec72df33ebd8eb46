use std::net::Ipv4Addr;

use anyhow::Context;
use pnet::packet::ip::IpNextHeaderProtocol;
use pnet::packet::ipv4::{self, Ipv4Packet, MutableIpv4Packet};

use crate::error::DecodeError;

pub const IPV4_HDR_LEN: usize = 20;
const DEFAULT_TTL: u8 = 64;

pub fn get_packet_from_u8(bytes: &[u8]) -> Result<Ipv4Packet<'_>, DecodeError> {
    let packet = Ipv4Packet::new(bytes).ok_or(DecodeError::Truncated { layer: "IPv4" })?;
    let header_len: usize = packet.get_header_length() as usize * 4;
    if packet.get_version() != 4 || header_len < IPV4_HDR_LEN || header_len > bytes.len() {
        return Err(DecodeError::Truncated { layer: "IPv4" });
    }
    Ok(packet)
}

/// Builds an option-less IPv4 packet around `payload`.
pub fn create_packet(
    src_addr: Ipv4Addr,
    dst_addr: Ipv4Addr,
    protocol: IpNextHeaderProtocol,
    payload: &[u8],
) -> anyhow::Result<Vec<u8>> {
    let total_len: usize = IPV4_HDR_LEN + payload.len();
    let mut buffer: Vec<u8> = vec![0u8; total_len];
    {
        let mut ip: MutableIpv4Packet =
            MutableIpv4Packet::new(&mut buffer).context("creating ipv4 header")?;
        ip.set_version(4);
        ip.set_header_length((IPV4_HDR_LEN / 4) as u8);
        ip.set_total_length(total_len as u16);
        ip.set_ttl(DEFAULT_TTL);
        ip.set_next_level_protocol(protocol);
        ip.set_source(src_addr);
        ip.set_destination(dst_addr);
        ip.set_payload(payload);
        let checksum: u16 = ipv4::checksum(&ip.to_immutable());
        ip.set_checksum(checksum);
    }
    Ok(buffer)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
