use anyhow::Context;
use pnet::packet::ethernet::{EtherType, EthernetPacket, MutableEthernetPacket};
use pnet::util::MacAddr;

use crate::error::DecodeError;

pub const ETH_HDR_LEN: usize = 14;

pub fn get_packet_from_u8(bytes: &[u8]) -> Result<EthernetPacket<'_>, DecodeError> {
    EthernetPacket::new(bytes).ok_or(DecodeError::Truncated { layer: "Ethernet" })
}

/// Wraps `payload` into an Ethernet II frame.
pub fn create_frame(
    src_mac: MacAddr,
    dst_mac: MacAddr,
    ethertype: EtherType,
    payload: &[u8],
) -> anyhow::Result<Vec<u8>> {
    let total_len: usize = ETH_HDR_LEN + payload.len();
    let mut buffer: Vec<u8> = vec![0u8; total_len];
    {
        let mut eth: MutableEthernetPacket =
            MutableEthernetPacket::new(&mut buffer).context("creating ethernet header")?;
        eth.set_source(src_mac);
        eth.set_destination(dst_mac);
        eth.set_ethertype(ethertype);
        eth.set_payload(payload);
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
