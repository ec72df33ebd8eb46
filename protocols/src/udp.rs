use anyhow::Context;
use pnet::packet::udp::{MutableUdpPacket, UdpPacket};

use crate::error::DecodeError;

pub const UDP_HDR_LEN: usize = 8;

pub fn get_packet_from_u8(bytes: &[u8]) -> Result<UdpPacket<'_>, DecodeError> {
    UdpPacket::new(bytes).ok_or(DecodeError::Truncated { layer: "UDP" })
}

pub fn create_packet(src_port: u16, dst_port: u16, payload: &[u8]) -> anyhow::Result<Vec<u8>> {
    let total_len: usize = UDP_HDR_LEN + payload.len();
    let mut buffer: Vec<u8> = vec![0u8; total_len];
    {
        let mut udp: MutableUdpPacket =
            MutableUdpPacket::new(&mut buffer).context("creating udp packet")?;
        udp.set_source(src_port);
        udp.set_destination(dst_port);
        udp.set_length(total_len as u16);
        udp.set_payload(payload);
        udp.set_checksum(0);
    }
    Ok(buffer)
}
