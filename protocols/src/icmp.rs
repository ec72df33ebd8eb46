use std::net::Ipv4Addr;

use anyhow::Context;
use pnet::packet::ethernet::EtherTypes;
use pnet::packet::icmp::{IcmpPacket, IcmpType, IcmpTypes, MutableIcmpPacket};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::util::MacAddr;

use crate::error::DecodeError;
use crate::{ethernet, ipv4};

const ICMP_HDR_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IcmpEcho {
    Request,
    Reply,
}

impl IcmpEcho {
    pub fn from_type(icmp_type: IcmpType) -> Option<Self> {
        if icmp_type == IcmpTypes::EchoRequest {
            Some(Self::Request)
        } else if icmp_type == IcmpTypes::EchoReply {
            Some(Self::Reply)
        } else {
            None
        }
    }

    fn icmp_type(self) -> IcmpType {
        match self {
            Self::Request => IcmpTypes::EchoRequest,
            Self::Reply => IcmpTypes::EchoReply,
        }
    }
}

/// `None` for any ICMP message that is not an echo.
pub fn decode(payload: &[u8]) -> Result<Option<IcmpEcho>, DecodeError> {
    let icmp = IcmpPacket::new(payload).ok_or(DecodeError::Truncated { layer: "ICMP" })?;
    Ok(IcmpEcho::from_type(icmp.get_icmp_type()))
}

pub fn create_packet(
    echo: IcmpEcho,
    eth_src: MacAddr,
    ip_src: Ipv4Addr,
    ip_dst: Ipv4Addr,
) -> anyhow::Result<Vec<u8>> {
    let mut buffer: Vec<u8> = vec![0u8; ICMP_HDR_LEN];
    {
        let mut icmp: MutableIcmpPacket =
            MutableIcmpPacket::new(&mut buffer).context("creating icmp packet")?;
        icmp.set_icmp_type(echo.icmp_type());
    }
    let packet: Vec<u8> =
        ipv4::create_packet(ip_src, ip_dst, IpNextHeaderProtocols::Icmp, &buffer)?;
    ethernet::create_frame(eth_src, MacAddr::broadcast(), EtherTypes::Ipv4, &packet)
}
