//! DHCPv4 message decoding and address extraction.
//!
//! A DHCP exchange exposes an address binding in three places: the client's
//! REQUEST (requested IP + client identifier options) and the server's OFFER
//! and ACK (`yiaddr` + `chaddr` header fields). Every other message type is
//! ignored.

use std::net::Ipv4Addr;

use anyhow::{Context, ensure};
use pnet::packet::Packet;
use pnet::packet::dhcp::{DhcpHardwareTypes, DhcpOperations, DhcpPacket, MutableDhcpPacket};
use pnet::packet::ethernet::EtherTypes;
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::util::MacAddr;
use tracing::debug;

use addrbook_common::Candidate;
use addrbook_common::network::{ip, mac};

use crate::error::DecodeError;
use crate::{ethernet, ipv4, udp};

pub const SERVER_PORT: u16 = 67;
pub const CLIENT_PORT: u16 = 68;

/// Size of the BOOTP header that precedes the magic cookie.
pub const DHCP_FIXED_LEN: usize = 236;
pub const MAGIC_COOKIE: [u8; 4] = [99, 130, 83, 99];
const CHADDR_OFFSET: usize = 28;
const CHADDR_LEN: usize = 16;

pub mod options {
    pub const PAD: u8 = 0;
    pub const REQUESTED_IP: u8 = 50;
    pub const MESSAGE_TYPE: u8 = 53;
    pub const CLIENT_ID: u8 = 61;
    pub const END: u8 = 255;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Discover = 1,
    Offer = 2,
    Request = 3,
    Decline = 4,
    Ack = 5,
    Nak = 6,
    Release = 7,
    Inform = 8,
}

impl MessageType {
    /// Reads the Message-Type option payload, which must be exactly one byte.
    pub fn from_option_data(data: &[u8]) -> Option<Self> {
        match data {
            [1] => Some(Self::Discover),
            [2] => Some(Self::Offer),
            [3] => Some(Self::Request),
            [4] => Some(Self::Decline),
            [5] => Some(Self::Ack),
            [6] => Some(Self::Nak),
            [7] => Some(Self::Release),
            [8] => Some(Self::Inform),
            _ => None,
        }
    }

    fn is_from_server(self) -> bool {
        matches!(self, Self::Offer | Self::Ack | Self::Nak)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhcpOption {
    pub code: u8,
    pub data: Vec<u8>,
}

impl DhcpOption {
    pub fn new(code: u8, data: impl Into<Vec<u8>>) -> Self {
        Self {
            code,
            data: data.into(),
        }
    }

    pub fn message_type(message_type: MessageType) -> Self {
        Self::new(options::MESSAGE_TYPE, [message_type as u8])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhcpMessage {
    /// `yiaddr`: the address the server is handing out.
    pub your_client_ip: Ipv4Addr,
    /// `chaddr`, cut to the `hlen` bytes the header declares.
    pub client_hw_addr: Vec<u8>,
    /// Options in wire order, pads and the end marker excluded.
    pub options: Vec<DhcpOption>,
}

impl DhcpMessage {
    /// First option carrying `code`; later duplicates are ignored.
    pub fn option(&self, code: u8) -> Option<&DhcpOption> {
        self.options.iter().find(|option| option.code == code)
    }

    pub fn message_type(&self) -> Option<MessageType> {
        self.option(options::MESSAGE_TYPE)
            .and_then(|option| MessageType::from_option_data(&option.data))
    }
}

pub fn decode(payload: &[u8]) -> Result<DhcpMessage, DecodeError> {
    // pnet's minimum size for DhcpPacket is below the fixed BOOTP header.
    if payload.len() < DHCP_FIXED_LEN {
        return Err(DecodeError::Truncated { layer: "DHCP" });
    }
    let dhcp = DhcpPacket::new(payload).ok_or(DecodeError::Truncated { layer: "DHCP" })?;

    let hlen: usize = (dhcp.get_hlen() as usize).min(CHADDR_LEN);
    let client_hw_addr: Vec<u8> = payload[CHADDR_OFFSET..CHADDR_OFFSET + hlen].to_vec();

    let rest: &[u8] = dhcp.payload();
    let cookie: [u8; 4] = rest
        .get(..MAGIC_COOKIE.len())
        .and_then(|bytes| <[u8; 4]>::try_from(bytes).ok())
        .ok_or(DecodeError::Truncated { layer: "DHCP" })?;
    if cookie != MAGIC_COOKIE {
        return Err(DecodeError::BadMagicCookie(cookie));
    }

    Ok(DhcpMessage {
        your_client_ip: dhcp.get_yiaddr(),
        client_hw_addr,
        options: parse_options(&rest[MAGIC_COOKIE.len()..])?,
    })
}

/// Walks the TLV option area up to the end marker (or the end of the data).
pub fn parse_options(bytes: &[u8]) -> Result<Vec<DhcpOption>, DecodeError> {
    let mut parsed: Vec<DhcpOption> = Vec::new();
    let mut cursor: usize = 0;

    while cursor < bytes.len() {
        let code: u8 = bytes[cursor];
        cursor += 1;
        match code {
            options::PAD => continue,
            options::END => break,
            _ => {}
        }

        let len: usize = *bytes.get(cursor).ok_or(DecodeError::TruncatedOption { code })? as usize;
        cursor += 1;
        let data: &[u8] = bytes
            .get(cursor..cursor + len)
            .ok_or(DecodeError::TruncatedOption { code })?;
        parsed.push(DhcpOption::new(code, data));
        cursor += len;
    }

    Ok(parsed)
}

pub fn encode_options(options: &[DhcpOption]) -> anyhow::Result<Vec<u8>> {
    let mut encoded: Vec<u8> = Vec::new();
    for option in options {
        ensure!(
            option.data.len() <= u8::MAX as usize,
            "option {} carries {} bytes",
            option.code,
            option.data.len()
        );
        encoded.push(option.code);
        encoded.push(option.data.len() as u8);
        encoded.extend_from_slice(&option.data);
    }
    encoded.push(options::END);
    Ok(encoded)
}

/// Zero or one candidate, depending on the message type.
pub fn extract(message: &DhcpMessage) -> Vec<Candidate> {
    let Some(type_option) = message.option(options::MESSAGE_TYPE) else {
        return Vec::new();
    };

    let candidate: Option<Candidate> = match MessageType::from_option_data(&type_option.data) {
        Some(MessageType::Request) => from_request(message),
        Some(kind @ (MessageType::Offer | MessageType::Ack)) => Some(from_lease(message, kind)),
        _ => None,
    };

    candidate.into_iter().collect()
}

fn from_request(message: &DhcpMessage) -> Option<Candidate> {
    let requested_ip = message.option(options::REQUESTED_IP)?;
    let client_id = message.option(options::CLIENT_ID)?;
    let candidate = Candidate::new(
        ip::format_ip_bytes(&requested_ip.data),
        mac::format_hw_addr(&client_id.data),
    );
    debug!("Detected address {} from DHCP Request packet", candidate);
    Some(candidate)
}

fn from_lease(message: &DhcpMessage, kind: MessageType) -> Candidate {
    let candidate = Candidate::new(
        message.your_client_ip.to_string(),
        mac::format_hw_addr(&message.client_hw_addr),
    );
    debug!("Detected address {} from DHCP {:?} packet", candidate, kind);
    candidate
}

/// Serializes `message` into a BOOTP payload (header, cookie, options).
pub fn create_payload(message: &DhcpMessage) -> anyhow::Result<Vec<u8>> {
    let hlen: usize = message.client_hw_addr.len();
    ensure!(hlen <= CHADDR_LEN, "chaddr holds at most {CHADDR_LEN} bytes, got {hlen}");

    let from_server: bool = message.message_type().is_some_and(MessageType::is_from_server);
    let encoded_options: Vec<u8> = encode_options(&message.options)?;
    let total: usize = DHCP_FIXED_LEN + MAGIC_COOKIE.len() + encoded_options.len();
    let mut buffer: Vec<u8> = vec![0u8; total];

    {
        let mut dhcp: MutableDhcpPacket =
            MutableDhcpPacket::new(&mut buffer).context("creating dhcp header")?;
        dhcp.set_op(if from_server {
            DhcpOperations::Reply
        } else {
            DhcpOperations::Request
        });
        dhcp.set_htype(DhcpHardwareTypes::Ethernet);
        dhcp.set_hlen(hlen as u8);
        dhcp.set_yiaddr(message.your_client_ip);
    }

    buffer[CHADDR_OFFSET..CHADDR_OFFSET + hlen].copy_from_slice(&message.client_hw_addr);

    let mut cursor: usize = DHCP_FIXED_LEN;
    buffer[cursor..cursor + MAGIC_COOKIE.len()].copy_from_slice(&MAGIC_COOKIE);
    cursor += MAGIC_COOKIE.len();
    buffer[cursor..].copy_from_slice(&encoded_options);

    Ok(buffer)
}

/// Builds a broadcast Ethernet frame carrying `message` over UDP.
///
/// Server message types travel 67 → 68, everything else 68 → 67.
pub fn create_packet(
    message: &DhcpMessage,
    eth_src: MacAddr,
    ip_src: Ipv4Addr,
) -> anyhow::Result<Vec<u8>> {
    let (src_port, dst_port) = match message.message_type() {
        Some(kind) if kind.is_from_server() => (SERVER_PORT, CLIENT_PORT),
        _ => (CLIENT_PORT, SERVER_PORT),
    };
    let payload: Vec<u8> = create_payload(message)?;
    let datagram: Vec<u8> = udp::create_packet(src_port, dst_port, &payload)?;
    let packet: Vec<u8> = ipv4::create_packet(
        ip_src,
        Ipv4Addr::BROADCAST,
        IpNextHeaderProtocols::Udp,
        &datagram,
    )?;
    ethernet::create_frame(eth_src, MacAddr::broadcast(), EtherTypes::Ipv4, &packet)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
