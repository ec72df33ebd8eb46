use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("truncated or invalid {layer} header")]
    Truncated { layer: &'static str },
    #[error("bad DHCP magic cookie {0:02x?}")]
    BadMagicCookie([u8; 4]),
    #[error("DHCP option {code} runs past the end of the message")]
    TruncatedOption { code: u8 },
}
