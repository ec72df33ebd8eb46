use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Renders raw protocol-address bytes as text.
///
/// Four bytes render as a dotted quad and sixteen as IPv6 (IPv4-mapped
/// addresses fall back to the dotted form). Anything else is rendered as `?`
/// followed by the bytes in hex, so a malformed option is still recorded.
pub fn format_ip_bytes(bytes: &[u8]) -> String {
    if let Ok(octets) = <[u8; 4]>::try_from(bytes) {
        return Ipv4Addr::from(octets).to_string();
    }
    if let Ok(octets) = <[u8; 16]>::try_from(bytes) {
        return IpAddr::V6(Ipv6Addr::from(octets)).to_canonical().to_string();
    }
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!("?{hex}")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_ip_bytes_renders_ipv4() {
        assert_eq!(format_ip_bytes(&[10, 0, 0, 5]), "10.0.0.5");
    }

    #[test]
    fn format_ip_bytes_renders_ipv6() {
        let addr: Ipv6Addr = "fe80::1".parse().unwrap();
        assert_eq!(format_ip_bytes(&addr.octets()), "fe80::1");
    }

    #[test]
    fn format_ip_bytes_unwraps_ipv4_mapped() {
        let mapped: Ipv6Addr = Ipv4Addr::new(192, 168, 1, 5).to_ipv6_mapped();
        assert_eq!(format_ip_bytes(&mapped.octets()), "192.168.1.5");
    }

    #[test]
    fn format_ip_bytes_marks_odd_lengths() {
        assert_eq!(format_ip_bytes(&[0x0a, 0x00, 0x01]), "?0a0001");
        assert_eq!(format_ip_bytes(&[]), "?");
    }
}
