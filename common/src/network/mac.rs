use pnet::util::MacAddr;

/// Renders hardware address bytes of any length as lowercase `:`-joined octets.
///
/// Six bytes render exactly like [`MacAddr`]'s `Display`. Other lengths (e.g. a
/// DHCP client identifier with a leading hardware-type byte) are rendered the
/// same way, octet by octet. An empty slice yields an empty string.
pub fn format_hw_addr(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<String>>()
        .join(":")
}

pub fn mac_to_string(mac: MacAddr) -> String {
    format_hw_addr(&mac.octets())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
