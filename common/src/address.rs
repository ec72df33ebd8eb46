use std::fmt;

use serde::{Deserialize, Serialize};

/// One observed IP-to-hardware mapping, as held by the directory.
///
/// `id` stays the same for the lifetime of a host's mapping, even when its
/// `ip` or `mac` later changes. Both address fields are kept exactly as they
/// were observed; no syntax validation takes place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub id: String,
    pub ip: String,
    pub mac: String,
}

impl Address {
    pub fn new(id: impl Into<String>, ip: impl Into<String>, mac: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ip: ip.into(),
            mac: mac.into(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}) #{}", self.ip, self.mac, self.id)
    }
}

/// An `(ip, mac)` pair proposed by an extractor. Never persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub ip: String,
    pub mac: String,
}

impl Candidate {
    pub fn new(ip: impl Into<String>, mac: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            mac: mac.into(),
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.ip, self.mac)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_serializes_with_id_ip_mac_fields() {
        let address = Address::new("abc", "192.168.1.10", "aa:aa:aa:aa:aa:aa");
        let json: serde_json::Value = serde_json::to_value(&address).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["ip"], "192.168.1.10");
        assert_eq!(json["mac"], "aa:aa:aa:aa:aa:aa");
        assert_eq!(json.as_object().unwrap().len(), 3);
    }

    #[test]
    fn candidate_display_matches_log_format() {
        let candidate = Candidate::new("10.0.0.5", "aa:bb:cc:dd:ee:ff");
        assert_eq!(candidate.to_string(), "10.0.0.5(aa:bb:cc:dd:ee:ff)");
    }
}
