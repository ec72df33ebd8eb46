//! Selection of the interface the capture adapter listens on.

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::{IpNetwork, Ipv4Network};
use thiserror::Error;
use tracing::debug;

#[cfg(target_os = "linux")]
use linux_impl::{is_physical, is_wireless};
#[cfg(target_os = "macos")]
use macos_impl::{is_physical, is_wireless};
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
use fallback_impl::{is_physical, is_wireless};

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    #[error("interface is down")]
    IsDown,
    #[error("interface is not a physical device")]
    NotPhysical,
    #[error("interface has no MAC address")]
    NoMacAddress,
    /// ARP and DHCP discovery traffic is broadcast, so we would see nothing.
    #[error("interface does not support broadcast")]
    NotBroadcast,
    #[error("interface is a point-to-point link")]
    IsPointToPoint,
}

/// Resolves the interface to capture on.
///
/// A named `device` must exist but is otherwise taken as-is; the operator
/// knows best. Without a name, the best viable LAN interface is chosen.
pub fn find_capture_interface(device: Option<&str>) -> anyhow::Result<NetworkInterface> {
    resolve_interface(datalink::interfaces(), device, is_physical, is_wired)
}

/// Every interface on this machine paired with its capture viability.
pub fn list_capture_interfaces() -> Vec<(NetworkInterface, Result<(), ViabilityError>)> {
    datalink::interfaces()
        .into_iter()
        .map(|interface| {
            let viability = is_viable_capture_interface(&interface, is_physical);
            (interface, viability)
        })
        .collect()
}

pub fn ipv4_networks(interface: &NetworkInterface) -> Vec<Ipv4Network> {
    interface
        .ips
        .iter()
        .filter_map(|ip| match ip {
            IpNetwork::V4(ipv4) => Some(*ipv4),
            IpNetwork::V6(_) => None,
        })
        .collect()
}

fn resolve_interface(
    interfaces: Vec<NetworkInterface>,
    device: Option<&str>,
    is_physical: impl Fn(&NetworkInterface) -> bool,
    is_wired: impl Fn(&NetworkInterface) -> bool,
) -> anyhow::Result<NetworkInterface> {
    if let Some(name) = device {
        return interfaces
            .into_iter()
            .find(|interface| interface.name == name)
            .ok_or_else(|| anyhow::anyhow!("no such device: {name}"));
    }

    let viable: Vec<NetworkInterface> = interfaces
        .into_iter()
        .filter(|interface| match is_viable_capture_interface(interface, &is_physical) {
            Ok(()) => true,
            Err(e) => {
                debug!("Skipping {}: {}", interface.name, e);
                false
            }
        })
        .collect();

    select_best_interface(viable, is_wired)
        .ok_or_else(|| anyhow::anyhow!("no interface available for capturing"))
}

fn is_viable_capture_interface(
    interface: &NetworkInterface,
    is_physical: impl Fn(&NetworkInterface) -> bool,
) -> Result<(), ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if interface.is_loopback() || !is_physical(interface) {
        return Err(ViabilityError::NotPhysical);
    }
    if interface.mac.is_none() {
        return Err(ViabilityError::NoMacAddress);
    }
    if !interface.is_broadcast() {
        return Err(ViabilityError::NotBroadcast);
    }
    if interface.is_point_to_point() {
        return Err(ViabilityError::IsPointToPoint);
    }
    Ok(())
}

fn select_best_interface(
    interfaces: Vec<NetworkInterface>,
    is_wired: impl Fn(&NetworkInterface) -> bool,
) -> Option<NetworkInterface> {
    let wired = interfaces.iter().position(|interface| is_wired(interface));
    let idx = wired.unwrap_or(0);
    interfaces.into_iter().nth(idx)
}

fn is_wired(interface: &NetworkInterface) -> bool {
    is_physical(interface) && !is_wireless(interface)
}

#[cfg(target_os = "linux")]
mod linux_impl {
    use super::*;
    use std::path::Path;

    pub fn is_physical(interface: &NetworkInterface) -> bool {
        Path::new(&format!("/sys/class/net/{}/device", interface.name)).exists()
    }

    pub fn is_wireless(interface: &NetworkInterface) -> bool {
        Path::new(&format!("/sys/class/net/{}/wireless", interface.name)).exists()
    }
}

#[cfg(target_os = "macos")]
mod macos_impl {
    use super::*;
    use std::collections::HashSet;
    use std::process::Command;
    use std::sync::OnceLock;

    struct HardwarePorts {
        physical: HashSet<String>,
        wireless: HashSet<String>,
    }

    /// Runs `networksetup` once and caches what it reports.
    fn hardware_ports() -> &'static HardwarePorts {
        static PORTS: OnceLock<HardwarePorts> = OnceLock::new();

        PORTS.get_or_init(|| {
            let mut physical = HashSet::new();
            if let Ok(output) = Command::new("networksetup").arg("-listallhardwareports").output() {
                let stdout = String::from_utf8_lossy(&output.stdout);
                for line in stdout.lines() {
                    if let Some(device) = line.strip_prefix("Device: ") {
                        physical.insert(device.trim().to_string());
                    }
                }
            }

            let wireless = physical
                .iter()
                .filter(|device| {
                    Command::new("networksetup")
                        .arg("-getairportnetwork")
                        .arg(device.as_str())
                        .output()
                        .map(|out| out.status.success())
                        .unwrap_or(false)
                })
                .cloned()
                .collect();

            HardwarePorts { physical, wireless }
        })
    }

    pub fn is_physical(interface: &NetworkInterface) -> bool {
        hardware_ports().physical.contains(&interface.name)
    }

    pub fn is_wireless(interface: &NetworkInterface) -> bool {
        hardware_ports().wireless.contains(&interface.name)
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
mod fallback_impl {
    use super::*;

    pub fn is_physical(_interface: &NetworkInterface) -> bool {
        true
    }

    pub fn is_wireless(_interface: &NetworkInterface) -> bool {
        false
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
