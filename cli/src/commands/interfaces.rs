use colored::*;
use pnet::datalink::NetworkInterface;

use addrbook_common::network::interface::{self, ViabilityError};
use addrbook_common::network::mac;

use crate::terminal::{colors, print};

type Detail = (String, ColoredString);

pub fn interfaces() {
    let all = interface::list_capture_interfaces();
    if all.is_empty() {
        print::print_status("No interfaces found.");
        return;
    }

    for (idx, (intf, viability)) in all.iter().enumerate() {
        print::tree_head(idx, &intf.name);
        print::as_tree_one_level(details(intf, viability));
    }
}

fn details(intf: &NetworkInterface, viability: &Result<(), ViabilityError>) -> Vec<Detail> {
    let mut details: Vec<Detail> = interface::ipv4_networks(intf)
        .into_iter()
        .map(|network| {
            let value = network.to_string().color(colors::IPV4_ADDR);
            (String::from("IPv4"), value)
        })
        .collect();

    if let Some(hw_addr) = intf.mac {
        details.push((
            String::from("MAC"),
            mac::mac_to_string(hw_addr).color(colors::MAC_ADDR),
        ));
    }

    let capture: ColoredString = match viability {
        Ok(()) => "usable".green().bold(),
        Err(e) => e.to_string().red(),
    };
    details.push((String::from("Capture"), capture));
    details
}
