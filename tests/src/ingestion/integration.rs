#![cfg(test)]
use std::io;
use std::net::Ipv4Addr;
use std::sync::Arc;

use addrbook_common::config::CaptureConfig;
use addrbook_common::{Address, AddressRepository};
use addrbook_core::network::capture;
use addrbook_core::{IngestStats, MemoryStore, ingest};
use addrbook_protocols::arp::{self, ArpLayer};
use addrbook_protocols::dhcp::{self, DhcpMessage, DhcpOption, MessageType, options};
use addrbook_protocols::frame;
use pnet::datalink::{NetworkInterface, dummy};
use pnet::packet::arp::ArpOperations;
use pnet::util::MacAddr;
use tokio::sync::mpsc;

const HOST_MAC: MacAddr = MacAddr(0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa);
const ROUTER_MAC: MacAddr = MacAddr(0xbb, 0xbb, 0xbb, 0xbb, 0xbb, 0xbb);

fn arp_request_frame() -> Vec<u8> {
    let layer = ArpLayer {
        operation: ArpOperations::Request,
        sender_hw_addr: HOST_MAC,
        sender_proto_addr: Ipv4Addr::new(192, 168, 1, 10),
        target_hw_addr: MacAddr::zero(),
        target_proto_addr: Ipv4Addr::new(192, 168, 1, 1),
    };
    arp::create_packet(&layer, MacAddr::broadcast()).unwrap()
}

fn arp_reply_frame() -> Vec<u8> {
    let layer = ArpLayer {
        operation: ArpOperations::Reply,
        sender_hw_addr: ROUTER_MAC,
        sender_proto_addr: Ipv4Addr::new(192, 168, 1, 1),
        target_hw_addr: HOST_MAC,
        target_proto_addr: Ipv4Addr::new(192, 168, 1, 10),
    };
    arp::create_packet(&layer, HOST_MAC).unwrap()
}

fn dhcp_frame(kind: MessageType, yiaddr: Ipv4Addr, extra: Vec<DhcpOption>) -> Vec<u8> {
    let mut all = vec![DhcpOption::message_type(kind)];
    all.extend(extra);
    let message = DhcpMessage {
        your_client_ip: yiaddr,
        client_hw_addr: HOST_MAC.octets().to_vec(),
        options: all,
    };
    dhcp::create_packet(&message, ROUTER_MAC, Ipv4Addr::new(192, 168, 1, 1)).unwrap()
}

async fn ingest_frames(store: Arc<MemoryStore>, frames: Vec<Vec<u8>>) -> IngestStats {
    let (tx, rx) = mpsc::unbounded_channel();
    for bytes in frames {
        tx.send(frame::decode(&bytes).unwrap()).unwrap();
    }
    drop(tx);
    ingest::spawn(rx, store).await.unwrap()
}

#[tokio::test]
async fn arp_request_and_dhcp_ack_should_yield_one_record() {
    let store = Arc::new(MemoryStore::new());
    let stats = ingest_frames(
        Arc::clone(&store),
        vec![
            arp_request_frame(),
            dhcp_frame(MessageType::Ack, Ipv4Addr::new(192, 168, 1, 10), vec![]),
        ],
    )
    .await;

    assert_eq!(stats.committed, 2);
    let all: Vec<Address> = store.list_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].ip, "192.168.1.10");
    assert_eq!(all[0].mac, "aa:aa:aa:aa:aa:aa");
}

#[tokio::test]
async fn dhcp_exchange_should_follow_a_host_to_its_new_lease() {
    let store = Arc::new(MemoryStore::new());
    ingest_frames(
        Arc::clone(&store),
        vec![
            arp_request_frame(),
            dhcp_frame(MessageType::Discover, Ipv4Addr::UNSPECIFIED, vec![]),
            dhcp_frame(MessageType::Offer, Ipv4Addr::new(192, 168, 1, 50), vec![]),
            dhcp_frame(
                MessageType::Request,
                Ipv4Addr::UNSPECIFIED,
                vec![
                    DhcpOption::new(options::REQUESTED_IP, [192, 168, 1, 50]),
                    DhcpOption::new(options::CLIENT_ID, HOST_MAC.octets()),
                ],
            ),
            dhcp_frame(MessageType::Ack, Ipv4Addr::new(192, 168, 1, 50), vec![]),
        ],
    )
    .await;

    let all: Vec<Address> = store.list_all().unwrap();
    assert_eq!(all.len(), 1, "the host kept one identity: {all:?}");
    assert_eq!(all[0].ip, "192.168.1.50");
    assert_eq!(store.find_by_ip("192.168.1.10").unwrap(), None);
}

#[tokio::test]
async fn arp_reply_should_record_both_ends() {
    let store = Arc::new(MemoryStore::new());
    let stats = ingest_frames(Arc::clone(&store), vec![arp_reply_frame()]).await;

    assert_eq!(stats.candidates, 2);
    assert_eq!(
        store.find_by_mac("bb:bb:bb:bb:bb:bb").unwrap().unwrap().ip,
        "192.168.1.1"
    );
    assert_eq!(
        store.find_by_mac("aa:aa:aa:aa:aa:aa").unwrap().unwrap().ip,
        "192.168.1.10"
    );
}

#[tokio::test]
async fn capture_feed_should_drive_ingestion_until_it_closes() {
    let mut dummy_cfg = dummy::Config::default();
    let injector = dummy_cfg.inject_handle().unwrap();
    let intf: NetworkInterface = dummy::dummy_interface(0);
    let handle = capture::start_capture_with(&intf, &CaptureConfig::default(), move |i, _| {
        dummy::channel(i, dummy_cfg)
    })
    .unwrap();

    let store = Arc::new(MemoryStore::new());
    let ingestion = ingest::spawn(handle.rx, Arc::clone(&store));

    injector.send(Ok(arp_reply_frame().into_boxed_slice())).unwrap();
    injector
        .send(Ok(dhcp_frame(MessageType::Ack, Ipv4Addr::new(192, 168, 1, 10), vec![])
            .into_boxed_slice()))
        .unwrap();
    for _ in 0..64 {
        if injector
            .send(Err(io::Error::new(io::ErrorKind::Other, "link down")))
            .is_err()
        {
            break;
        }
    }

    let stats = ingestion.await.unwrap();
    assert_eq!(stats.frames, 2);
    assert_eq!(store.len(), 2);
    assert!(store.find_by_ip("192.168.1.10").unwrap().is_some());
}
