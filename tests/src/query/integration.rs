#![cfg(test)]
use std::net::Ipv4Addr;
use std::sync::Arc;

use addrbook_core::api::{self, SharedRepository};
use addrbook_core::{MemoryStore, ingest};
use addrbook_protocols::arp::{self, ArpLayer};
use addrbook_protocols::frame;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use pnet::packet::arp::ArpOperations;
use pnet::util::MacAddr;
use tokio::sync::mpsc;
use tower::ServiceExt;

async fn observed_directory() -> SharedRepository {
    let reply = ArpLayer {
        operation: ArpOperations::Reply,
        sender_hw_addr: MacAddr::new(0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa),
        sender_proto_addr: Ipv4Addr::new(192, 168, 1, 5),
        target_hw_addr: MacAddr::new(0xbb, 0xbb, 0xbb, 0xbb, 0xbb, 0xbb),
        target_proto_addr: Ipv4Addr::new(192, 168, 1, 1),
    };
    let bytes = arp::create_packet(&reply, reply.target_hw_addr).unwrap();

    let repository: SharedRepository = Arc::new(MemoryStore::new());
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(frame::decode(&bytes).unwrap()).unwrap();
    drop(tx);
    ingest::spawn(rx, Arc::clone(&repository)).await.unwrap();
    repository
}

async fn get_json(repository: SharedRepository, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = api::create_router(repository)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn observed_addresses_should_be_queryable_by_ip_and_mac() {
    let repository = observed_directory().await;

    let (status, by_ip) = get_json(Arc::clone(&repository), "/address?ip=192.168.1.5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_ip["mac"], "aa:aa:aa:aa:aa:aa");

    let (status, by_mac) =
        get_json(Arc::clone(&repository), "/address?mac=aa:aa:aa:aa:aa:aa").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_mac, by_ip);
}

#[tokio::test]
async fn address_book_should_list_every_observation() {
    let repository = observed_directory().await;

    let (status, book) = get_json(repository, "/address-book").await;
    assert_eq!(status, StatusCode::OK);
    let ips: Vec<&str> = book
        .as_array()
        .unwrap()
        .iter()
        .map(|address| address["ip"].as_str().unwrap())
        .collect();
    assert_eq!(ips.len(), 2);
    assert!(ips.contains(&"192.168.1.5"));
    assert!(ips.contains(&"192.168.1.1"));
}

#[tokio::test]
async fn unknown_address_should_be_not_found() {
    let repository = observed_directory().await;

    let (status, body) = get_json(repository, "/address?mac=cc:cc:cc:cc:cc:cc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "address not found");
}
