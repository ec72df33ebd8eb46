//! The ingestion loop: drains a frame feed and writes every extracted
//! candidate into the directory.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use addrbook_common::{AddressRepository, Candidate, StoreError};
use addrbook_protocols::DecodedFrame;
use addrbook_protocols::frame;

/// A sequential source of decoded frames. `None` means the feed is closed.
#[async_trait]
pub trait FrameFeed: Send {
    async fn next_frame(&mut self) -> Option<DecodedFrame>;
}

#[async_trait]
impl FrameFeed for mpsc::UnboundedReceiver<DecodedFrame> {
    async fn next_frame(&mut self) -> Option<DecodedFrame> {
        self.recv().await
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub frames: u64,
    pub candidates: u64,
    pub committed: u64,
    pub failed: u64,
    /// Subset of `failed` rejected because the ip or mac belongs to another
    /// record. A climbing count means the directory no longer follows the
    /// network.
    pub conflicts: u64,
}

pub struct Ingestor<R: ?Sized> {
    repository: Arc<R>,
    stats: IngestStats,
}

impl<R> Ingestor<R>
where
    R: AddressRepository + ?Sized,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            stats: IngestStats::default(),
        }
    }

    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    /// Classifies `frame` and upserts each candidate on its own.
    ///
    /// A failed upsert is logged and skipped; earlier candidates of the same
    /// frame stay committed.
    pub fn handle_frame(&mut self, frame: &DecodedFrame) {
        self.stats.frames += 1;
        for candidate in frame::extract_candidates(frame) {
            self.stats.candidates += 1;
            self.commit(&candidate);
        }
    }

    fn commit(&mut self, candidate: &Candidate) {
        match self.repository.upsert(&candidate.ip, &candidate.mac) {
            Ok(id) => {
                self.stats.committed += 1;
                debug!("Saved address {} as #{}", candidate, id);
            }
            Err(e @ StoreError::Conflict { .. }) => {
                self.stats.failed += 1;
                self.stats.conflicts += 1;
                warn!("Conflicting address {} not saved: {}", candidate, e);
            }
            Err(e) => {
                self.stats.failed += 1;
                warn!("Failed to save address {}: {}", candidate, e);
            }
        }
    }

    /// Runs until the feed closes.
    pub async fn run<F: FrameFeed>(mut self, mut feed: F) -> IngestStats {
        while let Some(frame) = feed.next_frame().await {
            self.handle_frame(&frame);
        }
        info!(
            "Feed closed after {} frames, {} addresses saved, {} failed ({} conflicts)",
            self.stats.frames, self.stats.committed, self.stats.failed, self.stats.conflicts
        );
        self.stats
    }
}

pub fn spawn<F, R>(feed: F, repository: Arc<R>) -> JoinHandle<IngestStats>
where
    F: FrameFeed + 'static,
    R: AddressRepository + ?Sized + 'static,
{
    tokio::spawn(Ingestor::new(repository).run(feed))
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
    use std::net::Ipv4Addr;

    use addrbook_common::{Address, StoreError};
    use addrbook_protocols::arp::ArpLayer;
    use addrbook_protocols::dhcp::{DhcpMessage, DhcpOption, MessageType};
    use addrbook_protocols::icmp::IcmpEcho;
    use parking_lot::Mutex;
    use pnet::packet::arp::ArpOperations;
    use pnet::util::MacAddr;

    use crate::store::MemoryStore;

    /// Rejects one specific ip, records everything else.
    #[derive(Default)]
    struct FlakyRepository {
        reject_ip: String,
        saved: Mutex<Vec<(String, String)>>,
    }

    impl AddressRepository for FlakyRepository {
        fn upsert(&self, ip: &str, mac: &str) -> Result<String, StoreError> {
            if ip == self.reject_ip {
                return Err(StoreError::Conflict {
                    field: "ip",
                    value: ip.to_string(),
                    holder: "someone".to_string(),
                });
            }
            let mut saved = self.saved.lock();
            saved.push((ip.to_string(), mac.to_string()));
            Ok(saved.len().to_string())
        }

        fn find_by_ip(&self, _: &str) -> Result<Option<Address>, StoreError> {
            Ok(None)
        }

        fn find_by_mac(&self, _: &str) -> Result<Option<Address>, StoreError> {
            Ok(None)
        }

        fn list_all(&self) -> Result<Vec<Address>, StoreError> {
            Ok(Vec::new())
        }

        fn len(&self) -> usize {
            self.saved.lock().len()
        }
    }

    fn arp_reply() -> DecodedFrame {
        DecodedFrame::from(ArpLayer {
            operation: ArpOperations::Reply,
            sender_hw_addr: MacAddr::new(0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa),
            sender_proto_addr: Ipv4Addr::new(192, 168, 1, 5),
            target_hw_addr: MacAddr::new(0xbb, 0xbb, 0xbb, 0xbb, 0xbb, 0xbb),
            target_proto_addr: Ipv4Addr::new(192, 168, 1, 1),
        })
    }

    fn arp_request() -> DecodedFrame {
        DecodedFrame::from(ArpLayer {
            operation: ArpOperations::Request,
            sender_hw_addr: MacAddr::new(0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa),
            sender_proto_addr: Ipv4Addr::new(192, 168, 1, 10),
            target_hw_addr: MacAddr::zero(),
            target_proto_addr: Ipv4Addr::new(192, 168, 1, 1),
        })
    }

    fn dhcp_ack() -> DecodedFrame {
        DecodedFrame::from(DhcpMessage {
            your_client_ip: Ipv4Addr::new(192, 168, 1, 10),
            client_hw_addr: vec![0xaa; 6],
            options: vec![DhcpOption::message_type(MessageType::Ack)],
        })
    }

    #[tokio::test]
    async fn run_should_store_arp_request_and_dhcp_ack_as_one_record() {
        let store = Arc::new(MemoryStore::new());
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(arp_request()).unwrap();
        tx.send(dhcp_ack()).unwrap();
        drop(tx);

        let stats = spawn(rx, Arc::clone(&store)).await.unwrap();

        assert_eq!(
            stats,
            IngestStats {
                frames: 2,
                candidates: 2,
                committed: 2,
                failed: 0,
                conflicts: 0
            }
        );
        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].ip, "192.168.1.10");
        assert_eq!(all[0].mac, "aa:aa:aa:aa:aa:aa");
    }

    #[tokio::test]
    async fn run_should_continue_after_failed_upsert() {
        let repository = Arc::new(FlakyRepository {
            reject_ip: "192.168.1.5".to_string(),
            ..Default::default()
        });
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(arp_reply()).unwrap();
        tx.send(arp_request()).unwrap();
        drop(tx);

        let stats = Ingestor::new(Arc::clone(&repository)).run(rx).await;

        assert_eq!(stats.frames, 2);
        assert_eq!(stats.candidates, 3);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.conflicts, 1);
        assert_eq!(stats.committed, 2);
        assert_eq!(
            *repository.saved.lock(),
            vec![
                ("192.168.1.1".to_string(), "bb:bb:bb:bb:bb:bb".to_string()),
                ("192.168.1.10".to_string(), "aa:aa:aa:aa:aa:aa".to_string()),
            ]
        );
    }

    #[test]
    fn handle_frame_should_count_conflicting_observations() {
        let store = Arc::new(MemoryStore::new());
        let mut ingestor = Ingestor::new(Arc::clone(&store));
        ingestor.handle_frame(&arp_reply());
        // 192.168.1.5 belongs to aa:.., bb:.. to 192.168.1.1.
        ingestor.handle_frame(&DecodedFrame::from(ArpLayer {
            operation: ArpOperations::Request,
            sender_hw_addr: MacAddr::new(0xbb, 0xbb, 0xbb, 0xbb, 0xbb, 0xbb),
            sender_proto_addr: Ipv4Addr::new(192, 168, 1, 5),
            target_hw_addr: MacAddr::zero(),
            target_proto_addr: Ipv4Addr::new(192, 168, 1, 1),
        }));

        let stats = ingestor.stats();
        assert_eq!(stats.committed, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.conflicts, 1);
        assert_eq!(store.len(), 2);
        assert_eq!(
            store.find_by_ip("192.168.1.5").unwrap().unwrap().mac,
            "aa:aa:aa:aa:aa:aa"
        );
    }

    #[tokio::test]
    async fn run_should_stop_when_feed_closes() {
        let store = Arc::new(MemoryStore::new());
        let (tx, rx) = mpsc::unbounded_channel::<DecodedFrame>();
        drop(tx);

        let stats = spawn(rx, store).await.unwrap();
        assert_eq!(stats, IngestStats::default());
    }

    #[test]
    fn handle_frame_should_count_frames_without_candidates() {
        let store = Arc::new(MemoryStore::new());
        let mut ingestor = Ingestor::new(Arc::clone(&store));
        ingestor.handle_frame(&DecodedFrame {
            icmp: Some(IcmpEcho::Request),
            ..Default::default()
        });
        ingestor.handle_frame(&DecodedFrame::default());

        assert_eq!(ingestor.stats().frames, 2);
        assert_eq!(ingestor.stats().candidates, 0);
        assert!(store.is_empty());
    }

    #[test]
    fn ingestor_should_accept_trait_objects() {
        let repository: Arc<dyn AddressRepository> = Arc::new(MemoryStore::new());
        let mut ingestor = Ingestor::new(Arc::clone(&repository));
        ingestor.handle_frame(&arp_reply());
        assert_eq!(repository.len(), 2);
    }
}
