//! In-memory address directory with unique `id`, `ip` and `mac` indexes.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use tracing::{debug, trace};
use uuid::Uuid;

use addrbook_common::{Address, AddressRepository, StoreError};

#[derive(Debug, Default)]
struct Tables {
    by_id: BTreeMap<String, Address>,
    ip_index: HashMap<String, String>,
    mac_index: HashMap<String, String>,
}

impl Tables {
    fn lookup(
        &self,
        index: &HashMap<String, String>,
        name: &'static str,
        key: &str,
    ) -> Result<Option<Address>, StoreError> {
        let Some(id) = index.get(key) else {
            return Ok(None);
        };
        self.by_id
            .get(id)
            .cloned()
            .map(Some)
            .ok_or_else(|| StoreError::Corrupted {
                index: name,
                key: key.to_string(),
            })
    }

    fn ensure_free(
        index: &HashMap<String, String>,
        field: &'static str,
        value: &str,
        id: &str,
    ) -> Result<(), StoreError> {
        match index.get(value) {
            Some(holder) if holder != id => Err(StoreError::Conflict {
                field,
                value: value.to_string(),
                holder: holder.clone(),
            }),
            _ => Ok(()),
        }
    }
}

/// Process-local [`AddressRepository`].
///
/// One lock guards all three tables, so every upsert is a single
/// all-or-nothing transaction and readers never see a half-applied write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AddressRepository for MemoryStore {
    fn upsert(&self, ip: &str, mac: &str) -> Result<String, StoreError> {
        let mut guard = self.tables.write();
        let tables: &mut Tables = &mut guard;

        // IP match first, MAC match second.
        let existing: Option<String> = tables
            .ip_index
            .get(ip)
            .or_else(|| tables.mac_index.get(mac))
            .cloned();
        let id: String = existing.unwrap_or_else(|| Uuid::now_v7().to_string());

        Tables::ensure_free(&tables.ip_index, "ip", ip, &id)?;
        Tables::ensure_free(&tables.mac_index, "mac", mac, &id)?;

        let record = Address::new(id.clone(), ip, mac);
        match tables.by_id.insert(id.clone(), record) {
            Some(previous) => {
                if previous.ip != ip {
                    tables.ip_index.remove(&previous.ip);
                }
                if previous.mac != mac {
                    tables.mac_index.remove(&previous.mac);
                }
                trace!("Updated {} to {}({})", previous, ip, mac);
            }
            None => debug!("New address {}({}) #{}", ip, mac, id),
        }
        tables.ip_index.insert(ip.to_string(), id.clone());
        tables.mac_index.insert(mac.to_string(), id.clone());

        Ok(id)
    }

    fn find_by_ip(&self, ip: &str) -> Result<Option<Address>, StoreError> {
        let tables = self.tables.read();
        tables.lookup(&tables.ip_index, "ip", ip)
    }

    fn find_by_mac(&self, mac: &str) -> Result<Option<Address>, StoreError> {
        let tables = self.tables.read();
        tables.lookup(&tables.mac_index, "mac", mac)
    }

    fn list_all(&self) -> Result<Vec<Address>, StoreError> {
        Ok(self.tables.read().by_id.values().cloned().collect())
    }

    fn len(&self) -> usize {
        self.tables.read().by_id.len()
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
