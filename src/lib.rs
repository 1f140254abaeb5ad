//! Approximate set membership with deletion, backed by a partial-key cuckoo
//! filter and a fixed little-endian byte format for persisting it.

mod buckets;
mod codec;
mod config;
mod cuckoo;
mod error;
mod hash;
mod store;

pub use codec::HEADER_SIZE;
pub use config::{Config, MAX_FINGERPRINT_BITS};
pub use cuckoo::{CuckooFilter, MAX_KICKS};
pub use error::{Error, FormatError, Result};
pub use hash::Fingerprint;
pub use store::{MemoryStore, Snapshot, SnapshotStore, Version};

pub trait MembershipFilter {
    fn add<K: AsRef<[u8]> + ?Sized>(&mut self, key: &K) -> bool;
    fn contains<K: AsRef<[u8]> + ?Sized>(&self, key: &K) -> bool;
    fn clear(&mut self);
}

pub trait RemovableFilter {
    fn remove<K: AsRef<[u8]> + ?Sized>(&mut self, key: &K) -> bool;
}
