//! Persistence boundary for encoded filters.
//!
//! The filter does no I/O. A [`SnapshotStore`] keeps encoded buffers under
//! caller-chosen ids and hands them back unmodified. Every save carries the
//! version the caller last read, so two writers racing on one id cannot
//! silently overwrite each other.

use crate::cuckoo::CuckooFilter;
use crate::error::{Error, Result};
use bytes::Bytes;
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::HashMap;

/// Optimistic concurrency token, bumped on every successful save.
pub type Version = u64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub data: Bytes,
    pub version: Version,
}

pub trait SnapshotStore {
    fn load(&self, id: &str) -> Result<Option<Snapshot>>;

    /// Stores `data` if the current version of `id` equals `expected`
    /// (`None` meaning no snapshot exists yet) and returns the new version.
    fn save(&mut self, id: &str, data: Bytes, expected: Option<Version>) -> Result<Version>;
}

/// In-process store backed by a map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    snapshots: HashMap<String, Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, id: &str) -> Result<Option<Snapshot>> {
        Ok(self.snapshots.get(id).cloned())
    }

    fn save(&mut self, id: &str, data: Bytes, expected: Option<Version>) -> Result<Version> {
        let actual = self.snapshots.get(id).map(|s| s.version);
        if actual != expected {
            return Err(Error::VersionConflict {
                id: id.to_owned(),
                expected,
                actual,
            });
        }
        let version = actual.map_or(1, |v| v + 1);
        self.snapshots.insert(id.to_owned(), Snapshot { data, version });
        Ok(version)
    }
}

impl<R: Rng> CuckooFilter<R> {
    /// Encodes the filter into `store` under `id`.
    pub fn persist<S: SnapshotStore + ?Sized>(&self, store: &mut S, id: &str, expected: Option<Version>) -> Result<Version> {
        let version = store.save(id, self.encode(), expected)?;
        debug!("persisted cuckoo filter {:?} at version {}", id, version);
        Ok(version)
    }
}

impl CuckooFilter<StdRng> {
    /// Loads and decodes the snapshot stored under `id` together with the
    /// version to pass back to [`CuckooFilter::persist`].
    pub fn restore<S: SnapshotStore + ?Sized>(store: &S, id: &str) -> Result<Option<(Self, Version)>> {
        match store.load(id)? {
            Some(snapshot) => Ok(Some((Self::decode(&snapshot.data)?, snapshot.version))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::FormatError;
    use crate::{MembershipFilter, RemovableFilter};

    #[test]
    fn persist_and_restore() {
        let mut store = MemoryStore::new();
        let mut filter = CuckooFilter::new(Config::default().with_capacity(256)).unwrap();
        filter.add("203.0.113.7");
        filter.add("198.51.100.23");
        assert_eq!(1, filter.persist(&mut store, "blocklist", None).unwrap());

        let (mut restored, version) = CuckooFilter::restore(&store, "blocklist").unwrap().unwrap();
        assert_eq!(1, version);
        assert!(restored.contains("203.0.113.7"));
        assert!(restored.remove("198.51.100.23"));
        assert_eq!(2, restored.persist(&mut store, "blocklist", Some(version)).unwrap());

        let (restored, version) = CuckooFilter::restore(&store, "blocklist").unwrap().unwrap();
        assert_eq!(2, version);
        assert_eq!(1, restored.len());
    }

    #[test]
    fn missing_snapshot() {
        let store = MemoryStore::new();
        assert!(CuckooFilter::restore(&store, "absent").unwrap().is_none());
    }

    #[test]
    fn stale_version_conflicts() {
        let mut store = MemoryStore::new();
        let filter = CuckooFilter::new(Config::default().with_capacity(64)).unwrap();
        assert_eq!(1, filter.persist(&mut store, "dedup", None).unwrap());
        assert_eq!(2, filter.persist(&mut store, "dedup", Some(1)).unwrap());
        assert_eq!(
            Err(Error::VersionConflict {
                id: "dedup".to_owned(),
                expected: Some(1),
                actual: Some(2),
            }),
            filter.persist(&mut store, "dedup", Some(1))
        );
        assert!(filter.persist(&mut store, "dedup", None).is_err());
        assert_eq!(2, store.load("dedup").unwrap().unwrap().version);
    }

    #[test]
    fn corrupt_snapshot_is_a_format_error() {
        let mut store = MemoryStore::new();
        store.save("bad", Bytes::from_static(&[1, 2, 3]), None).unwrap();
        match CuckooFilter::restore(&store, "bad") {
            Err(Error::Format(FormatError::TruncatedHeader { .. })) => {}
            other => panic!("unexpected result: {:?}", other.map(|o| o.map(|(_, v)| v))),
        }
    }
}
