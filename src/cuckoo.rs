use crate::buckets::Buckets;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::hash::{Fingerprint, KeyHasher};
use crate::{MembershipFilter, RemovableFilter};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Upper bound on displacements tried by a single `add`.
pub const MAX_KICKS: usize = 500;

/// Partial-key cuckoo filter over string or byte keys.
///
/// Each key is reduced to a small fingerprint that may live in one of two
/// buckets; the second bucket is derived from the first and the fingerprint
/// alone, so stored fingerprints can be moved and deleted without their keys.
///
/// The filter is a plain single-owner value. Sharing it between tasks needs
/// an outside lock or a single owning task that applies every mutation.
#[derive(Clone, Debug)]
pub struct CuckooFilter<R = StdRng> {
    buckets: Buckets,
    hasher: KeyHasher,
    fingerprint_bits: u32,
    count: usize, // successful adds minus successful removes
    rng: R,       // picks the kick start bucket and victim slots
}

impl CuckooFilter<StdRng> {
    /// Creates an empty filter whose random source is seeded from the OS.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> CuckooFilter<R> {
    /// Creates an empty filter drawing eviction choices from `rng`.
    /// Seeded generators make the eviction sequence reproducible.
    pub fn with_rng(config: Config, rng: R) -> Result<Self> {
        config.validate()?;
        let num_buckets = config.num_buckets().ok_or(Error::InvalidConfig("capacity is too large"))?;
        let buckets = Buckets::new(num_buckets, config.bucket_size);
        Ok(Self::from_parts(buckets, config.fingerprint_bits, 0, rng))
    }

    pub(crate) fn from_parts(buckets: Buckets, fingerprint_bits: u32, count: usize, rng: R) -> Self {
        let hasher = KeyHasher::new(buckets.len() as u32, fingerprint_bits);
        Self {
            buckets,
            hasher,
            fingerprint_bits,
            count,
            rng,
        }
    }

    pub(crate) fn buckets(&self) -> &Buckets {
        &self.buckets
    }

    /// Number of stored fingerprints. Colliding keys are counted once per
    /// successful `add`, so this approximates the set size.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Total slots, `num_buckets * bucket_size`.
    pub fn capacity(&self) -> usize {
        self.buckets.len() * self.buckets.bucket_size()
    }

    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    pub fn bucket_size(&self) -> usize {
        self.buckets.bucket_size()
    }

    pub fn fingerprint_bits(&self) -> u32 {
        self.fingerprint_bits
    }

    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.capacity() as f64
    }

    // Bounded random walk: push `fp` into a random slot of `index`, then try to
    // place the evicted fingerprint in its alternate bucket.
    //
    // Swaps are not undone on failure. The fingerprint still in hand after the
    // last kick is dropped, so whichever key owned it stops being reported as
    // present.
    fn relocate(&mut self, mut fp: Fingerprint, mut index: usize) -> bool {
        debug!("both candidate buckets full, kicking from bucket {}", index);
        let bucket_size = self.buckets.bucket_size();
        for _ in 0..MAX_KICKS {
            let slot = self.rng.gen_range(0..bucket_size);
            fp = self.buckets.swap(index, slot, fp);
            index = self.hasher.alt_index(index, fp);
            if self.buckets.insert(index, fp) {
                self.count = self.count.saturating_add(1);
                return true;
            }
        }
        warn!(
            "cuckoo filter gave up after {} kicks at {}/{} slots, dropped fingerprint {}",
            MAX_KICKS,
            self.count,
            self.capacity(),
            fp
        );
        false
    }
}

impl<R: Rng> MembershipFilter for CuckooFilter<R> {
    /// Returns false once the filter cannot place the fingerprint within
    /// [`MAX_KICKS`] displacements; the caller should move to a larger filter.
    fn add<K: AsRef<[u8]> + ?Sized>(&mut self, key: &K) -> bool {
        let (fp, i1, i2) = self.hasher.hash(key.as_ref());
        if self.buckets.insert(i1, fp) || self.buckets.insert(i2, fp) {
            self.count = self.count.saturating_add(1);
            return true;
        }
        let start = if self.rng.gen::<bool>() { i1 } else { i2 };
        self.relocate(fp, start)
    }

    fn contains<K: AsRef<[u8]> + ?Sized>(&self, key: &K) -> bool {
        let (fp, i1, i2) = self.hasher.hash(key.as_ref());
        self.buckets.contains(i1, fp) || self.buckets.contains(i2, fp)
    }

    fn clear(&mut self) {
        self.buckets.reset();
        self.count = 0;
    }
}

impl<R: Rng> RemovableFilter for CuckooFilter<R> {
    /// Deletes one matching fingerprint. A different key sharing the same
    /// fingerprint and buckets may lose its entry instead.
    fn remove<K: AsRef<[u8]> + ?Sized>(&mut self, key: &K) -> bool {
        let (fp, i1, i2) = self.hasher.hash(key.as_ref());
        if self.buckets.remove_one(i1, fp) || self.buckets.remove_one(i2, fp) {
            self.count = self.count.saturating_sub(1);
            true
        } else {
            false
        }
    }
}
