//! Construction options for a cuckoo filter.

use crate::error::{Error, Result};

/// Widest fingerprint the one-byte-per-slot format stores without truncation.
pub const MAX_FINGERPRINT_BITS: u32 = 8;

/// Dimensions a filter is built with. They never change afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Number of items the filter should hold.
    /// Default: 100_000
    pub capacity: usize,

    /// Bits of key hash kept per stored item, 1 through 8.
    /// Default: 8
    pub fingerprint_bits: u32,

    /// Slots per bucket.
    /// Default: 4
    pub bucket_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 100_000,
            fingerprint_bits: 8,
            bucket_size: 4,
        }
    }
}

impl Config {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_fingerprint_bits(mut self, fingerprint_bits: u32) -> Self {
        self.fingerprint_bits = fingerprint_bits;
        self
    }

    pub fn with_bucket_size(mut self, bucket_size: usize) -> Self {
        self.bucket_size = bucket_size;
        self
    }

    /// `ceil(capacity / bucket_size)`, rounded up to a power of two. `None`
    /// for a zero bucket size or a capacity too large to address.
    pub fn num_buckets(&self) -> Option<usize> {
        if self.bucket_size == 0 {
            return None;
        }
        self.capacity
            .checked_add(self.bucket_size - 1)
            .map(|n| n / self.bucket_size)
            .and_then(usize::checked_next_power_of_two)
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::InvalidConfig("capacity must be positive"));
        }
        if self.bucket_size == 0 {
            return Err(Error::InvalidConfig("bucket size must be positive"));
        }
        if self.fingerprint_bits == 0 || self.fingerprint_bits > MAX_FINGERPRINT_BITS {
            return Err(Error::InvalidConfig("fingerprint bits must be within 1..=8"));
        }
        if u32::try_from(self.bucket_size).is_err() {
            return Err(Error::InvalidConfig("bucket size does not fit the header"));
        }
        let num_buckets = self.num_buckets().ok_or(Error::InvalidConfig("capacity is too large"))?;
        if u32::try_from(num_buckets).is_err() || num_buckets.checked_mul(self.bucket_size).is_none() {
            return Err(Error::InvalidConfig("capacity is too large"));
        }
        Ok(())
    }
}
