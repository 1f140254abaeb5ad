//! Byte format shared with every other implementation of this filter.
//!
//! ```text
//! +-------------+-------------+-----------------+---------+---------------------------------+
//! | num_buckets | bucket_size | fingerprint_bits|  count  | slots, bucket 0..num_buckets-1   |
//! |   u32 LE    |   u32 LE    |     u32 LE      | u32 LE  | num_buckets * bucket_size bytes  |
//! +-------------+-------------+-----------------+---------+---------------------------------+
//! ```
//!
//! `count` is restored as written and never recomputed from the slots.

use crate::buckets::Buckets;
use crate::config::MAX_FINGERPRINT_BITS;
use crate::cuckoo::CuckooFilter;
use crate::error::{FormatError, Result};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const HEADER_SIZE: usize = 16;

impl<R: Rng> CuckooFilter<R> {
    /// Serializes dimensions, count and every slot.
    pub fn encode(&self) -> Bytes {
        let slots = self.buckets().raw_data();
        let mut buf = BytesMut::with_capacity(HEADER_SIZE + slots.len());
        // dimensions fit: Config::validate and decode both bound them to u32
        buf.put_u32_le(self.num_buckets() as u32);
        buf.put_u32_le(self.bucket_size() as u32);
        buf.put_u32_le(self.fingerprint_bits());
        buf.put_u32_le(u32::try_from(self.len()).unwrap_or(u32::MAX));
        buf.put_slice(slots);
        buf.freeze()
    }

    /// Restores a filter written by [`CuckooFilter::encode`], drawing future
    /// eviction choices from `rng`.
    pub fn decode_with_rng(data: &[u8], rng: R) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(FormatError::TruncatedHeader {
                expected: HEADER_SIZE,
                actual: data.len(),
            }
            .into());
        }
        let mut cursor = data;
        let num_buckets = cursor.get_u32_le();
        let bucket_size = cursor.get_u32_le();
        let fingerprint_bits = cursor.get_u32_le();
        let count = cursor.get_u32_le() as usize;

        if num_buckets == 0 {
            return Err(FormatError::ZeroDimension("num_buckets").into());
        }
        if bucket_size == 0 {
            return Err(FormatError::ZeroDimension("bucket_size").into());
        }
        if fingerprint_bits == 0 || fingerprint_bits > MAX_FINGERPRINT_BITS {
            return Err(FormatError::UnsupportedFingerprintBits(fingerprint_bits).into());
        }
        let payload = (num_buckets as usize)
            .checked_mul(bucket_size as usize)
            .filter(|n| n.checked_add(HEADER_SIZE).is_some())
            .ok_or(FormatError::PayloadOverflow {
                num_buckets,
                bucket_size,
            })?;
        if cursor.remaining() != payload {
            return Err(FormatError::LengthMismatch {
                expected: HEADER_SIZE + payload,
                actual: data.len(),
            }
            .into());
        }

        debug!(
            "decoding cuckoo filter: {} buckets x {} slots, {} bit fingerprints, count {}",
            num_buckets, bucket_size, fingerprint_bits, count
        );
        if !num_buckets.is_power_of_two() {
            warn!("bucket count {} is not a power of two, relocated entries may be lost", num_buckets);
        }

        let buckets = Buckets::with_raw_data(num_buckets as usize, bucket_size as usize, cursor);
        let occupied = buckets.occupied();
        if count != occupied {
            warn!("header count {} disagrees with {} occupied slots, keeping header value", count, occupied);
        }
        Ok(Self::from_parts(buckets, fingerprint_bits, count, rng))
    }
}

impl CuckooFilter<StdRng> {
    /// Restores a filter written by [`CuckooFilter::encode`] with an
    /// OS-seeded random source.
    pub fn decode(data: &[u8]) -> Result<Self> {
        Self::decode_with_rng(data, StdRng::from_entropy())
    }
}
