use crate::config::MAX_FINGERPRINT_BITS;

/// Fingerprint stored in a bucket slot. `0` marks an empty slot.
pub type Fingerprint = u8;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;
const MIX_MULTIPLIER: u32 = 0x5bd1_e995;

/// FNV-1a over the key bytes, wrapped to 32 bits.
pub(crate) fn fnv1a(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(FNV_OFFSET_BASIS, |h, b| (h ^ u32::from(*b)).wrapping_mul(FNV_PRIME))
}

// Multiplicative hash of a fingerprint alone, used to derive the alternate
// bucket without the original key.
fn mix(fp: Fingerprint) -> u32 {
    let m = u32::from(fp).wrapping_mul(MIX_MULTIPLIER);
    m ^ (m >> 16)
}

/// Derives the fingerprint and both candidate buckets of a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct KeyHasher {
    num_buckets: u32,
    fp_modulus: u32, // 2^fingerprint_bits - 1
}

impl KeyHasher {
    /// `num_buckets` must be positive and `fingerprint_bits` in 1..=8; both are
    /// checked by the config and the decoder before a hasher is built.
    pub fn new(num_buckets: u32, fingerprint_bits: u32) -> Self {
        assert!(num_buckets > 0, "bucket count must be positive");
        assert!(
            fingerprint_bits > 0 && fingerprint_bits <= MAX_FINGERPRINT_BITS,
            "fingerprint width {} does not fit a slot",
            fingerprint_bits
        );
        Self {
            num_buckets,
            fp_modulus: (1u32 << fingerprint_bits) - 1,
        }
    }

    /// Returns `(fingerprint, index1, index2)`.
    pub fn hash(&self, key: &[u8]) -> (Fingerprint, usize, usize) {
        let h = fnv1a(key);
        let fp = (h % self.fp_modulus + 1) as Fingerprint;
        let i1 = (h % self.num_buckets) as usize;
        (fp, i1, self.alt_index(i1, fp))
    }

    /// The other candidate bucket of `fp` given the one it currently sits in.
    /// This is an involution whenever the bucket count is a power of two.
    #[inline]
    pub fn alt_index(&self, index: usize, fp: Fingerprint) -> usize {
        ((index as u32 ^ mix(fp)) % self.num_buckets) as usize
    }
}
