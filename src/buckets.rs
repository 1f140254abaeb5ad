use crate::hash::Fingerprint;

const EMPTY: Fingerprint = 0;

/// Fixed grid of `count` buckets with `bucket_size` one-byte slots each,
/// stored row after row in a single vector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Buckets {
    data: Vec<Fingerprint>,
    count: usize,
    bucket_size: usize,
}

impl Buckets {
    /// Creates `count` empty buckets of `bucket_size` slots.
    pub fn new(count: usize, bucket_size: usize) -> Self {
        assert!(count > 0 && bucket_size > 0);
        Self {
            data: vec![EMPTY; count * bucket_size],
            count,
            bucket_size,
        }
    }

    /// Rebuilds buckets from slot bytes laid out as returned by [`Buckets::raw_data`].
    pub fn with_raw_data(count: usize, bucket_size: usize, raw_data: &[u8]) -> Self {
        assert!(count > 0 && bucket_size > 0);
        assert_eq!(count * bucket_size, raw_data.len());
        Self {
            data: raw_data.to_vec(),
            count,
            bucket_size,
        }
    }

    pub fn raw_data(&self) -> &[u8] {
        &self.data
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline(always)]
    pub fn bucket_size(&self) -> usize {
        self.bucket_size
    }

    pub fn bucket(&self, bucket: usize) -> &[Fingerprint] {
        let offset = bucket * self.bucket_size;
        &self.data[offset..offset + self.bucket_size]
    }

    fn bucket_mut(&mut self, bucket: usize) -> &mut [Fingerprint] {
        let offset = bucket * self.bucket_size;
        &mut self.data[offset..offset + self.bucket_size]
    }

    /// Writes `fp` into the first empty slot; false if the bucket is full.
    pub fn insert(&mut self, bucket: usize, fp: Fingerprint) -> bool {
        debug_assert!(fp != EMPTY);
        match self.bucket_mut(bucket).iter_mut().find(|slot| **slot == EMPTY) {
            Some(slot) => {
                *slot = fp;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, bucket: usize, fp: Fingerprint) -> bool {
        self.bucket(bucket).contains(&fp)
    }

    /// Empties the first slot holding `fp`; false if none does.
    pub fn remove_one(&mut self, bucket: usize, fp: Fingerprint) -> bool {
        match self.bucket_mut(bucket).iter_mut().find(|slot| **slot == fp) {
            Some(slot) => {
                *slot = EMPTY;
                true
            }
            None => false,
        }
    }

    /// Puts `fp` into `slot` and hands back the previous occupant.
    pub fn swap(&mut self, bucket: usize, slot: usize, fp: Fingerprint) -> Fingerprint {
        std::mem::replace(&mut self.bucket_mut(bucket)[slot], fp)
    }

    /// Number of non-empty slots, found by scanning every bucket.
    pub fn occupied(&self) -> usize {
        self.data.iter().filter(|slot| **slot != EMPTY).count()
    }

    pub fn reset(&mut self) {
        self.data.iter_mut().for_each(|x| *x = EMPTY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_until_full() {
        let mut buckets = Buckets::new(10, 4);
        assert!((1..=4).all(|fp| buckets.insert(3, fp)));
        assert!(!buckets.insert(3, 5));
        assert_eq!(&[1, 2, 3, 4], buckets.bucket(3));
        assert!(buckets.bucket(2).iter().all(|x| *x == 0));
        assert!(buckets.bucket(4).iter().all(|x| *x == 0));
    }

    #[test]
    fn remove_one() {
        let mut buckets = Buckets::new(2, 4);
        buckets.insert(1, 9);
        buckets.insert(1, 7);
        buckets.insert(1, 9);
        assert!(buckets.remove_one(1, 9));
        assert_eq!(&[0, 7, 9, 0], buckets.bucket(1));
        assert!(buckets.contains(1, 9));
        assert!(buckets.remove_one(1, 9));
        assert!(!buckets.contains(1, 9));
        assert!(!buckets.remove_one(1, 9));
        assert!(!buckets.remove_one(0, 7));
    }

    #[test]
    fn insert_fills_first_hole() {
        let mut buckets = Buckets::new(1, 3);
        buckets.insert(0, 1);
        buckets.insert(0, 2);
        buckets.insert(0, 3);
        buckets.remove_one(0, 2);
        assert!(buckets.insert(0, 4));
        assert_eq!(&[1, 4, 3], buckets.bucket(0));
    }

    #[test]
    fn swap() {
        let mut buckets = Buckets::new(2, 2);
        buckets.insert(0, 5);
        buckets.insert(0, 6);
        assert_eq!(6, buckets.swap(0, 1, 8));
        assert_eq!(&[5, 8], buckets.bucket(0));
    }

    #[test]
    fn reset() {
        let mut buckets = Buckets::new(100, 4);
        buckets.insert(1, 1);
        buckets.insert(99, 2);
        assert_eq!(2, buckets.occupied());
        buckets.reset();
        assert_eq!(0, buckets.occupied());
        assert!(!buckets.contains(1, 1));
    }

    #[test]
    fn with_raw_data() {
        let mut buckets = Buckets::new(3, 2);
        buckets.insert(0, 1);
        buckets.insert(2, 200);
        buckets.insert(2, 3);
        assert_eq!(&[1, 0, 0, 0, 200, 3], buckets.raw_data());
        let restored = Buckets::with_raw_data(3, 2, buckets.raw_data());
        assert_eq!(buckets, restored);
    }
}
