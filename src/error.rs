use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),

    #[error("malformed filter buffer: {0}")]
    Format(#[from] FormatError),

    #[error("snapshot {id:?} was modified concurrently: expected version {expected:?}, found {actual:?}")]
    VersionConflict {
        id: String,
        expected: Option<u64>,
        actual: Option<u64>,
    },
}

/// Reasons a serialized buffer is rejected by the decoder.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("buffer holds {actual} bytes, header needs {expected}")]
    TruncatedHeader { expected: usize, actual: usize },

    #[error("header field `{0}` is zero")]
    ZeroDimension(&'static str),

    #[error("fingerprint width {0} is outside 1..=8 bits")]
    UnsupportedFingerprintBits(u32),

    #[error("{num_buckets} buckets of {bucket_size} slots overflow the address space")]
    PayloadOverflow { num_buckets: u32, bucket_size: u32 },

    #[error("buffer holds {actual} bytes, header implies {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}
