//! Error types for the engine.

use thiserror::Error;

/// Errors returned by store operations.
///
/// `NotFound` doubles as a normal outcome for point lookups on absent or
/// logically expired keys; the detail string distinguishes physical absence
/// (`""`) from staleness (`"stale"`) without splitting the variant.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The key or sub-record is absent, or its meta record has expired.
    #[error("not found {0}")]
    NotFound(&'static str),

    /// A caller-supplied argument is out of contract (bad TTL, negative bit
    /// offset, overflowing increment, non-finite float result, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Stored bytes do not decode as expected for their record shape, or an
    /// operation addressed a slot that cannot exist (e.g. LSET out of range).
    #[error("corruption: {0}")]
    Corruption(String),

    /// Filesystem error outside the ordered store itself (e.g. creating
    /// the per-type directories).
    #[error("io error: {0}")]
    Io(String),

    /// Error bubbled up from the underlying ordered store. Never swallowed.
    #[error(transparent)]
    Rocks(#[from] rocksdb::Error),
}

impl Error {
    /// Plain "no such key".
    pub(crate) fn not_found() -> Self {
        Error::NotFound("")
    }

    /// The meta record exists physically but its timestamp has passed.
    pub(crate) fn stale() -> Self {
        Error::NotFound("stale")
    }

    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub(crate) fn corruption(msg: impl Into<String>) -> Self {
        Error::Corruption(msg.into())
    }

    /// True for every flavor of `NotFound`, stale included.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// True only for the stale flavor of `NotFound`.
    pub fn is_stale(&self) -> bool {
        matches!(self, Error::NotFound("stale"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_flavors() {
        assert!(Error::not_found().is_not_found());
        assert!(Error::stale().is_not_found());
        assert!(Error::stale().is_stale());
        assert!(!Error::not_found().is_stale());
        assert!(!Error::corruption("x").is_not_found());
    }

    #[test]
    fn display_carries_detail() {
        let err = Error::invalid_argument("invalid expire time");
        assert_eq!(err.to_string(), "invalid argument: invalid expire time");
    }
}
