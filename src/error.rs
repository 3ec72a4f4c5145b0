//! Error types for `BucketTable`.

use std::collections::TryReserveError;

/// Failures reported by table accessors and by operations that allocate.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TableError {
    /// A read-only lookup probed every candidate bucket without finding
    /// the key. The table is not modified.
    #[error("key not found")]
    KeyNotFound,

    /// The requested slot count (`bucket_count * C`) does not fit in `usize`.
    #[error("bucket count overflows the addressable slot range")]
    CapacityOverflow,

    /// The allocator could not provide storage for the requested buckets.
    ///
    /// Raised before any existing storage is touched, so the table keeps
    /// its previous contents.
    #[error("failed to allocate bucket storage")]
    AllocationFailure(#[source] TryReserveError),
}
