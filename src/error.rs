//! Error kinds returned by the registry and the per-region synthesizers.
//!
//! `host_read`/`host_write` never surface these: they are caught at the
//! `Emulator` boundary, logged, and turned into a zero-fill or no-op.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Offset or size violated a region's required alignment (2 bytes for
    /// the FAT, 32 bytes for the root directory).
    Alignment,
    /// The filename arena or the file-entry table has no room left.
    NoRoom,
    /// Cluster allocation would run past [`crate::layout::CLUSTER_LIMIT`].
    OutOfClusters,
    /// A required callback was missing (only reachable through the
    /// `bindings` FFI surface, where callbacks are nullable function
    /// pointers; the safe Rust API takes `&mut dyn` references and so
    /// cannot observe this by construction).
    MissingCallback,
    /// Static registration attempted after a fixed-cluster dynamic
    /// registration pinned `next_free_cluster` to zero.
    Closed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::Alignment => "offset/size violates the region's required alignment",
            Error::NoRoom => "filename arena or file-entry table is full",
            Error::OutOfClusters => "cluster allocation would exceed the FAT16 cluster limit",
            Error::MissingCallback => "a required callback was missing",
            Error::Closed => "registry is closed to further static registrations",
        };
        f.write_str(msg)
    }
}

// Mirrors the teacher's `using_std!` gate in `storage.rs`: `std::error::Error`
// is only implementable when `std` is actually linked.
crate::using_std! {
    impl std::error::Error for Error {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_non_empty_for_every_kind() {
        let kinds = [
            Error::Alignment,
            Error::NoRoom,
            Error::OutOfClusters,
            Error::MissingCallback,
            Error::Closed,
        ];
        for k in kinds {
            assert!(!k.to_string().is_empty());
        }
    }
}
