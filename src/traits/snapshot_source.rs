//! Contract for the external snapshot-fetching collaborator.

use crate::pools::AnyPool;

/// Fetches fully populated pool snapshots from somewhere outside the
/// math core — an RPC node, an indexer, a fixture file.
///
/// The core never calls this trait; it only defines the seam. An
/// implementation must return a snapshot whose fields are bit-exact
/// with the pool's on-chain state at some single block, so that quotes
/// computed from it reproduce on-chain results within the documented
/// tolerances. Tests that need live data should be skipped when no
/// implementation is available.
pub trait SnapshotSource {
    /// Transport- or decoding-level failure of the implementation.
    type Error;

    /// Returns the snapshot of the pool identified by `pool` (an
    /// address or any identifier the implementation understands).
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn fetch(&self, pool: &str) -> core::result::Result<AnyPool, Self::Error>;
}
