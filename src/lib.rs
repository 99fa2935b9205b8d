//! Scene subgraph extraction for serialized game asset containers.
//!
//! The crate crawls the object reference graph of a loaded set of source
//! files, assigns fresh local identifiers to everything reachable from the
//! scene roots, rewrites every embedded object reference to the new
//! identity, and emits a self-consistent pair of output containers.

/// Core extraction modules.
pub mod asset;
