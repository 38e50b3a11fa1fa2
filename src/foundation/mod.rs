//! Shared primitives: frame/fps types, geometry re-exports, errors and id hashing.

/// Frame, frame-range and fps types plus `kurbo` geometry re-exports.
pub mod core;
/// Error taxonomy.
pub mod error;
pub(crate) mod ids;
