//! Local files and symbolic media reference resolution.

/// Uploaded files, the lookup table built from them and the file store seam.
pub mod files;
/// `src` -> concrete source resolution.
pub mod resolve;
