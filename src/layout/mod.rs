//! Group fit-to-bounds layout.

/// Uniform fit-scaling of group children.
pub mod group;
