//! Declarative element animations.

/// Phase computation and property sampling.
pub mod anim;
/// Easing curves.
pub mod ease;
