//! Per-element visibility on a page.
//!
//! One rule only: an element appears once its delay has elapsed and stays visible until its
//! page ends. The page (the sequencing container) bounds the element's lifetime; there is
//! no per-element end time. A nested element's delay counts from the moment its group
//! appears, so its effective delay is the sum of its ancestors' delays and its own.

use crate::{composition::model::Element, foundation::core::Fps};

/// `true` once `local_frame` has reached `delay_frames`.
pub fn is_visible_after(delay_frames: f64, local_frame: u64) -> bool {
    local_frame as f64 >= delay_frames
}

/// Whether a top-level `element` is visible at page-local frame `local_frame`.
pub fn is_visible(element: &Element, local_frame: u64, fps: Fps) -> bool {
    is_visible_after(element.base().delay.to_frames(fps), local_frame)
}

/// Effective delay of `element` nested under ancestors whose delays sum to `parent_delay`.
pub fn effective_delay(element: &Element, parent_delay: f64, fps: Fps) -> f64 {
    parent_delay + element.base().delay.to_frames(fps)
}
