use std::collections::BTreeMap;

use crate::{composition::model::Animation, foundation::core::Fps};

/// Position inside an animation at a given frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimPhase {
    /// Zero-based iteration index.
    pub iteration: u32,
    /// Eased progress in `[0, 1]` after direction is applied.
    pub progress: f64,
}

/// Compute the phase of `anim` at `frames_since_visible` frames after its element appeared.
///
/// Returns `None` when the animation does not autoplay.
pub fn anim_phase(anim: &Animation, frames_since_visible: f64, fps: Fps) -> Option<AnimPhase> {
    if !anim.autoplay {
        return None;
    }
    let t = frames_since_visible - anim.delay.to_frames(fps);
    let dur = anim.duration.to_frames(fps);
    let iterations = anim.looping.iterations();

    let (iteration, frac) = if t < 0.0 {
        (0, 0.0)
    } else if dur <= 0.0 {
        (iterations.map_or(0, |n| n - 1), 1.0)
    } else {
        let raw = (t / dur).floor();
        let iter = if raw >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            raw as u32
        };
        match iterations {
            Some(n) if iter >= n => (n - 1, 1.0),
            _ => (iter, (t - f64::from(iter) * dur) / dur),
        }
    };

    let directed = if anim.alternate && iteration % 2 == 1 {
        1.0 - frac
    } else {
        frac
    };
    Some(AnimPhase {
        iteration,
        progress: anim.ease.apply(directed),
    })
}

/// Sample every animated property of `anim`.
///
/// Returns an empty map for non-autoplay animations.
pub fn sample_props(anim: &Animation, frames_since_visible: f64, fps: Fps) -> BTreeMap<String, f64> {
    let Some(phase) = anim_phase(anim, frames_since_visible, fps) else {
        return BTreeMap::new();
    };
    anim.props
        .iter()
        .map(|(name, [from, to])| (name.clone(), from + (to - from) * phase.progress))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/animation/anim.rs"]
mod tests;
