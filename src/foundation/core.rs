use crate::foundation::error::{StoryboardError, StoryboardResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Frame rate used when a composition omits `fps`.
pub const DEFAULT_FPS: u32 = 30;

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
/// Zero-based frame position on a timeline.
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Half-open frame interval `[start, end)`.
pub struct FrameRange {
    /// First frame inside the range.
    pub start: FrameIndex,
    /// First frame after the range.
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> StoryboardResult<Self> {
        if start.0 > end.0 {
            return Err(StoryboardError::validation(
                "FrameRange start must be <= end",
            ));
        }
        Ok(Self { start, end })
    }

    /// `true` when `f` lies inside `[start, end)`.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
/// Integer frames-per-second of a composition.
///
/// Construction through [`Fps::new`] guarantees a positive rate. Deserialized values are
/// checked by [`crate::Composition::validate`].
pub struct Fps(pub u32);

impl Default for Fps {
    fn default() -> Self {
        Self(DEFAULT_FPS)
    }
}

impl Fps {
    /// Build a frame rate, rejecting zero.
    pub fn new(fps: u32) -> StoryboardResult<Self> {
        if fps == 0 {
            return Err(StoryboardError::validation("fps must be > 0"));
        }
        Ok(Self(fps))
    }

    /// Rate as `f64`.
    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }

    /// Return `self` if positive, otherwise `fallback`.
    pub fn or_fallback(self, fallback: u32) -> Self {
        if self.0 == 0 {
            tracing::warn!(fallback, "fps is 0, using fallback rate");
            Self(fallback.max(1))
        } else {
            self
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
