//! Time-base conversion between seconds, milliseconds and frames.
//!
//! Frames are the canonical unit everywhere in the engine. Seconds shown by an editor are
//! always derived views (`frames / fps`) and never stored alongside frame counts.
//!
//! All conversions take an [`Fps`], whose rate is required to be positive; a zero rate is a
//! caller error and is rejected earlier by [`crate::Composition::validate`].

use crate::foundation::core::Fps;

/// `frames / fps`.
pub fn frames_to_seconds(frames: f64, fps: Fps) -> f64 {
    frames / fps.as_f64()
}

/// `round(seconds * fps)`.
pub fn seconds_to_frames(seconds: f64, fps: Fps) -> i64 {
    (seconds * fps.as_f64()).round() as i64
}

/// `floor(ms / 1000 * fps)`.
pub fn ms_to_frames(ms: f64, fps: Fps) -> i64 {
    (ms / 1000.0 * fps.as_f64()).floor() as i64
}

/// Parse a suffixed time string into frames.
///
/// Accepted forms: `"5s"`, `"250ms"`, `"12f"` and bare `"12"` (frames). Surrounding
/// whitespace is ignored. Returns `None` for anything else.
pub fn parse_time(s: &str, fps: Fps) -> Option<f64> {
    let s = s.trim();
    if let Some(n) = s.strip_suffix("ms") {
        let ms = parse_finite(n)?;
        return Some(ms_to_frames(ms, fps) as f64);
    }
    if let Some(n) = s.strip_suffix('s') {
        let secs = parse_finite(n)?;
        return Some(seconds_to_frames(secs, fps) as f64);
    }
    if let Some(n) = s.strip_suffix('f') {
        return parse_finite(n);
    }
    parse_finite(s)
}

fn parse_finite(s: &str) -> Option<f64> {
    let v = s.trim().parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
/// A time field authored either as a frame count or as a suffixed string.
pub enum TimeValue {
    /// Plain number, interpreted as frames.
    Frames(f64),
    /// Suffixed string such as `"2s"` or `"500ms"`.
    Text(String),
}

impl Default for TimeValue {
    fn default() -> Self {
        Self::Frames(0.0)
    }
}

impl From<u64> for TimeValue {
    fn from(frames: u64) -> Self {
        Self::Frames(frames as f64)
    }
}

impl From<&str> for TimeValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl TimeValue {
    /// Convert to frames at `fps`.
    ///
    /// Negative, non-finite or unparseable values degrade to `0` frames.
    pub fn to_frames(&self, fps: Fps) -> f64 {
        let frames = match self {
            Self::Frames(f) => *f,
            Self::Text(s) => match parse_time(s, fps) {
                Some(f) => f,
                None => {
                    tracing::warn!(value = %s, "unparseable time value, using 0 frames");
                    0.0
                }
            },
        };
        if frames.is_finite() { frames.max(0.0) } else { 0.0 }
    }

    /// `true` for a literal zero frame count.
    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Frames(f) if *f == 0.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/time.rs"]
mod tests;
