use crate::{
    assets::resolve::MediaResolver,
    composition::model::{Audio, Composition},
    eval::time::frames_to_seconds,
    foundation::core::{Fps, FrameIndex, FrameRange},
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Where an audio track sits on the global timeline.
pub struct AudioPlacement {
    /// Audio track id.
    pub audio_id: String,
    /// Global frames during which the track may play.
    pub range: FrameRange,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Audio track sounding at a specific global frame.
pub struct ActiveAudio {
    /// Audio track id.
    pub audio_id: String,
    /// Resolved media source.
    pub src: String,
    /// `false` when the source passed through the resolver unchanged.
    pub src_resolved: bool,
    /// Effective volume (`0` when muted), clamped to `[0, 1]`.
    pub volume: f64,
    /// Source playback rate.
    pub playback_rate: f64,
    /// Pitch multiplier.
    pub tone_frequency: f64,
    /// Position in the source, in seconds.
    pub source_time_s: f64,
    /// Whether the track loops its trimmed window.
    pub looping: bool,
}

/// Place every audio track on the global timeline.
///
/// Audio ignores page boundaries: a track starts at its own `delay` and runs for its
/// `duration`, or until the end of the timeline when no duration is given.
pub fn schedule_audios(comp: &Composition, fps: Fps) -> Vec<AudioPlacement> {
    let total = comp.total_frames();
    comp.audios
        .iter()
        .map(|a| AudioPlacement {
            audio_id: a.id.clone(),
            range: placement(a, fps, total),
        })
        .collect()
}

fn placement(audio: &Audio, fps: Fps, total_frames: u64) -> FrameRange {
    let start = audio.delay.to_frames(fps).round() as u64;
    let end = match &audio.duration {
        Some(d) => start.saturating_add(d.to_frames(fps).round() as u64),
        None => total_frames.max(start),
    };
    FrameRange {
        start: FrameIndex(start),
        end: FrameIndex(end),
    }
}

/// Audio tracks sounding at global `frame`.
///
/// A track is active inside its placement range. Without `loop`, playback also stops once
/// the source position passes `trimAfter`; with `loop` and a non-empty trim window the
/// position wraps inside `[trimBefore, trimAfter)`.
pub fn active_audios(
    comp: &Composition,
    resolver: &MediaResolver<'_>,
    frame: FrameIndex,
    fps: Fps,
) -> Vec<ActiveAudio> {
    let total = comp.total_frames();
    let mut out = Vec::new();
    for audio in &comp.audios {
        let range = placement(audio, fps, total);
        if !range.contains(frame) {
            continue;
        }
        let Some(source_time_s) = source_time(audio, frame.0 - range.start.0, fps) else {
            continue;
        };
        let (src, kind) = resolver.resolve_with_kind(&audio.src);
        let volume = if audio.muted {
            0.0
        } else if audio.volume.is_finite() {
            audio.volume.clamp(0.0, 1.0)
        } else {
            1.0
        };
        out.push(ActiveAudio {
            audio_id: audio.id.clone(),
            src: src.to_string(),
            src_resolved: kind.is_resolved(),
            volume,
            playback_rate: audio.playback_rate,
            tone_frequency: audio.tone_frequency,
            source_time_s,
            looping: audio.looping,
        });
    }
    out
}

fn source_time(audio: &Audio, elapsed_frames: u64, fps: Fps) -> Option<f64> {
    let before = audio.trim_before.unwrap_or(0.0).max(0.0) / 1000.0;
    let elapsed = frames_to_seconds(elapsed_frames as f64, fps) * audio.playback_rate;
    match audio.trim_after.map(|ms| ms / 1000.0) {
        Some(after) if after > before => {
            if audio.looping {
                Some(before + elapsed % (after - before))
            } else {
                let t = before + elapsed;
                (t < after).then_some(t)
            }
        }
        _ => Some(before + elapsed),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/audio.rs"]
mod tests;
