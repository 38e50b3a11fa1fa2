//! Frame evaluation: time units, page sequencing, visibility, audio scheduling and the
//! per-frame render list.

/// Root audio track placement and per-frame playback state.
pub mod audio;
/// Composition + frame -> render list.
pub mod evaluator;
/// Frame/second/millisecond conversion and mixed-unit time values.
pub mod time;
/// Page sequencing on the global timeline.
pub mod timeline;
/// Delay-based element visibility.
pub mod visibility;
