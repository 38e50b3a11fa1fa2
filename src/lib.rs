//! Storyboard is the timing and layout core of a page-based video storyboard editor.
//!
//! A project holds a [`Composition`]: ordered pages, each with a duration and a tree of
//! text, image, video and group elements, plus audio tracks on the global timeline. The
//! engine answers, for any frame, which page is showing, which elements are visible, where
//! they sit on the canvas, and which concrete media source each one draws from.
//!
//! # Pipeline overview
//!
//! 1. **Load**: `JSON -> Project` ([`Project::from_reader`]), assigning missing ids once and
//!    validating structural invariants.
//! 2. **Sequence**: page durations are prefix-summed into a [`TimelineLayout`]; a global
//!    frame maps to `(page, local frame)` via [`active_page`].
//! 3. **Evaluate**: [`Evaluator::eval_frame`] walks the active page, applies delays,
//!    animations and group fit-scaling, resolves media through a [`MediaResolver`], and
//!    returns an [`EvaluatedFrame`] render list in painter's order.
//!
//! Pixel rendering and encoding are left to an external renderer that consumes the render
//! list.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Pure evaluation**: evaluating a frame never mutates the composition.
//! - **Frames are canonical**: seconds are always derived as `frames / fps`.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod animation;
mod assets;
mod composition;
mod eval;
mod foundation;
mod layout;

pub use animation::anim::{AnimPhase, anim_phase, sample_props};
pub use animation::ease::Ease;
pub use assets::files::{FileStore, FileTable, InMemoryFileStore, LocalFile};
pub use assets::resolve::{MediaResolver, SourceKind};
pub use composition::dsl::{CompositionBuilder, ElementBuilder, PageBuilder, audio};
pub use composition::model::{
    Animation, Audio, Composition, DEFAULT_MAX_GROUP_DEPTH, Element, ElementBase, FontWeight,
    GroupElement, ImageElement, LoopSpec, Page, TextAlign, TextElement, VideoElement,
};
pub use composition::normalize::normalize_ids;
pub use composition::project::{AppState, ChatMessage, ExportOpts, Project, ViewMode};
pub use eval::audio::{ActiveAudio, AudioPlacement, active_audios, schedule_audios};
pub use eval::evaluator::{EvalOpts, EvaluatedFrame, Evaluator, RenderKind, RenderNode};
pub use eval::time::{TimeValue, frames_to_seconds, ms_to_frames, parse_time, seconds_to_frames};
pub use eval::timeline::{ActivePage, TimelineLayout, active_page, layout_timeline};
pub use eval::visibility::{effective_delay, is_visible, is_visible_after};
pub use foundation::core::{
    Affine, DEFAULT_FPS, Fps, FrameIndex, FrameRange, Point, Rect, Size, Vec2,
};
pub use foundation::error::{StoryboardError, StoryboardResult};
pub use layout::group::{
    DEFAULT_TEXT_LINE_HEIGHT, GroupLayout, LayoutOpts, extent, layout_group, layout_group_with,
    natural_size, scale_element,
};
