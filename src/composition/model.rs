use std::collections::{BTreeMap, HashSet};

use crate::{
    animation::ease::Ease,
    eval::time::{TimeValue, frames_to_seconds},
    foundation::core::{DEFAULT_FPS, Fps},
    foundation::error::{StoryboardError, StoryboardResult},
};

/// Group nesting depth accepted by validation and evaluation defaults.
pub const DEFAULT_MAX_GROUP_DEPTH: usize = 32;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Document model of a video project: ordered pages, frame rate, canvas and audio tracks.
///
/// Page order is playback order. The composition is a plain data value; evaluation never
/// mutates it (see [`crate::Evaluator`]).
pub struct Composition {
    /// Pages in playback order.
    #[serde(default)]
    pub pages: Vec<Page>,
    /// Integer frame rate. Missing values deserialize as 30.
    #[serde(default = "default_fps")]
    pub fps: Fps,
    /// Canvas width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Canvas height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
    /// Root-level audio tracks placed on the global timeline.
    #[serde(default)]
    pub audios: Vec<Audio>,
}

fn default_fps() -> Fps {
    Fps(DEFAULT_FPS)
}

fn default_width() -> u32 {
    1920
}

fn default_height() -> u32 {
    1080
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A timed segment of the composition with its own element tree.
pub struct Page {
    /// Page id, unique within the composition.
    #[serde(default)]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Duration in frames. Negative or missing values read as 0 (see [`Page::duration_frames`]).
    #[serde(default, deserialize_with = "de_lenient_frames")]
    pub duration: i64,
    /// CSS color string painted behind the elements.
    #[serde(default = "default_background")]
    pub background_color: String,
    /// Elements in document order.
    #[serde(default)]
    pub elements: Vec<Element>,
}

fn default_background() -> String {
    "#ffffff".to_string()
}

fn de_lenient_frames<'de, D>(d: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let v: Option<f64> = serde::Deserialize::deserialize(d)?;
    Ok(match v {
        Some(f) if f.is_finite() => f.round() as i64,
        _ => 0,
    })
}

impl Page {
    /// Duration clamped to `>= 0` frames.
    pub fn duration_frames(&self) -> u64 {
        u64::try_from(self.duration).unwrap_or(0)
    }

    /// Duration as an fps-derived seconds view.
    pub fn duration_seconds(&self, fps: Fps) -> f64 {
        frames_to_seconds(self.duration_frames() as f64, fps)
    }

    /// Depth-first lookup of an element by id, descending into groups.
    pub fn find_element(&self, id: &str) -> Option<&Element> {
        find_in(&self.elements, id)
    }

    /// Mutable variant of [`Page::find_element`].
    pub fn find_element_mut(&mut self, id: &str) -> Option<&mut Element> {
        find_in_mut(&mut self.elements, id)
    }
}

fn find_in<'a>(elements: &'a [Element], id: &str) -> Option<&'a Element> {
    for el in elements {
        if el.id() == id {
            return Some(el);
        }
        if let Some(found) = el.children().and_then(|c| find_in(c, id)) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut<'a>(elements: &'a mut [Element], id: &str) -> Option<&'a mut Element> {
    for el in elements.iter_mut() {
        if el.id() == id {
            return Some(el);
        }
        if let Element::Group(g) = el
            && let Some(found) = find_in_mut(&mut g.elements, id)
        {
            return Some(found);
        }
    }
    None
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
/// A positioned, timed visual unit on a page.
pub enum Element {
    /// Text run.
    Text(TextElement),
    /// Still image.
    Image(ImageElement),
    /// Video clip.
    Video(VideoElement),
    /// Container whose children are fitted into its bounds.
    Group(GroupElement),
}

impl Element {
    /// Shared positional/timing fields.
    pub fn base(&self) -> &ElementBase {
        match self {
            Self::Text(e) => &e.base,
            Self::Image(e) => &e.base,
            Self::Video(e) => &e.base,
            Self::Group(e) => &e.base,
        }
    }

    /// Mutable access to shared fields.
    pub fn base_mut(&mut self) -> &mut ElementBase {
        match self {
            Self::Text(e) => &mut e.base,
            Self::Image(e) => &mut e.base,
            Self::Video(e) => &mut e.base,
            Self::Group(e) => &mut e.base,
        }
    }

    /// Element id.
    pub fn id(&self) -> &str {
        &self.base().id
    }

    /// Serialized variant tag.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Image(_) => "image",
            Self::Video(_) => "video",
            Self::Group(_) => "group",
        }
    }

    /// Group children, `None` for leaf variants.
    pub fn children(&self) -> Option<&[Element]> {
        match self {
            Self::Group(g) => Some(&g.elements),
            Self::Text(_) | Self::Image(_) | Self::Video(_) => None,
        }
    }

    /// Symbolic media reference for image/video variants.
    pub fn src(&self) -> Option<&str> {
        match self {
            Self::Image(e) => Some(&e.src),
            Self::Video(e) => Some(&e.src),
            Self::Text(_) | Self::Group(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Fields common to all element variants.
pub struct ElementBase {
    /// Id, unique within its page (recursively through groups).
    #[serde(default)]
    pub id: String,
    /// X offset in pixels relative to the parent (page or group).
    #[serde(default)]
    pub left: f64,
    /// Y offset in pixels relative to the parent.
    #[serde(default)]
    pub top: f64,
    /// Width in pixels. Optional for text and groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Height in pixels. Text height is always derived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Rotation in degrees, clockwise, about the element centre.
    #[serde(default)]
    pub rotation: f64,
    /// Opacity in `[0, 1]`.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Stacking order among siblings.
    #[serde(default)]
    pub z_index: i32,
    /// Frames to wait after the parent starts before becoming visible.
    #[serde(default, skip_serializing_if = "TimeValue::is_zero")]
    pub delay: TimeValue,
    /// Optional property animation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<Animation>,
}

fn default_opacity() -> f64 {
    1.0
}

impl Default for ElementBase {
    fn default() -> Self {
        Self {
            id: String::new(),
            left: 0.0,
            top: 0.0,
            width: None,
            height: None,
            rotation: 0.0,
            opacity: 1.0,
            z_index: 0,
            delay: TimeValue::default(),
            animation: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Text element payload.
pub struct TextElement {
    /// Shared fields.
    #[serde(flatten)]
    pub base: ElementBase,
    /// UTF-8 content.
    #[serde(default)]
    pub text: String,
    /// Font size in pixels.
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// CSS font family.
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// CSS color.
    #[serde(default = "default_text_color")]
    pub color: String,
    /// Numeric (`700`) or named (`"bold"`) weight.
    #[serde(default)]
    pub font_weight: FontWeight,
    /// Horizontal alignment.
    #[serde(default)]
    pub text_align: TextAlign,
}

fn default_font_size() -> f64 {
    48.0
}

fn default_font_family() -> String {
    "Inter".to_string()
}

fn default_text_color() -> String {
    "#000000".to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
/// CSS font weight.
pub enum FontWeight {
    /// `100..=900`.
    Numeric(u16),
    /// `"normal"`, `"bold"`, ...
    Named(String),
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::Named("normal".to_string())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Horizontal text alignment. Unknown values read as `left`.
pub enum TextAlign {
    /// Centered.
    Center,
    /// Right aligned.
    Right,
    /// Justified.
    Justify,
    /// Left aligned.
    #[default]
    #[serde(other)]
    Left,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Image element payload.
pub struct ImageElement {
    /// Shared fields.
    #[serde(flatten)]
    pub base: ElementBase,
    /// Symbolic media reference (file name, file id, data URI or URL).
    #[serde(default)]
    pub src: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Video element payload.
pub struct VideoElement {
    /// Shared fields.
    #[serde(flatten)]
    pub base: ElementBase,
    /// Symbolic media reference.
    #[serde(default)]
    pub src: String,
    /// Suppress the clip's own audio.
    #[serde(default)]
    pub muted: bool,
    /// Audio volume in `[0, 1]`.
    #[serde(default = "default_volume")]
    pub volume: f64,
    /// Source playback rate multiplier.
    #[serde(default = "default_playback_rate")]
    pub playback_rate: f64,
    /// Restart the clip when it reaches its end.
    #[serde(default, rename = "loop")]
    pub looping: bool,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Group element payload. Children are positioned relative to the group origin.
pub struct GroupElement {
    /// Shared fields. `width`/`height` are optional explicit bounds.
    #[serde(flatten)]
    pub base: ElementBase,
    /// Child elements (same shape, arbitrary nesting).
    #[serde(default, alias = "children")]
    pub elements: Vec<Element>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Declarative property animation attached to an element.
pub struct Animation {
    /// Length of one iteration.
    #[serde(default = "default_animation_duration")]
    pub duration: TimeValue,
    /// Easing curve.
    #[serde(default)]
    pub ease: Ease,
    /// Wait after the element becomes visible.
    #[serde(default)]
    pub delay: TimeValue,
    /// Reverse direction on every other iteration.
    #[serde(default)]
    pub alternate: bool,
    /// Repeat policy.
    #[serde(default, rename = "loop")]
    pub looping: LoopSpec,
    /// When `false` the animation is inert.
    #[serde(default = "default_true")]
    pub autoplay: bool,
    /// Animated properties: name -> `[from, to]`.
    #[serde(default)]
    pub props: BTreeMap<String, [f64; 2]>,
}

fn default_animation_duration() -> TimeValue {
    TimeValue::Frames(30.0)
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
/// `loop: true|false` or an iteration count.
pub enum LoopSpec {
    /// `true` repeats forever, `false` plays once.
    Flag(bool),
    /// Total number of iterations.
    Count(u32),
}

impl Default for LoopSpec {
    fn default() -> Self {
        Self::Flag(false)
    }
}

impl LoopSpec {
    /// Iteration count, `None` meaning infinite.
    pub fn iterations(self) -> Option<u32> {
        match self {
            Self::Flag(true) => None,
            Self::Flag(false) => Some(1),
            Self::Count(n) => Some(n.max(1)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Audio track placed directly on the global timeline, independent of pages.
pub struct Audio {
    /// Track id.
    #[serde(default)]
    pub id: String,
    /// Symbolic media reference.
    #[serde(default)]
    pub src: String,
    /// Global start offset.
    #[serde(default)]
    pub delay: TimeValue,
    /// Play length; `None` plays until the end of the timeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<TimeValue>,
    /// Volume in `[0, 1]`.
    #[serde(default = "default_volume")]
    pub volume: f64,
    /// Silence without removing the track.
    #[serde(default)]
    pub muted: bool,
    /// Repeat the trimmed source window.
    #[serde(default, rename = "loop")]
    pub looping: bool,
    /// Milliseconds cut from the start of the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim_before: Option<f64>,
    /// Source position (milliseconds) after which playback stops or loops.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim_after: Option<f64>,
    /// Source playback rate multiplier.
    #[serde(default = "default_playback_rate")]
    pub playback_rate: f64,
    /// Pitch multiplier applied by the renderer.
    #[serde(default = "default_playback_rate")]
    pub tone_frequency: f64,
}

fn default_volume() -> f64 {
    1.0
}

fn default_playback_rate() -> f64 {
    1.0
}

impl Composition {
    /// Empty composition with the given frame rate and canvas.
    pub fn new(fps: Fps, width: u32, height: u32) -> Self {
        Self {
            pages: Vec::new(),
            fps,
            width,
            height,
            audios: Vec::new(),
        }
    }

    /// Sum of all page durations in frames.
    pub fn total_frames(&self) -> u64 {
        self.pages.iter().map(Page::duration_frames).sum()
    }

    /// Index of the page with `id`.
    pub fn page_index(&self, id: &str) -> Option<usize> {
        self.pages.iter().position(|p| p.id == id)
    }

    /// Validate structural invariants.
    ///
    /// Only impossibilities are rejected: zero fps or canvas, missing or duplicate ids and
    /// group nesting beyond [`DEFAULT_MAX_GROUP_DEPTH`]. Recoverable oddities (negative
    /// durations, out-of-range opacity) are left to evaluation, which clamps them.
    pub fn validate(&self) -> StoryboardResult<()> {
        self.validate_with_depth(DEFAULT_MAX_GROUP_DEPTH)
    }

    /// [`Composition::validate`] with an explicit nesting limit.
    pub fn validate_with_depth(&self, max_group_depth: usize) -> StoryboardResult<()> {
        if self.fps.0 == 0 {
            return Err(StoryboardError::validation("fps must be > 0"));
        }
        if self.width == 0 || self.height == 0 {
            return Err(StoryboardError::validation(
                "composition width/height must be > 0",
            ));
        }

        let mut page_ids = HashSet::new();
        for (i, page) in self.pages.iter().enumerate() {
            if page.id.trim().is_empty() {
                return Err(StoryboardError::validation(format!(
                    "page #{i} has an empty id (normalize ids after loading)"
                )));
            }
            if !page_ids.insert(page.id.as_str()) {
                return Err(StoryboardError::validation(format!(
                    "duplicate page id '{}'",
                    page.id
                )));
            }
            let mut element_ids = HashSet::new();
            validate_elements(&page.id, &page.elements, &mut element_ids, 0, max_group_depth)?;
        }

        let mut audio_ids = HashSet::new();
        for audio in &self.audios {
            if audio.id.trim().is_empty() {
                return Err(StoryboardError::validation("audio id must be non-empty"));
            }
            if !audio_ids.insert(audio.id.as_str()) {
                return Err(StoryboardError::validation(format!(
                    "duplicate audio id '{}'",
                    audio.id
                )));
            }
            if !audio.playback_rate.is_finite() || audio.playback_rate <= 0.0 {
                return Err(StoryboardError::validation(format!(
                    "audio '{}' playbackRate must be finite and > 0",
                    audio.id
                )));
            }
        }

        Ok(())
    }
}

fn validate_elements<'a>(
    page_id: &str,
    elements: &'a [Element],
    seen: &mut HashSet<&'a str>,
    depth: usize,
    max_depth: usize,
) -> StoryboardResult<()> {
    for el in elements {
        let id = el.id();
        if id.trim().is_empty() {
            return Err(StoryboardError::validation(format!(
                "page '{page_id}' has a {} element with an empty id (normalize ids after loading)",
                el.kind_name()
            )));
        }
        if !seen.insert(id) {
            return Err(StoryboardError::validation(format!(
                "page '{page_id}' has duplicate element id '{id}'"
            )));
        }
        if let Some(children) = el.children().filter(|c| !c.is_empty()) {
            if depth + 1 > max_depth {
                return Err(StoryboardError::NestingTooDeep {
                    max_depth,
                    element_id: id.to_string(),
                });
            }
            validate_elements(page_id, children, seen, depth + 1, max_depth)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
