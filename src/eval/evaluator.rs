use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::{
    animation::anim::sample_props,
    assets::{files::FileTable, resolve::MediaResolver},
    composition::model::{
        Composition, DEFAULT_MAX_GROUP_DEPTH, Element, ElementBase, FontWeight, GroupElement,
        TextAlign,
    },
    eval::{
        audio::{ActiveAudio, active_audios},
        time::frames_to_seconds,
        timeline::{TimelineLayout, active_page, layout_timeline},
        visibility::{effective_delay, is_visible_after},
    },
    foundation::core::{Affine, DEFAULT_FPS, Fps, FrameIndex, FrameRange, Point, Rect, Size},
    foundation::error::StoryboardResult,
    layout::group::{DEFAULT_TEXT_LINE_HEIGHT, LayoutOpts, layout_group_with},
};

#[derive(Clone, Copy, Debug, PartialEq)]
/// Evaluation knobs.
pub struct EvalOpts {
    /// Group nesting limit passed to layout.
    pub max_group_depth: usize,
    /// Rate used when a composition carries `fps == 0`.
    pub fallback_fps: u32,
    /// `fontSize` multiplier used as text box height.
    pub text_line_height: f64,
}

impl Default for EvalOpts {
    fn default() -> Self {
        Self {
            max_group_depth: DEFAULT_MAX_GROUP_DEPTH,
            fallback_fps: DEFAULT_FPS,
            text_line_height: DEFAULT_TEXT_LINE_HEIGHT,
        }
    }
}

#[derive(Clone, Debug, serde::Serialize)]
/// Everything a renderer needs to draw one frame.
pub struct EvaluatedFrame {
    /// Requested global frame.
    pub frame: FrameIndex,
    /// Index of the active page.
    pub page_index: usize,
    /// Id of the active page.
    pub page_id: String,
    /// Frame relative to the active page's start (clamped at the timeline end).
    pub local_frame: u64,
    /// Canvas size in pixels.
    pub canvas: Size,
    /// Page background color.
    pub background_color: String,
    /// Visible leaf elements in painter's order (back to front).
    pub nodes: Vec<RenderNode>,
    /// Audio tracks sounding at this frame.
    pub audios: Vec<ActiveAudio>,
}

#[derive(Clone, Debug, serde::Serialize)]
/// A visible leaf element with group semantics already applied.
pub struct RenderNode {
    /// Element id.
    pub element_id: String,
    /// Variant payload.
    pub kind: RenderKind,
    /// Resolved media source for image/video nodes.
    pub src: Option<String>,
    /// `false` when `src` passed through the resolver unchanged.
    pub src_resolved: bool,
    /// Box size in the element's local space.
    pub size: Size,
    /// Local box to canvas transform.
    pub transform: Affine,
    /// Axis-aligned canvas bounds of the transformed box.
    pub bbox: Rect,
    /// Opacity multiplied through ancestors, in `[0, 1]`.
    pub opacity: f64,
    /// The element's own `zIndex`.
    pub z_index: i32,
    /// Animated property values sampled at this frame.
    pub animated: BTreeMap<String, f64>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
/// Per-variant render payload.
pub enum RenderKind {
    /// Text run.
    Text {
        /// Content.
        text: String,
        /// Font size after group scaling.
        font_size: f64,
        /// CSS font family.
        font_family: String,
        /// CSS color.
        color: String,
        /// Font weight.
        font_weight: FontWeight,
        /// Horizontal alignment.
        text_align: TextAlign,
    },
    /// Still image.
    Image,
    /// Video clip.
    Video {
        /// Source position in seconds.
        source_time_s: f64,
        /// Clip audio muted.
        muted: bool,
        /// Clip audio volume.
        volume: f64,
        /// Clip loops.
        looping: bool,
    },
}

/// Stateless evaluator from composition to per-frame render lists.
pub struct Evaluator;

impl Evaluator {
    #[tracing::instrument(skip(comp, files))]
    /// Evaluate one frame with default options.
    pub fn eval_frame(
        comp: &Composition,
        files: &FileTable,
        frame: FrameIndex,
    ) -> StoryboardResult<EvaluatedFrame> {
        Self::eval_frame_with_opts(comp, files, frame, &EvalOpts::default())
    }

    /// Evaluate one frame.
    ///
    /// The composition is not validated here; fix-ups (negative durations, zero fps,
    /// out-of-range opacity) are applied on the fly and never written back. Fails when the
    /// composition has no pages or a group nests deeper than `opts.max_group_depth`.
    pub fn eval_frame_with_opts(
        comp: &Composition,
        files: &FileTable,
        frame: FrameIndex,
        opts: &EvalOpts,
    ) -> StoryboardResult<EvaluatedFrame> {
        let fps = comp.fps.or_fallback(opts.fallback_fps);
        let active = active_page(&comp.pages, frame)?;
        let page = &comp.pages[active.page_index];
        let resolver = MediaResolver::new(files);

        let mut walk = Walk {
            fps,
            local_frame: active.local_frame,
            resolver,
            opts,
            out: Vec::new(),
        };
        let root = Parent {
            transform: Affine::IDENTITY,
            opacity: 1.0,
            delay: 0.0,
            key: Vec::new(),
            scale: 1.0,
        };
        walk.elements(&page.elements, &root)?;

        walk.out.sort_by(|a, b| a.0.cmp(&b.0));
        let nodes = walk.out.into_iter().map(|(_, n)| n).collect();

        Ok(EvaluatedFrame {
            frame,
            page_index: active.page_index,
            page_id: page.id.clone(),
            local_frame: active.local_frame,
            canvas: Size::new(f64::from(comp.width), f64::from(comp.height)),
            background_color: page.background_color.clone(),
            nodes,
            audios: active_audios(comp, &resolver, frame, fps),
        })
    }

    #[tracing::instrument(skip(comp, files))]
    /// Evaluate every frame in `range` in parallel with default options.
    pub fn eval_frames(
        comp: &Composition,
        files: &FileTable,
        range: FrameRange,
    ) -> StoryboardResult<Vec<EvaluatedFrame>> {
        Self::eval_frames_with_opts(comp, files, range, &EvalOpts::default())
    }

    /// Evaluate every frame in `range` in parallel, returned in frame order.
    pub fn eval_frames_with_opts(
        comp: &Composition,
        files: &FileTable,
        range: FrameRange,
        opts: &EvalOpts,
    ) -> StoryboardResult<Vec<EvaluatedFrame>> {
        (range.start.0..range.end.0)
            .into_par_iter()
            .map(|f| Self::eval_frame_with_opts(comp, files, FrameIndex(f), opts))
            .collect()
    }

    /// Absolute page placement on the global timeline.
    pub fn timeline(comp: &Composition) -> TimelineLayout {
        layout_timeline(&comp.pages)
    }
}

type SortKey = Vec<(i32, usize)>;

struct Parent {
    transform: Affine,
    opacity: f64,
    delay: f64,
    key: SortKey,
    // fit scale accumulated from enclosing groups, applied to child geometry
    scale: f64,
}

struct Walk<'a> {
    fps: Fps,
    local_frame: u64,
    resolver: MediaResolver<'a>,
    opts: &'a EvalOpts,
    out: Vec<(SortKey, RenderNode)>,
}

/// Element box after animation overrides, in the parent's space.
#[derive(Clone, Copy, Debug)]
struct NodeBox {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    rotation: f64,
    scale: f64,
    opacity: f64,
}

impl NodeBox {
    /// `width`/`height` are unscaled; `fit` is the enclosing groups' scale.
    fn from_base(base: &ElementBase, width: f64, height: f64, fit: f64) -> Self {
        Self {
            left: base.left * fit,
            top: base.top * fit,
            width: width * fit,
            height: height * fit,
            rotation: base.rotation,
            scale: 1.0,
            opacity: base.opacity,
        }
    }

    /// Geometric props are authored in unscaled units and pick up `fit`.
    fn apply(&mut self, props: &BTreeMap<String, f64>, fit: f64) {
        for (name, &v) in props {
            match name.as_str() {
                "left" => self.left = v * fit,
                "top" => self.top = v * fit,
                "width" => self.width = v * fit,
                "height" => self.height = v * fit,
                "opacity" => self.opacity = v,
                "rotation" | "rotate" => self.rotation = v,
                "scale" => self.scale = v,
                _ => {}
            }
        }
        for (name, &v) in props {
            match name.as_str() {
                "translateX" | "x" => self.left += v * fit,
                "translateY" | "y" => self.top += v * fit,
                _ => {}
            }
        }
    }

    fn local_transform(&self) -> Affine {
        let center = Point::new(self.width / 2.0, self.height / 2.0);
        Affine::translate((self.left, self.top))
            * Affine::rotate_about(self.rotation.to_radians(), center)
            * Affine::scale_about(self.scale, center)
    }
}

fn clamp_opacity(v: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 1.0 }
}

impl Walk<'_> {
    fn elements(&mut self, elements: &[Element], parent: &Parent) -> StoryboardResult<()> {
        for (index, el) in elements.iter().enumerate() {
            let delay = effective_delay(el, parent.delay, self.fps);
            if !is_visible_after(delay, self.local_frame) {
                continue;
            }
            self.element(el, index, delay, parent)?;
        }
        Ok(())
    }

    fn element(
        &mut self,
        el: &Element,
        index: usize,
        delay: f64,
        parent: &Parent,
    ) -> StoryboardResult<()> {
        let base = el.base();
        let since_visible = self.local_frame as f64 - delay;
        let animated = base
            .animation
            .as_ref()
            .map(|a| sample_props(a, since_visible, self.fps))
            .unwrap_or_default();

        let mut key = parent.key.clone();
        key.push((base.z_index, index));

        let fit = parent.scale;
        let width = base.width.unwrap_or(0.0);
        let (kind, height) = match el {
            Element::Group(g) => {
                return self.group(g, &animated, delay, key, parent);
            }
            Element::Text(t) => (
                RenderKind::Text {
                    text: t.text.clone(),
                    font_size: t.font_size * fit,
                    font_family: t.font_family.clone(),
                    color: t.color.clone(),
                    font_weight: t.font_weight.clone(),
                    text_align: t.text_align,
                },
                t.font_size * self.opts.text_line_height,
            ),
            Element::Image(_) => (RenderKind::Image, base.height.unwrap_or(0.0)),
            Element::Video(v) => (
                RenderKind::Video {
                    source_time_s: frames_to_seconds(since_visible, self.fps) * v.playback_rate,
                    muted: v.muted,
                    volume: v.volume,
                    looping: v.looping,
                },
                base.height.unwrap_or(0.0),
            ),
        };

        let mut nb = NodeBox::from_base(base, width, height, fit);
        nb.apply(&animated, fit);
        if matches!(kind, RenderKind::Text { .. }) {
            // text height is always derived from the font size
            nb.height = height * fit;
        }

        let transform = parent.transform * nb.local_transform();
        let size = Size::new(nb.width, nb.height);
        let bbox = transform.transform_rect_bbox(Rect::from_origin_size(Point::ZERO, size));

        let (src, src_resolved) = match el.src() {
            Some(s) => {
                let (resolved, how) = self.resolver.resolve_with_kind(s);
                (Some(resolved.to_string()), how.is_resolved())
            }
            None => (None, false),
        };

        self.out.push((
            key,
            RenderNode {
                element_id: base.id.clone(),
                kind,
                src,
                src_resolved,
                size,
                transform,
                bbox,
                opacity: parent.opacity * clamp_opacity(nb.opacity),
                z_index: base.z_index,
                animated,
            },
        ));
        Ok(())
    }

    /// Fit the group's children into its box and walk them with the combined scale.
    fn group(
        &mut self,
        g: &GroupElement,
        animated: &BTreeMap<String, f64>,
        delay: f64,
        key: SortKey,
        parent: &Parent,
    ) -> StoryboardResult<()> {
        let opts = LayoutOpts {
            max_depth: self.opts.max_group_depth,
            text_line_height: self.opts.text_line_height,
        };
        let layout = layout_group_with(g, &opts)?;

        let mut nb = NodeBox::from_base(&g.base, layout.width, layout.height, parent.scale);
        nb.apply(animated, parent.scale);
        let inner = Parent {
            transform: parent.transform * nb.local_transform(),
            opacity: parent.opacity * clamp_opacity(nb.opacity),
            delay,
            key,
            scale: parent.scale * layout.scale,
        };
        self.elements(&g.elements, &inner)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;
