use crate::{
    composition::model::{DEFAULT_MAX_GROUP_DEPTH, Element, GroupElement},
    foundation::error::{StoryboardError, StoryboardResult},
};

/// Line-height multiplier used to estimate auto-height text bounds.
pub const DEFAULT_TEXT_LINE_HEIGHT: f64 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq)]
/// Knobs for [`layout_group_with`].
pub struct LayoutOpts {
    /// Maximum group nesting depth before failing with
    /// [`StoryboardError::NestingTooDeep`].
    pub max_depth: usize,
    /// `fontSize` multiplier used as the bounds height of text children.
    pub text_line_height: f64,
}

impl Default for LayoutOpts {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_GROUP_DEPTH,
            text_line_height: DEFAULT_TEXT_LINE_HEIGHT,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Result of fitting a group's children into its bounds.
pub struct GroupLayout {
    /// Children after uniform scaling, positioned relative to the group origin.
    ///
    /// Nested groups carry their resolved `width`/`height` and already laid-out children.
    pub elements: Vec<Element>,
    /// Resolved group width (explicit, else natural).
    pub width: f64,
    /// Resolved group height (explicit, else natural).
    pub height: f64,
    /// Uniform scale applied to the children.
    pub scale: f64,
}

/// Fit `group`'s children into its bounds with default options.
pub fn layout_group(group: &GroupElement) -> StoryboardResult<GroupLayout> {
    layout_group_with(group, &LayoutOpts::default())
}

/// Fit `group`'s children into its bounds.
///
/// Children are measured by their right/bottom edges (text height estimated from
/// `fontSize`), the group takes its explicit size or falls back to that natural size, and
/// every child is scaled by `min(width / natural_width, height / natural_height)`, so the
/// content is never stretched and never overflows. An axis with zero natural extent does
/// not constrain the scale. Nested groups are laid out first, depth-first.
pub fn layout_group_with(group: &GroupElement, opts: &LayoutOpts) -> StoryboardResult<GroupLayout> {
    layout_at(group, opts, 0)
}

fn layout_at(group: &GroupElement, opts: &LayoutOpts, depth: usize) -> StoryboardResult<GroupLayout> {
    if !group.elements.is_empty() && depth + 1 > opts.max_depth {
        return Err(StoryboardError::NestingTooDeep {
            max_depth: opts.max_depth,
            element_id: group.base.id.clone(),
        });
    }

    let mut children = Vec::with_capacity(group.elements.len());
    for child in &group.elements {
        let child = match child {
            Element::Group(g) => {
                let inner = layout_at(g, opts, depth + 1)?;
                let mut base = g.base.clone();
                base.width = Some(inner.width);
                base.height = Some(inner.height);
                Element::Group(GroupElement {
                    base,
                    elements: inner.elements,
                })
            }
            Element::Text(_) | Element::Image(_) | Element::Video(_) => child.clone(),
        };
        children.push(child);
    }

    let (natural_w, natural_h) = natural_size(&children, opts.text_line_height);
    let width = group.base.width.unwrap_or(natural_w);
    let height = group.base.height.unwrap_or(natural_h);
    let scale = fit_scale(width, height, natural_w, natural_h);

    if scale != 1.0 {
        for child in &mut children {
            scale_element(child, scale);
        }
    }

    Ok(GroupLayout {
        elements: children,
        width,
        height,
        scale,
    })
}

/// Largest right and bottom edge over `children` (`(0, 0)` when empty).
pub fn natural_size(children: &[Element], text_line_height: f64) -> (f64, f64) {
    children
        .iter()
        .map(|c| extent(c, text_line_height))
        .fold((0.0f64, 0.0f64), |(w, h), (r, b)| (w.max(r), h.max(b)))
}

/// Right/bottom edge of one element in its parent's space.
pub fn extent(el: &Element, text_line_height: f64) -> (f64, f64) {
    let base = el.base();
    let right = base.left + base.width.unwrap_or(0.0);
    let bottom = match el {
        Element::Text(t) => base.top + t.font_size * text_line_height,
        Element::Image(_) | Element::Video(_) | Element::Group(_) => {
            base.top + base.height.unwrap_or(0.0)
        }
    };
    (right, bottom)
}

fn fit_scale(width: f64, height: f64, natural_w: f64, natural_h: f64) -> f64 {
    let sx = if natural_w > 0.0 { width / natural_w } else { 1.0 };
    let sy = if natural_h > 0.0 { height / natural_h } else { 1.0 };
    let s = sx.min(sy);
    if s.is_finite() { s.max(0.0) } else { 1.0 }
}

/// Uniformly scale an element's box in its parent's space.
///
/// Text scales its `fontSize` and keeps an automatic height. Groups scale their children
/// too, since child coordinates are relative to the group origin.
pub fn scale_element(el: &mut Element, s: f64) {
    let base = el.base_mut();
    base.left *= s;
    base.top *= s;
    base.width = base.width.map(|w| w * s);
    match el {
        Element::Text(t) => {
            t.font_size *= s;
            t.base.height = None;
        }
        Element::Image(e) => e.base.height = e.base.height.map(|h| h * s),
        Element::Video(e) => e.base.height = e.base.height.map(|h| h * s),
        Element::Group(g) => {
            g.base.height = g.base.height.map(|h| h * s);
            for child in &mut g.elements {
                scale_element(child, s);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/group.rs"]
mod tests;
