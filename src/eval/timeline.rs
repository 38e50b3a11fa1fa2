use crate::{
    composition::model::Page,
    foundation::core::{FrameIndex, FrameRange},
    foundation::error::{StoryboardError, StoryboardResult},
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Absolute placement of every page on the global timeline.
pub struct TimelineLayout {
    /// `page_starts[i]` is the sum of the durations of pages `0..i`.
    pub page_starts: Vec<u64>,
    /// Sum of all page durations.
    pub total_frames: u64,
}

impl TimelineLayout {
    /// Global frame range `[start, start + duration)` of page `index`.
    pub fn page_range(&self, index: usize) -> Option<FrameRange> {
        let start = *self.page_starts.get(index)?;
        let end = self
            .page_starts
            .get(index + 1)
            .copied()
            .unwrap_or(self.total_frames);
        Some(FrameRange {
            start: FrameIndex(start),
            end: FrameIndex(end),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
/// The page showing at a global frame and the frame offset inside it.
pub struct ActivePage {
    /// Index into the composition's page list.
    pub page_index: usize,
    /// Frame relative to the page's start.
    pub local_frame: u64,
}

/// Prefix-sum the page durations into absolute start frames.
///
/// Negative durations count as zero-width slots.
#[tracing::instrument(skip(pages), fields(pages = pages.len()))]
pub fn layout_timeline(pages: &[Page]) -> TimelineLayout {
    let mut page_starts = Vec::with_capacity(pages.len());
    let mut acc = 0u64;
    for page in pages {
        page_starts.push(acc);
        acc = acc.saturating_add(page.duration_frames());
    }
    TimelineLayout {
        page_starts,
        total_frames: acc,
    }
}

/// Find the page active at `frame`.
///
/// Pages are scanned in order until `frame < start + duration`. Zero-duration pages are never
/// active. A frame at or past the end of the timeline clamps to the last frame of the last
/// page that has a positive duration; if no page has one, the last page at local frame 0 is
/// returned. Fails only when `pages` is empty.
pub fn active_page(pages: &[Page], frame: FrameIndex) -> StoryboardResult<ActivePage> {
    if pages.is_empty() {
        return Err(StoryboardError::evaluation(
            "cannot resolve a frame in a composition without pages",
        ));
    }

    let mut acc = 0u64;
    let mut last_reachable: Option<(usize, u64)> = None; // (index, duration)
    for (i, page) in pages.iter().enumerate() {
        let dur = page.duration_frames();
        if dur > 0 {
            if frame.0 < acc.saturating_add(dur) {
                return Ok(ActivePage {
                    page_index: i,
                    local_frame: frame.0 - acc,
                });
            }
            last_reachable = Some((i, dur));
        }
        acc = acc.saturating_add(dur);
    }

    Ok(match last_reachable {
        Some((page_index, dur)) => ActivePage {
            page_index,
            local_frame: dur - 1,
        },
        None => ActivePage {
            page_index: pages.len() - 1,
            local_frame: 0,
        },
    })
}

#[cfg(test)]
#[path = "../../tests/unit/eval/timeline.rs"]
mod tests;
