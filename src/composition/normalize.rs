//! Load-time repair of project documents.
//!
//! Hand-written or generated project JSON frequently omits ids. Every id the engine and
//! external editors key on (pages, elements, audio tracks) is assigned here exactly once,
//! deterministically from the node's position, so reloading the same document yields the
//! same ids and evaluation never has to invent any.

use std::collections::HashSet;

use crate::{
    composition::model::{Composition, Element},
    foundation::ids::synth_id,
};

/// Assign ids to pages, elements and audio tracks that lack one.
///
/// Existing ids are kept verbatim (duplicates are left for validation to report). Returns
/// the number of ids assigned. Negative page durations are reported here as well, since
/// evaluation silently treats them as zero.
pub fn normalize_ids(comp: &mut Composition) -> usize {
    let mut assigned = 0;

    let mut page_ids: HashSet<String> = comp
        .pages
        .iter()
        .filter(|p| !p.id.trim().is_empty())
        .map(|p| p.id.clone())
        .collect();
    for (i, page) in comp.pages.iter_mut().enumerate() {
        if page.id.trim().is_empty() {
            page.id = unique_id("page", "pages", &[i], &mut page_ids);
            tracing::debug!(page_index = i, id = %page.id, "assigned page id");
            assigned += 1;
        }
        if page.duration < 0 {
            tracing::warn!(
                page_id = %page.id,
                duration = page.duration,
                "negative page duration, treating as 0"
            );
        }

        let mut taken = HashSet::new();
        collect_ids(&page.elements, &mut taken);
        let mut path = Vec::new();
        assigned += assign_elements(&page.id, &mut page.elements, &mut path, &mut taken);
    }

    let mut audio_ids: HashSet<String> = comp
        .audios
        .iter()
        .filter(|a| !a.id.trim().is_empty())
        .map(|a| a.id.clone())
        .collect();
    for (i, audio) in comp.audios.iter_mut().enumerate() {
        if audio.id.trim().is_empty() {
            audio.id = unique_id("audio", "audios", &[i], &mut audio_ids);
            tracing::debug!(audio_index = i, id = %audio.id, "assigned audio id");
            assigned += 1;
        }
    }

    assigned
}

fn collect_ids(elements: &[Element], out: &mut HashSet<String>) {
    for el in elements {
        if !el.id().trim().is_empty() {
            out.insert(el.id().to_string());
        }
        if let Some(children) = el.children() {
            collect_ids(children, out);
        }
    }
}

fn assign_elements(
    page_id: &str,
    elements: &mut [Element],
    path: &mut Vec<usize>,
    taken: &mut HashSet<String>,
) -> usize {
    let mut assigned = 0;
    for (i, el) in elements.iter_mut().enumerate() {
        path.push(i);
        if el.id().trim().is_empty() {
            let id = unique_id(el.kind_name(), page_id, path, taken);
            tracing::debug!(page_id, id = %id, "assigned element id");
            el.base_mut().id = id;
            assigned += 1;
        }
        if let Element::Group(g) = el {
            assigned += assign_elements(page_id, &mut g.elements, path, taken);
        }
        path.pop();
    }
    assigned
}

fn unique_id(prefix: &str, scope: &str, path: &[usize], taken: &mut HashSet<String>) -> String {
    let mut salt = 0u64;
    loop {
        let id = synth_id(prefix, scope, path, salt);
        if taken.insert(id.clone()) {
            return id;
        }
        salt += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/normalize.rs"]
mod tests;
