use crate::assets::files::FileTable;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Which resolution rule produced a source.
pub enum SourceKind {
    /// Input was already a `data:` URI.
    Inline,
    /// Input was an absolute `http(s)` URL.
    Remote,
    /// Exact file-name match.
    FileName,
    /// Exact file-id match.
    FileId,
    /// Case-insensitive file-name match.
    FileNameIgnoreCase,
    /// Nothing matched; the input is passed through unchanged.
    Unresolved,
}

impl SourceKind {
    /// `true` for every rule except [`SourceKind::Unresolved`].
    pub fn is_resolved(self) -> bool {
        !matches!(self, Self::Unresolved)
    }
}

/// Maps symbolic media references (`Element.src`) to concrete renderable sources.
///
/// Resolution never fails: unknown references are returned unchanged and left for the
/// renderer to fetch (or fail) at draw time.
#[derive(Clone, Copy, Debug)]
pub struct MediaResolver<'a> {
    files: &'a FileTable,
}

impl<'a> MediaResolver<'a> {
    /// Resolver over a snapshot of known local files.
    pub fn new(files: &'a FileTable) -> Self {
        Self { files }
    }

    /// Resolve `src`, first matching rule wins.
    pub fn resolve<'s>(&self, src: &'s str) -> &'s str
    where
        'a: 's,
    {
        self.resolve_with_kind(src).0
    }

    /// Resolve `src` and report which rule matched.
    pub fn resolve_with_kind<'s>(&self, src: &'s str) -> (&'s str, SourceKind)
    where
        'a: 's,
    {
        if is_data_uri(src) {
            return (src, SourceKind::Inline);
        }
        if is_remote_url(src) {
            return (src, SourceKind::Remote);
        }
        if let Some(d) = self.files.by_name(src) {
            return (d, SourceKind::FileName);
        }
        if let Some(d) = self.files.by_id(src) {
            return (d, SourceKind::FileId);
        }
        if let Some(d) = self.files.by_name_ignore_case(src) {
            return (d, SourceKind::FileNameIgnoreCase);
        }
        tracing::debug!(src, "media reference not resolved, passing through");
        (src, SourceKind::Unresolved)
    }

    /// `true` when [`MediaResolver::resolve`] would hit any rule but the pass-through.
    pub fn can_resolve(&self, src: &str) -> bool {
        is_data_uri(src)
            || is_remote_url(src)
            || self.files.by_name(src).is_some()
            || self.files.by_id(src).is_some()
            || self.files.by_name_ignore_case(src).is_some()
    }
}

fn is_data_uri(src: &str) -> bool {
    starts_with_ignore_case(src, "data:")
}

fn is_remote_url(src: &str) -> bool {
    starts_with_ignore_case(src, "http://") || starts_with_ignore_case(src, "https://")
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/resolve.rs"]
mod tests;
