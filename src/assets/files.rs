use std::collections::HashMap;

use chrono::{DateTime, Utc};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A user-uploaded file kept alongside a project.
pub struct LocalFile {
    /// Stable file id.
    pub id: String,
    /// Display/file name, used as the primary symbolic reference.
    pub name: String,
    /// MIME type.
    #[serde(rename = "type", default)]
    pub mime_type: String,
    /// Inline content as a `data:` URI.
    #[serde(default)]
    pub data_url: String,
    /// Size in bytes of the original file.
    #[serde(default)]
    pub size: u64,
    /// Upload time.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl LocalFile {
    /// Create a file entry stamped with the current time.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
        data_url: impl Into<String>,
    ) -> Self {
        let data_url = data_url.into();
        Self {
            id: id.into(),
            name: name.into(),
            mime_type: mime_type.into(),
            size: data_url.len() as u64,
            data_url,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, Default)]
/// Immutable lookup table from file name / file id to inline data URI.
///
/// Entries keep insertion order so that case-insensitive fallback matching is deterministic.
pub struct FileTable {
    entries: Vec<(String, String, String)>, // (name, id, data_url)
    by_name: HashMap<String, usize>,
    by_id: HashMap<String, usize>,
}

impl FileTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from local files. Earlier files win on duplicate names or ids.
    pub fn from_files<'a>(files: impl IntoIterator<Item = &'a LocalFile>) -> Self {
        let mut table = Self::new();
        for f in files {
            table.insert(f.name.clone(), f.id.clone(), f.data_url.clone());
        }
        table
    }

    /// Add one entry. Existing names/ids keep pointing at their first entry.
    pub fn insert(&mut self, name: String, id: String, data_url: String) {
        let idx = self.entries.len();
        self.by_name.entry(name.clone()).or_insert(idx);
        if !id.is_empty() {
            self.by_id.entry(id.clone()).or_insert(idx);
        }
        self.entries.push((name, id, data_url));
    }

    /// Exact lookup by file name.
    pub fn by_name(&self, name: &str) -> Option<&str> {
        self.by_name
            .get(name)
            .map(|&i| self.entries[i].2.as_str())
    }

    /// Exact lookup by file id.
    pub fn by_id(&self, id: &str) -> Option<&str> {
        self.by_id.get(id).map(|&i| self.entries[i].2.as_str())
    }

    /// First entry (in insertion order) whose name equals `name` ignoring case.
    pub fn by_name_ignore_case(&self, name: &str) -> Option<&str> {
        let wanted = name.to_lowercase();
        self.entries
            .iter()
            .find(|(n, _, _)| n.to_lowercase() == wanted)
            .map(|(_, _, d)| d.as_str())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Storage backend for local files (browser database, memory, ...).
pub trait FileStore {
    /// Fetch a file by id.
    fn get(&self, id: &str) -> Option<&LocalFile>;
    /// Insert or replace a file (keyed by id).
    fn put(&mut self, file: LocalFile);
    /// Remove a file by id, returning it if present.
    fn remove(&mut self, id: &str) -> Option<LocalFile>;
    /// All files in insertion order.
    fn list(&self) -> Vec<&LocalFile>;

    /// Snapshot the store into a resolver table.
    fn file_table(&self) -> FileTable {
        FileTable::from_files(self.list())
    }
}

#[derive(Clone, Debug, Default)]
/// [`FileStore`] kept entirely in memory.
pub struct InMemoryFileStore {
    files: Vec<LocalFile>,
}

impl InMemoryFileStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `files`; later duplicates replace earlier ones.
    pub fn with_files(files: impl IntoIterator<Item = LocalFile>) -> Self {
        let mut store = Self::new();
        for f in files {
            store.put(f);
        }
        store
    }
}

impl FileStore for InMemoryFileStore {
    fn get(&self, id: &str) -> Option<&LocalFile> {
        self.files.iter().find(|f| f.id == id)
    }

    fn put(&mut self, file: LocalFile) {
        match self.files.iter_mut().find(|f| f.id == file.id) {
            Some(slot) => *slot = file,
            None => self.files.push(file),
        }
    }

    fn remove(&mut self, id: &str) -> Option<LocalFile> {
        let idx = self.files.iter().position(|f| f.id == id)?;
        Some(self.files.remove(idx))
    }

    fn list(&self) -> Vec<&LocalFile> {
        self.files.iter().collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/files.rs"]
mod tests;
