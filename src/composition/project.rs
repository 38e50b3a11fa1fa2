use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;
use chrono::{DateTime, Utc};

use crate::{
    assets::files::{FileTable, LocalFile},
    composition::{
        dsl::PageBuilder,
        model::Composition,
        normalize::normalize_ids,
    },
    foundation::core::Fps,
    foundation::error::{StoryboardError, StoryboardResult},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Top-level persisted unit: a composition plus editor state and uploaded files.
///
/// Loading goes through [`Project::from_reader`] (or its path/string variants), which
/// assigns missing ids, drops stale selections and validates the composition. A bare
/// composition document is accepted too and wrapped in a fresh envelope.
pub struct Project {
    /// Project id.
    #[serde(default = "new_project_id")]
    pub id: String,
    /// Display name.
    #[serde(default = "default_project_name")]
    pub name: String,
    /// Creation time.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    /// The document being edited.
    pub composition: Composition,
    /// Editor selection and view state.
    #[serde(default)]
    pub app_state: AppState,
    /// Uploaded files referenced symbolically from element `src` fields.
    #[serde(default)]
    pub local_files: Vec<LocalFile>,
    /// Conversation with the edit assistant, kept verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_history: Option<Vec<ChatMessage>>,
}

fn new_project_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn default_project_name() -> String {
    "Untitled Project".to_string()
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One entry of the assistant conversation.
pub struct ChatMessage {
    /// Message id.
    #[serde(default)]
    pub id: String,
    /// `user`, `assistant` or `system`.
    pub role: String,
    /// Message text.
    #[serde(default)]
    pub content: String,
    /// Send time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Editor layout mode.
pub enum ViewMode {
    /// Full player preview.
    Preview,
    /// Editing canvas.
    #[default]
    #[serde(other)]
    Edit,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Transient editor state saved with the project.
pub struct AppState {
    /// Selected page id.
    pub selected_page_id: Option<String>,
    /// Selected element id.
    pub selected_element_id: Option<String>,
    /// Selected audio track id.
    pub selected_audio_id: Option<String>,
    /// Current layout mode.
    pub view_mode: ViewMode,
    /// Canvas zoom factor.
    pub zoom: f64,
    /// A long-running operation is in flight.
    pub loading: bool,
    /// Last error shown to the user.
    pub error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            selected_page_id: None,
            selected_element_id: None,
            selected_audio_id: None,
            view_mode: ViewMode::Edit,
            zoom: 1.0,
            loading: false,
            error: None,
        }
    }
}

impl AppState {
    /// Clear selections that point at ids missing from `comp`.
    ///
    /// An element selection must live on the selected page when one is selected, otherwise
    /// on any page. Returns `true` when anything was cleared.
    pub fn prune(&mut self, comp: &Composition) -> bool {
        let mut changed = false;

        if let Some(page_id) = &self.selected_page_id
            && comp.page_index(page_id).is_none()
        {
            self.selected_page_id = None;
            changed = true;
        }

        if let Some(element_id) = &self.selected_element_id {
            let found = match &self.selected_page_id {
                Some(page_id) => comp
                    .pages
                    .iter()
                    .filter(|p| &p.id == page_id)
                    .any(|p| p.find_element(element_id).is_some()),
                None => comp
                    .pages
                    .iter()
                    .any(|p| p.find_element(element_id).is_some()),
            };
            if !found {
                self.selected_element_id = None;
                changed = true;
            }
        }

        if let Some(audio_id) = &self.selected_audio_id
            && !comp.audios.iter().any(|a| &a.id == audio_id)
        {
            self.selected_audio_id = None;
            changed = true;
        }

        changed
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Options for [`Project::export`].
pub struct ExportOpts {
    /// Keep inline `localFiles` payloads. Share links drop them to stay small.
    pub include_files: bool,
    /// Pretty-print the JSON.
    pub pretty: bool,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            include_files: true,
            pretty: false,
        }
    }
}

impl Project {
    /// Starter project: one 3 second blank page at 30 fps on a 1920x1080 canvas.
    pub fn default_project() -> Self {
        let fps = Fps::default();
        let mut composition = Composition::new(fps, 1920, 1080);
        composition.pages.push(
            PageBuilder::new("page-1", i64::from(fps.0) * 3)
                .name("Page 1")
                .build(),
        );
        Self::wrap(composition)
    }

    /// Wrap a composition in a fresh envelope (new id, timestamps, first page selected).
    pub fn wrap(composition: Composition) -> Self {
        let now = Utc::now();
        let app_state = AppState {
            selected_page_id: composition.pages.first().map(|p| p.id.clone()),
            ..AppState::default()
        };
        Self {
            id: new_project_id(),
            name: default_project_name(),
            created_at: now,
            updated_at: now,
            composition,
            app_state,
            local_files: Vec::new(),
            chat_history: None,
        }
    }

    /// Parse a project (or bare composition) from a JSON reader, then normalize and validate.
    #[tracing::instrument(skip(r))]
    pub fn from_reader<R: std::io::Read>(r: R) -> StoryboardResult<Self> {
        let value: serde_json::Value = serde_json::from_reader(r)
            .map_err(|e| StoryboardError::serde(format!("parse project JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Parse a project (or bare composition) from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> StoryboardResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open project JSON '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Parse a project (or bare composition) from a JSON string.
    pub fn from_json_str(s: &str) -> StoryboardResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    fn from_value(value: serde_json::Value) -> StoryboardResult<Self> {
        let is_envelope = value
            .as_object()
            .is_some_and(|o| o.contains_key("composition"));
        let mut project = if is_envelope {
            serde_json::from_value::<Self>(value)
                .map_err(|e| StoryboardError::serde(format!("decode project: {e}")))?
        } else {
            let comp = serde_json::from_value::<Composition>(value)
                .map_err(|e| StoryboardError::serde(format!("decode composition: {e}")))?;
            tracing::debug!("bare composition document, wrapping in a new project");
            Self::wrap(comp)
        };
        project.normalize()?;
        Ok(project)
    }

    /// Assign missing ids, drop stale selections and validate the composition.
    ///
    /// Returns the number of ids assigned.
    pub fn normalize(&mut self) -> StoryboardResult<usize> {
        let assigned = normalize_ids(&mut self.composition);
        if assigned > 0 {
            tracing::info!(assigned, "assigned missing ids");
        }
        self.app_state.prune(&self.composition);
        self.composition.validate()?;
        Ok(assigned)
    }

    /// Serialize to JSON.
    pub fn export(&self, opts: &ExportOpts) -> StoryboardResult<String> {
        let mut value = serde_json::to_value(self)?;
        if !opts.include_files
            && let Some(files) = value.get_mut("localFiles")
        {
            *files = serde_json::Value::Array(Vec::new());
        }
        let out = if opts.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        Ok(out)
    }

    /// Resolver table over this project's local files.
    pub fn file_table(&self) -> FileTable {
        FileTable::from_files(&self.local_files)
    }

    /// Bump `updated_at` to now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/project.rs"]
mod tests;
