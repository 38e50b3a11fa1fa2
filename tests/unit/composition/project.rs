use super::*;
use crate::composition::dsl::{ElementBuilder, audio};

const PROJECT_JSON: &str = r##"{
  "id": "proj-1",
  "name": "Launch video",
  "createdAt": "2024-05-01T10:00:00Z",
  "updatedAt": "2024-05-02T10:00:00Z",
  "composition": {
    "fps": 24,
    "width": 1280,
    "height": 720,
    "pages": [
      {
        "id": "intro",
        "name": "Intro",
        "duration": 48,
        "backgroundColor": "#101010",
        "elements": [
          { "type": "text", "id": "title", "text": "Hello", "fontSize": 64, "left": 40, "top": 40 },
          { "type": "image", "src": "logo.png", "left": 10, "top": 10, "width": 100, "height": 50 }
        ]
      }
    ],
    "audios": [ { "id": "bgm", "src": "music.mp3" } ]
  },
  "appState": {
    "selectedPageId": "intro",
    "selectedElementId": "gone",
    "viewMode": "preview",
    "zoom": 0.5
  },
  "localFiles": [
    {
      "id": "f1",
      "name": "logo.png",
      "type": "image/png",
      "dataUrl": "data:image/png;base64,AAAA",
      "size": 3,
      "createdAt": "2024-05-01T10:00:00Z"
    }
  ],
  "chatHistory": [ { "id": "m1", "role": "user", "content": "make it pop" } ]
}"##;

#[test]
fn loads_normalizes_and_prunes() {
    let p = Project::from_json_str(PROJECT_JSON).unwrap();
    assert_eq!(p.id, "proj-1");
    assert_eq!(p.composition.fps, Fps(24));
    let page = &p.composition.pages[0];
    assert_eq!(page.elements.len(), 2);
    assert!(page.elements[1].id().starts_with("image-"));
    assert_eq!(p.app_state.selected_page_id.as_deref(), Some("intro"));
    assert_eq!(p.app_state.selected_element_id, None);
    assert_eq!(p.app_state.view_mode, ViewMode::Preview);
    assert_eq!(p.chat_history.as_ref().map(Vec::len), Some(1));
    assert_eq!(
        p.file_table().by_name("logo.png"),
        Some("data:image/png;base64,AAAA")
    );
}

#[test]
fn bare_composition_is_wrapped() {
    let json = r#"{ "pages": [ { "id": "p", "duration": 30 } ] }"#;
    let p = Project::from_json_str(json).unwrap();
    assert_eq!(p.composition.fps, Fps(30));
    assert_eq!(p.composition.width, 1920);
    assert_eq!(p.app_state.selected_page_id.as_deref(), Some("p"));
    assert!(p.local_files.is_empty());
}

#[test]
fn structural_errors_surface_at_load() {
    let dup = r#"{ "pages": [ { "id": "p", "duration": 1 }, { "id": "p", "duration": 1 } ] }"#;
    assert!(matches!(
        Project::from_json_str(dup),
        Err(StoryboardError::Validation(_))
    ));
    let zero_fps = r#"{ "fps": 0, "pages": [] }"#;
    assert!(Project::from_json_str(zero_fps).is_err());
    assert!(matches!(
        Project::from_json_str("{ not json"),
        Err(StoryboardError::Serde(_))
    ));
}

#[test]
fn default_project_is_valid_and_three_seconds_long() {
    let p = Project::default_project();
    p.composition.validate().unwrap();
    assert_eq!(p.composition.total_frames(), 90);
    assert_eq!(p.composition.pages[0].duration_seconds(p.composition.fps), 3.0);
    assert_ne!(p.id, Project::default_project().id);
}

#[test]
fn export_round_trips_and_can_drop_files() {
    let p = Project::from_json_str(PROJECT_JSON).unwrap();

    let full = p.export(&ExportOpts::default()).unwrap();
    let back = Project::from_json_str(&full).unwrap();
    assert_eq!(back, p);

    let shared = p
        .export(&ExportOpts {
            include_files: false,
            pretty: true,
        })
        .unwrap();
    assert!(shared.contains('\n'));
    let back = Project::from_json_str(&shared).unwrap();
    assert!(back.local_files.is_empty());
    assert_eq!(back.composition, p.composition);
}

#[test]
fn prune_keeps_valid_selections() {
    let mut p = Project::default_project();
    p.composition.pages[0]
        .elements
        .push(ElementBuilder::text("t", "x").build().unwrap());
    p.composition.audios.push(audio("a", "a.mp3"));
    p.app_state.selected_element_id = Some("t".to_string());
    p.app_state.selected_audio_id = Some("a".to_string());
    assert!(!p.app_state.prune(&p.composition));

    p.composition.audios.clear();
    p.composition.pages[0].elements.clear();
    assert!(p.app_state.prune(&p.composition));
    assert_eq!(p.app_state.selected_audio_id, None);
    assert_eq!(p.app_state.selected_element_id, None);
    assert_eq!(p.app_state.selected_page_id.as_deref(), Some("page-1"));
}

#[test]
fn unknown_view_mode_reads_as_edit() {
    let m: ViewMode = serde_json::from_str("\"timeline\"").unwrap();
    assert_eq!(m, ViewMode::Edit);
    let m: ViewMode = serde_json::from_str("\"preview\"").unwrap();
    assert_eq!(m, ViewMode::Preview);
    assert_eq!(serde_json::to_string(&ViewMode::Edit).unwrap(), "\"edit\"");
}

#[test]
fn missing_file_reports_the_path() {
    let err = Project::from_path("/nonexistent/storyboard/project.json").unwrap_err();
    assert!(matches!(err, StoryboardError::Other(_)));
    assert!(err.to_string().contains("/nonexistent/storyboard/project.json"));
}
