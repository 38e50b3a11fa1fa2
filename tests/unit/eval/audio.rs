use super::*;
use crate::{
    assets::files::FileTable,
    composition::{dsl::PageBuilder, model::Composition},
    eval::time::TimeValue,
};

fn comp_with(audios: Vec<Audio>) -> Composition {
    let mut comp = Composition::new(Fps(30), 640, 360);
    comp.pages.push(PageBuilder::new("a", 60).build());
    comp.pages.push(PageBuilder::new("b", 60).build());
    comp.audios = audios;
    comp
}

fn track(id: &str) -> Audio {
    crate::composition::dsl::audio(id, "music.mp3")
}

#[test]
fn placement_without_duration_runs_to_timeline_end() {
    let mut a = track("bgm");
    a.delay = TimeValue::from("1s");
    let comp = comp_with(vec![a]);
    let placed = schedule_audios(&comp, Fps(30));
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].range.start, FrameIndex(30));
    assert_eq!(placed[0].range.end, FrameIndex(120));
}

#[test]
fn placement_with_duration_ignores_pages() {
    let mut a = track("sfx");
    a.delay = TimeValue::Frames(50.0);
    a.duration = Some(TimeValue::Frames(20.0));
    let comp = comp_with(vec![a]);
    let placed = schedule_audios(&comp, Fps(30));
    assert_eq!(placed[0].range.start, FrameIndex(50));
    assert_eq!(placed[0].range.end, FrameIndex(70));
}

#[test]
fn active_audio_reports_source_time_and_resolved_src() {
    let mut a = track("bgm");
    a.delay = TimeValue::Frames(30.0);
    a.trim_before = Some(500.0);
    let comp = comp_with(vec![a]);
    let mut files = FileTable::new();
    files.insert(
        "music.mp3".to_string(),
        "f1".to_string(),
        "data:audio/mpeg;base64,AAAA".to_string(),
    );
    let resolver = MediaResolver::new(&files);

    assert!(active_audios(&comp, &resolver, FrameIndex(29), Fps(30)).is_empty());

    let active = active_audios(&comp, &resolver, FrameIndex(60), Fps(30));
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].src, "data:audio/mpeg;base64,AAAA");
    assert!(active[0].src_resolved);
    assert!((active[0].source_time_s - 1.5).abs() < 1e-9);
    assert_eq!(active[0].volume, 1.0);
}

#[test]
fn muted_track_stays_scheduled_with_zero_volume() {
    let mut a = track("bgm");
    a.muted = true;
    a.volume = 0.8;
    let comp = comp_with(vec![a]);
    let files = FileTable::new();
    let active = active_audios(&comp, &MediaResolver::new(&files), FrameIndex(10), Fps(30));
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].volume, 0.0);
    assert!(!active[0].src_resolved);
}

#[test]
fn non_looping_track_stops_after_trim_window() {
    let mut a = track("bgm");
    a.trim_before = Some(0.0);
    a.trim_after = Some(1000.0);
    let comp = comp_with(vec![a]);
    let files = FileTable::new();
    let resolver = MediaResolver::new(&files);
    assert_eq!(active_audios(&comp, &resolver, FrameIndex(29), Fps(30)).len(), 1);
    assert!(active_audios(&comp, &resolver, FrameIndex(30), Fps(30)).is_empty());
}

#[test]
fn looping_track_wraps_inside_trim_window() {
    let mut a = track("bgm");
    a.looping = true;
    a.trim_before = Some(1000.0);
    a.trim_after = Some(2000.0);
    let comp = comp_with(vec![a]);
    let files = FileTable::new();
    let resolver = MediaResolver::new(&files);
    let active = active_audios(&comp, &resolver, FrameIndex(45), Fps(30));
    assert_eq!(active.len(), 1);
    assert!((active[0].source_time_s - 1.5).abs() < 1e-9);
}

#[test]
fn playback_rate_scales_source_time() {
    let mut a = track("bgm");
    a.playback_rate = 2.0;
    let comp = comp_with(vec![a]);
    let files = FileTable::new();
    let active = active_audios(&comp, &MediaResolver::new(&files), FrameIndex(30), Fps(30));
    assert!((active[0].source_time_s - 2.0).abs() < 1e-9);
}
