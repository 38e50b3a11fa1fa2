use super::*;

fn fps(n: u32) -> Fps {
    Fps::new(n).unwrap()
}

#[test]
fn basic_conversions() {
    assert_eq!(frames_to_seconds(90.0, fps(30)), 3.0);
    assert_eq!(seconds_to_frames(2.5, fps(30)), 75);
    assert_eq!(seconds_to_frames(0.05, fps(30)), 2); // 1.5 rounds away from zero
    assert_eq!(ms_to_frames(1000.0, fps(30)), 30);
    assert_eq!(ms_to_frames(1049.0, fps(30)), 31);
    assert_eq!(ms_to_frames(33.0, fps(30)), 0);
}

#[test]
fn seconds_frames_roundtrip() {
    for rate in [1u32, 24, 25, 30, 60, 120] {
        for f in [0u64, 1, 7, 29, 30, 31, 1799, 86_399] {
            let secs = frames_to_seconds(f as f64, fps(rate));
            assert_eq!(seconds_to_frames(secs, fps(rate)), f as i64, "f={f} fps={rate}");
        }
    }
}

#[test]
fn parse_suffixed_strings() {
    assert_eq!(parse_time("5s", fps(30)), Some(150.0));
    assert_eq!(parse_time(" 1.5s ", fps(30)), Some(45.0));
    assert_eq!(parse_time("500ms", fps(30)), Some(15.0));
    assert_eq!(parse_time("12f", fps(30)), Some(12.0));
    assert_eq!(parse_time("12", fps(30)), Some(12.0));
    assert_eq!(parse_time("soon", fps(30)), None);
    assert_eq!(parse_time("", fps(30)), None);
    assert_eq!(parse_time("infs", fps(30)), None);
}

#[test]
fn time_value_deserializes_numbers_and_strings() {
    let v: TimeValue = serde_json::from_str("15").unwrap();
    assert_eq!(v, TimeValue::Frames(15.0));
    let v: TimeValue = serde_json::from_str("\"2s\"").unwrap();
    assert_eq!(v.to_frames(fps(24)), 48.0);
}

#[test]
fn time_value_degrades_to_zero() {
    assert_eq!(TimeValue::Frames(-5.0).to_frames(fps(30)), 0.0);
    assert_eq!(TimeValue::Text("later".into()).to_frames(fps(30)), 0.0);
    assert_eq!(TimeValue::Frames(f64::NAN).to_frames(fps(30)), 0.0);
    assert!(TimeValue::default().is_zero());
}
