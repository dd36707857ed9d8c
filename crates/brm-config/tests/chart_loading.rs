use std::path::{Path, PathBuf};

use brm_config::{CHART_VERSION, ChartFile, EventSpec};
use brm_timing::Swing;
use brm_types::{Bounds, EventKind, InputType};

fn demo_chart_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

#[test]
fn test_demo_chart_loads() {
    let chart = ChartFile::load_from(demo_chart_path("first_steps.json")).unwrap();
    assert_eq!(chart.version, CHART_VERSION);
    assert_eq!(chart.session.difficulty, 2);
    assert_eq!(chart.tempos.len(), 2);
    assert_eq!(chart.tempos[1].swing, Swing::Swing);
    assert_eq!(chart.results_text.title, "First Steps");
    // unspecified bracket lines keep their defaults
    assert!(!chart.results_text.ok.is_empty());

    let end = chart
        .events
        .iter()
        .find(|e| e.kind.is_end())
        .expect("demo chart has an end marker");
    assert_eq!(end.bounds.x, 24.0);

    let music = chart.music.expect("demo chart has music settings");
    assert!(!music.looping);
}

#[test]
fn test_demo_chart_timing_maps_build() {
    let chart = ChartFile::load_from(demo_chart_path("first_steps.json")).unwrap();
    let tempos = chart.tempo_map().unwrap();
    assert!((tempos.seconds_at(16.0).unwrap() - 8.0).abs() < 1e-9);
    let signatures = chart.time_signature_map().unwrap();
    assert_eq!(signatures.measure_at(17.0), Some(4));
}

#[test]
fn test_demo_chart_deploy_inputs() {
    let chart = ChartFile::load_from(demo_chart_path("first_steps.json")).unwrap();
    let inputs: Vec<(f64, InputType)> = chart
        .events
        .iter()
        .filter_map(|e| match &e.kind {
            EventKind::Deploy(deploy) => Some(
                deploy
                    .inputs
                    .iter()
                    .map(|i| (e.bounds.x + i.beat_offset, i.input))
                    .collect::<Vec<_>>(),
            ),
            _ => None,
        })
        .flatten()
        .collect();
    assert_eq!(inputs.len(), 6);
    assert_eq!(inputs[0], (7.0, InputType::A));
    assert_eq!(inputs[1], (10.0, InputType::Dpad));
}

#[test]
fn test_unknown_event_type_is_rejected() {
    let json = r#"{"events":[{"bounds":{"x":0,"y":0,"width":1,"height":1},"kind":{"type":"laser"}}]}"#;
    assert!(serde_json::from_str::<ChartFile>(json).is_err());
}

#[test]
fn test_event_spec_json_layout() {
    let spec = EventSpec::new(Bounds::new(1.0, 0.0, 2.0, 1.0), EventKind::SkillStar);
    let value = serde_json::to_value(&spec).unwrap();
    assert_eq!(value["kind"]["type"], "skillStar");
    assert_eq!(value["bounds"]["width"], 2.0);
}
