use super::*;
use crate::replay::sink::InMemorySink;
use crate::sticky::config::StickyConfig;

const WINDOW: &str = r#"
{
  "scene": {
    "viewport": { "width": 800, "height": 600 },
    "nodes": [
      { "id": 1, "rect": { "x0": 0, "y0": 200, "x1": 800, "y1": 1400 } },
      { "id": 2, "parent": 1, "rect": { "x0": 10, "y0": 300, "x1": 310, "y1": 300 } },
      { "id": 3, "parent": 1, "rect": { "x0": 10, "y0": 300, "x1": 310, "y1": 340 } }
    ]
  },
  "container": 1,
  "stickies": [{ "name": "header", "placeholder": 2, "content": 3 }],
  "steps": [
    { "op": "scroll_window", "y": 100 },
    { "op": "advance_frames", "count": 1 },
    { "op": "scroll_window", "y": 350 },
    { "op": "event", "kind": "wheel" },
    { "op": "advance_frames", "count": 2 },
    { "op": "scroll_window", "y": 0 },
    { "op": "advance_frames", "count": 1 }
  ]
}
"#;

const SCROLLER: &str = r#"
{
  "scene": {
    "viewport": { "width": 800, "height": 600 },
    "nodes": [
      { "id": 1, "rect": { "x0": 0, "y0": 100, "x1": 800, "y1": 400 },
        "scroll_height": 1200, "positioned": true },
      { "id": 2, "parent": 1, "rect": { "x0": 0, "y0": 250, "x1": 800, "y1": 250 } },
      { "id": 3, "parent": 1, "rect": { "x0": 0, "y0": 250, "x1": 800, "y1": 290 } },
      { "id": 4, "rect": { "x0": 0, "y0": 400, "x1": 800, "y1": 2000 } }
    ]
  },
  "container": 1,
  "stickies": [{ "name": "nav", "placeholder": 2, "content": 3, "config": { "relative": true } }],
  "steps": [
    { "op": "scroll_node", "node": 1, "y": 200 },
    { "op": "advance_frames", "count": 1 },
    { "op": "scroll_window", "y": 30 },
    { "op": "scroll_node", "node": 1, "y": 0 },
    { "op": "advance_frames", "count": 1 },
    { "op": "container_event", "kind": "scroll" },
    { "op": "advance_frames", "count": 1 }
  ]
}
"#;

fn replay(json: &str, opts: ReplayOpts) -> (ReplayStats, InMemorySink) {
    let scenario = Scenario::from_json_str(json).unwrap();
    let session = ReplaySession::new(scenario, opts).unwrap();
    let mut sink = InMemorySink::new();
    let stats = session.run(&mut sink).unwrap();
    (stats, sink)
}

#[test]
fn records_every_sticky_on_every_tick() {
    let (stats, sink) = replay(WINDOW, ReplayOpts::default());
    assert_eq!(
        stats,
        ReplayStats {
            frames: 4,
            records: 4,
            broadcasts: 3,
        }
    );
    let cfg = sink.config().unwrap();
    assert_eq!(cfg.stickies, vec!["header".to_string()]);

    let pinned: Vec<bool> = sink.records().iter().map(|r| r.state.is_sticky).collect();
    assert_eq!(pinned, vec![false, true, true, false]);

    let frames: Vec<u64> = sink.records().iter().map(|r| r.frame.0).collect();
    assert_eq!(frames, vec![0, 1, 2, 3]);
    assert!((sink.records()[3].time_secs - 0.05).abs() < 1e-12);

    let pinned = &sink.records()[1];
    assert_eq!(pinned.placeholder.padding_bottom, Some(40.0));
    assert_eq!(
        pinned.css,
        "position: fixed; top: 0px; left: 10px; width: 300px; transform: translateZ(0)"
    );
}

#[test]
fn changes_only_skips_repeated_states() {
    let (stats, sink) = replay(
        WINDOW,
        ReplayOpts {
            changes_only: true,
        },
    );
    assert_eq!(stats.frames, 4);
    assert_eq!(stats.records, 3);
    let frames: Vec<u64> = sink.records_for("header").map(|r| r.frame.0).collect();
    assert_eq!(frames, vec![0, 1, 3]);
}

#[test]
fn relative_sticky_ignores_window_frames() {
    let (_, sink) = replay(SCROLLER, ReplayOpts::default());
    let states: Vec<_> = sink.records_for("nav").map(|r| r.state.clone()).collect();
    assert_eq!(states.len(), 3);

    assert!(states[0].is_sticky);
    assert_eq!(states[0].style.top, Some(100.0));
    assert_eq!(states[0].distance_from_bottom, 960.0);
    // The container scrolled back, but the frame was requested by the window scroll.
    assert!(states[1].is_sticky);
    assert!(!states[2].is_sticky);
}

#[test]
fn replay_is_deterministic() {
    let (_, a) = replay(SCROLLER, ReplayOpts::default());
    let (_, b) = replay(SCROLLER, ReplayOpts::default());
    assert_eq!(a.records(), b.records());
}

#[test]
fn new_rejects_invalid_scenarios() {
    let mut scenario = Scenario::from_json_str(WINDOW).unwrap();
    scenario.stickies[0].config = StickyConfig {
        top_offset: f64::NAN,
        ..StickyConfig::default()
    };
    let err = ReplaySession::new(scenario, ReplayOpts::default()).unwrap_err();
    assert!(err.to_string().contains("validation error"));
}

#[test]
fn state_is_available_before_running() {
    let scenario = Scenario::from_json_str(WINDOW).unwrap();
    let session = ReplaySession::new(scenario, ReplayOpts::default()).unwrap();
    assert_eq!(session.state("header"), Some(StickyState::default()));
    assert_eq!(session.state("missing"), None);
    assert_eq!(session.frame(), FrameIndex(0));
    assert_eq!(session.scene().window_scroll_y(), 0.0);
}
