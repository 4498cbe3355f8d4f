use aat_tracker::config::Config;
use aat_tracker::scenario::{Replay, ReplayOptions, Scenario};
use aat_tracker::tracker::TrackerMode;

const FLIGHT: &str = r#"
variables:
  field_alt: 100
steps:
  - time: T+0s
    fix: { lat: 0.0, lon: 0.0, alt: $field_alt, sats: 8 }
  - time: T+1s
    fix: { lat: 0.0, lon: 0.0045, alt: 150, sats: 9 }
  - time: T+2s
    fix: { lat: 0.0005, lon: 0.0045, alt: 200, sats: 9 }
  - time: T+3s
    fix: { lat: 0.001, lon: 0.0045, alt: 250, sats: 9 }
"#;

fn after_boot() -> ReplayOptions {
    ReplayOptions {
        clock_offset_ms: 10_000,
        tail_ms: 10_000,
        ..Default::default()
    }
}

#[test]
fn weak_fixes_never_arm() {
    let config = Config::from_str("tracker:\n  min_satellites: 10\n").unwrap();
    let scenario = Scenario::from_str(FLIGHT).unwrap();
    let report = Replay::new(config.tracker, after_boot()).run(&scenario);

    assert_eq!(report.fixes, 4);
    assert!(report.home.is_none());
    assert!(report.frames.is_empty());
    assert_eq!(report.final_status.mode, TrackerMode::Unarmed);
    assert_eq!(report.final_status.azimuth_us, 1500);
    assert_eq!(report.final_status.elevation_us, 1500);
}

#[test]
fn reversed_azimuth_bounds_mirror_output() {
    let yaml = "tracker:\n  azimuth: { low: 2500, high: 500 }\n";
    let config = Config::from_str(yaml).unwrap();
    let scenario = Scenario::from_str(FLIGHT).unwrap();
    let report = Replay::new(config.tracker, after_boot()).run(&scenario);

    let home = report.home.unwrap();
    assert_eq!(home.altitude_m, 100);

    let first = report.frames.first().unwrap();
    assert_eq!(first.mode, TrackerMode::Tracking);
    assert_eq!(first.azimuth_us, 1500);

    // projected 74 deg lands on the low-microsecond side when reversed
    let status = report.final_status;
    assert_eq!(status.projected_azimuth_deg, 74);
    let expected_us: i32 = 2500 - (74 + 180) * 2000 / 360;
    assert!(
        (i32::from(status.azimuth_us) - expected_us).abs() <= 1,
        "azimuth {}us, expected {}us",
        status.azimuth_us,
        expected_us
    );
    assert!(status.azimuth_us < 1500);
}

#[test]
fn config_rejects_out_of_range_bounds() {
    let err = Config::from_str("tracker:\n  elevation: { low: 400, high: 2000 }\n").unwrap_err();
    assert!(err.to_string().contains("elevation"));
}
