//! Maps target angles onto servo pulse widths and slews towards them.
//!
//! The azimuth servo drives the mount through a 1:2 gear so its throw covers a
//! full turn. Target bearings are shifted by 180° first so that due north sits
//! at the centre of the servo travel and the wrap point lies behind the mount.

use super::fixed::Centi;
use super::settings::{AxisBounds, TrackerSettings};
use super::types::Axis;

/// Minimum time between two servo updates.
pub const UPDATE_INTERVAL_MS: u64 = 20;
/// Corrections larger than this share of the axis travel are applied at once.
pub const SNAP_THRESHOLD_PERCENT: i64 = 80;

const AZIMUTH_SPAN_DEG: i32 = 360;
const ELEVATION_SPAN_DEG: i32 = 90;

#[derive(Debug, Clone, Copy)]
struct AxisState {
    command: Centi,
    last_update_ms: Option<u64>,
}

impl AxisState {
    fn centred(bounds: AxisBounds) -> Self {
        Self {
            command: Centi::from_units(bounds.midpoint() as i32),
            last_update_ms: None,
        }
    }

    fn is_due(&self, now_ms: u64) -> bool {
        match self.last_update_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= UPDATE_INTERVAL_MS,
        }
    }

    fn step(&mut self, desired: Centi, bounds: AxisBounds, smoothing: u8) {
        let diff = desired - self.command;
        let snap = match diff.abs().percent_of(bounds.range()) {
            Some(pct) => pct > SNAP_THRESHOLD_PERCENT,
            // a zero-width axis has nowhere to smooth to
            None => true,
        };

        if snap {
            self.command = desired;
        } else {
            self.command += diff / (smoothing as i32 + 1);
        }
        self.command = self
            .command
            .clamp_between(bounds.low_centi(), bounds.high_centi());
    }
}

#[derive(Debug, Clone)]
pub struct ActuatorController {
    axes: [AxisState; 2],
}

impl ActuatorController {
    /// Both axes start parked at the middle of their travel.
    pub fn new(settings: &TrackerSettings) -> Self {
        Self {
            axes: [
                AxisState::centred(settings.azimuth),
                AxisState::centred(settings.elevation),
            ],
        }
    }

    pub fn command(&self, axis: Axis) -> Centi {
        self.axes[axis.index()].command
    }

    /// Current pulse width for `axis` in whole microseconds.
    pub fn microseconds(&self, axis: Axis) -> u16 {
        self.command(axis).to_units().clamp(0, u16::MAX as i32) as u16
    }

    /// Moves both axes towards the given angles.
    ///
    /// Returns false when called again within [`UPDATE_INTERVAL_MS`].
    pub fn update(
        &mut self,
        now_ms: u64,
        azimuth_deg: u16,
        elevation_deg: u8,
        settings: &TrackerSettings,
    ) -> bool {
        let mut updated = false;
        for axis in Axis::ALL {
            let state = &mut self.axes[axis.index()];
            if !state.is_due(now_ms) {
                continue;
            }
            let bounds = settings.bounds(axis);
            let desired = match axis {
                Axis::Azimuth => azimuth_command(azimuth_deg, bounds),
                Axis::Elevation => elevation_command(elevation_deg, bounds),
            };
            state.step(desired, bounds, settings.smoothing);
            state.last_update_ms = Some(now_ms);
            updated = true;
        }
        updated
    }
}

/// Pulse width that points the geared azimuth axis at `azimuth_deg`.
pub fn azimuth_command(azimuth_deg: u16, bounds: AxisBounds) -> Centi {
    let shifted = (azimuth_deg as i32 + 180).rem_euclid(AZIMUTH_SPAN_DEG);
    Centi::from_units(map_range(
        shifted,
        0,
        AZIMUTH_SPAN_DEG,
        bounds.low as i32,
        bounds.high as i32,
    ))
}

pub fn elevation_command(elevation_deg: u8, bounds: AxisBounds) -> Centi {
    let elevation = (elevation_deg as i32).min(ELEVATION_SPAN_DEG);
    Centi::from_units(map_range(
        elevation,
        0,
        ELEVATION_SPAN_DEG,
        bounds.low as i32,
        bounds.high as i32,
    ))
}

/// Integer linear re-mapping, truncating towards zero.
fn map_range(x: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    let scaled =
        (x - in_min) as i64 * (out_max - out_min) as i64 / (in_max - in_min) as i64;
    (scaled + out_min as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(smoothing: u8) -> TrackerSettings {
        TrackerSettings {
            azimuth: AxisBounds::new(500, 2500),
            elevation: AxisBounds::new(1000, 2000),
            smoothing,
            ..Default::default()
        }
    }

    #[test]
    fn starts_centred() {
        let ctrl = ActuatorController::new(&settings(3));
        assert_eq!(ctrl.microseconds(Axis::Azimuth), 1500);
        assert_eq!(ctrl.microseconds(Axis::Elevation), 1500);
    }

    #[test]
    fn north_maps_to_centre_of_travel() {
        let bounds = AxisBounds::new(500, 2500);
        assert_eq!(azimuth_command(0, bounds).to_units(), 1500);
        assert_eq!(azimuth_command(90, bounds).to_units(), 2000);
        assert_eq!(azimuth_command(180, bounds).to_units(), 500);
        assert_eq!(azimuth_command(270, bounds).to_units(), 1000);
        assert_eq!(azimuth_command(359, bounds).to_units(), 1494);
    }

    #[test]
    fn elevation_spans_horizon_to_zenith() {
        let bounds = AxisBounds::new(1000, 2000);
        assert_eq!(elevation_command(0, bounds).to_units(), 1000);
        assert_eq!(elevation_command(45, bounds).to_units(), 1500);
        assert_eq!(elevation_command(90, bounds).to_units(), 2000);
    }

    #[test]
    fn reversed_bounds_invert_direction() {
        let bounds = AxisBounds::new(2000, 1000);
        assert_eq!(elevation_command(0, bounds).to_units(), 2000);
        assert_eq!(elevation_command(90, bounds).to_units(), 1000);
    }

    #[test]
    fn small_correction_is_smoothed() {
        let s = settings(3);
        let mut ctrl = ActuatorController::new(&s);
        // 90 deg azimuth wants 2000 us, 25% of the 2000 us travel away
        assert!(ctrl.update(10_000, 90, 45, &s));
        let az = ctrl.microseconds(Axis::Azimuth);
        assert_eq!(az, 1625);
        assert_ne!(az, 2000);

        let mut previous = az;
        for i in 1..100 {
            ctrl.update(10_000 + i * UPDATE_INTERVAL_MS, 90, 45, &s);
            let az = ctrl.microseconds(Axis::Azimuth);
            assert!(az >= previous && az <= 2000);
            previous = az;
        }
        assert!(previous >= 1999);
    }

    #[test]
    fn large_correction_snaps_in_one_update() {
        let s = settings(10);
        let mut ctrl = ActuatorController::new(&s);
        // park at 2400 us first (snap from 1500 is under threshold, so walk there)
        for i in 0..400 {
            ctrl.update(i * UPDATE_INTERVAL_MS, 130, 0, &s);
        }
        let parked = ctrl.microseconds(Axis::Azimuth);
        assert!(parked > 2100, "parked at {parked}");

        // 190 deg maps to 555 us: well over 80% of the travel away
        ctrl.update(100_000, 190, 0, &s);
        assert_eq!(ctrl.microseconds(Axis::Azimuth), 555);
    }

    #[test]
    fn zero_smoothing_jumps_immediately() {
        let s = settings(0);
        let mut ctrl = ActuatorController::new(&s);
        ctrl.update(0, 90, 90, &s);
        assert_eq!(ctrl.microseconds(Axis::Azimuth), 2000);
        assert_eq!(ctrl.microseconds(Axis::Elevation), 2000);
    }

    #[test]
    fn updates_are_rate_limited() {
        let s = settings(3);
        let mut ctrl = ActuatorController::new(&s);
        assert!(ctrl.update(1000, 90, 0, &s));
        let first = ctrl.command(Axis::Azimuth);
        assert!(!ctrl.update(1019, 90, 0, &s));
        assert_eq!(ctrl.command(Axis::Azimuth), first);
        assert!(ctrl.update(1020, 90, 0, &s));
        assert_ne!(ctrl.command(Axis::Azimuth), first);
    }

    #[test]
    fn zero_width_axis_always_snaps() {
        let s = TrackerSettings {
            elevation: AxisBounds::new(1500, 1500),
            ..settings(5)
        };
        let mut ctrl = ActuatorController::new(&s);
        ctrl.update(0, 0, 60, &s);
        assert_eq!(ctrl.microseconds(Axis::Elevation), 1500);
    }

    #[test]
    fn never_leaves_bounds() {
        let s = settings(2);
        let mut ctrl = ActuatorController::new(&s);
        let mut now = 0;
        for step in 0..2000u32 {
            let az = ((step * 37) % 360) as u16;
            let el = ((step * 13) % 91) as u8;
            now += UPDATE_INTERVAL_MS;
            ctrl.update(now, az, el, &s);
            let a = ctrl.command(Axis::Azimuth);
            let e = ctrl.command(Axis::Elevation);
            assert!(a >= Centi::from_units(500) && a <= Centi::from_units(2500));
            assert!(e >= Centi::from_units(1000) && e <= Centi::from_units(2000));
        }
    }

    #[test]
    fn shrunk_bounds_pull_command_inside() {
        let s = settings(3);
        let mut ctrl = ActuatorController::new(&s);
        let narrow = TrackerSettings {
            azimuth: AxisBounds::new(1600, 1700),
            ..s
        };
        ctrl.update(0, 0, 0, &narrow);
        let az = ctrl.microseconds(Axis::Azimuth);
        assert!((1600..=1700).contains(&az), "az {az}");
    }
}
