use serde::Serialize;

use super::actuator::ActuatorController;
use super::cadence::{azimuth_delta, ms_per_degree, CadenceEstimator};
use super::geodesy;
use super::home::HomeArming;
use super::predictor::Projection;
use super::settings::TrackerSettings;
use super::sink::{DisplayFrame, Peripherals};
use super::types::{Axis, GeoFix, HomePoint, TrackingState};

const MAX_ELEVATION_DEG: i32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TrackerMode {
    /// No home point yet.
    Unarmed,
    /// Home is set but the startup delay has not passed.
    WarmingUp,
    Tracking,
}

/// Point-in-time view of everything a display or API consumer reads.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct TrackerStatus {
    pub mode: TrackerMode,
    pub home: Option<HomePoint>,
    pub home_set_on_last_fix: bool,
    pub satellites: u8,
    pub last_fix: Option<GeoFix>,
    pub target: TrackingState,
    pub projected_azimuth_deg: u16,
    pub average_interval_cms: i32,
    pub interval_percent: u8,
    pub azimuth_us: u16,
    pub elevation_us: u16,
}

/// Antenna tracking engine.
///
/// Driven by the caller: `ingest_fix` whenever a position arrives and `tick`
/// on a steady cadence. Fixes are processed inside `tick`, one at a time; a
/// fix that arrives before the previous one was processed replaces it.
pub struct Tracker {
    settings: TrackerSettings,
    peripherals: Peripherals,
    home: HomeArming,
    cadence: CadenceEstimator,
    actuators: ActuatorController,
    state: TrackingState,
    last_fix: Option<GeoFix>,
    fix_pending: bool,
    last_processed_ms: u64,
    home_set_on_last_fix: bool,
    projected_azimuth: u16,
}

impl Tracker {
    pub fn new(settings: TrackerSettings) -> Self {
        Self::with_peripherals(settings, Peripherals::default())
    }

    pub fn with_peripherals(settings: TrackerSettings, peripherals: Peripherals) -> Self {
        Self {
            actuators: ActuatorController::new(&settings),
            settings,
            peripherals,
            home: HomeArming::default(),
            cadence: CadenceEstimator::default(),
            state: TrackingState::default(),
            last_fix: None,
            fix_pending: false,
            last_processed_ms: 0,
            home_set_on_last_fix: false,
            projected_azimuth: 0,
        }
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    /// Swaps in a fresh settings snapshot; takes effect on the next tick.
    pub fn update_settings(&mut self, settings: TrackerSettings) {
        if settings != self.settings {
            log::info!("Tracker settings updated: {:?}", settings);
        }
        self.settings = settings;
    }

    pub fn ingest_fix(&mut self, fix: GeoFix) {
        self.last_fix = Some(fix);
        self.fix_pending = true;
    }

    pub fn tick(&mut self, now_ms: u64) {
        self.process_pending(now_ms);

        match self.mode(now_ms) {
            TrackerMode::Tracking => self.update_actuators(now_ms),
            TrackerMode::Unarmed | TrackerMode::WarmingUp => {
                if let Some(fix) = self.last_fix {
                    let frame = DisplayFrame::Idle {
                        satellites: fix.satellites,
                        latitude_e7: fix.latitude_e7,
                        longitude_e7: fix.longitude_e7,
                        interval_percent: self.cadence_percent(now_ms),
                    };
                    self.peripherals.display.show(&frame);
                }
            }
        }
    }

    fn process_pending(&mut self, now_ms: u64) {
        if !self.fix_pending {
            return;
        }
        self.fix_pending = false;
        let Some(fix) = self.last_fix else {
            return;
        };

        // Cadence is the time between processing fixes, not between their generation
        let interval = now_ms.saturating_sub(self.last_processed_ms);
        self.last_processed_ms = now_ms;

        let did_set_home = self.home.try_arm(&fix, self.settings.min_satellites);
        self.home_set_on_last_fix = did_set_home;
        let Some(home) = self.home.home() else {
            log::trace!("Ignoring fix with {} satellites before home is set", fix.satellites);
            return;
        };

        let (distance, bearing) = geodesy::distance_and_bearing(
            home.latitude_e7,
            home.longitude_e7,
            fix.latitude_e7,
            fix.longitude_e7,
        );
        let distance_m = distance as u32;
        let azimuth_deg = (bearing as u16) % 360;
        let relative_altitude = fix.altitude_m as f64 - home.altitude_m as f64;
        let elevation_deg = clamp_elevation(distance_m, relative_altitude);
        log::debug!(
            "Azimuth: {}deg Elevation: {}deg Distance: {}m",
            azimuth_deg,
            elevation_deg,
            distance_m
        );

        // The interval up to the arming fix is the time to GPS lock, not a fix cadence
        if !did_set_home {
            self.cadence.record_interval(interval);
            let delta = azimuth_delta(azimuth_deg, self.state.azimuth_deg);
            self.state.ms_per_degree = ms_per_degree(interval, delta);
            log::debug!(
                "{} delta in {}ms, {}ms/d {}avg",
                delta,
                interval,
                self.state.ms_per_degree,
                self.cadence.average_interval_cms()
            );
        }

        self.state.distance_m = distance_m;
        self.state.elevation_deg = elevation_deg;
        self.state.azimuth_deg = azimuth_deg;
    }

    fn projection(&self) -> Projection {
        Projection {
            enabled: self.settings.projection,
            azimuth_deg: self.state.azimuth_deg,
            distance_m: self.state.distance_m,
            ms_per_degree: self.state.ms_per_degree,
            average_interval_ms: self.cadence.average_interval_ms(),
            last_processed_ms: self.last_processed_ms,
        }
    }

    fn update_actuators(&mut self, now_ms: u64) {
        self.projected_azimuth = self.projection().project(now_ms);
        let updated = self.actuators.update(
            now_ms,
            self.projected_azimuth,
            self.state.elevation_deg,
            &self.settings,
        );
        if !updated {
            return;
        }

        for axis in Axis::ALL {
            let us = self.actuators.microseconds(axis);
            self.peripherals.actuator(axis).write_microseconds(axis, us);
        }

        let frame = DisplayFrame::Active {
            elevation_deg: self.state.elevation_deg,
            relative_altitude_m: self.relative_altitude().clamp(-99, 999),
            projected_azimuth_deg: self.projected_azimuth,
            distance_m: self.state.distance_m,
            azimuth_us: self.actuators.microseconds(Axis::Azimuth),
            elevation_us: self.actuators.microseconds(Axis::Elevation),
            interval_percent: self.cadence_percent(now_ms),
        };
        self.peripherals.display.show(&frame);
    }

    fn relative_altitude(&self) -> i32 {
        match (self.last_fix, self.home.home()) {
            (Some(fix), Some(home)) => fix.altitude_m.saturating_sub(home.altitude_m),
            _ => 0,
        }
    }

    pub fn mode(&self, now_ms: u64) -> TrackerMode {
        if !self.home.is_armed() {
            TrackerMode::Unarmed
        } else if now_ms <= self.settings.startup_delay_ms {
            TrackerMode::WarmingUp
        } else {
            TrackerMode::Tracking
        }
    }

    pub fn is_home_set(&self) -> bool {
        self.home.is_armed()
    }

    pub fn home(&self) -> Option<HomePoint> {
        self.home.home()
    }

    /// Whether the most recently processed fix is the one that set home.
    pub fn home_set_on_last_fix(&self) -> bool {
        self.home_set_on_last_fix
    }

    pub fn target_azimuth(&self) -> u16 {
        self.state.azimuth_deg
    }

    pub fn target_elevation(&self) -> u8 {
        self.state.elevation_deg
    }

    pub fn target_distance(&self) -> u32 {
        self.state.distance_m
    }

    pub fn tracking_state(&self) -> TrackingState {
        self.state
    }

    pub fn satellite_count(&self) -> u8 {
        self.last_fix.map(|f| f.satellites).unwrap_or(0)
    }

    pub fn last_fix(&self) -> Option<GeoFix> {
        self.last_fix
    }

    pub fn average_interval_cms(&self) -> i32 {
        self.cadence.average_interval_cms()
    }

    /// Azimuth used for the latest actuator update, including projection.
    pub fn projected_azimuth(&self) -> u16 {
        self.projected_azimuth
    }

    pub fn cadence_percent(&self, now_ms: u64) -> u8 {
        self.cadence.interval_percent(now_ms, self.last_processed_ms)
    }

    /// Current pulse width command for `axis` in microseconds.
    pub fn actuator_command(&self, axis: Axis) -> u16 {
        self.actuators.microseconds(axis)
    }

    pub fn status(&self, now_ms: u64) -> TrackerStatus {
        TrackerStatus {
            mode: self.mode(now_ms),
            home: self.home.home(),
            home_set_on_last_fix: self.home_set_on_last_fix,
            satellites: self.satellite_count(),
            last_fix: self.last_fix,
            target: self.state,
            projected_azimuth_deg: self.projected_azimuth,
            average_interval_cms: self.cadence.average_interval_cms(),
            interval_percent: self.cadence_percent(now_ms),
            azimuth_us: self.actuators.microseconds(Axis::Azimuth),
            elevation_us: self.actuators.microseconds(Axis::Elevation),
        }
    }
}

/// Whole-degree elevation limited to `[0, 90]`.
///
/// A target straight above home is at the zenith; one level with or below it
/// sits on the horizon.
fn clamp_elevation(distance_m: u32, relative_altitude_m: f64) -> u8 {
    if distance_m == 0 {
        return if relative_altitude_m > 0.0 {
            MAX_ELEVATION_DEG as u8
        } else {
            0
        };
    }
    let elevation = geodesy::elevation(distance_m as f64, relative_altitude_m) as i32;
    elevation.clamp(0, MAX_ELEVATION_DEG) as u8
}
