//! Output capabilities the tracker drives every tick.
//!
//! Peripherals that are not fitted get a no-op sink so the engine never has to
//! check for their presence.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::types::Axis;

pub trait ActuatorSink: Send {
    fn write_microseconds(&mut self, axis: Axis, microseconds: u16);
}

pub trait DisplaySink: Send {
    fn show(&mut self, frame: &DisplayFrame);
}

/// Contents of one status screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum DisplayFrame {
    /// Waiting for home or warm-up: raw GPS state.
    Idle {
        satellites: u8,
        latitude_e7: i32,
        longitude_e7: i32,
        interval_percent: u8,
    },
    Active {
        elevation_deg: u8,
        /// Target height above home, limited to what fits on screen.
        relative_altitude_m: i32,
        projected_azimuth_deg: u16,
        distance_m: u32,
        azimuth_us: u16,
        elevation_us: u16,
        interval_percent: u8,
    },
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullActuator;

impl ActuatorSink for NullActuator {
    fn write_microseconds(&mut self, _axis: Axis, _microseconds: u16) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl DisplaySink for NullDisplay {
    fn show(&mut self, _frame: &DisplayFrame) {}
}

/// Writes every frame to the log at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDisplay;

impl DisplaySink for LogDisplay {
    fn show(&mut self, frame: &DisplayFrame) {
        match frame {
            DisplayFrame::Idle {
                satellites,
                latitude_e7,
                longitude_e7,
                interval_percent,
            } => log::debug!(
                "Sats: {} Lat: {} Lon: {} [{}%]",
                satellites,
                format_e7(*latitude_e7),
                format_e7(*longitude_e7),
                interval_percent
            ),
            DisplayFrame::Active {
                elevation_deg,
                relative_altitude_m,
                projected_azimuth_deg,
                distance_m,
                azimuth_us,
                elevation_us,
                interval_percent,
            } => log::debug!(
                "El:{:02} {}m Az:{:03} {} Se:{:4}us Sa:{:4}us [{}%]",
                elevation_deg,
                relative_altitude_m,
                projected_azimuth_deg,
                format_distance(*distance_m),
                elevation_us,
                azimuth_us,
                interval_percent
            ),
        }
    }
}

fn format_e7(value: i32) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    format!("{}{}.{:07}", sign, abs / 10_000_000, abs % 10_000_000)
}

fn format_distance(distance_m: u32) -> String {
    if distance_m > 999 {
        format!("{}.{:03}km", distance_m / 1000, distance_m % 1000)
    } else {
        format!("{}m", distance_m)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordedCommand {
    pub microseconds: u16,
    pub writes: u64,
}

/// Remembers the last command per axis; clones share the same record.
#[derive(Debug, Default, Clone)]
pub struct RecordingActuator {
    inner: Arc<Mutex<[RecordedCommand; 2]>>,
}

impl RecordingActuator {
    pub fn last(&self, axis: Axis) -> RecordedCommand {
        self.inner.lock().unwrap()[axis.index()]
    }
}

impl ActuatorSink for RecordingActuator {
    fn write_microseconds(&mut self, axis: Axis, microseconds: u16) {
        let mut locked = self.inner.lock().unwrap();
        let record = &mut locked[axis.index()];
        record.microseconds = microseconds;
        record.writes += 1;
    }
}

/// The sinks a tracker writes to. Defaults to no-ops for everything.
pub struct Peripherals {
    pub azimuth: Box<dyn ActuatorSink>,
    pub elevation: Box<dyn ActuatorSink>,
    pub display: Box<dyn DisplaySink>,
}

impl Default for Peripherals {
    fn default() -> Self {
        Self {
            azimuth: Box::new(NullActuator),
            elevation: Box::new(NullActuator),
            display: Box::new(NullDisplay),
        }
    }
}

impl Peripherals {
    /// Routes both axes to the same sink.
    pub fn with_actuators<A>(actuator: A) -> Self
    where
        A: ActuatorSink + Clone + 'static,
    {
        Self {
            azimuth: Box::new(actuator.clone()),
            elevation: Box::new(actuator),
            ..Default::default()
        }
    }

    pub fn display(mut self, display: impl DisplaySink + 'static) -> Self {
        self.display = Box::new(display);
        self
    }

    pub(crate) fn actuator(&mut self, axis: Axis) -> &mut dyn ActuatorSink {
        match axis {
            Axis::Azimuth => self.azimuth.as_mut(),
            Axis::Elevation => self.elevation.as_mut(),
        }
    }
}
