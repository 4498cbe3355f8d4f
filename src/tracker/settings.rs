use serde::{Deserialize, Serialize};

use super::fixed::Centi;
use super::types::Axis;

/// Pulse-width bounds of one servo axis, in microseconds.
///
/// `low` may be greater than `high` for a servo mounted reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AxisBounds {
    pub low: u16,
    pub high: u16,
}

impl AxisBounds {
    pub const fn new(low: u16, high: u16) -> Self {
        Self { low, high }
    }

    pub fn midpoint(&self) -> u16 {
        ((self.low as u32 + self.high as u32) / 2) as u16
    }

    pub fn low_centi(&self) -> Centi {
        Centi::from_units(self.low as i32)
    }

    pub fn high_centi(&self) -> Centi {
        Centi::from_units(self.high as i32)
    }

    /// Absolute travel in fixed point.
    pub fn range(&self) -> Centi {
        (self.high_centi() - self.low_centi()).abs()
    }
}

/// Read-only settings snapshot polled by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct TrackerSettings {
    pub azimuth: AxisBounds,
    pub elevation: AxisBounds,
    /// Smoothing strength; each update moves 1/(smoothing+1) of the way.
    pub smoothing: u8,
    pub min_satellites: u8,
    pub projection: bool,
    /// Caller-clock time before which actuators are never commanded.
    pub startup_delay_ms: u64,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            azimuth: AxisBounds::new(500, 2500),
            elevation: AxisBounds::new(1000, 2000),
            smoothing: 3,
            min_satellites: 5,
            projection: true,
            startup_delay_ms: 5000,
        }
    }
}

impl TrackerSettings {
    pub fn bounds(&self, axis: Axis) -> AxisBounds {
        match axis {
            Axis::Azimuth => self.azimuth,
            Axis::Elevation => self.elevation,
        }
    }
}
