use serde::{Deserialize, Serialize};

/// Scale of the fixed-point latitude/longitude fields (degrees ×1e7).
pub const COORD_SCALE: f64 = 1e7;

/// A single decoded position report for the tracked target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GeoFix {
    pub latitude_e7: i32,
    pub longitude_e7: i32,
    pub altitude_m: i32,
    pub satellites: u8,
    /// Course over ground in centidegrees.
    pub heading_cdeg: u16,
    /// Ground speed in cm/s.
    pub speed_cms: u16,
    /// Monotonic arrival time in milliseconds.
    pub arrival_ms: u64,
}

impl GeoFix {
    pub fn from_degrees(latitude: f64, longitude: f64, altitude_m: i32, satellites: u8) -> Self {
        Self {
            latitude_e7: (latitude * COORD_SCALE).round() as i32,
            longitude_e7: (longitude * COORD_SCALE).round() as i32,
            altitude_m,
            satellites,
            ..Default::default()
        }
    }
}

/// Fixed observation point latched from the first qualifying fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct HomePoint {
    pub latitude_e7: i32,
    pub longitude_e7: i32,
    pub altitude_m: i32,
}

impl From<&GeoFix> for HomePoint {
    fn from(fix: &GeoFix) -> Self {
        Self {
            latitude_e7: fix.latitude_e7,
            longitude_e7: fix.longitude_e7,
            altitude_m: fix.altitude_m,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::IntoStaticStr,
    utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Axis {
    Azimuth,
    Elevation,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::Azimuth, Axis::Elevation];

    pub(crate) fn index(self) -> usize {
        match self {
            Axis::Azimuth => 0,
            Axis::Elevation => 1,
        }
    }
}

/// Home-relative solution for the most recently processed fix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct TrackingState {
    pub distance_m: u32,
    pub elevation_deg: u8,
    pub azimuth_deg: u16,
    /// Milliseconds needed to turn one degree; the sign gives the direction.
    pub ms_per_degree: i32,
}
