use super::types::{GeoFix, HomePoint};

/// One-shot latch for the home point.
#[derive(Debug, Default)]
pub struct HomeArming {
    home: Option<HomePoint>,
}

impl HomeArming {
    pub fn is_armed(&self) -> bool {
        self.home.is_some()
    }

    pub fn home(&self) -> Option<HomePoint> {
        self.home
    }

    /// Latches `fix` as home if not armed yet and it has enough satellites.
    ///
    /// Returns true only on the call that actually arms.
    pub fn try_arm(&mut self, fix: &GeoFix, minimum_satellites: u8) -> bool {
        if self.home.is_some() || fix.satellites < minimum_satellites {
            return false;
        }
        let home = HomePoint::from(fix);
        log::info!(
            "Home set to ({}, {}) at {}m with {} satellites",
            home.latitude_e7,
            home.longitude_e7,
            home.altitude_m,
            fix.satellites
        );
        self.home = Some(home);
        true
    }
}
