//! Dead-reckoning of the target azimuth between fixes.

/// Fastest projected rotation allowed: 10 ms per degree, i.e. 100°/s.
pub const MIN_MS_PER_DEGREE: i32 = 10;
/// Below this distance the bearing is mostly GPS noise and is not projected.
pub const MIN_PROJECTION_DISTANCE_M: u32 = 3;

/// Inputs for one projection, all taken from the last processed fix.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub enabled: bool,
    pub azimuth_deg: u16,
    pub distance_m: u32,
    pub ms_per_degree: i32,
    pub average_interval_ms: u64,
    pub last_processed_ms: u64,
}

impl Projection {
    fn is_active(&self) -> bool {
        self.enabled
            && self.average_interval_ms != 0
            && self.ms_per_degree != 0
            && self.distance_m > MIN_PROJECTION_DISTANCE_M
    }

    /// Extrapolates the azimuth to `now_ms`, never further than one average interval ahead.
    pub fn project(&self, now_ms: u64) -> u16 {
        if !self.is_active() {
            return self.azimuth_deg;
        }

        let elapsed = now_ms
            .saturating_sub(self.last_processed_ms)
            .min(self.average_interval_ms) as i32;
        let rate = limit_rate(self.ms_per_degree);
        let projected = (elapsed / rate + self.azimuth_deg as i32 + 360).rem_euclid(360);
        projected as u16
    }
}

fn limit_rate(ms_per_degree: i32) -> i32 {
    if ms_per_degree.abs() < MIN_MS_PER_DEGREE {
        MIN_MS_PER_DEGREE * ms_per_degree.signum()
    } else {
        ms_per_degree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moving() -> Projection {
        Projection {
            enabled: true,
            azimuth_deg: 100,
            distance_m: 500,
            ms_per_degree: 100,
            average_interval_ms: 1000,
            last_processed_ms: 10_000,
        }
    }

    #[test]
    fn projects_linearly() {
        let p = moving();
        assert_eq!(p.project(10_000), 100);
        assert_eq!(p.project(10_500), 105);
        assert_eq!(p.project(11_000), 110);
    }

    #[test]
    fn stops_after_one_average_interval() {
        let p = moving();
        assert_eq!(p.project(15_000), 110);
    }

    #[test]
    fn clock_behind_last_fix_does_not_project_backwards() {
        let p = moving();
        assert_eq!(p.project(9_000), 100);
    }

    #[test]
    fn counter_clockwise_wraps_below_zero() {
        let p = Projection {
            azimuth_deg: 2,
            ms_per_degree: -50,
            ..moving()
        };
        assert_eq!(p.project(10_500), 352);
    }

    #[test]
    fn clockwise_wraps_past_north() {
        let p = Projection {
            azimuth_deg: 355,
            ..moving()
        };
        assert_eq!(p.project(11_000), 5);
    }

    #[test]
    fn fast_rates_are_saturated() {
        let p = Projection {
            ms_per_degree: 2,
            ..moving()
        };
        // limited to 10 ms/deg: 500 ms -> 50 degrees
        assert_eq!(p.project(10_500), 150);

        let ccw = Projection {
            ms_per_degree: -1,
            ..moving()
        };
        assert_eq!(ccw.project(10_500), 50);
    }

    #[test]
    fn inactive_conditions_return_target() {
        let base = moving();
        let cases = [
            Projection { enabled: false, ..base },
            Projection { average_interval_ms: 0, ..base },
            Projection { ms_per_degree: 0, ..base },
            Projection { distance_m: 3, ..base },
        ];
        for case in cases {
            assert_eq!(case.project(10_500), 100, "{case:?}");
        }
    }

    #[test]
    fn long_horizon_stays_in_range() {
        let p = Projection {
            azimuth_deg: 0,
            ms_per_degree: -10,
            average_interval_ms: 10_000,
            ..moving()
        };
        let az = p.project(20_000);
        assert!(az < 360);
        assert_eq!(az, 80);
    }
}
