/// Ceiling of the average update interval (10 s in centi-ms), bounds the projection horizon.
pub const MAX_AVERAGE_INTERVAL_CMS: i32 = 10 * 1000 * 100;

/// Low-pass estimate of the time between processed fixes.
///
/// The average is kept in hundredths of a millisecond. It starts at zero with no
/// fast init, so the first intervals after arming cannot cause an overprojection.
#[derive(Debug, Default, Clone, Copy)]
pub struct CadenceEstimator {
    average_cms: i32,
}

impl CadenceEstimator {
    pub fn average_interval_cms(&self) -> i32 {
        self.average_cms
    }

    /// Average interval in whole milliseconds.
    pub fn average_interval_ms(&self) -> u64 {
        (self.average_cms / 100) as u64
    }

    pub fn record_interval(&mut self, interval_ms: u64) {
        let sample = interval_ms
            .saturating_mul(100)
            .min(i32::MAX as u64) as i32;
        // 4-sample time constant
        self.average_cms += (sample - self.average_cms) / 4;
        self.average_cms = self.average_cms.min(MAX_AVERAGE_INTERVAL_CMS);
    }

    /// How far into the expected interval the last processed fix is, 0-100.
    ///
    /// Reads 100 once a fix is overdue; 0 while no average exists yet.
    pub fn interval_percent(&self, now_ms: u64, last_processed_ms: u64) -> u8 {
        if self.average_cms <= 0 {
            return 0;
        }
        let elapsed = now_ms.saturating_sub(last_processed_ms);
        let pct = elapsed.saturating_mul(100 * 100) / self.average_cms as u64;
        pct.min(100) as u8
    }
}

/// Signed shortest rotation from `previous` to `current`, in `[-180, 180)`.
pub fn azimuth_delta(current: u16, previous: u16) -> i32 {
    (current as i32 - previous as i32 + 540).rem_euclid(360) - 180
}

/// Milliseconds per degree of rotation; zero when the azimuth did not move.
pub fn ms_per_degree(interval_ms: u64, delta_deg: i32) -> i32 {
    if delta_deg == 0 {
        return 0;
    }
    let interval = interval_ms.min(i32::MAX as u64) as i32;
    interval / delta_deg
}
