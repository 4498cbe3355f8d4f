use std::ops::{Add, AddAssign, Div, Sub};

use serde::Serialize;

/// Fixed-point value in hundredths of a native unit.
///
/// Actuator positions are kept as `Centi` so repeated smoothing divisions keep
/// sub-microsecond precision instead of truncating towards zero every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Centi(i32);

impl Centi {
    pub const SCALE: i32 = 100;

    pub const fn from_units(units: i32) -> Self {
        Centi(units * Self::SCALE)
    }

    /// Whole units, truncated towards zero.
    pub const fn to_units(self) -> i32 {
        self.0 / Self::SCALE
    }

    pub fn abs(self) -> Self {
        Centi(self.0.abs())
    }

    /// `self` as an integer percentage of `range`; `None` when the range is zero.
    pub fn percent_of(self, range: Centi) -> Option<i64> {
        if range.0 == 0 {
            return None;
        }
        Some(self.0 as i64 * 100 / range.0 as i64)
    }

    pub fn clamp_between(self, a: Centi, b: Centi) -> Self {
        Centi(self.0.clamp(a.0.min(b.0), a.0.max(b.0)))
    }
}

impl Add for Centi {
    type Output = Centi;

    fn add(self, rhs: Centi) -> Centi {
        Centi(self.0 + rhs.0)
    }
}

impl AddAssign for Centi {
    fn add_assign(&mut self, rhs: Centi) {
        self.0 += rhs.0;
    }
}

impl Sub for Centi {
    type Output = Centi;

    fn sub(self, rhs: Centi) -> Centi {
        Centi(self.0 - rhs.0)
    }
}

/// Division by a plain divisor, truncating towards zero.
impl Div<i32> for Centi {
    type Output = Centi;

    fn div(self, rhs: i32) -> Centi {
        Centi(self.0 / rhs)
    }
}
