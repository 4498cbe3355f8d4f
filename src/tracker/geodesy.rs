use super::types::COORD_SCALE;

/// Mean Earth radius used by the spherical model.
pub const EARTH_RADIUS_M: f64 = 6_371e3;

fn e7_to_rad(value: i64) -> f64 {
    (value as f64 / COORD_SCALE).to_radians()
}

/// Great-circle distance (law of cosines) and initial bearing from `home` to `target`.
///
/// Coordinates are degrees ×1e7. Everything runs in f64: in f32 the cosine of a
/// sub-kilometre longitude delta rounds to exactly 1.0 and the distance collapses.
/// The longitude difference is taken in i64: across the antimeridian it spans
/// up to 360° and does not fit in i32 at this scale. The bearing is normalised
/// into `[0, 360)`.
pub fn distance_and_bearing(
    home_lat_e7: i32,
    home_lon_e7: i32,
    target_lat_e7: i32,
    target_lon_e7: i32,
) -> (f64, f64) {
    let delta_lon = e7_to_rad(i64::from(target_lon_e7) - i64::from(home_lon_e7));
    let theta_a = e7_to_rad(home_lat_e7.into());
    let theta_b = e7_to_rad(target_lat_e7.into());

    let (sin_a, cos_a) = theta_a.sin_cos();
    let (sin_b, cos_b) = theta_b.sin_cos();
    let (sin_dlon, cos_dlon) = delta_lon.sin_cos();

    // Rounding can push identical points slightly past 1.0, where acos is NaN.
    let cos_angle = (sin_a * sin_b + cos_a * cos_b * cos_dlon).clamp(-1.0, 1.0);
    let distance = cos_angle.acos() * EARTH_RADIUS_M;

    let x = cos_b * sin_dlon;
    let y = cos_a * sin_b - sin_a * cos_b * cos_dlon;
    let bearing = normalize_degrees(x.atan2(y).to_degrees());

    (distance, bearing)
}

/// Line-of-sight elevation in degrees. Not clamped.
///
/// At zero distance this is 90° for a target above home, 0° level and -90° below.
pub fn elevation(distance_m: f64, relative_altitude_m: f64) -> f64 {
    relative_altitude_m.atan2(distance_m).to_degrees()
}

pub fn normalize_degrees(deg: f64) -> f64 {
    ((deg % 360.0) + 360.0) % 360.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e7(deg: f64) -> i32 {
        (deg * COORD_SCALE).round() as i32
    }

    #[test]
    fn identical_points_have_zero_distance() {
        for (lat, lon) in [(0.0, 0.0), (47.397742, 8.545594), (-33.9, 151.2), (89.9, -179.9)] {
            let (dist, bearing) = distance_and_bearing(e7(lat), e7(lon), e7(lat), e7(lon));
            assert_eq!(dist, 0.0, "at ({lat}, {lon})");
            assert!(bearing.is_finite());
            assert!((0.0..360.0).contains(&bearing));
        }
    }

    #[test]
    fn short_eastward_baseline() {
        let (dist, bearing) = distance_and_bearing(0, 0, 0, e7(0.0001));
        assert!((dist - 11.12).abs() / 11.12 < 0.01, "distance {dist}");
        assert!((bearing - 90.0).abs() < 0.9, "bearing {bearing}");
    }

    #[test]
    fn cardinal_bearings() {
        let home = (e7(47.0), e7(8.0));
        let north = distance_and_bearing(home.0, home.1, e7(47.01), e7(8.0)).1;
        let south = distance_and_bearing(home.0, home.1, e7(46.99), e7(8.0)).1;
        let west = distance_and_bearing(home.0, home.1, e7(47.0), e7(7.99)).1;
        assert!(north < 0.1 || north > 359.9, "north {north}");
        assert!((south - 180.0).abs() < 0.1, "south {south}");
        assert!((west - 270.0).abs() < 0.1, "west {west}");
    }

    #[test]
    fn one_kilometre_north() {
        // 1 km is 1000 / (R * pi / 180) degrees of latitude
        let dlat = 1000.0 / (EARTH_RADIUS_M * std::f64::consts::PI / 180.0);
        let (dist, _) = distance_and_bearing(e7(10.0), e7(20.0), e7(10.0 + dlat), e7(20.0));
        assert!((dist - 1000.0).abs() < 1.0, "distance {dist}");
    }

    #[test]
    fn crossing_the_antimeridian() {
        let (reference, reference_bearing) = distance_and_bearing(0, 0, 0, e7(0.02));
        // home just west of the line, target just east of it
        let (dist, bearing) = distance_and_bearing(0, e7(179.99), 0, e7(-179.99));
        assert!((dist - reference).abs() < 1e-3, "distance {dist}, expected {reference}");
        assert!((bearing - reference_bearing).abs() < 1e-6, "bearing {bearing}");

        let (back, back_bearing) = distance_and_bearing(e7(-17.0), e7(-179.99), e7(-17.0), e7(179.99));
        assert!(back < 2500.0, "distance {back}");
        assert!((back_bearing - 270.0).abs() < 0.1, "bearing {back_bearing}");
    }

    #[test]
    fn elevation_at_equal_height_and_distance() {
        assert!((elevation(1000.0, 1000.0) - 45.0).abs() < 1e-9);
    }

    #[test]
    fn elevation_directly_overhead() {
        assert!((elevation(0.0, 50.0) - 90.0).abs() < 1e-9);
        assert_eq!(elevation(0.0, 0.0), 0.0);
        assert!(elevation(0.0, -5.0) < 0.0);
    }

    #[test]
    fn normalize_wraps_negative_and_large() {
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(720.0), 0.0);
        assert!(normalize_degrees(-1e-14) < 360.0);
    }
}
