use std::f64::consts::{PI, TAU};

use nalgebra::{Rotation2, Vector2};

/// Builds a planar vector from its magnitude and angle
pub fn from_polar(rho: f64, theta: f64) -> Vector2<f64> {
    Vector2::new(rho * theta.cos(), rho * theta.sin())
}

/// Euclidean length, computed with `hypot` to avoid overflow on large coordinates
pub fn magnitude(v: &Vector2<f64>) -> f64 {
    v.x.hypot(v.y)
}

/// Angle of the vector in (-PI, PI]
pub fn angle(v: &Vector2<f64>) -> f64 {
    v.y.atan2(v.x)
}

/// Rotates the vector counter-clockwise by `radians`, keeping its length
pub fn rotate(v: &Vector2<f64>, radians: f64) -> Vector2<f64> {
    Rotation2::new(radians) * *v
}

/// Maps an angle to the fraction of a full turn it represents, in [0, 1)
pub fn turn_fraction(radians: f64) -> f64 {
    let mut fraction = radians / TAU;
    if fraction < 0.0 {
        fraction += 1.0;
    }
    // -tiny + 1.0 rounds up to exactly 1.0
    if fraction >= 1.0 {
        fraction = 0.0;
    }
    fraction
}

/// Signed shortest rotation taking `from` onto `to`, in [-PI, PI)
pub fn angle_diff(to: f64, from: f64) -> f64 {
    (to - from + PI).rem_euclid(TAU) - PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn polar_round_trip() {
        let v = from_polar(10.0, PI / 2.0);
        assert_relative_eq!(magnitude(&v), 10.0, epsilon = 1e-12);
        assert_relative_eq!(angle(&v), PI / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn rotation_keeps_length() {
        let v = Vector2::new(5.0, 0.0);
        let r = rotate(&v, PI / 3.0);
        assert_relative_eq!(magnitude(&r), 5.0, epsilon = 1e-12);
        assert_relative_eq!(angle(&r), PI / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn turn_fraction_stays_in_unit_interval() {
        for radians in [-PI, -PI / 2.0, -1e-300, -0.0, 0.0, 1e-300, PI / 2.0, PI] {
            let f = turn_fraction(radians);
            assert!((0.0..1.0).contains(&f), "{radians} -> {f}");
        }
        assert_relative_eq!(turn_fraction(-PI), 0.5);
        assert_relative_eq!(turn_fraction(PI), 0.5);
        assert_relative_eq!(turn_fraction(-PI / 2.0), 0.75);
    }

    #[test]
    fn angle_diff_takes_short_way() {
        assert_relative_eq!(angle_diff(0.1, -0.1), 0.2, epsilon = 1e-12);
        assert_relative_eq!(angle_diff(-PI + 0.1, PI - 0.1), 0.2, epsilon = 1e-12);
        assert_relative_eq!(angle_diff(PI - 0.1, -PI + 0.1), -0.2, epsilon = 1e-12);
    }
}
