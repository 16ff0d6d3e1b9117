/// Largest distance, in units of the last kept digit, that still snaps to it
pub(crate) const SNAP_TOLERANCE: f64 = 1e-6;

/// Truncates a coordinate value so its printed form stays within a fixed width.
///
/// Keeps 8 fractional digits below 10, 7 below 100 and 6 from 100 upwards.
/// Truncation is toward zero. A value that already is an exact decimal at that
/// precision up to floating-point noise (less than a millionth of the last
/// kept digit away) is kept as that decimal rather than dropping to the next
/// lower step, so `0.3` stays `0.3`.
///
/// # Example
/// ```
/// use worldmesh_rs::truncate_coordinate;
///
/// assert_eq!(truncate_coordinate(34.983333333333), 34.9833333);
/// assert_eq!(truncate_coordinate(-135.7374999999), -135.737499);
/// ```
pub fn truncate_coordinate(value: f64) -> f64 {
    let magnitude = value.abs();
    let fraction_digits = if magnitude < 10.0 {
        8
    } else if magnitude < 100.0 {
        7
    } else {
        6
    };
    let scale = 10f64.powi(fraction_digits);
    let scaled = value * scale;

    let nearest = scaled.round();
    if (scaled - nearest).abs() < SNAP_TOLERANCE {
        nearest / scale
    } else {
        scaled.trunc() / scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_digits_by_magnitude() {
        assert_eq!(truncate_coordinate(1.123456789), 1.12345678);
        assert_eq!(truncate_coordinate(12.123456789), 12.1234567);
        assert_eq!(truncate_coordinate(123.123456789), 123.123456);
    }

    #[test]
    fn test_truncates_toward_zero() {
        assert_eq!(truncate_coordinate(-1.123456789), -1.12345678);
        assert_eq!(truncate_coordinate(-0.666666666666), -0.66666666);
        assert_eq!(truncate_coordinate(0.666666666666), 0.66666666);
    }

    #[test]
    fn test_exact_decimals_are_not_biased_down() {
        assert_eq!(truncate_coordinate(0.3), 0.3);
        assert_eq!(truncate_coordinate(0.1 + 0.2), 0.3);
        assert_eq!(truncate_coordinate(35.0), 35.0);
        assert_eq!(truncate_coordinate(135.75), 135.75);
    }

    #[test]
    fn test_magnitude_band_edges() {
        assert_eq!(truncate_coordinate(9.999999999), 9.99999999);
        assert_eq!(truncate_coordinate(10.0), 10.0);
        assert_eq!(truncate_coordinate(10.000000099), 10.0000000);
        assert_eq!(truncate_coordinate(99.999999999), 99.9999999);
        assert_eq!(truncate_coordinate(100.0), 100.0);
        assert_eq!(truncate_coordinate(100.0000009), 100.0);
        assert_eq!(truncate_coordinate(-100.0), -100.0);
    }

    #[test]
    fn test_error_is_below_one_last_digit() {
        for value in [0.0123456789, 45.987654321, 179.99999999, -89.1234567891] {
            let truncated = truncate_coordinate(value);
            let step = if value.abs() < 10.0 {
                1e-8
            } else if value.abs() < 100.0 {
                1e-7
            } else {
                1e-6
            };
            assert!((value - truncated).abs() < step);
            assert!(truncated.abs() <= value.abs() + 1e-12);
        }
    }

    #[test]
    fn test_snap_distance_is_bounded() {
        // 7 kept digits: the tolerance is 1e-13 degrees
        let last_digit = 1e-7;
        let inside = 34.975 - 0.5 * SNAP_TOLERANCE * last_digit;
        let outside = 34.975 - 2.0 * SNAP_TOLERANCE * last_digit;
        assert_eq!(truncate_coordinate(inside), 34.975);
        assert!((truncate_coordinate(outside) - 34.9749999).abs() < 1e-12);

        // just above the decimal truncation lands on it as well
        let above = 34.975 + 0.5 * SNAP_TOLERANCE * last_digit;
        assert_eq!(truncate_coordinate(above), 34.975);
    }
}
