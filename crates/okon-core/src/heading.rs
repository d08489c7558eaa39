//! Heading arithmetic in degrees.

pub const FULL_TURN: f64 = 360.0;

/// Maps `angle` into `[0, 360)` by adding or subtracting one full turn.
///
/// The wrap is applied once, not looped: callers keep `angle` within one turn of the range,
/// which holds for any heading in `[0, 360)` plus an offset in `(-360, 360)`.
pub fn normalize_heading(angle: f64) -> f64 {
    let wrapped = if angle < 0.0 {
        angle + FULL_TURN
    } else if angle >= FULL_TURN {
        angle - FULL_TURN
    } else {
        angle
    };
    // -1e-14 + 360.0 rounds to 360.0
    if wrapped >= FULL_TURN {
        0.0
    } else {
        wrapped
    }
}

/// Signed shortest rotation from `target` to `measured`, in `(-180, 180]`.
pub fn heading_error(measured: f64, target: f64) -> f64 {
    let diff = (measured - target).rem_euclid(FULL_TURN);
    if diff > FULL_TURN / 2.0 {
        diff - FULL_TURN
    } else {
        diff
    }
}

/// Symmetric tolerance band around `target`, measured along the shorter way round.
pub fn within_heading_tolerance(measured: f64, target: f64, delta: f64) -> bool {
    heading_error(measured, target).abs() < delta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_keeps_sum_in_range() {
        let mut heading = 0.0;
        while heading < 360.0 {
            let mut add = -359.5;
            while add < 360.0 {
                let target = normalize_heading(heading + add);
                assert!(
                    (0.0..360.0).contains(&target),
                    "heading={heading} add={add} target={target}"
                );
                add += 7.25;
            }
            heading += 11.5;
        }
    }

    #[test]
    fn normalize_adds_one_turn_below_zero() {
        assert_eq!(normalize_heading(-45.0), 315.0);
        assert_eq!(normalize_heading(10.0), 10.0);
        assert_eq!(normalize_heading(370.0), 10.0);
        assert_eq!(normalize_heading(-1e-14), 0.0);
    }

    #[test]
    fn heading_error_takes_shorter_way() {
        assert_eq!(heading_error(10.0, 350.0), 20.0);
        assert_eq!(heading_error(350.0, 10.0), -20.0);
        assert_eq!(heading_error(90.0, 90.0), 0.0);
        assert_eq!(heading_error(270.0, 90.0), 180.0);
    }

    #[test]
    fn tolerance_band_is_symmetric_and_open() {
        assert!(within_heading_tolerance(359.5, 0.5, 2.0));
        assert!(within_heading_tolerance(1.5, 0.5, 2.0));
        assert!(!within_heading_tolerance(2.5, 0.5, 2.0));
        assert!(!within_heading_tolerance(92.0, 90.0, 2.0));
    }
}
