use crate::config::{
    DIST_GUN_TO_V_PLATES, DIST_H_PLATES_TO_SCREEN, DIST_V_TO_H_PLATES, ELECTRON_CHARGE,
    ELECTRON_MASS, PLATE_SEPARATION, SCREEN_SIZE, VOLTS_PER_BRIGHTNESS,
};

/// Raw beam displacement at the screen, in metres
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Deflection {
    pub x: f64,
    pub y: f64,
}

/// Impact point in normalized screen space, both axes in [-1, 1]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct BeamSpot {
    pub x: f64,
    pub y: f64,
}

/// Computes where a single electron lands on the screen.
///
/// Uniform-field, non-relativistic kinematics: a parabolic segment inside the
/// plates followed by straight-line drift carrying the exit velocity. The
/// vertical pair sits first in the neck, so y drifts over both remaining
/// stages while x only drifts to the screen.
///
/// `accelerating_voltage` must be non-zero; the drive controller clamps it to
/// at least 1 kV.
pub fn compute_deflection(
    accelerating_voltage: f64,
    vertical_voltage: f64,
    horizontal_voltage: f64,
) -> Deflection {
    // Energy conservation: qV = ½mv²
    let v0 = (2.0 * accelerating_voltage.abs() * ELECTRON_CHARGE.abs() / ELECTRON_MASS).sqrt();

    let field_v = vertical_voltage / PLATE_SEPARATION;
    let field_h = horizontal_voltage / PLATE_SEPARATION;

    // Negative charge: acceleration points against the field
    let accel_v = ELECTRON_CHARGE * field_v / ELECTRON_MASS;
    let accel_h = ELECTRON_CHARGE * field_h / ELECTRON_MASS;

    let t1 = DIST_GUN_TO_V_PLATES / v0;
    let t2 = DIST_V_TO_H_PLATES / v0;
    let t3 = DIST_H_PLATES_TO_SCREEN / v0;

    let y = 0.5 * accel_v * t1 * t1 + accel_v * t1 * (t2 + t3);
    let x = 0.5 * accel_h * t2 * t2 + accel_h * t2 * t3;

    Deflection { x, y }
}

/// Map a raw deflection onto the screen, saturating at the edges
pub fn normalize(deflection: Deflection) -> BeamSpot {
    let half = SCREEN_SIZE / 2.0;
    BeamSpot {
        x: (deflection.x / half).clamp(-1.0, 1.0),
        y: (deflection.y / half).clamp(-1.0, 1.0),
    }
}

/// Phosphor colour for a given accelerating voltage: green, brighter with energy
pub fn beam_color(accelerating_voltage: f64) -> [u8; 3] {
    let brightness = (accelerating_voltage / VOLTS_PER_BRIGHTNESS).floor().clamp(0.0, 255.0);
    [0, brightness as u8, 0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_zero_plate_voltage_hits_center() {
        let d = compute_deflection(1000.0, 0.0, 0.0);
        assert_eq!(d.x, 0.0);
        assert_eq!(d.y, 0.0);

        let spot = normalize(d);
        assert_eq!(spot, BeamSpot { x: 0.0, y: 0.0 });
        assert_eq!(beam_color(1000.0), [0, 50, 0]);
    }

    #[test]
    fn test_deterministic() {
        let a = compute_deflection(2500.0, 37.5, -12.0);
        let b = compute_deflection(2500.0, 37.5, -12.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_known_values() {
        let acc = 2000.0;
        let v0 = (2.0 * acc * 1.6e-19 / 9.11e-31_f64).sqrt();
        let a = -1.6e-19 * (10.0 / 0.02) / 9.11e-31;
        let (t1, t2, t3) = (0.05 / v0, 0.05 / v0, 0.15 / v0);
        let expected_y = 0.5 * a * t1 * t1 + a * t1 * (t2 + t3);
        let expected_x = 0.5 * a * t2 * t2 + a * t2 * t3;

        let d = compute_deflection(acc, 10.0, 10.0);
        assert!((d.y - expected_y).abs() < 1e-12, "y: {} vs {}", d.y, expected_y);
        assert!((d.x - expected_x).abs() < 1e-12, "x: {} vs {}", d.x, expected_x);
    }

    #[test]
    fn test_axes_are_asymmetric() {
        // Same voltage on both pairs: the upstream vertical pair deflects further
        let d = compute_deflection(1000.0, 10.0, 10.0);
        assert!(d.y.abs() > d.x.abs(), "y={} x={}", d.y, d.x);
    }

    #[test]
    fn test_positive_voltage_deflects_negative() {
        let d = compute_deflection(1000.0, 20.0, 20.0);
        assert!(d.y < 0.0);
        assert!(d.x < 0.0);

        let d = compute_deflection(1000.0, -20.0, -20.0);
        assert!(d.y > 0.0);
        assert!(d.x > 0.0);
    }

    #[test]
    fn test_deflection_grows_with_plate_voltage() {
        let mut last = 0.0;
        for step in 1..=40 {
            let v = step as f64 * 5.0;
            let y = compute_deflection(3000.0, v, 0.0).y.abs();
            assert!(y > last, "|y| must grow with |V|: {} at {} V", y, v);
            last = y;
        }
    }

    #[test]
    fn test_higher_accelerating_voltage_stiffens_beam() {
        let soft = compute_deflection(1000.0, 50.0, 0.0).y.abs();
        let stiff = compute_deflection(5000.0, 50.0, 0.0).y.abs();
        assert!(stiff < soft);
    }

    #[test]
    fn test_normalize_saturates() {
        let spot = normalize(Deflection { x: 10.0, y: -10.0 });
        assert_eq!(spot, BeamSpot { x: 1.0, y: -1.0 });

        let spot = normalize(Deflection { x: 0.075, y: -0.0375 });
        assert!((spot.x - 0.5).abs() < 1e-12);
        assert!((spot.y + 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_bounded_for_random_inputs() {
        let mut rng = rand::thread_rng();
        for _ in 0..2000 {
            let acc = rng.gen_range(1000.0..=5000.0);
            let v = rng.gen_range(-1000.0..=1000.0);
            let h = rng.gen_range(-1000.0..=1000.0);
            let spot = normalize(compute_deflection(acc, v, h));
            assert!((-1.0..=1.0).contains(&spot.x), "x out of range: {}", spot.x);
            assert!((-1.0..=1.0).contains(&spot.y), "y out of range: {}", spot.y);
        }
    }

    #[test]
    fn test_beam_color_caps_at_full_green() {
        assert_eq!(beam_color(1010.0), [0, 50, 0]);
        assert_eq!(beam_color(4999.0), [0, 249, 0]);
        assert_eq!(beam_color(5000.0), [0, 250, 0]);
        assert_eq!(beam_color(6000.0), [0, 255, 0]);
    }
}
