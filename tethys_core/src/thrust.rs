// tethys_core/src/thrust.rs

//! Empirical propeller model: angular velocity in, axial force out.
//!
//! The thruster actuator takes a force while the vehicle controller commands a
//! propeller speed, so the bridge converts with a fixed quadratic model.

/// Thrust coefficient of the propeller (dimensionless).
pub const THRUST_COEFFICIENT: f64 = 0.004422;
/// Fluid density used by the model (kg/m^3).
pub const FLUID_DENSITY: f64 = 1000.0;
/// Propeller diameter raised to the fourth power (m^4).
pub const DIAMETER_POW4: f64 = 0.0016;

/// Combined gain `k` so that `|force| = k * omega^2`.
pub const THRUST_GAIN: f64 = THRUST_COEFFICIENT * FLUID_DENSITY * DIAMETER_POW4;

/// Converts a propeller angular velocity (rad/s) into an axial force (N).
///
/// A positive speed pushes along the negative axis of the propeller joint, so
/// the result carries the opposite sign of `omega`.
pub fn propeller_thrust(omega: f64) -> f64 {
    let mut force = -THRUST_COEFFICIENT * FLUID_DENSITY * DIAMETER_POW4 * omega * omega;
    if omega < 0.0 {
        force *= -1.0;
    }
    force
}

/// Inverse of [`propeller_thrust`].
pub fn propeller_omega(force: f64) -> f64 {
    let magnitude = (force.abs() / THRUST_GAIN).sqrt();
    if force > 0.0 {
        -magnitude
    } else {
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_speed_gives_zero_force() {
        assert_eq!(propeller_thrust(0.0), 0.0);
    }

    #[test]
    fn forward_speed_thrust_matches_model() {
        assert_relative_eq!(propeller_thrust(1000.0), -7075.2, max_relative = 1e-12);
        assert_relative_eq!(propeller_thrust(300.0), -0.0070752 * 90_000.0, max_relative = 1e-12);
    }

    #[test]
    fn thrust_is_odd_in_omega() {
        for omega in [0.5, 12.0, 300.0, 1000.0, 2500.0] {
            assert_relative_eq!(propeller_thrust(-omega), -propeller_thrust(omega));
        }
        assert_relative_eq!(propeller_thrust(-1000.0), 7075.2, max_relative = 1e-12);
    }

    #[test]
    fn omega_inverts_thrust() {
        for omega in [-800.0, -3.0, 0.0, 42.0, 1200.0] {
            assert_relative_eq!(propeller_omega(propeller_thrust(omega)), omega, epsilon = 1e-9);
        }
    }

    #[test]
    fn nan_passes_through_unchecked() {
        assert!(propeller_thrust(f64::NAN).is_nan());
    }
}
