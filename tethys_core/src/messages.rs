// tethys_core/src/messages.rs

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// =========================================================================
// == Primitive Messages ==
// =========================================================================

/// A single scalar setpoint or measurement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Double {
    pub data: f64,
}

impl Double {
    pub fn new(data: f64) -> Self {
        Self { data }
    }
}

/// A payload-free trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty;

/// Simulation time split into whole seconds and the nanosecond remainder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Time {
    pub sec: i64,
    pub nsec: i32,
}

impl Time {
    pub fn from_duration(duration: Duration) -> Self {
        Self {
            sec: duration.as_secs() as i64,
            nsec: duration.subsec_nanos() as i32,
        }
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.sec as f64 + self.nsec as f64 * 1e-9
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub stamp: Time,
}

// =========================================================================
// == Vehicle Command / State ==
// =========================================================================

/// Actuation request sent by the vehicle controller.
///
/// Values are passed through to the actuators as-is; nothing here is clamped
/// or checked for NaN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LrauvCommand {
    /// Propeller angular velocity setpoint (rad/s, signed).
    pub prop_omega_action: f64,
    /// Rudder angle (rad).
    pub rudder_angle_action: f64,
    /// Elevator angle (rad).
    pub elevator_angle_action: f64,
    /// Mass shifter position (m).
    pub mass_position_action: f64,
    /// Buoyancy engine actuation (volume).
    pub buoyancy_action: f64,
    pub density: f64,
    pub dt: f64,
    pub time: f64,
    /// Any nonzero value fires the drop weight.
    pub drop_weight_state: i32,
}

/// The telemetry snapshot published once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LrauvState {
    pub header: Header,
    /// Roll, pitch, heading (rad).
    pub rph: Vector3<f64>,
    /// Positive down (m).
    pub depth: f64,
    pub speed: f64,
    pub rudder_angle: f64,
    pub elevator_angle: f64,
    pub mass_position: f64,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub prop_omega: f64,
    pub buoyancy_position: f64,
}

impl Default for LrauvState {
    fn default() -> Self {
        Self {
            header: Header::default(),
            rph: Vector3::zeros(),
            depth: 0.0,
            speed: 0.0,
            rudder_angle: 0.0,
            elevator_angle: 0.0,
            mass_position: 0.0,
            latitude_deg: 0.0,
            longitude_deg: 0.0,
            prop_omega: 0.0,
            buoyancy_position: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_splits_whole_seconds_and_nanoseconds() {
        let stamp = Time::from_duration(Duration::from_millis(12_345));
        assert_eq!(stamp.sec, 12);
        assert_eq!(stamp.nsec, 345_000_000);
    }

    #[test]
    fn time_below_one_second_has_zero_seconds() {
        let stamp = Time::from_duration(Duration::from_nanos(999_999_999));
        assert_eq!(stamp.sec, 0);
        assert_eq!(stamp.nsec, 999_999_999);
    }

    #[test]
    fn command_fields_default_when_missing() {
        let cmd: LrauvCommand = toml::from_str("prop_omega_action = 300.0").unwrap();
        assert_eq!(cmd.prop_omega_action, 300.0);
        assert_eq!(cmd.drop_weight_state, 0);
        assert_eq!(cmd.rudder_angle_action, 0.0);
    }
}
