// tethys_core/src/config.rs

//! Plugin element configuration. Every field is optional; a missing key takes
//! the default of the Tethys vehicle model.

use serde::Deserialize;

fn default_namespace() -> String {
    "tethys".to_string()
}

// =========================================================================
// == Command / Telemetry Bridge ==
// =========================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommConfig {
    /// Model namespace used to build the actuator topics.
    pub namespace: String,
    pub command_topic: String,
    pub state_topic: String,

    // --- Entity names ---
    pub model_link: String,
    pub propeller_link: String,
    pub rudder_joint: String,
    #[serde(alias = "elavator_joint")]
    pub elevator_joint: String,
    pub mass_shifter_joint: String,

    // --- Actuator channel names (relative to the namespace) ---
    pub thruster_topic: String,
    pub rudder_topic: String,
    pub elevator_topic: String,
    pub mass_shifter_topic: String,
    pub buoyancy_engine_cmd_topic: String,
    pub buoyancy_engine_state_topic: String,
    pub drop_weight_topic: String,
}

impl Default for CommConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            command_topic: "tethys/command_topic".to_string(),
            state_topic: "tethys/state_topic".to_string(),
            model_link: "base_link".to_string(),
            propeller_link: "propeller".to_string(),
            rudder_joint: "vertical_fins_joint".to_string(),
            elevator_joint: "horizontal_fins_joint".to_string(),
            mass_shifter_joint: "battery_joint".to_string(),
            thruster_topic: "propeller_joint/cmd_pos".to_string(),
            rudder_topic: "vertical_fins_joint/0/cmd_pos".to_string(),
            elevator_topic: "horizontal_fins_joint/0/cmd_pos".to_string(),
            mass_shifter_topic: "battery_joint/0/cmd_pos".to_string(),
            buoyancy_engine_cmd_topic: "buoyancy_engine".to_string(),
            buoyancy_engine_state_topic: "buoyancy_engine/current_volume".to_string(),
            drop_weight_topic: "drop_weight".to_string(),
        }
    }
}

// =========================================================================
// == Actuators ==
// =========================================================================

/// Position-controlled joint (fins, battery mass shifter).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JointPositionConfig {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    pub joint_name: String,
    /// Channel under `/model/<namespace>/joint/`. Defaults to `<joint_name>/0/cmd_pos`.
    #[serde(default)]
    pub topic: Option<String>,
}

impl JointPositionConfig {
    pub fn new(namespace: &str, joint_name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            joint_name: joint_name.to_string(),
            topic: None,
        }
    }

    pub fn channel(&self) -> String {
        self.topic
            .clone()
            .unwrap_or_else(|| format!("{}/0/cmd_pos", self.joint_name))
    }
}

/// Force-controlled propeller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThrusterConfig {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    pub joint_name: String,
    /// Link the thrust is applied to.
    pub link_name: String,
    /// Channel under `/model/<namespace>/joint/`. Defaults to `<joint_name>/cmd_pos`.
    #[serde(default)]
    pub topic: Option<String>,
}

impl ThrusterConfig {
    pub fn new(namespace: &str, joint_name: &str, link_name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            joint_name: joint_name.to_string(),
            link_name: link_name.to_string(),
            topic: None,
        }
    }

    pub fn channel(&self) -> String {
        self.topic
            .clone()
            .unwrap_or_else(|| format!("{}/cmd_pos", self.joint_name))
    }
}
