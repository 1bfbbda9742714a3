// tethys_sim/tests/closed_loop.rs

use approx::assert_relative_eq;
use bevy_app::App;
use std::sync::Arc;

use tethys_sim::prelude::*;

fn scenario() -> ScenarioConfig {
    ScenarioConfig::from_toml_str(
        r#"
        [simulation]
        step_ms = 50
        joint_slew_rate = 1.0

        [world]
        latitude_deg = 36.8
        longitude_deg = -121.9
        "#,
    )
    .unwrap()
}

fn run(app: &mut App, bus: &Arc<TopicBus>, command: LrauvCommand, ticks: usize) {
    let publisher = Node::new(Arc::clone(bus))
        .advertise::<LrauvCommand>("/tethys/command_topic")
        .unwrap();
    for _ in 0..ticks {
        app.update();
        publisher.publish(command);
    }
}

#[test]
fn commanded_vehicle_moves_and_reports_it() {
    let bus = Arc::new(TopicBus::new());
    let mut app = App::new();
    app.add_plugins(TethysSimulationPlugin::new(scenario(), Arc::clone(&bus)));

    let command = LrauvCommand {
        prop_omega_action: -300.0,
        rudder_angle_action: 0.2,
        elevator_angle_action: -0.1,
        mass_position_action: 0.01,
        ..LrauvCommand::default()
    };
    run(&mut app, &bus, command, 40);
    app.update();

    let state = bus
        .messages::<LrauvState>("/tethys/state_topic")
        .pop()
        .unwrap();
    assert_relative_eq!(state.rudder_angle, 0.2, epsilon = 1e-9);
    assert_relative_eq!(state.elevator_angle, -0.1, epsilon = 1e-9);
    assert_relative_eq!(state.mass_position, 0.01, epsilon = 1e-9);
    assert_relative_eq!(state.prop_omega, 300.0, epsilon = 1e-6);
    assert!(state.speed > 0.0);
    // Heading is east, so forward motion raises the longitude.
    assert!(state.longitude_deg > -121.9);
    assert_relative_eq!(state.latitude_deg, 36.8, epsilon = 1e-9);
}

#[test]
fn every_tick_publishes_exactly_one_state() {
    let bus = Arc::new(TopicBus::new());
    let mut app = App::new();
    app.add_plugins(TethysSimulationPlugin::new(scenario(), Arc::clone(&bus)));
    run(&mut app, &bus, LrauvCommand::default(), 7);

    assert_eq!(bus.message_count("/tethys/state_topic"), 7);
    let model = app.world().resource::<VehicleModel>().0;
    let stats = app
        .world()
        .resource::<SystemSlots<CommBridge>>()
        .get(model)
        .unwrap()
        .stats();
    assert_eq!(stats.commands_handled, 7);
    assert_eq!(stats.states_published, 7);
}
