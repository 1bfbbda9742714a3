// tethys_sim/src/main.rs

use bevy_app::App;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use tethys_sim::cli::Cli;
use tethys_sim::prelude::*;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let scenario = match ScenarioConfig::load(&cli.scenario) {
        Ok(scenario) => scenario,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let steps = cli.steps.unwrap_or_else(|| scenario.simulation.steps());
    let step = scenario.simulation.step_size().as_secs_f64();

    let bus = Arc::new(TopicBus::new());
    let node = Node::new(Arc::clone(&bus));
    let command_pub = match node.advertise::<LrauvCommand>(&scenario.comm.command_topic) {
        Ok(publisher) => publisher,
        Err(e) => {
            tracing::error!("Cannot advertise the command topic: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut app = App::new();
    app.add_plugins(TethysSimulationPlugin::new(scenario.clone(), Arc::clone(&bus)));
    app.finish();
    app.cleanup();

    tracing::info!("Running {} ticks of {:.3} s", steps, step);
    for tick in 0..steps {
        app.update();
        // Setpoints published now are applied by the actuators on the next tick.
        let mut command = scenario.command;
        command.dt = step;
        command.time = (tick + 1) as f64 * step;
        command_pub.publish(command);
    }

    let world = app.world();
    if let Some(bridge) = world
        .get_resource::<SystemSlots<CommBridge>>()
        .and_then(|slots| slots.iter().next())
    {
        let stats = bridge.system.stats();
        tracing::info!(
            "Commands handled: {}, states published: {}, snapshots rejected: {}",
            stats.commands_handled,
            stats.states_published,
            stats.snapshots_rejected
        );
    }
    if let Some(state) = bus
        .topic::<LrauvState>(&scenario.comm.state_topic)
        .ok()
        .and_then(|topic| topic.latest())
        .map(|stamped| stamped.message)
    {
        tracing::info!(
            "Final state: depth {:.2} m, speed {:.2} m/s, lat {:.6}, lon {:.6}, prop {:.1} rad/s",
            state.depth,
            state.speed,
            state.latitude_deg,
            state.longitude_deg,
            state.prop_omega
        );
    }
    ExitCode::SUCCESS
}
