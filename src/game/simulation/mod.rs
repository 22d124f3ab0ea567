/// Simulation layer - fixed-timestep game logic.
///
/// Every tick runs three chained phases:
/// - **Orders**: move orders are turned into a fresh flow field
/// - **Steering**: units read their heading from the flow field
/// - **Integration**: velocities are applied to transforms
///
/// Flow field generation only ever happens in `Orders`, so steering never
/// observes a half-built field.

use bevy::prelude::*;
use crate::game::config::{ConfigSet, InitialConfig};

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum SimSet {
    Orders,
    Steering,
    Integration,
}

/// Number of fixed ticks simulated so far.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimTick(pub u64);

impl SimTick {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(30.0));
        app.init_resource::<SimTick>();

        app.configure_sets(
            FixedUpdate,
            (SimSet::Orders, SimSet::Steering, SimSet::Integration).chain(),
        );

        app.add_systems(Startup, apply_tick_rate.after(ConfigSet));
        app.add_systems(FixedUpdate, increment_sim_tick.before(SimSet::Orders));
    }
}

/// Increment the global simulation tick counter before any other fixed system.
pub fn increment_sim_tick(mut tick: ResMut<SimTick>) {
    tick.increment();
}

fn apply_tick_rate(config: Option<Res<InitialConfig>>, mut time: ResMut<Time<Fixed>>) {
    let Some(config) = config else { return };
    if config.tick_rate > 0.0 && config.tick_rate.is_finite() {
        time.set_timestep_hz(config.tick_rate);
        info!("Simulation tick rate set to {} Hz", config.tick_rate);
    } else {
        warn!("Ignoring invalid tick_rate {}", config.tick_rate);
    }
}
