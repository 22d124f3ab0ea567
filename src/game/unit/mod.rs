mod components;
mod resources;
mod spawning;
mod movement;
mod visuals;

use bevy::prelude::*;
use crate::game::config::ConfigSet;
use crate::game::simulation::SimSet;

// Re-export public types
pub use components::{FollowingFlowField, Selected, Unit, Velocity};
pub use resources::{UnitAssets, UnitSpawner};
pub use spawning::spawn_offset;
pub use movement::{assign_move_orders, desired_velocity, integrate_units, steer_units};

use resources::setup_unit_resources;
use spawning::spawn_units;
use visuals::update_selection_materials;

/// Plugin that spawns units and moves ordered units along the map flow field
pub struct UnitPlugin;

impl Plugin for UnitPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_unit_resources.after(ConfigSet))
           .add_systems(FixedUpdate, (
               assign_move_orders.in_set(SimSet::Orders),
               steer_units.in_set(SimSet::Steering),
               integrate_units.in_set(SimSet::Integration),
           ))
           .add_systems(Update, (spawn_units, update_selection_materials));
    }
}
