//! Map-wide flow field navigation.
//!
//! Owns the [`MapFlowField`] resource, turns [`MoveOrder`] messages into a
//! regenerated field, and exposes [`NavigationStatus`] so the rest of the game
//! can tell "no path" apart from "not ordered yet".

mod resources;
mod systems;
pub mod debug;

pub use resources::{MapFlowField, MoveOrder, NavigationStatus, DebugConfig};
pub use systems::{build_map_flow_field, init_flow_field, process_move_orders};

use bevy::prelude::*;
use crate::game::config::ConfigSet;
use crate::game::simulation::SimSet;

pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<MoveOrder>();
        app.init_resource::<NavigationStatus>();
        app.add_systems(Startup, init_flow_field.after(ConfigSet));
        app.add_systems(FixedUpdate, process_move_orders.in_set(SimSet::Orders));
    }
}

/// Flow field gizmos. Needs the render/gizmo stack, so it is kept apart from
/// [`NavigationPlugin`] for headless use.
pub struct NavigationDebugPlugin;

impl Plugin for NavigationDebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugConfig>()
           .add_systems(Update, (debug::toggle_debug, debug::draw_flow_field_gizmos).chain());
    }
}
