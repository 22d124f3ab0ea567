use bevy::prelude::*;

mod resources;
mod selection;
mod commands;

use resources::DragState;
use selection::setup_selection_box;
use commands::handle_input;

pub struct ControlPlugin;

impl Plugin for ControlPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DragState>()
           .add_systems(Startup, setup_selection_box)
           .add_systems(Update, handle_input);
    }
}
