/// Debug visualization for the map flow field.
///
/// Reached cells get a cost-colored marker (green near the target, red far
/// away) and an arrow along their direction. Read-only: nothing here feeds
/// back into the field.

use bevy::prelude::*;
use crate::game::config::{GameConfig, GameConfigHandle};
use super::resources::{DebugConfig, MapFlowField, NavigationStatus};

const DEBUG_HEIGHT: f32 = 0.2;

/// Toggle the flow field view with keyboard
pub fn toggle_debug(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug_config: ResMut<DebugConfig>,
    config_handle: Option<Res<GameConfigHandle>>,
    game_configs: Res<Assets<GameConfig>>,
    map_flow_field: Option<Res<MapFlowField>>,
    status: Res<NavigationStatus>,
) {
    let Some(config) = config_handle.and_then(|h| game_configs.get(&h.0)) else { return };

    if keyboard.just_pressed(config.key_debug_flow) {
        debug_config.show_flow_field = !debug_config.show_flow_field;
        if debug_config.show_flow_field {
            info!("Flow field debug ENABLED");
            if let Some(map) = map_flow_field {
                info!("  Flow field size: {}x{}", map.0.width(), map.0.height());
                info!("  Reached cells: {}", map.0.reached_count());
            }
            info!("  Target cell: {:?}", status.target_cell);
        } else {
            info!("Flow field debug disabled");
        }
    }
}

/// Color for an integrated cost relative to the most expensive reached cell.
pub fn cost_color(best_cost: u32, max_cost: u32) -> Color {
    let t = if max_cost == 0 {
        0.0
    } else {
        (best_cost as f32 / max_cost as f32).clamp(0.0, 1.0)
    };
    Color::srgb(t, 1.0 - t, 0.2)
}

pub fn draw_flow_field_gizmos(
    map_flow_field: Option<Res<MapFlowField>>,
    debug_config: Res<DebugConfig>,
    config_handle: Option<Res<GameConfigHandle>>,
    game_configs: Res<Assets<GameConfig>>,
    mut gizmos: Gizmos,
) {
    if !debug_config.show_flow_field {
        return;
    }
    let Some(map_flow_field) = map_flow_field else { return };
    let flow_field = &map_flow_field.0;

    let arrow_scale = config_handle
        .and_then(|h| game_configs.get(&h.0))
        .map_or(0.4, |c| c.debug_arrow_scale);
    let cell_size = flow_field.cell_size();
    let half_cell = Vec3::new(cell_size / 2.0, DEBUG_HEIGHT, cell_size / 2.0);

    let max_cost = flow_field.cost_labels().map(|(_, cost)| cost).max().unwrap_or(0);

    for (world_pos, best_cost) in flow_field.cost_labels() {
        gizmos.sphere(world_pos + half_cell, cell_size * 0.1, cost_color(best_cost, max_cost));
    }

    for cell in flow_field.cells() {
        let dir = cell.direction();
        if dir == Vec2::ZERO {
            continue;
        }
        let start = cell.world_position() + half_cell;
        let end = start + Vec3::new(dir.x, 0.0, dir.y) * cell_size * arrow_scale;
        gizmos.arrow(start, end, Color::srgb(0.5, 0.5, 1.0));
    }

    if let Some(target) = flow_field.target_cell().and_then(|t| flow_field.cell(t.x, t.y)) {
        gizmos.sphere(target.world_position() + half_cell, cell_size * 0.4, Color::srgb(1.0, 1.0, 0.0));
    }
}
