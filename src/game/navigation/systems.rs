use bevy::prelude::*;
use flowfield_macros::profile;
use crate::game::config::InitialConfig;
use crate::game::simulation::SimTick;
use crate::game::structures::{FlowField, FlowFieldError};
use super::resources::{MapFlowField, MoveOrder, NavigationStatus};

/// Generation slower than this gets a warning; it stalls a whole fixed tick.
const SLOW_GENERATION_MS: u128 = 16;

/// Builds the map flow field from the initial config, marking blocked cells.
///
/// The grid is anchored at the world origin, matching `world_to_grid`, so the
/// ground, walls and debug arrows line up with the cells units actually read.
/// Blocked cells outside the grid are skipped with a warning rather than
/// failing the whole map.
pub fn build_map_flow_field(config: &InitialConfig) -> Result<FlowField, FlowFieldError> {
    let mut flow_field = FlowField::new(
        config.grid_width,
        config.grid_height,
        config.cell_size,
        Vec3::ZERO,
    )?;

    for &(x, y) in &config.blocked_cells {
        if let Err(e) = flow_field.set_impassable(x, y) {
            warn!("Skipping blocked cell: {}", e);
        }
    }

    Ok(flow_field)
}

pub fn init_flow_field(mut commands: Commands, config: Option<Res<InitialConfig>>) {
    let Some(config) = config else {
        error!("InitialConfig missing, map flow field not created");
        return;
    };

    match build_map_flow_field(&config) {
        Ok(flow_field) => {
            info!(
                "Map flow field: {}x{} cells of {} world units, {} blocked",
                flow_field.width(),
                flow_field.height(),
                flow_field.cell_size(),
                flow_field.cells().iter().filter(|c| !c.is_passable()).count()
            );
            commands.insert_resource(MapFlowField(flow_field));
        }
        Err(e) => error!("Failed to create map flow field: {}", e),
    }
}

/// Regenerates the map flow field for the newest move order of this tick.
///
/// Earlier orders in the same tick are superseded, since every generation
/// rebuilds the whole field anyway.
#[profile(2)]
pub fn process_move_orders(
    mut orders: MessageReader<MoveOrder>,
    map_flow_field: Option<ResMut<MapFlowField>>,
    mut status: ResMut<NavigationStatus>,
    #[allow(unused_variables)] tick: Res<SimTick>,
) {
    let order_count = orders.len();
    let Some(order) = orders.read().last().cloned() else { return };

    let Some(mut map_flow_field) = map_flow_field else {
        warn!("Move order to {:?} ignored, no map flow field", order.target);
        return;
    };

    if order_count > 1 {
        debug!("{} move orders this tick, keeping the newest", order_count);
    }

    let start_time = std::time::Instant::now();
    let target_cell = map_flow_field.0.generate(order.target);
    let duration = start_time.elapsed();

    status.target = Some(order.target);
    status.target_cell = target_cell;
    status.generations += 1;

    match target_cell {
        Some(cell) => info!(
            "{} units routed toward {:?} (cell {})",
            order.units.len(),
            order.target,
            cell
        ),
        None => info!("Move order target {:?} is off the map, units hold", order.target),
    }

    if duration.as_millis() > SLOW_GENERATION_MS {
        warn!(
            "[NAVIGATION] Slow flow field generation: {:?} for {} cells",
            duration,
            map_flow_field.0.cells().len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_config() -> InitialConfig {
        InitialConfig {
            grid_width: 6,
            grid_height: 4,
            cell_size: 2.0,
            blocked_cells: vec![(3, 1), (9, 9)],
            ..default()
        }
    }

    #[test]
    fn test_map_grid_lines_up_with_world_lookups() {
        let mut flow_field = build_map_flow_field(&map_config()).unwrap();
        assert_eq!(flow_field.origin(), Vec3::ZERO);

        for cell in flow_field.cells() {
            let center = cell.world_position() + Vec3::new(1.0, 0.0, 1.0);
            assert_eq!(flow_field.world_to_grid(center), cell.grid_position());
        }

        // The wall cube drawn for (3, 1) covers the cell navigation treats as blocked
        let wall = flow_field.world_to_grid(Vec3::new(3.5 * 2.0, 0.5, 1.5 * 2.0));
        assert_eq!(wall, IVec2::new(3, 1));
        assert!(!flow_field.cell(wall.x, wall.y).unwrap().is_passable());

        let target = flow_field.cell(4, 2).unwrap().world_position();
        assert_eq!(flow_field.generate(target), Some(IVec2::new(4, 2)));
    }

    #[test]
    fn test_out_of_range_blocked_cell_is_skipped() {
        let flow_field = build_map_flow_field(&map_config()).unwrap();

        assert_eq!(flow_field.cells().iter().filter(|c| !c.is_passable()).count(), 1);
    }

    #[test]
    fn test_invalid_geometry_is_an_error() {
        let config = InitialConfig { grid_width: 0, ..map_config() };

        assert_eq!(
            build_map_flow_field(&config).unwrap_err(),
            FlowFieldError::InvalidDimensions { width: 0, height: 4 }
        );
    }
}
