use bevy::prelude::*;
use crate::game::config::InitialConfig;
use super::components::{Unit, Velocity};
use super::resources::{UnitAssets, UnitSpawner};

/// Capsule3d::default() is 2 units tall; keep it standing on the ground.
const UNIT_HALF_HEIGHT: f32 = 1.0;

/// Offset of the `index`-th spawned unit: rows of `grid_width` units along X,
/// rows stacked along Z.
pub fn spawn_offset(index: usize, grid_width: usize, spacing: f32) -> Vec3 {
    let grid_width = grid_width.max(1);
    let row = index / grid_width;
    let col = index % grid_width;
    Vec3::new(col as f32 * spacing, 0.0, row as f32 * spacing)
}

/// Spawns one unit per timer tick until `max_unit_count` is reached
pub(super) fn spawn_units(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<InitialConfig>,
    assets: Option<Res<UnitAssets>>,
    mut spawner: ResMut<UnitSpawner>,
) {
    let Some(assets) = assets else { return };
    if spawner.spawned >= config.max_unit_count {
        return;
    }

    spawner.timer.tick(time.delta());
    if !spawner.timer.just_finished() {
        return;
    }

    let offset = spawn_offset(spawner.spawned, config.spawn_grid_width, config.spawn_spacing);
    let position = config.spawn_origin + offset + Vec3::Y * UNIT_HALF_HEIGHT;

    commands.spawn((
        Unit,
        Velocity::default(),
        Mesh3d(assets.mesh.clone()),
        MeshMaterial3d(assets.material.clone()),
        Transform::from_translation(position),
    ));
    spawner.spawned += 1;

    if spawner.spawned == config.max_unit_count {
        info!("Spawned all {} units", spawner.spawned);
    }
}
