use bevy::prelude::*;

mod camera;
mod control;
pub mod config;
pub mod navigation;
pub mod simulation;
pub mod structures;
pub mod unit;

use camera::RtsCameraPlugin;
use config::{ConfigSet, GameConfigPlugin, InitialConfig};
use control::ControlPlugin;
use navigation::{NavigationDebugPlugin, NavigationPlugin};
use simulation::SimulationPlugin;
use unit::UnitPlugin;

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            GameConfigPlugin,
            SimulationPlugin,
            NavigationPlugin,
            NavigationDebugPlugin,
            UnitPlugin,
            ControlPlugin,
            RtsCameraPlugin,
        ))
        .add_systems(Startup, setup_game.after(ConfigSet));
    }
}

fn setup_game(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<InitialConfig>,
) {
    info!("Game setup started");

    // Ground plane covering the flow field grid
    let size_x = config.grid_width as f32 * config.cell_size;
    let size_z = config.grid_height as f32 * config.cell_size;
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(size_x, size_z))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
        Transform::from_xyz(size_x / 2.0, 0.0, size_z / 2.0),
    ));

    // Blocked cells
    let block_mesh = meshes.add(Cuboid::new(config.cell_size, 1.0, config.cell_size));
    let block_material = materials.add(Color::srgb(0.5, 0.5, 0.5));
    for &(x, y) in &config.blocked_cells {
        let center = Vec3::new((x as f32 + 0.5) * config.cell_size, 0.5, (y as f32 + 0.5) * config.cell_size);
        commands.spawn((
            Mesh3d(block_mesh.clone()),
            MeshMaterial3d(block_material.clone()),
            Transform::from_translation(center),
        ));
    }

    // Light
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(8.0, 16.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
