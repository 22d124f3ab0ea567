use bevy::prelude::*;
use crate::game::config::InitialConfig;

/// Shared mesh and material handles for unit rendering
#[derive(Resource)]
pub struct UnitAssets {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
    pub selected_material: Handle<StandardMaterial>,
}

/// Timer-driven spawner that lays units out on a grid
#[derive(Resource, Debug)]
pub struct UnitSpawner {
    pub timer: Timer,
    pub spawned: usize,
}

impl UnitSpawner {
    pub fn new(interval_secs: f32) -> Self {
        Self {
            timer: Timer::from_seconds(interval_secs.max(0.001), TimerMode::Repeating),
            spawned: 0,
        }
    }
}

/// Sets up shared unit rendering resources and the spawner
pub(super) fn setup_unit_resources(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<InitialConfig>,
) {
    commands.insert_resource(UnitAssets {
        mesh: meshes.add(Capsule3d::default()),
        material: materials.add(Color::srgb(0.8, 0.7, 0.6)),
        selected_material: materials.add(Color::srgb(0.3, 0.8, 1.0)),
    });
    commands.insert_resource(UnitSpawner::new(config.spawn_interval));
}
