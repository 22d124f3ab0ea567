use bevy::prelude::*;
use bevy_common_assets::ron::RonAssetPlugin;
use serde::{Deserialize, Serialize};

pub const INITIAL_CONFIG_PATH: &str = "assets/initial_config.ron";

/// Static configuration loaded once at startup. Grid geometry and spawn layout
/// are fixed for the lifetime of the app; changing them would mean rebuilding
/// the flow field.
#[derive(Resource, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct InitialConfig {
    pub tick_rate: f64,

    // Flow field grid, anchored at the world origin on the y = 0 plane
    pub grid_width: usize,
    pub grid_height: usize,
    pub cell_size: f32,
    /// Cells marked impassable when the map flow field is built.
    pub blocked_cells: Vec<(i32, i32)>,

    // Units
    pub unit_speed: f32,
    pub spawn_interval: f32,
    pub max_unit_count: usize,
    pub spawn_grid_width: usize,
    pub spawn_spacing: f32,
    pub spawn_origin: Vec3,
}

impl Default for InitialConfig {
    fn default() -> Self {
        Self {
            tick_rate: 30.0,
            grid_width: 100,
            grid_height: 100,
            cell_size: 2.0,
            blocked_cells: Vec::new(),
            unit_speed: 5.0,
            spawn_interval: 0.05,
            max_unit_count: 1000,
            spawn_grid_width: 100,
            spawn_spacing: 2.0,
            spawn_origin: Vec3::new(1.0, 0.0, 1.0),
        }
    }
}

/// Runtime configuration that can be hot-reloaded during gameplay
/// (controls, camera, debug view).
#[derive(Deserialize, Serialize, Asset, TypePath, Clone, Debug)]
pub struct GameConfig {
    pub key_camera_forward: KeyCode,
    pub key_camera_backward: KeyCode,
    pub key_camera_left: KeyCode,
    pub key_camera_right: KeyCode,
    pub key_debug_flow: KeyCode,

    /// Max distance from the cursor ray for a click to pick a unit.
    pub selection_click_radius: f32,
    /// Screen-space drag distance (pixels) below which a release counts as a click.
    pub selection_drag_threshold: f32,

    pub camera_speed: f32,
    pub camera_zoom_speed: f32,
    /// Scroll zoom keeps the camera height within these bounds.
    pub camera_min_height: f32,
    pub camera_max_height: f32,

    /// Arrow length in the flow field debug view, as a fraction of a cell.
    pub debug_arrow_scale: f32,
}

#[derive(Resource)]
pub struct GameConfigHandle(pub Handle<GameConfig>);

/// Systems that must run before anything reads [`InitialConfig`].
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct ConfigSet;

pub struct GameConfigPlugin;

impl Plugin for GameConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RonAssetPlugin::<GameConfig>::new(&["game_config.ron"]))
           .add_systems(
               Startup,
               (load_initial_config, setup_runtime_config).chain().in_set(ConfigSet),
           );
    }
}

pub fn parse_initial_config(contents: &str) -> Result<InitialConfig, ron::error::SpannedError> {
    ron::from_str::<InitialConfig>(contents)
}

/// Load static initial configuration synchronously at startup.
/// A resource inserted before startup (tests, tools) is left untouched.
fn load_initial_config(mut commands: Commands, existing: Option<Res<InitialConfig>>) {
    if existing.is_some() {
        return;
    }

    match std::fs::read_to_string(INITIAL_CONFIG_PATH) {
        Ok(contents) => match parse_initial_config(&contents) {
            Ok(config) => {
                info!("Loaded initial config from {}", INITIAL_CONFIG_PATH);
                commands.insert_resource(config);
            }
            Err(e) => {
                error!("Failed to parse initial config: {}", e);
                error!("Using default InitialConfig");
                commands.insert_resource(InitialConfig::default());
            }
        },
        Err(e) => {
            error!("Failed to read {}: {}", INITIAL_CONFIG_PATH, e);
            error!("Using default InitialConfig");
            commands.insert_resource(InitialConfig::default());
        }
    }
}

/// Load runtime configuration asynchronously (can be hot-reloaded).
fn setup_runtime_config(mut commands: Commands, asset_server: Res<AssetServer>) {
    let handle = asset_server.load("game_config.ron");
    commands.insert_resource(GameConfigHandle(handle));
}
