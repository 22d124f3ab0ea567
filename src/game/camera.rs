use bevy::prelude::*;
use bevy::input::mouse::MouseWheel;
use crate::game::config::{GameConfig, GameConfigHandle};

pub struct RtsCameraPlugin;

impl Plugin for RtsCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
           .add_systems(Update, move_camera);
    }
}

#[derive(Component)]
pub struct RtsCamera;

fn spawn_camera(mut commands: Commands) {
    // High up, looking down at an angle
    let translation = Vec3::new(20.0, 30.0, 50.0);
    let look_at = Vec3::new(20.0, 0.0, 20.0);

    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(translation)
            .looking_at(look_at, Vec3::Y),
        RtsCamera,
    ));
}

fn move_camera(
    mut query: Query<&mut Transform, With<RtsCamera>>,
    keys: Res<ButtonInput<KeyCode>>,
    mut scroll_evr: MessageReader<MouseWheel>,
    time: Res<Time>,
    config_handle: Option<Res<GameConfigHandle>>,
    game_configs: Res<Assets<GameConfig>>,
) {
    let Ok(mut transform) = query.single_mut() else { return };
    let Some(config) = config_handle.and_then(|h| game_configs.get(&h.0)) else { return };

    let mut velocity = Vec3::ZERO;
    if keys.pressed(config.key_camera_forward) {
        velocity.z -= 1.0;
    }
    if keys.pressed(config.key_camera_backward) {
        velocity.z += 1.0;
    }
    if keys.pressed(config.key_camera_left) {
        velocity.x -= 1.0;
    }
    if keys.pressed(config.key_camera_right) {
        velocity.x += 1.0;
    }

    // Pan in the world XZ plane
    let velocity = velocity.normalize_or_zero();
    transform.translation += velocity * config.camera_speed * time.delta_secs();

    for ev in scroll_evr.read() {
        let step = *transform.forward() * ev.y * config.camera_zoom_speed * time.delta_secs();
        transform.translation = zoom_translation(
            transform.translation,
            step,
            config.camera_min_height,
            config.camera_max_height,
        );
    }
}

/// Moves `translation` by `step`, shortening the step along its own direction
/// so the height ends up within `[min_height, max_height]`.
fn zoom_translation(translation: Vec3, step: Vec3, min_height: f32, max_height: f32) -> Vec3 {
    let target = translation + step;
    if step.y.abs() <= 0.001 {
        return target;
    }

    // max/min instead of clamp: a misconfigured min > max must not panic
    let clamped_y = target.y.max(min_height).min(max_height);
    if clamped_y == target.y {
        return target;
    }
    let ratio = ((clamped_y - translation.y) / step.y).clamp(0.0, 1.0);
    translation + step * ratio
}
