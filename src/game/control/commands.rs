use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use crate::game::camera::RtsCamera;
use crate::game::config::{GameConfig, GameConfigHandle};
use crate::game::navigation::MoveOrder;
use crate::game::unit::{Selected, Unit};
use super::resources::{DragState, SelectionBox};
use super::selection::handle_selection;

/// Left button selects units, right click orders the selection to the ground point
pub fn handle_input(
    mut commands: Commands,
    mouse_button: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    q_camera: Query<(&Camera, &GlobalTransform), With<RtsCamera>>,
    q_units: Query<(Entity, &GlobalTransform, Has<Selected>), With<Unit>>,
    mut drag_state: ResMut<DragState>,
    mut q_selection_box: Query<(&mut Node, &mut Visibility), With<SelectionBox>>,
    mut move_orders: MessageWriter<MoveOrder>,
    config_handle: Option<Res<GameConfigHandle>>,
    game_configs: Res<Assets<GameConfig>>,
) {
    let Some((camera, camera_transform)) = q_camera.iter().next() else { return };
    let Some(window) = q_window.iter().next() else { return };
    let Some(cursor_position) = window.cursor_position() else { return };
    let Some(config) = config_handle.and_then(|h| game_configs.get(&h.0)) else { return };

    let append = keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    handle_selection(
        &mut commands,
        &mouse_button,
        append,
        cursor_position,
        camera,
        camera_transform,
        &q_units,
        &mut drag_state,
        &mut q_selection_box,
        config,
    );

    if mouse_button.just_pressed(MouseButton::Right) {
        issue_move_order(cursor_position, camera, camera_transform, &q_units, &mut move_orders);
    }
}

/// Point where a ray hits the ground plane (y = 0), if it does so in front of
/// the ray origin.
pub fn ground_intersection(origin: Vec3, direction: Vec3) -> Option<Vec3> {
    let denom = direction.dot(Vec3::Y);
    if denom.abs() <= 0.0001 {
        return None;
    }
    let t = -origin.y / denom;
    (t >= 0.0).then(|| origin + direction * t)
}

/// Order for the selected units, or `None` when nothing is selected.
pub fn selection_move_order(target: Vec3, selected: impl IntoIterator<Item = Entity>) -> Option<MoveOrder> {
    let units: Vec<Entity> = selected.into_iter().collect();
    (!units.is_empty()).then_some(MoveOrder { target, units })
}

fn issue_move_order(
    cursor_position: Vec2,
    camera: &Camera,
    camera_transform: &GlobalTransform,
    q_units: &Query<(Entity, &GlobalTransform, Has<Selected>), With<Unit>>,
    move_orders: &mut MessageWriter<MoveOrder>,
) {
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor_position) else { return };
    let Some(target) = ground_intersection(ray.origin, *ray.direction) else {
        debug!("Right click at {:?} missed the ground", cursor_position);
        return;
    };

    let selected = q_units
        .iter()
        .filter(|(_, _, selected)| *selected)
        .map(|(entity, _, _)| entity);
    match selection_move_order(target, selected) {
        Some(order) => {
            move_orders.write(order);
        }
        None => debug!("Right click at {:?} with no units selected", target),
    }
}
