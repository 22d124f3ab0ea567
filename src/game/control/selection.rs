use bevy::prelude::*;
use crate::game::config::GameConfig;
use crate::game::unit::{Selected, Unit};
use super::resources::{DragState, SelectionBox};

/// Setup the selection box UI element
pub fn setup_selection_box(mut commands: Commands) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            border: UiRect::all(Val::Px(1.0)),
            ..default()
        },
        BorderColor::from(Color::srgb(0.3, 0.8, 1.0)),
        BackgroundColor(Color::srgba(0.3, 0.8, 1.0, 0.08)),
        Visibility::Hidden,
        SelectionBox,
    ));
}

/// Unit nearest the ray origin among those within `radius` of the ray.
pub fn pick_unit_along_ray(
    origin: Vec3,
    direction: Vec3,
    radius: f32,
    units: impl IntoIterator<Item = (Entity, Vec3)>,
) -> Option<Entity> {
    let mut closest: Option<(Entity, f32)> = None;
    for (entity, position) in units {
        let projection = (position - origin).dot(direction);
        if projection < 0.0 {
            continue;
        }
        let closest_point = origin + direction * projection;
        if closest_point.distance_squared(position) >= radius * radius {
            continue;
        }
        if closest.is_none_or(|(_, best)| projection < best) {
            closest = Some((entity, projection));
        }
    }
    closest.map(|(entity, _)| entity)
}

pub fn in_screen_rect(point: Vec2, min: Vec2, max: Vec2) -> bool {
    point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
}

/// Handle unit selection via mouse drag or click.
///
/// Without `append` the current selection is replaced. With `append` a click
/// toggles the clicked unit and a box adds to the selection.
pub fn handle_selection(
    commands: &mut Commands,
    mouse_button: &ButtonInput<MouseButton>,
    append: bool,
    cursor_position: Vec2,
    camera: &Camera,
    camera_transform: &GlobalTransform,
    q_units: &Query<(Entity, &GlobalTransform, Has<Selected>), With<Unit>>,
    drag_state: &mut DragState,
    q_selection_box: &mut Query<(&mut Node, &mut Visibility), With<SelectionBox>>,
    config: &GameConfig,
) {
    if mouse_button.just_pressed(MouseButton::Left) {
        drag_state.start = Some(cursor_position);
        drag_state.current = Some(cursor_position);
    }

    if mouse_button.pressed(MouseButton::Left) {
        if let Some(start) = drag_state.start {
            drag_state.current = Some(cursor_position);

            if let Ok((mut node, mut visibility)) = q_selection_box.single_mut() {
                let min = start.min(cursor_position);
                let size = start.max(cursor_position) - min;

                node.left = Val::Px(min.x);
                node.top = Val::Px(min.y);
                node.width = Val::Px(size.x);
                node.height = Val::Px(size.y);
                *visibility = Visibility::Visible;
            }
        }
    }

    if !mouse_button.just_released(MouseButton::Left) {
        return;
    }
    let Some(start) = drag_state.start.take() else { return };
    drag_state.current = None;

    if let Ok((_, mut visibility)) = q_selection_box.single_mut() {
        *visibility = Visibility::Hidden;
    }

    let min = start.min(cursor_position);
    let max = start.max(cursor_position);
    let is_click = (max - min).length() < config.selection_drag_threshold;

    if !append {
        for (entity, _, selected) in q_units.iter() {
            if selected {
                commands.entity(entity).remove::<Selected>();
            }
        }
    }

    if is_click {
        let Ok(ray) = camera.viewport_to_world(camera_transform, cursor_position) else { return };
        let units = q_units.iter().map(|(entity, transform, _)| (entity, transform.translation()));
        let Some(hit) = pick_unit_along_ray(ray.origin, *ray.direction, config.selection_click_radius, units)
        else {
            return;
        };

        let toggle_off = append && q_units.get(hit).is_ok_and(|(_, _, selected)| selected);
        if toggle_off {
            commands.entity(hit).remove::<Selected>();
        } else {
            commands.entity(hit).insert(Selected);
        }
    } else {
        let mut count = 0;
        for (entity, transform, _) in q_units.iter() {
            let Ok(screen_pos) = camera.world_to_viewport(camera_transform, transform.translation()) else {
                continue;
            };
            if in_screen_rect(screen_pos, min, max) {
                commands.entity(entity).insert(Selected);
                count += 1;
            }
        }
        debug!("Box selection picked {} units", count);
    }
}
