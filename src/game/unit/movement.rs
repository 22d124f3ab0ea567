use bevy::prelude::*;
use flowfield_macros::profile;
use crate::game::config::InitialConfig;
use crate::game::navigation::{MapFlowField, MoveOrder};
use crate::game::simulation::SimTick;
use crate::profile_log;
use super::components::{FollowingFlowField, Unit, Velocity};

/// Ground-plane velocity for a flow field heading. A zero heading means no
/// guidance, so the unit holds position.
pub fn desired_velocity(direction: Vec2, speed: f32) -> Vec3 {
    Vec3::new(direction.x, 0.0, direction.y) * speed
}

/// Hands the shared flow field to the units of the newest move order.
///
/// Units from earlier orders lose guidance, since the field now points at the
/// new target. Entities that are not (or no longer) units are ignored.
pub fn assign_move_orders(
    mut commands: Commands,
    mut orders: MessageReader<MoveOrder>,
    q_units: Query<Has<FollowingFlowField>, With<Unit>>,
    q_following: Query<Entity, (With<Unit>, With<FollowingFlowField>)>,
) {
    let Some(order) = orders.read().last() else { return };

    for entity in q_following.iter() {
        if !order.units.contains(&entity) {
            commands.entity(entity).remove::<FollowingFlowField>();
        }
    }
    for &entity in &order.units {
        if matches!(q_units.get(entity), Ok(false)) {
            commands.entity(entity).insert(FollowingFlowField);
        }
    }
}

/// Reads each ordered unit's heading from the map flow field
#[profile(2)]
pub fn steer_units(
    mut query: Query<(&Transform, &mut Velocity, Has<FollowingFlowField>), With<Unit>>,
    map_flow_field: Option<Res<MapFlowField>>,
    config: Res<InitialConfig>,
    #[allow(unused_variables)] tick: Res<SimTick>,
) {
    let Some(map_flow_field) = map_flow_field else {
        for (_, mut velocity, _) in query.iter_mut() {
            velocity.0 = Vec3::ZERO;
        }
        return;
    };

    for (transform, mut velocity, following) in query.iter_mut() {
        velocity.0 = if following {
            let direction = map_flow_field.0.direction_at_world_pos(transform.translation);
            desired_velocity(direction, config.unit_speed)
        } else {
            Vec3::ZERO
        };
    }

    profile_log!(
        tick,
        "[STEERING] {} units moving",
        query.iter().filter(|(_, velocity, _)| velocity.0 != Vec3::ZERO).count()
    );
}

/// Applies velocity to position and turns units to face their heading
pub fn integrate_units(
    mut query: Query<(&mut Transform, &Velocity), With<Unit>>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();
    for (mut transform, velocity) in query.iter_mut() {
        if velocity.0 == Vec3::ZERO {
            continue;
        }
        transform.translation += velocity.0 * delta;
        let heading = Vec3::new(velocity.0.x, 0.0, velocity.0.z);
        let position = transform.translation;
        transform.look_at(position + heading, Vec3::Y);
    }
}
