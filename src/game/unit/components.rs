use bevy::prelude::*;

/// Marks an entity as a unit in the game
#[derive(Component)]
pub struct Unit;

/// Marks units picked by the player's selection
#[derive(Component, Debug)]
pub struct Selected;

/// Units named by the newest move order. Only these read the shared map
/// flow field; everything else holds position.
#[derive(Component, Debug)]
pub struct FollowingFlowField;

/// Desired ground velocity in world units per second, set by steering
#[derive(Component, Default, Debug, Clone, Copy, PartialEq)]
pub struct Velocity(pub Vec3);
