use bevy::prelude::*;

/// Screen-space drag of the left mouse button
#[derive(Resource, Default, Debug)]
pub struct DragState {
    pub start: Option<Vec2>,
    pub current: Option<Vec2>,
}

/// Marker component for the selection box UI element
#[derive(Component)]
pub struct SelectionBox;
