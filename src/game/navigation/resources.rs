use bevy::prelude::*;
use crate::game::structures::FlowField;

/// Flow field covering the whole map. Absent if the configured grid was rejected.
#[derive(Resource, Clone, Debug)]
pub struct MapFlowField(pub FlowField);

/// Order to route a group of units toward a ground position.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct MoveOrder {
    pub target: Vec3,
    /// Units that follow the regenerated field; all others hold.
    pub units: Vec<Entity>,
}

/// Outcome of the most recent move order.
#[derive(Resource, Default, Debug, Clone, PartialEq)]
pub struct NavigationStatus {
    /// World position of the last order.
    pub target: Option<Vec3>,
    /// Grid cell of the last order, `None` if it fell outside the grid.
    pub target_cell: Option<IVec2>,
    /// Number of times the field has been regenerated.
    pub generations: u64,
}

impl NavigationStatus {
    /// True when the last order produced usable guidance.
    pub fn has_path(&self) -> bool {
        self.target_cell.is_some()
    }
}

#[derive(Resource, Default, Debug)]
pub struct DebugConfig {
    pub show_flow_field: bool,
}
