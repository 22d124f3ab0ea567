/// Shared data structures used across multiple game modules
///
/// The flow field is owned by navigation but read by unit steering
/// and the debug view.

mod flow_field;

pub use flow_field::{
    FlowField, FlowFieldCell, FlowFieldError, DEFAULT_COST, IMPASSABLE_COST, NEIGHBORS_4,
    NEIGHBORS_8, UNREACHED,
};
