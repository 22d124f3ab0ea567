use bevy::prelude::*;

use super::components::{Selected, Unit};
use super::resources::UnitAssets;

/// Swaps unit materials when selection changes
///
/// Only touches units whose `Selected` marker was added or removed this frame.
pub(super) fn update_selection_materials(
    q_added: Query<Entity, (With<Unit>, Added<Selected>)>,
    mut removed_selected: RemovedComponents<Selected>,
    mut q_materials: Query<&mut MeshMaterial3d<StandardMaterial>, With<Unit>>,
    assets: Option<Res<UnitAssets>>,
) {
    let Some(assets) = assets else { return };

    // Removed first, so a unit deselected and reselected in one frame ends highlighted
    for entity in removed_selected.read() {
        if let Ok(mut material) = q_materials.get_mut(entity) {
            material.0 = assets.material.clone();
        }
    }
    for entity in q_added.iter() {
        if let Ok(mut material) = q_materials.get_mut(entity) {
            material.0 = assets.selected_material.clone();
        }
    }
}
