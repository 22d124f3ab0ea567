use super::*;

/// Reference integration: plain Bellman-Ford sweeps until nothing changes.
fn reference_costs(ff: &FlowField, target: IVec2) -> Vec<u32> {
    let mut costs = vec![UNREACHED; ff.width() * ff.height()];
    costs[target.y as usize * ff.width() + target.x as usize] = 0;

    let mut changed = true;
    while changed {
        changed = false;
        for cell in ff.cells() {
            let p = cell.grid_position();
            let idx = p.y as usize * ff.width() + p.x as usize;
            if costs[idx] == UNREACHED {
                continue;
            }
            for offset in NEIGHBORS_4 {
                let n = p + offset;
                let Some(neighbor) = ff.cell(n.x, n.y) else { continue };
                if !neighbor.is_passable() {
                    continue;
                }
                let n_idx = n.y as usize * ff.width() + n.x as usize;
                let candidate = costs[idx] + neighbor.cost() as u32;
                if candidate < costs[n_idx] {
                    costs[n_idx] = candidate;
                    changed = true;
                }
            }
        }
    }
    costs
}

fn cell_center(ff: &FlowField, x: i32, y: i32) -> Vec3 {
    let half = ff.cell_size() / 2.0;
    Vec3::new(x as f32 * ff.cell_size() + half, 0.0, y as f32 * ff.cell_size() + half)
}

#[test]
fn test_new_field_is_unreached() {
    let ff = FlowField::new(4, 3, 1.5, Vec3::new(10.0, 2.0, -4.0)).unwrap();

    assert_eq!(ff.cells().len(), 12);
    for cell in ff.cells() {
        assert_eq!(cell.best_cost(), UNREACHED);
        assert_eq!(cell.direction(), Vec2::ZERO);
        assert_eq!(cell.cost(), DEFAULT_COST);
    }
    assert_eq!(ff.target_cell(), None);
    assert_eq!(ff.origin(), Vec3::new(10.0, 2.0, -4.0));

    let cell = ff.cell(3, 2).unwrap();
    assert_eq!(cell.grid_position(), IVec2::new(3, 2));
    assert_eq!(cell.world_position(), Vec3::new(14.5, 2.0, -1.0));
}

#[test]
fn test_new_rejects_degenerate_geometry() {
    assert_eq!(
        FlowField::new(0, 5, 1.0, Vec3::ZERO).unwrap_err(),
        FlowFieldError::InvalidDimensions { width: 0, height: 5 }
    );
    assert_eq!(
        FlowField::new(5, 0, 1.0, Vec3::ZERO).unwrap_err(),
        FlowFieldError::InvalidDimensions { width: 5, height: 0 }
    );
    assert_eq!(
        FlowField::new(5, 5, 0.0, Vec3::ZERO).unwrap_err(),
        FlowFieldError::InvalidCellSize(0.0)
    );
    assert!(matches!(
        FlowField::new(5, 5, -2.0, Vec3::ZERO),
        Err(FlowFieldError::InvalidCellSize(_))
    ));
    assert!(matches!(
        FlowField::new(5, 5, f32::NAN, Vec3::ZERO),
        Err(FlowFieldError::InvalidCellSize(_))
    ));
}

#[test]
fn test_world_to_grid_floors_on_ground_plane() {
    let ff = FlowField::new(10, 10, 2.0, Vec3::ZERO).unwrap();

    assert_eq!(ff.world_to_grid(Vec3::new(0.0, 0.0, 0.0)), IVec2::new(0, 0));
    assert_eq!(ff.world_to_grid(Vec3::new(3.9, 100.0, 4.0)), IVec2::new(1, 2));
    // Floor, not truncation toward zero
    assert_eq!(ff.world_to_grid(Vec3::new(-0.5, 0.0, -3.0)), IVec2::new(-1, -2));
    assert!(!ff.is_valid_index(-1, 0));
    assert!(!ff.is_valid_index(10, 0));
    assert!(!ff.is_valid_index(0, 10));
    assert!(ff.is_valid_index(9, 9));

    let nan = ff.world_to_grid(Vec3::new(f32::NAN, 0.0, 1.0));
    assert!(!ff.is_valid_index(nan.x, nan.y));
}

#[test]
fn test_target_cell_has_zero_cost_and_no_direction() {
    let mut ff = FlowField::new(5, 5, 1.0, Vec3::ZERO).unwrap();

    let target = ff.generate(Vec3::new(2.5, 0.0, 2.5));

    assert_eq!(target, Some(IVec2::new(2, 2)));
    let cell = ff.cell(2, 2).unwrap();
    assert_eq!(cell.best_cost(), 0);
    assert_eq!(cell.direction(), Vec2::ZERO);
    assert_eq!(ff.reached_count(), 25);
}

#[test]
fn test_ten_by_ten_corner_scenario() {
    let mut ff = FlowField::new(10, 10, 2.0, Vec3::ZERO).unwrap();

    ff.generate(Vec3::ZERO);

    assert_eq!(ff.cell(9, 9).unwrap().best_cost(), 18);
    assert_eq!(ff.cell(1, 0).unwrap().direction(), Vec2::new(-1.0, 0.0));
    assert_eq!(
        ff.direction_at_world_pos(Vec3::new(2.5, 0.0, 0.5)),
        Vec2::new(-1.0, 0.0)
    );
}

#[test]
fn test_uniform_costs_are_manhattan_distance() {
    let mut ff = FlowField::new(5, 5, 1.0, Vec3::ZERO).unwrap();
    ff.generate(cell_center(&ff, 1, 3));

    for cell in ff.cells() {
        let p = cell.grid_position();
        let manhattan = ((p.x - 1).abs() + (p.y - 3).abs()) as u32;
        assert_eq!(cell.best_cost(), manhattan, "cell {}", p);
    }
}

#[test]
fn test_costs_match_reference_with_walls_and_weights() {
    let mut ff = FlowField::new(5, 5, 1.0, Vec3::ZERO).unwrap();
    ff.set_impassable(1, 1).unwrap();
    ff.set_impassable(1, 2).unwrap();
    ff.set_impassable(3, 3).unwrap();
    ff.set_cost(2, 1, 6).unwrap();
    ff.set_cost(3, 0, 3).unwrap();

    let target = ff.generate(cell_center(&ff, 0, 0)).unwrap();
    let expected = reference_costs(&ff, target);

    let actual: Vec<u32> = ff.cells().iter().map(|c| c.best_cost()).collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_wall_forces_detour() {
    let mut ff = FlowField::new(5, 5, 1.0, Vec3::ZERO).unwrap();
    for y in 0..4 {
        ff.set_impassable(2, y).unwrap();
    }

    ff.generate(cell_center(&ff, 0, 0));

    // Only gap in the wall is (2, 4)
    assert_eq!(ff.cell(2, 4).unwrap().best_cost(), 6);
    assert_eq!(ff.cell(4, 0).unwrap().best_cost(), 12);
    for y in 0..4 {
        let wall = ff.cell(2, y).unwrap();
        assert_eq!(wall.best_cost(), UNREACHED);
        assert_eq!(wall.direction(), Vec2::ZERO);
    }

    let path = ff.trace_path(IVec2::new(4, 0), 32);
    assert_eq!(path.last().copied(), Some(IVec2::new(0, 0)));
    assert!(path.iter().all(|p| ff.cell(p.x, p.y).unwrap().is_passable()));
}

#[test]
fn test_no_direction_points_into_impassable_cell() {
    let mut ff = FlowField::new(6, 6, 1.0, Vec3::ZERO).unwrap();
    ff.set_impassable(2, 2).unwrap();
    ff.set_impassable(3, 2).unwrap();
    ff.set_impassable(2, 3).unwrap();

    ff.generate(cell_center(&ff, 0, 0));

    for cell in ff.cells() {
        let step = cell.direction().round().as_ivec2();
        if step == IVec2::ZERO {
            continue;
        }
        let next = cell.grid_position() + step;
        let neighbor = ff.cell(next.x, next.y).unwrap();
        assert!(neighbor.is_passable(), "{} points into a wall", cell.grid_position());
        assert!(neighbor.best_cost() < cell.best_cost());
    }
}

#[test]
fn test_impassable_target_is_still_seeded() {
    let mut ff = FlowField::new(3, 3, 1.0, Vec3::ZERO).unwrap();
    ff.set_impassable(1, 1).unwrap();

    assert_eq!(ff.generate(cell_center(&ff, 1, 1)), Some(IVec2::new(1, 1)));

    let target = ff.cell(1, 1).unwrap();
    assert!(!target.is_passable());
    assert_eq!(target.best_cost(), 0);
    assert_eq!(target.direction(), Vec2::ZERO);

    // Orthogonal neighbors route straight into the blocked target
    assert_eq!(ff.cell(1, 0).unwrap().direction(), Vec2::new(0.0, 1.0));
    assert_eq!(ff.cell(0, 1).unwrap().direction(), Vec2::new(1.0, 0.0));
    assert_eq!(ff.cell(2, 1).unwrap().direction(), Vec2::new(-1.0, 0.0));
    assert_eq!(ff.cell(1, 2).unwrap().direction(), Vec2::new(0.0, -1.0));
    assert_eq!(ff.cell(1, 0).unwrap().best_cost(), 1);
    assert_eq!(ff.cell(0, 0).unwrap().best_cost(), 2);
    assert_eq!(ff.reached_count(), 9);
}

#[test]
fn test_enclosed_cell_stays_unreached() {
    let mut ff = FlowField::new(6, 6, 1.0, Vec3::ZERO).unwrap();
    for (x, y) in [(2, 3), (4, 3), (3, 2), (3, 4)] {
        ff.set_impassable(x, y).unwrap();
    }

    ff.generate(cell_center(&ff, 0, 0));

    let enclosed = ff.cell(3, 3).unwrap();
    assert_eq!(enclosed.best_cost(), UNREACHED);
    assert_eq!(enclosed.direction(), Vec2::ZERO);
    // Diagonal neighbors of the pocket are still reachable
    assert!(ff.cell(2, 2).unwrap().is_reached());
    assert_eq!(ff.reached_count(), 36 - 5);
}

#[test]
fn test_out_of_bounds_target_leaves_field_unreached() {
    let mut ff = FlowField::new(8, 8, 1.0, Vec3::ZERO).unwrap();
    ff.generate(Vec3::new(3.0, 0.0, 3.0));
    assert_eq!(ff.reached_count(), 64);

    let target = ff.generate(Vec3::new(-1.0, 0.0, 3.0));

    assert_eq!(target, None);
    assert_eq!(ff.target_cell(), None);
    for cell in ff.cells() {
        assert_eq!(cell.best_cost(), UNREACHED);
        assert_eq!(cell.direction(), Vec2::ZERO);
    }
    assert_eq!(ff.generate(Vec3::new(8.0, 0.0, 0.0)), None);
}

#[test]
fn test_regenerate_is_deterministic() {
    let mut ff = FlowField::new(7, 5, 1.0, Vec3::ZERO).unwrap();
    ff.set_impassable(3, 1).unwrap();
    ff.set_cost(4, 2, 4).unwrap();
    let target = Vec3::new(6.2, 0.0, 0.4);

    ff.generate(target);
    let first = ff.cells().to_vec();
    ff.generate(Vec3::new(0.5, 0.0, 4.5));
    ff.generate(target);

    assert_eq!(ff.cells(), first.as_slice());
}

#[test]
fn test_directions_are_unit_or_zero() {
    let mut ff = FlowField::new(9, 6, 0.75, Vec3::ZERO).unwrap();
    ff.set_impassable(4, 0).unwrap();
    ff.set_impassable(4, 1).unwrap();
    ff.set_impassable(4, 2).unwrap();

    ff.generate(Vec3::new(0.1, 0.0, 4.4));

    for y in -2..8 {
        for x in -2..11 {
            let pos = Vec3::new(x as f32 * 0.75 + 0.3, 0.0, y as f32 * 0.75 + 0.3);
            let dir = ff.direction_at_world_pos(pos);
            assert!(dir.is_finite());
            let len = dir.length();
            assert!(len == 0.0 || (len - 1.0).abs() < 1e-5, "length {} at {}", len, pos);
        }
    }
}

#[test]
fn test_out_of_bounds_query_is_zero() {
    let mut ff = FlowField::new(4, 4, 1.0, Vec3::ZERO).unwrap();
    ff.generate(Vec3::new(3.5, 0.0, 3.5));

    assert_eq!(ff.direction_at_world_pos(Vec3::new(-0.01, 0.0, 1.0)), Vec2::ZERO);
    assert_eq!(ff.direction_at_world_pos(Vec3::new(1.0, 0.0, 4.0)), Vec2::ZERO);
    assert_eq!(ff.direction_at_world_pos(Vec3::new(f32::INFINITY, 0.0, 1.0)), Vec2::ZERO);
}

#[test]
fn test_diagonal_tie_breaks_by_enumeration_order() {
    let mut ff = FlowField::new(3, 3, 1.0, Vec3::ZERO).unwrap();
    ff.set_impassable(1, 1).unwrap();

    ff.generate(cell_center(&ff, 1, 2));

    // (0, 1) and (2, 1) both cost 2; offset (-1, 1) is enumerated before (1, 1)
    let cell = ff.cell(1, 0).unwrap();
    assert_eq!(cell.best_cost(), 4);
    let expected = Vec2::new(-1.0, 1.0).normalize();
    assert!((cell.direction() - expected).length() < 1e-6);
}

#[test]
fn test_diagonal_neighbor_preferred_when_cheaper() {
    let mut ff = FlowField::new(3, 3, 1.0, Vec3::ZERO).unwrap();

    ff.generate(cell_center(&ff, 1, 1));

    let dir = ff.cell(0, 0).unwrap().direction();
    let expected = Vec2::new(1.0, 1.0).normalize();
    assert!((dir - expected).length() < 1e-6);
}

#[test]
fn test_set_cost_validation() {
    let mut ff = FlowField::new(3, 2, 1.0, Vec3::ZERO).unwrap();

    assert_eq!(ff.set_cost(1, 1, 0), Err(FlowFieldError::ZeroCost));
    assert_eq!(
        ff.set_cost(3, 0, 2),
        Err(FlowFieldError::OutOfBounds { x: 3, y: 0, width: 3, height: 2 })
    );
    assert_eq!(ff.set_impassable(2, 1), Ok(()));
    assert!(!ff.cell(2, 1).unwrap().is_passable());
}

#[test]
fn test_cost_labels_export_reached_cells() {
    let mut ff = FlowField::new(4, 4, 2.0, Vec3::ZERO).unwrap();
    ff.set_impassable(3, 3).unwrap();
    assert_eq!(ff.cost_labels().count(), 0);

    ff.generate(Vec3::ZERO);

    let labels: Vec<(Vec3, u32)> = ff.cost_labels().collect();
    assert_eq!(labels.len(), 15);
    assert!(labels.contains(&(Vec3::ZERO, 0)));
    assert!(labels.contains(&(Vec3::new(6.0, 0.0, 4.0), 5)));
    assert!(!labels.iter().any(|(pos, _)| *pos == Vec3::new(6.0, 0.0, 6.0)));
}

#[test]
fn test_trace_path_stops_at_target_and_outside_grid() {
    let mut ff = FlowField::new(6, 6, 1.0, Vec3::ZERO).unwrap();
    ff.generate(cell_center(&ff, 5, 5));

    let path = ff.trace_path(IVec2::new(0, 0), 64);
    assert_eq!(path.first().copied(), Some(IVec2::new(0, 0)));
    assert_eq!(path.last().copied(), Some(IVec2::new(5, 5)));
    // Pure diagonal descent on an open grid
    assert_eq!(path.len(), 6);

    assert_eq!(ff.trace_path(IVec2::new(0, 0), 2).len(), 3);
    assert!(ff.trace_path(IVec2::new(-1, 0), 10).is_empty());
}
