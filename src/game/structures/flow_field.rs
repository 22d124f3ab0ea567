use bevy::prelude::*;
use std::collections::VecDeque;
use thiserror::Error;

/// Cost value marking a cell as impassable terrain.
pub const IMPASSABLE_COST: u8 = u8::MAX;

/// Default traversal cost of a freshly constructed cell.
pub const DEFAULT_COST: u8 = 1;

/// `best_cost` of a cell the integration pass has not reached.
pub const UNREACHED: u32 = u32::MAX;

/// Orthogonal neighbor offsets used for cost propagation.
///
/// Same enumeration as [`NEIGHBORS_8`] with the diagonals filtered out.
pub const NEIGHBORS_4: [IVec2; 4] = [
    IVec2::new(-1, 0),
    IVec2::new(0, -1),
    IVec2::new(0, 1),
    IVec2::new(1, 0),
];

/// Neighbor offsets used for direction derivation.
///
/// Enumerated as `x` in `{-1, 0, 1}` (outer) then `y` in `{-1, 0, 1}` (inner).
/// When several neighbors share the lowest cost the first one in this order wins.
pub const NEIGHBORS_8: [IVec2; 8] = [
    IVec2::new(-1, -1),
    IVec2::new(-1, 0),
    IVec2::new(-1, 1),
    IVec2::new(0, -1),
    IVec2::new(0, 1),
    IVec2::new(1, -1),
    IVec2::new(1, 0),
    IVec2::new(1, 1),
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlowFieldError {
    #[error("flow field dimensions must be positive and fit in i32, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("flow field cell size must be positive and finite, got {0}")]
    InvalidCellSize(f32),
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds { x: i32, y: i32, width: usize, height: usize },
    #[error("cell cost must be at least 1")]
    ZeroCost,
}

/// One grid cell of a [`FlowField`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowFieldCell {
    grid_position: IVec2,
    world_position: Vec3,
    cost: u8,
    best_cost: u32,
    direction: Vec2,
}

impl FlowFieldCell {
    fn new(grid_position: IVec2, world_position: Vec3) -> Self {
        Self {
            grid_position,
            world_position,
            cost: DEFAULT_COST,
            best_cost: UNREACHED,
            direction: Vec2::ZERO,
        }
    }

    pub fn grid_position(&self) -> IVec2 {
        self.grid_position
    }

    pub fn world_position(&self) -> Vec3 {
        self.world_position
    }

    pub fn cost(&self) -> u8 {
        self.cost
    }

    /// Integrated cost from the current target, [`UNREACHED`] if no path exists.
    pub fn best_cost(&self) -> u32 {
        self.best_cost
    }

    /// Unit heading toward the target (x maps to world X, y to world Z), or zero.
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn is_passable(&self) -> bool {
        self.cost != IMPASSABLE_COST
    }

    pub fn is_reached(&self) -> bool {
        self.best_cost != UNREACHED
    }
}

/// Flow field navigation grid using queue-based integration and a vector field.
///
/// A flow field guides any number of units to one target by precomputing the
/// best direction for each grid cell. Units only do an O(1) lookup per tick.
///
/// # Algorithm
///
/// 1. **Reset:** every `best_cost` goes back to [`UNREACHED`]
/// 2. **Integration Field:** FIFO relaxation over orthogonal neighbors from the
///    target, re-enqueueing a cell whenever its cost improves
/// 3. **Vector Field:** each cell points at its cheapest of 8 neighbors
///
/// # Example
///
/// ```rust,ignore
/// let mut flow_field = FlowField::new(64, 64, 2.0, Vec3::ZERO)?;
/// flow_field.set_impassable(10, 12)?;
///
/// if flow_field.generate(clicked_point).is_none() {
///     // target off the map, every direction is zero
/// }
///
/// let heading = flow_field.direction_at_world_pos(unit_pos);
/// ```
///
/// # Performance
///
/// - **Generation:** O(width × height) for uniform costs; weighted terrain may
///   revisit cells
/// - **Query:** O(1)
#[derive(Debug, Clone)]
pub struct FlowField {
    width: usize,
    height: usize,
    cell_size: f32,
    origin: Vec3,
    cells: Vec<FlowFieldCell>,
    target_cell: Option<IVec2>,
}

impl FlowField {
    pub fn new(
        width: usize,
        height: usize,
        cell_size: f32,
        origin: Vec3,
    ) -> Result<Self, FlowFieldError> {
        let max_side = i32::MAX as usize;
        if width == 0 || height == 0 || width > max_side || height > max_side {
            return Err(FlowFieldError::InvalidDimensions { width, height });
        }
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(FlowFieldError::InvalidCellSize(cell_size));
        }

        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let world_pos = origin + Vec3::new(x as f32 * cell_size, 0.0, y as f32 * cell_size);
                cells.push(FlowFieldCell::new(IVec2::new(x as i32, y as i32), world_pos));
            }
        }

        Ok(Self {
            width,
            height,
            cell_size,
            origin,
            cells,
            target_cell: None,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Cell the last [`generate`](Self::generate) call integrated from.
    pub fn target_cell(&self) -> Option<IVec2> {
        self.target_cell
    }

    pub fn cells(&self) -> &[FlowFieldCell] {
        &self.cells
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<&FlowFieldCell> {
        self.index_of(x, y).map(|idx| &self.cells[idx])
    }

    pub fn is_valid_index(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Maps a world position onto the ground-plane grid. The vertical axis and
    /// the origin are ignored and the result is not clamped.
    pub fn world_to_grid(&self, world_pos: Vec3) -> IVec2 {
        if !world_pos.x.is_finite() || !world_pos.z.is_finite() {
            return IVec2::MIN;
        }
        // `as` saturates, so far-away positions stay out of bounds.
        IVec2::new(
            (world_pos.x / self.cell_size).floor() as i32,
            (world_pos.z / self.cell_size).floor() as i32,
        )
    }

    pub fn set_cost(&mut self, x: i32, y: i32, cost: u8) -> Result<(), FlowFieldError> {
        if cost == 0 {
            return Err(FlowFieldError::ZeroCost);
        }
        let idx = self.index_of(x, y).ok_or(FlowFieldError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;
        self.cells[idx].cost = cost;
        Ok(())
    }

    pub fn set_impassable(&mut self, x: i32, y: i32) -> Result<(), FlowFieldError> {
        self.set_cost(x, y, IMPASSABLE_COST)
    }

    /// Rebuilds the integration and vector fields toward `target_world_pos`.
    ///
    /// Returns the target cell, or `None` when the target lies outside the grid.
    /// In that case every cell is left unreached with a zero direction.
    pub fn generate(&mut self, target_world_pos: Vec3) -> Option<IVec2> {
        let target = self.world_to_grid(target_world_pos);

        self.reset_best_costs();
        self.target_cell = self.integrate(target).then_some(target);
        self.derive_directions();

        match self.target_cell {
            Some(cell) => debug!(
                "Flow field generated toward cell {} ({} of {} cells reached)",
                cell,
                self.reached_count(),
                self.cells.len()
            ),
            None => warn!(
                "Flow field target {:?} maps to cell {} outside the {}x{} grid",
                target_world_pos, target, self.width, self.height
            ),
        }

        self.target_cell
    }

    /// Heading for an agent at `world_pos`, zero outside the grid or where no
    /// guidance is available.
    pub fn direction_at_world_pos(&self, world_pos: Vec3) -> Vec2 {
        let grid_pos = self.world_to_grid(world_pos);
        self.cell(grid_pos.x, grid_pos.y)
            .map_or(Vec2::ZERO, |cell| cell.direction)
    }

    /// World position and integrated cost of every reached cell.
    pub fn cost_labels(&self) -> impl Iterator<Item = (Vec3, u32)> + '_ {
        self.cells
            .iter()
            .filter(|cell| cell.is_reached())
            .map(|cell| (cell.world_position, cell.best_cost))
    }

    pub fn reached_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_reached()).count()
    }

    /// Follows the vector field from `start` and returns the visited cells.
    pub fn trace_path(&self, start: IVec2, max_steps: usize) -> Vec<IVec2> {
        let mut path = Vec::new();
        if !self.is_valid_index(start.x, start.y) {
            return path;
        }
        path.push(start);

        let mut current = start;
        for _ in 0..max_steps {
            let Some(cell) = self.cell(current.x, current.y) else { break };
            let step = cell.direction.round().as_ivec2();
            if step == IVec2::ZERO {
                break;
            }
            let next = current + step;
            if !self.is_valid_index(next.x, next.y) {
                break;
            }
            current = next;
            path.push(current);
        }
        path
    }

    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        self.is_valid_index(x, y)
            .then(|| y as usize * self.width + x as usize)
    }

    fn reset_best_costs(&mut self) {
        for cell in &mut self.cells {
            cell.best_cost = UNREACHED;
        }
    }

    /// The target is seeded even when impassable, so units still gather
    /// around a blocked destination.
    fn integrate(&mut self, target: IVec2) -> bool {
        let Some(target_idx) = self.index_of(target.x, target.y) else {
            return false;
        };
        self.cells[target_idx].best_cost = 0;

        let mut queue = VecDeque::new();
        queue.push_back(target);

        while let Some(current) = queue.pop_front() {
            let Some(current_idx) = self.index_of(current.x, current.y) else { continue };
            let current_cost = self.cells[current_idx].best_cost;

            for offset in NEIGHBORS_4 {
                let next = current + offset;
                let Some(n_idx) = self.index_of(next.x, next.y) else { continue };
                let neighbor = &mut self.cells[n_idx];
                if !neighbor.is_passable() {
                    continue;
                }

                let candidate = current_cost.saturating_add(neighbor.cost as u32);
                if candidate < neighbor.best_cost {
                    neighbor.best_cost = candidate;
                    queue.push_back(next);
                }
            }
        }
        true
    }

    fn derive_directions(&mut self) {
        for idx in 0..self.cells.len() {
            let cell = self.cells[idx];
            if !cell.is_reached() {
                self.cells[idx].direction = Vec2::ZERO;
                continue;
            }

            let mut best_cost = cell.best_cost;
            let mut best_offset = IVec2::ZERO;
            for offset in NEIGHBORS_8 {
                let n = cell.grid_position + offset;
                let Some(neighbor) = self.cell(n.x, n.y) else { continue };
                if neighbor.best_cost < best_cost {
                    best_cost = neighbor.best_cost;
                    best_offset = offset;
                }
            }

            self.cells[idx].direction = best_offset.as_vec2().normalize_or_zero();
        }
    }
}

#[cfg(test)]
#[path = "flow_field_tests.rs"]
mod tests;
