//! Grid-to-screen mapping
//!
//! The rendering collaborator owns screen space; the simulation only needs
//! to turn a grid cell into a sprite anchor when a player moves.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{STAGE_COLS, STAGE_ROWS};
use crate::sim::GridPos;

/// Maps stage cells to screen coordinates
pub trait GridMapper {
    /// Window size in pixels
    fn window_size(&self) -> Vec2;

    /// Centre of the panel drawn for `pos`
    fn panel_center(&self, pos: GridPos) -> Vec2;

    /// Top-left anchor of a player sprite standing on `pos`
    fn render_anchor(&self, pos: GridPos) -> Vec2 {
        let size = self.window_size();
        self.panel_center(pos) - Vec2::new(size.x / 12.0, size.y / 4.0)
    }
}

/// Panels laid out on a 6x7 window grid, stage rows in grid rows 3..=5
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageLayout {
    pub width: f32,
    pub height: f32,
}

/// Gap between neighbouring panels (pixels)
const PANEL_SEPARATION: f32 = 3.0;
/// Window grid row holding the first stage row
const FIRST_STAGE_ROW: i32 = 3;
/// Window grid rows (stage + background)
const LAYOUT_ROWS: f32 = 7.0;

impl Default for StageLayout {
    /// 6:4 window
    fn default() -> Self {
        Self::new(1200.0, 800.0)
    }
}

impl StageLayout {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    fn cell_size(&self) -> Vec2 {
        Vec2::new(self.width / STAGE_COLS as f32, self.height / LAYOUT_ROWS)
    }
}

impl GridMapper for StageLayout {
    fn window_size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    fn panel_center(&self, pos: GridPos) -> Vec2 {
        let row = pos.row.clamp(0, STAGE_ROWS as i32 - 1);
        let col = pos.col.clamp(0, STAGE_COLS as i32 - 1);
        let cell = self.cell_size();
        let panel = cell - Vec2::splat(PANEL_SEPARATION);
        let origin = Vec2::new(cell.x * col as f32, cell.y * (row + FIRST_STAGE_ROW) as f32);
        origin + panel / 2.0
    }
}
