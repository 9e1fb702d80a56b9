//! Area patterns over the battle stage
//!
//! The stage is 3 rows by 6 columns, split into two 3x3 halves. Player 1
//! stands on the left half (cols 0..=2), player 2 on the right (cols 3..=5).
//! An `AreaPattern` marks the threatened cells of one half; a `StagePattern`
//! is two of them laid side by side.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{HALF_COLS, STAGE_COLS, STAGE_ROWS};

/// Immutable 3x3 occupancy grid for one half of the stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AreaPattern {
    cells: [[bool; HALF_COLS]; STAGE_ROWS],
}

impl AreaPattern {
    /// No cell threatened
    pub const EMPTY: AreaPattern = AreaPattern {
        cells: [[false; HALF_COLS]; STAGE_ROWS],
    };

    pub const fn new(cells: [[bool; HALF_COLS]; STAGE_ROWS]) -> Self {
        Self { cells }
    }

    /// Build from loosely shaped rows (e.g. decoded JSON). Returns `None`
    /// unless the input is exactly 3x3.
    pub fn from_rows(rows: &[Vec<bool>]) -> Option<Self> {
        if rows.len() != STAGE_ROWS || rows.iter().any(|r| r.len() != HALF_COLS) {
            return None;
        }
        let mut cells = [[false; HALF_COLS]; STAGE_ROWS];
        for (row, src) in cells.iter_mut().zip(rows) {
            row.copy_from_slice(src);
        }
        Some(Self { cells })
    }

    /// Whether (row, col) is threatened. Out-of-range cells read as safe.
    #[inline]
    pub fn get(&self, row: i32, col: i32) -> bool {
        if row < 0 || col < 0 {
            return false;
        }
        self.cells
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
            .unwrap_or(false)
    }

    /// Mirror across the vertical axis (columns reversed)
    pub fn invert(&self) -> Self {
        let mut cells = self.cells;
        for row in cells.iter_mut() {
            row.reverse();
        }
        Self { cells }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(|&c| !c)
    }

    /// Threatened cells as (row, col), row-major
    pub fn threatened_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, c)| **c)
                .map(move |(c, _)| (r as i32, c as i32))
        })
    }

    /// Cells left untouched, row-major
    pub fn safe_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, c)| !**c)
                .map(move |(c, _)| (r as i32, c as i32))
        })
    }

    pub fn rows(&self) -> &[[bool; HALF_COLS]; STAGE_ROWS] {
        &self.cells
    }
}

/// Full-stage 3x6 pattern, left half then right half per row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StagePattern {
    cells: [[bool; STAGE_COLS]; STAGE_ROWS],
}

impl StagePattern {
    pub const EMPTY: StagePattern = StagePattern {
        cells: [[false; STAGE_COLS]; STAGE_ROWS],
    };

    /// Concatenate two half patterns row by row
    pub fn merge(left: &AreaPattern, right: &AreaPattern) -> Self {
        let mut cells = [[false; STAGE_COLS]; STAGE_ROWS];
        for (r, row) in cells.iter_mut().enumerate() {
            row[..HALF_COLS].copy_from_slice(&left.cells[r]);
            row[HALF_COLS..].copy_from_slice(&right.cells[r]);
        }
        Self { cells }
    }

    /// Whether absolute stage cell (row, col) is threatened
    #[inline]
    pub fn get(&self, row: i32, col: i32) -> bool {
        if row < 0 || col < 0 {
            return false;
        }
        self.cells
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(|&c| !c)
    }

    pub fn rows(&self) -> &[[bool; STAGE_COLS]; STAGE_ROWS] {
        &self.cells
    }
}

fn write_rows<const W: usize>(f: &mut fmt::Formatter<'_>, rows: &[[bool; W]]) -> fmt::Result {
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            writeln!(f)?;
        }
        for cell in row {
            f.write_str(if *cell { "#" } else { "." })?;
        }
    }
    Ok(())
}

impl fmt::Display for AreaPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_rows(f, &self.cells)
    }
}

impl fmt::Display for StagePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_rows(f, &self.cells)
    }
}
