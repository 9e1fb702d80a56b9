//! Players, grid positions and movement

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{HALF_COLS, MAX_HEALTH, STAGE_ROWS};
use crate::layout::GridMapper;

/// Which side of the stage a player fights from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Left half, cols 0..=2
    P1,
    /// Right half, cols 3..=5
    P2,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::P1, Side::P2];

    /// Index into per-side arrays
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::P1 => 0,
            Side::P2 => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::P1 => Side::P2,
            Side::P2 => Side::P1,
        }
    }

    /// First absolute column of this side's half
    pub fn col_offset(self) -> i32 {
        match self {
            Side::P1 => 0,
            Side::P2 => HALF_COLS as i32,
        }
    }

    /// Inclusive column range of this side's half
    pub fn col_range(self) -> (i32, i32) {
        let start = self.col_offset();
        (start, start + HALF_COLS as i32 - 1)
    }
}

/// A cell on the stage (absolute row 0..=2, col 0..=5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub row: i32,
    pub col: i32,
}

impl GridPos {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(self, v: MoveVector) -> Self {
        Self::new(self.row + v.d_row, self.col + v.d_col)
    }

    /// Vector that moves `self` onto `to`
    pub fn vector_to(self, to: GridPos) -> MoveVector {
        MoveVector::new(to.row - self.row, to.col - self.col)
    }

    pub fn manhattan(self, other: GridPos) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

/// A grid movement request (row delta, col delta)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MoveVector {
    pub d_row: i32,
    pub d_col: i32,
}

impl MoveVector {
    pub const ZERO: MoveVector = MoveVector::new(0, 0);
    pub const UP: MoveVector = MoveVector::new(-1, 0);
    pub const DOWN: MoveVector = MoveVector::new(1, 0);
    pub const LEFT: MoveVector = MoveVector::new(0, -1);
    pub const RIGHT: MoveVector = MoveVector::new(0, 1);

    /// Cardinal steps for random wandering
    pub const CARDINALS: [MoveVector; 4] = [
        MoveVector::DOWN,
        MoveVector::UP,
        MoveVector::RIGHT,
        MoveVector::LEFT,
    ];

    pub const fn new(d_row: i32, d_col: i32) -> Self {
        Self { d_row, d_col }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Health and placement of one combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    health: i32,
    position: GridPos,
    /// Screen-space anchor for the sprite; derived from `position`
    #[serde(skip)]
    render_anchor: Vec2,
}

impl Player {
    pub fn new(position: GridPos) -> Self {
        Self {
            health: MAX_HEALTH,
            position,
            render_anchor: Vec2::ZERO,
        }
    }

    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn position(&self) -> GridPos {
        self.position
    }

    pub fn render_anchor(&self) -> Vec2 {
        self.render_anchor
    }

    /// Lose one point of health. Not clamped at zero.
    pub fn damage(&mut self) {
        self.health -= 1;
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }
}

/// Bounds-checked movement and damage bookkeeping for one side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerManager {
    pub player: Player,
    side: Side,
    col_min: i32,
    col_max: i32,
    hp_zero: bool,
}

impl PlayerManager {
    pub fn new(player: Player, side: Side) -> Self {
        let (col_min, col_max) = side.col_range();
        Self {
            player,
            side,
            col_min,
            col_max,
            hp_zero: false,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Apply a movement vector. Each axis that would leave the allowed
    /// range keeps its previous value; the other axis still moves.
    pub fn move_player(&mut self, movement: MoveVector, mapper: &dyn GridMapper) {
        let GridPos { row, col } = self.player.position;
        let mut next_row = row + movement.d_row;
        let mut next_col = col + movement.d_col;
        if next_col < self.col_min || next_col > self.col_max {
            next_col = col;
        }
        if next_row < 0 || next_row >= STAGE_ROWS as i32 {
            next_row = row;
        }
        self.player.position = GridPos::new(next_row, next_col);
        self.player.render_anchor = mapper.render_anchor(self.player.position);
    }

    /// Deal one point of damage; raises the health-zero signal once health
    /// reaches zero or below
    pub fn damage_player(&mut self) {
        self.player.damage();
        if self.player.is_defeated() {
            self.hp_zero = true;
        }
    }

    /// Level-triggered: stays true once health has run out
    pub fn hp_zero(&self) -> bool {
        self.hp_zero
    }
}
