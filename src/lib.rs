//! Chain Strike - combat core for a two-player grid battle game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (patterns, chips, chains, combat, bot)
//! - `catalog`: Read-only chip catalog passed into the simulation
//! - `layout`: Grid-to-screen mapping for the rendering collaborator
//! - `tuning`: Data-driven combat balance

pub mod catalog;
pub mod error;
pub mod layout;
pub mod sim;
pub mod tuning;

pub use catalog::ChipCatalog;
pub use error::{Error, Result};
pub use layout::{GridMapper, StageLayout};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Frame period of the surrounding game loop in milliseconds
    pub const FRAME_MS: u64 = 50;

    /// Stage dimensions (two 3x3 halves side by side)
    pub const STAGE_ROWS: usize = 3;
    pub const STAGE_COLS: usize = 6;
    pub const HALF_COLS: usize = 3;

    /// Player health at match start
    pub const MAX_HEALTH: i32 = 3;

    /// Hitting-phase advances a player stays invulnerable after a hit
    pub const HIT_COOLDOWN: u32 = 20;
    /// Ticks between Hitting-phase advances
    pub const SWITCH: u32 = 10;

    /// Chips in a folder
    pub const FOLDER_SIZE: usize = 15;
    /// Chips in one round's chip order
    pub const CHIP_ORDER_LEN: usize = 5;

    /// Percent chance the bot fumbles a planned dodge
    pub const BOT_ERROR_RATE: u32 = 5;
    /// Invocations between random idle steps
    pub const BOT_MOVEMENT_COOLDOWN: u32 = 3;
}
