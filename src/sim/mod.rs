//! Deterministic simulation module
//!
//! All combat logic lives here. This module must be pure and deterministic:
//! - Frame-stepped only (one `tick` per frame of the outer loop)
//! - Seeded RNG only
//! - Single writer: the combat state owns the combined chain and vulnerability
//! - No rendering or platform dependencies

pub mod bot;
pub mod chain;
pub mod chip;
pub mod combat;
pub mod pattern;
pub mod player;
pub mod state;
pub mod tick;

pub use bot::Bot;
pub use chain::{Chain, CombinedChain, build_chain, combine};
pub use chip::{Chip, ChipSelection, Folder, HighlightColor, SpeedMode};
pub use combat::{CombatEvent, CombatFlags, CombatPhase, CombatState, CombatTick, Overlay};
pub use pattern::{AreaPattern, StagePattern};
pub use player::{GridPos, MoveVector, Player, PlayerManager, Side};
pub use state::{DamageEvent, MatchPhase, MatchState};
pub use tick::{TickInput, tick};
