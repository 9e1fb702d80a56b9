//! Data-driven combat balance
//!
//! Defaults come from `consts`; a JSON file can override any subset of
//! fields.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable combat parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Starting health of each player
    pub max_health: i32,
    /// Hitting-phase advances of invulnerability after a hit
    pub hit_cooldown: u32,
    /// Ticks between Hitting-phase advances
    pub switch_interval: u32,
    /// Percent chance the bot fumbles a dodge (0-100)
    pub bot_error_rate: u32,
    /// Calls between random idle steps
    pub bot_movement_cooldown: u32,
    /// Chips in the bot's randomly built folder
    pub folder_size: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_health: MAX_HEALTH,
            hit_cooldown: HIT_COOLDOWN,
            switch_interval: SWITCH,
            bot_error_rate: BOT_ERROR_RATE,
            bot_movement_cooldown: BOT_MOVEMENT_COOLDOWN,
            folder_size: FOLDER_SIZE,
        }
    }
}

impl Tuning {
    /// Parse from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Parse from JSON, falling back to defaults on any error
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(tuning)) => {
                log::info!("Loaded combat tuning");
                tuning
            }
            Some(Err(e)) => {
                log::warn!("Invalid tuning ({}), using defaults", e);
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Clamp values that would stall or break the simulation
    pub fn sanitized(mut self) -> Self {
        self.max_health = self.max_health.max(1);
        self.switch_interval = self.switch_interval.max(1);
        self.bot_error_rate = self.bot_error_rate.min(100);
        self.bot_movement_cooldown = self.bot_movement_cooldown.max(1);
        self.folder_size = self.folder_size.max(CHIP_ORDER_LEN);
        self
    }
}
