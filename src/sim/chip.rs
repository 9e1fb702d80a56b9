//! Chips, speed modes and the folder a player draws from

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::pattern::AreaPattern;
use super::player::Side;
use crate::catalog::ChipCatalog;
use crate::consts::CHIP_ORDER_LEN;

/// Timing class of a chip: how long its pattern is telegraphed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SpeedMode {
    Fast,
    #[default]
    Standard,
    Slow,
}

impl SpeedMode {
    pub const ALL: [SpeedMode; 3] = [SpeedMode::Fast, SpeedMode::Standard, SpeedMode::Slow];

    /// Frames the pattern is shown as a telegraph
    pub fn highlight_frames(&self) -> usize {
        match self {
            SpeedMode::Fast => 5,
            SpeedMode::Standard => 10,
            SpeedMode::Slow => 30,
        }
    }

    pub fn color(&self) -> HighlightColor {
        match self {
            SpeedMode::Fast => HighlightColor::Red,
            SpeedMode::Standard => HighlightColor::Orange,
            SpeedMode::Slow => HighlightColor::Yellow,
        }
    }

    /// Uniformly random mode
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Display color tied to a speed mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HighlightColor {
    Red,
    Orange,
    Yellow,
}

impl HighlightColor {
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            HighlightColor::Red => (255, 0, 0),
            HighlightColor::Orange => (255, 165, 0),
            HighlightColor::Yellow => (255, 255, 0),
        }
    }
}

/// An attack definition: area pattern plus timing class.
///
/// Patterns are authored from player 1's side, striking the right half.
/// The inverted pattern is what lands when player 2 plays the same chip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ChipData")]
pub struct Chip {
    pub id: u32,
    pub name: String,
    pattern: AreaPattern,
    /// Derived from `pattern`; rebuilt on load
    #[serde(skip_serializing)]
    inverted: AreaPattern,
    speed: SpeedMode,
}

/// Stored form of a chip
#[derive(Deserialize)]
struct ChipData {
    id: u32,
    name: String,
    pattern: AreaPattern,
    #[serde(default)]
    speed: SpeedMode,
}

impl From<ChipData> for Chip {
    fn from(data: ChipData) -> Self {
        Chip::new(data.id, data.name, data.pattern).with_speed(data.speed)
    }
}

impl Chip {
    pub fn new(id: u32, name: impl Into<String>, pattern: AreaPattern) -> Self {
        Self {
            id,
            name: name.into(),
            pattern,
            inverted: pattern.invert(),
            speed: SpeedMode::Standard,
        }
    }

    pub fn pattern(&self) -> &AreaPattern {
        &self.pattern
    }

    pub fn inverted_pattern(&self) -> &AreaPattern {
        &self.inverted
    }

    /// Pattern as it lands on the opponent of `attacker`
    pub fn pattern_for(&self, attacker: Side) -> &AreaPattern {
        match attacker {
            Side::P1 => &self.pattern,
            Side::P2 => &self.inverted,
        }
    }

    pub fn speed(&self) -> SpeedMode {
        self.speed
    }

    pub fn set_speed(&mut self, speed: SpeedMode) {
        self.speed = speed;
    }

    pub fn with_speed(mut self, speed: SpeedMode) -> Self {
        self.speed = speed;
        self
    }

    pub fn highlight_frames(&self) -> usize {
        self.speed.highlight_frames()
    }

    pub fn highlight_color(&self) -> HighlightColor {
        self.speed.color()
    }
}

/// A player's draw queue of chips.
///
/// Drawing rotates the queue (front goes to the back) and hands out a copy,
/// so speed changes on a drawn chip never reach the folder's own instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    chips: VecDeque<Chip>,
}

impl Folder {
    pub fn new(chips: Vec<Chip>) -> Self {
        Self {
            chips: chips.into(),
        }
    }

    /// Build a folder from persisted chip ids
    pub fn from_ids(catalog: &ChipCatalog, ids: &[u32]) -> crate::Result<Self> {
        let chips = ids
            .iter()
            .map(|&id| catalog.chip(id))
            .collect::<crate::Result<Vec<_>>>()?;
        Ok(Self::new(chips))
    }

    /// Shuffle by `2 * len` swaps of distinct random positions
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let len = self.chips.len();
        if len < 2 {
            return;
        }
        for _ in 0..len * 2 {
            let a = rng.random_range(0..len);
            // Offset into the other len-1 slots keeps the pair distinct
            let b = (a + rng.random_range(1..len)) % len;
            self.chips.swap(a, b);
        }
    }

    /// Take a copy of the front chip and move it to the back
    pub fn draw(&mut self) -> Option<Chip> {
        let chip = self.chips.pop_front()?;
        self.chips.push_back(chip.clone());
        Some(chip)
    }

    pub fn len(&self) -> usize {
        self.chips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chip> {
        self.chips.iter()
    }

    /// Chip ids in queue order (for the save layer)
    pub fn ids(&self) -> Vec<u32> {
        self.chips.iter().map(|c| c.id).collect()
    }
}

/// The chip-order builder behind the chip menu.
///
/// Holds a hand of up to `CHIP_ORDER_LEN` distinct chips drawn from a folder
/// and the order in which the player picked hand slots.
#[derive(Debug, Clone, Default)]
pub struct ChipSelection {
    hand: Vec<Chip>,
    order: Vec<usize>,
}

impl ChipSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refill the hand from the folder, skipping chips already held
    pub fn fill(&mut self, folder: &mut Folder) {
        // One full rotation without a new id means the folder has nothing left to offer
        let mut misses = 0;
        while self.hand.len() < CHIP_ORDER_LEN && misses < folder.len() {
            let Some(chip) = folder.draw() else {
                break;
            };
            if self.hand.iter().any(|c| c.id == chip.id) {
                misses += 1;
                continue;
            }
            misses = 0;
            self.hand.push(chip);
        }
    }

    /// Append hand slot `slot` to the order with the given speed.
    /// Returns false if the slot is empty or already taken.
    pub fn select(&mut self, slot: usize, speed: SpeedMode) -> bool {
        if slot >= self.hand.len() || self.order.contains(&slot) || self.order.len() >= CHIP_ORDER_LEN {
            return false;
        }
        self.hand[slot].set_speed(speed);
        self.order.push(slot);
        true
    }

    pub fn is_selected(&self, slot: usize) -> bool {
        self.order.contains(&slot)
    }

    /// Drop the current order; the hand is untouched
    pub fn clear(&mut self) {
        self.order.clear();
    }

    pub fn hand(&self) -> &[Chip] {
        &self.hand
    }

    /// Chips in picked order
    pub fn order(&self) -> Vec<&Chip> {
        self.order.iter().map(|&i| &self.hand[i]).collect()
    }

    /// Export the picked chips and remove them from the hand
    pub fn confirm(&mut self) -> Vec<Chip> {
        let chips = self.order.iter().map(|&i| self.hand[i].clone()).collect();
        let mut used = std::mem::take(&mut self.order);
        used.sort_unstable_by(|a, b| b.cmp(a));
        for i in used {
            self.hand.remove(i);
        }
        chips
    }
}
