//! Per-frame pattern timelines
//!
//! A chip order expands into a `Chain` (one pattern per frame). The two
//! sides' chains are then paired frame-for-frame into a `CombinedChain`.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::chip::Chip;
use super::pattern::{AreaPattern, StagePattern};
use super::player::Side;

/// One side's frame-by-frame attack timeline for a round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    frames: VecDeque<AreaPattern>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pattern: AreaPattern) {
        self.frames.push_back(pattern);
    }

    pub fn pop_front(&mut self) -> Option<AreaPattern> {
        self.frames.pop_front()
    }

    /// Pattern at `index`, or EMPTY past the end
    pub fn get(&self, index: usize) -> AreaPattern {
        self.frames.get(index).copied().unwrap_or(AreaPattern::EMPTY)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AreaPattern> {
        self.frames.iter()
    }
}

impl FromIterator<AreaPattern> for Chain {
    fn from_iter<I: IntoIterator<Item = AreaPattern>>(iter: I) -> Self {
        Self {
            frames: iter.into_iter().collect(),
        }
    }
}

/// Expand a chip order into a per-frame timeline. Each chip contributes
/// `highlight_frames` copies of its pattern, oriented for `attacker`.
pub fn build_chain<'a, I>(chip_order: I, attacker: Side) -> Chain
where
    I: IntoIterator<Item = &'a Chip>,
{
    let mut chain = Chain::new();
    for chip in chip_order {
        let pattern = *chip.pattern_for(attacker);
        for _ in 0..chip.highlight_frames() {
            chain.push(pattern);
        }
    }
    chain
}

/// Both sides' timelines, synchronized and keyed by the side being threatened
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedChain {
    threats: [Chain; 2],
}

impl CombinedChain {
    /// Timeline of patterns threatening `target`'s half
    pub fn threats(&self, target: Side) -> &Chain {
        &self.threats[target.index()]
    }

    /// Pattern threatening `target` at `index` (EMPTY past the end)
    pub fn pattern(&self, target: Side, index: usize) -> AreaPattern {
        self.threats[target.index()].get(index)
    }

    /// Full-stage overlay for frame `index`: player 1's half on the left
    pub fn merge(&self, index: usize) -> StagePattern {
        StagePattern::merge(
            &self.pattern(Side::P1, index),
            &self.pattern(Side::P2, index),
        )
    }

    pub fn len(&self) -> usize {
        self.threats[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Pair the two attack chains frame by frame, padding the shorter with EMPTY.
///
/// `from_p1` holds player 1's attacks (they land on player 2's half) and
/// `from_p2` player 2's. Both are consumed.
pub fn combine(mut from_p1: Chain, mut from_p2: Chain) -> CombinedChain {
    let mut on_p1 = Chain::new();
    let mut on_p2 = Chain::new();
    while !from_p1.is_empty() || !from_p2.is_empty() {
        on_p2.push(from_p1.pop_front().unwrap_or(AreaPattern::EMPTY));
        on_p1.push(from_p2.pop_front().unwrap_or(AreaPattern::EMPTY));
    }
    CombinedChain {
        threats: [on_p1, on_p2],
    }
}
