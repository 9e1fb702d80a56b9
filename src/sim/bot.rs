//! Scripted opponent
//!
//! The bot sees the live timeline aimed at its half once the telegraph ends
//! and precomputes one step per frame. Planning happens in half-local
//! coordinates (cols 0..=2) so the same logic serves either side.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::chain::Chain;
use super::chip::{Chip, Folder, SpeedMode};
use super::pattern::AreaPattern;
use super::player::{GridPos, MoveVector, Side};
use crate::consts::{CHIP_ORDER_LEN, HALF_COLS, STAGE_ROWS};
use crate::tuning::Tuning;

/// Candidate steps in tie-break order
const STEP_ORDER: [MoveVector; 5] = [
    MoveVector::ZERO,
    MoveVector::UP,
    MoveVector::LEFT,
    MoveVector::DOWN,
    MoveVector::RIGHT,
];

#[derive(Debug, Clone)]
pub struct Bot {
    side: Side,
    route: VecDeque<MoveVector>,
    /// Percent chance a dodge is replaced by a random step
    error_rate: u32,
    /// Invocations between random idle steps
    movement_cooldown: u32,
    frame_counter: u32,
    rng: Pcg32,
}

impl Bot {
    pub fn new(side: Side, tuning: &Tuning, seed: u64) -> Self {
        Self {
            side,
            route: VecDeque::new(),
            error_rate: tuning.bot_error_rate.min(100),
            movement_cooldown: tuning.bot_movement_cooldown,
            frame_counter: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Plan one step per live frame. `hit_order` is the timeline aimed at
    /// the bot's half; `position` is the bot's absolute cell.
    pub fn analyze(&mut self, hit_order: &Chain, position: GridPos) {
        self.route.clear();
        let mut pos = GridPos::new(position.row, position.col - self.side.col_offset());
        for i in 0..hit_order.len() {
            let current = hit_order.get(i);
            let next = hit_order.get(i + 1);
            let step = best_step(&current, &next, pos);
            self.route.push_back(pos.vector_to(step));
            pos = step;
        }
        log::debug!("Bot planned {} steps", self.route.len());
    }

    /// Next planned step, occasionally fumbled into a random one.
    /// Falls back to idling when the route is used up.
    pub fn dodge(&mut self) -> MoveVector {
        self.frame_counter = 0;
        let Some(planned) = self.route.pop_front() else {
            return self.idle();
        };
        if self.rng.random_range(1..=100) <= self.error_rate {
            return self.random_step();
        }
        planned
    }

    /// Wander: a random cardinal step every `movement_cooldown` calls
    pub fn idle(&mut self) -> MoveVector {
        self.frame_counter += 1;
        if self.frame_counter < self.movement_cooldown {
            return MoveVector::ZERO;
        }
        self.frame_counter = 0;
        self.random_step()
    }

    /// Shuffle the folder, draw a chip order and give each chip a random speed
    pub fn select_chips(&mut self, folder: &mut Folder) -> Vec<Chip> {
        folder.shuffle(&mut self.rng);
        let mut order = Vec::with_capacity(CHIP_ORDER_LEN);
        for _ in 0..CHIP_ORDER_LEN {
            let Some(chip) = folder.draw() else {
                break;
            };
            order.push(chip.with_speed(SpeedMode::random(&mut self.rng)));
        }
        order
    }

    pub fn route(&self) -> impl Iterator<Item = &MoveVector> {
        self.route.iter()
    }

    pub fn route_len(&self) -> usize {
        self.route.len()
    }

    fn random_step(&mut self) -> MoveVector {
        MoveVector::CARDINALS[self.rng.random_range(0..MoveVector::CARDINALS.len())]
    }
}

fn in_half(pos: GridPos) -> bool {
    (0..STAGE_ROWS as i32).contains(&pos.row) && (0..HALF_COLS as i32).contains(&pos.col)
}

/// Pick the reachable cell for this frame (not threatened by `current`)
/// closest to a cell that `next` leaves safe. Stays put when every
/// reachable cell is threatened.
pub fn best_step(current: &AreaPattern, next: &AreaPattern, pos: GridPos) -> GridPos {
    let safe: Vec<GridPos> = next.safe_cells().map(|(r, c)| GridPos::new(r, c)).collect();
    let mut best: Option<(GridPos, u32)> = None;
    for step in STEP_ORDER {
        let cell = pos.offset(step);
        if !in_half(cell) || current.get(cell.row, cell.col) {
            continue;
        }
        let dist = safe
            .iter()
            .map(|s| s.manhattan(cell))
            .min()
            .unwrap_or(u32::MAX);
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((cell, dist));
        }
    }
    best.map(|(cell, _)| cell).unwrap_or(pos)
}
