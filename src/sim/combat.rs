//! Frame-stepped combat state machine
//!
//! A round runs the combined chain twice: once as a harmless telegraph
//! (Highlighting, one frame per tick) and once live (Hitting, one frame
//! every `switch_interval` ticks). The combat state is the only writer of the
//! combined chain and of per-player vulnerability.

use serde::{Deserialize, Serialize};

use super::chain::{Chain, CombinedChain, build_chain, combine};
use super::chip::Chip;
use super::pattern::StagePattern;
use super::player::{GridPos, Side};
use crate::tuning::Tuning;

/// Current phase of a combat round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CombatPhase {
    /// No round active
    #[default]
    Idle,
    /// Telegraphing the upcoming threat pattern
    Highlighting,
    /// Resolving hits against the same timeline
    Hitting,
}

/// What the stage should show for the active frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Overlay {
    Highlight(StagePattern),
    Hit(StagePattern),
}

impl Overlay {
    pub fn pattern(&self) -> &StagePattern {
        match self {
            Overlay::Highlight(p) | Overlay::Hit(p) => p,
        }
    }
}

/// Something that happened during a combat tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// First telegraph frame of a round was shown
    RoundStarted,
    /// The telegraph finished; the live phase starts next tick
    HitPhaseStarted,
    Hit(Side),
    RoundComplete,
}

/// Result of a single combat tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombatTick {
    /// Frame resolved this tick, if the index advanced
    pub frame: Option<Overlay>,
    pub events: Vec<CombatEvent>,
}

impl CombatTick {
    pub fn was_hit(&self, side: Side) -> bool {
        self.events.contains(&CombatEvent::Hit(side))
    }

    pub fn has(&self, event: CombatEvent) -> bool {
        self.events.contains(&event)
    }
}

/// Observable flags for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CombatFlags {
    pub highlighting: bool,
    pub hitting: bool,
    pub p1_hit: bool,
    pub p2_hit: bool,
    pub p1_ready: bool,
    pub p2_ready: bool,
}

/// Combat round driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatState {
    phase: CombatPhase,
    /// Chains built from submitted orders, keyed by attacker
    pending: [Option<Chain>; 2],
    combined: CombinedChain,
    index: usize,
    switch_counter: u32,
    ready: [bool; 2],
    hit: [bool; 2],
    vulnerable: [bool; 2],
    /// Hitting-phase advances since each player's last hit
    hit_counters: [u32; 2],
    overlay: Option<Overlay>,
    hit_cooldown: u32,
    switch_interval: u32,
}

impl Default for CombatState {
    fn default() -> Self {
        Self::new(&Tuning::default())
    }
}

impl CombatState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: CombatPhase::Idle,
            pending: [None, None],
            combined: CombinedChain::default(),
            index: 0,
            switch_counter: 0,
            ready: [false; 2],
            hit: [false; 2],
            vulnerable: [true; 2],
            hit_counters: [tuning.hit_cooldown; 2],
            overlay: None,
            hit_cooldown: tuning.hit_cooldown,
            switch_interval: tuning.switch_interval.max(1),
        }
    }

    /// Store `attacker`'s chip order for the next round. Rejected while a
    /// round is running.
    pub fn load_chip_order(&mut self, attacker: Side, chip_order: &[Chip]) -> bool {
        if self.is_active() {
            log::warn!("{:?} chip order ignored: round in progress", attacker);
            return false;
        }
        let chain = build_chain(chip_order, attacker);
        log::debug!(
            "{:?} submitted {} chips ({} frames)",
            attacker,
            chip_order.len(),
            chain.len()
        );
        self.pending[attacker.index()] = Some(chain);
        self.ready[attacker.index()] = true;
        true
    }

    /// Start a round if idle and both sides are ready
    pub fn initialize_combat(&mut self) -> bool {
        if self.is_active() || !self.both_ready() {
            return false;
        }
        let from_p1 = self.pending[Side::P1.index()].take().unwrap_or_default();
        let from_p2 = self.pending[Side::P2.index()].take().unwrap_or_default();
        self.combined = combine(from_p1, from_p2);
        self.index = 0;
        self.switch_counter = 0;
        self.phase = CombatPhase::Highlighting;
        self.hit = [false; 2];
        self.vulnerable = [true; 2];
        self.hit_counters = [self.hit_cooldown; 2];
        self.overlay = None;
        log::info!("Round started: {} frames", self.combined.len());
        true
    }

    /// Advance one frame. `positions` are the players' absolute grid cells,
    /// indexed by `Side::index`.
    pub fn tick(&mut self, positions: [GridPos; 2]) -> CombatTick {
        self.hit = [false; 2];
        let mut out = CombatTick::default();
        match self.phase {
            CombatPhase::Idle => {}
            CombatPhase::Highlighting => self.highlight(&mut out),
            CombatPhase::Hitting => self.hit_step(positions, &mut out),
        }
        out
    }

    /// Whether the next `tick` resolves a live frame
    pub fn advances_next_tick(&self) -> bool {
        self.phase == CombatPhase::Hitting && self.switch_counter + 1 >= self.switch_interval
    }

    fn highlight(&mut self, out: &mut CombatTick) {
        if self.index >= self.combined.len() {
            log::warn!("Highlight index {} out of range, ending round", self.index);
            self.finish_round(out);
            return;
        }
        if self.index == 0 {
            out.events.push(CombatEvent::RoundStarted);
        }
        let overlay = Overlay::Highlight(self.combined.merge(self.index));
        self.overlay = Some(overlay);
        out.frame = Some(overlay);
        self.index += 1;

        if self.index >= self.combined.len() {
            self.phase = CombatPhase::Hitting;
            self.index = 0;
            self.switch_counter = 0;
            self.overlay = None;
            out.events.push(CombatEvent::HitPhaseStarted);
            log::debug!("Telegraph done, entering hit phase");
        }
    }

    fn hit_step(&mut self, positions: [GridPos; 2], out: &mut CombatTick) {
        self.switch_counter += 1;
        if self.switch_counter < self.switch_interval {
            return;
        }
        self.switch_counter = 0;

        if self.index >= self.combined.len() {
            log::warn!("Hit index {} out of range, ending round", self.index);
            self.finish_round(out);
            return;
        }
        let overlay = Overlay::Hit(self.combined.merge(self.index));
        self.overlay = Some(overlay);
        out.frame = Some(overlay);

        self.update_vulnerability();
        self.check_for_hit(positions, out);
        self.index += 1;

        if self.index >= self.combined.len() {
            self.finish_round(out);
        }
    }

    fn update_vulnerability(&mut self) {
        for side in Side::BOTH {
            if self.hit_counters[side.index()] >= self.hit_cooldown {
                self.vulnerable[side.index()] = true;
            }
        }
    }

    fn check_for_hit(&mut self, positions: [GridPos; 2], out: &mut CombatTick) {
        for side in Side::BOTH {
            let i = side.index();
            let pos = positions[i];
            let threatened = self
                .combined
                .pattern(side, self.index)
                .get(pos.row, pos.col - side.col_offset());
            if threatened && self.vulnerable[i] {
                self.hit[i] = true;
                self.vulnerable[i] = false;
                // Counting starts with the next advance
                self.hit_counters[i] = 0;
                out.events.push(CombatEvent::Hit(side));
                log::debug!("{:?} hit at frame {} ({}, {})", side, self.index, pos.row, pos.col);
            } else {
                self.hit_counters[i] = self.hit_counters[i].saturating_add(1);
            }
        }
    }

    fn finish_round(&mut self, out: &mut CombatTick) {
        self.phase = CombatPhase::Idle;
        self.index = 0;
        self.switch_counter = 0;
        self.ready = [false; 2];
        self.overlay = None;
        self.combined = CombinedChain::default();
        out.events.push(CombatEvent::RoundComplete);
        log::info!("Round complete");
    }

    pub fn phase(&self) -> CombatPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != CombatPhase::Idle
    }

    pub fn is_ready(&self, side: Side) -> bool {
        self.ready[side.index()]
    }

    pub fn both_ready(&self) -> bool {
        self.ready.iter().all(|&r| r)
    }

    pub fn is_vulnerable(&self, side: Side) -> bool {
        self.vulnerable[side.index()]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn combined(&self) -> &CombinedChain {
        &self.combined
    }

    /// Overlay for the frame currently on screen
    pub fn current_overlay(&self) -> Option<Overlay> {
        self.overlay
    }

    pub fn flags(&self) -> CombatFlags {
        CombatFlags {
            highlighting: self.phase == CombatPhase::Highlighting,
            hitting: self.phase == CombatPhase::Hitting,
            p1_hit: self.hit[Side::P1.index()],
            p2_hit: self.hit[Side::P2.index()],
            p1_ready: self.ready[Side::P1.index()],
            p2_ready: self.ready[Side::P2.index()],
        }
    }
}
