//! Match state: everything one match needs, owned in one place
//!
//! Resetting a match replaces the whole value; nothing is reset piecemeal.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bot::Bot;
use super::chip::{Chip, ChipSelection, Folder};
use super::combat::{CombatEvent, CombatFlags, CombatState, Overlay};
use super::player::{GridPos, MoveVector, Player, PlayerManager, Side};
use crate::catalog::ChipCatalog;
use crate::consts::CHIP_ORDER_LEN;
use crate::layout::StageLayout;
use crate::tuning::Tuning;

/// Where the match as a whole stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Waiting for chip orders
    ChipSelect,
    /// A round is playing out
    Combat,
    /// Player 2 ran out of health
    Victory,
    /// Player 1 ran out of health
    GameOver,
}

/// A point of damage dealt during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageEvent {
    pub side: Side,
    /// Health after the hit
    pub health: i32,
    /// This hit took the player to zero
    pub fatal: bool,
}

/// Starting cells (row 1, centre column of each half)
pub const P1_START: GridPos = GridPos::new(1, 1);
pub const P2_START: GridPos = GridPos::new(1, 4);

/// Complete state of one match
#[derive(Debug, Clone)]
pub struct MatchState {
    /// Match seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: MatchPhase,
    /// Paused matches ignore ticks except the unpause toggle
    pub paused: bool,
    /// Ticks processed while unpaused
    pub time_ticks: u64,
    /// Rounds completed
    pub rounds: u32,
    pub layout: StageLayout,
    pub(crate) players: [PlayerManager; 2],
    pub(crate) folders: [Folder; 2],
    /// Player 1's chip menu
    pub selection: ChipSelection,
    /// Scripted opponent on player 2's side
    pub(crate) bot: Bot,
    /// Stand-in driver for player 1 when autopilot is on
    pub(crate) autopilot: Bot,
    pub(crate) combat: CombatState,
    pub(crate) damage_events: Vec<DamageEvent>,
    pub(crate) events: Vec<CombatEvent>,
    /// Player 1's folder as handed in, kept for resets
    initial_folder: Folder,
}

impl MatchState {
    /// Build a fresh match. The opponent's folder is drawn at random from
    /// `catalog`; player 1 brings `player_folder`.
    pub fn new(
        seed: u64,
        catalog: &ChipCatalog,
        player_folder: Folder,
        tuning: Tuning,
        layout: StageLayout,
    ) -> Self {
        let tuning = tuning.sanitized();
        let mut rng = Pcg32::seed_from_u64(seed);
        let bot_folder = catalog.random_folder(&mut rng, tuning.folder_size);

        let mut players = [
            PlayerManager::new(Player::new(P1_START).with_health(tuning.max_health), Side::P1),
            PlayerManager::new(Player::new(P2_START).with_health(tuning.max_health), Side::P2),
        ];
        for pm in players.iter_mut() {
            pm.move_player(MoveVector::ZERO, &layout);
        }

        let mut folders = [player_folder.clone(), bot_folder];
        let mut selection = ChipSelection::new();
        selection.fill(&mut folders[Side::P1.index()]);

        log::info!(
            "Match initialized with seed {} ({} vs {} chips)",
            seed,
            folders[0].len(),
            folders[1].len()
        );

        Self {
            seed,
            phase: MatchPhase::ChipSelect,
            paused: false,
            time_ticks: 0,
            rounds: 0,
            layout,
            players,
            folders,
            selection,
            bot: Bot::new(Side::P2, &tuning, seed.wrapping_add(1)),
            autopilot: Bot::new(Side::P1, &tuning, seed.wrapping_add(2)),
            combat: CombatState::new(&tuning),
            damage_events: Vec::new(),
            events: Vec::new(),
            initial_folder: player_folder,
            tuning,
        }
    }

    /// Start over with the next seed, same folder and tuning
    pub fn reset(&mut self, catalog: &ChipCatalog) {
        *self = Self::new(
            self.seed.wrapping_add(1),
            catalog,
            self.initial_folder.clone(),
            self.tuning.clone(),
            self.layout,
        );
    }

    /// Hand in a side's chip order for the next round
    pub fn submit_chip_order(&mut self, side: Side, chip_order: &[Chip]) -> bool {
        if self.is_over() {
            return false;
        }
        if chip_order.len() > CHIP_ORDER_LEN {
            log::warn!(
                "{:?} chip order of {} chips rejected (max {})",
                side,
                chip_order.len(),
                CHIP_ORDER_LEN
            );
            return false;
        }
        self.combat.load_chip_order(side, chip_order)
    }

    /// Submit player 1's picks from the chip menu
    pub fn confirm_selection(&mut self) -> bool {
        if self.combat.is_active() || self.combat.is_ready(Side::P1) {
            return false;
        }
        let order = self.selection.confirm();
        self.submit_chip_order(Side::P1, &order)
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, MatchPhase::Victory | MatchPhase::GameOver)
    }

    pub fn winner(&self) -> Option<Side> {
        match self.phase {
            MatchPhase::Victory => Some(Side::P1),
            MatchPhase::GameOver => Some(Side::P2),
            _ => None,
        }
    }

    pub fn player(&self, side: Side) -> &Player {
        &self.players[side.index()].player
    }

    pub fn player_manager(&self, side: Side) -> &PlayerManager {
        &self.players[side.index()]
    }

    pub fn folder(&self, side: Side) -> &Folder {
        &self.folders[side.index()]
    }

    pub fn combat(&self) -> &CombatState {
        &self.combat
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    pub fn flags(&self) -> CombatFlags {
        self.combat.flags()
    }

    /// Overlay the stage should draw right now
    pub fn current_overlay(&self) -> Option<Overlay> {
        self.combat.current_overlay()
    }

    /// Damage dealt during the last tick
    pub fn damage_events(&self) -> &[DamageEvent] {
        &self.damage_events
    }

    /// Combat events raised during the last tick
    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    pub fn positions(&self) -> [GridPos; 2] {
        [
            self.players[0].player.position(),
            self.players[1].player.position(),
        ]
    }

    /// Window resized: recompute render anchors
    pub fn resize(&mut self, width: f32, height: f32) {
        self.layout.resize(width, height);
        for pm in self.players.iter_mut() {
            pm.move_player(MoveVector::ZERO, &self.layout);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SpeedMode;

    fn new_match(seed: u64) -> MatchState {
        let catalog = ChipCatalog::standard();
        let folder = Folder::from_ids(&catalog, &(0..15).collect::<Vec<u32>>()).unwrap();
        MatchState::new(
            seed,
            &catalog,
            folder,
            Tuning::default(),
            StageLayout::new(600.0, 700.0),
        )
    }

    #[test]
    fn test_new_match() {
        let state = new_match(1);
        assert_eq!(state.phase, MatchPhase::ChipSelect);
        assert_eq!(state.player(Side::P1).position(), P1_START);
        assert_eq!(state.player(Side::P2).position(), P2_START);
        assert_eq!(state.player(Side::P1).health(), 3);
        assert_eq!(state.folder(Side::P2).len(), 15);
        assert_eq!(state.selection.hand().len(), CHIP_ORDER_LEN);
        assert_eq!(
            state.player(Side::P2).render_anchor(),
            crate::GridMapper::render_anchor(&state.layout, P2_START)
        );
    }

    #[test]
    fn test_submit_rejects_oversized_order() {
        let mut state = new_match(1);
        let chips: Vec<Chip> = state.folder(Side::P1).iter().take(6).cloned().collect();
        assert!(!state.submit_chip_order(Side::P1, &chips));
        assert!(state.submit_chip_order(Side::P1, &chips[..5]));
        assert!(state.flags().p1_ready);
    }

    #[test]
    fn test_confirm_selection() {
        let mut state = new_match(1);
        assert!(state.selection.select(2, SpeedMode::Fast));
        assert!(state.confirm_selection());
        assert!(state.combat().is_ready(Side::P1));
        assert!(!state.confirm_selection());
        assert_eq!(state.selection.hand().len(), CHIP_ORDER_LEN - 1);
    }

    #[test]
    fn test_reset_rebuilds_everything() {
        let catalog = ChipCatalog::standard();
        let mut state = new_match(10);
        state.submit_chip_order(Side::P1, &[]);
        state.time_ticks = 99;
        state.reset(&catalog);
        assert_eq!(state.seed, 11);
        assert_eq!(state.time_ticks, 0);
        assert!(!state.flags().p1_ready);
        assert_eq!(state.folder(Side::P1).ids(), (0..15).skip(5).chain(0..5).collect::<Vec<u32>>());
    }
}
