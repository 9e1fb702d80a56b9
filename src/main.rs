//! Chain Strike entry point
//!
//! Headless native runner: plays one autopilot match and logs the outcome.
//! Usage: `chain-strike [catalog.json] [tuning.json]`

use chain_strike::consts::{FOLDER_SIZE, FRAME_MS};
use chain_strike::sim::{Folder, MatchState, TickInput, tick};
use chain_strike::{ChipCatalog, StageLayout, Tuning};

/// Give up after an hour of simulated play
const MAX_TICKS: u64 = 60 * 60 * 1000 / FRAME_MS;

fn run() -> chain_strike::Result<()> {
    let mut args = std::env::args().skip(1);

    let catalog = match args.next() {
        Some(path) => ChipCatalog::load(path)?,
        None => ChipCatalog::standard(),
    };
    let tuning_json = args.next().map(std::fs::read_to_string).transpose()?;
    let tuning = Tuning::load_or_default(tuning_json.as_deref());

    let ids: Vec<u32> = catalog.ids().take(FOLDER_SIZE).collect();
    let folder = Folder::from_ids(&catalog, &ids)?;

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let mut state = MatchState::new(seed, &catalog, folder, tuning, StageLayout::default());
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    while !state.is_over() && state.time_ticks < MAX_TICKS {
        tick(&mut state, &input);
    }

    match state.winner() {
        Some(side) => log::info!(
            "{:?} wins after {} rounds ({} ticks)",
            side,
            state.rounds,
            state.time_ticks
        ),
        None => log::warn!("No winner after {} ticks", state.time_ticks),
    }
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Chain Strike (headless) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
