//! Authoritative referee for heads-up no-limit hold'em bot matches.
//!
//! The engine is the single source of truth for game state. Each bot
//! process runs a mirrored copy of the same round state machine and keeps
//! it in lockstep by replaying the action deltas the engine sends, rather
//! than ever receiving a full state snapshot.

pub mod cards;
pub mod gameplay;
pub mod players;
pub mod protocol;
pub mod table;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Stack sizes, pips, and settlement deltas in chips.
pub type Chips = i32;
/// In-hand seat index. Seat 0 posts the small blind.
pub type Position = usize;

// ============================================================================
// GAME VARIANT PARAMETERS
// The variant is fixed; runtime knobs live in `table::Config`.
// ============================================================================
/// Number of seats in a hand.
pub const N: usize = 2;
/// Starting stack, restored at the top of every hand.
pub const STACK: Chips = 400;
/// Big blind amount.
pub const B_BLIND: Chips = 2;
/// Small blind amount.
pub const S_BLIND: Chips = 1;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
