use clap::Parser;

/// Runtime knobs for one match. The game variant itself (stacks, blinds)
/// is fixed at the crate level; everything here is operational: where the
/// bots live, how long we wait for them, and how much we let them say.
///
/// All timeouts are in seconds.
#[derive(Parser, Debug, Clone)]
#[command(name = "engine", about = "referee a heads-up no-limit match between two bots")]
pub struct Config {
    /// display name of the first player
    #[arg(long, default_value = "alpha")]
    pub name_1: String,
    /// display name of the second player
    #[arg(long, default_value = "beta")]
    pub name_2: String,
    /// endpoint of the first player's bot
    #[arg(long, default_value = "127.0.0.1:50051")]
    pub addr_1: String,
    /// endpoint of the second player's bot
    #[arg(long, default_value = "127.0.0.1:50052")]
    pub addr_2: String,
    /// hands to play
    #[arg(long, default_value_t = 1000)]
    pub rounds: usize,
    /// per-attempt timeout when establishing a connection
    #[arg(long, default_value_t = 4.0)]
    pub connect_timeout: f64,
    /// connection attempts before giving up for good
    #[arg(long, default_value_t = 5)]
    pub connect_retries: usize,
    /// per-attempt timeout for the readiness handshake
    #[arg(long, default_value_t = 5.0)]
    pub ready_timeout: f64,
    /// readiness attempts before treating the bot as a forfeit
    #[arg(long, default_value_t = 1)]
    pub ready_retries: usize,
    /// per-attempt timeout for one action request
    #[arg(long, default_value_t = 2.0)]
    pub action_timeout: f64,
    /// action request attempts before falling back to a fold
    #[arg(long, default_value_t = 2)]
    pub action_retries: usize,
    /// hard cap, in bytes, on each player's returned log
    #[arg(long, default_value_t = 1_000_000)]
    pub log_limit: usize,
    /// each player's decision budget for the whole match, in seconds
    #[arg(long, default_value_t = 300.0)]
    pub game_clock: f64,
    /// whether running out the game clock force-folds a player
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub enforce_clock: bool,
    /// where the audit trail goes
    #[arg(long, default_value = "logs/engine_log.csv")]
    pub csv: std::path::PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self::parse_from(["engine"])
    }
}
