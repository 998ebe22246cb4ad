use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use hilo_shared::Direction;

#[derive(Parser, Debug, Clone)]
#[command(name = "hilo", version, about = "Play Higher/Lower in the terminal", long_about = None)]
pub struct PlayCli {
    /// Path to config file (shared with hilo-server)
    #[arg(long, default_value = "hilo.toml")]
    pub config: PathBuf,

    /// Never call the remote card API; draw cards locally
    #[arg(long, default_value_t = false)]
    pub offline: bool,

    /// Seed for the local card supply
    #[arg(long)]
    pub seed: Option<u64>,

    /// How long the guessed card stays face down before it is turned (ms)
    #[arg(long, default_value_t = 600)]
    pub reveal_ms: u64,

    /// Show the instructions even if they were seen before
    #[arg(long, default_value_t = false)]
    pub instructions: bool,

    /// Verbose logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Guess(Direction),
    Draw,
    Restart,
    State,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h" | "higher" | "+" => Ok(Command::Guess(Direction::Higher)),
            "l" | "lower" | "-" => Ok(Command::Guess(Direction::Lower)),
            "d" | "draw" | "retry" => Ok(Command::Draw),
            "r" | "restart" | "new" => Ok(Command::Restart),
            "s" | "state" | "" => Ok(Command::State),
            "?" | "help" => Ok(Command::Help),
            "q" | "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command '{}', type ? for help", other)),
        }
    }
}
