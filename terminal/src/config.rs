use clap::Parser;
use common::{
    Timings, DEFAULT_DECISION_DELAY_MS, DEFAULT_ERROR_DISPLAY_MS, DEFAULT_FAST_DELAY_MS,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::time::Duration;

/// Every flag can also come from the environment or a `.env` file.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "handcricket",
    about = "Play hand cricket against the computer in your terminal"
)]
pub struct Config {
    /// Delay before the toss, dismissal, declaration and chase results take effect (ms)
    #[arg(long, env = "HANDCRICKET_FAST_DELAY_MS", default_value_t = DEFAULT_FAST_DELAY_MS)]
    pub fast_delay_ms: u64,

    /// Delay between the opponent announcing bat/bowl and the innings starting (ms)
    #[arg(long, env = "HANDCRICKET_DECISION_DELAY_MS", default_value_t = DEFAULT_DECISION_DELAY_MS)]
    pub decision_delay_ms: u64,

    /// How long input errors stay on screen (ms)
    #[arg(long, env = "HANDCRICKET_ERROR_DISPLAY_MS", default_value_t = DEFAULT_ERROR_DISPLAY_MS)]
    pub error_display_ms: u64,

    /// Seed for the opponent's draws. Random when unset.
    #[arg(long, env = "HANDCRICKET_SEED")]
    pub seed: Option<u64>,

    /// Where to write logs (the terminal itself is taken by the UI)
    #[arg(long, env = "HANDCRICKET_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// tracing filter directive, e.g. `debug` or `common=debug,terminal=info`
    #[arg(long, env = "HANDCRICKET_LOG", default_value = "info")]
    pub log_filter: String,
}

impl Config {
    pub fn timings(&self) -> Timings {
        Timings {
            fast_ms: self.fast_delay_ms,
            decision_ms: self.decision_delay_ms,
        }
    }

    pub fn error_display(&self) -> Duration {
        Duration::from_millis(self.error_display_ms)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("handcricket.log"))
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
