use anyhow::{Context, Result, anyhow};
use clap::Parser;
use common::{
    DEFAULT_DECISION_DELAY_MS, DEFAULT_FAST_DELAY_MS, MAX_NUMBER, MIN_NUMBER, ManualScheduler,
    MatchEngine, Notice, Outcome, Parity, Phase, RandomSource, Role, Side, Timings,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::{debug, error, info};

/// Hard stop for a single match. Real matches end long before this.
const MAX_TURNS: usize = 10_000;

#[derive(Parser, Debug)]
#[command(
    name = "handcricket-bot",
    about = "Play hand cricket matches headlessly with a random player on the human side"
)]
struct Args {
    /// Number of bots to run concurrently
    #[arg(long, default_value_t = 1)]
    bots: usize,

    /// Number of matches each bot should play sequentially
    #[arg(long, default_value_t = 1)]
    games: usize,

    /// Base seed; bot N uses seed + N. Random when unset.
    #[arg(long)]
    seed: Option<u64>,

    /// Declare the first innings once the human side reaches this score
    #[arg(long)]
    declare_at: Option<u32>,

    /// Virtual delay for toss, dismissal, declaration and chase results (ms)
    #[arg(long, default_value_t = DEFAULT_FAST_DELAY_MS)]
    fast_delay_ms: u64,

    /// Virtual delay after the opponent announces bat/bowl (ms)
    #[arg(long, default_value_t = DEFAULT_DECISION_DELAY_MS)]
    decision_delay_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MatchSummary {
    outcome: Outcome,
    human_score: u32,
    opponent_score: u32,
    turns: usize,
    elapsed: Duration,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Tally {
    human: usize,
    opponent: usize,
    ties: usize,
}

impl Tally {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Winner(Side::Human) => self.human += 1,
            Outcome::Winner(Side::Opponent) => self.opponent += 1,
            Outcome::Tie => self.ties += 1,
        }
    }

    fn merge(&mut self, other: Tally) {
        self.human += other.human;
        self.opponent += other.opponent;
        self.ties += other.ties;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let args = Args::parse();
    let base_seed = args.seed.unwrap_or_else(rand::random);
    let timings = Timings {
        fast_ms: args.fast_delay_ms,
        decision_ms: args.decision_delay_ms,
    };

    info!(
        "Starting {} bot(s), {} match(es) each, base seed {}",
        args.bots, args.games, base_seed
    );

    let mut handles = Vec::new();
    for idx in 0..args.bots {
        let games = args.games;
        let declare_at = args.declare_at;
        let seed = base_seed.wrapping_add(idx as u64);

        let handle =
            tokio::task::spawn_blocking(move || run_bot(idx, games, seed, timings, declare_at));
        handles.push(handle);
    }

    let mut total = Tally::default();
    for (idx, handle) in handles.into_iter().enumerate() {
        match handle.await.context("bot task panicked")? {
            Ok(tally) => total.merge(tally),
            Err(err) => error!("Bot {} failed: {:#}", idx + 1, err),
        }
    }

    info!(
        "Done: human won {}, opponent won {}, {} tie(s)",
        total.human, total.opponent, total.ties
    );
    Ok(())
}

fn run_bot(
    idx: usize,
    games: usize,
    seed: u64,
    timings: Timings,
    declare_at: Option<u32>,
) -> Result<Tally> {
    let mut player = StdRng::seed_from_u64(seed);
    let opponent = StdRng::seed_from_u64(seed.rotate_left(32));
    let mut engine = MatchEngine::new(idx as u32 + 1, opponent, ManualScheduler::new(), timings);
    let mut tally = Tally::default();

    for game in 0..games {
        engine.reset();
        let summary = play_match(&mut engine, &mut player, declare_at)
            .with_context(|| format!("bot {} match {}", idx + 1, game + 1))?;
        info!(
            "Bot {} match {}: {} ({}-{}) in {} turns, {:?} of delays",
            idx + 1,
            game + 1,
            summary.outcome,
            summary.human_score,
            summary.opponent_score,
            summary.turns,
            summary.elapsed
        );
        tally.record(summary.outcome);
    }

    Ok(tally)
}

/// Play one match to the result screen, picking for the human side at random.
fn play_match<R: RandomSource>(
    engine: &mut MatchEngine<R, ManualScheduler>,
    player: &mut StdRng,
    declare_at: Option<u32>,
) -> Result<MatchSummary> {
    let started = engine.scheduler().now();

    log_notices(engine.start_game()?.notices);
    let call = if player.gen_bool(0.5) { Parity::Odd } else { Parity::Even };
    engine.select_parity(call)?;
    let guess = player.gen_range(MIN_NUMBER..=MAX_NUMBER);
    log_notices(engine.submit_toss(Some(call), i64::from(guess))?.notices);
    settle(engine)?;

    if engine.state().phase == Phase::ChoicePending {
        let role = if player.gen_bool(0.5) { Role::Bat } else { Role::Bowl };
        log_notices(engine.choose_role(role)?.notices);
    }

    let mut turns = 0;
    while !engine.state().game_over {
        if turns == MAX_TURNS {
            return Err(anyhow!("match did not finish after {} turns", MAX_TURNS));
        }

        let state = engine.state();
        let declare =
            declare_at.is_some_and(|at| state.can_declare() && state.score(Side::Human) >= at);
        if declare {
            log_notices(engine.declare_innings()?.notices);
        } else {
            let pick = player.gen_range(MIN_NUMBER..=MAX_NUMBER);
            engine.select_number(i64::from(pick))?;
            log_notices(engine.play_turn()?.notices);
            turns += 1;
        }
        settle(engine)?;
    }

    let state = engine.state();
    let outcome = state
        .outcome()
        .ok_or_else(|| anyhow!("match over without an outcome"))?;
    Ok(MatchSummary {
        outcome,
        human_score: state.score(Side::Human),
        opponent_score: state.score(Side::Opponent),
        turns,
        elapsed: engine.scheduler().now().saturating_sub(started),
    })
}

fn settle<R: RandomSource>(engine: &mut MatchEngine<R, ManualScheduler>) -> Result<()> {
    for effects in engine.settle()? {
        log_notices(effects.notices);
    }
    Ok(())
}

fn log_notices(notices: Vec<Notice>) {
    for notice in notices {
        debug!("{}", notice);
    }
}
