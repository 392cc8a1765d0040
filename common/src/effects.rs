use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::{DEFAULT_DECISION_DELAY_MS, DEFAULT_FAST_DELAY_MS, Outcome, Parity, Role, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContinuationId(pub u64);

impl fmt::Display for ContinuationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelayTier {
    Fast,
    Decision,
}

/// Delay magnitudes for each tier. No match logic depends on the exact values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    pub fast_ms: u64,
    pub decision_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Timings {
            fast_ms: DEFAULT_FAST_DELAY_MS,
            decision_ms: DEFAULT_DECISION_DELAY_MS,
        }
    }
}

impl Timings {
    pub fn delay(&self, tier: DelayTier) -> Duration {
        match tier {
            DelayTier::Fast => Duration::from_millis(self.fast_ms),
            DelayTier::Decision => Duration::from_millis(self.decision_ms),
        }
    }
}

/// Work the engine resumes once its delay has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Continuation {
    RevealTossOutcome,
    ApplyOpponentRole(Role),
    EndInnings,
    FinishChase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheduled {
    pub id: ContinuationId,
    pub tier: DelayTier,
}

/// Something the presentation layer should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    MatchStarted,
    TossRevealed {
        human_guess: u8,
        opponent_guess: u8,
        total: u32,
        parity: Parity,
        winner: Side,
    },
    TossWonChooseRole,
    OpponentChoseRole {
        role: Role,
    },
    InningsStarted {
        innings: u8,
        batting: Side,
        target: Option<u32>,
    },
    Dismissal {
        human_number: u8,
        opponent_number: u8,
        batsman: Side,
    },
    Safe {
        human_number: u8,
        opponent_number: u8,
        batsman: Side,
        runs: u32,
    },
    Declared {
        score: u32,
    },
    MatchFinished {
        outcome: Outcome,
        human_score: u32,
        opponent_score: u32,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::MatchStarted => write!(f, "Match started. Pick odd or even for the toss."),
            Notice::TossRevealed { human_guess, opponent_guess, total, parity, winner } => write!(
                f,
                "Toss: {} + {} = {} ({}). {} won the toss!",
                human_guess, opponent_guess, total, parity, winner
            ),
            Notice::TossWonChooseRole => write!(f, "You won the toss! Choose to bat or bowl."),
            Notice::OpponentChoseRole { role } => write!(f, "Opponent chose to {} first!", role),
            Notice::InningsStarted { innings, batting, target } => match target {
                Some(target) => write!(
                    f,
                    "Innings {}: {} batting, target to chase {}",
                    innings,
                    batting,
                    target + 1
                ),
                None => write!(f, "Innings {}: {} batting first", innings, batting),
            },
            Notice::Dismissal { human_number, opponent_number, batsman } => write!(
                f,
                "OUT! {} vs {}. Numbers matched, {} is out!",
                human_number, opponent_number, batsman
            ),
            Notice::Safe { human_number, opponent_number, batsman, runs } => write!(
                f,
                "Safe! {} vs {}. {} scored {} run{}",
                human_number,
                opponent_number,
                batsman,
                runs,
                if *runs == 1 { "" } else { "s" }
            ),
            Notice::Declared { score } => {
                write!(f, "DECLARED! Innings ended at {} runs", score)
            }
            Notice::MatchFinished { outcome, human_score, opponent_score } => write!(
                f,
                "{}! Human:{}, Opponent:{}",
                outcome, human_score, opponent_score
            ),
        }
    }
}

/// What a single engine operation produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effects {
    pub notices: Vec<Notice>,
    pub scheduled: Option<Scheduled>,
}

impl Effects {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn notice(notice: Notice) -> Self {
        Effects {
            notices: vec![notice],
            scheduled: None,
        }
    }

    pub fn then(mut self, scheduled: Scheduled) -> Self {
        self.scheduled = Some(scheduled);
        self
    }
}
