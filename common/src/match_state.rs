use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Human,
    Opponent,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Human, Side::Opponent];

    pub fn other(self) -> Side {
        match self {
            Side::Human => Side::Opponent,
            Side::Opponent => Side::Human,
        }
    }

    fn index(self) -> usize {
        match self {
            Side::Human => 0,
            Side::Opponent => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Human => write!(f, "Human"),
            Side::Opponent => write!(f, "Opponent"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parity {
    Odd,
    Even,
}

impl Parity {
    pub fn of(total: u32) -> Parity {
        if total % 2 == 1 { Parity::Odd } else { Parity::Even }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parity::Odd => write!(f, "ODD"),
            Parity::Even => write!(f, "EVEN"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Bat,
    Bowl,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Bat => write!(f, "BAT"),
            Role::Bowl => write!(f, "BOWL"),
        }
    }
}

/// Which intents the engine currently accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Welcome,
    TossPending,
    ChoicePending,
    Innings,
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Player {
    pub score: u32,
    pub is_batting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TossState {
    pub choice: Option<Parity>,
    pub human_guess: Option<u8>,
    pub opponent_guess: Option<u8>,
    pub winner: Option<Side>,
}

impl TossState {
    pub fn total(&self) -> Option<u32> {
        Some(self.human_guess? as u32 + self.opponent_guess? as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Winner(Side),
    Tie,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Winner(side) => write!(f, "{} wins", side),
            Outcome::Tie => write!(f, "It's a tie"),
        }
    }
}

/// Authoritative state of a single match. Only the engine mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub phase: Phase,
    pub players: [Player; 2],
    pub toss: TossState,
    pub innings_number: u8,
    pub target: u32,
    pub first_innings_batsman: Option<Side>,
    pub selected_number: Option<u8>,
    pub turn_lock: bool,
    pub game_over: bool,
}

impl Default for MatchState {
    fn default() -> Self {
        MatchState {
            phase: Phase::Welcome,
            players: [Player::default(); 2],
            toss: TossState::default(),
            innings_number: 1,
            target: 0,
            first_innings_batsman: None,
            selected_number: None,
            turn_lock: false,
            game_over: false,
        }
    }
}

impl MatchState {
    pub fn player(&self, side: Side) -> &Player {
        &self.players[side.index()]
    }

    pub(crate) fn player_mut(&mut self, side: Side) -> &mut Player {
        &mut self.players[side.index()]
    }

    pub fn score(&self, side: Side) -> u32 {
        self.player(side).score
    }

    pub fn batting_side(&self) -> Option<Side> {
        Side::ALL
            .into_iter()
            .find(|side| self.player(*side).is_batting)
    }

    pub fn is_human_batting(&self) -> bool {
        self.player(Side::Human).is_batting
    }

    /// Runs the chasing side still needs to win. Only defined in the second innings.
    pub fn runs_needed(&self) -> Option<u32> {
        if self.innings_number != 2 || self.phase != Phase::Innings {
            return None;
        }
        let batting = self.batting_side()?;
        Some((self.target + 1).saturating_sub(self.score(batting)))
    }

    /// Score the chasing side has to reach: one more than the first-innings total.
    pub fn chase_target(&self) -> Option<u32> {
        (self.innings_number == 2).then_some(self.target + 1)
    }

    pub fn can_declare(&self) -> bool {
        self.phase == Phase::Innings
            && self.innings_number == 1
            && !self.turn_lock
            && self.is_human_batting()
            && self.score(Side::Human) > 0
    }

    pub fn outcome(&self) -> Option<Outcome> {
        if !self.game_over {
            return None;
        }
        let human = self.score(Side::Human);
        let opponent = self.score(Side::Opponent);
        Some(match human.cmp(&opponent) {
            std::cmp::Ordering::Greater => Outcome::Winner(Side::Human),
            std::cmp::Ordering::Less => Outcome::Winner(Side::Opponent),
            std::cmp::Ordering::Equal => Outcome::Tie,
        })
    }

    pub fn score_line(&self) -> String {
        format!(
            "Human:{}, Opponent:{}",
            self.score(Side::Human),
            self.score(Side::Opponent)
        )
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
