use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::{MAX_NUMBER, MIN_NUMBER, Role};

/// Where the opponent's numbers and decisions come from.
pub trait RandomSource {
    /// Uniform draw from `MIN_NUMBER..=MAX_NUMBER`.
    fn next_number(&mut self) -> u8;

    /// Uniform draw from `{Bat, Bowl}`.
    fn next_role(&mut self) -> Role;
}

// Simple pseudorandom number generator using xorshift algorithm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PseudoRandom {
    state: u64,
}

impl PseudoRandom {
    pub fn new(seed: u64) -> Self {
        // Ensure we don't start with 0 state as xorshift doesn't work with 0
        let state = if seed == 0 { 0x1234567890abcdef } else { seed };
        PseudoRandom { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }
}

impl RandomSource for PseudoRandom {
    fn next_number(&mut self) -> u8 {
        let span = (MAX_NUMBER - MIN_NUMBER + 1) as u32;
        MIN_NUMBER + (self.next_u32() % span) as u8
    }

    fn next_role(&mut self) -> Role {
        if self.next_u32() >> 31 == 0 { Role::Bat } else { Role::Bowl }
    }
}

impl RandomSource for rand::rngs::StdRng {
    fn next_number(&mut self) -> u8 {
        self.gen_range(MIN_NUMBER..=MAX_NUMBER)
    }

    fn next_role(&mut self) -> Role {
        if self.gen_bool(0.5) { Role::Bat } else { Role::Bowl }
    }
}

/// Replays queued draws in order, then falls back to a seeded generator.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    numbers: VecDeque<u8>,
    roles: VecDeque<Role>,
    fallback: PseudoRandom,
}

impl ScriptedRandom {
    pub fn new(numbers: impl IntoIterator<Item = u8>) -> Self {
        ScriptedRandom {
            numbers: numbers.into_iter().collect(),
            roles: VecDeque::new(),
            fallback: PseudoRandom::new(0),
        }
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles.extend(roles);
        self
    }

    pub fn push_numbers(&mut self, numbers: impl IntoIterator<Item = u8>) {
        self.numbers.extend(numbers);
    }

    pub fn remaining(&self) -> usize {
        self.numbers.len() + self.roles.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn next_number(&mut self) -> u8 {
        self.numbers
            .pop_front()
            .unwrap_or_else(|| self.fallback.next_number())
    }

    fn next_role(&mut self) -> Role {
        self.roles
            .pop_front()
            .unwrap_or_else(|| self.fallback.next_role())
    }
}
