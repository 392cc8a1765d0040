mod constants;
mod effects;
mod error;
mod input;
mod match_engine;
mod match_state;
mod scheduler;

pub mod util;

pub use constants::*;
pub use effects::*;
pub use error::*;
pub use input::*;
pub use match_engine::*;
pub use match_state::*;
pub use scheduler::*;
pub use util::{PseudoRandom, RandomSource, ScriptedRandom};
