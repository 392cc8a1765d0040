pub mod choice;
pub mod innings;
pub mod result;
pub mod toss;
pub mod welcome;

pub use choice::ChoiceView;
pub use innings::InningsView;
pub use result::ResultView;
pub use toss::TossView;
pub use welcome::WelcomeView;

use crate::app::AppCommand;
use common::MatchState;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

/// One screen per match phase. Views turn keys into commands and draw the
/// state they are given; the engine stays the only owner of match state.
pub trait View {
    fn handle_input(&mut self, key: KeyEvent, state: &MatchState) -> Option<AppCommand>;
    fn render(&self, frame: &mut Frame, area: Rect, state: &MatchState);
}
