use super::View;
use crate::app::AppCommand;
use crate::render::side_label;
use common::{MatchState, Outcome, Side};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct ResultView;

impl View for ResultView {
    fn handle_input(&mut self, key: KeyEvent, _state: &MatchState) -> Option<AppCommand> {
        match key.code {
            KeyCode::Enter => Some(AppCommand::Reset),
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, state: &MatchState) {
        let (headline, color) = match state.outcome() {
            Some(Outcome::Winner(Side::Human)) => ("You Win!", Color::Green),
            Some(Outcome::Winner(Side::Opponent)) => ("AI Wins!", Color::Red),
            Some(Outcome::Tie) => ("It's a Tie!", Color::Yellow),
            None => ("Full time", Color::Gray),
        };

        let lines = vec![
            Line::styled(headline, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Line::from(""),
            Line::from(format!(
                "{}: {} | {}: {}",
                side_label(Side::Human),
                state.score(Side::Human),
                side_label(Side::Opponent),
                state.score(Side::Opponent)
            )),
            Line::from(""),
            Line::from("Press Enter to play again."),
        ];

        let result = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().title("Result").borders(Borders::ALL));
        frame.render_widget(result, area);
    }
}
