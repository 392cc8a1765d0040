use super::View;
use crate::app::AppCommand;
use common::{MatchState, Role};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct ChoiceView;

impl View for ChoiceView {
    fn handle_input(&mut self, key: KeyEvent, _state: &MatchState) -> Option<AppCommand> {
        match key.code {
            KeyCode::Char('b') => Some(AppCommand::ChooseRole(Role::Bat)),
            KeyCode::Char('w') => Some(AppCommand::ChooseRole(Role::Bowl)),
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, _state: &MatchState) {
        let lines = vec![
            Line::styled(
                "You won the toss! Choose your action:",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Line::from(""),
            Line::from("[b] Bat first      [w] Bowl first"),
        ];

        let choice = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().title("Bat or Bowl").borders(Borders::ALL));
        frame.render_widget(choice, area);
    }
}
