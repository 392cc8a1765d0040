use super::View;
use crate::app::AppCommand;
use common::MatchState;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct WelcomeView;

impl View for WelcomeView {
    fn handle_input(&mut self, key: KeyEvent, _state: &MatchState) -> Option<AppCommand> {
        match key.code {
            KeyCode::Enter | KeyCode::Char('s') => Some(AppCommand::StartGame),
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, _state: &MatchState) {
        let lines = vec![
            Line::styled(
                "Welcome to Hand Cricket!",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Line::from(""),
            Line::from("Win the toss by calling odd or even on the sum of both numbers."),
            Line::from("Batting: you score the number you show, unless the AI shows the same one."),
            Line::from("Matching numbers means OUT. The second innings chases the first total."),
            Line::from(""),
            Line::from("Press Enter to start."),
        ];

        let welcome = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Welcome").borders(Borders::ALL));
        frame.render_widget(welcome, area);
    }
}
