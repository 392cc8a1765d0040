use super::View;
use crate::app::AppCommand;
use common::{MatchState, Parity};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const MAX_GUESS_CHARS: usize = 2;

#[derive(Debug, Default)]
pub struct TossView {
    guess: String,
}

impl TossView {
    pub fn guess(&self) -> &str {
        &self.guess
    }
}

impl View for TossView {
    fn handle_input(&mut self, key: KeyEvent, state: &MatchState) -> Option<AppCommand> {
        // Toss already submitted, waiting for the reveal
        if state.turn_lock {
            return None;
        }
        match key.code {
            KeyCode::Char('o') => Some(AppCommand::SelectParity(Parity::Odd)),
            KeyCode::Char('e') => Some(AppCommand::SelectParity(Parity::Even)),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if self.guess.len() < MAX_GUESS_CHARS {
                    self.guess.push(c);
                }
                None
            }
            KeyCode::Backspace => {
                self.guess.pop();
                None
            }
            KeyCode::Enter => Some(AppCommand::SubmitToss(self.guess.clone())),
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, state: &MatchState) {
        let selected = Style::default().fg(Color::Black).bg(Color::Cyan);
        let parity_span = |parity: Parity, label: &'static str| {
            if state.toss.choice == Some(parity) {
                Span::styled(label, selected)
            } else {
                Span::raw(label)
            }
        };

        let mut lines = vec![
            Line::from(vec![
                Span::raw("Your call: "),
                parity_span(Parity::Odd, " ODD "),
                Span::raw("  "),
                parity_span(Parity::Even, " EVEN "),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::raw("Your number (1-10): "),
                Span::styled(
                    format!("{:_<2}", self.guess),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        if let (Some(human), Some(ai), Some(total)) = (
            state.toss.human_guess,
            state.toss.opponent_guess,
            state.toss.total(),
        ) {
            lines.push(Line::from(""));
            lines.push(Line::from(format!(
                "You {}  |  AI {}  |  Total {} ({})",
                human,
                ai,
                total,
                Parity::of(total)
            )));
            if state.turn_lock {
                lines.push(Line::styled("Revealing...", Style::default().fg(Color::DarkGray)));
            }
        }

        let toss = Paragraph::new(lines).block(Block::default().title("Toss").borders(Borders::ALL));
        frame.render_widget(toss, area);
    }
}
