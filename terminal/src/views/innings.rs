use super::View;
use crate::app::AppCommand;
use crate::render::side_label;
use common::{MatchState, Side, MAX_NUMBER, MIN_NUMBER};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct InningsView;

impl InningsView {
    // '0' stands in for 10 so every number is a single key.
    fn number_for_key(c: char) -> Option<u8> {
        match c.to_digit(10)? {
            0 => Some(10),
            d => Some(d as u8),
        }
    }
}

impl View for InningsView {
    fn handle_input(&mut self, key: KeyEvent, state: &MatchState) -> Option<AppCommand> {
        match key.code {
            KeyCode::Char('d') if state.can_declare() => Some(AppCommand::Declare),
            KeyCode::Char(c) => Self::number_for_key(c).map(AppCommand::SelectNumber),
            KeyCode::Enter => Some(AppCommand::PlayTurn),
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, state: &MatchState) {
        let batting = state.batting_side().unwrap_or(Side::Human);
        let mut lines = vec![Line::styled(
            format!(
                "Innings {}: {} batting, {} bowling",
                state.innings_number,
                side_label(batting),
                side_label(batting.other())
            ),
            Style::default().add_modifier(Modifier::BOLD),
        )];

        if let Some(target) = state.chase_target() {
            lines.push(Line::from(format!("Target to chase: {}", target)));
        }
        if let Some(needed) = state.runs_needed() {
            lines.push(Line::styled(
                format!("Runs needed: {}", needed),
                Style::default().fg(Color::Yellow),
            ));
        }
        lines.push(Line::from(""));

        let numbers: Vec<Span> = (MIN_NUMBER..=MAX_NUMBER)
            .flat_map(|n| {
                let label = format!(" {} ", n);
                let span = if state.selected_number == Some(n) {
                    Span::styled(label, Style::default().fg(Color::Black).bg(Color::Cyan))
                } else {
                    Span::raw(label)
                };
                [span, Span::raw(" ")]
            })
            .collect();
        lines.push(Line::from("Pick your number:"));
        lines.push(Line::from(numbers));
        lines.push(Line::from(""));

        if state.turn_lock {
            lines.push(Line::styled(
                "Waiting...",
                Style::default().fg(Color::DarkGray),
            ));
        } else if state.can_declare() {
            lines.push(Line::styled(
                "Press d to declare your innings",
                Style::default().fg(Color::Yellow),
            ));
        }

        let innings = Paragraph::new(lines)
            .block(Block::default().title("Play").borders(Borders::ALL));
        frame.render_widget(innings, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_key_picks_ten() {
        assert_eq!(InningsView::number_for_key('0'), Some(10));
        assert_eq!(InningsView::number_for_key('7'), Some(7));
        assert_eq!(InningsView::number_for_key('x'), None);
    }
}
