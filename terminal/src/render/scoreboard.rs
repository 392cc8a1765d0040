use common::{MatchState, Phase, Side};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub fn header(state: &MatchState) -> Paragraph<'static> {
    let title = match state.phase {
        Phase::Welcome => "Hand Cricket".to_string(),
        Phase::TossPending | Phase::ChoicePending => "Hand Cricket | Toss".to_string(),
        Phase::Innings => match state.runs_needed() {
            Some(needed) => format!(
                "Hand Cricket | Innings 2 | {} need{} {} more run{}",
                side_label(state.batting_side().unwrap_or(Side::Human)),
                if state.is_human_batting() { "" } else { "s" },
                needed,
                if needed == 1 { "" } else { "s" }
            ),
            None => format!("Hand Cricket | Innings {}", state.innings_number),
        },
        Phase::Result => "Hand Cricket | Full time".to_string(),
    };

    Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
}

pub fn scoreboard(state: &MatchState) -> Paragraph<'static> {
    let lines: Vec<Line> = Side::ALL
        .into_iter()
        .map(|side| {
            let (badge, color) = badge(state, side);
            Line::from(vec![
                Span::styled(
                    format!("{:<10}", side_label(side)),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("{:>4}  ", state.score(side))),
                Span::styled(badge, Style::default().fg(color)),
            ])
        })
        .collect();

    let title = match state.chase_target() {
        Some(target) if state.phase == Phase::Innings => format!("Score | Target to chase: {}", target),
        _ => "Score".to_string(),
    };

    Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL))
}

pub fn controls(state: &MatchState) -> Paragraph<'static> {
    let hint = match state.phase {
        Phase::Welcome => "Enter: Start | q: Quit",
        Phase::TossPending => "o/e: Odd/Even | 1-10: Guess | Enter: Toss | r: Reset | q: Quit",
        Phase::ChoicePending => "b: Bat | w: Bowl | r: Reset | q: Quit",
        Phase::Innings if state.can_declare() => {
            "1-9, 0=10: Pick | Enter: Play | d: Declare | r: Reset | q: Quit"
        }
        Phase::Innings => "1-9, 0=10: Pick | Enter: Play | r: Reset | q: Quit",
        Phase::Result => "Enter: Play again | q: Quit",
    };

    Paragraph::new(hint)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
}

pub fn side_label(side: Side) -> &'static str {
    match side {
        Side::Human => "You",
        Side::Opponent => "AI",
    }
}

fn badge(state: &MatchState, side: Side) -> (&'static str, Color) {
    if state.phase != Phase::Innings {
        return ("Ready", Color::Gray);
    }
    if state.player(side).is_batting {
        ("BATTING", Color::Green)
    } else {
        ("BOWLING", Color::Yellow)
    }
}
