use common::{Notice, Outcome, Side};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::collections::VecDeque;

use super::scoreboard::side_label;

pub fn notice_style(notice: &Notice) -> Style {
    match notice {
        Notice::Dismissal { .. } => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        Notice::Safe { .. } => Style::default().fg(Color::Green),
        Notice::Declared { .. } => Style::default().fg(Color::Yellow),
        Notice::MatchFinished { outcome, .. } => {
            let color = match outcome {
                Outcome::Winner(Side::Human) => Color::Green,
                Outcome::Winner(Side::Opponent) => Color::Red,
                Outcome::Tie => Color::Yellow,
            };
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        }
        Notice::TossRevealed { winner: Side::Human, .. } => Style::default().fg(Color::Green),
        Notice::TossRevealed { .. } => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::Cyan),
    }
}

/// Notice text as the player reads it ("You" and "AI" rather than sides).
pub fn describe(notice: &Notice) -> String {
    match notice {
        Notice::MatchStarted => "Call odd or even, then pick a number for the toss.".to_string(),
        Notice::TossRevealed { human_guess, opponent_guess, total, parity, winner } => format!(
            "You {} | AI {} | Total {} ({}). {}",
            human_guess,
            opponent_guess,
            total,
            parity,
            match winner {
                Side::Human => "You won the toss!",
                Side::Opponent => "AI won the toss!",
            }
        ),
        Notice::TossWonChooseRole => "You won the toss! Choose your action.".to_string(),
        Notice::OpponentChoseRole { role } => format!("AI chose to {} first!", role),
        Notice::InningsStarted { innings: 1, batting: Side::Human, .. } => {
            "First Innings: You are batting first!".to_string()
        }
        Notice::InningsStarted { innings: 1, .. } => {
            "First Innings: You are bowling first! (AI is batting)".to_string()
        }
        Notice::InningsStarted { batting, target, .. } => format!(
            "Second Innings: {} batting, target to chase {}",
            side_label(*batting),
            target.map(|t| t + 1).unwrap_or_default()
        ),
        Notice::Dismissal { human_number, opponent_number, batsman } => format!(
            "OUT! You {} | AI {}. Numbers matched - {} out!",
            human_number,
            opponent_number,
            match batsman {
                Side::Human => "You are",
                Side::Opponent => "AI is",
            }
        ),
        Notice::Safe { human_number, opponent_number, batsman, runs } => format!(
            "Safe! You {} | AI {}. {} scored {} run{}",
            human_number,
            opponent_number,
            side_label(*batsman),
            runs,
            if *runs == 1 { "" } else { "s" }
        ),
        Notice::Declared { score } => {
            format!("DECLARED! You ended your innings at {} runs", score)
        }
        Notice::MatchFinished { outcome, human_score, opponent_score } => format!(
            "{} You: {} | AI: {}",
            match outcome {
                Outcome::Winner(Side::Human) => "You Win!",
                Outcome::Winner(Side::Opponent) => "AI Wins!",
                Outcome::Tie => "It's a Tie!",
            },
            human_score,
            opponent_score
        ),
    }
}

pub fn notice_log(notices: &VecDeque<Notice>) -> Paragraph<'static> {
    let lines: Vec<Line> = notices
        .iter()
        .rev()
        .map(|notice| Line::from(Span::styled(describe(notice), notice_style(notice))))
        .collect();

    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(format!("Commentary ({})", notices.len()))
                .borders(Borders::ALL),
        )
}

/// Error takes precedence over the latest notice.
pub fn message_banner(latest: Option<&Notice>, error: Option<&str>) -> Paragraph<'static> {
    let line = match (error, latest) {
        (Some(error), _) => Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::White).bg(Color::Red),
        )),
        (None, Some(notice)) => Line::from(Span::styled(describe(notice), notice_style(notice))),
        (None, None) => Line::from(""),
    };

    Paragraph::new(line).block(Block::default().borders(Borders::ALL))
}
