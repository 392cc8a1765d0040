use anyhow::Result;
use common::{
    parse_number, ContinuationId, Effects, ManualScheduler, MatchEngine, MatchError, MatchState,
    Notice, Parity, Phase, RandomSource, Role, Scheduler, ValidationError,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, warn};

use crate::render::{controls, header, message_banner, notice_log, scoreboard};
use crate::views::{ChoiceView, InningsView, ResultView, TossView, View, WelcomeView};

const NOTICE_LOG_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Quit,
    StartGame,
    SelectParity(Parity),
    SubmitToss(String),
    ChooseRole(Role),
    SelectNumber(u8),
    PlayTurn,
    Declare,
    Reset,
}

/// Transient input error shown until its time runs out.
#[derive(Debug, Clone)]
pub struct ErrorBanner {
    pub message: String,
    pub remaining: Duration,
}

pub struct App<R: RandomSource, S: Scheduler> {
    engine: MatchEngine<R, S>,
    notices: VecDeque<Notice>,
    error: Option<ErrorBanner>,
    error_display: Duration,
    welcome: WelcomeView,
    toss: TossView,
    choice: ChoiceView,
    innings: InningsView,
    result: ResultView,
}

impl<R: RandomSource, S: Scheduler> App<R, S> {
    pub fn new(engine: MatchEngine<R, S>, error_display: Duration) -> Self {
        Self {
            engine,
            notices: VecDeque::new(),
            error: None,
            error_display,
            welcome: WelcomeView,
            toss: TossView::default(),
            choice: ChoiceView,
            innings: InningsView,
            result: ResultView,
        }
    }

    pub fn state(&self) -> &MatchState {
        self.engine.state()
    }

    pub fn engine(&self) -> &MatchEngine<R, S> {
        &self.engine
    }

    pub fn notices(&self) -> &VecDeque<Notice> {
        &self.notices
    }

    pub fn error(&self) -> Option<&ErrorBanner> {
        self.error.as_ref()
    }

    pub fn toss_input(&self) -> &str {
        self.toss.guess()
    }

    pub fn handle_input(&mut self, key: KeyEvent) -> Option<AppCommand> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(AppCommand::Quit);
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Some(AppCommand::Quit),
            KeyCode::Char('r') => return Some(AppCommand::Reset),
            _ => {}
        }

        let state = self.engine.state();
        match state.phase {
            Phase::Welcome => self.welcome.handle_input(key, state),
            Phase::TossPending => self.toss.handle_input(key, state),
            Phase::ChoicePending => self.choice.handle_input(key, state),
            Phase::Innings => self.innings.handle_input(key, state),
            Phase::Result => self.result.handle_input(key, state),
        }
    }

    /// Counts down the error banner.
    pub fn update(&mut self, dt: Duration) {
        if let Some(banner) = &mut self.error {
            banner.remaining = banner.remaining.saturating_sub(dt);
            if banner.remaining.is_zero() {
                self.error = None;
            }
        }
    }

    pub fn handle_command(&mut self, command: AppCommand) -> Result<()> {
        debug!(?command, "handling command");
        let result = match command {
            AppCommand::Quit => return Ok(()),
            AppCommand::StartGame => self.engine.start_game(),
            AppCommand::SelectParity(parity) => self.engine.select_parity(parity).map(|_| {
                self.error = None;
                Effects::none()
            }),
            AppCommand::SubmitToss(text) => self.submit_toss(&text),
            AppCommand::ChooseRole(role) => self.engine.choose_role(role),
            AppCommand::SelectNumber(number) => self
                .engine
                .select_number(number as i64)
                .map(|_| Effects::none()),
            AppCommand::PlayTurn => self.engine.play_turn(),
            AppCommand::Declare => self.engine.declare_innings(),
            AppCommand::Reset => {
                self.reset();
                Ok(Effects::none())
            }
        };

        match result {
            Ok(effects) => {
                if !effects.notices.is_empty() {
                    self.error = None;
                }
                self.record(effects);
            }
            Err(err) => self.report(err),
        }
        Ok(())
    }

    /// Deliver an elapsed continuation to the engine.
    pub fn resume(&mut self, id: ContinuationId) {
        match self.engine.resume(id) {
            Ok(effects) => self.record(effects),
            Err(err) => self.report(err),
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let state = self.engine.state();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(4), // Scoreboard
                Constraint::Min(10),   // Phase view + notice log
                Constraint::Length(3), // Latest notice / error
                Constraint::Length(3), // Controls
            ])
            .split(frame.area());

        frame.render_widget(header(state), chunks[0]);
        frame.render_widget(scoreboard(state), chunks[1]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[2]);

        match state.phase {
            Phase::Welcome => self.welcome.render(frame, body[0], state),
            Phase::TossPending => self.toss.render(frame, body[0], state),
            Phase::ChoicePending => self.choice.render(frame, body[0], state),
            Phase::Innings => self.innings.render(frame, body[0], state),
            Phase::Result => self.result.render(frame, body[0], state),
        }
        frame.render_widget(notice_log(&self.notices), body[1]);

        let banner = message_banner(
            self.notices.back(),
            self.error.as_ref().map(|e| e.message.as_str()),
        );
        frame.render_widget(banner, chunks[3]);
        frame.render_widget(controls(state), chunks[4]);
    }

    fn submit_toss(&mut self, text: &str) -> Result<Effects, MatchError> {
        let choice = self.engine.state().toss.choice;
        match parse_number(text) {
            Ok(guess) => self.engine.submit_toss(choice, guess as i64),
            Err(_) if choice.is_none() => Err(ValidationError::MissingChoice.into()),
            Err(err) => Err(err.into()),
        }
    }

    fn reset(&mut self) {
        self.engine.reset();
        self.notices.clear();
        self.error = None;
        self.toss = TossView::default();
    }

    fn record(&mut self, effects: Effects) {
        if let Some(scheduled) = effects.scheduled {
            debug!(id = %scheduled.id, tier = ?scheduled.tier, "continuation scheduled");
        }
        for notice in effects.notices {
            if self.notices.len() == NOTICE_LOG_LIMIT {
                self.notices.pop_front();
            }
            self.notices.push_back(notice);
        }
    }

    fn report(&mut self, err: MatchError) {
        if err.is_user_facing() {
            self.error = Some(ErrorBanner {
                message: err.to_string(),
                remaining: self.error_display,
            });
        } else {
            warn!(error = %err, "intent dropped");
        }
    }
}

impl<R: RandomSource> App<R, ManualScheduler> {
    /// Drive the virtual clock forward. Used when running without a real timer.
    pub fn advance(&mut self, by: Duration) -> Result<()> {
        for effects in self.engine.advance(by)? {
            self.record(effects);
        }
        Ok(())
    }
}
