use anyhow::Result;
use common::{ManualScheduler, MatchEngine, MatchState, Phase, ScriptedRandom, Timings};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use std::time::Duration;
use terminal::app::{App, AppCommand};
use terminal::views::{ResultView, View};

type TestApp = App<ScriptedRandom, ManualScheduler>;

const FAST: Duration = Duration::from_millis(1000);

fn new_app(numbers: impl IntoIterator<Item = u8>) -> TestApp {
    let engine = MatchEngine::new(
        1,
        ScriptedRandom::new(numbers),
        ManualScheduler::new(),
        Timings::default(),
    );
    App::new(engine, Duration::from_millis(4000))
}

fn press(app: &mut TestApp, code: KeyCode) -> Result<()> {
    if let Some(command) = app.handle_input(KeyEvent::new(code, KeyModifiers::NONE)) {
        if command != AppCommand::Quit {
            app.handle_command(command)?;
        }
    }
    Ok(())
}

fn screen(app: &TestApp) -> Result<String> {
    let mut terminal = Terminal::new(TestBackend::new(110, 40))?;
    terminal.draw(|f| app.render(f))?;
    Ok(buffer_text(terminal.backend().buffer()))
}

fn buffer_text(buffer: &Buffer) -> String {
    buffer
        .content
        .chunks(buffer.area.width as usize)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_welcome_screen() -> Result<()> {
    let app = new_app([]);
    let text = screen(&app)?;
    assert!(text.contains("Welcome to Hand Cricket!"));
    assert!(text.contains("Enter: Start"));
    assert!(text.contains("Commentary (0)"));
    Ok(())
}

#[test]
fn test_error_banner_is_rendered() -> Result<()> {
    let mut app = new_app([]);
    press(&mut app, KeyCode::Enter)?;
    press(&mut app, KeyCode::Enter)?;

    let text = screen(&app)?;
    assert!(text.contains("Please select Odd or Even first!"));
    assert!(text.contains("o/e: Odd/Even"));
    Ok(())
}

#[test]
fn test_innings_screen_offers_declare_once_runs_are_scored() -> Result<()> {
    let mut app = new_app([4, 1]);
    press(&mut app, KeyCode::Enter)?;
    for c in "o3".chars() {
        press(&mut app, KeyCode::Char(c))?;
    }
    press(&mut app, KeyCode::Enter)?;
    app.advance(FAST)?;
    press(&mut app, KeyCode::Char('b'))?;

    let text = screen(&app)?;
    assert!(text.contains("Innings 1: You batting, AI bowling"));
    assert!(text.contains("BATTING"));
    assert!(!text.contains("d: Declare"));

    press(&mut app, KeyCode::Char('5'))?;
    press(&mut app, KeyCode::Enter)?;

    let text = screen(&app)?;
    assert!(text.contains("d: Declare"));
    assert!(text.contains("Press d to declare your innings"));
    assert!(text.contains("You scored 5 runs"));
    Ok(())
}

#[test]
fn test_tied_match_result_screen() -> Result<()> {
    // Toss 4, then both innings end on the first ball
    let mut app = new_app([4, 5, 1]);
    press(&mut app, KeyCode::Enter)?;
    for c in "o3".chars() {
        press(&mut app, KeyCode::Char(c))?;
    }
    press(&mut app, KeyCode::Enter)?;
    app.advance(FAST)?;
    press(&mut app, KeyCode::Char('b'))?;

    press(&mut app, KeyCode::Char('5'))?;
    press(&mut app, KeyCode::Enter)?;
    app.advance(FAST)?;

    let text = screen(&app)?;
    assert!(text.contains("Target to chase: 1"));

    press(&mut app, KeyCode::Char('1'))?;
    press(&mut app, KeyCode::Enter)?;
    app.advance(FAST)?;

    let text = screen(&app)?;
    assert!(text.contains("It's a Tie!"));
    assert!(text.contains("Enter: Play again"));
    Ok(())
}

#[test]
fn test_result_view_without_outcome_is_not_a_tie() -> Result<()> {
    let state = MatchState {
        phase: Phase::Result,
        ..MatchState::default()
    };
    let mut terminal = Terminal::new(TestBackend::new(60, 10))?;
    terminal.draw(|f| ResultView.render(f, f.area(), &state))?;

    let text = buffer_text(terminal.backend().buffer());
    assert!(text.contains("Full time"));
    assert!(!text.contains("Tie"));
    Ok(())
}
