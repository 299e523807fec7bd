//! Terminal match-3 runner (default binary).
//!
//! Reads configuration from `MATCH3_*` environment variables, then runs a
//! fixed-rate frame loop: render, poll input until the next tick, tick.

use std::time::{Duration, Instant};

use anyhow::Result;

use tui_match3::core::GameSnapshot;
use tui_match3::engine::{Journal, Session, SessionConfig};
use tui_match3::input::{InputSource, TerminalInput};
use tui_match3::store::JsonFileStore;
use tui_match3::term::{GameView, Surface, TerminalSurface, Theme, Viewport};

fn main() -> Result<()> {
    let config = SessionConfig::from_env();
    let mut notes: Vec<String> = Vec::new();

    let journal = match config.log_path.as_deref() {
        None => Journal::disabled(),
        Some(path) => Journal::open(path).unwrap_or_else(|e| {
            notes.push(format!("journal disabled: {}: {e}", path.display()));
            Journal::disabled()
        }),
    };

    let (theme, theme_err) = Theme::load_or_default(config.theme_path.as_deref());
    if let Some(e) = theme_err {
        notes.push(format!("using built-in theme: {e:#}"));
    }

    let store = JsonFileStore::new(config.profile_path.clone());
    let mut session = Session::new(&config, store, journal)?;

    let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut surface = TerminalSurface::new(w, h);
    surface.enter()?;

    let result = run(&config, &mut session, &mut surface, GameView::new(4, 2, theme));

    // Always try to restore terminal state.
    let _ = surface.exit();

    for note in &notes {
        eprintln!("[match3] {note}");
    }
    let profile = session.profile();
    eprintln!(
        "[match3] {} reached level {} with {} points (best {})",
        profile.name,
        session.game().level().level,
        session.game().total_score(),
        profile.highscore
    );
    result
}

fn run(
    config: &SessionConfig,
    session: &mut Session<JsonFileStore>,
    surface: &mut TerminalSurface,
    view: GameView,
) -> Result<()> {
    let mut input = TerminalInput::new();
    let mut snap = GameSnapshot::default();

    let frame_ms = config.frame_ms();
    let frame = Duration::from_millis(u64::from(frame_ms));
    let mut last_tick = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        surface.resize(w, h);
        session.snapshot_into(&mut snap);
        view.render(&snap, surface);
        surface.present()?;

        // Input with timeout until next tick.
        let layout = view.layout(Viewport::new(w, h));
        let timeout = frame.saturating_sub(last_tick.elapsed());
        for event in input.poll(timeout)? {
            session.handle_event(event, Some(&layout))?;
        }
        if session.is_quit() {
            return Ok(());
        }

        // Tick.
        if last_tick.elapsed() >= frame {
            last_tick = Instant::now();
            session.tick(frame_ms)?;
        }
    }
}
