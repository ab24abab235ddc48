//! Terminal blockfall runner (default binary).
//!
//! Owns the real-time loop: polls crossterm input with a timeout until
//! the next tick, feeds elapsed time into the game session, and flushes
//! frames through the diff renderer.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use blockfall::core::Game;
use blockfall::input::{handle_key_event, should_quit};
use blockfall::store::{ScoreRecord, ScoreStore};
use blockfall::term::{FrameBuffer, GameView, ScoreLine, TerminalRenderer, Viewport};
use blockfall::types::{GameConfig, GameEvent, TICK_MS, TOP_SCORES_CAP};

fn main() -> Result<()> {
    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer) -> Result<()> {
    let mut game = Game::new(GameConfig::default(), time_seed());
    let store = ScoreStore::at_default_path();
    let mut top_scores = load_score_lines(&store);

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&game, &top_scores, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(cmd) = handle_key_event(key) {
                        game.apply(cmd);
                    }
                }
                Event::Resize(..) => {
                    term.invalidate();
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            game.tick(TICK_MS);
        }

        if let Some(GameEvent::GameOver { score }) = game.take_last_event() {
            store.save(ScoreRecord::today(score));
            top_scores = load_score_lines(&store);
        }
    }
}

fn load_score_lines(store: &ScoreStore) -> Vec<ScoreLine> {
    store
        .load_top(TOP_SCORES_CAP)
        .into_iter()
        .map(|r| ScoreLine {
            score: r.score,
            date: r.date,
        })
        .collect()
}

fn time_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}
