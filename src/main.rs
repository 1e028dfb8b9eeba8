//! Swap'em terminal runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from `swapem-term`.
//! The remote adapter runs alongside unless `SWAPEM_AI_DISABLED` is set.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{info, warn};

use swapem::adapter::{Adapter, InboundPayload};
use swapem::core::{GameSession, SeededRng};
use swapem::logging::setup_logging;
use swapem::store::JsonHighScoreStore;
use swapem::term::{AdapterStatusView, FrameBuffer, TerminalRenderer, Viewport};
use swapem::types::EngineEvent;
use swapem::{App, AppConfig, Control};

/// Input poll interval; the game has no timers, so this only bounds adapter latency.
const FRAME: Duration = Duration::from_millis(33);

type TermApp = App<SeededRng, JsonHighScoreStore>;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let config = AppConfig::from_env();
    setup_logging(&config.log_dir)?;

    let seed = config.seed();
    info!(seed, highscores = %config.highscore_path.display(), "starting swapem");

    let store = JsonHighScoreStore::open(&config.highscore_path);
    let session = GameSession::new(config.palette(), SeededRng::new(seed), store);
    let mut app = App::new(session, seed.rotate_left(17), config.colors.is_some());

    let mut adapter = match Adapter::start_from_env() {
        Ok(adapter) => adapter,
        Err(e) => {
            warn!(error = %e, "remote adapter unavailable");
            None
        }
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut app, adapter.as_mut());

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(
    term: &mut TerminalRenderer,
    app: &mut TermApp,
    mut adapter: Option<&mut Adapter>,
) -> Result<()> {
    let mut fb = FrameBuffer::new(0, 0);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let status = adapter.as_deref().map(|a| AdapterStatusView {
            enabled: true,
            client_count: a.status().client_count().min(u16::MAX as usize) as u16,
            controller_id: a.status().controller_id(),
        });
        app.render_into(Viewport::new(w, h), status.as_ref(), &mut fb);
        term.draw_swap(&mut fb)?;

        if event::poll(FRAME)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key) == Control::Quit {
                        return Ok(());
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        if let Some(adapter) = adapter.as_deref_mut() {
            while let Some(inbound) = adapter.try_recv() {
                match inbound.payload {
                    InboundPayload::SnapshotRequest => {
                        adapter.send_observation(Some(inbound.client_id), app.snapshot());
                    }
                    InboundPayload::Command(command) => {
                        let applied = app.apply_command(command);
                        adapter.send_ack(inbound.client_id, inbound.seq, applied);
                    }
                }
                publish(app, adapter);
            }
            publish(app, adapter);
        } else {
            // Nobody is listening.
            let _ = app.take_events();
            let _ = app.take_fresh_board();
        }

        if app.session().is_finished() {
            return Ok(());
        }
    }
}

/// Stream pending engine events, then an observation if the board settled or was replaced.
fn publish(app: &mut TermApp, adapter: &mut Adapter) {
    let events = app.take_events();
    for event in &events {
        adapter.broadcast_event(event);
    }
    let settled = events
        .iter()
        .any(|e| matches!(e, EngineEvent::Settled { .. } | EngineEvent::GameOver { .. }));
    if app.take_fresh_board() || settled {
        adapter.send_observation(None, app.snapshot());
    }
}
