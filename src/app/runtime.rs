use super::*;
use std::io::Stdout;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

const MAX_EVENTS_PER_TICK: usize = 256;

/// The tick loop: drain the agent channel, lay out and draw every pane in one
/// flush, then consume whatever input is queued. The only wait is the input
/// poll, bounded by `tick`.
pub(crate) fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    tick: Duration,
) -> Result<()> {
    info!(tick_ms = tick.as_millis() as u64, "render loop started");
    loop {
        app.poll_agent();
        app.drain_debug_log();
        app.expire_status(Instant::now());

        let area = terminal.size().context("terminal size")?;
        app.prepare_frame(area.width, area.height);
        terminal.draw(|f| ui::draw(f, app)).context("draw frame")?;

        let events = collect_events(tick)?;
        app.dispatch_events(events);
        if app.should_quit {
            break;
        }
    }
    info!("render loop finished");
    Ok(())
}

/// Wait up to `timeout` for the first event, then take everything else that
/// is already queued without waiting again.
fn collect_events(timeout: Duration) -> Result<Vec<Event>> {
    let mut events = Vec::new();
    if !event::poll(timeout).context("event poll")? {
        return Ok(events);
    }
    loop {
        events.push(event::read().context("event read")?);
        if events.len() >= MAX_EVENTS_PER_TICK {
            break;
        }
        if !event::poll(Duration::ZERO).context("event poll drain")? {
            break;
        }
    }
    Ok(events)
}
