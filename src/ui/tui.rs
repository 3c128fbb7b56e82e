//! Terminal event loop
//!
//! Drawing and key handling happen on the calling thread. Requests run as
//! tasks on the tokio runtime and report back through an unbounded channel
//! that the loop drains between frames.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info};

use crate::api::{InventoryApi, InventoryClient};
use crate::config::ClientConfig;
use crate::dashboard::load_detail;
use crate::error::Result;
use crate::ui::app::{App, AppEvent, Effect};
use crate::ui::render;

const TICK_RATE: Duration = Duration::from_millis(100);

/// Raw mode and alternate screen, restored on drop
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        io::stdout().execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = io::stdout().execute(LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Run the interactive dashboard until the user quits
pub fn run(config: &ClientConfig, runtime: &Runtime) -> Result<()> {
    let api: Arc<dyn InventoryApi> = Arc::new(InventoryClient::new(config)?);
    let mut app = App::new(Arc::clone(&api), config.page_size);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut theme_rx = app.theme().subscribe();

    info!(base_url = %config.normalized_base_url(), "starting dashboard");
    let mut guard = TerminalGuard::enter()?;

    for effect in app.start() {
        spawn_effect(runtime, &api, effect, tx.clone());
    }

    let mut last_tick = Instant::now();
    while !app.should_quit() {
        guard.terminal.draw(|frame| render::draw(frame, &app))?;

        while let Ok(event) = rx.try_recv() {
            for effect in app.on_event(event, Instant::now()) {
                spawn_effect(runtime, &api, effect, tx.clone());
            }
        }

        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    for effect in app.on_key(key) {
                        spawn_effect(runtime, &api, effect, tx.clone());
                    }
                }
            }
        }

        if theme_rx.has_changed().unwrap_or(false) {
            let theme = *theme_rx.borrow_and_update();
            debug!(?theme, "redrawing with new theme");
            guard.terminal.clear()?;
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.on_tick(Instant::now());
            last_tick = Instant::now();
        }
    }

    info!("dashboard closed");
    Ok(())
}

/// Run one effect on the runtime and send its result back
fn spawn_effect(
    runtime: &Runtime,
    api: &Arc<dyn InventoryApi>,
    effect: Effect,
    tx: UnboundedSender<AppEvent>,
) {
    let api = Arc::clone(api);
    runtime.spawn(async move {
        let event = match effect {
            Effect::FetchHealth => AppEvent::Health(api.health().await.map(|h| h.status)),
            Effect::FetchPage(request) => {
                let result = api.list_vehicles(request.page, request.page_size).await;
                AppEvent::PageLoaded(request, result)
            }
            Effect::Create(payload) => AppEvent::Created(api.create_vehicle(&payload).await),
            Effect::FetchDetail(request) => {
                let outcome = load_detail(api.as_ref(), &request.vin).await;
                AppEvent::DetailLoaded(request, outcome)
            }
        };
        // Receiver is gone once the loop has exited
        let _ = tx.send(event);
    });
}
