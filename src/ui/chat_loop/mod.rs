//! Interactive chat loop.
//!
//! Key presses are turned into [`AppAction`]s; network work runs on spawned
//! tasks and reports back through an unbounded channel, so a chat send and a
//! model switch can be in flight at once and complete in either order.

mod lifecycle;

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::api::client::{Backend, BackendError, HttpBackend};
use crate::api::{ChatResponse, ModelUpdateResponse, ModelsResponse};
use crate::core::app::{App, AppAction};
use crate::core::config::ResolvedSettings;
use crate::core::controller::{ModelSessionController, RequestPolicy, SendTicket, SwitchTicket};
use crate::core::transcript::Transcript;
use crate::ui::renderer::{transcript_max_scroll, ui};
use crate::ui::theme::Theme;

use lifecycle::{install_panic_hook, restore_terminal, setup_terminal, ChatTerminal};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Completion of a request started on a background task.
#[derive(Debug)]
pub enum BackendEvent {
    Catalog(Result<ModelsResponse, BackendError>),
    Chat(SendTicket, Result<ChatResponse, BackendError>),
    Switch(SwitchTicket, Result<ModelUpdateResponse, BackendError>),
}

pub fn build_app(settings: &ResolvedSettings, backend: Arc<dyn Backend>) -> App {
    let controller = ModelSessionController::new(backend, settings.default_model.clone())
        .with_policy(RequestPolicy::from_exclusive(settings.exclusive_requests));
    let transcript = Transcript::with_greeting(&settings.default_model);
    App::new(transcript, controller)
}

pub fn spawn_catalog_fetch(backend: Arc<dyn Backend>, tx: mpsc::UnboundedSender<BackendEvent>) {
    tokio::spawn(async move {
        let result = backend.list_models().await;
        let _ = tx.send(BackendEvent::Catalog(result));
    });
}

/// Start the network half of `action`. Returns `false` for [`AppAction::Quit`].
pub fn dispatch_action(
    action: AppAction,
    backend: Arc<dyn Backend>,
    tx: &mpsc::UnboundedSender<BackendEvent>,
) -> bool {
    let tx = tx.clone();
    match action {
        AppAction::Quit => return false,
        AppAction::Send(ticket) => {
            tokio::spawn(async move {
                let result = ticket.dispatch(backend.as_ref()).await;
                let _ = tx.send(BackendEvent::Chat(ticket, result));
            });
        }
        AppAction::SwitchModel(ticket) => {
            tokio::spawn(async move {
                let result = ticket.dispatch(backend.as_ref()).await;
                let _ = tx.send(BackendEvent::Switch(ticket, result));
            });
        }
    }
    true
}

pub fn apply_backend_event(app: &mut App, event: BackendEvent) {
    match event {
        BackendEvent::Catalog(result) => app.apply_model_catalog(result),
        BackendEvent::Chat(ticket, result) => {
            let outcome = app.apply_chat_result(ticket, result);
            debug!(?outcome, "chat request settled");
        }
        BackendEvent::Switch(ticket, result) => {
            let outcome = app.apply_switch_result(ticket, result);
            debug!(?outcome, "model switch settled");
        }
    }
}

pub async fn run_chat(settings: ResolvedSettings, theme: Theme) -> Result<(), Box<dyn Error>> {
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(settings.base_url.clone()));
    let mut app = build_app(&settings, backend.clone());
    info!(base_url = %settings.base_url, model = %settings.default_model, "starting chat");

    let (tx, mut rx) = mpsc::unbounded_channel::<BackendEvent>();
    spawn_catalog_fetch(backend.clone(), tx.clone());

    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app, &theme, &backend, &tx, &mut rx);
    restore_terminal(&mut terminal)?;
    result
}

fn event_loop(
    terminal: &mut ChatTerminal,
    app: &mut App,
    theme: &Theme,
    backend: &Arc<dyn Backend>,
    tx: &mpsc::UnboundedSender<BackendEvent>,
    rx: &mut mpsc::UnboundedReceiver<BackendEvent>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| {
            app.set_max_scroll(transcript_max_scroll(app, theme, f.area()));
            ui(f, app, theme);
        })?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = app.handle_key(key) {
                        if !dispatch_action(action, backend.clone(), tx) {
                            return Ok(());
                        }
                    }
                }
            }
        }

        while let Ok(event) = rx.try_recv() {
            apply_backend_event(app, event);
        }
    }
}
