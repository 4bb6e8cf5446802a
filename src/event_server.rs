//! tabswitch event server — newline-delimited JSON over stdin/stdout.
//!
//! This process stands in for the host browser's extension runtime: the
//! embedder feeds shortcut commands, tab-lifecycle events, and page messages
//! on stdin (one JSON object per line) and receives browser operations and
//! protocol messages on stdout.
//!
//! Inbound:  {"event":"command","command":"next"}
//!           {"event":"tab_activated","tab":{...}}
//!           {"event":"message","message":{"type":"get_model"},"sender":{...}}
//! Outbound: {"op":"activate_tab","tab_id":3}
//!           {"op":"send_message","tab_id":3,"message":{...}}
//!
//! The first inbound line is expected to be the open-tab snapshot
//! ({"event":"snapshot","tabs":[...]}); the registry is reconciled from it
//! and the saved order. Any other first line starts the registry empty.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use serde_json::json;
use tracing::{info, warn};

use tabswitch::app::App;
use tabswitch::managers::command_dispatcher::{BrowserApi, CommandDispatcher};
use tabswitch::managers::tab_registry::TabRegistryTrait;
use tabswitch::message_handler::MessageRouter;
use tabswitch::services::settings_engine::SettingsEngineTrait;
use tabswitch::types::errors::BrowserError;
use tabswitch::types::events::BrowserEvent;
use tabswitch::types::message::{Message, MessageKind, Response};
use tabswitch::types::tab::{Tab, TabId, WindowId};

/// Local mirror of the host browser's tab state, maintained from the event
/// stream so queries can be answered without a round-trip.
struct Mirror {
    tabs: Vec<Tab>,
    focused_window: Option<WindowId>,
}

impl Mirror {
    fn from_tabs(tabs: Vec<Tab>) -> Self {
        let focused_window = tabs.iter().find(|t| t.active).map(|t| t.window_id);
        Self {
            tabs,
            focused_window,
        }
    }

    fn upsert(&mut self, tab: Tab) {
        match self.tabs.iter_mut().find(|t| t.id == tab.id) {
            Some(slot) => *slot = tab,
            None => self.tabs.push(tab),
        }
    }

    fn mark_active(&mut self, id: TabId) {
        let window_id = match self.tabs.iter().find(|t| t.id == id) {
            Some(t) => t.window_id,
            None => return,
        };
        for t in &mut self.tabs {
            if t.window_id == window_id {
                t.active = t.id == id;
            }
        }
        self.focused_window = Some(window_id);
    }

    fn remove(&mut self, id: TabId) {
        self.tabs.retain(|t| t.id != id);
    }

    fn contains(&self, id: TabId) -> bool {
        self.tabs.iter().any(|t| t.id == id)
    }

    fn active_tab(&self) -> Option<Tab> {
        if let Some(w) = self.focused_window {
            if let Some(t) = self.tabs.iter().find(|t| t.active && t.window_id == w) {
                return Some(t.clone());
            }
        }
        self.tabs.iter().find(|t| t.active).cloned()
    }

    fn active_tab_in_window(&self, window_id: WindowId) -> Option<Tab> {
        self.tabs
            .iter()
            .find(|t| t.active && t.window_id == window_id)
            .cloned()
    }
}

/// Writes one outbound operation line.
fn emit(op: serde_json::Value) {
    println!("{}", op);
    let _ = io::stdout().flush();
}

/// [`BrowserApi`] adapter that answers queries from the [`Mirror`] and turns
/// every mutating call into an outbound operation line.
struct StdioBrowser {
    mirror: Rc<RefCell<Mirror>>,
}

impl BrowserApi for StdioBrowser {
    fn active_tab(&mut self) -> Option<Tab> {
        self.mirror.borrow().active_tab()
    }

    fn active_tab_in_window(&mut self, window_id: WindowId) -> Option<Tab> {
        self.mirror.borrow().active_tab_in_window(window_id)
    }

    fn activate_tab(&mut self, id: TabId) -> Result<(), BrowserError> {
        if !self.mirror.borrow().contains(id) {
            return Err(BrowserError::TabClosed(id));
        }
        self.mirror.borrow_mut().mark_active(id);
        emit(json!({"op": "activate_tab", "tab_id": id}));
        Ok(())
    }

    fn focus_window(&mut self, id: WindowId) -> Result<(), BrowserError> {
        self.mirror.borrow_mut().focused_window = Some(id);
        emit(json!({"op": "focus_window", "window_id": id}));
        Ok(())
    }

    fn execute_script(&mut self, tab_id: TabId, script: &str) -> Result<(), BrowserError> {
        let mirror = self.mirror.borrow();
        let tab = match mirror.tabs.iter().find(|t| t.id == tab_id) {
            Some(t) => t,
            None => return Err(BrowserError::TabClosed(tab_id)),
        };
        if tab.is_privileged() {
            return Err(BrowserError::InjectionForbidden(tab.url.clone()));
        }
        emit(json!({"op": "execute_script", "tab_id": tab_id, "file": script}));
        Ok(())
    }

    fn zoom_factor(&mut self, _tab_id: TabId) -> f64 {
        1.0
    }

    fn send_message(
        &mut self,
        tab_id: TabId,
        message: &Message,
    ) -> Result<Option<Response>, BrowserError> {
        if !self.mirror.borrow().contains(tab_id) {
            return Err(BrowserError::ChannelUnavailable(format!(
                "tab {} is gone",
                tab_id
            )));
        }
        emit(json!({"op": "send_message", "tab_id": tab_id, "message": message}));
        // Delivery over stdout is one-way; responses come back as events.
        Ok(None)
    }
}

/// Everything the message handlers need to reach.
struct Shared {
    dispatcher: CommandDispatcher<StdioBrowser>,
    app: App,
}

/// Registers the background-side handlers. Each closure holds its own handle
/// on the shared state; dispatch never runs two handlers at once.
fn build_router(shared: Rc<RefCell<Shared>>) -> MessageRouter {
    let mut router = MessageRouter::new();

    let s = shared.clone();
    router.register(
        MessageKind::SwitchTo,
        Box::new(move |message, _sender| {
            if let Message::SwitchTo { tab } = message {
                s.borrow_mut().dispatcher.handle_switch_to(tab);
            }
            None
        }),
    );

    let s = shared.clone();
    router.register(
        MessageKind::OverlayClosed,
        Box::new(move |_message, _sender| {
            s.borrow_mut().dispatcher.handle_overlay_closed();
            None
        }),
    );

    let s = shared.clone();
    router.register(
        MessageKind::GetModel,
        Box::new(move |_message, _sender| Some(s.borrow_mut().dispatcher.model())),
    );

    let s = shared.clone();
    router.register(
        MessageKind::GetSettings,
        Box::new(move |_message, _sender| {
            Some(Response::Settings {
                settings: s.borrow().dispatcher.settings().clone(),
            })
        }),
    );

    let s = shared.clone();
    router.register(
        MessageKind::SetSettings,
        Box::new(move |message, _sender| {
            if let Message::SetSettings { settings } = message {
                let mut shared = s.borrow_mut();
                if let Err(e) = shared.app.settings_engine.replace(settings.clone()) {
                    warn!(error = %e, "settings not persisted");
                }
                shared.dispatcher.on_settings_changed(settings.clone());
            }
            None
        }),
    );

    let s = shared.clone();
    router.register(
        MessageKind::DemoSettings,
        Box::new(move |message, _sender| {
            if let Message::DemoSettings { settings } = message {
                s.borrow_mut().dispatcher.handle_demo_settings(settings.clone());
            }
            None
        }),
    );

    let s = shared.clone();
    router.register(
        MessageKind::ContentStarted,
        Box::new(move |_message, sender| {
            if let Some(tab_id) = sender.tab_id {
                s.borrow_mut().dispatcher.handle_content_started(tab_id);
            }
            None
        }),
    );

    let s = shared.clone();
    router.register(
        MessageKind::ContentStopped,
        Box::new(move |_message, sender| {
            if let Some(tab_id) = sender.tab_id {
                s.borrow_mut().dispatcher.handle_content_stopped(tab_id);
            }
            None
        }),
    );

    let s = shared.clone();
    router.register(
        MessageKind::GetLogs,
        Box::new(move |_message, _sender| {
            Some(Response::Logs {
                entries: s.borrow().dispatcher.logs(),
            })
        }),
    );

    router.register(
        MessageKind::IsMessagingReady,
        Box::new(|_message, _sender| Some(Response::MessagingReady { ready: true })),
    );

    let s = shared;
    router.register(
        MessageKind::IsPageActive,
        Box::new(move |_message, sender| {
            let active = s.borrow().dispatcher.registry().get_active();
            Some(Response::PageActive {
                active: matches!((active, sender.tab_id), (Some(a), Some(id)) if a.id == id),
            })
        }),
    );

    router
}

fn handle_event(
    event: BrowserEvent,
    shared: &Rc<RefCell<Shared>>,
    router: &mut MessageRouter,
    mirror: &Rc<RefCell<Mirror>>,
) {
    match event {
        BrowserEvent::Snapshot { tabs } => {
            // Late snapshot: refresh the mirror only; the registry was
            // already reconciled at startup.
            *mirror.borrow_mut() = Mirror::from_tabs(tabs);
        }
        BrowserEvent::Command { command } => {
            shared.borrow_mut().dispatcher.on_command(command);
        }
        BrowserEvent::TabActivated { tab } => {
            mirror.borrow_mut().upsert(tab.clone());
            mirror.borrow_mut().mark_active(tab.id);
            shared.borrow_mut().dispatcher.on_tab_activated(tab);
        }
        BrowserEvent::WindowFocusChanged { window_id } => {
            shared
                .borrow_mut()
                .dispatcher
                .on_window_focus_changed(window_id);
        }
        BrowserEvent::TabCreated { tab } => {
            mirror.borrow_mut().upsert(tab.clone());
            shared.borrow_mut().dispatcher.on_tab_created(tab);
        }
        BrowserEvent::TabUpdated { tab, load_complete } => {
            mirror.borrow_mut().upsert(tab.clone());
            shared
                .borrow_mut()
                .dispatcher
                .on_tab_updated(tab, load_complete);
        }
        BrowserEvent::TabRemoved { tab_id } => {
            mirror.borrow_mut().remove(tab_id);
            shared.borrow_mut().dispatcher.on_tab_removed(tab_id);
        }
        BrowserEvent::Message { message, sender } => {
            if let Some(response) = router.dispatch(&message, &sender) {
                emit(json!({
                    "op": "message_response",
                    "tab_id": sender.tab_id,
                    "response": response,
                }));
            }
        }
        BrowserEvent::SettingsUiDisconnected => {
            shared.borrow_mut().dispatcher.on_settings_ui_disconnected();
        }
        BrowserEvent::Tick => {
            shared
                .borrow_mut()
                .dispatcher
                .poll_auto_switch(Instant::now());
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // Prefer TABSWITCH_DATA_DIR, fall back to the platform data directory.
    let data_dir = match std::env::var("TABSWITCH_DATA_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => tabswitch::platform::get_data_dir(),
    };
    let _ = std::fs::create_dir_all(&data_dir);
    let db_path = data_dir.join("tabswitch.db");

    let mut app = App::new(db_path.to_str().unwrap_or("tabswitch.db"), None)
        .expect("Failed to initialize tabswitch");
    app.startup();

    emit(json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    // The registry is reconciled from the first snapshot line.
    let mut open_tabs: Vec<Tab> = Vec::new();
    let mut deferred: Option<BrowserEvent> = None;
    if let Some(Ok(first)) = lines.next() {
        match serde_json::from_str::<BrowserEvent>(&first) {
            Ok(BrowserEvent::Snapshot { tabs }) => open_tabs = tabs,
            Ok(other) => deferred = Some(other),
            Err(e) => emit(json!({"error": format!("parse error: {}", e)})),
        }
    }
    info!(open = open_tabs.len(), "reconciling registry");

    let registry = app.build_registry(open_tabs.clone());
    let settings = app.settings_engine.get_settings().clone();
    let mirror = Rc::new(RefCell::new(Mirror::from_tabs(open_tabs)));
    let dispatcher = CommandDispatcher::new(
        StdioBrowser {
            mirror: mirror.clone(),
        },
        registry,
        settings,
    );
    let shared = Rc::new(RefCell::new(Shared { dispatcher, app }));
    let mut router = build_router(shared.clone());

    if let Some(event) = deferred {
        handle_event(event, &shared, &mut router, &mirror);
    }

    for line in lines {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<BrowserEvent>(&line) {
            Ok(event) => handle_event(event, &shared, &mut router, &mirror),
            Err(e) => emit(json!({"error": format!("parse error: {}", e)})),
        }
    }
}
