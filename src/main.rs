//! tabswitch — keyboard-driven recent-tab switcher core.
//!
//! Entry point: interactive console demo driving every component with an
//! in-memory browser stand-in. The real integration runs through the
//! `tabswitch-events` binary.

use tabswitch::managers::command_dispatcher::{BrowserApi, CommandDispatcher};
use tabswitch::managers::registry_factory::build_tab_registry;
use tabswitch::managers::tab_registry::TabRegistryTrait;
use tabswitch::message_handler::MessageRouter;
use tabswitch::services::correlation::RequestCorrelator;
use tabswitch::types::errors::BrowserError;
use tabswitch::types::events::ShortcutCommand;
use tabswitch::types::message::{
    self, EnvelopeSender, Message, MessageKind, Response, SenderInfo,
};
use tabswitch::types::settings::SwitcherSettings;
use tabswitch::types::tab::{SavedTab, Tab, TabId, WindowId};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!();
    println!("tabswitch v{} — demo mode", env!("CARGO_PKG_VERSION"));
    println!();

    demo_registry();
    demo_factory();
    demo_protocol();
    demo_correlation();
    demo_dispatcher();

    println!("All components demonstrated.");
}

fn section(name: &str) {
    println!("── {} ──", name);
}

fn tab(id: TabId, title: &str, active: bool) -> Tab {
    Tab {
        id,
        window_id: 1,
        title: title.to_string(),
        url: format!("https://{}.test/", title),
        favicon_url: None,
        active,
    }
}

fn demo_registry() {
    section("Tab Registry");
    let mut registry = tabswitch::managers::tab_registry::TabRegistry::new(3);
    for (id, title) in [(1, "docs"), (2, "mail"), (3, "chat"), (4, "build")] {
        registry.push(tab(id, title, true));
    }
    // Re-activating an old tab moves it to the top without duplicating it.
    registry.push(tab(2, "mail", true));
    let shown: Vec<String> = registry
        .get_tabs_to_show()
        .into_iter()
        .map(|t| t.title)
        .collect();
    println!("  popup order (cap 3): {:?}", shown);
    println!(
        "  active: {:?}",
        registry.get_active().map(|t| t.title)
    );
    println!();
}

fn demo_factory() {
    section("Registry Factory");
    let open = vec![
        tab(10, "wikipedia", false),
        tab(11, "stack", true),
        tab(12, "example", false),
    ];
    let saved: Vec<SavedTab> = ["example", "stack", "wikipedia"]
        .iter()
        .map(|title| SavedTab {
            title: title.to_string(),
            url: format!("https://{}.test/", title),
            favicon_url: None,
        })
        .collect();
    let registry = build_tab_registry(open, &saved, &SwitcherSettings::default(), None);
    let titles: Vec<String> = registry.get_tabs().into_iter().map(|t| t.title).collect();
    println!("  reconciled order: {:?}", titles);
    println!();
}

fn demo_protocol() {
    section("Message Protocol");
    // Page-side router: the handlers an injected UI registers.
    let mut router = MessageRouter::new();
    router.register(
        MessageKind::SelectTab,
        Box::new(|message, _sender| {
            if let Message::SelectTab { offset, .. } = message {
                println!("  page: selection moved by {}", offset);
            }
            Some(Response::SelectionState {
                page_has_focus: true,
            })
        }),
    );
    router.register(
        MessageKind::GetRenderingTime,
        Box::new(|_message, _sender| Some(Response::RenderingTime { millis: 12 })),
    );
    router.register(
        MessageKind::CloseOverlay,
        Box::new(|_message, _sender| {
            println!("  page: popup closed");
            None
        }),
    );

    let sender = SenderInfo::default();
    let raw = serde_json::to_value(message::select_tab(1, 1.0)).unwrap();
    println!("  response: {:?}", router.dispatch(&raw, &sender));
    // Unknown types are rejected with an error log and no response.
    let bogus = serde_json::json!({"type": "reticulate_splines"});
    assert!(router.dispatch(&bogus, &sender).is_none());
    println!();
}

fn demo_correlation() {
    section("Request Correlation");
    let mut correlator = RequestCorrelator::new(EnvelopeSender::PageScript);
    let (envelope, rx) = correlator.request(Message::GetSettings);
    println!(
        "  request {} pending ({} outstanding)",
        envelope.id.unwrap(),
        correlator.pending_requests()
    );
    correlator.resolve(tabswitch::types::message::ResponseEnvelope {
        sender: EnvelopeSender::ContentScript,
        id: envelope.id.unwrap(),
        response: Response::Settings {
            settings: SwitcherSettings::default(),
        },
    });
    let resolved = rx.blocking_recv().is_ok();
    println!(
        "  resolved: {} ({} outstanding)",
        resolved,
        correlator.pending_requests()
    );
    println!();
}

/// In-memory browser stand-in: three open tabs, operations are printed.
struct DemoBrowser {
    tabs: Vec<Tab>,
}

impl BrowserApi for DemoBrowser {
    fn active_tab(&mut self) -> Option<Tab> {
        self.tabs.iter().find(|t| t.active).cloned()
    }

    fn active_tab_in_window(&mut self, window_id: WindowId) -> Option<Tab> {
        self.tabs
            .iter()
            .find(|t| t.active && t.window_id == window_id)
            .cloned()
    }

    fn activate_tab(&mut self, id: TabId) -> Result<(), BrowserError> {
        for t in &mut self.tabs {
            t.active = t.id == id;
        }
        println!("  browser: tab {} activated", id);
        Ok(())
    }

    fn focus_window(&mut self, id: WindowId) -> Result<(), BrowserError> {
        println!("  browser: window {} focused", id);
        Ok(())
    }

    fn execute_script(&mut self, tab_id: TabId, script: &str) -> Result<(), BrowserError> {
        println!("  browser: injected {} into tab {}", script, tab_id);
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
        println!(
            "  browser: message {} → tab {}",
            message.kind().as_str(),
            tab_id
        );
        Ok(None)
    }
}

fn demo_dispatcher() {
    section("Command Dispatcher");
    let browser = DemoBrowser {
        tabs: vec![
            tab(1, "docs", false),
            tab(2, "mail", false),
            tab(3, "chat", true),
        ],
    };
    let mut registry = tabswitch::managers::tab_registry::TabRegistry::default();
    for t in [tab(1, "docs", false), tab(2, "mail", false), tab(3, "chat", true)] {
        registry.push(t);
    }
    let mut dispatcher = CommandDispatcher::new(browser, registry, SwitcherSettings::default());

    dispatcher.on_command(ShortcutCommand::Next);
    dispatcher.on_tab_removed(3);
    println!("  log: {:?}", dispatcher.logs());
    println!();
}
