//! Host-browser events consumed by the command dispatcher.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::message::SenderInfo;
use crate::types::tab::{Tab, TabId, WindowId};

/// OS-level shortcut commands, independent of page focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortcutCommand {
    Next,
    Previous,
}

impl ShortcutCommand {
    /// Selection offset the command applies to the popup.
    pub fn offset(self) -> i32 {
        match self {
            ShortcutCommand::Next => 1,
            ShortcutCommand::Previous => -1,
        }
    }
}

/// One inbound line on the `tabswitch-events` wire: a shortcut command, a
/// tab-lifecycle event, or a protocol message relayed from a page context.
///
/// Delivery order is assumed to match real-world event order; the dispatcher
/// never re-orders events (see the concurrency notes in the dispatcher docs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BrowserEvent {
    /// The current open-tab snapshot. Sent once right after `ready`; the
    /// registry factory reconciles it against the saved order.
    Snapshot {
        tabs: Vec<Tab>,
    },
    Command {
        command: ShortcutCommand,
    },
    TabActivated {
        tab: Tab,
    },
    WindowFocusChanged {
        window_id: WindowId,
    },
    TabCreated {
        tab: Tab,
    },
    TabUpdated {
        tab: Tab,
        #[serde(default)]
        load_complete: bool,
    },
    TabRemoved {
        tab_id: TabId,
    },
    /// A protocol message from a page context. The payload stays raw JSON
    /// here; the message router validates and types it.
    Message {
        message: Value,
        #[serde(default)]
        sender: SenderInfo,
    },
    /// The settings surface disconnected; any demo popup must close.
    SettingsUiDisconnected,
    /// Periodic tick driving the auto-switch timer poll.
    Tick,
}
