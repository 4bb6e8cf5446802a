//! Wire vocabulary crossing the background/page trust boundary.
//!
//! Every message is a tagged object `{"type": ..., ...payload}` drawn from a
//! closed enumeration. Each message type maps to exactly one response shape
//! (or none, for fire-and-forget) — see [`MessageKind::response_kind`]. The
//! mapping is an exhaustive match, so adding a variant without deciding its
//! response shape does not compile.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::settings::SwitcherSettings;
use crate::types::tab::{Tab, TabId};

/// Protocol unit exchanged between the background process and page contexts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// Background → page: move the popup selection by `offset` (+1/−1).
    /// Carries the tab's zoom factor so the popup can compensate its size.
    SelectTab { offset: i32, zoom_factor: f64 },
    /// Background → page: refresh settings without opening the popup.
    ApplySettings { settings: SwitcherSettings },
    /// Background → page: open the popup with the given settings as a preview.
    DemoSettings { settings: SwitcherSettings },
    /// Background → page: the popup must close (configuring surface went away).
    CloseOverlay,
    /// Page → background: the user picked this tab in the popup.
    SwitchTo { tab: Tab },
    /// Page → background: the popup was dismissed without switching.
    OverlayClosed,
    /// Page → background: full model for initial render.
    GetModel,
    /// Page → background: current settings.
    GetSettings,
    /// Settings surface → background: replace the settings object.
    SetSettings { settings: SwitcherSettings },
    /// Page → background: content script came up in this tab.
    ContentStarted,
    /// Page → background: content script is going away.
    ContentStopped,
    // Test-only introspection, used by end-to-end harnesses.
    GetLogs,
    GetRenderingTime,
    ForceZoom { factor: f64 },
    IsMessagingReady,
    IsPageActive,
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::SelectTab { .. } => MessageKind::SelectTab,
            Message::ApplySettings { .. } => MessageKind::ApplySettings,
            Message::DemoSettings { .. } => MessageKind::DemoSettings,
            Message::CloseOverlay => MessageKind::CloseOverlay,
            Message::SwitchTo { .. } => MessageKind::SwitchTo,
            Message::OverlayClosed => MessageKind::OverlayClosed,
            Message::GetModel => MessageKind::GetModel,
            Message::GetSettings => MessageKind::GetSettings,
            Message::SetSettings { .. } => MessageKind::SetSettings,
            Message::ContentStarted => MessageKind::ContentStarted,
            Message::ContentStopped => MessageKind::ContentStopped,
            Message::GetLogs => MessageKind::GetLogs,
            Message::GetRenderingTime => MessageKind::GetRenderingTime,
            Message::ForceZoom { .. } => MessageKind::ForceZoom,
            Message::IsMessagingReady => MessageKind::IsMessagingReady,
            Message::IsPageActive => MessageKind::IsPageActive,
        }
    }
}

/// Discriminant-only view of [`Message`], used as the handler-table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    SelectTab,
    ApplySettings,
    DemoSettings,
    CloseOverlay,
    SwitchTo,
    OverlayClosed,
    GetModel,
    GetSettings,
    SetSettings,
    ContentStarted,
    ContentStopped,
    GetLogs,
    GetRenderingTime,
    ForceZoom,
    IsMessagingReady,
    IsPageActive,
}

impl MessageKind {
    /// Wire name of the discriminant, for log output.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::SelectTab => "select_tab",
            MessageKind::ApplySettings => "apply_settings",
            MessageKind::DemoSettings => "demo_settings",
            MessageKind::CloseOverlay => "close_overlay",
            MessageKind::SwitchTo => "switch_to",
            MessageKind::OverlayClosed => "overlay_closed",
            MessageKind::GetModel => "get_model",
            MessageKind::GetSettings => "get_settings",
            MessageKind::SetSettings => "set_settings",
            MessageKind::ContentStarted => "content_started",
            MessageKind::ContentStopped => "content_stopped",
            MessageKind::GetLogs => "get_logs",
            MessageKind::GetRenderingTime => "get_rendering_time",
            MessageKind::ForceZoom => "force_zoom",
            MessageKind::IsMessagingReady => "is_messaging_ready",
            MessageKind::IsPageActive => "is_page_active",
        }
    }

    /// Looks up a discriminant by its wire name.
    pub fn from_wire(tag: &str) -> Option<MessageKind> {
        const ALL: &[MessageKind] = &[
            MessageKind::SelectTab,
            MessageKind::ApplySettings,
            MessageKind::DemoSettings,
            MessageKind::CloseOverlay,
            MessageKind::SwitchTo,
            MessageKind::OverlayClosed,
            MessageKind::GetModel,
            MessageKind::GetSettings,
            MessageKind::SetSettings,
            MessageKind::ContentStarted,
            MessageKind::ContentStopped,
            MessageKind::GetLogs,
            MessageKind::GetRenderingTime,
            MessageKind::ForceZoom,
            MessageKind::IsMessagingReady,
            MessageKind::IsPageActive,
        ];
        ALL.iter().copied().find(|k| k.as_str() == tag)
    }

    /// The response shape statically associated with this message type.
    /// `None` means fire-and-forget: no response is ever produced.
    pub fn response_kind(self) -> Option<ResponseKind> {
        match self {
            MessageKind::SelectTab => Some(ResponseKind::SelectionState),
            MessageKind::GetModel => Some(ResponseKind::Model),
            MessageKind::GetSettings => Some(ResponseKind::Settings),
            MessageKind::GetLogs => Some(ResponseKind::Logs),
            MessageKind::GetRenderingTime => Some(ResponseKind::RenderingTime),
            MessageKind::IsMessagingReady => Some(ResponseKind::MessagingReady),
            MessageKind::IsPageActive => Some(ResponseKind::PageActive),
            MessageKind::ApplySettings
            | MessageKind::DemoSettings
            | MessageKind::CloseOverlay
            | MessageKind::SwitchTo
            | MessageKind::OverlayClosed
            | MessageKind::SetSettings
            | MessageKind::ContentStarted
            | MessageKind::ContentStopped
            | MessageKind::ForceZoom => None,
        }
    }
}

/// Typed responses, one shape per responding message type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Model {
        tabs: Vec<Tab>,
        settings: SwitcherSettings,
        zoom_factor: f64,
    },
    Settings {
        settings: SwitcherSettings,
    },
    Logs {
        entries: Vec<String>,
    },
    RenderingTime {
        millis: u64,
    },
    MessagingReady {
        ready: bool,
    },
    PageActive {
        active: bool,
    },
    /// Reply to `select_tab`: whether the page can receive key events. When
    /// it cannot, the background schedules the auto-switch timer.
    SelectionState {
        page_has_focus: bool,
    },
}

impl Response {
    pub fn kind(&self) -> ResponseKind {
        match self {
            Response::Model { .. } => ResponseKind::Model,
            Response::Settings { .. } => ResponseKind::Settings,
            Response::Logs { .. } => ResponseKind::Logs,
            Response::RenderingTime { .. } => ResponseKind::RenderingTime,
            Response::MessagingReady { .. } => ResponseKind::MessagingReady,
            Response::PageActive { .. } => ResponseKind::PageActive,
            Response::SelectionState { .. } => ResponseKind::SelectionState,
        }
    }
}

/// Discriminant-only view of [`Response`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    Model,
    Settings,
    Logs,
    RenderingTime,
    MessagingReady,
    PageActive,
    SelectionState,
}

/// Metadata about the context a message arrived from, as reported by the
/// host's extension messaging channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SenderInfo {
    pub tab_id: Option<TabId>,
    pub url: Option<String>,
    pub frame_id: Option<u32>,
}

impl SenderInfo {
    pub fn from_tab(tab: &Tab) -> Self {
        Self {
            tab_id: Some(tab.id),
            url: Some(tab.url.clone()),
            frame_id: Some(0),
        }
    }
}

/// Origin of a postMessage envelope. `NewContentScript` is used once by a
/// freshly injected content script so a stale predecessor in the same
/// document stops listening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeSender {
    PageScript,
    ContentScript,
    NewContentScript,
}

/// Request wire form for the page-script ⇄ content-script hop, where the
/// native extension channel does not reach. `id` is the correlation
/// identifier; fire-and-forget envelopes carry none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub sender: EnvelopeSender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub message: Message,
}

/// Response wire form matching an [`Envelope`] by correlation id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub sender: EnvelopeSender,
    pub id: Uuid,
    pub response: Response,
}

// Constructor helpers. Callers build messages through these rather than
// spelling out enum variants at every call site.

pub fn select_tab(offset: i32, zoom_factor: f64) -> Message {
    Message::SelectTab { offset, zoom_factor }
}

pub fn switch_to(tab: Tab) -> Message {
    Message::SwitchTo { tab }
}

pub fn close_overlay() -> Message {
    Message::CloseOverlay
}

pub fn apply_settings(settings: SwitcherSettings) -> Message {
    Message::ApplySettings { settings }
}

pub fn demo_settings(settings: SwitcherSettings) -> Message {
    Message::DemoSettings { settings }
}
