//! Message dispatch for the background⇄page protocol.
//!
//! [`MessageRouter`] is built once with the handlers a context registers and
//! then fed raw incoming payloads. Dispatch validates that the payload is a
//! recognized tagged object, finds the handler for its type, invokes it with
//! `(message, sender)`, and forwards the handler's response to the caller so
//! the transport can deliver it asynchronously. Handlers that return nothing
//! produce no response.
//!
//! Protocol violations — untagged payloads, unknown `type` values, or a
//! recognized type with no registered handler — are logged as errors and
//! swallowed: no response is sent, and a correlated request on the other end
//! stays pending.

use std::collections::HashMap;

use serde_json::Value;
use tracing::error;

use crate::types::errors::ProtocolError;
use crate::types::message::{Message, MessageKind, Response, SenderInfo};

/// Handler invoked for one message type. Returning `None` means
/// fire-and-forget; `Some` is forwarded as the asynchronous response.
/// Handlers run on the receiving context's event loop, never concurrently.
pub type Handler = Box<dyn FnMut(&Message, &SenderInfo) -> Option<Response>>;

/// Per-context message dispatcher: one handler per message type.
#[derive(Default)]
pub struct MessageRouter {
    handlers: HashMap<MessageKind, Handler>,
}

impl MessageRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `kind`, replacing any previous registration.
    pub fn register(&mut self, kind: MessageKind, handler: Handler) -> &mut Self {
        self.handlers.insert(kind, handler);
        self
    }

    pub fn has_handler(&self, kind: MessageKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Validates and dispatches a raw incoming payload.
    ///
    /// Returns the handler's response, or `None` for fire-and-forget
    /// messages and for every rejected payload.
    pub fn dispatch(&mut self, raw: &Value, sender: &SenderInfo) -> Option<Response> {
        let message = match parse_message(raw) {
            Ok(m) => m,
            Err(e) => {
                error!(error = %e, "rejected incoming message");
                return None;
            }
        };
        self.dispatch_message(&message, sender)
    }

    /// Dispatches an already-typed message (used when the transport layer
    /// deserialized an envelope itself).
    pub fn dispatch_message(&mut self, message: &Message, sender: &SenderInfo) -> Option<Response> {
        let kind = message.kind();
        let handler = match self.handlers.get_mut(&kind) {
            Some(h) => h,
            None => {
                error!(
                    error = %ProtocolError::NoHandler(kind.as_str().to_string()),
                    "message dropped"
                );
                return None;
            }
        };

        let response = handler(message, sender);
        if let Some(ref r) = response {
            // The per-type response mapping is part of the wire contract;
            // a mismatch is a handler bug.
            debug_assert_eq!(kind.response_kind(), Some(r.kind()));
        }
        response
    }
}

/// Checks that `raw` is a tagged object whose `type` belongs to the closed
/// message enumeration.
fn parse_message(raw: &Value) -> Result<Message, ProtocolError> {
    let tag = raw
        .as_object()
        .and_then(|obj| obj.get("type"))
        .and_then(|t| t.as_str())
        .ok_or(ProtocolError::Untagged)?;

    if MessageKind::from_wire(tag).is_none() {
        return Err(ProtocolError::UnknownType(tag.to_string()));
    }

    serde_json::from_value(raw.clone()).map_err(|e| ProtocolError::Malformed(e.to_string()))
}
