//! Request/response correlation for the same-document postMessage hop.
//!
//! The page-script ⇄ content-script boundary has no native request/response
//! channel, so each outgoing request carries a random correlation identifier
//! and the matching resolver is parked until a response envelope with the
//! same identifier comes back.
//!
//! Known limitation: no timeout is enforced here. A response that never
//! arrives — the peer navigated away, or the message was dropped as a
//! protocol violation on the far side — leaves the receiver pending
//! indefinitely. `pending_requests` exposes the outstanding count so callers
//! can at least observe the leak.

use std::collections::HashMap;

use tokio::sync::oneshot;
use uuid::Uuid;

use crate::types::message::{Envelope, EnvelopeSender, Message, Response, ResponseEnvelope};

/// Tracks outstanding correlated requests for one envelope origin.
pub struct RequestCorrelator {
    origin: EnvelopeSender,
    pending: HashMap<Uuid, oneshot::Sender<Response>>,
}

impl RequestCorrelator {
    pub fn new(origin: EnvelopeSender) -> Self {
        Self {
            origin,
            pending: HashMap::new(),
        }
    }

    /// Builds a request envelope with a fresh correlation identifier and
    /// parks a resolver for it. The caller posts the envelope and awaits the
    /// returned receiver.
    pub fn request(&mut self, message: Message) -> (Envelope, oneshot::Receiver<Response>) {
        let id = Uuid::new_v4();
        let (tx, rx) = oneshot::channel();
        self.pending.insert(id, tx);
        let envelope = Envelope {
            sender: self.origin,
            id: Some(id),
            message,
        };
        (envelope, rx)
    }

    /// Builds a fire-and-forget envelope: no identifier, nothing parked.
    pub fn notify(&self, message: Message) -> Envelope {
        Envelope {
            sender: self.origin,
            id: None,
            message,
        }
    }

    /// Resolves the request matching the response's correlation identifier.
    ///
    /// Returns false when no request with that identifier is outstanding
    /// (already resolved, or the identifier was never issued) or when the
    /// receiver was dropped; the response is discarded in both cases.
    pub fn resolve(&mut self, envelope: ResponseEnvelope) -> bool {
        match self.pending.remove(&envelope.id) {
            Some(tx) => tx.send(envelope.response).is_ok(),
            None => false,
        }
    }

    /// Number of requests still waiting for a response.
    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }
}
