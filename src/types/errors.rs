use std::fmt;

// === BrowserError ===

/// Errors surfaced by the host-browser API seam.
///
/// These are expected, transient conditions: a tab can close or navigate away
/// between any two asynchronous calls. The dispatcher treats all of them as
/// "proceed without that tab's cooperation".
#[derive(Debug)]
pub enum BrowserError {
    /// The tab was gone by the time the call reached the browser.
    TabClosed(i32),
    /// The browser refused to inject code into this context.
    InjectionForbidden(String),
    /// Script injection started but did not complete (navigation raced it).
    InjectionFailed(String),
    /// The message channel to the tab's content context is not available.
    ChannelUnavailable(String),
}

impl fmt::Display for BrowserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserError::TabClosed(id) => write!(f, "Tab closed: {}", id),
            BrowserError::InjectionForbidden(url) => {
                write!(f, "Injection forbidden for URL: {}", url)
            }
            BrowserError::InjectionFailed(msg) => write!(f, "Injection failed: {}", msg),
            BrowserError::ChannelUnavailable(msg) => {
                write!(f, "Message channel unavailable: {}", msg)
            }
        }
    }
}

impl std::error::Error for BrowserError {}

// === ProtocolError ===

/// Errors raised while validating incoming protocol messages.
#[derive(Debug)]
pub enum ProtocolError {
    /// The payload was not a tagged object (missing `type` discriminant).
    Untagged,
    /// The `type` value is not part of the closed message enumeration.
    UnknownType(String),
    /// The `type` is recognized but the payload fields do not match it.
    Malformed(String),
    /// The message was recognized but no handler is registered for it.
    NoHandler(String),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Untagged => write!(f, "Message is not a tagged object"),
            ProtocolError::UnknownType(t) => write!(f, "Unknown message type: {}", t),
            ProtocolError::Malformed(msg) => write!(f, "Malformed message payload: {}", msg),
            ProtocolError::NoHandler(t) => write!(f, "No handler for message type: {}", t),
        }
    }
}

impl std::error::Error for ProtocolError {}

// === StorageError ===

/// Errors related to the durable saved-tab-order store.
#[derive(Debug)]
pub enum StorageError {
    /// Database operation failed.
    DatabaseError(String),
    /// Failed to serialize or deserialize a stored row.
    SerializationError(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::DatabaseError(msg) => write!(f, "Tab store database error: {}", msg),
            StorageError::SerializationError(msg) => {
                write!(f, "Tab store serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StorageError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
