use thiserror::Error;

/// Failures of the bus itself (as opposed to handler failures).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// No handler was registered for the message type.
    #[error("no handler registered for {0}")]
    NoHandler(&'static str),

    /// A second handler was registered for a message type that already has one.
    #[error("a handler is already registered for {0}")]
    DuplicateHandler(&'static str),
}
