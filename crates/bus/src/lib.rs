//! Command & query buses (in-process, synchronous).
//!
//! A bus dispatches a message to exactly one registered handler and hands the
//! handler's result back to the caller. Nothing is queued, retried or
//! published: a dispatch either returns the typed output or the handler's
//! error, inline.

pub mod bus;
pub mod command;
pub mod error;
pub mod handler;
pub mod query;

pub use bus::{CommandBus, QueryBus};
pub use command::Command;
pub use error::BusError;
pub use handler::{CommandHandler, QueryHandler};
pub use query::Query;
