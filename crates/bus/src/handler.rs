use crate::{Command, Query};

/// Handles one command type.
///
/// The error type is a parameter rather than an associated type so that all
/// handlers registered on one bus share the bus's error type.
pub trait CommandHandler<C: Command, E>: Send + Sync {
    fn handle(&self, command: C) -> Result<C::Output, E>;
}

/// Handles one query type.
pub trait QueryHandler<Q: Query, E>: Send + Sync {
    fn handle(&self, query: Q) -> Result<Q::Output, E>;
}

impl<C, E, F> CommandHandler<C, E> for F
where
    C: Command,
    F: Fn(C) -> Result<C::Output, E> + Send + Sync,
{
    fn handle(&self, command: C) -> Result<C::Output, E> {
        self(command)
    }
}

impl<Q, E, F> QueryHandler<Q, E> for F
where
    Q: Query,
    F: Fn(Q) -> Result<Q::Output, E> + Send + Sync,
{
    fn handle(&self, query: Q) -> Result<Q::Output, E> {
        self(query)
    }
}
