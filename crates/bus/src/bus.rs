//! Handler registries keyed by message type.
//!
//! Each message type maps to at most one handler. Handlers are stored type-
//! erased and recovered by downcasting on dispatch, so the buses themselves are
//! ordinary (non-generic) values that can be shared behind an `Arc` and built
//! once at startup.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::{BusError, Command, CommandHandler, Query, QueryHandler};

#[derive(Default)]
struct Registry {
    handlers: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Registry {
    fn insert<M: 'static, H: Any + Send + Sync>(&mut self, handler: H) -> Result<(), BusError> {
        let key = TypeId::of::<M>();
        if self.handlers.contains_key(&key) {
            return Err(BusError::DuplicateHandler(short_type_name::<M>()));
        }
        self.handlers.insert(key, Box::new(handler));
        Ok(())
    }

    fn get<M: 'static, H: Any>(&self) -> Option<&H> {
        self.handlers
            .get(&TypeId::of::<M>())
            .and_then(|h| h.downcast_ref::<H>())
    }

    fn contains<M: 'static>(&self) -> bool {
        self.handlers.contains_key(&TypeId::of::<M>())
    }
}

/// `catalog::commands::DeleteProduct` -> `DeleteProduct`.
fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Dispatches commands to their single registered handler.
pub struct CommandBus<E> {
    registry: Registry,
    _error: PhantomData<fn() -> E>,
}

impl<E> Default for CommandBus<E> {
    fn default() -> Self {
        Self {
            registry: Registry::default(),
            _error: PhantomData,
        }
    }
}

impl<E> CommandBus<E>
where
    E: From<BusError> + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for `C`. Fails if `C` already has one.
    pub fn register<C: Command>(
        &mut self,
        handler: Arc<dyn CommandHandler<C, E>>,
    ) -> Result<(), BusError> {
        self.registry.insert::<C, _>(handler)
    }

    pub fn handles<C: Command>(&self) -> bool {
        self.registry.contains::<C>()
    }

    pub fn dispatch<C: Command>(&self, command: C) -> Result<C::Output, E> {
        let handler = self
            .registry
            .get::<C, Arc<dyn CommandHandler<C, E>>>()
            .ok_or_else(|| BusError::NoHandler(short_type_name::<C>()))?;

        tracing::debug!(command = short_type_name::<C>(), ?command, "dispatching command");
        handler.handle(command)
    }
}

/// Dispatches queries to their single registered handler.
pub struct QueryBus<E> {
    registry: Registry,
    _error: PhantomData<fn() -> E>,
}

impl<E> Default for QueryBus<E> {
    fn default() -> Self {
        Self {
            registry: Registry::default(),
            _error: PhantomData,
        }
    }
}

impl<E> QueryBus<E>
where
    E: From<BusError> + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for `Q`. Fails if `Q` already has one.
    pub fn register<Q: Query>(
        &mut self,
        handler: Arc<dyn QueryHandler<Q, E>>,
    ) -> Result<(), BusError> {
        self.registry.insert::<Q, _>(handler)
    }

    pub fn handles<Q: Query>(&self) -> bool {
        self.registry.contains::<Q>()
    }

    pub fn ask<Q: Query>(&self, query: Q) -> Result<Q::Output, E> {
        let handler = self
            .registry
            .get::<Q, Arc<dyn QueryHandler<Q, E>>>()
            .ok_or_else(|| BusError::NoHandler(short_type_name::<Q>()))?;

        tracing::trace!(query = short_type_name::<Q>(), ?query, "asking query");
        handler.handle(query)
    }
}
