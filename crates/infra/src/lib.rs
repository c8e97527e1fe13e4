//! Infrastructure layer: in-memory catalog collaborators.
//!
//! Everything the admin needs behind its ports, kept in process memory:
//! the catalog store, bus handlers, the listing grid, configuration and a
//! demo seed.

pub mod catalog_store;
pub mod config;
pub mod grid;
pub mod handlers;
pub mod seed;

mod integration_tests;

pub use catalog_store::InMemoryCatalog;
pub use config::InMemoryConfiguration;
pub use grid::InMemoryProductGridFactory;
pub use handlers::{CatalogCommandHandlers, CatalogQueryHandlers, catalog_buses};
pub use seed::seed_demo_catalog;
