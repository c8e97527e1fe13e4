//! `backoffice-core`: ids and errors shared by the catalog crates.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! positive integer identifiers, the `Entity` trait and the shared error model.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::DomainError;
pub use id::{CategoryId, LanguageId, ProductId, ShopGroupId, ShopId, VirtualProductFileId};
