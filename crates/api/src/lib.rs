//! HTTP API: the product catalog back office.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;
