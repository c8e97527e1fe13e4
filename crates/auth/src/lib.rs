//! `backoffice-auth`: JWT principals and role-based product permissions.
//!
//! This crate is intentionally decoupled from HTTP and storage: the API layer
//! decodes a bearer token into [`JwtClaims`], resolves a [`Principal`] and asks
//! [`authorize`] before dispatching anything.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use authorize::{authorize, AuthzError, Principal};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use permissions::Permission;
pub use principal::PrincipalId;
pub use roles::{Role, permissions_for_roles};
