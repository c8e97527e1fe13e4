use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// A dotted permission name such as `products.update`.
///
/// The catalog only knows the four product permissions below. `*` grants
/// everything and is what the `admin` role carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const WILDCARD: Permission = Permission(Cow::Borrowed("*"));
    /// List, export, download virtual files, search associations.
    pub const PRODUCTS_READ: Permission = Permission(Cow::Borrowed("products.read"));
    /// Create and duplicate.
    pub const PRODUCTS_CREATE: Permission = Permission(Cow::Borrowed("products.create"));
    /// Edit, status changes and positions.
    pub const PRODUCTS_UPDATE: Permission = Permission(Cow::Borrowed("products.update"));
    pub const PRODUCTS_DELETE: Permission = Permission(Cow::Borrowed("products.delete"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        *self == Self::WILDCARD
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
