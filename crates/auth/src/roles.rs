use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::Permission;

/// Role identifier used for RBAC.
///
/// Roles are opaque strings carried by the token; [`permissions_for_roles`]
/// is the policy that turns them into permissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Static role -> permission policy for the catalog back office.
///
/// - `admin`: everything (`*`)
/// - `catalog_manager`: full product management
/// - `catalog_editor`: read + update (no create, no delete)
/// - `viewer`: read only
///
/// Unknown roles grant nothing.
pub fn permissions_for_roles(roles: &[Role]) -> Vec<Permission> {
    let mut granted: Vec<Permission> = Vec::new();
    for role in roles {
        let perms: Vec<Permission> = match role.as_str() {
            "admin" => vec![Permission::WILDCARD],
            "catalog_manager" => vec![
                Permission::PRODUCTS_READ,
                Permission::PRODUCTS_CREATE,
                Permission::PRODUCTS_UPDATE,
                Permission::PRODUCTS_DELETE,
            ],
            "catalog_editor" => vec![Permission::PRODUCTS_READ, Permission::PRODUCTS_UPDATE],
            "viewer" => vec![Permission::PRODUCTS_READ],
            _ => Vec::new(),
        };
        for p in perms {
            if !granted.contains(&p) {
                granted.push(p);
            }
        }
    }
    granted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_gets_wildcard() {
        let perms = permissions_for_roles(&[Role::new("admin")]);
        assert_eq!(perms.len(), 1);
        assert!(perms[0].is_wildcard());
    }

    #[test]
    fn overlapping_roles_are_deduplicated() {
        let perms = permissions_for_roles(&[Role::new("viewer"), Role::new("catalog_editor")]);
        assert_eq!(perms, vec![Permission::PRODUCTS_READ, Permission::PRODUCTS_UPDATE]);
    }

    #[test]
    fn unknown_roles_grant_nothing() {
        assert!(permissions_for_roles(&[Role::new("intern")]).is_empty());
    }
}
