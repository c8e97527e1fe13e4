use thiserror::Error;

use crate::{Permission, PrincipalId, Role, permissions_for_roles};

/// A fully resolved principal for authorization decisions.
///
/// Construction of this object is intentionally decoupled from storage and
/// transport: the API derives it from token claims and the role policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub principal_id: PrincipalId,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
}

impl Principal {
    /// Resolve a principal's permissions from its roles.
    pub fn from_roles(principal_id: PrincipalId, roles: Vec<Role>) -> Self {
        let permissions = permissions_for_roles(&roles);
        Self {
            principal_id,
            roles,
            permissions,
        }
    }

    pub fn is_granted(&self, required: &Permission) -> bool {
        authorize(self, required).is_ok()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Authorize a principal for one permission.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    let granted = principal
        .permissions
        .iter()
        .any(|p| p.is_wildcard() || p == required);

    if granted {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(roles: &[&'static str]) -> Principal {
        Principal::from_roles(
            PrincipalId::new(),
            roles.iter().map(|r| Role::new(*r)).collect(),
        )
    }

    #[test]
    fn wildcard_grants_everything() {
        let p = principal(&["admin"]);
        assert!(authorize(&p, &Permission::PRODUCTS_DELETE).is_ok());
        assert!(authorize(&p, &Permission::new("orders.refund")).is_ok());
    }

    #[test]
    fn editor_cannot_delete() {
        let p = principal(&["catalog_editor"]);
        assert!(p.is_granted(&Permission::PRODUCTS_UPDATE));
        assert_eq!(
            authorize(&p, &Permission::PRODUCTS_DELETE),
            Err(AuthzError::Forbidden("products.delete".into()))
        );
    }

    #[test]
    fn principal_without_roles_is_denied() {
        let p = principal(&[]);
        assert!(!p.is_granted(&Permission::PRODUCTS_READ));
    }
}
