use backoffice_auth::{Permission, Principal, PrincipalId, Role};
use backoffice_catalog::RequestShopContext;
use backoffice_core::LanguageId;

use crate::app::flash::SessionId;

/// Principal context for a request (authenticated identity + roles).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
    language_id: Option<LanguageId>,
}

impl PrincipalContext {
    pub fn new(principal_id: PrincipalId, roles: Vec<Role>, language_id: Option<LanguageId>) -> Self {
        Self {
            principal: Principal::from_roles(principal_id, roles),
            language_id,
        }
    }

    pub fn principal_id(&self) -> PrincipalId {
        self.principal.principal_id
    }

    pub fn roles(&self) -> &[Role] {
        &self.principal.roles
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Language the employee works in, when the token carries one.
    pub fn language_id(&self) -> Option<LanguageId> {
        self.language_id
    }
}

/// Everything an admin action needs to know about the caller.
///
/// Built once per request by the context middleware.
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub principal: PrincipalContext,
    pub shop: RequestShopContext,
    pub language_id: LanguageId,
    pub session_id: SessionId,
}

impl AdminContext {
    pub fn is_granted(&self, permission: &Permission) -> bool {
        self.principal.principal().is_granted(permission)
    }
}
