//! API-side authorization guard for admin actions.
//!
//! Every admin action names the permission it needs; the guard runs before any
//! command or query is dispatched, keeping the catalog and infra auth-agnostic.

use backoffice_auth::{AuthzError, Permission, authorize};

use crate::context::PrincipalContext;

/// Admin actions on the product catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductAction {
    List,
    Export,
    Create,
    Edit,
    Delete,
    Duplicate,
    ToggleStatus,
    UpdatePosition,
    BulkDelete,
    BulkEnable,
    BulkDisable,
    BulkDuplicate,
    DownloadVirtualFile,
    SearchAssociations,
}

impl ProductAction {
    pub fn required_permission(&self) -> Permission {
        match self {
            ProductAction::List
            | ProductAction::Export
            | ProductAction::DownloadVirtualFile
            | ProductAction::SearchAssociations => Permission::PRODUCTS_READ,
            ProductAction::Create | ProductAction::Duplicate | ProductAction::BulkDuplicate => {
                Permission::PRODUCTS_CREATE
            }
            ProductAction::Edit
            | ProductAction::ToggleStatus
            | ProductAction::UpdatePosition
            | ProductAction::BulkEnable
            | ProductAction::BulkDisable => Permission::PRODUCTS_UPDATE,
            ProductAction::Delete | ProductAction::BulkDelete => Permission::PRODUCTS_DELETE,
        }
    }
}

/// Check authorization for an action in the current request context.
///
/// This is intended to be called **before** dispatching anything.
pub fn authorize_action(principal: &PrincipalContext, action: ProductAction) -> Result<(), AuthzError> {
    let required = action.required_permission();
    authorize(principal.principal(), &required).inspect_err(|_| {
        tracing::warn!(
            principal_id = %principal.principal_id(),
            ?action,
            permission = required.as_str(),
            "admin action denied"
        );
    })
}
