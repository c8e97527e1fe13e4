//! Error responses and the user-facing error message table.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use backoffice_catalog::{CatalogError, ErrorKind};

use crate::app::translation::{Translator, param};

pub const GENERIC_ERROR: &str = "An unexpected error occurred.";
pub const ACCESS_DENIED: &str = "Access denied.";

/// `(kind, sub-code, message)`. A `None` sub-code matches any code of that
/// kind that has no entry of its own.
const ERROR_MESSAGES: &[(ErrorKind, Option<&str>, &str)] = &[
    (ErrorKind::ProductNotFound, None, "The object cannot be loaded (or found)."),
    (ErrorKind::ProductConstraint, Some("invalid_id"), "The object cannot be loaded (the identifier is missing or invalid)"),
    (ErrorKind::ProductConstraint, Some("invalid_name"), "The %s field is invalid."),
    (ErrorKind::ProductConstraint, Some("invalid_reference"), "The %s field is invalid."),
    (ErrorKind::ProductConstraint, Some("invalid_price"), "The %s field is invalid."),
    (ErrorKind::ProductConstraint, Some("invalid_quantity"), "The %s field is invalid."),
    (ErrorKind::CannotAddProduct, None, "An error occurred while creating an object."),
    (ErrorKind::CannotUpdateProduct, Some("failed_update_status"), "An error occurred while updating the status."),
    (ErrorKind::CannotUpdateProduct, None, "An error occurred while updating an object."),
    (ErrorKind::CannotDeleteProduct, None, "An error occurred while deleting the object."),
    (ErrorKind::CannotBulkDeleteProduct, None, "An error occurred while deleting this selection."),
    (ErrorKind::CannotDuplicateProduct, None, "An error occurred while duplicating the object."),
    (ErrorKind::CannotBulkDuplicateProduct, None, "An error occurred while duplicating this selection."),
    (ErrorKind::ShopAssociationNotFound, None, "This product is not associated with the store selected in the multistore header."),
    (ErrorKind::CategoryNotFound, None, "The category cannot be found."),
    (ErrorKind::LanguageNotFound, None, "The language cannot be found."),
    (ErrorKind::VirtualProductFileNotFound, None, "The file cannot be found."),
    (ErrorKind::InvalidPositions, None, "Unable to update the product positions."),
];

fn lookup(kind: ErrorKind, code: Option<&str>) -> Option<&'static str> {
    let exact = code.and_then(|code| {
        ERROR_MESSAGES
            .iter()
            .find(|(k, c, _)| *k == kind && *c == Some(code))
    });
    exact
        .or_else(|| ERROR_MESSAGES.iter().find(|(k, c, _)| *k == kind && c.is_none()))
        .map(|(_, _, message)| *message)
}

fn field_of(code: &str) -> &'static str {
    match code {
        "invalid_name" => "name",
        "invalid_reference" => "reference",
        "invalid_price" => "price",
        "invalid_quantity" => "quantity",
        _ => "",
    }
}

/// The one place user-visible error text comes from.
pub fn error_message(err: &CatalogError, translator: &dyn Translator) -> String {
    let code = err.code();
    let message = match lookup(err.kind(), code) {
        Some(message) => message,
        None => {
            tracing::warn!(error = %err, kind = ?err.kind(), "no user-facing message for error");
            return translator.trans(GENERIC_ERROR, &[]);
        }
    };
    tracing::warn!(error = %err, kind = ?err.kind(), code = code.unwrap_or(""), "catalog error");
    translator.trans(message, &[param("%s", field_of(code.unwrap_or("")))])
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Response for an error no admin action recovered from.
pub fn fault_to_response(err: &CatalogError, translator: &dyn Translator) -> axum::response::Response {
    if err.is_not_found() {
        tracing::warn!(error = %err, "collaborator reported a missing resource");
        return json_error(StatusCode::NOT_FOUND, "not_found", error_message(err, translator));
    }
    tracing::error!(error = ?err, "unhandled catalog fault");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        translator.trans(GENERIC_ERROR, &[]),
    )
}
