use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use backoffice_catalog::ShopContext;

use crate::context::AdminContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(ctx): Extension<AdminContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "principal_id": ctx.principal.principal_id().to_string(),
        "roles": ctx.principal.roles().iter().map(|r| r.as_str()).collect::<Vec<_>>(),
        "language_id": ctx.language_id,
        "shop_id": ctx.shop.context_shop_id(),
        "single_shop": ctx.shop.is_single_shop_context(),
    }))
}
