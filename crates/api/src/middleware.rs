use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use backoffice_auth::JwtValidator;
use backoffice_catalog::config::{LANG_DEFAULT, MULTISHOP_FEATURE_ACTIVE, SHOP_DEFAULT};
use backoffice_catalog::{RequestShopContext, ShopSelection};
use backoffice_core::{LanguageId, ShopId};

use crate::app::errors::json_error;
use crate::app::flash::{SESSION_COOKIE, SessionId};
use crate::app::services::AppServices;
use crate::context::{AdminContext, PrincipalContext};

/// Header carrying the shop switcher value (`s-<id>`, `g-<id>` or empty).
pub const SHOP_CONTEXT_HEADER: &str = "x-shop-context";

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = extract_bearer(req.headers())?;

    let claims = state
        .jwt
        .validate(token, Utc::now())
        .map_err(|e| {
            tracing::debug!(error = %e, "rejected bearer token");
            StatusCode::UNAUTHORIZED
        })?;

    req.extensions_mut().insert(PrincipalContext::new(
        claims.sub,
        claims.roles.clone(),
        claims.language_id,
    ));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}

/// Builds the [`AdminContext`]: flash session, shop context and language.
///
/// Runs after [`auth_middleware`]; a request without a principal is rejected.
pub async fn admin_context_middleware(
    State(services): State<Arc<AppServices>>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(principal) = req.extensions().get::<PrincipalContext>().cloned() else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    let configuration = services.configuration.as_ref();
    let Some(default_shop) = configuration
        .get_int(SHOP_DEFAULT)
        .and_then(|raw| ShopId::try_from(raw).ok())
    else {
        tracing::error!("SHOP_DEFAULT is missing or invalid");
        return json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "Shop configuration is incomplete.",
        );
    };

    let selection = match shop_selection(req.headers()) {
        Ok(selection) => selection,
        Err(raw) => {
            return json_error(
                StatusCode::BAD_REQUEST,
                "invalid_shop_context",
                format!("Unknown shop context '{raw}'."),
            );
        }
    };
    let shop = RequestShopContext::new(
        configuration.get_bool(MULTISHOP_FEATURE_ACTIVE),
        default_shop,
        selection,
    );

    let language_id = principal
        .language_id()
        .or_else(|| {
            configuration
                .get_int(LANG_DEFAULT)
                .and_then(|raw| LanguageId::try_from(raw).ok())
        })
        .or_else(|| LanguageId::new(1).ok());
    let Some(language_id) = language_id else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    let existing_session = session_from_cookies(req.headers());
    let session_id = existing_session.unwrap_or_default();

    req.extensions_mut().insert(AdminContext {
        principal,
        shop,
        language_id,
        session_id,
    });

    let mut res = next.run(req).await;
    if existing_session.is_none() {
        let cookie = format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            res.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    res
}

fn shop_selection(headers: &HeaderMap) -> Result<ShopSelection, String> {
    let Some(raw) = headers.get(SHOP_CONTEXT_HEADER) else {
        return Ok(ShopSelection::All);
    };
    let raw = raw.to_str().map_err(|_| "<binary>".to_string())?;
    raw.parse().map_err(|_| raw.to_string())
}

fn session_from_cookies(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| SessionId::parse(value))
}
