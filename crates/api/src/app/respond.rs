//! Turning an [`AdminResponse`] into an HTTP response.

use axum::{
    Json,
    body::Body,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use tokio_util::io::ReaderStream;

use backoffice_catalog::CatalogError;

use crate::app::errors::{GENERIC_ERROR, fault_to_response, json_error};
use crate::app::orchestrator::{AdminResponse, Download};
use crate::app::services::AppServices;
use crate::context::AdminContext;

pub async fn into_http(services: &AppServices, ctx: &AdminContext, response: AdminResponse) -> Response {
    match response {
        AdminResponse::Render(mut view) => {
            view.flashes = services.flashes.take(ctx.session_id);
            match services.renderer.render(&view) {
                Ok(html) => Html(html).into_response(),
                Err(e) => {
                    tracing::error!(error = %e, template = view.template, "render failed");
                    json_error(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "render_error",
                        services.translator.trans(GENERIC_ERROR, &[]),
                    )
                }
            }
        }
        AdminResponse::Redirect(location) => Redirect::to(&location).into_response(),
        AdminResponse::Json(status, body) => (status, Json(body)).into_response(),
        AdminResponse::Download(download) => download_response(services, download).await,
        AdminResponse::Fault(err) => fault_to_response(&err, services.translator.as_ref()),
    }
}

fn content_disposition(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .map(|c| if c == '"' || c.is_control() { '_' } else { c })
        .collect();
    format!("attachment; filename=\"{safe}\"")
}

async fn download_response(services: &AppServices, download: Download) -> Response {
    match download {
        Download::File {
            file_id,
            path,
            filename,
        } => {
            let file = match tokio::fs::File::open(&path).await {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::warn!(path = %path.display(), "virtual product file missing on disk");
                    return fault_to_response(
                        &CatalogError::VirtualProductFileNotFound(file_id),
                        services.translator.as_ref(),
                    );
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "cannot open virtual product file");
                    return json_error(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal_error",
                        services.translator.trans(GENERIC_ERROR, &[]),
                    );
                }
            };
            let body = Body::from_stream(ReaderStream::new(file));
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/octet-stream".to_string()),
                    (header::CONTENT_DISPOSITION, content_disposition(&filename)),
                ],
                body,
            )
                .into_response()
        }
        Download::Bytes {
            filename,
            content_type,
            bytes,
        } => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, content_type.to_string()),
                (header::CONTENT_DISPOSITION, content_disposition(&filename)),
            ],
            bytes,
        )
            .into_response(),
    }
}
