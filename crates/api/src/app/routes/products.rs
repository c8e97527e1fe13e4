use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{Extension, Path, Query},
    response::Response,
    routing::{get, post},
};

use backoffice_catalog::ProductFilters;

use crate::app::forms::{BoundForm, ProductForm};
use crate::app::orchestrator::{ProductAdminOrchestrator, SearchParams};
use crate::app::respond::into_http;
use crate::app::services::AppServices;
use crate::context::AdminContext;

type Services = Extension<Arc<AppServices>>;
type Ctx = Extension<AdminContext>;
type Pairs = Vec<(String, String)>;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list))
        .route("/new", get(new_form).post(create))
        .route("/:id/edit", get(edit_form).post(edit))
        .route("/:id/delete", post(delete))
        .route("/:id/duplicate", post(duplicate))
        .route("/:id/toggle-status", post(toggle_status))
        .route("/update-position", post(update_position))
        .route("/bulk-delete", post(bulk_delete))
        .route("/bulk-enable", post(bulk_enable))
        .route("/bulk-disable", post(bulk_disable))
        .route("/bulk-duplicate", post(bulk_duplicate))
        .route("/filter", post(filter))
        .route("/filter/reset", post(reset_filter))
        .route("/export", get(export))
        .route("/download/:file_id", get(download))
        .route("/search-associations/:language_code", get(search_associations))
}

pub async fn list(
    Extension(services): Services,
    Extension(ctx): Ctx,
    Query(pairs): Query<Pairs>,
) -> Response {
    let filters = crate::app::dto::filters_from_pairs(&pairs);
    let out = ProductAdminOrchestrator::new(&services).list(&ctx, filters);
    into_http(&services, &ctx, out).await
}

pub async fn new_form(Extension(services): Services, Extension(ctx): Ctx) -> Response {
    let out = ProductAdminOrchestrator::new(&services).create(&ctx, BoundForm::empty());
    into_http(&services, &ctx, out).await
}

pub async fn create(
    Extension(services): Services,
    Extension(ctx): Ctx,
    Form(pairs): Form<Pairs>,
) -> Response {
    let form = BoundForm::submitted(ProductForm::from_pairs(&pairs));
    let out = ProductAdminOrchestrator::new(&services).create(&ctx, form);
    into_http(&services, &ctx, out).await
}

pub async fn edit_form(
    Extension(services): Services,
    Extension(ctx): Ctx,
    Path(id): Path<i64>,
) -> Response {
    let out = ProductAdminOrchestrator::new(&services).edit(&ctx, id, BoundForm::empty());
    into_http(&services, &ctx, out).await
}

pub async fn edit(
    Extension(services): Services,
    Extension(ctx): Ctx,
    Path(id): Path<i64>,
    Form(pairs): Form<Pairs>,
) -> Response {
    let form = BoundForm::submitted(ProductForm::from_pairs(&pairs));
    let out = ProductAdminOrchestrator::new(&services).edit(&ctx, id, form);
    into_http(&services, &ctx, out).await
}

pub async fn delete(
    Extension(services): Services,
    Extension(ctx): Ctx,
    Path(id): Path<i64>,
) -> Response {
    let out = ProductAdminOrchestrator::new(&services).delete(&ctx, id);
    into_http(&services, &ctx, out).await
}

pub async fn duplicate(
    Extension(services): Services,
    Extension(ctx): Ctx,
    Path(id): Path<i64>,
) -> Response {
    let out = ProductAdminOrchestrator::new(&services).duplicate(&ctx, id);
    into_http(&services, &ctx, out).await
}

pub async fn toggle_status(
    Extension(services): Services,
    Extension(ctx): Ctx,
    Path(id): Path<i64>,
) -> Response {
    let out = ProductAdminOrchestrator::new(&services).toggle_status(&ctx, id);
    into_http(&services, &ctx, out).await
}

pub async fn update_position(
    Extension(services): Services,
    Extension(ctx): Ctx,
    Form(pairs): Form<Pairs>,
) -> Response {
    let out = ProductAdminOrchestrator::new(&services).update_position(&ctx, &pairs);
    into_http(&services, &ctx, out).await
}

pub async fn bulk_delete(
    Extension(services): Services,
    Extension(ctx): Ctx,
    Form(pairs): Form<Pairs>,
) -> Response {
    let out = ProductAdminOrchestrator::new(&services).bulk_delete(&ctx, &pairs);
    into_http(&services, &ctx, out).await
}

pub async fn bulk_enable(
    Extension(services): Services,
    Extension(ctx): Ctx,
    Form(pairs): Form<Pairs>,
) -> Response {
    let out = ProductAdminOrchestrator::new(&services).bulk_enable(&ctx, &pairs);
    into_http(&services, &ctx, out).await
}

pub async fn bulk_disable(
    Extension(services): Services,
    Extension(ctx): Ctx,
    Form(pairs): Form<Pairs>,
) -> Response {
    let out = ProductAdminOrchestrator::new(&services).bulk_disable(&ctx, &pairs);
    into_http(&services, &ctx, out).await
}

pub async fn bulk_duplicate(
    Extension(services): Services,
    Extension(ctx): Ctx,
    Form(pairs): Form<Pairs>,
) -> Response {
    let out = ProductAdminOrchestrator::new(&services).bulk_duplicate(&ctx, &pairs);
    into_http(&services, &ctx, out).await
}

pub async fn filter(
    Extension(services): Services,
    Extension(ctx): Ctx,
    Form(pairs): Form<Pairs>,
) -> Response {
    let out = ProductAdminOrchestrator::new(&services).search_grid(&ctx, &pairs);
    into_http(&services, &ctx, out).await
}

pub async fn reset_filter(Extension(services): Services, Extension(ctx): Ctx) -> Response {
    let out = ProductAdminOrchestrator::new(&services).reset_grid(&ctx);
    into_http(&services, &ctx, out).await
}

pub async fn export(
    Extension(services): Services,
    Extension(ctx): Ctx,
    Query(pairs): Query<Pairs>,
) -> Response {
    let filters: ProductFilters = crate::app::dto::filters_from_pairs(&pairs);
    let out = ProductAdminOrchestrator::new(&services).export(&ctx, filters);
    into_http(&services, &ctx, out).await
}

pub async fn download(
    Extension(services): Services,
    Extension(ctx): Ctx,
    Path(file_id): Path<i64>,
) -> Response {
    let out = ProductAdminOrchestrator::new(&services).download_virtual_file(&ctx, file_id);
    into_http(&services, &ctx, out).await
}

pub async fn search_associations(
    Extension(services): Services,
    Extension(ctx): Ctx,
    Path(language_code): Path<String>,
    Query(params): Query<SearchParams>,
) -> Response {
    let out = ProductAdminOrchestrator::new(&services).search_associations(&ctx, &language_code, &params);
    into_http(&services, &ctx, out).await
}
