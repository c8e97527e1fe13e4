//! The product admin: one method per admin action.
//!
//! Each action turns request input into commands and queries, interprets the
//! outcome and returns an [`AdminResponse`]. Recoverable failures become
//! flash messages; only collaborator faults escape as [`AdminResponse::Fault`].

use std::path::{Path, PathBuf};

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::{Value, json};

use backoffice_auth::Permission;
use backoffice_catalog::config::SHOP_DEFAULT;
use backoffice_catalog::{
    BulkDeleteProduct, BulkDuplicateProduct, BulkUpdateProductStatus, CatalogError, DeleteProduct,
    DuplicateProduct, GetCategoryForEditing, GetLanguageByCode, GetProductForEditing,
    GetVirtualProductFile, HasShopAssociation, PositionError, PositionUpdate, ProductFilters,
    ProductGrid, SearchProductsForAssociation, ShopContext, UpdateProductStatus,
    UpdateProductsPositions,
};
use backoffice_core::{DomainError, ProductId, ShopId, VirtualProductFileId};

use crate::app::dto::{self, AssociationEntry};
use crate::app::errors::{ACCESS_DENIED, error_message};
use crate::app::forms::{BoundForm, FormHandlerResult, ProductForm};
use crate::app::services::AppServices;
use crate::app::translation::param;
use crate::app::view::{
    PRODUCT_CREATE, PRODUCT_DISABLED, PRODUCT_EDIT, PRODUCT_INDEX, PRODUCT_MISSING_ASSOCIATION,
    View,
};
use crate::authz::{ProductAction, authorize_action};
use crate::context::AdminContext;

pub const LIST_URL: &str = "/products";
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

pub fn edit_url(id: ProductId) -> String {
    format!("/products/{id}/edit")
}

pub fn list_url_with(filters: &ProductFilters) -> String {
    let pairs = filters.query_pairs();
    if pairs.is_empty() {
        return LIST_URL.to_string();
    }
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())))
        .finish();
    format!("{LIST_URL}?{query}")
}

/// What an admin action produced.
#[derive(Debug)]
pub enum AdminResponse {
    Render(View),
    Redirect(String),
    Json(StatusCode, Value),
    Download(Download),
    /// A collaborator failure the action does not recover from.
    Fault(CatalogError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Download {
    /// Stream a file from disk.
    File {
        file_id: VirtualProductFileId,
        path: PathBuf,
        filename: String,
    },
    Bytes {
        filename: String,
        content_type: &'static str,
        bytes: Vec<u8>,
    },
}

/// Query string of the association search.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub limit: Option<String>,
}

pub struct ProductAdminOrchestrator<'a> {
    services: &'a AppServices,
}

impl<'a> ProductAdminOrchestrator<'a> {
    pub fn new(services: &'a AppServices) -> Self {
        Self { services }
    }

    fn allowed(&self, ctx: &AdminContext, action: ProductAction) -> bool {
        authorize_action(&ctx.principal, action).is_ok()
    }

    fn trans(&self, key: &str) -> String {
        self.services.translator.trans(key, &[])
    }

    fn flash_success(&self, ctx: &AdminContext, key: &str) {
        self.services.flashes.success(ctx.session_id, self.trans(key));
    }

    fn flash_error(&self, ctx: &AdminContext, err: &CatalogError) {
        let message = error_message(err, self.services.translator.as_ref());
        self.services.flashes.error(ctx.session_id, message);
    }

    fn flash_position_errors(&self, ctx: &AdminContext, errors: &[PositionError]) {
        for e in errors {
            let message = self.services.translator.trans(&e.key, &e.parameters);
            self.services.flashes.error(ctx.session_id, message);
        }
    }

    fn flash_field_errors(&self, ctx: &AdminContext, result: &FormHandlerResult) {
        for e in &result.errors {
            let message = format!("{}: {}", e.field, self.trans(&e.message));
            self.services.flashes.error(ctx.session_id, message);
        }
    }

    /// JSON 403 for read endpoints.
    fn forbidden_json(&self) -> AdminResponse {
        AdminResponse::Json(
            StatusCode::FORBIDDEN,
            json!({"error": "forbidden", "message": self.trans(ACCESS_DENIED)}),
        )
    }

    /// Flash + redirect for write endpoints.
    fn denied_redirect(&self, ctx: &AdminContext) -> AdminResponse {
        self.services.flashes.error(ctx.session_id, self.trans(ACCESS_DENIED));
        AdminResponse::Redirect(LIST_URL.to_string())
    }

    /// Flash the outcome of a list action and go back to the list.
    fn redirect_with_outcome<T>(
        &self,
        ctx: &AdminContext,
        outcome: Result<T, CatalogError>,
        success: &str,
    ) -> AdminResponse {
        match outcome {
            Ok(_) => self.flash_success(ctx, success),
            Err(e) => self.flash_error(ctx, &e),
        }
        AdminResponse::Redirect(LIST_URL.to_string())
    }

    fn default_shop(&self) -> Result<ShopId, CatalogError> {
        self.services
            .configuration
            .get_int(SHOP_DEFAULT)
            .and_then(|raw| ShopId::try_from(raw).ok())
            .ok_or_else(|| DomainError::invariant("SHOP_DEFAULT is not configured").into())
    }

    fn disabled_view(&self) -> AdminResponse {
        AdminResponse::Render(View::new(
            PRODUCT_DISABLED,
            json!({
                "message": self.trans(
                    "This page is only compatible in a single-store context. Please select a store in the multistore header."
                ),
            }),
        ))
    }

    // ----- listing -----

    pub fn list(&self, ctx: &AdminContext, filters: ProductFilters) -> AdminResponse {
        if !self.allowed(ctx, ProductAction::List) {
            return self.forbidden_json();
        }
        let grid = match self.services.grid.get_grid(
            &filters,
            &ctx.shop.shop_constraint(),
            ctx.language_id,
        ) {
            Ok(grid) => grid,
            Err(e) => return AdminResponse::Fault(e),
        };

        let category_name = match filters.category_id() {
            None => None,
            Some(category_id) => {
                let category = match self.services.queries.ask(GetCategoryForEditing { category_id }) {
                    Ok(category) => category,
                    Err(e) => return AdminResponse::Fault(e),
                };
                match category.name_in(ctx.language_id) {
                    Some(name) => Some(name.to_string()),
                    None => {
                        return AdminResponse::Fault(CatalogError::MissingLocalizedName {
                            category_id,
                            language: ctx.language_id.to_string(),
                        });
                    }
                }
            }
        };

        AdminResponse::Render(View::new(
            PRODUCT_INDEX,
            json!({
                "grid": grid,
                "category_name": category_name,
                "filters": filters,
                "toolbar_buttons": self.toolbar_buttons(ctx),
                "is_single_shop_context": ctx.shop.is_single_shop_context(),
            }),
        ))
    }

    fn toolbar_buttons(&self, ctx: &AdminContext) -> Value {
        if !ctx.is_granted(&Permission::PRODUCTS_CREATE) {
            return json!({});
        }
        if ctx.shop.is_single_shop_context() {
            json!({
                "add": {
                    "href": "/products/new",
                    "desc": self.trans("New product"),
                    "icon": "add_circle_outline",
                }
            })
        } else {
            json!({
                "add": {
                    "desc": self.trans("New product"),
                    "disabled": true,
                    "help": self.trans("You can use this feature in a single-store context only. Switch context to enable it."),
                }
            })
        }
    }

    pub fn search_grid(&self, ctx: &AdminContext, pairs: &[(String, String)]) -> AdminResponse {
        if !self.allowed(ctx, ProductAction::List) {
            return self.forbidden_json();
        }
        AdminResponse::Redirect(list_url_with(&dto::filters_from_pairs(pairs)))
    }

    pub fn reset_grid(&self, ctx: &AdminContext) -> AdminResponse {
        if !self.allowed(ctx, ProductAction::List) {
            return self.forbidden_json();
        }
        AdminResponse::Redirect(LIST_URL.to_string())
    }

    pub fn export(&self, ctx: &AdminContext, filters: ProductFilters) -> AdminResponse {
        if !self.allowed(ctx, ProductAction::Export) {
            return self.forbidden_json();
        }
        let grid = match self.services.grid.get_grid(
            &filters.all_pages(),
            &ctx.shop.shop_constraint(),
            ctx.language_id,
        ) {
            Ok(grid) => grid,
            Err(e) => return AdminResponse::Fault(e),
        };
        match grid_to_csv(&grid) {
            Ok(bytes) => AdminResponse::Download(Download::Bytes {
                filename: format!("product_{}.csv", Utc::now().format("%Y-%m-%d_%H%M%S")),
                content_type: "text/csv; charset=utf-8",
                bytes,
            }),
            Err(e) => AdminResponse::Fault(DomainError::invariant(format!("csv export failed: {e}")).into()),
        }
    }

    // ----- forms -----

    pub fn create(&self, ctx: &AdminContext, form: BoundForm) -> AdminResponse {
        if !self.allowed(ctx, ProductAction::Create) {
            return self.denied_redirect(ctx);
        }
        if !ctx.shop.is_single_shop_context() {
            return self.disabled_view();
        }

        let errors = match self
            .services
            .forms
            .handle_create(&form, ctx.shop.shop_constraint())
        {
            Ok(result) if result.is_submitted_and_valid() => {
                self.flash_success(ctx, "Successful creation");
                return AdminResponse::Redirect(
                    result
                        .identifiable_object_id
                        .map(edit_url)
                        .unwrap_or_else(|| LIST_URL.to_string()),
                );
            }
            Ok(result) => {
                self.flash_field_errors(ctx, &result);
                result.errors
            }
            Err(e) => {
                self.flash_error(ctx, &e);
                Vec::new()
            }
        };

        AdminResponse::Render(View::new(
            PRODUCT_CREATE,
            json!({"form": form.data, "errors": errors}),
        ))
    }

    pub fn edit(&self, ctx: &AdminContext, raw_id: i64, form: BoundForm) -> AdminResponse {
        if !self.allowed(ctx, ProductAction::Edit) {
            return self.denied_redirect(ctx);
        }
        if !ctx.shop.is_single_shop_context() {
            return self.disabled_view();
        }
        let product_id = match ProductId::try_from(raw_id) {
            Ok(id) => id,
            Err(_) => {
                self.flash_error(ctx, &CatalogError::invalid_product_id(raw_id));
                return AdminResponse::Redirect(LIST_URL.to_string());
            }
        };

        if let Some(shop_id) = ctx.shop.context_shop_id() {
            match self
                .services
                .queries
                .ask(HasShopAssociation { product_id, shop_id })
            {
                Ok(true) => {}
                Ok(false) => {
                    return AdminResponse::Render(View::new(
                        PRODUCT_MISSING_ASSOCIATION,
                        json!({"product_id": product_id, "shop_id": shop_id}),
                    ));
                }
                Err(e) => {
                    self.flash_error(ctx, &e);
                    return AdminResponse::Redirect(LIST_URL.to_string());
                }
            }
        }

        let product = match self.services.queries.ask(GetProductForEditing {
            product_id,
            shop_constraint: ctx.shop.shop_constraint(),
            language_id: ctx.language_id,
        }) {
            Ok(product) => product,
            Err(e) => {
                self.flash_error(ctx, &e);
                return AdminResponse::Redirect(LIST_URL.to_string());
            }
        };
        let form = if form.submitted {
            form
        } else {
            BoundForm {
                submitted: false,
                data: ProductForm::from_product(&product),
            }
        };

        let errors = match self.services.forms.handle_update(
            product_id,
            &form,
            ctx.shop.shop_constraint(),
        ) {
            Ok(result) if result.is_submitted_and_valid() => {
                self.flash_success(ctx, "Successful update");
                return AdminResponse::Redirect(edit_url(product_id));
            }
            Ok(result) => {
                self.flash_field_errors(ctx, &result);
                result.errors
            }
            Err(e) => {
                self.flash_error(ctx, &e);
                Vec::new()
            }
        };

        AdminResponse::Render(View::new(
            PRODUCT_EDIT,
            json!({
                "product_id": product_id,
                "product_type": product.product_type,
                "virtual_file": product.virtual_file,
                "form": form.data,
                "errors": errors,
            }),
        ))
    }

    // ----- single-product actions -----

    pub fn delete(&self, ctx: &AdminContext, raw_id: i64) -> AdminResponse {
        if !self.allowed(ctx, ProductAction::Delete) {
            return self.denied_redirect(ctx);
        }
        let outcome = DeleteProduct::new(raw_id, ctx.shop.shop_constraint())
            .and_then(|cmd| self.services.commands.dispatch(cmd));
        self.redirect_with_outcome(ctx, outcome, "Successful deletion")
    }

    pub fn duplicate(&self, ctx: &AdminContext, raw_id: i64) -> AdminResponse {
        if !self.allowed(ctx, ProductAction::Duplicate) {
            return self.denied_redirect(ctx);
        }
        let outcome = DuplicateProduct::new(raw_id, ctx.shop.shop_constraint())
            .and_then(|cmd| self.services.commands.dispatch(cmd));
        self.redirect_with_outcome(ctx, outcome, "Successful duplication")
    }

    pub fn toggle_status(&self, ctx: &AdminContext, raw_id: i64) -> AdminResponse {
        if !self.allowed(ctx, ProductAction::ToggleStatus) {
            return self.denied_redirect(ctx);
        }
        let constraint = ctx.shop.shop_constraint();
        let outcome = GetProductForEditing::new(raw_id, constraint, ctx.language_id)
            .and_then(|query| self.services.queries.ask(query))
            .and_then(|product| {
                self.services.commands.dispatch(UpdateProductStatus {
                    product_id: product.id,
                    enable: !product.active,
                    shop_constraint: constraint,
                })
            });
        self.redirect_with_outcome(ctx, outcome, "The status has been successfully updated.")
    }

    pub fn update_position(&self, ctx: &AdminContext, pairs: &[(String, String)]) -> AdminResponse {
        if !self.allowed(ctx, ProductAction::UpdatePosition) {
            return self.denied_redirect(ctx);
        }
        let (rows, parent) = dto::position_rows(pairs);
        let update = match PositionUpdate::build(rows, parent.as_deref()) {
            Ok(update) => update,
            Err(errors) => {
                self.flash_position_errors(ctx, &errors);
                return AdminResponse::Redirect(LIST_URL.to_string());
            }
        };
        match self.services.commands.dispatch(UpdateProductsPositions { update }) {
            Ok(()) => self.flash_success(ctx, "Update successful"),
            Err(CatalogError::InvalidPositions(errors)) => self.flash_position_errors(ctx, &errors),
            Err(e) => self.flash_error(ctx, &e),
        }
        AdminResponse::Redirect(LIST_URL.to_string())
    }

    // ----- bulk actions -----

    pub fn bulk_delete(&self, ctx: &AdminContext, pairs: &[(String, String)]) -> AdminResponse {
        if !self.allowed(ctx, ProductAction::BulkDelete) {
            return self.denied_redirect(ctx);
        }
        let outcome = BulkDeleteProduct::new(&dto::bulk_ids(pairs), ctx.shop.shop_constraint())
            .and_then(|cmd| self.services.commands.dispatch(cmd));
        self.redirect_with_outcome(ctx, outcome, "The selection has been successfully deleted.")
    }

    pub fn bulk_enable(&self, ctx: &AdminContext, pairs: &[(String, String)]) -> AdminResponse {
        self.bulk_status(ctx, pairs, true)
    }

    pub fn bulk_disable(&self, ctx: &AdminContext, pairs: &[(String, String)]) -> AdminResponse {
        self.bulk_status(ctx, pairs, false)
    }

    fn bulk_status(&self, ctx: &AdminContext, pairs: &[(String, String)], enable: bool) -> AdminResponse {
        let action = if enable { ProductAction::BulkEnable } else { ProductAction::BulkDisable };
        if !self.allowed(ctx, action) {
            return self.denied_redirect(ctx);
        }
        let outcome =
            BulkUpdateProductStatus::new(&dto::bulk_ids(pairs), enable, ctx.shop.shop_constraint())
                .and_then(|cmd| self.services.commands.dispatch(cmd));
        self.redirect_with_outcome(ctx, outcome, "The status has been successfully updated.")
    }

    pub fn bulk_duplicate(&self, ctx: &AdminContext, pairs: &[(String, String)]) -> AdminResponse {
        if !self.allowed(ctx, ProductAction::BulkDuplicate) {
            return self.denied_redirect(ctx);
        }
        let outcome = BulkDuplicateProduct::new(&dto::bulk_ids(pairs), ctx.shop.shop_constraint())
            .and_then(|cmd| self.services.commands.dispatch(cmd));
        self.redirect_with_outcome(ctx, outcome, "The selection has been successfully duplicated.")
    }

    // ----- JSON / file endpoints -----

    pub fn download_virtual_file(&self, ctx: &AdminContext, raw_id: i64) -> AdminResponse {
        if !self.allowed(ctx, ProductAction::DownloadVirtualFile) {
            return self.forbidden_json();
        }
        let Ok(file_id) = VirtualProductFileId::try_from(raw_id) else {
            return AdminResponse::Fault(DomainError::not_found().into());
        };
        let file = match self.services.queries.ask(GetVirtualProductFile { file_id }) {
            Ok(file) => file,
            Err(e) => return AdminResponse::Fault(e),
        };
        // Stored names are bare file names; anything else would escape the download dir.
        if Path::new(&file.filename).file_name() != Some(file.filename.as_ref()) {
            return AdminResponse::Fault(CatalogError::VirtualProductFileNotFound(file_id));
        }
        AdminResponse::Download(Download::File {
            file_id,
            path: self.services.download_dir.join(&file.filename),
            filename: file.display_filename,
        })
    }

    pub fn search_associations(
        &self,
        ctx: &AdminContext,
        language_code: &str,
        params: &SearchParams,
    ) -> AdminResponse {
        if !self.allowed(ctx, ProductAction::SearchAssociations) {
            return self.forbidden_json();
        }
        let language = match self.services.queries.ask(GetLanguageByCode {
            code: language_code.to_string(),
        }) {
            Ok(Some(language)) => language,
            Ok(None) => {
                let message = self.services.translator.trans(
                    "Invalid language code %s was used which matches no existing language in this shop.",
                    &[param("%s", language_code)],
                );
                return AdminResponse::Json(StatusCode::BAD_REQUEST, json!({"message": message}));
            }
            Err(e) => return AdminResponse::Fault(e),
        };

        let shop_id = match ctx.shop.context_shop_id() {
            Some(shop_id) => shop_id,
            None => match self.default_shop() {
                Ok(shop_id) => shop_id,
                Err(e) => return AdminResponse::Fault(e),
            },
        };
        let limit = match params.limit.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_SEARCH_LIMIT,
            Some(raw) => dto::intval(raw),
        };
        let phrase = params.query.as_deref().unwrap_or_default();

        let query = match SearchProductsForAssociation::new(phrase, language.id, shop_id, limit) {
            Ok(query) => query,
            Err(e @ CatalogError::ProductConstraint { .. }) => {
                return AdminResponse::Json(StatusCode::BAD_REQUEST, json!({"message": e.to_string()}));
            }
            Err(e) => return AdminResponse::Fault(e),
        };

        match self.services.queries.ask(query) {
            Ok(hits) if hits.is_empty() => AdminResponse::Json(StatusCode::NOT_FOUND, json!([])),
            Ok(hits) => {
                let entries: Vec<AssociationEntry> = hits.iter().map(AssociationEntry::from).collect();
                AdminResponse::Json(StatusCode::OK, json!(entries))
            }
            Err(e @ CatalogError::ProductConstraint { .. }) => {
                AdminResponse::Json(StatusCode::BAD_REQUEST, json!({"message": e.to_string()}))
            }
            Err(e) => AdminResponse::Fault(e),
        }
    }
}

fn grid_to_csv(grid: &ProductGrid) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["id", "name", "reference", "category", "price", "quantity", "active"])?;
    for row in &grid.rows {
        writer.write_record([
            row.id.to_string(),
            row.name.clone(),
            row.reference.clone(),
            row.category.clone().unwrap_or_default(),
            format!("{}.{:02}", row.price_cents / 100, row.price_cents % 100),
            row.quantity.to_string(),
            u8::from(row.active).to_string(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
