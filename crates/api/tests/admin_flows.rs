//! In-process tests of the product admin over the real router.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use backoffice_api::app::services::build_demo_services;
use backoffice_api::app::{AppServices, build_router};
use backoffice_api::config::ServerConfig;
use backoffice_auth::{Hs256JwtValidator, JwtClaims, PrincipalId, Role};
use backoffice_catalog::{
    AddProduct, GetProductForEditing, HasShopAssociation, ProductDraft, ShopConstraint,
};
use backoffice_core::{LanguageId, ProductId, ShopId};
use backoffice_infra::seed::DEMO_VIRTUAL_FILENAME;

const SECRET: &str = "test-secret";

struct Harness {
    router: Router,
    services: Arc<AppServices>,
    dir: TempDir,
}

impl Harness {
    fn new(multishop: bool) -> Self {
        Self::with_env(multishop, &[])
    }

    fn with_env(multishop: bool, extra: &[(&str, &str)]) -> Self {
        backoffice_observability::init_for_tests();
        let dir = tempfile::tempdir().unwrap();
        let download_dir = dir.path().to_string_lossy().into_owned();
        let config = ServerConfig::from_lookup(|key| match key {
            "JWT_SECRET" => Some(SECRET.to_string()),
            "DOWNLOAD_DIR" => Some(download_dir.clone()),
            "MULTISHOP_FEATURE_ACTIVE" => Some(if multishop { "1" } else { "0" }.to_string()),
            _ => extra
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string()),
        })
        .unwrap();

        let services = Arc::new(build_demo_services(&config).unwrap());
        let router = build_router(services.clone(), Arc::new(Hs256JwtValidator::new(SECRET)));
        Self {
            router,
            services,
            dir,
        }
    }

    async fn send(&self, req: Request<Body>) -> Reply {
        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let headers = res.headers().clone();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        Reply {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    fn is_active(&self, id: i64) -> bool {
        self.services
            .queries
            .ask(GetProductForEditing::new(id, ShopConstraint::AllShops, english()).unwrap())
            .unwrap()
            .active
    }

    fn name_of(&self, id: i64) -> String {
        self.services
            .queries
            .ask(GetProductForEditing::new(id, ShopConstraint::AllShops, english()).unwrap())
            .unwrap()
            .draft
            .name
    }

    fn exists(&self, id: u32) -> bool {
        self.services
            .queries
            .ask(HasShopAssociation {
                product_id: ProductId::new(id).unwrap(),
                shop_id: shop(1),
            })
            .is_ok()
    }
}

struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl Reply {
    fn location(&self) -> &str {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    /// `name=value` part of the session cookie, ready for a `Cookie` header.
    fn session_cookie(&self) -> String {
        let raw = self.headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
        raw.split(';').next().unwrap().to_string()
    }

    fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

fn shop(id: u32) -> ShopId {
    ShopId::new(id).unwrap()
}

fn english() -> LanguageId {
    LanguageId::new(1).unwrap()
}

fn mint(roles: &[&'static str], language: Option<u32>) -> String {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: PrincipalId::new(),
        roles: roles.iter().map(|r| Role::new(*r)).collect(),
        language_id: language.map(|id| LanguageId::new(id).unwrap()),
        issued_at: now - Duration::seconds(1),
        expires_at: now + Duration::minutes(10),
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn admin() -> String {
    mint(&["admin"], None)
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn post_form(uri: &str, token: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn with_cookie(mut req: Request<Body>, cookie: &str) -> Request<Body> {
    req.headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    req
}

fn with_shop(mut req: Request<Body>, selection: &'static str) -> Request<Body> {
    req.headers_mut()
        .insert("x-shop-context", selection.parse().unwrap());
    req
}

#[tokio::test]
async fn health_is_public_and_products_are_not() {
    let h = Harness::new(false);
    let res = h
        .send(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = h
        .send(Request::builder().uri("/products").body(Body::empty()).unwrap())
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_renders_index_and_issues_session_cookie() {
    let h = Harness::new(false);
    let res = h.send(get("/products", &admin())).await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("data-template=\"product/index\""));
    assert!(res.body.contains("Hummingbird printed t-shirt"));
    assert!(res.session_cookie().starts_with("backoffice_session="));
}

#[tokio::test]
async fn search_builds_name_with_reference() {
    let h = Harness::new(false);
    let res = h
        .send(get("/products/search-associations/en?query=shoe", &admin()))
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.json(),
        json!([{"id": 4, "name": "Shoe (ref: SKU1)", "image": "/img/p/default.jpg"}])
    );
}

#[tokio::test]
async fn search_with_unknown_language_is_400_with_exact_message() {
    let h = Harness::new(false);
    let res = h
        .send(get("/products/search-associations/xx-INVALID?query=shoe", &admin()))
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res.json(),
        json!({"message": "Invalid language code xx-INVALID was used which matches no existing language in this shop."})
    );
}

#[tokio::test]
async fn search_without_hits_is_404_with_empty_array() {
    let h = Harness::new(false);
    let res = h
        .send(get("/products/search-associations/en?query=zzzzzz", &admin()))
        .await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json(), json!([]));
}

#[tokio::test]
async fn search_rejects_short_phrases() {
    let h = Harness::new(false);
    let res = h
        .send(get("/products/search-associations/en?query=sh", &admin()))
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.json()["message"].as_str().unwrap().contains("at least 3 characters"));
}

#[tokio::test]
async fn search_respects_the_limit() {
    let h = Harness::new(false);
    let res = h
        .send(get("/products/search-associations/en?query=demo&limit=2", &admin()))
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json().as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn toggle_status_redirects_and_flashes_once() {
    let h = Harness::new(false);
    let token = admin();
    let before = h.is_active(1);

    let res = h.send(post_form("/products/1/toggle-status", &token, "")).await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), "/products");
    assert_eq!(h.is_active(1), !before);

    let cookie = res.session_cookie();
    let page = h.send(with_cookie(get("/products", &token), &cookie)).await;
    assert!(page.body.contains("The status has been successfully updated."));

    let again = h.send(with_cookie(get("/products", &token), &cookie)).await;
    assert!(!again.body.contains("The status has been successfully updated."));
}

#[tokio::test]
async fn toggling_twice_restores_status() {
    let h = Harness::new(false);
    let token = admin();
    let before = h.is_active(2);

    h.send(post_form("/products/2/toggle-status", &token, "")).await;
    h.send(post_form("/products/2/toggle-status", &token, "")).await;

    assert_eq!(h.is_active(2), before);
}

#[tokio::test]
async fn bulk_delete_removes_selected_products() {
    let h = Harness::new(false);
    let res = h
        .send(post_form(
            "/products/bulk-delete",
            &admin(),
            "product_bulk[]=2&product_bulk[]=3",
        ))
        .await;

    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert!(!h.exists(2));
    assert!(!h.exists(3));
    assert!(h.exists(1));
}

#[tokio::test]
async fn scalar_bulk_field_selects_nothing() {
    let h = Harness::new(false);
    let token = admin();
    let res = h
        .send(post_form("/products/bulk-delete", &token, "product_bulk=3"))
        .await;

    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert!(h.exists(3));

    let page = h
        .send(with_cookie(get("/products", &token), &res.session_cookie()))
        .await;
    assert!(page.body.contains("The selection has been successfully deleted."));
}

#[tokio::test]
async fn bulk_disable_then_enable() {
    let h = Harness::new(false);
    let token = admin();

    h.send(post_form("/products/bulk-disable", &token, "product_bulk[]=1&product_bulk[]=2"))
        .await;
    assert!(!h.is_active(1));
    assert!(!h.is_active(2));

    h.send(post_form("/products/bulk-enable", &token, "product_bulk[]=1"))
        .await;
    assert!(h.is_active(1));
    assert!(!h.is_active(2));
}

#[tokio::test]
async fn deleting_unknown_product_flashes_mapped_error() {
    let h = Harness::new(false);
    let token = admin();
    let res = h.send(post_form("/products/404/delete", &token, "")).await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);

    let page = h
        .send(with_cookie(get("/products", &token), &res.session_cookie()))
        .await;
    assert!(page.body.contains("The object cannot be loaded (or found)."));
}

#[tokio::test]
async fn create_redirects_to_edit_page() {
    let h = Harness::new(false);
    let res = h
        .send(post_form(
            "/products/new",
            &admin(),
            "name=Scarf&reference=SC1&price=12.50&quantity=3&category_id=3&active=1",
        ))
        .await;

    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), "/products/7/edit");
    assert!(h.is_active(7));
}

#[tokio::test]
async fn invalid_create_renders_form_with_field_errors() {
    let h = Harness::new(false);
    let res = h.send(post_form("/products/new", &admin(), "name=")).await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("data-template=\"product/create\""));
    assert!(res
        .body
        .contains("name: This value should be between 1 and 128 characters long."));
    assert!(!h.exists(7));
}

#[tokio::test]
async fn unknown_product_type_is_a_field_error_not_a_rejection() {
    let h = Harness::new(false);
    let res = h
        .send(post_form("/products/new", &admin(), "name=Scarf&product_type=bogus"))
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("data-template=\"product/create\""));
    assert!(res.body.contains("product_type: The selected choice is invalid."));
    assert!(!h.exists(7));
}

#[tokio::test]
async fn valid_edit_redirects_back_to_the_edit_page() {
    let h = Harness::new(false);
    let token = admin();
    let res = h
        .send(post_form(
            "/products/1/edit",
            &token,
            "name=Hat&reference=H1&price=5&quantity=1&category_id=3&active=1",
        ))
        .await;

    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), "/products/1/edit");
    assert_eq!(h.name_of(1), "Hat");

    let page = h
        .send(with_cookie(get("/products/1/edit", &token), &res.session_cookie()))
        .await;
    assert!(page.body.contains("Successful update"));
}

#[tokio::test]
async fn invalid_edit_rerenders_with_one_flash_per_field() {
    let h = Harness::new(false);
    let before = h.name_of(1);
    let res = h
        .send(post_form("/products/1/edit", &admin(), "name=&price=abc"))
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.headers.get(header::LOCATION).is_none());
    assert!(res.body.contains("data-template=\"product/edit\""));
    assert!(res
        .body
        .contains("name: This value should be between 1 and 128 characters long."));
    assert!(res
        .body
        .contains("price: This value should be a valid non-negative amount."));
    assert_eq!(h.name_of(1), before);
}

#[tokio::test]
async fn repeated_form_keys_keep_the_last_value() {
    let h = Harness::new(false);
    let res = h
        .send(post_form("/products/1/edit", &admin(), "name=Scarf&name=Hat"))
        .await;

    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(h.name_of(1), "Hat");
}

#[tokio::test]
async fn cookieless_clients_cannot_grow_the_flash_store() {
    let h = Harness::with_env(false, &[("FLASH_MAX_SESSIONS", "8")]);
    let token = admin();
    for _ in 0..50 {
        let res = h.send(post_form("/products/404/delete", &token, "")).await;
        assert_eq!(res.status, StatusCode::SEE_OTHER);
    }

    assert_eq!(h.services.flashes.pending_sessions(), 8);
}

#[tokio::test]
async fn edit_form_is_prefilled() {
    let h = Harness::new(false);
    let res = h.send(get("/products/4/edit", &admin())).await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("data-template=\"product/edit\""));
    assert!(res.body.contains("\"reference\":\"SKU1\""));
}

#[tokio::test]
async fn edit_in_all_shops_context_renders_disabled_page() {
    let h = Harness::new(true);
    let res = h.send(get("/products/1/edit", &admin())).await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("data-template=\"product/disabled\""));
}

#[tokio::test]
async fn edit_of_product_outside_shop_renders_missing_association() {
    let h = Harness::new(true);
    let id = h
        .services
        .commands
        .dispatch(AddProduct {
            draft: ProductDraft {
                name: "Shop two only".into(),
                ..ProductDraft::default()
            },
            shop_constraint: ShopConstraint::Shop(shop(2)),
        })
        .unwrap();

    let res = h
        .send(with_shop(get(&format!("/products/{id}/edit"), &admin()), "s-1"))
        .await;
    assert!(res.body.contains("data-template=\"product/missing_association\""));

    let res = h
        .send(with_shop(get(&format!("/products/{id}/edit"), &admin()), "s-2"))
        .await;
    assert!(res.body.contains("data-template=\"product/edit\""));
}

#[tokio::test]
async fn create_button_is_disabled_outside_single_shop_context() {
    let h = Harness::new(true);
    let res = h.send(get("/products", &admin())).await;
    assert!(res.body.contains("\"disabled\":true"));

    let res = h.send(with_shop(get("/products", &admin()), "s-1")).await;
    assert!(res.body.contains("\"href\":\"/products/new\""));
}

#[tokio::test]
async fn viewer_is_denied_mutations_but_may_read() {
    let h = Harness::new(false);
    let viewer = mint(&["viewer"], None);
    let before = h.is_active(1);

    let res = h.send(post_form("/products/1/toggle-status", &viewer, "")).await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(h.is_active(1), before);

    let page = h
        .send(with_cookie(get("/products", &viewer), &res.session_cookie()))
        .await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Access denied."));
}

#[tokio::test]
async fn unknown_role_gets_403_on_reads() {
    let h = Harness::new(false);
    let res = h.send(get("/products", &mint(&["intern"], None))).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.json()["error"], "forbidden");
}

#[tokio::test]
async fn category_without_name_in_language_is_404() {
    let h = Harness::new(false);
    let french = mint(&["admin"], Some(2));

    let res = h.send(get("/products?category_id=6", &french)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = h.send(get("/products?category_id=3", &french)).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn position_update_without_parent_flashes_error() {
    let h = Harness::new(false);
    let token = admin();
    let res = h
        .send(post_form(
            "/products/update-position",
            &token,
            "positions[0][rowId]=1&positions[0][oldPosition]=0&positions[0][newPosition]=1",
        ))
        .await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);

    let page = h
        .send(with_cookie(get("/products", &token), &res.session_cookie()))
        .await;
    assert!(page.body.contains("Missing parent id in your data."));
}

#[tokio::test]
async fn position_update_in_category_succeeds() {
    let h = Harness::new(false);
    let token = admin();
    let res = h
        .send(post_form(
            "/products/update-position",
            &token,
            "id_category=3&positions[0][rowId]=1&positions[0][oldPosition]=0&positions[0][newPosition]=1\
             &positions[1][rowId]=2&positions[1][oldPosition]=1&positions[1][newPosition]=0",
        ))
        .await;

    let page = h
        .send(with_cookie(get("/products", &token), &res.session_cookie()))
        .await;
    assert!(page.body.contains("Update successful"));
}

#[tokio::test]
async fn filter_redirects_with_query_and_reset_clears_it() {
    let h = Harness::new(false);
    let token = admin();
    let res = h
        .send(post_form("/products/filter", &token, "name=mug&sort_order=asc"))
        .await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert!(res.location().starts_with("/products?"));
    assert!(res.location().contains("name=mug"));

    let res = h.send(post_form("/products/filter/reset", &token, "")).await;
    assert_eq!(res.location(), "/products");
}

#[tokio::test]
async fn export_streams_csv() {
    let h = Harness::new(false);
    let res = h.send(get("/products/export?name=shoe", &admin())).await;

    assert_eq!(res.status, StatusCode::OK);
    let disposition = res.headers.get(header::CONTENT_DISPOSITION).unwrap().to_str().unwrap();
    assert!(disposition.contains("product_"));
    assert!(disposition.ends_with(".csv\""));
    let mut lines = res.body.lines();
    assert_eq!(lines.next(), Some("id,name,reference,category,price,quantity,active"));
    assert_eq!(lines.next(), Some("4,Shoe,SKU1,Accessories,49.00,12,1"));
}

#[tokio::test]
async fn download_streams_virtual_file() {
    let h = Harness::new(false);
    std::fs::write(h.dir.path().join(DEMO_VIRTUAL_FILENAME), b"pdf-bytes").unwrap();

    let res = h.send(get("/products/download/1", &admin())).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "pdf-bytes");
    let disposition = res.headers.get(header::CONTENT_DISPOSITION).unwrap().to_str().unwrap();
    assert_eq!(disposition, "attachment; filename=\"illustrated-guide.pdf\"");
}

#[tokio::test]
async fn download_of_unknown_or_missing_file_is_404() {
    let h = Harness::new(false);

    let res = h.send(get("/products/download/99", &admin())).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    // Known id, nothing on disk.
    let res = h.send(get("/products/download/1", &admin())).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json()["message"], "The file cannot be found.");
}

#[tokio::test]
async fn unknown_shop_context_header_is_400() {
    let h = Harness::new(true);
    let res = h.send(with_shop(get("/products", &admin()), "x-1")).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}
