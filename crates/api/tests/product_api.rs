//! HTTP-level integration tests for products and the dashboard counters.

mod common;

use axum::http::StatusCode;
use catalog_core::types::DbId;
use common::{
    body_json, category_body, create_category, delete_json, get_auth, post_json, provision,
};
use sqlx::PgPool;

fn product_body(category_id: DbId, sku: &str) -> serde_json::Value {
    serde_json::json!({
        "category_id": category_id,
        "name": format!("Product {sku}"),
        "description": "desc",
        "price": 19.5,
        "sku": sku,
        "product_image_ids": ["p-img"],
        "colors": ["red"],
        "sizes": ["M", "L"]
    })
}

async fn create_product(pool: &PgPool, token: &str, category_id: DbId, sku: &str) -> DbId {
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/products", token, product_body(category_id, sku)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["product_id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_returns_201_and_updates_category(pool: PgPool) {
    let (_, token) = provision(&pool, "user_a").await;
    let cat = create_category(&pool, &token, category_body("Shoes")).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/products", &token, product_body(cat, "SKU-1")).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Product listed successfully");
    assert_eq!(json["product"]["is_active"], true);
    let product_id = json["product_id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, &format!("/api/v1/category/{cat}"), &token).await).await;
    assert_eq!(json["category"]["product_ids"], serde_json::json!([product_id]));
    assert_eq!(json["category"]["product_count"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_sku_returns_409(pool: PgPool) {
    let (_, token) = provision(&pool, "user_a").await;
    let cat = create_category(&pool, &token, category_body("Shoes")).await;
    create_product(&pool, &token, cat, "SKU-1").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/products", &token, product_body(cat, "SKU-1")).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["message"], "A product with this SKU already exists");

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, "/api/v1/products", &token).await).await;
    assert_eq!(json["products"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_fields_are_rejected(pool: PgPool) {
    let (_, token) = provision(&pool, "user_a").await;
    let cat = create_category(&pool, &token, category_body("Shoes")).await;

    let mut negative = product_body(cat, "NEG");
    negative["price"] = serde_json::json!(-1.0);
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/products", &token, negative).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut odd_size = product_body(cat, "SIZE");
    odd_size["sizes"] = serde_json::json!(["XXXL"]);
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/products", &token, odd_size).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut missing_sku = product_body(cat, "X");
    missing_sku.as_object_mut().unwrap().remove("sku");
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/products", &token, missing_sku).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_in_foreign_category_returns_404(pool: PgPool) {
    let (_, theirs) = provision(&pool, "user_b").await;
    let foreign = create_category(&pool, &theirs, category_body("Theirs")).await;
    let (_, token) = provision(&pool, "user_a").await;

    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/products", &token, product_body(foreign, "S")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn list_is_newest_first_with_filter_and_paging(pool: PgPool) {
    let (_, token) = provision(&pool, "user_a").await;
    let shoes = create_category(&pool, &token, category_body("Shoes")).await;
    let hats = create_category(&pool, &token, category_body("Hats")).await;
    let p1 = create_product(&pool, &token, shoes, "S1").await;
    let p2 = create_product(&pool, &token, hats, "H1").await;
    let p3 = create_product(&pool, &token, shoes, "S2").await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/api/v1/products", &token).await).await;
    let ids: Vec<i64> = json["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![p3, p2, p1]);
    assert_eq!(json["products"][1]["category_name"], "Hats");

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/products?category_id={shoes}");
    let json = body_json(get_auth(app, &uri, &token).await).await;
    assert_eq!(json["products"].as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, "/api/v1/products?limit=1&offset=1", &token).await).await;
    let products = json["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["id"], p2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_query_parameter_returns_400(pool: PgPool) {
    let (_, token) = provision(&pool, "user_a").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/products?page=2", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_removes_product_from_category(pool: PgPool) {
    let (_, token) = provision(&pool, "user_a").await;
    let cat = create_category(&pool, &token, category_body("Shoes")).await;
    let keep = create_product(&pool, &token, cat, "KEEP").await;
    let gone = create_product(&pool, &token, cat, "GONE").await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({"product_id": gone, "category_id": cat});
    let response = delete_json(app, "/api/v1/products", &token, body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Product deleted successfully");

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, &format!("/api/v1/category/{cat}"), &token).await).await;
    assert_eq!(json["category"]["product_ids"], serde_json::json!([keep]));
    assert_eq!(json["category"]["product_count"], 1);

    let app = common::build_test_app(pool);
    let response = delete_json(app, "/api/v1/products", &token, body).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_of_foreign_product_returns_404(pool: PgPool) {
    let (_, theirs) = provision(&pool, "user_b").await;
    let cat = create_category(&pool, &theirs, category_body("Theirs")).await;
    let product = create_product(&pool, &theirs, cat, "THEIRS").await;
    let (_, token) = provision(&pool, "user_a").await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({"product_id": product, "category_id": cat});
    let response = delete_json(app, "/api/v1/products", &token, body).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn dashboard_stats_count_owned_records(pool: PgPool) {
    let (_, token) = provision(&pool, "user_a").await;
    let public = create_category(&pool, &token, category_body("Public")).await;
    let mut private = category_body("Private");
    private["is_public"] = serde_json::json!(false);
    create_category(&pool, &token, private).await;
    create_product(&pool, &token, public, "A").await;
    let mut inactive = product_body(public, "B");
    inactive["is_active"] = serde_json::json!(false);
    let app = common::build_test_app(pool.clone());
    post_json(app, "/api/v1/products", &token, inactive).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/dashboard/stats", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total_categories"], 2);
    assert_eq!(json["public_categories"], 1);
    assert_eq!(json["private_categories"], 1);
    assert_eq!(json["total_products"], 2);
    assert_eq!(json["active_products"], 1);
    assert_eq!(json["inactive_products"], 1);
}
