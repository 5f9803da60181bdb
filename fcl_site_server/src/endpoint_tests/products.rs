use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use fcl_commerce_engine::{
    db_types::{NewProduct, Product, Role},
    CatalogApi,
};
use fcl_common::UsdCents;
use serde_json::json;
use sqlx::types::Json;

use super::{
    helpers::{delete_request, get_request, parse, post_request, put_request, valid_token},
    mocks::MockCatalogDb,
};
use crate::routes::{
    CreateProductRoute,
    DeleteProductRoute,
    FeaturedProductsRoute,
    ProductRoute,
    ProductsRoute,
    UpdateProductRoute,
};

#[actix_web::test]
async fn list_products() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/products", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let res = parse(&body);
    assert_eq!(res["success"], json!(true));
    assert_eq!(res["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(res["pagination"], json!({"page": 1, "limit": 12, "total": 25, "pages": 3}));
}

#[actix_web::test]
async fn list_products_with_explicit_page() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/products?page=2&limit=10", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let res = parse(&body);
    assert_eq!(res["pagination"], json!({"page": 2, "limit": 10, "total": 25, "pages": 3}));
}

#[actix_web::test]
async fn fetch_product_by_sku() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/products/FCL-001", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let res = parse(&body);
    assert_eq!(res["data"]["sku"], json!("FCL-001"));
    assert_eq!(res["data"]["price"], json!(4500));
    assert_eq!(res["data"]["cryptoEnabled"], json!(true));
}

#[actix_web::test]
async fn fetch_unknown_product() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/products/NO-SUCH-SKU", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&body), json!({"success": false, "message": "Product not found"}));
}

#[actix_web::test]
async fn featured_products_list() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/products/featured/list", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let res = parse(&body);
    assert_eq!(res["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(res["data"][0]["featured"], json!(true));
}

#[actix_web::test]
async fn create_product_without_token() {
    let _ = env_logger::try_init().ok();
    let body = json!({"sku": "FCL-100"});
    let err = post_request("", "/products", &body, configure).await.expect_err("Expected error");
    assert_eq!(err, "Authentication required");
}

#[actix_web::test]
async fn create_product_as_normal_user() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::User);
    let body = json!({"sku": "FCL-100"});
    let err = post_request(&token, "/products", &body, configure).await.expect_err("Expected error");
    assert_eq!(err, "Insufficient permissions");
}

#[actix_web::test]
async fn create_product_with_no_fields() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::Admin);
    let (status, body) = post_request(&token, "/products", &json!({}), configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let res = parse(&body);
    assert_eq!(res["message"], json!("Validation failed"));
    assert_eq!(
        res["errors"],
        json!([
            {"field": "title", "message": "Title is required"},
            {"field": "sku", "message": "SKU is required"},
            {"field": "price", "message": "Price must be a number"},
            {"field": "description", "message": "Description is required"},
            {"field": "initiativeId", "message": "Initiative ID is required"},
        ])
    );
}

#[actix_web::test]
async fn create_product() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::Admin);
    let body = json!({
        "sku": "FCL-100",
        "title": "Enamel Badge",
        "description": "Collectible enamel badge",
        "price": 29.99,
        "initiativeId": "heritage-line",
        "featured": true,
    });
    let (status, body) = post_request(&token, "/products", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::CREATED);
    let res = parse(&body);
    assert_eq!(res["message"], json!("Product created successfully"));
    assert_eq!(res["data"]["sku"], json!("FCL-100"));
    // 29.99 dollars are stored as whole cents
    assert_eq!(res["data"]["price"], json!(2999));
    assert_eq!(res["data"]["featured"], json!(true));
}

#[actix_web::test]
async fn update_product() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::Admin);
    let body = json!({"title": "Signal Lantern Mk II"});
    let (status, body) = put_request(&token, "/products/FCL-001", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let res = parse(&body);
    assert_eq!(res["message"], json!("Product updated successfully"));
    assert_eq!(res["data"]["title"], json!("Signal Lantern Mk II"));
}

#[actix_web::test]
async fn update_product_with_empty_title() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::Admin);
    let body = json!({"title": ""});
    let (status, body) = put_request(&token, "/products/FCL-001", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let res = parse(&body);
    assert_eq!(res["errors"], json!([{"field": "title", "message": "Title cannot be empty"}]));
}

#[actix_web::test]
async fn update_unknown_product() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::Admin);
    let body = json!({"title": "Anything"});
    let (status, body) = put_request(&token, "/products/NO-SUCH-SKU", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&body), json!({"success": false, "message": "Product not found"}));
}

#[actix_web::test]
async fn delete_product() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::Admin);
    let (status, body) = delete_request(&token, "/products/FCL-001", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!({"success": true, "message": "Product deleted successfully"}));
}

#[actix_web::test]
async fn delete_product_as_normal_user() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::User);
    let err = delete_request(&token, "/products/FCL-001", configure).await.expect_err("Expected error");
    assert_eq!(err, "Insufficient permissions");
}

fn test_product(id: i64, sku: &str) -> Product {
    Product {
        id,
        sku: sku.to_string(),
        title: "Signal Lantern".to_string(),
        description: "A battery powered signal lantern".to_string(),
        price: UsdCents::from(4500),
        currency: "USD".to_string(),
        images: Json(vec!["/img/lantern.jpg".to_string()]),
        inventory_count: 12,
        initiative_id: Some("heritage-line".to_string()),
        metadata: None,
        stripe_price_id: None,
        crypto_enabled: true,
        featured: false,
        is_active: true,
        created_at: Utc.with_ymd_and_hms(2025, 5, 20, 9, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2025, 5, 20, 9, 0, 0).unwrap(),
    }
}

fn product_from_new(p: NewProduct) -> Product {
    Product {
        id: 9,
        sku: p.sku,
        title: p.title,
        description: p.description,
        price: p.price,
        currency: p.currency,
        images: Json(p.images),
        inventory_count: p.inventory_count,
        initiative_id: p.initiative_id,
        metadata: p.metadata.map(Json),
        stripe_price_id: p.stripe_price_id,
        crypto_enabled: p.crypto_enabled,
        featured: p.featured,
        is_active: p.is_active,
        created_at: Utc.with_ymd_and_hms(2025, 5, 20, 9, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2025, 5, 20, 9, 0, 0).unwrap(),
    }
}

fn configure(cfg: &mut ServiceConfig) {
    let mut catalog = MockCatalogDb::new();
    catalog
        .expect_search_products()
        .returning(|_| Ok((vec![test_product(1, "FCL-001"), test_product(2, "FCL-002")], 25)));
    catalog
        .expect_fetch_product_by_sku()
        .returning(|sku| Ok((sku == "FCL-001").then(|| test_product(1, "FCL-001"))));
    catalog.expect_fetch_featured_products().returning(|_| {
        let mut product = test_product(1, "FCL-001");
        product.featured = true;
        Ok(vec![product])
    });
    catalog.expect_insert_product().returning(|p| Ok(product_from_new(p)));
    catalog.expect_update_product().returning(|sku, update| {
        Ok((sku == "FCL-001").then(|| {
            let mut product = test_product(1, "FCL-001");
            if let Some(title) = update.title {
                product.title = title;
            }
            product
        }))
    });
    catalog.expect_deactivate_product().returning(|sku| {
        Ok((sku == "FCL-001").then(|| {
            let mut product = test_product(1, "FCL-001");
            product.is_active = false;
            product
        }))
    });
    let api = CatalogApi::new(catalog);
    cfg.app_data(web::Data::new(api))
        .service(FeaturedProductsRoute::<MockCatalogDb>::new())
        .service(ProductsRoute::<MockCatalogDb>::new())
        .service(CreateProductRoute::<MockCatalogDb>::new())
        .service(UpdateProductRoute::<MockCatalogDb>::new())
        .service(DeleteProductRoute::<MockCatalogDb>::new())
        .service(ProductRoute::<MockCatalogDb>::new());
}
