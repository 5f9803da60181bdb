use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use fcl_commerce_engine::{
    db_types::{Initiative, InitiativeStatus, NewInitiative, Role},
    CatalogApi,
};
use serde_json::json;
use sqlx::types::Json;

use super::{
    helpers::{delete_request, get_request, parse, post_request, put_request, valid_token},
    mocks::MockCatalogDb,
};
use crate::routes::{
    CreateInitiativeRoute,
    DeleteInitiativeRoute,
    FeaturedInitiativesRoute,
    InitiativeRoute,
    InitiativesRoute,
    UpdateInitiativeRoute,
};

#[actix_web::test]
async fn list_initiatives() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/initiatives", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let res = parse(&body);
    assert_eq!(res["success"], json!(true));
    assert_eq!(res["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(res["pagination"], json!({"page": 1, "limit": 12, "total": 2, "pages": 1}));
}

#[actix_web::test]
async fn list_initiatives_filtered_to_featured() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/initiatives?featured=true", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let res = parse(&body);
    assert_eq!(res["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(res["data"][0]["featured"], json!(true));
}

#[actix_web::test]
async fn featured_initiatives_list() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/initiatives/featured/list", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let res = parse(&body);
    assert_eq!(res["data"].as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn fetch_initiative_by_slug() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/initiatives/heritage-line", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let res = parse(&body);
    assert_eq!(res["data"]["slug"], json!("heritage-line"));
    assert_eq!(res["data"]["status"], json!("active"));
    // display_order goes out as `order`
    assert_eq!(res["data"]["order"], json!(3));
}

#[actix_web::test]
async fn fetch_unknown_initiative() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/initiatives/no-such-slug", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&body), json!({"success": false, "message": "Initiative not found"}));
}

#[actix_web::test]
async fn create_initiative_without_token() {
    let _ = env_logger::try_init().ok();
    let err = post_request("", "/initiatives", &json!({}), configure).await.expect_err("Expected error");
    assert_eq!(err, "Authentication required");
}

#[actix_web::test]
async fn create_initiative_as_normal_user() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::User);
    let err = post_request(&token, "/initiatives", &json!({}), configure).await.expect_err("Expected error");
    assert_eq!(err, "Insufficient permissions");
}

#[actix_web::test]
async fn create_initiative_with_no_fields() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::Admin);
    let (status, body) = post_request(&token, "/initiatives", &json!({}), configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let res = parse(&body);
    assert_eq!(
        res["errors"],
        json!([
            {"field": "title", "message": "Title is required"},
            {"field": "slug", "message": "Slug is required"},
            {"field": "summary", "message": "Summary is required"},
        ])
    );
}

#[actix_web::test]
async fn create_initiative_with_bad_status() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::Admin);
    let body = json!({"title": "Depot", "slug": "depot", "summary": "The depot", "status": "bogus"});
    let (status, body) = post_request(&token, "/initiatives", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let res = parse(&body);
    assert_eq!(res["errors"], json!([{"field": "status", "message": "Invalid status"}]));
}

#[actix_web::test]
async fn create_initiative() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::Admin);
    let body = json!({
        "title": "Depot Restoration",
        "slug": "depot-restoration",
        "summary": "Bringing the old depot back to life",
        "featured": true,
        "order": 7,
    });
    let (status, body) = post_request(&token, "/initiatives", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::CREATED);
    let res = parse(&body);
    assert_eq!(res["message"], json!("Initiative created successfully"));
    assert_eq!(res["data"]["slug"], json!("depot-restoration"));
    assert_eq!(res["data"]["status"], json!("active"));
    assert_eq!(res["data"]["order"], json!(7));
}

#[actix_web::test]
async fn update_initiative() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::Admin);
    let body = json!({"title": "Heritage Line 2.0"});
    let (status, body) =
        put_request(&token, "/initiatives/heritage-line", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let res = parse(&body);
    assert_eq!(res["message"], json!("Initiative updated successfully"));
    assert_eq!(res["data"]["title"], json!("Heritage Line 2.0"));
}

#[actix_web::test]
async fn update_unknown_initiative() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::Admin);
    let body = json!({"title": "Anything"});
    let (status, body) =
        put_request(&token, "/initiatives/no-such-slug", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&body), json!({"success": false, "message": "Initiative not found"}));
}

#[actix_web::test]
async fn delete_initiative() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::Admin);
    let (status, body) = delete_request(&token, "/initiatives/heritage-line", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!({"success": true, "message": "Initiative deleted successfully"}));
}

fn test_initiative(id: i64, slug: &str) -> Initiative {
    Initiative {
        id,
        slug: slug.to_string(),
        title: "Heritage Line".to_string(),
        summary: "Restoring classic rolling stock".to_string(),
        long_description: None,
        hero_image: Some("/img/heritage.jpg".to_string()),
        gallery: Json(vec![]),
        featured: false,
        display_order: 3,
        status: InitiativeStatus::Active,
        external_docs_link: None,
        created_at: Utc.with_ymd_and_hms(2025, 4, 2, 8, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2025, 4, 2, 8, 0, 0).unwrap(),
    }
}

fn initiative_from_new(i: NewInitiative) -> Initiative {
    Initiative {
        id: 9,
        slug: i.slug,
        title: i.title,
        summary: i.summary,
        long_description: i.long_description,
        hero_image: i.hero_image,
        gallery: Json(i.gallery),
        featured: i.featured,
        display_order: i.display_order,
        status: i.status,
        external_docs_link: i.external_docs_link,
        created_at: Utc.with_ymd_and_hms(2025, 4, 2, 8, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2025, 4, 2, 8, 0, 0).unwrap(),
    }
}

fn configure(cfg: &mut ServiceConfig) {
    let mut catalog = MockCatalogDb::new();
    catalog.expect_search_initiatives().returning(|query| {
        if query.featured == Some(true) {
            let mut featured = test_initiative(2, "featured-line");
            featured.featured = true;
            Ok((vec![featured], 1))
        } else {
            Ok((vec![test_initiative(1, "heritage-line"), test_initiative(2, "featured-line")], 2))
        }
    });
    catalog
        .expect_fetch_initiative_by_slug()
        .returning(|slug| Ok((slug == "heritage-line").then(|| test_initiative(1, "heritage-line"))));
    catalog.expect_fetch_featured_initiatives().returning(|_| {
        let mut featured = test_initiative(2, "featured-line");
        featured.featured = true;
        Ok(vec![featured])
    });
    catalog.expect_insert_initiative().returning(|i| Ok(initiative_from_new(i)));
    catalog.expect_update_initiative().returning(|slug, update| {
        Ok((slug == "heritage-line").then(|| {
            let mut initiative = test_initiative(1, "heritage-line");
            if let Some(title) = update.title {
                initiative.title = title;
            }
            initiative
        }))
    });
    catalog.expect_deactivate_initiative().returning(|slug| {
        Ok((slug == "heritage-line").then(|| {
            let mut initiative = test_initiative(1, "heritage-line");
            initiative.status = InitiativeStatus::Inactive;
            initiative
        }))
    });
    let api = CatalogApi::new(catalog);
    cfg.app_data(web::Data::new(api))
        .service(FeaturedInitiativesRoute::<MockCatalogDb>::new())
        .service(InitiativesRoute::<MockCatalogDb>::new())
        .service(CreateInitiativeRoute::<MockCatalogDb>::new())
        .service(UpdateInitiativeRoute::<MockCatalogDb>::new())
        .service(DeleteInitiativeRoute::<MockCatalogDb>::new())
        .service(InitiativeRoute::<MockCatalogDb>::new());
}
