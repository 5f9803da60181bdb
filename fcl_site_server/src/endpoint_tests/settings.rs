use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use fcl_commerce_engine::{
    db_types::{Role, SiteSetting},
    SettingsApi,
};
use serde_json::json;

use super::{
    helpers::{get_request, parse, put_request, valid_token},
    mocks::MockSettingsDb,
};
use crate::routes::{SettingRoute, SettingsRoute, UpdateSettingRoute};

#[actix_web::test]
async fn fetch_all_settings() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/settings", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let res = parse(&body);
    assert_eq!(res["success"], json!(true));
    // JSON-valued settings come back parsed, everything else as a plain string
    assert_eq!(res["data"]["homepage"]["headline"], json!("All aboard"));
    assert_eq!(res["data"]["contact_phone"], json!("555-0100"));
}

#[actix_web::test]
async fn fetch_single_setting() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/settings/homepage", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let res = parse(&body);
    assert_eq!(res["data"], json!({"key": "homepage", "value": {"headline": "All aboard"}}));
}

#[actix_web::test]
async fn fetch_unknown_setting() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/settings/no-such-key", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&body), json!({"success": false, "message": "Setting not found"}));
}

#[actix_web::test]
async fn update_setting_without_token() {
    let _ = env_logger::try_init().ok();
    let body = json!({"value": "556-0100"});
    let err = put_request("", "/settings/contact_phone", &body, configure).await.expect_err("Expected error");
    assert_eq!(err, "Authentication required");
}

#[actix_web::test]
async fn update_setting_as_normal_user() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::User);
    let body = json!({"value": "556-0100"});
    let err = put_request(&token, "/settings/contact_phone", &body, configure).await.expect_err("Expected error");
    assert_eq!(err, "Insufficient permissions");
}

#[actix_web::test]
async fn update_setting_without_value() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::Admin);
    let (status, body) =
        put_request(&token, "/settings/contact_phone", &json!({}), configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let res = parse(&body);
    assert_eq!(res["errors"], json!([{"field": "value", "message": "Value is required"}]));
}

#[actix_web::test]
async fn update_setting() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::Admin);
    let body = json!({"value": "556-0100"});
    let (status, body) =
        put_request(&token, "/settings/contact_phone", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let res = parse(&body);
    assert_eq!(res["message"], json!("Setting updated successfully"));
    assert_eq!(res["data"]["key"], json!("contact_phone"));
    assert_eq!(res["data"]["value"], json!("556-0100"));
}

fn test_setting(id: i64, key: &str, value: &str) -> SiteSetting {
    SiteSetting {
        id,
        key: key.to_string(),
        value: value.to_string(),
        updated_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap(),
    }
}

fn configure(cfg: &mut ServiceConfig) {
    let mut settings = MockSettingsDb::new();
    settings.expect_fetch_settings().returning(|| {
        Ok(vec![
            test_setting(1, "homepage", r#"{"headline":"All aboard"}"#),
            test_setting(2, "contact_phone", "555-0100"),
        ])
    });
    settings.expect_fetch_setting().returning(|key| {
        Ok((key == "homepage").then(|| test_setting(1, "homepage", r#"{"headline":"All aboard"}"#)))
    });
    settings.expect_upsert_setting().returning(|key, value| Ok(test_setting(2, key, value)));
    let api = SettingsApi::new(settings);
    cfg.app_data(web::Data::new(api))
        .service(UpdateSettingRoute::<MockSettingsDb>::new())
        .service(SettingsRoute::<MockSettingsDb>::new())
        .service(SettingRoute::<MockSettingsDb>::new());
}
