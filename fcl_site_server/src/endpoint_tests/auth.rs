use actix_web::{http::StatusCode, web, web::ServiceConfig};
use fcl_commerce_engine::{
    db_types::{Role, User},
    traits::AuthApiError,
    AuthApi,
};
use serde_json::json;

use super::{
    helpers::{get_auth_config, get_request, parse, post_request, test_user, valid_token},
    mocks::MockAuthDb,
};
use crate::{
    auth::{hash_password, TokenIssuer},
    routes::{LoginRoute, MeRoute, RegisterRoute},
};

const PASSWORD: &str = "correct-horse-battery";

#[actix_web::test]
async fn register_with_no_fields() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_request("", "/auth/register", &json!({}), configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let res = parse(&body);
    assert_eq!(res["success"], json!(false));
    assert_eq!(res["message"], json!("Validation failed"));
    assert_eq!(
        res["errors"],
        json!([
            {"field": "email", "message": "Valid email is required"},
            {"field": "password", "message": "Password must be at least 8 characters long"},
        ])
    );
}

#[actix_web::test]
async fn register_with_short_password() {
    let _ = env_logger::try_init().ok();
    let body = json!({"email": "new@example.com", "password": "2short"});
    let (status, body) = post_request("", "/auth/register", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let res = parse(&body);
    assert_eq!(res["errors"], json!([{"field": "password", "message": "Password must be at least 8 characters long"}]));
}

#[actix_web::test]
async fn register_with_taken_email() {
    let _ = env_logger::try_init().ok();
    let body = json!({"email": "taken@example.com", "password": "long enough password"});
    let (status, body) = post_request("", "/auth/register", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse(&body), json!({"success": false, "message": "Email is already registered"}));
}

#[actix_web::test]
async fn register_new_user() {
    let _ = env_logger::try_init().ok();
    let body = json!({"email": "new@example.com", "password": "long enough password", "displayName": "Newbie"});
    let (status, body) = post_request("", "/auth/register", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::CREATED);
    let res = parse(&body);
    assert_eq!(res["success"], json!(true));
    assert_eq!(res["message"], json!("User registered successfully"));
    let user = &res["data"]["user"];
    assert_eq!(user["email"], json!("new@example.com"));
    assert_eq!(user["displayName"], json!("Newbie"));
    assert_eq!(user["role"], json!("USER"));
    // The password hash must never appear on the wire
    assert!(user.get("passwordHash").is_none());
    let token = res["data"]["token"].as_str().expect("No token in response");
    let claims = TokenIssuer::new(&get_auth_config()).validate_token(token).expect("Token does not validate");
    assert_eq!(claims.email, "new@example.com");
}

#[actix_web::test]
async fn login_with_missing_password() {
    let _ = env_logger::try_init().ok();
    let body = json!({"email": "user1@example.com"});
    let (status, body) = post_request("", "/auth/login", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(parse(&body), json!({"success": false, "message": "Invalid email or password"}));
}

#[actix_web::test]
async fn login_with_unknown_email() {
    let _ = env_logger::try_init().ok();
    let body = json!({"email": "nobody@example.com", "password": PASSWORD});
    let (status, body) = post_request("", "/auth/login", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(parse(&body), json!({"success": false, "message": "Invalid email or password"}));
}

#[actix_web::test]
async fn login_with_wrong_password() {
    let _ = env_logger::try_init().ok();
    let body = json!({"email": "user1@example.com", "password": "not the password"});
    let (status, body) = post_request("", "/auth/login", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(parse(&body), json!({"success": false, "message": "Invalid email or password"}));
}

#[actix_web::test]
async fn login_with_deactivated_account() {
    let _ = env_logger::try_init().ok();
    // Correct credentials, but the account has been switched off
    let body = json!({"email": "sleeper@example.com", "password": PASSWORD});
    let (status, body) = post_request("", "/auth/login", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(parse(&body), json!({"success": false, "message": "Invalid email or password"}));
}

#[actix_web::test]
async fn login_with_valid_credentials() {
    let _ = env_logger::try_init().ok();
    let body = json!({"email": "user1@example.com", "password": PASSWORD});
    let (status, body) = post_request("", "/auth/login", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let res = parse(&body);
    assert_eq!(res["success"], json!(true));
    assert_eq!(res["data"]["user"]["email"], json!("user1@example.com"));
    let token = res["data"]["token"].as_str().expect("No token in response");
    let claims = TokenIssuer::new(&get_auth_config()).validate_token(token).expect("Token does not validate");
    assert_eq!(claims.sub, 1);
    assert!(claims.roles.contains(&Role::User));
}

#[actix_web::test]
async fn me_without_token() {
    let _ = env_logger::try_init().ok();
    let err = get_request("", "/auth/me", configure).await.expect_err("Expected error");
    assert_eq!(err, "Authentication required");
}

#[actix_web::test]
async fn me_with_garbage_token() {
    let _ = env_logger::try_init().ok();
    let err = get_request("made up nonsense", "/auth/me", configure).await.expect_err("Expected error");
    assert_eq!(err, "Invalid or expired token");
}

#[actix_web::test]
async fn me_returns_current_user() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::User);
    let (status, body) = get_request(&token, "/auth/me", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let res = parse(&body);
    assert_eq!(res["success"], json!(true));
    assert_eq!(res["data"]["email"], json!("user1@example.com"));
}

#[actix_web::test]
async fn me_accepts_admin_tokens() {
    let _ = env_logger::try_init().ok();
    // Admin tokens carry the USER role too, so user-level endpoints accept them
    let token = valid_token(Role::Admin);
    let (status, _) = get_request(&token, "/auth/me", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn me_with_vanished_user() {
    let _ = env_logger::try_init().ok();
    let signer = TokenIssuer::new(&get_auth_config());
    let token = signer.issue_token(&test_user(99, Role::User)).expect("Failed to issue token");
    let (status, body) = get_request(&token, "/auth/me", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&body), json!({"success": false, "message": "User not found"}));
}

fn user_with_password(password: &str, is_active: bool) -> User {
    let mut user = test_user(1, Role::User);
    user.password_hash = hash_password(password).expect("Hashing failed");
    user.is_active = is_active;
    user
}

fn configure(cfg: &mut ServiceConfig) {
    let mut auth_db = MockAuthDb::new();
    auth_db.expect_create_user().returning(|u| {
        if u.email == "taken@example.com" {
            return Err(AuthApiError::EmailAlreadyRegistered);
        }
        let mut user = test_user(7, u.role);
        user.email = u.email;
        user.password_hash = u.password_hash;
        user.display_name = u.display_name;
        Ok(user)
    });
    auth_db.expect_fetch_user_by_email().returning(|email| {
        Ok(match email {
            "user1@example.com" => Some(user_with_password(PASSWORD, true)),
            "sleeper@example.com" => Some(user_with_password(PASSWORD, false)),
            _ => None,
        })
    });
    auth_db.expect_fetch_user_by_id().returning(|id| Ok((id == 1).then(|| test_user(1, Role::User))));
    let api = AuthApi::new(auth_db);
    cfg.app_data(web::Data::new(api))
        .service(RegisterRoute::<MockAuthDb>::new())
        .service(LoginRoute::<MockAuthDb>::new())
        .service(MeRoute::<MockAuthDb>::new());
}
