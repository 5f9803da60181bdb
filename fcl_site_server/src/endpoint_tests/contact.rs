use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use fcl_commerce_engine::{
    db_types::{ContactMessage, ContactPriority, ContactStatus, NewsletterSubscription, Role},
    events::EventProducers,
    traits::ContactApiError,
    ContactApi,
};
use serde_json::json;

use super::{
    helpers::{get_request, parse, post_request, put_request, valid_token},
    mocks::MockContactDb,
};
use crate::routes::{
    ContactMessagesRoute,
    NewsletterSubscribeRoute,
    NewsletterUnsubscribeRoute,
    SubmitContactRoute,
    UpdateMessageStatusRoute,
};

#[actix_web::test]
async fn submit_contact_with_no_fields() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_request("", "/contact", &json!({}), configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let res = parse(&body);
    assert_eq!(res["message"], json!("Validation failed"));
    assert_eq!(
        res["errors"],
        json!([
            {"field": "name", "message": "Name is required"},
            {"field": "email", "message": "Valid email is required"},
            {"field": "subject", "message": "Subject is required"},
            {"field": "message", "message": "Message is required"},
        ])
    );
}

#[actix_web::test]
async fn submit_contact_with_bad_email() {
    let _ = env_logger::try_init().ok();
    let body = json!({"name": "Bob", "email": "not-an-email", "subject": "Hi", "message": "Hello there"});
    let (status, body) = post_request("", "/contact", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let res = parse(&body);
    assert_eq!(res["errors"], json!([{"field": "email", "message": "Valid email is required"}]));
}

#[actix_web::test]
async fn submit_contact() {
    let _ = env_logger::try_init().ok();
    let body = json!({
        "name": "Bob",
        "email": "bob@example.com",
        "subject": "Opening hours",
        "message": "When does the depot open?",
    });
    let (status, body) = post_request("", "/contact", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::CREATED);
    let res = parse(&body);
    assert_eq!(res["message"], json!("Contact message submitted successfully"));
    assert_eq!(res["data"]["status"], json!("new"));
    assert_eq!(res["data"]["priority"], json!("normal"));
    assert_eq!(res["data"]["email"], json!("bob@example.com"));
}

#[actix_web::test]
async fn list_messages_without_token() {
    let _ = env_logger::try_init().ok();
    let err = get_request("", "/contact/messages", configure).await.expect_err("Expected error");
    assert_eq!(err, "Authentication required");
}

#[actix_web::test]
async fn list_messages_as_normal_user() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::User);
    let err = get_request(&token, "/contact/messages", configure).await.expect_err("Expected error");
    assert_eq!(err, "Insufficient permissions");
}

#[actix_web::test]
async fn list_messages() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::Admin);
    let (status, body) = get_request(&token, "/contact/messages", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let res = parse(&body);
    assert_eq!(res["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(res["pagination"], json!({"page": 1, "limit": 20, "total": 2, "pages": 1}));
}

#[actix_web::test]
async fn update_message_status_with_bad_status() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::Admin);
    let body = json!({"status": "bogus"});
    let (status, body) =
        put_request(&token, "/contact/messages/1/status", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let res = parse(&body);
    assert_eq!(res["errors"], json!([{"field": "status", "message": "Invalid status"}]));
}

#[actix_web::test]
async fn update_message_status() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::Admin);
    let body = json!({"status": "read"});
    let (status, body) =
        put_request(&token, "/contact/messages/1/status", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let res = parse(&body);
    assert_eq!(res["message"], json!("Message status updated successfully"));
    assert_eq!(res["data"]["status"], json!("read"));
}

#[actix_web::test]
async fn update_status_of_unknown_message() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::Admin);
    let body = json!({"status": "read"});
    let (status, body) =
        put_request(&token, "/contact/messages/99/status", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&body), json!({"success": false, "message": "Message not found"}));
}

#[actix_web::test]
async fn newsletter_subscribe_with_bad_email() {
    let _ = env_logger::try_init().ok();
    let body = json!({"email": "not-an-email"});
    let (status, body) = post_request("", "/contact/newsletter", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let res = parse(&body);
    assert_eq!(res["errors"], json!([{"field": "email", "message": "Valid email is required"}]));
}

#[actix_web::test]
async fn newsletter_subscribe() {
    let _ = env_logger::try_init().ok();
    let body = json!({"email": "new@example.com"});
    let (status, body) = post_request("", "/contact/newsletter", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!({"success": true, "message": "Successfully subscribed to newsletter"}));
}

#[actix_web::test]
async fn newsletter_subscribe_twice() {
    let _ = env_logger::try_init().ok();
    let body = json!({"email": "member@example.com"});
    let (status, body) = post_request("", "/contact/newsletter", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse(&body), json!({"success": false, "message": "Email is already subscribed"}));
}

#[actix_web::test]
async fn newsletter_unsubscribe() {
    let _ = env_logger::try_init().ok();
    let body = json!({"email": "member@example.com"});
    let (status, body) =
        post_request("", "/contact/newsletter/unsubscribe", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!({"success": true, "message": "Successfully unsubscribed from newsletter"}));
}

#[actix_web::test]
async fn newsletter_unsubscribe_unknown_email() {
    let _ = env_logger::try_init().ok();
    let body = json!({"email": "stranger@example.com"});
    let (status, body) =
        post_request("", "/contact/newsletter/unsubscribe", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&body), json!({"success": false, "message": "Email not found in newsletter subscriptions"}));
}

fn test_message(id: i64) -> ContactMessage {
    ContactMessage {
        id,
        name: "Bob".to_string(),
        email: "bob@example.com".to_string(),
        subject: "Opening hours".to_string(),
        message: "When does the depot open?".to_string(),
        status: ContactStatus::New,
        priority: ContactPriority::Normal,
        created_at: Utc.with_ymd_and_hms(2025, 7, 1, 14, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2025, 7, 1, 14, 0, 0).unwrap(),
    }
}

fn test_subscription(email: &str, is_active: bool) -> NewsletterSubscription {
    NewsletterSubscription {
        id: 1,
        email: email.to_string(),
        is_active,
        created_at: Utc.with_ymd_and_hms(2025, 7, 1, 14, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2025, 7, 1, 14, 0, 0).unwrap(),
    }
}

fn configure(cfg: &mut ServiceConfig) {
    let mut contact = MockContactDb::new();
    contact.expect_insert_contact_message().returning(|new| {
        let mut message = test_message(5);
        message.name = new.name;
        message.email = new.email;
        message.subject = new.subject;
        message.message = new.message;
        Ok(message)
    });
    contact.expect_search_contact_messages().returning(|_| Ok((vec![test_message(1), test_message(2)], 2)));
    contact.expect_update_contact_message_status().returning(|id, status| {
        Ok((id == 1).then(|| {
            let mut message = test_message(1);
            message.status = status;
            message
        }))
    });
    contact.expect_subscribe_to_newsletter().returning(|email| {
        if email == "member@example.com" {
            Err(ContactApiError::AlreadySubscribed)
        } else {
            Ok(test_subscription(email, true))
        }
    });
    contact.expect_unsubscribe_from_newsletter().returning(|email| {
        if email == "member@example.com" {
            Ok(test_subscription(email, false))
        } else {
            Err(ContactApiError::NotSubscribed)
        }
    });
    let api = ContactApi::new(contact, EventProducers::default());
    cfg.app_data(web::Data::new(api))
        .service(ContactMessagesRoute::<MockContactDb>::new())
        .service(UpdateMessageStatusRoute::<MockContactDb>::new())
        .service(NewsletterUnsubscribeRoute::<MockContactDb>::new())
        .service(NewsletterSubscribeRoute::<MockContactDb>::new())
        .service(SubmitContactRoute::<MockContactDb>::new());
}
