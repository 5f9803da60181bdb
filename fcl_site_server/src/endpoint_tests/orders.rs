use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use fcl_commerce_engine::{
    db_types::{NewOrder, Order, OrderCustomer, OrderStatusType, OrderWithUser, Role},
    events::EventProducers,
    traits::{OrderApiError, StatusUpdateResult},
    OrderFlowApi,
};
use fcl_common::UsdCents;
use serde_json::json;

use super::{
    helpers::{get_request, parse, post_request, put_request, valid_token},
    mocks::MockOrderDb,
};
use crate::routes::{AdminOrdersRoute, CreateOrderRoute, MyOrdersRoute, OrderRoute, UpdateOrderStatusRoute};

#[actix_web::test]
async fn create_order_without_token() {
    let _ = env_logger::try_init().ok();
    let err = post_request("", "/orders", &json!({}), configure).await.expect_err("Expected error");
    assert_eq!(err, "Authentication required");
}

#[actix_web::test]
async fn create_order_with_no_fields() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::User);
    let (status, body) = post_request(&token, "/orders", &json!({}), configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let res = parse(&body);
    assert_eq!(res["message"], json!("Validation failed"));
    assert_eq!(
        res["errors"],
        json!([
            {"field": "items", "message": "Items array is required"},
            {"field": "total", "message": "Total must be a number"},
            {"field": "billingInfo", "message": "Billing info is required"},
            {"field": "shippingInfo", "message": "Shipping info is required"},
        ])
    );
}

#[actix_web::test]
async fn create_order_with_empty_items() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::User);
    let body = json!({
        "items": [],
        "total": 49.50,
        "billingInfo": {"name": "Alice"},
        "shippingInfo": {"name": "Alice"},
    });
    let (status, body) = post_request(&token, "/orders", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let res = parse(&body);
    assert_eq!(res["errors"], json!([{"field": "items", "message": "Items array is required"}]));
}

#[actix_web::test]
async fn create_order() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::User);
    let body = json!({
        "items": [{"sku": "FCL-001", "qty": 2}],
        "total": 49.50,
        "billingInfo": {"name": "Alice", "city": "Springfield"},
        "shippingInfo": {"name": "Alice", "city": "Springfield"},
        "paymentMethod": "stripe",
    });
    let (status, body) = post_request(&token, "/orders", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::CREATED);
    let res = parse(&body);
    assert_eq!(res["message"], json!("Order created successfully"));
    assert_eq!(res["data"]["status"], json!("pending"));
    assert_eq!(res["data"]["total"], json!(4950));
    assert_eq!(res["data"]["userId"], json!(1));
    let order_number = res["data"]["orderNumber"].as_str().expect("No order number");
    assert!(order_number.starts_with("FCL-"), "was: {order_number}");
}

#[actix_web::test]
async fn my_orders() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::User);
    let (status, body) = get_request(&token, "/orders/my-orders", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let res = parse(&body);
    assert_eq!(res["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(res["pagination"], json!({"page": 1, "limit": 10, "total": 12, "pages": 2}));
}

#[actix_web::test]
async fn my_orders_without_token() {
    let _ = env_logger::try_init().ok();
    let err = get_request("", "/orders/my-orders", configure).await.expect_err("Expected error");
    assert_eq!(err, "Authentication required");
}

#[actix_web::test]
async fn fetch_own_order() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::User);
    let (status, body) = get_request(&token, "/orders/1", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let res = parse(&body);
    assert_eq!(res["data"]["id"], json!(1));
    assert_eq!(res["data"]["status"], json!("pending"));
}

#[actix_web::test]
async fn fetch_another_users_order() {
    let _ = env_logger::try_init().ok();
    // Order #2 exists but belongs to someone else; indistinguishable from a missing order
    let token = valid_token(Role::User);
    let (status, body) = get_request(&token, "/orders/2", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&body), json!({"success": false, "message": "Order not found"}));
}

#[actix_web::test]
async fn update_order_status_as_normal_user() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::User);
    let body = json!({"status": "shipped"});
    let err = put_request(&token, "/orders/1/status", &body, configure).await.expect_err("Expected error");
    assert_eq!(err, "Insufficient permissions");
}

#[actix_web::test]
async fn update_order_status_to_unknown_status() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::Admin);
    let body = json!({"status": "bogus"});
    let (status, body) = put_request(&token, "/orders/1/status", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let res = parse(&body);
    assert_eq!(res["errors"], json!([{"field": "status", "message": "Invalid status"}]));
}

#[actix_web::test]
async fn update_order_status_to_payment_failed() {
    let _ = env_logger::try_init().ok();
    // payment_failed is reserved for webhook processing, admins cannot set it by hand
    let token = valid_token(Role::Admin);
    let body = json!({"status": "payment_failed"});
    let (status, body) = put_request(&token, "/orders/1/status", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let res = parse(&body);
    assert_eq!(res["errors"], json!([{"field": "status", "message": "Invalid status"}]));
}

#[actix_web::test]
async fn update_order_status() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::Admin);
    let body = json!({"status": "shipped"});
    let (status, body) = put_request(&token, "/orders/1/status", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let res = parse(&body);
    assert_eq!(res["message"], json!("Order status updated successfully"));
    assert_eq!(res["data"]["status"], json!("shipped"));
}

#[actix_web::test]
async fn update_status_of_unknown_order() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::Admin);
    let body = json!({"status": "paid"});
    let (status, body) = put_request(&token, "/orders/99/status", &body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&body), json!({"success": false, "message": "Order not found"}));
}

#[actix_web::test]
async fn admin_order_list() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::Admin);
    let (status, body) = get_request(&token, "/orders/admin/all", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let res = parse(&body);
    assert_eq!(res["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(res["data"][0]["user"]["email"], json!("user1@example.com"));
    assert_eq!(res["pagination"], json!({"page": 1, "limit": 20, "total": 1, "pages": 1}));
}

#[actix_web::test]
async fn admin_order_list_with_bad_status_filter() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::Admin);
    let (status, body) = get_request(&token, "/orders/admin/all?status=bogus", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let res = parse(&body);
    assert_eq!(res["errors"], json!([{"field": "status", "message": "Invalid status"}]));
}

#[actix_web::test]
async fn admin_order_list_as_normal_user() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(Role::User);
    let err = get_request(&token, "/orders/admin/all", configure).await.expect_err("Expected error");
    assert_eq!(err, "Insufficient permissions");
}

fn test_order(id: i64, user_id: i64, status: OrderStatusType) -> Order {
    Order {
        id,
        order_number: format!("FCL-1748000000000-A{id:05}"),
        user_id,
        items: r#"[{"sku":"FCL-001","qty":1}]"#.to_string(),
        total: UsdCents::from(4500),
        currency: "USD".to_string(),
        status,
        payment_method: Some("stripe".to_string()),
        billing_info: "{}".to_string(),
        shipping_info: "{}".to_string(),
        unique_code: None,
        stripe_payment_intent_id: None,
        coinbase_invoice_id: None,
        created_at: Utc.with_ymd_and_hms(2025, 6, 10, 10, 30, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2025, 6, 10, 10, 30, 0).unwrap(),
    }
}

fn order_from_new(new: NewOrder) -> Order {
    Order {
        id: 42,
        order_number: new.order_number,
        user_id: new.user_id,
        items: new.items,
        total: new.total,
        currency: new.currency,
        status: OrderStatusType::Pending,
        payment_method: new.payment_method,
        billing_info: new.billing_info,
        shipping_info: new.shipping_info,
        unique_code: None,
        stripe_payment_intent_id: None,
        coinbase_invoice_id: None,
        created_at: Utc.with_ymd_and_hms(2025, 6, 10, 10, 30, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2025, 6, 10, 10, 30, 0).unwrap(),
    }
}

fn configure(cfg: &mut ServiceConfig) {
    let mut orders = MockOrderDb::new();
    orders.expect_insert_order().returning(|new| Ok(order_from_new(new)));
    orders.expect_fetch_order_for_user().returning(|id, user_id| {
        Ok((id == 1 && user_id == 1).then(|| test_order(1, 1, OrderStatusType::Pending)))
    });
    orders.expect_fetch_orders_for_user().returning(|user_id, _, _| {
        Ok((
            vec![test_order(1, user_id, OrderStatusType::Pending), test_order(3, user_id, OrderStatusType::Paid)],
            12,
        ))
    });
    orders.expect_update_order_status().returning(|id, status| {
        if id == 1 {
            let mut order = test_order(1, 1, status);
            if status == OrderStatusType::Paid {
                order.unique_code = Some("FCLC0DE99".to_string());
            }
            Ok(StatusUpdateResult { order, code_issued: status == OrderStatusType::Paid })
        } else {
            Err(OrderApiError::OrderNotFound)
        }
    });
    orders.expect_search_orders().returning(|_| {
        let entry = OrderWithUser {
            order: test_order(1, 1, OrderStatusType::Paid),
            user: OrderCustomer { id: 1, email: "user1@example.com".to_string(), display_name: None },
        };
        Ok((vec![entry], 1))
    });
    let api = OrderFlowApi::new(orders, EventProducers::default());
    cfg.app_data(web::Data::new(api))
        .service(MyOrdersRoute::<MockOrderDb>::new())
        .service(AdminOrdersRoute::<MockOrderDb>::new())
        .service(CreateOrderRoute::<MockOrderDb>::new())
        .service(UpdateOrderStatusRoute::<MockOrderDb>::new())
        .service(OrderRoute::<MockOrderDb>::new());
}
