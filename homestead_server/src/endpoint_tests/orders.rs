use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use homestead_engine::{
    db_types::{Order, OrderId, OrderStatus},
    OrderApi,
};
use hs_common::Money;
use serde_json::json;

use super::{
    helpers::{get_request, post_request},
    mocks::MockOrderManager,
};
use crate::routes::{CreateOrderRoute, OrderByIdRoute, OrdersRoute, UpdateOrderStatusRoute};

fn stored_order(id: i64, status: OrderStatus) -> Order {
    let placed = Utc.with_ymd_and_hms(2025, 2, 1, 10, 30, 0).unwrap();
    Order {
        id,
        order_id: OrderId(format!("ORD-{:04}", 1000 + id)),
        customer_id: "17".to_string(),
        home_model: "Aspen 2400".to_string(),
        total_price: Money::from_dollars(185_000),
        status,
        order_date: placed,
        shipped_date: None,
        delivered_date: None,
        created_at: placed,
        updated_at: placed,
    }
}

fn configure_create(cfg: &mut ServiceConfig) {
    let mut manager = MockOrderManager::new();
    manager.expect_fetch_order_by_order_id().returning(|_| Ok(None));
    manager.expect_insert_order().returning(|_| Ok(stored_order(1, OrderStatus::Pending)));
    cfg.service(CreateOrderRoute::<MockOrderManager>::new()).app_data(web::Data::new(OrderApi::new(manager)));
}

#[actix_web::test]
async fn create_order_returns_created() {
    let _ = env_logger::try_init();
    let body = json!({
        "order_id": "ORD-1001",
        "customer_id": "17",
        "home_model": "Aspen 2400",
        "total_price": 185000.0
    });
    let (status, body) = post_request("/api/orders", body, configure_create).await;
    assert_eq!(status, StatusCode::CREATED);
    let order: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(order["status"], "Pending");
    assert_eq!(order["order_id"], "ORD-1001");
}

fn configure_create_conflict(cfg: &mut ServiceConfig) {
    let mut manager = MockOrderManager::new();
    manager.expect_fetch_order_by_order_id().returning(|_| Ok(Some(stored_order(1, OrderStatus::Pending))));
    cfg.service(CreateOrderRoute::<MockOrderManager>::new()).app_data(web::Data::new(OrderApi::new(manager)));
}

#[actix_web::test]
async fn creating_an_existing_order_is_rejected() {
    let _ = env_logger::try_init();
    let body = json!({
        "order_id": "ORD-1001",
        "customer_id": "17",
        "home_model": "Aspen 2400",
        "total_price": 185000.0
    });
    let (status, body) = post_request("/api/orders", body, configure_create_conflict).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("already exists"), "unexpected body {body}");
}

fn configure_list(cfg: &mut ServiceConfig) {
    let mut manager = MockOrderManager::new();
    manager.expect_search_orders().returning(|_| {
        Ok(vec![stored_order(1, OrderStatus::Pending), stored_order(2, OrderStatus::Shipped)])
    });
    cfg.service(OrdersRoute::<MockOrderManager>::new()).app_data(web::Data::new(OrderApi::new(manager)));
}

#[actix_web::test]
async fn list_orders_returns_the_result_set() {
    let _ = env_logger::try_init();
    let (status, body) = get_request("/api/orders?status=Pending", configure_list).await;
    assert_eq!(status, StatusCode::OK);
    let orders: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(orders.as_array().unwrap().len(), 2);
}

fn configure_not_found(cfg: &mut ServiceConfig) {
    let mut manager = MockOrderManager::new();
    manager.expect_fetch_order_by_id().returning(|_| Ok(None));
    cfg.service(OrderByIdRoute::<MockOrderManager>::new()).app_data(web::Data::new(OrderApi::new(manager)));
}

#[actix_web::test]
async fn missing_order_is_a_404() {
    let _ = env_logger::try_init();
    let (status, _) = get_request("/api/orders/99", configure_not_found).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn configure_status_update(cfg: &mut ServiceConfig) {
    let mut manager = MockOrderManager::new();
    manager.expect_fetch_order_by_id().returning(|id| Ok(Some(stored_order(id, OrderStatus::Pending))));
    manager
        .expect_set_order_status()
        .withf(|_, status| *status == OrderStatus::OnHold)
        .returning(|id, status| Ok(stored_order(id, status)));
    cfg.service(UpdateOrderStatusRoute::<MockOrderManager>::new())
        .app_data(web::Data::new(OrderApi::new(manager)));
}

#[actix_web::test]
async fn manual_status_update_round_trips() {
    let _ = env_logger::try_init();
    let (status, body) =
        post_request("/api/orders/1/status", json!({ "status": "OnHold" }), configure_status_update).await;
    assert_eq!(status, StatusCode::OK);
    let order: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(order["status"], "OnHold");
}

fn configure_ship(cfg: &mut ServiceConfig) {
    let mut manager = MockOrderManager::new();
    manager.expect_fetch_order_by_id().returning(|id| Ok(Some(stored_order(id, OrderStatus::ReadyToShip))));
    manager
        .expect_apply_order_progress()
        .withf(|_, progress| progress.new_status == OrderStatus::Shipped && progress.shipped_date.is_some())
        .returning(|id, progress| {
            let mut order = stored_order(id, progress.new_status);
            order.shipped_date = progress.shipped_date;
            Ok(order)
        });
    cfg.service(UpdateOrderStatusRoute::<MockOrderManager>::new())
        .app_data(web::Data::new(OrderApi::new(manager)));
}

#[actix_web::test]
async fn shipping_manually_stamps_the_shipped_date() {
    let _ = env_logger::try_init();
    let (status, body) = post_request("/api/orders/1/status", json!({ "status": "Shipped" }), configure_ship).await;
    assert_eq!(status, StatusCode::OK);
    let order: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(order["status"], "Shipped");
    assert!(!order["shipped_date"].is_null());
}
