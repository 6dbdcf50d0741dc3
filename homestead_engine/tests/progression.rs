//! End-to-end progression scans against an in-memory SQLite database.
use chrono::{DateTime, Duration, Utc};
use homestead_engine::{
    db_types::{NewOrder, NewTicket, OrderId, OrderStatus, TicketPriority, TicketStatus},
    traits::{OrderManagement, ProgressionSettings},
    OrderApi,
    ProgressionApi,
    SqliteDatabase,
    TicketApi,
};
use hs_common::Money;

async fn new_db() -> SqliteDatabase {
    let _ = env_logger::try_init();
    SqliteDatabase::new_with_url("sqlite::memory:", 1).await.expect("Could not create in-memory database")
}

fn settings() -> ProgressionSettings {
    ProgressionSettings {
        pending_to_production_days: 3,
        production_to_shipped_days: 30,
        shipped_to_delivered_days: 10,
        random_variation_days: 0,
        block_progression_with_open_tickets: true,
    }
}

async fn insert_order(db: &SqliteDatabase, order_id: &str, age_days: i64, now: DateTime<Utc>) -> i64 {
    let mut order = NewOrder::new(
        OrderId(order_id.to_string()),
        "cust-1".to_string(),
        "Aspen 2400".to_string(),
        Money::from_dollars(185_000),
    );
    order.order_date = Some(now - Duration::days(age_days));
    db.insert_order(order).await.expect("Could not insert order").id
}

#[tokio::test]
async fn overdue_pending_order_moves_to_production() {
    let db = new_db().await;
    let now = Utc::now();
    let id = insert_order(&db, "ORD-1001", 4, now).await;
    let api = ProgressionApi::new(db.clone());

    let summary = api.run_scan(&settings(), now).await.expect("Scan failed");
    assert_eq!(summary.scanned, 1);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.blocked, 0);
    assert_eq!(summary.errors, 0);

    let order = db.fetch_order_by_id(id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::InProduction);
    assert!(order.shipped_date.is_none());
    assert!(order.delivered_date.is_none());
}

#[tokio::test]
async fn scan_is_a_no_op_below_the_threshold() {
    let db = new_db().await;
    let now = Utc::now();
    let id = insert_order(&db, "ORD-1002", 2, now).await;
    let api = ProgressionApi::new(db.clone());

    // Two scans in immediate succession; neither may touch the order
    for _ in 0..2 {
        let summary = api.run_scan(&settings(), now).await.expect("Scan failed");
        assert_eq!(summary.scanned, 1);
        assert_eq!(summary.updated, 0);
    }
    let order = db.fetch_order_by_id(id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
}

#[tokio::test]
async fn an_order_moves_at_most_one_step_per_scan() {
    let db = new_db().await;
    let now = Utc::now();
    // Old enough to satisfy every threshold at once
    let id = insert_order(&db, "ORD-1003", 100, now).await;
    let api = ProgressionApi::new(db.clone());

    api.run_scan(&settings(), now).await.expect("Scan failed");
    let order = db.fetch_order_by_id(id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::InProduction, "first scan must stop at InProduction");

    api.run_scan(&settings(), now).await.expect("Scan failed");
    let order = db.fetch_order_by_id(id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Shipped);
    assert!(order.shipped_date.is_some(), "shipping stamps shipped_date");
    assert!(order.delivered_date.is_none());

    // Delivery is measured from shipped_date, which is now; a third scan must not deliver
    let summary = api.run_scan(&settings(), now).await.expect("Scan failed");
    assert_eq!(summary.updated, 0);
    let order = db.fetch_order_by_id(id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Shipped);
}

#[tokio::test]
async fn open_tickets_block_progression() {
    let db = new_db().await;
    let now = Utc::now();
    let id = insert_order(&db, "ORD-1004", 40, now).await;
    let tickets = TicketApi::new(db.clone());
    let ticket = tickets
        .create_ticket(NewTicket {
            subject: "Cracked window on delivery truck photos".to_string(),
            priority: TicketPriority::High,
            order_id: Some(OrderId("ORD-1004".to_string())),
        })
        .await
        .expect("Could not create ticket");

    let api = ProgressionApi::new(db.clone());
    let summary = api.run_scan(&settings(), now).await.expect("Scan failed");
    assert_eq!(summary.blocked, 1);
    assert_eq!(summary.updated, 0);
    let order = db.fetch_order_by_id(id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Pending, "blocked order must not change regardless of elapsed time");

    // Resolving the ticket unblocks the next scan
    tickets.set_ticket_status(ticket.id, TicketStatus::Resolved).await.expect("Could not resolve ticket");
    let summary = api.run_scan(&settings(), now).await.expect("Scan failed");
    assert_eq!(summary.blocked, 0);
    assert_eq!(summary.updated, 1);
}

#[tokio::test]
async fn non_blocking_ticket_statuses_do_not_gate() {
    let db = new_db().await;
    let now = Utc::now();
    insert_order(&db, "ORD-1005", 4, now).await;
    let tickets = TicketApi::new(db.clone());
    for (i, status) in [TicketStatus::Resolved, TicketStatus::Closed, TicketStatus::Cancelled].iter().enumerate() {
        let t = tickets
            .create_ticket(NewTicket {
                subject: format!("Old issue {i}"),
                priority: TicketPriority::Low,
                order_id: Some(OrderId("ORD-1005".to_string())),
            })
            .await
            .unwrap();
        tickets.set_ticket_status(t.id, *status).await.unwrap();
    }
    // A ticket against a different order is irrelevant too
    tickets
        .create_ticket(NewTicket {
            subject: "Unrelated".to_string(),
            priority: TicketPriority::Medium,
            order_id: Some(OrderId("ORD-9999".to_string())),
        })
        .await
        .unwrap();

    let summary = ProgressionApi::new(db.clone()).run_scan(&settings(), now).await.expect("Scan failed");
    assert_eq!(summary.blocked, 0);
    assert_eq!(summary.updated, 1);
}

#[tokio::test]
async fn blocking_can_be_disabled() {
    let db = new_db().await;
    let now = Utc::now();
    insert_order(&db, "ORD-1006", 4, now).await;
    TicketApi::new(db.clone())
        .create_ticket(NewTicket {
            subject: "Open complaint".to_string(),
            priority: TicketPriority::Critical,
            order_id: Some(OrderId("ORD-1006".to_string())),
        })
        .await
        .unwrap();

    let settings = ProgressionSettings { block_progression_with_open_tickets: false, ..settings() };
    let summary = ProgressionApi::new(db.clone()).run_scan(&settings, now).await.expect("Scan failed");
    assert_eq!(summary.blocked, 0);
    assert_eq!(summary.updated, 1);
}

#[tokio::test]
async fn shipped_orders_deliver_after_the_transit_threshold() {
    let db = new_db().await;
    let now = Utc::now();
    let id = insert_order(&db, "ORD-1007", 60, now).await;
    // Ship the order manually, backdated 11 days
    let orders = OrderApi::new(db.clone());
    orders.set_order_status(id, OrderStatus::Shipped, now - Duration::days(11)).await.expect("Could not ship order");

    let summary = ProgressionApi::new(db.clone()).run_scan(&settings(), now).await.expect("Scan failed");
    assert_eq!(summary.updated, 1);
    let order = db.fetch_order_by_id(id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Delivered);
    assert!(order.shipped_date.is_some());
    assert!(order.delivered_date.is_some());
}

#[tokio::test]
async fn terminal_and_manual_statuses_are_not_scanned() {
    let db = new_db().await;
    let now = Utc::now();
    let id = insert_order(&db, "ORD-1008", 500, now).await;
    let orders = OrderApi::new(db.clone());
    orders.set_order_status(id, OrderStatus::OnHold, now).await.unwrap();

    let summary = ProgressionApi::new(db.clone()).run_scan(&settings(), now).await.expect("Scan failed");
    assert_eq!(summary.scanned, 0, "OnHold orders are not part of the active set");
    let order = db.fetch_order_by_id(id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::OnHold);
}

#[tokio::test]
async fn milestone_dates_are_never_rewritten() {
    let db = new_db().await;
    let now = Utc::now();
    let id = insert_order(&db, "ORD-1009", 60, now).await;
    let orders = OrderApi::new(db.clone());
    let shipped_at = now - Duration::days(12);
    orders.set_order_status(id, OrderStatus::Shipped, shipped_at).await.unwrap();
    let first = db.fetch_order_by_id(id).await.unwrap().unwrap();

    // Delivery must not touch the existing shipped_date
    ProgressionApi::new(db.clone()).run_scan(&settings(), now).await.expect("Scan failed");
    let delivered = db.fetch_order_by_id(id).await.unwrap().unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert_eq!(delivered.shipped_date, first.shipped_date);
}
