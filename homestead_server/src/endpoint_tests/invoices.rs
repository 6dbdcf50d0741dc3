use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{NaiveDate, TimeZone, Utc};
use homestead_engine::{
    db_types::{Invoice, InvoiceStatus},
    InvoiceApi,
};
use hs_common::Money;
use serde_json::json;

use super::{
    helpers::{get_request, post_request},
    mocks::MockInvoiceManager,
};
use crate::routes::{CheckDuplicatesRoute, CreateInvoiceRoute, InvoiceByIdRoute};

fn stored_invoice(invoice_number: &str) -> Invoice {
    Invoice {
        id: 1,
        invoice_number: invoice_number.to_string(),
        vendor: "Acme Logistics".to_string(),
        invoice_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        due_date: NaiveDate::from_ymd_opt(2025, 2, 14).unwrap(),
        subtotal_amount: Money::from_dollars(900),
        tax_amount: Money::from_dollars(90),
        shipping_amount: Money::from_dollars(10),
        total_amount: Money::from_dollars(1000),
        status: InvoiceStatus::Pending,
        category: None,
        created_by: None,
        notes: None,
        created_at: Utc.with_ymd_and_hms(2025, 1, 16, 9, 0, 0).unwrap(),
        line_items: vec![],
    }
}

fn valid_submission() -> serde_json::Value {
    json!({
        "vendor": "Acme Logistics",
        "invoice_date": "2025-01-15",
        "due_date": "2025-02-14",
        "subtotal_amount": 900.0,
        "tax_amount": 90.0,
        "shipping_amount": 10.0,
        "total_amount": 1000.0,
        "line_items": [
            { "description": "Module transport", "quantity": 100.0, "unit_price": 7.5, "amount": 750.0 },
            { "description": "Escort vehicles", "quantity": 50.0, "unit_price": 3.0, "amount": 150.0 }
        ]
    })
}

fn configure_create_ok(cfg: &mut ServiceConfig) {
    let mut manager = MockInvoiceManager::new();
    manager.expect_fetch_duplicate_candidates().returning(|_, _, _, _| Ok(vec![]));
    manager.expect_latest_invoice_number_with_prefix().returning(|_| Ok(None));
    manager.expect_insert_invoice().returning(|_, number| Ok(stored_invoice(number)));
    cfg.service(CreateInvoiceRoute::<MockInvoiceManager>::new())
        .app_data(web::Data::new(InvoiceApi::new(manager)));
}

#[actix_web::test]
async fn create_invoice_returns_the_stored_record() {
    let _ = env_logger::try_init();
    let (status, body) = post_request("/api/invoices", valid_submission(), configure_create_ok).await;
    assert_eq!(status, StatusCode::CREATED);
    let invoice: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(invoice["status"], "Pending");
    assert_eq!(invoice["vendor"], "Acme Logistics");
    let number = invoice["invoice_number"].as_str().unwrap();
    assert!(number.starts_with("INV-") && number.ends_with("-000001"), "unexpected number {number}");
}

fn configure_validation(cfg: &mut ServiceConfig) {
    // Validation fails before any storage call, so the mock expects nothing
    let manager = MockInvoiceManager::new();
    cfg.service(CreateInvoiceRoute::<MockInvoiceManager>::new())
        .app_data(web::Data::new(InvoiceApi::new(manager)));
}

#[actix_web::test]
async fn arithmetic_mismatch_is_a_structured_400() {
    let _ = env_logger::try_init();
    let mut submission = valid_submission();
    submission["total_amount"] = json!(1000.05);
    let (status, body) = post_request("/api/invoices", submission, configure_validation).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Total amount mismatch. Expected $1000.00, got $1000.05"}"#);
}

#[actix_web::test]
async fn missing_line_items_are_rejected() {
    let _ = env_logger::try_init();
    let mut submission = valid_submission();
    submission["line_items"] = json!([]);
    let (status, body) = post_request("/api/invoices", submission, configure_validation).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"At least one line item is required"}"#);
}

fn configure_duplicate(cfg: &mut ServiceConfig) {
    let mut manager = MockInvoiceManager::new();
    manager.expect_fetch_duplicate_candidates().returning(|_, _, _, _| Ok(vec![stored_invoice("INV-2025-000001")]));
    cfg.service(CreateInvoiceRoute::<MockInvoiceManager>::new())
        .app_data(web::Data::new(InvoiceApi::new(manager)));
}

#[actix_web::test]
async fn duplicate_rejection_lists_the_conflicting_invoices() {
    let _ = env_logger::try_init();
    let (status, body) = post_request("/api/invoices", valid_submission(), configure_duplicate).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let response: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["error"], "Potential duplicate invoice detected");
    assert_eq!(response["duplicates"][0]["invoice_number"], "INV-2025-000001");
    assert!(response["message"].as_str().unwrap().contains("INV-2025-000001"));
}

fn configure_check_duplicates(cfg: &mut ServiceConfig) {
    let mut manager = MockInvoiceManager::new();
    manager
        .expect_fetch_duplicate_candidates()
        .withf(|vendor, total, date, tolerance| {
            vendor == "Acme"
                && *total == Money::from_dollars(1000)
                && *date == NaiveDate::from_ymd_opt(2025, 1, 20).unwrap()
                && *tolerance == 7
        })
        .returning(|_, _, _, _| Ok(vec![stored_invoice("INV-2025-000001")]));
    cfg.service(CheckDuplicatesRoute::<MockInvoiceManager>::new())
        .app_data(web::Data::new(InvoiceApi::new(manager)));
}

#[actix_web::test]
async fn advisory_lookup_passes_the_caller_window_through() {
    let _ = env_logger::try_init();
    let (status, body) = get_request(
        "/api/invoices/check-duplicates?vendor=Acme&total_amount=1000&invoice_date=2025-01-20&tolerance_days=7",
        configure_check_duplicates,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let matches: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(matches.as_array().unwrap().len(), 1);
}

fn configure_not_found(cfg: &mut ServiceConfig) {
    let mut manager = MockInvoiceManager::new();
    manager.expect_fetch_invoice_by_id().returning(|_| Ok(None));
    cfg.service(InvoiceByIdRoute::<MockInvoiceManager>::new())
        .app_data(web::Data::new(InvoiceApi::new(manager)));
}

#[actix_web::test]
async fn missing_invoice_is_a_404() {
    let _ = env_logger::try_init();
    let (status, body) = get_request("/api/invoices/42", configure_not_found).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. The requested invoice (id 42) does not exist"}"#);
}
