use chrono::{Duration, NaiveDate, Utc};
use hs_common::Money;
use log::trace;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{Invoice, InvoiceLineItem, NewInvoice},
    invoice_objects::InvoiceQueryFilter,
    traits::{InvoiceStats, InvoiceStoreError, VendorStats},
};

/// Inserts the invoice header and its line items using the given connection. This is not atomic on its own; the
/// caller wraps it in a transaction and passes `&mut *tx` as the connection argument.
pub async fn insert_invoice(
    invoice: NewInvoice,
    invoice_number: &str,
    conn: &mut SqliteConnection,
) -> Result<Invoice, InvoiceStoreError> {
    let mut stored: Invoice = sqlx::query_as(
        r#"
            INSERT INTO invoices (
                invoice_number,
                vendor,
                invoice_date,
                due_date,
                subtotal_amount,
                tax_amount,
                shipping_amount,
                total_amount,
                category,
                created_by,
                notes,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *;
        "#,
    )
    .bind(invoice_number)
    .bind(invoice.vendor)
    .bind(invoice.invoice_date)
    .bind(invoice.due_date)
    .bind(invoice.subtotal_amount.value())
    .bind(invoice.tax_amount.value())
    .bind(invoice.shipping_amount.value())
    .bind(invoice.total_amount.value())
    .bind(invoice.category)
    .bind(invoice.created_by)
    .bind(invoice.notes)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await?;
    for li in invoice.line_items {
        let item: InvoiceLineItem = sqlx::query_as(
            r#"
                INSERT INTO invoice_line_items (invoice_id, description, quantity, unit_price, amount)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *;
            "#,
        )
        .bind(stored.id)
        .bind(li.description)
        .bind(li.quantity)
        .bind(li.unit_price.value())
        .bind(li.amount.value())
        .fetch_one(&mut *conn)
        .await?;
        stored.line_items.push(item);
    }
    Ok(stored)
}

pub async fn fetch_line_items(
    invoice_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<InvoiceLineItem>, sqlx::Error> {
    let items = sqlx::query_as("SELECT * FROM invoice_line_items WHERE invoice_id = $1 ORDER BY id ASC")
        .bind(invoice_id)
        .fetch_all(conn)
        .await?;
    Ok(items)
}

/// Attaches line items to each invoice in the batch. One query per invoice; result sets here are small.
async fn attach_line_items(
    mut invoices: Vec<Invoice>,
    conn: &mut SqliteConnection,
) -> Result<Vec<Invoice>, sqlx::Error> {
    for invoice in &mut invoices {
        invoice.line_items = fetch_line_items(invoice.id, &mut *conn).await?;
    }
    Ok(invoices)
}

pub async fn fetch_invoice_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Invoice>, sqlx::Error> {
    let invoice: Option<Invoice> =
        sqlx::query_as("SELECT * FROM invoices WHERE id = $1").bind(id).fetch_optional(&mut *conn).await?;
    match invoice {
        Some(mut invoice) => {
            invoice.line_items = fetch_line_items(invoice.id, conn).await?;
            Ok(Some(invoice))
        },
        None => Ok(None),
    }
}

pub async fn fetch_invoice_by_number(
    number: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Invoice>, sqlx::Error> {
    let invoice: Option<Invoice> = sqlx::query_as("SELECT * FROM invoices WHERE invoice_number = $1")
        .bind(number)
        .fetch_optional(&mut *conn)
        .await?;
    match invoice {
        Some(mut invoice) => {
            invoice.line_items = fetch_line_items(invoice.id, conn).await?;
            Ok(Some(invoice))
        },
        None => Ok(None),
    }
}

/// The duplicate window query: exact vendor, exact total, and an invoice date within `date ± tolerance_days`.
/// ISO dates compare correctly as text, so the range predicate works on the stored DATE column directly.
pub async fn fetch_duplicate_candidates(
    vendor: &str,
    total_amount: Money,
    invoice_date: NaiveDate,
    tolerance_days: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Invoice>, sqlx::Error> {
    let start = invoice_date - Duration::days(tolerance_days);
    let end = invoice_date + Duration::days(tolerance_days);
    let invoices: Vec<Invoice> = sqlx::query_as(
        r#"
            SELECT * FROM invoices
            WHERE vendor = $1 AND total_amount = $2 AND invoice_date >= $3 AND invoice_date <= $4
            ORDER BY created_at DESC
        "#,
    )
    .bind(vendor)
    .bind(total_amount.value())
    .bind(start)
    .bind(end)
    .fetch_all(&mut *conn)
    .await?;
    attach_line_items(invoices, conn).await
}

/// The lexicographically greatest invoice number with the given prefix. The numeric suffix is fixed-width and
/// zero-padded, so this is also the numerically greatest.
pub async fn latest_invoice_number_with_prefix(
    prefix: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<String>, sqlx::Error> {
    let number: Option<String> = sqlx::query_scalar(
        "SELECT invoice_number FROM invoices WHERE invoice_number LIKE $1 ORDER BY invoice_number DESC LIMIT 1",
    )
    .bind(format!("{prefix}%"))
    .fetch_optional(conn)
    .await?;
    Ok(number)
}

/// Fetches invoices according to criteria specified in the `InvoiceQueryFilter`, newest first.
pub async fn search_invoices(
    query: InvoiceQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<Invoice>, sqlx::Error> {
    let mut builder = QueryBuilder::new(
        r#"
    SELECT * FROM invoices
    "#,
    );
    if !query.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(vendor) = query.vendor {
        where_clause.push("vendor LIKE ");
        where_clause.push_bind_unseparated(format!("%{vendor}%"));
    }
    if let Some(status) = query.status {
        where_clause.push("status = ");
        where_clause.push_bind_unseparated(status.to_string());
    }
    if let Some(from) = query.from_date {
        where_clause.push("invoice_date >= ");
        where_clause.push_bind_unseparated(from);
    }
    if let Some(to) = query.to_date {
        where_clause.push("invoice_date <= ");
        where_clause.push_bind_unseparated(to);
    }
    builder.push(" ORDER BY created_at DESC");

    trace!("📝️ Executing query: {}", builder.sql());
    let invoices = builder.build_query_as::<Invoice>().fetch_all(&mut *conn).await?;
    attach_line_items(invoices, conn).await
}

pub async fn invoice_stats(conn: &mut SqliteConnection) -> Result<InvoiceStats, sqlx::Error> {
    let rows: Vec<(String, i64, i64)> = sqlx::query_as(
        "SELECT status, COUNT(*), COALESCE(SUM(total_amount), 0) FROM invoices GROUP BY status",
    )
    .fetch_all(&mut *conn)
    .await?;
    let mut stats = InvoiceStats::default();
    for (status, count, total) in rows {
        stats.total_invoices += count;
        stats.total_amount += Money::from_cents(total);
        match status.as_str() {
            "Pending" => {
                stats.pending_invoices = count;
                stats.pending_amount = Money::from_cents(total);
            },
            "Approved" => stats.approved_invoices = count,
            "Paid" => stats.paid_invoices = count,
            "Rejected" => stats.rejected_invoices = count,
            "Duplicate" => stats.duplicate_invoices = count,
            _ => {},
        }
    }
    let top_vendors: Vec<VendorStats> = sqlx::query_as(
        r#"
            SELECT vendor, COUNT(*) AS count, COALESCE(SUM(total_amount), 0) AS total_amount
            FROM invoices
            GROUP BY vendor
            ORDER BY total_amount DESC
            LIMIT 10
        "#,
    )
    .fetch_all(conn)
    .await?;
    stats.top_vendors = top_vendors;
    Ok(stats)
}
