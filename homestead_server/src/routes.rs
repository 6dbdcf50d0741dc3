//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause
//! the current worker to stop processing new requests. For this reason, any long, non-cpu-bound operation (e.g. I/O,
//! database operations, etc.) is expressed as an async function so worker threads can handle other requests while the
//! operation completes.
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use chrono::Utc;
use homestead_engine::{
    db_types::{NewInvoice, NewOrder, NewTicket, OrderId},
    invoice_objects::InvoiceQueryFilter,
    order_objects::{OrderQueryFilter, TicketQueryFilter},
    traits::{InvoiceManagement, OrderManagement, ProgressionSettings, TicketManagement},
    InvoiceApi,
    OrderApi,
    TicketApi,
    DUPLICATE_WINDOW_DAYS,
};
use log::*;

use crate::{
    activity_log::ActivityLog,
    data_objects::{ActivityLogQuery, DuplicateCheckQuery, JsonResponse, OrderStatusUpdate, TicketStatusUpdate},
    errors::ServerError,
    progression_worker::ProgressionControl,
    worker_state::WorkerState,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! {
            impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self {
                    Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
                }
            }
        }
        paste::paste! {
            impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
            where
                $([<T $bounds:camel>]: $bounds + 'static,)+
            {
                fn register(self, config: &mut actix_web::dev::AppService) {
                    let res = actix_web::Resource::new($path)
                        .name(stringify!($name))
                        .guard(actix_web::guard::$method())
                        .to($name::< $( [< T $bounds:camel >], )+>);
                    actix_web::dev::HttpServiceFactory::register(res, config);
                }
            }
        }
    };
}

// ----------------------------------------------   Health   ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Orders   ----------------------------------------------------
route!(create_order => Post "/api/orders" impl OrderManagement);
pub async fn create_order<B: OrderManagement>(
    api: web::Data<OrderApi<B>>,
    body: web::Json<NewOrder>,
) -> Result<HttpResponse, ServerError> {
    let order = api.create_order(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(order))
}

route!(orders => Get "/api/orders" impl OrderManagement);
pub async fn orders<B: OrderManagement>(
    api: web::Data<OrderApi<B>>,
    query: web::Query<OrderQueryFilter>,
) -> Result<HttpResponse, ServerError> {
    let orders = api.search_orders(query.into_inner()).await?;
    debug!("💻️ GET orders returned {} record(s)", orders.len());
    Ok(HttpResponse::Ok().json(orders))
}

route!(order_by_id => Get "/api/orders/{id}" impl OrderManagement);
pub async fn order_by_id<B: OrderManagement>(
    api: web::Data<OrderApi<B>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ServerError> {
    let order = api.order_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(update_order_status => Post "/api/orders/{id}/status" impl OrderManagement);
pub async fn update_order_status<B: OrderManagement>(
    api: web::Data<OrderApi<B>>,
    path: web::Path<i64>,
    body: web::Json<OrderStatusUpdate>,
) -> Result<HttpResponse, ServerError> {
    let order = api.set_order_status(path.into_inner(), body.status, Utc::now()).await?;
    Ok(HttpResponse::Ok().json(order))
}

//----------------------------------------------   Tickets   ----------------------------------------------------
route!(create_ticket => Post "/api/tickets" impl TicketManagement);
pub async fn create_ticket<B: TicketManagement>(
    api: web::Data<TicketApi<B>>,
    body: web::Json<NewTicket>,
) -> Result<HttpResponse, ServerError> {
    let ticket = api.create_ticket(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ticket))
}

route!(tickets => Get "/api/tickets" impl TicketManagement);
pub async fn tickets<B: TicketManagement>(
    api: web::Data<TicketApi<B>>,
    query: web::Query<TicketQueryFilter>,
) -> Result<HttpResponse, ServerError> {
    let tickets = api.search_tickets(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(tickets))
}

route!(ticket_by_id => Get "/api/tickets/{id}" impl TicketManagement);
pub async fn ticket_by_id<B: TicketManagement>(
    api: web::Data<TicketApi<B>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ServerError> {
    let ticket = api.ticket_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ticket))
}

route!(tickets_for_order => Get "/api/orders/{order_id}/tickets" impl TicketManagement);
pub async fn tickets_for_order<B: TicketManagement>(
    api: web::Data<TicketApi<B>>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServerError> {
    let order_id = OrderId(path.into_inner());
    let tickets = api.tickets_for_order(&order_id).await?;
    Ok(HttpResponse::Ok().json(tickets))
}

route!(update_ticket_status => Post "/api/tickets/{id}/status" impl TicketManagement);
pub async fn update_ticket_status<B: TicketManagement>(
    api: web::Data<TicketApi<B>>,
    path: web::Path<i64>,
    body: web::Json<TicketStatusUpdate>,
) -> Result<HttpResponse, ServerError> {
    let ticket = api.set_ticket_status(path.into_inner(), body.status).await?;
    Ok(HttpResponse::Ok().json(ticket))
}

//----------------------------------------------   Invoices   ----------------------------------------------------
route!(create_invoice => Post "/api/invoices" impl InvoiceManagement);
/// Route handler for invoice submission.
///
/// Validation failures and duplicate conflicts both come back as structured 400 responses so an integration can
/// self-correct; nothing is persisted on rejection.
pub async fn create_invoice<B: InvoiceManagement>(
    api: web::Data<InvoiceApi<B>>,
    body: web::Json<NewInvoice>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received invoice submission");
    let invoice = api.create_invoice(body.into_inner(), Utc::now()).await?;
    Ok(HttpResponse::Created().json(invoice))
}

route!(invoices => Get "/api/invoices" impl InvoiceManagement);
pub async fn invoices<B: InvoiceManagement>(
    api: web::Data<InvoiceApi<B>>,
    query: web::Query<InvoiceQueryFilter>,
) -> Result<HttpResponse, ServerError> {
    let invoices = api.search_invoices(query.into_inner()).await?;
    debug!("💻️ GET invoices returned {} record(s)", invoices.len());
    Ok(HttpResponse::Ok().json(invoices))
}

route!(check_duplicates => Get "/api/invoices/check-duplicates" impl InvoiceManagement);
/// Advisory duplicate lookup ahead of submission, with a caller-supplied tolerance window.
pub async fn check_duplicates<B: InvoiceManagement>(
    api: web::Data<InvoiceApi<B>>,
    query: web::Query<DuplicateCheckQuery>,
) -> Result<HttpResponse, ServerError> {
    let q = query.into_inner();
    let tolerance = q.tolerance_days.unwrap_or(DUPLICATE_WINDOW_DAYS);
    let matches = api.check_duplicates(&q.vendor, q.total_amount, q.invoice_date, tolerance).await?;
    Ok(HttpResponse::Ok().json(matches))
}

route!(invoice_stats => Get "/api/invoices/stats" impl InvoiceManagement);
pub async fn invoice_stats<B: InvoiceManagement>(
    api: web::Data<InvoiceApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let stats = api.stats().await?;
    Ok(HttpResponse::Ok().json(stats))
}

route!(invoice_by_number => Get "/api/invoices/by-number/{number}" impl InvoiceManagement);
pub async fn invoice_by_number<B: InvoiceManagement>(
    api: web::Data<InvoiceApi<B>>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServerError> {
    let invoice = api.invoice_by_number(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(invoice))
}

route!(invoice_by_id => Get "/api/invoices/{id}" impl InvoiceManagement);
pub async fn invoice_by_id<B: InvoiceManagement>(
    api: web::Data<InvoiceApi<B>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ServerError> {
    let invoice = api.invoice_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(invoice))
}

//----------------------------------------------   Progression   ----------------------------------------------------
#[get("/api/progression/status")]
pub async fn progression_status(state: web::Data<WorkerState>) -> impl Responder {
    HttpResponse::Ok().json(state.snapshot())
}

#[post("/api/progression/start")]
pub async fn progression_start(control: web::Data<ProgressionControl>) -> impl Responder {
    control.set_enabled(true);
    info!("💻️ Order progression worker enabled via API");
    HttpResponse::Ok().json(JsonResponse::success("Order progression worker enabled"))
}

#[post("/api/progression/stop")]
pub async fn progression_stop(control: web::Data<ProgressionControl>) -> impl Responder {
    control.set_enabled(false);
    info!("💻️ Order progression worker disabled via API");
    HttpResponse::Ok().json(JsonResponse::success("Order progression worker disabled"))
}

#[post("/api/progression/trigger")]
pub async fn progression_trigger(control: web::Data<ProgressionControl>) -> impl Responder {
    if control.trigger_scan() {
        HttpResponse::Accepted().json(JsonResponse::success("Progression scan queued"))
    } else {
        HttpResponse::Accepted().json(JsonResponse::success("A progression scan is already queued"))
    }
}

#[get("/api/progression/settings")]
pub async fn progression_settings(control: web::Data<ProgressionControl>) -> impl Responder {
    match control.current_override() {
        Some(settings) => HttpResponse::Ok().json(settings),
        None => HttpResponse::Ok().json(JsonResponse::success("No runtime override set; static configuration applies")),
    }
}

#[put("/api/progression/settings")]
pub async fn set_progression_settings(
    control: web::Data<ProgressionControl>,
    body: web::Json<ProgressionSettings>,
) -> impl Responder {
    control.set_override(Some(body.into_inner()));
    info!("💻️ Progression settings override set via API");
    HttpResponse::Ok().json(JsonResponse::success("Runtime settings override set"))
}

#[delete("/api/progression/settings")]
pub async fn clear_progression_settings(control: web::Data<ProgressionControl>) -> impl Responder {
    control.set_override(None);
    info!("💻️ Progression settings override cleared via API");
    HttpResponse::Ok().json(JsonResponse::success("Runtime settings override cleared"))
}

#[get("/api/progression/logs")]
pub async fn progression_logs(log: web::Data<ActivityLog>, query: web::Query<ActivityLogQuery>) -> impl Responder {
    let count = query.count.unwrap_or(100);
    HttpResponse::Ok().json(log.recent(count))
}
