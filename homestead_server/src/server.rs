use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use homestead_engine::{InvoiceApi, OrderApi, SqliteDatabase, TicketApi};
use log::info;

use crate::{
    activity_log::ActivityLog,
    config::ServerConfig,
    errors::ServerError,
    progression_worker::{start_progression_worker, ProgressionControl},
    routes::{
        clear_progression_settings,
        health,
        progression_logs,
        progression_settings,
        progression_start,
        progression_status,
        progression_stop,
        progression_trigger,
        set_progression_settings,
        CheckDuplicatesRoute,
        CreateInvoiceRoute,
        CreateOrderRoute,
        CreateTicketRoute,
        InvoiceByIdRoute,
        InvoiceByNumberRoute,
        InvoiceStatsRoute,
        InvoicesRoute,
        OrderByIdRoute,
        OrdersRoute,
        TicketByIdRoute,
        TicketsForOrderRoute,
        TicketsRoute,
        UpdateOrderStatusRoute,
        UpdateTicketStatusRoute,
    },
    worker_state::WorkerState,
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let state = WorkerState::new();
    let activity = ActivityLog::new();
    let (worker, control) =
        start_progression_worker(db.clone(), config.progression.clone(), state.clone(), activity.clone());
    let srv = create_server_instance(config, db, control.clone(), state, activity)?;
    let result = srv.await.map_err(|e| ServerError::Unspecified(e.to_string()));
    info!("🚀️ Server stopped. Shutting down the progression worker.");
    control.shutdown();
    let _ = worker.await;
    result
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    control: ProgressionControl,
    state: WorkerState,
    activity: ActivityLog,
) -> Result<Server, ServerError> {
    let control = web::Data::new(control);
    let state = web::Data::new(state);
    let activity = web::Data::new(activity);
    let srv = HttpServer::new(move || {
        let orders_api = OrderApi::new(db.clone());
        let tickets_api = TicketApi::new(db.clone());
        let invoices_api = InvoiceApi::new(db.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("homestead::access_log"))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(tickets_api))
            .app_data(web::Data::new(invoices_api))
            .app_data(control.clone())
            .app_data(state.clone())
            .app_data(activity.clone())
            .service(health)
            // Fixed invoice paths must register ahead of the `{id}` matcher
            .service(CheckDuplicatesRoute::<SqliteDatabase>::new())
            .service(InvoiceStatsRoute::<SqliteDatabase>::new())
            .service(InvoiceByNumberRoute::<SqliteDatabase>::new())
            .service(CreateInvoiceRoute::<SqliteDatabase>::new())
            .service(InvoicesRoute::<SqliteDatabase>::new())
            .service(InvoiceByIdRoute::<SqliteDatabase>::new())
            .service(CreateOrderRoute::<SqliteDatabase>::new())
            .service(OrdersRoute::<SqliteDatabase>::new())
            .service(OrderByIdRoute::<SqliteDatabase>::new())
            .service(UpdateOrderStatusRoute::<SqliteDatabase>::new())
            .service(TicketsForOrderRoute::<SqliteDatabase>::new())
            .service(CreateTicketRoute::<SqliteDatabase>::new())
            .service(TicketsRoute::<SqliteDatabase>::new())
            .service(TicketByIdRoute::<SqliteDatabase>::new())
            .service(UpdateTicketStatusRoute::<SqliteDatabase>::new())
            .service(progression_status)
            .service(progression_start)
            .service(progression_stop)
            .service(progression_trigger)
            .service(progression_settings)
            .service(set_progression_settings)
            .service(clear_progression_settings)
            .service(progression_logs)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
