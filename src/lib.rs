pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{OrderService, SharedOrderService};
use crate::domain::ports::{DishLookup, OrderRepository};
use crate::infrastructure::{DieselDishLookup, DieselOrderRepository};

pub use config::Config;
pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::orders::list_orders,
        handlers::orders::create_order,
        handlers::orders::get_order,
        handlers::orders::set_status,
        handlers::orders::cancel_order,
        handlers::orders::replace_order,
    ),
    components(schemas(
        handlers::orders::CreateOrderRequest,
        handlers::orders::UpdateOrderRequest,
        handlers::orders::OrderItemRequest,
        handlers::orders::OrderResponse,
        handlers::orders::OrderItemResponse,
        handlers::orders::ListOrdersResponse,
        handlers::orders::PaginationResponse,
    )),
    tags((name = "orders", description = "Order placement and status management"))
)]
pub struct ApiDoc;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Wrap storage adapters into the service shared by all workers.
pub fn order_service(
    repo: Arc<dyn OrderRepository>,
    dishes: Arc<dyn DishLookup>,
) -> web::Data<SharedOrderService> {
    web::Data::new(OrderService::new(repo, dishes))
}

/// Build and return an actix-web `Server` bound to the configured address.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(config: &Config, pool: DbPool) -> std::io::Result<actix_web::dev::Server> {
    let service = order_service(
        Arc::new(DieselOrderRepository::new(pool.clone())),
        Arc::new(DieselDishLookup::new(pool)),
    );
    let limits = web::Data::new(config.paging);

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .app_data(limits.clone())
            .wrap(Logger::default())
            .configure(handlers::orders::configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((config.host.clone(), config.port))?
    .run())
}
