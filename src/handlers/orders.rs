use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::{ReplaceOrder, SharedOrderService};
use crate::config::PageLimits;
use crate::domain::errors::DomainError;
use crate::domain::order::{Item, Order, OrderLineRequest, Requester, Transition};
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    /// Dish id.
    pub id: i32,
    pub quantity: i32,
}

impl From<&OrderItemRequest> for OrderLineRequest {
    fn from(item: &OrderItemRequest) -> Self {
        OrderLineRequest {
            dish_id: item.id,
            quantity: item.quantity,
        }
    }
}

fn to_lines(items: &[OrderItemRequest]) -> Vec<OrderLineRequest> {
    items.iter().map(OrderLineRequest::from).collect()
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    /// 0 = created, 1 = in progress, 2 = done, 3 = canceled
    pub status: i16,
    pub user_id: i32,
    /// Stored as given, not recomputed from `items`.
    pub total: f64,
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: i32,
    pub order_id: i32,
    pub dish_id: i32,
    pub quantity: i32,
    /// Dish price captured when the item was created, e.g. "2.65"
    pub unit_price: String,
}

impl From<Item> for OrderItemResponse {
    fn from(item: Item) -> Self {
        OrderItemResponse {
            id: item.id,
            order_id: item.order_id,
            dish_id: item.dish_id,
            quantity: item.quantity,
            unit_price: item.unit_price.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: i16,
    pub user_id: i32,
    pub total: f64,
    pub items: Vec<OrderItemResponse>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            id: order.id,
            created_at: order.created_at,
            updated_at: order.updated_at,
            status: order.status.into(),
            user_id: order.user_id,
            total: order.total.to_major_units(),
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
        }
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListOrdersParams {
    /// Page number (0-based). Defaults to 0.
    pub page: Option<i64>,
    /// Orders per page. Defaults to 10.
    pub limit: Option<i64>,
    /// Admins only: restrict to one user's orders.
    pub user_id: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginationResponse {
    pub page: i64,
    pub limit: i64,
    /// Matching orders across all pages.
    pub total: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListOrdersResponse {
    pub orders: Vec<OrderResponse>,
    pub pagination: PaginationResponse,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusParams {
    /// Target status, 0 to 3.
    pub status: i16,
}

fn blocking_failed(e: actix_web::error::BlockingError) -> AppError {
    AppError::Internal(e.to_string())
}

fn transition_response(transition: Transition) -> HttpResponse {
    match transition {
        Transition::Applied(order) => HttpResponse::Ok().json(OrderResponse::from(order)),
        Transition::Unchanged(_) => HttpResponse::NotModified().finish(),
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /orders
///
/// Regular users get their own orders; admins get everything, optionally
/// narrowed by `user_id`. Ordered by ascending id.
#[utoipa::path(
    get,
    path = "/orders",
    params(ListOrdersParams),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
        (status = 401, description = "No authenticated requester"),
        (status = 422, description = "Malformed query"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    service: web::Data<SharedOrderService>,
    limits: web::Data<PageLimits>,
    requester: Requester,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = limits.resolve(params.page, params.limit);

    let result = web::block(move || service.list_orders(&requester, params.user_id, page))
        .await
        .map_err(blocking_failed)??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        orders: result.items.into_iter().map(OrderResponse::from).collect(),
        pagination: PaginationResponse {
            page: page.page,
            limit: page.limit,
            total: result.total,
        },
    }))
}

/// POST /orders
///
/// Prices every item from the catalog and stores the order with its items
/// in one transaction.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Unknown dish id"),
        (status = 401, description = "No authenticated requester"),
        (status = 422, description = "Malformed body, empty items or non-positive quantity"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<SharedOrderService>,
    requester: Requester,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let lines = to_lines(&body.items);

    let order = web::block(move || service.create_order(&requester, &lines))
        .await
        .map_err(blocking_failed)??;

    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 403, description = "Requester neither owns the order nor is admin"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<SharedOrderService>,
    requester: Requester,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let order = web::block(move || service.get_order(&requester, id))
        .await
        .map_err(blocking_failed)??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// PATCH /orders/{id}?status=N
///
/// Admin override of the order status. Setting the current status again
/// answers 304.
#[utoipa::path(
    patch,
    path = "/orders/{id}",
    params(("id" = i32, Path, description = "Order id"), StatusParams),
    responses(
        (status = 200, description = "Status changed", body = OrderResponse),
        (status = 304, description = "Order already has this status"),
        (status = 403, description = "Requester is not an admin"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order changed concurrently"),
        (status = 422, description = "Invalid status value"),
    ),
    tag = "orders"
)]
pub async fn set_status(
    service: web::Data<SharedOrderService>,
    requester: Requester,
    path: web::Path<i32>,
    query: web::Query<StatusParams>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let status = query.status;

    let transition = web::block(move || service.set_status(&requester, id, status))
        .await
        .map_err(blocking_failed)??;

    Ok(transition_response(transition))
}

/// PATCH /orders/{id}/cancel
#[utoipa::path(
    patch,
    path = "/orders/{id}/cancel",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order canceled", body = OrderResponse),
        (status = 304, description = "Order is already done or canceled"),
        (status = 403, description = "Requester neither owns the order nor is admin"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order changed concurrently"),
    ),
    tag = "orders"
)]
pub async fn cancel_order(
    service: web::Data<SharedOrderService>,
    requester: Requester,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let transition = web::block(move || service.cancel_order(&requester, id))
        .await
        .map_err(blocking_failed)??;

    Ok(transition_response(transition))
}

/// PUT /orders/{id}
///
/// Admin replace of status, owner, total and the whole item set.
#[utoipa::path(
    put,
    path = "/orders/{id}",
    params(("id" = i32, Path, description = "Order id")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order replaced", body = OrderResponse),
        (status = 403, description = "Requester is not an admin"),
        (status = 404, description = "Order or dish not found"),
        (status = 422, description = "Validation failed"),
    ),
    tag = "orders"
)]
pub async fn replace_order(
    service: web::Data<SharedOrderService>,
    requester: Requester,
    path: web::Path<i32>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let replace = ReplaceOrder {
        status: body.status,
        user_id: body.user_id,
        total: body.total,
        lines: to_lines(&body.items),
    };

    let order = web::block(move || service.replace_order(&requester, id, replace))
        .await
        .map_err(blocking_failed)?
        .map_err(|e| match e {
            e @ DomainError::DishNotFound(_) => AppError::NotFound(e.to_string()),
            e => AppError::from(e),
        })?;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// Route table for `/orders`, including body/query error mapping.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| AppError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| AppError::Validation(err.to_string()).into()),
    )
    .service(
        web::scope("/orders")
            .wrap(actix_web::middleware::from_fn(
                super::identity::attach_requester,
            ))
            .route("", web::get().to(list_orders))
            .route("", web::post().to(create_order))
            .route("/{id}", web::get().to(get_order))
            .route("/{id}", web::patch().to(set_status))
            .route("/{id}", web::put().to(replace_order))
            .route("/{id}/cancel", web::patch().to(cancel_order)),
    );
}
