//! HTTP-level tests against the in-memory adapters.

use std::str::FromStr;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use bigdecimal::BigDecimal;
use serde_json::{json, Value};

use food_ordering::config::PageLimits;
use food_ordering::domain::order::Dish;
use food_ordering::handlers::identity::{USER_ID_HEADER, USER_ROLE_HEADER};
use food_ordering::handlers::orders::{configure, ListOrdersResponse, OrderResponse};
use food_ordering::infrastructure::{InMemoryDishCatalog, InMemoryOrderRepository};
use food_ordering::order_service;

const USER: i32 = 10;
const OTHER: i32 = 11;
const ADMIN: i32 = 1;

fn catalog() -> InMemoryDishCatalog {
    let dish = |id: i32, title: &str, price: &str| Dish {
        id,
        title: title.to_string(),
        price: BigDecimal::from_str(price).unwrap(),
    };
    InMemoryDishCatalog::new(vec![
        dish(1, "Pelmeni", "2.65"),
        dish(2, "Olivier", "3.22"),
        dish(3, "Kvass", "1.99"),
    ])
}

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .app_data(order_service(
                    Arc::new(InMemoryOrderRepository::new()),
                    Arc::new(catalog()),
                ))
                .app_data(web::Data::new(PageLimits::default()))
                .configure(configure),
        )
        .await
    };
}

fn as_user(req: test::TestRequest, id: i32) -> test::TestRequest {
    req.insert_header((USER_ID_HEADER, id.to_string()))
}

fn as_admin(req: test::TestRequest) -> test::TestRequest {
    as_user(req, ADMIN).insert_header((USER_ROLE_HEADER, "admin"))
}

fn create_req(user: i32, body: Value) -> test::TestRequest {
    as_user(test::TestRequest::post().uri("/orders"), user).set_json(body)
}

#[actix_web::test]
async fn create_order_returns_201_with_total() {
    let app = app!();

    let resp = test::call_service(
        &app,
        create_req(
            USER,
            json!({"items": [{"id": 1, "quantity": 2}, {"id": 3, "quantity": 1}]}),
        )
        .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: OrderResponse = test::read_body_json(resp).await;
    assert!(order.id > 0);
    assert_eq!(order.status, 0);
    assert_eq!(order.user_id, USER);
    assert_eq!(order.total, 7.29);
    assert_eq!(order.created_at, order.updated_at);
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[0].unit_price, "2.65");
}

#[actix_web::test]
async fn create_order_rejects_bad_bodies_with_422() {
    let app = app!();

    for body in [
        json!({"items": []}),
        json!({"items": [{"id": 1, "quantity": 2}, {"id": 3, "quantity": -1}]}),
        json!({"items": [{"id": 1, "quantity": 2}, {"id": 3, "quantity": 0}]}),
        json!({"items": [{"id": 1}]}),
        json!({}),
    ] {
        let resp = test::call_service(&app, create_req(USER, body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    let malformed = as_user(test::TestRequest::post().uri("/orders"), USER)
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"items":[{"id": 1, "quantity": "#)
        .to_request();
    let resp = test::call_service(&app, malformed).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn create_order_with_unknown_dish_is_400_naming_id() {
    let app = app!();

    let resp = test::call_service(
        &app,
        create_req(USER, json!({"items": [{"id": 99, "quantity": 1}]})).to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("99"));
}

#[actix_web::test]
async fn requests_without_identity_are_401() {
    let app = app!();

    let resp = test::call_service(&app, test::TestRequest::get().uri("/orders").to_request()).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn list_is_scoped_and_paginated() {
    let app = app!();
    for user in [USER, USER, USER, OTHER, OTHER] {
        let resp = test::call_service(
            &app,
            create_req(user, json!({"items": [{"id": 2, "quantity": 1}]})).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let own: ListOrdersResponse = test::call_and_read_body_json(
        &app,
        as_user(test::TestRequest::get().uri("/orders"), USER).to_request(),
    )
    .await;
    assert_eq!(own.pagination.total, 3);
    assert_eq!(own.pagination.limit, 10);
    assert!(own.orders.iter().all(|o| o.user_id == USER));

    let page: ListOrdersResponse = test::call_and_read_body_json(
        &app,
        as_admin(test::TestRequest::get().uri("/orders?limit=2")).to_request(),
    )
    .await;
    assert_eq!(page.pagination.total, 5);
    assert_eq!(
        page.orders.iter().map(|o| o.id).collect::<Vec<_>>(),
        vec![1, 2]
    );

    let beyond: ListOrdersResponse = test::call_and_read_body_json(
        &app,
        as_admin(test::TestRequest::get().uri("/orders?limit=2&page=9")).to_request(),
    )
    .await;
    assert!(beyond.orders.is_empty());
    assert_eq!(beyond.pagination.total, 5);

    let far: ListOrdersResponse = test::call_and_read_body_json(
        &app,
        as_user(
            test::TestRequest::get().uri("/orders?page=9223372036854775807&limit=100"),
            USER,
        )
        .to_request(),
    )
    .await;
    assert!(far.orders.is_empty());
    assert_eq!(far.pagination.total, 3);

    let filtered: ListOrdersResponse = test::call_and_read_body_json(
        &app,
        as_admin(test::TestRequest::get().uri(&format!("/orders?user_id={}", OTHER)))
            .to_request(),
    )
    .await;
    assert_eq!(filtered.pagination.total, 2);
}

#[actix_web::test]
async fn cancel_flow() {
    let app = app!();
    let created: OrderResponse = test::call_and_read_body_json(
        &app,
        create_req(USER, json!({"items": [{"id": 1, "quantity": 1}]})).to_request(),
    )
    .await;
    let uri = format!("/orders/{}/cancel", created.id);

    let resp = test::call_service(
        &app,
        as_user(test::TestRequest::patch().uri(&uri), OTHER).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        as_user(test::TestRequest::patch().uri(&uri), USER).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let canceled: OrderResponse = test::read_body_json(resp).await;
    assert_eq!(canceled.status, 3);
    assert!(canceled.updated_at > created.updated_at);

    let resp = test::call_service(
        &app,
        as_user(test::TestRequest::patch().uri(&uri), USER).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);

    let resp = test::call_service(
        &app,
        as_user(test::TestRequest::patch().uri("/orders/404/cancel"), USER).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn admin_patches_status() {
    let app = app!();
    let created: OrderResponse = test::call_and_read_body_json(
        &app,
        create_req(USER, json!({"items": [{"id": 1, "quantity": 1}]})).to_request(),
    )
    .await;
    let uri = |status: i32| format!("/orders/{}?status={}", created.id, status);

    let resp = test::call_service(
        &app,
        as_user(test::TestRequest::patch().uri(&uri(1)), USER).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        as_user(test::TestRequest::patch().uri(&uri(9)), USER).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        as_admin(test::TestRequest::patch().uri(&uri(0))).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);

    let resp = test::call_service(
        &app,
        as_admin(test::TestRequest::patch().uri(&uri(2))).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let done: OrderResponse = test::read_body_json(resp).await;
    assert_eq!(done.status, 2);
    assert_eq!(done.total, created.total);

    for bad in ["/orders/1?status=7", "/orders/1?status=x", "/orders/1"] {
        let resp =
            test::call_service(&app, as_admin(test::TestRequest::patch().uri(bad)).to_request())
                .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY, "{}", bad);
    }

    let resp = test::call_service(
        &app,
        as_admin(test::TestRequest::patch().uri("/orders/404?status=1")).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn admin_replaces_order() {
    let app = app!();
    let created: OrderResponse = test::call_and_read_body_json(
        &app,
        create_req(USER, json!({"items": [{"id": 1, "quantity": 1}]})).to_request(),
    )
    .await;
    let uri = format!("/orders/{}", created.id);
    let body = json!({
        "status": 1,
        "user_id": OTHER,
        "total": 12.5,
        "items": [{"id": 2, "quantity": 1}, {"id": 3, "quantity": 3}]
    });

    let resp = test::call_service(
        &app,
        as_user(test::TestRequest::put().uri(&uri), USER)
            .set_json(&body)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let invalid = json!({"status": 9, "user_id": OTHER, "total": -1.0, "items": []});
    let resp = test::call_service(
        &app,
        as_user(test::TestRequest::put().uri(&uri), USER)
            .set_json(&invalid)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let resp = test::call_service(
        &app,
        as_admin(test::TestRequest::put().uri(&uri))
            .set_json(&invalid)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = test::call_service(
        &app,
        as_admin(test::TestRequest::put().uri(&uri))
            .set_json(&body)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let replaced: OrderResponse = test::read_body_json(resp).await;
    assert_eq!(replaced.id, created.id);
    assert_eq!(replaced.status, 1);
    assert_eq!(replaced.user_id, OTHER);
    assert_eq!(replaced.total, 12.5);
    assert_eq!(replaced.created_at, created.created_at);
    assert_eq!(replaced.items.len(), 2);

    let unknown_dish = json!({
        "status": 1, "user_id": OTHER, "total": 1.0,
        "items": [{"id": 55, "quantity": 1}]
    });
    let resp = test::call_service(
        &app,
        as_admin(test::TestRequest::put().uri(&uri))
            .set_json(&unknown_dish)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        as_admin(test::TestRequest::put().uri("/orders/404"))
            .set_json(&body)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn get_order_checks_ownership() {
    let app = app!();
    let created: OrderResponse = test::call_and_read_body_json(
        &app,
        create_req(USER, json!({"items": [{"id": 3, "quantity": 2}]})).to_request(),
    )
    .await;
    let uri = format!("/orders/{}", created.id);

    let resp = test::call_service(
        &app,
        as_user(test::TestRequest::get().uri(&uri), USER).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        as_user(test::TestRequest::get().uri(&uri), OTHER).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(&app, as_admin(test::TestRequest::get().uri(&uri)).to_request())
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
}
