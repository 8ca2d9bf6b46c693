//! Identity forwarded by the auth gateway in front of this service.

use std::future::{ready, Ready};

use actix_web::body::MessageBody;
use actix_web::dev::{Payload, ServiceRequest, ServiceResponse};
use actix_web::http::header::HeaderMap;
use actix_web::middleware::Next;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};

use crate::domain::order::Requester;
use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const USER_ROLE_HEADER: &str = "X-User-Role";

/// Store the gateway-supplied [`Requester`] in the request extensions.
///
/// Requests without a usable identity pass through untouched; handlers
/// that extract a `Requester` reject them with 401.
pub async fn attach_requester(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    if let Some(requester) = requester_from_headers(req.headers()) {
        req.extensions_mut().insert(requester);
    }
    next.call(req).await
}

fn requester_from_headers(headers: &HeaderMap) -> Option<Requester> {
    let id = headers
        .get(USER_ID_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()?;
    let is_admin = headers
        .get(USER_ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|role| role.trim().eq_ignore_ascii_case("admin"));
    Some(Requester { id, is_admin })
}

impl FromRequest for Requester {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Requester>()
                .copied()
                .ok_or(AppError::Unauthorized),
        )
    }
}
