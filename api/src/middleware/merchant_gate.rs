//! Tenant gate middleware for token endpoints.
//!
//! Requests must name an active merchant in the `X-Merchant-Code` header.
//! On endpoints that act on a presented token the middleware also demands
//! an `Authorization: Bearer <token>` header and stores the token in the
//! request extensions for the [`BearerToken`] extractor.

use actix_web::{
    body::EitherBody,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, AUTHORIZATION},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use tracing::{error, warn};

use tg_core::services::TenantGate;

use crate::handlers::error::{ApiError, MERCHANT_INACTIVE, MERCHANT_LOOKUP_FAILED};

/// Header carrying the calling merchant's code
pub const MERCHANT_CODE_HEADER: &str = "x-merchant-code";

/// Raw bearer token taken from the Authorization header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Parses the value of an Authorization header
pub fn parse_bearer(header: Option<&str>) -> Result<String, ApiError> {
    let value = match header {
        Some(value) if !value.is_empty() => value,
        _ => return Err(ApiError::unauthorized("Missing authorization header")),
    };

    let token = value.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::unauthorized("Invalid authorization format, should be 'Bearer '")
    })?;

    let token = token.trim();
    if token.is_empty() {
        return Err(ApiError::unauthorized("empty bearer token"));
    }
    Ok(token.to_string())
}

fn authorization_header(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
    match headers.get(AUTHORIZATION) {
        None => Ok(None),
        Some(value) => value.to_str().map(Some).map_err(|_| {
            ApiError::unauthorized("Invalid authorization format, should be 'Bearer '")
        }),
    }
}

/// Tenant gate middleware factory
#[derive(Clone)]
pub struct MerchantGate {
    gate: Arc<dyn TenantGate>,
    require_bearer: bool,
}

impl MerchantGate {
    pub fn new(gate: Arc<dyn TenantGate>) -> Self {
        Self {
            gate,
            require_bearer: false,
        }
    }

    /// Also require a bearer token, checked before the merchant code
    pub fn with_bearer(mut self) -> Self {
        self.require_bearer = true;
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for MerchantGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = MerchantGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MerchantGateMiddleware {
            service: Rc::new(service),
            gate: Arc::clone(&self.gate),
            require_bearer: self.require_bearer,
        }))
    }
}

pub struct MerchantGateMiddleware<S> {
    service: Rc<S>,
    gate: Arc<dyn TenantGate>,
    require_bearer: bool,
}

impl<S, B> Service<ServiceRequest> for MerchantGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let gate = Arc::clone(&self.gate);
        let require_bearer = self.require_bearer;

        Box::pin(async move {
            match admit(&req, gate.as_ref(), require_bearer).await {
                Ok(bearer) => {
                    if let Some(token) = bearer {
                        req.extensions_mut().insert(token);
                    }
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(rejection) => {
                    let response = rejection.to_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

async fn admit(
    req: &ServiceRequest,
    gate: &dyn TenantGate,
    require_bearer: bool,
) -> Result<Option<BearerToken>, ApiError> {
    let bearer = if require_bearer {
        let header = authorization_header(req.headers())?;
        Some(BearerToken(parse_bearer(header)?))
    } else {
        None
    };

    let code = req
        .headers()
        .get(MERCHANT_CODE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .unwrap_or_default();
    if code.is_empty() {
        return Err(ApiError::bad_request("Merchant code is empty"));
    }

    match gate.is_active(code).await {
        Ok(true) => Ok(bearer),
        Ok(false) => {
            warn!(merchant = code, path = req.path(), "Rejected inactive merchant");
            Err(ApiError::unauthorized(MERCHANT_INACTIVE))
        }
        Err(e) => {
            error!(merchant = code, error = %e, "Merchant gate lookup failed");
            Err(ApiError::internal(MERCHANT_LOOKUP_FAILED))
        }
    }
}

impl FromRequest for BearerToken {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(token) = req.extensions().get::<BearerToken>().cloned() {
            return ready(Ok(token));
        }

        let result = authorization_header(req.headers())
            .and_then(parse_bearer)
            .map(BearerToken)
            .map_err(Error::from);
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");

        let missing = parse_bearer(None).unwrap_err();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(missing.message(), "Missing authorization header");

        let wrong_scheme = parse_bearer(Some("Basic dXNlcjpwYXNz")).unwrap_err();
        assert_eq!(
            wrong_scheme.message(),
            "Invalid authorization format, should be 'Bearer '"
        );

        let empty = parse_bearer(Some("Bearer    ")).unwrap_err();
        assert_eq!(empty.message(), "empty bearer token");
    }

    #[actix_web::test]
    async fn test_extractor_falls_back_to_header() {
        use actix_web::test;

        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer token_123"))
            .to_http_request();
        let token = BearerToken::extract(&req).await.unwrap();
        assert_eq!(token.as_str(), "token_123");

        let req = test::TestRequest::default().to_http_request();
        assert!(BearerToken::extract(&req).await.is_err());
    }
}
