/// HTTP middleware utilities for blog-service
///
/// Provides bearer-token authentication, the author permission rule and
/// request metrics recording.
pub mod permissions;

pub use permissions::*;

use crate::error::AppError;
use crate::metrics::record_http_request;
use crate::repository::BlogRepository;
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use jwt_security::JwtManager;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

// =====================================================================
// JWT Authentication
// =====================================================================

/// Caller identity stored in request extensions after auth.
///
/// Extracting `AuthenticatedUser` fails with 401 for anonymous requests;
/// extract `Option<AuthenticatedUser>` where anonymous access is allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub username: String,
}

/// Actix middleware that validates an optional Bearer token.
///
/// Requests without an `Authorization` header pass through anonymously;
/// a header that is not a valid bearer token is rejected with 401, and so is
/// a token whose user no longer exists under the same id and username.
#[derive(Clone)]
pub struct AuthMiddleware {
    jwt: Arc<JwtManager>,
}

impl AuthMiddleware {
    pub fn new(jwt: Arc<JwtManager>) -> Self {
        Self { jwt }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            jwt: self.jwt.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    jwt: Arc<JwtManager>,
}

impl<S> AuthMiddlewareService<S> {
    /// `Ok(None)` for anonymous requests
    fn authenticate(&self, req: &ServiceRequest) -> Result<Option<AuthenticatedUser>, AppError> {
        let Some(auth_header) = req.headers().get("Authorization") else {
            return Ok(None);
        };

        let token = auth_header
            .to_str()
            .ok()
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?;

        let data = self.jwt.validate_token(token).map_err(|err| {
            tracing::debug!(error = %err, "token rejected");
            AppError::Unauthorized("Given token not valid for any token type".into())
        })?;

        let id = data
            .claims
            .user_id()
            .map_err(|_| AppError::Unauthorized("Invalid user ID".into()))?;

        Ok(Some(AuthenticatedUser {
            id,
            username: data.claims.username,
        }))
    }
}

/// Confirm the token identity against the users table
async fn resolve_caller(
    repo: Option<web::Data<Arc<dyn BlogRepository>>>,
    identity: AuthenticatedUser,
) -> Result<AuthenticatedUser, AppError> {
    let repo = repo.ok_or_else(|| AppError::Internal("repository is not configured".into()))?;

    match repo.find_user_by_id(identity.id).await? {
        Some(user) if user.username == identity.username => Ok(identity),
        Some(user) => {
            tracing::debug!(
                user_id = identity.id,
                claimed = %identity.username,
                actual = %user.username,
                "token username does not match user"
            );
            Err(AppError::Unauthorized("User not found".into()))
        }
        None => {
            tracing::debug!(user_id = identity.id, "token user does not exist");
            Err(AppError::Unauthorized("User not found".into()))
        }
    }
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let identity = match self.authenticate(&req) {
            Ok(identity) => identity,
            Err(err) => {
                let resp = req.error_response(err).map_into_right_body();
                return Box::pin(async move { Ok(resp) });
            }
        };

        let repo = req.app_data::<web::Data<Arc<dyn BlogRepository>>>().cloned();
        let service = self.service.clone();

        Box::pin(async move {
            if let Some(identity) = identity {
                match resolve_caller(repo, identity).await {
                    Ok(user) => {
                        req.extensions_mut().insert(user);
                    }
                    Err(err) => return Ok(req.error_response(err).map_into_right_body()),
                }
            }

            service.call(req).await.map(|res| res.map_into_left_body())
        })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthenticatedUser>()
                .cloned()
                .ok_or_else(|| Error::from(AppError::authentication_required())),
        )
    }
}

// =====================================================================
// Metrics middleware
// =====================================================================

pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let path = req.path().to_string();
        let method = req.method().to_string();
        let start = Instant::now();

        Box::pin(async move {
            let res = service.call(req).await;
            let elapsed = start.elapsed();

            let status = match &res {
                Ok(resp) => resp.status().as_u16(),
                Err(err) => err.as_response_error().status_code().as_u16(),
            };
            record_http_request(&method, status, elapsed.as_secs_f64());
            tracing::debug!(%method, %path, status, elapsed_ms = elapsed.as_millis() as u64, "request completed");

            res
        })
    }
}
