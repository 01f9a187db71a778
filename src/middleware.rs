// src/middleware.rs

use std::task::{Context, Poll};

use actix_web::{
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http, web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::{ok, ready, Ready};
use log::{debug, warn};

use crate::app_state::AppState;
use crate::auth;
use crate::error::ApiError;

/// The authenticated caller, placed in request extensions by
/// [`Authentication`]. Handlers that take it as an argument are protected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser(pub String);

impl AuthUser {
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Why a presented bearer token was refused. Public routes ignore it.
#[derive(Debug, Clone)]
struct TokenRejected(String);

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let extensions = req.extensions();
        if let Some(user) = extensions.get::<AuthUser>() {
            return ready(Ok(user.clone()));
        }
        let message = match extensions.get::<TokenRejected>() {
            Some(TokenRejected(reason)) => reason.clone(),
            None => "Authorization header missing or invalid".to_string(),
        };
        ready(Err(ApiError::Unauthenticated(message)))
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    let value = req.headers().get(http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Verifies `Authorization: Bearer <token>` when present. It never rejects a
/// request itself; the [`AuthUser`] extractor does that for protected routes.
#[derive(Debug)]
pub struct Authentication;

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddleware { service })
    }
}

pub struct AuthMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = S::Future;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(token) = bearer_token(&req) {
            match req.app_data::<web::Data<AppState>>() {
                Some(state) => match auth::authenticate(&token, &state.config.jwt_secret) {
                    Ok(user_id) => {
                        debug!("Authenticated request from {}", user_id);
                        req.extensions_mut().insert(AuthUser(user_id));
                    }
                    Err(e) => {
                        req.extensions_mut().insert(TokenRejected(e.to_string()));
                    }
                },
                None => warn!("AppState missing; cannot verify bearer token"),
            }
        }
        self.service.call(req)
    }
}
