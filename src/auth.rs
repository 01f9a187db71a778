// src/auth.rs

use actix_web::{web, HttpResponse};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::{new_id, User};
use crate::response;
use crate::store::Store;
use crate::validate;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// JWT Creation
pub fn create_jwt(user_id: &str, secret: &str, ttl: Duration) -> ApiResult<String> {
    let issued = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: issued.timestamp() as usize,
        exp: (issued + ttl).timestamp() as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_ref()))
        .map_err(|e| ApiError::Internal(format!("token signing failed: {}", e)))
}

// JWT Validation
pub fn validate_jwt(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Resolves a bearer token to the user id it was issued for.
pub fn authenticate(token: &str, secret: &str) -> ApiResult<String> {
    validate_jwt(token, secret)
        .map(|claims| claims.sub)
        .map_err(|e| ApiError::Unauthenticated(format!("Authentication failed: {}", e)))
}

pub async fn register(store: &dyn Store, bcrypt_cost: u32, req: &RegisterRequest) -> ApiResult<String> {
    let first_name = validate::required(&req.first_name, "First name is required")?;
    let last_name = validate::required(&req.last_name, "Last name is required")?;
    let email = validate::email(&req.email)?;
    if req.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError::DuplicateEmail);
    }

    let user = User {
        id: new_id(),
        first_name,
        last_name,
        email,
        password: hash(&req.password, bcrypt_cost)?,
        created_at: Utc::now(),
    };
    store.insert_user(&user).await?;
    info!("User registered {}", user.id);
    Ok(user.id)
}

/// Unknown email and wrong password fail identically.
pub async fn login(store: &dyn Store, secret: &str, ttl: Duration, req: &LoginRequest) -> ApiResult<String> {
    let email = validate::email(&req.email)?;
    let user = store
        .find_user_by_email(&email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify(&req.password, &user.password).unwrap_or(false) {
        warn!("Failed login for user {}", user.id);
        return Err(ApiError::InvalidCredentials);
    }
    create_jwt(&user.id, secret, ttl)
}

/// POST /api/users/register
pub async fn register_user(
    data: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = register(data.store(), data.config.bcrypt_cost, &body).await?;
    Ok(response::created(
        serde_json::json!({ "_id": id }),
        "User registered successfully",
    ))
}

/// POST /api/users/login
pub async fn login_user(
    data: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let token = login(data.store(), &data.config.jwt_secret, data.config.jwt_ttl, &body).await?;
    Ok(response::ok(token, "User logged in successfully"))
}
