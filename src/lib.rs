pub mod access;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod notification;
pub mod project;
pub mod response;
pub mod routes;
pub mod session;
pub mod store;
pub mod task;
pub mod user_management;
pub mod validate;

pub use app_state::AppState;
pub use error::{ApiError, ApiResult};
