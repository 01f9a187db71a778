use std::collections::HashMap;

use actix_web::{web, HttpResponse};

use crate::app_state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::UserView;
use crate::response;
use crate::store::Store;

/// Public profiles for `ids`, keyed by id. Unknown ids are left out.
pub async fn directory<'a, I>(store: &dyn Store, ids: I) -> ApiResult<HashMap<String, UserView>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut wanted: Vec<String> = ids.into_iter().map(str::to_string).collect();
    wanted.sort();
    wanted.dedup();
    if wanted.is_empty() {
        return Ok(HashMap::new());
    }
    let users = store.find_users(&wanted).await?;
    Ok(users
        .iter()
        .map(|u| (u.id.clone(), UserView::from(u)))
        .collect())
}

pub async fn current_user(store: &dyn Store, user_id: &str) -> ApiResult<UserView> {
    store
        .find_user(user_id)
        .await?
        .map(|u| UserView::from(&u))
        .ok_or(ApiError::NotFound("User"))
}

/// GET /api/users/get-logged-in-user
pub async fn get_logged_in_user(
    data: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, ApiError> {
    let view = current_user(data.store(), user.id()).await?;
    Ok(response::ok(view, "User fetched successfully"))
}
