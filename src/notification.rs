// src/notification.rs

use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::{info, warn};
use serde::Deserialize;

use crate::app_state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::{new_id, Notification, Project, Role, Task};
use crate::response;
use crate::store::Store;
use crate::validate;

/// Something that happened to a project or task and that someone should
/// hear about.
#[derive(Debug)]
pub enum FeedEvent<'a> {
    MemberAdded {
        project: &'a Project,
        user_id: &'a str,
        role: Role,
    },
    TaskAssigned {
        project: &'a Project,
        task: &'a Task,
    },
    /// `task` already carries the new status.
    TaskStatusChanged {
        project: &'a Project,
        task: &'a Task,
    },
}

/// A notification that has not been stored yet.
#[derive(Debug, Clone)]
pub struct Draft {
    pub recipient: String,
    pub title: String,
    pub description: String,
    pub on_click: String,
}

fn project_route(project: &Project) -> String {
    format!("/project/{}", project.id)
}

impl FeedEvent<'_> {
    pub fn draft(&self) -> Draft {
        match self {
            FeedEvent::MemberAdded { project, user_id, role } => Draft {
                recipient: user_id.to_string(),
                title: "Added to project".to_string(),
                description: format!("You have been added to \"{}\" as {}", project.name, role),
                on_click: project_route(project),
            },
            FeedEvent::TaskAssigned { project, task } => Draft {
                recipient: task.assigned_to.clone(),
                title: format!("New task in \"{}\"", project.name),
                description: format!("You have been assigned a new task: {}", task.name),
                on_click: project_route(project),
            },
            FeedEvent::TaskStatusChanged { project, task } => Draft {
                recipient: task.assigned_by.clone(),
                title: "Task Status Updated".to_string(),
                description: format!("{} status has been updated to {}", task.name, task.status),
                on_click: project_route(project),
            },
        }
    }
}

/// Appends one unread notification for `draft.recipient`.
pub async fn emit(store: &dyn Store, draft: Draft) -> ApiResult<Notification> {
    if store.find_user(&draft.recipient).await?.is_none() {
        return Err(ApiError::InvalidRecipient);
    }
    let notification = Notification {
        id: new_id(),
        user: draft.recipient,
        title: draft.title,
        description: draft.description,
        on_click: draft.on_click,
        read: false,
        created_at: Utc::now(),
    };
    store.insert_notification(&notification).await?;
    Ok(notification)
}

/// Runs after the triggering write has committed. A failure here is logged
/// and swallowed; the mutation that caused it stands.
pub async fn publish(store: &dyn Store, event: FeedEvent<'_>) {
    let draft = event.draft();
    let recipient = draft.recipient.clone();
    if let Err(e) = emit(store, draft).await {
        warn!("Dropped notification for {}: {}", recipient, e);
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddNotificationRequest {
    pub user: String,
    pub title: String,
    pub description: String,
    pub on_click: String,
}

/// Direct emission. Callers may notify themselves or anyone they share a
/// project with.
pub async fn add(store: &dyn Store, caller: &str, req: &AddNotificationRequest) -> ApiResult<Notification> {
    let recipient = validate::required(&req.user, "Recipient is required")?;
    let title = validate::required(&req.title, "Notification title is required")?;
    let description = validate::required(&req.description, "Notification description is required")?;
    let on_click = validate::required(&req.on_click, "Notification action (onClick) is required")?;

    if recipient != caller {
        let shared = store
            .projects_for_member(caller)
            .await?
            .iter()
            .any(|p| p.is_member(&recipient));
        if !shared {
            return Err(ApiError::forbidden(
                "You can only notify users who share a project with you",
            ));
        }
    }

    emit(
        store,
        Draft {
            recipient,
            title,
            description,
            on_click,
        },
    )
    .await
}

/// Newest first.
pub async fn list(store: &dyn Store, user_id: &str) -> ApiResult<Vec<Notification>> {
    let mut notifications = store.notifications_for(user_id).await?;
    notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(notifications)
}

pub async fn mark_all_read(store: &dyn Store, user_id: &str) -> ApiResult<Vec<Notification>> {
    let updated = store.mark_all_read(user_id).await?;
    info!("Marked {} notifications read for {}", updated, user_id);
    list(store, user_id).await
}

pub async fn delete_all(store: &dyn Store, user_id: &str) -> ApiResult<u64> {
    let deleted = store.delete_notifications_for(user_id).await?;
    info!("Deleted {} notifications for {}", deleted, user_id);
    Ok(deleted)
}

/// POST /api/notifications/add-notification
pub async fn add_notification(
    data: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<AddNotificationRequest>,
) -> Result<HttpResponse, ApiError> {
    let notification = add(data.store(), user.id(), &body).await?;
    Ok(response::created(notification, "Notification added successfully"))
}

/// GET /api/notifications/get-all-notifications
pub async fn get_all_notifications(
    data: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, ApiError> {
    let notifications = list(data.store(), user.id()).await?;
    Ok(response::ok(notifications, "Notifications fetched successfully"))
}

/// POST /api/notifications/mark-as-read
pub async fn mark_as_read(
    data: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, ApiError> {
    let notifications = mark_all_read(data.store(), user.id()).await?;
    Ok(response::ok(notifications, "Notifications marked as read"))
}

/// DELETE /api/notifications/delete-all-notifications
pub async fn delete_all_notifications(
    data: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, ApiError> {
    delete_all(data.store(), user.id()).await?;
    Ok(response::message("All notifications deleted"))
}
