// src/task.rs

use std::collections::HashMap;

use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::{debug, info};
use serde::Deserialize;

use crate::access::{self, Action};
use crate::app_state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::{
    new_id, Attachment, Project, Task, TaskChanges, TaskStatus, TaskView, UserView,
};
use crate::notification::{self, FeedEvent};
use crate::project;
use crate::response;
use crate::store::Store;
use crate::user_management::directory;
use crate::validate;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTaskRequest {
    pub name: String,
    pub description: String,
    pub project: String,
    pub assignee_email: String,
    pub status: Option<TaskStatus>,
    pub attachments: Vec<Attachment>,
}

/// Every field but `_id` is optional. Touching anything other than `status`
/// needs owner or admin rights.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateTaskRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub assignee_email: Option<String>,
    pub status: Option<TaskStatus>,
    pub attachments: Option<Vec<Attachment>>,
}

impl UpdateTaskRequest {
    fn edits_details(&self) -> bool {
        self.name.is_some()
            || self.description.is_some()
            || self.assignee_email.is_some()
            || self.attachments.is_some()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TaskIdRequest {
    #[serde(rename = "_id")]
    pub id: String,
}

/// Body of `get-all-tasks`. A missing status or `"all"` means no filter.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TaskFilters {
    pub project: String,
    pub status: Option<String>,
}

fn status_filter(raw: Option<&str>) -> ApiResult<Option<TaskStatus>> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(other) => other.parse().map(Some).map_err(ApiError::Validation),
    }
}

fn checked_attachments(attachments: &[Attachment]) -> ApiResult<Vec<Attachment>> {
    attachments
        .iter()
        .map(|a| {
            Ok(Attachment {
                filename: validate::required(&a.filename, "Attachment filename is required")?,
                url: validate::required(&a.url, "Attachment url is required")?,
                uploaded_at: a.uploaded_at,
            })
        })
        .collect()
}

/// Assignees are named by email and must already belong to the project.
async fn resolve_assignee(store: &dyn Store, project: &Project, email: &str) -> ApiResult<String> {
    let email = validate::email(email)?;
    match store.find_user_by_email(&email).await? {
        Some(user) if project.is_member(&user.id) => Ok(user.id),
        _ => Err(ApiError::NotAProjectMember),
    }
}

async fn load(store: &dyn Store, id: &str) -> ApiResult<(Task, Project)> {
    let id = validate::required(id, "Task id is required")?;
    let task = store.find_task(&id).await?.ok_or(ApiError::NotFound("Task"))?;
    let project = project::load(store, &task.project).await?;
    Ok((task, project))
}

fn view(task: Task, users: &HashMap<String, UserView>) -> TaskView {
    TaskView {
        assigned_to: users.get(&task.assigned_to).cloned(),
        assigned_by: users.get(&task.assigned_by).cloned(),
        id: task.id,
        name: task.name,
        description: task.description,
        status: task.status,
        project: task.project,
        attachments: task.attachments,
        created_at: task.created_at,
        updated_at: task.updated_at,
    }
}

pub async fn populate_all(store: &dyn Store, tasks: Vec<Task>) -> ApiResult<Vec<TaskView>> {
    let ids = tasks
        .iter()
        .flat_map(|t| [t.assigned_to.as_str(), t.assigned_by.as_str()]);
    let users = directory(store, ids).await?;
    Ok(tasks.into_iter().map(|t| view(t, &users)).collect())
}

pub async fn populate(store: &dyn Store, task: Task) -> ApiResult<TaskView> {
    let users = directory(store, [task.assigned_to.as_str(), task.assigned_by.as_str()]).await?;
    Ok(view(task, &users))
}

pub async fn create(store: &dyn Store, caller: &str, req: &CreateTaskRequest) -> ApiResult<Task> {
    let name = validate::required(&req.name, "Task name is required")?;
    let description = validate::required(&req.description, "Task description is required")?;
    let project = project::load(store, &req.project).await?;
    access::authorize(&project, caller, Action::CreateTask)?;
    let assignee = resolve_assignee(store, &project, &req.assignee_email).await?;

    let now = Utc::now();
    let task = Task {
        id: new_id(),
        name,
        description,
        status: req.status.unwrap_or_default(),
        project: project.id.clone(),
        assigned_to: assignee,
        assigned_by: caller.to_string(),
        attachments: checked_attachments(&req.attachments)?,
        created_at: now,
        updated_at: now,
    };
    store.insert_task(&task).await?;
    info!("Task {} created in project {}", task.id, project.id);

    notification::publish(store, FeedEvent::TaskAssigned { project: &project, task: &task }).await;
    Ok(task)
}

pub async fn get(store: &dyn Store, caller: &str, id: &str) -> ApiResult<Task> {
    let (task, project) = load(store, id).await?;
    access::authorize(&project, caller, Action::ViewTasks)?;
    Ok(task)
}

pub async fn list(store: &dyn Store, caller: &str, filters: &TaskFilters) -> ApiResult<Vec<Task>> {
    let project = project::load(store, &filters.project).await?;
    access::authorize(&project, caller, Action::ViewTasks)?;
    let status = status_filter(filters.status.as_deref())?;
    store.tasks_for_project(&project.id, status).await
}

pub async fn update(store: &dyn Store, caller: &str, req: &UpdateTaskRequest) -> ApiResult<Task> {
    let (task, project) = load(store, &req.id).await?;
    if !req.edits_details() && req.status.is_none() {
        return Err(ApiError::validation("No fields to update"));
    }
    if req.edits_details() {
        access::authorize(&project, caller, Action::EditTask)?;
    }
    if req.status.is_some() {
        let is_assignee = task.assigned_to == caller;
        access::authorize(&project, caller, Action::ChangeTaskStatus { is_assignee })?;
    }

    let mut changes = TaskChanges {
        name: req
            .name
            .as_deref()
            .map(|n| validate::required(n, "Task name is required"))
            .transpose()?,
        description: req
            .description
            .as_deref()
            .map(|d| validate::required(d, "Task description is required"))
            .transpose()?,
        status: req.status.filter(|s| *s != task.status),
        attachments: req.attachments.as_deref().map(checked_attachments).transpose()?,
        ..Default::default()
    };
    if let Some(email) = &req.assignee_email {
        let assignee = resolve_assignee(store, &project, email).await?;
        if assignee != task.assigned_to {
            changes.assigned_to = Some(assignee);
        }
    }
    let updated = if changes.is_empty() {
        task
    } else {
        if !store.update_task(&task.id, &changes).await? {
            return Err(ApiError::NotFound("Task"));
        }
        debug!("Task {} updated by {}", task.id, caller);
        store
            .find_task(&task.id)
            .await?
            .ok_or(ApiError::NotFound("Task"))?
    };

    // Every accepted status update is reported, even one that keeps the
    // current status.
    if req.status.is_some() {
        notification::publish(store, FeedEvent::TaskStatusChanged { project: &project, task: &updated }).await;
    }
    if changes.assigned_to.is_some() {
        notification::publish(store, FeedEvent::TaskAssigned { project: &project, task: &updated }).await;
    }
    Ok(updated)
}

pub async fn delete(store: &dyn Store, caller: &str, id: &str) -> ApiResult<()> {
    let (task, project) = load(store, id).await?;
    access::authorize(&project, caller, Action::DeleteTask)?;
    if !store.delete_task(&task.id).await? {
        return Err(ApiError::NotFound("Task"));
    }
    info!("Task {} deleted by {}", task.id, caller);
    Ok(())
}

/// POST /api/tasks/create-task
pub async fn create_task(
    data: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<CreateTaskRequest>,
) -> Result<HttpResponse, ApiError> {
    let task = create(data.store(), user.id(), &body).await?;
    let view = populate(data.store(), task).await?;
    Ok(response::created(view, "Task created successfully"))
}

/// POST /api/tasks/get-all-tasks
pub async fn get_all_tasks(
    data: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<TaskFilters>,
) -> Result<HttpResponse, ApiError> {
    let tasks = list(data.store(), user.id(), &body).await?;
    let views = populate_all(data.store(), tasks).await?;
    Ok(response::ok(views, "Tasks fetched successfully"))
}

/// POST /api/tasks/get-task-by-id
pub async fn get_task_by_id(
    data: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<TaskIdRequest>,
) -> Result<HttpResponse, ApiError> {
    let task = get(data.store(), user.id(), &body.id).await?;
    let view = populate(data.store(), task).await?;
    Ok(response::ok(view, "Task fetched successfully"))
}

/// POST /api/tasks/update-task
pub async fn update_task(
    data: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<UpdateTaskRequest>,
) -> Result<HttpResponse, ApiError> {
    let task = update(data.store(), user.id(), &body).await?;
    let view = populate(data.store(), task).await?;
    Ok(response::ok(view, "Task updated successfully"))
}

/// POST /api/tasks/delete-task
pub async fn delete_task(
    data: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<TaskIdRequest>,
) -> Result<HttpResponse, ApiError> {
    delete(data.store(), user.id(), &body.id).await?;
    Ok(response::message("Task deleted successfully"))
}
