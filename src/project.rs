// src/project.rs

use std::collections::HashMap;

use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::access::{self, Action};
use crate::app_state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::{
    new_id, Member, MemberView, Project, ProjectChanges, ProjectStatus, ProjectView, Role, UserView,
};
use crate::notification::{self, FeedEvent};
use crate::response;
use crate::store::Store;
use crate::user_management::directory;
use crate::validate;

const MIN_NAME_LEN: usize = 3;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: String,
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProjectIdRequest {
    #[serde(rename = "_id")]
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EditProjectRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
}

/// Body of `get-all-projects`. A missing status or `"all"` means no filter.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProjectFilters {
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddMemberRequest {
    pub project_id: String,
    pub email: String,
    pub role: Option<Role>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoveMemberRequest {
    pub project_id: String,
    /// The member's user id.
    pub member_id: String,
}

impl ProjectFilters {
    /// An empty body means no filters; anything else must be valid JSON.
    fn from_body(body: &[u8]) -> ApiResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| ApiError::Validation(format!("Invalid request body: {}", e)))
    }
}

fn project_name(raw: &str) -> ApiResult<String> {
    let name = validate::required(raw, "Project name is required")?;
    if name.chars().count() < MIN_NAME_LEN {
        return Err(ApiError::validation(
            "Project name must be at least 3 characters long",
        ));
    }
    Ok(name)
}

fn status_filter(raw: Option<&str>) -> ApiResult<Option<ProjectStatus>> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(other) => serde_json::from_value(serde_json::Value::String(other.to_lowercase()))
            .map(Some)
            .map_err(|_| ApiError::validation(format!("Unknown project status: {}", other))),
    }
}

/// Loads a project or fails with `NotFound`.
pub async fn load(store: &dyn Store, id: &str) -> ApiResult<Project> {
    let id = validate::required(id, "Project id is required")?;
    store.find_project(&id).await?.ok_or(ApiError::NotFound("Project"))
}

fn view(project: Project, users: &HashMap<String, UserView>) -> ProjectView {
    let members = project
        .members
        .iter()
        .filter_map(|m| {
            users.get(&m.user).map(|u| MemberView {
                user: u.clone(),
                role: m.role,
            })
        })
        .collect();
    ProjectView {
        owner: users.get(&project.owner).cloned(),
        members,
        id: project.id,
        name: project.name,
        description: project.description,
        status: project.status,
        created_at: project.created_at,
        updated_at: project.updated_at,
    }
}

pub async fn populate(store: &dyn Store, project: Project) -> ApiResult<ProjectView> {
    let users = directory(store, project.user_ids()).await?;
    Ok(view(project, &users))
}

pub async fn populate_all(store: &dyn Store, projects: Vec<Project>) -> ApiResult<Vec<ProjectView>> {
    let users = directory(store, projects.iter().flat_map(|p| p.user_ids())).await?;
    Ok(projects.into_iter().map(|p| view(p, &users)).collect())
}

/// The caller becomes owner and the only member.
pub async fn create(store: &dyn Store, caller: &str, req: &CreateProjectRequest) -> ApiResult<Project> {
    let now = Utc::now();
    let project = Project {
        id: new_id(),
        name: project_name(&req.name)?,
        description: validate::required(&req.description, "Project description is required")?,
        status: req.status.unwrap_or_default(),
        owner: caller.to_string(),
        members: vec![Member {
            user: caller.to_string(),
            role: Role::Owner,
        }],
        created_at: now,
        updated_at: now,
    };
    store.insert_project(&project).await?;
    info!("Project created {} by {}", project.id, caller);
    Ok(project)
}

pub async fn get(store: &dyn Store, caller: &str, id: &str) -> ApiResult<Project> {
    let project = load(store, id).await?;
    access::authorize(&project, caller, Action::ViewProject)?;
    Ok(project)
}

pub async fn edit(store: &dyn Store, caller: &str, req: &EditProjectRequest) -> ApiResult<Project> {
    let project = load(store, &req.id).await?;
    access::authorize(&project, caller, Action::EditProject)?;

    let changes = ProjectChanges {
        name: req.name.as_deref().map(project_name).transpose()?,
        description: req
            .description
            .as_deref()
            .map(|d| validate::required(d, "Project description is required"))
            .transpose()?,
        status: req.status,
    };
    if changes.is_empty() {
        return Err(ApiError::validation("No fields to update"));
    }
    if !store.update_project(&project.id, &changes).await? {
        return Err(ApiError::NotFound("Project"));
    }
    debug!("Project {} updated by {}", project.id, caller);
    load(store, &project.id).await
}

/// Removing the project also removes its tasks. That cleanup is a separate
/// write; if it fails the orphans are logged and left behind.
pub async fn delete(store: &dyn Store, caller: &str, id: &str) -> ApiResult<()> {
    let project = load(store, id).await?;
    access::authorize(&project, caller, Action::DeleteProject)?;
    if !store.delete_project(&project.id).await? {
        return Err(ApiError::NotFound("Project"));
    }
    info!("Project {} deleted by {}", project.id, caller);
    match store.delete_tasks_for_project(&project.id).await {
        Ok(count) => debug!("Removed {} tasks of project {}", count, project.id),
        Err(e) => warn!("Tasks of deleted project {} left behind: {}", project.id, e),
    }
    Ok(())
}

pub async fn add_member(store: &dyn Store, caller: &str, req: &AddMemberRequest) -> ApiResult<Project> {
    let project = load(store, &req.project_id).await?;
    access::authorize(&project, caller, Action::ManageMembers)?;

    let role = req.role.unwrap_or(Role::Member);
    if role == Role::Owner {
        return Err(ApiError::validation("A project has exactly one owner"));
    }
    let email = validate::email(&req.email)?;
    let user = store
        .find_user_by_email(&email)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    if project.is_member(&user.id) {
        return Err(ApiError::AlreadyMember);
    }

    let member = Member {
        user: user.id.clone(),
        role,
    };
    // A false here means a concurrent request added the same user first.
    if !store.push_member(&project.id, &member).await? {
        return Err(ApiError::AlreadyMember);
    }
    info!("Added {} to project {} as {}", user.id, project.id, role);

    let project = load(store, &project.id).await?;
    notification::publish(
        store,
        FeedEvent::MemberAdded {
            project: &project,
            user_id: &user.id,
            role,
        },
    )
    .await;
    Ok(project)
}

pub async fn remove_member(store: &dyn Store, caller: &str, req: &RemoveMemberRequest) -> ApiResult<Project> {
    let project = load(store, &req.project_id).await?;
    access::authorize(&project, caller, Action::ManageMembers)?;

    let member_id = validate::required(&req.member_id, "Member id is required")?;
    if member_id == project.owner {
        return Err(ApiError::validation("The project owner cannot be removed"));
    }
    if !store.pull_member(&project.id, &member_id).await? {
        return Err(ApiError::NotFound("Member"));
    }
    info!("Removed {} from project {}", member_id, project.id);
    load(store, &project.id).await
}

/// POST /api/projects/create-project
pub async fn create_project(
    data: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<CreateProjectRequest>,
) -> Result<HttpResponse, ApiError> {
    let project = create(data.store(), user.id(), &body).await?;
    let view = populate(data.store(), project).await?;
    Ok(response::created(view, "Project created successfully"))
}

/// POST /api/projects/get-all-projects
pub async fn get_all_projects(
    data: web::Data<AppState>,
    user: AuthUser,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let filters = ProjectFilters::from_body(&body)?;
    let status = status_filter(filters.status.as_deref())?;
    let projects = data.store().projects_owned_by(user.id(), status).await?;
    let views = populate_all(data.store(), projects).await?;
    Ok(response::ok(views, "Projects fetched successfully"))
}

/// POST /api/projects/get-project-by-id
pub async fn get_project_by_id(
    data: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<ProjectIdRequest>,
) -> Result<HttpResponse, ApiError> {
    let project = get(data.store(), user.id(), &body.id).await?;
    let view = populate(data.store(), project).await?;
    Ok(response::ok(view, "Project fetched successfully"))
}

/// POST /api/projects/get-projects-by-role
pub async fn get_projects_by_role(
    data: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, ApiError> {
    let projects = data.store().projects_for_member(user.id()).await?;
    let views = populate_all(data.store(), projects).await?;
    Ok(response::ok(views, "Projects fetched successfully"))
}

/// POST /api/projects/edit-project
pub async fn edit_project(
    data: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<EditProjectRequest>,
) -> Result<HttpResponse, ApiError> {
    let project = edit(data.store(), user.id(), &body).await?;
    let view = populate(data.store(), project).await?;
    Ok(response::ok(view, "Project updated successfully"))
}

/// POST /api/projects/delete-project
pub async fn delete_project(
    data: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<ProjectIdRequest>,
) -> Result<HttpResponse, ApiError> {
    delete(data.store(), user.id(), &body.id).await?;
    Ok(response::message("Project deleted successfully"))
}

/// POST /api/projects/add-member
pub async fn add_project_member(
    data: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<AddMemberRequest>,
) -> Result<HttpResponse, ApiError> {
    let project = add_member(data.store(), user.id(), &body).await?;
    let view = populate(data.store(), project).await?;
    Ok(response::ok(view, "Member added successfully"))
}

/// POST /api/projects/remove-member
pub async fn remove_project_member(
    data: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<RemoveMemberRequest>,
) -> Result<HttpResponse, ApiError> {
    let project = remove_member(data.store(), user.id(), &body).await?;
    let view = populate(data.store(), project).await?;
    Ok(response::ok(view, "Member removed successfully"))
}
