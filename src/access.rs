//! Who may do what to a project and its tasks.
//!
//! These checks only look at the project snapshot loaded for the request.
//! They never touch storage, so concurrent edits are last-write-wins.

use crate::error::{ApiError, ApiResult};
use crate::models::{Project, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewProject,
    EditProject,
    DeleteProject,
    ManageMembers,
    ViewTasks,
    CreateTask,
    EditTask,
    DeleteTask,
    /// `is_assignee` is whether the caller is the task's assignee.
    ChangeTaskStatus { is_assignee: bool },
}

impl Action {
    fn denial(&self) -> &'static str {
        match self {
            Action::ViewProject | Action::ViewTasks => "You are not a member of this project",
            Action::EditProject => "Only the project owner can edit this project",
            Action::DeleteProject => "Only the project owner can delete this project",
            Action::ManageMembers => "Only the project owner can manage members",
            Action::CreateTask => "Only the project owner or an admin can create tasks",
            Action::EditTask => "Only the project owner or an admin can edit tasks",
            Action::DeleteTask => "Only the project owner or an admin can delete tasks",
            Action::ChangeTaskStatus { .. } => {
                "Only the assignee, the project owner or an admin can change this task's status"
            }
        }
    }
}

/// The permission matrix.
pub fn permits(role: Role, action: Action) -> bool {
    match action {
        Action::ViewProject | Action::ViewTasks => true,
        Action::EditProject | Action::DeleteProject | Action::ManageMembers => role == Role::Owner,
        Action::CreateTask | Action::EditTask | Action::DeleteTask => {
            matches!(role, Role::Owner | Role::Admin)
        }
        Action::ChangeTaskStatus { is_assignee } => {
            is_assignee || matches!(role, Role::Owner | Role::Admin)
        }
    }
}

/// Returns the caller's role when `action` is allowed, `Forbidden` otherwise.
/// Non-members are refused everything.
pub fn authorize(project: &Project, user_id: &str, action: Action) -> ApiResult<Role> {
    let role = project
        .role_of(user_id)
        .ok_or_else(|| ApiError::forbidden(Action::ViewProject.denial()))?;
    if permits(role, action) {
        Ok(role)
    } else {
        Err(ApiError::forbidden(action.denial()))
    }
}
