//! Persistence for users, projects, tasks and notifications.
//!
//! Every write touches a single document or a single collection, so the
//! backends never need multi-document transactions.

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::models::{
    Member, Notification, Project, ProjectChanges, ProjectStatus, Task, TaskChanges, TaskStatus,
    User,
};

#[async_trait]
pub trait Store: Send + Sync {
    /// Fails with `DuplicateEmail` if the email is taken.
    async fn insert_user(&self, user: &User) -> ApiResult<()>;
    async fn find_user(&self, id: &str) -> ApiResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> ApiResult<Option<User>>;
    async fn find_users(&self, ids: &[String]) -> ApiResult<Vec<User>>;

    async fn insert_project(&self, project: &Project) -> ApiResult<()>;
    async fn find_project(&self, id: &str) -> ApiResult<Option<Project>>;
    /// Projects the user owns or belongs to.
    async fn projects_for_member(&self, user_id: &str) -> ApiResult<Vec<Project>>;
    async fn projects_owned_by(
        &self,
        user_id: &str,
        status: Option<ProjectStatus>,
    ) -> ApiResult<Vec<Project>>;
    /// Returns false if no such project.
    async fn update_project(&self, id: &str, changes: &ProjectChanges) -> ApiResult<bool>;
    /// Appends `member` unless that user is already listed. Returns false if
    /// nothing was appended.
    async fn push_member(&self, project_id: &str, member: &Member) -> ApiResult<bool>;
    async fn pull_member(&self, project_id: &str, user_id: &str) -> ApiResult<bool>;
    async fn delete_project(&self, id: &str) -> ApiResult<bool>;

    async fn insert_task(&self, task: &Task) -> ApiResult<()>;
    async fn find_task(&self, id: &str) -> ApiResult<Option<Task>>;
    async fn tasks_for_project(
        &self,
        project_id: &str,
        status: Option<TaskStatus>,
    ) -> ApiResult<Vec<Task>>;
    async fn update_task(&self, id: &str, changes: &TaskChanges) -> ApiResult<bool>;
    async fn delete_task(&self, id: &str) -> ApiResult<bool>;
    async fn delete_tasks_for_project(&self, project_id: &str) -> ApiResult<u64>;

    async fn insert_notification(&self, notification: &Notification) -> ApiResult<()>;
    async fn notifications_for(&self, user_id: &str) -> ApiResult<Vec<Notification>>;
    async fn mark_all_read(&self, user_id: &str) -> ApiResult<u64>;
    async fn delete_notifications_for(&self, user_id: &str) -> ApiResult<u64>;
}
