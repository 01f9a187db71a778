// src/store/memory.rs

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::Store;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    Member, Notification, Project, ProjectChanges, ProjectStatus, Task, TaskChanges, TaskStatus,
    User,
};

/// Process-local store. Used by the test suite and by `STORAGE=memory`;
/// everything is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    projects: RwLock<HashMap<String, Project>>,
    tasks: RwLock<HashMap<String, Task>>,
    notifications: RwLock<Vec<Notification>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T>(mut items: Vec<T>, created_at: impl Fn(&T) -> chrono::DateTime<Utc>) -> Vec<T> {
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    items
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: &User) -> ApiResult<()> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(ApiError::DuplicateEmail);
        }
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn find_user(&self, id: &str) -> ApiResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_users(&self, ids: &[String]) -> ApiResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn insert_project(&self, project: &Project) -> ApiResult<()> {
        self.projects
            .write()
            .await
            .insert(project.id.clone(), project.clone());
        Ok(())
    }

    async fn find_project(&self, id: &str) -> ApiResult<Option<Project>> {
        Ok(self.projects.read().await.get(id).cloned())
    }

    async fn projects_for_member(&self, user_id: &str) -> ApiResult<Vec<Project>> {
        let found = self
            .projects
            .read()
            .await
            .values()
            .filter(|p| p.is_member(user_id))
            .cloned()
            .collect();
        Ok(newest_first(found, |p: &Project| p.created_at))
    }

    async fn projects_owned_by(
        &self,
        user_id: &str,
        status: Option<ProjectStatus>,
    ) -> ApiResult<Vec<Project>> {
        let found = self
            .projects
            .read()
            .await
            .values()
            .filter(|p| p.owner == user_id && status.map_or(true, |s| p.status == s))
            .cloned()
            .collect();
        Ok(newest_first(found, |p: &Project| p.created_at))
    }

    async fn update_project(&self, id: &str, changes: &ProjectChanges) -> ApiResult<bool> {
        match self.projects.write().await.get_mut(id) {
            Some(project) => {
                changes.apply(project, Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn push_member(&self, project_id: &str, member: &Member) -> ApiResult<bool> {
        let mut projects = self.projects.write().await;
        let Some(project) = projects.get_mut(project_id) else {
            return Ok(false);
        };
        if project.members.iter().any(|m| m.user == member.user) {
            return Ok(false);
        }
        project.members.push(member.clone());
        project.updated_at = Utc::now();
        Ok(true)
    }

    async fn pull_member(&self, project_id: &str, user_id: &str) -> ApiResult<bool> {
        let mut projects = self.projects.write().await;
        let Some(project) = projects.get_mut(project_id) else {
            return Ok(false);
        };
        let before = project.members.len();
        project.members.retain(|m| m.user != user_id);
        if project.members.len() == before {
            return Ok(false);
        }
        project.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete_project(&self, id: &str) -> ApiResult<bool> {
        Ok(self.projects.write().await.remove(id).is_some())
    }

    async fn insert_task(&self, task: &Task) -> ApiResult<()> {
        self.tasks.write().await.insert(task.id.clone(), task.clone());
        Ok(())
    }

    async fn find_task(&self, id: &str) -> ApiResult<Option<Task>> {
        Ok(self.tasks.read().await.get(id).cloned())
    }

    async fn tasks_for_project(
        &self,
        project_id: &str,
        status: Option<TaskStatus>,
    ) -> ApiResult<Vec<Task>> {
        let found = self
            .tasks
            .read()
            .await
            .values()
            .filter(|t| t.project == project_id && status.map_or(true, |s| t.status == s))
            .cloned()
            .collect();
        Ok(newest_first(found, |t: &Task| t.created_at))
    }

    async fn update_task(&self, id: &str, changes: &TaskChanges) -> ApiResult<bool> {
        match self.tasks.write().await.get_mut(id) {
            Some(task) => {
                changes.apply(task, Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_task(&self, id: &str) -> ApiResult<bool> {
        Ok(self.tasks.write().await.remove(id).is_some())
    }

    async fn delete_tasks_for_project(&self, project_id: &str) -> ApiResult<u64> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|_, t| t.project != project_id);
        Ok((before - tasks.len()) as u64)
    }

    async fn insert_notification(&self, notification: &Notification) -> ApiResult<()> {
        self.notifications.write().await.push(notification.clone());
        Ok(())
    }

    async fn notifications_for(&self, user_id: &str) -> ApiResult<Vec<Notification>> {
        let found = self
            .notifications
            .read()
            .await
            .iter()
            .filter(|n| n.user == user_id)
            .cloned()
            .collect();
        Ok(newest_first(found, |n: &Notification| n.created_at))
    }

    async fn mark_all_read(&self, user_id: &str) -> ApiResult<u64> {
        let mut count = 0;
        for n in self.notifications.write().await.iter_mut() {
            if n.user == user_id && !n.read {
                n.read = true;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn delete_notifications_for(&self, user_id: &str) -> ApiResult<u64> {
        let mut notifications = self.notifications.write().await;
        let before = notifications.len();
        notifications.retain(|n| n.user != user_id);
        Ok((before - notifications.len()) as u64)
    }
}
