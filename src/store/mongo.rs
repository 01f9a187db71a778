// src/store/mongo.rs

use async_trait::async_trait;
use futures_util::TryStreamExt;
use log::info;
use mongodb::bson::{doc, to_bson, DateTime, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};

use super::Store;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    Member, Notification, Project, ProjectChanges, ProjectStatus, Task, TaskChanges, TaskStatus,
    User, NOTIFICATIONS, PROJECTS, TASKS, USERS,
};

const DUPLICATE_KEY: i32 = 11000;

pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, mongodb::error::Error> {
        let client_options = ClientOptions::parse(uri).await?;
        let client = Client::with_options(client_options)?;
        Ok(MongoStore {
            db: client.database(db_name),
        })
    }

    pub async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
        let unique = IndexOptions::builder().unique(true).build();
        self.users()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(unique)
                    .build(),
            )
            .await?;
        self.projects()
            .create_index(IndexModel::builder().keys(doc! { "members.user": 1 }).build())
            .await?;
        self.tasks()
            .create_index(IndexModel::builder().keys(doc! { "project": 1, "status": 1 }).build())
            .await?;
        self.notifications()
            .create_index(IndexModel::builder().keys(doc! { "user": 1, "read": 1 }).build())
            .await?;
        info!("MongoDB indexes ensured");
        Ok(())
    }

    fn users(&self) -> Collection<User> {
        self.db.collection(USERS)
    }

    fn projects(&self) -> Collection<Project> {
        self.db.collection(PROJECTS)
    }

    fn tasks(&self) -> Collection<Task> {
        self.db.collection(TASKS)
    }

    fn notifications(&self) -> Collection<Notification> {
        self.db.collection(NOTIFICATIONS)
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY
    )
}

fn project_set(changes: &ProjectChanges) -> ApiResult<Document> {
    let mut set_doc = doc! { "updatedAt": DateTime::now() };
    if let Some(name) = &changes.name {
        set_doc.insert("name", name.as_str());
    }
    if let Some(description) = &changes.description {
        set_doc.insert("description", description.as_str());
    }
    if let Some(status) = &changes.status {
        set_doc.insert("status", to_bson(status)?);
    }
    Ok(set_doc)
}

fn task_set(changes: &TaskChanges) -> ApiResult<Document> {
    let mut set_doc = doc! { "updatedAt": DateTime::now() };
    if let Some(name) = &changes.name {
        set_doc.insert("name", name.as_str());
    }
    if let Some(description) = &changes.description {
        set_doc.insert("description", description.as_str());
    }
    if let Some(status) = &changes.status {
        set_doc.insert("status", to_bson(status)?);
    }
    if let Some(assignee) = &changes.assigned_to {
        set_doc.insert("assignedTo", assignee.as_str());
    }
    if let Some(attachments) = &changes.attachments {
        set_doc.insert("attachments", to_bson(attachments)?);
    }
    Ok(set_doc)
}

#[async_trait]
impl Store for MongoStore {
    async fn insert_user(&self, user: &User) -> ApiResult<()> {
        match self.users().insert_one(user).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(ApiError::DuplicateEmail),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user(&self, id: &str) -> ApiResult<Option<User>> {
        Ok(self.users().find_one(doc! { "_id": id }).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        Ok(self.users().find_one(doc! { "email": email }).await?)
    }

    async fn find_users(&self, ids: &[String]) -> ApiResult<Vec<User>> {
        let cursor = self.users().find(doc! { "_id": { "$in": ids.to_vec() } }).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_project(&self, project: &Project) -> ApiResult<()> {
        self.projects().insert_one(project).await?;
        Ok(())
    }

    async fn find_project(&self, id: &str) -> ApiResult<Option<Project>> {
        Ok(self.projects().find_one(doc! { "_id": id }).await?)
    }

    async fn projects_for_member(&self, user_id: &str) -> ApiResult<Vec<Project>> {
        let filter = doc! { "$or": [ { "owner": user_id }, { "members.user": user_id } ] };
        let cursor = self
            .projects()
            .find(filter)
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn projects_owned_by(
        &self,
        user_id: &str,
        status: Option<ProjectStatus>,
    ) -> ApiResult<Vec<Project>> {
        let mut filter = doc! { "owner": user_id };
        if let Some(status) = status {
            filter.insert("status", to_bson(&status)?);
        }
        let cursor = self
            .projects()
            .find(filter)
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn update_project(&self, id: &str, changes: &ProjectChanges) -> ApiResult<bool> {
        let res = self
            .projects()
            .update_one(doc! { "_id": id }, doc! { "$set": project_set(changes)? })
            .await?;
        Ok(res.matched_count == 1)
    }

    async fn push_member(&self, project_id: &str, member: &Member) -> ApiResult<bool> {
        // The `$ne` guard keeps the member list free of duplicates even when
        // two add-member requests race.
        let filter = doc! { "_id": project_id, "members.user": { "$ne": member.user.as_str() } };
        let update = doc! {
            "$push": { "members": to_bson(member)? },
            "$set": { "updatedAt": DateTime::now() },
        };
        let res = self.projects().update_one(filter, update).await?;
        Ok(res.modified_count == 1)
    }

    async fn pull_member(&self, project_id: &str, user_id: &str) -> ApiResult<bool> {
        let update = doc! {
            "$pull": { "members": { "user": user_id } },
            "$set": { "updatedAt": DateTime::now() },
        };
        let res = self
            .projects()
            .update_one(doc! { "_id": project_id, "members.user": user_id }, update)
            .await?;
        Ok(res.modified_count == 1)
    }

    async fn delete_project(&self, id: &str) -> ApiResult<bool> {
        let res = self.projects().delete_one(doc! { "_id": id }).await?;
        Ok(res.deleted_count == 1)
    }

    async fn insert_task(&self, task: &Task) -> ApiResult<()> {
        self.tasks().insert_one(task).await?;
        Ok(())
    }

    async fn find_task(&self, id: &str) -> ApiResult<Option<Task>> {
        Ok(self.tasks().find_one(doc! { "_id": id }).await?)
    }

    async fn tasks_for_project(
        &self,
        project_id: &str,
        status: Option<TaskStatus>,
    ) -> ApiResult<Vec<Task>> {
        let mut filter = doc! { "project": project_id };
        if let Some(status) = status {
            filter.insert("status", to_bson(&status)?);
        }
        let cursor = self
            .tasks()
            .find(filter)
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn update_task(&self, id: &str, changes: &TaskChanges) -> ApiResult<bool> {
        let res = self
            .tasks()
            .update_one(doc! { "_id": id }, doc! { "$set": task_set(changes)? })
            .await?;
        Ok(res.matched_count == 1)
    }

    async fn delete_task(&self, id: &str) -> ApiResult<bool> {
        let res = self.tasks().delete_one(doc! { "_id": id }).await?;
        Ok(res.deleted_count == 1)
    }

    async fn delete_tasks_for_project(&self, project_id: &str) -> ApiResult<u64> {
        let res = self.tasks().delete_many(doc! { "project": project_id }).await?;
        Ok(res.deleted_count)
    }

    async fn insert_notification(&self, notification: &Notification) -> ApiResult<()> {
        self.notifications().insert_one(notification).await?;
        Ok(())
    }

    async fn notifications_for(&self, user_id: &str) -> ApiResult<Vec<Notification>> {
        let cursor = self
            .notifications()
            .find(doc! { "user": user_id })
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn mark_all_read(&self, user_id: &str) -> ApiResult<u64> {
        let res = self
            .notifications()
            .update_many(
                doc! { "user": user_id, "read": false },
                doc! { "$set": { "read": true } },
            )
            .await?;
        Ok(res.modified_count)
    }

    async fn delete_notifications_for(&self, user_id: &str) -> ApiResult<u64> {
        let res = self
            .notifications()
            .delete_many(doc! { "user": user_id })
            .await?;
        Ok(res.deleted_count)
    }
}
