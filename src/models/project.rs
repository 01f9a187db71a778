use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::UserView;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Archived,
    Pending,
}

/// A member's standing in one project.
///
/// `Owner` is held only by the project's creator and cannot be granted.
/// Older clients send `viewer`, `editor` or `employee`; all of them mean
/// `Member`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Admin,
    #[serde(alias = "viewer", alias = "editor", alias = "employee")]
    Member,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Member => "member",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub status: ProjectStatus,
    pub owner: String,
    pub members: Vec<Member>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// The owner ranks as `Owner` whatever their member entry says.
    pub fn role_of(&self, user_id: &str) -> Option<Role> {
        if self.owner == user_id {
            return Some(Role::Owner);
        }
        self.members
            .iter()
            .find(|m| m.user == user_id)
            .map(|m| m.role)
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.role_of(user_id).is_some()
    }

    pub fn user_ids(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.owner.as_str()).chain(self.members.iter().map(|m| m.user.as_str()))
    }
}

/// Field updates for `edit-project`; `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
}

impl ProjectChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.status.is_none()
    }

    pub fn apply(&self, project: &mut Project, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            project.name = name.clone();
        }
        if let Some(description) = &self.description {
            project.description = description.clone();
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        project.updated_at = now;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberView {
    pub user: UserView,
    pub role: Role,
}

/// A project with its user references resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub owner: Option<UserView>,
    pub members: Vec<MemberView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
