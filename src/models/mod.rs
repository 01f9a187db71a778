pub mod notification;
pub mod project;
pub mod task;
pub mod user;

pub use notification::Notification;
pub use project::{Member, MemberView, Project, ProjectChanges, ProjectStatus, ProjectView, Role};
pub use task::{Attachment, Task, TaskChanges, TaskStatus, TaskView};
pub use user::{User, UserView};

pub const USERS: &str = "users";
pub const PROJECTS: &str = "projects";
pub const TASKS: &str = "tasks";
pub const NOTIFICATIONS: &str = "notifications";

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
