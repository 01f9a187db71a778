// src/routes.rs

use actix_web::{web, HttpResponse};

use crate::auth::{login_user, register_user};
use crate::error::ApiError;
use crate::notification::{
    add_notification, delete_all_notifications, get_all_notifications, mark_as_read,
};
use crate::project::{
    add_project_member, create_project, delete_project, edit_project, get_all_projects,
    get_project_by_id, get_projects_by_role, remove_project_member,
};
use crate::response::ApiResponse;
use crate::task::{create_task, delete_task, get_all_tasks, get_task_by_id, update_task};
use crate::user_management::get_logged_in_user;

/// Registers every `/api` route plus a JSON extractor config that reports
/// malformed bodies as validation failures.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("Invalid request body: {}", err)).into()
    }))
    .service(
        web::scope("/api")
            // USERS
            .service(
                web::scope("/users")
                    .route("/register", web::post().to(register_user))
                    .route("/login", web::post().to(login_user))
                    .route("/get-logged-in-user", web::get().to(get_logged_in_user)),
            )
            // PROJECTS
            .service(
                web::scope("/projects")
                    .route("/create-project", web::post().to(create_project))
                    .route("/get-all-projects", web::post().to(get_all_projects))
                    .route("/get-project-by-id", web::post().to(get_project_by_id))
                    .route("/edit-project", web::post().to(edit_project))
                    .route("/delete-project", web::post().to(delete_project))
                    .route("/get-projects-by-role", web::post().to(get_projects_by_role))
                    .route("/add-member", web::post().to(add_project_member))
                    .route("/remove-member", web::post().to(remove_project_member)),
            )
            // TASKS
            .service(
                web::scope("/tasks")
                    .route("/create-task", web::post().to(create_task))
                    .route("/get-all-tasks", web::post().to(get_all_tasks))
                    .route("/get-task-by-id", web::post().to(get_task_by_id))
                    .route("/update-task", web::post().to(update_task))
                    .route("/delete-task", web::post().to(delete_task)),
            )
            // NOTIFICATIONS
            .service(
                web::scope("/notifications")
                    .route("/add-notification", web::post().to(add_notification))
                    .route("/get-all-notifications", web::get().to(get_all_notifications))
                    .route("/mark-as-read", web::post().to(mark_as_read))
                    .route(
                        "/delete-all-notifications",
                        web::delete().to(delete_all_notifications),
                    ),
            ),
    );
}

/// Fallback for unmatched paths; install with `App::default_service`.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::<()>::failure("API route not found"))
}
