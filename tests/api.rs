use std::sync::Arc;

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};

use teamtrack::config::Config;
use teamtrack::middleware::Authentication;
use teamtrack::routes;
use teamtrack::store::MemoryStore;
use teamtrack::AppState;

const SECRET: &str = "integration-secret";

macro_rules! spawn_app {
    () => {{
        let state = AppState::new(Arc::new(MemoryStore::new()), Config::for_tests(SECRET));
        test::init_service(
            App::new()
                .wrap(Authentication)
                .app_data(web::Data::new(state))
                .configure(routes::configure)
                .default_service(web::to(routes::not_found)),
        )
        .await
    }};
}

macro_rules! call {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

/// Registers and logs in; yields `(user_id, token)`.
macro_rules! signup {
    ($app:expr, $first:expr, $email:expr) => {{
        let (status, body) = call!(
            $app,
            post("/api/users/register", None, json!({
                "firstName": $first,
                "lastName": "Tester",
                "email": $email,
                "password": "correct horse",
            }))
        );
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        let id = body["data"]["_id"].as_str().unwrap().to_string();
        let (status, body) = call!(
            $app,
            post("/api/users/login", None, json!({ "email": $email, "password": "correct horse" }))
        );
        assert_eq!(status, StatusCode::OK, "{}", body);
        (id, body["data"].as_str().unwrap().to_string())
    }};
}

fn with_token(req: test::TestRequest, token: Option<&str>) -> test::TestRequest {
    match token {
        Some(token) => req.insert_header(("Authorization", format!("Bearer {}", token))),
        None => req,
    }
}

fn post(path: &str, token: Option<&str>, body: Value) -> test::TestRequest {
    with_token(test::TestRequest::post().uri(path), token).set_json(body)
}

fn get(path: &str, token: Option<&str>) -> test::TestRequest {
    with_token(test::TestRequest::get().uri(path), token)
}

fn delete(path: &str, token: Option<&str>) -> test::TestRequest {
    with_token(test::TestRequest::delete().uri(path), token)
}

fn create_project_body(name: &str) -> Value {
    json!({ "name": name, "description": "D" })
}

#[actix_web::test]
async fn project_task_notification_scenario() {
    let app = spawn_app!();
    let (u1, t1) = signup!(app, "Una", "una@example.com");
    let (u2, t2) = signup!(app, "Dos", "dos@example.com");

    let (status, body) = call!(app, post("/api/projects/create-project", Some(&t1), create_project_body("Apollo")));
    assert_eq!(status, StatusCode::CREATED);
    let project_id = body["data"]["_id"].as_str().unwrap().to_string();

    let (status, _) = call!(app, post("/api/projects/add-member", Some(&t1), json!({
        "projectId": project_id, "email": "dos@example.com", "role": "admin",
    })));
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call!(app, post("/api/tasks/create-task", Some(&t1), json!({
        "name": "Launch",
        "description": "Light the candle",
        "project": project_id,
        "assigneeEmail": "dos@example.com",
    })));
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let task_id = body["data"]["_id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["assignedTo"]["_id"], u2.as_str());
    assert_eq!(body["data"]["assignedBy"]["_id"], u1.as_str());
    assert_eq!(body["data"]["status"], "pending");

    let (status, body) = call!(app, post("/api/tasks/update-task", Some(&t2), json!({
        "_id": task_id, "status": "completed",
    })));
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "completed");

    let (_, body) = call!(app, get("/api/notifications/get-all-notifications", Some(&t1)));
    let feed = body["data"].as_array().unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["read"], false);
    assert_eq!(feed[0]["description"], "Launch status has been updated to completed");
    assert_eq!(feed[0]["onClick"], format!("/project/{}", project_id));

    let (status, body) = call!(app, post("/api/notifications/mark-as-read", Some(&t1), json!({})));
    assert_eq!(status, StatusCode::OK);
    let unread = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|n| n["read"] == false)
        .count();
    assert_eq!(unread, 0);

    // The assignee heard about the membership and the assignment.
    let (_, body) = call!(app, get("/api/notifications/get-all-notifications", Some(&t2)));
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn created_project_reads_back_with_owner_as_sole_member() {
    let app = spawn_app!();
    let (u1, t1) = signup!(app, "Una", "una@example.com");

    let (_, body) = call!(app, post("/api/projects/create-project", Some(&t1), create_project_body("Apollo")));
    let project_id = body["data"]["_id"].as_str().unwrap().to_string();

    let (status, body) = call!(app, post("/api/projects/get-project-by-id", Some(&t1), json!({ "_id": project_id })));
    assert_eq!(status, StatusCode::OK);
    let project = &body["data"];
    assert_eq!(project["name"], "Apollo");
    assert_eq!(project["description"], "D");
    assert_eq!(project["status"], "active");
    let members = project["members"].as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["user"]["_id"], u1.as_str());
    assert_eq!(members[0]["role"], "owner");
    assert!(members[0]["user"].get("password").is_none());
}

#[actix_web::test]
async fn duplicate_email_in_other_case_conflicts() {
    let app = spawn_app!();
    signup!(app, "Una", "una@example.com");
    let (status, body) = call!(app, post("/api/users/register", None, json!({
        "firstName": "Imposter", "lastName": "X", "email": "UNA@Example.com", "password": "pw",
    })));
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn protected_routes_need_a_valid_token() {
    let app = spawn_app!();
    let (_, t1) = signup!(app, "Una", "una@example.com");

    let (status, body) = call!(app, get("/api/users/get-logged-in-user", None));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = call!(app, get("/api/users/get-logged-in-user", Some("garbage")));
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call!(app, get("/api/users/get-logged-in-user", Some(&t1)));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "una@example.com");

    // A stale token does not block logging in again.
    let (status, _) = call!(app, post("/api/users/login", Some("stale"), json!({
        "email": "una@example.com", "password": "correct horse",
    })));
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn only_the_owner_manages_a_project() {
    let app = spawn_app!();
    let (_, owner) = signup!(app, "Una", "una@example.com");
    let (_, admin) = signup!(app, "Dos", "dos@example.com");
    let (u3, _) = signup!(app, "Tres", "tres@example.com");

    let (_, body) = call!(app, post("/api/projects/create-project", Some(&owner), create_project_body("Apollo")));
    let project_id = body["data"]["_id"].as_str().unwrap().to_string();
    call!(app, post("/api/projects/add-member", Some(&owner), json!({
        "projectId": project_id, "email": "dos@example.com", "role": "admin",
    })));

    let attempts = [
        post("/api/projects/edit-project", Some(&admin), json!({ "_id": project_id, "name": "Hijacked" })),
        post("/api/projects/add-member", Some(&admin), json!({ "projectId": project_id, "email": "tres@example.com" })),
        post("/api/projects/remove-member", Some(&admin), json!({ "projectId": project_id, "memberId": u3 })),
        post("/api/projects/delete-project", Some(&admin), json!({ "_id": project_id })),
    ];
    for attempt in attempts {
        let (status, body) = call!(app, attempt);
        assert_eq!(status, StatusCode::FORBIDDEN, "{}", body);
    }

    let (status, body) = call!(app, post("/api/projects/edit-project", Some(&owner), json!({
        "_id": project_id, "status": "archived",
    })));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "archived");
    assert_eq!(body["data"]["name"], "Apollo");
}

#[actix_web::test]
async fn member_additions_check_the_target() {
    let app = spawn_app!();
    let (_, owner) = signup!(app, "Una", "una@example.com");
    signup!(app, "Dos", "dos@example.com");

    let (_, body) = call!(app, post("/api/projects/create-project", Some(&owner), create_project_body("Apollo")));
    let project_id = body["data"]["_id"].as_str().unwrap().to_string();

    let (status, _) = call!(app, post("/api/projects/add-member", Some(&owner), json!({
        "projectId": project_id, "email": "ghost@example.com",
    })));
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call!(app, post("/api/projects/add-member", Some(&owner), json!({
        "projectId": project_id, "email": "dos@example.com", "role": "viewer",
    })));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["members"][1]["role"], "member");

    let (status, _) = call!(app, post("/api/projects/add-member", Some(&owner), json!({
        "projectId": project_id, "email": "Dos@Example.com",
    })));
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn owner_cannot_be_removed() {
    let app = spawn_app!();
    let (u1, owner) = signup!(app, "Una", "una@example.com");
    let (_, body) = call!(app, post("/api/projects/create-project", Some(&owner), create_project_body("Apollo")));
    let project_id = body["data"]["_id"].as_str().unwrap().to_string();

    let (status, _) = call!(app, post("/api/projects/remove-member", Some(&owner), json!({
        "projectId": project_id, "memberId": u1,
    })));
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn task_for_a_non_member_is_not_created() {
    let app = spawn_app!();
    let (_, owner) = signup!(app, "Una", "una@example.com");
    signup!(app, "Dos", "dos@example.com");
    let (_, body) = call!(app, post("/api/projects/create-project", Some(&owner), create_project_body("Apollo")));
    let project_id = body["data"]["_id"].as_str().unwrap().to_string();

    let (status, body) = call!(app, post("/api/tasks/create-task", Some(&owner), json!({
        "name": "Launch", "description": "Go", "project": project_id,
        "assigneeEmail": "dos@example.com",
    })));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Assignee is not a member of this project");

    let (status, body) = call!(app, post("/api/tasks/get-all-tasks", Some(&owner), json!({
        "project": project_id, "status": "all",
    })));
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn status_changes_are_limited_to_assignee_and_admins() {
    let app = spawn_app!();
    let (_, owner) = signup!(app, "Una", "una@example.com");
    let (_, worker) = signup!(app, "Dos", "dos@example.com");
    let (_, bystander) = signup!(app, "Tres", "tres@example.com");
    let (_, stranger) = signup!(app, "Cuatro", "cuatro@example.com");

    let (_, body) = call!(app, post("/api/projects/create-project", Some(&owner), create_project_body("Apollo")));
    let project_id = body["data"]["_id"].as_str().unwrap().to_string();
    for email in ["dos@example.com", "tres@example.com"] {
        call!(app, post("/api/projects/add-member", Some(&owner), json!({
            "projectId": project_id, "email": email, "role": "member",
        })));
    }
    let (_, body) = call!(app, post("/api/tasks/create-task", Some(&owner), json!({
        "name": "Launch", "description": "Go", "project": project_id,
        "assigneeEmail": "dos@example.com",
    })));
    let task_id = body["data"]["_id"].as_str().unwrap().to_string();

    for token in [&bystander, &stranger] {
        let (status, _) = call!(app, post("/api/tasks/update-task", Some(token), json!({
            "_id": task_id, "status": "closed",
        })));
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    // The assignee may move the status but not rename the task.
    let (status, _) = call!(app, post("/api/tasks/update-task", Some(&worker), json!({
        "_id": task_id, "name": "Renamed",
    })));
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call!(app, post("/api/tasks/update-task", Some(&worker), json!({
        "_id": task_id, "status": "inprogress",
    })));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "in-progress");

    // Archived tasks can be reopened.
    call!(app, post("/api/tasks/update-task", Some(&owner), json!({ "_id": task_id, "status": "closed" })));
    let (status, body) = call!(app, post("/api/tasks/update-task", Some(&worker), json!({
        "_id": task_id, "status": "pending",
    })));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "pending");

    let (_, body) = call!(app, get("/api/notifications/get-all-notifications", Some(&owner)));
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let (status, body) = call!(app, post("/api/tasks/get-all-tasks", Some(&stranger), json!({
        "project": project_id,
    })));
    assert_eq!(status, StatusCode::FORBIDDEN, "{}", body);
}

#[actix_web::test]
async fn reassigning_to_a_non_member_fails() {
    let app = spawn_app!();
    let (_, owner) = signup!(app, "Una", "una@example.com");
    signup!(app, "Dos", "dos@example.com");
    signup!(app, "Tres", "tres@example.com");
    let (_, body) = call!(app, post("/api/projects/create-project", Some(&owner), create_project_body("Apollo")));
    let project_id = body["data"]["_id"].as_str().unwrap().to_string();
    call!(app, post("/api/projects/add-member", Some(&owner), json!({
        "projectId": project_id, "email": "dos@example.com",
    })));
    let (_, body) = call!(app, post("/api/tasks/create-task", Some(&owner), json!({
        "name": "Launch", "description": "Go", "project": project_id,
        "assigneeEmail": "dos@example.com",
    })));
    let task_id = body["data"]["_id"].as_str().unwrap().to_string();

    let (status, _) = call!(app, post("/api/tasks/update-task", Some(&owner), json!({
        "_id": task_id, "assigneeEmail": "tres@example.com",
    })));
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn deleting_notifications_never_crosses_users() {
    let app = spawn_app!();
    let (u1, owner) = signup!(app, "Una", "una@example.com");
    let (u2, other) = signup!(app, "Dos", "dos@example.com");
    let (_, body) = call!(app, post("/api/projects/create-project", Some(&owner), create_project_body("Apollo")));
    let project_id = body["data"]["_id"].as_str().unwrap().to_string();
    call!(app, post("/api/projects/add-member", Some(&owner), json!({
        "projectId": project_id, "email": "dos@example.com",
    })));
    let (status, _) = call!(app, post("/api/notifications/add-notification", Some(&other), json!({
        "user": "nobody", "title": "x", "description": "y", "onClick": "/",
    })));
    assert_eq!(status, StatusCode::FORBIDDEN);
    call!(app, post("/api/notifications/add-notification", Some(&owner), json!({
        "user": u2, "title": "Ping", "description": "Check the plan", "onClick": "/",
    })));
    call!(app, post("/api/notifications/add-notification", Some(&owner), json!({
        "user": u1, "title": "Note", "description": "To self", "onClick": "/",
    })));

    let (status, _) = call!(app, delete("/api/notifications/delete-all-notifications", Some(&owner)));
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call!(app, get("/api/notifications/get-all-notifications", Some(&owner)));
    assert!(body["data"].as_array().unwrap().is_empty());
    let (_, body) = call!(app, get("/api/notifications/get-all-notifications", Some(&other)));
    // Membership notice plus the ping.
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn deleting_a_project_removes_its_tasks() {
    let app = spawn_app!();
    let (_, owner) = signup!(app, "Una", "una@example.com");
    let (_, body) = call!(app, post("/api/projects/create-project", Some(&owner), create_project_body("Apollo")));
    let project_id = body["data"]["_id"].as_str().unwrap().to_string();
    let (_, body) = call!(app, post("/api/tasks/create-task", Some(&owner), json!({
        "name": "Launch", "description": "Go", "project": project_id,
        "assigneeEmail": "una@example.com",
    })));
    let task_id = body["data"]["_id"].as_str().unwrap().to_string();

    let (status, _) = call!(app, post("/api/projects/delete-project", Some(&owner), json!({ "_id": project_id })));
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call!(app, post("/api/tasks/get-task-by-id", Some(&owner), json!({ "_id": task_id })));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn unknown_routes_answer_with_the_envelope() {
    let app = spawn_app!();
    let (status, body) = call!(app, get("/api/nowhere", None));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "API route not found");
}

#[actix_web::test]
async fn malformed_bodies_are_validation_errors() {
    let app = spawn_app!();
    let req = test::TestRequest::post()
        .uri("/api/users/login")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json");
    let (status, body) = call!(app, req);
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn repeating_the_current_status_still_notifies_the_creator() {
    let app = spawn_app!();
    let (_, owner) = signup!(app, "Una", "una@example.com");
    let (_, worker) = signup!(app, "Dos", "dos@example.com");
    let (_, body) = call!(app, post("/api/projects/create-project", Some(&owner), create_project_body("Apollo")));
    let project_id = body["data"]["_id"].as_str().unwrap().to_string();
    call!(app, post("/api/projects/add-member", Some(&owner), json!({
        "projectId": project_id, "email": "dos@example.com",
    })));
    let (_, body) = call!(app, post("/api/tasks/create-task", Some(&owner), json!({
        "name": "Launch", "description": "Go", "project": project_id,
        "assigneeEmail": "dos@example.com",
    })));
    let task_id = body["data"]["_id"].as_str().unwrap().to_string();

    let (status, body) = call!(app, post("/api/tasks/update-task", Some(&worker), json!({
        "_id": task_id, "status": "pending",
    })));
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "pending");

    let (_, body) = call!(app, get("/api/notifications/get-all-notifications", Some(&owner)));
    let feed = body["data"].as_array().unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["title"], "Task Status Updated");
    assert_eq!(feed[0]["description"], "Launch status has been updated to pending");
}

#[actix_web::test]
async fn task_deletion_needs_owner_or_admin() {
    let app = spawn_app!();
    let (_, owner) = signup!(app, "Una", "una@example.com");
    let (_, admin) = signup!(app, "Dos", "dos@example.com");
    let (_, member) = signup!(app, "Tres", "tres@example.com");
    let (_, body) = call!(app, post("/api/projects/create-project", Some(&owner), create_project_body("Apollo")));
    let project_id = body["data"]["_id"].as_str().unwrap().to_string();
    for (email, role) in [("dos@example.com", "admin"), ("tres@example.com", "member")] {
        call!(app, post("/api/projects/add-member", Some(&owner), json!({
            "projectId": project_id, "email": email, "role": role,
        })));
    }
    let (_, body) = call!(app, post("/api/tasks/create-task", Some(&owner), json!({
        "name": "Launch", "description": "Go", "project": project_id,
        "assigneeEmail": "tres@example.com",
    })));
    let task_id = body["data"]["_id"].as_str().unwrap().to_string();

    // Being the assignee does not grant deletion.
    let (status, _) = call!(app, post("/api/tasks/delete-task", Some(&member), json!({ "_id": task_id })));
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call!(app, post("/api/tasks/get-task-by-id", Some(&member), json!({ "_id": task_id })));
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call!(app, post("/api/tasks/delete-task", Some(&admin), json!({ "_id": task_id })));
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call!(app, post("/api/tasks/get-task-by-id", Some(&owner), json!({ "_id": task_id })));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn non_members_cannot_read_a_task() {
    let app = spawn_app!();
    let (_, owner) = signup!(app, "Una", "una@example.com");
    let (_, stranger) = signup!(app, "Cuatro", "cuatro@example.com");
    let (_, body) = call!(app, post("/api/projects/create-project", Some(&owner), create_project_body("Apollo")));
    let project_id = body["data"]["_id"].as_str().unwrap().to_string();
    let (_, body) = call!(app, post("/api/tasks/create-task", Some(&owner), json!({
        "name": "Launch", "description": "Go", "project": project_id,
        "assigneeEmail": "una@example.com",
    })));
    let task_id = body["data"]["_id"].as_str().unwrap().to_string();

    let (status, body) = call!(app, post("/api/tasks/get-task-by-id", Some(&stranger), json!({ "_id": task_id })));
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    let (status, body) = call!(app, post("/api/tasks/get-task-by-id", Some(&owner), json!({ "_id": task_id })));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Launch");
}

#[actix_web::test]
async fn projects_by_role_cover_owned_and_joined() {
    let app = spawn_app!();
    let (_, una) = signup!(app, "Una", "una@example.com");
    let (_, dos) = signup!(app, "Dos", "dos@example.com");
    let (_, tres) = signup!(app, "Tres", "tres@example.com");

    let (_, body) = call!(app, post("/api/projects/create-project", Some(&una), create_project_body("Apollo")));
    let apollo = body["data"]["_id"].as_str().unwrap().to_string();
    let (_, body) = call!(app, post("/api/projects/create-project", Some(&dos), create_project_body("Gemini")));
    let gemini = body["data"]["_id"].as_str().unwrap().to_string();
    call!(app, post("/api/projects/add-member", Some(&una), json!({
        "projectId": apollo, "email": "dos@example.com",
    })));

    let (status, body) = call!(app, post("/api/projects/get-projects-by-role", Some(&dos), json!({})));
    assert_eq!(status, StatusCode::OK);
    let mut ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["_id"].as_str().unwrap())
        .collect();
    ids.sort();
    let mut expected = vec![apollo.as_str(), gemini.as_str()];
    expected.sort();
    assert_eq!(ids, expected);

    let (_, body) = call!(app, post("/api/projects/get-projects-by-role", Some(&una), json!({})));
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    let (_, body) = call!(app, post("/api/projects/get-projects-by-role", Some(&tres), json!({})));
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn own_projects_filter_by_status() {
    let app = spawn_app!();
    let (_, una) = signup!(app, "Una", "una@example.com");
    let (_, dos) = signup!(app, "Dos", "dos@example.com");
    call!(app, post("/api/projects/create-project", Some(&una), create_project_body("Apollo")));
    let (_, body) = call!(app, post("/api/projects/create-project", Some(&una), create_project_body("Gemini")));
    let gemini = body["data"]["_id"].as_str().unwrap().to_string();
    let (_, body) = call!(app, post("/api/projects/create-project", Some(&dos), create_project_body("Mercury")));
    let mercury = body["data"]["_id"].as_str().unwrap().to_string();
    call!(app, post("/api/projects/add-member", Some(&dos), json!({
        "projectId": mercury, "email": "una@example.com",
    })));
    call!(app, post("/api/projects/edit-project", Some(&una), json!({ "_id": gemini, "status": "archived" })));

    let (status, body) = call!(app, post("/api/projects/get-all-projects", Some(&una), json!({ "status": "archived" })));
    assert_eq!(status, StatusCode::OK);
    let archived = body["data"].as_array().unwrap();
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0]["name"], "Gemini");

    // Joined projects are not the caller's own.
    let (_, body) = call!(app, post("/api/projects/get-all-projects", Some(&una), json!({ "status": "all" })));
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let bare = with_token(test::TestRequest::post().uri("/api/projects/get-all-projects"), Some(&una));
    let (status, body) = call!(app, bare);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = call!(app, post("/api/projects/get-all-projects", Some(&una), json!({ "status": 5 })));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}
