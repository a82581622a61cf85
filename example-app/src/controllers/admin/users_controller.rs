use axum::extract::Path;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use trellis::prelude::*;

pub struct UsersController;

impl Controller for UsersController {
    fn declare(d: &mut Declarer<'_>) {
        d.group(GroupDeclaration::new().name("admin").prefix("/admin").middleware("auth"))
            .get("index", "users")
            .get("show", "users/:id")
            .constraint("show", "id", Matcher::Number);
    }
}

const USERS: [(u64, &str); 2] = [(1, "alice"), (2, "bob")];

pub async fn index() -> Json<Value> {
    let users: Vec<Value> = USERS
        .iter()
        .map(|(id, login)| json!({ "id": id, "login": login }))
        .collect();
    Json(Value::Array(users))
}

pub async fn show(Path(id): Path<u64>) -> Result<Json<Value>, StatusCode> {
    USERS
        .iter()
        .find(|(user_id, _)| *user_id == id)
        .map(|(id, login)| Json(json!({ "id": id, "login": login })))
        .ok_or(StatusCode::NOT_FOUND)
}
