//! HTTP integration tests: the full router over an in-memory database

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use orgchart_server::api::build_app;
use orgchart_server::db::DbService;
use orgchart_server::db::repository::user::{self, NewUser};
use orgchart_server::{Config, ErrorBody, ServerState};

struct TestApp {
    app: Router,
    state: ServerState,
}

impl TestApp {
    async fn new() -> Self {
        let db = DbService::in_memory().await.unwrap();
        let state = ServerState::new(Config::ephemeral(), db.pool);
        Self {
            app: build_app(state.clone()),
            state,
        }
    }

    /// Token for a freshly created account, skipping the login delay
    async fn token(&self, username: &str, is_admin: bool) -> String {
        let account = user::create(
            &self.state.pool,
            NewUser {
                username,
                email: "",
                hash_pass: "$argon2id$unused",
                is_admin,
            },
        )
        .await
        .unwrap();
        self.state
            .jwt_service
            .generate_token(account.id, &account.username, is_admin)
            .unwrap()
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    async fn create_employee(
        &self,
        token: &str,
        name: &str,
        hire_date: &str,
        supervisor_id: Option<i64>,
    ) -> i64 {
        let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
        let (status, body) = self
            .send(
                Method::POST,
                "/api/employees",
                Some(token),
                Some(json!({
                    "full_name": name,
                    "email": email,
                    "hire_date": hire_date,
                    "supervisor_id": supervisor_id,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create {name}: {body}");
        body["id"].as_i64().unwrap()
    }
}

fn names(items: &Value) -> Vec<String> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["full_name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_is_public() {
    let t = TestApp::new().await;
    let (status, body) = t.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = t.get("/health/detailed").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["database"]["status"], "ok");
}

#[tokio::test]
async fn reads_are_public_but_mutations_need_a_token() {
    let t = TestApp::new().await;

    let (status, body) = t.get("/api/employees").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);

    let (status, body) = t
        .send(
            Method::POST,
            "/api/employees",
            None,
            Some(json!({"full_name": "Ada", "email": "ada@example.com", "hire_date": "2020-01-01"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let (status, _) = t
        .send(Method::DELETE, "/api/employees/1", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_login_logout_flow() {
    let t = TestApp::new().await;

    let (status, body) = t
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "username": "jdoe",
                "email": "jdoe@example.com",
                "password": "correct horse",
                "password_confirm": "correct horse",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["is_admin"], false);

    let (status, body) = t
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "username": "jdoe",
                "email": "jdoe@example.com",
                "password": "correct horse",
                "password_confirm": "correct horse",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 1008);

    let (status, _) = t
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"username": "jdoe", "password": "wrong horse"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = t
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"username": "jdoe", "password": "correct horse"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();
    assert!(body["expires_in"].as_i64().unwrap() > 0);

    let (status, body) = t.send(Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "jdoe");

    let (status, _) = t.send(Method::POST, "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = t.send(Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1005);

    let (status, _) = t
        .send(
            Method::POST,
            "/api/employees",
            Some(&token),
            Some(json!({"full_name": "Ada", "email": "ada@example.com", "hire_date": "2020-01-01"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_rejects_mismatched_passwords() {
    let t = TestApp::new().await;
    let (status, body) = t
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "username": "jdoe",
                "email": "jdoe@example.com",
                "password": "correct horse",
                "password_confirm": "correct horsf",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1009);
}

#[tokio::test]
async fn invalid_names_are_rejected_with_field_details() {
    let t = TestApp::new().await;
    let token = t.token("editor", false).await;

    let (status, body) = t
        .send(
            Method::POST,
            "/api/employees",
            Some(&token),
            Some(json!({"full_name": "R2 D2", "email": "r2@example.com", "hire_date": "2020-01-01"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
    assert!(body["details"]["full_name"].is_array());

    let (status, body) = t
        .send(
            Method::POST,
            "/api/employees",
            Some(&token),
            Some(json!({"full_name": "Ada", "email": "nope", "hire_date": "2020-01-01"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["email"].is_array());
}

#[tokio::test]
async fn detail_and_not_found() {
    let t = TestApp::new().await;
    let token = t.token("editor", false).await;
    let boss = t.create_employee(&token, "Grace Hopper", "2019-05-01", None).await;
    let ada = t.create_employee(&token, "Ada Lovelace", "2020-01-01", Some(boss)).await;

    let (status, body) = t.get(&format!("/api/employees/{boss}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full_name"], "Grace Hopper");
    assert_eq!(body["subordinates"][0]["id"], ada);

    let (status, body) = t.get(&format!("/api/employees/{}", boss + ada)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 8001);

    let (status, body) = t
        .send(
            Method::POST,
            "/api/employees",
            Some(&token),
            Some(json!({
                "full_name": "Orphan",
                "email": "orphan@example.com",
                "hire_date": "2020-01-01",
                "supervisor_id": boss + ada,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 8002);
}

#[tokio::test]
async fn reparenting_under_own_subordinate_is_rejected() {
    let t = TestApp::new().await;
    let token = t.token("editor", false).await;
    let a = t.create_employee(&token, "Alpha", "2020-01-01", None).await;
    let b = t.create_employee(&token, "Bravo", "2020-01-01", Some(a)).await;
    let c = t.create_employee(&token, "Charlie", "2020-01-01", Some(b)).await;

    let (status, body) = t
        .send(
            Method::POST,
            "/api/employees/update-supervisor",
            Some(&token),
            Some(json!({"employee_id": a, "supervisor_id": c})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 8003);

    let (status, body) = t
        .send(
            Method::PUT,
            &format!("/api/employees/{b}"),
            Some(&token),
            Some(json!({"supervisor_id": b})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 8004);

    let (_, body) = t.get(&format!("/api/employees/{a}")).await;
    assert!(body["supervisor_id"].is_null());

    let (status, body) = t
        .send(
            Method::POST,
            "/api/employees/update-supervisor",
            Some(&token),
            Some(json!({"employee_id": c, "supervisor_id": null})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["supervisor_id"].is_null());
}

#[tokio::test]
async fn deleting_a_supervisor_keeps_subordinates() {
    let t = TestApp::new().await;
    let token = t.token("editor", false).await;
    let boss = t.create_employee(&token, "Boss", "2020-01-01", None).await;
    let x = t.create_employee(&token, "Xena", "2020-01-01", Some(boss)).await;

    let (status, body) = t
        .send(Method::DELETE, &format!("/api/employees/{boss}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(true));

    let (status, body) = t.get(&format!("/api/employees/{x}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["supervisor_id"].is_null());
    assert!(body["supervisor"].is_null());
}

#[tokio::test]
async fn search_by_date_and_paginate() {
    let t = TestApp::new().await;
    let token = t.token("editor", false).await;
    t.create_employee(&token, "Ada", "2021-03-04", None).await;
    t.create_employee(&token, "Bob", "2021-03-20", None).await;
    t.create_employee(&token, "Cid", "2021-07-01", None).await;
    t.create_employee(&token, "Dot", "2022-03-04", None).await;

    let (_, body) = t.get("/api/employees?q=2021-03").await;
    assert_eq!(names(&body["items"]), vec!["Ada", "Bob"]);

    let (_, body) = t.get("/api/employees?q=04/03/2021").await;
    assert_eq!(names(&body["items"]), vec!["Ada"]);

    let (_, body) = t.get("/api/employees?q=2021&sort=-hire_date&page=1&page_size=2").await;
    assert_eq!(names(&body["items"]), vec!["Cid", "Bob"]);
    assert_eq!(body["total"], 3);
    assert_eq!(body["has_next"], true);
    assert_eq!(body["has_previous"], false);

    let (_, body) = t.get("/api/employees?q=2021&sort=-hire_date&page=2&page_size=2").await;
    assert_eq!(names(&body["items"]), vec!["Ada"]);
    assert_eq!(body["has_next"], false);
    assert_eq!(body["has_previous"], true);

    let (_, body) = t.get("/api/employees/data?q=dot").await;
    let record = &body["items"][0];
    assert_eq!(record["full_name"], "Dot");
    assert!(record.get("show_subordinates").is_none());

    let (status, body) = t.get("/api/employees?sort=salary").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["sort"], "salary");
}

#[tokio::test]
async fn subtree_and_tree_views() {
    let t = TestApp::new().await;
    let token = t.token("editor", false).await;
    let root = t.create_employee(&token, "Root", "2020-01-01", None).await;
    let mid = t.create_employee(&token, "Mid", "2020-01-01", Some(root)).await;
    let leaf = t.create_employee(&token, "Leaf", "2020-01-01", Some(mid)).await;
    t.create_employee(&token, "Loner", "2020-01-01", None).await;

    let (status, _) = t
        .send(
            Method::PUT,
            &format!("/api/employees/{mid}"),
            Some(&token),
            Some(json!({"show_subordinates": false})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = t.get(&format!("/api/employees/{root}/subordinates")).await;
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![leaf, mid]);

    let (_, forest) = t.get("/api/employees/tree").await;
    assert_eq!(names(&forest), vec!["Loner", "Root"]);
    let mid_node = &forest[1]["children"][0];
    assert_eq!(mid_node["collapsed"], true);
    assert_eq!(mid_node["subordinate_count"], 1);
    assert!(mid_node["children"].as_array().unwrap().is_empty());

    let (_, tree) = t.get(&format!("/api/employees/tree?root={mid}")).await;
    assert_eq!(tree.as_array().unwrap().len(), 1);
    assert_eq!(tree[0]["id"], mid);
}

#[tokio::test]
async fn reassign_subordinates_in_bulk() {
    let t = TestApp::new().await;
    let token = t.token("editor", false).await;
    let old = t.create_employee(&token, "Old Boss", "2020-01-01", None).await;
    let new = t.create_employee(&token, "New Boss", "2020-01-01", None).await;
    let x = t.create_employee(&token, "Xena", "2020-01-01", Some(old)).await;
    t.create_employee(&token, "Yuri", "2020-01-01", Some(old)).await;

    let (status, body) = t
        .send(
            Method::POST,
            &format!("/api/employees/{old}/reassign-subordinates"),
            Some(&token),
            Some(json!({"new_supervisor_id": new})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["moved"], 2);

    let (status, body) = t
        .send(
            Method::POST,
            &format!("/api/employees/{new}/reassign-subordinates"),
            Some(&token),
            Some(json!({"new_supervisor_id": x})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 8003);
}

#[tokio::test]
async fn positions_require_admin_and_delete_nulls_references() {
    let t = TestApp::new().await;
    let editor = t.token("editor", false).await;
    let admin = t.token("admin", true).await;

    let (status, body) = t
        .send(Method::POST, "/api/positions", Some(&editor), Some(json!({"name": "Engineer"})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);

    let (status, body) = t
        .send(Method::POST, "/api/positions", Some(&admin), Some(json!({"name": "Engineer"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    let position_id = body["id"].as_i64().unwrap();

    let ada = t.create_employee(&editor, "Ada", "2020-01-01", None).await;
    let (status, body) = t
        .send(
            Method::PUT,
            &format!("/api/employees/{ada}"),
            Some(&editor),
            Some(json!({"position_id": position_id})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["position_id"], position_id);

    let (_, body) = t.get("/api/positions").await;
    assert_eq!(body[0]["employee_count"], 1);

    let (status, _) = t
        .send(Method::DELETE, &format!("/api/positions/{position_id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = t.get(&format!("/api/employees/{ada}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["position_id"].is_null());

    let (status, body) = t.get(&format!("/api/positions/{position_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 8101);
}

#[tokio::test]
async fn malformed_path_query_and_body_get_the_unified_error_body() {
    let t = TestApp::new().await;
    let token = t.token("editor", false).await;

    for uri in [
        "/api/employees/abc",
        "/api/employees/abc/subordinates",
        "/api/positions/abc",
    ] {
        let (status, body) = t.get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        let error: ErrorBody = serde_json::from_value(body).unwrap();
        assert_eq!(error.code, 5, "{uri}");
        assert!(error.message.starts_with("Invalid path parameter"));
    }

    for uri in [
        "/api/employees?page=x",
        "/api/employees/data?page_size=-",
        "/api/employees/tree?root=abc",
    ] {
        let (status, body) = t.get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["code"], 2, "{uri}: {body}");
    }

    let (status, body) = t
        .send(
            Method::POST,
            "/api/employees/update-supervisor",
            Some(&token),
            Some(json!({ "employee_id": "x" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2, "{body}");

    let (status, body) = t
        .send(
            Method::POST,
            "/api/employees/1/reassign-subordinates",
            Some(&token),
            Some(json!({ "new_supervisor_id": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2, "{body}");

    let (status, body) = t
        .send(Method::POST, "/api/auth/login", None, Some(json!({ "username": 1 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2, "{body}");
}
