use praxis_server::{build_router, ApiConfig, AppState};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tempfile::{tempdir, TempDir};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

async fn spawn_server() -> (SocketAddr, TempDir) {
    let tmp = tempdir().expect("tempdir");
    let conn = praxis_store::open(&tmp.path().join("praxis.sqlite3")).expect("open db");
    let state = AppState::new(conn, ApiConfig::default());
    let app = build_router(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    (addr, tmp)
}

async fn send(
    addr: SocketAddr,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<&Value>,
) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let payload = body.map(Value::to_string).unwrap_or_default();
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    if let Some(token) = token {
        req.push_str(&format!("Authorization: Bearer {token}\r\n"));
    }
    if body.is_some() {
        req.push_str("Content-Type: application/json\r\n");
    }
    req.push_str(&format!("Content-Length: {}\r\n\r\n", payload.len()));
    req.push_str(&payload);
    stream.write_all(req.as_bytes()).await.expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response must have separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    (status, head.to_string(), body.to_string())
}

fn parse_json(body: &str) -> Value {
    serde_json::from_str(body).expect("json body")
}

async fn register_and_login(addr: SocketAddr, email: &str) -> String {
    let (status, _, _) = send(
        addr,
        "POST",
        "/register/",
        None,
        Some(&json!({
            "email": email,
            "password": "correct-horse-battery",
            "password2": "correct-horse-battery",
            "first_name": "Ana",
        })),
    )
    .await;
    assert_eq!(status, 201);
    let (status, _, body) = send(
        addr,
        "POST",
        "/token/",
        None,
        Some(&json!({"email": email, "password": "correct-horse-battery"})),
    )
    .await;
    assert_eq!(status, 200);
    let tokens = parse_json(&body);
    tokens["access"].as_str().expect("access token").to_string()
}

#[tokio::test]
async fn open_endpoints_and_auth_gate() {
    let (addr, _tmp) = spawn_server().await;

    let (status, _, body) = send(addr, "GET", "/healthz", None, None).await;
    assert_eq!(status, 200);
    assert_eq!(parse_json(&body)["status"], "ok");

    let (status, _, body) = send(addr, "GET", "/version", None, None).await;
    assert_eq!(status, 200);
    assert_eq!(parse_json(&body)["name"], "praxis");

    // catalog routes require a bearer token and answer with the envelope
    let (status, head, body) = send(addr, "GET", "/pmbok-processes/", None, None).await;
    assert_eq!(status, 401);
    assert_eq!(parse_json(&body)["error"]["code"], "Unauthenticated");
    assert!(head.to_ascii_lowercase().contains("x-request-id"));

    let (status, _, _) = send(addr, "GET", "/pmbok-processes/", Some("not-a-jwt"), None).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn register_validations_and_conflicts() {
    let (addr, _tmp) = spawn_server().await;

    let (status, _, body) = send(
        addr,
        "POST",
        "/register/",
        None,
        Some(&json!({
            "email": "pm@example.com",
            "password": "correct-horse-battery",
            "password2": "different-password-9",
        })),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(parse_json(&body)["error"]["code"], "ValidationFailed");

    let (status, _, _) = send(
        addr,
        "POST",
        "/register/",
        None,
        Some(&json!({
            "email": "pm@example.com",
            "password": "correct-horse-battery",
            "password2": "correct-horse-battery",
        })),
    )
    .await;
    assert_eq!(status, 201);

    // duplicate email
    let (status, _, body) = send(
        addr,
        "POST",
        "/register/",
        None,
        Some(&json!({
            "email": "pm@example.com",
            "password": "correct-horse-battery",
            "password2": "correct-horse-battery",
        })),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(parse_json(&body)["error"]["code"], "Conflict");

    // bad credentials
    let (status, _, _) = send(
        addr,
        "POST",
        "/token/",
        None,
        Some(&json!({"email": "pm@example.com", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn refresh_flow_and_token_kind_separation() {
    let (addr, _tmp) = spawn_server().await;
    let (status, _, _) = send(
        addr,
        "POST",
        "/register/",
        None,
        Some(&json!({
            "email": "pm@example.com",
            "password": "correct-horse-battery",
            "password2": "correct-horse-battery",
        })),
    )
    .await;
    assert_eq!(status, 201);
    let (_, _, body) = send(
        addr,
        "POST",
        "/token/",
        None,
        Some(&json!({"email": "pm@example.com", "password": "correct-horse-battery"})),
    )
    .await;
    let tokens = parse_json(&body);
    let access = tokens["access"].as_str().expect("access");
    let refresh = tokens["refresh"].as_str().expect("refresh");

    // a refresh token does not authenticate requests
    let (status, _, _) = send(addr, "GET", "/tasks/", Some(refresh), None).await;
    assert_eq!(status, 401);

    // an access token is not accepted by the refresh endpoint
    let (status, _, _) = send(
        addr,
        "POST",
        "/token/refresh/",
        None,
        Some(&json!({"refresh": access})),
    )
    .await;
    assert_eq!(status, 401);

    // the refresh endpoint mints a usable access token
    let (status, _, body) = send(
        addr,
        "POST",
        "/token/refresh/",
        None,
        Some(&json!({"refresh": refresh})),
    )
    .await;
    assert_eq!(status, 200);
    let refreshed = parse_json(&body);
    let new_access = refreshed["access"].as_str().expect("new access");
    let (status, _, _) = send(addr, "GET", "/tasks/", Some(new_access), None).await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn scoped_resolution_shows_sparse_override() {
    let (addr, _tmp) = spawn_server().await;
    let token = register_and_login(addr, "pm@example.com").await;

    let (status, _, body) = send(
        addr,
        "POST",
        "/pmbok-processes/",
        Some(&token),
        Some(&json!({
            "number": 1,
            "name": "Develop Charter",
            "inputs": [{"name": "Business Case"}],
        })),
    )
    .await;
    assert_eq!(status, 201);
    let process_id = parse_json(&body)["id"].as_i64().expect("process id");

    let (status, _, _) = send(
        addr,
        "POST",
        "/customizations/",
        Some(&token),
        Some(&json!({
            "process_id": process_id,
            "process_type": "pmbok",
            "country_code": "CO",
            "inputs": [],
            "tools": [{"name": "Local Workshop"}],
        })),
    )
    .await;
    assert_eq!(status, 201);

    // unscoped: base lists plus the customization collection
    let (status, _, body) = send(
        addr,
        "GET",
        &format!("/pmbok-processes/{process_id}/"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, 200);
    let detail = parse_json(&body);
    assert_eq!(detail["inputs"][0]["name"], "Business Case");
    assert_eq!(detail["tools"], json!([]));
    assert_eq!(detail["customizations"][0]["country_code"], "CO");
    assert!(detail.get("active_customization").is_none());

    // scoped by country: tools overridden, empty inputs leave base visible
    let (status, _, body) = send(
        addr,
        "GET",
        &format!("/pmbok-processes/{process_id}/?country=CO"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, 200);
    let scoped = parse_json(&body);
    assert_eq!(scoped["inputs"][0]["name"], "Business Case");
    assert_eq!(scoped["tools"][0]["name"], "Local Workshop");
    assert_eq!(scoped["active_customization"]["country_code"], "CO");

    // a different country falls back to the base record
    let (status, _, body) = send(
        addr,
        "GET",
        &format!("/pmbok-processes/{process_id}/?country=us"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, 200);
    let other = parse_json(&body);
    assert_eq!(other["tools"], json!([]));
    assert!(other.get("active_customization").is_none());
}

#[tokio::test]
async fn customization_upsert_is_idempotent_over_http() {
    let (addr, _tmp) = spawn_server().await;
    let token = register_and_login(addr, "pm@example.com").await;

    let (_, _, body) = send(
        addr,
        "POST",
        "/pmbok-processes/",
        Some(&token),
        Some(&json!({"number": 1, "name": "Develop Charter"})),
    )
    .await;
    let process_id = parse_json(&body)["id"].as_i64().expect("process id");

    let payload = |tool: &str| {
        json!({
            "process_id": process_id,
            "process_type": "pmbok",
            "country_code": "CO",
            "tools": [{"name": tool}],
        })
    };
    let (status, _, body) = send(addr, "POST", "/customizations/", Some(&token), Some(&payload("First"))).await;
    assert_eq!(status, 201);
    let first_id = parse_json(&body)["id"].as_i64().expect("id");

    let (status, _, body) = send(addr, "POST", "/customizations/", Some(&token), Some(&payload("Second"))).await;
    assert_eq!(status, 201);
    let second = parse_json(&body);
    assert_eq!(second["id"].as_i64(), Some(first_id));
    assert_eq!(second["tools"][0]["name"], "Second");

    // unknown process is a 404, bad country a 400
    let (status, _, _) = send(
        addr,
        "POST",
        "/customizations/",
        Some(&token),
        Some(&json!({
            "process_id": 9999,
            "process_type": "pmbok",
            "country_code": "CO",
        })),
    )
    .await;
    assert_eq!(status, 404);

    let (status, _, body) = send(
        addr,
        "POST",
        "/customizations/",
        Some(&token),
        Some(&json!({
            "process_id": process_id,
            "process_type": "pmbok",
            "country_code": "COL",
        })),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(parse_json(&body)["error"]["code"], "ValidationFailed");
}

#[tokio::test]
async fn bulk_kanban_updates_processes_and_their_customizations() {
    let (addr, _tmp) = spawn_server().await;
    let token = register_and_login(addr, "pm@example.com").await;

    let mut ids = Vec::new();
    for (number, name) in [(1, "Develop Charter"), (2, "Identify Stakeholders")] {
        let (status, _, body) = send(
            addr,
            "POST",
            "/pmbok-processes/",
            Some(&token),
            Some(&json!({"number": number, "name": name})),
        )
        .await;
        assert_eq!(status, 201);
        ids.push(parse_json(&body)["id"].as_i64().expect("id"));
    }
    let (status, _, body) = send(
        addr,
        "POST",
        "/customizations/",
        Some(&token),
        Some(&json!({
            "process_id": ids[0],
            "process_type": "pmbok",
            "country_code": "CO",
            "tools": [{"name": "Local Workshop"}],
        })),
    )
    .await;
    assert_eq!(status, 201);
    let customization_id = parse_json(&body)["id"].as_i64().expect("id");

    // one unknown id rides along and is silently skipped
    let (status, _, body) = send(
        addr,
        "POST",
        "/pmbok-processes/bulk-update-kanban-status/",
        Some(&token),
        Some(&json!({"process_ids": [ids[0], ids[1], 9999], "kanban_status": "done"})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(parse_json(&body)["updated"], 2);

    let (_, _, body) = send(addr, "GET", "/pmbok-processes/", Some(&token), None).await;
    let listed = parse_json(&body);
    let listed = listed.as_array().expect("list");
    assert_eq!(listed.len(), 2);
    for process in listed {
        assert_eq!(process["kanban_status"], "done");
    }
    assert_eq!(listed[0]["customizations"][0]["kanban_status"], "done");

    // single customization-scoped mutation
    let (status, _, body) = send(
        addr,
        "PATCH",
        &format!("/customizations/{customization_id}/update-kanban-status/"),
        Some(&token),
        Some(&json!({"kanban_status": "in_review"})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(parse_json(&body)["kanban_status"], "in_review");

    // unknown state is rejected
    let (status, _, body) = send(
        addr,
        "PATCH",
        &format!("/customizations/{customization_id}/update-kanban-status/"),
        Some(&token),
        Some(&json!({"kanban_status": "archived"})),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(parse_json(&body)["error"]["code"], "ValidationFailed");

    // process-scoped single mutation
    let (status, _, body) = send(
        addr,
        "PATCH",
        &format!("/pmbok-processes/{}/update-kanban-status/", ids[1]),
        Some(&token),
        Some(&json!({"kanban_status": "todo"})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(parse_json(&body)["kanban_status"], "todo");
}

#[tokio::test]
async fn department_tree_delete_and_customization_fallback() {
    let (addr, _tmp) = spawn_server().await;
    let token = register_and_login(addr, "pm@example.com").await;

    let (status, _, body) = send(
        addr,
        "POST",
        "/departments/",
        Some(&token),
        Some(&json!({"name": "Technology", "color": "border-blue-500"})),
    )
    .await;
    assert_eq!(status, 201);
    let parent_id = parse_json(&body)["id"].as_i64().expect("parent id");

    let (status, _, body) = send(
        addr,
        "POST",
        "/departments/",
        Some(&token),
        Some(&json!({"name": "QA", "parent_id": parent_id})),
    )
    .await;
    assert_eq!(status, 201);
    let child_id = parse_json(&body)["id"].as_i64().expect("child id");

    let (_, _, body) = send(
        addr,
        "POST",
        "/pmbok-processes/",
        Some(&token),
        Some(&json!({"number": 1, "name": "Develop Charter"})),
    )
    .await;
    let process_id = parse_json(&body)["id"].as_i64().expect("process id");

    let (status, _, _) = send(
        addr,
        "POST",
        "/customizations/",
        Some(&token),
        Some(&json!({
            "process_id": process_id,
            "process_type": "pmbok",
            "country_code": "CO",
            "department_id": child_id,
            "tools": [{"name": "Local Workshop"}],
        })),
    )
    .await;
    assert_eq!(status, 201);

    // deleting the parent removes the whole subtree
    let (status, _, _) = send(
        addr,
        "DELETE",
        &format!("/departments/{parent_id}/"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, 204);
    let (status, _, _) = send(
        addr,
        "GET",
        &format!("/departments/{child_id}/"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, 404);

    // the customization survives with its department reference cleared
    let (_, _, body) = send(
        addr,
        "GET",
        &format!("/pmbok-processes/{process_id}/"),
        Some(&token),
        None,
    )
    .await;
    let detail = parse_json(&body);
    assert_eq!(detail["customizations"][0]["department_id"], Value::Null);
}

#[tokio::test]
async fn process_crud_conflicts_and_ordering() {
    let (addr, _tmp) = spawn_server().await;
    let token = register_and_login(addr, "pm@example.com").await;

    for number in [2, 1] {
        let (status, _, _) = send(
            addr,
            "POST",
            "/pmbok-processes/",
            Some(&token),
            Some(&json!({"number": number, "name": format!("Process {number}")})),
        )
        .await;
        assert_eq!(status, 201);
    }

    // duplicate number within the variant conflicts
    let (status, _, _) = send(
        addr,
        "POST",
        "/pmbok-processes/",
        Some(&token),
        Some(&json!({"number": 1, "name": "Duplicate"})),
    )
    .await;
    assert_eq!(status, 409);

    // but the same number under the other taxonomy is fine
    let (status, _, _) = send(
        addr,
        "POST",
        "/scrum-processes/",
        Some(&token),
        Some(&json!({"number": 1, "name": "Create Project Vision"})),
    )
    .await;
    assert_eq!(status, 201);

    let (_, _, body) = send(addr, "GET", "/pmbok-processes/", Some(&token), None).await;
    let listed = parse_json(&body);
    let numbers: Vec<i64> = listed
        .as_array()
        .expect("list")
        .iter()
        .map(|p| p["number"].as_i64().expect("number"))
        .collect();
    assert_eq!(numbers, vec![1, 2]);

    // patch keeps untouched fields, delete cascades
    let id = listed[0]["id"].as_i64().expect("id");
    let (status, _, body) = send(
        addr,
        "PATCH",
        &format!("/pmbok-processes/{id}/"),
        Some(&token),
        Some(&json!({"kanban_status": "backlog"})),
    )
    .await;
    assert_eq!(status, 200);
    let patched = parse_json(&body);
    assert_eq!(patched["kanban_status"], "backlog");
    assert_eq!(patched["name"], "Process 1");

    let (status, _, _) = send(
        addr,
        "DELETE",
        &format!("/pmbok-processes/{id}/"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, 204);
    let (status, _, _) = send(
        addr,
        "GET",
        &format!("/pmbok-processes/{id}/"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn two_fa_stub_flow() {
    let (addr, _tmp) = spawn_server().await;
    let token = register_and_login(addr, "pm@example.com").await;

    // wrong setup codes
    let (status, _, _) = send(
        addr,
        "POST",
        "/2fa/setup-verify/",
        None,
        Some(&json!({"email": "pm@example.com", "code1": "000000", "code2": "789012"})),
    )
    .await;
    assert_eq!(status, 400);

    // unknown account with the right codes
    let (status, _, _) = send(
        addr,
        "POST",
        "/2fa/setup-verify/",
        None,
        Some(&json!({"email": "ghost@example.com", "code1": "123456", "code2": "789012"})),
    )
    .await;
    assert_eq!(status, 404);

    let (status, _, body) = send(
        addr,
        "POST",
        "/2fa/setup-verify/",
        None,
        Some(&json!({"email": "pm@example.com", "code1": "123456", "code2": "789012"})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(parse_json(&body)["success"], true);

    // login verification requires a bearer token
    let (status, _, _) = send(
        addr,
        "POST",
        "/2fa/login-verify/",
        None,
        Some(&json!({"code": "112233"})),
    )
    .await;
    assert_eq!(status, 401);

    let (status, _, _) = send(
        addr,
        "POST",
        "/2fa/login-verify/",
        Some(&token),
        Some(&json!({"code": "999999"})),
    )
    .await;
    assert_eq!(status, 400);

    let (status, _, body) = send(
        addr,
        "POST",
        "/2fa/login-verify/",
        Some(&token),
        Some(&json!({"code": "112233"})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(parse_json(&body)["success"], true);
}

#[tokio::test]
async fn task_crud_round_trip() {
    let (addr, _tmp) = spawn_server().await;
    let token = register_and_login(addr, "pm@example.com").await;

    let (status, _, body) = send(
        addr,
        "POST",
        "/tasks/",
        Some(&token),
        Some(&json!({"title": "Prepare kickoff"})),
    )
    .await;
    assert_eq!(status, 201);
    let task = parse_json(&body);
    let id = task["id"].as_i64().expect("id");
    assert_eq!(task["completed"], false);

    let (status, _, body) = send(
        addr,
        "PUT",
        &format!("/tasks/{id}/"),
        Some(&token),
        Some(&json!({"completed": true})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(parse_json(&body)["completed"], true);

    let (status, _, body) = send(addr, "GET", "/tasks/", Some(&token), None).await;
    assert_eq!(status, 200);
    assert_eq!(parse_json(&body).as_array().expect("list").len(), 1);

    let (status, _, _) = send(addr, "DELETE", &format!("/tasks/{id}/"), Some(&token), None).await;
    assert_eq!(status, 204);
    let (status, _, _) = send(addr, "GET", &format!("/tasks/{id}/"), Some(&token), None).await;
    assert_eq!(status, 404);
}
