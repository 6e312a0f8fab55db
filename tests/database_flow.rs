mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use uuid::Uuid;

use common::{api_path, send};
use shiftbook::{config::AppConfig, db::connection};

async fn database() -> DatabaseConnection {
    let cfg = AppConfig::from_env().expect("load app config");
    let db_cfg = cfg
        .database
        .as_ref()
        .expect("database config should be present in integration tests");
    connection::connect(db_cfg)
        .await
        .expect("connect to database")
}

fn request(method: &str, path: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(api_path(path))
        .header(header::AUTHORIZATION, format!("Bearer {token}"));
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build")
}

async fn sign_up(db: &DatabaseConnection) -> String {
    let email = format!("shift-{}@example.com", Uuid::new_v4());
    let (status, _, body) = send(
        db.clone(),
        request(
            "POST",
            "/auth/sign-up/email",
            "",
            Some(json!({ "name": "Tester", "email": email, "password": "correct-horse" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["token"]
        .as_str()
        .expect("sign-up should return a token")
        .to_string()
}

#[tokio::test]
#[ignore = "requires Postgres database"]
async fn shifts_roll_up_into_project_stats() {
    let db = database().await;
    let token = sign_up(&db).await;

    let (status, project) = {
        let (status, _, body) = send(
            db.clone(),
            request(
                "POST",
                "/project",
                &token,
                Some(json!({ "name": "Acme", "hourlyRate": "200" })),
            ),
        )
        .await;
        (status, body)
    };
    assert_eq!(status, StatusCode::CREATED);
    let project_id = project["data"]["id"]
        .as_str()
        .expect("project id")
        .to_string();

    for (date, start, end) in [
        ("2026-03-10", "09:00", "17:00"),
        ("2026-03-11", "22:00", "02:30"),
    ] {
        let (status, _, _) = send(
            db.clone(),
            request(
                "POST",
                "/schedule",
                &token,
                Some(json!({
                    "date": date,
                    "startTime": start,
                    "endTime": end,
                    "projectId": project_id
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _, detail) = send(
        db.clone(),
        request("GET", &format!("/project/{project_id}"), &token, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["data"]["totalHours"], json!(12.5));
    assert_eq!(detail["data"]["entryCount"], json!(2));

    let (status, _, earnings) = send(
        db.clone(),
        request(
            "GET",
            "/schedule/stats/earnings?period=month&today=2026-03-15",
            &token,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(earnings["data"]["gross"], json!(2500.0));
}

#[tokio::test]
#[ignore = "requires Postgres database"]
async fn deleting_a_project_keeps_its_shifts() {
    let db = database().await;
    let token = sign_up(&db).await;

    let (_, _, project) = send(
        db.clone(),
        request("POST", "/project", &token, Some(json!({ "name": "Short lived" }))),
    )
    .await;
    let project_id = project["data"]["id"]
        .as_str()
        .expect("project id")
        .to_string();

    let (_, _, entry) = send(
        db.clone(),
        request(
            "POST",
            "/schedule",
            &token,
            Some(json!({
                "date": "2026-03-10",
                "startTime": "09:00",
                "endTime": "12:00",
                "projectId": project_id
            })),
        ),
    )
    .await;
    let entry_id = entry["data"]["id"].as_str().expect("entry id").to_string();

    let (status, _, _) = send(
        db.clone(),
        request("DELETE", &format!("/project/{project_id}"), &token, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, entry) = send(
        db.clone(),
        request("GET", &format!("/schedule/{entry_id}"), &token, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["data"]["projectId"], json!(null));
}

#[tokio::test]
#[ignore = "requires Postgres database"]
async fn deleting_the_account_signs_out() {
    let db = database().await;
    let token = sign_up(&db).await;

    let (status, _, _) = send(db.clone(), request("DELETE", "/user", &token, None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = send(db.clone(), request("GET", "/user", &token, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
