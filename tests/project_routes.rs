mod common;

use axum::http::StatusCode;
use sea_orm::MockExecResult;
use serde_json::json;
use uuid::Uuid;

use common::{authed, authed_db, send};
use shiftbook::{db::entities::project, test_helpers::fixtures};

#[tokio::test]
async fn create_accepts_rate_as_string() {
    let user_id = Uuid::new_v4();
    let mut stored = fixtures::project(user_id, "Acme", Some(95.5));
    stored.company_name = Some("Acme AB".to_string());
    let db = authed_db(user_id)
        .append_query_results([[stored]])
        .into_connection();

    let (status, _, body) = send(
        db,
        authed(
            "POST",
            "/project",
            Some(json!({ "name": "Acme", "companyName": "Acme AB", "hourlyRate": "95.5" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], json!("Acme"));
    assert_eq!(body["data"]["companyName"], json!("Acme AB"));
    assert_eq!(body["data"]["hourlyRate"], json!(95.5));
}

#[tokio::test]
async fn create_requires_a_name() {
    let user_id = Uuid::new_v4();
    let db = authed_db(user_id).into_connection();

    let (status, _, body) = send(
        db,
        authed("POST", "/project", Some(json!({ "hourlyRate": 100 }))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Project name is required"));
}

#[tokio::test]
async fn negative_rate_is_rejected() {
    let user_id = Uuid::new_v4();
    let db = authed_db(user_id).into_connection();

    let (status, _, body) = send(
        db,
        authed(
            "POST",
            "/project",
            Some(json!({ "name": "Acme", "hourlyRate": -5 })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Hourly rate must be zero or more"));
}

#[tokio::test]
async fn detail_includes_totals_and_entries() {
    let user_id = Uuid::new_v4();
    let acme = fixtures::project(user_id, "Acme", None);
    let acme_id = acme.id;
    let db = authed_db(user_id)
        .append_query_results([[acme]])
        .append_query_results([[
            fixtures::schedule(user_id, "2026-03-10", "09:00", "17:00", Some(acme_id)),
            fixtures::schedule(user_id, "2026-03-09", "13:00", "14:15", Some(acme_id)),
        ]])
        .into_connection();

    let (status, _, body) = send(db, authed("GET", &format!("/project/{acme_id}"), None)).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["id"], json!(acme_id.to_string()));
    assert_eq!(data["totalHours"], json!(9.25));
    assert_eq!(data["entryCount"], json!(2));
    assert_eq!(data["schedules"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn foreign_project_is_not_found() {
    let user_id = Uuid::new_v4();
    let db = authed_db(user_id)
        .append_query_results([Vec::<project::Model>::new()])
        .into_connection();

    let (status, _, body) = send(
        db,
        authed("GET", &format!("/project/{}", Uuid::new_v4()), None),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("Project not found"));
}

#[tokio::test]
async fn update_can_clear_the_rate() {
    let user_id = Uuid::new_v4();
    let current = fixtures::project(user_id, "Acme", Some(200.0));
    let id = current.id;
    let mut cleared = current.clone();
    cleared.hourly_rate = None;
    let db = authed_db(user_id)
        .append_query_results([[current]])
        .append_query_results([[cleared]])
        .into_connection();

    let (status, _, body) = send(
        db,
        authed("PUT", &format!("/project/{id}"), Some(json!({ "hourlyRate": null }))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["hourlyRate"], json!(null));
}

#[tokio::test]
async fn delete_of_missing_project_is_not_found() {
    let user_id = Uuid::new_v4();
    let db = authed_db(user_id)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let (status, _, _) = send(
        db,
        authed("DELETE", &format!("/project/{}", Uuid::new_v4()), None),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn hours_by_project_lists_every_project() {
    let user_id = Uuid::new_v4();
    let alpha = fixtures::project(user_id, "Alpha", None);
    let beta = fixtures::project(user_id, "Beta", Some(120.0));
    let alpha_id = alpha.id;
    let db = authed_db(user_id)
        .append_query_results([[alpha, beta]])
        .append_query_results([[
            fixtures::schedule(user_id, "2026-03-10", "09:00", "12:00", Some(alpha_id)),
            fixtures::schedule(user_id, "2026-03-11", "09:00", "10:00", None),
        ]])
        .into_connection();

    let (status, _, body) = send(db, authed("GET", "/project/stats/hours", None)).await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().expect("rows should be a list");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], json!("Alpha"));
    assert_eq!(rows[0]["totalHours"], json!(3.0));
    assert_eq!(rows[1]["entryCount"], json!(0));
}

#[tokio::test]
async fn project_hours_respect_the_period() {
    let user_id = Uuid::new_v4();
    let acme = fixtures::project(user_id, "Acme", None);
    let acme_id = acme.id;
    let db = authed_db(user_id)
        .append_query_results([[acme]])
        .append_query_results([[fixtures::schedule(
            user_id,
            "2026-03-10",
            "09:00",
            "17:00",
            Some(acme_id),
        )]])
        .into_connection();

    let (status, _, body) = send(
        db,
        authed(
            "GET",
            &format!("/project/{acme_id}/hours?period=month&today=2026-03-20"),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalHours"], json!(8.0));
    assert_eq!(body["data"]["period"], json!("month"));
}
