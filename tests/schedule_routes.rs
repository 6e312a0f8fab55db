mod common;

use axum::http::StatusCode;
use sea_orm::MockExecResult;
use serde_json::json;
use uuid::Uuid;

use common::{authed, authed_db, send};
use shiftbook::{
    db::entities::{project, schedule},
    test_helpers::fixtures,
};

#[tokio::test]
async fn create_returns_computed_hours() {
    let user_id = Uuid::new_v4();
    let stored = fixtures::schedule(user_id, "2026-03-10", "22:00", "02:30", None);
    let db = authed_db(user_id)
        .append_query_results([[stored]])
        .into_connection();

    let (status, _, body) = send(
        db,
        authed(
            "POST",
            "/schedule",
            Some(json!({
                "date": "2026-03-10",
                "startTime": "22:00",
                "endTime": "02:30"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["totalHours"], json!(4.5));
    assert_eq!(body["data"]["startTime"], json!("22:00"));
    assert_eq!(body["data"]["date"], json!("2026-03-10"));
}

#[tokio::test]
async fn create_without_end_time_is_rejected() {
    let user_id = Uuid::new_v4();
    let db = authed_db(user_id).into_connection();

    let (status, _, body) = send(
        db,
        authed(
            "POST",
            "/schedule",
            Some(json!({ "date": "2026-03-10", "startTime": "09:00" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("End time is required"));
}

#[tokio::test]
async fn create_with_foreign_project_is_not_found() {
    let user_id = Uuid::new_v4();
    let db = authed_db(user_id)
        .append_query_results([Vec::<project::Model>::new()])
        .into_connection();

    let (status, _, body) = send(
        db,
        authed(
            "POST",
            "/schedule",
            Some(json!({
                "date": "2026-03-10",
                "startTime": "09:00",
                "endTime": "17:00",
                "projectId": Uuid::new_v4()
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("Project not found"));
}

#[tokio::test]
async fn list_rejects_bad_dates() {
    let user_id = Uuid::new_v4();
    let db = authed_db(user_id).into_connection();

    let (status, _, _) = send(db, authed("GET", "/schedule?startDate=03/10/2026", None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_accepts_utc_instants_as_bounds() {
    let user_id = Uuid::new_v4();
    let db = authed_db(user_id)
        .append_query_results([Vec::<schedule::Model>::new()])
        .into_connection();

    let (status, _, body) = send(
        db,
        authed(
            "GET",
            "/schedule?startDate=2026-02-28T23:00:00Z&endDate=2026-03-31T21:59:59.999Z",
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn list_rejects_malformed_instants() {
    let user_id = Uuid::new_v4();
    let db = authed_db(user_id).into_connection();

    let (status, _, _) = send(
        db,
        authed("GET", "/schedule?startDate=2026-02-28T25:00:00Z", None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_returns_entries_in_camel_case() {
    let user_id = Uuid::new_v4();
    let db = authed_db(user_id)
        .append_query_results([[
            fixtures::schedule(user_id, "2026-03-11", "09:00", "17:00", None),
            fixtures::schedule(user_id, "2026-03-10", "08:30", "12:00", None),
        ]])
        .into_connection();

    let (status, _, body) = send(
        db,
        authed("GET", "/schedule?startDate=2026-03-01&endDate=2026-03-31", None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let entries = body["data"].as_array().expect("entries should be a list");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["endTime"], json!("17:00"));
    assert_eq!(entries[1]["totalHours"], json!(3.5));
}

#[tokio::test]
async fn update_of_foreign_entry_is_not_found() {
    let user_id = Uuid::new_v4();
    let db = authed_db(user_id)
        .append_query_results([Vec::<schedule::Model>::new()])
        .into_connection();

    let (status, _, body) = send(
        db,
        authed(
            "PUT",
            &format!("/schedule/{}", Uuid::new_v4()),
            Some(json!({ "notes": "late" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("Schedule not found"));
}

#[tokio::test]
async fn delete_removes_the_entry() {
    let user_id = Uuid::new_v4();
    let db = authed_db(user_id)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let (status, _, body) = send(
        db,
        authed("DELETE", &format!("/schedule/{}", Uuid::new_v4()), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("deleted"));
}

#[tokio::test]
async fn totals_sum_the_requested_period() {
    let user_id = Uuid::new_v4();
    let db = authed_db(user_id)
        .append_query_results([[
            fixtures::schedule(user_id, "2026-03-10", "09:00", "17:00", None),
            fixtures::schedule(user_id, "2026-03-12", "09:00", "11:30", None),
        ]])
        .into_connection();

    let (status, _, body) = send(
        db,
        authed("GET", "/schedule/stats/totals?period=week&today=2026-03-12", None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalHours"], json!(10.5));
    assert_eq!(body["data"]["entryCount"], json!(2));
    assert_eq!(body["data"]["period"], json!("week"));
}

#[tokio::test]
async fn month_totals_stop_at_today() {
    let user_id = Uuid::new_v4();
    let db = authed_db(user_id)
        .append_query_results([[
            fixtures::schedule(user_id, "2026-03-20", "09:00", "17:00", None),
            fixtures::schedule(user_id, "2026-03-10", "09:00", "11:00", None),
        ]])
        .into_connection();

    let (status, _, body) = send(
        db,
        authed("GET", "/schedule/stats/totals?period=month&today=2026-03-12", None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalHours"], json!(2.0));
    assert_eq!(body["data"]["entryCount"], json!(1));
}

#[tokio::test]
async fn unknown_period_is_rejected() {
    let user_id = Uuid::new_v4();
    let db = authed_db(user_id).into_connection();

    let (status, _, body) = send(
        db,
        authed("GET", "/schedule/stats/totals?period=decade", None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        json!("Unknown period 'decade', expected day, week, month or all")
    );
}

#[tokio::test]
async fn earnings_apply_project_rates_over_the_default() {
    let user_id = Uuid::new_v4();
    let acme = fixtures::project(user_id, "Acme", Some(200.0));
    let acme_id = acme.id;
    let db = authed_db(user_id)
        .append_query_results([[fixtures::settings(user_id)]])
        .append_query_results([[acme]])
        .append_query_results([[
            fixtures::schedule(user_id, "2026-03-10", "09:00", "17:00", Some(acme_id)),
            fixtures::schedule(user_id, "2026-03-11", "09:00", "11:00", None),
        ]])
        .into_connection();

    let (status, _, body) = send(
        db,
        authed("GET", "/schedule/stats/earnings?period=month&today=2026-03-15", None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["period"], json!("month"));
    assert_eq!(data["hours"], json!(10.0));
    assert_eq!(data["gross"], json!(1894.0));
    assert_eq!(data["taxes"], json!(568.2));
    assert_eq!(data["net"], json!(1325.8));
    assert_eq!(data["hourlyRate"], json!(147.0));
    assert_eq!(data["taxRate"], json!(0.3));
}

#[tokio::test]
async fn series_totals_cover_the_whole_window() {
    let user_id = Uuid::new_v4();
    let db = authed_db(user_id)
        .append_query_results([[fixtures::settings(user_id)]])
        .append_query_results([Vec::<project::Model>::new()])
        .append_query_results([[
            fixtures::schedule(user_id, "2026-03-09", "08:00", "16:00", None),
            fixtures::schedule(user_id, "2026-03-04", "09:00", "13:00", None),
        ]])
        .into_connection();

    let (status, _, body) = send(
        db,
        authed("GET", "/schedule/stats/series?view=daily&today=2026-03-10", None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    let points = data["points"].as_array().expect("points should be a list");
    assert_eq!(points.len(), 7);
    assert_eq!(points[6]["earnings"], json!(0.0));
    assert_eq!(data["total"], json!(1764.0));
    assert_eq!(data["hours"], json!(12.0));
    assert_eq!(data["gross"], json!(1764.0));
    assert_eq!(data["taxes"], json!(529.2));
    assert_eq!(data["net"], json!(1234.8));
}

#[tokio::test]
async fn monthly_reports_goal_progress() {
    let user_id = Uuid::new_v4();
    let db = authed_db(user_id)
        .append_query_results([[fixtures::settings(user_id)]])
        .append_query_results([[
            fixtures::schedule(user_id, "2026-02-02", "08:00", "16:00", None),
            fixtures::schedule(user_id, "2026-02-03", "08:00", "16:00", None),
        ]])
        .into_connection();

    let (status, _, body) = send(
        db,
        authed("GET", "/schedule/stats/monthly?month=2026-02", None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["month"], json!("2026-02"));
    assert_eq!(data["totalHours"], json!(16.0));
    assert_eq!(data["goalHours"], json!(160.0));
    assert_eq!(data["remainingHours"], json!(144.0));
    assert_eq!(data["progress"], json!(0.1));
}
