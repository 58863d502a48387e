//! 桌台平面图接口测试 - 区域/桌台/预订/并桌/可用性
//!
//! 使用临时工作目录 + 嵌入式数据库, 直接对 Router 发请求。

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tafel_server::{Config, ServerState, build_app};
use tempfile::TempDir;
use tower::ServiceExt;

/// 测试配置: 晚市 18:00-22:00, 30 分钟粒度, 2 小时时长, 周一休息
async fn test_app() -> (TempDir, Router) {
    let dir = TempDir::new().expect("tempdir");
    let mut config = Config::with_overrides(dir.path().to_string_lossy().to_string(), 0);
    config.opening_hours = "18:00-22:00".to_string();
    config.slot_minutes = 30;
    config.reservation_slots = 4;
    config.closed_weekday = "monday".to_string();
    config.hr_key = None;
    config.environment = "development".to_string();

    let state = ServerState::initialize(&config).await;
    let app = build_app().with_state(state);
    (dir, app)
}

async fn request(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    let request = match body {
        Some(value) => builder.body(Body::from(value.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

async fn create_area(app: &Router, name: &str) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/api/areas",
        Some(json!({"name": name, "capacity": 60})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_str().expect("area id").to_string()
}

async fn create_table(app: &Router, area: &str, number: &str, sub_area: &str, max: i64, combinable: bool) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/api/tables",
        Some(json!({
            "number": number,
            "area": area,
            "sub_area": sub_area,
            "min_seats": 1,
            "max_seats": max,
            "combinable": combinable,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create table failed: {body}");
    body["id"].as_str().expect("table id").to_string()
}

fn reservation_payload(date: &str, time: &str, party: i64, table: Option<&str>) -> Value {
    let mut payload = json!({
        "date": date,
        "time": time,
        "party_size": party,
        "guest": {"name": "Familie Weber", "phone": "+49 151 1234567"},
    });
    if let Some(t) = table {
        payload["table"] = json!(t);
    }
    payload
}

// 2025-03-14 Friday / 2025-03-17 Monday (Ruhetag)
const FRIDAY: &str = "2025-03-14";
const MONDAY: &str = "2025-03-17";

#[tokio::test]
async fn test_table_crud_and_duplicate_number() {
    let (_dir, app) = test_app().await;
    let area = create_area(&app, "Restaurant").await;

    let table = create_table(&app, &area, "12", "Saal", 4, true).await;

    // 同区域同桌号冲突
    let (status, _) = request(
        &app,
        "POST",
        "/api/tables",
        Some(json!({"number": "12", "area": area, "sub_area": "Saal"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // 更新座位范围
    let (status, body) = request(
        &app,
        "PUT",
        &format!("/api/tables/{table}"),
        Some(json!({"max_seats": 6})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["max_seats"], 6);

    // 区域下桌台列表
    let (status, body) = request(&app, "GET", &format!("/api/areas/{area}/tables"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_area_delete_blocked_by_tables() {
    let (_dir, app) = test_app().await;
    let area = create_area(&app, "Terrasse").await;
    create_table(&app, &area, "T1", "Terrasse", 4, true).await;

    let (status, _) = request(&app, "DELETE", &format!("/api/areas/{area}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reservation_lifecycle_and_conflict() {
    let (_dir, app) = test_app().await;
    let area = create_area(&app, "Restaurant").await;
    let table = create_table(&app, &area, "5", "Saal", 4, true).await;

    // 登记
    let (status, body) = request(
        &app,
        "POST",
        "/api/reservations",
        Some(reservation_payload(FRIDAY, "19:00", 2, Some(&table))),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create failed: {body}");
    assert_eq!(body["status"], "NEW");
    let id = body["id"].as_str().unwrap().to_string();

    // 同桌重叠时段冲突
    let (status, _) = request(
        &app,
        "POST",
        "/api/reservations",
        Some(reservation_payload(FRIDAY, "20:00", 2, Some(&table))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // 取消后时段释放
    let (status, body) = request(&app, "POST", &format!("/api/reservations/{id}/cancel"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "CANCELLED");

    let (status, _) = request(
        &app,
        "POST",
        "/api/reservations",
        Some(reservation_payload(FRIDAY, "20:00", 2, Some(&table))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_reservation_status_machine_via_api() {
    let (_dir, app) = test_app().await;
    let (status, body) = request(
        &app,
        "POST",
        "/api/reservations",
        Some(reservation_payload(FRIDAY, "18:30", 4, None)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_str().unwrap().to_string();

    // new → completed 非法 (必须先到店)
    let (status, _) = request(&app, "POST", &format!("/api/reservations/{id}/complete"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    for (action, expected) in [
        ("confirm", "CONFIRMED"),
        ("arrive", "ARRIVED"),
        ("complete", "COMPLETED"),
    ] {
        let (status, body) = request(
            &app,
            "POST",
            &format!("/api/reservations/{id}/{action}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK, "action {action}");
        assert_eq!(body["status"], expected);
    }

    // 终态不可再迁移
    let (status, _) = request(&app, "POST", &format!("/api/reservations/{id}/cancel"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_reservation_rejected_on_closed_day_and_off_grid() {
    let (_dir, app) = test_app().await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/reservations",
        Some(reservation_payload(MONDAY, "19:00", 2, None)),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = request(
        &app,
        "POST",
        "/api/reservations",
        Some(reservation_payload(FRIDAY, "19:15", 2, None)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_combination_rules_via_api() {
    let (_dir, app) = test_app().await;
    let area = create_area(&app, "Restaurant").await;
    let other_area = create_area(&app, "Terrasse").await;

    let saal_1 = create_table(&app, &area, "1", "Saal", 4, true).await;
    let saal_2 = create_table(&app, &area, "2", "Saal", 4, true).await;
    let winter = create_table(&app, &area, "3", "Wintergarten", 4, true).await;
    let fixed = create_table(&app, &area, "9", "Saal", 8, false).await;
    let terrace = create_table(&app, &other_area, "T1", "Terrasse", 4, true).await;

    let combo = |tables: Vec<&str>| {
        json!({"date": FRIDAY, "time": "19:00", "tables": tables})
    };

    // 子分区不一致
    let (status, _) = request(&app, "POST", "/api/combinations", Some(combo(vec![&saal_1, &winter]))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // 跨区域
    let (status, _) = request(&app, "POST", "/api/combinations", Some(combo(vec![&saal_1, &terrace]))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // 含不可并桌桌台
    let (status, _) = request(&app, "POST", "/api/combinations", Some(combo(vec![&saal_1, &fixed]))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // 少于两桌
    let (status, _) = request(&app, "POST", "/api/combinations", Some(combo(vec![&saal_1]))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // dry-run 校验接口
    let (status, body) = request(
        &app,
        "POST",
        "/api/combinations/validate",
        Some(combo(vec![&saal_1, &saal_2])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(body["total_capacity"], 8);

    // 合法并桌
    let (status, body) = request(&app, "POST", "/api/combinations", Some(combo(vec![&saal_1, &saal_2]))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_capacity"], 8);

    // 同时段重复并桌
    let (status, _) = request(&app, "POST", "/api/combinations", Some(combo(vec![&saal_2, &winter]))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_availability_closed_day_and_booked_out() {
    let (_dir, app) = test_app().await;
    let area = create_area(&app, "Restaurant").await;
    let table = create_table(&app, &area, "1", "Saal", 4, true).await;

    // 休息日: 零时段
    let (status, body) = request(
        &app,
        "GET",
        &format!("/api/availability?date={MONDAY}&party_size=2"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slots"].as_array().unwrap().len(), 0);

    // 营业日: 唯一的桌被订掉后重叠时段消失
    let (status, _) = request(
        &app,
        "POST",
        "/api/reservations",
        Some(reservation_payload(FRIDAY, "18:00", 2, Some(&table))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = request(
        &app,
        "GET",
        &format!("/api/availability?date={FRIDAY}&party_size=2&time=18:30"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["requested_open"], false);
    let open: Vec<&str> = body["slots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["time"].as_str().unwrap())
        .collect();
    // 18:00 占用至 20:00 → 只剩 20:00 之后的时段
    assert_eq!(open, vec!["20:00", "20:30", "21:00", "21:30"]);
}

#[tokio::test]
async fn test_occupancy_board_statuses() {
    let (_dir, app) = test_app().await;
    let area = create_area(&app, "Restaurant").await;
    let t1 = create_table(&app, &area, "1", "Saal", 4, true).await;
    let _t2 = create_table(&app, &area, "2", "Saal", 4, true).await;

    let (_, body) = request(
        &app,
        "POST",
        "/api/reservations",
        Some(reservation_payload(FRIDAY, "19:00", 2, Some(&t1))),
    )
    .await;
    let reservation = body["id"].as_str().unwrap().to_string();

    // reserved
    let (status, body) = request(
        &app,
        "GET",
        &format!("/api/table-plan?date={FRIDAY}&time=19:00"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let tables = body["tables"].as_array().unwrap();
    assert_eq!(tables.len(), 2);
    let by_number = |n: &str| {
        tables
            .iter()
            .find(|t| t["number"] == n)
            .cloned()
            .expect("table entry")
    };
    assert_eq!(by_number("1")["status"], "RESERVED");
    assert_eq!(by_number("2")["status"], "FREE");

    // arrived → occupied
    let (status, _) = request(
        &app,
        "POST",
        &format!("/api/reservations/{reservation}/arrive"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = request(
        &app,
        "GET",
        &format!("/api/table-plan?date={FRIDAY}&time=19:00"),
        None,
    )
    .await;
    let tables = body["tables"].as_array().unwrap();
    let t1_entry = tables.iter().find(|t| t["number"] == "1").unwrap();
    assert_eq!(t1_entry["status"], "OCCUPIED");

    // 封场压过预订
    let (status, _) = request(
        &app,
        "POST",
        "/api/event-blocks",
        Some(json!({
            "name": "Privatfeier",
            "date": FRIDAY,
            "start_time": "18:00",
            "end_time": "22:00",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = request(
        &app,
        "GET",
        &format!("/api/table-plan?date={FRIDAY}&time=19:00"),
        None,
    )
    .await;
    assert!(body["tables"]
        .as_array()
        .unwrap()
        .iter()
        .all(|t| t["status"] == "BLOCKED"));
}
