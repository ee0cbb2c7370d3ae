use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use timetable_core::models::settings::{DEFAULT_MAX_LUNCH_SLOTS, TimetableSettings};
use uuid::Uuid;

use crate::test_utils::TestApp;

async fn app_with_timetable() -> (TestApp, Uuid) {
    let app = TestApp::new().await;
    let timetable = app.create_timetable("Term 1").await;
    (app, timetable.id)
}

#[tokio::test]
async fn test_new_timetable_has_default_settings() {
    let (app, id) = app_with_timetable().await;
    let response = app.get(&format!("/api/timetables/{}/settings", id)).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let settings = response.json::<TimetableSettings>();
    assert_eq!(settings.enabled_days, vec![1, 2, 3, 4, 5]);
    assert_eq!(settings.max_lunch_slots, DEFAULT_MAX_LUNCH_SLOTS);
    assert!(settings.lunch_slot_ids.is_empty());
}

#[tokio::test]
async fn test_enabled_days_change_the_grid() {
    let (app, id) = app_with_timetable().await;
    let (class_id, section_id) = app.first_section().await;

    let response = app
        .put(&format!("/api/timetables/{}/settings/days", id))
        .json(&json!({ "enabled_days": [6, 1, 3, 1] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<TimetableSettings>().enabled_days, vec![1, 3, 6]);

    let grid = app.grid(id, class_id, section_id).await;
    assert_eq!(grid.days.iter().map(|d| d.id()).collect::<Vec<_>>(), vec![1, 3, 6]);
    // Saturday cells are added next to the existing weekday ones.
    assert_eq!(grid.entries.iter().filter(|e| e.day_id == 6).count(), 7);
}

#[rstest]
#[case(json!([]))]
#[case(json!([0]))]
#[case(json!([1, 7]))]
#[tokio::test]
async fn test_invalid_enabled_days_are_rejected(#[case] days: serde_json::Value) {
    let (app, id) = app_with_timetable().await;
    let response = app
        .put(&format!("/api/timetables/{}/settings/days", id))
        .json(&json!({ "enabled_days": days }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_max_lunch_slots_limits_toggling() {
    let (app, id) = app_with_timetable().await;
    let slots = app.time_slots().await;
    let toggle = |slot: Uuid| format!("/api/timetables/{}/settings/lunch-slots/{}", id, slot);

    let first = app.post(&toggle(slots[3].id)).json(&json!({ "is_lunch": true })).await;
    assert_eq!(first.status_code(), StatusCode::OK);

    let second = app.post(&toggle(slots[4].id)).json(&json!({ "is_lunch": true })).await;
    assert_eq!(second.status_code(), StatusCode::BAD_REQUEST);

    let raised = app
        .put(&format!("/api/timetables/{}/settings/max-lunch", id))
        .json(&json!({ "max_lunch_slots": 2 }))
        .await;
    assert_eq!(raised.json::<TimetableSettings>().max_lunch_slots, 2);

    let second = app.post(&toggle(slots[4].id)).json(&json!({ "is_lunch": true })).await;
    assert_eq!(second.status_code(), StatusCode::OK);
    assert_eq!(
        second.json::<TimetableSettings>().lunch_slot_ids,
        vec![slots[3].id, slots[4].id]
    );

    let cleared = app.post(&toggle(slots[3].id)).json(&json!({ "is_lunch": false })).await;
    assert_eq!(cleared.json::<TimetableSettings>().lunch_slot_ids, vec![slots[4].id]);
}

#[tokio::test]
async fn test_max_lunch_slots_below_marked_count_is_rejected() {
    let (app, id) = app_with_timetable().await;
    let slots = app.time_slots().await;
    let max_path = format!("/api/timetables/{}/settings/max-lunch", id);

    app.put(&max_path).json(&json!({ "max_lunch_slots": 2 })).await;
    let marked = app
        .put(&format!("/api/timetables/{}/settings/lunch-slots", id))
        .json(&json!({ "lunch_slot_ids": [slots[3].id, slots[4].id] }))
        .await;
    assert_eq!(marked.status_code(), StatusCode::OK);

    let lowered = app.put(&max_path).json(&json!({ "max_lunch_slots": 0 })).await;
    assert_eq!(lowered.status_code(), StatusCode::BAD_REQUEST);

    let settings = app
        .get(&format!("/api/timetables/{}/settings", id))
        .await
        .json::<TimetableSettings>();
    assert_eq!(settings.max_lunch_slots, 2);
    assert_eq!(settings.lunch_slot_ids.len(), 2);
}

#[tokio::test]
async fn test_negative_max_lunch_slots_is_rejected() {
    let (app, id) = app_with_timetable().await;
    let response = app
        .put(&format!("/api/timetables/{}/settings/max-lunch", id))
        .json(&json!({ "max_lunch_slots": -1 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_replacing_lunch_slots() {
    let (app, id) = app_with_timetable().await;
    let slots = app.time_slots().await;
    let path = format!("/api/timetables/{}/settings/lunch-slots", id);

    let ok = app
        .put(&path)
        .json(&json!({ "lunch_slot_ids": [slots[4].id, slots[4].id] }))
        .await;
    assert_eq!(ok.status_code(), StatusCode::OK);
    assert_eq!(ok.json::<TimetableSettings>().lunch_slot_ids, vec![slots[4].id]);

    let too_many = app
        .put(&path)
        .json(&json!({ "lunch_slot_ids": [slots[3].id, slots[4].id] }))
        .await;
    assert_eq!(too_many.status_code(), StatusCode::BAD_REQUEST);

    let unknown = app
        .put(&path)
        .json(&json!({ "lunch_slot_ids": [Uuid::new_v4()] }))
        .await;
    assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_settings_of_unknown_timetable_are_not_found() {
    let app = TestApp::new().await;
    let response = app
        .get(&format!("/api/timetables/{}/settings", Uuid::new_v4()))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
