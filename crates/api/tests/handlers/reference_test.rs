use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use timetable_core::models::{
    class::{ClassWithSections, Section},
    staff::{Subject, Teacher},
    time_slot::TimeSlot,
};
use uuid::Uuid;

use crate::test_utils::TestApp;

#[tokio::test]
async fn test_classes_and_sections_crud() {
    let app = TestApp::new().await;
    let (class_id, section_id) = app.add_class("Class 7", "A").await;

    let created = app
        .post(&format!("/api/classes/{}/sections", class_id))
        .json(&json!({ "name": "B" }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);

    let renamed = app
        .put(&format!("/api/classes/{}/sections/{}", class_id, section_id))
        .json(&json!({ "name": "Alpha" }))
        .await;
    assert_eq!(renamed.json::<Section>().name, "Alpha");

    let classes = app.get("/api/classes").await.json::<Vec<ClassWithSections>>();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].class.name, "Class 7");
    let mut names: Vec<_> = classes[0].sections.iter().map(|s| s.name.clone()).collect();
    names.sort();
    assert_eq!(names, vec!["Alpha", "B"]);

    let deleted = app.delete(&format!("/api/classes/{}", class_id)).await;
    assert_eq!(deleted.status_code(), StatusCode::NO_CONTENT);
    assert!(app.classes().await.is_empty());
}

#[tokio::test]
async fn test_blank_class_name_is_rejected() {
    let app = TestApp::new().await;
    let response = app.post("/api/classes").json(&json!({ "name": "  " })).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_section_of_unknown_class_is_not_found() {
    let app = TestApp::new().await;
    let response = app
        .post(&format!("/api/classes/{}/sections", Uuid::new_v4()))
        .json(&json!({ "name": "A" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_subject_in_use_cannot_be_deleted() {
    let app = TestApp::new().await;
    let subject = app
        .post("/api/subjects")
        .json(&json!({ "name": "History" }))
        .await
        .json::<Subject>();
    let teacher = app
        .post("/api/teachers")
        .json(&json!({ "name": "Ms. Rivera", "subject_id": subject.id }))
        .await
        .json::<Teacher>();

    let path = format!("/api/subjects/{}", subject.id);
    assert_eq!(app.delete(&path).await.status_code(), StatusCode::BAD_REQUEST);

    let removed = app.delete(&format!("/api/teachers/{}", teacher.id)).await;
    assert_eq!(removed.status_code(), StatusCode::NO_CONTENT);
    assert_eq!(app.delete(&path).await.status_code(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_subject_still_in_the_grid_cannot_be_deleted() {
    let app = TestApp::new().await;
    let timetable = app.create_timetable("Term 1").await;
    let (class_id, section_id) = app.first_section().await;
    let teachers = app.teachers().await;
    let monday_first = app.time_slots().await[0].id;
    let history = app
        .post("/api/subjects")
        .json(&json!({ "name": "History" }))
        .await
        .json::<Subject>();

    let moved = app
        .put(&format!("/api/teachers/{}", teachers[0].id))
        .json(&json!({ "name": "Teacher 1", "subject_id": history.id }))
        .await;
    assert_eq!(moved.status_code(), StatusCode::OK);

    let path = format!("/api/subjects/{}", teachers[0].subject_id);
    let refused = app.delete(&path).await;
    assert_eq!(refused.status_code(), StatusCode::BAD_REQUEST);
    let body = refused.json::<serde_json::Value>();
    assert!(body["error"].as_str().unwrap().contains("timetable cell"));

    // Handing the cell to someone else frees the subject.
    let reassigned = app
        .put(&format!("/api/timetables/{}/entries", timetable.id))
        .json(&json!({
            "teacher_id": teachers[1].id,
            "class_id": class_id,
            "section_id": section_id,
            "time_slot_id": monday_first,
            "day_id": 1,
        }))
        .await;
    assert_eq!(reassigned.status_code(), StatusCode::OK);
    assert_eq!(app.delete(&path).await.status_code(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_teacher_needs_an_existing_subject() {
    let app = TestApp::new().await;
    let response = app
        .post("/api/teachers")
        .json(&json!({ "name": "Mr. Okafor", "subject_id": Uuid::new_v4() }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_teacher_changes_subject() {
    let app = TestApp::new().await;
    app.create_timetable("Term 1").await;
    let subjects = app.get("/api/subjects").await.json::<Vec<Subject>>();
    let teacher = app.teachers().await[0].clone();

    let response = app
        .put(&format!("/api/teachers/{}", teacher.id))
        .json(&json!({ "name": "Teacher One", "subject_id": subjects[2].id }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let updated = response.json::<Teacher>();
    assert_eq!(updated.name, "Teacher One");
    assert_eq!(updated.subject_id, subjects[2].id);
}

#[tokio::test]
async fn test_time_slots_are_normalized_and_sorted() {
    let app = TestApp::new().await;
    for (start, end) in [("14:00", "15:00"), ("08:30 am", "9:30 am")] {
        let response = app
            .post("/api/time-slots")
            .json(&json!({ "start_time": start, "end_time": end }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
    }

    let slots = app.time_slots().await;
    let times: Vec<_> = slots
        .iter()
        .map(|s| (s.start_time.as_str(), s.end_time.as_str()))
        .collect();
    assert_eq!(times, vec![("8:30 AM", "9:30 AM"), ("2:00 PM", "3:00 PM")]);
}

#[tokio::test]
async fn test_invalid_time_slot_is_rejected() {
    let app = TestApp::new().await;
    let response = app
        .post("/api/time-slots")
        .json(&json!({ "start_time": "25:00", "end_time": "26:00" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deleting_a_time_slot_removes_its_cells() {
    let app = TestApp::new().await;
    let timetable = app.create_timetable("Term 1").await;
    let (class_id, section_id) = app.first_section().await;
    let last = app.time_slots().await[6].clone();

    let response = app.delete(&format!("/api/time-slots/{}", last.id)).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let grid = app.grid(timetable.id, class_id, section_id).await;
    assert_eq!(grid.time_slots.len(), 6);
    assert_eq!(grid.entries.len(), 30);
    assert!(grid.entries.iter().all(|e| e.time_slot_id != last.id));
}

#[tokio::test]
async fn test_update_time_slot() {
    let app = TestApp::new().await;
    let slot = app
        .post("/api/time-slots")
        .json(&json!({ "start_time": "9:00 AM", "end_time": "10:00 AM" }))
        .await
        .json::<TimeSlot>();

    let response = app
        .put(&format!("/api/time-slots/{}", slot.id))
        .json(&json!({ "start_time": "09:15", "end_time": "10:15", "is_lunch": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let updated = response.json::<TimeSlot>();
    assert_eq!(updated.start_time, "9:15 AM");
    assert_eq!(updated.end_time, "10:15 AM");
    assert!(updated.is_lunch);
}
