#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use talent_directory::models::{Notification, NotificationType};

use common::{register_talent, send, test_state};

#[actix_rt::test]
async fn test_read_state_endpoints() {
    let state = test_state().await;
    let app = test_app!(state);
    let sam = register_talent(&app, "Sam", "sam@example.com", "production", "Sound Design", "Austin, TX").await;
    let lee = register_talent(&app, "Lee", "lee@example.com", "production", "Sound Design", "Austin, TX").await;

    let mut ids = Vec::new();
    for (kind, title) in [
        (NotificationType::System, "Welcome"),
        (NotificationType::Featured, "You are featured"),
        (NotificationType::Reminder, "Complete your profile"),
    ] {
        let stored = state
            .store
            .insert_notification(Notification::new(sam.id, kind, title, "Details"))
            .await
            .unwrap();
        ids.push(stored.id);
    }
    let foreign = state
        .store
        .insert_notification(Notification::new(lee.id, NotificationType::System, "Hi Lee", "Details"))
        .await
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/notifications")
        .insert_header(sam.bearer())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["totalItems"], 3);
    assert_eq!(body["data"][0]["title"], "Complete your profile");

    let req = test::TestRequest::put()
        .uri(&format!("/api/notifications/{}/read", ids[0]))
        .insert_header(sam.bearer())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["read"], true);

    // Someone else's notification looks missing
    let req = test::TestRequest::put()
        .uri(&format!("/api/notifications/{}/read", foreign.id))
        .insert_header(sam.bearer())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Notification not found");

    let req = test::TestRequest::put()
        .uri(&format!("/api/notifications/{}/read", Uuid::new_v4()))
        .insert_header(sam.bearer())
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/notifications?read=false&type=featured")
        .insert_header(sam.bearer())
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body["pagination"]["totalItems"], 1);
    assert_eq!(body["data"][0]["type"], "featured");

    let req = test::TestRequest::get()
        .uri("/api/notifications/unread-count")
        .insert_header(sam.bearer())
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body["data"], json!({ "count": 2 }));

    let req = test::TestRequest::put()
        .uri("/api/notifications/read-all")
        .insert_header(sam.bearer())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "data": { "markedRead": 2 } }));

    let req = test::TestRequest::get()
        .uri("/api/notifications/unread-count")
        .insert_header(sam.bearer())
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body["data"]["count"], 0);

    // Lee's notification is untouched
    let req = test::TestRequest::get()
        .uri("/api/notifications/unread-count")
        .insert_header(lee.bearer())
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body["data"]["count"], 1);
}

#[actix_rt::test]
async fn test_notifications_require_session_and_valid_filters() {
    let state = test_state().await;
    let app = test_app!(state);
    let sam = register_talent(&app, "Sam", "sam@example.com", "production", "Sound Design", "Austin, TX").await;

    let req = test::TestRequest::get().uri("/api/notifications").to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/notifications?read=sometimes")
        .insert_header(sam.bearer())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["read"].is_string());
}
