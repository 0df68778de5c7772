#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use pretty_assertions::assert_eq;

use talent_directory::upload::{validate_data_uri, MAX_IMAGE_BYTES};

use common::{register_talent, send, test_state};

const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

#[actix_rt::test]
async fn test_profile_image_is_stored_as_data_uri() {
    let state = test_state().await;
    let app = test_app!(state);
    let sam = register_talent(&app, "Sam", "sam@example.com", "production", "Sound Design", "Austin, TX").await;

    let req = test::TestRequest::post()
        .uri("/api/upload/profile-image")
        .insert_header(sam.bearer())
        .insert_header(("Content-Type", "image/png"))
        .set_payload(PNG_HEADER)
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["success"], true);
    let uri = body["profile_picture"].as_str().unwrap().to_string();
    assert!(uri.starts_with("data:image/png;base64,"));
    assert_eq!(validate_data_uri(&uri), Ok(PNG_HEADER.len()));

    let req = test::TestRequest::get()
        .uri(&format!("/api/talents/{}", sam.id))
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body["data"]["avatar"], uri);
}

#[actix_rt::test]
async fn test_upload_rejections() {
    let state = test_state().await;
    let app = test_app!(state);
    let sam = register_talent(&app, "Sam", "sam@example.com", "production", "Sound Design", "Austin, TX").await;

    let req = test::TestRequest::post()
        .uri("/api/upload/profile-image")
        .insert_header(("Content-Type", "image/png"))
        .set_payload(PNG_HEADER)
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/upload/profile-image")
        .insert_header(sam.bearer())
        .insert_header(("Content-Type", "application/pdf"))
        .set_payload("%PDF-1.7")
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let req = test::TestRequest::post()
        .uri("/api/upload/profile-image")
        .insert_header(sam.bearer())
        .insert_header(("Content-Type", "image/jpeg"))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No file uploaded");

    let req = test::TestRequest::post()
        .uri("/api/upload/profile-image")
        .insert_header(sam.bearer())
        .insert_header(("Content-Type", "image/gif"))
        .set_payload(vec![0u8; MAX_IMAGE_BYTES + 1])
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["success"], false);
}
