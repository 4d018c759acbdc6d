//! Integration tests for the registration API.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use registration_server::{
    api::{create_router, AppState},
    export::{XLSX_CONTENT_TYPE, SIGNATURE_COLUMN},
    store::RegistrationStore,
};
use secrecy::Secret;
use serde_json::{json, Value};
use signature_pad::{PadInput, Point, SignaturePad, SurfaceSize};
use std::io::{Cursor, Read};
use tower::ServiceExt;
use zip::ZipArchive;

const PIN: &str = "4321";

/// Create a test app backed by memory-only storage.
fn create_test_app() -> (Router, RegistrationStore) {
    let store = RegistrationStore::memory();
    let state = AppState::new(store.clone(), Secret::new(PIN.to_string()));
    (create_router(state), store)
}

fn admin_auth() -> String {
    format!("Basic {}", STANDARD.encode(format!("admin:{}", PIN)))
}

fn register_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn admin_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, admin_auth())
        .body(Body::empty())
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn list(app: &Router) -> Vec<Value> {
    let response = app
        .clone()
        .oneshot(admin_request("GET", "/api/registrations"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    json.as_array().unwrap().clone()
}

fn workbook_entry(bytes: &[u8], name: &str) -> Option<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut entry = archive.by_name(name).ok()?;
    let mut data = Vec::new();
    entry.read_to_end(&mut data).unwrap();
    Some(data)
}

fn workbook_text(bytes: &[u8], name: &str) -> String {
    String::from_utf8(workbook_entry(bytes, name).unwrap()).unwrap()
}

fn drawn_signature() -> String {
    let mut pad = SignaturePad::builder()
        .surface(SurfaceSize::new(300.0, 150.0, 1.0))
        .build()
        .unwrap();
    pad.handle(PadInput::Begin(Point::new(20.0, 100.0)));
    pad.handle(PadInput::Move(Point::new(150.0, 40.0)));
    pad.handle(PadInput::Move(Point::new(280.0, 110.0)));
    pad.handle(PadInput::End);
    pad.accept().unwrap().to_data_url()
}

#[tokio::test]
async fn test_ping() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/api/ping").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["ok"], true);
    assert!(json["ts"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_register_without_signature() {
    let (app, store) = create_test_app();
    assert!(list(&app).await.is_empty());

    let response = app
        .clone()
        .oneshot(register_request(
            json!({ "name": "Jane Doe", "grade": "5", "signature": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["success"], true);

    let records = list(&app).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["name"], "Jane Doe");
    assert_eq!(records[0]["grade"], "5");
    assert_eq!(records[0]["signature"], "");
    assert!(!records[0]["entryTime"].as_str().unwrap().is_empty());
    assert!(store.is_dirty());
}

#[tokio::test]
async fn test_register_keeps_client_fields() {
    let (app, _) = create_test_app();
    let submission = json!({
        "name": "Juan Dela Cruz",
        "grade": "6",
        "section": "Rizal",
        "lrn": "123456789012",
        "emergency": "Maria Dela Cruz",
        "address": "12 Mabini St.",
        "contact": "09171234567",
        "birthdate": "2014-05-01",
        "condition": "None",
        "signature": "",
        "imageCode": "A-12",
        "entryTime": "10/16/2026, 8:15:00 AM"
    });

    let response = app
        .clone()
        .oneshot(register_request(submission.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let records = list(&app).await;
    assert_eq!(records, vec![submission]);
}

#[tokio::test]
async fn test_raw_signature_normalized_to_png() {
    let (app, _) = create_test_app();

    for name in ["first", "second"] {
        let response = app
            .clone()
            .oneshot(register_request(
                json!({ "name": name, "signature": "iVBORw0KGgoAAAANSUhEUg==" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let records = list(&app).await;
    assert_eq!(records.len(), 2);
    for record in &records {
        let signature = record["signature"].as_str().unwrap();
        assert!(signature.starts_with("data:image/png"));
        assert_eq!(signature, "data:image/png;base64,iVBORw0KGgoAAAANSUhEUg==");
    }
}

#[tokio::test]
async fn test_jpeg_label_relabeled() {
    let (app, _) = create_test_app();

    app.clone()
        .oneshot(register_request(
            json!({ "name": "x", "signature": "data:image/jpeg;base64,/9j/4AAQ" }),
        ))
        .await
        .unwrap();

    let records = list(&app).await;
    assert_eq!(records[0]["signature"], "data:image/png;base64,/9j/4AAQ");
}

#[tokio::test]
async fn test_non_image_signature_rejected() {
    let (app, store) = create_test_app();

    let response = app
        .oneshot(register_request(
            json!({ "name": "x", "signature": "data:text/plain;base64,aGVsbG8=" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let (app, store) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"name\": "))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn test_admin_endpoints_require_credentials() {
    let (app, _) = create_test_app();

    for (method, uri) in [
        ("GET", "/api/registrations"),
        ("DELETE", "/api/registrations"),
        ("GET", "/api/export"),
    ] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            r#"Basic realm="Admin""#
        );

        let wrong = format!("Basic {}", STANDARD.encode("admin:0000"));
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header(header::AUTHORIZATION, wrong)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
    }
}

#[tokio::test]
async fn test_clear_registrations() {
    let (app, _) = create_test_app();

    for name in ["a", "b", "c"] {
        app.clone()
            .oneshot(register_request(json!({ "name": name })))
            .await
            .unwrap();
    }
    assert_eq!(list(&app).await.len(), 3);

    let response = app
        .clone()
        .oneshot(admin_request("DELETE", "/api/registrations"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn test_export_empty_store() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(admin_request("GET", "/api/export"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        XLSX_CONTENT_TYPE
    );
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=registrations.xlsx"
    );
    let bytes = body_bytes(response).await;
    assert_eq!(&bytes[..2], b"PK");

    let sheet = workbook_text(&bytes, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains(r#"<row r="1""#));
    assert!(!sheet.contains(r#"<row r="2""#));
    assert!(workbook_entry(&bytes, "xl/drawings/drawing1.xml").is_none());
}

#[tokio::test]
async fn test_export_with_drawn_signatures() {
    let (app, store) = create_test_app();
    let signature = drawn_signature();

    for (name, signature) in [("signed", signature.as_str()), ("unsigned", "")] {
        let response = app
            .clone()
            .oneshot(register_request(json!({ "name": name, "signature": signature })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let records = store.list().await;
    let plan = registration_server::export::ExportPlan::from_records(&records);
    assert_eq!(plan.rows().len(), 2);
    assert_eq!(plan.images().len(), 1);
    assert_eq!(plan.images()[0].row, 1);
    assert!(plan.rows()[0][SIGNATURE_COLUMN as usize].is_empty());

    let export = plan.render().unwrap();
    assert_eq!(export.rows, 3);
    assert_eq!(export.images, 1);

    let response = app
        .oneshot(admin_request("GET", "/api/export"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body_bytes(response).await;

    let sheet = workbook_text(&bytes, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains(r#"<row r="3""#));
    assert!(!sheet.contains(r#"<row r="4""#));

    let image = workbook_entry(&bytes, "xl/media/image1.png").unwrap();
    assert_eq!(&image[..8], b"\x89PNG\r\n\x1a\n");
    assert!(workbook_entry(&bytes, "xl/media/image2.png").is_none());

    let drawing = workbook_text(&bytes, "xl/drawings/drawing1.xml");
    let from = drawing
        .split("<xdr:from>")
        .nth(1)
        .and_then(|rest| rest.split("</xdr:from>").next())
        .unwrap();
    assert!(from.contains(&format!("<xdr:col>{}</xdr:col>", SIGNATURE_COLUMN)));
    assert!(from.contains("<xdr:row>1</xdr:row>"));
}

#[tokio::test]
async fn test_unknown_route() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
