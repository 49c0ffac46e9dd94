//! Axum router construction.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::{handlers, middleware, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_body_bytes);
    let timeout = TimeoutLayer::new(state.request_timeout);

    Router::new()
        .route("/encrypt", post(handlers::encrypt))
        .route("/decrypt", post(handlers::decrypt))
        .route("/files/encrypt", post(handlers::encrypt_file))
        .route("/files/decrypt", post(handlers::decrypt_file))
        .route("/caesar", post(handlers::caesar))
        .route("/frequency", post(handlers::frequency))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(body_limit)
        .layer(axum::middleware::from_fn(middleware::no_store))
        .layer(TraceLayer::new_for_http())
        .layer(timeout)
        .layer(CompressionLayer::new())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use common::protocol::{
        DecryptResponse, EncryptResponse, ErrorResponse, FrequencyResponse, HealthResponse,
        PasswordStrength,
    };
    use serde::de::DeserializeOwned;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn post_json(uri: &str, body: Value) -> Response {
        post_json_with(AppState::default(), uri, body).await
    }

    async fn post_json_with(state: AppState, uri: &str, body: Value) -> Response {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        build(state).oneshot(req).await.unwrap()
    }

    async fn post_file(uri: &str, password: Option<&str>, body: Vec<u8>) -> Response {
        let mut req = Request::builder().method("POST").uri(uri);
        if let Some(password) = password {
            req = req.header("X-Password", password);
        }
        build(AppState::default())
            .oneshot(req.body(Body::from(body)).unwrap())
            .await
            .unwrap()
    }

    async fn read_json<T: DeserializeOwned>(resp: Response) -> T {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn read_text(resp: Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let app = build(AppState::default());
        let req = Request::builder()
            .uri("/unknown")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 404);
        let body: ErrorResponse = read_json(resp).await;
        assert_eq!(body.code, "not_found");
    }

    #[tokio::test]
    async fn health_route_exists() {
        let app = build(AppState::default());
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()[header::CACHE_CONTROL], "no-store");
        let body: HealthResponse = read_json(resp).await;
        assert_eq!(body.kdf_iterations, 100_000);
    }

    #[tokio::test]
    async fn encrypt_then_decrypt_over_http() {
        let resp = post_json(
            "/encrypt",
            json!({"plaintext": "Hello World", "password": "my_password"}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let encrypted: EncryptResponse = read_json(resp).await;
        assert_eq!(encrypted.characters, 64);
        assert_eq!(encrypted.size_bytes, 64);
        assert_eq!(encrypted.password_strength, PasswordStrength::Fair);

        let resp = post_json(
            "/decrypt",
            json!({"ciphertext": encrypted.ciphertext, "password": "my_password"}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let decrypted: DecryptResponse = read_json(resp).await;
        assert_eq!(decrypted.plaintext, "Hello World");
        assert_eq!(decrypted.characters, 11);
    }

    #[tokio::test]
    async fn empty_password_is_400() {
        let resp = post_json("/encrypt", json!({"plaintext": "x", "password": ""})).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = read_json(resp).await;
        assert_eq!(body.code, "bad_request");
        assert!(body.message.contains("password"));
    }

    #[tokio::test]
    async fn malformed_and_wrong_password_look_the_same() {
        let resp = post_json(
            "/decrypt",
            json!({"ciphertext": "not-base64!!", "password": "pw"}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let malformed: ErrorResponse = read_json(resp).await;

        let envelope = crate::crypto::encrypt("secret", "right").unwrap();
        let resp = post_json(
            "/decrypt",
            json!({"ciphertext": envelope, "password": "wrong"}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let wrong: ErrorResponse = read_json(resp).await;

        assert_eq!(malformed.code, "decryption_failed");
        assert_eq!(malformed.message, wrong.message);
    }

    #[tokio::test]
    async fn file_encrypt_returns_named_attachment() {
        let resp = post_file(
            "/files/encrypt?filename=notes.txt",
            Some("file-password"),
            b"line one\nline two\n".to_vec(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"notes_encrypted.txt\""
        );
        let envelope = read_text(resp).await;

        let resp = post_file(
            "/files/decrypt?filename=notes_encrypted.txt",
            Some("file-password"),
            envelope.into_bytes(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"notes_encrypted_decrypted.txt\""
        );
        assert_eq!(read_text(resp).await, "line one\nline two\n");
    }

    #[tokio::test]
    async fn file_upload_falls_back_to_latin1() {
        let resp = post_file("/files/encrypt", Some("pw"), vec![0x63, 0x61, 0x66, 0xe9]).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"result_encrypted.txt\""
        );
        let envelope = read_text(resp).await;
        assert_eq!(crate::crypto::decrypt(&envelope, "pw").unwrap(), "café");
    }

    #[tokio::test]
    async fn file_without_password_header_is_400() {
        let resp = post_file("/files/encrypt", None, b"data".to_vec()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_file_is_400() {
        let resp = post_file("/files/decrypt", Some("pw"), Vec::new()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn caesar_route_round_trips() {
        let resp = post_json("/caesar", json!({"text": "Hello, World!", "shift": 3})).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = read_json(resp).await;
        assert_eq!(body["text"], "Khoor, Zruog!");

        let resp = post_json("/caesar", json!({"text": "Khoor, Zruog!", "shift": -3})).await;
        let body: Value = read_json(resp).await;
        assert_eq!(body["text"], "Hello, World!");
    }

    #[tokio::test]
    async fn frequency_route_counts_letters() {
        let resp = post_json("/frequency", json!({"text": "aAb"})).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: FrequencyResponse = read_json(resp).await;
        assert_eq!(body.total_letters, 3);
        assert_eq!(body.letters.len(), 26);
        assert_eq!(body.letters[0].count, 2);
    }

    #[tokio::test]
    async fn malformed_json_is_400_error_response() {
        let req = Request::builder()
            .method("POST")
            .uri("/encrypt")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"plaintext\": "))
            .unwrap();
        let resp = build(AppState::default()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = read_json(resp).await;
        assert_eq!(body.code, "bad_request");
    }

    #[tokio::test]
    async fn missing_json_field_is_400() {
        let resp = post_json("/decrypt", json!({"password": "pw"})).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = read_json(resp).await;
        assert_eq!(body.code, "bad_request");
    }

    #[tokio::test]
    async fn timed_out_request_holds_permit_until_derivation_ends() {
        let state = AppState::new(1, 1 << 20, std::time::Duration::from_millis(1));
        let permits = state.cipher_permits.clone();

        let resp = post_json_with(
            state,
            "/encrypt",
            json!({"plaintext": "Hello World", "password": "my_password"}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(permits.available_permits(), 0);

        let permit = tokio::time::timeout(std::time::Duration::from_secs(30), permits.acquire())
            .await
            .expect("permit returned after derivation")
            .unwrap();
        drop(permit);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let state = AppState::new(1, 64, std::time::Duration::from_secs(5));
        let req = Request::builder()
            .method("POST")
            .uri("/files/encrypt")
            .header("X-Password", "pw")
            .body(Body::from(vec![b'a'; 1024]))
            .unwrap();
        let resp = build(state).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
