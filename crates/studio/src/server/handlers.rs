//! Axum request handlers for all service endpoints.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use common::protocol::{
    CaesarRequest, CaesarResponse, DecryptRequest, DecryptResponse, EncryptRequest,
    EncryptResponse, ErrorResponse, FrequencyRequest, FrequencyResponse, HealthResponse,
    PasswordStrength,
};
use common::ServiceError;
use serde::Deserialize;
use tracing::{debug, warn};

use super::state::AppState;
use crate::classic;
use crate::crypto::{self, CipherError, KDF_ITERATIONS};
use crate::document::{self, Mode};

/// Header carrying the password for the raw-body file endpoints.
pub const PASSWORD_HEADER: &str = "x-password";

/// JSON body extractor whose rejections render as [`ErrorResponse`] bodies.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ServiceError::BadRequest(rejection.body_text()))
    }
}

/// Error returned from handlers, rendered as an [`ErrorResponse`] body.
#[derive(Debug)]
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl From<CipherError> for ApiError {
    fn from(err: CipherError) -> Self {
        if let Some(cause) = err.failure() {
            // The cause stays in logs; callers only see the uniform message.
            debug!(cause = %cause, "decryption failed");
            return Self(ServiceError::DecryptionFailed(err.to_string()));
        }
        match err {
            CipherError::InvalidInput(msg) => Self(ServiceError::BadRequest(msg.to_owned())),
            other => Self(ServiceError::Internal(other.to_string())),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = match &self.0 {
            ServiceError::BadRequest(msg) | ServiceError::DecryptionFailed(msg) => msg.clone(),
            ServiceError::Internal(msg) => {
                warn!(error = %msg, "internal error");
                "internal error".to_owned()
            }
        };
        (status, Json(ErrorResponse::new(self.0.code(), message))).into_response()
    }
}

/// Run a cipher call on the blocking pool, bounded by the state's permits.
///
/// The permit moves into the blocking task and is released only when the job
/// returns, even if the request future is dropped first (e.g. on timeout).
async fn run_cipher<T, F>(state: &AppState, job: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, CipherError> + Send + 'static,
    T: Send + 'static,
{
    let permit = state
        .cipher_permits
        .clone()
        .acquire_owned()
        .await
        .map_err(|_| ServiceError::Internal("cipher permits closed".into()))?;

    tokio::task::spawn_blocking(move || {
        let _permit = permit;
        job()
    })
    .await
        .map_err(|e| ServiceError::Internal(format!("cipher task failed: {e}")))?
        .map_err(ApiError::from)
}

/// `POST /encrypt`: encrypt a text under a password.
pub async fn encrypt(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<EncryptRequest>,
) -> Result<Json<EncryptResponse>, ApiError> {
    let password_strength = PasswordStrength::assess(&req.password);
    let plaintext_bytes = req.plaintext.len();

    let ciphertext =
        run_cipher(&state, move || crypto::encrypt(&req.plaintext, &req.password)).await?;

    debug!(plaintext_bytes, envelope_chars = ciphertext.len(), "encrypted text");
    Ok(Json(EncryptResponse {
        characters: ciphertext.chars().count(),
        size_bytes: ciphertext.len(),
        ciphertext,
        password_strength,
    }))
}

/// `POST /decrypt`: open a base64 envelope with a password.
pub async fn decrypt(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<DecryptRequest>,
) -> Result<Json<DecryptResponse>, ApiError> {
    let plaintext =
        run_cipher(&state, move || crypto::decrypt(&req.ciphertext, &req.password)).await?;

    debug!(plaintext_bytes = plaintext.len(), "decrypted text");
    Ok(Json(DecryptResponse {
        characters: plaintext.chars().count(),
        plaintext,
    }))
}

/// Query string of the file endpoints.
#[derive(Debug, Deserialize)]
pub struct FileParams {
    /// Name of the uploaded file, used to name the download.
    pub filename: Option<String>,
}

/// `POST /files/encrypt`: encrypt an uploaded text file.
///
/// The body is the raw file; the password travels in the `X-Password` header.
/// Responds with the envelope as a `text/plain` attachment.
pub async fn encrypt_file(
    State(state): State<AppState>,
    Query(params): Query<FileParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    process_file(state, params, headers, body, Mode::Encrypt).await
}

/// `POST /files/decrypt`: decrypt an uploaded envelope file.
pub async fn decrypt_file(
    State(state): State<AppState>,
    Query(params): Query<FileParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    process_file(state, params, headers, body, Mode::Decrypt).await
}

async fn process_file(
    state: AppState,
    params: FileParams,
    headers: HeaderMap,
    body: Bytes,
    mode: Mode,
) -> Result<Response, ApiError> {
    let password = password_from_headers(&headers)?;
    let upload_bytes = body.len();

    let output = run_cipher(&state, move || {
        let text = document::decode_upload(&body);
        match mode {
            Mode::Encrypt => crypto::encrypt(&text, &password),
            Mode::Decrypt => crypto::decrypt(&text, &password),
        }
    })
    .await?;

    let name = document::download_name(params.filename.as_deref(), mode);
    debug!(upload_bytes, download = %name, ?mode, "processed file");
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{name}\""),
            ),
        ],
        output,
    )
        .into_response())
}

fn password_from_headers(headers: &HeaderMap) -> Result<String, ServiceError> {
    let value = headers
        .get(PASSWORD_HEADER)
        .ok_or_else(|| ServiceError::BadRequest("missing X-Password header".into()))?;
    std::str::from_utf8(value.as_bytes())
        .map(str::to_owned)
        .map_err(|_| ServiceError::BadRequest("X-Password header is not valid UTF-8".into()))
}

/// `POST /caesar`: rotate letters by a fixed amount.
pub async fn caesar(ApiJson(req): ApiJson<CaesarRequest>) -> Json<CaesarResponse> {
    Json(CaesarResponse {
        text: classic::shift(&req.text, req.shift),
    })
}

/// `POST /frequency`: count letters `a` to `z`.
pub async fn frequency(ApiJson(req): ApiJson<FrequencyRequest>) -> Json<FrequencyResponse> {
    let (total_letters, letters) = classic::letter_frequency(&req.text);
    Json(FrequencyResponse {
        total_letters,
        letters,
    })
}

/// `GET /health`: liveness check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        kdf_iterations: KDF_ITERATIONS,
    })
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn invalid_input_maps_to_bad_request() {
        let resp = ApiError::from(CipherError::InvalidInput("password must not be empty"))
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn decryption_failure_maps_to_422() {
        let err = CipherError::from(crypto::error::DecryptFailure::Padding);
        let resp = ApiError::from(err).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn key_derivation_failure_maps_to_500() {
        let resp = ApiError::from(CipherError::KeyDerivation).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn password_header_missing() {
        let headers = HeaderMap::new();
        assert!(matches!(
            password_from_headers(&headers),
            Err(ServiceError::BadRequest(_))
        ));
    }

    #[test]
    fn password_header_accepts_utf8() {
        let mut headers = HeaderMap::new();
        headers.insert(
            PASSWORD_HEADER,
            HeaderValue::from_bytes("sandi-rahasia-ü".as_bytes()).unwrap(),
        );
        assert_eq!(password_from_headers(&headers).unwrap(), "sandi-rahasia-ü");
    }

    #[tokio::test]
    async fn dropped_request_keeps_permit_until_job_ends() {
        let state = AppState::new(1, 1024, std::time::Duration::from_secs(1));
        let (release, wait) = std::sync::mpsc::channel::<()>();

        let call = run_cipher(&state, move || {
            let _ = wait.recv();
            Ok(())
        });
        let timed_out = tokio::time::timeout(std::time::Duration::from_millis(20), call).await;
        assert!(timed_out.is_err());
        assert_eq!(state.cipher_permits.available_permits(), 0);

        release.send(()).unwrap();
        let permit = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            state.cipher_permits.acquire(),
        )
        .await
        .expect("permit returned after job")
        .unwrap();
        drop(permit);
    }

    #[tokio::test]
    async fn health_reports_kdf_iterations() {
        let Json(body) = health().await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.kdf_iterations, 100_000);
    }

    #[tokio::test]
    async fn caesar_handler_shifts() {
        let Json(body) = caesar(ApiJson(CaesarRequest {
            text: "abc".into(),
            shift: 1,
        }))
        .await;
        assert_eq!(body.text, "bcd");
    }
}
