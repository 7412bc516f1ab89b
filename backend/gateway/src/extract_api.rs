//! Label extraction endpoint (`POST /extract/`).
//!
//! Accepts `multipart/form-data` with the image in the `file` part and
//! answers with the extracted fields, the recognized strings and the
//! annotated image.

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use labelscan_core::LabelError;
use labelscan_logging::{EventLogger, ExtractionEvent};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::server::GatewayState;

/// Multipart part that carries the image.
pub const FILE_FIELD: &str = "file";
pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const NO_IMAGE: &str = "No image provided";

/// Error body plus status, tagged with the request id.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn no_image() -> Self {
        Self::new(StatusCode::BAD_REQUEST, NO_IMAGE)
    }
}

impl From<&LabelError> for ApiError {
    fn from(err: &LabelError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let message = match err {
            LabelError::InvalidInput(detail) => detail.clone(),
            other => other.to_string(),
        };
        Self::new(status, message)
    }
}

fn with_request_id(request_id: &str, response: impl IntoResponse) -> Response {
    ([(REQUEST_ID_HEADER, request_id.to_string())], response).into_response()
}

/// Pull the `file` part out of the form. `Ok(None)` when absent or empty.
async fn read_file_part(multipart: &mut Multipart) -> Result<Option<Vec<u8>>, ApiError> {
    loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
        let Some(field) = field else {
            return Ok(None);
        };
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
        return Ok((!bytes.is_empty()).then(|| bytes.to_vec()));
    }
}

/// Handler for `POST /extract/`.
pub async fn extract_label(
    State(state): State<GatewayState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let request_id = Uuid::new_v4().to_string();

    let upload = match multipart {
        Ok(mut form) => read_file_part(&mut form).await,
        Err(rejection) => {
            warn!(request_id = %request_id, error = %rejection, "Request is not a multipart form");
            Err(ApiError::no_image())
        }
    };

    let bytes = match upload {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return reject(&request_id, ApiError::no_image()),
        Err(err) => return reject(&request_id, err),
    };

    info!(request_id = %request_id, bytes = bytes.len(), "Extraction request received");

    match state.pipeline.process(&bytes).await {
        Ok(response) => {
            EventLogger::log_event(
                &request_id,
                ExtractionEvent::Completed {
                    detections: response.recognized_text.len(),
                    fields_found: response.fields.found(),
                    recognized_text: response.recognized_text.clone(),
                },
            );
            with_request_id(&request_id, Json(response))
        }
        Err(err) => {
            let api_err = ApiError::from(&err);
            if err.is_client_error() {
                return reject(&request_id, api_err);
            }
            tracing::error!(request_id = %request_id, kind = err.kind(), error = %err, "Extraction failed");
            EventLogger::log_event(
                &request_id,
                ExtractionEvent::Failed {
                    kind: err.kind().to_string(),
                    error_msg: err.to_string(),
                },
            );
            respond(&request_id, api_err)
        }
    }
}

fn reject(request_id: &str, err: ApiError) -> Response {
    EventLogger::log_event(
        request_id,
        ExtractionEvent::Rejected {
            reason: err.message.clone(),
        },
    );
    respond(request_id, err)
}

fn respond(request_id: &str, err: ApiError) -> Response {
    with_request_id(
        request_id,
        (err.status, Json(json!({ "error": err.message }))),
    )
}
