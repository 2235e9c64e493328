use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::admission::{AdmissionRequest, AdmissionResponse, AdmissionReviewResponse};
use crate::errors::AdmissionError;

/// Wraps decisions into admission review envelopes.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResponseEncoder;

/// Serialized envelope, plus the error raised while producing it.
#[derive(Debug)]
pub struct EncodedReview {
    pub body: Vec<u8>,
    pub error: Option<AdmissionError>,
}

impl ResponseEncoder {
    pub fn new() -> Self {
        ResponseEncoder
    }

    /// Build the envelope. The uid of `request` is copied into the decision,
    /// when both exist.
    pub fn envelope(
        &self,
        decision: Option<AdmissionResponse>,
        request: Option<&AdmissionRequest>,
    ) -> AdmissionReviewResponse {
        let response = decision.map(|mut decision| {
            if let Some(request) = request {
                decision.uid = request.uid.clone();
            }
            decision
        });

        AdmissionReviewResponse::new(response)
    }

    pub fn encode(
        &self,
        decision: Option<AdmissionResponse>,
        request: Option<&AdmissionRequest>,
    ) -> EncodedReview {
        let review = self.envelope(decision, request);
        Self::finish(serde_json::to_vec(&review))
    }

    fn finish(serialized: serde_json::Result<Vec<u8>>) -> EncodedReview {
        match serialized {
            Ok(body) => EncodedReview { body, error: None },
            Err(e) => {
                let err = AdmissionError::ResponseSerialization(e.to_string());
                error!(error = %err, "can't encode response");
                EncodedReview {
                    body: Vec::new(),
                    error: Some(err),
                }
            }
        }
    }
}

impl IntoResponse for EncodedReview {
    /// A serialization failure is reported with a 500, the bytes produced
    /// so far are written after the error message anyway.
    fn into_response(self) -> Response {
        match self.error {
            None => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())],
                self.body,
            )
                .into_response(),
            Some(err) => {
                let mut body = format!("{err}\n").into_bytes();
                body.extend_from_slice(&self.body);
                (
                    err.status_code(),
                    [(header::CONTENT_TYPE, mime::TEXT_PLAIN_UTF_8.as_ref())],
                    body,
                )
                    .into_response()
            }
        }
    }
}
