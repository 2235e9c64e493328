use std::sync::Arc;

use axum::{
    extract::{self, Request},
    http::{header, StatusCode},
};
use tracing::{debug, error, info};

use crate::{
    admission::AdmissionResponse,
    api::{
        api_error::ApiError, populate_span_with_admission_request_data,
        populate_span_with_decision, state::ApiServerState, MAX_BODY_SIZE,
    },
    encoder::EncodedReview,
    errors::AdmissionError,
};

#[tracing::instrument(
    name = "admission",
    fields(
        host = crate::config::HOSTNAME.as_str(),
        path = request.uri().path(),
        request_uid = tracing::field::Empty,
        name = tracing::field::Empty,
        namespace = tracing::field::Empty,
        operation = tracing::field::Empty,
        kind_group = tracing::field::Empty,
        kind_version = tracing::field::Empty,
        kind = tracing::field::Empty,
        allowed = tracing::field::Empty,
        mutated = tracing::field::Empty,
        response_message = tracing::field::Empty,
    ),
    skip_all)]
/// Serve both admission phases. The phase is picked from the request path.
pub(crate) async fn admission_handler(
    extract::State(state): extract::State<Arc<ApiServerState>>,
    request: Request,
) -> Result<EncodedReview, ApiError> {
    let path = request.uri().path().to_owned();

    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|value| value.to_str().unwrap_or("<non ascii>"));
    state.decoder.check_content_type(content_type)?;

    let body = axum::body::to_bytes(request.into_body(), MAX_BODY_SIZE)
        .await
        .map_err(|e| {
            error!(error = %e, "read request body error");
            AdmissionError::ReadBody(e.to_string())
        })?;

    let encoded = match state.decoder.decode_body(&body) {
        Ok(review) => {
            populate_span_with_admission_request_data(&review.request);
            debug!(request = ?review.request, "admission review decoded");

            let decision = state.dispatcher.dispatch(&path, &review.request);
            if let Some(decision) = &decision {
                populate_span_with_decision(decision);
            }
            state.encoder.encode(decision, Some(&review.request))
        }
        Err(AdmissionError::Decode(message)) => {
            let decision = AdmissionResponse::from_error(message);
            populate_span_with_decision(&decision);
            state.encoder.encode(Some(decision), None)
        }
        Err(e) => return Err(e.into()),
    };

    info!("ready to write response");
    Ok(encoded)
}

pub(crate) async fn readiness_handler() -> StatusCode {
    StatusCode::OK
}
