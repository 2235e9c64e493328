pub(crate) mod api_error;
pub(crate) mod handlers;
pub(crate) mod state;

use tracing::Span;

use crate::admission::{AdmissionRequest, AdmissionResponse};

/// Largest request body the Kubernetes API server accepts for an object.
const API_SERVER_MAX_REQUEST_BODY_BYTES: usize = 3 * 1024 * 1024;

/// Largest admission review body accepted. An UPDATE review carries both
/// `object` and `oldObject`, plus the envelope around them.
pub(crate) const MAX_BODY_SIZE: usize = 2 * API_SERVER_MAX_REQUEST_BODY_BYTES + 1024 * 1024;

fn populate_span_with_admission_request_data(adm_req: &AdmissionRequest) {
    Span::current().record("request_uid", adm_req.uid.as_str());
    Span::current().record("kind", adm_req.kind.kind.as_str());
    Span::current().record("kind_group", adm_req.kind.group.as_str());
    Span::current().record("kind_version", adm_req.kind.version.as_str());
    Span::current().record("name", adm_req.name());
    Span::current().record("namespace", adm_req.namespace());
    Span::current().record("operation", adm_req.operation.as_str());
}

fn populate_span_with_decision(response: &AdmissionResponse) {
    Span::current().record("allowed", response.allowed);
    Span::current().record("mutated", response.patch.is_some());
    if let Some(message) = response.message() {
        Span::current().record("response_message", message);
    }
}
