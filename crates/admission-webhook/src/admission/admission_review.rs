use super::{AdmissionRequest, AdmissionResponse};

pub const ADMISSION_REVIEW_KIND: &str = "AdmissionReview";
pub const ADMISSION_REVIEW_API_VERSION: &str = "admission.k8s.io/v1";

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionReviewRequest {
    #[serde(default)]
    pub kind: String,

    #[serde(default)]
    pub api_version: String,

    pub request: AdmissionRequest,
}

/// Outgoing envelope. `response` stays empty when no decision was taken.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionReviewResponse {
    pub kind: String,

    pub api_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<AdmissionResponse>,
}

impl AdmissionReviewResponse {
    pub fn new(response: Option<AdmissionResponse>) -> Self {
        AdmissionReviewResponse {
            api_version: String::from(ADMISSION_REVIEW_API_VERSION),
            kind: String::from(ADMISSION_REVIEW_KIND),
            response,
        }
    }
}
