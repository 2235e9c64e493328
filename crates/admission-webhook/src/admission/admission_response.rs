use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

/// This models the admission/v1/AdmissionResponse object of Kubernetes
/// See https://pkg.go.dev/k8s.io/api/admission/v1#AdmissionResponse
///
/// `Default` is a deny: any code path that never flips `allowed` rejects
/// the request.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionResponse {
    /// UID is an identifier for the individual request/response.
    /// This must be copied over from the corresponding AdmissionRequest.
    #[serde(default)]
    pub uid: String,

    /// Allowed indicates whether or not the admission request was permitted.
    #[serde(default)]
    pub allowed: bool,

    /// Human readable outcome, carried as `status` on the wire.
    #[serde(rename = "status", default, skip_serializing_if = "Option::is_none")]
    pub result: Option<AdmissionResponseStatus>,

    /// The patch body, base64 encoded. Only "JSONPatch" (RFC 6902) is supported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,

    /// The type of Patch. Set if and only if `patch` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch_type: Option<PatchType>,
}

/// PatchType is the type of patch being used to represent the mutated object
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum PatchType {
    #[serde(rename = "JSONPatch")]
    #[default]
    JSONPatch,
}

/// Subset of metav1.Status the webhook fills in.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone)]
pub struct AdmissionResponseStatus {
    /// A human-readable description of the status of this operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Suggested HTTP return code for this status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

impl AdmissionResponse {
    pub fn allow() -> AdmissionResponse {
        AdmissionResponse {
            allowed: true,
            ..Default::default()
        }
    }

    /// A response carrying only a message. `allowed` is left untouched,
    /// which means the request is rejected.
    pub fn from_error(message: String) -> AdmissionResponse {
        AdmissionResponse {
            result: Some(AdmissionResponseStatus {
                message: Some(message),
                code: None,
            }),
            ..Default::default()
        }
    }

    /// Attach a serialized JSON Patch. An empty document leaves both
    /// `patch` and `patchType` unset.
    pub fn with_patch(mut self, patch: &[u8]) -> AdmissionResponse {
        if patch.is_empty() {
            self.patch = None;
            self.patch_type = None;
        } else {
            self.patch = Some(general_purpose::STANDARD.encode(patch));
            self.patch_type = Some(PatchType::JSONPatch);
        }
        self
    }

    /// Decoded patch bytes, if any.
    pub fn decoded_patch(&self) -> Option<Result<Vec<u8>, base64::DecodeError>> {
        self.patch
            .as_ref()
            .map(|patch| general_purpose::STANDARD.decode(patch))
    }

    pub fn message(&self) -> Option<&str> {
        self.result.as_ref().and_then(|r| r.message.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_response_is_a_deny() {
        let response = AdmissionResponse::default();
        assert!(!response.allowed);

        let serialized = serde_json::to_value(&response).unwrap();
        assert_eq!(serialized, json!({"uid": "", "allowed": false}));
    }

    #[test]
    fn error_response_does_not_allow() {
        let response = AdmissionResponse::from_error("boom".to_owned());
        assert!(!response.allowed);
        assert_eq!(response.message(), Some("boom"));
        assert!(response.patch.is_none());

        let serialized = serde_json::to_value(&response).unwrap();
        assert_eq!(serialized["status"]["message"], "boom");
    }

    #[test]
    fn patch_type_follows_patch() {
        let patch = br#"[{"op":"remove","path":"/a"}]"#;
        let response = AdmissionResponse::allow().with_patch(patch);
        assert_eq!(response.patch_type, Some(PatchType::JSONPatch));
        assert_eq!(response.decoded_patch().unwrap().unwrap(), patch.to_vec());

        let serialized = serde_json::to_value(&response).unwrap();
        assert_eq!(serialized["patchType"], "JSONPatch");

        let response = response.with_patch(&[]);
        assert!(response.patch.is_none());
        assert!(response.patch_type.is_none());
    }
}
