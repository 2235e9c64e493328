use std::collections::BTreeMap;
use std::str::FromStr;

use json_patch::jsonptr::PointerBuf;
use json_patch::{AddOperation, Patch, PatchOperation};
use tracing::{error, info};

use crate::admission::{AdmissionRequest, AdmissionResponse, Pod, POD_KIND};
use crate::errors::{AdmissionError, Result};

pub const LABEL_KEY: &str = "orion-vgpu";
pub const LABEL_VALUE: &str = "true";

const LABELS_PATH: &str = "/metadata/labels";

/// How the fixed label is written into the Pod.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LabelPatchMode {
    /// `add` of the whole `/metadata/labels` map. Any label already set on
    /// the Pod is dropped.
    #[default]
    Replace,
    /// Add only the fixed key, keeping the labels already there.
    Merge,
}

impl FromStr for LabelPatchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "replace" => Ok(LabelPatchMode::Replace),
            "merge" => Ok(LabelPatchMode::Merge),
            other => Err(format!("unknown label patch mode: {other}")),
        }
    }
}

/// Handles the mutating phase.
#[derive(Clone, Debug, Default)]
pub struct Mutator {
    mode: LabelPatchMode,
}

impl Mutator {
    pub fn new(mode: LabelPatchMode) -> Self {
        Mutator { mode }
    }

    pub fn mutate(&self, request: &AdmissionRequest) -> AdmissionResponse {
        if request.kind.kind != POD_KIND {
            info!(
                namespace = request.namespace(),
                name = request.name(),
                kind = request.kind.kind.as_str(),
                "skipping mutation due to policy check"
            );
            return AdmissionResponse::allow();
        }

        let pod = match Pod::from_raw(request.object.as_ref()) {
            Ok(pod) => pod,
            Err(e) => {
                error!(error = %e, "could not unmarshal raw object");
                return AdmissionResponse::from_error(e.to_string());
            }
        };

        info!(
            pod_name = pod.name(),
            pod_namespace = pod.namespace(),
            labels = ?pod.labels(),
            "mutating pod"
        );

        Self::finish(self.build_patch(&pod).and_then(|patch| serialize_patch(&patch)))
    }

    /// Turn the serialized patch into a decision. A failure leaves `allowed`
    /// unset and carries the error message.
    fn finish(patch: Result<Vec<u8>>) -> AdmissionResponse {
        match patch {
            Ok(patch) => {
                info!(patch = %String::from_utf8_lossy(&patch), "patch data");
                AdmissionResponse::allow().with_patch(&patch)
            }
            Err(e) => {
                error!(error = %e, "could not marshal patch data");
                AdmissionResponse::from_error(e.to_string())
            }
        }
    }

    /// Single `add` operation carrying the fixed label.
    pub fn build_patch(&self, pod: &Pod) -> Result<Patch> {
        let mut path = PointerBuf::parse(LABELS_PATH)
            .map_err(|e| AdmissionError::PatchSerialization(e.to_string()))?;

        let value = match (self.mode, pod.labels()) {
            (LabelPatchMode::Merge, Some(_)) => {
                path.push_back(LABEL_KEY);
                serde_json::Value::String(LABEL_VALUE.to_owned())
            }
            _ => {
                let labels = BTreeMap::from([(LABEL_KEY, LABEL_VALUE)]);
                serde_json::to_value(labels)
                    .map_err(|e| AdmissionError::PatchSerialization(e.to_string()))?
            }
        };

        Ok(Patch(vec![PatchOperation::Add(AddOperation { path, value })]))
    }
}

fn serialize_patch(patch: &Patch) -> Result<Vec<u8>> {
    serde_json::to_vec(patch).map_err(|e| AdmissionError::PatchSerialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admission::PatchType;
    use crate::test_utils::build_admission_request;
    use rstest::rstest;
    use serde_json::{json, Value};

    fn decoded_patch(response: &AdmissionResponse) -> Value {
        let bytes = response.decoded_patch().unwrap().unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn allow_non_pod_objects_without_patch() {
        let request = build_admission_request("Deployment", json!({}));
        let response = Mutator::default().mutate(&request);

        assert!(response.allowed);
        assert!(response.patch.is_none());
        assert!(response.patch_type.is_none());
        assert!(response.result.is_none());
    }

    #[rstest]
    #[case::no_labels(json!({"metadata": {"name": "nginx"}}))]
    #[case::existing_labels(json!({"metadata": {"name": "nginx", "labels": {"app": "x"}}}))]
    #[case::label_already_set(json!({"metadata": {"labels": {"orion-vgpu": "false"}}}))]
    fn replace_labels(#[case] object: Value) {
        let request = build_admission_request("Pod", object);
        let response = Mutator::default().mutate(&request);

        assert!(response.allowed);
        assert_eq!(response.patch_type, Some(PatchType::JSONPatch));
        assert_eq!(
            decoded_patch(&response),
            json!([{"op": "add", "path": "/metadata/labels", "value": {"orion-vgpu": "true"}}])
        );
    }

    #[test]
    fn replace_drops_existing_labels_once_applied() {
        let mut pod = json!({"metadata": {"name": "nginx", "labels": {"app": "x"}}});
        let request = build_admission_request("Pod", pod.clone());
        let response = Mutator::default().mutate(&request);

        let patch: Patch = serde_json::from_value(decoded_patch(&response)).unwrap();
        json_patch::patch(&mut pod, &patch).unwrap();
        assert_eq!(pod["metadata"]["labels"], json!({"orion-vgpu": "true"}));
    }

    #[test]
    fn merge_keeps_existing_labels() {
        let mut pod = json!({"metadata": {"name": "nginx", "labels": {"app": "x"}}});
        let request = build_admission_request("Pod", pod.clone());
        let response = Mutator::new(LabelPatchMode::Merge).mutate(&request);

        assert_eq!(
            decoded_patch(&response),
            json!([{"op": "add", "path": "/metadata/labels/orion-vgpu", "value": "true"}])
        );

        let patch: Patch = serde_json::from_value(decoded_patch(&response)).unwrap();
        json_patch::patch(&mut pod, &patch).unwrap();
        assert_eq!(
            pod["metadata"]["labels"],
            json!({"app": "x", "orion-vgpu": "true"})
        );
    }

    #[test]
    fn merge_without_labels_adds_the_whole_map() {
        let request = build_admission_request("Pod", json!({"metadata": {"name": "nginx"}}));
        let response = Mutator::new(LabelPatchMode::Merge).mutate(&request);

        assert_eq!(
            decoded_patch(&response),
            json!([{"op": "add", "path": "/metadata/labels", "value": {"orion-vgpu": "true"}}])
        );
    }

    #[test]
    fn malformed_pod_is_denied_by_omission() {
        let request = build_admission_request("Pod", json!({"metadata": "nginx"}));
        let response = Mutator::default().mutate(&request);

        assert!(!response.allowed);
        assert!(response.patch.is_none());
        assert!(response.patch_type.is_none());
        assert!(!response.message().unwrap().is_empty());
    }

    #[test]
    fn patch_serialization_failure_is_denied_by_omission() {
        let response = Mutator::finish(Err(AdmissionError::PatchSerialization(
            "key must be a string".to_owned(),
        )));

        assert!(!response.allowed);
        assert!(response.patch.is_none());
        assert!(response.patch_type.is_none());
        assert_eq!(
            response.message(),
            Some("could not marshal patch data: key must be a string")
        );
    }

    #[test]
    fn serialized_patch_is_allowed() {
        let patch = br#"[{"op":"add","path":"/metadata/labels","value":{"orion-vgpu":"true"}}]"#;
        let response = Mutator::finish(Ok(patch.to_vec()));

        assert!(response.allowed);
        assert!(response.result.is_none());
        assert_eq!(response.patch_type, Some(PatchType::JSONPatch));
        assert_eq!(response.decoded_patch().unwrap().unwrap(), patch.to_vec());
    }

    #[rstest]
    #[case("replace", Ok(LabelPatchMode::Replace))]
    #[case("merge", Ok(LabelPatchMode::Merge))]
    #[case("append", Err("unknown label patch mode: append".to_owned()))]
    fn parse_label_patch_mode(
        #[case] input: &str,
        #[case] expected: std::result::Result<LabelPatchMode, String>,
    ) {
        assert_eq!(input.parse::<LabelPatchMode>(), expected);
    }
}
