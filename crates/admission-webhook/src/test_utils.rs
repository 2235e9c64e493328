use k8s_openapi::apimachinery::pkg::runtime::RawExtension;

use crate::admission::{AdmissionRequest, GroupVersionKind};

pub(crate) fn build_admission_request(kind: &str, object: serde_json::Value) -> AdmissionRequest {
    let input = serde_json::json!({
        "uid": "hello",
        "kind": {"group": "", "version": "v1", "kind": kind},
        "resource": {"group": "", "version": "v1", "resource": "pods"},
        "name": "my-pod",
        "namespace": "my-namespace",
        "operation": "CREATE",
        "userInfo": {
            "username": "admin",
            "uid": "014fbff9a07c",
            "groups": ["system:authenticated", "my-admin-group"]
        },
        "dryRun": false
    });

    let mut request: AdmissionRequest =
        serde_json::from_value(input).expect("deserialization should work");
    assert_eq!(
        request.kind,
        GroupVersionKind {
            group: String::new(),
            version: "v1".to_owned(),
            kind: kind.to_owned(),
        }
    );
    request.object = Some(RawExtension(object));
    request
}
