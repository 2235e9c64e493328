use std::sync::Arc;

use tracing::{debug, error, info};

use super::{AllowAll, PodPolicy};
use crate::admission::{AdmissionRequest, AdmissionResponse, Pod, POD_KIND};

/// Handles the validating phase.
#[derive(Clone)]
pub struct Validator {
    policy: Arc<dyn PodPolicy>,
}

impl Default for Validator {
    fn default() -> Self {
        Validator::new(Arc::new(AllowAll))
    }
}

impl Validator {
    pub fn new(policy: Arc<dyn PodPolicy>) -> Self {
        Validator { policy }
    }

    pub fn validate(&self, request: &AdmissionRequest) -> AdmissionResponse {
        if request.kind.kind != POD_KIND {
            info!(
                namespace = request.namespace(),
                name = request.name(),
                kind = request.kind.kind.as_str(),
                "skipping validation due to policy check"
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
            "validating pod"
        );

        let decision = self
            .policy
            .validate(&pod, request.namespace(), request.name());
        debug!(?decision, "validation done");

        decision.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyDecision;
    use crate::test_utils::build_admission_request;
    use serde_json::json;

    struct DenyNamespace(&'static str);

    impl PodPolicy for DenyNamespace {
        fn validate(&self, _pod: &Pod, namespace: &str, _name: &str) -> PolicyDecision {
            if namespace == self.0 {
                PolicyDecision::deny(format!("namespace {namespace} is off limits"))
            } else {
                PolicyDecision::allow()
            }
        }
    }

    #[test]
    fn allow_non_pod_objects() {
        let request = build_admission_request("Deployment", json!({"metadata": "garbage"}));
        let response = Validator::default().validate(&request);

        assert!(response.allowed);
        assert!(response.result.is_none());
        assert!(response.patch.is_none());
    }

    #[test]
    fn allow_pods() {
        let request = build_admission_request(
            "Pod",
            json!({"metadata": {"name": "nginx", "labels": {"app": "x"}}}),
        );
        let response = Validator::default().validate(&request);

        assert!(response.allowed);
        assert!(response.result.is_none());
    }

    #[test]
    fn malformed_pod_is_denied_by_omission() {
        let request = build_admission_request("Pod", json!({"metadata": {"labels": 42}}));
        let response = Validator::default().validate(&request);

        assert!(!response.allowed);
        assert!(!response.message().unwrap().is_empty());
    }

    #[test]
    fn custom_policy_is_consulted() {
        let validator = Validator::new(Arc::new(DenyNamespace("my-namespace")));
        let request = build_admission_request("Pod", json!({"metadata": {"name": "nginx"}}));
        let response = validator.validate(&request);

        assert!(!response.allowed);
        assert_eq!(
            response.message(),
            Some("namespace my-namespace is off limits")
        );

        let request = build_admission_request("ConfigMap", json!({}));
        assert!(validator.validate(&request).allowed);
    }
}
