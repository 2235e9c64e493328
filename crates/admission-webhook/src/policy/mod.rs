mod mutator;
mod validator;

pub use mutator::{LabelPatchMode, Mutator, LABEL_KEY, LABEL_VALUE};
pub use validator::Validator;

use crate::admission::{AdmissionResponse, AdmissionResponseStatus, Pod};

/// Outcome of a policy evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicyDecision {
    pub allowed: bool,
    pub message: Option<String>,
}

impl PolicyDecision {
    pub fn allow() -> Self {
        PolicyDecision {
            allowed: true,
            message: None,
        }
    }

    pub fn deny(message: impl Into<String>) -> Self {
        PolicyDecision {
            allowed: false,
            message: Some(message.into()),
        }
    }
}

impl From<PolicyDecision> for AdmissionResponse {
    fn from(decision: PolicyDecision) -> Self {
        AdmissionResponse {
            allowed: decision.allowed,
            result: decision.message.map(|message| AdmissionResponseStatus {
                message: Some(message),
                code: None,
            }),
            ..Default::default()
        }
    }
}

/// Enforcement point of the validating phase.
///
/// Implementations receive the parsed Pod together with the namespace and
/// name reported by the API server.
pub trait PodPolicy: Send + Sync {
    fn validate(&self, pod: &Pod, namespace: &str, name: &str) -> PolicyDecision;
}

/// The policy currently shipped: every Pod is accepted.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

impl PodPolicy for AllowAll {
    fn validate(&self, _pod: &Pod, _namespace: &str, _name: &str) -> PolicyDecision {
        PolicyDecision::allow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_into_response() {
        let response: AdmissionResponse = PolicyDecision::allow().into();
        assert!(response.allowed);
        assert!(response.result.is_none());

        let response: AdmissionResponse = PolicyDecision::deny("no way").into();
        assert!(!response.allowed);
        assert_eq!(response.message(), Some("no way"));
    }
}
