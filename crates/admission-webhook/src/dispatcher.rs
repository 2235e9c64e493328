use tracing::warn;

use crate::admission::{AdmissionRequest, AdmissionResponse};
use crate::errors::AdmissionError;
use crate::policy::{Mutator, Validator};

/// Admission phase served by an endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Validate,
    Mutate,
}

impl Phase {
    pub const VALIDATE_PATH: &'static str = "/validate";
    pub const MUTATE_PATH: &'static str = "/mutate";

    pub fn from_path(path: &str) -> Option<Phase> {
        match path {
            Self::VALIDATE_PATH => Some(Phase::Validate),
            Self::MUTATE_PATH => Some(Phase::Mutate),
            _ => None,
        }
    }
}

/// Routes decoded requests to the handler of the invoked phase.
#[derive(Clone, Default)]
pub struct Dispatcher {
    validator: Validator,
    mutator: Mutator,
}

impl Dispatcher {
    pub fn new(validator: Validator, mutator: Mutator) -> Self {
        Dispatcher { validator, mutator }
    }

    /// Returns `None` when `path` is not bound to any phase. No decision is
    /// taken in that case and the review goes back without a response.
    pub fn dispatch(&self, path: &str, request: &AdmissionRequest) -> Option<AdmissionResponse> {
        match Phase::from_path(path) {
            Some(Phase::Validate) => Some(self.validator.validate(request)),
            Some(Phase::Mutate) => Some(self.mutator.mutate(request)),
            None => {
                let err = AdmissionError::UnmatchedPhase(path.to_owned());
                warn!(error = %err, request_uid = request.uid.as_str(), "no decision taken");
                None
            }
        }
    }
}
