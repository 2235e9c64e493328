pub mod admission_request;
pub mod admission_response;
pub mod admission_review;
pub mod pod;

pub use admission_request::{AdmissionRequest, GroupVersionKind, GroupVersionResource};
pub use admission_response::{AdmissionResponse, AdmissionResponseStatus, PatchType};
pub use admission_review::{AdmissionReviewRequest, AdmissionReviewResponse};
pub use pod::Pod;

/// Kind of the only resource the webhook applies policy to.
pub const POD_KIND: &str = "Pod";
