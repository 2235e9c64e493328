use tracing::error;

use crate::admission::AdmissionReviewRequest;
use crate::errors::{AdmissionError, Result};

/// Turns request bodies into admission reviews.
///
/// Built once at startup and shared, read-only, by all the request handlers.
#[derive(Clone, Debug)]
pub struct ReviewDecoder {
    content_type: mime::Mime,
}

impl Default for ReviewDecoder {
    fn default() -> Self {
        ReviewDecoder {
            content_type: mime::APPLICATION_JSON,
        }
    }
}

impl ReviewDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The declared content type must be exactly `application/json`,
    /// parameters included.
    pub fn check_content_type(&self, content_type: Option<&str>) -> Result<()> {
        let content_type = content_type.unwrap_or_default();
        if content_type != self.content_type.essence_str() {
            error!(
                content_type,
                expected = self.content_type.essence_str(),
                "unsupported Content-Type"
            );
            return Err(AdmissionError::UnsupportedMediaType(content_type.to_owned()));
        }
        Ok(())
    }

    /// Decode a body whose content type has already been checked.
    ///
    /// The envelope `kind` and `apiVersion` are not enforced, only the
    /// embedded request is required.
    pub fn decode_body(&self, body: &[u8]) -> Result<AdmissionReviewRequest> {
        if body.is_empty() {
            error!("request body is empty");
            return Err(AdmissionError::EmptyBody);
        }

        serde_json::from_slice(body).map_err(|e| {
            error!(error = %e, "cannot decode body");
            AdmissionError::Decode(e.to_string())
        })
    }
}
