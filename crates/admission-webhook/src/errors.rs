use axum::http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdmissionError>;

#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("invalid Content-Type, expect `application/json`")]
    UnsupportedMediaType(String),

    #[error("request body is empty")]
    EmptyBody,

    #[error("read request body error: {0}")]
    ReadBody(String),

    #[error("{0}")]
    Decode(String),

    #[error("{0}")]
    TargetParse(String),

    #[error("could not marshal patch data: {0}")]
    PatchSerialization(String),

    #[error("could not encode response: {0}")]
    ResponseSerialization(String),

    #[error("no admission phase is served at {0}")]
    UnmatchedPhase(String),
}

impl AdmissionError {
    /// HTTP status used when the error is surfaced at transport level.
    /// Protocol level errors are reported inside of a 200 response.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AdmissionError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AdmissionError::EmptyBody => StatusCode::BAD_REQUEST,
            AdmissionError::ReadBody(_) | AdmissionError::ResponseSerialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AdmissionError::Decode(_)
            | AdmissionError::TargetParse(_)
            | AdmissionError::PatchSerialization(_)
            | AdmissionError::UnmatchedPhase(_) => StatusCode::OK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::media_type(AdmissionError::UnsupportedMediaType("text/plain".to_owned()), StatusCode::UNSUPPORTED_MEDIA_TYPE)]
    #[case::empty_body(AdmissionError::EmptyBody, StatusCode::BAD_REQUEST)]
    #[case::encode(AdmissionError::ResponseSerialization("boom".to_owned()), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case::decode(AdmissionError::Decode("boom".to_owned()), StatusCode::OK)]
    #[case::unmatched(AdmissionError::UnmatchedPhase("/other".to_owned()), StatusCode::OK)]
    fn status_codes(#[case] error: AdmissionError, #[case] expected: StatusCode) {
        assert_eq!(error.status_code(), expected);
    }
}
