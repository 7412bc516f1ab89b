use thiserror::Error;

/// Error taxonomy for a single extraction request.
///
/// Every variant aborts the request; no stage degrades to a partial result.
#[derive(Debug, Error)]
pub enum LabelError {
    /// Empty or undecodable upload. Surfaced to the caller as a client error.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The recognition engine failed internally. Not retried.
    #[error("recognition engine error: {0}")]
    RecognitionEngine(String),

    /// A detection carried geometry the renderer cannot draw.
    #[error("render error: {0}")]
    Render(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LabelError {
    /// Whether the failure is the caller's fault (400-class) rather than ours.
    pub fn is_client_error(&self) -> bool {
        matches!(self, LabelError::InvalidInput(_))
    }

    /// Short machine-readable kind, used in logs and events.
    pub fn kind(&self) -> &'static str {
        match self {
            LabelError::InvalidInput(_) => "invalid_input",
            LabelError::RecognitionEngine(_) => "recognition_engine",
            LabelError::Render(_) => "render",
            LabelError::Encode(_) => "encode",
            LabelError::Other(_) => "other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_invalid_input_is_client_error() {
        assert!(LabelError::InvalidInput("empty".into()).is_client_error());
        assert!(!LabelError::RecognitionEngine("boom".into()).is_client_error());
        assert!(!LabelError::Render("quad".into()).is_client_error());
        assert!(!LabelError::Other(anyhow::anyhow!("x")).is_client_error());
    }

    #[test]
    fn display_includes_detail() {
        let err = LabelError::Render("quad has 3 points".into());
        assert_eq!(err.to_string(), "render error: quad has 3 points");
        assert_eq!(err.kind(), "render");
    }
}
