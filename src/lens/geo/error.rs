use crate::lens::target::InvalidInputError;
use thiserror::Error;

/// Reasons a geolocation lookup can fail
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    /// Input was rejected before any request was made
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),

    /// API key missing, invalid or revoked
    #[error("{0}")]
    Auth(String),

    /// Account credits or request rate exhausted
    #[error("{0}")]
    Quota(String),

    /// Non-success status or transport failure talking to the provider
    #[error("{message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    /// Provider answered but the payload is unusable
    #[error("{0}")]
    MalformedResponse(String),
}

impl LookupError {
    /// Map a non-2xx HTTP status from the provider
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => LookupError::Auth("API key is invalid or quota exceeded".to_string()),
            402 | 429 => LookupError::Quota("API request quota exceeded".to_string()),
            422 => LookupError::Upstream {
                status: Some(status),
                message: "Invalid IP address or domain name".to_string(),
            },
            _ => LookupError::Upstream {
                status: Some(status),
                message: format!("Failed to fetch IP data: {}", status),
            },
        }
    }

    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::InvalidInput(_) => "invalid_input",
            LookupError::Auth(_) => "auth",
            LookupError::Quota(_) => "quota",
            LookupError::Upstream { .. } => "upstream",
            LookupError::MalformedResponse(_) => "malformed_response",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens::target::INVALID_INPUT_MESSAGE;

    #[test]
    fn test_from_status() {
        assert_eq!(LookupError::from_status(403).kind(), "auth");
        assert_eq!(LookupError::from_status(401).kind(), "auth");
        assert_eq!(LookupError::from_status(429).kind(), "quota");
        assert_eq!(LookupError::from_status(402).kind(), "quota");
        assert_eq!(
            LookupError::from_status(422).to_string(),
            "Invalid IP address or domain name"
        );
        assert_eq!(
            LookupError::from_status(500),
            LookupError::Upstream {
                status: Some(500),
                message: "Failed to fetch IP data: 500".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_input_message() {
        let err: LookupError = InvalidInputError {
            input: "??".to_string(),
        }
        .into();
        assert_eq!(err.kind(), "invalid_input");
        assert_eq!(err.to_string(), INVALID_INPUT_MESSAGE);
    }
}
