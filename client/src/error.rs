//! Error handling for the Choplan registration client
//!
//! Provides user-facing messages in Korean and English

use shared::{Language, Rule};
use thiserror::Error;

use crate::external::{Operation, ResponseBody};

/// Errors reported by the registration and login flows
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistrationError {
    /// A local precondition failed; no request was issued
    #[error("Validation error: {rule}")]
    Validation { rule: Rule },

    /// The endpoint does not exist on the server (routing or deployment mismatch)
    #[error("Service unavailable: {operation} endpoint not found")]
    ServiceUnavailable { operation: Operation },

    /// The service was reachable but rejected the request
    #[error("Remote error: {message}")]
    Remote { status: Option<u16>, message: String },

    /// The service could not be reached
    #[error("Network error: {0}")]
    Network(String),
}

impl RegistrationError {
    pub fn validation(rule: Rule) -> Self {
        RegistrationError::Validation { rule }
    }

    /// Translate an account service failure raised while performing `operation`
    pub fn from_service(error: ServiceError, operation: Operation, language: Language) -> Self {
        match error {
            ServiceError::NotFound => RegistrationError::ServiceUnavailable { operation },
            ServiceError::Network(message) => RegistrationError::Network(message),
            ServiceError::Status { status, body } => RegistrationError::Remote {
                status: Some(status),
                message: crate::external::extract_message(
                    &body,
                    operation.fallback_message(language),
                ),
            },
            ServiceError::Decode(detail) => {
                tracing::warn!("Unexpected {} response: {}", operation, detail);
                RegistrationError::Remote {
                    status: None,
                    message: operation.fallback_message(language).to_string(),
                }
            }
        }
    }

    /// Message for the notification layer
    pub fn user_message(&self, language: Language) -> String {
        match (self, language) {
            (RegistrationError::Validation { rule }, _) => rule.message(language).to_string(),
            (RegistrationError::ServiceUnavailable { operation }, Language::Korean) => format!(
                "{} API 엔드포인트를 찾을 수 없습니다. 서버 설정을 확인해주세요.",
                operation.path()
            ),
            (RegistrationError::ServiceUnavailable { operation }, Language::English) => format!(
                "The server does not provide {}. Please check the backend configuration.",
                operation.path()
            ),
            (RegistrationError::Remote { message, .. }, _) => message.clone(),
            (RegistrationError::Network(_), Language::Korean) => {
                "서버에 연결할 수 없습니다. 백엔드 서버가 실행 중인지 확인해주세요.".to_string()
            }
            (RegistrationError::Network(_), Language::English) => {
                "Cannot reach the server. Please check your connection and that the backend is running."
                    .to_string()
            }
        }
    }

    pub fn rule(&self) -> Option<Rule> {
        match self {
            RegistrationError::Validation { rule } => Some(*rule),
            _ => None,
        }
    }
}

/// Transport-level failures of the account service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("endpoint not found")]
    NotFound,

    #[error("request failed with status {status}")]
    Status { status: u16, body: ResponseBody },

    #[error("network failure: {0}")]
    Network(String),

    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ServiceError::Decode(error.to_string())
        } else if error.is_timeout() {
            ServiceError::Network(format!("request timed out: {}", error))
        } else {
            ServiceError::Network(error.to_string())
        }
    }
}

/// Errors of the session store
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Result type alias for the registration and login flows
pub type RegistrationResult<T> = Result<T, RegistrationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_not_found_maps_to_service_unavailable() {
        let err = RegistrationError::from_service(
            ServiceError::NotFound,
            Operation::CheckUsername,
            Language::Korean,
        );
        assert_eq!(
            err,
            RegistrationError::ServiceUnavailable {
                operation: Operation::CheckUsername
            }
        );
    }

    #[test]
    fn test_status_maps_to_remote_with_extracted_message() {
        let err = RegistrationError::from_service(
            ServiceError::Status {
                status: 400,
                body: ResponseBody::Json(json!({"message": "인증 코드가 올바르지 않습니다."})),
            },
            Operation::Signup,
            Language::Korean,
        );
        assert_eq!(
            err,
            RegistrationError::Remote {
                status: Some(400),
                message: "인증 코드가 올바르지 않습니다.".to_string()
            }
        );
    }

    #[test]
    fn test_remote_falls_back_to_operation_message() {
        let err = RegistrationError::from_service(
            ServiceError::Status {
                status: 500,
                body: ResponseBody::Empty,
            },
            Operation::SendVerification,
            Language::English,
        );
        assert_eq!(
            err.user_message(Language::English),
            Operation::SendVerification.fallback_message(Language::English)
        );
    }

    #[test]
    fn test_network_message_mentions_server() {
        let err = RegistrationError::Network("connection refused".to_string());
        assert!(err.user_message(Language::Korean).contains("서버에 연결할 수 없습니다"));
        assert!(err.user_message(Language::English).contains("Cannot reach the server"));
    }

    #[test]
    fn test_validation_exposes_rule() {
        let err = RegistrationError::validation(Rule::PasswordMismatch);
        assert_eq!(err.rule(), Some(Rule::PasswordMismatch));
        assert_eq!(err.to_string(), "Validation error: Passwords do not match.");
    }
}
