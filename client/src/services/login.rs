//! Sign-in and sign-out for existing accounts

use std::sync::Arc;

use shared::{Language, LoginRequest, Rule};
use tracing::{info, warn};

use crate::error::{RegistrationError, RegistrationResult, SessionError};
use crate::external::{AccountService, Operation};
use crate::services::session::{AuthOutcome, SessionStore, StoredSession};

/// Sign-in and sign-out against the account service
pub struct LoginController {
    service: Arc<dyn AccountService>,
    sessions: Arc<dyn SessionStore>,
    language: Language,
}

impl LoginController {
    pub fn new(
        service: Arc<dyn AccountService>,
        sessions: Arc<dyn SessionStore>,
        language: Language,
    ) -> Self {
        Self {
            service,
            sessions,
            language,
        }
    }

    pub async fn sign_in(&self, username: &str, password: &str) -> RegistrationResult<AuthOutcome> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(RegistrationError::validation(Rule::CredentialsRequired));
        }

        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let session = self.service.login(&request).await.map_err(|e| {
            warn!("Login for {} failed: {}", username, e);
            RegistrationError::from_service(e, Operation::Login, self.language)
        })?;

        if let Err(e) = self.sessions.save(&session) {
            warn!("Could not store the session of {}: {}", username, e);
        }
        info!("{} signed in as {}", username, session.role);
        Ok(AuthOutcome::from(session))
    }

    pub fn sign_out(&self) -> Result<(), SessionError> {
        self.sessions.clear()?;
        info!("Signed out");
        Ok(())
    }

    /// The session left by an earlier signup or login, if any
    pub fn current_session(&self) -> Result<Option<StoredSession>, SessionError> {
        self.sessions.load()
    }
}
