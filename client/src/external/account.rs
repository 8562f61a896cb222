//! Account service client
//!
//! The account service owns identity, email verification and the restaurant
//! lookup used during signup. The workflow talks to it through the
//! [`AccountService`] trait; [`HttpAccountService`] is the REST implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use shared::{AuthSession, Language, LoginRequest, RestaurantSummary, SearchMode, SignupPayload};

use crate::config::ApiConfig;
use crate::error::ServiceError;
use crate::external::ResponseBody;

/// Account service operations, used for routing errors and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CheckUsername,
    SendVerification,
    ResendVerification,
    SearchRestaurants,
    Signup,
    Login,
}

impl Operation {
    pub fn path(&self) -> &'static str {
        match self {
            Operation::CheckUsername => "/auth/check-username",
            Operation::SendVerification => "/auth/send-verification",
            Operation::ResendVerification => "/auth/resend-verification",
            Operation::SearchRestaurants => "/restaurants/search-for-signup",
            Operation::Signup => "/auth/signup",
            Operation::Login => "/auth/login",
        }
    }

    /// Generic message used when an error body carries nothing readable
    pub fn fallback_message(&self, language: Language) -> &'static str {
        match (self, language) {
            (Operation::CheckUsername, Language::Korean) => "아이디 확인 중 오류가 발생했습니다.",
            (Operation::CheckUsername, Language::English) => "Could not check the username.",
            (Operation::SendVerification, Language::Korean) => "인증 코드 발송에 실패했습니다.",
            (Operation::SendVerification, Language::English) => {
                "Could not send the verification code."
            }
            (Operation::ResendVerification, Language::Korean) => "인증 코드 재발송에 실패했습니다.",
            (Operation::ResendVerification, Language::English) => {
                "Could not resend the verification code."
            }
            (Operation::SearchRestaurants, Language::Korean) => "식당 검색 중 오류가 발생했습니다.",
            (Operation::SearchRestaurants, Language::English) => "Restaurant search failed.",
            (Operation::Signup, Language::Korean) | (Operation::Login, Language::Korean) => {
                "오류가 발생했습니다."
            }
            (Operation::Signup, Language::English) => "Sign-up failed.",
            (Operation::Login, Language::English) => "Sign-in failed.",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Remote account service
#[async_trait]
pub trait AccountService: Send + Sync {
    /// `Ok(())` means the username is free
    async fn check_username(&self, username: &str) -> Result<(), ServiceError>;

    async fn send_verification(&self, email: &str) -> Result<(), ServiceError>;

    async fn resend_verification(&self, email: &str) -> Result<(), ServiceError>;

    async fn search_restaurants(
        &self,
        query: &str,
        mode: SearchMode,
    ) -> Result<Vec<RestaurantSummary>, ServiceError>;

    async fn signup(&self, payload: &SignupPayload) -> Result<AuthSession, ServiceError>;

    async fn login(&self, request: &LoginRequest) -> Result<AuthSession, ServiceError>;
}

/// REST client for the account service
#[derive(Clone)]
pub struct HttpAccountService {
    client: Client,
    auth_base_url: String,
    restaurants_base_url: String,
}

impl HttpAccountService {
    /// Create a new HttpAccountService from the API settings
    pub fn new(config: &ApiConfig) -> Result<Self, ServiceError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            auth_base_url: config.auth_base_url.trim_end_matches('/').to_string(),
            restaurants_base_url: config.restaurants_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client serving everything from one base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            restaurants_base_url: format!("{}/restaurants", base_url),
            auth_base_url: base_url,
        }
    }

    fn auth_url(&self, operation: Operation) -> String {
        format!("{}{}", self.auth_base_url, operation.path())
    }

    /// Turn a non-2xx response into a [`ServiceError`]
    async fn ensure_success(response: Response) -> Result<Response, ServiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ServiceError::NotFound);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ServiceError::Status {
            status: status.as_u16(),
            body: ResponseBody::from_text(body),
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ServiceError::Decode(e.to_string()))
    }

    async fn post_email(&self, operation: Operation, email: &str) -> Result<(), ServiceError> {
        let response = self
            .client
            .post(self.auth_url(operation))
            .json(&json!({ "email": email }))
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl AccountService for HttpAccountService {
    async fn check_username(&self, username: &str) -> Result<(), ServiceError> {
        let response = self
            .client
            .get(self.auth_url(Operation::CheckUsername))
            .query(&[("username", username)])
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn send_verification(&self, email: &str) -> Result<(), ServiceError> {
        self.post_email(Operation::SendVerification, email).await
    }

    async fn resend_verification(&self, email: &str) -> Result<(), ServiceError> {
        self.post_email(Operation::ResendVerification, email).await
    }

    async fn search_restaurants(
        &self,
        query: &str,
        mode: SearchMode,
    ) -> Result<Vec<RestaurantSummary>, ServiceError> {
        let url = format!("{}/search-for-signup", self.restaurants_base_url);
        let response = self
            .client
            .get(url)
            .query(&[("query", query), ("type", mode.as_param())])
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let text = response.text().await?;
        if text.trim().is_empty() || text.trim() == "null" {
            return Ok(Vec::new());
        }
        serde_json::from_str(&text).map_err(|e| ServiceError::Decode(e.to_string()))
    }

    async fn signup(&self, payload: &SignupPayload) -> Result<AuthSession, ServiceError> {
        let response = self
            .client
            .post(self.auth_url(Operation::Signup))
            .json(payload)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Self::read_json(response).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthSession, ServiceError> {
        let response = self
            .client
            .post(self.auth_url(Operation::Login))
            .json(request)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Self::read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_paths() {
        assert_eq!(Operation::CheckUsername.path(), "/auth/check-username");
        assert_eq!(Operation::ResendVerification.to_string(), "/auth/resend-verification");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let service = HttpAccountService::with_base_url("http://localhost:8080/api/demo/");
        assert_eq!(
            service.auth_url(Operation::Signup),
            "http://localhost:8080/api/demo/auth/signup"
        );
        assert_eq!(
            service.restaurants_base_url,
            "http://localhost:8080/api/demo/restaurants"
        );
    }

    #[test]
    fn test_new_uses_both_base_urls() {
        let config = ApiConfig {
            auth_base_url: "http://api.test/demo".to_string(),
            restaurants_base_url: "http://api.test/restaurants/".to_string(),
            request_timeout_secs: Some(5),
        };
        let service = HttpAccountService::new(&config).unwrap();
        assert_eq!(service.auth_url(Operation::Login), "http://api.test/demo/auth/login");
        assert_eq!(service.restaurants_base_url, "http://api.test/restaurants");
    }
}
