//! Prefilled registration input for the command line client

use serde::Deserialize;
use shared::{FormField, NewRestaurant, RegistrationType, Role, SearchMode};

use crate::services::RegistrationWorkflow;

/// Restaurant lookup performed for an owner claiming an existing restaurant
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DraftSearch {
    pub query: String,
    #[serde(default)]
    pub mode: SearchMode,
}

/// Everything the registration screen asks for, except the emailed code
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignupDraft {
    pub username: String,
    pub password: String,
    /// Defaults to `password`
    #[serde(default)]
    pub password_confirm: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub registration_type: RegistrationType,
    #[serde(default)]
    pub restaurant_search: Option<DraftSearch>,
    #[serde(default)]
    pub new_restaurant: Option<NewRestaurant>,
}

impl SignupDraft {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Fill the workflow form as if the fields had been typed in
    pub fn apply(&self, workflow: &mut RegistrationWorkflow) {
        workflow.update_field(FormField::Username, self.username.as_str());
        workflow.update_field(FormField::Password, self.password.as_str());
        workflow.update_field(
            FormField::PasswordConfirm,
            self.password_confirm.as_deref().unwrap_or(self.password.as_str()),
        );
        workflow.update_field(FormField::Name, self.name.as_str());
        workflow.update_field(FormField::Email, self.email.as_str());
        workflow.update_field(FormField::Phone, self.phone.as_str());
        workflow.set_role(self.role);
        workflow.set_registration_type(self.registration_type);

        if let Some(restaurant) = &self.new_restaurant {
            workflow.update_field(FormField::RestaurantName, restaurant.name.as_str());
            workflow.update_field(
                FormField::BranchName,
                restaurant.branch_name.as_deref().unwrap_or_default(),
            );
            workflow.update_field(FormField::RoadAddress, restaurant.road_address.as_str());
            workflow.set_category(restaurant.category);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RegistrationError, RegistrationResult, ServiceError};
    use crate::external::AccountService;
    use crate::services::MemorySessionStore;
    use async_trait::async_trait;
    use shared::{
        AuthSession, Language, LoginRequest, RegistrationPath, RestaurantCategory,
        RestaurantSummary, Rule, SignupPayload,
    };
    use std::sync::Arc;

    struct Offline;

    #[async_trait]
    impl AccountService for Offline {
        async fn check_username(&self, _: &str) -> Result<(), ServiceError> {
            Err(ServiceError::Network("offline".to_string()))
        }
        async fn send_verification(&self, _: &str) -> Result<(), ServiceError> {
            Err(ServiceError::Network("offline".to_string()))
        }
        async fn resend_verification(&self, _: &str) -> Result<(), ServiceError> {
            Err(ServiceError::Network("offline".to_string()))
        }
        async fn search_restaurants(
            &self,
            _: &str,
            _: SearchMode,
        ) -> Result<Vec<RestaurantSummary>, ServiceError> {
            Ok(Vec::new())
        }
        async fn signup(
            &self,
            _: &SignupPayload,
        ) -> Result<AuthSession, ServiceError> {
            Err(ServiceError::Network("offline".to_string()))
        }
        async fn login(
            &self,
            _: &LoginRequest,
        ) -> Result<AuthSession, ServiceError> {
            Err(ServiceError::Network("offline".to_string()))
        }
    }

    fn workflow() -> RegistrationWorkflow {
        RegistrationWorkflow::new(
            Arc::new(Offline),
            Arc::new(MemorySessionStore::new()),
            Language::English,
        )
    }

    #[test]
    fn test_minimal_user_draft() {
        let draft = SignupDraft::from_json(
            r#"{"username":"ab12","password":"abc123!@","name":"Kim","email":"kim@choplan.kr"}"#,
        )
        .unwrap();
        assert_eq!(draft.role, Role::User);

        let mut wf = workflow();
        draft.apply(&mut wf);
        assert!(wf.validation().password_valid);
        assert!(wf.validation().password_match);
        assert_eq!(wf.form().email(), "kim@choplan.kr");
    }

    #[test]
    fn test_owner_new_restaurant_draft() {
        let draft = SignupDraft::from_json(
            r#"{
                "username": "owner1",
                "password": "abc123!@",
                "name": "Lee",
                "email": "lee@choplan.kr",
                "role": "OWNER",
                "registrationType": "NEW",
                "newRestaurant": {"name": "촙플랜", "roadAddress": "서울 강남구 테헤란로 1", "category": "분식"}
            }"#,
        )
        .unwrap();

        let mut wf = workflow();
        draft.apply(&mut wf);
        match wf.form().registration_path() {
            RegistrationPath::OwnerNew(restaurant) => {
                assert_eq!(restaurant.category, RestaurantCategory::Snack);
                assert!(restaurant.is_complete());
            }
            other => panic!("unexpected path {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_draft_alone_does_not_pass_the_gate() {
        let draft = SignupDraft::from_json(
            r#"{"username":"ab12","password":"abc123!@","name":"Kim","email":"kim@choplan.kr"}"#,
        )
        .unwrap();
        let mut wf = workflow();
        draft.apply(&mut wf);

        let result: RegistrationResult<_> = wf.submit().await;
        assert!(matches!(
            result,
            Err(RegistrationError::Validation { rule: Rule::UsernameNotConfirmed })
        ));
    }
}
