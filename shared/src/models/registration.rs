//! Registration form, its derived validation state and the submission gate

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    NewRestaurant, RegistrationType, RestaurantCategory, RestaurantSelection, Role,
};
use crate::types::Language;
use crate::validation::{is_password_valid, is_verification_code_complete};

/// Text fields of the registration form
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Username,
    Password,
    PasswordConfirm,
    Name,
    Email,
    Phone,
    VerificationCode,
    RestaurantName,
    BranchName,
    RoadAddress,
}

/// A field name the form does not know
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown form field: {0}")]
pub struct UnknownField(pub String);

impl std::str::FromStr for FormField {
    type Err = UnknownField;

    /// Parses the input names used by the web frontend
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "username" => Ok(FormField::Username),
            "password" => Ok(FormField::Password),
            "passwordConfirm" => Ok(FormField::PasswordConfirm),
            "name" => Ok(FormField::Name),
            "email" => Ok(FormField::Email),
            "phone" => Ok(FormField::Phone),
            "verificationCode" | "emailVerificationCode" => Ok(FormField::VerificationCode),
            "restaurantName" => Ok(FormField::RestaurantName),
            "branchName" => Ok(FormField::BranchName),
            "roadAddress" => Ok(FormField::RoadAddress),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// Validation flags derived from the form
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationState {
    pub username_checked: bool,
    /// Only meaningful while `username_checked` is set
    pub username_available: bool,
    pub password_valid: bool,
    pub password_match: bool,
    pub email_code_sent: bool,
    /// Code has the expected length; the service verifies the code itself
    pub email_verified: bool,
}

/// Precondition rules enforced before a request is issued
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    UsernameFormat,
    UsernameNotConfirmed,
    PasswordStrength,
    PasswordMismatch,
    EmailFormat,
    EmailNotVerified,
    RestaurantNotSelected,
    NewRestaurantIncomplete,
    CredentialsRequired,
    AlreadySubmitted,
}

impl Rule {
    pub fn message(&self, language: Language) -> &'static str {
        match (self, language) {
            (Rule::UsernameFormat, Language::Korean) => "아이디는 영문, 숫자로 4-20자로 입력해주세요.",
            (Rule::UsernameFormat, Language::English) => {
                "Username must be 4-20 letters or digits."
            }
            (Rule::UsernameNotConfirmed, Language::Korean) => "아이디 중복확인을 해주세요.",
            (Rule::UsernameNotConfirmed, Language::English) => {
                "Please confirm that the username is available."
            }
            (Rule::PasswordStrength, Language::Korean) => {
                "비밀번호는 8자 이상, 영문/숫자/특수문자를 포함해야 합니다."
            }
            (Rule::PasswordStrength, Language::English) => {
                "Password needs 8+ characters with a letter, a digit and a symbol."
            }
            (Rule::PasswordMismatch, Language::Korean) => "비밀번호가 일치하지 않습니다.",
            (Rule::PasswordMismatch, Language::English) => "Passwords do not match.",
            (Rule::EmailFormat, Language::Korean) => "올바른 이메일 형식을 입력해주세요.",
            (Rule::EmailFormat, Language::English) => "Please enter a valid email address.",
            (Rule::EmailNotVerified, Language::Korean) => "이메일 인증을 완료해주세요.",
            (Rule::EmailNotVerified, Language::English) => {
                "Please enter the 6-character verification code."
            }
            (Rule::RestaurantNotSelected, Language::Korean) => "식당을 검색하여 선택해주세요.",
            (Rule::RestaurantNotSelected, Language::English) => {
                "Please search for and select your restaurant."
            }
            (Rule::NewRestaurantIncomplete, Language::Korean) => {
                "매장명과 주소는 필수 입력 항목입니다."
            }
            (Rule::NewRestaurantIncomplete, Language::English) => {
                "Restaurant name and address are required."
            }
            (Rule::CredentialsRequired, Language::Korean) => "아이디와 비밀번호를 입력해주세요.",
            (Rule::CredentialsRequired, Language::English) => {
                "Please enter your username and password."
            }
            (Rule::AlreadySubmitted, Language::Korean) => "이미 회원가입이 처리되었습니다.",
            (Rule::AlreadySubmitted, Language::English) => {
                "This registration has already been submitted."
            }
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message(Language::English))
    }
}

/// Which branch of the registration the form is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationPath<'a> {
    User,
    OwnerExisting(Option<&'a RestaurantSelection>),
    OwnerNew(&'a NewRestaurant),
    Admin,
}

/// Restaurant part of the signup payload
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RestaurantClaim {
    ByCode {
        #[serde(rename = "restaurantCode")]
        restaurant_code: String,
    },
    ById {
        #[serde(rename = "restaurantId")]
        restaurant_id: i64,
    },
    New {
        #[serde(rename = "restaurantName")]
        restaurant_name: String,
        #[serde(rename = "branchName")]
        branch_name: Option<String>,
        #[serde(rename = "roadAddress")]
        road_address: String,
        category: RestaurantCategory,
    },
}

impl RestaurantClaim {
    /// A code wins over an id when the selection carries both
    fn from_selection(selection: &RestaurantSelection) -> Option<Self> {
        let code = selection
            .code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        match (code, selection.id) {
            (Some(code), _) => Some(RestaurantClaim::ByCode {
                restaurant_code: code.to_string(),
            }),
            (None, Some(id)) => Some(RestaurantClaim::ById { restaurant_id: id }),
            (None, None) => None,
        }
    }

    fn from_new(restaurant: &NewRestaurant) -> Self {
        RestaurantClaim::New {
            restaurant_name: restaurant.name.trim().to_string(),
            branch_name: restaurant
                .branch_name
                .as_deref()
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(str::to_string),
            road_address: restaurant.road_address.trim().to_string(),
            category: restaurant.category,
        }
    }
}

/// Body of the create-account request
#[derive(Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    pub username: String,
    pub password: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub verification_code: String,
    #[serde(flatten)]
    pub restaurant: Option<RestaurantClaim>,
}

impl std::fmt::Debug for SignupPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupPayload")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("role", &self.role)
            .field("verification_code", &self.verification_code)
            .field("restaurant", &self.restaurant)
            .finish()
    }
}

/// Form state for one registration attempt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationForm {
    username: String,
    password: String,
    password_confirm: String,
    name: String,
    email: String,
    phone: String,
    verification_code: String,
    role: Role,
    registration_type: RegistrationType,
    restaurant_selection: Option<RestaurantSelection>,
    new_restaurant: NewRestaurant,
    validation: ValidationState,
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a text field and recompute the validation flags that depend on it.
    ///
    /// Changing the email keeps `email_code_sent`, so the next code for the
    /// new address goes through the resend endpoint.
    pub fn update(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Username => {
                self.username = value;
                self.validation.username_checked = false;
                self.validation.username_available = false;
            }
            FormField::Password => {
                self.password = value;
                self.validation.password_valid = is_password_valid(&self.password);
                self.validation.password_match = self.password == self.password_confirm;
            }
            FormField::PasswordConfirm => {
                self.password_confirm = value;
                self.validation.password_match = self.password == self.password_confirm;
            }
            FormField::Name => self.name = value,
            FormField::Email => self.email = value,
            FormField::Phone => self.phone = value,
            FormField::VerificationCode => {
                self.verification_code = value;
                self.validation.email_verified =
                    is_verification_code_complete(&self.verification_code);
            }
            FormField::RestaurantName => self.new_restaurant.name = value,
            FormField::BranchName => {
                self.new_restaurant.branch_name = Some(value).filter(|b| !b.is_empty());
            }
            FormField::RoadAddress => self.new_restaurant.road_address = value,
        }
    }

    /// Recompute every flag that is a pure function of the fields.
    ///
    /// Needed after deserializing a form captured elsewhere.
    pub fn revalidate(&mut self) {
        self.validation.password_valid = is_password_valid(&self.password);
        self.validation.password_match = self.password == self.password_confirm;
        self.validation.email_verified = is_verification_code_complete(&self.verification_code);
        if !self.validation.username_checked {
            self.validation.username_available = false;
        }
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    pub fn set_registration_type(&mut self, registration_type: RegistrationType) {
        self.registration_type = registration_type;
    }

    pub fn set_category(&mut self, category: RestaurantCategory) {
        self.new_restaurant.category = category;
    }

    pub fn select_restaurant(&mut self, selection: RestaurantSelection) {
        self.restaurant_selection = Some(selection);
    }

    pub fn clear_restaurant_selection(&mut self) {
        self.restaurant_selection = None;
    }

    /// Record the answer of a username availability check
    pub fn mark_username_checked(&mut self, available: bool) {
        self.validation.username_checked = true;
        self.validation.username_available = available;
    }

    pub fn mark_code_sent(&mut self) {
        self.validation.email_code_sent = true;
    }

    pub fn validation(&self) -> &ValidationState {
        &self.validation
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn registration_type(&self) -> RegistrationType {
        self.registration_type
    }

    pub fn restaurant_selection(&self) -> Option<&RestaurantSelection> {
        self.restaurant_selection.as_ref()
    }

    pub fn new_restaurant(&self) -> &NewRestaurant {
        &self.new_restaurant
    }

    pub fn registration_path(&self) -> RegistrationPath<'_> {
        match (self.role, self.registration_type) {
            (Role::User, _) => RegistrationPath::User,
            (Role::Admin, _) => RegistrationPath::Admin,
            (Role::Owner, RegistrationType::Existing) => {
                RegistrationPath::OwnerExisting(self.restaurant_selection.as_ref())
            }
            (Role::Owner, RegistrationType::New) => RegistrationPath::OwnerNew(&self.new_restaurant),
        }
    }

    /// Run the submission gate and build the payload.
    ///
    /// Rules are checked in a fixed order and the first violation is returned:
    /// username, password strength, password match, email verification, then
    /// the restaurant requirement of the owner paths.
    pub fn check_submission(&self) -> Result<SignupPayload, Rule> {
        let v = &self.validation;
        if !(v.username_checked && v.username_available) {
            return Err(Rule::UsernameNotConfirmed);
        }
        if !v.password_valid {
            return Err(Rule::PasswordStrength);
        }
        if !v.password_match {
            return Err(Rule::PasswordMismatch);
        }
        if !v.email_verified {
            return Err(Rule::EmailNotVerified);
        }

        let restaurant = match self.registration_path() {
            RegistrationPath::User | RegistrationPath::Admin => None,
            RegistrationPath::OwnerExisting(selection) => {
                let claim = selection.and_then(RestaurantClaim::from_selection);
                Some(claim.ok_or(Rule::RestaurantNotSelected)?)
            }
            RegistrationPath::OwnerNew(restaurant) => {
                if !restaurant.is_complete() {
                    return Err(Rule::NewRestaurantIncomplete);
                }
                Some(RestaurantClaim::from_new(restaurant))
            }
        };

        Ok(SignupPayload {
            username: self.username.clone(),
            password: self.password.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            role: self.role,
            verification_code: self.verification_code.clone(),
            restaurant,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn ready_form() -> RegistrationForm {
        let mut form = RegistrationForm::new();
        form.update(FormField::Username, "ab12");
        form.mark_username_checked(true);
        form.update(FormField::Password, "abc123!@");
        form.update(FormField::PasswordConfirm, "abc123!@");
        form.update(FormField::Name, "김철수");
        form.update(FormField::Email, "chulsoo@choplan.kr");
        form.update(FormField::Phone, "01012345678");
        form.update(FormField::VerificationCode, "123456");
        form
    }

    #[test]
    fn test_field_names_from_frontend() {
        assert_eq!("passwordConfirm".parse::<FormField>(), Ok(FormField::PasswordConfirm));
        assert_eq!("emailVerificationCode".parse::<FormField>(), Ok(FormField::VerificationCode));
        assert_eq!(
            "nickname".parse::<FormField>(),
            Err(UnknownField("nickname".to_string()))
        );
    }

    #[test]
    fn test_username_edit_resets_check() {
        let mut form = ready_form();
        assert!(form.validation().username_available);

        form.update(FormField::Username, "ab123");
        assert!(!form.validation().username_checked);
        assert!(!form.validation().username_available);
    }

    #[test]
    fn test_password_match_either_order() {
        let mut form = RegistrationForm::new();
        form.update(FormField::PasswordConfirm, "abc123!@");
        form.update(FormField::Password, "abc123!@");
        assert!(form.validation().password_match);

        form.update(FormField::PasswordConfirm, "abc123!");
        assert!(!form.validation().password_match);
        assert!(form.validation().password_valid);
    }

    #[test]
    fn test_email_edit_keeps_code_sent() {
        let mut form = RegistrationForm::new();
        form.update(FormField::Email, "chulsoo@choplan.kr");
        form.mark_code_sent();

        form.update(FormField::Email, "younghee@choplan.kr");
        assert!(form.validation().email_code_sent);
    }

    #[test]
    fn test_code_length_drives_email_verified() {
        let mut form = RegistrationForm::new();
        form.update(FormField::VerificationCode, "12345");
        assert!(!form.validation().email_verified);
        form.update(FormField::VerificationCode, "123456");
        assert!(form.validation().email_verified);
    }

    #[test]
    fn test_user_payload_has_no_restaurant_fields() {
        let payload = ready_form().check_submission().unwrap();
        let body = serde_json::to_value(&payload).unwrap();

        assert_eq!(body["username"], "ab12");
        assert_eq!(body["role"], "USER");
        assert_eq!(body["verificationCode"], "123456");
        assert!(body.get("restaurantCode").is_none());
        assert!(body.get("restaurantName").is_none());
    }

    #[test]
    fn test_gate_reports_first_violation() {
        let mut form = ready_form();
        form.update(FormField::Password, "short");
        form.update(FormField::VerificationCode, "1");
        assert_eq!(form.check_submission(), Err(Rule::PasswordStrength));

        form.update(FormField::Username, "other1");
        assert_eq!(form.check_submission(), Err(Rule::UsernameNotConfirmed));
    }

    #[test]
    fn test_owner_existing_requires_selection() {
        let mut form = ready_form();
        form.set_role(Role::Owner);
        assert_eq!(form.check_submission(), Err(Rule::RestaurantNotSelected));

        form.select_restaurant(RestaurantSelection {
            id: Some(9),
            code: None,
        });
        let body = serde_json::to_value(form.check_submission().unwrap()).unwrap();
        assert_eq!(body["restaurantId"], 9);
        assert_eq!(body["role"], "OWNER");
    }

    #[test]
    fn test_restaurant_code_wins_over_id() {
        let mut form = ready_form();
        form.set_role(Role::Owner);
        form.select_restaurant(RestaurantSelection {
            id: Some(9),
            code: Some("R-009".to_string()),
        });

        let body = serde_json::to_value(form.check_submission().unwrap()).unwrap();
        assert_eq!(body["restaurantCode"], "R-009");
        assert!(body.get("restaurantId").is_none());
    }

    #[test]
    fn test_owner_new_restaurant_payload() {
        let mut form = ready_form();
        form.set_role(Role::Owner);
        form.set_registration_type(RegistrationType::New);
        form.update(FormField::RestaurantName, "새 식당");
        assert_eq!(form.check_submission(), Err(Rule::NewRestaurantIncomplete));

        form.update(FormField::RoadAddress, "서울 마포구 월드컵로 1");
        form.set_category(RestaurantCategory::Chicken);
        let body = serde_json::to_value(form.check_submission().unwrap()).unwrap();

        assert_eq!(body["restaurantName"], "새 식당");
        assert_eq!(body["roadAddress"], "서울 마포구 월드컵로 1");
        assert_eq!(body["branchName"], Value::Null);
        assert_eq!(body["category"], json!("치킨"));
    }

    #[test]
    fn test_admin_ignores_restaurant_data() {
        let mut form = ready_form();
        form.set_role(Role::Admin);
        form.set_registration_type(RegistrationType::New);
        assert_eq!(form.registration_path(), RegistrationPath::Admin);
        assert!(form.check_submission().unwrap().restaurant.is_none());
    }

    #[test]
    fn test_payload_debug_hides_password() {
        let payload = ready_form().check_submission().unwrap();
        let printed = format!("{:?}", payload);
        assert!(!printed.contains("abc123!@"));
    }

    #[test]
    fn test_revalidate_after_deserialize() {
        let form: RegistrationForm = serde_json::from_value(json!({
            "username": "ab12",
            "password": "abc123!@",
            "passwordConfirm": "abc123!@",
            "verificationCode": "654321",
            "validation": { "usernameChecked": false, "usernameAvailable": true }
        }))
        .unwrap();
        let mut form = form;
        form.revalidate();

        let v = form.validation();
        assert!(v.password_valid && v.password_match && v.email_verified);
        assert!(!v.username_available);
    }
}
