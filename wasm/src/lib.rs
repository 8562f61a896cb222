//! WebAssembly module for the Choplan registration screen
//!
//! Provides client-side checks for:
//! - Username, password and email formats
//! - Verification code completeness
//! - Validation flags and the submission gate of a whole form

use shared::validation;
use shared::{Language, RegistrationForm, RestaurantCategory};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::debug_1(&JsValue::from_str("choplan signup checks loaded"));
}

#[wasm_bindgen]
pub fn is_username_valid(username: &str) -> bool {
    validation::is_username_valid(username)
}

#[wasm_bindgen]
pub fn is_password_valid(password: &str) -> bool {
    validation::is_password_valid(password)
}

#[wasm_bindgen]
pub fn is_email_valid(email: &str) -> bool {
    validation::is_email_valid(email)
}

#[wasm_bindgen]
pub fn is_verification_code_complete(code: &str) -> bool {
    validation::is_verification_code_complete(code)
}

/// Recompute the validation flags of a form given as JSON
#[wasm_bindgen]
pub fn validation_state(form_json: &str) -> Result<String, JsValue> {
    form_validation_json(form_json).map_err(|e| JsValue::from_str(&e))
}

/// Run the submission gate on a form given as JSON.
///
/// Returns the signup payload as JSON, or throws the message of the first
/// violated rule in the requested language (`"ko"` or `"en"`).
#[wasm_bindgen]
pub fn check_signup_form(form_json: &str, language: &str) -> Result<String, JsValue> {
    signup_payload_json(form_json, parse_language(language)).map_err(|e| JsValue::from_str(&e))
}

/// Category labels in picker order
#[wasm_bindgen]
pub fn restaurant_categories() -> js_sys::Array {
    RestaurantCategory::ALL
        .iter()
        .map(|category| JsValue::from_str(category.label()))
        .collect()
}

fn parse_language(code: &str) -> Language {
    match code.to_ascii_lowercase().as_str() {
        "en" | "english" => Language::English,
        _ => Language::Korean,
    }
}

fn parse_form(form_json: &str) -> Result<RegistrationForm, String> {
    let mut form: RegistrationForm =
        serde_json::from_str(form_json).map_err(|e| format!("Invalid form JSON: {}", e))?;
    form.revalidate();
    Ok(form)
}

fn form_validation_json(form_json: &str) -> Result<String, String> {
    let form = parse_form(form_json)?;
    serde_json::to_string(form.validation()).map_err(|e| e.to_string())
}

fn signup_payload_json(form_json: &str, language: Language) -> Result<String, String> {
    let form = parse_form(form_json)?;
    let payload = form
        .check_submission()
        .map_err(|rule| rule.message(language).to_string())?;
    serde_json::to_string(&payload).map_err(|e| e.to_string())
}
