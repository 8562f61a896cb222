//! Browser tests for the exported bindings
//!
//! Run with `wasm-pack test --headless --chrome wasm`

#![cfg(target_arch = "wasm32")]

use choplan_signup_wasm::{
    check_signup_form, is_username_valid, restaurant_categories, validation_state,
};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const INCOMPLETE_FORM: &str = r#"{"username":"ab12","password":"abc123!@","passwordConfirm":"abc123!@","verificationCode":"123"}"#;

#[wasm_bindgen_test]
fn categories_are_exported_in_picker_order() {
    let categories = restaurant_categories();
    assert_eq!(categories.length(), 12);
    assert_eq!(categories.get(0).as_string().as_deref(), Some("한식"));
}

#[wasm_bindgen_test]
fn username_format_check() {
    assert!(is_username_valid("ab12"));
    assert!(!is_username_valid("ab"));
}

#[wasm_bindgen_test]
fn incomplete_form_is_rejected() {
    let err = check_signup_form(INCOMPLETE_FORM, "en").unwrap_err();
    assert!(err.as_string().is_some());
}

#[wasm_bindgen_test]
fn malformed_json_throws() {
    assert!(validation_state("{not json").is_err());
}
