//! Client-side validation rules for account registration
//!
//! These checks run before any request leaves the client. They are a
//! convenience for the user, the account service validates everything again.

/// Minimum and maximum username length
pub const USERNAME_MIN_LEN: usize = 4;
pub const USERNAME_MAX_LEN: usize = 20;

/// Minimum password length
pub const PASSWORD_MIN_LEN: usize = 8;

/// Symbols accepted as the "special character" of a password
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Length of the emailed verification code
pub const VERIFICATION_CODE_LEN: usize = 6;

// ============================================================================
// Account Validations
// ============================================================================

/// Check username format: 4-20 ASCII letters or digits
pub fn is_username_valid(username: &str) -> bool {
    let len = username.chars().count();
    (USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len)
        && username.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Validate username format
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.is_empty() {
        return Err("Username is required");
    }
    if !is_username_valid(username) {
        return Err("Username must be 4-20 letters or digits");
    }
    Ok(())
}

/// Check password strength: at least 8 characters with a letter, a digit and
/// a symbol from [`PASSWORD_SYMBOLS`]
pub fn is_password_valid(password: &str) -> bool {
    password.chars().count() >= PASSWORD_MIN_LEN
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err("Password must be at least 8 characters");
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err("Password must contain a letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain a digit");
    }
    if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
        return Err("Password must contain a special character");
    }
    Ok(())
}

/// Check email shape: `local@domain.tld`
///
/// The domain must contain a dot with at least one character on each side.
pub fn is_email_valid(email: &str) -> bool {
    let Some((_, domain)) = email.split_once('@') else {
        return false;
    };
    let has_inner_dot = domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());

    has_inner_dot && validator::validate_email(email)
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.is_empty() {
        return Err("Email is required");
    }
    if !is_email_valid(email) {
        return Err("Invalid email format");
    }
    Ok(())
}

/// Whether the verification code has the expected length.
///
/// This is an optimistic client-side signal only. The code itself is checked
/// by the account service when the account is created.
pub fn is_verification_code_complete(code: &str) -> bool {
    code.chars().count() == VERIFICATION_CODE_LEN
}
