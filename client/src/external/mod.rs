//! External API integrations

pub mod account;
pub mod response;

pub use account::{AccountService, HttpAccountService, Operation};
pub use response::{extract_message, ResponseBody};
