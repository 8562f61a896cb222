//! Choplan account registration client
//!
//! Drives the signup workflow of the Choplan restaurant platform against its
//! account service: username availability, email verification, restaurant
//! lookup for owners and account creation, plus sign-in and sign-out.

pub mod config;
pub mod draft;
pub mod error;
pub mod external;
pub mod services;

pub use config::Config;
pub use error::{RegistrationError, RegistrationResult, ServiceError, SessionError};
pub use external::{AccountService, HttpAccountService, Operation};
pub use services::{
    AuthOutcome, Completion, FileSessionStore, LoginController, MemorySessionStore,
    RegistrationWorkflow, SessionStore, SubmissionPhase, UsernameStatus,
};
