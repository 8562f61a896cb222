//! Shared types and models for the Choplan registration client
//!
//! This crate contains the registration form, its validation rules and the
//! wire types exchanged with the account service. It is used by the native
//! client and by the browser frontend (via WASM).

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
