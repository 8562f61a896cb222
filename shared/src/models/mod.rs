//! Domain models for account registration

mod account;
mod registration;
mod restaurant;

pub use account::*;
pub use registration::*;
pub use restaurant::*;
