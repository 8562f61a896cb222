//! Registration and login flows

pub mod login;
pub mod requests;
pub mod session;
pub mod workflow;

pub use login::LoginController;
pub use requests::{Completion, RequestKind, RequestTracker, Ticket};
pub use session::{AuthOutcome, FileSessionStore, MemorySessionStore, SessionStore, StoredSession};
pub use workflow::{
    PendingSearch, PendingSignup, PendingUsernameCheck, PendingVerification,
    RegistrationWorkflow, RestaurantSearch, SubmissionPhase, UsernameStatus, DUPLICATE_MARKERS,
};
