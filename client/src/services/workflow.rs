//! Registration workflow controller
//!
//! Owns the form of one registration attempt, drives the account service and
//! decides which responses are still relevant. Every asynchronous step is
//! available as a single `async fn` and as a `begin_*` / `finish_*` pair; the
//! pair lets an event-loop host keep several requests in flight and feed the
//! responses back in whatever order they arrive.

use std::sync::Arc;

use shared::{
    is_email_valid, is_username_valid, AuthSession, FormField, Language, Notice, NoticeKind,
    RegistrationForm, RegistrationType, RestaurantCategory, RestaurantSummary, Role, Rule,
    SearchMode, SignupPayload, ValidationState,
};
use tracing::{debug, info, warn};

use crate::error::{RegistrationError, RegistrationResult, ServiceError};
use crate::external::{AccountService, Operation};
use crate::services::requests::{Completion, RequestKind, RequestTracker, Ticket};
use crate::services::session::{AuthOutcome, SessionStore};

/// Body fragments the service uses to report a username that is taken
pub const DUPLICATE_MARKERS: &[&str] = &["존재", "사용 중", "duplicate", "already"];

/// Where the submission currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    /// Form is editable; also the state after a blocked or failed submit
    #[default]
    Editing,
    /// Create-account request in flight
    Submitting,
    /// Account created; terminal
    Succeeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsernameStatus {
    Available,
    Taken,
}

/// Transient restaurant search state shown next to the form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestaurantSearch {
    query: String,
    mode: SearchMode,
    results: Vec<RestaurantSummary>,
    visible: bool,
}

impl RestaurantSearch {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn results(&self) -> &[RestaurantSummary] {
        &self.results
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    fn hide(&mut self) {
        self.results.clear();
        self.visible = false;
    }
}

#[derive(Debug, Clone)]
pub struct PendingUsernameCheck {
    ticket: Ticket,
    username: String,
}

impl PendingUsernameCheck {
    pub fn username(&self) -> &str {
        &self.username
    }
}

#[derive(Debug, Clone)]
pub struct PendingVerification {
    ticket: Ticket,
    email: String,
    operation: Operation,
}

impl PendingVerification {
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Send or resend, depending on whether a code was already sent
    pub fn operation(&self) -> Operation {
        self.operation
    }
}

#[derive(Debug, Clone)]
pub struct PendingSearch {
    ticket: Ticket,
    query: String,
    mode: SearchMode,
}

impl PendingSearch {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }
}

#[derive(Debug, Clone)]
pub struct PendingSignup {
    ticket: Ticket,
    payload: SignupPayload,
}

impl PendingSignup {
    pub fn payload(&self) -> &SignupPayload {
        &self.payload
    }
}

pub struct RegistrationWorkflow {
    service: Arc<dyn AccountService>,
    sessions: Arc<dyn SessionStore>,
    language: Language,
    form: RegistrationForm,
    search: RestaurantSearch,
    requests: RequestTracker,
    phase: SubmissionPhase,
    notices: Vec<Notice>,
}

impl RegistrationWorkflow {
    pub fn new(
        service: Arc<dyn AccountService>,
        sessions: Arc<dyn SessionStore>,
        language: Language,
    ) -> Self {
        Self {
            service,
            sessions,
            language,
            form: RegistrationForm::new(),
            search: RestaurantSearch::default(),
            requests: RequestTracker::new(),
            phase: SubmissionPhase::Editing,
            notices: Vec::new(),
        }
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn validation(&self) -> &ValidationState {
        self.form.validation()
    }

    pub fn search(&self) -> &RestaurantSearch {
        &self.search
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn is_pending(&self, kind: RequestKind) -> bool {
        self.requests.is_pending(kind)
    }

    pub fn is_closed(&self) -> bool {
        self.requests.is_closed()
    }

    /// Take the notices queued since the last call
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, kind: NoticeKind) {
        self.notices.push(Notice::new(kind));
    }

    fn service_error(&self, error: ServiceError, operation: Operation) -> RegistrationError {
        warn!("{} failed: {}", operation, error);
        RegistrationError::from_service(error, operation, self.language)
    }

    // ---- Form editing ----

    pub fn update_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form.update(field, value);
        match field {
            FormField::Username => self.requests.invalidate(RequestKind::UsernameCheck),
            // A send still in flight was for the previous address
            FormField::Email => self.requests.invalidate(RequestKind::Verification),
            _ => {}
        }
    }

    pub fn set_role(&mut self, role: Role) {
        self.form.set_role(role);
    }

    pub fn set_registration_type(&mut self, registration_type: RegistrationType) {
        self.form.set_registration_type(registration_type);
    }

    pub fn set_category(&mut self, category: RestaurantCategory) {
        self.form.set_category(category);
    }

    // ---- Username availability ----

    pub fn begin_username_check(&mut self) -> RegistrationResult<PendingUsernameCheck> {
        let username = self.form.username().to_string();
        if !is_username_valid(&username) {
            return Err(RegistrationError::validation(Rule::UsernameFormat));
        }

        let ticket = self.requests.issue(RequestKind::UsernameCheck);
        debug!("Checking username {} (request {})", username, ticket.seq());
        Ok(PendingUsernameCheck { ticket, username })
    }

    pub fn finish_username_check(
        &mut self,
        pending: PendingUsernameCheck,
        outcome: Result<(), ServiceError>,
    ) -> RegistrationResult<Completion<UsernameStatus>> {
        if !self.requests.settle(&pending.ticket) {
            debug!("Discarding stale username check {}", pending.ticket.seq());
            return Ok(Completion::Discarded);
        }

        let status = match outcome {
            Ok(()) => UsernameStatus::Available,
            Err(ServiceError::Status { status: 409, .. }) => UsernameStatus::Taken,
            Err(ServiceError::Status { ref body, .. }) if body.contains_any(DUPLICATE_MARKERS) => {
                UsernameStatus::Taken
            }
            Err(error) => return Err(self.service_error(error, Operation::CheckUsername)),
        };

        let available = status == UsernameStatus::Available;
        self.form.mark_username_checked(available);
        self.notify(if available {
            NoticeKind::UsernameAvailable
        } else {
            NoticeKind::UsernameTaken
        });
        info!("Username {} is {}", pending.username, if available { "available" } else { "taken" });

        Ok(Completion::Applied(status))
    }

    pub async fn check_username_availability(
        &mut self,
    ) -> RegistrationResult<Completion<UsernameStatus>> {
        let pending = self.begin_username_check()?;
        let outcome = self.service.check_username(pending.username()).await;
        self.finish_username_check(pending, outcome)
    }

    // ---- Email verification ----

    /// Start sending a verification code.
    ///
    /// The resend endpoint is used as soon as a code has been sent once,
    /// whichever of the two entry points the caller used.
    pub fn begin_verification(&mut self) -> RegistrationResult<PendingVerification> {
        let email = self.form.email().to_string();
        if !is_email_valid(&email) {
            return Err(RegistrationError::validation(Rule::EmailFormat));
        }

        let operation = if self.form.validation().email_code_sent {
            Operation::ResendVerification
        } else {
            Operation::SendVerification
        };
        let ticket = self.requests.issue(RequestKind::Verification);
        debug!("{} for {} (request {})", operation, email, ticket.seq());
        Ok(PendingVerification {
            ticket,
            email,
            operation,
        })
    }

    pub fn finish_verification(
        &mut self,
        pending: PendingVerification,
        outcome: Result<(), ServiceError>,
    ) -> RegistrationResult<Completion<()>> {
        if !self.requests.settle(&pending.ticket) {
            debug!("Discarding stale verification request {}", pending.ticket.seq());
            return Ok(Completion::Discarded);
        }
        if let Err(error) = outcome {
            return Err(self.service_error(error, pending.operation));
        }

        match pending.operation {
            Operation::ResendVerification => self.notify(NoticeKind::CodeResent),
            _ => {
                self.form.mark_code_sent();
                self.notify(NoticeKind::CodeSent);
            }
        }
        info!("Verification code sent to {}", pending.email);
        Ok(Completion::Applied(()))
    }

    async fn run_verification(&mut self) -> RegistrationResult<Completion<()>> {
        let pending = self.begin_verification()?;
        let outcome = match pending.operation() {
            Operation::ResendVerification => {
                self.service.resend_verification(pending.email()).await
            }
            _ => self.service.send_verification(pending.email()).await,
        };
        self.finish_verification(pending, outcome)
    }

    pub async fn send_verification_code(&mut self) -> RegistrationResult<Completion<()>> {
        self.run_verification().await
    }

    pub async fn resend_verification_code(&mut self) -> RegistrationResult<Completion<()>> {
        self.run_verification().await
    }

    // ---- Restaurant search ----

    /// Start a search. Returns `None` when the query is blank; no request is
    /// issued and a warning notice is queued instead.
    pub fn begin_search(&mut self, query: &str, mode: SearchMode) -> Option<PendingSearch> {
        self.search.query = query.to_string();
        self.search.mode = mode;

        let query = query.trim();
        if query.is_empty() {
            self.search.hide();
            self.requests.invalidate(RequestKind::RestaurantSearch);
            self.notify(NoticeKind::EmptySearchQuery);
            return None;
        }

        let ticket = self.requests.issue(RequestKind::RestaurantSearch);
        debug!("Searching restaurants by {:?}: {} (request {})", mode, query, ticket.seq());
        Some(PendingSearch {
            ticket,
            query: query.to_string(),
            mode,
        })
    }

    pub fn finish_search(
        &mut self,
        pending: PendingSearch,
        outcome: Result<Vec<RestaurantSummary>, ServiceError>,
    ) -> RegistrationResult<Completion<Vec<RestaurantSummary>>> {
        if !self.requests.settle(&pending.ticket) {
            debug!("Discarding stale restaurant search {}", pending.ticket.seq());
            return Ok(Completion::Discarded);
        }

        match outcome {
            Ok(results) => {
                if results.is_empty() {
                    self.notify(NoticeKind::NoSearchResults);
                }
                info!("Restaurant search {:?} returned {} results", pending.query, results.len());
                self.search.results = results.clone();
                self.search.visible = true;
                Ok(Completion::Applied(results))
            }
            Err(error) => {
                self.search.hide();
                Err(self.service_error(error, Operation::SearchRestaurants))
            }
        }
    }

    pub async fn search_restaurants(
        &mut self,
        query: &str,
        mode: SearchMode,
    ) -> RegistrationResult<Completion<Vec<RestaurantSummary>>> {
        let Some(pending) = self.begin_search(query, mode) else {
            return Ok(Completion::Applied(Vec::new()));
        };
        let outcome = self
            .service
            .search_restaurants(pending.query(), pending.mode())
            .await;
        self.finish_search(pending, outcome)
    }

    /// Pick a restaurant from the search results
    pub fn select_restaurant(&mut self, restaurant: &RestaurantSummary) {
        self.form.select_restaurant(restaurant.into());
        self.search.query = restaurant.display_name();
        self.search.hide();
        // A search still in flight must not reopen the result list
        self.requests.invalidate(RequestKind::RestaurantSearch);
        debug!("Selected restaurant {}", restaurant.id);
    }

    // ---- Submission ----

    pub fn begin_submit(&mut self) -> RegistrationResult<PendingSignup> {
        if self.phase != SubmissionPhase::Editing || self.requests.is_closed() {
            return Err(RegistrationError::validation(Rule::AlreadySubmitted));
        }

        let payload = self.form.check_submission().map_err(|rule| {
            info!("Submission blocked: {:?}", rule);
            RegistrationError::validation(rule)
        })?;

        self.phase = SubmissionPhase::Submitting;
        let ticket = self.requests.issue(RequestKind::Signup);
        debug!("Submitting signup for {} as {}", payload.username, payload.role);
        Ok(PendingSignup { ticket, payload })
    }

    pub fn finish_submit(
        &mut self,
        pending: PendingSignup,
        outcome: Result<AuthSession, ServiceError>,
    ) -> RegistrationResult<Completion<AuthOutcome>> {
        if !self.requests.settle(&pending.ticket) {
            debug!("Discarding stale signup response {}", pending.ticket.seq());
            return Ok(Completion::Discarded);
        }

        let session = match outcome {
            Ok(session) => session,
            Err(error) => {
                self.phase = SubmissionPhase::Editing;
                return Err(self.service_error(error, Operation::Signup));
            }
        };

        if let Err(e) = self.sessions.save(&session) {
            warn!("Could not store the new session: {}", e);
        }
        self.phase = SubmissionPhase::Succeeded;
        self.notify(NoticeKind::SignupComplete);
        // Nothing may change the form once the account exists
        self.requests.close();

        let outcome = AuthOutcome::from(session);
        info!(
            "Account {} created, redirecting to {:?}",
            pending.payload.username, outcome.redirect
        );
        Ok(Completion::Applied(outcome))
    }

    /// Give up on a signup whose response will never be fed back.
    ///
    /// The form becomes editable again and a late response is discarded.
    pub fn cancel_submit(&mut self, pending: PendingSignup) {
        self.abandon_submit(&pending.ticket);
    }

    fn abandon_submit(&mut self, ticket: &Ticket) {
        if self.requests.is_current(ticket) && self.requests.is_pending(RequestKind::Signup) {
            self.requests.invalidate(RequestKind::Signup);
            self.phase = SubmissionPhase::Editing;
            debug!("Signup request {} abandoned", ticket.seq());
        }
    }

    pub async fn submit(&mut self) -> RegistrationResult<Completion<AuthOutcome>> {
        let pending = self.begin_submit()?;
        let service = Arc::clone(&self.service);

        // Resets the phase if this future is dropped before the answer arrives
        let mut attempt = SubmitAttempt {
            workflow: self,
            ticket: Some(pending.ticket),
        };
        let outcome = service.signup(pending.payload()).await;
        attempt.ticket = None;
        attempt.workflow.finish_submit(pending, outcome)
    }

    /// Leave the registration screen; later responses are discarded
    pub fn close(&mut self) {
        self.requests.close();
        self.search.hide();
        debug!("Registration workflow closed");
    }
}

struct SubmitAttempt<'a> {
    workflow: &'a mut RegistrationWorkflow,
    ticket: Option<Ticket>,
}

impl Drop for SubmitAttempt<'_> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            self.workflow.abandon_submit(&ticket);
        }
    }
}
