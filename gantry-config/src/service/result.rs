//! Operation results
//!
//! An `OperationResult` is the terminal report of one mutation. It starts
//! out successful and holds at most one failure: the first failure recorded
//! wins, and later failures or success messages are ignored.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    /// The proposed state breaks a structural or business rule
    ValidationFailure,
    /// The caller's fingerprint is stale; re-fetch and retry
    ConcurrencyConflict,
    AuthorizationFailure,
    NotFound,
    /// Unexpected store or infrastructure failure
    InternalFailure,
}

impl OutcomeKind {
    pub fn is_failure(self) -> bool {
        self != OutcomeKind::Success
    }

    /// HTTP status a transport layer should answer with
    pub fn status_code(self) -> u16 {
        match self {
            OutcomeKind::Success => 200,
            OutcomeKind::ValidationFailure => 422,
            OutcomeKind::ConcurrencyConflict => 409,
            OutcomeKind::AuthorizationFailure => 403,
            OutcomeKind::NotFound => 404,
            OutcomeKind::InternalFailure => 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult {
    kind: OutcomeKind,
    message: Option<String>,
}

impl OperationResult {
    pub fn new() -> Self {
        Self {
            kind: OutcomeKind::Success,
            message: None,
        }
    }

    pub fn unprocessable_entity(&mut self, message: impl Into<String>) {
        self.fail(OutcomeKind::ValidationFailure, message.into());
    }

    pub fn conflict(&mut self, message: impl Into<String>) {
        self.fail(OutcomeKind::ConcurrencyConflict, message.into());
    }

    pub fn forbidden(&mut self, message: impl Into<String>) {
        self.fail(OutcomeKind::AuthorizationFailure, message.into());
    }

    pub fn not_found(&mut self, message: impl Into<String>) {
        self.fail(OutcomeKind::NotFound, message.into());
    }

    pub fn internal_server_error(&mut self, message: impl Into<String>) {
        self.fail(OutcomeKind::InternalFailure, message.into());
    }

    /// Sets the message of a successful result; ignored after a failure
    pub fn set_message(&mut self, message: impl Into<String>) {
        if self.is_successful() {
            self.message = Some(message.into());
        }
    }

    pub fn is_successful(&self) -> bool {
        !self.kind.is_failure()
    }

    pub fn has_message(&self) -> bool {
        self.message.is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn kind(&self) -> OutcomeKind {
        self.kind
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    fn fail(&mut self, kind: OutcomeKind, message: String) {
        if self.kind.is_failure() {
            debug!(
                "Ignoring {:?} ({}); result already holds {:?}",
                kind, message, self.kind
            );
            return;
        }
        self.kind = kind;
        self.message = Some(message);
    }
}

impl Default for OperationResult {
    fn default() -> Self {
        Self::new()
    }
}
