//! Tutor backend abstraction.
//!
//! `Tutor` is an enum over concrete backends. Every screen that needs AI
//! prose (chat, deadline analysis, recommendations, doubts) goes through
//! [`Tutor::ask`], so switching to the offline echo backend is one config
//! line.
//!
//! Enum dispatch keeps this free of trait objects; adding a backend is a new
//! module in `providers/`, a new variant, and a new `ask` arm.

pub mod providers;

use thiserror::Error;

use crate::api::ApiError;
use crate::models::Domain;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum TutorError {
    #[error("unknown tutor backend: {0}")]
    UnknownBackend(String),
    #[error("message must not be empty")]
    EmptyMessage,
    #[error("tutor request failed: {0}")]
    Api(#[from] ApiError),
}

// ── Reply ─────────────────────────────────────────────────────────────────────

/// One tutor answer, normalised across backends.
#[derive(Debug, Clone, PartialEq)]
pub struct TutorReply {
    pub text: String,
    /// Domain the backend routed the message to.
    pub domain: Domain,
    pub confidence: Option<f64>,
    pub suggestions: Vec<String>,
    pub resources: Vec<String>,
    /// The backend answered with its canned apology instead of real content.
    pub degraded: bool,
}

// ── Backend enum ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Tutor {
    Remote(providers::remote::RemoteTutor),
    Echo(providers::echo::EchoTutor),
}

impl Tutor {
    /// Send `message` tagged with `domain` and return the backend's answer.
    ///
    /// Whitespace-only messages are rejected before any request is made.
    pub async fn ask(&self, message: &str, domain: &Domain) -> Result<TutorReply, TutorError> {
        if message.trim().is_empty() {
            return Err(TutorError::EmptyMessage);
        }
        match self {
            Tutor::Remote(t) => t.ask(message, domain).await,
            Tutor::Echo(t) => t.ask(message, domain).await,
        }
    }

    /// Propagate a login/logout to backends that carry credentials.
    pub fn set_token(&mut self, token: Option<String>) {
        match self {
            Tutor::Remote(t) => t.set_token(token),
            Tutor::Echo(_) => {}
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tutor::Remote(_) => "remote",
            Tutor::Echo(_) => "echo",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_message_rejected_before_dispatch() {
        let t = Tutor::Echo(providers::echo::EchoTutor);
        let err = t.ask("   \n", &Domain::General).await.unwrap_err();
        assert!(matches!(err, TutorError::EmptyMessage));
    }

    #[tokio::test]
    async fn echo_dispatch() {
        let t = Tutor::Echo(providers::echo::EchoTutor);
        let reply = t.ask("hello", &Domain::Programming).await.unwrap();
        assert_eq!(reply.text, "[echo] hello");
        assert_eq!(t.name(), "echo");
    }
}
