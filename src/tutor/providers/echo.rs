//! Echo tutor — answers with the input prefixed by `[echo]`.
//! Lets every screen run end-to-end without a reachable API.

use crate::models::Domain;
use crate::tutor::{TutorError, TutorReply};

#[derive(Debug, Clone)]
pub struct EchoTutor;

impl EchoTutor {
    pub async fn ask(&self, message: &str, domain: &Domain) -> Result<TutorReply, TutorError> {
        let domain = match domain {
            Domain::Auto => Domain::General,
            other => other.clone(),
        };
        Ok(TutorReply {
            text: format!("[echo] {message}"),
            domain,
            confidence: Some(1.0),
            suggestions: Vec::new(),
            resources: Vec::new(),
            degraded: false,
        })
    }
}
