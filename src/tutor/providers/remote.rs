//! Remote tutor — forwards messages to the dashboard API's chatbot endpoint.
//!
//! The open `/api/chatbot/test` endpoint is used by default; with
//! `authenticated = true` messages go to `/api/chatbot/message`, which needs
//! the bearer token and records the exchange in the user's history.

use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::models::Domain;
use crate::tutor::{TutorError, TutorReply};

#[derive(Debug, Clone)]
pub struct RemoteTutor {
    api: ApiClient,
    authenticated: bool,
}

impl RemoteTutor {
    pub fn new(api: ApiClient, authenticated: bool) -> Self {
        Self { api, authenticated }
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.api.set_token(token);
    }

    pub async fn ask(&self, message: &str, domain: &Domain) -> Result<TutorReply, TutorError> {
        debug!(
            domain = %domain,
            authenticated = self.authenticated,
            message_len = message.len(),
            "sending tutor request"
        );

        let data = if self.authenticated {
            self.api.chat_message(message, domain.tag()).await?
        } else {
            self.api.chat_test(message, domain.tag()).await?
        };

        if data.error {
            warn!(domain = %domain, "tutor answered with a degraded reply");
        }

        Ok(TutorReply {
            text: data.text,
            domain: data.domain.map(Domain::from).unwrap_or_else(|| domain.clone()),
            confidence: data.confidence,
            suggestions: data.suggestions,
            resources: data.resources,
            degraded: data.error,
        })
    }
}
