//! Chat transcript with the tutor.

use tracing::{debug, warn};

use crate::models::{ChatMessage, Domain, UserProfile};
use crate::tutor::Tutor;

pub const APOLOGY: &str =
    "I'm sorry, I'm having trouble processing your request right now. Please try again.";

#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    domain: Domain,
}

impl ChatSession {
    /// Start a transcript with the greeting addressed to `user`.
    pub fn new(user: Option<&UserProfile>, domain: Domain) -> Self {
        Self { messages: vec![greeting(user)], domain }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Domain attached to the next outgoing message.
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn set_domain(&mut self, domain: Domain) {
        debug!(domain = %domain, "chat domain selected");
        self.domain = domain;
    }

    /// Send `text` and append the answer.
    ///
    /// Whitespace-only input is ignored and returns `None`. A failed call
    /// still appends an AI message: the apology, flagged `error`.
    pub async fn send(&mut self, tutor: &Tutor, text: &str) -> Option<&ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.messages.push(ChatMessage::user(text, self.domain.clone()));

        let reply = match tutor.ask(text, &self.domain).await {
            Ok(reply) => {
                let mut msg = ChatMessage::ai(reply.text, reply.domain);
                msg.confidence = reply.confidence;
                msg.suggestions = reply.suggestions;
                msg.resources = reply.resources;
                msg.error = reply.degraded;
                msg
            }
            Err(e) => {
                warn!(error = %e, "chat request failed");
                let mut msg = ChatMessage::ai(APOLOGY, Domain::General);
                msg.error = true;
                msg
            }
        };
        self.messages.push(reply);
        self.messages.last()
    }
}

fn greeting(user: Option<&UserProfile>) -> ChatMessage {
    let name = user.and_then(UserProfile::first_name).unwrap_or("there");
    ChatMessage::ai(
        format!(
            "Hello {name}! I'm your AI learning assistant. I can help you with questions about \
             Data Science, App Development, Cybersecurity, and more. What would you like to \
             learn about today?"
        ),
        Domain::General,
    )
}
