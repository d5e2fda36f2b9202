//! Wire types for the dashboard API.
//!
//! Request bodies and the response envelope are private to the `api` module's
//! callers only in spirit: screens use the domain records from
//! [`crate::models`], and these types stay at the HTTP boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{ChatStatistics, Deadline, UserProfile};

/// Standard `{ success, data, error, message }` envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

fn default_success() -> bool {
    true
}

/// Error-only body, used to surface the server's reason on non-2xx replies.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub student_id: String,
    pub course: String,
    pub semester: u32,
}

/// `data` of a successful login or registration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthData {
    pub access_token: String,
    #[serde(flatten)]
    pub profile: UserProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub domain: &'a str,
}

/// `data` of a chatbot reply.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReplyData {
    pub text: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
    /// Set by the server when it fell back to its canned apology.
    #[serde(default)]
    pub error: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DomainInfo {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DomainCatalog {
    pub domains: BTreeMap<String, DomainInfo>,
    #[serde(default)]
    pub default: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardData {
    #[serde(default)]
    pub chat_statistics: ChatStatistics,
    #[serde(default)]
    pub recent_interactions: Vec<serde_json::Value>,
    #[serde(default)]
    pub upcoming_deadlines: Vec<Deadline>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// `GET /api/deadlines` returns a bare `{ deadlines: [...] }` object.
#[derive(Debug, Deserialize)]
pub(crate) struct DeadlineList {
    #[serde(default)]
    pub deadlines: Vec<Deadline>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewDeadlineRequest {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: String,
    pub category: String,
}
