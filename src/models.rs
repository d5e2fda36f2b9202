//! Display records shared by every screen.
//!
//! These are plain data: the client enforces field presence and nothing
//! else. Wire shapes follow the dashboard API's snake_case JSON; a few
//! aliases accept the camelCase variants some endpoints return.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

// ── Domain ────────────────────────────────────────────────────────────────────

/// Subject category used to route a chat message to a tutoring context.
///
/// Only the tag matters to the remote API; unknown tags are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Domain {
    Auto,
    DataScience,
    AppDevelopment,
    CyberSecurity,
    Mathematics,
    Programming,
    General,
    Other(String),
}

impl Domain {
    /// Domains offered by the chat screen selector.
    pub const CHAT_CHOICES: [Domain; 5] = [
        Domain::Auto,
        Domain::DataScience,
        Domain::AppDevelopment,
        Domain::CyberSecurity,
        Domain::General,
    ];

    /// Domains offered by the doubt resolver.
    pub const DOUBT_CHOICES: [Domain; 6] = [
        Domain::General,
        Domain::DataScience,
        Domain::AppDevelopment,
        Domain::CyberSecurity,
        Domain::Mathematics,
        Domain::Programming,
    ];

    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "auto" => Domain::Auto,
            "data_science" => Domain::DataScience,
            "app_development" => Domain::AppDevelopment,
            "cyber_security" | "cybersecurity" => Domain::CyberSecurity,
            "mathematics" => Domain::Mathematics,
            "programming" => Domain::Programming,
            "general" | "" => Domain::General,
            other => Domain::Other(other.to_string()),
        }
    }

    /// Wire tag sent to the API.
    pub fn tag(&self) -> &str {
        match self {
            Domain::Auto => "auto",
            Domain::DataScience => "data_science",
            Domain::AppDevelopment => "app_development",
            Domain::CyberSecurity => "cyber_security",
            Domain::Mathematics => "mathematics",
            Domain::Programming => "programming",
            Domain::General => "general",
            Domain::Other(tag) => tag,
        }
    }

    /// Human label: underscores become spaces, words are capitalised.
    pub fn label(&self) -> String {
        match self {
            Domain::Auto => "Auto-detect".to_string(),
            Domain::CyberSecurity => "Cybersecurity".to_string(),
            other => title_case(&other.tag().replace('_', " ")),
        }
    }

    /// Tag with underscores replaced by spaces, as used inside prompts.
    pub fn spaced(&self) -> String {
        self.tag().replace('_', " ")
    }
}

impl From<String> for Domain {
    fn from(tag: String) -> Self {
        Domain::from_tag(&tag)
    }
}

impl From<Domain> for String {
    fn from(domain: Domain) -> Self {
        domain.tag().to_string()
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Chat ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub domain: Domain,
    pub confidence: Option<f64>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub error: bool,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>, domain: Domain) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender: Sender::User,
            timestamp: Utc::now(),
            domain,
            confidence: None,
            suggestions: Vec::new(),
            resources: Vec::new(),
            error: false,
        }
    }

    pub fn ai(text: impl Into<String>, domain: Domain) -> Self {
        Self { sender: Sender::Ai, ..Self::user(text, domain) }
    }
}

// ── Deadlines ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort weight: high 3, medium 2, low 1.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority '{other}' (low, medium, high)")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Assignment,
    Project,
    Exam,
    Meeting,
    #[serde(other)]
    Other,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Assignment => "assignment",
            Category::Project => "project",
            Category::Exam => "exam",
            Category::Meeting => "meeting",
            Category::Other => "other",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "assignment" => Ok(Category::Assignment),
            "project" => Ok(Category::Project),
            "exam" => Ok(Category::Exam),
            "meeting" => Ok(Category::Meeting),
            "other" => Ok(Category::Other),
            other => Err(format!(
                "unknown category '{other}' (assignment, project, exam, meeting, other)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deadline {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "deadline", alias = "due_date", deserialize_with = "de_date_prefix")]
    pub due: NaiveDate,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Accepts `YYYY-MM-DD` as well as a full ISO timestamp.
fn de_date_prefix<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}

/// Parse the date part of `YYYY-MM-DD[...]`.
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{trimmed}' (expected YYYY-MM-DD): {e}"))
}

// ── Recommendations ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Expert => "expert",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            "expert" => Ok(Difficulty::Expert),
            other => Err(format!("unknown difficulty '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default)]
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default = "default_recommendation_kind")]
    pub kind: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_estimated_time", alias = "estimatedTime")]
    pub estimated_time: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub reason: String,
    #[serde(default, alias = "aiGenerated")]
    pub ai_generated: bool,
}

fn default_recommendation_kind() -> String {
    "course".to_string()
}

fn default_estimated_time() -> String {
    "Varies".to_string()
}

// ── Progress ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub earned: bool,
    /// Percent towards an unearned achievement.
    #[serde(default)]
    pub progress: Option<f64>,
}

/// Aggregate chat statistics computed server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatStatistics {
    #[serde(default)]
    pub total_chats: u64,
    /// Domain tag → number of chats.
    #[serde(default)]
    pub domains: BTreeMap<String, u64>,
    #[serde(default)]
    pub avg_confidence: f64,
    #[serde(default)]
    pub most_active_domain: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallProgress {
    #[serde(default)]
    pub total_interactions: u64,
    #[serde(default)]
    pub positive_interactions: u64,
    #[serde(default)]
    pub average_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainProgress {
    pub domain: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub avg_confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningProgress {
    #[serde(default, alias = "overall_stats")]
    pub overall: OverallProgress,
    #[serde(default)]
    pub domains: Vec<DomainProgress>,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

// ── AI-derived cards ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Priority,
    Time,
    Risk,
    Wellness,
    General,
}

/// Deadline-management advice card parsed from AI prose.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionCard {
    pub title: String,
    pub content: String,
    pub kind: SuggestionKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningKind {
    General,
    Recommendation,
    Skill,
    Resource,
}

/// Learning-plan card parsed from AI prose.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningCard {
    pub title: String,
    pub description: String,
    pub kind: LearningKind,
}

// ── Doubts ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoubtRecord {
    pub id: Uuid,
    pub question: String,
    pub domain: Domain,
    pub resolved: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub question: String,
    pub answer: String,
    pub domain: Domain,
    pub context: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub confidence: f64,
    pub suggestions: Vec<String>,
    pub resources: Vec<String>,
}

// ── Account / dashboard ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default, deserialize_with = "de_opt_string_or_number")]
    pub student_id: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string_or_number")]
    pub semester: Option<String>,
}

impl UserProfile {
    pub fn first_name(&self) -> Option<&str> {
        self.full_name.split_whitespace().next()
    }
}

fn de_opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_chats: u64,
    pub domains_explored: u64,
    pub avg_confidence: f64,
    pub weekly_progress_hours: u64,
    pub upcoming_deadlines: u64,
    pub completed_tasks: u64,
}
