//! Deadline board: fetched deadlines, local edits, urgency and AI advice.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::api::types::NewDeadlineRequest;
use crate::error::AppError;
use crate::mock;
use crate::models::{Category, Deadline, Domain, Priority, SuggestionCard, parse_date};
use crate::parse;
use crate::prompt::{self, PromptBuilder};
use crate::screens::{DataSource, ScreenContext};

// ── View options ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeadlineFilter {
    #[default]
    All,
    Upcoming,
    Overdue,
    Completed,
}

impl DeadlineFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            DeadlineFilter::All => "all",
            DeadlineFilter::Upcoming => "upcoming",
            DeadlineFilter::Overdue => "overdue",
            DeadlineFilter::Completed => "completed",
        }
    }

    fn accepts(self, d: &Deadline, today: NaiveDate) -> bool {
        let days = days_until(d.due, today);
        match self {
            DeadlineFilter::All => true,
            DeadlineFilter::Upcoming => !d.is_completed && days >= 0,
            DeadlineFilter::Overdue => !d.is_completed && days < 0,
            DeadlineFilter::Completed => d.is_completed,
        }
    }
}

impl FromStr for DeadlineFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(DeadlineFilter::All),
            "upcoming" => Ok(DeadlineFilter::Upcoming),
            "overdue" => Ok(DeadlineFilter::Overdue),
            "completed" => Ok(DeadlineFilter::Completed),
            other => Err(format!(
                "unknown filter '{other}' (all, upcoming, overdue, completed)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeadlineSort {
    #[default]
    Deadline,
    Priority,
}

impl FromStr for DeadlineSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deadline" | "date" | "due" => Ok(DeadlineSort::Deadline),
            "priority" => Ok(DeadlineSort::Priority),
            other => Err(format!("unknown sort '{other}' (deadline, priority)")),
        }
    }
}

// ── Urgency ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Overdue,
    Imminent,
    Soon,
    Relaxed,
}

impl Urgency {
    pub fn for_days(days: i64) -> Self {
        match days {
            d if d < 0 => Urgency::Overdue,
            d if d <= 2 => Urgency::Imminent,
            d if d <= 7 => Urgency::Soon,
            _ => Urgency::Relaxed,
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Urgency::Overdue => "overdue",
            Urgency::Imminent => "imminent",
            Urgency::Soon => "soon",
            Urgency::Relaxed => "relaxed",
        })
    }
}

/// Whole days from `today` to `due`; negative once the date has passed.
pub fn days_until(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}

// ── Board ─────────────────────────────────────────────────────────────────────

/// Raw form input for a new deadline.
#[derive(Debug, Clone, Default)]
pub struct NewDeadline {
    pub title: String,
    pub description: String,
    pub due: String,
    pub priority: Priority,
    pub category: Category,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeadlineStats {
    pub total: usize,
    pub completed: usize,
    pub overdue: usize,
    pub due_this_week: usize,
}

#[derive(Debug, Clone)]
pub struct DeadlineBoard {
    items: Vec<Deadline>,
    source: DataSource,
    suggestions: Vec<SuggestionCard>,
}

impl Default for DeadlineBoard {
    fn default() -> Self {
        Self { items: Vec::new(), source: DataSource::NotLoaded, suggestions: Vec::new() }
    }
}

impl DeadlineBoard {
    pub fn items(&self) -> &[Deadline] {
        &self.items
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn suggestions(&self) -> &[SuggestionCard] {
        &self.suggestions
    }

    /// Replace the board with the server's list. Local edits are discarded.
    pub async fn load(&mut self, ctx: &ScreenContext<'_>) -> Result<(), AppError> {
        match ctx.api.deadlines().await {
            Ok(items) => {
                debug!(count = items.len(), "deadlines loaded");
                self.items = items;
                self.source = DataSource::Remote;
            }
            Err(e) => {
                let reason = ctx.fallback("deadlines", e)?;
                self.items = mock::deadlines();
                self.source = DataSource::Sample { reason };
            }
        }
        Ok(())
    }

    /// Validate and create a deadline, returning its id when known.
    ///
    /// Created on the server and refetched when possible; inserted locally
    /// when the server is out of reach and fallback is on.
    pub async fn add(
        &mut self,
        ctx: &ScreenContext<'_>,
        form: NewDeadline,
    ) -> Result<Option<u64>, AppError> {
        let title = form.title.trim();
        if title.is_empty() {
            return Err(AppError::Input("title is required".into()));
        }
        let due = parse_date(&form.due).map_err(AppError::Input)?;

        let request = NewDeadlineRequest {
            title: title.to_string(),
            description: form.description.trim().to_string(),
            due_date: due.format("%Y-%m-%d").to_string(),
            priority: form.priority.as_str().to_string(),
            category: form.category.as_str().to_string(),
        };

        match ctx.api.create_deadline(&request).await {
            Ok(()) => {
                info!(title = %request.title, "deadline created");
                self.load(ctx).await?;
                Ok(None)
            }
            Err(e) => {
                let reason = ctx.fallback("deadlines", e)?;
                if self.source == DataSource::NotLoaded {
                    self.items = mock::deadlines();
                    self.source = DataSource::Sample { reason };
                }
                let id = self.next_local_id();
                self.items.push(Deadline {
                    id,
                    title: request.title,
                    description: request.description,
                    due,
                    priority: form.priority,
                    category: form.category,
                    is_completed: false,
                    created_at: Some(chrono::Utc::now().format("%Y-%m-%d").to_string()),
                });
                info!(id, "deadline added locally");
                Ok(Some(id))
            }
        }
    }

    fn next_local_id(&self) -> u64 {
        self.items.iter().map(|d| d.id).max().unwrap_or(0) + 1
    }

    /// Flip completion; returns the new state.
    pub fn toggle_complete(&mut self, id: u64) -> Result<bool, AppError> {
        let item = self
            .items
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::Input(format!("no deadline with id {id}")))?;
        item.is_completed = !item.is_completed;
        Ok(item.is_completed)
    }

    pub fn delete(&mut self, id: u64) -> Result<Deadline, AppError> {
        let pos = self
            .items
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| AppError::Input(format!("no deadline with id {id}")))?;
        Ok(self.items.remove(pos))
    }

    /// Filtered and sorted view. Sorting is stable.
    pub fn view(
        &self,
        filter: DeadlineFilter,
        sort: DeadlineSort,
        today: NaiveDate,
    ) -> Vec<&Deadline> {
        let mut rows: Vec<&Deadline> =
            self.items.iter().filter(|d| filter.accepts(d, today)).collect();
        match sort {
            DeadlineSort::Deadline => rows.sort_by_key(|d| d.due),
            DeadlineSort::Priority => {
                rows.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()))
            }
        }
        rows
    }

    pub fn stats(&self, today: NaiveDate) -> DeadlineStats {
        let mut stats = DeadlineStats { total: self.items.len(), ..Default::default() };
        for d in &self.items {
            if d.is_completed {
                stats.completed += 1;
                continue;
            }
            let days = days_until(d.due, today);
            if days < 0 {
                stats.overdue += 1;
            } else if days <= 7 {
                stats.due_this_week += 1;
            }
        }
        stats
    }

    pub fn analysis_prompt(&self, ctx: &ScreenContext<'_>, today: NaiveDate) -> String {
        let upcoming = self.view(DeadlineFilter::Upcoming, DeadlineSort::Deadline, today);
        let overdue = self.view(DeadlineFilter::Overdue, DeadlineSort::Deadline, today);
        PromptBuilder::new(ctx.prompts_dir)
            .template(prompt::DEADLINE_ANALYSIS)
            .var("upcoming", list_lines(&upcoming, "Due"))
            .var("overdue", list_lines(&overdue, "Was due"))
            .var("upcoming_count", upcoming.len().to_string())
            .var("overdue_count", overdue.len().to_string())
            .build()
    }

    /// Ask the tutor for advice on the current board.
    pub async fn analyze(
        &mut self,
        ctx: &ScreenContext<'_>,
        today: NaiveDate,
    ) -> Result<&[SuggestionCard], AppError> {
        let prompt = self.analysis_prompt(ctx, today);
        let reply = ctx.tutor.ask(&prompt, &Domain::General).await?;
        self.suggestions = parse::deadline_suggestions(&reply.text);
        debug!(cards = self.suggestions.len(), "deadline analysis parsed");
        Ok(&self.suggestions)
    }

    #[cfg(test)]
    pub(crate) fn with_items(items: Vec<Deadline>) -> Self {
        Self { items, source: DataSource::Remote, suggestions: Vec::new() }
    }
}

fn list_lines(items: &[&Deadline], label: &str) -> String {
    if items.is_empty() {
        return "None".to_string();
    }
    items
        .iter()
        .map(|d| {
            format!(
                "- {} ({}, {} priority) - {label}: {}",
                d.title,
                d.category.as_str(),
                d.priority.as_str(),
                d.due.format("%Y-%m-%d")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
