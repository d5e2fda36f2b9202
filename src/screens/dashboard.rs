//! Landing dashboard: greeting, headline stats and quick actions.

use tracing::debug;

use crate::error::AppError;
use crate::mock;
use crate::models::{DashboardStats, Deadline};
use crate::screens::{DataSource, ScreenContext};

pub fn greeting(hour: u32) -> &'static str {
    match hour {
        h if h < 12 => "Good morning",
        h if h < 18 => "Good afternoon",
        _ => "Good evening",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub name: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAction {
    pub name: &'static str,
    pub description: &'static str,
    /// Console command that opens the screen.
    pub command: &'static str,
}

pub const QUICK_ACTIONS: [QuickAction; 4] = [
    QuickAction {
        name: "Start AI Chat",
        description: "Get instant help with your questions",
        command: "type a message",
    },
    QuickAction {
        name: "Learning Path",
        description: "Continue your personalized learning",
        command: "/learn",
    },
    QuickAction {
        name: "Check Deadlines",
        description: "View upcoming assignments",
        command: "/deadlines",
    },
    QuickAction {
        name: "View Progress",
        description: "Track your learning journey",
        command: "/progress",
    },
];

#[derive(Debug, Clone)]
pub struct DashboardScreen {
    stats: DashboardStats,
    upcoming: Vec<Deadline>,
    source: DataSource,
}

impl Default for DashboardScreen {
    fn default() -> Self {
        Self {
            stats: DashboardStats::default(),
            upcoming: Vec::new(),
            source: DataSource::NotLoaded,
        }
    }
}

impl DashboardScreen {
    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    pub fn upcoming(&self) -> &[Deadline] {
        &self.upcoming
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Headline numbers from the student dashboard endpoint, or the sample
    /// numbers when it cannot be reached.
    pub async fn load(&mut self, ctx: &ScreenContext<'_>) -> Result<(), AppError> {
        match ctx.api.dashboard().await {
            Ok(data) => {
                let chat = &data.chat_statistics;
                self.stats = DashboardStats {
                    total_chats: chat.total_chats,
                    domains_explored: chat.domains.len() as u64,
                    avg_confidence: chat.avg_confidence,
                    // The endpoint does not report study hours or finished tasks.
                    weekly_progress_hours: 0,
                    upcoming_deadlines: data.upcoming_deadlines.len() as u64,
                    completed_tasks: 0,
                };
                debug!(total_chats = chat.total_chats, "dashboard loaded");
                self.upcoming = data.upcoming_deadlines;
                self.source = DataSource::Remote;
            }
            Err(e) => {
                let reason = ctx.fallback("dashboard", e)?;
                self.stats = mock::dashboard_stats();
                self.upcoming = mock::deadlines();
                self.source = DataSource::Sample { reason };
            }
        }
        Ok(())
    }

    pub fn stat_cards(&self) -> Vec<StatCard> {
        let s = &self.stats;
        vec![
            StatCard { name: "Total Chats", value: s.total_chats.to_string() },
            StatCard { name: "Domains Explored", value: s.domains_explored.to_string() },
            StatCard {
                name: "Avg Confidence",
                value: format!("{}%", (s.avg_confidence * 100.0).round() as i64),
            },
            StatCard { name: "Weekly Progress", value: format!("{}h", s.weekly_progress_hours) },
        ]
    }
}
