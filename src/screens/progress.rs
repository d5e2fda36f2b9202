//! Progress screen: statistics, achievements, trends and AI analysis.

use tracing::{debug, info};

use crate::error::AppError;
use crate::models::{Achievement, ChatStatistics, Domain, LearningProgress, OverallProgress};
use crate::prompt::{self, PromptBuilder, percent1};
use crate::screens::{DataSource, ScreenContext};

const POWER_USER_TARGET: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Stable,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trends {
    pub confidence: Trend,
    pub activity: Trend,
    pub domain_growth: Trend,
}

pub fn trends(stats: &ChatStatistics) -> Trends {
    let confidence = if stats.avg_confidence >= 0.7 {
        Trend::Up
    } else if stats.avg_confidence >= 0.5 {
        Trend::Stable
    } else {
        Trend::Down
    };
    Trends {
        confidence,
        activity: if stats.total_chats >= 10 { Trend::Up } else { Trend::Stable },
        domain_growth: if stats.domains.len() >= 2 { Trend::Up } else { Trend::Stable },
    }
}

/// `current / target` as a percentage capped at 100; a zero target gives 0.
pub fn progress_percentage(current: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (current / target * 100.0).min(100.0)
}

/// Achievements earned from the current numbers, plus the next milestone.
pub fn achievements(stats: &ChatStatistics, overall: &OverallProgress) -> Vec<Achievement> {
    let earned = |title: &str, description: &str, icon: &str| Achievement {
        title: title.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        earned: true,
        progress: None,
    };

    let mut list = Vec::new();
    if stats.total_chats >= 10 {
        list.push(earned("Chatty Learner", "Completed 10+ chat sessions", "💬"));
    }
    if stats.avg_confidence >= 0.8 {
        list.push(earned("Confident Learner", "Maintained 80%+ average confidence", "🎯"));
    }
    if stats.domains.len() >= 3 {
        list.push(earned("Domain Explorer", "Explored 3+ different domains", "🌟"));
    }
    if overall.positive_interactions >= 5 {
        list.push(earned("Positive Learner", "Received 5+ positive ratings", "👍"));
    }
    if stats.total_chats < POWER_USER_TARGET {
        list.push(Achievement {
            title: "Power User".to_string(),
            description: format!("Complete {POWER_USER_TARGET} chat sessions"),
            icon: "⚡".to_string(),
            earned: false,
            progress: Some(progress_percentage(
                stats.total_chats as f64,
                POWER_USER_TARGET as f64,
            )),
        });
    }
    list
}

#[derive(Debug, Clone)]
pub struct ProgressScreen {
    stats: ChatStatistics,
    progress: LearningProgress,
    source: DataSource,
    analysis: Option<String>,
}

impl Default for ProgressScreen {
    fn default() -> Self {
        Self {
            stats: ChatStatistics::default(),
            progress: LearningProgress::default(),
            source: DataSource::NotLoaded,
            analysis: None,
        }
    }
}

impl ProgressScreen {
    pub fn stats(&self) -> &ChatStatistics {
        &self.stats
    }

    pub fn progress(&self) -> &LearningProgress {
        &self.progress
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn analysis(&self) -> Option<&str> {
        self.analysis.as_deref()
    }

    /// Fetch learning progress and chat statistics. Both are needed; if
    /// either fails the screen stays empty.
    pub async fn load(&mut self, ctx: &ScreenContext<'_>) -> Result<(), AppError> {
        let (progress, stats) = tokio::join!(ctx.api.learning_progress(), ctx.api.statistics());
        match progress.and_then(|p| stats.map(|s| (p, s))) {
            Ok((progress, stats)) => {
                debug!(total_chats = stats.total_chats, "progress loaded");
                self.progress = progress;
                self.stats = stats;
                self.source = DataSource::Remote;
            }
            Err(e) => {
                let reason = ctx.fallback("progress", e)?;
                self.progress = LearningProgress::default();
                self.stats = ChatStatistics::default();
                self.source = DataSource::Unavailable { reason };
            }
        }
        Ok(())
    }

    pub fn trends(&self) -> Trends {
        trends(&self.stats)
    }

    /// Server-awarded achievements followed by locally computed ones not
    /// already present by title.
    pub fn achievements(&self) -> Vec<Achievement> {
        let mut list = self.progress.achievements.clone();
        for a in achievements(&self.stats, &self.progress.overall) {
            if !list.iter().any(|existing| existing.title == a.title) {
                list.push(a);
            }
        }
        list
    }

    pub fn analysis_prompt(&self, ctx: &ScreenContext<'_>) -> String {
        let domains = if self.stats.domains.is_empty() {
            "None".to_string()
        } else {
            self.stats.domains.keys().cloned().collect::<Vec<_>>().join(", ")
        };
        let domain_progress = if self.progress.domains.is_empty() {
            "None".to_string()
        } else {
            self.progress
                .domains
                .iter()
                .map(|d| {
                    format!(
                        "- {}: {} sessions, {}% confidence",
                        Domain::from_tag(&d.domain).label(),
                        d.count,
                        percent1(d.avg_confidence)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        };
        let overall = &self.progress.overall;
        PromptBuilder::new(ctx.prompts_dir)
            .template(prompt::PROGRESS_ANALYSIS)
            .with_vars([
                ("total_chats", self.stats.total_chats.to_string()),
                ("avg_confidence", percent1(self.stats.avg_confidence)),
                ("domains", domains),
                ("total_interactions", overall.total_interactions.to_string()),
                ("positive_interactions", overall.positive_interactions.to_string()),
                ("average_rating", format!("{:.1}", overall.average_rating)),
                ("domain_progress", domain_progress),
            ])
            .build()
    }

    /// Ask the tutor for an assessment; the raw answer is kept as-is.
    pub async fn analyze(&mut self, ctx: &ScreenContext<'_>) -> Result<&str, AppError> {
        let prompt = self.analysis_prompt(ctx);
        let reply = ctx.tutor.ask(&prompt, &Domain::General).await?;
        info!(chars = reply.text.len(), "progress analysis received");
        Ok(self.analysis.insert(reply.text).as_str())
    }
}
