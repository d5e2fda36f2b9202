//! Learning screen: per-domain progress and an AI-generated learning plan.

use tracing::{debug, warn};

use crate::error::AppError;
use crate::models::{ChatStatistics, Domain, DomainProgress, LearningCard, LearningProgress};
use crate::parse;
use crate::prompt::{self, PromptBuilder, percent1};
use crate::screens::{DataSource, ScreenContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    Strong,
    Fair,
    Weak,
}

pub fn confidence_band(confidence: f64) -> ConfidenceBand {
    if confidence >= 0.8 {
        ConfidenceBand::Strong
    } else if confidence >= 0.6 {
        ConfidenceBand::Fair
    } else {
        ConfidenceBand::Weak
    }
}

#[derive(Debug, Clone)]
pub struct LearningScreen {
    progress: LearningProgress,
    source: DataSource,
    cards: Vec<LearningCard>,
    /// `None` means all domains.
    focus: Option<Domain>,
}

impl Default for LearningScreen {
    fn default() -> Self {
        Self {
            progress: LearningProgress::default(),
            source: DataSource::NotLoaded,
            cards: Vec::new(),
            focus: None,
        }
    }
}

impl LearningScreen {
    pub fn progress(&self) -> &LearningProgress {
        &self.progress
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn cards(&self) -> &[LearningCard] {
        &self.cards
    }

    pub fn focus(&self) -> Option<&Domain> {
        self.focus.as_ref()
    }

    pub fn set_focus(&mut self, focus: Option<Domain>) {
        self.focus = focus;
    }

    /// Domain rows that pass the current filter.
    pub fn domains(&self) -> Vec<&DomainProgress> {
        self.progress
            .domains
            .iter()
            .filter(|d| match &self.focus {
                None => true,
                Some(f) => Domain::from_tag(&d.domain) == *f,
            })
            .collect()
    }

    /// Fetch learning progress. There is no sample data for this screen;
    /// an unreachable server leaves it empty.
    pub async fn load(&mut self, ctx: &ScreenContext<'_>) -> Result<(), AppError> {
        match ctx.api.learning_progress().await {
            Ok(progress) => {
                debug!(domains = progress.domains.len(), "learning progress loaded");
                self.progress = progress;
                self.source = DataSource::Remote;
            }
            Err(e) => {
                let reason = ctx.fallback("learning", e)?;
                self.progress = LearningProgress::default();
                self.source = DataSource::Unavailable { reason };
            }
        }
        Ok(())
    }

    pub fn plan_prompt(&self, ctx: &ScreenContext<'_>, stats: &ChatStatistics) -> String {
        let domains = if stats.domains.is_empty() {
            "None".to_string()
        } else {
            stats.domains.keys().cloned().collect::<Vec<_>>().join(", ")
        };
        let focus = match &self.focus {
            None => "All domains".to_string(),
            Some(d) => d.spaced(),
        };
        PromptBuilder::new(ctx.prompts_dir)
            .template(prompt::LEARNING_PLAN)
            .with_vars([
                ("total_chats", stats.total_chats.to_string()),
                ("avg_confidence", percent1(stats.avg_confidence)),
                ("domains", domains),
                (
                    "most_active_domain",
                    stats.most_active_domain.clone().unwrap_or_else(|| "None".to_string()),
                ),
                ("focus_domain", focus),
            ])
            .build()
    }

    /// Build a plan from the user's chat statistics (empty when they
    /// cannot be fetched) and parse the tutor's answer into cards.
    pub async fn generate(&mut self, ctx: &ScreenContext<'_>) -> Result<&[LearningCard], AppError> {
        let stats = ctx.api.statistics().await.unwrap_or_else(|e| {
            warn!(error = %e, "chat statistics unavailable — planning from empty stats");
            ChatStatistics::default()
        });
        let prompt = self.plan_prompt(ctx, &stats);
        let domain = self.focus.clone().unwrap_or(Domain::General);
        let reply = ctx.tutor.ask(&prompt, &domain).await?;
        self.cards = parse::learning_plan(&reply.text);
        Ok(&self.cards)
    }
}
