//! Personalized recommendations: interest picker, learner profile and
//! AI-generated study suggestions.

use tracing::{debug, info};

use crate::error::AppError;
use crate::mock;
use crate::models::{Difficulty, Domain, Recommendation};
use crate::parse;
use crate::prompt::{self, PromptBuilder, join_or};
use crate::screens::{DataSource, ScreenContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interest {
    pub id: &'static str,
    pub label: &'static str,
    pub category: &'static str,
}

pub const INTERESTS: [Interest; 10] = [
    Interest { id: "python", label: "Python Programming", category: "programming" },
    Interest { id: "javascript", label: "JavaScript", category: "programming" },
    Interest { id: "react", label: "React.js", category: "web_development" },
    Interest { id: "machine_learning", label: "Machine Learning", category: "data_science" },
    Interest { id: "data_analysis", label: "Data Analysis", category: "data_science" },
    Interest { id: "cybersecurity", label: "Cybersecurity", category: "security" },
    Interest { id: "cloud_computing", label: "Cloud Computing", category: "infrastructure" },
    Interest { id: "mobile_development", label: "Mobile Development", category: "mobile" },
    Interest { id: "database_design", label: "Database Design", category: "database" },
    Interest { id: "api_development", label: "API Development", category: "backend" },
];

pub fn interest(id: &str) -> Option<&'static Interest> {
    INTERESTS.iter().find(|i| i.id == id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillLevel {
    pub level: Difficulty,
    pub label: &'static str,
    pub description: &'static str,
}

pub const SKILL_LEVELS: [SkillLevel; 4] = [
    SkillLevel {
        level: Difficulty::Beginner,
        label: "Beginner",
        description: "Just starting out",
    },
    SkillLevel {
        level: Difficulty::Intermediate,
        label: "Intermediate",
        description: "Some experience",
    },
    SkillLevel {
        level: Difficulty::Advanced,
        label: "Advanced",
        description: "Experienced learner",
    },
    SkillLevel { level: Difficulty::Expert, label: "Expert", description: "Deep expertise" },
];

/// Learner self-description fed into the prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct LearnerProfile {
    pub learning_goals: Vec<String>,
    pub preferred_style: String,
    pub hours_per_week: u32,
    pub skill_level: Difficulty,
}

impl Default for LearnerProfile {
    fn default() -> Self {
        Self {
            learning_goals: vec![
                "Improve programming skills".into(),
                "Learn data science".into(),
            ],
            preferred_style: "hands-on".into(),
            hours_per_week: 10,
            skill_level: Difficulty::Intermediate,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceData {
    pub strong_areas: Vec<String>,
    pub weak_areas: Vec<String>,
    pub recent_topics: Vec<String>,
    pub completion_rate: f64,
    pub avg_confidence: f64,
}

impl Default for PerformanceData {
    fn default() -> Self {
        Self {
            strong_areas: vec!["Python basics".into(), "Data visualization".into()],
            weak_areas: vec![
                "Machine learning algorithms".into(),
                "Statistical analysis".into(),
            ],
            recent_topics: vec!["pandas".into(), "matplotlib".into(), "scikit-learn".into()],
            completion_rate: 0.75,
            avg_confidence: 0.68,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecommendationBoard {
    items: Vec<Recommendation>,
    source: DataSource,
    selected: Vec<&'static str>,
    pub profile: LearnerProfile,
    pub performance: PerformanceData,
}

impl Default for RecommendationBoard {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            source: DataSource::NotLoaded,
            selected: vec!["python", "machine_learning", "data_analysis"],
            profile: LearnerProfile::default(),
            performance: PerformanceData::default(),
        }
    }
}

impl RecommendationBoard {
    pub fn items(&self) -> &[Recommendation] {
        &self.items
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Selected interest ids, in selection order.
    pub fn selected_interests(&self) -> &[&'static str] {
        &self.selected
    }

    pub async fn load(&mut self, ctx: &ScreenContext<'_>, domain: &Domain) -> Result<(), AppError> {
        match ctx.api.recommendations(domain.tag()).await {
            Ok(items) => {
                debug!(count = items.len(), domain = %domain, "recommendations loaded");
                self.items = items;
                self.source = DataSource::Remote;
            }
            Err(e) => {
                let reason = ctx.fallback("recommendations", e)?;
                self.items = mock::recommendations();
                self.source = DataSource::Sample { reason };
            }
        }
        Ok(())
    }

    /// Add or remove an interest. Returns `true` when it is now selected.
    pub fn toggle_interest(&mut self, id: &str) -> Result<bool, AppError> {
        let entry = interest(id.trim())
            .ok_or_else(|| AppError::Input(format!("unknown interest '{}'", id.trim())))?;
        if let Some(pos) = self.selected.iter().position(|s| *s == entry.id) {
            self.selected.remove(pos);
            Ok(false)
        } else {
            self.selected.push(entry.id);
            Ok(true)
        }
    }

    pub fn prompt(&self, ctx: &ScreenContext<'_>) -> String {
        let interests: Vec<String> = self
            .selected
            .iter()
            .filter_map(|id| interest(id))
            .map(|i| i.label.to_string())
            .collect();
        let p = &self.performance;
        PromptBuilder::new(ctx.prompts_dir)
            .template(prompt::RECOMMENDATIONS)
            .with_vars([
                ("interests", join_or(&interests, "None selected")),
                ("skill_level", self.profile.skill_level.as_str().to_string()),
                ("goals", join_or(&self.profile.learning_goals, "None")),
                ("hours", self.profile.hours_per_week.to_string()),
                ("style", self.profile.preferred_style.clone()),
                ("strong_areas", join_or(&p.strong_areas, "None")),
                ("weak_areas", join_or(&p.weak_areas, "None")),
                ("recent_topics", join_or(&p.recent_topics, "None")),
                ("completion_rate", format!("{:.0}", p.completion_rate * 100.0)),
                ("avg_confidence", format!("{:.0}", p.avg_confidence * 100.0)),
            ])
            .build()
    }

    /// Replace the list with recommendations parsed from the tutor's answer.
    pub async fn generate(&mut self, ctx: &ScreenContext<'_>) -> Result<&[Recommendation], AppError> {
        let prompt = self.prompt(ctx);
        let reply = ctx.tutor.ask(&prompt, &Domain::General).await?;
        self.items = parse::numbered_recommendations(&reply.text);
        info!(count = self.items.len(), "recommendations generated");
        Ok(&self.items)
    }
}
