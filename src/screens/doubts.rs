//! Doubt resolver: one-off questions answered with a tutoring prompt.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::mock;
use crate::models::{DoubtRecord, Domain, Resolution};
use crate::prompt::{self, PromptBuilder};
use crate::screens::ScreenContext;

pub const MAX_RECENT: usize = 5;
const DEFAULT_CONFIDENCE: f64 = 0.9;

#[derive(Debug, Clone)]
pub struct DoubtResolver {
    recent: Vec<DoubtRecord>,
    last: Option<Resolution>,
}

impl Default for DoubtResolver {
    fn default() -> Self {
        Self { recent: mock::recent_doubts(), last: None }
    }
}

impl DoubtResolver {
    /// Most recent first.
    pub fn recent(&self) -> &[DoubtRecord] {
        &self.recent
    }

    pub fn last(&self) -> Option<&Resolution> {
        self.last.as_ref()
    }

    pub fn prompt(
        &self,
        ctx: &ScreenContext<'_>,
        question: &str,
        context: Option<&str>,
        domain: &Domain,
    ) -> String {
        let context = context
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| format!("Additional Context: {c}"))
            .unwrap_or_default();
        PromptBuilder::new(ctx.prompts_dir)
            .template(prompt::DOUBT)
            .var("question", question)
            .var("context", context)
            .var("domain", domain.spaced())
            .build()
    }

    pub async fn resolve(
        &mut self,
        ctx: &ScreenContext<'_>,
        question: &str,
        context: Option<&str>,
        domain: Domain,
    ) -> Result<&Resolution, AppError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::Input("question is required".into()));
        }
        let prompt = self.prompt(ctx, question, context, &domain);
        let reply = ctx.tutor.ask(&prompt, &domain).await?;

        let now = Utc::now();
        self.recent.insert(
            0,
            DoubtRecord {
                id: Uuid::new_v4(),
                question: question.to_string(),
                domain: domain.clone(),
                resolved: true,
                timestamp: now,
            },
        );
        self.recent.truncate(MAX_RECENT);
        info!(domain = %domain, "doubt resolved");

        Ok(self.last.insert(Resolution {
            question: question.to_string(),
            answer: reply.text,
            domain,
            context: context.map(str::trim).filter(|c| !c.is_empty()).map(str::to_string),
            timestamp: now,
            confidence: reply.confidence.unwrap_or(DEFAULT_CONFIDENCE),
            suggestions: reply.suggestions,
            resources: reply.resources,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::testutil::Fixture;

    #[test]
    fn seeded_with_two_recent_doubts() {
        assert_eq!(DoubtResolver::default().recent().len(), 2);
    }

    #[test]
    fn prompt_includes_optional_context() {
        let fx = Fixture::new();
        let r = DoubtResolver::default();
        let with = r.prompt(&fx.ctx(true), "Why?", Some(" week 3 notes "), &Domain::DataScience);
        assert!(with.contains("Question: Why?"));
        assert!(with.contains("Additional Context: week 3 notes"));
        assert!(with.contains("Domain: data science"));

        let without = r.prompt(&fx.ctx(true), "Why?", Some("  "), &Domain::General);
        assert!(!without.contains("Additional Context"));
    }

    #[test]
    fn braces_in_question_survive_verbatim() {
        let fx = Fixture::new();
        let r = DoubtResolver::default();
        let q = "What does {{domain}} mean in {{context}}?";
        let p = r.prompt(&fx.ctx(true), q, Some("see {{question}}"), &Domain::Programming);
        assert!(p.contains("Question: What does {{domain}} mean in {{context}}?"));
        assert!(p.contains("Additional Context: see {{question}}"));
        assert!(p.contains("Domain: programming"));
    }

    #[tokio::test]
    async fn empty_question_is_rejected() {
        let fx = Fixture::new();
        let mut r = DoubtResolver::default();
        let err = r.resolve(&fx.ctx(true), "  ", None, Domain::General).await.unwrap_err();
        assert!(matches!(err, AppError::Input(_)));
        assert_eq!(r.recent().len(), 2);
    }

    #[tokio::test]
    async fn resolve_prepends_and_caps_history() {
        let fx = Fixture::new();
        let mut r = DoubtResolver::default();
        for i in 0..5 {
            let q = format!("question {i}");
            let res = r.resolve(&fx.ctx(true), &q, None, Domain::Mathematics).await.unwrap();
            assert_eq!(res.question, q);
            assert_eq!(res.confidence, 1.0);
        }
        assert_eq!(r.recent().len(), MAX_RECENT);
        assert_eq!(r.recent()[0].question, "question 4");
        assert!(r.last().unwrap().answer.contains("Question: question 4"));
    }
}
