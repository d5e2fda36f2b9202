//! Prompt templates for AI-generated screens.
//!
//! Templates live as plain text under `config/prompts/` so they can be
//! edited without a rebuild. The shipped copies are also compiled in; a
//! template file missing from the configured directory falls back to its
//! built-in body.
//!
//! Variable substitution uses `{{key}}` syntax and is applied once at
//! [`build()`](PromptBuilder::build) time, after all parts are joined.
//! Substituted values are never rescanned, so a value may itself contain
//! `{{...}}` text.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::{Captures, Regex};

const SEPARATOR: &str = "\n\n";

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("valid placeholder regex"));

/// A named template file with its built-in fallback body.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub file: &'static str,
    pub builtin: &'static str,
}

pub const DEADLINE_ANALYSIS: Template = Template {
    file: "deadline_analysis.txt",
    builtin: include_str!("../config/prompts/deadline_analysis.txt"),
};

pub const RECOMMENDATIONS: Template = Template {
    file: "recommendations.txt",
    builtin: include_str!("../config/prompts/recommendations.txt"),
};

pub const LEARNING_PLAN: Template = Template {
    file: "learning_plan.txt",
    builtin: include_str!("../config/prompts/learning_plan.txt"),
};

pub const PROGRESS_ANALYSIS: Template = Template {
    file: "progress_analysis.txt",
    builtin: include_str!("../config/prompts/progress_analysis.txt"),
};

pub const DOUBT: Template = Template {
    file: "doubt.txt",
    builtin: include_str!("../config/prompts/doubt.txt"),
};

/// Fluent builder that assembles a prompt from template files.
///
/// ```rust
/// use mentor_dash::prompt::{PromptBuilder, DOUBT};
/// let prompt = PromptBuilder::new("config/prompts")
///     .template(DOUBT)
///     .var("question", "What is a closure?")
///     .var("context", "")
///     .var("domain", "programming")
///     .build();
/// assert!(prompt.contains("What is a closure?"));
/// ```
pub struct PromptBuilder {
    prompts_dir: PathBuf,
    parts: Vec<String>,
    vars: HashMap<String, String>,
}

impl PromptBuilder {
    /// Create a builder rooted at `prompts_dir` (e.g. `"config/prompts"`).
    pub fn new(prompts_dir: impl Into<PathBuf>) -> Self {
        Self {
            prompts_dir: prompts_dir.into(),
            parts: Vec::new(),
            vars: HashMap::new(),
        }
    }

    /// Append `template`, read from the prompts directory when present,
    /// otherwise from its built-in body.
    pub fn template(self, template: Template) -> Self {
        let path = self.prompts_dir.join(template.file);
        match fs::read_to_string(&path) {
            Ok(text) => self.append(text),
            Err(_) => {
                tracing::debug!("prompt: '{}' not found — using built-in", path.display());
                self.append(template.builtin)
            }
        }
    }

    /// Directly append a text fragment.
    pub fn append(mut self, text: impl Into<String>) -> Self {
        let s = text.into();
        let trimmed = s.trim().to_string();
        if !trimmed.is_empty() {
            self.parts.push(trimmed);
        }
        self
    }

    /// Register `{{key}}` → `value` substitution pairs applied at build time.
    pub fn with_vars<'a, I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        for (k, v) in vars {
            self.vars.insert(k.to_string(), v);
        }
        self
    }

    /// Register a single variable.
    pub fn var(mut self, key: &str, value: impl Into<String>) -> Self {
        self.vars.insert(key.to_string(), value.into());
        self
    }

    /// Join all parts with blank lines and apply variable substitution.
    ///
    /// Unknown keys are left in place.
    pub fn build(self) -> String {
        let joined = self.parts.join(SEPARATOR);
        let prompt = PLACEHOLDER_RE.replace_all(&joined, |caps: &Captures<'_>| {
            match self.vars.get(&caps[1]) {
                Some(v) => Cow::Borrowed(v.as_str()),
                None => Cow::Owned(caps[0].to_string()),
            }
        });
        prompt.into_owned()
    }
}

/// `items` joined by `", "`, or `fallback` when empty.
pub fn join_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}

/// A 0..1 ratio as a percentage with one decimal (`0.685` → `"68.5"`).
pub fn percent1(ratio: f64) -> String {
    format!("{:.1}", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompts_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/prompts")
    }

    #[test]
    fn template_loaded_from_directory() {
        let result = PromptBuilder::new(prompts_dir()).template(DOUBT).build();
        assert!(result.contains("expert academic tutor"));
    }

    #[test]
    fn missing_directory_falls_back_to_builtin() {
        let result = PromptBuilder::new("/nonexistent/prompts").template(DEADLINE_ANALYSIS).build();
        assert!(result.contains("Analyze the following deadline situation"));
    }

    #[test]
    fn builder_substitutes_variables() {
        let result = PromptBuilder::new(prompts_dir())
            .append("Items: {{items}} / {{count}}")
            .var("items", "a\nb")
            .with_vars([("count", "2".to_string())])
            .build();
        assert_eq!(result, "Items: a\nb / 2");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        for _ in 0..50 {
            let result = PromptBuilder::new(prompts_dir())
                .template(DOUBT)
                .var("question", "What does {{domain}} mean in {{context}}?")
                .var("context", "")
                .var("domain", "programming")
                .build();
            assert!(result.contains("What does {{domain}} mean in {{context}}?"), "{result}");
            assert!(result.contains("programming"));
        }
    }

    #[test]
    fn unknown_placeholder_left_in_place() {
        let result = PromptBuilder::new(prompts_dir()).append("{{a}} {{b}}").var("a", "1").build();
        assert_eq!(result, "1 {{b}}");
    }

    #[test]
    fn parts_joined_with_blank_line() {
        let result = PromptBuilder::new(prompts_dir()).append(" one ").append("").append("two").build();
        assert_eq!(result, "one\n\ntwo");
    }

    #[test]
    fn helpers_format() {
        assert_eq!(join_or(&[], "None"), "None");
        assert_eq!(join_or(&["a".into(), "b".into()], "None"), "a, b");
        assert_eq!(percent1(0.685), "68.5");
        assert_eq!(percent1(0.0), "0.0");
    }
}
