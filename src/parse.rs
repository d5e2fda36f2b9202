//! Heuristic parsing of AI prose into display cards.
//!
//! The tutor returns free text; these functions split it into cards with
//! keyword and numbered-list heuristics. They never fail: text that matches
//! no heuristic yields fewer (or zero) cards.
//!
//! All truncation counts `char`s, so multi-byte text is never cut mid-codepoint.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{
    Difficulty, LearningCard, LearningKind, Recommendation, SuggestionCard, SuggestionKind,
};

pub const MAX_SUGGESTIONS: usize = 4;
pub const MAX_RECOMMENDATIONS: usize = 6;
pub const MAX_LEARNING_CARDS: usize = 6;
pub const DESCRIPTION_LIMIT: usize = 200;

/// A list marker: digits and a dot followed by whitespace. `1.5 hours` is not a marker.
static LIST_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\s").expect("valid list marker regex"));
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+[-\s]*(?:weeks?|months?|hours?))").expect("valid time regex")
});
static DIFFICULTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(beginner|intermediate|advanced|expert)").expect("valid difficulty regex")
});
static REASON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:because|since|due to|recommended for)[\s:]*(.*?)(?:\.|$)")
        .expect("valid reason regex")
});
static LEADING_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.?\s*").expect("valid leading number regex"));

// ── Deadline suggestions ──────────────────────────────────────────────────────

fn suggestion_kind(line: &str) -> Option<SuggestionKind> {
    if line.contains("Priority") || line.contains("priority") {
        Some(SuggestionKind::Priority)
    } else if line.contains("Time") || line.contains("Schedule") {
        Some(SuggestionKind::Time)
    } else if line.contains("Risk") || line.contains("risk") {
        Some(SuggestionKind::Risk)
    } else if line.contains("Stress") || line.contains("stress") {
        Some(SuggestionKind::Wellness)
    } else {
        None
    }
}

/// Split a deadline analysis into at most [`MAX_SUGGESTIONS`] cards.
///
/// A line mentioning priority, time/schedule, risk or stress (checked in that
/// order) opens a card titled by that line; following lines form its content.
/// Lines before the first such header are dropped.
pub fn deadline_suggestions(text: &str) -> Vec<SuggestionCard> {
    let mut cards = Vec::new();
    let mut current: Option<SuggestionCard> = None;

    for line in text.lines() {
        let clean = line.trim();
        if clean.is_empty() {
            continue;
        }
        match suggestion_kind(clean) {
            Some(kind) => {
                if let Some(card) = current.take() {
                    cards.push(card);
                }
                current = Some(SuggestionCard {
                    title: clean.to_string(),
                    content: String::new(),
                    kind,
                });
            }
            None => {
                if let Some(card) = current.as_mut() {
                    card.content.push_str(clean);
                    card.content.push(' ');
                }
            }
        }
    }
    if let Some(card) = current {
        cards.push(card);
    }

    cards.truncate(MAX_SUGGESTIONS);
    for card in &mut cards {
        let trimmed_len = card.content.trim_end().len();
        card.content.truncate(trimmed_len);
    }
    cards
}

// ── Numbered recommendations ──────────────────────────────────────────────────

/// Split a numbered list of recommendations into at most
/// [`MAX_RECOMMENDATIONS`] cards.
///
/// Text before the first list marker is an introduction and is dropped when
/// a marker exists. In each section the first line is the title and the rest
/// the description; estimated time, difficulty and reason are pulled from the
/// description with keyword patterns.
pub fn numbered_recommendations(text: &str) -> Vec<Recommendation> {
    let mut sections: Vec<&str> = LIST_MARKER_RE.split(text).collect();
    // Models usually open with "Here are some recommendations:"; that line
    // is not a recommendation and must not become card 1.
    if sections.len() > 1 {
        sections.remove(0);
    }

    sections
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .take(MAX_RECOMMENDATIONS)
        .enumerate()
        .map(|(index, section)| section_to_recommendation(index + 1, section))
        .collect()
}

fn section_to_recommendation(id: usize, section: &str) -> Recommendation {
    let lines: Vec<&str> = section
        .trim()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let title = lines
        .first()
        .map(|l| l.trim_start_matches(['*', '-', ' ', '\t']).trim_end_matches('*').trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Learning Recommendation {id}"));
    let description = lines.get(1..).unwrap_or_default().join(" ").trim().to_string();

    let estimated_time = TIME_RE
        .captures(&description)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "Varies".to_string());
    let difficulty = DIFFICULTY_RE
        .captures(&description)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<Difficulty>().ok())
        .unwrap_or_default();
    let reason = REASON_RE
        .captures(&description)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| "AI-generated recommendation".to_string());

    Recommendation {
        id: id as u64,
        title,
        description: truncate_chars(&description, DESCRIPTION_LIMIT),
        kind: "ai_generated".to_string(),
        difficulty,
        estimated_time,
        topics: Vec::new(),
        reason,
        ai_generated: true,
    }
}

/// First `limit` chars of `s`, with `...` appended when anything was cut.
pub fn truncate_chars(s: &str, limit: usize) -> String {
    match s.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}...", &s[..byte_idx]),
        None => s.to_string(),
    }
}

// ── Learning plan ─────────────────────────────────────────────────────────────

/// Split a learning plan into at most [`MAX_LEARNING_CARDS`] cards.
///
/// A line mentioning "recommendation" opens a card (its leading number is
/// stripped). A line mentioning "skill" or "resource" re-tags the current
/// card instead of adding content. Other lines extend the current card.
pub fn learning_plan(text: &str) -> Vec<LearningCard> {
    let mut cards = Vec::new();
    let mut current = LearningCard {
        title: String::new(),
        description: String::new(),
        kind: LearningKind::General,
    };

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.contains("recommendation") || line.contains("Recommendation") {
            if !current.title.is_empty() {
                cards.push(current);
            }
            current = LearningCard {
                title: LEADING_NUMBER_RE.replace(line, "").trim().to_string(),
                description: String::new(),
                kind: LearningKind::Recommendation,
            };
        } else if line.contains("skill") || line.contains("Skill") {
            current.kind = LearningKind::Skill;
        } else if line.contains("resource") || line.contains("Resource") {
            current.kind = LearningKind::Resource;
        } else if !current.title.is_empty() {
            if !current.description.is_empty() {
                current.description.push(' ');
            }
            current.description.push_str(line);
        }
    }
    if !current.title.is_empty() {
        cards.push(current);
    }

    cards.truncate(MAX_LEARNING_CARDS);
    cards
}
