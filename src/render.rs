//! Plain-text rendering for the terminal.
//!
//! Every function returns a `String` so output can be asserted in tests and
//! printed by the console or the one-shot commands alike.

use std::fmt::Write as _;

use chrono::{Local, NaiveDate};

use crate::models::{
    Achievement, ChatMessage, Deadline, Domain, DomainProgress, LearningCard, Recommendation, Resolution,
    Sender, SuggestionCard,
};
use crate::screens::DataSource;
use crate::screens::dashboard::{QUICK_ACTIONS, StatCard};
use crate::screens::deadlines::{DeadlineStats, Urgency, days_until};
use crate::screens::learning::{ConfidenceBand, confidence_band};
use crate::screens::progress::{Trend, Trends};

const BAR_WIDTH: usize = 20;

/// `[#####.....]`-style bar for a 0..=100 percentage.
pub fn bar(percent: f64) -> String {
    let clamped = percent.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

/// Rounded percent of a 0..1 ratio.
pub fn percent(ratio: f64) -> String {
    format!("{}%", (ratio * 100.0).round() as i64)
}

fn notice(out: &mut String, source: &DataSource) {
    if let Some(n) = source.notice() {
        let _ = writeln!(out, "  ({n})");
    }
}

// ── Chat ──────────────────────────────────────────────────────────────────────

pub fn chat_message(msg: &ChatMessage) -> String {
    let time = msg.timestamp.with_timezone(&Local).format("%H:%M");
    let who = match msg.sender {
        Sender::User => "you",
        Sender::Ai => "tutor",
    };
    let mut out = format!("[{time}] {who}: {}", msg.text);
    if msg.sender == Sender::Ai {
        let mut meta = Vec::new();
        if msg.domain != Domain::General {
            meta.push(msg.domain.label());
        }
        if let Some(c) = msg.confidence {
            meta.push(format!("{} confident", percent(c)));
        }
        if msg.error {
            meta.push("error".to_string());
        }
        if !meta.is_empty() {
            let _ = write!(out, "\n        ({})", meta.join(", "));
        }
        for s in &msg.suggestions {
            let _ = write!(out, "\n        > {s}");
        }
        for r in &msg.resources {
            let _ = write!(out, "\n        * {r}");
        }
    }
    out
}

// ── Deadlines ─────────────────────────────────────────────────────────────────

fn urgency_marker(u: Urgency) -> &'static str {
    match u {
        Urgency::Overdue => "!!",
        Urgency::Imminent => "! ",
        Urgency::Soon => "~ ",
        Urgency::Relaxed => "  ",
    }
}

fn due_phrase(days: i64) -> String {
    match days {
        d if d < 0 => format!("{} days overdue", -d),
        0 => "due today".to_string(),
        1 => "due tomorrow".to_string(),
        d => format!("{d} days left"),
    }
}

pub fn deadline_rows(rows: &[&Deadline], today: NaiveDate, source: &DataSource) -> String {
    let mut out = String::new();
    notice(&mut out, source);
    if rows.is_empty() {
        out.push_str("  no deadlines\n");
        return out;
    }
    for d in rows {
        let days = days_until(d.due, today);
        let marker = if d.is_completed { "ok" } else { urgency_marker(Urgency::for_days(days)) };
        let status = if d.is_completed { "completed".to_string() } else { due_phrase(days) };
        let _ = writeln!(
            out,
            "{marker} #{:<3} {}  [{} | {}]  {}  ({status})",
            d.id,
            d.title,
            d.priority.as_str(),
            d.category.as_str(),
            d.due.format("%Y-%m-%d"),
        );
        if !d.description.is_empty() {
            let _ = writeln!(out, "        {}", d.description);
        }
    }
    out
}

pub fn deadline_stats(s: &DeadlineStats) -> String {
    format!(
        "total {}  completed {}  overdue {}  due this week {}",
        s.total, s.completed, s.overdue, s.due_this_week
    )
}

pub fn suggestions(cards: &[SuggestionCard]) -> String {
    if cards.is_empty() {
        return "  no suggestions\n".to_string();
    }
    let mut out = String::new();
    for c in cards {
        let _ = writeln!(out, "* {} [{:?}]", c.title, c.kind);
        if !c.content.is_empty() {
            let _ = writeln!(out, "  {}", c.content);
        }
    }
    out
}

// ── Recommendations / learning ────────────────────────────────────────────────

pub fn recommendations(items: &[Recommendation], source: &DataSource) -> String {
    let mut out = String::new();
    notice(&mut out, source);
    for (i, r) in items.iter().enumerate() {
        let tag = if r.ai_generated { " (AI)" } else { "" };
        let _ = writeln!(out, "{}. {}{tag}", i + 1, r.title);
        let _ = writeln!(
            out,
            "   {} | {} | {}",
            r.kind,
            r.difficulty.as_str(),
            r.estimated_time
        );
        if !r.description.is_empty() {
            let _ = writeln!(out, "   {}", r.description);
        }
        if !r.topics.is_empty() {
            let _ = writeln!(out, "   topics: {}", r.topics.join(", "));
        }
        let _ = writeln!(out, "   why: {}", r.reason);
    }
    if items.is_empty() {
        out.push_str("  no recommendations\n");
    }
    out
}

pub fn domain_progress(rows: &[&DomainProgress], source: &DataSource) -> String {
    let mut out = String::new();
    notice(&mut out, source);
    for d in rows {
        let band = match confidence_band(d.avg_confidence) {
            ConfidenceBand::Strong => "strong",
            ConfidenceBand::Fair => "fair",
            ConfidenceBand::Weak => "weak",
        };
        let _ = writeln!(
            out,
            "{:<18} {} {:>4} {band:<6} {} sessions",
            Domain::from_tag(&d.domain).label(),
            bar(d.avg_confidence * 100.0),
            percent(d.avg_confidence),
            d.count
        );
    }
    if rows.is_empty() {
        out.push_str("  no domain activity yet\n");
    }
    out
}

pub fn learning_cards(cards: &[LearningCard]) -> String {
    let mut out = String::new();
    for c in cards {
        let _ = writeln!(out, "* {} [{:?}]", c.title, c.kind);
        if !c.description.is_empty() {
            let _ = writeln!(out, "  {}", c.description);
        }
    }
    out
}

// ── Progress ──────────────────────────────────────────────────────────────────

fn arrow(t: Trend) -> &'static str {
    match t {
        Trend::Up => "up",
        Trend::Stable => "stable",
        Trend::Down => "down",
    }
}

pub fn trends(t: &Trends) -> String {
    format!(
        "confidence {}  activity {}  domains {}",
        arrow(t.confidence),
        arrow(t.activity),
        arrow(t.domain_growth)
    )
}

pub fn achievements(list: &[Achievement]) -> String {
    let mut out = String::new();
    for a in list {
        if a.earned {
            let _ = writeln!(out, "{} {} - {}", a.icon, a.title, a.description);
        } else {
            let p = a.progress.unwrap_or(0.0);
            let _ = writeln!(
                out,
                "{} {} - {} {} {:.0}%",
                a.icon, a.title, a.description, bar(p), p
            );
        }
    }
    out
}

// ── Doubts / dashboard ────────────────────────────────────────────────────────

pub fn resolution(r: &Resolution) -> String {
    let mut out = format!(
        "Q: {}\n[{} | {} confident]\n\n{}\n",
        r.question,
        r.domain.label(),
        percent(r.confidence),
        r.answer
    );
    if !r.suggestions.is_empty() {
        out.push_str("\nsuggestions:\n");
        for s in &r.suggestions {
            let _ = writeln!(out, "  > {s}");
        }
    }
    if !r.resources.is_empty() {
        out.push_str("\nresources:\n");
        for s in &r.resources {
            let _ = writeln!(out, "  * {s}");
        }
    }
    out
}

pub fn dashboard(greeting: &str, name: &str, cards: &[StatCard], source: &DataSource) -> String {
    let mut out = format!("{greeting}, {name}!\n");
    notice(&mut out, source);
    for c in cards {
        let _ = writeln!(out, "  {:<18} {}", c.name, c.value);
    }
    out.push_str("\nquick actions:\n");
    for a in QUICK_ACTIONS {
        let _ = writeln!(out, "  {:<16} {:<38} {}", a.name, a.description, a.command);
    }
    out
}
