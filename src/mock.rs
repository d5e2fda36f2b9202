//! Seed data shown when the API is unreachable (and `offline_fallback` is on),
//! and for screens the API has no endpoint for yet.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{
    Category, DashboardStats, Deadline, Difficulty, DoubtRecord, Domain, Priority, Recommendation,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn timestamp(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_default()
}

pub fn deadlines() -> Vec<Deadline> {
    vec![
        Deadline {
            id: 1,
            title: "Data Science Assignment".into(),
            description: "Complete machine learning project using Python".into(),
            due: date(2025, 8, 5),
            priority: Priority::High,
            category: Category::Assignment,
            is_completed: false,
            created_at: Some("2025-07-25".into()),
        },
        Deadline {
            id: 2,
            title: "Web Development Project".into(),
            description: "Build a React application with API integration".into(),
            due: date(2025, 8, 10),
            priority: Priority::Medium,
            category: Category::Project,
            is_completed: false,
            created_at: Some("2025-07-20".into()),
        },
    ]
}

pub fn recommendations() -> Vec<Recommendation> {
    vec![
        Recommendation {
            id: 1,
            title: "Advanced Python for Data Science".into(),
            description: "Build on your Python foundation with data science applications".into(),
            kind: "course".into(),
            difficulty: Difficulty::Intermediate,
            estimated_time: "6 weeks".into(),
            topics: vec!["pandas".into(), "numpy".into(), "scikit-learn".into()],
            reason: "Based on your interest in data analysis and current Python skills".into(),
            ai_generated: false,
        },
        Recommendation {
            id: 2,
            title: "Machine Learning Fundamentals".into(),
            description: "Learn the core concepts and algorithms of machine learning".into(),
            kind: "course".into(),
            difficulty: Difficulty::Beginner,
            estimated_time: "8 weeks".into(),
            topics: vec![
                "supervised learning".into(),
                "unsupervised learning".into(),
                "model evaluation".into(),
            ],
            reason: "Identified as a growth area in your learning profile".into(),
            ai_generated: false,
        },
    ]
}

pub fn recent_doubts() -> Vec<DoubtRecord> {
    vec![
        DoubtRecord {
            id: Uuid::new_v4(),
            question: "How do I implement a binary search algorithm?".into(),
            domain: Domain::Programming,
            resolved: true,
            timestamp: timestamp("2025-07-29T10:00:00Z"),
        },
        DoubtRecord {
            id: Uuid::new_v4(),
            question: "What is the difference between supervised and unsupervised learning?"
                .into(),
            domain: Domain::DataScience,
            resolved: true,
            timestamp: timestamp("2025-07-28T15:30:00Z"),
        },
    ]
}

pub fn dashboard_stats() -> DashboardStats {
    DashboardStats {
        total_chats: 42,
        domains_explored: 3,
        avg_confidence: 0.85,
        weekly_progress_hours: 12,
        upcoming_deadlines: 2,
        completed_tasks: 8,
    }
}
