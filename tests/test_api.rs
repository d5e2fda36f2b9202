//! End-to-end tests against a canned dashboard API.

mod common;

use chrono::NaiveDate;
use tempfile::TempDir;

use common::{CannedServer, route};
use mentor_dash::api::ApiError;
use mentor_dash::auth::{RegistrationForm, TokenStore};
use mentor_dash::error::AppError;
use mentor_dash::models::{Difficulty, Domain, LearningKind, Priority};
use mentor_dash::screens::DataSource;
use mentor_dash::screens::chat::APOLOGY;
use mentor_dash::screens::deadlines::NewDeadline;

const LOGIN_OK: &str = r#"{
  "success": true,
  "data": {
    "access_token": "tok-123",
    "user_id": 7,
    "email": "asha@example.edu",
    "full_name": "Asha Rao",
    "student_id": 4411,
    "course": "CS",
    "semester": 3
  }
}"#;

const DEADLINES: &str = r#"{"deadlines": [
  {"id": 10, "title": "Thesis draft", "description": "", "deadline": "2025-09-01T00:00:00",
   "priority": "high", "category": "project", "is_completed": false}
]}"#;

async fn logged_in(server: &CannedServer, dir: &TempDir) -> mentor_dash::app::App {
    let mut app = server.app(dir.path());
    app.services.login("asha@example.edu", "secret1").await.expect("login");
    app
}

#[tokio::test]
async fn login_persists_session_and_sends_bearer_token() {
    let server = CannedServer::start(vec![
        route("POST", "/api/auth/login", 200, LOGIN_OK),
        route("GET", "/api/deadlines", 200, DEADLINES),
    ])
    .await;
    let dir = TempDir::new().unwrap();
    let mut app = logged_in(&server, &dir).await;

    let session = app.services.session().unwrap();
    assert_eq!(session.user.first_name(), Some("Asha"));
    assert_eq!(session.user.student_id.as_deref(), Some("4411"));
    let stored = TokenStore::new(dir.path().join("session.json")).load().unwrap().unwrap();
    assert_eq!(stored.access_token, "tok-123");

    let ctx = app.services.ctx();
    app.screens.deadlines.load(&ctx).await.unwrap();
    assert_eq!(app.screens.deadlines.source(), &DataSource::Remote);
    let item = &app.screens.deadlines.items()[0];
    assert_eq!(item.due, NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
    assert_eq!(item.priority, Priority::High);

    let reqs = server.requests();
    let login = &reqs[0];
    assert!(login.body.contains("\"email\":\"asha@example.edu\""));
    assert_eq!(reqs[1].authorization.as_deref(), Some("Bearer tok-123"));
}

#[tokio::test]
async fn rejected_login_is_auth_error() {
    let server = CannedServer::start(vec![route(
        "POST",
        "/api/auth/login",
        401,
        r#"{"error": "Invalid email or password"}"#,
    )])
    .await;
    let dir = TempDir::new().unwrap();
    let mut app = server.app(dir.path());
    let err = app.services.login("asha@example.edu", "wrong").await.unwrap_err();
    assert!(matches!(err, AppError::Auth(ref m) if m == "Invalid email or password"));
    assert!(app.services.session().is_none());
}

#[tokio::test]
async fn register_stores_session_and_profile_refresh_updates_it() {
    let server = CannedServer::start(vec![
        route("POST", "/api/auth/register", 201, LOGIN_OK),
        route(
            "GET",
            "/api/auth/profile",
            200,
            r#"{"success": true, "data": {"user_id": 7, "email": "asha@example.edu",
                "full_name": "Asha R. Rao", "student_id": "4411", "course": "CS", "semester": 4}}"#,
        ),
    ])
    .await;
    let dir = TempDir::new().unwrap();
    let mut app = server.app(dir.path());

    let form = RegistrationForm {
        email: "asha@example.edu".into(),
        password: "secret1".into(),
        full_name: "Asha Rao".into(),
        student_id: "4411".into(),
        course: "CS".into(),
        semester: Some(3),
    };
    app.services.register(&form).await.unwrap();
    let store = TokenStore::new(dir.path().join("session.json"));
    let stored = store.load().unwrap().unwrap();
    assert_eq!(stored.access_token, "tok-123");
    assert_eq!(stored.user.full_name, "Asha Rao");

    let user = app.services.refresh_profile().await.unwrap();
    assert_eq!(user.semester.as_deref(), Some("4"));
    let stored = store.load().unwrap().unwrap();
    assert_eq!(stored.user.full_name, "Asha R. Rao");
    assert_eq!(stored.access_token, "tok-123");

    let reqs = server.requests();
    assert!(reqs[0].body.contains("\"student_id\":\"4411\""));
    assert_eq!(reqs[1].target, "/api/auth/profile");
    assert_eq!(reqs[1].authorization.as_deref(), Some("Bearer tok-123"));
}

#[tokio::test]
async fn authenticated_chat_carries_token_until_logout() {
    let server = CannedServer::start(vec![
        route("POST", "/api/auth/login", 200, LOGIN_OK),
        route(
            "POST",
            "/api/chatbot/message",
            200,
            r#"{"success": true, "data": {"text": "Start with ownership.", "domain": "programming"}}"#,
        ),
    ])
    .await;
    let dir = TempDir::new().unwrap();
    let mut app = server.app_with(dir.path(), |c| c.tutor.authenticated = true);

    app.services.login("asha@example.edu", "secret1").await.unwrap();
    let tutor = &app.services.tutor;
    let reply = app.screens.chat.send(tutor, "where do I start with rust?").await.unwrap();
    assert_eq!(reply.text, "Start with ownership.");
    assert!(!reply.error);

    let reqs = server.requests();
    let chat = reqs.iter().find(|r| r.target == "/api/chatbot/message").unwrap();
    assert_eq!(chat.authorization.as_deref(), Some("Bearer tok-123"));
    assert!(reqs.iter().all(|r| r.target != "/api/chatbot/test"));

    assert!(app.services.logout().unwrap());
    let before = server.requests().len();
    let tutor = &app.services.tutor;
    let reply = app.screens.chat.send(tutor, "and then?").await.unwrap();
    assert_eq!(reply.text, APOLOGY);
    assert!(reply.error);
    assert_eq!(server.requests().len(), before);
}

#[tokio::test]
async fn chat_goes_to_open_endpoint_and_keeps_metadata() {
    let server = CannedServer::start(vec![route(
        "POST",
        "/api/chatbot/test",
        200,
        r#"{"success": true, "data": {
            "text": "Use a dictionary.", "domain": "data_science", "confidence": 0.82,
            "suggestions": ["Try pandas"], "resources": ["docs.python.org"], "error": false
        }}"#,
    )])
    .await;
    let dir = TempDir::new().unwrap();
    let mut app = server.app(dir.path());

    let tutor = &app.services.tutor;
    let reply = app.screens.chat.send(tutor, "how do I count words?").await.unwrap();
    assert_eq!(reply.text, "Use a dictionary.");
    assert_eq!(reply.domain, Domain::DataScience);
    assert_eq!(reply.confidence, Some(0.82));
    assert_eq!(reply.suggestions, vec!["Try pandas".to_string()]);
    assert!(!reply.error);

    let reqs = server.requests();
    assert!(reqs[0].body.contains("\"domain\":\"auto\""));
    assert!(reqs[0].authorization.is_none());
}

#[tokio::test]
async fn unsuccessful_envelope_becomes_apology() {
    let server = CannedServer::start(vec![route(
        "POST",
        "/api/chatbot/test",
        200,
        r#"{"success": false, "error": "model offline"}"#,
    )])
    .await;
    let dir = TempDir::new().unwrap();
    let mut app = server.app(dir.path());

    let err = app.services.api.chat_test("hi", "general").await.unwrap_err();
    assert!(matches!(err, ApiError::Rejected(ref m) if m == "model offline"));

    let tutor = &app.services.tutor;
    let reply = app.screens.chat.send(tutor, "hi").await.unwrap();
    assert_eq!(reply.text, APOLOGY);
    assert!(reply.error);
}

#[tokio::test]
async fn add_deadline_posts_then_refetches() {
    let server = CannedServer::start(vec![
        route("POST", "/api/auth/login", 200, LOGIN_OK),
        route("POST", "/api/deadlines", 201, r#"{"message": "created"}"#),
        route("GET", "/api/deadlines", 200, DEADLINES),
    ])
    .await;
    let dir = TempDir::new().unwrap();
    let mut app = logged_in(&server, &dir).await;

    let ctx = app.services.ctx();
    let form = NewDeadline {
        title: "Thesis draft".into(),
        due: "2025-09-01".into(),
        priority: Priority::High,
        ..Default::default()
    };
    assert_eq!(app.screens.deadlines.add(&ctx, form).await.unwrap(), None);
    assert_eq!(app.screens.deadlines.items().len(), 1);

    let reqs = server.requests();
    let post = reqs.iter().find(|r| r.method == "POST" && r.target == "/api/deadlines").unwrap();
    assert!(post.body.contains("\"due_date\":\"2025-09-01\""));
    assert!(post.body.contains("\"priority\":\"high\""));
    assert!(reqs.last().unwrap().method == "GET");
}

#[tokio::test]
async fn server_error_is_not_masked_by_sample_data() {
    let server = CannedServer::start(vec![
        route("POST", "/api/auth/login", 200, LOGIN_OK),
        route("GET", "/api/deadlines", 500, r#"{"error": "database locked"}"#),
    ])
    .await;
    let dir = TempDir::new().unwrap();
    let mut app = logged_in(&server, &dir).await;

    let ctx = app.services.ctx();
    let err = app.screens.deadlines.load(&ctx).await.unwrap_err();
    assert!(err.to_string().contains("database locked"), "got: {err}");
    assert!(app.screens.deadlines.items().is_empty());
}

#[tokio::test]
async fn progress_combines_statistics_and_learning_data() {
    let server = CannedServer::start(vec![
        route("POST", "/api/auth/login", 200, LOGIN_OK),
        route(
            "GET",
            "/api/chatbot/statistics",
            200,
            r#"{"success": true, "data": {"total_chats": 12, "avg_confidence": 0.83,
                "domains": {"data_science": 8, "general": 3, "cyber_security": 1},
                "most_active_domain": "data_science"}}"#,
        ),
        route(
            "GET",
            "/api/student/learning-progress",
            200,
            r#"{"success": true, "data": {
                "overall_stats": {"total_interactions": 12, "positive_interactions": 6, "average_rating": 4.5},
                "domains": [{"domain": "data_science", "count": 8, "avg_confidence": 0.9}],
                "achievements": []}}"#,
        ),
    ])
    .await;
    let dir = TempDir::new().unwrap();
    let mut app = logged_in(&server, &dir).await;

    let ctx = app.services.ctx();
    app.screens.progress.load(&ctx).await.unwrap();
    let screen = &app.screens.progress;
    assert_eq!(screen.source(), &DataSource::Remote);
    assert_eq!(screen.progress().overall.positive_interactions, 6);

    let titles: Vec<String> = screen.achievements().into_iter().map(|a| a.title).collect();
    assert_eq!(
        titles,
        [
            "Chatty Learner",
            "Confident Learner",
            "Domain Explorer",
            "Positive Learner",
            "Power User"
        ]
    );
}

#[tokio::test]
async fn recommendations_request_carries_domain_query() {
    let server = CannedServer::start(vec![
        route("POST", "/api/auth/login", 200, LOGIN_OK),
        route(
            "GET",
            "/api/student/recommendations",
            200,
            r#"{"success": true, "data": [{"title": "Intro to Rust", "type": "course",
                "difficulty": "beginner", "estimatedTime": "4 weeks"}]}"#,
        ),
    ])
    .await;
    let dir = TempDir::new().unwrap();
    let mut app = logged_in(&server, &dir).await;

    let ctx = app.services.ctx();
    app.screens.recommendations.load(&ctx, &Domain::Programming).await.unwrap();
    let items = app.screens.recommendations.items();
    assert_eq!(items[0].estimated_time, "4 weeks");

    let reqs = server.requests();
    assert_eq!(reqs.last().unwrap().target, "/api/student/recommendations?domain=programming");
}

#[tokio::test]
async fn learning_plan_built_from_statistics_and_parsed_from_reply() {
    let server = CannedServer::start(vec![
        route("POST", "/api/auth/login", 200, LOGIN_OK),
        route(
            "GET",
            "/api/chatbot/statistics",
            200,
            r#"{"success": true, "data": {"total_chats": 12, "avg_confidence": 0.8,
                "domains": {"data_science": 12}, "most_active_domain": "data_science"}}"#,
        ),
        route(
            "POST",
            "/api/chatbot/test",
            200,
            r#"{"success": true, "data": {"text": "Your plan\n1. Recommendation: Master NumPy\nWork through the array exercises.\nSkill focus: vectorisation\n2. Recommendation: Read ISLR\nResource: free PDF online\nChapter 3 first."}}"#,
        ),
    ])
    .await;
    let dir = TempDir::new().unwrap();
    let mut app = logged_in(&server, &dir).await;

    let ctx = app.services.ctx();
    app.screens.learning.set_focus(Some(Domain::DataScience));
    let cards = app.screens.learning.generate(&ctx).await.unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].title, "Recommendation: Master NumPy");
    assert_eq!(cards[0].kind, LearningKind::Skill);
    assert_eq!(cards[1].kind, LearningKind::Resource);
    assert_eq!(cards[1].description, "Chapter 3 first.");

    let reqs = server.requests();
    let stats_at = reqs.iter().position(|r| r.target == "/api/chatbot/statistics").unwrap();
    let chat_at = reqs.iter().position(|r| r.target == "/api/chatbot/test").unwrap();
    assert!(stats_at < chat_at);
    assert!(reqs[chat_at].body.contains("\"domain\":\"data_science\""));
}

#[tokio::test]
async fn generated_recommendations_replace_the_list() {
    let server = CannedServer::start(vec![route(
        "POST",
        "/api/chatbot/test",
        200,
        r#"{"success": true, "data": {"text": "Based on your profile:\n1. Rust for Data Work\nA beginner track, about 3 weeks, because you like Python.\n2. Linear Algebra Refresher\nAdvanced review for your weak area."}}"#,
    )])
    .await;
    let dir = TempDir::new().unwrap();
    let mut app = server.app(dir.path());

    let ctx = app.services.ctx();
    let items = app.screens.recommendations.generate(&ctx).await.unwrap();
    let titles: Vec<&str> = items.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["Rust for Data Work", "Linear Algebra Refresher"]);
    assert!(items.iter().all(|r| r.ai_generated));
    assert_eq!(items[0].difficulty, Difficulty::Beginner);
    assert_eq!(items[0].estimated_time, "3 weeks");
    assert_eq!(items[1].difficulty, Difficulty::Advanced);
}
