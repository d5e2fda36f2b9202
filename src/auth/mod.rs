//! Login, registration and logout.
//!
//! Input is checked locally with the same rules the server applies so the
//! user gets feedback without a round-trip; the server stays authoritative.

pub mod token;

use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use crate::api::types::{AuthData, LoginRequest, RegisterRequest};
use crate::api::{ApiClient, ApiError};
use crate::error::AppError;

pub use token::{StoredSession, TokenStore};

const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Fields collected by the `register` command.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub student_id: String,
    pub course: String,
    pub semester: Option<u32>,
}

pub fn validate_login(email: &str, password: &str) -> Result<LoginRequest, AppError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Input("email and password are required".into()));
    }
    Ok(LoginRequest { email: email.to_string(), password: password.to_string() })
}

pub fn validate_registration(form: &RegistrationForm) -> Result<RegisterRequest, AppError> {
    let required = [
        ("email", form.email.trim()),
        ("password", form.password.as_str()),
        ("full_name", form.full_name.trim()),
        ("student_id", form.student_id.trim()),
    ];
    for (field, value) in required {
        if value.is_empty() {
            return Err(AppError::Input(format!("{field} is required")));
        }
    }
    if !EMAIL_RE.is_match(form.email.trim()) {
        return Err(AppError::Input("invalid email format".into()));
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Input(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(RegisterRequest {
        email: form.email.trim().to_string(),
        password: form.password.clone(),
        full_name: form.full_name.trim().to_string(),
        student_id: form.student_id.trim().to_string(),
        course: form.course.trim().to_string(),
        semester: form.semester.unwrap_or(1),
    })
}

pub async fn login(
    api: &ApiClient,
    store: &TokenStore,
    email: &str,
    password: &str,
) -> Result<StoredSession, AppError> {
    let request = validate_login(email, password)?;
    let data = api.login(&request).await.map_err(auth_failure)?;
    persist(store, data)
}

pub async fn register(
    api: &ApiClient,
    store: &TokenStore,
    form: &RegistrationForm,
) -> Result<StoredSession, AppError> {
    let request = validate_registration(form)?;
    let data = api.register(&request).await.map_err(auth_failure)?;
    persist(store, data)
}

/// Forget the stored token. Returns `false` when already logged out.
pub fn logout(store: &TokenStore) -> Result<bool, AppError> {
    let removed = store.clear()?;
    if removed {
        info!("logged out");
    }
    Ok(removed)
}

fn persist(store: &TokenStore, data: AuthData) -> Result<StoredSession, AppError> {
    let session = StoredSession::new(data.access_token, data.profile);
    store.save(&session)?;
    info!(email = %session.user.email, "session stored");
    Ok(session)
}

/// Client errors (4xx) become auth errors carrying the server's reason;
/// everything else stays an API error.
fn auth_failure(e: ApiError) -> AppError {
    match e {
        ApiError::Status { status, message } if (400..500).contains(&status) => {
            AppError::Auth(message)
        }
        other => AppError::Api(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RegistrationForm {
        RegistrationForm {
            email: "asha@example.edu".into(),
            password: "secret1".into(),
            full_name: "Asha Rao".into(),
            student_id: "S-42".into(),
            course: "CS".into(),
            semester: None,
        }
    }

    #[test]
    fn login_requires_both_fields() {
        assert!(validate_login("", "pw").is_err());
        assert!(validate_login("a@b.co", "").is_err());
        let req = validate_login("  a@b.co ", "pw").unwrap();
        assert_eq!(req.email, "a@b.co");
    }

    #[test]
    fn registration_accepts_valid_form_and_defaults_semester() {
        let req = validate_registration(&form()).unwrap();
        assert_eq!(req.semester, 1);
        assert_eq!(req.student_id, "S-42");
    }

    #[test]
    fn registration_reports_first_missing_field() {
        let mut f = form();
        f.full_name = "  ".into();
        let err = validate_registration(&f).unwrap_err();
        assert!(err.to_string().contains("full_name is required"));
    }

    #[test]
    fn registration_rejects_bad_email() {
        let mut f = form();
        f.email = "asha@localhost".into();
        assert!(validate_registration(&f).unwrap_err().to_string().contains("email"));
    }

    #[test]
    fn registration_rejects_short_password() {
        let mut f = form();
        f.password = "12345".into();
        assert!(validate_registration(&f).unwrap_err().to_string().contains("at least 6"));
    }

    #[test]
    fn client_errors_map_to_auth() {
        let e = auth_failure(ApiError::Status { status: 401, message: "Invalid email or password".into() });
        assert!(matches!(e, AppError::Auth(ref m) if m.contains("Invalid")));
        let e = auth_failure(ApiError::Status { status: 500, message: "boom".into() });
        assert!(matches!(e, AppError::Api(_)));
    }
}
