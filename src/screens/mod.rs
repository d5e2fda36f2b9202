//! Screen state for each dashboard view.
//!
//! A screen owns its local state (fetched records, local mutations, parsed AI
//! cards) and talks to the outside world only through a [`ScreenContext`].
//! State lives until the process exits; nothing here is persisted.

pub mod chat;
pub mod dashboard;
pub mod deadlines;
pub mod doubts;
pub mod learning;
pub mod progress;
pub mod recommendations;

use std::path::Path;

use tracing::warn;

use crate::api::{ApiClient, ApiError};
use crate::error::AppError;
use crate::tutor::Tutor;

/// Borrowed handles a screen needs for one operation.
#[derive(Clone, Copy)]
pub struct ScreenContext<'a> {
    pub api: &'a ApiClient,
    pub tutor: &'a Tutor,
    pub prompts_dir: &'a Path,
    pub offline_fallback: bool,
}

impl ScreenContext<'_> {
    /// Decide what a failed fetch means for a screen.
    ///
    /// An unreachable server or a missing login falls back (returning the
    /// reason to show) when `offline_fallback` is on. An error the server
    /// answered with is surfaced.
    pub fn fallback(&self, screen: &str, err: ApiError) -> Result<String, AppError> {
        let eligible = err.is_unreachable() || matches!(err, ApiError::NotLoggedIn);
        if self.offline_fallback && eligible {
            warn!(%screen, error = %err, "fetch failed — falling back");
            Ok(err.to_string())
        } else {
            Err(err.into())
        }
    }
}

/// Where the records currently on a screen came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    NotLoaded,
    Remote,
    /// Mock seed data, shown because the fetch failed for `reason`.
    Sample { reason: String },
    /// Nothing to show; the fetch failed for `reason` and there is no seed.
    Unavailable { reason: String },
}

impl DataSource {
    /// One-line notice for the renderer, `None` for live data.
    pub fn notice(&self) -> Option<String> {
        match self {
            DataSource::Remote => None,
            DataSource::NotLoaded => Some("not loaded yet".to_string()),
            DataSource::Sample { reason } => Some(format!("showing sample data ({reason})")),
            DataSource::Unavailable { reason } => Some(format!("unavailable ({reason})")),
        }
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::path::PathBuf;

    use crate::api::ApiClient;
    use crate::tutor::Tutor;
    use crate::tutor::providers::echo::EchoTutor;

    /// Handles for screen tests: unreachable API, echo tutor, shipped prompts.
    pub struct Fixture {
        pub api: ApiClient,
        pub tutor: Tutor,
        pub prompts_dir: PathBuf,
    }

    impl Fixture {
        pub fn new() -> Self {
            Self {
                api: ApiClient::new("http://127.0.0.1:9", 1).unwrap(),
                tutor: Tutor::Echo(EchoTutor),
                prompts_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/prompts"),
            }
        }

        pub fn ctx(&self, offline_fallback: bool) -> super::ScreenContext<'_> {
            super::ScreenContext {
                api: &self.api,
                tutor: &self.tutor,
                prompts_dir: &self.prompts_dir,
                offline_fallback,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_policy() {
        let fx = testutil::Fixture::new();
        let ctx = fx.ctx(true);
        assert!(ctx.fallback("x", ApiError::NotLoggedIn).is_ok());
        assert!(
            ctx.fallback("x", ApiError::Transport { url: "u".into(), message: "refused".into() })
                .is_ok()
        );
        assert!(
            ctx.fallback("x", ApiError::Status { status: 500, message: "boom".into() }).is_err()
        );

        let strict = fx.ctx(false);
        assert!(strict.fallback("x", ApiError::NotLoggedIn).is_err());
    }

    #[test]
    fn notices() {
        assert_eq!(DataSource::Remote.notice(), None);
        let n = DataSource::Sample { reason: "offline".into() }.notice().unwrap();
        assert!(n.contains("sample") && n.contains("offline"));
    }
}
