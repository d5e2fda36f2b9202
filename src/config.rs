//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory
//! (or the path given with `-f`), then applies `MENTOR_WORK_DIR`,
//! `MENTOR_LOG_LEVEL` and `MENTOR_API_URL` env overrides.
//!
//! The default file is optional: when it is absent every section falls back
//! to its built-in defaults. An explicitly requested file must exist.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::AppError;
use crate::models::Domain;
use crate::screens::deadlines::{DeadlineFilter, DeadlineSort};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Remote API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the dashboard API, without trailing slash.
    pub base_url: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Seed screens with mock data when a fetch fails.
    pub offline_fallback: bool,
}

/// Tutor backend configuration.
#[derive(Debug, Clone)]
pub struct TutorConfig {
    /// Which backend is active (`"remote"` or `"echo"`).
    /// Maps to `default` in `[tutor]`.
    pub backend: String,
    /// Use the token-protected chat endpoint instead of the open test endpoint.
    pub authenticated: bool,
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub default_domain: Domain,
}

#[derive(Debug, Clone)]
pub struct DeadlinesConfig {
    pub default_filter: DeadlineFilter,
    pub default_sort: DeadlineSort,
}

/// Fully-resolved client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub app_name: String,
    /// Directory holding the session token and log file (already expanded, no `~`).
    pub work_dir: PathBuf,
    pub log_level: String,
    /// Log file for interactive sessions, resolved against `work_dir`.
    pub log_file: Option<PathBuf>,
    pub api: ApiConfig,
    pub tutor: TutorConfig,
    pub chat: ChatConfig,
    pub deadlines: DeadlinesConfig,
    /// Directory containing the prompt templates.
    pub prompts_dir: PathBuf,
}

impl Config {
    /// Path of the persisted bearer token.
    pub fn session_path(&self) -> PathBuf {
        self.work_dir.join("session.json")
    }
}

/// Raw TOML shape — `serde` target before resolution.
#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    app: RawApp,
    #[serde(default)]
    api: RawApi,
    #[serde(default)]
    tutor: RawTutor,
    #[serde(default)]
    chat: RawChat,
    #[serde(default)]
    deadlines: RawDeadlines,
    #[serde(default)]
    prompts: RawPrompts,
}

#[derive(Deserialize)]
struct RawApp {
    #[serde(default = "default_app_name")]
    name: String,
    #[serde(default = "default_work_dir")]
    work_dir: String,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default)]
    log_file: Option<String>,
}

impl Default for RawApp {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            work_dir: default_work_dir(),
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

#[derive(Deserialize)]
struct RawApi {
    #[serde(default = "default_base_url")]
    base_url: String,
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,
    #[serde(default = "default_true")]
    offline_fallback: bool,
}

impl Default for RawApi {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            offline_fallback: true,
        }
    }
}

#[derive(Deserialize)]
struct RawTutor {
    /// Maps to `default = "..."` in `[tutor]`.
    #[serde(rename = "default", default = "default_tutor_backend")]
    backend: String,
    #[serde(default)]
    authenticated: bool,
}

impl Default for RawTutor {
    fn default() -> Self {
        Self { backend: default_tutor_backend(), authenticated: false }
    }
}

#[derive(Deserialize)]
struct RawChat {
    #[serde(default = "default_domain")]
    default_domain: String,
}

impl Default for RawChat {
    fn default() -> Self {
        Self { default_domain: default_domain() }
    }
}

#[derive(Deserialize)]
struct RawDeadlines {
    #[serde(default = "default_filter")]
    default_filter: String,
    #[serde(default = "default_sort")]
    default_sort: String,
}

impl Default for RawDeadlines {
    fn default() -> Self {
        Self { default_filter: default_filter(), default_sort: default_sort() }
    }
}

#[derive(Deserialize)]
struct RawPrompts {
    #[serde(default = "default_prompts_dir")]
    dir: String,
}

impl Default for RawPrompts {
    fn default() -> Self {
        Self { dir: default_prompts_dir() }
    }
}

fn default_app_name() -> String { "mentor-dash".to_string() }
fn default_work_dir() -> String { "~/.mentor-dash".to_string() }
fn default_log_level() -> String { "warn".to_string() }
fn default_base_url() -> String { "http://localhost:5000".to_string() }
fn default_timeout_seconds() -> u64 { 30 }
fn default_tutor_backend() -> String { "remote".to_string() }
fn default_domain() -> String { "auto".to_string() }
fn default_filter() -> String { "all".to_string() }
fn default_sort() -> String { "deadline".to_string() }
fn default_prompts_dir() -> String { "config/prompts".to_string() }

fn default_true() -> bool {
    true
}

/// Env-var overrides applied on top of the TOML values.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub work_dir: Option<String>,
    pub log_level: Option<String>,
    pub api_url: Option<String>,
}

impl Overrides {
    pub fn from_env() -> Self {
        Self {
            work_dir: env::var("MENTOR_WORK_DIR").ok(),
            log_level: env::var("MENTOR_LOG_LEVEL").ok(),
            api_url: env::var("MENTOR_API_URL").ok(),
        }
    }
}

/// Load config from `path` (default `config/default.toml`), then apply env-var overrides.
pub fn load(path: Option<&str>) -> Result<Config, AppError> {
    let overrides = Overrides::from_env();
    match path {
        Some(p) => load_from(Path::new(p), &overrides),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                load_from(default_path, &overrides)
            } else {
                resolve(RawConfig::default(), &overrides)
            }
        }
    }
}

/// Loader with an explicit path and overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(path: &Path, overrides: &Overrides) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    resolve(parsed, overrides)
}

fn resolve(parsed: RawConfig, overrides: &Overrides) -> Result<Config, AppError> {
    let app = parsed.app;

    let work_dir_str = overrides.work_dir.as_deref().unwrap_or(&app.work_dir);
    let work_dir = expand_home(work_dir_str);
    let log_level = overrides.log_level.clone().unwrap_or(app.log_level);
    let log_file = app.log_file.map(|f| {
        let path = PathBuf::from(f);
        if path.is_absolute() { path } else { work_dir.join(path) }
    });

    let base_url = overrides
        .api_url
        .clone()
        .unwrap_or(parsed.api.base_url)
        .trim_end_matches('/')
        .to_string();
    if base_url.is_empty() {
        return Err(AppError::Config("api.base_url must not be empty".into()));
    }

    let default_filter = parsed
        .deadlines
        .default_filter
        .parse::<DeadlineFilter>()
        .map_err(AppError::Config)?;
    let default_sort = parsed
        .deadlines
        .default_sort
        .parse::<DeadlineSort>()
        .map_err(AppError::Config)?;

    Ok(Config {
        app_name: app.name,
        work_dir,
        log_level,
        log_file,
        api: ApiConfig {
            base_url,
            timeout_seconds: parsed.api.timeout_seconds,
            offline_fallback: parsed.api.offline_fallback,
        },
        tutor: TutorConfig {
            backend: parsed.tutor.backend,
            authenticated: parsed.tutor.authenticated,
        },
        chat: ChatConfig {
            default_domain: Domain::from_tag(&parsed.chat.default_domain),
        },
        deadlines: DeadlinesConfig { default_filter, default_sort },
        prompts_dir: PathBuf::from(parsed.prompts.dir),
    })
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

// ── test helpers ──────────────────────────────────────────────────────────────

/// Safe `Config` for tests — echo tutor, unreachable API, fallback on.
impl Config {
    pub fn test_default(work_dir: &Path) -> Self {
        Self {
            app_name: "test".into(),
            work_dir: work_dir.to_path_buf(),
            log_level: "info".into(),
            log_file: None,
            api: ApiConfig {
                base_url: "http://127.0.0.1:9".into(),
                timeout_seconds: 1,
                offline_fallback: true,
            },
            tutor: TutorConfig { backend: "echo".into(), authenticated: false },
            chat: ChatConfig { default_domain: Domain::Auto },
            deadlines: DeadlinesConfig {
                default_filter: DeadlineFilter::All,
                default_sort: DeadlineSort::Deadline,
            },
            prompts_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/config/prompts")),
        }
    }
}
