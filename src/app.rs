//! Application state: long-lived services plus one state object per screen.
//!
//! Services and screens are separate fields so a screen can be borrowed
//! mutably while the services it talks to are borrowed shared.

use tracing::info;

use crate::api::ApiClient;
use crate::auth::{self, RegistrationForm, StoredSession, TokenStore};
use crate::config::Config;
use crate::error::AppError;
use crate::models::UserProfile;
use crate::screens::ScreenContext;
use crate::screens::chat::ChatSession;
use crate::screens::dashboard::DashboardScreen;
use crate::screens::deadlines::DeadlineBoard;
use crate::screens::doubts::DoubtResolver;
use crate::screens::learning::LearningScreen;
use crate::screens::progress::ProgressScreen;
use crate::screens::recommendations::RecommendationBoard;
use crate::tutor::{Tutor, providers};

pub struct Services {
    pub config: Config,
    pub api: ApiClient,
    pub tutor: Tutor,
    store: TokenStore,
    session: Option<StoredSession>,
}

impl Services {
    /// Build the API client and tutor, restoring a stored login if any.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let store = TokenStore::new(config.session_path());
        let session = store.load()?;
        let api = ApiClient::new(&config.api.base_url, config.api.timeout_seconds)?
            .with_token(session.as_ref().map(|s| s.access_token.clone()));
        let tutor = providers::build(&config.tutor, &api)?;
        info!(
            api = %api.base_url(),
            tutor = tutor.name(),
            logged_in = session.is_some(),
            "services ready"
        );
        Ok(Self { config, api, tutor, store, session })
    }

    pub fn ctx(&self) -> ScreenContext<'_> {
        ScreenContext {
            api: &self.api,
            tutor: &self.tutor,
            prompts_dir: &self.config.prompts_dir,
            offline_fallback: self.config.api.offline_fallback,
        }
    }

    pub fn session(&self) -> Option<&StoredSession> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<&StoredSession, AppError> {
        let session = auth::login(&self.api, &self.store, email, password).await?;
        Ok(self.adopt(session))
    }

    pub async fn register(&mut self, form: &RegistrationForm) -> Result<&StoredSession, AppError> {
        let session = auth::register(&self.api, &self.store, form).await?;
        Ok(self.adopt(session))
    }

    /// Returns `false` when there was no stored login.
    pub fn logout(&mut self) -> Result<bool, AppError> {
        let removed = auth::logout(&self.store)?;
        self.session = None;
        self.apply_token(None);
        Ok(removed)
    }

    /// Fetch the profile from the server and store it with the token.
    pub async fn refresh_profile(&mut self) -> Result<&UserProfile, AppError> {
        let profile = self.api.profile().await?;
        let session = match self.session.take() {
            Some(mut s) => {
                s.user = profile;
                s
            }
            None => return Err(AppError::Auth("not logged in".into())),
        };
        self.store.save(&session)?;
        Ok(&self.session.insert(session).user)
    }

    fn adopt(&mut self, session: StoredSession) -> &StoredSession {
        self.apply_token(Some(session.access_token.clone()));
        self.session.insert(session)
    }

    fn apply_token(&mut self, token: Option<String>) {
        self.api.set_token(token.clone());
        self.tutor.set_token(token);
    }
}

pub struct Screens {
    pub chat: ChatSession,
    pub deadlines: DeadlineBoard,
    pub recommendations: RecommendationBoard,
    pub learning: LearningScreen,
    pub progress: ProgressScreen,
    pub doubts: DoubtResolver,
    pub dashboard: DashboardScreen,
}

impl Screens {
    pub fn new(config: &Config, user: Option<&UserProfile>) -> Self {
        Self {
            chat: ChatSession::new(user, config.chat.default_domain.clone()),
            deadlines: DeadlineBoard::default(),
            recommendations: RecommendationBoard::default(),
            learning: LearningScreen::default(),
            progress: ProgressScreen::default(),
            doubts: DoubtResolver::default(),
            dashboard: DashboardScreen::default(),
        }
    }
}

pub struct App {
    pub services: Services,
    pub screens: Screens,
}

impl App {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let services = Services::new(config)?;
        let screens = Screens::new(&services.config, services.user());
        Ok(Self { services, screens })
    }
}
