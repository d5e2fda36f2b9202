//! Tutor backend implementations.
//!
//! `build(config, api)` is the factory, called at startup.
//! Adding a new backend = new module + new match arm.

pub mod echo;
pub mod remote;

use crate::api::ApiClient;
use crate::config::TutorConfig;
use crate::tutor::{Tutor, TutorError};

/// Construct a `Tutor` from config. The remote backend shares `api`
/// (including its current token).
pub fn build(config: &TutorConfig, api: &ApiClient) -> Result<Tutor, TutorError> {
    match config.backend.as_str() {
        "echo" => Ok(Tutor::Echo(echo::EchoTutor)),
        "remote" => Ok(Tutor::Remote(remote::RemoteTutor::new(
            api.clone(),
            config.authenticated,
        ))),
        other => Err(TutorError::UnknownBackend(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> ApiClient {
        ApiClient::new("http://127.0.0.1:9", 1).unwrap()
    }

    #[test]
    fn builds_known_backends() {
        let echo = build(&TutorConfig { backend: "echo".into(), authenticated: false }, &api());
        assert!(matches!(echo, Ok(Tutor::Echo(_))));
        let remote = build(&TutorConfig { backend: "remote".into(), authenticated: true }, &api());
        assert!(matches!(remote, Ok(Tutor::Remote(_))));
    }

    #[test]
    fn unknown_backend_errors() {
        let err = build(&TutorConfig { backend: "gemini".into(), authenticated: false }, &api())
            .unwrap_err();
        assert!(err.to_string().contains("gemini"));
    }
}
