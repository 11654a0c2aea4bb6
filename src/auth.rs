use thiserror::Error;

use crate::config::{SecretResolver, PASSWORD_KEY};

/// Wrong password; the prompt stays up and the user may retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Password incorrect")]
    IncorrectPassword,
}

// ---------------------------------------------------------------------------
// Session – per-window state that survives re-renders
// ---------------------------------------------------------------------------

/// Created once per session. `authenticated` only ever goes from false to true.
#[derive(Debug, Clone, Default)]
pub struct Session {
    authenticated: bool,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn mark_authenticated(&mut self) {
        self.authenticated = true;
    }
}

// ---------------------------------------------------------------------------
// AccessGate
// ---------------------------------------------------------------------------

/// Compares password attempts against the configured secret.
#[derive(Debug, Clone)]
pub struct AccessGate {
    secret: Option<String>,
}

impl AccessGate {
    /// An empty secret counts as no secret.
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    pub fn from_resolver(resolver: &SecretResolver) -> Self {
        let gate = Self::new(resolver.resolve(PASSWORD_KEY));
        if gate.is_open() {
            log::info!("no password configured; access gate is open");
        }
        gate
    }

    /// True when no password is configured.
    pub fn is_open(&self) -> bool {
        self.secret.is_none()
    }

    /// Whether the rest of the app may render for this session.
    pub fn is_unlocked(&self, session: &Session) -> bool {
        self.is_open() || session.is_authenticated()
    }

    /// Check one password attempt.
    ///
    /// * `Ok(true)`: gate open, session already authenticated, or match
    ///   (the session is marked).
    /// * `Ok(false)`: nothing entered yet; keep prompting.
    /// * `Err(IncorrectPassword)`: mismatch.
    ///
    /// Both sides are trimmed; the comparison is exact and case-sensitive.
    pub fn authenticate(&self, session: &mut Session, attempt: &str) -> Result<bool, AuthError> {
        let Some(secret) = &self.secret else {
            return Ok(true);
        };
        if session.is_authenticated() {
            return Ok(true);
        }
        if attempt.is_empty() {
            return Ok(false);
        }
        if attempt.trim() == secret.trim() {
            session.mark_authenticated();
            log::info!("session authenticated");
            Ok(true)
        } else {
            log::warn!("rejected password attempt");
            Err(AuthError::IncorrectPassword)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> AccessGate {
        AccessGate::new(Some("secret".to_string()))
    }

    #[test]
    fn no_secret_means_open_access() {
        let mut session = Session::default();
        for gate in [AccessGate::new(None), AccessGate::new(Some(String::new()))] {
            assert!(gate.is_open());
            assert_eq!(gate.authenticate(&mut session, ""), Ok(true));
        }
        assert!(!session.is_authenticated());
    }

    #[test]
    fn empty_attempt_keeps_prompting() {
        let mut session = Session::default();
        assert_eq!(gate().authenticate(&mut session, ""), Ok(false));
        assert!(!gate().is_unlocked(&session));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let mut session = Session::default();
        assert_eq!(gate().authenticate(&mut session, " secret "), Ok(true));
        assert!(session.is_authenticated());

        let padded = AccessGate::new(Some("  secret\n".to_string()));
        let mut other = Session::default();
        assert_eq!(padded.authenticate(&mut other, "secret"), Ok(true));
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let mut session = Session::default();
        assert_eq!(
            gate().authenticate(&mut session, "Secret"),
            Err(AuthError::IncorrectPassword)
        );
        assert!(!session.is_authenticated());
    }

    #[test]
    fn authenticated_session_skips_the_check() {
        let mut session = Session::default();
        gate().authenticate(&mut session, "secret").unwrap();
        assert_eq!(gate().authenticate(&mut session, "wrong"), Ok(true));
        assert!(gate().is_unlocked(&session));
    }

    #[test]
    fn gate_resolves_password_from_sources() {
        struct Fixed;
        impl crate::config::SecretSource for Fixed {
            fn get(&self, key: &str) -> Option<String> {
                (key == PASSWORD_KEY).then(|| "pw".to_string())
            }
        }
        let gate = AccessGate::from_resolver(&SecretResolver::new(vec![Box::new(Fixed)]));
        assert!(!gate.is_open());
        assert_eq!(gate.authenticate(&mut Session::default(), "pw"), Ok(true));
    }
}
