use crate::routes::{Navigator, Route};
use crate::services::session_store::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(Route),
}

/// Keeps unauthenticated navigation on the login surface.
#[derive(Clone)]
pub struct SessionGuard {
    session: SessionStore,
    navigator: Navigator,
}

impl SessionGuard {
    pub fn new(session: SessionStore, navigator: Navigator) -> Self {
        Self { session, navigator }
    }

    /// Login stays reachable while signed in; every other surface needs a credential.
    pub fn evaluate(&self, target: &Route) -> GuardDecision {
        if target.is_login() || self.session.is_present() {
            return GuardDecision::Proceed;
        }
        tracing::debug!(target = %target, "No session, redirecting to login");
        self.navigator.redirect(Route::Login);
        GuardDecision::Redirect(Route::Login)
    }

    /// Evaluates a raw path. Unknown paths resolve to the home surface.
    pub fn evaluate_path(&self, path: &str) -> GuardDecision {
        let target = Route::parse(path).unwrap_or(Route::HOME);
        self.evaluate(&target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_access_redirects_except_login() {
        let navigator = Navigator::new();
        let guard = SessionGuard::new(SessionStore::new(), navigator.clone());

        assert_eq!(guard.evaluate(&Route::Login), GuardDecision::Proceed);
        assert_eq!(navigator.intent(), None);

        assert_eq!(
            guard.evaluate(&Route::JobDetail(4)),
            GuardDecision::Redirect(Route::Login)
        );
        assert_eq!(navigator.take_intent(), Some(Route::Login));

        assert_eq!(
            guard.evaluate_path("/nowhere"),
            GuardDecision::Redirect(Route::Login)
        );
    }

    #[test]
    fn signed_in_users_pass_everywhere() {
        let session = SessionStore::new();
        session.set("jwt");
        let navigator = Navigator::new();
        let guard = SessionGuard::new(session, navigator.clone());

        assert_eq!(guard.evaluate(&Route::Assistant), GuardDecision::Proceed);
        assert_eq!(guard.evaluate(&Route::Login), GuardDecision::Proceed);
        assert_eq!(navigator.intent(), None);
    }
}
