//! Login, registration and logout flows.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use super::identity::User;
use super::session::AuthState;
use super::validation::Credentials;
use crate::api::endpoints::{LOGIN_PATH, REGISTER_PATH};
use crate::api::gateway::ApiGateway;
use crate::app::events::{EventBus, Notice};
use crate::app::route::Route;
use crate::error::{DriveError, Result};

/// Wording of one credential flow.
struct FlowText {
    path: &'static str,
    success_title: &'static str,
    success_description: &'static str,
    failure_title: &'static str,
    failure_fallback: &'static str,
}

const LOGIN: FlowText = FlowText {
    path: LOGIN_PATH,
    success_title: "Login successful",
    success_description: "Welcome back to My Personal Drive!",
    failure_title: "Login failed",
    failure_fallback: "Login failed. Please check your credentials.",
};

const REGISTER: FlowText = FlowText {
    path: REGISTER_PATH,
    success_title: "Registration successful",
    success_description: "Welcome to My Personal Drive!",
    failure_title: "Registration failed",
    failure_fallback: "Registration failed. Email might already be in use.",
};

/// Resets the loading flag when a flow ends, however it ends.
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn start(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Session lifecycle driven by the login screen and the logout action.
#[derive(Debug)]
pub struct AuthService {
    gateway: Arc<ApiGateway>,
    auth: Arc<AuthState>,
    events: EventBus,
    loading: AtomicBool,
}

impl AuthService {
    /// Create the service. The gateway's session and bus are used.
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        let auth = gateway.auth().clone();
        let events = gateway.events().clone();
        Self {
            gateway,
            auth,
            events,
            loading: AtomicBool::new(false),
        }
    }

    /// The session this service manages.
    pub fn auth(&self) -> &Arc<AuthState> {
        &self.auth
    }

    /// Whether a login or registration is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Log in with email and password.
    ///
    /// On success the token is persisted, the session starts and the UI is
    /// sent to the dashboard. On failure a notice is shown and the error is
    /// returned. Form validation failures are returned without a notice.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        self.run(&LOGIN, Credentials::new(email, password)).await
    }

    /// Create an account and log in with it.
    pub async fn register(&self, email: &str, password: &str) -> Result<User> {
        self.run(&REGISTER, Credentials::new(email, password)).await
    }

    /// End the session and return to the login screen.
    ///
    /// Safe to call when already logged out.
    pub async fn logout(&self) -> Result<()> {
        let result = self.auth.clear().await;
        if let Err(e) = &result {
            warn!("failed to remove persisted token on logout: {}", e);
        }
        info!("logged out");
        self.events.navigate(Route::Login);
        self.events.notify(Notice::info(
            "Logged out",
            "You have been successfully logged out.",
        ));
        result
    }

    async fn run(&self, flow: &FlowText, credentials: Credentials) -> Result<User> {
        credentials.check()?;

        let _loading = LoadingGuard::start(&self.loading);
        let result = self.exchange(flow, &credentials).await;

        match result {
            Ok(user) => {
                info!(email = %user.email, path = flow.path, "authenticated");
                self.events.navigate(Route::Dashboard);
                self.events
                    .notify(Notice::info(flow.success_title, flow.success_description));
                Ok(user)
            }
            Err(e) => {
                warn!(path = flow.path, "authentication failed: {}", e);
                let description = failure_description(&e, flow.failure_fallback);
                self.events
                    .notify(Notice::destructive(flow.failure_title, description));
                Err(e)
            }
        }
    }

    async fn exchange(&self, flow: &FlowText, credentials: &Credentials) -> Result<User> {
        let token = self.gateway.authenticate(flow.path, credentials).await?;
        self.auth.establish(token).await
    }
}

fn failure_description(error: &DriveError, fallback: &str) -> String {
    error
        .server_message()
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_description_prefers_server_message() {
        let err = DriveError::Api {
            status: 409,
            message: Some("Email already registered".to_string()),
        };
        assert_eq!(
            failure_description(&err, REGISTER.failure_fallback),
            "Email already registered"
        );
    }

    #[test]
    fn test_failure_description_fallback() {
        let err = DriveError::Transport("connection refused".to_string());
        assert_eq!(
            failure_description(&err, LOGIN.failure_fallback),
            "Login failed. Please check your credentials."
        );
    }

    #[test]
    fn test_failure_description_without_body_message() {
        let err = DriveError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(
            failure_description(&err, REGISTER.failure_fallback),
            "Registration failed. Email might already be in use."
        );
    }

    #[test]
    fn test_loading_guard_resets() {
        let flag = AtomicBool::new(false);
        {
            let _guard = LoadingGuard::start(&flag);
            assert!(flag.load(Ordering::SeqCst));
        }
        assert!(!flag.load(Ordering::SeqCst));
    }
}
