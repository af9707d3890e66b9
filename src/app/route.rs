//! Screens and navigation.

use std::fmt;

use super::events::UiEvent;

/// A screen of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Entry point; resolves to the dashboard or the login screen.
    Index,
    /// Login / registration screen.
    Login,
    /// Root of the drive.
    Dashboard,
    /// A folder by id.
    Folder(String),
}

impl Route {
    /// Location path for this route.
    pub fn path(&self) -> String {
        match self {
            Route::Index => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Folder(id) => format!("/folder/{}", urlencoding::encode(id)),
        }
    }

    /// Parse a location path. Unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Self> {
        match path {
            "" | "/" => Some(Route::Index),
            "/login" => Some(Route::Login),
            "/dashboard" => Some(Route::Dashboard),
            _ => {
                let id = path.strip_prefix("/folder/")?;
                if id.is_empty() || id.contains('/') {
                    return None;
                }
                let id = urlencoding::decode(id).ok()?;
                Some(Route::Folder(id.into_owned()))
            }
        }
    }

    /// Whether this route needs a session.
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Dashboard | Route::Folder(_))
    }

    /// Where a request for this route actually lands.
    ///
    /// Protected routes fall back to the login screen without a session, and
    /// the index goes wherever the session state points.
    pub fn resolve(self, authenticated: bool) -> Route {
        match self {
            Route::Index if authenticated => Route::Dashboard,
            Route::Index => Route::Login,
            route if route.is_protected() && !authenticated => Route::Login,
            route => route,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Tracks the current screen.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: Route,
}

impl Navigator {
    /// Start at the index, resolved against the initial session state.
    pub fn new(authenticated: bool) -> Self {
        Self {
            current: Route::Index.resolve(authenticated),
        }
    }

    /// The current screen.
    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Go to `route`, applying the session guard. Returns where we landed.
    pub fn go(&mut self, route: Route, authenticated: bool) -> &Route {
        self.current = route.resolve(authenticated);
        &self.current
    }

    /// React to a published event.
    ///
    /// Navigation requests published by services are taken as-is; they are
    /// only ever issued right after the session changed. A session expiry
    /// always lands on the login screen.
    pub fn observe(&mut self, event: &UiEvent) {
        match event {
            UiEvent::Navigate(route) => self.current = route.clone(),
            UiEvent::SessionExpired => self.current = Route::Login,
            UiEvent::Notify(_) => {}
        }
    }
}
