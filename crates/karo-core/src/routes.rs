use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use thiserror::Error;

/// Client-visible views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Signup,
    /// The task grid.
    Tasks,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::Tasks => "/",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown route: {0}")]
pub struct ParseRouteError(String);

impl FromStr for Route {
    type Err = ParseRouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_end_matches('/') {
            "" => Ok(Route::Tasks),
            "/login" => Ok(Route::Login),
            "/signup" => Ok(Route::Signup),
            _ => Err(ParseRouteError(s.to_string())),
        }
    }
}

/// Something that can switch the active view.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigation history; the last entry is the active view.
#[derive(Debug)]
pub struct History {
    entries: Mutex<Vec<Route>>,
}

impl History {
    pub fn new(start: Route) -> Self {
        Self {
            entries: Mutex::new(vec![start]),
        }
    }

    pub fn current(&self) -> Route {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.last().copied().unwrap_or(Route::Tasks)
    }

    pub fn entries(&self) -> Vec<Route> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Route::Tasks)
    }
}

impl Navigator for History {
    fn navigate(&self, route: Route) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.last() == Some(&route) {
            return;
        }
        tracing::debug!(route = %route, "navigating");
        entries.push(route);
    }
}
