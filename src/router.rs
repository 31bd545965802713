//! Routing
//!
//! Three paths: `/` (login), `/register`, `/dashboard`. The dashboard sits
//! behind the route guard, which only checks that a token is persisted. No
//! signature or expiry validation happens client-side.

use crate::session::{self, SessionStore, SharedStore};
use std::fmt;

/// Path of the login view
pub const LOGIN_PATH: &str = "/";
/// Path of the register view
pub const REGISTER_PATH: &str = "/register";
/// Path of the guarded dashboard view
pub const DASHBOARD_PATH: &str = "/dashboard";

/// A client route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    NotFound(String),
}

impl Route {
    /// Match a path. Query strings, fragments and trailing slashes are ignored.
    pub fn from_path(path: &str) -> Self {
        let path = path
            .split(&['?', '#'][..])
            .next()
            .unwrap_or_default()
            .trim();
        let trimmed = path.trim_end_matches('/');

        match trimmed {
            "" => Route::Login,
            REGISTER_PATH => Route::Register,
            DASHBOARD_PATH => Route::Dashboard,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Route::Login => LOGIN_PATH,
            Route::Register => REGISTER_PATH,
            Route::Dashboard => DASHBOARD_PATH,
            Route::NotFound(path) => path,
        }
    }

    /// Whether the route guard applies
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Dashboard)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of passing a route through the guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Render the requested route
    Render(Route),
    /// Protected content blocked; show this route instead
    Redirect(Route),
}

impl Resolution {
    /// The route that ends up on screen
    pub fn route(&self) -> &Route {
        match self {
            Resolution::Render(route) | Resolution::Redirect(route) => route,
        }
    }
}

/// Route guard: may protected content render?
pub fn is_authenticated(store: &dyn SessionStore) -> bool {
    session::token(store).is_some()
}

/// Resolve a requested route against the guard
pub fn resolve(route: Route, store: &dyn SessionStore) -> Resolution {
    if route.is_protected() && !is_authenticated(store) {
        tracing::debug!(requested = %route, "Route guard blocked navigation");
        Resolution::Redirect(Route::Login)
    } else {
        Resolution::Render(route)
    }
}

/// Current-location tracker for the app shell
pub struct Router {
    store: SharedStore,
    current: Route,
}

impl Router {
    /// Create a router positioned at the login view
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            current: Route::Login,
        }
    }

    /// Create a router and navigate to `path`
    pub fn start_at(store: SharedStore, path: &str) -> Self {
        let mut router = Self::new(store);
        router.navigate(Route::from_path(path));
        router
    }

    /// Navigate to a route, applying the guard
    pub fn navigate(&mut self, route: Route) -> Resolution {
        let resolution = resolve(route, self.store.as_ref());
        let target = resolution.route().clone();
        tracing::debug!(from = %self.current, to = %target, "Navigating");
        self.current = target;
        resolution
    }

    /// Navigate by path
    pub fn navigate_to(&mut self, path: &str) -> Resolution {
        self.navigate(Route::from_path(path))
    }

    /// Re-run the guard on the current route after the session may have
    /// changed underneath (another process logging out, for one)
    pub fn revalidate(&mut self) -> Resolution {
        let resolution = resolve(self.current.clone(), self.store.as_ref());
        if let Resolution::Redirect(target) = &resolution {
            tracing::debug!(from = %self.current, to = %target, "Session gone, redirecting");
            self.current = target.clone();
        }
        resolution
    }

    pub fn current(&self) -> &Route {
        &self.current
    }
}
