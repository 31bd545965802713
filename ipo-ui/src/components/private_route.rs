//! Route Guard
//!
//! Renders its children only when a token is stored; otherwise redirects to
//! the login screen. Checked on every render, not cached.

use leptos::*;
use leptos_router::*;

use crate::state::session;

/// Path unauthenticated visitors are sent to
pub const LOGIN_PATH: &str = "/";

/// Where the guard sends a visitor, `None` to render the protected page
pub fn redirect_target(authenticated: bool) -> Option<&'static str> {
    if authenticated {
        None
    } else {
        Some(LOGIN_PATH)
    }
}

/// Guard for protected routes
#[component]
pub fn PrivateRoute(children: ChildrenFn) -> impl IntoView {
    move || match redirect_target(session::is_authenticated()) {
        None => children().into_view(),
        Some(path) => view! { <Redirect path=path /> }.into_view(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_target() {
        assert_eq!(redirect_target(false), Some("/"));
        assert_eq!(redirect_target(true), None);
    }
}
