//! App composition
//!
//! Wires the router, the route guard and the three views together. Navigating
//! mounts a fresh view, so form state does not survive leaving a screen.

use crate::client::ApiClient;
use crate::router::{Resolution, Route, Router};
use crate::views::{DashboardView, LoginView, RegisterView, Transition};

/// The view currently mounted
pub enum Screen {
    Login(LoginView),
    Register(RegisterView),
    Dashboard(DashboardView),
    NotFound(String),
}

impl Screen {
    fn mount(route: &Route, client: &ApiClient) -> Self {
        match route {
            Route::Login => Screen::Login(LoginView::new()),
            Route::Register => Screen::Register(RegisterView::new()),
            Route::Dashboard => Screen::Dashboard(DashboardView::new(client.store().clone())),
            Route::NotFound(path) => Screen::NotFound(path.clone()),
        }
    }
}

/// Root application state
pub struct App {
    client: ApiClient,
    router: Router,
    screen: Screen,
}

impl App {
    /// Start the app at `path`, applying the route guard
    pub fn new(client: ApiClient, path: &str) -> Self {
        let router = Router::start_at(client.store().clone(), path);
        let screen = Screen::mount(router.current(), &client);
        Self {
            client,
            router,
            screen,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn route(&self) -> &Route {
        self.router.current()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    /// Navigate and mount the resolved view
    pub fn navigate(&mut self, route: Route) -> Resolution {
        let resolution = self.router.navigate(route);
        self.screen = Screen::mount(self.router.current(), &self.client);
        resolution
    }

    /// Re-run the guard against the current session. Remounts only when the
    /// guard redirects.
    pub fn revalidate(&mut self) -> Resolution {
        let resolution = self.router.revalidate();
        if let Resolution::Redirect(_) = &resolution {
            self.screen = Screen::mount(self.router.current(), &self.client);
        }
        resolution
    }

    /// Carry out a view transition. Delayed redirects sleep first.
    pub async fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Stay => {}
            Transition::Navigate(route) => {
                self.navigate(route);
            }
            Transition::NavigateAfter(route, delay) => {
                tokio::time::sleep(delay).await;
                self.navigate(route);
            }
        }
    }

    /// Submit the form on the current screen
    pub async fn submit(&mut self) -> Transition {
        match &mut self.screen {
            Screen::Login(view) => view.submit(&self.client).await,
            Screen::Register(view) => view.submit(&self.client).await,
            Screen::Dashboard(view) => view.submit(&self.client).await,
            Screen::NotFound(_) => Transition::Stay,
        }
    }

    /// Submit and carry out the resulting transition
    pub async fn submit_and_apply(&mut self) -> Transition {
        let transition = self.submit().await;
        self.apply(transition.clone()).await;
        transition
    }

    /// Log out from the dashboard. No-op elsewhere.
    pub fn logout(&mut self) -> Transition {
        let transition = match &mut self.screen {
            Screen::Dashboard(view) => view.logout(),
            _ => Transition::Stay,
        };
        if let Transition::Navigate(route) = &transition {
            self.navigate(route.clone());
        }
        transition
    }

    /// Plain-text rendering of the current screen
    pub fn render(&self) -> String {
        match &self.screen {
            Screen::Login(view) => view.render(),
            Screen::Register(view) => view.render(),
            Screen::Dashboard(view) => view.render(),
            Screen::NotFound(path) => format!("== Page Not Found ==\nNo page at {}\n", path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_api::MockApi;
    use crate::session::{MemoryStore, SessionStore, TOKEN_KEY, USERNAME_KEY};
    use serde_json::json;
    use std::sync::Arc;

    fn app_at(mock: &MockApi, store: Arc<MemoryStore>, path: &str) -> App {
        App::new(ApiClient::new(mock.base_url(), store), path)
    }

    #[tokio::test]
    async fn test_guard_on_startup() {
        let mock = MockApi::start().await;

        let app = app_at(&mock, Arc::new(MemoryStore::new()), "/dashboard");
        assert_eq!(app.route(), &Route::Login);
        assert!(matches!(app.screen(), Screen::Login(_)));

        let store = Arc::new(MemoryStore::with_values([(TOKEN_KEY, "t")]));
        let app = app_at(&mock, store, "/dashboard");
        assert!(matches!(app.screen(), Screen::Dashboard(_)));
    }

    #[tokio::test]
    async fn test_login_predict_logout_flow() {
        let mock = MockApi::start().await;
        mock.respond("/login", 200, json!({"access_token": "jwt-1", "username": "ivan"}));
        mock.respond(
            "/predict",
            200,
            json!({"results": [{"ticker": "ABC", "predicted_firstday_pct": 12.345}]}),
        );

        let store = Arc::new(MemoryStore::new());
        let mut app = app_at(&mock, store.clone(), "/");

        if let Screen::Login(view) = app.screen_mut() {
            view.username = "ivan".to_string();
            view.password = "pw".to_string();
        }
        let transition = app.submit_and_apply().await;
        assert_eq!(transition, Transition::Navigate(Route::Dashboard));
        assert_eq!(app.route(), &Route::Dashboard);
        assert!(app.render().contains("ivan"));

        if let Screen::Dashboard(view) = app.screen_mut() {
            view.form.ticker = "ABC".to_string();
            view.form.issue_price = "120".to_string();
            view.form.listing_date = "2024-01-01".to_string();
            view.form.exchange = "NSE".to_string();
            view.form.sector = "TECH".to_string();
        }
        app.submit_and_apply().await;
        let rendered = app.render();
        assert!(rendered.contains("ABC"));
        assert!(rendered.contains("12.35%"));

        let calls = mock.calls();
        assert_eq!(calls[1].path, "/predict");
        assert_eq!(calls[1].authorization.as_deref(), Some("Bearer jwt-1"));

        assert_eq!(app.logout(), Transition::Navigate(Route::Login));
        assert_eq!(app.route(), &Route::Login);
        assert!(store.get(TOKEN_KEY).is_none());
        assert!(store.get(USERNAME_KEY).is_none());

        app.navigate(Route::Dashboard);
        assert_eq!(app.route(), &Route::Login);
    }

    #[tokio::test]
    async fn test_register_redirects_to_login() {
        let mock = MockApi::start().await;
        mock.respond("/register", 201, json!({"ok": true}));

        let store = Arc::new(MemoryStore::new());
        let mut app = app_at(&mock, store.clone(), "/register");

        let started = std::time::Instant::now();
        let transition = app.submit_and_apply().await;

        assert!(matches!(transition, Transition::NavigateAfter(Route::Login, _)));
        assert!(started.elapsed() >= std::time::Duration::from_millis(800));
        assert_eq!(app.route(), &Route::Login);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_navigation_remounts_views() {
        let mock = MockApi::start().await;
        mock.respond("/login", 401, json!({"detail": "Invalid credentials"}));

        let mut app = app_at(&mock, Arc::new(MemoryStore::new()), "/");
        app.submit_and_apply().await;
        assert!(app.render().contains("Invalid credentials"));

        app.navigate(Route::Register);
        app.navigate(Route::Login);
        assert!(!app.render().contains("Invalid credentials"));
    }

    #[tokio::test]
    async fn test_revalidate_after_external_logout() {
        let mock = MockApi::start().await;
        let store = Arc::new(MemoryStore::with_values([(TOKEN_KEY, "t"), (USERNAME_KEY, "gus")]));
        let mut app = app_at(&mock, store.clone(), "/dashboard");

        if let Screen::Dashboard(view) = app.screen_mut() {
            view.form.ticker = "KEEP".to_string();
        }
        assert_eq!(app.revalidate(), Resolution::Render(Route::Dashboard));
        assert!(matches!(app.screen(), Screen::Dashboard(view) if view.form.ticker == "KEEP"));

        crate::session::clear_session(store.as_ref()).unwrap();
        assert_eq!(app.revalidate(), Resolution::Redirect(Route::Login));
        assert!(matches!(app.screen(), Screen::Login(_)));
    }

    #[tokio::test]
    async fn test_not_found() {
        let mock = MockApi::start().await;
        let mut app = app_at(&mock, Arc::new(MemoryStore::new()), "/nope");
        assert!(app.render().contains("/nope"));
        assert_eq!(app.submit().await, Transition::Stay);
        assert_eq!(app.logout(), Transition::Stay);
    }
}
