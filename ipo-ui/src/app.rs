//! App Root Component
//!
//! Router with the three screens. The dashboard sits behind the route guard.

use leptos::*;
use leptos_router::*;

use crate::components::PrivateRoute;
use crate::pages::{Dashboard, Login, Register};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <main class="min-h-screen bg-gray-900 text-white flex items-center justify-center px-4">
                <Routes>
                    <Route path="/" view=Login />
                    <Route path="/register" view=Register />
                    <Route
                        path="/dashboard"
                        view=|| view! { <PrivateRoute><Dashboard /></PrivateRoute> }
                    />
                    <Route path="/*any" view=NotFound />
                </Routes>
            </main>
        </Router>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center text-center">
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-400 mb-6">"The page you're looking for doesn't exist."</p>
            <A
                href="/"
                class="px-6 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
            >
                "Go to Login"
            </A>
        </div>
    }
}
