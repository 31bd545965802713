//! Login Page

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::state::session;

/// Shown when login fails without a server detail
pub const LOGIN_FAILED: &str = "Login failed";

/// Login page component
#[component]
pub fn Login() -> impl IntoView {
    let (username, set_username) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (error, set_error) = create_signal(None::<String>);

    let navigate = use_navigate();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_error.set(None);

        let u = username.get();
        let p = password.get();
        let navigate = navigate.clone();

        spawn_local(async move {
            match api::login(&u, &p).await {
                Ok(response) => {
                    let name = response.username.unwrap_or(u);
                    match session::save(&response.access_token, &name) {
                        Ok(()) => navigate("/dashboard", Default::default()),
                        Err(e) => set_error.set(Some(e)),
                    }
                }
                Err(e) => set_error.set(Some(e.message(LOGIN_FAILED))),
            }
        });
    };

    view! {
        <div class="w-full max-w-sm bg-gray-800 rounded-xl p-6 space-y-4">
            <h1 class="text-2xl font-bold">"Login"</h1>

            <form on:submit=on_submit class="space-y-4">
                <input
                    type="text"
                    placeholder="Username"
                    prop:value=move || username.get()
                    on:input=move |ev| set_username.set(event_target_value(&ev))
                    class="w-full bg-gray-700 rounded-lg px-4 py-3 border border-gray-600
                           focus:border-primary-500 focus:outline-none"
                />
                <input
                    type="password"
                    placeholder="Password"
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                    class="w-full bg-gray-700 rounded-lg px-4 py-3 border border-gray-600
                           focus:border-primary-500 focus:outline-none"
                />
                <button
                    type="submit"
                    class="w-full bg-primary-600 hover:bg-primary-700 rounded-lg py-3 font-semibold transition-colors"
                >
                    "Login"
                </button>
            </form>

            {move || error.get().map(|msg| view! { <p class="text-red-400">{msg}</p> })}

            <p class="text-sm text-gray-400">
                "No account? "
                <A href="/register" class="text-primary-400 hover:underline">"Register"</A>
            </p>
        </div>
    }
}
