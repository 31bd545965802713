//! Register Page

use leptos::*;
use leptos_router::*;

use crate::api;

/// Shown when registration fails without a server detail
pub const REGISTER_FAILED: &str = "Register failed";

/// Shown after a successful registration
pub const REGISTERED_MESSAGE: &str = "Registered. You can now login.";

/// Delay before returning to login, in milliseconds
pub const REDIRECT_DELAY_MS: u32 = 800;

/// Register page component
#[component]
pub fn Register() -> impl IntoView {
    let (username, set_username) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (message, set_message) = create_signal(None::<String>);

    let navigate = use_navigate();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_message.set(None);

        let u = username.get();
        let p = password.get();
        let navigate = navigate.clone();

        spawn_local(async move {
            match api::register(&u, &p).await {
                Ok(()) => {
                    set_message.set(Some(REGISTERED_MESSAGE.to_string()));
                    gloo_timers::callback::Timeout::new(REDIRECT_DELAY_MS, move || {
                        navigate("/", Default::default());
                    })
                    .forget();
                }
                Err(e) => set_message.set(Some(e.message(REGISTER_FAILED))),
            }
        });
    };

    view! {
        <div class="w-full max-w-sm bg-gray-800 rounded-xl p-6 space-y-4">
            <h1 class="text-2xl font-bold">"Register"</h1>

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
                    "Register"
                </button>
            </form>

            {move || message.get().map(|msg| view! { <p class="text-gray-300">{msg}</p> })}

            <p class="text-sm text-gray-400">
                "Have an account? "
                <A href="/" class="text-primary-400 hover:underline">"Login"</A>
            </p>
        </div>
    }
}
