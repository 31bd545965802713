//! Dashboard Page
//!
//! Prediction form, result card and logout.

use leptos::*;
use leptos_router::*;

use crate::api::{self, PredictItem, Prediction};
use crate::state::session;

/// Shown when a prediction fails without a server detail
pub const PREDICTION_FAILED: &str = "Prediction failed";

/// What the result card shows
#[derive(Debug, Clone, PartialEq)]
enum Outcome {
    Success(Prediction),
    Failure(String),
}

/// Two decimals and a percent sign, e.g. `12.35%`
pub fn format_pct(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Dashboard page component
#[component]
pub fn Dashboard() -> impl IntoView {
    let username = session::username().unwrap_or_default();

    let (ticker, set_ticker) = create_signal(String::new());
    let (issue_price, set_issue_price) = create_signal(String::new());
    let (listing_date, set_listing_date) = create_signal(String::new());
    let (exchange, set_exchange) = create_signal(String::new());
    let (sector, set_sector) = create_signal(String::new());
    let result = create_rw_signal(None::<Outcome>);

    let navigate = use_navigate();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let item = PredictItem {
            ticker: ticker.get(),
            // Same leniency as the browser's parseFloat; garbage becomes NaN
            issue_price: js_sys::parse_float(&issue_price.get()),
            listing_date: listing_date.get(),
            exchange: exchange.get(),
            sector: sector.get(),
        };

        // No in-flight guard: whichever response lands last is displayed
        spawn_local(async move {
            let outcome = match api::predict(item).await {
                Ok(response) => match response.results.into_iter().next() {
                    Some(prediction) => Outcome::Success(prediction),
                    None => Outcome::Failure(PREDICTION_FAILED.to_string()),
                },
                Err(e) => Outcome::Failure(e.message(PREDICTION_FAILED)),
            };
            result.set(Some(outcome));
        });
    };

    let logout = move |_| {
        session::clear();
        navigate("/", Default::default());
    };

    view! {
        <div class="w-full max-w-2xl space-y-6">
            <header class="flex items-center justify-between">
                <h1 class="text-2xl font-bold">"IPO Predictor"</h1>
                <div class="flex items-center space-x-4">
                    <span class="text-gray-300">{username}</span>
                    <button
                        on:click=logout
                        class="px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg transition-colors"
                    >
                        "Logout"
                    </button>
                </div>
            </header>

            <form on:submit=on_submit class="bg-gray-800 rounded-xl p-6 grid grid-cols-2 gap-4">
                <Field label="Ticker" value=ticker set_value=set_ticker />
                <Field label="Issue Price (e.g. 120)" value=issue_price set_value=set_issue_price />
                <Field label="Listing Date (YYYY-MM-DD)" value=listing_date set_value=set_listing_date />
                <Field label="Exchange (NSE/BSE/OTH)" value=exchange set_value=set_exchange />
                <Field label="Sector (TECH/FIN/...)" value=sector set_value=set_sector />
                <button
                    type="submit"
                    class="col-span-2 bg-primary-600 hover:bg-primary-700 rounded-lg py-3 font-semibold transition-colors"
                >
                    "Predict"
                </button>
            </form>

            <section class="bg-gray-800 rounded-xl p-6">
                <h2 class="text-xl font-semibold mb-4">"Result"</h2>
                {move || match result.get() {
                    None => view! { <p class="text-gray-400">"No predictions yet"</p> }.into_view(),
                    Some(Outcome::Failure(msg)) => view! { <p class="text-red-400">{msg}</p> }.into_view(),
                    Some(Outcome::Success(prediction)) => view! {
                        <div class="space-y-1">
                            <p>"Ticker: " {prediction.ticker}</p>
                            <p>
                                "Predicted first-day %: "
                                <strong>{format_pct(prediction.predicted_firstday_pct)}</strong>
                            </p>
                        </div>
                    }.into_view(),
                }}
            </section>
        </div>
    }
}

#[component]
fn Field(
    label: &'static str,
    value: ReadSignal<String>,
    set_value: WriteSignal<String>,
) -> impl IntoView {
    view! {
        <input
            type="text"
            placeholder=label
            prop:value=move || value.get()
            on:input=move |ev| set_value.set(event_target_value(&ev))
            class="bg-gray-700 rounded-lg px-4 py-3 border border-gray-600
                   focus:border-primary-500 focus:outline-none"
        />
    }
}
