//! IPO Predictor
//!
//! Browser front-end for the IPO first-day prediction API, built with Leptos
//! (WASM).
//!
//! # Features
//!
//! - Login and registration against the remote API
//! - Dashboard form that predicts an IPO's first-day change
//! - Session kept in `localStorage`, dashboard behind a route guard
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. The API base URL is fixed at build time through the
//! `IPO_API_URL` environment variable.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
