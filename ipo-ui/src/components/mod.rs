//! UI Components
//!
//! Reusable Leptos components.

pub mod private_route;

pub use private_route::PrivateRoute;
