//! API Access

pub mod client;

pub use client::*;
