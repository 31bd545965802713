//! State Management
//!
//! The persisted session. Everything else is local to a page.

pub mod session;
