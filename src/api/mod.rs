//! API route definitions
//!
//! `POST /search` is the only data endpoint. The landing page is served by
//! the static fallback in [build_app](crate::app::build_app).

pub mod health;
pub mod search;
