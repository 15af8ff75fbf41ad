//! Filmography - look up a person's credits on TMDB with trailers and
//! streaming availability.
//!
//! `POST /search` takes `{"name": "..."}` and answers with one record per
//! cast and crew credit of the first matching person.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod services;
#[cfg(feature = "embed-frontend")]
mod static_assets;
pub mod telemetry;
