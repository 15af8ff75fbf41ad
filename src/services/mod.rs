//! TMDB integration and the search pipeline built on it

pub mod credits;
pub mod filmography;
pub mod people;
pub mod tmdb;

pub use credits::{EnrichOptions, FormattedCredit, MediaKind};
pub use filmography::FilmographyService;
pub use tmdb::{PersonId, TmdbApi, TmdbClient};
