//! API clients for external services
//!
//! - TMDB: movie metadata and poster URLs

pub mod tmdb;

pub use tmdb::{movie_details_producer, poster_url, MovieSource, TmdbClient, TmdbError};
