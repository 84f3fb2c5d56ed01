//! HTTP clients for the backend collaborators.

mod client;
mod favorites;

pub use client::{base_url, BuildRequest, BuildsClient, CategoryEntry};
pub use favorites::{FavoritesRemote, HttpFavoritesClient};
