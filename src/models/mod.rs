// Data models for the Reddit API and the query list

pub mod reddit;

pub use reddit::{CollectionQuery, Listing, Post, RawPost};
