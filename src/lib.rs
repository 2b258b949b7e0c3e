// flairfeed - library root

pub mod auth;
pub mod config;
pub mod error;
pub mod executor;
pub mod http_client;
pub mod models;
pub mod output;
pub mod queries;
pub mod runner;
