// Authentication module
// Manages the app-only bearer token and its on-disk cache

mod manager;
mod refresh;
mod store;
mod types;

pub use manager::CredentialManager;
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use types::{ClientCredentials, Credential, SAFETY_MARGIN_SECS};
