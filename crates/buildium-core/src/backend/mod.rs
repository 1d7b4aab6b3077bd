//! Backend API client
//!
//! Three remote operations (login, get-project, get-tutorial) exposed as
//! Supabase edge functions. The environment tag from the session config picks
//! the base URL and API key once, at construction.

pub mod client;
pub mod environment;
pub mod types;

pub use client::BackendClient;
pub use environment::EnvironmentProfile;
pub use types::{Project, Tutorial};
