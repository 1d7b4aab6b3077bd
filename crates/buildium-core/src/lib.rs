//! Buildium Core - library behind the `buildium` CLI
//!
//! The CLI logs in to the Buildium backend, fetches project and tutorial
//! metadata, and scaffolds a local repository by cloning a template and
//! filling in its placeholders.
//!
//! # Architecture
//!
//! - **Session**: the persisted environment + auth token (`session`)
//! - **Backend**: authenticated calls to the backend edge functions (`backend`)
//! - **Templates**: template lookup, cloning and placeholder substitution (`templates`)
//! - **Scaffold**: the prepare → materialize pipeline tying them together (`scaffold`)
//! - **TUI**: cliclack-based command flows (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based command flows
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use buildium_core::{BackendClient, CredentialStore, GitCloner, TutorialScaffold};
//!
//! let store = CredentialStore::from_env();
//! let session = store.load();
//! let client = BackendClient::new(session.config, store);
//!
//! let request = TutorialScaffold {
//!     repo_name: "my-tutorial".into(),
//!     parent_dir: std::env::current_dir()?,
//!     template_override: None,
//! };
//! let report = request.prepare(&client)?.materialize(&GitCloner::new()).await?;
//! ```

pub mod backend;
pub mod error;
pub mod scaffold;
pub mod session;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use backend::{BackendClient, EnvironmentProfile, Project, Tutorial};
pub use error::{Error, Result};
pub use scaffold::{PreparedScaffold, ProjectScaffold, ScaffoldReport, TutorialScaffold};
pub use session::{CredentialStore, Environment, SessionConfig};
pub use templates::{
    apply_all, build_substitution_map, resolve_template_url, GitCloner, RepositoryCloner,
    SubstitutionMap, TemplateKind, TemplateLanguage,
};
