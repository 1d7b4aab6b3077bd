//! Template resolution, cloning and placeholder substitution
//!
//! This module provides:
//! - The static template table and the sentinel tokens (resolver)
//! - A git-backed clone primitive behind the `RepositoryCloner` trait
//! - The substitution engine that rewrites placeholders across a cloned tree

pub mod clone;
pub mod resolver;
pub mod substitution;

pub use clone::{GitCloner, RepositoryCloner};
pub use resolver::{
    build_substitution_map, resolve_template_url, ScaffoldValues, TemplateKind, TemplateLanguage,
    IMAGE_NAME_TOKEN, PROJECT_ID_TOKEN, TEST_HARNESS_IMAGE_TOKEN,
};
pub use substitution::{apply_all, Substituter, SubstitutionMap};
