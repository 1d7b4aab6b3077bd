//! Template materialization pipeline
//!
//! Scaffolding runs in two phases so callers can report progress between
//! them:
//!
//! 1. `prepare` checks the session, resolves the template URL and (for
//!    projects) fetches the project and its tutorial, producing the
//!    substitution map.
//! 2. [`PreparedScaffold::materialize`] clones the template and rewrites the
//!    placeholders in the clone.

use crate::backend::{BackendClient, Project, Tutorial};
use crate::error::{require, Result};
use crate::templates::{
    apply_all, build_substitution_map, resolve_template_url, RepositoryCloner, ScaffoldValues,
    SubstitutionMap, TemplateKind,
};
use std::path::PathBuf;

/// Request to scaffold a tutorial repository
#[derive(Debug, Clone)]
pub struct TutorialScaffold {
    pub repo_name: String,
    /// Directory the repository is cloned into
    pub parent_dir: PathBuf,
    /// Clone from here instead of the built-in template
    pub template_override: Option<String>,
}

/// Request to scaffold a starter repository for a backend project
#[derive(Debug, Clone)]
pub struct ProjectScaffold {
    pub project_id: String,
    pub language: String,
    pub repo_name: String,
    pub parent_dir: PathBuf,
    pub template_override: Option<String>,
}

/// Everything needed to clone and customise a template
#[derive(Debug, Clone)]
pub struct PreparedScaffold {
    pub kind: TemplateKind,
    pub template_url: String,
    pub target: PathBuf,
    pub substitutions: SubstitutionMap,
    pub project: Option<Project>,
    pub tutorial: Option<Tutorial>,
}

/// Outcome of a materialized scaffold
#[derive(Debug, Clone)]
pub struct ScaffoldReport {
    pub target: PathBuf,
    pub template_url: String,
    /// Rewritten files, relative to `target`
    pub changed_files: Vec<PathBuf>,
}

fn select_template_url(
    kind: TemplateKind,
    language: &str,
    template_override: &Option<String>,
) -> Result<String> {
    // Resolve even when overridden so an unsupported language still fails early
    let resolved = resolve_template_url(kind, language)?;
    Ok(match template_override {
        Some(url) if !url.trim().is_empty() => url.trim().to_string(),
        _ => resolved.to_string(),
    })
}

impl TutorialScaffold {
    pub fn prepare(&self, client: &BackendClient) -> Result<PreparedScaffold> {
        require("repository name", &self.repo_name)?;
        client.verify_auth_token()?;

        let template_url =
            select_template_url(TemplateKind::Tutorial, "", &self.template_override)?;
        let substitutions = build_substitution_map(ScaffoldValues::Tutorial {
            repo_name: &self.repo_name,
        });

        Ok(PreparedScaffold {
            kind: TemplateKind::Tutorial,
            template_url,
            target: self.parent_dir.join(&self.repo_name),
            substitutions,
            project: None,
            tutorial: None,
        })
    }
}

impl ProjectScaffold {
    pub async fn prepare(&self, client: &BackendClient) -> Result<PreparedScaffold> {
        require("project id", &self.project_id)?;
        require("language", &self.language)?;
        require("repository name", &self.repo_name)?;
        client.verify_auth_token()?;

        let template_url =
            select_template_url(TemplateKind::Project, &self.language, &self.template_override)?;

        tracing::info!(project_id = %self.project_id, "fetching project");
        let project = client.get_project(&self.project_id).await?;
        tracing::info!(tutorial_id = %project.tutorial_id, "fetching tutorial");
        let tutorial = client.get_tutorial(&project.tutorial_id).await?;

        let substitutions = build_substitution_map(ScaffoldValues::Project {
            repo_name: &self.repo_name,
            project: &project,
            tutorial: &tutorial,
        });

        Ok(PreparedScaffold {
            kind: TemplateKind::Project,
            template_url,
            target: self.parent_dir.join(&self.repo_name),
            substitutions,
            project: Some(project),
            tutorial: Some(tutorial),
        })
    }
}

impl PreparedScaffold {
    /// Clone the template into the target directory and fill in placeholders
    pub async fn materialize<C: RepositoryCloner>(&self, cloner: &C) -> Result<ScaffoldReport> {
        cloner.clone_repository(&self.template_url, &self.target).await?;

        let changed_files = apply_all(&self.target, &self.substitutions)?;
        tracing::info!(
            kind = %self.kind,
            changed = changed_files.len(),
            "scaffold complete"
        );

        Ok(ScaffoldReport {
            target: self.target.clone(),
            template_url: self.template_url.clone(),
            changed_files,
        })
    }
}
