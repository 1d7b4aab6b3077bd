//! Charm-style command flows using cliclack

use crate::backend::BackendClient;
use crate::scaffold::{PreparedScaffold, ProjectScaffold, ScaffoldReport, TutorialScaffold};
use crate::session::{ConfigSource, CredentialStore, LoadedSession};
use crate::templates::{GitCloner, TemplateLanguage};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Arguments for `buildium login`
#[derive(Debug, Clone, Default)]
pub struct LoginArgs {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Arguments for `buildium project create-template`
#[derive(Debug, Clone, Default)]
pub struct ProjectTemplateArgs {
    pub project_id: Option<String>,
    pub language: Option<String>,
    pub name: Option<String>,

    /// Clone from this URL instead of the built-in template (for development use)
    pub template_url: Option<String>,
}

/// Arguments for `buildium tutorial create-template`
#[derive(Debug, Clone, Default)]
pub struct TutorialTemplateArgs {
    pub name: Option<String>,

    /// Clone from this URL instead of the built-in template (for development use)
    pub template_url: Option<String>,
}

/// Log in and persist the session token
pub async fn login(store: CredentialStore, args: LoginArgs) -> Result<()> {
    cliclack::intro("buildium login")?;

    let session = load_session(&store, false)?;
    let config_path = store.path().to_path_buf();

    let email = value_or_prompt(args.email, "Email")?;
    let password = match args.password {
        Some(password) => password,
        None if console::user_attended() => cliclack::password("Password").mask('▪').interact()?,
        None => String::new(),
    };

    let mut client = BackendClient::new(session.config, store);

    let spinner = cliclack::spinner();
    spinner.start(format!("Logging in as {}...", email));
    if let Err(e) = client.login(&email, &password).await {
        spinner.stop("Login failed");
        return Err(e).context("Failed to login");
    }
    spinner.stop(format!(
        "Logged in to {} environment",
        client.profile().environment
    ));

    cliclack::outro(format!("Session saved to {}", config_path.display()))?;
    Ok(())
}

/// Scaffold a starter repository for a backend project
pub async fn project_template(store: CredentialStore, args: ProjectTemplateArgs) -> Result<()> {
    cliclack::intro("buildium project create-template")?;

    let session = load_session(&store, true)?;
    let client = BackendClient::new(session.config, store);
    client
        .verify_auth_token()
        .context("Failed to verify auth token")?;

    let request = ProjectScaffold {
        project_id: value_or_prompt(args.project_id, "Project ID")?,
        language: language_or_prompt(args.language)?,
        repo_name: value_or_prompt(args.name, "Repository name")?,
        parent_dir: working_dir(),
        template_override: args.template_url,
    };

    let spinner = cliclack::spinner();
    spinner.start(format!("Fetching project {}...", request.project_id));
    let prepared = match request.prepare(&client).await {
        Ok(prepared) => prepared,
        Err(e) => {
            spinner.stop("Failed to fetch project");
            return Err(e).context("Failed to prepare project template");
        }
    };
    spinner.stop("Fetched project metadata");

    if let (Some(project), Some(tutorial)) = (&prepared.project, &prepared.tutorial) {
        cliclack::log::info(format!(
            "Project: {} ({})\nTutorial: {} ({} stages, test harness {})",
            project.name,
            project.project_id,
            tutorial.name,
            tutorial.stage_count,
            tutorial.docker_image
        ))?;
    }

    materialize(&prepared).await
}

/// Scaffold a tutorial repository
pub async fn tutorial_template(store: CredentialStore, args: TutorialTemplateArgs) -> Result<()> {
    cliclack::intro("buildium tutorial create-template")?;

    let session = load_session(&store, true)?;
    let client = BackendClient::new(session.config, store);
    client
        .verify_auth_token()
        .context("Failed to verify auth token")?;

    let request = TutorialScaffold {
        repo_name: value_or_prompt(args.name, "Repository name")?,
        parent_dir: working_dir(),
        template_override: args.template_url,
    };

    let prepared = request
        .prepare(&client)
        .context("Failed to prepare tutorial template")?;

    materialize(&prepared).await
}

fn load_session(store: &CredentialStore, hint_missing: bool) -> Result<LoadedSession> {
    let session = store.load();
    match &session.source {
        ConfigSource::File => {}
        ConfigSource::Missing if hint_missing => {
            cliclack::log::warning(
                "No config file found, using default config. Run `buildium login` to set your credentials",
            )?;
        }
        ConfigSource::Missing => {}
        ConfigSource::Unreadable(reason) => {
            cliclack::log::warning(format!(
                "Could not read {} ({}), using default config",
                store.path().display(),
                reason
            ))?;
        }
    }
    Ok(session)
}

fn working_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Use the flag value, or ask for it when a user is at the terminal
fn value_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None if console::user_attended() => Ok(cliclack::input(prompt).interact()?),
        None => Ok(String::new()),
    }
}

fn language_or_prompt(value: Option<String>) -> Result<String> {
    if value.is_some() || !console::user_attended() {
        return Ok(value.unwrap_or_default());
    }

    let mut select = cliclack::select("Select a template language");
    for lang in TemplateLanguage::ALL {
        select = select.item(lang.name(), lang.display_name(), "");
    }
    let selected: &str = select.interact()?;
    Ok(selected.to_string())
}

async fn materialize(prepared: &PreparedScaffold) -> Result<()> {
    cliclack::log::info(format!(
        "Cloning {} into {}",
        prepared.template_url,
        prepared.target.display()
    ))?;

    let report = prepared
        .materialize(&GitCloner::new())
        .await
        .context("Failed to create template")?;

    print_report(prepared, &report)?;
    print_next_steps(&report.target)?;
    Ok(())
}

fn print_report(prepared: &PreparedScaffold, report: &ScaffoldReport) -> Result<()> {
    let replacements: Vec<String> = prepared
        .substitutions
        .iter()
        .map(|(token, value)| format!("{} -> {}", token, value))
        .collect();
    cliclack::log::success(format!(
        "Updated {} file(s)\n{}",
        report.changed_files.len(),
        replacements.join("\n")
    ))?;

    for path in &report.changed_files {
        println!("  {} {}", "~".yellow(), path.display());
    }
    Ok(())
}

fn print_next_steps(dir: &Path) -> Result<()> {
    println!();
    println!("  {}", "Next steps".bold());
    println!();
    println!("  1.  cd {}", dir.display());
    println!("  2.  Open README.md to get started");

    cliclack::outro("Happy building!")?;
    Ok(())
}
