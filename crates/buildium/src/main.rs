//! buildium CLI - log in and scaffold project and tutorial templates

use anyhow::Result;
use buildium_core::tui::{LoginArgs, ProjectTemplateArgs, TutorialTemplateArgs};
use buildium_core::CredentialStore;
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "buildium")]
#[command(about = "CLI for Buildium projects and tutorials")]
#[command(version)]
pub struct Args {
    /// Show debug logs (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the session token
    Login(CliLoginArgs),
    /// Work with Buildium projects
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Work with Buildium tutorials
    #[command(subcommand)]
    Tutorial(TutorialCommand),
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// Clone the starter template for a project and fill in its details
    CreateTemplate(CliProjectTemplateArgs),
}

#[derive(Subcommand, Debug)]
pub enum TutorialCommand {
    /// Clone the tutorial template and fill in its details
    CreateTemplate(CliTutorialTemplateArgs),
}

#[derive(ClapArgs, Debug)]
pub struct CliLoginArgs {
    /// Email to use for login
    #[arg(long)]
    pub email: Option<String>,

    /// Password to use for login
    #[arg(long)]
    pub password: Option<String>,
}

impl From<CliLoginArgs> for LoginArgs {
    fn from(args: CliLoginArgs) -> Self {
        LoginArgs {
            email: args.email,
            password: args.password,
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct CliProjectTemplateArgs {
    /// Project ID to use for the template
    #[arg(long = "projectid")]
    pub project_id: Option<String>,

    /// Programming language for the template (go, typescript)
    #[arg(long)]
    pub lang: Option<String>,

    /// Repository name for the template
    #[arg(long)]
    pub name: Option<String>,

    /// Clone from this URL instead of the built-in template (for development use)
    #[arg(long = "template-url")]
    pub template_url: Option<String>,
}

impl From<CliProjectTemplateArgs> for ProjectTemplateArgs {
    fn from(args: CliProjectTemplateArgs) -> Self {
        ProjectTemplateArgs {
            project_id: args.project_id,
            language: args.lang,
            name: args.name,
            template_url: args.template_url,
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct CliTutorialTemplateArgs {
    /// Repository name for the template
    #[arg(long)]
    pub name: Option<String>,

    /// Clone from this URL instead of the built-in template (for development use)
    #[arg(long = "template-url")]
    pub template_url: Option<String>,
}

impl From<CliTutorialTemplateArgs> for TutorialTemplateArgs {
    fn from(args: CliTutorialTemplateArgs) -> Self {
        TutorialTemplateArgs {
            name: args.name,
            template_url: args.template_url,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "buildium=debug,buildium_core=debug"
    } else {
        "buildium=warn,buildium_core=warn"
    };
    let filter = match std::env::var("RUST_LOG") {
        Ok(directives) if !directives.is_empty() => EnvFilter::new(directives),
        _ => EnvFilter::new(default_level),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_tracing(args.verbose);

    let store = CredentialStore::from_env();
    tracing::debug!(config = %store.path().display(), "using config file");

    let result = match args.command {
        Command::Login(login_args) => buildium_core::tui::login(store, login_args.into()).await,
        Command::Project(ProjectCommand::CreateTemplate(project_args)) => {
            buildium_core::tui::project_template(store, project_args.into()).await
        }
        Command::Tutorial(TutorialCommand::CreateTemplate(tutorial_args)) => {
            buildium_core::tui::tutorial_template(store, tutorial_args.into()).await
        }
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}
