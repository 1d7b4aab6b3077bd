//! Template lookup and substitution map construction

use super::substitution::SubstitutionMap;
use crate::backend::{Project, Tutorial};
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Placeholder for the backend project id
pub const PROJECT_ID_TOKEN: &str = "<YOUR_PROJECT_ID>";
/// Placeholder for the image name, which is the local repository name
pub const IMAGE_NAME_TOKEN: &str = "<YOUR_IMAGE_NAME_HERE>";
/// Placeholder for the tutorial's test harness image
pub const TEST_HARNESS_IMAGE_TOKEN: &str = "<TEST_HARNESS_IMAGE_HERE>";

const TUTORIAL_TEMPLATE_URL: &str = "https://github.com/buildium-org/tutorial_template.git";

/// What is being scaffolded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Project,
    Tutorial,
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateKind::Project => f.write_str("project"),
            TemplateKind::Tutorial => f.write_str("tutorial"),
        }
    }
}

/// Languages with a project starter template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateLanguage {
    Go,
    TypeScript,
}

impl TemplateLanguage {
    pub const ALL: [TemplateLanguage; 2] = [TemplateLanguage::Go, TemplateLanguage::TypeScript];

    /// Canonical command-line name
    pub fn name(&self) -> &'static str {
        match self {
            TemplateLanguage::Go => "go",
            TemplateLanguage::TypeScript => "typescript",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TemplateLanguage::Go => "Go",
            TemplateLanguage::TypeScript => "TypeScript",
        }
    }

    pub fn supported() -> Vec<&'static str> {
        Self::ALL.iter().map(TemplateLanguage::name).collect()
    }

    pub fn template_url(&self) -> &'static str {
        match self {
            TemplateLanguage::Go => "https://github.com/buildium-org/go_template.git",
            TemplateLanguage::TypeScript => "https://github.com/buildium-org/ts_template.git",
        }
    }
}

impl fmt::Display for TemplateLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for TemplateLanguage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "go" | "golang" => Ok(TemplateLanguage::Go),
            "typescript" | "ts" => Ok(TemplateLanguage::TypeScript),
            _ => Err(Error::UnsupportedLanguage {
                language: s.to_string(),
                supported: Self::supported(),
            }),
        }
    }
}

/// Map a scaffold kind and language to the template's clone URL
///
/// The language is ignored for tutorials; projects only accept the languages
/// in [`TemplateLanguage::supported`].
pub fn resolve_template_url(kind: TemplateKind, language: &str) -> Result<Url> {
    let url = match kind {
        TemplateKind::Tutorial => TUTORIAL_TEMPLATE_URL,
        TemplateKind::Project => language.parse::<TemplateLanguage>()?.template_url(),
    };
    Url::parse(url).map_err(|e| Error::Clone {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Values that get substituted into a freshly cloned template
#[derive(Debug, Clone, Copy)]
pub enum ScaffoldValues<'a> {
    Tutorial {
        repo_name: &'a str,
    },
    Project {
        repo_name: &'a str,
        project: &'a Project,
        tutorial: &'a Tutorial,
    },
}

impl ScaffoldValues<'_> {
    pub fn kind(&self) -> TemplateKind {
        match self {
            ScaffoldValues::Tutorial { .. } => TemplateKind::Tutorial,
            ScaffoldValues::Project { .. } => TemplateKind::Project,
        }
    }
}

/// Build the sentinel → value map for a scaffold
pub fn build_substitution_map(values: ScaffoldValues<'_>) -> SubstitutionMap {
    let mut map = SubstitutionMap::new();
    match values {
        ScaffoldValues::Tutorial { repo_name } => {
            map.insert(IMAGE_NAME_TOKEN, repo_name);
        }
        ScaffoldValues::Project {
            repo_name,
            project,
            tutorial,
        } => {
            map.insert(PROJECT_ID_TOKEN, &project.project_id);
            map.insert(IMAGE_NAME_TOKEN, repo_name);
            map.insert(TEST_HARNESS_IMAGE_TOKEN, &tutorial.docker_image);
        }
    }
    map
}
