//! Literal placeholder substitution across a directory tree

use crate::error::{Error, Result};
use regex::bytes::{Captures, Regex};
use std::borrow::Cow;
use std::cmp::Reverse;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Ordered set of sentinel token → replacement value pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionMap {
    pairs: Vec<(String, String)>,
}

impl SubstitutionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pair, replacing the value if the token is already present.
    ///
    /// Empty tokens are ignored: they would match between every byte.
    pub fn insert(&mut self, token: impl Into<String>, value: impl Into<String>) {
        let token = token.into();
        if token.is_empty() {
            return;
        }
        let value = value.into();
        match self.pairs.iter_mut().find(|(t, _)| *t == token) {
            Some(existing) => existing.1 = value,
            None => self.pairs.push((token, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Compile the tokens into a single matcher
    pub fn compile(&self) -> Result<Substituter> {
        if self.pairs.is_empty() {
            return Ok(Substituter {
                pattern: None,
                pairs: Vec::new(),
            });
        }

        // Longest first, so the longer token wins when two start at the same byte
        let mut tokens: Vec<&str> = self.pairs.iter().map(|(t, _)| t.as_str()).collect();
        tokens.sort_by_key(|t| Reverse(t.len()));
        let alternation = tokens
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");

        Ok(Substituter {
            pattern: Some(Regex::new(&alternation)?),
            pairs: self.pairs.clone(),
        })
    }
}

/// A compiled [`SubstitutionMap`]
#[derive(Debug, Clone)]
pub struct Substituter {
    pattern: Option<Regex>,
    pairs: Vec<(String, String)>,
}

impl Substituter {
    /// Replace every token occurrence in one left-to-right pass.
    ///
    /// Inserted values are never rescanned. Returns `None` when the content
    /// would not change.
    pub fn apply(&self, content: &[u8]) -> Option<Vec<u8>> {
        let pattern = self.pattern.as_ref()?;
        let replaced = pattern.replace_all(content, |caps: &Captures<'_>| {
            match self.value_for(&caps[0]) {
                Some(value) => Cow::Borrowed(value),
                None => Cow::Owned(caps[0].to_vec()),
            }
        });
        match replaced {
            Cow::Borrowed(_) => None,
            Cow::Owned(out) => (out != content).then_some(out),
        }
    }

    fn value_for(&self, token: &[u8]) -> Option<&[u8]> {
        self.pairs
            .iter()
            .find(|(t, _)| t.as_bytes() == token)
            .map(|(_, v)| v.as_bytes())
    }
}

/// Apply a substitution map to every regular file under `root`
///
/// Symlinks, directories and special files are skipped. Changed files are
/// rewritten in place with their existing permissions and returned relative
/// to `root`. The first read or write failure aborts the walk; files already
/// rewritten stay rewritten.
pub fn apply_all(root: &Path, map: &SubstitutionMap) -> Result<Vec<PathBuf>> {
    let mut changed = Vec::new();
    if map.is_empty() {
        return Ok(changed);
    }
    let substituter = map.compile()?;

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            Error::io(path, e.into())
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if rewrite_file(path, &substituter)? {
            let relative = path.strip_prefix(root).unwrap_or(path);
            tracing::debug!(path = %relative.display(), "substituted placeholders");
            changed.push(relative.to_path_buf());
        }
    }

    Ok(changed)
}

fn rewrite_file(path: &Path, substituter: &Substituter) -> Result<bool> {
    let permissions = fs::metadata(path)
        .map_err(|e| Error::io(path, e))?
        .permissions();
    let content = fs::read(path).map_err(|e| Error::io(path, e))?;

    let Some(updated) = substituter.apply(&content) else {
        return Ok(false);
    };

    fs::write(path, updated).map_err(|e| Error::io(path, e))?;
    fs::set_permissions(path, permissions).map_err(|e| Error::io(path, e))?;
    Ok(true)
}
