use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::Serialize;

use super::tags::{tag_text, TagMatch};
use super::IndexError;

/// Category name to the sound files tagged with it, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SoundIndex {
    sounds: BTreeMap<String, Vec<String>>,
}

impl SoundIndex {
    /// Scans `dir` (not recursively) for tagged files matching any of `categories`.
    pub fn build<I, S>(dir: &Path, categories: I, mode: TagMatch) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tracing::info!(dir = %dir.display(), "building sound index");
        let listing = list_files(dir)?;
        let index = Self::from_entries(listing.iter().map(String::as_str), categories, mode);
        tracing::info!(
            files = listing.len(),
            categories = index.len(),
            "finished building sound index"
        );
        Ok(index)
    }

    /// Builds an index from an in-memory listing. Entry order is kept.
    pub fn from_entries<'a, E, I, S>(entries: E, categories: I, mode: TagMatch) -> Self
    where
        E: IntoIterator<Item = &'a str>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let categories: BTreeSet<String> = categories
            .into_iter()
            .map(|c| strip_marker(c.as_ref()).to_string())
            .filter(|c| !c.is_empty())
            .collect();

        let mut sounds: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for file in entries {
            let Some(text) = tag_text(file) else {
                continue;
            };
            for category in &categories {
                if mode.matches(text, category) {
                    sounds
                        .entry(category.clone())
                        .or_default()
                        .push(file.to_string());
                }
            }
        }

        Self { sounds }
    }

    /// Files for a category, with a leading `!` stripped from the name.
    pub fn category_sounds(&self, category: &str) -> Option<&[String]> {
        self.sounds
            .get(strip_marker(category))
            .map(Vec::as_slice)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.sounds.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }
}

/// Drops one leading `!` from a category or command name.
pub fn strip_marker(name: &str) -> &str {
    name.strip_prefix('!').unwrap_or(name)
}

fn list_files(dir: &Path) -> Result<Vec<String>, IndexError> {
    let unreadable = |source: std::io::Error| IndexError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let file_type = entry.file_type().map_err(unreadable)?;
        if file_type.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => {
                tracing::debug!(name = ?raw, "skipping non-UTF-8 filename");
            }
        }
    }
    names.sort();
    Ok(names)
}
