//! Roster loading.
//!
//! One record per non-blank line. Tokens are separated by runs of whitespace
//! and/or commas. The id/name split is a heuristic, not a parser for
//! arbitrary formats:
//!
//! - one token: name only
//! - first token starts with a digit: `id name...`
//! - last token starts with a digit: `name... id`
//! - otherwise the last token is still taken as the id

use std::fs;
use std::path::{Path, PathBuf};

use starpick_types::{Entity, NonEmptyString};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("no valid entities parsed")]
    Empty,
    #[error("failed to read roster {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A parsed roster plus a label for where it came from.
#[derive(Debug, Clone)]
pub struct Roster {
    entities: Vec<Entity>,
    source: String,
}

impl Roster {
    pub fn from_text(text: &str, source: impl Into<String>) -> Result<Self, RosterError> {
        Ok(Self {
            entities: parse_roster(text)?,
            source: source.into(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, RosterError> {
        let text = fs::read_to_string(path).map_err(|source| RosterError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let source = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
        let roster = Self::from_text(&text, source)?;
        tracing::info!(path = %path.display(), count = roster.len(), "Roster loaded");
        Ok(roster)
    }

    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[must_use]
    pub fn into_entities(self) -> Vec<Entity> {
        self.entities
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Parse every line of `text`; fails only when nothing usable remains.
pub fn parse_roster(text: &str) -> Result<Vec<Entity>, RosterError> {
    let entities: Vec<Entity> = text.lines().filter_map(parse_line).collect();
    if entities.is_empty() {
        return Err(RosterError::Empty);
    }
    Ok(entities)
}

/// Parse a single roster line. Blank lines yield `None`.
#[must_use]
pub fn parse_line(line: &str) -> Option<Entity> {
    let cleaned: String = line.chars().filter(|c| !c.is_control() || c.is_whitespace()).collect();
    let parts: Vec<&str> = cleaned
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .collect();

    let (name, id) = match parts.as_slice() {
        [] => return None,
        [name] => ((*name).to_string(), None),
        [first, rest @ ..] if starts_with_digit(first) => (rest.join(" "), Some(*first)),
        [init @ .., last] => (init.join(" "), Some(*last)),
    };

    let name = NonEmptyString::new(name).ok()?;
    Some(Entity::new(name, id.map(str::to_string)))
}

fn starts_with_digit(token: &str) -> bool {
    token.starts_with(|c: char| c.is_ascii_digit())
}
