//! Namespaced identifiers (`namespace:path`) for items and recipes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_NAMESPACE: &str = "minecraft";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("invalid character in namespace of \"{0}\"")]
    BadNamespace(String),
    #[error("invalid character in path of \"{0}\"")]
    BadPath(String),
    #[error("empty identifier")]
    Empty,
}

/// A namespaced id such as `miningmaster:fire_ruby`.
///
/// Parsing `"stone"` yields `minecraft:stone`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier {
    namespace: String,
    path: String,
}

impl Identifier {
    pub fn new(namespace: &str, path: &str) -> Result<Self, IdentifierError> {
        let full = || format!("{namespace}:{path}");
        if path.is_empty() {
            return Err(IdentifierError::Empty);
        }
        if !namespace.chars().all(valid_namespace_char) {
            return Err(IdentifierError::BadNamespace(full()));
        }
        if !path.chars().all(valid_path_char) {
            return Err(IdentifierError::BadPath(full()));
        }
        Ok(Self {
            namespace: namespace.to_owned(),
            path: path.to_owned(),
        })
    }

    /// For literals already known to be valid.
    pub(crate) fn new_unchecked(namespace: &str, path: &str) -> Self {
        Self {
            namespace: namespace.to_owned(),
            path: path.to_owned(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Compare without allocating a parsed identifier.
    pub fn is(&self, namespace: &str, path: &str) -> bool {
        self.namespace == namespace && self.path == path
    }
}

fn valid_namespace_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.')
}

fn valid_path_char(c: char) -> bool {
    valid_namespace_char(c) || c == '/'
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((ns, path)) if !ns.is_empty() => Identifier::new(ns, path),
            Some((_, path)) => Identifier::new(DEFAULT_NAMESPACE, path),
            None => Identifier::new(DEFAULT_NAMESPACE, s),
        }
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}
