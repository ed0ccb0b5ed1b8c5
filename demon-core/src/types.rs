//! Domain types for sync rules.
//!
//! All path fields use `PathBuf`. Types serialize with serde so `demon check
//! --json` can print them.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One configuration row: copy files ending with `extension` from `source`
/// into `destination`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRule {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub extension: String,
}

impl SyncRule {
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            extension: extension.into(),
        }
    }
}

impl fmt::Display for SyncRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' -> '{}' ({})",
            self.source.display(),
            self.destination.display(),
            self.extension
        )
    }
}

/// Rules in file order. Order decides which rule cleans a shared destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet(Vec<SyncRule>);

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: SyncRule) {
        self.0.push(rule);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SyncRule> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[SyncRule] {
        &self.0
    }
}

impl From<Vec<SyncRule>> for RuleSet {
    fn from(rules: Vec<SyncRule>) -> Self {
        Self(rules)
    }
}

impl FromIterator<SyncRule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = SyncRule>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for RuleSet {
    type Item = SyncRule;
    type IntoIter = std::vec::IntoIter<SyncRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a SyncRule;
    type IntoIter = std::slice::Iter<'a, SyncRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
