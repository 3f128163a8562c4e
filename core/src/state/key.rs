//! Composite ledger keys
//!
//! Every record kind is written under its own namespace, so keys produced for
//! different kinds can never collide. The encoding is
//! `\0 namespace \0 part1 \0 part2 \0 ...`.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::error::{ContractError, Result};

/// Separator between key components
const SEPARATOR: char = '\u{0}';

/// Reserved as an upper bound for range scans over a namespace
const MAX_UNICODE_RUNE: char = '\u{10FFFF}';

/// A key in the shared ledger keyspace
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerKey(String);

impl LedgerKey {
    /// Build a composite key from a namespace and ordered parts
    ///
    /// Fails with `InvalidArgument` if the namespace is empty or any component
    /// contains the separator or the reserved range rune.
    pub fn composite(namespace: &str, parts: &[&str]) -> Result<Self> {
        if namespace.is_empty() {
            return Err(ContractError::InvalidArgument(
                "Composite key namespace must not be empty".to_string(),
            ));
        }
        validate_component(namespace)?;

        let mut key = String::with_capacity(
            2 + namespace.len() + parts.iter().map(|p| p.len() + 1).sum::<usize>(),
        );
        key.push(SEPARATOR);
        key.push_str(namespace);
        key.push(SEPARATOR);
        for part in parts {
            validate_component(part)?;
            key.push_str(part);
            key.push(SEPARATOR);
        }

        Ok(LedgerKey(key))
    }

    /// Split a composite key back into namespace and parts
    pub fn split(&self) -> Result<(String, Vec<String>)> {
        let malformed = || ContractError::MalformedRecord(format!("Not a composite key: {:?}", self.0));

        let body = self.0
            .strip_prefix(SEPARATOR)
            .and_then(|rest| rest.strip_suffix(SEPARATOR))
            .ok_or_else(malformed)?;

        let mut components = body.split(SEPARATOR).map(str::to_string);
        let namespace = components.next().filter(|n| !n.is_empty()).ok_or_else(malformed)?;

        Ok((namespace, components.collect()))
    }

    /// True if this key lies under the partial composite key `prefix`
    pub fn starts_with(&self, prefix: &LedgerKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Wrap an already-encoded key, e.g. one read back from a snapshot
    pub(crate) fn from_raw(raw: String) -> Self {
        LedgerKey(raw)
    }

    /// The raw key string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Separators are rendered as '~' for readable logs
        write!(f, "{}", self.0.replace(SEPARATOR, "~"))
    }
}

fn validate_component(component: &str) -> Result<()> {
    if component.contains(SEPARATOR) || component.contains(MAX_UNICODE_RUNE) {
        return Err(ContractError::InvalidArgument(format!(
            "Key component {:?} contains a reserved character",
            component
        )));
    }
    Ok(())
}
