//! Cluster assignments and their canonical keys

use serde::{Deserialize, Serialize};
use std::fmt;

const KEY_PREFIX: &str = "Cluster ";

/// Raw cluster assignment as produced by a model.
///
/// Some pipelines emit bare indices, others emit labels that are already
/// formatted as `"Cluster {n}"`. Both forms are accepted everywhere and
/// compared through [`ClusterId::key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClusterId {
    Int(i64),
    Key(String),
}

impl ClusterId {
    /// Normalize to the `"Cluster {n}"` form used to index cluster metadata
    pub fn key(&self) -> ClusterKey {
        match self {
            ClusterId::Int(n) => ClusterKey(format!("{KEY_PREFIX}{n}")),
            ClusterId::Key(label) if label.starts_with(KEY_PREFIX) => ClusterKey(label.clone()),
            ClusterId::Key(label) => ClusterKey(format!("{KEY_PREFIX}{label}")),
        }
    }

    /// True when both assignments name the same cluster, whatever their form
    pub fn same_cluster(&self, other: &ClusterId) -> bool {
        self.key() == other.key()
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterId::Int(n) => write!(f, "{n}"),
            ClusterId::Key(label) => f.write_str(label),
        }
    }
}

impl From<i64> for ClusterId {
    fn from(n: i64) -> Self {
        ClusterId::Int(n)
    }
}

impl From<&str> for ClusterId {
    fn from(label: &str) -> Self {
        ClusterId::Key(label.to_string())
    }
}

/// Canonical cluster key, e.g. `"Cluster 3"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterKey(String);

impl ClusterKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClusterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&ClusterId> for ClusterKey {
    fn from(id: &ClusterId) -> Self {
        id.key()
    }
}
