//! Per-environment group membership snapshots.
//!
//! Each environment has one YAML document at
//! `<base_dir>/ad_groups/<environment>.yaml`:
//!
//! ```yaml
//! groups:
//!   model_publishers_prod:
//!     members: ["alice", "carol"]
//! ```
//!
//! Only a missing or unparseable file is an error. Everything below the
//! document root is read tolerantly: an absent, null or mistyped `groups` or
//! `members` value counts as "no members". That keeps a broken snapshot from
//! ever granting access; it can only deny.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_yaml::Value;
use tracing::{debug, warn};

/// Directory under the platform base dir that holds the snapshots.
pub const GROUPS_DIR: &str = "ad_groups";

/// Extension of a snapshot document.
pub const GROUPS_FILE_EXT: &str = "yaml";

/// A named set of identities. Duplicates are kept but do not matter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Group {
    pub members: Vec<String>,
}

impl Group {
    pub fn new<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, user: &str) -> bool {
        self.members.iter().any(|m| m == user)
    }
}

/// Group name to [`Group`] for one environment, as read in one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupSnapshot {
    groups: BTreeMap<String, Group>,
}

impl GroupSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, name: impl Into<String>, group: Group) -> Self {
        self.groups.insert(name.into(), group);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    /// True when `name` exists and lists `user`. An absent group has no members.
    pub fn is_member(&self, name: &str, user: &str) -> bool {
        self.get(name).is_some_and(|g| g.contains(user))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Build a snapshot from a parsed document, defaulting every absent or
    /// mistyped level to empty.
    pub fn from_document(doc: &Value) -> Self {
        let mut snapshot = Self::new();

        let Some(groups) = doc.get("groups").and_then(Value::as_mapping) else {
            return snapshot;
        };

        for (name, info) in groups {
            let Some(name) = name.as_str() else {
                warn!(key = ?name, "skipping group with non-string name");
                continue;
            };
            let members = info
                .get("members")
                .and_then(Value::as_sequence)
                .map(|seq| {
                    seq.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            snapshot.groups.insert(name.to_string(), Group { members });
        }

        snapshot
    }

    /// Parse YAML text. An empty document is an empty snapshot.
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::new());
        }
        let doc: Value = serde_yaml::from_str(content)?;
        Ok(Self::from_document(&doc))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GroupStoreError {
    #[error("AD group config not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read AD group config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in AD group config {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

/// Anything that can produce the membership snapshot for an environment.
pub trait GroupSource {
    fn load(&self, environment: &str) -> Result<GroupSnapshot, GroupStoreError>;
}

/// File-backed store rooted at the platform repository's base directory.
///
/// Nothing is cached: each [`GroupSource::load`] re-reads the file so that a
/// membership change is visible on the very next run.
#[derive(Debug, Clone)]
pub struct GroupStore {
    base_dir: PathBuf,
}

impl GroupStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Snapshot location for `environment`; the name is lower-cased.
    pub fn path_for(&self, environment: &str) -> PathBuf {
        self.base_dir.join(GROUPS_DIR).join(format!(
            "{}.{}",
            environment.to_lowercase(),
            GROUPS_FILE_EXT
        ))
    }
}

impl GroupSource for GroupStore {
    fn load(&self, environment: &str) -> Result<GroupSnapshot, GroupStoreError> {
        let path = self.path_for(environment);
        if !path.is_file() {
            return Err(GroupStoreError::NotFound { path });
        }

        let content = std::fs::read_to_string(&path).map_err(|source| GroupStoreError::Io {
            path: path.clone(),
            source,
        })?;

        let snapshot =
            GroupSnapshot::from_yaml_str(&content).map_err(|e| GroupStoreError::Parse {
                path: path.clone(),
                message: e.to_string(),
            })?;

        debug!(path = %path.display(), groups = snapshot.len(), "loaded group snapshot");
        Ok(snapshot)
    }
}

/// A fixed snapshot served for every environment.
impl GroupSource for GroupSnapshot {
    fn load(&self, _environment: &str) -> Result<GroupSnapshot, GroupStoreError> {
        Ok(self.clone())
    }
}
