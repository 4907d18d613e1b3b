//! Spoke repository manifest (`project.json`) validation.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. required fields present
//! 2. field types
//! 3. target environment allowed
//! 4. DAG directory exists
//! 5. DAG directory holds at least one definition file
//!
//! The order decides which problem is reported when several exist at once,
//! and callers rely on it.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::outcome::OutcomeClass;

/// Manifest file name at the root of a spoke repository.
pub const MANIFEST_FILE_NAME: &str = "project.json";

/// Suffix of a DAG definition file.
pub const DAG_SOURCE_SUFFIX: &str = ".py";

/// Fields every manifest must declare, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 4] = ["project_name", "team", "dag_path", "allowed_envs"];

#[derive(Debug, thiserror::Error)]
pub enum ManifestLoadError {
    #[error("project.json not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in project.json: {message}")]
    InvalidJson { message: String },

    #[error("project.json must contain a JSON object")]
    NotAnObject,
}

/// Parsed but unchecked manifest document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawManifest {
    fields: Map<String, Value>,
}

impl RawManifest {
    pub fn from_value(value: Value) -> Result<Self, ManifestLoadError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(ManifestLoadError::NotAnObject),
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, ManifestLoadError> {
        let value: Value = serde_json::from_str(s).map_err(|e| ManifestLoadError::InvalidJson {
            message: e.to_string(),
        })?;
        Self::from_value(value)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// First required field that is absent, in [`REQUIRED_FIELDS`] order.
    pub fn first_missing_field(&self) -> Option<&'static str> {
        REQUIRED_FIELDS.into_iter().find(|f| !self.contains(f))
    }
}

/// Location of the manifest inside a spoke checkout.
pub fn manifest_path(spoke_dir: &Path) -> PathBuf {
    spoke_dir.join(MANIFEST_FILE_NAME)
}

/// Read and parse a manifest file. Any failure here is a configuration error.
pub fn load_manifest(path: &Path) -> Result<RawManifest, ManifestLoadError> {
    if !path.exists() {
        return Err(ManifestLoadError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|source| ManifestLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    RawManifest::from_json_str(&content)
}

/// Typed view of a manifest that has all required fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectManifest {
    pub project_name: String,
    pub team: String,
    /// Relative to the spoke root.
    pub dag_path: String,
    pub allowed_envs: Vec<String>,
}

impl ProjectManifest {
    pub fn allows(&self, environment: &str) -> bool {
        self.allowed_envs.iter().any(|e| e == environment)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid {
        manifest: ProjectManifest,
        dag_dir: PathBuf,
        /// File names only, sorted.
        dag_files: Vec<String>,
    },
    MissingField {
        field: &'static str,
    },
    /// Required fields are present but have the wrong shape.
    Malformed {
        message: String,
    },
    EnvNotAllowed {
        environment: String,
        manifest: ProjectManifest,
    },
    PathNotFound {
        path: PathBuf,
    },
    /// The DAG directory exists but could not be listed.
    DirectoryUnreadable {
        path: PathBuf,
        message: String,
    },
    NoDefinitionsFound {
        path: PathBuf,
    },
}

impl ValidationOutcome {
    pub fn class(&self) -> OutcomeClass {
        match self {
            Self::Valid { .. } => OutcomeClass::Success,
            Self::MissingField { .. }
            | Self::EnvNotAllowed { .. }
            | Self::NoDefinitionsFound { .. } => OutcomeClass::PolicyRejection,
            Self::Malformed { .. }
            | Self::PathNotFound { .. }
            | Self::DirectoryUnreadable { .. } => OutcomeClass::ConfigurationError,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Valid { .. } => "VALID",
            Self::MissingField { .. } => "MISSING_FIELD",
            Self::Malformed { .. } => "MALFORMED",
            Self::EnvNotAllowed { .. } => "ENV_NOT_ALLOWED",
            Self::PathNotFound { .. } => "PATH_NOT_FOUND",
            Self::DirectoryUnreadable { .. } => "DIRECTORY_UNREADABLE",
            Self::NoDefinitionsFound { .. } => "NO_DEFINITIONS_FOUND",
        }
    }

    /// Human-readable explanation for the diagnostic stream.
    pub fn message(&self) -> String {
        match self {
            Self::Valid { dag_files, .. } => format!("Found DAG files: {:?}", dag_files),
            Self::MissingField { field } => format!("missing required field '{}'", field),
            Self::Malformed { message } => {
                format!("malformed {}: {}", MANIFEST_FILE_NAME, message)
            }
            Self::EnvNotAllowed {
                environment,
                manifest,
            } => format!(
                "env '{}' not allowed for project '{}'. Allowed envs: {:?}",
                environment, manifest.project_name, manifest.allowed_envs
            ),
            Self::PathNotFound { path } => {
                format!("dag_path directory does not exist: {}", path.display())
            }
            Self::DirectoryUnreadable { path, message } => {
                format!("cannot list dag_path directory {}: {}", path.display(), message)
            }
            Self::NoDefinitionsFound { path } => format!(
                "no {} DAG files found under {}",
                DAG_SOURCE_SUFFIX,
                path.display()
            ),
        }
    }
}

/// Validate `raw` for deployment of `environment` from the spoke checkout at
/// `project_root`. The environment is lower-cased before comparison.
pub fn validate(raw: &RawManifest, environment: &str, project_root: &Path) -> ValidationOutcome {
    if let Some(field) = raw.first_missing_field() {
        return ValidationOutcome::MissingField { field };
    }

    let manifest: ProjectManifest = match serde_json::from_value(Value::Object(raw.fields.clone()))
    {
        Ok(m) => m,
        Err(e) => {
            return ValidationOutcome::Malformed {
                message: e.to_string(),
            }
        }
    };
    if !is_contained_relative(Path::new(&manifest.dag_path)) {
        return ValidationOutcome::Malformed {
            message: format!(
                "dag_path must be relative to the project root without '..': {}",
                manifest.dag_path
            ),
        };
    }
    debug!(
        project_name = %manifest.project_name,
        team = %manifest.team,
        dag_path = %manifest.dag_path,
        allowed_envs = ?manifest.allowed_envs,
        "manifest fields"
    );

    let environment = environment.to_lowercase();
    if !manifest.allows(&environment) {
        return ValidationOutcome::EnvNotAllowed {
            environment,
            manifest,
        };
    }

    let dag_dir = project_root.join(&manifest.dag_path);
    if !dag_dir.is_dir() {
        return ValidationOutcome::PathNotFound { path: dag_dir };
    }

    let dag_files = match list_dag_files(&dag_dir) {
        Ok(files) => files,
        Err(e) => {
            return ValidationOutcome::DirectoryUnreadable {
                path: dag_dir,
                message: e.to_string(),
            }
        }
    };
    if dag_files.is_empty() {
        return ValidationOutcome::NoDefinitionsFound { path: dag_dir };
    }

    ValidationOutcome::Valid {
        manifest,
        dag_dir,
        dag_files,
    }
}

fn is_contained_relative(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Immediate entries of `dir` named `*.py`, sorted. Subdirectories are not
/// descended into.
pub fn list_dag_files(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(DAG_SOURCE_SUFFIX) {
                files.push(name.to_string());
            }
        }
    }
    files.sort();
    Ok(files)
}
