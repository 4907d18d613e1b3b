//! Decision core of the spokegate deployment gate.
//!
//! Two independent checks run before a spoke repository's DAGs are promoted
//! into the shared orchestrator:
//!
//! - [`manifest`]: the spoke's `project.json` declares the required fields,
//!   allows the target environment, and points at a directory that actually
//!   contains DAG definitions.
//! - [`authz`]: the triggering user belongs to one of the groups the
//!   [`policy`] table requires for the (action, environment) pair, according
//!   to the membership snapshot read by the [`groups`] store.
//!
//! Both checks return plain outcome enums. Each outcome reports its
//! [`OutcomeClass`], and the binary maps that class to a process exit code.
//! Nothing in this crate exits the process.
//!
//! # Quick Start
//!
//! ```no_run
//! use spokegate_core::{authorize, AuthzRequest, GroupStore, OutcomeClass, PolicyTable};
//!
//! let store = GroupStore::new(".");
//! let request = AuthzRequest::new("alice", "prod", "deploy_dag");
//! let decision = authorize(&request, PolicyTable::builtin(), &store);
//! assert_eq!(decision.class(), OutcomeClass::Success);
//! ```

pub mod authz;
pub mod groups;
pub mod manifest;
pub mod outcome;
pub mod policy;
pub mod similarity;

pub use authz::{authorize, AuthzConfigError, AuthzRequest, Decision};
pub use groups::{
    Group, GroupSnapshot, GroupSource, GroupStore, GroupStoreError, GROUPS_DIR, GROUPS_FILE_EXT,
};
pub use manifest::{
    list_dag_files, load_manifest, manifest_path, validate, ManifestLoadError, ProjectManifest,
    RawManifest, ValidationOutcome, DAG_SOURCE_SUFFIX, MANIFEST_FILE_NAME, REQUIRED_FIELDS,
};
pub use outcome::OutcomeClass;
pub use policy::{PolicyLookupError, PolicyRule, PolicyTable, DEPLOY_DAG};
