//! Registry home resolution
//!
//! The package registry lives in a home directory. It is taken from the
//! `packageregistry.home` setting when present; otherwise it is the
//! `packageregistry` folder inside `repository.home`. Having neither is a
//! `MissingConfiguration` error. The directory is created if it does not
//! exist, and a path that exists but is not a directory is an
//! `InvalidHomeLocation` error.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Setting naming the registry home directly.
pub const PACKAGEREGISTRY_HOME: &str = "packageregistry.home";

/// Setting naming the repository home the registry folder lives in.
pub const REPOSITORY_HOME: &str = "repository.home";

/// Folder inside the repository home holding the registry.
pub const REGISTRY_FOLDER: &str = "packageregistry";

/// File inside the registry home where the initializer records executed plans.
pub const STATUS_FILE: &str = "executedplans.file";

/// Resolve, create and check the registry home.
pub fn resolve_registry_home(
    registry_home: Option<&Path>,
    repository_home: Option<&Path>,
) -> Result<PathBuf> {
    let home = match (registry_home, repository_home) {
        (Some(registry_home), _) => registry_home.to_path_buf(),
        (None, Some(repository_home)) => repository_home.join(REGISTRY_FOLDER),
        (None, None) => {
            return Err(Error::MissingConfiguration {
                setting: format!("{} or {}", PACKAGEREGISTRY_HOME, REPOSITORY_HOME),
            })
        }
    };

    if home.exists() && !home.is_dir() {
        return Err(Error::InvalidHomeLocation {
            path: home.display().to_string(),
        });
    }
    if !home.exists() {
        fs::create_dir_all(&home)?;
    }
    Ok(home)
}

/// Path of the executed-plans status file for a registry home.
pub fn status_file_path(registry_home: &Path) -> PathBuf {
    registry_home.join(STATUS_FILE)
}
