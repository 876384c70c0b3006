//! # Content Resolution
//!
//! Before a package can be registered its archive has to be found. The plan
//! builder asks a `ContentResolver` once per artifact per batch.
//!
//! Resolution that finds nothing (no file, or an empty file) is `Ok(None)`:
//! the artifact is skipped without failing the batch, which tolerates content
//! that an earlier phase already materialized. A file that exists but cannot
//! be read is an error.
//!
//! ## Local layout
//!
//! `LocalContentResolver` honours an artifact's explicit `location` first. A
//! `file:` URL is converted to a path; anything else is a path, relative
//! paths being taken against the resolver's base directory. Without a
//! location the artifact is looked up in a Maven-style repository:
//!
//! ```text
//! <root>/<group with '.' as '/'>/<name>/<version>/<name>-<version>[-<classifier>].<type|zip>
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::debug;
use url::Url;

pub use crate::artifact::DEFAULT_PACKAGE_TYPE;

use crate::artifact::{Artifact, ArtifactId};
use crate::error::{Error, Result};
use crate::package::PackageArchive;

/// Trait for archive resolution - allows mocking in tests
pub trait ContentResolver {
    /// Find and read the archive backing `artifact`.
    fn resolve(&self, artifact: &Artifact) -> Result<Option<PackageArchive>>;
}

/// Resolves archives from the local filesystem
#[derive(Debug, Clone)]
pub struct LocalContentResolver {
    repository_root: PathBuf,
    base_dir: PathBuf,
}

impl LocalContentResolver {
    /// Create a resolver over a Maven-style repository at `repository_root`.
    /// Relative artifact locations resolve against `base_dir`.
    pub fn new(repository_root: impl Into<PathBuf>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            repository_root: repository_root.into(),
            base_dir: base_dir.into(),
        }
    }

    /// The conventional local repository, `~/.m2/repository`.
    pub fn default_repository_root() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".m2")
            .join("repository")
    }

    pub fn repository_root(&self) -> &Path {
        &self.repository_root
    }

    /// Where the archive for `artifact` is expected to live.
    pub fn archive_path(&self, artifact: &Artifact) -> Result<PathBuf> {
        match &artifact.location {
            Some(location) => self.location_path(location),
            None => Ok(self.repository_path(&artifact.id)),
        }
    }

    fn location_path(&self, location: &str) -> Result<PathBuf> {
        if location.starts_with("file:") {
            let url = Url::parse(location)?;
            return url.to_file_path().map_err(|_| Error::Archive {
                path: location.to_string(),
                message: "file URL does not map to a local path".to_string(),
            });
        }
        let path = PathBuf::from(location);
        if path.is_absolute() {
            Ok(path)
        } else {
            Ok(self.base_dir.join(path))
        }
    }

    fn repository_path(&self, id: &ArtifactId) -> PathBuf {
        let mut path = self.repository_root.clone();
        for segment in id.group.split('.') {
            path.push(segment);
        }
        path.push(&id.name);
        path.push(&id.version);

        let mut file_name = format!("{}-{}", id.name, id.version);
        if let Some(classifier) = &id.classifier {
            file_name.push('-');
            file_name.push_str(classifier);
        }
        file_name.push('.');
        file_name.push_str(id.package_type());
        path.push(file_name);
        path
    }
}

impl ContentResolver for LocalContentResolver {
    fn resolve(&self, artifact: &Artifact) -> Result<Option<PackageArchive>> {
        let path = self.archive_path(artifact)?;
        let archive = PackageArchive::open(&path)?;
        if archive.is_none() {
            debug!("No archive for {} at {}", artifact.id, path.display());
        }
        Ok(archive)
    }
}

/// Resolves archives from an in-memory map, for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    archives: HashMap<ArtifactId, PackageArchive>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ArtifactId, archive: PackageArchive) {
        self.archives.insert(id, archive);
    }

    /// Builder-style variant of `insert`.
    pub fn with_archive(mut self, id: ArtifactId, archive: PackageArchive) -> Self {
        self.insert(id, archive);
        self
    }
}

impl ContentResolver for MemoryResolver {
    fn resolve(&self, artifact: &Artifact) -> Result<Option<PackageArchive>> {
        Ok(self.archives.get(&artifact.id).cloned())
    }
}
