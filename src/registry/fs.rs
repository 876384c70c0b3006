//! Package registry persisted in a registry home directory
//!
//! The index is kept as `registry.json` inside the home. It is read when the
//! registry is opened and rewritten on `commit`, so a later run sees
//! everything an earlier run committed and nothing a failed run registered.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use super::{MemoryRegistry, PackageRegistry, Registration};
use crate::error::{Error, Result};
use crate::package::{PackageArchive, PackageId, SubPackage};

/// File name of the registry index inside the home directory.
pub const INDEX_FILE: &str = "registry.json";

/// A package registry backed by a home directory
#[derive(Debug)]
pub struct FsPackageRegistry {
    home: PathBuf,
    index: MemoryRegistry,
}

impl FsPackageRegistry {
    /// Open the registry in `home`, creating the directory if needed.
    pub fn open(home: &Path) -> Result<Self> {
        if !home.exists() {
            fs::create_dir_all(home)?;
        }
        if !home.is_dir() {
            return Err(Error::InvalidHomeLocation {
                path: home.display().to_string(),
            });
        }

        let index_path = home.join(INDEX_FILE);
        let index = if index_path.is_file() {
            let content = fs::read_to_string(&index_path)?;
            serde_json::from_str(&content).map_err(|e| Error::Registry {
                message: format!("corrupt index {}: {}", index_path.display(), e),
            })?
        } else {
            MemoryRegistry::new()
        };
        debug!(
            "Opened package registry at {} ({} packages)",
            home.display(),
            index.len()
        );

        Ok(Self {
            home: home.to_path_buf(),
            index,
        })
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Registered package ids, sorted.
    pub fn packages(&self) -> impl Iterator<Item = &PackageId> {
        self.index.packages()
    }

    fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.index)?;
        fs::write(self.home.join(INDEX_FILE), content)?;
        Ok(())
    }
}

impl PackageRegistry for FsPackageRegistry {
    fn register(&mut self, archive: &PackageArchive, replace: bool) -> Result<Registration> {
        self.index.register(archive, replace)
    }

    fn contains(&self, id: &PackageId) -> bool {
        self.index.contains(id)
    }

    fn sub_packages(&self, id: &PackageId) -> Result<Vec<SubPackage>> {
        self.index.sub_packages(id)
    }

    fn dependencies(&self, id: &PackageId) -> Result<Vec<PackageId>> {
        self.index.dependencies(id)
    }

    fn commit(&mut self) -> Result<()> {
        if self.index.has_pending() {
            self.save()?;
            debug!("Committed package registry at {}", self.home.display());
        }
        self.index.commit()
    }

    fn rollback(&mut self) -> Result<()> {
        self.index.rollback()
    }
}
