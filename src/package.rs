//! # Packages and Archives
//!
//! Registry-side identities. A `PackageId` is what the registry derives from
//! an archive's own declaration, which is not necessarily the coordinate the
//! feature used to fetch it. A `PackageArchive` is the declared content of one
//! archive: its id, the packages it depends on and the sub-packages nested
//! inside it.
//!
//! On disk an archive descriptor is YAML:
//!
//! ```yaml
//! id: my_packages:test_a:1.0
//! dependencies:
//!   - my_packages:test_b:1.0
//! sub-packages:
//!   - id: my_packages:test_a_nested:1.0
//!     handling: include
//! ```

use crate::error::{Error, Result};
use crate::version::{self, Version};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Identity of a registered package
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageId {
    pub group: String,
    pub name: String,
    pub version: String,
}

impl PackageId {
    pub fn new(group: &str, name: &str, version: &str) -> Self {
        Self {
            group: group.to_string(),
            name: name.to_string(),
            version: version.to_string(),
        }
    }

    /// Parse `group:name:version`.
    pub fn parse(value: &str) -> Result<Self> {
        let parts: Vec<&str> = value.trim().split(':').collect();
        match parts.as_slice() {
            [group, name, version]
                if !group.is_empty() && !name.is_empty() && !version.is_empty() =>
            {
                Ok(Self::new(group, name, version))
            }
            _ => Err(Error::InvalidPackageId {
                value: value.to_string(),
                message: "expected group:name:version".to_string(),
            }),
        }
    }

    pub fn semantic_version(&self) -> Version {
        Version::parse(&self.version)
    }

    /// Whether this package carries a mutable snapshot version.
    pub fn is_snapshot(&self) -> bool {
        version::is_snapshot(&self.version)
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

impl FromStr for PackageId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PackageId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<PackageId> for String {
    fn from(id: PackageId) -> Self {
        id.to_string()
    }
}

/// How a nested package is treated when its parent is extracted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubPackageHandling {
    #[default]
    Include,
    Ignore,
}

/// A package nested inside another package's archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubPackage {
    pub id: PackageId,
    #[serde(default)]
    pub handling: SubPackageHandling,
}

impl SubPackage {
    pub fn new(id: PackageId, handling: SubPackageHandling) -> Self {
        Self { id, handling }
    }

    pub fn is_ignored(&self) -> bool {
        self.handling == SubPackageHandling::Ignore
    }
}

/// The declared content of one package archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PackageArchive {
    pub id: PackageId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<PackageId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_packages: Vec<SubPackage>,
    /// File the archive was read from, when it came from disk.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl PackageArchive {
    pub fn new(id: PackageId) -> Self {
        Self {
            id,
            dependencies: Vec::new(),
            sub_packages: Vec::new(),
            source: None,
        }
    }

    pub fn with_dependency(mut self, id: PackageId) -> Self {
        self.dependencies.push(id);
        self
    }

    pub fn with_sub_package(mut self, id: PackageId, handling: SubPackageHandling) -> Self {
        self.sub_packages.push(SubPackage::new(id, handling));
        self
    }

    /// Read an archive descriptor from disk.
    ///
    /// A missing or zero-length file has nothing to install and yields
    /// `Ok(None)`. A file that exists but cannot be read or parsed is an
    /// `Error::Archive`.
    pub fn open(path: &Path) -> Result<Option<Self>> {
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(archive_error(path, e)),
        };
        if !metadata.is_file() || metadata.len() == 0 {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| archive_error(path, e))?;
        let mut archive: PackageArchive =
            serde_yaml::from_str(&content).map_err(|e| archive_error(path, e))?;
        archive.source = Some(path.to_path_buf());
        Ok(Some(archive))
    }
}

fn archive_error(path: &Path, err: impl fmt::Display) -> Error {
    Error::Archive {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}
