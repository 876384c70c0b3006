//! # Package Registry
//!
//! The registry records which packages exist, what they depend on and which
//! sub-packages they carry. The plan builder talks to it only through the
//! `PackageRegistry` trait so scheduling can be exercised against
//! `MemoryRegistry` in tests and against `FsPackageRegistry` from the CLI.
//!
//! ## Registration
//!
//! `register` derives the package identity from the archive itself. If that
//! identity is already registered and `replace` is false, the outcome is
//! `Registration::AlreadyExists`, which is a normal result and not an error.
//! Registering a package also makes its declared sub-packages known, except
//! those its archive marks as ignored.
//!
//! ## Commit and rollback
//!
//! Registrations are pending until `commit`. `rollback` discards everything
//! registered since the last commit, so a run that fails part way leaves the
//! registry as it found it.
//!
//! A registry home is expected to be used by one scheduling run at a time;
//! callers serialize concurrent runs against the same home.

mod fs;
mod memory;

pub use fs::FsPackageRegistry;
pub use memory::MemoryRegistry;

use crate::error::Result;
use crate::package::{PackageArchive, PackageId, SubPackage};

/// Outcome of registering an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// The package was newly registered (or replaced).
    Registered(PackageId),
    /// A package with this identity was already registered.
    AlreadyExists(PackageId),
}

impl Registration {
    pub fn package(&self) -> &PackageId {
        match self {
            Registration::Registered(id) | Registration::AlreadyExists(id) => id,
        }
    }
}

/// Trait for package registries - allows mocking in tests
pub trait PackageRegistry {
    /// Register an archive under its declared identity.
    ///
    /// With `replace` set an existing registration is overwritten and the
    /// outcome is always `Registered`.
    fn register(&mut self, archive: &PackageArchive, replace: bool) -> Result<Registration>;

    /// Whether a package with this identity is registered.
    fn contains(&self, id: &PackageId) -> bool;

    /// Sub-packages declared by a registered package, in declaration order.
    fn sub_packages(&self, id: &PackageId) -> Result<Vec<SubPackage>>;

    /// Packages a registered package depends on.
    fn dependencies(&self, id: &PackageId) -> Result<Vec<PackageId>>;

    /// Make every registration since the last commit permanent.
    fn commit(&mut self) -> Result<()>;

    /// Discard every registration since the last commit.
    fn rollback(&mut self) -> Result<()>;
}
