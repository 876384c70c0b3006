//! In-memory package registry

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{PackageRegistry, Registration};
use crate::error::{Error, Result};
use crate::package::{PackageArchive, PackageId, SubPackage};

/// What the registry knows about one package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RegistryEntry {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<PackageId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_packages: Vec<SubPackage>,
    /// Parent package this one was registered through, if it was nested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested_in: Option<PackageId>,
}

/// A package registry held entirely in memory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryRegistry {
    packages: BTreeMap<PackageId, RegistryEntry>,
    /// State as of the last commit, while registrations are pending.
    #[serde(skip)]
    committed: Option<BTreeMap<PackageId, RegistryEntry>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an archive unconditionally, replacing any existing entry.
    ///
    /// The entry is part of the committed state; `rollback` keeps it.
    pub fn insert(&mut self, archive: PackageArchive) {
        self.store(&archive);
    }

    /// Builder-style variant of `insert`.
    pub fn with_package(mut self, archive: PackageArchive) -> Self {
        self.store(&archive);
        self
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// All registered package ids, sorted.
    pub fn packages(&self) -> impl Iterator<Item = &PackageId> {
        self.packages.keys()
    }

    pub fn entry(&self, id: &PackageId) -> Option<&RegistryEntry> {
        self.packages.get(id)
    }

    /// Whether registrations are waiting for `commit`.
    pub fn has_pending(&self) -> bool {
        self.committed.is_some()
    }

    fn store(&mut self, archive: &PackageArchive) {
        let nested_in = self
            .packages
            .get(&archive.id)
            .and_then(|existing| existing.nested_in.clone());
        self.packages.insert(
            archive.id.clone(),
            RegistryEntry {
                dependencies: archive.dependencies.clone(),
                sub_packages: archive.sub_packages.clone(),
                nested_in,
            },
        );

        for sub in archive.sub_packages.iter().filter(|sub| !sub.is_ignored()) {
            self.packages
                .entry(sub.id.clone())
                .or_insert_with(|| RegistryEntry {
                    nested_in: Some(archive.id.clone()),
                    ..RegistryEntry::default()
                });
        }
    }

    fn lookup(&self, id: &PackageId) -> Result<&RegistryEntry> {
        self.packages.get(id).ok_or_else(|| Error::Registry {
            message: format!("package {} is not registered", id),
        })
    }
}

impl PackageRegistry for MemoryRegistry {
    fn register(&mut self, archive: &PackageArchive, replace: bool) -> Result<Registration> {
        if !replace && self.packages.contains_key(&archive.id) {
            return Ok(Registration::AlreadyExists(archive.id.clone()));
        }
        if self.committed.is_none() {
            self.committed = Some(self.packages.clone());
        }
        self.store(archive);
        Ok(Registration::Registered(archive.id.clone()))
    }

    fn contains(&self, id: &PackageId) -> bool {
        self.packages.contains_key(id)
    }

    fn sub_packages(&self, id: &PackageId) -> Result<Vec<SubPackage>> {
        Ok(self.lookup(id)?.sub_packages.clone())
    }

    fn dependencies(&self, id: &PackageId) -> Result<Vec<PackageId>> {
        Ok(self.lookup(id)?.dependencies.clone())
    }

    fn commit(&mut self) -> Result<()> {
        self.committed = None;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        if let Some(committed) = self.committed.take() {
            self.packages = committed;
        }
        Ok(())
    }
}
