//! # Artifact Descriptors
//!
//! An artifact names one content package inside a feature manifest: its
//! Maven-style coordinates, an optional content location and a free-form
//! metadata map. The metadata carries the `start-order` key the batch
//! scheduler groups by.
//!
//! ## Key Components
//!
//! - **`ArtifactId`**: `group:name[:type[:classifier]]:version` coordinates.
//!   Two ids are *the same artifact* when everything but the version matches.
//! - **`Artifact`**: an id plus location and metadata.
//! - **`Artifacts`**: an insertion-ordered list with the same-artifact lookups
//!   the merge processor needs.

use crate::error::{Error, Result};
use crate::version::Version;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Metadata key holding an artifact's explicit start order.
pub const KEY_START_ORDER: &str = "start-order";

/// Packaging type assumed when coordinates name none.
pub const DEFAULT_PACKAGE_TYPE: &str = "zip";

/// Maven-style artifact coordinates
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactId {
    pub group: String,
    pub name: String,
    pub version: String,
    /// Packaging type, e.g. `zip`.
    pub kind: Option<String>,
    pub classifier: Option<String>,
}

impl ArtifactId {
    pub fn new(group: &str, name: &str, version: &str) -> Self {
        Self {
            group: group.to_string(),
            name: name.to_string(),
            version: version.to_string(),
            kind: None,
            classifier: None,
        }
    }

    /// Parse `group:name:version`, `group:name:type:version` or
    /// `group:name:type:classifier:version`.
    pub fn parse(value: &str) -> Result<Self> {
        let parts: Vec<&str> = value.trim().split(':').collect();
        if parts.iter().any(|part| part.is_empty()) {
            return Err(Error::InvalidArtifactId {
                value: value.to_string(),
                message: "coordinates must not contain empty parts".to_string(),
            });
        }

        let (kind, classifier) = match parts.len() {
            3 => (None, None),
            4 => (Some(parts[2].to_string()), None),
            5 => (Some(parts[2].to_string()), Some(parts[3].to_string())),
            n => {
                return Err(Error::InvalidArtifactId {
                    value: value.to_string(),
                    message: format!("expected 3 to 5 colon-separated parts, found {}", n),
                })
            }
        };

        Ok(Self {
            group: parts[0].to_string(),
            name: parts[1].to_string(),
            version: parts[parts.len() - 1].to_string(),
            kind,
            classifier,
        })
    }

    /// The comparable version of this artifact.
    pub fn semantic_version(&self) -> Version {
        Version::parse(&self.version)
    }

    /// The packaging type, `zip` when none was given.
    pub fn package_type(&self) -> &str {
        self.kind.as_deref().unwrap_or(DEFAULT_PACKAGE_TYPE)
    }

    /// Whether `other` identifies the same artifact, ignoring the version.
    pub fn is_same(&self, other: &ArtifactId) -> bool {
        self.group == other.group
            && self.name == other.name
            && self.package_type() == other.package_type()
            && self.classifier == other.classifier
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)?;
        if let Some(kind) = &self.kind {
            write!(f, ":{}", kind)?;
        }
        if let Some(classifier) = &self.classifier {
            write!(f, ":{}", classifier)?;
        }
        write!(f, ":{}", self.version)
    }
}

impl FromStr for ArtifactId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ArtifactId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ArtifactId> for String {
    fn from(id: ArtifactId) -> Self {
        id.to_string()
    }
}

/// A content-package artifact declared by a feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub id: ArtifactId,
    /// Where to fetch the backing archive: a `file:` URL or a path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Artifact {
    pub fn new(id: ArtifactId) -> Self {
        Self {
            id,
            location: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Builder-style helper to set the start order.
    pub fn with_start_order(mut self, order: u32) -> Self {
        self.metadata
            .insert(KEY_START_ORDER.to_string(), order.to_string());
        self
    }

    /// Builder-style helper to set the content location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// The raw `start-order` metadata value, if any.
    pub fn start_order_value(&self) -> Option<&str> {
        self.metadata.get(KEY_START_ORDER).map(String::as_str)
    }

    /// The explicit start order.
    ///
    /// Returns `Ok(None)` when the artifact has none and
    /// `Error::MalformedOrderKey` when the value is not a non-negative integer.
    pub fn start_order(&self) -> Result<Option<u32>> {
        self.start_order_value()
            .map(|value| parse_order(&self.id.to_string(), value))
            .transpose()
    }
}

/// Parse a start-order value, attributing failures to `owner`.
pub(crate) fn parse_order(owner: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| Error::MalformedOrderKey {
            artifact: owner.to_string(),
            value: value.to_string(),
        })
}

/// Artifacts accept either a bare coordinate string or a full map.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawArtifact {
    Id(ArtifactId),
    Full {
        id: ArtifactId,
        #[serde(default)]
        location: Option<String>,
        #[serde(default)]
        metadata: BTreeMap<String, serde_yaml::Value>,
    },
}

impl<'de> Deserialize<'de> for Artifact {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawArtifact::deserialize(deserializer)? {
            RawArtifact::Id(id) => Ok(Artifact::new(id)),
            RawArtifact::Full {
                id,
                location,
                metadata,
            } => {
                let mut values = BTreeMap::new();
                for (key, value) in metadata {
                    let text = match value {
                        serde_yaml::Value::String(s) => s,
                        serde_yaml::Value::Number(n) => n.to_string(),
                        serde_yaml::Value::Bool(b) => b.to_string(),
                        other => {
                            return Err(serde::de::Error::custom(format!(
                                "metadata '{}' of {} must be a scalar, found {:?}",
                                key, id, other
                            )))
                        }
                    };
                    values.insert(key, text);
                }
                Ok(Artifact {
                    id,
                    location,
                    metadata: values,
                })
            }
        }
    }
}

/// An insertion-ordered list of artifacts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Artifacts {
    items: Vec<Artifact>,
}

impl Artifacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an artifact at the end of the list.
    pub fn add(&mut self, artifact: Artifact) {
        self.items.push(artifact);
    }

    /// Find the artifact identifying the same package as `id`, any version.
    pub fn get_same(&self, id: &ArtifactId) -> Option<&Artifact> {
        self.items.iter().find(|a| a.id.is_same(id))
    }

    /// Remove every artifact identifying the same package as `id`.
    ///
    /// Returns true if anything was removed.
    pub fn remove_same(&mut self, id: &ArtifactId) -> bool {
        let before = self.items.len();
        self.items.retain(|a| !a.id.is_same(id));
        self.items.len() != before
    }

    /// Whether an artifact with exactly this id is present.
    pub fn contains(&self, id: &ArtifactId) -> bool {
        self.items.iter().any(|a| &a.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Artifact> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Artifact> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[Artifact] {
        &self.items
    }
}

impl FromIterator<Artifact> for Artifacts {
    fn from_iter<I: IntoIterator<Item = Artifact>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Artifacts {
    type Item = Artifact;
    type IntoIter = std::vec::IntoIter<Artifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Artifacts {
    type Item = &'a Artifact;
    type IntoIter = std::slice::Iter<'a, Artifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
