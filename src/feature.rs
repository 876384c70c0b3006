//! # Feature Manifests
//!
//! A feature is the declaring source of content-package artifacts. It is a
//! YAML document with an id, a map of variables and a list of extensions;
//! the `content-packages` extension lists the artifacts to schedule.
//!
//! ```yaml
//! id: my_packages:site:1.0
//! variables:
//!   default.content.startorder: "2"
//! extensions:
//!   - name: content-packages
//!     type: artifacts
//!     artifacts:
//!       - my_packages:test_c:1.0
//!       - id: my_packages:test_a:1.0
//!         metadata:
//!           start-order: 1
//! ```
//!
//! Variables are plain strings. The merge processor consumes the
//! `default.content.startorder` variable when it composes two features.

use crate::artifact::{ArtifactId, Artifacts};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Name of the extension carrying content-package artifacts.
pub const EXTENSION_NAME_CONTENT_PACKAGES: &str = "content-packages";

/// The payload kind of an extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionKind {
    Artifacts,
    Text,
    Json,
}

/// A named extension section of a feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extension {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ExtensionKind,
    #[serde(default, skip_serializing_if = "Artifacts::is_empty")]
    pub artifacts: Artifacts,
    /// Payload of text and JSON extensions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Extension {
    /// Create an empty artifacts extension.
    pub fn artifacts(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ExtensionKind::Artifacts,
            artifacts: Artifacts::new(),
            text: None,
        }
    }

    /// Create a content-packages extension holding `artifacts`.
    pub fn content_packages(artifacts: Artifacts) -> Self {
        Self {
            artifacts,
            ..Self::artifacts(EXTENSION_NAME_CONTENT_PACKAGES)
        }
    }

    /// Whether this is the artifacts extension listing content packages.
    pub fn is_content_packages(&self) -> bool {
        self.kind == ExtensionKind::Artifacts && self.name == EXTENSION_NAME_CONTENT_PACKAGES
    }
}

/// A feature manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: ArtifactId,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

impl Feature {
    pub fn new(id: ArtifactId) -> Self {
        Self {
            id,
            variables: BTreeMap::new(),
            extensions: Vec::new(),
        }
    }

    pub fn extension(&self, name: &str) -> Option<&Extension> {
        self.extensions.iter().find(|e| e.name == name)
    }

    pub fn extension_mut(&mut self, name: &str) -> Option<&mut Extension> {
        self.extensions.iter_mut().find(|e| e.name == name)
    }

    /// The content-packages extension, if this feature has one.
    pub fn content_packages(&self) -> Option<&Extension> {
        self.extensions.iter().find(|e| e.is_content_packages())
    }

    pub fn content_packages_mut(&mut self) -> Option<&mut Extension> {
        self.extensions.iter_mut().find(|e| e.is_content_packages())
    }

    /// Serialize the feature back to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Parse a feature manifest from YAML.
pub fn parse(yaml_content: &str) -> Result<Feature> {
    let feature: Feature = serde_yaml::from_str(yaml_content).map_err(|e| Error::FeatureParse {
        message: e.to_string(),
    })?;

    let mut seen = Vec::new();
    for extension in &feature.extensions {
        if seen.contains(&extension.name.as_str()) {
            return Err(Error::FeatureParse {
                message: format!(
                    "extension '{}' is declared more than once in {}",
                    extension.name, feature.id
                ),
            });
        }
        seen.push(extension.name.as_str());
    }

    Ok(feature)
}

/// Load and parse a feature manifest from a file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Feature> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}
