//! # Content-Package Merge Processor
//!
//! When two features are composed into one, both may declare content
//! packages. This module merges the source feature's `content-packages`
//! artifacts into the target's.
//!
//! ## Default start order
//!
//! A feature may carry a `default.content.startorder` variable. Before
//! merging, each side's default is written as `start-order` onto every
//! artifact of that side that has no explicit start order, and the variable
//! is removed from the feature. It is consumed exactly once and never
//! overrides an explicit value.
//!
//! ## Precedence
//!
//! For every source artifact:
//!
//! - no artifact of the same group/name (any version) in the target: append it;
//! - the target's version is strictly greater: keep the target artifact;
//! - otherwise (source equal or newer): remove the target artifact and
//!   append the source artifact.
//!
//! If the target has no content-packages extension at all, the source
//! extension is adopted as is.

use log::debug;

use crate::artifact::{parse_order, Artifacts, KEY_START_ORDER};
use crate::error::Result;
use crate::feature::{Extension, ExtensionKind, Feature, EXTENSION_NAME_CONTENT_PACKAGES};

/// Feature variable carrying the default start order of its content packages.
pub const DEFAULT_CONTENT_START_ORDER: &str = "default.content.startorder";

/// Whether this processor handles `extension`.
pub fn can_merge(extension: &Extension) -> bool {
    extension.kind == ExtensionKind::Artifacts && extension.name == EXTENSION_NAME_CONTENT_PACKAGES
}

/// Give every artifact without a start order the `default` one.
///
/// `owner` names the declaring feature in the error raised for a
/// non-numeric default.
pub fn apply_default_order(artifacts: &mut Artifacts, default: &str, owner: &str) -> Result<()> {
    parse_order(owner, default)?;
    fill_start_order(artifacts, default);
    Ok(())
}

/// Merge two artifact lists with the highest-version-wins rule.
///
/// `target` is `None` when the target side has no content-packages list at
/// all; the source list (after its default-order pass) is then returned
/// unchanged.
pub fn merge_artifacts(
    target: Option<Artifacts>,
    source: Artifacts,
    target_default: Option<&str>,
    source_default: Option<&str>,
) -> Result<Artifacts> {
    let mut source = source;
    if let Some(default) = source_default {
        apply_default_order(&mut source, default, "source")?;
    }

    let Some(mut target) = target else {
        return Ok(source);
    };
    if let Some(default) = target_default {
        apply_default_order(&mut target, default, "target")?;
    }

    merge_into(&mut target, source);
    Ok(target)
}

/// Merge the content packages of `source` into `target`.
///
/// Does nothing when the source has no content packages. Otherwise each
/// feature that has a content-packages extension has its
/// `default.content.startorder` variable written onto its own artifacts and
/// removed. Both defaults are validated first; on error neither feature is
/// changed.
pub fn merge(target: &mut Feature, source: &mut Feature) -> Result<()> {
    if source.content_packages().is_none() {
        return Ok(());
    }
    let source_default = default_order(source)?;
    let target_default = default_order(target)?;

    consume_default_order(source, source_default.as_deref());
    consume_default_order(target, target_default.as_deref());

    let source_artifacts = source
        .content_packages()
        .map(|ext| ext.artifacts.clone())
        .unwrap_or_default();

    match target.content_packages_mut() {
        Some(target_ext) => merge_into(&mut target_ext.artifacts, source_artifacts),
        None => {
            debug!(
                "{} has no content packages, adopting those of {}",
                target.id, source.id
            );
            target
                .extensions
                .push(Extension::content_packages(source_artifacts));
        }
    }
    Ok(())
}

fn fill_start_order(artifacts: &mut Artifacts, default: &str) {
    for artifact in artifacts.iter_mut() {
        if !artifact.metadata.contains_key(KEY_START_ORDER) {
            artifact
                .metadata
                .insert(KEY_START_ORDER.to_string(), default.trim().to_string());
        }
    }
}

fn merge_into(target: &mut Artifacts, source: Artifacts) {
    for artifact in source {
        if let Some(existing) = target.get_same(&artifact.id) {
            if existing.id.semantic_version() > artifact.id.semantic_version() {
                debug!("Keeping {} over older {}", existing.id, artifact.id);
                continue;
            }
        }
        target.remove_same(&artifact.id);
        target.add(artifact);
    }
}

/// The validated default-order variable of a feature with content packages.
fn default_order(feature: &Feature) -> Result<Option<String>> {
    if feature.content_packages().is_none() {
        return Ok(None);
    }
    match feature.variables.get(DEFAULT_CONTENT_START_ORDER) {
        Some(value) => {
            parse_order(&feature.id.to_string(), value)?;
            Ok(Some(value.clone()))
        }
        None => Ok(None),
    }
}

/// Write a validated default onto the feature's own artifacts and drop the
/// variable.
fn consume_default_order(feature: &mut Feature, default: Option<&str>) {
    let Some(default) = default else {
        return;
    };
    if let Some(ext) = feature.content_packages_mut() {
        fill_start_order(&mut ext.artifacts, default);
    }
    feature.variables.remove(DEFAULT_CONTENT_START_ORDER);
}
