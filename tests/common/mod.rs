//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures and helper functions to reduce
//! duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new()
//!         .with_archive("test_a-1.0.zip", "id: my_packages:test_a:1.0\n")
//!         .with_feature(features::THREE_PACKAGES);
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
#[allow(unused_imports)]
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    pub use super::features;
    pub use super::TestFixture;
}

/// Common feature manifests for testing.
#[allow(dead_code)]
pub mod features {
    /// Three packages in two batches: test_c and test_b first, then test_a.
    pub const THREE_PACKAGES: &str = r#"
id: my_packages:site:1.0
extensions:
  - name: content-packages
    type: artifacts
    artifacts:
      - id: my_packages:test_a:1.0
        location: test_a-1.0.zip
        metadata:
          start-order: 2
      - id: my_packages:test_c:1.0
        location: test_c-1.0.zip
        metadata:
          start-order: 1
      - id: my_packages:test_b:1.0
        location: test_b-1.0.zip
        metadata:
          start-order: 1
"#;

    /// A single snapshot package without a start order.
    pub const SNAPSHOT: &str = r#"
id: my_packages:site:1.0
extensions:
  - name: content-packages
    type: artifacts
    artifacts:
      - id: my_packages:test_s:1.0-SNAPSHOT
        location: test_s-1.0-SNAPSHOT.zip
"#;

    /// A feature with no content packages.
    pub const NO_CONTENT: &str = r#"
id: my_packages:bundles-only:1.0
extensions:
  - name: bundles
    type: artifacts
    artifacts:
      - org.example:bundle:1.0
"#;

    /// Archive descriptors matching the artifacts above.
    pub const ARCHIVES: &[(&str, &str)] = &[
        ("test_a-1.0.zip", "id: my_packages:test_a:1.0\n"),
        ("test_b-1.0.zip", "id: my_packages:test_b:1.0\n"),
        ("test_c-1.0.zip", "id: my_packages:test_c:1.0\n"),
        (
            "test_s-1.0-SNAPSHOT.zip",
            "id: my_packages:test_s:1.0-SNAPSHOT\n",
        ),
    ];
}

/// A test fixture that provides a temporary directory holding a feature
/// manifest, archive descriptors and a registry home.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `feature.yaml` manifest with the given content.
    pub fn with_feature(self, content: &str) -> Self {
        self.with_file("feature.yaml", content)
    }

    /// Add every archive descriptor from `features::ARCHIVES`.
    pub fn with_archives(self) -> Self {
        features::ARCHIVES
            .iter()
            .fold(self, |fixture, (name, content)| fixture.with_file(name, content))
    }

    /// Add an archive descriptor.
    pub fn with_archive(self, name: &str, content: &str) -> Self {
        self.with_file(name, content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the feature manifest.
    pub fn feature_path(&self) -> PathBuf {
        self.temp_dir.path().join("feature.yaml")
    }

    /// Get the path of the registry home inside the fixture.
    pub fn registry_home(&self) -> PathBuf {
        self.temp_dir.path().join("packageregistry")
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("content-plan");
        cmd.current_dir(self.path())
            .env_remove("PACKAGEREGISTRY_HOME")
            .env_remove("REPOSITORY_HOME")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// The plan document for a single extract task with default options.
#[allow(dead_code)]
pub fn expected_task(package: &str) -> String {
    format!(
        "    <task cmd=\"extract\" packageId=\"{}\">\n\
        \x20       <options type=\"ImportOptions\">\n\
        \x20           <isStrict>false</isStrict>\n\
        \x20           <autoSaveThreshold>-1</autoSaveThreshold>\n\
        \x20           <nonRecursive>false</nonRecursive>\n\
        \x20           <dryRun>false</dryRun>\n\
        \x20       </options>\n\
        \x20   </task>\n",
        package
    )
}

/// A complete plan document for the given packages.
#[allow(dead_code)]
pub fn expected_plan(packages: &[&str]) -> String {
    let mut plan = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<executionPlan version=\"1.0\">\n",
    );
    for package in packages {
        plan.push_str(&expected_task(package));
    }
    plan.push_str("</executionPlan>\n");
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_with_feature() {
        let fixture = TestFixture::new().with_feature(features::THREE_PACKAGES);
        assert!(fixture.feature_path().exists());
    }

    #[test]
    fn test_expected_plan_shape() {
        let plan = expected_plan(&["g:a:1"]);
        assert!(plan.starts_with("<?xml"));
        assert!(plan.contains("    <task cmd=\"extract\" packageId=\"g:a:1\">\n"));
        assert!(plan.contains("            <isStrict>false</isStrict>\n"));
        assert!(plan.ends_with("</executionPlan>\n"));
    }
}
