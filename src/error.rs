//! # Error Handling
//!
//! This module defines the centralized error type for the `content-plan`
//! library. It uses `thiserror` to build one `Error` enum covering every
//! failure that aborts a scheduling run, with messages that name the offending
//! artifact, package or path.
//!
//! ## Key Components
//!
//! - **`Error`**: All fatal conditions. Recoverable outcomes are not errors:
//!   a package that is already registered is reported as
//!   `Registration::AlreadyExists`, and an archive that cannot be resolved is
//!   reported as `Ok(None)` by the resolver.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Any `Error` returned while scheduling aborts the whole run. Callers must not
//! emit configuration for a run that did not finish every batch.

use thiserror::Error;

/// Main error type for content-plan operations
#[derive(Error, Debug)]
pub enum Error {
    /// Neither a registry home nor a repository home was configured.
    #[error("Missing configuration: {setting} is not set")]
    MissingConfiguration { setting: String },

    /// The configured registry home exists but is not a directory.
    #[error("Invalid registry home: {path} exists but is not a directory")]
    InvalidHomeLocation { path: String },

    /// An explicit or default start order is not a non-negative integer.
    #[error("Malformed start order for {artifact}: '{value}'")]
    MalformedOrderKey { artifact: String, value: String },

    /// The accumulated task list of a batch is inconsistent.
    #[error("Execution plan validation failed for {package}: {message}")]
    PlanValidationFailed { package: String, message: String },

    /// An artifact coordinate string could not be parsed.
    #[error("Invalid artifact id '{value}': {message}")]
    InvalidArtifactId { value: String, message: String },

    /// A package id string could not be parsed.
    #[error("Invalid package id '{value}': {message}")]
    InvalidPackageId { value: String, message: String },

    /// An archive exists but its descriptor could not be read.
    #[error("Archive error for {path}: {message}")]
    Archive { path: String, message: String },

    /// The package registry is in an inconsistent state.
    #[error("Registry error: {message}")]
    Registry { message: String },

    /// A plan or configuration document could not be serialized.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// A feature manifest could not be parsed.
    #[error("Feature parsing error: {message}")]
    FeatureParse { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// An XML writing error, wrapped from `quick_xml::Error`.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_missing_configuration() {
        let error = Error::MissingConfiguration {
            setting: "packageregistry.home".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Missing configuration"));
        assert!(display.contains("packageregistry.home"));
    }

    #[test]
    fn test_error_display_invalid_home() {
        let error = Error::InvalidHomeLocation {
            path: "/tmp/registry".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("not a directory"));
        assert!(display.contains("/tmp/registry"));
    }

    #[test]
    fn test_error_display_malformed_order_key() {
        let error = Error::MalformedOrderKey {
            artifact: "my_packages:test_a:1.0".to_string(),
            value: "first".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Malformed start order"));
        assert!(display.contains("my_packages:test_a:1.0"));
        assert!(display.contains("'first'"));
    }

    #[test]
    fn test_error_display_plan_validation() {
        let error = Error::PlanValidationFailed {
            package: "my_packages:test_a:1.0".to_string(),
            message: "dependency my_packages:test_b:1.0 is not available".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Execution plan validation failed"));
        assert!(display.contains("test_b"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }

    #[test]
    fn test_error_from_yaml_error() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: [unclosed").unwrap_err();
        let error: Error = yaml_error.into();
        assert!(format!("{}", error).contains("YAML error"));
    }

    #[test]
    fn test_error_from_url_error() {
        let url_error = url::Url::parse("file://[bad").unwrap_err();
        let error: Error = url_error.into();
        assert!(format!("{}", error).contains("URL parsing error"));
    }
}
