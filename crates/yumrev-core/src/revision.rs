use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

/// Rejected annotation insert. Never fatal to a query; callers log it.
#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("Invalid annotation key `{0}`, only [a-zA-Z0-9_] is allowed")]
    #[diagnostic(code(yumrev::annotation::invalid_key))]
    InvalidKey(String),

    #[error("Annotation `{0}` has no value")]
    #[diagnostic(code(yumrev::annotation::missing_value))]
    MissingValue(String),
}

/// Extra key-value data attached to a [`PackageRevision`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Annotations(BTreeMap<String, String>);

impl Annotations {
    /// Inserts `key`, replacing any previous value.
    ///
    /// Keys must be non-empty word characters and absent values are refused.
    pub fn insert(&mut self, key: &str, value: Option<&str>) -> Result<(), AnnotationError> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(AnnotationError::InvalidKey(key.to_string()));
        }
        let value = value.ok_or_else(|| AnnotationError::MissingValue(key.to_string()))?;

        self.0.insert(key.to_string(), value.to_string());
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A single resolved build of a package as reported by repoquery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PackageRevision {
    name: String,
    timestamp: DateTime<Utc>,
    packager: Option<String>,
    trackback_url: Option<String>,
    data: Annotations,
}

impl PackageRevision {
    pub fn new(
        name: String,
        timestamp: DateTime<Utc>,
        packager: Option<String>,
        trackback_url: Option<String>,
    ) -> Self {
        Self {
            name,
            timestamp,
            packager,
            trackback_url,
            data: Annotations::default(),
        }
    }

    /// `name-version-release.arch`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn packager(&self) -> Option<&str> {
        self.packager.as_deref()
    }

    pub fn trackback_url(&self) -> Option<&str> {
        self.trackback_url.as_deref()
    }

    pub fn data(&self) -> &Annotations {
        &self.data
    }

    pub(crate) fn add_data(&mut self, key: &str, value: Option<&str>) -> Result<(), AnnotationError> {
        self.data.insert(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_insert() {
        let mut data = Annotations::default();
        data.insert("LOCATION", Some("Packages/b/bash.rpm")).unwrap();
        data.insert("LOCATION", Some("Packages/b/bash-2.rpm")).unwrap();

        assert_eq!(data.len(), 1);
        assert_eq!(data.get("LOCATION"), Some("Packages/b/bash-2.rpm"));
    }

    #[test]
    fn test_annotation_rejects_bad_input() {
        let mut data = Annotations::default();
        assert_eq!(
            data.insert("package location", Some("x")),
            Err(AnnotationError::InvalidKey("package location".into()))
        );
        assert_eq!(
            data.insert("", Some("x")),
            Err(AnnotationError::InvalidKey(String::new()))
        );
        assert_eq!(
            data.insert("LOCATION", None),
            Err(AnnotationError::MissingValue("LOCATION".into()))
        );
        assert!(data.is_empty());
    }

    #[test]
    fn test_revision_serializes_to_json() {
        let mut revision = PackageRevision::new(
            "bash-5.1-2.x86_64".into(),
            DateTime::from_timestamp(1609459200, 0).unwrap(),
            Some("Fedora Project".into()),
            None,
        );
        revision.add_data("LOCATION", Some("b/bash.rpm")).unwrap();

        let json = serde_json::to_value(&revision).unwrap();
        assert_eq!(json["name"], "bash-5.1-2.x86_64");
        assert_eq!(json["timestamp"], "2021-01-01T00:00:00Z");
        assert_eq!(json["packager"], "Fedora Project");
        assert!(json["trackback_url"].is_null());
        assert_eq!(json["data"]["LOCATION"], "b/bash.rpm");
    }
}
