//! Public dashboard lifecycle rules: publication, edits and the marking
//! ceiling check.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::manifest::Manifest;
use crate::markings::{ceiling_violations, MarkingDefinition};
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Entity name used in errors, audit rows and event payloads.
pub const ENTITY_TYPE: &str = "Public-Dashboard";

pub const MAX_NAME_LENGTH: usize = 255;

pub const MIN_URI_KEY_LENGTH: usize = 8;
pub const MAX_URI_KEY_LENGTH: usize = 64;

/// Fields an edit may touch.
pub const EDITABLE_FIELDS: &[&str] = &["name", "uri_key"];

pub const EMPTY_DASHBOARD_MESSAGE: &str = "Cannot publish empty dashboard";
pub const EDIT_RESTRICTED_MESSAGE: &str = "Only name and uri_key can be updated";

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Fresh unguessable public key (UUID v4, 122 random bits).
pub fn generate_uri_key() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Validate a caller-chosen public key.
///
/// Allowed characters are ASCII alphanumerics, `-` and `_`.
pub fn validate_uri_key(key: &str) -> Result<(), CoreError> {
    let len = key.len();
    if !(MIN_URI_KEY_LENGTH..=MAX_URI_KEY_LENGTH).contains(&len) {
        return Err(CoreError::Validation(format!(
            "uri_key must be between {MIN_URI_KEY_LENGTH} and {MAX_URI_KEY_LENGTH} characters, got {len}"
        )));
    }
    if let Some(c) = key.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_')) {
        return Err(CoreError::Validation(format!(
            "uri_key contains invalid character '{c}'"
        )));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("name must not be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Publication
// ---------------------------------------------------------------------------

/// Decode the source dashboard manifest and return the copy to publish.
///
/// A missing, blank, undecodable or widget-less manifest is rejected with
/// `Validation`, as is one using a filter key outside the allow-list. The
/// returned manifest has gone through typed decoding, so re-encoding it
/// yields the sanitized `public_manifest`.
pub fn prepare_publication(source_manifest: Option<&str>) -> Result<Manifest, CoreError> {
    let encoded = match source_manifest.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return Err(CoreError::Validation(EMPTY_DASHBOARD_MESSAGE.to_string())),
    };

    let manifest = Manifest::decode(encoded)
        .map_err(|e| CoreError::Validation(format!("Dashboard cannot be published: {e}")))?;
    if manifest.is_empty() {
        return Err(CoreError::Validation(EMPTY_DASHBOARD_MESSAGE.to_string()));
    }
    Ok(manifest)
}

/// What to do when requested markings exceed the platform ceiling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkingCeilingMode {
    /// Reject the publication.
    #[default]
    Enforce,
    /// Accept it and report the offending ids.
    Warn,
}

impl fmt::Display for MarkingCeilingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enforce => f.write_str("enforce"),
            Self::Warn => f.write_str("warn"),
        }
    }
}

impl FromStr for MarkingCeilingMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "enforce" => Ok(Self::Enforce),
            "warn" => Ok(Self::Warn),
            other => Err(CoreError::Validation(format!(
                "Unknown marking ceiling mode '{other}'. Must be one of: enforce, warn"
            ))),
        }
    }
}

/// Check requested marking ids against the available set.
///
/// Returns the ids above the ceiling. In [`MarkingCeilingMode::Enforce`]
/// a non-empty result is turned into [`CoreError::Policy`].
pub fn check_marking_ceiling(
    requested: &[EntityId],
    available: &[MarkingDefinition],
    mode: MarkingCeilingMode,
) -> Result<Vec<EntityId>, CoreError> {
    let violations = ceiling_violations(requested, available);
    if !violations.is_empty() && mode == MarkingCeilingMode::Enforce {
        let ids: Vec<String> = violations.iter().map(ToString::to_string).collect();
        return Err(CoreError::Policy(format!(
            "Requested markings exceed the platform sharing ceiling: {}",
            ids.join(", ")
        )));
    }
    Ok(violations)
}

// ---------------------------------------------------------------------------
// Edits
// ---------------------------------------------------------------------------

/// One field edit: `key` names the field, `value` holds its new value(s).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditInput {
    pub key: String,
    #[serde(default)]
    pub value: Vec<serde_json::Value>,
}

/// Validated changes to apply to a public dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicDashboardPatch {
    pub name: Option<String>,
    pub uri_key: Option<String>,
}

impl PublicDashboardPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.uri_key.is_none()
    }
}

/// Validate a batch of edits into a patch.
///
/// Every input is checked before anything is returned, so a batch that
/// touches a frozen field yields no patch at all.
pub fn build_patch(inputs: &[EditInput]) -> Result<PublicDashboardPatch, CoreError> {
    if inputs.iter().any(|i| !EDITABLE_FIELDS.contains(&i.key.as_str())) {
        return Err(CoreError::UnsupportedOperation(
            EDIT_RESTRICTED_MESSAGE.to_string(),
        ));
    }

    let mut patch = PublicDashboardPatch::default();
    for input in inputs {
        let value = single_string(input)?;
        match input.key.as_str() {
            "name" => {
                validate_name(&value)?;
                patch.name = Some(value.trim().to_string());
            }
            _ => {
                validate_uri_key(&value)?;
                patch.uri_key = Some(value);
            }
        }
    }

    if patch.is_empty() {
        return Err(CoreError::Validation("No fields to update".to_string()));
    }
    Ok(patch)
}

fn single_string(input: &EditInput) -> Result<String, CoreError> {
    match input.value.as_slice() {
        [serde_json::Value::String(s)] => Ok(s.clone()),
        _ => Err(CoreError::Validation(format!(
            "{} expects a single string value",
            input.key
        ))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
