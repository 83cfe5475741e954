//! Versioned profile record schema.
//!
//! Every field is defaulted so a partially cleaned payload still
//! deserializes; format- and range-level rules live in the validator, not
//! here.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::skills::SkillEntry;

/// Current profile schema version. Compatibility follows semver: same major,
/// minor at or below current.
pub const SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactSchema {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarySchema {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceSchema {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EducationSchema {
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectSchema {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AchievementSchema {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataSchema {
    #[serde(default = "default_extractor_version")]
    pub extractor_version: String,
    #[serde(default = "Utc::now")]
    pub extraction_timestamp: DateTime<Utc>,
    #[serde(default)]
    pub processing_time_ms: Option<u64>,
    #[serde(default)]
    pub confidence_score: f64,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub sections_detected: Vec<String>,
}

impl Default for MetadataSchema {
    fn default() -> Self {
        Self {
            extractor_version: default_extractor_version(),
            extraction_timestamp: Utc::now(),
            processing_time_ms: None,
            confidence_score: 0.0,
            file_type: None,
            sections_detected: Vec::new(),
        }
    }
}

fn default_extractor_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

/// The authoritative structure for all parsing outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    #[serde(default = "Utc::now")]
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub extraction_method: String,
    /// Original filename, no path.
    #[serde(default)]
    pub source_file: String,
    #[serde(default)]
    pub contact: Option<ContactSchema>,
    #[serde(default)]
    pub summary: Option<SummarySchema>,
    #[serde(default)]
    pub experience: Vec<ExperienceSchema>,
    #[serde(default)]
    pub education: Vec<EducationSchema>,
    #[serde(default)]
    pub skills: Vec<SkillEntry>,
    #[serde(default)]
    pub projects: Vec<ProjectSchema>,
    #[serde(default)]
    pub achievements: Vec<AchievementSchema>,
    /// Sections the standard schema does not cover.
    #[serde(default)]
    pub additional_sections: HashMap<String, Value>,
    #[serde(default)]
    pub metadata: MetadataSchema,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

fn parse_version(version: &str) -> Option<(u64, u64, u64)> {
    let mut parts = version.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    let patch = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((major, minor, patch))
}

/// Semver compatibility: same major version, minor at or below current.
pub fn is_schema_compatible(profile_version: &str, current_version: &str) -> bool {
    match (parse_version(profile_version), parse_version(current_version)) {
        (Some(profile), Some(current)) => profile.0 == current.0 && profile.1 <= current.1,
        _ => false,
    }
}

pub fn is_valid_semver(version: &str) -> bool {
    parse_version(version).is_some()
}
