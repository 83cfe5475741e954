// Skills canonicalization: alias catalog, cleaning pipeline, category
// inference, deduplication, and deterministic ordering.

pub mod catalog;
pub mod handlers;
pub mod normalizer;

pub use catalog::{SkillInfo, SkillsCatalog};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Technical,
    Programming,
    Frameworks,
    Databases,
    Cloud,
    Tools,
    Languages,
    SoftSkills,
    Certifications,
    Other,
}

impl SkillCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Technical => "technical",
            SkillCategory::Programming => "programming",
            SkillCategory::Frameworks => "frameworks",
            SkillCategory::Databases => "databases",
            SkillCategory::Cloud => "cloud",
            SkillCategory::Tools => "tools",
            SkillCategory::Languages => "languages",
            SkillCategory::SoftSkills => "soft_skills",
            SkillCategory::Certifications => "certifications",
            SkillCategory::Other => "other",
        }
    }

    /// Sort key for the final skill ordering: alphabetic by category name,
    /// with the catch-all category last.
    pub fn sort_key(&self) -> &'static str {
        match self {
            SkillCategory::Other => "z_other",
            other => other.as_str(),
        }
    }
}

/// A normalized skill as it appears in the profile output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillEntry {
    /// Skill name as extracted from the document.
    pub name: String,
    pub canonical_name: String,
    pub category: SkillCategory,
    pub aliases: Vec<String>,
    pub confidence_score: f64,
}
