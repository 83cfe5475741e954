// Document parsing pipeline: format-specific extractors over a shared
// intermediate content model, routed by the parse service.

pub mod content;
pub mod docx;
pub mod entries;
pub mod handlers;
pub mod patterns;
pub mod pdf;
pub mod service;

use serde::{Deserialize, Serialize};

use crate::skills::SkillEntry;
use entries::{ContactInfo, EducationEntry, ExperienceEntry, ProjectEntry};

/// What a format-specific extractor hands to the profile assembler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractorOutput {
    /// Extraction method identifier, e.g. "docx_deterministic".
    pub method: String,
    pub sections_detected: Vec<String>,
    pub contact: ContactInfo,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<SkillEntry>,
    pub projects: Vec<ProjectEntry>,
    pub achievements: Vec<String>,
    /// Aggregate extraction confidence in [0, 1].
    pub confidence: f64,
    pub warnings: Vec<String>,
}
