//! Structural DOCX extraction.
//!
//! DOCX carries explicit paragraph and run formatting, so header detection
//! leans on structure: a short paragraph that is bold or fully upper-cased
//! and matches a section phrase set. This pathway produces the highest
//! confidence output of the pipeline.

use crate::errors::ParseError;
use crate::skills::SkillsCatalog;

use super::content::{build_section_map, RawContentUnit, Section, SectionMap};
use super::entries::{
    clean_text, extract_contact, parse_education, parse_experience, parse_projects,
};
use super::patterns::{
    classify_section, split_achievements, split_raw_skills, DOCX_HEADER_MAX_CHARS,
};
use super::ExtractorOutput;

pub const METHOD: &str = "docx_deterministic";

/// Confidence weights per populated signal. Their sum is the cap.
const WEIGHT_EMAIL: f64 = 0.2;
const WEIGHT_SUMMARY: f64 = 0.1;
const WEIGHT_EXPERIENCE: f64 = 0.3;
const WEIGHT_EDUCATION: f64 = 0.2;
const WEIGHT_SKILLS: f64 = 0.2;

pub struct DocxExtractor;

impl DocxExtractor {
    /// Extracts a structured profile draft from raw DOCX bytes.
    pub fn extract(bytes: &[u8], catalog: &SkillsCatalog) -> Result<ExtractorOutput, ParseError> {
        let docx = docx_rs::read_docx(bytes).map_err(|e| {
            ParseError::ExtractionFailure(format!("failed to read docx document: {e:?}"))
        })?;

        let mut units = Vec::new();
        for child in &docx.document.children {
            if let docx_rs::DocumentChild::Paragraph(para) = child {
                let mut text = String::new();
                let mut bold = false;
                for para_child in &para.children {
                    if let docx_rs::ParagraphChild::Run(run) = para_child {
                        if run.run_property.bold.is_some() {
                            bold = true;
                        }
                        for run_child in &run.children {
                            if let docx_rs::RunChild::Text(t) = run_child {
                                text.push_str(&t.text);
                            }
                        }
                    }
                }

                let text = text.trim().to_string();
                if text.is_empty() {
                    continue;
                }

                let mut unit = RawContentUnit::new(units.len(), text);
                unit.bold = bold;
                unit.is_header = is_header(&unit);
                units.push(unit);
            }
        }

        if units.is_empty() {
            return Err(ParseError::ExtractionFailure(
                "document contains no readable paragraphs".to_string(),
            ));
        }

        Ok(extract_from_units(&units, catalog))
    }
}

/// Header cue: short, visually emphasized, and matching a section phrase.
fn is_header(unit: &RawContentUnit) -> bool {
    unit.text.len() <= DOCX_HEADER_MAX_CHARS
        && (unit.bold || unit.uppercase)
        && classify_section(&unit.text).is_some()
}

fn section_text(units: &[RawContentUnit], map: &SectionMap, section: Section) -> String {
    map.indices(section)
        .iter()
        .map(|&i| units[i].text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

fn extract_from_units(units: &[RawContentUnit], catalog: &SkillsCatalog) -> ExtractorOutput {
    let map = build_section_map(units, |unit| classify_section(&unit.text));

    let full_text = units.iter().map(|u| u.text.as_str()).collect::<Vec<_>>().join(" ");
    let contact = extract_contact(&full_text);

    let summary = clean_text(&section_text(units, &map, Section::Summary));
    let experience = parse_experience(&section_text(units, &map, Section::Experience), None);
    let education = parse_education(&section_text(units, &map, Section::Education), None);
    let raw_skills = split_raw_skills(&section_text(units, &map, Section::Skills));
    let skills = catalog.normalize_skills_list(&raw_skills);
    let projects = parse_projects(&section_text(units, &map, Section::Projects), None);
    let achievements = split_achievements(&section_text(units, &map, Section::Achievements));

    let mut warnings = Vec::new();
    if contact.email.is_none() {
        warnings.push("No email address found".to_string());
    }
    if experience.is_empty() {
        warnings.push("No work experience found".to_string());
    }

    let mut confidence = 0.0;
    if contact.email.is_some() {
        confidence += WEIGHT_EMAIL;
    }
    if !summary.is_empty() {
        confidence += WEIGHT_SUMMARY;
    }
    if !experience.is_empty() {
        confidence += WEIGHT_EXPERIENCE;
    }
    if !education.is_empty() {
        confidence += WEIGHT_EDUCATION;
    }
    if !skills.is_empty() {
        confidence += WEIGHT_SKILLS;
    }

    ExtractorOutput {
        method: METHOD.to_string(),
        sections_detected: map.detected(),
        contact,
        summary,
        experience,
        education,
        skills,
        projects,
        achievements,
        confidence: confidence.min(1.0),
        warnings,
    }
}
