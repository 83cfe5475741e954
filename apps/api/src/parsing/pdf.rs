//! Heuristic PDF extraction.
//!
//! PDF text comes back as flat lines with no formatting signal, so header
//! detection falls back to a short-line heuristic and every result carries
//! baseline layout warnings. Entry counts are capped since flat-text
//! splitting over-segments noisy documents.

use crate::errors::ParseError;
use crate::skills::SkillsCatalog;

use super::content::{build_section_map, RawContentUnit, Section, SectionMap};
use super::entries::{
    extract_contact, parse_education, parse_experience, parse_projects, ContactInfo,
};
use super::patterns::{
    classify_section, split_achievements, split_raw_skills, FALLBACK_TECH_TERMS,
    PDF_HEADER_MAX_TOKENS,
};
use super::ExtractorOutput;

pub const METHOD: &str = "pdf_heuristic";

const WEIGHT_EMAIL: f64 = 0.15;
const WEIGHT_SUMMARY: f64 = 0.1;
const WEIGHT_EXPERIENCE: f64 = 0.2;
const WEIGHT_EDUCATION: f64 = 0.15;
const WEIGHT_SKILLS: f64 = 0.1;
/// Flat-text extraction is inherently less trustworthy than structural
/// extraction, so the raw score is discounted and the ceiling sits below
/// the DOCX ceiling.
const CONFIDENCE_DISCOUNT: f64 = 0.8;
const CONFIDENCE_CEILING: f64 = 0.8;

const MAX_EXPERIENCE_ENTRIES: usize = 10;
const MAX_EDUCATION_ENTRIES: usize = 5;
const MAX_SKILLS: usize = 20;
const MAX_PROJECTS: usize = 5;
const MAX_ACHIEVEMENTS: usize = 10;
const MAX_ACHIEVEMENT_LEN: usize = 200;
const MAX_SUMMARY_SENTENCES: usize = 5;
const MAX_FALLBACK_SKILLS: usize = 10;

pub struct PdfExtractor;

impl PdfExtractor {
    /// Extracts a structured profile draft from raw PDF bytes.
    pub fn extract(bytes: &[u8], catalog: &SkillsCatalog) -> Result<ExtractorOutput, ParseError> {
        let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            ParseError::ExtractionFailure(format!("failed to read pdf document: {e}"))
        })?;

        let mut warnings = vec![
            "PDF extraction has limitations with complex layouts".to_string(),
            "Tables and multi-column formats may not parse correctly".to_string(),
            "Some formatting information may be lost".to_string(),
        ];

        if text.trim().is_empty() {
            warnings.push("PDF text extraction failed - document may be image-based".to_string());
            return Ok(ExtractorOutput {
                method: METHOD.to_string(),
                warnings,
                ..ExtractorOutput::default()
            });
        }

        Ok(extract_from_text(&text, catalog, warnings))
    }
}

/// Drops page-number lines and sub-2-character artifacts.
fn clean_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.len() >= 2)
        .filter(|line| !line.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .collect()
}

/// Header cue without a formatting signal: few tokens and a section phrase.
fn is_header(text: &str) -> bool {
    text.split_whitespace().count() <= PDF_HEADER_MAX_TOKENS && classify_section(text).is_some()
}

fn section_text(units: &[RawContentUnit], map: &SectionMap, section: Section) -> String {
    map.indices(section)
        .iter()
        .map(|&i| units[i].text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Takes the first few sentences of the summary bucket, skipping fragments.
fn extract_summary(text: &str) -> String {
    text.split('.')
        .take(MAX_SUMMARY_SENTENCES)
        .map(str::trim)
        .filter(|s| s.len() > 10)
        .collect::<Vec<_>>()
        .join(". ")
}

fn extract_from_text(
    text: &str,
    catalog: &SkillsCatalog,
    mut warnings: Vec<String>,
) -> ExtractorOutput {
    let lines = clean_lines(text);
    let units: Vec<RawContentUnit> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let mut unit = RawContentUnit::new(i, line.clone());
            unit.is_header = is_header(line);
            unit
        })
        .collect();

    let map = build_section_map(&units, |unit| classify_section(&unit.text));
    let contact = extract_contact(text);

    let summary = extract_summary(&section_text(&units, &map, Section::Summary));
    let experience = parse_experience(
        &section_text(&units, &map, Section::Experience),
        Some(MAX_EXPERIENCE_ENTRIES),
    );
    let education = parse_education(
        &section_text(&units, &map, Section::Education),
        Some(MAX_EDUCATION_ENTRIES),
    );
    let mut raw_skills = split_raw_skills(&section_text(&units, &map, Section::Skills));
    raw_skills.truncate(MAX_SKILLS);
    let mut skills = catalog.normalize_skills_list(&raw_skills);
    let projects = parse_projects(
        &section_text(&units, &map, Section::Projects),
        Some(MAX_PROJECTS),
    );
    let mut achievements: Vec<String> =
        split_achievements(&section_text(&units, &map, Section::Achievements))
            .into_iter()
            .filter(|a| a.len() <= MAX_ACHIEVEMENT_LEN)
            .collect();
    achievements.truncate(MAX_ACHIEVEMENTS);

    // Degenerate input: no bucket received any content. Seed a skills list
    // from a fixed technology vocabulary found anywhere in the text.
    if map.all_buckets_empty() {
        warnings.push("No clear sections detected - using heuristic extraction".to_string());
        if skills.is_empty() {
            let raw = fallback_skills(text);
            skills = catalog.normalize_skills_list(&raw);
        }
        warnings.push("Limited extraction due to unclear document structure".to_string());
    }

    if contact.email.is_none() {
        warnings.push("No email address detected (PDF parsing limitation)".to_string());
    }

    let confidence = confidence_score(&contact, &summary, &experience, &education, &skills);

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
        confidence,
        warnings,
    }
}

fn fallback_skills(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    FALLBACK_TECH_TERMS
        .iter()
        .filter(|term| lower.contains(*term))
        .take(MAX_FALLBACK_SKILLS)
        .map(|term| {
            let mut chars = term.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

fn confidence_score(
    contact: &ContactInfo,
    summary: &str,
    experience: &[super::entries::ExperienceEntry],
    education: &[super::entries::EducationEntry],
    skills: &[crate::skills::SkillEntry],
) -> f64 {
    let mut score = 0.0;
    if contact.email.is_some() {
        score += WEIGHT_EMAIL;
    }
    if !summary.is_empty() {
        score += WEIGHT_SUMMARY;
    }
    if !experience.is_empty() {
        score += WEIGHT_EXPERIENCE;
    }
    if !education.is_empty() {
        score += WEIGHT_EDUCATION;
    }
    if !skills.is_empty() {
        score += WEIGHT_SKILLS;
    }
    (score * CONFIDENCE_DISCOUNT).min(CONFIDENCE_CEILING)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME_TEXT: &str = "\
Jane Doe
jane.doe@example.com
Summary
Engineer with ten years building backend systems. Focused on reliability.
Experience
Senior Engineer | Acme Corp
2020 - 2023
- Led migration of legacy services
Education
B.S. Computer Science, State University, 2014
Skills
Python, ReactJS, Docker
";

    fn baseline_warnings() -> Vec<String> {
        vec!["PDF extraction has limitations with complex layouts".to_string()]
    }

    #[test]
    fn test_header_heuristic_is_token_count_plus_phrase() {
        assert!(is_header("Experience"));
        assert!(is_header("Work Experience"));
        assert!(!is_header("my experience over the last ten years was great"));
        assert!(!is_header("Jane Doe"));
    }

    #[test]
    fn test_clean_lines_drops_page_numbers_and_artifacts() {
        let lines = clean_lines("Summary\n3\nx\nreal content here\n");
        assert_eq!(lines, vec!["Summary", "real content here"]);
    }

    #[test]
    fn test_full_extraction() {
        let catalog = SkillsCatalog::builtin();
        let output = extract_from_text(RESUME_TEXT, &catalog, baseline_warnings());

        assert_eq!(output.method, "pdf_heuristic");
        assert_eq!(output.contact.email.as_deref(), Some("jane.doe@example.com"));
        assert!(output.summary.contains("backend systems"));
        assert_eq!(output.experience.len(), 1);
        assert_eq!(output.experience[0].company, "Acme Corp");
        assert_eq!(output.education.len(), 1);
        assert_eq!(output.skills.len(), 3);
        assert_eq!(
            output.sections_detected,
            vec!["summary", "experience", "education", "skills"]
        );
    }

    #[test]
    fn test_confidence_is_discounted_and_capped() {
        let catalog = SkillsCatalog::builtin();
        let output = extract_from_text(RESUME_TEXT, &catalog, baseline_warnings());
        // All five signals present: (0.15 + 0.1 + 0.2 + 0.15 + 0.1) * 0.8
        assert!((output.confidence - 0.56).abs() < 1e-9);
        assert!(output.confidence <= 0.8);
    }

    #[test]
    fn test_summary_keeps_at_most_five_real_sentences() {
        let text = "First sentence is long enough. Tiny. Second real sentence here. \
                    Third real sentence here. Fourth real sentence here. Fifth one here too.";
        let summary = extract_summary(text);
        assert!(summary.contains("First sentence"));
        assert!(!summary.contains("Tiny"));
        assert!(!summary.contains("Fifth"));
    }

    #[test]
    fn test_degenerate_input_falls_back_to_tech_vocabulary() {
        let catalog = SkillsCatalog::builtin();
        let text = "some unstructured blob mentioning python and docker and aws daily";
        let output = extract_from_text(text, &catalog, baseline_warnings());

        assert!(output.sections_detected.is_empty());
        let canonicals: Vec<&str> =
            output.skills.iter().map(|s| s.canonical_name.as_str()).collect();
        assert!(canonicals.contains(&"Python"));
        assert!(canonicals.contains(&"Docker"));
        assert!(output
            .warnings
            .iter()
            .any(|w| w == "No clear sections detected - using heuristic extraction"));
        assert!(output
            .warnings
            .iter()
            .any(|w| w == "Limited extraction due to unclear document structure"));
    }

    #[test]
    fn test_fallback_skips_absent_terms() {
        let skills = fallback_skills("I write java and sql");
        assert_eq!(skills, vec!["Java", "Sql"]);
    }

    #[test]
    fn test_missing_email_warning() {
        let catalog = SkillsCatalog::builtin();
        let output = extract_from_text("Skills\nPython, Docker", &catalog, baseline_warnings());
        assert!(output
            .warnings
            .iter()
            .any(|w| w == "No email address detected (PDF parsing limitation)"));
    }

    #[test]
    fn test_extract_rejects_garbage_bytes() {
        let catalog = SkillsCatalog::builtin();
        let err = PdfExtractor::extract(b"not a pdf", &catalog).unwrap_err();
        assert_eq!(err.kind(), "ExtractionFailure");
    }
}
