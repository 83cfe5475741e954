//! Shared pattern tables for section classification, contact scanning, and
//! date extraction.
//!
//! Classification is an ordered list of rules evaluated first-match-wins.
//! Later patterns assume earlier ones already claimed the more specific
//! phrases, so the ordering is part of the contract.

use once_cell::sync::Lazy;
use regex::Regex;

use super::content::Section;

/// Per-section header phrase sets, case-insensitive, in match priority order.
pub static SECTION_PATTERNS: Lazy<Vec<(Section, Regex)>> = Lazy::new(|| {
    let table: &[(Section, &str)] = &[
        (
            Section::Contact,
            r"(?i)\b(contact|personal\s+info|personal\s+information)\b",
        ),
        (
            Section::Summary,
            r"(?i)\b(professional\s+summary|career\s+summary|executive\s+summary|summary|objective|profile|overview|about)\b",
        ),
        (
            Section::Experience,
            r"(?i)\b(work\s+experience|professional\s+experience|career\s+history|employment\s+history|work\s+history|experience|employment)\b",
        ),
        (
            Section::Education,
            r"(?i)\b(educational\s+background|academic\s+background|education|academic|qualifications|degrees)\b",
        ),
        (
            Section::Skills,
            r"(?i)\b(technical\s+skills|core\s+competencies|skills|technologies|expertise|competencies|proficiencies)\b",
        ),
        (
            Section::Projects,
            r"(?i)\b(key\s+projects|notable\s+projects|project\s+experience|personal\s+projects|projects)\b",
        ),
        (
            Section::Achievements,
            r"(?i)\b(achievements|accomplishments|awards|honors|recognition|certifications)\b",
        ),
    ];
    table
        .iter()
        .map(|(section, pattern)| (*section, Regex::new(pattern).unwrap()))
        .collect()
});

pub static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());

pub static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?[1-9]?[\d\s\-\(\)\.]{8,15}\d").unwrap());

pub static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+|www\.\S+").unwrap());

/// Ordered date pattern forms. Scanning stops at the first form that
/// matches; there is no scoring across competing patterns.
pub static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\s+\d{4}\b",
        r"\b\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4}\b",
        r"\b\d{4}\s*[-\x{2013}]\s*\d{4}\b",
        r"(?i)\b\d{4}\s*[-\x{2013}]\s*(present|current)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

pub static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());

pub static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\x{2022}\-\*\+]\s*").unwrap());

static SKILLS_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(skills?|technologies?|tools?):?\s*").unwrap());

static SKILL_DELIMITER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,;\n\|\x{2022}\-\*\+]+").unwrap());

static ACHIEVEMENT_DELIMITER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\n\x{2022}\-\*\+]+").unwrap());

/// Verb cues that mark a line as a responsibility rather than a
/// title/company candidate.
pub const RESPONSIBILITY_VERBS: &[&str] = &[
    "developed",
    "managed",
    "led",
    "built",
    "implemented",
    "improved",
    "collaborated",
];

pub const INSTITUTION_KEYWORDS: &[&str] = &["university", "college", "institute", "school"];

pub const DEGREE_KEYWORDS: &[&str] =
    &["bachelor", "master", "phd", "degree", "b.s.", "m.s.", "b.a.", "m.a."];

/// Fixed vocabulary used by the PDF degenerate-input fallback.
pub const FALLBACK_TECH_TERMS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "react",
    "angular",
    "vue",
    "sql",
    "mysql",
    "postgresql",
    "mongodb",
    "git",
    "docker",
    "aws",
    "azure",
    "linux",
    "windows",
    "html",
    "css",
];

/// Maximum header length for the DOCX structural cue.
pub const DOCX_HEADER_MAX_CHARS: usize = 50;
/// Maximum header token count for the PDF heuristic cue.
pub const PDF_HEADER_MAX_TOKENS: usize = 5;

/// Returns the first section whose phrase set matches `text`.
pub fn classify_section(text: &str) -> Option<Section> {
    SECTION_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(text))
        .map(|(section, _)| *section)
}

/// Scans `text` against the ordered date pattern list; first match wins.
pub fn extract_dates(text: &str) -> Option<String> {
    DATE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find(text))
        .map(|m| m.as_str().to_string())
}

pub fn is_bullet(line: &str) -> bool {
    BULLET_RE.is_match(line)
}

pub fn strip_bullet(line: &str) -> String {
    BULLET_RE.replace(line, "").trim().to_string()
}

/// True when the line reads like a responsibility: bullet-marked or led by a
/// known action verb.
pub fn is_responsibility_line(line: &str) -> bool {
    if is_bullet(line) {
        return true;
    }
    let lower = line.to_lowercase();
    RESPONSIBILITY_VERBS.iter().any(|verb| lower.starts_with(verb))
}

/// Splits a skills section into raw candidate strings.
pub fn split_raw_skills(text: &str) -> Vec<String> {
    let stripped = SKILLS_PREFIX_RE.replace(text, "");
    SKILL_DELIMITER_RE
        .split(&stripped)
        .map(str::trim)
        .filter(|s| s.len() >= 2 && s.len() <= 50)
        .map(str::to_string)
        .collect()
}

/// Splits an achievements section on bullets and line breaks.
pub fn split_achievements(text: &str) -> Vec<String> {
    ACHIEVEMENT_DELIMITER_RE
        .split(text)
        .map(str::trim)
        .filter(|s| s.len() > 5)
        .map(str::to_string)
        .collect()
}
