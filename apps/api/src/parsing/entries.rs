//! Heuristic decomposition of section text into typed entries.
//!
//! All parsing here is best-effort: a block that yields nothing useful is
//! dropped, never an error. The boundary and field rules are ordered and
//! first-match-wins.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::patterns::{
    extract_dates, is_responsibility_line, strip_bullet, DEGREE_KEYWORDS, EMAIL_RE,
    INSTITUTION_KEYWORDS, PHONE_RE, URL_RE, YEAR_RE,
};

const MAX_CONTACT_URLS: usize = 3;
const MIN_EXPERIENCE_BLOCK_LEN: usize = 10;
const MIN_PROJECT_BLOCK_LEN: usize = 10;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub urls: Vec<String>,
}

impl ContactInfo {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none() && self.urls.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub company: String,
    pub title: String,
    pub duration: String,
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub year: String,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
}

/// Collapses whitespace and strips a leading bullet marker.
pub fn clean_text(text: &str) -> String {
    let collapsed = WHITESPACE_RE.replace_all(text.trim(), " ");
    strip_bullet(&collapsed)
}

/// Scans the whole document text for contact details; first match of each
/// kind wins. Phone candidates must survive digit-count validation.
pub fn extract_contact(text: &str) -> ContactInfo {
    let email = EMAIL_RE.find(text).map(|m| m.as_str().to_string());

    let phone = PHONE_RE
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .find(|candidate| is_valid_phone(candidate));

    let urls: Vec<String> = URL_RE
        .find_iter(text)
        .take(MAX_CONTACT_URLS)
        .map(|m| m.as_str().to_string())
        .collect();

    ContactInfo { email, phone, urls }
}

/// Phone validation: strip formatting punctuation, require 7-15 digits.
pub fn is_valid_phone(candidate: &str) -> bool {
    let digits: String = candidate.chars().filter(|c| c.is_ascii_digit()).collect();
    let stripped: String = candidate
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '+' | '.'))
        .collect();
    stripped.chars().all(|c| c.is_ascii_digit()) && (7..=15).contains(&digits.len())
}

/// Splits section text into candidate entry blocks. A new block starts at a
/// line for which `is_boundary` holds; leading lines before the first
/// boundary form their own block.
fn split_blocks<F>(text: &str, is_boundary: F) -> Vec<Vec<String>>
where
    F: Fn(&str) -> bool,
{
    let mut blocks: Vec<Vec<String>> = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if is_boundary(line) || blocks.is_empty() {
            blocks.push(vec![line.to_string()]);
        } else if let Some(current) = blocks.last_mut() {
            current.push(line.to_string());
        }
    }

    blocks
}

/// A capital-led line that is not a responsibility cue starts a new
/// experience entry.
fn is_experience_boundary(line: &str) -> bool {
    line.chars().next().is_some_and(|c| c.is_ascii_uppercase()) && !is_responsibility_line(line)
}

/// True when a single line already carries title/company structure, so a
/// following capital-led line must belong to the next entry.
fn has_entry_signal(line: &str) -> bool {
    line.contains('|') || line.contains(" - ") || line.contains(',') || extract_dates(line).is_some()
}

/// Experience splitting follows the boundary rule with one exception: a lone
/// title-only line keeps its company line in the same block.
fn split_experience_blocks(text: &str) -> Vec<Vec<String>> {
    let mut blocks: Vec<Vec<String>> = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let extend = match blocks.last() {
            None => false,
            Some(current) => {
                !is_experience_boundary(line)
                    || (current.len() == 1 && !has_entry_signal(&current[0]))
            }
        };
        if extend {
            if let Some(current) = blocks.last_mut() {
                current.push(line.to_string());
            }
        } else {
            blocks.push(vec![line.to_string()]);
        }
    }

    blocks
}

/// Parses an experience section into entries. `cap` bounds the number of
/// entries for the less reliable PDF pathway.
pub fn parse_experience(text: &str, cap: Option<usize>) -> Vec<ExperienceEntry> {
    let mut entries: Vec<ExperienceEntry> = split_experience_blocks(text)
        .into_iter()
        .filter(|block| block.iter().map(|l| l.len()).sum::<usize>() >= MIN_EXPERIENCE_BLOCK_LEN)
        .filter_map(|block| parse_experience_block(&block))
        .collect();

    if let Some(cap) = cap {
        entries.truncate(cap);
    }
    entries
}

fn parse_experience_block(lines: &[String]) -> Option<ExperienceEntry> {
    let mut entry = ExperienceEntry::default();
    let mut title_lines: Vec<&str> = Vec::new();

    for line in lines {
        if is_responsibility_line(line) {
            let cleaned = strip_bullet(line);
            if !cleaned.is_empty() {
                entry.responsibilities.push(cleaned);
            }
        } else {
            title_lines.push(line);
        }
    }

    // Duration comes from the first line anywhere in the block that carries
    // a recognizable date form.
    if let Some(duration) = lines.iter().find_map(|line| extract_dates(line)) {
        entry.duration = duration;
    }

    if let Some(first) = title_lines.first() {
        // Separator precedence: pipe, then spaced hyphen, then comma (only
        // when the line is not itself a date line).
        if let Some((title, company)) = first.split_once('|') {
            entry.title = title.trim().to_string();
            entry.company = company.trim().to_string();
        } else if let Some((title, company)) = first.split_once(" - ") {
            entry.title = title.trim().to_string();
            entry.company = company.trim().to_string();
        } else if first.contains(',') && extract_dates(first).is_none() {
            let (title, company) = first.split_once(',').unwrap_or((first, ""));
            entry.title = title.trim().to_string();
            entry.company = company.trim().to_string();
        } else {
            entry.title = first.trim().to_string();
            if let Some(second) = title_lines.get(1) {
                if extract_dates(second).is_none() {
                    entry.company = second.trim().to_string();
                }
            }
        }
    }

    if entry.company.is_empty() && entry.title.is_empty() && entry.responsibilities.is_empty() {
        None
    } else {
        Some(entry)
    }
}

/// Parses an education section with a per-line state machine: a line naming
/// a degree or an institution opens a new entry; following lines attach as
/// details.
pub fn parse_education(text: &str, cap: Option<usize>) -> Vec<EducationEntry> {
    let mut entries: Vec<EducationEntry> = Vec::new();
    let mut current: Option<EducationEntry> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let lower = line.to_lowercase();
        let has_degree = DEGREE_KEYWORDS.iter().any(|kw| lower.contains(kw));
        let has_institution = INSTITUTION_KEYWORDS.iter().any(|kw| lower.contains(kw));

        if has_degree || has_institution {
            if let Some(done) = current.take() {
                entries.push(done);
            }
            let mut entry = EducationEntry::default();
            if has_degree {
                entry.degree = strip_bullet(line);
            }
            if has_institution {
                entry.institution = strip_bullet(line);
            }
            if let Some(year) = YEAR_RE.find(line) {
                entry.year = year.as_str().to_string();
            }
            current = Some(entry);
        } else if let Some(entry) = current.as_mut() {
            if entry.year.is_empty() {
                if let Some(year) = YEAR_RE.find(line) {
                    entry.year = year.as_str().to_string();
                }
            }
            entry.details.push(strip_bullet(line));
        }
    }

    if let Some(done) = current.take() {
        entries.push(done);
    }

    entries.retain(|e| !e.degree.is_empty() || !e.institution.is_empty());
    if let Some(cap) = cap {
        entries.truncate(cap);
    }
    entries
}

/// Parses a projects section: each capital-led line starts a project, the
/// remaining lines of the block form its description.
pub fn parse_projects(text: &str, cap: Option<usize>) -> Vec<ProjectEntry> {
    let mut projects: Vec<ProjectEntry> = split_blocks(text, is_experience_boundary)
        .into_iter()
        .filter(|block| block.iter().map(|l| l.len()).sum::<usize>() >= MIN_PROJECT_BLOCK_LEN)
        .map(|block| ProjectEntry {
            name: strip_bullet(&block[0]),
            description: block[1..]
                .iter()
                .map(|l| strip_bullet(l))
                .collect::<Vec<_>>()
                .join(" "),
            technologies: Vec::new(),
        })
        .filter(|p| !p.name.is_empty())
        .collect();

    if let Some(cap) = cap {
        projects.truncate(cap);
    }
    projects
}
