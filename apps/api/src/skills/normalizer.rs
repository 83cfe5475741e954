//! Skill string cleaning, canonical lookup, and category inference.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{SkillCategory, SkillEntry, SkillsCatalog};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static QUALIFIER_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(proficient in|experience with|knowledge of)\s+").unwrap());
static CATEGORY_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s+(programming|development|framework|library|database)$").unwrap()
});
static VERSION_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\d+(\.\d+)*$").unwrap());
static PARENTHETICAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\([^)]*\)\s*").unwrap());
static PUNCTUATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.,;:!?]").unwrap());

/// Ordered (patterns, category) inference rules. Evaluated first-match-wins;
/// later rules assume earlier ones already claimed the more specific cases,
/// so the order must not change.
static CATEGORY_RULES: Lazy<Vec<(Vec<Regex>, SkillCategory)>> = Lazy::new(|| {
    let rules: &[(&[&str], SkillCategory)] = &[
        (
            &[
                r"(lang|language)$",
                r"^(c|r|matlab|scala|kotlin|swift|perl|shell)$",
                r"script$",
            ],
            SkillCategory::Programming,
        ),
        (
            &[r"(framework|js)$", r"^(spring|hibernate|laravel|rails|ember|backbone)$"],
            SkillCategory::Frameworks,
        ),
        (
            &[r"(db|database|sql|nosql)$", r"^(oracle|cassandra|neo4j|influx|elastic)$"],
            SkillCategory::Databases,
        ),
        (
            &[r"(cloud|aws|azure|gcp)$", r"^(serverless|lambda|functions)$"],
            SkillCategory::Cloud,
        ),
        (
            &[r"^(ide|editor|vim|vscode|intellij|eclipse)$", r"(testing|test|ci|cd|devops)$"],
            SkillCategory::Tools,
        ),
        (
            &[r"^(teamwork|collaboration|analytical|creative)$", r"(management|planning|organization)$"],
            SkillCategory::SoftSkills,
        ),
        (
            &[r"(certified|certification|cert)$", r"^(pmp|cissp|cism|aws|azure|google).*cert"],
            SkillCategory::Certifications,
        ),
    ];

    rules
        .iter()
        .map(|(patterns, category)| {
            (patterns.iter().map(|p| Regex::new(p).unwrap()).collect(), *category)
        })
        .collect()
});

const TECHNICAL_KEYWORDS: &[&str] =
    &["api", "rest", "http", "json", "xml", "web", "mobile", "algorithm"];

const KNOWN_SKILL_CONFIDENCE: f64 = 0.95;
const INFERRED_SKILL_CONFIDENCE: f64 = 0.7;

/// Cleans a raw skill string before alias lookup. The steps run in a fixed
/// order: collapse whitespace, strip qualifier prefixes, strip category
/// suffixes, strip trailing version numbers, strip parentheticals, strip
/// punctuation.
pub fn clean_skill_name(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let mut skill = WHITESPACE_RE.replace_all(raw.trim(), " ").into_owned();
    skill = QUALIFIER_PREFIX_RE.replace(&skill, "").into_owned();
    skill = CATEGORY_SUFFIX_RE.replace(&skill, "").into_owned();
    skill = VERSION_SUFFIX_RE.replace(&skill, "").into_owned();
    skill = PARENTHETICAL_RE.replace_all(&skill, " ").into_owned();
    skill = PUNCTUATION_RE.replace_all(&skill, "").into_owned();
    WHITESPACE_RE.replace_all(skill.trim(), " ").into_owned()
}

/// Infers a category for a skill missing from the alias catalog.
pub fn infer_category(cleaned: &str) -> SkillCategory {
    let lower = cleaned.to_lowercase();

    for (patterns, category) in CATEGORY_RULES.iter() {
        if patterns.iter().any(|p| p.is_match(&lower)) {
            return *category;
        }
    }

    if TECHNICAL_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return SkillCategory::Technical;
    }

    SkillCategory::Other
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl SkillsCatalog {
    /// Normalizes a single raw skill string into a structured entry.
    pub fn normalize_skill(&self, raw: &str) -> SkillEntry {
        let cleaned = clean_skill_name(raw);

        if let Some(info) = self.lookup(&cleaned) {
            SkillEntry {
                name: raw.trim().to_string(),
                canonical_name: info.canonical,
                category: info.category,
                aliases: info.aliases,
                confidence_score: KNOWN_SKILL_CONFIDENCE,
            }
        } else {
            SkillEntry {
                name: raw.trim().to_string(),
                canonical_name: title_case(&cleaned),
                category: infer_category(&cleaned),
                aliases: Vec::new(),
                confidence_score: INFERRED_SKILL_CONFIDENCE,
            }
        }
    }

    /// Normalizes a list of raw skills, deduplicating by lower-cased canonical
    /// name (first occurrence wins) and sorting by category, then canonical
    /// name. The output order is independent of extraction order.
    pub fn normalize_skills_list(&self, raw_skills: &[String]) -> Vec<SkillEntry> {
        let mut seen = std::collections::HashSet::new();
        let mut normalized: Vec<SkillEntry> = Vec::new();

        for raw in raw_skills {
            if raw.trim().is_empty() {
                continue;
            }
            let entry = self.normalize_skill(raw);
            if seen.insert(entry.canonical_name.to_lowercase()) {
                normalized.push(entry);
            }
        }

        normalized.sort_by(|a, b| {
            (a.category.sort_key(), &a.canonical_name).cmp(&(b.category.sort_key(), &b.canonical_name))
        });

        normalized
    }
}
