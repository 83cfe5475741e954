//! Intermediate content model shared by the DOCX and PDF extractors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The seven canonical resume regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Contact,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Achievements,
}

impl Section {
    pub fn name(&self) -> &'static str {
        match self {
            Section::Contact => "contact",
            Section::Summary => "summary",
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Skills => "skills",
            Section::Projects => "projects",
            Section::Achievements => "achievements",
        }
    }
}

/// One paragraph (DOCX) or text line (PDF) with the hints the header
/// classifier needs. Built once per extraction, discarded after the section
/// map exists.
#[derive(Debug, Clone)]
pub struct RawContentUnit {
    pub index: usize,
    pub text: String,
    pub is_header: bool,
    pub bold: bool,
    pub uppercase: bool,
}

impl RawContentUnit {
    pub fn new(index: usize, text: String) -> Self {
        let uppercase = text.chars().any(|c| c.is_alphabetic())
            && !text.chars().any(|c| c.is_lowercase());
        Self {
            index,
            text,
            is_header: false,
            bold: false,
            uppercase,
        }
    }
}

/// Maps each detected section to the content unit indices belonging to it.
#[derive(Debug, Default, Clone)]
pub struct SectionMap {
    buckets: BTreeMap<Section, Vec<usize>>,
}

impl SectionMap {
    /// Opens a bucket for `section`, reusing it if the section recurs.
    pub fn open(&mut self, section: Section) {
        self.buckets.entry(section).or_default();
    }

    pub fn append(&mut self, section: Section, index: usize) {
        self.buckets.entry(section).or_default().push(index);
    }

    pub fn indices(&self, section: Section) -> &[usize] {
        self.buckets.get(&section).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names of sections with an opened bucket, in canonical section order.
    pub fn detected(&self) -> Vec<String> {
        self.buckets.keys().map(|s| s.name().to_string()).collect()
    }

    /// True when no bucket received any content at all.
    pub fn all_buckets_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Builds the section map with a single forward pass over the content units.
/// The current-section cursor switches only on header units; units before the
/// first header belong to no section.
pub fn build_section_map<F>(units: &[RawContentUnit], classify: F) -> SectionMap
where
    F: Fn(&RawContentUnit) -> Option<Section>,
{
    let mut map = SectionMap::default();
    let mut current: Option<Section> = None;

    for unit in units {
        if unit.is_header {
            if let Some(section) = classify(unit) {
                current = Some(section);
                map.open(section);
                continue;
            }
        }
        if let Some(section) = current {
            map.append(section, unit.index);
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(index: usize, text: &str) -> RawContentUnit {
        let mut unit = RawContentUnit::new(index, text.to_string());
        unit.is_header = true;
        unit
    }

    fn classify(unit: &RawContentUnit) -> Option<Section> {
        crate::parsing::patterns::classify_section(&unit.text)
    }

    #[test]
    fn test_uppercase_detection() {
        assert!(RawContentUnit::new(0, "EXPERIENCE".into()).uppercase);
        assert!(!RawContentUnit::new(0, "Experience".into()).uppercase);
        assert!(!RawContentUnit::new(0, "2020 - 2023".into()).uppercase);
    }

    #[test]
    fn test_cursor_switches_on_headers_only() {
        let units = vec![
            RawContentUnit::new(0, "Jane Doe".into()),
            header(1, "Experience"),
            RawContentUnit::new(2, "Acme Corp".into()),
            header(3, "Skills"),
            RawContentUnit::new(4, "Python, Rust".into()),
        ];
        let map = build_section_map(&units, classify);

        assert_eq!(map.indices(Section::Experience), &[2]);
        assert_eq!(map.indices(Section::Skills), &[4]);
        assert_eq!(map.detected(), vec!["experience", "skills"]);
    }

    #[test]
    fn test_units_before_first_header_belong_to_no_section() {
        let units = vec![
            RawContentUnit::new(0, "orphan line".into()),
            header(1, "Education"),
            RawContentUnit::new(2, "State University".into()),
        ];
        let map = build_section_map(&units, classify);
        assert_eq!(map.indices(Section::Education), &[2]);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_recurring_section_reuses_bucket() {
        let units = vec![
            header(0, "Experience"),
            RawContentUnit::new(1, "First Corp".into()),
            header(2, "Skills"),
            RawContentUnit::new(3, "Python".into()),
            header(4, "Experience"),
            RawContentUnit::new(5, "Second Corp".into()),
        ];
        let map = build_section_map(&units, classify);
        assert_eq!(map.indices(Section::Experience), &[1, 5]);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_empty_document_yields_empty_map() {
        let map = build_section_map(&[], classify);
        assert!(map.is_empty());
        assert!(map.all_buckets_empty());
    }
}
