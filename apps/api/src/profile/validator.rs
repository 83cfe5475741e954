//! Profile assembly and validation.
//!
//! `transform` shapes raw extractor output into the versioned profile
//! structure; `validate_profile` enforces version compatibility, field
//! formats, and the privacy invariant. Validation never panics: every
//! failure lands in the outcome's error list.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};

use crate::parsing::ExtractorOutput;

use super::schema::{is_schema_compatible, is_valid_semver, ProfileRecord, SCHEMA_VERSION};

/// Derived demographic keys that must never appear in a profile, whatever
/// the validation mode.
const PROHIBITED_FIELDS: &[&str] = &["age", "gender", "race", "nationality", "marital_status"];

static EMAIL_FORMAT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").unwrap());

#[derive(Debug, Default)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub profile: Option<ProfileRecord>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// One field-level problem, tagged with the top-level field it lives under
/// so lenient cleanup knows what it may remove.
struct FieldIssue {
    top_field: String,
    nested: bool,
    message: String,
}

impl FieldIssue {
    fn top(field: &str, message: impl Into<String>) -> Self {
        Self {
            top_field: field.to_string(),
            nested: false,
            message: message.into(),
        }
    }

    fn nested(field: &str, message: impl Into<String>) -> Self {
        Self {
            top_field: field.to_string(),
            nested: true,
            message: message.into(),
        }
    }
}

/// Shapes extractor output into the profile structure. The source path is
/// reduced to its basename; field synonyms from the extractors map onto the
/// schema's names here.
pub fn transform(output: &ExtractorOutput, source_file: &str, processing_time_ms: u64) -> Value {
    let basename = source_file
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(source_file)
        .to_string();

    let contact = if output.contact.is_empty() {
        Value::Null
    } else {
        let mut contact = Map::new();
        contact.insert("email".to_string(), json!(output.contact.email));
        contact.insert("phone".to_string(), json!(output.contact.phone));

        let mut website = None;
        let mut linkedin = None;
        let mut github = None;
        for url in &output.contact.urls {
            let lower = url.to_lowercase();
            if lower.contains("linkedin") && linkedin.is_none() {
                linkedin = Some(url.clone());
            } else if lower.contains("github") && github.is_none() {
                github = Some(url.clone());
            } else if website.is_none() {
                website = Some(url.clone());
            }
        }
        contact.insert("website".to_string(), json!(website));
        contact.insert("linkedin".to_string(), json!(linkedin));
        contact.insert("github".to_string(), json!(github));
        Value::Object(contact)
    };

    let summary = if output.summary.is_empty() {
        Value::Null
    } else {
        json!({ "text": output.summary, "keywords": [] })
    };

    let experience: Vec<Value> = output
        .experience
        .iter()
        .map(|e| {
            json!({
                "company": non_empty(&e.company),
                "position": non_empty(&e.title),
                "duration": non_empty(&e.duration),
                "responsibilities": e.responsibilities,
                "technologies": [],
            })
        })
        .collect();

    let education: Vec<Value> = output
        .education
        .iter()
        .map(|e| {
            json!({
                "institution": non_empty(&e.institution),
                "degree": non_empty(&e.degree),
                "year": non_empty(&e.year),
                "details": e.details,
            })
        })
        .collect();

    let projects: Vec<Value> = output
        .projects
        .iter()
        .map(|p| {
            json!({
                "name": p.name,
                "description": non_empty(&p.description),
                "technologies": p.technologies,
            })
        })
        .collect();

    let achievements: Vec<Value> = output
        .achievements
        .iter()
        .map(|a| json!({ "title": a, "organization": null, "description": null }))
        .collect();

    json!({
        "schema_version": SCHEMA_VERSION,
        "generated_at": chrono::Utc::now(),
        "extraction_method": output.method,
        "source_file": basename,
        "contact": contact,
        "summary": summary,
        "experience": experience,
        "education": education,
        "skills": output.skills,
        "projects": projects,
        "achievements": achievements,
        "additional_sections": {},
        "metadata": {
            "extractor_version": env!("CARGO_PKG_VERSION"),
            "extraction_timestamp": chrono::Utc::now(),
            "processing_time_ms": processing_time_ms,
            "confidence_score": output.confidence,
            "file_type": file_type_from_name(&basename),
            "sections_detected": output.sections_detected,
        },
        "warnings": output.warnings,
        "errors": [],
    })
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn file_type_from_name(filename: &str) -> &'static str {
    match filename.rsplit('.').next().map(|e| e.to_ascii_lowercase()) {
        Some(ext) if ext == "docx" || ext == "doc" => "docx",
        Some(ext) if ext == "pdf" => "pdf",
        _ => "unknown",
    }
}

/// Validates a profile payload. Strict mode stops at the first class of
/// failure; lenient mode removes invalid top-level fields, demotes their
/// errors to warnings, and retries once. The privacy check is terminal in
/// both modes.
pub fn validate_profile(mut data: Value, strict: bool) -> ValidationOutcome {
    let mut warnings = Vec::new();

    let Some(obj) = data.as_object_mut() else {
        return ValidationOutcome {
            errors: vec!["Profile payload must be a JSON object".to_string()],
            ..ValidationOutcome::default()
        };
    };

    // Version handling comes first so later checks see the current version.
    match obj.get("schema_version").and_then(Value::as_str) {
        None => {
            warnings.push(format!("No schema version found, assuming {SCHEMA_VERSION}"));
            obj.insert("schema_version".to_string(), json!(SCHEMA_VERSION));
        }
        Some(version) if version != SCHEMA_VERSION => {
            if is_schema_compatible(version, SCHEMA_VERSION) {
                warnings.push(format!("Migrated schema from {version} to {SCHEMA_VERSION}"));
                obj.insert("schema_version".to_string(), json!(SCHEMA_VERSION));
            } else {
                let message =
                    format!("Incompatible schema version: {version} (current: {SCHEMA_VERSION})");
                if strict {
                    return ValidationOutcome {
                        errors: vec![message],
                        warnings,
                        ..ValidationOutcome::default()
                    };
                }
                warnings.push(message);
                obj.insert("schema_version".to_string(), json!(SCHEMA_VERSION));
            }
        }
        Some(_) => {}
    }

    // Privacy invariant: terminal regardless of mode.
    if let Some(additional) = obj.get("additional_sections") {
        let mut violations = Vec::new();
        scan_prohibited(additional, "additional_sections", &mut violations);
        if !violations.is_empty() {
            return ValidationOutcome {
                errors: violations,
                warnings,
                ..ValidationOutcome::default()
            };
        }
    }

    let mut issues = check_fields(obj);
    if !issues.is_empty() {
        if strict {
            return ValidationOutcome {
                errors: issues.into_iter().map(|i| i.message).collect(),
                warnings,
                ..ValidationOutcome::default()
            };
        }

        // Lenient cleanup: only whole top-level fields can be removed.
        // Nested problems survive the retry and keep the payload invalid.
        for issue in issues.iter().filter(|i| !i.nested) {
            obj.remove(&issue.top_field);
            warnings.push(format!("Removed invalid field: {}", issue.message));
        }

        issues = check_fields(obj);
        if !issues.is_empty() {
            return ValidationOutcome {
                errors: issues.into_iter().map(|i| i.message).collect(),
                warnings,
                ..ValidationOutcome::default()
            };
        }
    }

    match serde_json::from_value::<ProfileRecord>(data) {
        Ok(profile) => ValidationOutcome {
            is_valid: true,
            profile: Some(profile),
            errors: Vec::new(),
            warnings,
        },
        Err(e) => ValidationOutcome {
            errors: vec![format!("Profile deserialization failed: {e}")],
            warnings,
            ..ValidationOutcome::default()
        },
    }
}

fn scan_prohibited(value: &Value, path: &str, violations: &mut Vec<String>) {
    if let Value::Object(map) = value {
        for (key, nested) in map {
            let full_path = format!("{path}.{key}");
            if PROHIBITED_FIELDS.contains(&key.to_lowercase().as_str()) {
                violations.push(format!("Prohibited derived PII field detected: {full_path}"));
            }
            scan_prohibited(nested, &full_path, violations);
        }
    }
}

fn check_fields(obj: &Map<String, Value>) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    if let Some(version) = obj.get("schema_version") {
        match version.as_str() {
            Some(v) if is_valid_semver(v) => {}
            _ => issues.push(FieldIssue::top(
                "schema_version",
                "Field 'schema_version': must follow semantic versioning (x.y.z)",
            )),
        }
    }

    for field in ["extraction_method", "source_file"] {
        if let Some(value) = obj.get(field) {
            if !value.is_string() {
                issues.push(FieldIssue::top(field, format!("Field '{field}': expected a string")));
            }
        }
    }

    for field in ["experience", "education", "skills", "projects", "achievements", "warnings", "errors"] {
        if let Some(value) = obj.get(field) {
            if !value.is_array() && !value.is_null() {
                issues.push(FieldIssue::top(field, format!("Field '{field}': expected an array")));
            }
        }
    }

    for field in ["summary", "metadata", "additional_sections"] {
        if let Some(value) = obj.get(field) {
            if !value.is_object() && !value.is_null() {
                issues.push(FieldIssue::top(field, format!("Field '{field}': expected an object")));
            }
        }
    }

    match obj.get("contact") {
        Some(Value::Object(contact)) => {
            if let Some(email) = contact.get("email").and_then(Value::as_str) {
                if !EMAIL_FORMAT_RE.is_match(email) {
                    issues.push(FieldIssue::nested(
                        "contact",
                        "Field 'contact -> email': invalid email format",
                    ));
                }
            }
            if let Some(phone) = contact.get("phone").and_then(Value::as_str) {
                if !is_valid_phone_format(phone) {
                    issues.push(FieldIssue::nested(
                        "contact",
                        "Field 'contact -> phone': invalid phone format",
                    ));
                }
            }
        }
        Some(Value::Null) | None => {}
        Some(_) => {
            issues.push(FieldIssue::top("contact", "Field 'contact': expected an object"));
        }
    }

    if let Some(Value::Object(metadata)) = obj.get("metadata") {
        if let Some(score) = metadata.get("confidence_score").and_then(Value::as_f64) {
            if !(0.0..=1.0).contains(&score) {
                issues.push(FieldIssue::nested(
                    "metadata",
                    "Field 'metadata -> confidence_score': must be between 0.0 and 1.0",
                ));
            }
        }
    }

    issues
}

fn is_valid_phone_format(phone: &str) -> bool {
    let digits: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '+' | '.'))
        .collect();
    digits.len() >= 7 && digits.len() <= 15 && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::entries::{ContactInfo, ExperienceEntry};

    fn sample_output() -> ExtractorOutput {
        ExtractorOutput {
            method: "docx_deterministic".to_string(),
            sections_detected: vec!["experience".to_string(), "skills".to_string()],
            contact: ContactInfo {
                email: Some("jane@example.com".to_string()),
                phone: Some("+1 555 123 4567".to_string()),
                urls: vec![
                    "https://linkedin.com/in/jane".to_string(),
                    "https://github.com/jane".to_string(),
                    "https://janedoe.dev".to_string(),
                ],
            },
            summary: "Backend engineer.".to_string(),
            experience: vec![ExperienceEntry {
                company: "Acme Corp".to_string(),
                title: "Senior Engineer".to_string(),
                duration: "2020 - 2023".to_string(),
                responsibilities: vec!["Led migration".to_string()],
            }],
            confidence: 0.7,
            ..ExtractorOutput::default()
        }
    }

    #[test]
    fn test_transform_strips_path_and_maps_synonyms() {
        let value = transform(&sample_output(), "/data/uploads/jane_doe_resume.docx", 42);

        assert_eq!(value["source_file"], "jane_doe_resume.docx");
        assert_eq!(value["experience"][0]["position"], "Senior Engineer");
        assert_eq!(value["experience"][0]["company"], "Acme Corp");
        assert_eq!(value["metadata"]["file_type"], "docx");
        assert_eq!(value["metadata"]["processing_time_ms"], 42);
        assert_eq!(value["schema_version"], SCHEMA_VERSION);
    }

    #[test]
    fn test_transform_routes_urls() {
        let value = transform(&sample_output(), "cv.pdf", 1);
        assert_eq!(value["contact"]["linkedin"], "https://linkedin.com/in/jane");
        assert_eq!(value["contact"]["github"], "https://github.com/jane");
        assert_eq!(value["contact"]["website"], "https://janedoe.dev");
        assert_eq!(value["metadata"]["file_type"], "pdf");
    }

    #[test]
    fn test_transformed_output_validates_strictly() {
        let value = transform(&sample_output(), "cv.docx", 10);
        let outcome = validate_profile(value, true);
        assert!(outcome.is_valid, "errors: {:?}", outcome.errors);
        let profile = outcome.profile.unwrap();
        assert_eq!(profile.experience[0].position.as_deref(), Some("Senior Engineer"));
    }

    #[test]
    fn test_missing_version_is_assumed_with_warning() {
        let mut value = transform(&sample_output(), "cv.docx", 10);
        value.as_object_mut().unwrap().remove("schema_version");

        let outcome = validate_profile(value, true);
        assert!(outcome.is_valid);
        assert!(outcome
            .warnings
            .iter()
            .any(|w| w == "No schema version found, assuming 1.0.0"));
    }

    #[test]
    fn test_compatible_version_migrates_with_warning() {
        let mut value = transform(&sample_output(), "cv.docx", 10);
        value["schema_version"] = json!("1.0.5");

        let outcome = validate_profile(value, true);
        assert!(outcome.is_valid);
        assert_eq!(outcome.profile.unwrap().schema_version, SCHEMA_VERSION);
        assert!(outcome
            .warnings
            .iter()
            .any(|w| w == "Migrated schema from 1.0.5 to 1.0.0"));
    }

    #[test]
    fn test_incompatible_version_fails_strict() {
        let mut value = transform(&sample_output(), "cv.docx", 10);
        value["schema_version"] = json!("2.0.0");

        let outcome = validate_profile(value, true);
        assert!(!outcome.is_valid);
        assert!(outcome.errors[0].contains("Incompatible schema version: 2.0.0"));
    }

    #[test]
    fn test_incompatible_version_is_demoted_in_lenient_mode() {
        let mut value = transform(&sample_output(), "cv.docx", 10);
        value["schema_version"] = json!("2.0.0");

        let outcome = validate_profile(value, false);
        assert!(outcome.is_valid);
        assert!(outcome
            .warnings
            .iter()
            .any(|w| w.contains("Incompatible schema version: 2.0.0")));
    }

    #[test]
    fn test_privacy_violation_is_terminal_in_both_modes() {
        for strict in [true, false] {
            let mut value = transform(&sample_output(), "cv.docx", 10);
            value["additional_sections"] = json!({ "personal": { "Age": 34 } });

            let outcome = validate_profile(value, strict);
            assert!(!outcome.is_valid);
            assert!(outcome.errors[0]
                .contains("Prohibited derived PII field detected: additional_sections.personal.Age"));
        }
    }

    #[test]
    fn test_lenient_mode_removes_invalid_top_level_field() {
        let mut value = transform(&sample_output(), "cv.docx", 10);
        value["warnings"] = json!("not an array");

        let strict_outcome = validate_profile(value.clone(), true);
        assert!(!strict_outcome.is_valid);

        let lenient_outcome = validate_profile(value, false);
        assert!(lenient_outcome.is_valid);
        assert!(lenient_outcome
            .warnings
            .iter()
            .any(|w| w.starts_with("Removed invalid field:")));
        assert!(lenient_outcome.profile.unwrap().warnings.is_empty());
    }

    #[test]
    fn test_nested_invalid_field_survives_lenient_cleanup() {
        let mut value = transform(&sample_output(), "cv.docx", 10);
        value["contact"]["email"] = json!("not-an-email");

        let outcome = validate_profile(value, false);
        assert!(!outcome.is_valid);
        assert!(outcome.errors[0].contains("contact -> email"));
    }

    #[test]
    fn test_confidence_out_of_range_is_rejected() {
        let mut value = transform(&sample_output(), "cv.docx", 10);
        value["metadata"]["confidence_score"] = json!(1.5);

        let outcome = validate_profile(value, true);
        assert!(!outcome.is_valid);
        assert!(outcome.errors[0].contains("confidence_score"));
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        let outcome = validate_profile(json!([1, 2, 3]), true);
        assert!(!outcome.is_valid);
    }
}
