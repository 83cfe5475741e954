//! Alias catalog backing skill canonicalization.
//!
//! The catalog is built once at startup and shared behind an `Arc`. Lookups
//! take the read lock; the only writer is the runtime alias-registration
//! operation, which is rare and serialized by the write lock.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use super::{SkillCategory, SkillEntry};

/// Canonical skill with its known aliases and category.
#[derive(Debug, Clone)]
pub struct SkillInfo {
    pub canonical: String,
    pub aliases: Vec<String>,
    pub category: SkillCategory,
}

/// Seed alias table. Canonical name, known aliases, category.
const SEED_ALIASES: &[(&str, &[&str], SkillCategory)] = &[
    // Programming languages
    ("Python", &["python3", "py", "python 3", "python3.x"], SkillCategory::Programming),
    (
        "JavaScript",
        &["js", "java script", "javascript es6", "es6", "node.js backend"],
        SkillCategory::Programming,
    ),
    ("TypeScript", &["ts", "type script"], SkillCategory::Programming),
    ("Java", &["java 8", "java 11", "java 17", "jdk"], SkillCategory::Programming),
    ("C#", &["c sharp", ".net", "dotnet"], SkillCategory::Programming),
    ("C++", &["cpp", "c plus plus"], SkillCategory::Programming),
    ("Go", &["golang", "go lang"], SkillCategory::Programming),
    ("Rust", &["rust lang"], SkillCategory::Programming),
    ("PHP", &["php7", "php8"], SkillCategory::Programming),
    ("Ruby", &["ruby on rails"], SkillCategory::Programming),
    // Web frameworks
    ("React", &["reactjs", "react.js", "react js"], SkillCategory::Frameworks),
    ("Angular", &["angularjs", "angular js", "angular 2+"], SkillCategory::Frameworks),
    ("Vue.js", &["vuejs", "vue js", "vue"], SkillCategory::Frameworks),
    ("Next.js", &["next", "nextjs", "next js"], SkillCategory::Frameworks),
    ("Django", &["django rest framework", "drf"], SkillCategory::Frameworks),
    ("Flask", &[], SkillCategory::Frameworks),
    ("FastAPI", &["fast api"], SkillCategory::Frameworks),
    ("Express.js", &["expressjs", "express js"], SkillCategory::Frameworks),
    ("Spring Framework", &["spring boot", "spring mvc"], SkillCategory::Frameworks),
    // Databases
    ("PostgreSQL", &["postgres", "psql", "pg"], SkillCategory::Databases),
    ("MySQL", &["my sql"], SkillCategory::Databases),
    ("MongoDB", &["mongo db", "mongo"], SkillCategory::Databases),
    ("Redis", &[], SkillCategory::Databases),
    ("SQLite", &["sql lite"], SkillCategory::Databases),
    ("SQL", &["structured query language"], SkillCategory::Databases),
    // Cloud platforms
    ("Amazon Web Services", &["aws", "amazon web services", "aws cloud"], SkillCategory::Cloud),
    ("Microsoft Azure", &["azure", "azure cloud", "ms azure"], SkillCategory::Cloud),
    (
        "Google Cloud Platform",
        &["gcp", "google cloud", "gcloud"],
        SkillCategory::Cloud,
    ),
    ("Kubernetes", &["k8s", "kube"], SkillCategory::Cloud),
    // Development tools
    ("Docker", &["containerization"], SkillCategory::Tools),
    ("Git", &["version control", "git version control"], SkillCategory::Tools),
    ("GitHub", &["git hub"], SkillCategory::Tools),
    ("GitLab", &["git lab"], SkillCategory::Tools),
    ("Jenkins", &["ci/cd"], SkillCategory::Tools),
    ("Jira", &["atlassian jira"], SkillCategory::Tools),
    // Machine learning / data
    ("TensorFlow", &["tensor flow", "tf"], SkillCategory::Technical),
    ("PyTorch", &["torch"], SkillCategory::Technical),
    ("Pandas", &[], SkillCategory::Technical),
    ("NumPy", &["num py"], SkillCategory::Technical),
    ("Scikit-learn", &["sklearn", "scikit learn"], SkillCategory::Technical),
    // Operating systems
    ("Linux", &["unix", "ubuntu", "centos", "red hat"], SkillCategory::Technical),
    ("Windows", &["microsoft windows", "windows server"], SkillCategory::Technical),
    ("macOS", &["mac os", "osx", "os x"], SkillCategory::Technical),
    // Soft skills
    ("Leadership", &["team leadership", "leading teams"], SkillCategory::SoftSkills),
    (
        "Communication",
        &["verbal communication", "written communication"],
        SkillCategory::SoftSkills,
    ),
    ("Project Management", &["project mgmt", "pm"], SkillCategory::SoftSkills),
    ("Problem Solving", &["problem-solving", "troubleshooting"], SkillCategory::SoftSkills),
];

struct Tables {
    /// Lower-cased alias (including the canonical name itself) -> canonical key.
    alias_to_canonical: HashMap<String, String>,
    /// Lower-cased canonical name -> full info.
    canonical_info: HashMap<String, SkillInfo>,
}

pub struct SkillsCatalog {
    tables: RwLock<Tables>,
}

impl SkillsCatalog {
    /// Builds the catalog from the seed alias table.
    pub fn builtin() -> Self {
        let mut tables = Tables {
            alias_to_canonical: HashMap::new(),
            canonical_info: HashMap::new(),
        };

        for (canonical, aliases, category) in SEED_ALIASES {
            let key = canonical.to_lowercase();
            tables.alias_to_canonical.insert(key.clone(), key.clone());
            for alias in *aliases {
                tables.alias_to_canonical.insert(alias.to_lowercase(), key.clone());
            }
            tables.canonical_info.insert(
                key,
                SkillInfo {
                    canonical: (*canonical).to_string(),
                    aliases: aliases.iter().map(|a| (*a).to_string()).collect(),
                    category: *category,
                },
            );
        }

        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Case-insensitive lookup of a cleaned skill string against the alias index.
    pub fn lookup(&self, cleaned: &str) -> Option<SkillInfo> {
        let tables = self.tables.read().expect("catalog lock poisoned");
        let key = tables.alias_to_canonical.get(&cleaned.to_lowercase())?;
        tables.canonical_info.get(key).cloned()
    }

    /// Registers a new alias for a canonical skill at runtime. Creates the
    /// canonical entry when it does not exist yet.
    pub fn register_alias(&self, canonical: &str, alias: &str, category: SkillCategory) {
        let mut tables = self.tables.write().expect("catalog lock poisoned");
        let key = canonical.to_lowercase();

        let info = tables.canonical_info.entry(key.clone()).or_insert_with(|| SkillInfo {
            canonical: canonical.to_string(),
            aliases: Vec::new(),
            category,
        });
        if !info.aliases.iter().any(|a| a.eq_ignore_ascii_case(alias)) {
            info.aliases.push(alias.to_string());
        }

        tables.alias_to_canonical.insert(alias.to_lowercase(), key.clone());
        tables.alias_to_canonical.insert(key.clone(), key);

        tracing::info!(canonical, alias, category = category.as_str(), "Skill alias registered");
    }

    /// Suggests canonical skill names for a partial input. Prefix matches
    /// rank above substring matches; each group is alphabetic.
    pub fn suggest(&self, partial: &str, limit: usize) -> Vec<String> {
        let partial = partial.trim().to_lowercase();
        if partial.len() < 2 {
            return Vec::new();
        }

        let tables = self.tables.read().expect("catalog lock poisoned");
        let mut seen = std::collections::HashSet::new();
        let mut starts_with = Vec::new();
        let mut contains = Vec::new();

        for (alias, key) in &tables.alias_to_canonical {
            if !alias.contains(&partial) {
                continue;
            }
            if let Some(info) = tables.canonical_info.get(key) {
                if !seen.insert(info.canonical.clone()) {
                    continue;
                }
                if alias.starts_with(&partial) {
                    starts_with.push(info.canonical.clone());
                } else {
                    contains.push(info.canonical.clone());
                }
            }
        }

        starts_with.sort();
        contains.sort();
        starts_with.extend(contains);
        starts_with.truncate(limit);
        starts_with
    }

    /// Counts normalized skills per category.
    pub fn category_stats(skills: &[SkillEntry]) -> BTreeMap<String, usize> {
        let mut stats = BTreeMap::new();
        for skill in skills {
            *stats.entry(skill.category.as_str().to_string()).or_insert(0) += 1;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_canonical_name() {
        let catalog = SkillsCatalog::builtin();
        let info = catalog.lookup("Python").unwrap();
        assert_eq!(info.canonical, "Python");
        assert_eq!(info.category, SkillCategory::Programming);
    }

    #[test]
    fn test_lookup_by_alias_case_insensitive() {
        let catalog = SkillsCatalog::builtin();
        let info = catalog.lookup("K8S").unwrap();
        assert_eq!(info.canonical, "Kubernetes");
        assert_eq!(info.category, SkillCategory::Cloud);
    }

    #[test]
    fn test_lookup_miss() {
        let catalog = SkillsCatalog::builtin();
        assert!(catalog.lookup("underwater basket weaving").is_none());
    }

    #[test]
    fn test_register_alias_for_existing_canonical() {
        let catalog = SkillsCatalog::builtin();
        catalog.register_alias("Python", "snek", SkillCategory::Programming);
        let info = catalog.lookup("snek").unwrap();
        assert_eq!(info.canonical, "Python");
        assert!(info.aliases.iter().any(|a| a == "snek"));
    }

    #[test]
    fn test_register_alias_creates_new_canonical() {
        let catalog = SkillsCatalog::builtin();
        catalog.register_alias("Terraform", "tf config", SkillCategory::Tools);
        let info = catalog.lookup("tf config").unwrap();
        assert_eq!(info.canonical, "Terraform");
        assert_eq!(info.category, SkillCategory::Tools);
        assert!(catalog.lookup("terraform").is_some());
    }

    #[test]
    fn test_register_alias_is_idempotent() {
        let catalog = SkillsCatalog::builtin();
        catalog.register_alias("Python", "snek", SkillCategory::Programming);
        catalog.register_alias("Python", "SNEK", SkillCategory::Programming);
        let info = catalog.lookup("python").unwrap();
        assert_eq!(info.aliases.iter().filter(|a| a.eq_ignore_ascii_case("snek")).count(), 1);
    }

    #[test]
    fn test_suggest_ranks_prefix_first() {
        let catalog = SkillsCatalog::builtin();
        let suggestions = catalog.suggest("java", 10);
        assert!(!suggestions.is_empty());
        // "java" is a prefix of both Java and JavaScript aliases.
        assert!(suggestions[0] == "Java" || suggestions[0] == "JavaScript");
        assert!(suggestions.contains(&"Java".to_string()));
    }

    #[test]
    fn test_suggest_short_input_returns_nothing() {
        let catalog = SkillsCatalog::builtin();
        assert!(catalog.suggest("j", 10).is_empty());
    }

    #[test]
    fn test_category_stats() {
        let skills = vec![
            SkillEntry {
                name: "Python".into(),
                canonical_name: "Python".into(),
                category: SkillCategory::Programming,
                aliases: vec![],
                confidence_score: 0.95,
            },
            SkillEntry {
                name: "Go".into(),
                canonical_name: "Go".into(),
                category: SkillCategory::Programming,
                aliases: vec![],
                confidence_score: 0.95,
            },
            SkillEntry {
                name: "Docker".into(),
                canonical_name: "Docker".into(),
                category: SkillCategory::Tools,
                aliases: vec![],
                confidence_score: 0.95,
            },
        ];
        let stats = SkillsCatalog::category_stats(&skills);
        assert_eq!(stats["programming"], 2);
        assert_eq!(stats["tools"], 1);
    }
}
