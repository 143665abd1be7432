//! Tag taxonomy for PromptMD tools.
//!
//! Tools are classified along four independent category axes: clinical
//! specialty, use case, user type, and AI app/model. Each category holds an
//! ordered list of free-text tags with a curated built-in vocabulary.
//!
//! Tags are compared by normalized form (lowercase, collapsed whitespace)
//! but displayed in their canonical casing. A category bucket never holds
//! two tags with the same normalized form.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// TAG CATEGORIES
// =============================================================================

/// The four independent classification axes for a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagCategory {
    /// Clinical specialty (e.g. "Cardiology", "Emergency Medicine").
    Specialty,
    /// Clinical use case (e.g. "Triage", "Patient Education").
    UseCase,
    /// Intended user (e.g. "physician", "nurse").
    UserType,
    /// Target AI application or model (e.g. "Claude", "ChatGPT").
    AppModel,
}

impl TagCategory {
    /// All categories, in display order.
    pub const ALL: [TagCategory; 4] = [
        TagCategory::Specialty,
        TagCategory::UseCase,
        TagCategory::UserType,
        TagCategory::AppModel,
    ];
}

impl std::fmt::Display for TagCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Specialty => write!(f, "specialty"),
            Self::UseCase => write!(f, "use_case"),
            Self::UserType => write!(f, "user_type"),
            Self::AppModel => write!(f, "app_model"),
        }
    }
}

impl std::str::FromStr for TagCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "specialty" => Ok(Self::Specialty),
            "use_case" | "usecase" => Ok(Self::UseCase),
            "user_type" | "usertype" => Ok(Self::UserType),
            "app_model" | "appmodel" => Ok(Self::AppModel),
            _ => Err(format!("Invalid tag category: {}", s)),
        }
    }
}

// =============================================================================
// BUILT-IN VOCABULARY
// =============================================================================

/// Curated clinical specialty tags.
pub const SPECIALTY_TAGS: &[&str] = &[
    "Allergy & Immunology",
    "Cardiology",
    "Dermatology",
    "Emergency Medicine",
    "Endocrinology",
    "Gastroenterology",
    "Geriatrics",
    "Hematology/Oncology",
    "Hospitalist Medicine",
    "Infectious Diseases",
    "Internal Medicine",
    "Nephrology",
    "Neurology",
    "OB/GYN",
    "Ophthalmology",
    "Orthopedics",
    "Otolaryngology (ENT)",
    "Pediatrics",
    "Physical Medicine & Rehab",
    "Psychiatry",
    "Pulmonology/Critical Care",
    "Primary Care",
    "Radiology",
    "Rheumatology",
    "Surgery",
];

/// Curated use-case tags.
pub const USE_CASE_TAGS: &[&str] = &[
    "Patient Education",
    "Clinical Documentation",
    "Decision Support",
    "Workflow Automation",
    "Triage",
    "Medication Management",
    "Discharge Planning",
    "Quality & Safety Monitoring",
    "Population Health Analytics",
    "Care Coordination",
    "Billing & Coding Assistance",
    "Consultation",
    "Referral",
    "Assessment",
];

/// Curated user-type tags.
pub const USER_TYPE_TAGS: &[&str] = &["physician", "nurse", "resident", "student", "admin"];

/// Curated app/model tags.
pub const APP_MODEL_TAGS: &[&str] = &[
    "ChatGPT",
    "Claude",
    "Gemini",
    "LLaMA",
    "Med-PaLM",
    "Perplexity",
    "Doximity GPT",
    "OpenEvidence",
    "Mistral",
];

/// Built-in vocabulary for a category, in display order.
pub fn vocabulary(category: TagCategory) -> &'static [&'static str] {
    match category {
        TagCategory::Specialty => SPECIALTY_TAGS,
        TagCategory::UseCase => USE_CASE_TAGS,
        TagCategory::UserType => USER_TYPE_TAGS,
        TagCategory::AppModel => APP_MODEL_TAGS,
    }
}

/// Normalized tag → (category, canonical display form) for the whole
/// built-in vocabulary. Categories are indexed in `TagCategory::ALL` order,
/// so on a (theoretical) normalized collision the earlier category wins.
static VOCABULARY_INDEX: Lazy<HashMap<String, (TagCategory, &'static str)>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for category in TagCategory::ALL {
        for tag in vocabulary(category) {
            index.entry(normalize(tag)).or_insert((category, *tag));
        }
    }
    index
});

// =============================================================================
// NORMALIZATION & CATEGORIZATION
// =============================================================================

/// Normalize a tag for comparison: lowercase, trim, collapse inner whitespace.
pub fn normalize(tag: &str) -> String {
    tag.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Resolve a free-text tag to its category and canonical display form.
///
/// Lookup is by normalized form across the built-in vocabulary. Unknown tags
/// fall back to [`TagCategory::UseCase`] with the input preserved verbatim.
pub fn categorize(tag: &str) -> (TagCategory, String) {
    match VOCABULARY_INDEX.get(&normalize(tag)) {
        Some((category, canonical)) => (*category, (*canonical).to_string()),
        None => (TagCategory::UseCase, tag.to_string()),
    }
}

// =============================================================================
// TOOL TAGS
// =============================================================================

/// Per-category tag buckets for a tool.
///
/// Display order is preserved within each bucket; duplicates (by normalized
/// form) are rejected on insert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolTags {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specialty: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub use_case: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_type: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub app_model: Vec<String>,
}

impl ToolTags {
    /// Create empty tag buckets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build buckets from uncategorized free-text tags, resolving each
    /// against the built-in vocabulary.
    pub fn categorized<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Self::new();
        for tag in tags {
            let (category, canonical) = categorize(tag.as_ref());
            out.insert(category, canonical);
        }
        out
    }

    /// The bucket for a category.
    pub fn bucket(&self, category: TagCategory) -> &[String] {
        match category {
            TagCategory::Specialty => &self.specialty,
            TagCategory::UseCase => &self.use_case,
            TagCategory::UserType => &self.user_type,
            TagCategory::AppModel => &self.app_model,
        }
    }

    fn bucket_mut(&mut self, category: TagCategory) -> &mut Vec<String> {
        match category {
            TagCategory::Specialty => &mut self.specialty,
            TagCategory::UseCase => &mut self.use_case,
            TagCategory::UserType => &mut self.user_type,
            TagCategory::AppModel => &mut self.app_model,
        }
    }

    /// Insert a tag into a category bucket.
    ///
    /// Returns false without modification when the bucket already holds a
    /// tag with the same normalized form.
    pub fn insert(&mut self, category: TagCategory, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        let normalized = normalize(&tag);
        let bucket = self.bucket_mut(category);
        if bucket.iter().any(|t| normalize(t) == normalized) {
            return false;
        }
        bucket.push(tag);
        true
    }

    /// Whether a category bucket contains a tag (normalized comparison).
    pub fn contains(&self, category: TagCategory, tag: &str) -> bool {
        let normalized = normalize(tag);
        self.bucket(category).iter().any(|t| normalize(t) == normalized)
    }

    /// Whether a category bucket contains every tag in `tags`.
    ///
    /// Vacuously true for an empty slice.
    pub fn contains_all<S: AsRef<str>>(&self, category: TagCategory, tags: &[S]) -> bool {
        tags.iter().all(|t| self.contains(category, t.as_ref()))
    }

    /// Total tag count across all categories.
    pub fn len(&self) -> usize {
        TagCategory::ALL
            .iter()
            .map(|c| self.bucket(*c).len())
            .sum()
    }

    /// Whether all four buckets are empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Re-deduplicate every bucket in place, keeping first occurrences.
    ///
    /// Used when a partial update replaces a bucket wholesale and the caller
    /// cannot be trusted to have deduped.
    pub fn dedup(&mut self) {
        for category in TagCategory::ALL {
            let bucket = self.bucket_mut(category);
            let mut seen = Vec::with_capacity(bucket.len());
            bucket.retain(|tag| {
                let normalized = normalize(tag);
                if seen.contains(&normalized) {
                    false
                } else {
                    seen.push(normalized);
                    true
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace_and_case() {
        assert_eq!(normalize("  Emergency   Medicine "), "emergency medicine");
        assert_eq!(normalize("OB/GYN"), "ob/gyn");
    }

    #[test]
    fn test_categorize_known_specialty() {
        let (category, canonical) = categorize("cardiology");
        assert_eq!(category, TagCategory::Specialty);
        assert_eq!(canonical, "Cardiology");
    }

    #[test]
    fn test_categorize_known_app_model_case_insensitive() {
        let (category, canonical) = categorize("CHATGPT");
        assert_eq!(category, TagCategory::AppModel);
        assert_eq!(canonical, "ChatGPT");
    }

    #[test]
    fn test_categorize_unknown_defaults_to_use_case() {
        let (category, tag) = categorize("Wound Care Rounds");
        assert_eq!(category, TagCategory::UseCase);
        assert_eq!(tag, "Wound Care Rounds");
    }

    #[test]
    fn test_insert_rejects_normalized_duplicate() {
        let mut tags = ToolTags::new();
        assert!(tags.insert(TagCategory::Specialty, "Cardiology"));
        assert!(!tags.insert(TagCategory::Specialty, "cardiology"));
        assert_eq!(tags.specialty, vec!["Cardiology"]);
    }

    #[test]
    fn test_insert_same_tag_different_categories() {
        let mut tags = ToolTags::new();
        assert!(tags.insert(TagCategory::Specialty, "Triage"));
        assert!(tags.insert(TagCategory::UseCase, "Triage"));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_contains_all_and_semantics() {
        let mut tags = ToolTags::new();
        tags.insert(TagCategory::Specialty, "Cardiology");
        tags.insert(TagCategory::Specialty, "Dermatology");

        assert!(tags.contains_all(TagCategory::Specialty, &["Cardiology"]));
        assert!(tags.contains_all(TagCategory::Specialty, &["Cardiology", "Dermatology"]));
        assert!(!tags.contains_all(TagCategory::Specialty, &["Cardiology", "Surgery"]));
        assert!(tags.contains_all::<&str>(TagCategory::UserType, &[]));
    }

    #[test]
    fn test_categorized_builder_routes_tags() {
        let tags = ToolTags::categorized(["cardiology", "triage", "nurse", "claude", "mystery"]);
        assert_eq!(tags.specialty, vec!["Cardiology"]);
        assert_eq!(tags.use_case, vec!["Triage", "mystery"]);
        assert_eq!(tags.user_type, vec!["nurse"]);
        assert_eq!(tags.app_model, vec!["Claude"]);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let mut tags = ToolTags {
            specialty: vec![
                "Cardiology".to_string(),
                "cardiology".to_string(),
                "Surgery".to_string(),
            ],
            ..Default::default()
        };
        tags.dedup();
        assert_eq!(tags.specialty, vec!["Cardiology", "Surgery"]);
    }

    #[test]
    fn test_category_display_round_trip() {
        for category in TagCategory::ALL {
            let parsed: TagCategory = category.to_string().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_vocabulary_non_empty() {
        for category in TagCategory::ALL {
            assert!(!vocabulary(category).is_empty());
        }
    }
}
