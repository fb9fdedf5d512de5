use serde::{Deserialize, Serialize};
use validator::Validate;

pub const MIN_EXPERIENCE_LEVEL: u8 = 1;
pub const MAX_EXPERIENCE_LEVEL: u8 = 7;

const EXPERIENCE_LEVELS: [&str; 7] = [
    "Completely new to project & therapy area",
    "Limited knowledge - familiar with basic therapy area concepts",
    "Some knowledge but need development for project specifics",
    "Moderate understanding with limited client/project exposure",
    "Good working knowledge with some client familiarity",
    "Advanced knowledge - subject matter expert level",
    "Expert level - internal SME with extensive client/project experience",
];

/// Returns the description for an experience level, or `None` outside 1..=7.
pub fn experience_description(level: u8) -> Option<&'static str> {
    if (MIN_EXPERIENCE_LEVEL..=MAX_EXPERIENCE_LEVEL).contains(&level) {
        EXPERIENCE_LEVELS.get(usize::from(level - 1)).copied()
    } else {
        None
    }
}

/// Project and consultant details a quiz is generated for.
#[derive(Clone, Debug, PartialEq, Eq, Default, Deserialize, Serialize, Validate)]
pub struct QuizContext {
    #[validate(length(max = 200))]
    pub project_name: String,

    #[validate(length(max = 200))]
    pub client_name: String,

    #[validate(length(min = 1, max = 200))]
    pub therapy_area: String,

    #[validate(length(min = 1, max = 200))]
    pub indication: String,

    #[validate(length(min = 1, max = 100))]
    pub project_type: String,

    pub client_scenario: String,

    #[validate(range(min = 1, max = 7))]
    pub experience_level: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_therapy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_name: Option<String>,

    /// Identifiers of supporting documents (file paths for the file-backed source).
    #[serde(default)]
    pub documents: Vec<String>,
}

impl QuizContext {
    /// Extra context lines for prompts; blank optional fields are skipped.
    pub fn additional_context(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let fields = [
            ("Additional therapy area", &self.additional_therapy),
            ("Brand name(s)", &self.brand_name),
            ("Generic name(s)", &self.generic_name),
        ];
        for (label, value) in fields {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                lines.push(format!("{}: {}", label, value));
            }
        }
        lines
    }
}
