use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::domain::answer::{check_answer, Answer};

pub const DEFAULT_CATEGORY: &str = "Therapy Area Knowledge";
pub const DEFAULT_EXPLANATION: &str = "No explanation provided.";
pub const TRUE_FALSE_OPTIONS: [&str; 2] = ["True", "False"];
pub const PLACEHOLDER_OPTIONS: [&str; 4] = ["Option A", "Option B", "Option C", "Option D"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Fundamental,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Fundamental,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fundamental" => Some(Difficulty::Fundamental),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Fundamental => "fundamental",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    /// What a question of this tier is expected to probe.
    pub fn description(&self) -> &'static str {
        match self {
            Difficulty::Fundamental => "basic concepts, definitions, and general industry knowledge",
            Difficulty::Intermediate => {
                "practical application, analysis, and methodology understanding"
            }
            Difficulty::Advanced => {
                "complex scenarios, strategic thinking, and expert-level insights"
            }
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    SingleChoice, // exactly one option is correct
    MultiSelect,  // a non-empty set of options is correct
    TrueFalse,
}

impl QuestionKind {
    /// Accepts the canonical names plus the aliases generators commonly emit.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "single_choice" | "multiple_choice" => Some(QuestionKind::SingleChoice),
            "multi_select" | "multiple_select" => Some(QuestionKind::MultiSelect),
            "true_false" => Some(QuestionKind::TrueFalse),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::SingleChoice => "single_choice",
            QuestionKind::MultiSelect => "multi_select",
            QuestionKind::TrueFalse => "true_false",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated, immutable quiz item.
///
/// Built by the question validator; `correct_answer` is always drawn from `options`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub text: String,
    pub kind: QuestionKind,
    pub options: Vec<String>,
    pub correct_answer: Answer,
    pub explanation: String,
    pub category: String,
    pub difficulty: Difficulty,
}

impl Question {
    pub fn is_correct(&self, submitted: &Answer) -> bool {
        check_answer(self.kind, submitted, &self.correct_answer)
    }
}
