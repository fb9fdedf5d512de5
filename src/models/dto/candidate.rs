use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Correct answer as a generator writes it: one option or a list of options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum CandidateAnswerDto {
    One(String),
    Many(Vec<String>),
}

/// Shape requested from the question generator.
///
/// Only used to describe the expected payload (and to build fixtures); incoming
/// payloads are read leniently as raw JSON by the question validator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct QuestionCandidateDto {
    /// The question prompt.
    pub question: String,
    /// One of `multiple_choice`, `multiple_select` or `true_false`.
    #[serde(rename = "type")]
    pub question_type: String,
    /// Answer options; `["True", "False"]` for true/false questions.
    pub options: Vec<String>,
    /// A single option, or a list of options for `multiple_select`.
    pub correct_answer: CandidateAnswerDto,
    /// Why the correct answer is correct.
    pub explanation: String,
    /// One of `fundamental`, `intermediate` or `advanced`.
    pub difficulty: String,
    /// Topic label such as "Regulatory & Market Access".
    pub category: String,
}

/// JSON schema of the candidate array, embedded in generation prompts.
pub fn candidate_array_schema() -> String {
    let schema = schemars::schema_for!(Vec<QuestionCandidateDto>);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_serializes_type_field() {
        let candidate = QuestionCandidateDto {
            question: "Which agency approves drugs in the US?".to_string(),
            question_type: "multiple_choice".to_string(),
            options: vec!["FDA".to_string(), "EMA".to_string()],
            correct_answer: CandidateAnswerDto::One("FDA".to_string()),
            explanation: "The FDA regulates US approvals.".to_string(),
            difficulty: "fundamental".to_string(),
            category: "Regulatory & Market Access".to_string(),
        };

        let value = serde_json::to_value(&candidate).unwrap();
        assert_eq!(value["type"], "multiple_choice");
        assert_eq!(value["correct_answer"], "FDA");
    }

    #[test]
    fn many_answers_serialize_as_array() {
        let answer = CandidateAnswerDto::Many(vec!["A".to_string(), "B".to_string()]);
        assert_eq!(serde_json::to_string(&answer).unwrap(), "[\"A\",\"B\"]");
    }

    #[test]
    fn schema_mentions_candidate_fields() {
        let schema = candidate_array_schema();
        for field in ["question", "type", "options", "correct_answer", "category"] {
            assert!(schema.contains(field), "schema is missing {}", field);
        }
    }
}
