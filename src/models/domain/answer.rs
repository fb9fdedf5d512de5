use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::models::domain::question::QuestionKind;

/// A submitted or expected answer.
///
/// `Choice` belongs to single-choice and true/false questions, `Selection` to
/// multi-select questions. Serialized untagged, as a plain string or array.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Answer {
    Choice(String),
    Selection(BTreeSet<String>),
}

impl Answer {
    pub fn choice(value: impl Into<String>) -> Self {
        Answer::Choice(value.into())
    }

    pub fn selection<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Answer::Selection(values.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Choice(value) => f.write_str(value),
            Answer::Selection(values) => {
                let joined: Vec<&str> = values.iter().map(String::as_str).collect();
                f.write_str(&joined.join(", "))
            }
        }
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Grades `submitted` against `correct` for a question of the given kind.
///
/// Multi-select compares as sets; single-choice and true/false compare trimmed,
/// case-insensitive strings. A shape that does not fit the kind is incorrect.
pub fn check_answer(kind: QuestionKind, submitted: &Answer, correct: &Answer) -> bool {
    match (kind, submitted, correct) {
        (QuestionKind::MultiSelect, Answer::Selection(given), Answer::Selection(expected)) => {
            given == expected
        }
        (
            QuestionKind::SingleChoice | QuestionKind::TrueFalse,
            Answer::Choice(given),
            Answer::Choice(expected),
        ) => normalize(given) == normalize(expected),
        _ => false,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnswerRecord {
    pub question_index: usize,
    pub submitted_answer: Answer,
    pub is_correct: bool,
    pub timestamp: DateTime<Utc>,
}

/// Returned to the driving layer after each submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnswerFeedback {
    pub question_index: usize,
    pub is_correct: bool,
    pub submitted_answer: Answer,
    pub correct_answer: Answer,
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_select_ignores_order_and_duplicates() {
        let correct = Answer::selection(["A", "B", "C"]);

        assert!(check_answer(
            QuestionKind::MultiSelect,
            &Answer::selection(["C", "B", "A"]),
            &correct
        ));
        assert!(check_answer(
            QuestionKind::MultiSelect,
            &Answer::selection(["A", "B", "B", "C"]),
            &correct
        ));
        assert!(!check_answer(
            QuestionKind::MultiSelect,
            &Answer::selection(["A", "B"]),
            &correct
        ));
    }

    #[test]
    fn single_choice_is_trimmed_and_case_insensitive() {
        let correct = Answer::choice("Inhibition of HER2 signaling");

        assert!(check_answer(
            QuestionKind::SingleChoice,
            &Answer::choice("  inhibition of her2 SIGNALING "),
            &correct
        ));
        assert!(!check_answer(
            QuestionKind::SingleChoice,
            &Answer::choice("DNA intercalation"),
            &correct
        ));
    }

    #[test]
    fn mismatched_shapes_are_incorrect() {
        assert!(!check_answer(
            QuestionKind::MultiSelect,
            &Answer::choice("A"),
            &Answer::selection(["A"])
        ));
        assert!(!check_answer(
            QuestionKind::SingleChoice,
            &Answer::selection(["A"]),
            &Answer::choice("A")
        ));
    }

    #[test]
    fn answer_serializes_untagged() {
        assert_eq!(
            serde_json::to_string(&Answer::choice("True")).unwrap(),
            "\"True\""
        );
        assert_eq!(
            serde_json::to_string(&Answer::selection(["B", "A"])).unwrap(),
            "[\"A\",\"B\"]"
        );

        let parsed: Answer = serde_json::from_str("[\"x\",\"y\"]").unwrap();
        assert_eq!(parsed, Answer::selection(["y", "x"]));
    }

    #[test]
    fn answer_display_joins_selection() {
        assert_eq!(Answer::selection(["B", "A"]).to_string(), "A, B");
        assert_eq!(Answer::choice("False").to_string(), "False");
    }
}
