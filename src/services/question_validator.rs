use serde_json::Value;
use std::collections::BTreeSet;
use thiserror::Error;

use crate::models::domain::question::{
    DEFAULT_CATEGORY, DEFAULT_EXPLANATION, PLACEHOLDER_OPTIONS, TRUE_FALSE_OPTIONS,
};
use crate::models::domain::{Answer, Difficulty, Question, QuestionKind};

/// Why a candidate was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DropReason {
    #[error("candidate is not a JSON object")]
    NotAnObject,
    #[error("missing question text")]
    MissingText,
    #[error("missing correct_answer and options")]
    MissingCorrectAnswer,
    #[error("unrecognised question type '{0}'")]
    UnknownKind(String),
    #[error("options are not a list of strings")]
    MalformedOptions,
    #[error("fewer than two distinct options")]
    TooFewOptions,
    #[error("correct_answer is not drawn from options")]
    AnswerNotInOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedCandidate {
    pub index: usize,
    pub reason: DropReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub questions: Vec<Question>,
    pub dropped: Vec<DroppedCandidate>,
}

/// Turns loosely structured generator output into `Question`s.
///
/// Each candidate is judged on its own; bad ones are logged and skipped, never
/// fatal. Deciding whether too few survived is left to the caller.
#[derive(Debug, Clone, Copy)]
pub struct QuestionValidator {
    default_difficulty: Difficulty,
}

impl Default for QuestionValidator {
    fn default() -> Self {
        Self {
            default_difficulty: Difficulty::Intermediate,
        }
    }
}

impl QuestionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tier assigned when a candidate has no (or an unknown) difficulty.
    pub fn with_default_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.default_difficulty = difficulty;
        self
    }

    pub fn validate(&self, candidates: &[Value]) -> Vec<Question> {
        self.validate_with_report(candidates).questions
    }

    pub fn validate_with_report(&self, candidates: &[Value]) -> ValidationReport {
        let mut report = ValidationReport::default();
        for (index, candidate) in candidates.iter().enumerate() {
            match self.validate_candidate(candidate) {
                Ok(question) => report.questions.push(question),
                Err(reason) => {
                    log::warn!("Question {} dropped: {}", index + 1, reason);
                    report.dropped.push(DroppedCandidate { index, reason });
                }
            }
        }
        log::info!(
            "Validated {} of {} candidate questions",
            report.questions.len(),
            candidates.len()
        );
        report
    }

    pub fn validate_candidate(&self, candidate: &Value) -> Result<Question, DropReason> {
        let fields = candidate.as_object().ok_or(DropReason::NotAnObject)?;
        let present = |key: &str| fields.get(key).filter(|v| !v.is_null());

        let text = present("question")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(DropReason::MissingText)?
            .to_string();

        let kind_name = match present("type") {
            None => QuestionKind::SingleChoice.as_str().to_string(),
            Some(Value::String(name)) => name.clone(),
            Some(other) => other.to_string(),
        };

        let raw_options = present("options");
        let raw_answer = match present("correct_answer") {
            Some(answer) => answer.clone(),
            None => raw_options
                .and_then(Value::as_array)
                .and_then(|options| options.first())
                .cloned()
                .ok_or(DropReason::MissingCorrectAnswer)?,
        };

        let kind = QuestionKind::parse(&kind_name).ok_or(DropReason::UnknownKind(kind_name))?;

        let options = match raw_options {
            None => default_options(kind),
            Some(value) => parse_options(value)?,
        };
        let options = if kind == QuestionKind::TrueFalse {
            TRUE_FALSE_OPTIONS.iter().map(|o| o.to_string()).collect()
        } else {
            options
        };
        if options.len() < 2 {
            return Err(DropReason::TooFewOptions);
        }

        let correct_answer = resolve_answer(kind, &raw_answer, &options)?;

        let explanation = present("explanation")
            .and_then(Value::as_str)
            .map(|e| e.trim().to_string())
            .unwrap_or_else(|| DEFAULT_EXPLANATION.to_string());
        let difficulty = present("difficulty")
            .and_then(Value::as_str)
            .and_then(Difficulty::parse)
            .unwrap_or(self.default_difficulty);
        let category = present("category")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
            .to_string();

        Ok(Question {
            text,
            kind,
            options,
            correct_answer,
            explanation,
            category,
            difficulty,
        })
    }
}

fn default_options(kind: QuestionKind) -> Vec<String> {
    let defaults: &[&str] = match kind {
        QuestionKind::TrueFalse => &TRUE_FALSE_OPTIONS,
        _ => &PLACEHOLDER_OPTIONS,
    };
    defaults.iter().map(|o| o.to_string()).collect()
}

/// Reads an ordered list of strings, keeping the first of any duplicates.
fn parse_options(value: &Value) -> Result<Vec<String>, DropReason> {
    let items = value.as_array().ok_or(DropReason::MalformedOptions)?;
    let mut options: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let option = item.as_str().ok_or(DropReason::MalformedOptions)?.trim();
        if !option.is_empty() && !options.iter().any(|o| o == option) {
            options.push(option.to_string());
        }
    }
    Ok(options)
}

/// Maps a raw answer onto the option with the same trimmed, case-folded text.
fn match_option(raw: &str, options: &[String]) -> Result<String, DropReason> {
    let needle = raw.trim().to_lowercase();
    options
        .iter()
        .find(|option| option.to_lowercase() == needle)
        .cloned()
        .ok_or(DropReason::AnswerNotInOptions)
}

fn resolve_answer(
    kind: QuestionKind,
    raw: &Value,
    options: &[String],
) -> Result<Answer, DropReason> {
    match kind {
        QuestionKind::MultiSelect => {
            let raw_values: Vec<&str> = match raw {
                Value::String(single) => vec![single.as_str()],
                Value::Array(items) => items
                    .iter()
                    .map(|item| item.as_str().ok_or(DropReason::AnswerNotInOptions))
                    .collect::<Result<_, _>>()?,
                _ => return Err(DropReason::AnswerNotInOptions),
            };
            let selection = raw_values
                .into_iter()
                .map(|value| match_option(value, options))
                .collect::<Result<BTreeSet<_>, _>>()?;
            if selection.is_empty() {
                return Err(DropReason::AnswerNotInOptions);
            }
            Ok(Answer::Selection(selection))
        }
        QuestionKind::SingleChoice | QuestionKind::TrueFalse => {
            let value = match raw {
                Value::String(single) => single.clone(),
                Value::Bool(flag) if kind == QuestionKind::TrueFalse => {
                    (if *flag { "True" } else { "False" }).to_string()
                }
                Value::Array(items) if items.len() == 1 => items[0]
                    .as_str()
                    .ok_or(DropReason::AnswerNotInOptions)?
                    .to_string(),
                _ => return Err(DropReason::AnswerNotInOptions),
            };
            Ok(Answer::Choice(match_option(&value, options)?))
        }
    }
}
