use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use crate::models::domain::answer::Answer;
use crate::models::domain::question::{Difficulty, QuestionKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    C,
    #[serde(rename = "C-")]
    CMinus,
    D,
    F,
}

// Lower bounds, highest first. A score exactly on a bound earns that grade.
const GRADE_LADDER: [(f64, Grade); 10] = [
    (95.0, Grade::APlus),
    (90.0, Grade::A),
    (85.0, Grade::AMinus),
    (80.0, Grade::BPlus),
    (75.0, Grade::B),
    (70.0, Grade::BMinus),
    (65.0, Grade::CPlus),
    (60.0, Grade::C),
    (55.0, Grade::CMinus),
    (50.0, Grade::D),
];

impl Grade {
    pub fn from_percentage(score: f64) -> Self {
        GRADE_LADDER
            .iter()
            .find(|(bound, _)| score >= *bound)
            .map(|(_, grade)| *grade)
            .unwrap_or(Grade::F)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default, Deserialize, Serialize)]
pub struct GroupStats {
    pub total: u32,
    pub correct: u32,
    pub percentage: f64,
}

impl GroupStats {
    pub fn record(&mut self, is_correct: bool) {
        self.total += 1;
        if is_correct {
            self.correct += 1;
        }
        self.percentage = f64::from(self.correct) * 100.0 / f64::from(self.total);
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuestionResult {
    pub question_index: usize,
    pub question: String,
    pub kind: QuestionKind,
    pub category: String,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_answer: Option<Answer>,
    pub correct_answer: Answer,
    pub is_correct: bool,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answered_at: Option<DateTime<Utc>>,
}

/// Final figures for a completed session. Derived on demand, never mutated.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ResultsSummary {
    pub session_id: Uuid,
    pub total_questions: u32,
    pub answered_questions: u32,
    pub correct_answers: u32,
    pub score_percentage: f64,
    pub pass_threshold: f64,
    pub passed: bool,
    pub grade: Grade,
    pub category_breakdown: BTreeMap<String, GroupStats>,
    pub difficulty_breakdown: BTreeMap<Difficulty, GroupStats>,
    pub question_results: Vec<QuestionResult>,
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_ladder_boundaries_round_up() {
        let cases = [
            (100.0, Grade::APlus),
            (95.0, Grade::APlus),
            (94.9, Grade::A),
            (90.0, Grade::A),
            (89.99, Grade::AMinus),
            (85.0, Grade::AMinus),
            (80.0, Grade::BPlus),
            (75.0, Grade::B),
            (70.0, Grade::BMinus),
            (65.0, Grade::CPlus),
            (60.0, Grade::C),
            (55.0, Grade::CMinus),
            (50.0, Grade::D),
            (49.9, Grade::F),
            (0.0, Grade::F),
        ];
        for (score, expected) in cases {
            assert_eq!(Grade::from_percentage(score), expected, "score {}", score);
        }
    }

    #[test]
    fn grade_is_monotonic_in_score() {
        let mut previous = Grade::from_percentage(0.0);
        for tenths in 0..=1000 {
            let grade = Grade::from_percentage(f64::from(tenths) / 10.0);
            // Better grades sort first.
            assert!(grade <= previous);
            previous = grade;
        }
    }

    #[test]
    fn grade_serializes_as_letter() {
        assert_eq!(serde_json::to_string(&Grade::BMinus).unwrap(), "\"B-\"");
        assert_eq!(Grade::APlus.to_string(), "A+");
    }

    #[test]
    fn group_stats_tracks_percentage() {
        let mut stats = GroupStats::default();
        stats.record(true);
        stats.record(false);
        stats.record(true);
        stats.record(true);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.correct, 3);
        assert_eq!(stats.percentage, 75.0);
    }
}
