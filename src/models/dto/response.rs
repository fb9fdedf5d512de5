use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::domain::{Difficulty, GroupStats, QuizContext, ResultsSummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizInfoDto {
    pub project_name: String,
    pub client_name: String,
    pub therapy_area: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<DateTime<Utc>>,
    pub experience_level: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceDto {
    pub total_questions: u32,
    pub correct_answers: u32,
    pub score_percentage: f64, // rounded to one decimal
    pub grade: String,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownDto {
    pub categories: BTreeMap<String, GroupStats>,
    pub difficulties: BTreeMap<Difficulty, GroupStats>,
}

/// Condensed, presentation-ready view of a results summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsExport {
    pub quiz_info: QuizInfoDto,
    pub performance: PerformanceDto,
    pub breakdown: BreakdownDto,
    pub recommendations: Vec<String>,
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl ResultsExport {
    pub fn new(summary: &ResultsSummary, context: &QuizContext) -> Self {
        ResultsExport {
            quiz_info: QuizInfoDto {
                project_name: context.project_name.clone(),
                client_name: context.client_name.clone(),
                therapy_area: context.therapy_area.clone(),
                completion_time: summary.completed_at,
                experience_level: context.experience_level,
            },
            performance: PerformanceDto {
                total_questions: summary.total_questions,
                correct_answers: summary.correct_answers,
                score_percentage: round_one_decimal(summary.score_percentage),
                grade: summary.grade.to_string(),
                passed: summary.passed,
            },
            breakdown: BreakdownDto {
                categories: summary.category_breakdown.clone(),
                difficulties: summary.difficulty_breakdown.clone(),
            },
            recommendations: summary.recommendations.clone(),
        }
    }
}
