use std::collections::BTreeMap;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::domain::results::QuestionResult;
use crate::models::domain::{Difficulty, Grade, GroupStats, QuizSession, ResultsSummary};

// Absorbs float noise in `threshold * 100` (e.g. 0.57 * 100 = 56.99999999999999).
const PASS_TOLERANCE: f64 = 1e-9;

// Overall-score bands for the closing recommendation, independent of the pass threshold.
const TRAINING_SCORE: f64 = 70.0;
const READY_SCORE: f64 = 85.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoringConfig {
    pub pass_threshold: f64,
    pub category_cutoff: f64,
    pub difficulty_cutoff: f64,
}

impl ScoringConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            pass_threshold: config.pass_threshold,
            category_cutoff: config.category_recommendation_cutoff,
            difficulty_cutoff: config.difficulty_recommendation_cutoff,
        }
    }
}

/// Turns a completed session into a `ResultsSummary`.
pub struct ScoringService {
    config: ScoringConfig,
}

impl ScoringService {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(ScoringConfig::from_config(config))
    }

    pub fn summarize(&self, session: &QuizSession) -> AppResult<ResultsSummary> {
        if !session.is_completed() {
            return Err(AppError::InvalidState(format!(
                "Cannot score a session in state {:?}",
                session.state()
            )));
        }

        let total = session.len() as u32;
        let answered = session.answers().len() as u32;
        let correct = session.answers().values().filter(|r| r.is_correct).count() as u32;
        let score_percentage = score_percentage(correct, total);
        let passed = score_percentage >= self.config.pass_threshold * 100.0 - PASS_TOLERANCE;

        let mut category_breakdown: BTreeMap<String, GroupStats> = BTreeMap::new();
        let mut difficulty_breakdown: BTreeMap<Difficulty, GroupStats> = BTreeMap::new();
        for record in session.answers().values() {
            let Some(question) = session.question(record.question_index) else {
                continue;
            };
            category_breakdown
                .entry(question.category.clone())
                .or_default()
                .record(record.is_correct);
            difficulty_breakdown
                .entry(question.difficulty)
                .or_default()
                .record(record.is_correct);
        }

        let question_results = session
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let record = session.answer(index);
                QuestionResult {
                    question_index: index,
                    question: question.text.clone(),
                    kind: question.kind,
                    category: question.category.clone(),
                    difficulty: question.difficulty,
                    submitted_answer: record.map(|r| r.submitted_answer.clone()),
                    correct_answer: question.correct_answer.clone(),
                    is_correct: record.is_some_and(|r| r.is_correct),
                    explanation: question.explanation.clone(),
                    answered_at: record.map(|r| r.timestamp),
                }
            })
            .collect();

        let recommendations =
            self.recommendations(&category_breakdown, &difficulty_breakdown, score_percentage);

        log::info!(
            "Scored session {}: {}/{} correct ({:.1}%)",
            session.id(),
            correct,
            total,
            score_percentage
        );

        Ok(ResultsSummary {
            session_id: session.id(),
            total_questions: total,
            answered_questions: answered,
            correct_answers: correct,
            score_percentage,
            pass_threshold: self.config.pass_threshold,
            passed,
            grade: Grade::from_percentage(score_percentage),
            category_breakdown,
            difficulty_breakdown,
            question_results,
            recommendations,
            started_at: session.started_at(),
            completed_at: session.completed_at(),
        })
    }

    /// Every rule that fires, in order: weak categories, weak tiers, then one
    /// overall message. Display layers may truncate; this never does.
    pub fn recommendations(
        &self,
        categories: &BTreeMap<String, GroupStats>,
        difficulties: &BTreeMap<Difficulty, GroupStats>,
        score_percentage: f64,
    ) -> Vec<String> {
        let mut recommendations = Vec::new();

        for (category, stats) in categories {
            if stats.percentage < self.config.category_cutoff {
                recommendations.push(format!(
                    "Focus on improving {} knowledge - scored {:.1}%",
                    category, stats.percentage
                ));
            }
        }

        for (difficulty, stats) in difficulties {
            if stats.percentage < self.config.difficulty_cutoff {
                recommendations.push(format!(
                    "Work on {} level concepts - scored {:.1}%",
                    difficulty, stats.percentage
                ));
            }
        }

        let overall = if score_percentage < TRAINING_SCORE {
            "Consider additional training before project onboarding"
        } else if score_percentage < READY_SCORE {
            "Review weak areas and consider mentoring support"
        } else {
            "Excellent performance - ready for project onboarding"
        };
        recommendations.push(overall.to_string());

        recommendations
    }
}

pub fn score_percentage(correct: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(correct) * 100.0 / f64::from(total)
}
