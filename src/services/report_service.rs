use std::fmt::Write as _;

use crate::errors::{AppError, AppResult};
use crate::models::domain::{Difficulty, GroupStats, QuizContext, ResultsSummary};
use crate::models::dto::response::ResultsExport;

const REPORT_TITLE: &str = "Pharmaceutical Therapy Area Knowledge Quiz";

/// Formats final results into a downloadable document.
pub trait ReportRenderer: Send + Sync {
    fn file_extension(&self) -> &'static str;

    fn render(&self, summary: &ResultsSummary, context: &QuizContext) -> AppResult<Vec<u8>>;
}

/// Pretty-printed `ResultsExport`.
pub struct JsonReportRenderer;

impl ReportRenderer for JsonReportRenderer {
    fn file_extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, summary: &ResultsSummary, context: &QuizContext) -> AppResult<Vec<u8>> {
        let export = ResultsExport::new(summary, context);
        Ok(serde_json::to_vec_pretty(&export)?)
    }
}

/// Plain-text assessment report.
pub struct TextReportRenderer;

impl TextReportRenderer {
    fn write_report(
        &self,
        out: &mut String,
        summary: &ResultsSummary,
        context: &QuizContext,
    ) -> std::fmt::Result {
        writeln!(out, "{}", REPORT_TITLE)?;
        writeln!(out, "Assessment Report")?;
        writeln!(out)?;

        writeln!(out, "Project Information")?;
        writeln!(out, "Project: {}", or_na(&context.project_name))?;
        writeln!(out, "Client: {}", or_na(&context.client_name))?;
        writeln!(out, "Therapy Area: {}", or_na(&context.therapy_area))?;
        writeln!(out, "Indication: {}", or_na(&context.indication))?;
        writeln!(out, "Project Type: {}", or_na(&context.project_type))?;
        if let Some(completed_at) = summary.completed_at {
            writeln!(out, "Completion Date: {}", completed_at.format("%Y-%m-%d %H:%M"))?;
        }
        writeln!(out)?;

        writeln!(out, "Executive Summary")?;
        writeln!(
            out,
            "Overall Score: {:.1}% (Grade: {})",
            summary.score_percentage, summary.grade
        )?;
        let status = if summary.passed {
            "PASSED"
        } else {
            "NEEDS IMPROVEMENT"
        };
        writeln!(out, "Status: {}", status)?;
        writeln!(
            out,
            "Questions Answered: {}/{}",
            summary.answered_questions, summary.total_questions
        )?;
        writeln!(out, "Correct Answers: {}", summary.correct_answers)?;
        writeln!(out, "Experience Level: Level {}", context.experience_level)?;
        writeln!(out)?;

        writeln!(out, "Performance Breakdown")?;
        if !summary.category_breakdown.is_empty() {
            writeln!(out, "By Knowledge Category:")?;
            for (category, stats) in &summary.category_breakdown {
                write_group(out, category, stats)?;
            }
        }
        if !summary.difficulty_breakdown.is_empty() {
            writeln!(out, "By Question Difficulty:")?;
            for (difficulty, stats) in &summary.difficulty_breakdown {
                write_group(out, title_case(*difficulty), stats)?;
            }
        }
        writeln!(out)?;

        if !summary.recommendations.is_empty() {
            writeln!(out, "Recommendations")?;
            for (i, recommendation) in summary.recommendations.iter().enumerate() {
                writeln!(out, "{}. {}", i + 1, recommendation)?;
            }
            writeln!(out)?;
        }

        if !summary.question_results.is_empty() {
            writeln!(out, "Question Details")?;
            for result in &summary.question_results {
                let status = if result.is_correct {
                    "CORRECT"
                } else {
                    "INCORRECT"
                };
                writeln!(out, "Question {}: {}", result.question_index + 1, status)?;
                writeln!(out, "Q: {}", result.question)?;
                match &result.submitted_answer {
                    Some(answer) => writeln!(out, "Your Answer: {}", answer)?,
                    None => writeln!(out, "Your Answer: (not answered)")?,
                }
                writeln!(out, "Correct Answer: {}", result.correct_answer)?;
                writeln!(
                    out,
                    "Category: {} | Difficulty: {}",
                    result.category,
                    title_case(result.difficulty)
                )?;
                writeln!(out)?;
            }
        }

        writeln!(out, "{} Module", REPORT_TITLE)
    }
}

impl ReportRenderer for TextReportRenderer {
    fn file_extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, summary: &ResultsSummary, context: &QuizContext) -> AppResult<Vec<u8>> {
        let mut out = String::new();
        self.write_report(&mut out, summary, context)
            .map_err(|e| AppError::StorageError(format!("Failed to render report: {}", e)))?;
        Ok(out.into_bytes())
    }
}

fn write_group(out: &mut String, label: &str, stats: &GroupStats) -> std::fmt::Result {
    writeln!(
        out,
        "  {}: {:.1}% ({}/{})",
        label, stats.percentage, stats.correct, stats.total
    )
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}

fn title_case(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Fundamental => "Fundamental",
        Difficulty::Intermediate => "Intermediate",
        Difficulty::Advanced => "Advanced",
    }
}
