use serde::Serialize;

use crate::models::domain::{
    Answer, AnswerFeedback, Difficulty, Question, QuestionKind, QuizContext, ResultsSummary,
};

const STRENGTH_CUTOFF: f64 = 80.0;
const IMPROVEMENT_CUTOFF: f64 = 60.0;
const MAX_STUDY_RECOMMENDATIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionAnalysis {
    pub option: String,
    pub is_correct: bool,
    pub reason: String,
}

/// Answer feedback enriched with learning guidance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailedFeedback {
    #[serde(flatten)]
    pub feedback: AnswerFeedback,
    pub category: String,
    pub difficulty: Difficulty,
    pub learning_points: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub option_analysis: Vec<OptionAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryInsight {
    pub category: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceInsights {
    pub overall_score: f64,
    pub strengths: Vec<CategoryInsight>,
    pub areas_for_improvement: Vec<CategoryInsight>,
}

pub struct FeedbackService;

impl FeedbackService {
    pub fn detailed_feedback(question: &Question, feedback: AnswerFeedback) -> DetailedFeedback {
        let learning_points = Self::learning_points(question, feedback.is_correct);
        let option_analysis = Self::option_analysis(question);
        DetailedFeedback {
            feedback,
            category: question.category.clone(),
            difficulty: question.difficulty,
            learning_points,
            option_analysis,
        }
    }

    pub fn learning_points(question: &Question, is_correct: bool) -> Vec<String> {
        let mut points = Vec::new();

        let category = question.category.to_lowercase();
        let topic_point = if category.contains("therapy area") {
            Some("Focus on understanding the specific therapeutic mechanisms and pathways")
        } else if category.contains("competitive") {
            Some("Review current market landscape and competitor positioning")
        } else if category.contains("regulatory") {
            Some("Study regulatory requirements and market access considerations")
        } else if category.contains("methodology") {
            Some("Practice pharmaceutical research methodologies and best practices")
        } else {
            None
        };
        points.extend(topic_point.map(String::from));

        if !is_correct {
            match question.difficulty {
                Difficulty::Fundamental => {
                    points.push("Review basic concepts in this therapy area".to_string())
                }
                Difficulty::Advanced => points
                    .push("Consider advanced training or mentoring in this topic".to_string()),
                Difficulty::Intermediate => {}
            }
        }

        points
    }

    /// Marks each option of a single-choice question as correct or not.
    pub fn option_analysis(question: &Question) -> Vec<OptionAnalysis> {
        if question.kind != QuestionKind::SingleChoice {
            return Vec::new();
        }
        question
            .options
            .iter()
            .map(|option| {
                let is_correct = question.is_correct(&Answer::choice(option));
                let reason = if is_correct {
                    "This is the correct answer based on current pharmaceutical standards and practices."
                } else {
                    "This option does not align with established guidelines or best practices."
                };
                OptionAnalysis {
                    option: option.clone(),
                    is_correct,
                    reason: reason.to_string(),
                }
            })
            .collect()
    }

    pub fn format_feedback_text(detailed: &DetailedFeedback) -> String {
        let mut parts = Vec::new();
        if detailed.feedback.is_correct {
            parts.push("Correct answer!".to_string());
        } else {
            parts.push("Incorrect answer".to_string());
            parts.push(format!("Correct answer: {}", detailed.feedback.correct_answer));
        }
        if !detailed.feedback.explanation.is_empty() {
            parts.push(format!("\nExplanation:\n{}", detailed.feedback.explanation));
        }
        if !detailed.learning_points.is_empty() {
            parts.push("\nKey Learning Points:".to_string());
            parts.extend(detailed.learning_points.iter().map(|p| format!("- {}", p)));
        }
        parts.join("\n")
    }

    pub fn performance_insights(summary: &ResultsSummary) -> PerformanceInsights {
        let mut strengths = Vec::new();
        let mut areas_for_improvement = Vec::new();
        for (category, stats) in &summary.category_breakdown {
            let insight = CategoryInsight {
                category: category.clone(),
                percentage: stats.percentage,
            };
            if stats.percentage >= STRENGTH_CUTOFF {
                strengths.push(insight);
            } else if stats.percentage < IMPROVEMENT_CUTOFF {
                areas_for_improvement.push(insight);
            }
        }
        PerformanceInsights {
            overall_score: summary.score_percentage,
            strengths,
            areas_for_improvement,
        }
    }

    /// Study plan for display, capped at five entries.
    pub fn study_recommendations(
        insights: &PerformanceInsights,
        context: &QuizContext,
    ) -> Vec<String> {
        let mut recommendations = Vec::new();
        let therapy_area = &context.therapy_area;

        let overall = insights.overall_score;
        recommendations.push(if overall < 50.0 {
            format!(
                "Consider foundational training in {} before project onboarding",
                therapy_area
            )
        } else if overall < 70.0 {
            "Review key concepts and seek mentoring support".to_string()
        } else if overall < 85.0 {
            "Focus on specific weak areas identified in the results".to_string()
        } else {
            "Excellent performance - ready for advanced project responsibilities".to_string()
        });

        for area in &insights.areas_for_improvement {
            let category = area.category.to_lowercase();
            let advice = if category.contains("therapy area") {
                Some(format!(
                    "Study clinical guidelines and treatment pathways for {}",
                    therapy_area
                ))
            } else if category.contains("competitive") {
                Some(
                    "Research current market competitors and their positioning strategies"
                        .to_string(),
                )
            } else if category.contains("regulatory") {
                Some("Review FDA/EMA guidelines and market access requirements".to_string())
            } else if category.contains("methodology") {
                Some("Practice pharmaceutical research methodologies and data analysis".to_string())
            } else {
                None
            };
            recommendations.extend(advice);
        }

        if context.experience_level <= 3 {
            recommendations
                .push("Consider pairing with a senior consultant for initial projects".to_string());
        } else if context.experience_level >= 6 {
            recommendations.push(
                "Consider mentoring junior team members in your areas of strength".to_string(),
            );
        }

        recommendations.truncate(MAX_STUDY_RECOMMENDATIONS);
        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::GroupStats;
    use crate::test_utils::fixtures::{
        completed_summary, oncology_context, question, sample_questions,
    };

    fn stats(correct: u32, total: u32) -> GroupStats {
        let mut stats = GroupStats::default();
        for i in 0..total {
            stats.record(i < correct);
        }
        stats
    }

    #[test]
    fn learning_points_follow_category_and_missed_difficulty() {
        let q = question("Q", "Regulatory & Market Access", Difficulty::Advanced);

        assert_eq!(
            FeedbackService::learning_points(&q, false),
            vec![
                "Study regulatory requirements and market access considerations".to_string(),
                "Consider advanced training or mentoring in this topic".to_string(),
            ]
        );
        assert_eq!(FeedbackService::learning_points(&q, true).len(), 1);
    }

    #[test]
    fn unknown_category_has_no_topic_point() {
        let q = question("Q", "Pricing", Difficulty::Intermediate);
        assert!(FeedbackService::learning_points(&q, false).is_empty());
    }

    #[test]
    fn option_analysis_marks_the_correct_option() {
        let q = &sample_questions()[0];
        let analysis = FeedbackService::option_analysis(q);

        assert_eq!(analysis.len(), 4);
        assert_eq!(analysis.iter().filter(|a| a.is_correct).count(), 1);
        assert_eq!(analysis[0].option, "Inhibition of HER2 receptor signaling");
        assert!(analysis[0].is_correct);

        assert!(FeedbackService::option_analysis(&sample_questions()[2]).is_empty());
    }

    #[test]
    fn feedback_text_shows_correct_answer_when_wrong() {
        let q = question("Q", "Competitive Landscape", Difficulty::Fundamental);
        let feedback = AnswerFeedback {
            question_index: 0,
            is_correct: false,
            submitted_answer: Answer::choice("Wrong"),
            correct_answer: q.correct_answer.clone(),
            explanation: q.explanation.clone(),
        };

        let text = FeedbackService::format_feedback_text(&FeedbackService::detailed_feedback(
            &q, feedback,
        ));

        assert!(text.starts_with("Incorrect answer\nCorrect answer: Correct option"));
        assert!(text.contains("Explanation:\nExplanation for Q"));
        assert!(text.contains("- Review basic concepts in this therapy area"));
    }

    #[test]
    fn insights_split_strengths_and_weaknesses() {
        let mut summary = completed_summary();
        summary.category_breakdown.clear();
        summary
            .category_breakdown
            .insert("Therapy Area Knowledge".to_string(), stats(4, 5));
        summary
            .category_breakdown
            .insert("Competitive Landscape".to_string(), stats(1, 4));
        summary
            .category_breakdown
            .insert("Methodology".to_string(), stats(2, 3));

        let insights = FeedbackService::performance_insights(&summary);

        assert_eq!(insights.strengths.len(), 1);
        assert_eq!(insights.strengths[0].category, "Therapy Area Knowledge");
        assert_eq!(insights.areas_for_improvement.len(), 1);
        assert_eq!(insights.areas_for_improvement[0].percentage, 25.0);
    }

    #[test]
    fn study_recommendations_are_capped_at_five() {
        let weak = |category: &str| CategoryInsight {
            category: category.to_string(),
            percentage: 20.0,
        };
        let insights = PerformanceInsights {
            overall_score: 30.0,
            strengths: vec![],
            areas_for_improvement: vec![
                weak("Therapy Area Knowledge"),
                weak("Competitive Landscape"),
                weak("Regulatory & Market Access"),
                weak("Methodology"),
            ],
        };

        let recommendations =
            FeedbackService::study_recommendations(&insights, &oncology_context());

        assert_eq!(recommendations.len(), 5);
        assert_eq!(
            recommendations[0],
            "Consider foundational training in Oncology before project onboarding"
        );
        assert_eq!(
            recommendations[1],
            "Study clinical guidelines and treatment pathways for Oncology"
        );
    }

    #[test]
    fn senior_consultants_are_asked_to_mentor() {
        let insights = PerformanceInsights {
            overall_score: 92.0,
            strengths: vec![],
            areas_for_improvement: vec![],
        };
        let mut context = oncology_context();
        context.experience_level = 7;

        assert_eq!(
            FeedbackService::study_recommendations(&insights, &context),
            vec![
                "Excellent performance - ready for advanced project responsibilities".to_string(),
                "Consider mentoring junior team members in your areas of strength".to_string(),
            ]
        );
    }
}
