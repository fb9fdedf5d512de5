#[cfg(test)]
pub mod fixtures {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::config::Config;
    use crate::models::domain::{
        Answer, Difficulty, Navigation, Question, QuestionKind, QuizContext, QuizSession,
        ResultsSummary,
    };
    use crate::services::scoring_service::ScoringService;

    /// Deterministic RNG for shuffles
    pub fn seeded_rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    pub fn oncology_context() -> QuizContext {
        QuizContext {
            project_name: "Test Project".to_string(),
            client_name: "Test Client".to_string(),
            therapy_area: "Oncology".to_string(),
            indication: "Breast Cancer".to_string(),
            project_type: "ATU".to_string(),
            client_scenario: "Scenario 1: New Client, Baseline Wave (Wave 1)".to_string(),
            experience_level: 3,
            additional_therapy: None,
            brand_name: Some("TestDrug".to_string()),
            generic_name: Some("testamab".to_string()),
            documents: vec![],
        }
    }

    /// Single-choice question whose correct option is "Correct option".
    pub fn question(text: &str, category: &str, difficulty: Difficulty) -> Question {
        Question {
            text: text.to_string(),
            kind: QuestionKind::SingleChoice,
            options: vec![
                "Correct option".to_string(),
                "Wrong".to_string(),
                "Distractor".to_string(),
            ],
            correct_answer: Answer::choice("Correct option"),
            explanation: format!("Explanation for {}", text),
            category: category.to_string(),
            difficulty,
        }
    }

    /// One question of each kind.
    pub fn sample_questions() -> Vec<Question> {
        vec![
            Question {
                text: "What is the primary mechanism of action for HER2-targeted therapies?"
                    .to_string(),
                kind: QuestionKind::SingleChoice,
                options: vec![
                    "Inhibition of HER2 receptor signaling".to_string(),
                    "DNA intercalation".to_string(),
                    "Microtubule stabilization".to_string(),
                    "Topoisomerase inhibition".to_string(),
                ],
                correct_answer: Answer::choice("Inhibition of HER2 receptor signaling"),
                explanation: "HER2-targeted therapies block HER2 receptor signaling.".to_string(),
                category: "Therapy Area Knowledge".to_string(),
                difficulty: Difficulty::Fundamental,
            },
            Question {
                text: "Which are common endpoints in oncology trials?".to_string(),
                kind: QuestionKind::MultiSelect,
                options: vec![
                    "Overall survival".to_string(),
                    "Progression-free survival".to_string(),
                    "Objective response rate".to_string(),
                    "Blood pressure".to_string(),
                ],
                correct_answer: Answer::selection([
                    "Overall survival",
                    "Progression-free survival",
                    "Objective response rate",
                ]),
                explanation: "OS, PFS and ORR are standard oncology endpoints.".to_string(),
                category: "Methodology".to_string(),
                difficulty: Difficulty::Intermediate,
            },
            Question {
                text: "HTA bodies assess comparative effectiveness.".to_string(),
                kind: QuestionKind::TrueFalse,
                options: vec!["True".to_string(), "False".to_string()],
                correct_answer: Answer::choice("True"),
                explanation: "Health technology assessment compares against standard of care."
                    .to_string(),
                category: "Regulatory & Market Access".to_string(),
                difficulty: Difficulty::Advanced,
            },
        ]
    }

    /// Summary of a completed three-question session with every answer correct.
    pub fn completed_summary() -> ResultsSummary {
        let mut session = QuizSession::with_rng(sample_questions(), &mut seeded_rng())
            .expect("fixture questions are not empty");
        session.start().expect("fresh session starts");
        for index in 0..session.len() {
            let answer = session.questions()[index].correct_answer.clone();
            session.submit_answer(index, answer).expect("session is in progress");
        }
        while session.go_to_next().expect("session is in progress") == Navigation::Advanced {}

        ScoringService::from_config(&Config::test_config())
            .summarize(&session)
            .expect("session is completed")
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::models::domain::QuestionKind;
    use validator::Validate;

    #[test]
    fn test_fixtures_sample_questions_cover_every_kind() {
        let kinds: Vec<QuestionKind> = sample_questions().iter().map(|q| q.kind).collect();
        assert_eq!(
            kinds,
            vec![
                QuestionKind::SingleChoice,
                QuestionKind::MultiSelect,
                QuestionKind::TrueFalse
            ]
        );
    }

    #[test]
    fn test_fixtures_context_is_valid() {
        assert!(oncology_context().validate().is_ok());
    }

    #[test]
    fn test_fixtures_completed_summary_is_perfect() {
        let summary = completed_summary();
        assert_eq!(summary.correct_answers, 3);
        assert!(summary.passed);
    }
}
